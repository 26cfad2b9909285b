//! TheSportsDB-shaped JSON records for tests.

use serde_json::{json, Value};

#[must_use]
pub fn league(id: &str, name: &str, country: &str) -> Value {
    json!({
        "idLeague": id,
        "strLeague": name,
        "strLeagueAlternate": "",
        "strSport": "Rugby",
        "strCountry": country,
        "strCurrentSeason": "2023-2024"
    })
}

#[must_use]
pub fn season(label: &str) -> Value {
    json!({ "strSeason": label })
}

/// A finished rugby event. Pass `None` scores for an unplayed fixture.
#[must_use]
pub fn event(
    id: &str,
    home: (&str, &str),
    away: (&str, &str),
    score: Option<(i32, i32)>,
    venue: Option<&str>,
) -> Value {
    let (home_score, away_score, status) = match score {
        Some((h, a)) => (json!(h.to_string()), json!(a.to_string()), "FT"),
        None => (Value::Null, Value::Null, "NS"),
    };
    json!({
        "idEvent": id,
        "strEvent": format!("{} vs {}", home.1, away.1),
        "strSport": "Rugby",
        "idLeague": "4446",
        "strSeason": "2023-2024",
        "dateEvent": "2023-10-21",
        "strTime": "19:35:00",
        "strTimestamp": "2023-10-21T19:35:00",
        "strStatus": status,
        "idHomeTeam": home.0,
        "strHomeTeam": home.1,
        "idAwayTeam": away.0,
        "strAwayTeam": away.1,
        "intHomeScore": home_score,
        "intAwayScore": away_score,
        "idVenue": venue,
        "intAttendance": "12000"
    })
}

#[must_use]
pub fn team(id: &str, name: &str, country: &str) -> Value {
    json!({
        "idTeam": id,
        "strTeam": name,
        "strTeamShort": "",
        "strCountry": country,
        "strSport": "Rugby",
        "strBadge": format!("https://example.test/badges/{id}.png")
    })
}

#[must_use]
pub fn venue(id: &str, name: &str, city: &str) -> Value {
    json!({
        "idVenue": id,
        "strVenue": name,
        "strLocation": city,
        "strCountry": "Ireland",
        "strLatitude": "53.3352",
        "strLongitude": "-6.2285"
    })
}

/// Wrap records in a response body under `collection`.
#[must_use]
pub fn body(collection: &str, records: Vec<Value>) -> Value {
    json!({ collection: records })
}
