//! TheSportsDB response records.
//!
//! The API mixes strings, numbers and `null` for the same field across
//! endpoints, so every field is read leniently into `Option<String>` and
//! interpreted by the mapping functions in [`crate::domain`].

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::Result;
use crate::port::outbound::source::Record;

fn lenient<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// Decode a raw record into a typed DTO.
///
/// # Errors
/// Fails only when the record is structurally unusable; individual fields
/// are lenient.
pub fn decode<T: for<'de> Deserialize<'de>>(record: Record) -> Result<T> {
    Ok(serde_json::from_value(Value::Object(record))?)
}

/// True when `strSport` names a rugby code.
#[must_use]
pub fn is_rugby(sport: Option<&str>) -> bool {
    sport.is_some_and(|s| s.to_ascii_lowercase().starts_with("rugby"))
}

/// `lookupleague.php` entry.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueDto {
    #[serde(default, deserialize_with = "lenient")]
    pub id_league: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub str_league: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub str_league_alternate: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub str_sport: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub str_country: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub str_current_season: Option<String>,
}

impl LeagueDto {
    /// First alternate name, if any. TSDB separates alternates with commas.
    #[must_use]
    pub fn first_alternate(&self) -> Option<&str> {
        self.str_league_alternate
            .as_deref()
            .and_then(|alt| alt.split(',').map(str::trim).find(|a| !a.is_empty()))
    }
}

/// `search_all_seasons.php` entry.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonDto {
    #[serde(default, deserialize_with = "lenient")]
    pub str_season: Option<String>,
}

/// `eventsseason.php` entry.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDto {
    #[serde(default, deserialize_with = "lenient")]
    pub id_event: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub str_event: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub str_sport: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub id_league: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub str_league: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub str_season: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub date_event: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub str_time: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub str_timestamp: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub str_status: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub str_progress: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub id_home_team: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub str_home_team: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub id_away_team: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub str_away_team: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub id_venue: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub str_venue: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub int_home_score: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub int_away_score: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub int_attendance: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub int_spectators: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub int_round: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub str_filename: Option<String>,
}

impl EventDto {
    /// Raw status: `strStatus`, falling back to `strProgress`.
    #[must_use]
    pub fn raw_status(&self) -> Option<&str> {
        self.str_status.as_deref().or(self.str_progress.as_deref())
    }

    /// Attendance as reported; older records use `intSpectators`.
    #[must_use]
    pub fn attendance(&self) -> Option<&str> {
        self.int_attendance
            .as_deref()
            .or(self.int_spectators.as_deref())
    }
}

/// `lookupteam.php` entry.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamDto {
    #[serde(default, deserialize_with = "lenient")]
    pub id_team: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub str_team: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub str_team_short: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub str_alternate: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub str_country: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub str_sport: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub str_team_badge: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub str_badge: Option<String>,
}

impl TeamDto {
    /// Short name: `strTeamShort`, else `strAlternate`, else the team name.
    #[must_use]
    pub fn short_name(&self) -> Option<&str> {
        self.str_team_short
            .as_deref()
            .or(self.str_alternate.as_deref())
            .or(self.str_team.as_deref())
    }

    #[must_use]
    pub fn badge_url(&self) -> Option<&str> {
        self.str_team_badge.as_deref().or(self.str_badge.as_deref())
    }
}

/// `lookupvenue.php` entry.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VenueDto {
    #[serde(default, deserialize_with = "lenient")]
    pub id_venue: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub str_venue: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub str_city: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub str_location: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub str_country: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub str_latitude: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub str_longitude: Option<String>,
}

impl VenueDto {
    #[must_use]
    pub fn city(&self) -> Option<&str> {
        self.str_city.as_deref().or(self.str_location.as_deref())
    }

    #[must_use]
    pub fn latitude(&self) -> Option<f64> {
        self.str_latitude.as_deref().and_then(|v| v.parse().ok())
    }

    #[must_use]
    pub fn longitude(&self) -> Option<f64> {
        self.str_longitude.as_deref().and_then(|v| v.parse().ok())
    }
}
