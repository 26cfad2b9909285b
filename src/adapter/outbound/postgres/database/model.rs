//! Database model types for Diesel ORM.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Integer, Nullable, Text, Timestamptz};

use super::schema::{leagues, matches, seasons, team_season_stats, teams, venues};
use crate::domain::standings::TeamSeasonStats;
use crate::port::outbound::store::{
    LeagueRecord, MatchRecord, SeasonRecord, StoredLeague, StoredSeason, TeamRecord, VenueRecord,
    MATCH_SOURCE,
};

/// Insertable league row.
#[derive(Insertable, Debug)]
#[diesel(table_name = leagues)]
pub struct NewLeagueRow<'a> {
    pub name: &'a str,
    pub short_name: Option<&'a str>,
    pub slug: &'a str,
    pub country_code: Option<&'a str>,
    pub sport_id: i64,
    pub tsdb_league_id: &'a str,
}

impl<'a> From<&'a LeagueRecord> for NewLeagueRow<'a> {
    fn from(l: &'a LeagueRecord) -> Self {
        Self {
            name: &l.name,
            short_name: l.short_name.as_deref(),
            slug: &l.slug,
            country_code: l.country_code.as_deref(),
            sport_id: l.sport_id,
            tsdb_league_id: &l.tsdb_league_id,
        }
    }
}

/// League row as read back for ingest.
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = leagues)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct LeagueRow {
    pub league_id: i64,
    pub name: String,
    pub slug: Option<String>,
    pub tsdb_league_id: Option<String>,
}

impl LeagueRow {
    /// Rows without an upstream id are not ingestable.
    #[must_use]
    pub fn into_stored(self) -> Option<StoredLeague> {
        Some(StoredLeague {
            league_id: self.league_id,
            name: self.name,
            slug: self.slug,
            tsdb_league_id: self.tsdb_league_id?,
        })
    }
}

/// Insertable season row.
#[derive(Insertable, Debug)]
#[diesel(table_name = seasons)]
pub struct NewSeasonRow<'a> {
    pub league_id: i64,
    pub year: i32,
    pub label: &'a str,
    pub tsdb_season_key: &'a str,
}

impl<'a> From<&'a SeasonRecord> for NewSeasonRow<'a> {
    fn from(s: &'a SeasonRecord) -> Self {
        Self {
            league_id: s.league_id,
            year: s.year,
            label: &s.label,
            tsdb_season_key: &s.tsdb_season_key,
        }
    }
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = seasons)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SeasonRow {
    pub season_id: i64,
    pub league_id: i64,
    pub year: i32,
    pub label: Option<String>,
    pub tsdb_season_key: Option<String>,
}

impl From<SeasonRow> for StoredSeason {
    fn from(row: SeasonRow) -> Self {
        Self {
            season_id: row.season_id,
            league_id: row.league_id,
            year: row.year,
            label: row.label,
            tsdb_season_key: row.tsdb_season_key,
        }
    }
}

/// Insertable team row.
#[derive(Insertable, Debug)]
#[diesel(table_name = teams)]
pub struct NewTeamRow<'a> {
    pub name: &'a str,
    pub short_name: Option<&'a str>,
    pub slug: &'a str,
    pub country: Option<&'a str>,
    pub sport: Option<&'a str>,
    pub badge_url: Option<&'a str>,
    pub tsdb_team_id: &'a str,
}

impl<'a> From<&'a TeamRecord> for NewTeamRow<'a> {
    fn from(t: &'a TeamRecord) -> Self {
        Self {
            name: &t.name,
            short_name: t.short_name.as_deref(),
            slug: &t.slug,
            country: t.country.as_deref(),
            sport: t.sport.as_deref(),
            badge_url: t.badge_url.as_deref(),
            tsdb_team_id: &t.tsdb_team_id,
        }
    }
}

/// Insertable venue row.
#[derive(Insertable, Debug)]
#[diesel(table_name = venues)]
pub struct NewVenueRow<'a> {
    pub name: Option<&'a str>,
    pub city: Option<&'a str>,
    pub country: Option<&'a str>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub tsdb_venue_id: &'a str,
}

impl<'a> From<&'a VenueRecord> for NewVenueRow<'a> {
    fn from(v: &'a VenueRecord) -> Self {
        Self {
            name: v.name.as_deref(),
            city: v.city.as_deref(),
            country: v.country.as_deref(),
            latitude: v.latitude,
            longitude: v.longitude,
            tsdb_venue_id: &v.tsdb_venue_id,
        }
    }
}

/// Insertable match row.
#[derive(Insertable, Debug)]
#[diesel(table_name = matches)]
pub struct NewMatchRow<'a> {
    pub league_id: i64,
    pub season_id: i64,
    pub venue_id: Option<i64>,
    pub home_team_id: i64,
    pub away_team_id: i64,
    pub status: &'static str,
    pub kickoff_utc: Option<DateTime<Utc>>,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
    pub attendance: Option<i32>,
    pub tsdb_event_id: &'a str,
    pub source: &'static str,
}

impl<'a> From<&'a MatchRecord> for NewMatchRow<'a> {
    fn from(m: &'a MatchRecord) -> Self {
        Self {
            league_id: m.league_id,
            season_id: m.season_id,
            venue_id: m.venue_id,
            home_team_id: m.home_team_id,
            away_team_id: m.away_team_id,
            status: m.status.as_str(),
            kickoff_utc: m.kickoff_utc,
            home_score: m.home_score,
            away_score: m.away_score,
            attendance: m.attendance,
            tsdb_event_id: &m.tsdb_event_id,
            source: MATCH_SOURCE,
        }
    }
}

/// Insertable standings row.
#[derive(Insertable, Debug)]
#[diesel(table_name = team_season_stats)]
pub struct TeamSeasonStatsRow {
    pub league_id: i64,
    pub season_id: i64,
    pub team_id: i64,
    pub games_played: i32,
    pub wins: i32,
    pub draws: i32,
    pub losses: i32,
    pub points_for: i32,
    pub points_against: i32,
    pub points_diff: i32,
    pub competition_points: i32,
    pub losing_bonus_points: i32,
    pub try_bonus_points: i32,
}

impl From<&TeamSeasonStats> for TeamSeasonStatsRow {
    fn from(s: &TeamSeasonStats) -> Self {
        Self {
            league_id: s.key.league_id,
            season_id: s.key.season_id,
            team_id: s.key.team_id,
            games_played: s.games_played,
            wins: s.wins,
            draws: s.draws,
            losses: s.losses,
            points_for: s.points_for,
            points_against: s.points_against,
            points_diff: s.points_diff(),
            competition_points: s.competition_points,
            losing_bonus_points: s.losing_bonus_points,
            try_bonus_points: s.try_bonus_points,
        }
    }
}

/// League table row loaded by the standings report query.
#[derive(QueryableByName, Debug, Clone)]
pub struct StandingQueryRow {
    #[diesel(sql_type = Text)]
    pub team_name: String,
    #[diesel(sql_type = Integer)]
    pub games_played: i32,
    #[diesel(sql_type = Integer)]
    pub wins: i32,
    #[diesel(sql_type = Integer)]
    pub draws: i32,
    #[diesel(sql_type = Integer)]
    pub losses: i32,
    #[diesel(sql_type = Integer)]
    pub points_for: i32,
    #[diesel(sql_type = Integer)]
    pub points_against: i32,
    #[diesel(sql_type = Integer)]
    pub points_diff: i32,
    #[diesel(sql_type = Integer)]
    pub competition_points: i32,
}

/// One (team, season) pair from the league teams query.
#[derive(QueryableByName, Debug, Clone)]
pub struct LeagueTeamQueryRow {
    #[diesel(sql_type = BigInt)]
    pub team_id: i64,
    #[diesel(sql_type = Nullable<Text>)]
    pub tsdb_team_id: Option<String>,
    #[diesel(sql_type = Text)]
    pub team_name: String,
    #[diesel(sql_type = Text)]
    pub season_label: String,
}

/// One match row of the team fixtures query.
#[derive(QueryableByName, Debug, Clone)]
pub struct FixtureQueryRow {
    #[diesel(sql_type = Nullable<Timestamptz>)]
    pub kickoff_utc: Option<DateTime<Utc>>,
    #[diesel(sql_type = BigInt)]
    pub home_team_id: i64,
    #[diesel(sql_type = Nullable<Integer>)]
    pub home_score: Option<i32>,
    #[diesel(sql_type = Nullable<Integer>)]
    pub away_score: Option<i32>,
    #[diesel(sql_type = Text)]
    pub home_team_name: String,
    #[diesel(sql_type = Text)]
    pub away_team_name: String,
}
