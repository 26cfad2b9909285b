//! Persistence port for the ingest services.
//!
//! Every write is an upsert keyed by an upstream natural id, so re-running a
//! command converges on the same rows.

use chrono::{DateTime, Utc};

use crate::domain::match_status::MatchStatus;
use crate::domain::standings::{MatchResult, TeamSeasonStats};
use crate::error::Result;

/// Provenance tag written to `matches.source`.
pub const MATCH_SOURCE: &str = "thesportsdb";

/// Whether an upsert created a row or refreshed an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upserted {
    Inserted,
    Updated,
}

/// Running totals for a batch of upserts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct UpsertCounts {
    pub inserted: usize,
    pub updated: usize,
    pub skipped: usize,
}

impl UpsertCounts {
    pub fn record(&mut self, outcome: Upserted) {
        match outcome {
            Upserted::Inserted => self.inserted += 1,
            Upserted::Updated => self.updated += 1,
        }
    }

    pub fn skip(&mut self) {
        self.skipped += 1;
    }

    pub fn merge(&mut self, other: Self) {
        self.inserted += other.inserted;
        self.updated += other.updated;
        self.skipped += other.skipped;
    }
}

/// League row keyed by `tsdb_league_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeagueRecord {
    pub tsdb_league_id: String,
    pub name: String,
    pub short_name: Option<String>,
    pub slug: String,
    pub country_code: Option<String>,
    pub sport_id: i64,
}

/// Season row keyed by `(league_id, year)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonRecord {
    pub league_id: i64,
    pub year: i32,
    pub label: String,
    pub tsdb_season_key: String,
}

/// Team row keyed by `tsdb_team_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamRecord {
    pub tsdb_team_id: String,
    pub name: String,
    pub short_name: Option<String>,
    pub slug: String,
    pub country: Option<String>,
    pub sport: Option<String>,
    pub badge_url: Option<String>,
}

/// Venue row keyed by `tsdb_venue_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct VenueRecord {
    pub tsdb_venue_id: String,
    pub name: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Match row keyed by `tsdb_event_id`, with teams and venue already resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    pub tsdb_event_id: String,
    pub league_id: i64,
    pub season_id: i64,
    pub venue_id: Option<i64>,
    pub home_team_id: i64,
    pub away_team_id: i64,
    pub status: MatchStatus,
    pub kickoff_utc: Option<DateTime<Utc>>,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
    pub attendance: Option<i32>,
}

/// A stored league that carries an upstream id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredLeague {
    pub league_id: i64,
    pub name: String,
    pub slug: Option<String>,
    pub tsdb_league_id: String,
}

/// A stored season.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSeason {
    pub season_id: i64,
    pub league_id: i64,
    pub year: i32,
    pub label: Option<String>,
    pub tsdb_season_key: Option<String>,
}

impl StoredSeason {
    /// Season string to send upstream: the stored key, else the label.
    #[must_use]
    pub fn upstream_key(&self) -> Option<&str> {
        self.tsdb_season_key.as_deref().or(self.label.as_deref())
    }
}

/// Write and lookup operations used by the ingest services.
pub trait IngestStore {
    /// Id of the seeded rugby sport row.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`](crate::error::Error::NotFound) if the schema
    /// has not been initialised.
    fn rugby_sport_id(&self) -> Result<i64>;

    fn upsert_league(&self, league: &LeagueRecord) -> Result<Upserted>;

    /// Rugby leagues with an upstream id, ordered by `league_id`.
    fn rugby_leagues(&self, only_tsdb_league: Option<&str>) -> Result<Vec<StoredLeague>>;

    fn upsert_season(&self, season: &SeasonRecord) -> Result<Upserted>;

    /// Seasons of a league that carry an upstream key, oldest first. With
    /// `latest`, only that many of the most recent years are returned.
    fn seasons(&self, league_id: i64, latest: Option<usize>) -> Result<Vec<StoredSeason>>;

    /// Upsert a team and return its row id.
    fn upsert_team(&self, team: &TeamRecord) -> Result<(i64, Upserted)>;

    /// Record that a team took part in a league season.
    fn link_team_season(&self, league_id: i64, season_id: i64, team_id: i64) -> Result<()>;

    fn upsert_venue(&self, venue: &VenueRecord) -> Result<Upserted>;

    fn team_id(&self, tsdb_team_id: &str) -> Result<Option<i64>>;

    fn venue_id(&self, tsdb_venue_id: &str) -> Result<Option<i64>>;

    /// Upsert one season's matches atomically.
    fn upsert_matches(&self, matches: &[MatchRecord]) -> Result<UpsertCounts>;

    /// Completed matches (both scores present) of a league, optionally one season.
    fn completed_results(&self, league_id: i64, season_id: Option<i64>)
        -> Result<Vec<MatchResult>>;

    /// Upsert standings rows and return how many were written.
    fn save_team_season_stats(&self, stats: &[TeamSeasonStats]) -> Result<usize>;
}
