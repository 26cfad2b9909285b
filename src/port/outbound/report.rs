//! Read-side reporting/query ports.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::fixture::{Outcome, Side};
use crate::error::Result;

/// Which season of a league to report on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeasonSelector {
    /// Season with this label.
    Label(String),
    /// Most recent season by year.
    Latest,
}

/// One row of a league table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StandingRow {
    pub position: usize,
    pub team: String,
    pub games_played: i32,
    pub wins: i32,
    pub draws: i32,
    pub losses: i32,
    pub points_for: i32,
    pub points_against: i32,
    pub points_diff: i32,
    pub competition_points: i32,
}

/// A league table for one season, already in table order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeagueTable {
    pub league: String,
    pub season: String,
    pub rows: Vec<StandingRow>,
}

/// A team that appeared in a league's matches, once per season it played.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeagueTeam {
    pub team_id: i64,
    pub tsdb_team_id: Option<String>,
    pub name: String,
    pub season: String,
}

/// Teams of a league, ordered by name. `season` is `None` when every season
/// was included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeagueTeams {
    pub league: String,
    pub season: Option<String>,
    pub teams: Vec<LeagueTeam>,
}

/// How to pick the team for a fixture list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeamSelector {
    /// Internal `teams.team_id`.
    Id(i64),
    /// Case-insensitive substring of the team name; the first match by name
    /// wins.
    Name(String),
}

/// One match of a fixture list, from the selected team's side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fixture {
    pub kickoff_utc: Option<DateTime<Utc>>,
    pub side: Side,
    pub opponent: String,
    pub scored: Option<i32>,
    pub conceded: Option<i32>,
    pub outcome: Outcome,
}

/// Fixtures and results of one team in one league season, by kickoff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamFixtures {
    pub league: String,
    pub season: String,
    pub team_id: i64,
    pub team: String,
    pub fixtures: Vec<Fixture>,
}

/// Row count of one core table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableCount {
    pub table: &'static str,
    pub rows: i64,
}

/// Read-side queries for the `standings` reports and `status`.
pub trait ReportReader {
    /// League table for a league identified by its upstream id.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`](crate::error::Error::NotFound) when the
    /// league or season does not exist.
    fn league_table(&self, tsdb_league_id: &str, season: &SeasonSelector) -> Result<LeagueTable>;

    /// Distinct teams appearing in the league's matches, for one season or
    /// (with `None`) all of them.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`](crate::error::Error::NotFound) when the
    /// league or the selected season does not exist.
    fn league_teams(
        &self,
        tsdb_league_id: &str,
        season: Option<&SeasonSelector>,
    ) -> Result<LeagueTeams>;

    /// Every match of one team in a league season.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`](crate::error::Error::NotFound) when the
    /// league, season or team does not exist.
    fn team_fixtures(
        &self,
        tsdb_league_id: &str,
        season: &SeasonSelector,
        team: &TeamSelector,
    ) -> Result<TeamFixtures>;

    /// Row counts of every core table, in schema order.
    fn table_counts(&self) -> Result<Vec<TableCount>>;
}
