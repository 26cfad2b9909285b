//! Postgres read-side report adapter.
//!
//! Backs the `standings` reports and the `status` command.

use diesel::prelude::*;
use tracing::warn;

use super::database::connection::{fetch_rows, with_connection, DbPool, SqlParam};
use super::database::model::{FixtureQueryRow, LeagueTeamQueryRow, StandingQueryRow};
use super::database::schema::{
    league_team_seasons, leagues, matches, seasons, sports, team_season_stats, teams, venues,
};
use crate::domain::fixture::TeamView;
use crate::error::{Error, Result};
use crate::port::outbound::report::{
    Fixture, LeagueTable, LeagueTeam, LeagueTeams, ReportReader, SeasonSelector, StandingRow,
    TableCount, TeamFixtures, TeamSelector,
};

const STANDINGS_SQL: &str = "\
SELECT t.name AS team_name,
       s.games_played, s.wins, s.draws, s.losses,
       s.points_for, s.points_against, s.points_diff, s.competition_points
FROM team_season_stats s
JOIN teams t ON t.team_id = s.team_id
WHERE s.league_id = $1
  AND s.season_id = $2
ORDER BY s.competition_points DESC,
         s.points_diff DESC,
         s.points_for DESC,
         t.name ASC";

// $2 NULL means every season.
const LEAGUE_TEAMS_SQL: &str = "\
SELECT DISTINCT t.team_id, t.tsdb_team_id, t.name AS team_name,
       COALESCE(s.label, s.year::text) AS season_label
FROM matches m
JOIN seasons s ON s.season_id = m.season_id
JOIN teams t ON t.team_id = m.home_team_id OR t.team_id = m.away_team_id
WHERE m.league_id = $1
  AND ($2::bigint IS NULL OR m.season_id = $2)
ORDER BY team_name ASC, season_label ASC";

const FIXTURES_SQL: &str = "\
SELECT m.kickoff_utc, m.home_team_id, m.home_score, m.away_score,
       th.name AS home_team_name, ta.name AS away_team_name
FROM matches m
JOIN teams th ON th.team_id = m.home_team_id
JOIN teams ta ON ta.team_id = m.away_team_id
WHERE m.league_id = $1
  AND m.season_id = $2
  AND (m.home_team_id = $3 OR m.away_team_id = $3)
ORDER BY m.kickoff_utc ASC NULLS LAST, m.match_id ASC";

/// Report reader over the core schema.
pub struct PgReportReader {
    pool: DbPool,
}

impl PgReportReader {
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

struct LeagueRef {
    id: i64,
    name: String,
}

fn find_league(conn: &mut PgConnection, tsdb_league_id: &str) -> Result<LeagueRef> {
    let (id, name) = leagues::table
        .filter(leagues::tsdb_league_id.eq(tsdb_league_id))
        .select((leagues::league_id, leagues::name))
        .first::<(i64, String)>(conn)
        .optional()?
        .ok_or_else(|| Error::NotFound(format!("league with TSDB id {tsdb_league_id}")))?;
    Ok(LeagueRef { id, name })
}

/// Season id and display label; the year stands in for a missing label.
fn find_season(
    conn: &mut PgConnection,
    league: &LeagueRef,
    season: &SeasonSelector,
) -> Result<(i64, String)> {
    let query = seasons::table
        .filter(seasons::league_id.eq(league.id))
        .select((seasons::season_id, seasons::label, seasons::year));
    let found: Option<(i64, Option<String>, i32)> = match season {
        SeasonSelector::Label(label) => query
            .filter(seasons::label.eq(label))
            .first(conn)
            .optional()?,
        SeasonSelector::Latest => query.order(seasons::year.desc()).first(conn).optional()?,
    };
    let (season_id, label, year) = found.ok_or_else(|| {
        Error::NotFound(match season {
            SeasonSelector::Label(label) => format!("season '{label}' of {}", league.name),
            SeasonSelector::Latest => format!("any season of {}", league.name),
        })
    })?;
    Ok((season_id, label.unwrap_or_else(|| year.to_string())))
}

/// `%`, `_` and `\` in a team name match literally.
fn like_pattern(name: &str) -> String {
    let mut pattern = String::with_capacity(name.len() + 2);
    pattern.push('%');
    for c in name.trim().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn find_team(conn: &mut PgConnection, team: &TeamSelector) -> Result<(i64, String)> {
    match team {
        TeamSelector::Id(id) => {
            let name = teams::table
                .find(*id)
                .select(teams::name)
                .first::<String>(conn)
                .optional()?
                .ok_or_else(|| Error::NotFound(format!("team {id}")))?;
            Ok((*id, name))
        }
        TeamSelector::Name(name) => {
            let found: Vec<(i64, String)> = teams::table
                .filter(teams::name.ilike(like_pattern(name)))
                .order((teams::name.asc(), teams::team_id.asc()))
                .select((teams::team_id, teams::name))
                .load(conn)?;
            let mut found = found.into_iter();
            let first = found
                .next()
                .ok_or_else(|| Error::NotFound(format!("team matching '{name}'")))?;
            let others: Vec<String> = found.map(|(_, n)| n).collect();
            if !others.is_empty() {
                warn!(chosen = %first.1, others = ?others, "Several teams match, using the first");
            }
            Ok(first)
        }
    }
}

impl ReportReader for PgReportReader {
    fn league_table(&self, tsdb_league_id: &str, season: &SeasonSelector) -> Result<LeagueTable> {
        with_connection(&self.pool, |conn| {
            let league = find_league(conn, tsdb_league_id)?;
            let (season_id, label) = find_season(conn, &league, season)?;

            let rows: Vec<StandingQueryRow> =
                fetch_rows(conn, STANDINGS_SQL, &[league.id.into(), season_id.into()])?;

            Ok(LeagueTable {
                league: league.name,
                season: label,
                rows: rows
                    .into_iter()
                    .enumerate()
                    .map(|(i, r)| StandingRow {
                        position: i + 1,
                        team: r.team_name,
                        games_played: r.games_played,
                        wins: r.wins,
                        draws: r.draws,
                        losses: r.losses,
                        points_for: r.points_for,
                        points_against: r.points_against,
                        points_diff: r.points_diff,
                        competition_points: r.competition_points,
                    })
                    .collect(),
            })
        })
    }

    fn league_teams(
        &self,
        tsdb_league_id: &str,
        season: Option<&SeasonSelector>,
    ) -> Result<LeagueTeams> {
        with_connection(&self.pool, |conn| {
            let league = find_league(conn, tsdb_league_id)?;
            let season = season
                .map(|selector| find_season(conn, &league, selector))
                .transpose()?;

            let season_param = SqlParam::BigInt(season.as_ref().map(|(id, _)| *id));
            let rows: Vec<LeagueTeamQueryRow> =
                fetch_rows(conn, LEAGUE_TEAMS_SQL, &[league.id.into(), season_param])?;

            Ok(LeagueTeams {
                league: league.name,
                season: season.map(|(_, label)| label),
                teams: rows
                    .into_iter()
                    .map(|r| LeagueTeam {
                        team_id: r.team_id,
                        tsdb_team_id: r.tsdb_team_id,
                        name: r.team_name,
                        season: r.season_label,
                    })
                    .collect(),
            })
        })
    }

    fn team_fixtures(
        &self,
        tsdb_league_id: &str,
        season: &SeasonSelector,
        team: &TeamSelector,
    ) -> Result<TeamFixtures> {
        with_connection(&self.pool, |conn| {
            let league = find_league(conn, tsdb_league_id)?;
            let (season_id, label) = find_season(conn, &league, season)?;
            let (team_id, team_name) = find_team(conn, team)?;

            let rows: Vec<FixtureQueryRow> = fetch_rows(
                conn,
                FIXTURES_SQL,
                &[league.id.into(), season_id.into(), team_id.into()],
            )?;

            let fixtures = rows
                .into_iter()
                .map(|r| {
                    let view = TeamView::of(team_id, r.home_team_id, r.home_score, r.away_score);
                    let opponent = if r.home_team_id == team_id {
                        r.away_team_name
                    } else {
                        r.home_team_name
                    };
                    Fixture {
                        kickoff_utc: r.kickoff_utc,
                        side: view.side,
                        opponent,
                        scored: view.scored,
                        conceded: view.conceded,
                        outcome: view.outcome,
                    }
                })
                .collect();

            Ok(TeamFixtures {
                league: league.name,
                season: label,
                team_id,
                team: team_name,
                fixtures,
            })
        })
    }

    fn table_counts(&self) -> Result<Vec<TableCount>> {
        with_connection(&self.pool, |conn| {
            let counts = [
                ("sports", sports::table.count().get_result::<i64>(conn)?),
                ("leagues", leagues::table.count().get_result::<i64>(conn)?),
                ("seasons", seasons::table.count().get_result::<i64>(conn)?),
                ("teams", teams::table.count().get_result::<i64>(conn)?),
                ("venues", venues::table.count().get_result::<i64>(conn)?),
                ("matches", matches::table.count().get_result::<i64>(conn)?),
                (
                    "league_team_seasons",
                    league_team_seasons::table.count().get_result::<i64>(conn)?,
                ),
                (
                    "team_season_stats",
                    team_season_stats::table.count().get_result::<i64>(conn)?,
                ),
            ];
            Ok(counts
                .into_iter()
                .map(|(table, rows)| TableCount { table, rows })
                .collect())
        })
    }
}
