//! Handlers for the `standings` subcommands.

use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::command::{ComputeArgs, FixturesArgs, ShowArgs, TeamsArgs};
use crate::adapter::inbound::cli::{output, wiring};
use crate::application::ingest::{compute_standings, StandingsOptions};
use crate::error::{ConfigError, Result};
use crate::infrastructure::config::Config;
use crate::port::outbound::report::{
    LeagueTable, LeagueTeams, ReportReader, SeasonSelector, TeamFixtures, TeamSelector,
};

#[derive(Tabled)]
struct TableRow {
    #[tabled(rename = "#")]
    position: usize,
    #[tabled(rename = "Team")]
    team: String,
    #[tabled(rename = "P")]
    played: i32,
    #[tabled(rename = "W")]
    wins: i32,
    #[tabled(rename = "D")]
    draws: i32,
    #[tabled(rename = "L")]
    losses: i32,
    #[tabled(rename = "PF")]
    points_for: i32,
    #[tabled(rename = "PA")]
    points_against: i32,
    #[tabled(rename = "PD")]
    points_diff: String,
    #[tabled(rename = "Pts")]
    points: i32,
}

#[derive(Tabled)]
struct TeamRow {
    #[tabled(rename = "ID")]
    team_id: i64,
    #[tabled(rename = "TSDB")]
    tsdb_team_id: String,
    #[tabled(rename = "Team")]
    team: String,
    #[tabled(rename = "Season")]
    season: String,
}

#[derive(Tabled)]
struct FixtureRow {
    #[tabled(rename = "Kickoff (UTC)")]
    kickoff: String,
    #[tabled(rename = "H/A")]
    side: &'static str,
    #[tabled(rename = "Opponent")]
    opponent: String,
    #[tabled(rename = "Score")]
    score: String,
    #[tabled(rename = "Res")]
    outcome: &'static str,
}

fn season_selector(label: Option<&String>, latest: bool) -> Option<SeasonSelector> {
    match label {
        Some(label) if !latest => Some(SeasonSelector::Label(label.clone())),
        _ if latest => Some(SeasonSelector::Latest),
        _ => None,
    }
}

/// Recompute team season stats.
///
/// # Errors
/// Fails when no league matches or the database is unreachable.
pub fn compute(args: &ComputeArgs, config: &Config) -> Result<()> {
    let store = wiring::store(config)?;
    let options = StandingsOptions {
        only_tsdb_league: args.only_tsdb_league.clone(),
        season_label: args.season_label.clone(),
    };
    let report = compute_standings(&store, &options)?;

    if output::is_json() {
        output::result("standings.compute", &report);
        return Ok(());
    }
    output::field("Leagues", report.leagues);
    output::field("Matches", report.matches);
    output::field("Rows", report.rows);
    if report.rows == 0 {
        output::hint("run `rugby-ingest ingest matches` first");
    }
    Ok(())
}

/// Print a league table.
///
/// # Errors
/// Fails when the league or season is not stored, or the database is
/// unreachable.
pub fn show(args: &ShowArgs, config: &Config) -> Result<()> {
    let selector =
        season_selector(args.season_label.as_ref(), args.latest).unwrap_or(SeasonSelector::Latest);
    let reader = wiring::reader(config)?;
    let table = reader.league_table(&args.league, &selector)?;

    if output::is_json() {
        output::result("standings.show", &table);
        return Ok(());
    }
    if output::is_quiet() {
        return Ok(());
    }

    output::section(&format!("{} {}", table.league, table.season));
    if table.rows.is_empty() {
        output::warning("No standings for this season");
        output::hint("run `rugby-ingest standings compute` first");
        return Ok(());
    }
    output::lines(&render(&table));
    Ok(())
}

/// List the teams that appear in a league's matches.
///
/// # Errors
/// Fails when the league or season is not stored, or the database is
/// unreachable.
pub fn teams(args: &TeamsArgs, config: &Config) -> Result<()> {
    let selector = season_selector(args.season_label.as_ref(), args.latest);
    let reader = wiring::reader(config)?;
    let teams = reader.league_teams(&args.league, selector.as_ref())?;

    if output::is_json() {
        output::result("standings.teams", &teams);
        return Ok(());
    }
    if output::is_quiet() {
        return Ok(());
    }

    let scope = teams.season.as_deref().unwrap_or("all seasons");
    output::section(&format!("{} ({scope})", teams.league));
    if teams.teams.is_empty() {
        output::warning("No teams found for that league and season");
        output::hint("run `rugby-ingest ingest matches` first");
        return Ok(());
    }
    output::lines(&render_teams(&teams));
    Ok(())
}

/// Print one team's fixtures and results.
///
/// # Errors
/// Fails when the league, season or team is not stored, or the database is
/// unreachable.
pub fn fixtures(args: &FixturesArgs, config: &Config) -> Result<()> {
    let selector =
        season_selector(args.season_label.as_ref(), args.latest).unwrap_or(SeasonSelector::Latest);
    let team = match (&args.team_id, &args.team) {
        (Some(id), _) => TeamSelector::Id(*id),
        (None, Some(name)) => TeamSelector::Name(name.clone()),
        (None, None) => {
            return Err(ConfigError::InvalidConfiguration {
                key: "--team",
                reason: "pass --team-id or --team".into(),
            }
            .into())
        }
    };
    let reader = wiring::reader(config)?;
    let fixtures = reader.team_fixtures(&args.league, &selector, &team)?;

    if output::is_json() {
        output::result("standings.fixtures", &fixtures);
        return Ok(());
    }
    if output::is_quiet() {
        return Ok(());
    }

    let title = format!("{} {} {}", fixtures.league, fixtures.season, fixtures.team);
    output::section(&title);
    if fixtures.fixtures.is_empty() {
        output::warning("No matches found for that team and season");
        return Ok(());
    }
    output::lines(&render_fixtures(&fixtures));
    Ok(())
}

fn render_teams(teams: &LeagueTeams) -> String {
    let rows = teams.teams.iter().map(|t| TeamRow {
        team_id: t.team_id,
        tsdb_team_id: t.tsdb_team_id.clone().unwrap_or_default(),
        team: t.name.clone(),
        season: t.season.clone(),
    });
    Table::new(rows).to_string()
}

fn render_fixtures(fixtures: &TeamFixtures) -> String {
    let rows = fixtures.fixtures.iter().map(|f| FixtureRow {
        kickoff: f
            .kickoff_utc
            .map_or_else(|| "TBD".to_string(), |k| k.format("%Y-%m-%d %H:%M").to_string()),
        side: f.side.code(),
        opponent: f.opponent.clone(),
        score: match (f.scored, f.conceded) {
            (Some(scored), Some(conceded)) => format!("{scored}-{conceded}"),
            _ => "-:-".to_string(),
        },
        outcome: f.outcome.code(),
    });
    Table::new(rows).to_string()
}

fn render(table: &LeagueTable) -> String {
    let rows = table.rows.iter().map(|r| TableRow {
        position: r.position,
        team: r.team.clone(),
        played: r.games_played,
        wins: r.wins,
        draws: r.draws,
        losses: r.losses,
        points_for: r.points_for,
        points_against: r.points_against,
        points_diff: output::signed(r.points_diff),
        points: r.competition_points,
    });
    Table::new(rows).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixture::{Outcome, Side};
    use crate::port::outbound::report::{Fixture, LeagueTeam, StandingRow};
    use chrono::{TimeZone, Utc};

    #[test]
    fn renders_rows_in_given_order() {
        let row = |position, team: &str, diff| StandingRow {
            position,
            team: team.into(),
            games_played: 2,
            wins: 1,
            draws: 0,
            losses: 1,
            points_for: 40,
            points_against: 40 - diff,
            points_diff: diff,
            competition_points: 5,
        };
        let table = LeagueTable {
            league: "URC".into(),
            season: "2023-2024".into(),
            rows: vec![row(1, "Leinster", 0), row(2, "Munster", 0)],
        };
        let rendered = render(&table);
        let leinster = rendered.find("Leinster").unwrap();
        let munster = rendered.find("Munster").unwrap();
        assert!(leinster < munster);
        assert!(rendered.contains("Pts"));
    }

    #[test]
    fn season_choice() {
        let label = "2023-2024".to_string();
        assert_eq!(
            season_selector(Some(&label), false),
            Some(SeasonSelector::Label(label.clone()))
        );
        assert_eq!(season_selector(None, true), Some(SeasonSelector::Latest));
        assert_eq!(season_selector(None, false), None);
    }

    #[test]
    fn team_list_shows_ids_and_blank_tsdb_ids() {
        let teams = LeagueTeams {
            league: "URC".into(),
            season: None,
            teams: vec![
                LeagueTeam {
                    team_id: 13,
                    tsdb_team_id: Some("135221".into()),
                    name: "Bulls".into(),
                    season: "2023-2024".into(),
                },
                LeagueTeam {
                    team_id: 21,
                    tsdb_team_id: None,
                    name: "Zebre".into(),
                    season: "2023-2024".into(),
                },
            ],
        };
        let rendered = render_teams(&teams);
        assert!(rendered.contains("135221"));
        assert!(rendered.find("Bulls").unwrap() < rendered.find("Zebre").unwrap());
        assert!(rendered.contains("Season"));
    }

    #[test]
    fn fixtures_show_side_score_and_result() {
        let fixtures = TeamFixtures {
            league: "URC".into(),
            season: "2023-2024".into(),
            team_id: 13,
            team: "Bulls".into(),
            fixtures: vec![
                Fixture {
                    kickoff_utc: Utc.with_ymd_and_hms(2023, 10, 21, 17, 5, 0).single(),
                    side: Side::Away,
                    opponent: "Leinster".into(),
                    scored: Some(17),
                    conceded: Some(24),
                    outcome: Outcome::Loss,
                },
                Fixture {
                    kickoff_utc: None,
                    side: Side::Home,
                    opponent: "Munster".into(),
                    scored: None,
                    conceded: None,
                    outcome: Outcome::Pending,
                },
            ],
        };
        let rendered = render_fixtures(&fixtures);
        assert!(rendered.contains("2023-10-21 17:05"));
        assert!(rendered.contains("17-24"));
        assert!(rendered.contains("TBD"));
        assert!(rendered.contains("-:-"));
        assert!(rendered.contains("H/A"));
        let lines: Vec<&str> = rendered.lines().collect();
        let leinster = lines.iter().find(|l| l.contains("Leinster")).unwrap();
        assert!(leinster.contains(" A ") && leinster.contains(" L "));
        assert!(lines.iter().any(|l| l.contains("Munster") && l.contains(" ? ")));
    }
}
