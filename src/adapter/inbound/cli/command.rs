//! Command-line interface definitions.
//!
//! Every subcommand is one unit of work: it loads configuration, runs to
//! completion, and exits 0 on success or non-zero on failure.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::catalog::{LeagueCategory, URC_LEAGUE_ID};

/// Rugby analytics ingestion: TheSportsDB to Postgres
#[derive(Parser, Debug)]
#[command(name = "rugby-ingest")]
#[command(version)]
pub struct Cli {
    /// Read settings from this file only, ignoring .env and the process environment
    #[arg(long, global = true, value_name = "PATH")]
    pub env_file: Option<PathBuf>,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create or upgrade the core schema
    InitSchema,

    /// Pull records from TheSportsDB into Postgres
    #[command(subcommand)]
    Ingest(IngestCommand),

    /// Compute league tables and print season reports
    #[command(subcommand)]
    Standings(StandingsCommand),

    /// Show row counts of the core tables
    Status,
}

/// Subcommands for `rugby-ingest ingest`.
#[derive(Subcommand, Debug)]
pub enum IngestCommand {
    /// Upsert the curated league catalog.
    Leagues(LeaguesArgs),
    /// Upsert every season of the stored leagues.
    Seasons(SeasonsArgs),
    /// Upsert the teams of one league season.
    Teams(LeagueSeasonArgs),
    /// Upsert the venues of one league season.
    Venues(LeagueSeasonArgs),
    /// Upsert matches for the stored league seasons.
    Matches(MatchesArgs),
}

/// Subcommands for `rugby-ingest standings`.
#[derive(Subcommand, Debug)]
pub enum StandingsCommand {
    /// Aggregate completed matches into team season stats.
    Compute(ComputeArgs),
    /// Print a league table.
    Show(ShowArgs),
    /// List the teams that played in a league.
    Teams(TeamsArgs),
    /// List one team's fixtures and results in a league season.
    Fixtures(FixturesArgs),
}

/// Shared `--write-csv` flag.
#[derive(Args, Debug, Clone, Copy)]
pub struct CsvArg {
    /// Also write a CSV snapshot into the data directory
    #[arg(long)]
    pub write_csv: bool,
}

#[derive(Args, Debug)]
pub struct LeaguesArgs {
    /// Only ingest one catalog category
    #[arg(long, value_enum)]
    pub only: Option<LeagueCategory>,

    #[command(flatten)]
    pub csv: CsvArg,
}

#[derive(Args, Debug)]
pub struct SeasonsArgs {
    /// Only process this TSDB league id
    #[arg(long, value_name = "ID")]
    pub only_tsdb_league: Option<String>,

    #[command(flatten)]
    pub csv: CsvArg,
}

#[derive(Args, Debug)]
pub struct LeagueSeasonArgs {
    /// TSDB league id
    #[arg(long, value_name = "ID", default_value = URC_LEAGUE_ID)]
    pub league: String,

    /// Season label [default: the league's current season]
    #[arg(long, value_name = "LABEL")]
    pub season: Option<String>,

    #[command(flatten)]
    pub csv: CsvArg,
}

#[derive(Args, Debug)]
pub struct MatchesArgs {
    /// Only process this TSDB league id
    #[arg(long, value_name = "ID")]
    pub only_tsdb_league: Option<String>,

    /// Only the latest N seasons of each league
    #[arg(long, value_name = "N")]
    pub limit_seasons_back: Option<usize>,

    /// Attempts per season when the upstream keeps failing
    #[arg(long, value_name = "N", default_value_t = 5)]
    pub season_max_retries: u32,

    /// Base sleep between season attempts, doubled each time
    #[arg(long, value_name = "SECS", default_value_t = 5.0)]
    pub season_base_sleep: f64,

    #[command(flatten)]
    pub csv: CsvArg,
}

#[derive(Args, Debug)]
pub struct ComputeArgs {
    /// Only process this TSDB league id
    #[arg(long, value_name = "ID")]
    pub only_tsdb_league: Option<String>,

    /// Only this season label
    #[arg(long, value_name = "LABEL")]
    pub season_label: Option<String>,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// TSDB league id
    #[arg(long, value_name = "ID")]
    pub league: String,

    /// Season label
    #[arg(
        long,
        value_name = "LABEL",
        conflicts_with = "latest",
        required_unless_present = "latest"
    )]
    pub season_label: Option<String>,

    /// Most recent stored season
    #[arg(long)]
    pub latest: bool,
}

#[derive(Args, Debug)]
pub struct TeamsArgs {
    /// TSDB league id
    #[arg(long, value_name = "ID")]
    pub league: String,

    /// Season label [default: every season]
    #[arg(long, value_name = "LABEL", conflicts_with = "latest")]
    pub season_label: Option<String>,

    /// Most recent stored season
    #[arg(long)]
    pub latest: bool,
}

#[derive(Args, Debug)]
pub struct FixturesArgs {
    /// TSDB league id
    #[arg(long, value_name = "ID")]
    pub league: String,

    /// Season label
    #[arg(
        long,
        value_name = "LABEL",
        conflicts_with = "latest",
        required_unless_present = "latest"
    )]
    pub season_label: Option<String>,

    /// Most recent stored season
    #[arg(long)]
    pub latest: bool,

    /// Internal team id, as listed by `standings teams`
    #[arg(
        long,
        value_name = "ID",
        conflicts_with = "team",
        required_unless_present = "team"
    )]
    pub team_id: Option<i64>,

    /// Team name or part of it, case-insensitive
    #[arg(long, value_name = "NAME")]
    pub team: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_matches_options() {
        let cli = Cli::try_parse_from([
            "rugby-ingest",
            "-vv",
            "ingest",
            "matches",
            "--only-tsdb-league",
            "4446",
            "--limit-seasons-back",
            "2",
            "--season-base-sleep",
            "0.5",
            "--write-csv",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let Commands::Ingest(IngestCommand::Matches(args)) = cli.command else {
            panic!("expected ingest matches");
        };
        assert_eq!(args.only_tsdb_league.as_deref(), Some("4446"));
        assert_eq!(args.limit_seasons_back, Some(2));
        assert_eq!(args.season_max_retries, 5);
        assert!((args.season_base_sleep - 0.5).abs() < f64::EPSILON);
        assert!(args.csv.write_csv);
    }

    #[test]
    fn teams_default_to_urc() {
        let cli = Cli::try_parse_from(["rugby-ingest", "ingest", "teams"]).unwrap();
        let Commands::Ingest(IngestCommand::Teams(args)) = cli.command else {
            panic!("expected ingest teams");
        };
        assert_eq!(args.league, URC_LEAGUE_ID);
        assert_eq!(args.season, None);
    }

    #[test]
    fn standings_show_needs_a_season_choice() {
        let show = ["rugby-ingest", "standings", "show", "--league", "4446"];
        assert!(Cli::try_parse_from(show).is_err());
        assert!(Cli::try_parse_from([
            "rugby-ingest",
            "standings",
            "show",
            "--league",
            "4446",
            "--season-label",
            "2023-2024",
            "--latest",
        ])
        .is_err());
        assert!(Cli::try_parse_from(show.iter().chain(&["--latest"])).is_ok());
    }

    #[test]
    fn fixtures_need_exactly_one_team_choice() {
        let base = [
            "rugby-ingest",
            "standings",
            "fixtures",
            "--league",
            "4446",
            "--latest",
        ];
        assert!(Cli::try_parse_from(base).is_err());
        assert!(Cli::try_parse_from(base.iter().chain(&["--team-id", "13", "--team", "Bulls"]))
            .is_err());

        let cli = Cli::try_parse_from(base.iter().chain(&["--team", "Bulls"])).unwrap();
        let Commands::Standings(StandingsCommand::Fixtures(args)) = cli.command else {
            panic!("expected standings fixtures");
        };
        assert_eq!(args.team.as_deref(), Some("Bulls"));
        assert_eq!(args.team_id, None);
        assert!(args.latest);
    }

    #[test]
    fn teams_default_to_every_season() {
        let args = ["rugby-ingest", "standings", "teams", "--league", "4446"];
        let cli = Cli::try_parse_from(args).unwrap();
        let Commands::Standings(StandingsCommand::Teams(args)) = cli.command else {
            panic!("expected standings teams");
        };
        assert_eq!(args.season_label, None);
        assert!(!args.latest);
    }

    #[test]
    fn league_category_values() {
        let cli =
            Cli::try_parse_from(["rugby-ingest", "ingest", "leagues", "--only", "international"])
                .unwrap();
        let Commands::Ingest(IngestCommand::Leagues(args)) = cli.command else {
            panic!("expected ingest leagues");
        };
        assert_eq!(args.only, Some(LeagueCategory::International));
    }
}
