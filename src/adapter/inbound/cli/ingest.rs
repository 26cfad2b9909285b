//! Handlers for the `ingest` subcommands.

use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;

use crate::adapter::inbound::cli::command::IngestCommand;
use crate::adapter::inbound::cli::{output, wiring};
use crate::application::ingest::{
    Ingest, LeaguesOptions, MatchesOptions, SeasonRetry, SeasonsOptions, TeamsOptions,
    VenuesOptions,
};
use crate::error::{ConfigError, Result};
use crate::infrastructure::config::Config;
use crate::port::outbound::store::UpsertCounts;

/// Execute an `ingest` subcommand.
///
/// # Errors
/// Fails on invalid arguments, an unreachable database, or any upstream or
/// database error the service does not absorb.
pub async fn execute(command: &IngestCommand, config: &Config) -> Result<()> {
    let retry = match command {
        IngestCommand::Matches(args) => {
            Some(season_retry(args.season_max_retries, args.season_base_sleep)?)
        }
        _ => None,
    };

    let store = wiring::store(config)?;
    let source = wiring::source(config)?;
    let data_dir = wiring::data_dir(config);
    let ingest = Ingest::new(&source, &store, &data_dir);

    match command {
        IngestCommand::Leagues(args) => {
            let pb = output::spinner("Ingesting league catalog");
            let options = LeaguesOptions {
                only: args.only,
                write_csv: args.csv.write_csv,
            };
            let report = finish(&pb, ingest.leagues(&options).await)?;
            summarize("ingest.leagues", &report, &report.counts, report.csv.iter());
        }
        IngestCommand::Seasons(args) => {
            let pb = output::spinner("Ingesting seasons");
            let options = SeasonsOptions {
                only_tsdb_league: args.only_tsdb_league.clone(),
                write_csv: args.csv.write_csv,
            };
            let report = finish(&pb, ingest.seasons(&options).await)?;
            summarize("ingest.seasons", &report, &report.counts, report.csv.iter());
        }
        IngestCommand::Teams(args) => {
            let pb = output::spinner(&format!("Ingesting teams of league {}", args.league));
            let options = TeamsOptions {
                tsdb_league_id: args.league.clone(),
                season: args.season.clone(),
                write_csv: args.csv.write_csv,
            };
            let report = finish(&pb, ingest.teams(&options).await)?;
            if !output::is_json() {
                output::field("Season", &report.season);
                output::field("Linked", report.linked);
            }
            summarize("ingest.teams", &report, &report.counts, report.csv.iter());
        }
        IngestCommand::Venues(args) => {
            let pb = output::spinner(&format!("Ingesting venues of league {}", args.league));
            let options = VenuesOptions {
                tsdb_league_id: args.league.clone(),
                season: args.season.clone(),
                write_csv: args.csv.write_csv,
            };
            let report = finish(&pb, ingest.venues(&options).await)?;
            if !output::is_json() {
                output::field("Season", &report.season);
            }
            summarize("ingest.venues", &report, &report.counts, report.csv.iter());
        }
        IngestCommand::Matches(args) => {
            let pb = output::spinner("Ingesting matches");
            let options = MatchesOptions {
                only_tsdb_league: args.only_tsdb_league.clone(),
                limit_seasons_back: args.limit_seasons_back,
                retry: retry.unwrap_or_default(),
                write_csv: args.csv.write_csv,
            };
            let report = finish(&pb, ingest.matches(&options).await)?;
            if !output::is_json() {
                output::field("Leagues", report.leagues);
                output::field("Seasons", report.seasons);
            }
            summarize("ingest.matches", &report, &report.counts, report.csv.iter());
        }
    }
    Ok(())
}

fn season_retry(max_retries: u32, base_sleep_secs: f64) -> Result<SeasonRetry> {
    let base_sleep = Duration::try_from_secs_f64(base_sleep_secs.max(0.0)).map_err(|e| {
        ConfigError::InvalidConfiguration {
            key: "--season-base-sleep",
            reason: e.to_string(),
        }
    })?;
    Ok(SeasonRetry {
        max_retries: max_retries.max(1),
        base_sleep,
    })
}

fn finish<T>(pb: &indicatif::ProgressBar, outcome: Result<T>) -> Result<T> {
    match &outcome {
        Ok(_) => output::spinner_success(pb, "Done"),
        Err(_) => output::spinner_fail(pb, "Failed"),
    }
    outcome
}

fn summarize<'a, T: Serialize>(
    command: &str,
    report: &T,
    counts: &UpsertCounts,
    csv: impl IntoIterator<Item = &'a PathBuf>,
) {
    if output::is_json() {
        output::result(command, report);
    } else {
        output::upsert_counts(counts, csv);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn season_retry_clamps_inputs() {
        let retry = season_retry(0, -1.0).unwrap();
        assert_eq!(retry.max_retries, 1);
        assert_eq!(retry.base_sleep, Duration::ZERO);

        let retry = season_retry(5, 2.5).unwrap();
        assert_eq!(retry.base_sleep, Duration::from_millis(2500));
    }

    #[test]
    fn non_finite_sleep_is_rejected() {
        assert!(season_retry(5, f64::INFINITY).is_err());
    }
}
