//! Standings computation from stored match results.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::domain::standings::aggregate;
use crate::error::{Error, Result};
use crate::port::outbound::store::IngestStore;

#[derive(Debug, Clone, Default)]
pub struct StandingsOptions {
    pub only_tsdb_league: Option<String>,
    /// Restrict to the season with this label (or upstream key).
    pub season_label: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct StandingsReport {
    pub leagues: usize,
    /// Completed matches aggregated.
    pub matches: usize,
    /// `team_season_stats` rows written.
    pub rows: usize,
}

/// Recompute `team_season_stats` for stored leagues from completed matches.
///
/// Rows are upserted by team season, so repeated runs converge.
///
/// # Errors
/// Fails when no league matches, or on database errors.
pub fn compute_standings(
    store: &dyn IngestStore,
    options: &StandingsOptions,
) -> Result<StandingsReport> {
    let leagues = store.rugby_leagues(options.only_tsdb_league.as_deref())?;
    if leagues.is_empty() {
        return Err(Error::NotFound("rugby leagues with a tsdb_league_id".into()));
    }

    let mut report = StandingsReport {
        leagues: leagues.len(),
        ..StandingsReport::default()
    };

    for league in &leagues {
        let season_id = match options.season_label.as_deref() {
            None => None,
            Some(label) => {
                let season = store.seasons(league.league_id, None)?.into_iter().find(|s| {
                    s.label.as_deref() == Some(label) || s.tsdb_season_key.as_deref() == Some(label)
                });
                match season {
                    Some(s) => Some(s.season_id),
                    None => {
                        warn!(
                            tsdb_league_id = %league.tsdb_league_id,
                            season = label,
                            "Season not stored, skipping league"
                        );
                        continue;
                    }
                }
            }
        };

        let results = store.completed_results(league.league_id, season_id)?;
        let stats = aggregate(&results);
        let written = store.save_team_season_stats(&stats)?;
        debug!(
            tsdb_league_id = %league.tsdb_league_id,
            matches = results.len(),
            rows = written,
            "League standings computed"
        );
        report.matches += results.len();
        report.rows += written;
    }

    info!(
        leagues = report.leagues,
        matches = report.matches,
        rows = report.rows,
        "Standings computed"
    );
    Ok(report)
}
