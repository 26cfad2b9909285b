//! Team ingest for one league season.
//!
//! Team ids are discovered from the season's events, then each team is
//! looked up and upserted by `tsdb_team_id`. When the league season is
//! stored, teams are also linked to it in `league_team_seasons`.

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::Ingest;
use crate::adapter::outbound::tsdb::dto::{EventDto, TeamDto};
use crate::domain::catalog::URC_LEAGUE_ID;
use crate::domain::naming::slugify;
use crate::error::Result;
use crate::infrastructure::data_dir::opt;
use crate::port::outbound::store::{TeamRecord, UpsertCounts};

const TEAMS_COLUMNS: &[&str] = &["tsdb_team_id", "name", "short_name", "country", "badge_url"];

#[derive(Debug, Clone)]
pub struct TeamsOptions {
    pub tsdb_league_id: String,
    /// Season label; the league's current season when unset.
    pub season: Option<String>,
    pub write_csv: bool,
}

impl Default for TeamsOptions {
    fn default() -> Self {
        Self {
            tsdb_league_id: URC_LEAGUE_ID.to_string(),
            season: None,
            write_csv: false,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamsReport {
    pub season: String,
    pub events: usize,
    pub counts: UpsertCounts,
    pub linked: usize,
    pub csv: Option<PathBuf>,
}

impl Ingest<'_> {
    /// Upsert the teams playing in a league season.
    ///
    /// # Errors
    /// Fails when no season is given and the league has no current season, or
    /// on upstream and database errors.
    pub async fn teams(&self, options: &TeamsOptions) -> Result<TeamsReport> {
        let season = self
            .season_events(&options.tsdb_league_id, options.season.as_deref())
            .await?;
        let team_ids = team_ids(&season.events);
        debug!(teams = team_ids.len(), "Discovered team ids");

        let link_to = season
            .league
            .as_ref()
            .zip(season.stored_season.as_ref())
            .map(|(l, s)| (l.league_id, s.season_id));

        let mut counts = UpsertCounts::default();
        let mut linked = 0;
        let mut rows = Vec::new();

        for tsdb_team_id in team_ids {
            let Some(record) = self
                .api
                .team(&tsdb_team_id)
                .await?
                .and_then(|dto| team_record(&tsdb_team_id, &dto))
            else {
                warn!(tsdb_team_id = %tsdb_team_id, "No team data, skipping");
                counts.skip();
                continue;
            };

            let (team_id, outcome) = self.store.upsert_team(&record)?;
            counts.record(outcome);
            if let Some((league_id, season_id)) = link_to {
                self.store.link_team_season(league_id, season_id, team_id)?;
                linked += 1;
            }
            rows.push(vec![
                record.tsdb_team_id,
                record.name,
                opt(record.short_name),
                opt(record.country),
                opt(record.badge_url),
            ]);
        }

        let csv = if options.write_csv {
            let file_name = format!("teams_{}_{}.csv", season.slug, season.season);
            Some(self.data_dir.write_csv(&file_name, TEAMS_COLUMNS, rows)?)
        } else {
            None
        };

        info!(
            season = %season.season,
            inserted = counts.inserted,
            updated = counts.updated,
            skipped = counts.skipped,
            linked,
            "Teams ingested"
        );
        Ok(TeamsReport {
            season: season.season,
            events: season.events.len(),
            counts,
            linked,
            csv,
        })
    }
}

/// Distinct home and away team ids, sorted.
fn team_ids(events: &[EventDto]) -> BTreeSet<String> {
    events
        .iter()
        .flat_map(|e| [e.id_home_team.clone(), e.id_away_team.clone()])
        .flatten()
        .collect()
}

/// Stored team row; `None` when the upstream record has no name.
fn team_record(tsdb_team_id: &str, team: &TeamDto) -> Option<TeamRecord> {
    let name = team.str_team.clone()?;
    Some(TeamRecord {
        tsdb_team_id: tsdb_team_id.to_string(),
        short_name: team.short_name().map(str::to_string),
        slug: slugify(&name, "team"),
        country: team.str_country.clone(),
        sport: team.str_sport.clone(),
        badge_url: team.badge_url().map(str::to_string),
        name,
    })
}
