//! League catalog ingest.
//!
//! Walks the curated catalog, looks each league up upstream, and upserts it
//! by `tsdb_league_id`. Catalog ids with no upstream data are skipped.

use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::Ingest;
use crate::adapter::outbound::tsdb::dto::LeagueDto;
use crate::domain::catalog::{self, CatalogLeague, LeagueCategory};
use crate::domain::naming::{country_iso2, slugify};
use crate::error::Result;
use crate::port::outbound::store::{LeagueRecord, UpsertCounts};

pub const CATALOG_CSV: &str = "rugby_leagues_catalog.csv";

const CATALOG_COLUMNS: &[&str] = &[
    "category",
    "tsdb_league_id",
    "strLeague",
    "strLeagueAlternate",
    "strCountry",
    "strSport",
    "strCurrentSeason",
];

#[derive(Debug, Clone, Default)]
pub struct LeaguesOptions {
    /// Restrict the run to one catalog category.
    pub only: Option<LeagueCategory>,
    pub write_csv: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct LeaguesReport {
    /// Catalog entries considered.
    pub catalog: usize,
    pub counts: UpsertCounts,
    pub csv: Option<PathBuf>,
}

impl Ingest<'_> {
    /// Upsert the league catalog.
    ///
    /// # Errors
    /// Fails when the rugby sport row is missing, or on upstream and database
    /// errors.
    pub async fn leagues(&self, options: &LeaguesOptions) -> Result<LeaguesReport> {
        let sport_id = self.store.rugby_sport_id()?;
        let mut counts = UpsertCounts::default();
        let mut rows = Vec::new();
        let mut considered = 0;

        for entry in catalog::leagues(options.only) {
            considered += 1;
            let Some(league) = self.api.league(entry.tsdb_league_id).await? else {
                warn!(
                    tsdb_league_id = entry.tsdb_league_id,
                    label = entry.label,
                    "No upstream data for league, skipping"
                );
                counts.skip();
                continue;
            };

            let record = league_record(entry, &league, sport_id);
            let outcome = self.store.upsert_league(&record)?;
            debug!(
                tsdb_league_id = %record.tsdb_league_id,
                name = %record.name,
                outcome = ?outcome,
                "League upserted"
            );
            counts.record(outcome);
            rows.push(catalog_row(entry, &league, &record));
        }

        let csv = if options.write_csv {
            Some(self.data_dir.write_csv(CATALOG_CSV, CATALOG_COLUMNS, rows)?)
        } else {
            None
        };

        info!(
            inserted = counts.inserted,
            updated = counts.updated,
            skipped = counts.skipped,
            "League catalog ingested"
        );
        Ok(LeaguesReport {
            catalog: considered,
            counts,
            csv,
        })
    }
}

/// Derive the stored league row. The upstream name wins over the catalog label.
fn league_record(entry: &CatalogLeague, league: &LeagueDto, sport_id: i64) -> LeagueRecord {
    let name = league
        .str_league
        .clone()
        .unwrap_or_else(|| entry.label.to_string());
    let short_name = league
        .first_alternate()
        .map_or_else(|| name.clone(), str::to_string);

    LeagueRecord {
        tsdb_league_id: entry.tsdb_league_id.to_string(),
        slug: slugify(&name, "league"),
        short_name: Some(short_name),
        country_code: country_iso2(league.str_country.as_deref()).map(str::to_string),
        name,
        sport_id,
    }
}

fn catalog_row(entry: &CatalogLeague, league: &LeagueDto, record: &LeagueRecord) -> Vec<String> {
    let field = |v: &Option<String>| v.clone().unwrap_or_default();
    vec![
        entry.category.to_string(),
        record.tsdb_league_id.clone(),
        record.name.clone(),
        field(&league.str_league_alternate),
        field(&league.str_country),
        field(&league.str_sport),
        field(&league.str_current_season),
    ]
}
