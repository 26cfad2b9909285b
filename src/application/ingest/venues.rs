//! Venue ingest for one league season.

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::Serialize;
use tracing::{info, warn};

use super::Ingest;
use crate::adapter::outbound::tsdb::dto::VenueDto;
use crate::domain::catalog::URC_LEAGUE_ID;
use crate::error::Result;
use crate::infrastructure::data_dir::opt;
use crate::port::outbound::store::{UpsertCounts, VenueRecord};

const VENUES_COLUMNS: &[&str] = &[
    "tsdb_venue_id",
    "name",
    "city",
    "country",
    "latitude",
    "longitude",
];

#[derive(Debug, Clone)]
pub struct VenuesOptions {
    pub tsdb_league_id: String,
    /// Season label; the league's current season when unset.
    pub season: Option<String>,
    pub write_csv: bool,
}

impl Default for VenuesOptions {
    fn default() -> Self {
        Self {
            tsdb_league_id: URC_LEAGUE_ID.to_string(),
            season: None,
            write_csv: false,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VenuesReport {
    pub season: String,
    pub events: usize,
    pub counts: UpsertCounts,
    pub csv: Option<PathBuf>,
}

impl Ingest<'_> {
    /// Upsert the venues used by a league season, keyed by `tsdb_venue_id`.
    ///
    /// # Errors
    /// Fails when no season is given and the league has no current season, or
    /// on upstream and database errors.
    pub async fn venues(&self, options: &VenuesOptions) -> Result<VenuesReport> {
        let season = self
            .season_events(&options.tsdb_league_id, options.season.as_deref())
            .await?;
        let venue_ids: BTreeSet<String> = season
            .events
            .iter()
            .filter_map(|e| e.id_venue.clone())
            .collect();

        let mut counts = UpsertCounts::default();
        let mut rows = Vec::new();

        for tsdb_venue_id in venue_ids {
            let Some(venue) = self.api.venue(&tsdb_venue_id).await? else {
                warn!(tsdb_venue_id = %tsdb_venue_id, "No venue data, skipping");
                counts.skip();
                continue;
            };

            let record = venue_record(&tsdb_venue_id, &venue);
            counts.record(self.store.upsert_venue(&record)?);
            rows.push(vec![
                record.tsdb_venue_id,
                opt(record.name),
                opt(record.city),
                opt(record.country),
                opt(record.latitude),
                opt(record.longitude),
            ]);
        }

        let csv = if options.write_csv {
            let file_name = format!("venues_{}_{}.csv", season.slug, season.season);
            Some(self.data_dir.write_csv(&file_name, VENUES_COLUMNS, rows)?)
        } else {
            None
        };

        info!(
            season = %season.season,
            inserted = counts.inserted,
            updated = counts.updated,
            skipped = counts.skipped,
            "Venues ingested"
        );
        Ok(VenuesReport {
            season: season.season,
            events: season.events.len(),
            counts,
            csv,
        })
    }
}

fn venue_record(tsdb_venue_id: &str, venue: &VenueDto) -> VenueRecord {
    VenueRecord {
        tsdb_venue_id: tsdb_venue_id.to_string(),
        name: venue.str_venue.clone(),
        city: venue.city().map(str::to_string),
        country: venue.str_country.clone(),
        latitude: venue.latitude(),
        longitude: venue.longitude(),
    }
}
