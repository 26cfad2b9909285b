//! Season catalog ingest.

use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::Ingest;
use crate::domain::naming::season_year;
use crate::error::{Error, Result};
use crate::port::outbound::store::{SeasonRecord, StoredLeague, UpsertCounts};

pub const SEASONS_CSV: &str = "rugby_seasons_catalog.csv";

const SEASONS_COLUMNS: &[&str] =
    &["league_id", "tsdb_league_id", "league_name", "strSeason", "year"];

#[derive(Debug, Clone, Default)]
pub struct SeasonsOptions {
    pub only_tsdb_league: Option<String>,
    pub write_csv: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeasonsReport {
    pub leagues: usize,
    pub counts: UpsertCounts,
    pub csv: Option<PathBuf>,
}

impl Ingest<'_> {
    /// Load stored rugby leagues, failing when there are none to work on.
    pub(super) fn stored_leagues(
        &self,
        only_tsdb_league: Option<&str>,
    ) -> Result<Vec<StoredLeague>> {
        let leagues = self.store.rugby_leagues(only_tsdb_league)?;
        if leagues.is_empty() {
            return Err(Error::NotFound(match only_tsdb_league {
                Some(id) => format!("rugby league with tsdb_league_id {id}"),
                None => "rugby leagues with a tsdb_league_id; run `ingest leagues` first".into(),
            }));
        }
        Ok(leagues)
    }

    /// Upsert every upstream season of each stored league, keyed by
    /// `(league_id, year)`. Labels without a leading year are skipped.
    ///
    /// # Errors
    /// Fails when no league matches, or on upstream and database errors.
    pub async fn seasons(&self, options: &SeasonsOptions) -> Result<SeasonsReport> {
        let leagues = self.stored_leagues(options.only_tsdb_league.as_deref())?;
        let mut counts = UpsertCounts::default();
        let mut rows = Vec::new();

        for league in &leagues {
            let seasons = self.api.seasons(&league.tsdb_league_id).await?;
            if seasons.is_empty() {
                warn!(tsdb_league_id = %league.tsdb_league_id, "No seasons returned");
                continue;
            }

            for label in seasons.into_iter().filter_map(|s| s.str_season) {
                let Some(year) = season_year(&label) else {
                    debug!(season = %label, "Could not parse year from season label, skipping");
                    counts.skip();
                    continue;
                };

                counts.record(self.store.upsert_season(&SeasonRecord {
                    league_id: league.league_id,
                    year,
                    label: label.clone(),
                    tsdb_season_key: label.clone(),
                })?);
                rows.push(vec![
                    league.league_id.to_string(),
                    league.tsdb_league_id.clone(),
                    league.name.clone(),
                    label,
                    year.to_string(),
                ]);
            }
        }

        let csv = if options.write_csv {
            Some(self.data_dir.write_csv(SEASONS_CSV, SEASONS_COLUMNS, rows)?)
        } else {
            None
        };

        info!(
            leagues = leagues.len(),
            inserted = counts.inserted,
            updated = counts.updated,
            skipped = counts.skipped,
            "Seasons ingested"
        );
        Ok(SeasonsReport {
            leagues: leagues.len(),
            counts,
            csv,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::data_dir::DataDir;
    use crate::port::outbound::store::{IngestStore, LeagueRecord};
    use crate::testkit::fixtures;
    use crate::testkit::source::ScriptedSource;
    use crate::testkit::store::MemoryStore;

    fn store_with_urc() -> MemoryStore {
        let store = MemoryStore::new();
        store
            .upsert_league(&LeagueRecord {
                tsdb_league_id: "4446".into(),
                name: "United Rugby Championship".into(),
                short_name: Some("URC".into()),
                slug: "united-rugby-championship".into(),
                country_code: None,
                sport_id: 1,
            })
            .unwrap();
        store
    }

    #[tokio::test]
    async fn upserts_seasons_by_year_and_skips_bad_labels() {
        let tmp = tempfile::tempdir().unwrap();
        let data_dir = DataDir::new(tmp.path());
        let source = ScriptedSource::new().with_response(
            "search_all_seasons.php",
            &[("id", "4446")],
            fixtures::body(
                "seasons",
                vec![
                    fixtures::season("2022-2023"),
                    fixtures::season("2023-2024"),
                    fixtures::season("Friendlies"),
                ],
            ),
        );
        let store = store_with_urc();
        let ingest = Ingest::new(&source, &store, &data_dir);
        let options = SeasonsOptions {
            only_tsdb_league: None,
            write_csv: true,
        };

        let report = ingest.seasons(&options).await.unwrap();
        assert_eq!(report.leagues, 1);
        assert_eq!(report.counts.inserted, 2);
        assert_eq!(report.counts.skipped, 1);

        let rows = store.season_rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].1.year, 2023);
        assert_eq!(rows[1].1.tsdb_season_key, "2023-2024");

        let csv = std::fs::read_to_string(report.csv.unwrap()).unwrap();
        assert!(csv.contains("4446,United Rugby Championship,2023-2024,2023"));

        let again = ingest.seasons(&options).await.unwrap();
        assert_eq!(again.counts.updated, 2);
        assert_eq!(store.season_rows().len(), 2);
    }

    #[tokio::test]
    async fn no_stored_leagues_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let data_dir = DataDir::new(tmp.path());
        let source = ScriptedSource::new();
        let store = MemoryStore::new();
        let ingest = Ingest::new(&source, &store, &data_dir);

        let err = ingest.seasons(&SeasonsOptions::default()).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));

        let store = store_with_urc();
        let ingest = Ingest::new(&source, &store, &data_dir);
        let err = ingest
            .seasons(&SeasonsOptions {
                only_tsdb_league: Some("9999".into()),
                write_csv: false,
            })
            .await
            .unwrap_err();
        assert!(err.to_string().contains("9999"));
    }
}
