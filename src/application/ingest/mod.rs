//! Ingest services.
//!
//! Each service is the unit of work behind one `ingest` or `standings`
//! subcommand. Services reach the outside world only through ports, so the
//! same code runs against TheSportsDB and Postgres in production and against
//! a scripted source and an in-memory store in tests.
//!
//! ```text
//! leagues ──► seasons ──► teams ──► venues ──► matches ──► standings
//!   │            │          │          │          │            │
//!   └────────────┴──── TsdbApi (RecordSource) ────┘            │
//!   └────────────┴──────────── IngestStore ───────────────────┘
//! ```
//!
//! Commands are independent; later ones read what earlier ones stored.

pub mod leagues;
pub mod matches;
pub mod seasons;
pub mod standings;
pub mod teams;
pub mod venues;

use tracing::{info, warn};

use crate::adapter::outbound::tsdb::dto::EventDto;
use crate::adapter::outbound::tsdb::TsdbApi;
use crate::domain::naming::slugify;
use crate::error::{Error, Result};
use crate::infrastructure::data_dir::DataDir;
use crate::port::outbound::source::RecordSource;
use crate::port::outbound::store::{IngestStore, StoredLeague, StoredSeason};

pub use leagues::{LeaguesOptions, LeaguesReport};
pub use matches::{MatchesOptions, MatchesReport, SeasonRetry};
pub use seasons::{SeasonsOptions, SeasonsReport};
pub use standings::{compute_standings, StandingsOptions, StandingsReport};
pub use teams::{TeamsOptions, TeamsReport};
pub use venues::{VenuesOptions, VenuesReport};

/// Shared handles for the ingest services.
pub struct Ingest<'a> {
    api: TsdbApi<'a>,
    store: &'a dyn IngestStore,
    data_dir: &'a DataDir,
}

impl<'a> Ingest<'a> {
    #[must_use]
    pub fn new(
        source: &'a dyn RecordSource,
        store: &'a dyn IngestStore,
        data_dir: &'a DataDir,
    ) -> Self {
        Self {
            api: TsdbApi::new(source),
            store,
            data_dir,
        }
    }
}

/// One league season's events, with the stored rows they belong to when
/// those exist.
pub(crate) struct SeasonEvents {
    pub season: String,
    pub slug: String,
    pub league: Option<StoredLeague>,
    pub stored_season: Option<StoredSeason>,
    pub events: Vec<EventDto>,
}

impl Ingest<'_> {
    /// Fetch the rugby events of `season`, or of the league's current season
    /// when none is given.
    pub(crate) async fn season_events(
        &self,
        tsdb_league_id: &str,
        season: Option<&str>,
    ) -> Result<SeasonEvents> {
        let season = match season {
            Some(label) => label.to_string(),
            None => self
                .api
                .current_season(tsdb_league_id)
                .await?
                .ok_or_else(|| {
                    Error::NotFound(format!("current season of league {tsdb_league_id}"))
                })?,
        };

        let league = self.store.rugby_leagues(Some(tsdb_league_id))?.into_iter().next();
        let stored_season = match &league {
            Some(l) => self
                .store
                .seasons(l.league_id, None)?
                .into_iter()
                .find(|s| {
                    s.upstream_key() == Some(season.as_str())
                        || s.label.as_deref() == Some(season.as_str())
                }),
            None => None,
        };
        if stored_season.is_none() {
            warn!(
                tsdb_league_id,
                season = %season,
                "League season not stored, rows will not be linked to it"
            );
        }

        let slug = league
            .as_ref()
            .and_then(|l| l.slug.clone())
            .unwrap_or_else(|| slugify(&format!("league {tsdb_league_id}"), "league"));

        let events = self.api.season_events(tsdb_league_id, &season).await?;
        info!(tsdb_league_id, season = %season, events = events.len(), "Fetched season events");

        Ok(SeasonEvents {
            season,
            slug,
            league,
            stored_season,
            events,
        })
    }
}
