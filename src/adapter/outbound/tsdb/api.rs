//! Typed TheSportsDB queries over any [`RecordSource`].

use futures_util::TryStreamExt;
use tracing::debug;

use super::dto::{decode, is_rugby, EventDto, LeagueDto, SeasonDto, TeamDto, VenueDto};
use crate::error::Result;
use crate::port::outbound::source::{Record, RecordSource, SourceQuery};

pub const LOOKUP_LEAGUE: &str = "lookupleague.php";
pub const ALL_SEASONS: &str = "search_all_seasons.php";
pub const SEASON_EVENTS: &str = "eventsseason.php";
pub const LOOKUP_TEAM: &str = "lookupteam.php";
pub const LOOKUP_VENUE: &str = "lookupvenue.php";

/// TheSportsDB operations used by the ingest commands.
pub struct TsdbApi<'a> {
    source: &'a dyn RecordSource,
}

impl<'a> TsdbApi<'a> {
    #[must_use]
    pub fn new(source: &'a dyn RecordSource) -> Self {
        Self { source }
    }

    async fn collect(&self, query: SourceQuery) -> Result<Vec<Record>> {
        self.source.records(query).try_collect().await
    }

    async fn first<T>(&self, query: SourceQuery) -> Result<Option<T>>
    where
        T: for<'de> serde::Deserialize<'de>,
    {
        match self.collect(query).await?.into_iter().next() {
            Some(record) => decode(record).map(Some),
            None => Ok(None),
        }
    }

    async fn all<T>(&self, query: SourceQuery) -> Result<Vec<T>>
    where
        T: for<'de> serde::Deserialize<'de>,
    {
        self.collect(query).await?.into_iter().map(decode).collect()
    }

    /// League metadata, or `None` when the id is unknown.
    pub async fn league(&self, league_id: &str) -> Result<Option<LeagueDto>> {
        self.first(SourceQuery::new(LOOKUP_LEAGUE, &["leagues"]).param("id", league_id))
            .await
    }

    /// The league's `strCurrentSeason`.
    pub async fn current_season(&self, league_id: &str) -> Result<Option<String>> {
        let season = self
            .league(league_id)
            .await?
            .and_then(|league| league.str_current_season);
        debug!(league_id, season = ?season, "Current season");
        Ok(season)
    }

    pub async fn seasons(&self, league_id: &str) -> Result<Vec<SeasonDto>> {
        self.all(SourceQuery::new(ALL_SEASONS, &["seasons"]).param("id", league_id))
            .await
    }

    /// Rugby events of one league season.
    pub async fn season_events(&self, league_id: &str, season: &str) -> Result<Vec<EventDto>> {
        let query = SourceQuery::new(SEASON_EVENTS, &["events"])
            .param("id", league_id)
            .param("s", season);
        let events: Vec<EventDto> = self.all(query).await?;
        let total = events.len();
        let rugby: Vec<EventDto> = events
            .into_iter()
            .filter(|e| is_rugby(e.str_sport.as_deref()))
            .collect();
        debug!(league_id, season, total, rugby = rugby.len(), "Season events");
        Ok(rugby)
    }

    pub async fn team(&self, team_id: &str) -> Result<Option<TeamDto>> {
        self.first(SourceQuery::new(LOOKUP_TEAM, &["teams", "team"]).param("id", team_id))
            .await
    }

    pub async fn venue(&self, venue_id: &str) -> Result<Option<VenueDto>> {
        self.first(SourceQuery::new(LOOKUP_VENUE, &["venues"]).param("id", venue_id))
            .await
    }
}
