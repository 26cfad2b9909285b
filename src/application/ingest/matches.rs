//! Match ingest across stored leagues and seasons.
//!
//! For every rugby league with a TSDB id and every stored season of it
//! (oldest first), the season's events are fetched and upserted by
//! `tsdb_event_id`. Teams and venues are resolved against rows written by the
//! `teams` and `venues` commands; events whose teams are unknown are skipped.
//!
//! # Season-level retry
//!
//! The client already retries single requests. When a season fetch still ends
//! in a retryable upstream error the whole season is retried, sleeping
//! `base * 2^(attempt-1)` between attempts. Any other error aborts the run;
//! seasons committed before it stay committed.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::Ingest;
use crate::adapter::outbound::tsdb::dto::EventDto;
use crate::domain::kickoff::parse_kickoff;
use crate::domain::match_status::MatchStatus;
use crate::domain::naming::{non_empty, parse_int, slugify};
use crate::error::Result;
use crate::port::outbound::store::{
    IngestStore, MatchRecord, StoredLeague, UpsertCounts, MATCH_SOURCE,
};

const MATCHES_COLUMNS: &[&str] = &[
    "idEvent",
    "strSport",
    "idLeague",
    "strLeague",
    "strSeason",
    "dateEvent",
    "strTime",
    "strTimestamp",
    "kickoff_utc",
    "status_raw",
    "status",
    "idHomeTeam",
    "strHomeTeam",
    "idAwayTeam",
    "strAwayTeam",
    "idVenue",
    "strVenue",
    "intAttendance",
    "intHomeScore",
    "intAwayScore",
    "intRound",
    "strFilename",
    "data_source",
];

/// Season-level retry settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeasonRetry {
    /// Attempts per season, at least one.
    pub max_retries: u32,
    pub base_sleep: Duration,
}

impl Default for SeasonRetry {
    fn default() -> Self {
        Self {
            max_retries: 5,
            base_sleep: Duration::from_secs(5),
        }
    }
}

impl SeasonRetry {
    /// Sleep after failed attempt `attempt` (1-based): `base * 2^(attempt-1)`.
    #[must_use]
    pub fn delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_sleep.saturating_mul(factor)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MatchesOptions {
    pub only_tsdb_league: Option<String>,
    /// Only the latest N seasons of each league.
    pub limit_seasons_back: Option<usize>,
    pub retry: SeasonRetry,
    pub write_csv: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchesReport {
    pub leagues: usize,
    pub seasons: usize,
    pub counts: UpsertCounts,
    pub csv: Vec<PathBuf>,
}

/// Upstream id to row id, remembered per league including misses.
struct IdCache {
    teams: HashMap<String, Option<i64>>,
    venues: HashMap<String, Option<i64>>,
}

impl IdCache {
    fn new() -> Self {
        Self {
            teams: HashMap::new(),
            venues: HashMap::new(),
        }
    }

    fn team(&mut self, store: &dyn IngestStore, tsdb_team_id: Option<&str>) -> Result<Option<i64>> {
        let Some(id) = non_empty(tsdb_team_id) else {
            return Ok(None);
        };
        if let Some(hit) = self.teams.get(id) {
            return Ok(*hit);
        }
        let row = store.team_id(id)?;
        self.teams.insert(id.to_string(), row);
        Ok(row)
    }

    fn venue(
        &mut self,
        store: &dyn IngestStore,
        tsdb_venue_id: Option<&str>,
    ) -> Result<Option<i64>> {
        let Some(id) = non_empty(tsdb_venue_id) else {
            return Ok(None);
        };
        if let Some(hit) = self.venues.get(id) {
            return Ok(*hit);
        }
        let row = store.venue_id(id)?;
        self.venues.insert(id.to_string(), row);
        Ok(row)
    }
}

impl Ingest<'_> {
    /// Upsert matches for every stored rugby league season.
    ///
    /// # Errors
    /// Fails when no league matches, when a season fetch exhausts its retries
    /// or fails with a non-retryable error, or on database errors.
    pub async fn matches(&self, options: &MatchesOptions) -> Result<MatchesReport> {
        let leagues = self.stored_leagues(options.only_tsdb_league.as_deref())?;
        let mut report = MatchesReport {
            leagues: leagues.len(),
            seasons: 0,
            counts: UpsertCounts::default(),
            csv: Vec::new(),
        };

        for league in &leagues {
            self.league_matches(league, options, &mut report).await?;
        }

        info!(
            leagues = report.leagues,
            seasons = report.seasons,
            inserted = report.counts.inserted,
            updated = report.counts.updated,
            skipped = report.counts.skipped,
            "Matches ingested"
        );
        Ok(report)
    }

    async fn league_matches(
        &self,
        league: &StoredLeague,
        options: &MatchesOptions,
        report: &mut MatchesReport,
    ) -> Result<()> {
        let seasons = self.store.seasons(league.league_id, options.limit_seasons_back)?;
        if seasons.is_empty() {
            warn!(tsdb_league_id = %league.tsdb_league_id, "No stored seasons, skipping league");
            return Ok(());
        }

        let slug = league
            .slug
            .clone()
            .unwrap_or_else(|| slugify(&league.name, "league"));
        let mut cache = IdCache::new();

        for season in &seasons {
            let Some(key) = season.upstream_key() else {
                continue;
            };
            let events = self
                .season_events_with_retry(&league.tsdb_league_id, key, options.retry)
                .await?;
            report.seasons += 1;
            if events.is_empty() {
                debug!(tsdb_league_id = %league.tsdb_league_id, season = key, "No rugby events");
                continue;
            }

            if options.write_csv {
                let file_name = format!("matches_{slug}_{key}.csv");
                let rows = events.iter().map(csv_row);
                report
                    .csv
                    .push(self.data_dir.write_csv(&file_name, MATCHES_COLUMNS, rows)?);
            }

            let mut records = Vec::with_capacity(events.len());
            let mut skipped = 0;
            for event in &events {
                match self.match_record(event, league.league_id, season.season_id, &mut cache)? {
                    Some(record) => records.push(record),
                    None => skipped += 1,
                }
            }

            let mut counts = self.store.upsert_matches(&records)?;
            counts.skipped += skipped;
            debug!(
                tsdb_league_id = %league.tsdb_league_id,
                season = key,
                inserted = counts.inserted,
                updated = counts.updated,
                skipped = counts.skipped,
                "Season committed"
            );
            report.counts.merge(counts);
        }
        Ok(())
    }

    async fn season_events_with_retry(
        &self,
        tsdb_league_id: &str,
        season: &str,
        retry: SeasonRetry,
    ) -> Result<Vec<EventDto>> {
        let attempts = retry.max_retries.max(1);
        let mut attempt = 1;
        loop {
            match self.api.season_events(tsdb_league_id, season).await {
                Ok(events) => return Ok(events),
                Err(err) if err.is_retryable() && attempt < attempts => {
                    let delay = retry.delay(attempt);
                    warn!(
                        tsdb_league_id,
                        season,
                        attempt,
                        attempts,
                        delay_secs = delay.as_secs_f64(),
                        error = %err,
                        "Season fetch failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Map one event, or `None` when it has no id or an unresolved team.
    fn match_record(
        &self,
        event: &EventDto,
        league_id: i64,
        season_id: i64,
        cache: &mut IdCache,
    ) -> Result<Option<MatchRecord>> {
        let Some(tsdb_event_id) = non_empty(event.id_event.as_deref()) else {
            debug!("Event without idEvent, skipping");
            return Ok(None);
        };

        let home = cache.team(self.store, event.id_home_team.as_deref())?;
        let away = cache.team(self.store, event.id_away_team.as_deref())?;
        let (Some(home_team_id), Some(away_team_id)) = (home, away) else {
            debug!(
                tsdb_event_id,
                home = ?event.id_home_team,
                away = ?event.id_away_team,
                "Unresolved team, skipping event"
            );
            return Ok(None);
        };

        Ok(Some(MatchRecord {
            tsdb_event_id: tsdb_event_id.to_string(),
            league_id,
            season_id,
            venue_id: cache.venue(self.store, event.id_venue.as_deref())?,
            home_team_id,
            away_team_id,
            status: MatchStatus::from_raw(event.raw_status()),
            kickoff_utc: kickoff(event),
            home_score: parse_int(event.int_home_score.as_deref()),
            away_score: parse_int(event.int_away_score.as_deref()),
            attendance: parse_int(event.attendance()),
        }))
    }
}

fn kickoff(event: &EventDto) -> Option<chrono::DateTime<chrono::Utc>> {
    parse_kickoff(
        event.str_timestamp.as_deref(),
        event.date_event.as_deref(),
        event.str_time.as_deref(),
    )
}

fn csv_row(event: &EventDto) -> Vec<String> {
    let f = |v: &Option<String>| v.clone().unwrap_or_default();
    vec![
        f(&event.id_event),
        f(&event.str_sport),
        f(&event.id_league),
        f(&event.str_league),
        f(&event.str_season),
        f(&event.date_event),
        f(&event.str_time),
        f(&event.str_timestamp),
        kickoff(event).map(|k| k.to_rfc3339()).unwrap_or_default(),
        event.raw_status().unwrap_or_default().to_string(),
        MatchStatus::from_raw(event.raw_status()).to_string(),
        f(&event.id_home_team),
        f(&event.str_home_team),
        f(&event.id_away_team),
        f(&event.str_away_team),
        f(&event.id_venue),
        f(&event.str_venue),
        f(&event.int_attendance),
        f(&event.int_home_score),
        f(&event.int_away_score),
        f(&event.int_round),
        f(&event.str_filename),
        MATCH_SOURCE.to_string(),
    ]
}
