//! In-memory [`IngestStore`] for testing.
//!
//! Mirrors the natural-key upsert semantics of the Postgres store so ingest
//! services can be exercised without a database.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard};

use crate::domain::standings::{MatchResult, TeamSeasonKey, TeamSeasonStats};
use crate::error::{Error, Result};
use crate::port::outbound::store::{
    IngestStore, LeagueRecord, MatchRecord, SeasonRecord, StoredLeague, StoredSeason, TeamRecord,
    UpsertCounts, Upserted, VenueRecord,
};

#[derive(Default)]
struct Tables {
    next_id: i64,
    sport_id: Option<i64>,
    leagues: Vec<(i64, LeagueRecord)>,
    seasons: Vec<(i64, SeasonRecord)>,
    teams: Vec<(i64, TeamRecord)>,
    venues: Vec<(i64, VenueRecord)>,
    matches: Vec<(i64, MatchRecord)>,
    links: BTreeSet<(i64, i64, i64)>,
    stats: BTreeMap<TeamSeasonKey, TeamSeasonStats>,
}

/// Upsert `row` into `rows` by `same`, returning the row id and outcome.
fn upsert<T: Clone>(
    rows: &mut Vec<(i64, T)>,
    next_id: &mut i64,
    row: &T,
    same: impl Fn(&T) -> bool,
) -> (i64, Upserted) {
    if let Some((id, existing)) = rows.iter_mut().find(|(_, r)| same(r)) {
        *existing = row.clone();
        return (*id, Upserted::Updated);
    }
    *next_id += 1;
    rows.push((*next_id, row.clone()));
    (*next_id, Upserted::Inserted)
}

pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// A store with the rugby sport row seeded, like a migrated database.
    #[must_use]
    pub fn new() -> Self {
        let tables = Tables {
            next_id: 1,
            sport_id: Some(1),
            ..Tables::default()
        };
        Self {
            tables: Mutex::new(tables),
        }
    }

    /// A store whose schema was never initialised.
    #[must_use]
    pub fn without_sport() -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
        }
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    #[must_use]
    pub fn leagues(&self) -> Vec<(i64, LeagueRecord)> {
        self.tables().leagues.clone()
    }

    #[must_use]
    pub fn season_rows(&self) -> Vec<(i64, SeasonRecord)> {
        self.tables().seasons.clone()
    }

    #[must_use]
    pub fn teams(&self) -> Vec<(i64, TeamRecord)> {
        self.tables().teams.clone()
    }

    #[must_use]
    pub fn venues(&self) -> Vec<(i64, VenueRecord)> {
        self.tables().venues.clone()
    }

    #[must_use]
    pub fn matches(&self) -> Vec<(i64, MatchRecord)> {
        self.tables().matches.clone()
    }

    #[must_use]
    pub fn links(&self) -> Vec<(i64, i64, i64)> {
        self.tables().links.iter().copied().collect()
    }

    #[must_use]
    pub fn stats(&self) -> Vec<TeamSeasonStats> {
        self.tables().stats.values().copied().collect()
    }
}

impl IngestStore for MemoryStore {
    fn rugby_sport_id(&self) -> Result<i64> {
        self.tables()
            .sport_id
            .ok_or_else(|| Error::NotFound("rugby sport row".into()))
    }

    fn upsert_league(&self, league: &LeagueRecord) -> Result<Upserted> {
        let mut guard = self.tables();
        let t = &mut *guard;
        let (_, outcome) = upsert(&mut t.leagues, &mut t.next_id, league, |r| {
            r.tsdb_league_id == league.tsdb_league_id
        });
        Ok(outcome)
    }

    fn rugby_leagues(&self, only_tsdb_league: Option<&str>) -> Result<Vec<StoredLeague>> {
        let t = self.tables();
        let mut leagues: Vec<StoredLeague> = t
            .leagues
            .iter()
            .filter(|(_, l)| Some(l.sport_id) == t.sport_id)
            .filter(|(_, l)| only_tsdb_league.map_or(true, |id| l.tsdb_league_id == id))
            .map(|(id, l)| StoredLeague {
                league_id: *id,
                name: l.name.clone(),
                slug: Some(l.slug.clone()),
                tsdb_league_id: l.tsdb_league_id.clone(),
            })
            .collect();
        leagues.sort_by_key(|l| l.league_id);
        Ok(leagues)
    }

    fn upsert_season(&self, season: &SeasonRecord) -> Result<Upserted> {
        let mut guard = self.tables();
        let t = &mut *guard;
        let (_, outcome) = upsert(&mut t.seasons, &mut t.next_id, season, |r| {
            r.league_id == season.league_id && r.year == season.year
        });
        Ok(outcome)
    }

    fn seasons(&self, league_id: i64, latest: Option<usize>) -> Result<Vec<StoredSeason>> {
        let t = self.tables();
        let mut seasons: Vec<StoredSeason> = t
            .seasons
            .iter()
            .filter(|(_, s)| s.league_id == league_id)
            .map(|(id, s)| StoredSeason {
                season_id: *id,
                league_id: s.league_id,
                year: s.year,
                label: Some(s.label.clone()),
                tsdb_season_key: Some(s.tsdb_season_key.clone()),
            })
            .collect();
        seasons.sort_by_key(|s| s.year);
        if let Some(n) = latest {
            let skip = seasons.len().saturating_sub(n);
            seasons.drain(..skip);
        }
        Ok(seasons)
    }

    fn upsert_team(&self, team: &TeamRecord) -> Result<(i64, Upserted)> {
        let mut guard = self.tables();
        let t = &mut *guard;
        let (id, outcome) = upsert(&mut t.teams, &mut t.next_id, team, |r| {
            r.tsdb_team_id == team.tsdb_team_id
        });
        Ok((id, outcome))
    }

    fn link_team_season(&self, league_id: i64, season_id: i64, team_id: i64) -> Result<()> {
        self.tables().links.insert((league_id, season_id, team_id));
        Ok(())
    }

    fn upsert_venue(&self, venue: &VenueRecord) -> Result<Upserted> {
        let mut guard = self.tables();
        let t = &mut *guard;
        let (_, outcome) = upsert(&mut t.venues, &mut t.next_id, venue, |r| {
            r.tsdb_venue_id == venue.tsdb_venue_id
        });
        Ok(outcome)
    }

    fn team_id(&self, tsdb_team_id: &str) -> Result<Option<i64>> {
        Ok(self
            .tables()
            .teams
            .iter()
            .find(|(_, r)| r.tsdb_team_id == tsdb_team_id)
            .map(|(id, _)| *id))
    }

    fn venue_id(&self, tsdb_venue_id: &str) -> Result<Option<i64>> {
        Ok(self
            .tables()
            .venues
            .iter()
            .find(|(_, r)| r.tsdb_venue_id == tsdb_venue_id)
            .map(|(id, _)| *id))
    }

    fn upsert_matches(&self, matches: &[MatchRecord]) -> Result<UpsertCounts> {
        let mut guard = self.tables();
        let t = &mut *guard;
        let mut counts = UpsertCounts::default();
        for m in matches {
            let (_, outcome) = upsert(&mut t.matches, &mut t.next_id, m, |r| {
                r.tsdb_event_id == m.tsdb_event_id
            });
            counts.record(outcome);
        }
        Ok(counts)
    }

    fn completed_results(
        &self,
        league_id: i64,
        season_id: Option<i64>,
    ) -> Result<Vec<MatchResult>> {
        Ok(self
            .tables()
            .matches
            .iter()
            .map(|(_, m)| m)
            .filter(|m| m.league_id == league_id)
            .filter(|m| season_id.map_or(true, |s| m.season_id == s))
            .filter_map(|m| {
                Some(MatchResult {
                    league_id: m.league_id,
                    season_id: m.season_id,
                    home_team_id: m.home_team_id,
                    away_team_id: m.away_team_id,
                    home_score: m.home_score?,
                    away_score: m.away_score?,
                })
            })
            .collect())
    }

    fn save_team_season_stats(&self, stats: &[TeamSeasonStats]) -> Result<usize> {
        let mut t = self.tables();
        for row in stats {
            t.stats.insert(row.key, *row);
        }
        Ok(stats.len())
    }
}
