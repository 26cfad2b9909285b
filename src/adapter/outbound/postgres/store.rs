//! Postgres ingest store implementation.
//!
//! Every write is `INSERT ... ON CONFLICT (natural key) DO UPDATE`, and
//! reports whether the row was created by reading `xmax = 0` back through
//! `RETURNING`.

use diesel::dsl::{now, sql};
use diesel::prelude::*;
use diesel::sql_types::Bool;
use diesel::upsert::excluded;
use tracing::debug;

use super::database::connection::{with_connection, DbPool};
use super::database::model::{
    LeagueRow, NewLeagueRow, NewMatchRow, NewSeasonRow, NewTeamRow, NewVenueRow, SeasonRow,
    TeamSeasonStatsRow,
};
use super::database::schema::{
    league_team_seasons, leagues, matches, seasons, sports, team_season_stats, teams, venues,
};
use crate::domain::standings::{MatchResult, TeamSeasonStats};
use crate::error::{Error, Result};
use crate::port::outbound::store::{
    IngestStore, LeagueRecord, MatchRecord, SeasonRecord, StoredLeague, StoredSeason, TeamRecord,
    UpsertCounts, Upserted, VenueRecord,
};

/// Code of the seeded rugby sport row.
pub const RUGBY_SPORT_CODE: &str = "rugby_union";

/// True on the row Postgres just inserted, false on a conflict update.
fn inserted() -> diesel::expression::SqlLiteral<Bool> {
    sql::<Bool>("(xmax = 0)")
}

const fn outcome(was_inserted: bool) -> Upserted {
    if was_inserted {
        Upserted::Inserted
    } else {
        Upserted::Updated
    }
}

/// Diesel-backed [`IngestStore`].
pub struct PgIngestStore {
    pool: DbPool,
}

impl PgIngestStore {
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    fn upsert_match(conn: &mut PgConnection, m: &MatchRecord) -> Result<Upserted> {
        let row = NewMatchRow::from(m);
        let was_inserted: bool = diesel::insert_into(matches::table)
            .values(&row)
            .on_conflict(matches::tsdb_event_id)
            .do_update()
            .set((
                matches::league_id.eq(excluded(matches::league_id)),
                matches::season_id.eq(excluded(matches::season_id)),
                matches::venue_id.eq(excluded(matches::venue_id)),
                matches::home_team_id.eq(excluded(matches::home_team_id)),
                matches::away_team_id.eq(excluded(matches::away_team_id)),
                matches::status.eq(excluded(matches::status)),
                matches::kickoff_utc.eq(excluded(matches::kickoff_utc)),
                matches::home_score.eq(excluded(matches::home_score)),
                matches::away_score.eq(excluded(matches::away_score)),
                matches::attendance.eq(excluded(matches::attendance)),
                matches::source.eq(excluded(matches::source)),
                matches::updated_at.eq(now),
            ))
            .returning(inserted())
            .get_result(conn)?;
        Ok(outcome(was_inserted))
    }
}

impl IngestStore for PgIngestStore {
    fn rugby_sport_id(&self) -> Result<i64> {
        with_connection(&self.pool, |conn| {
            sports::table
                .filter(
                    sports::code
                        .eq(RUGBY_SPORT_CODE)
                        .or(sports::name.ilike("rugby%")),
                )
                .order((sports::code.eq(RUGBY_SPORT_CODE).desc(), sports::sport_id))
                .select(sports::sport_id)
                .first::<i64>(conn)
                .optional()?
                .ok_or_else(|| {
                    Error::NotFound(format!(
                        "sport '{RUGBY_SPORT_CODE}' (run `rugby-ingest init-schema` first)"
                    ))
                })
        })
    }

    fn upsert_league(&self, league: &LeagueRecord) -> Result<Upserted> {
        with_connection(&self.pool, |conn| {
            let row = NewLeagueRow::from(league);
            let was_inserted: bool = diesel::insert_into(leagues::table)
                .values(&row)
                .on_conflict(leagues::tsdb_league_id)
                .do_update()
                .set((
                    leagues::name.eq(excluded(leagues::name)),
                    leagues::short_name.eq(excluded(leagues::short_name)),
                    leagues::slug.eq(excluded(leagues::slug)),
                    leagues::country_code.eq(excluded(leagues::country_code)),
                    leagues::sport_id.eq(excluded(leagues::sport_id)),
                    leagues::updated_at.eq(now),
                ))
                .returning(inserted())
                .get_result(conn)?;
            Ok(outcome(was_inserted))
        })
    }

    fn rugby_leagues(&self, only_tsdb_league: Option<&str>) -> Result<Vec<StoredLeague>> {
        let sport_id = self.rugby_sport_id()?;
        with_connection(&self.pool, |conn| {
            let mut query = leagues::table
                .filter(leagues::sport_id.eq(sport_id))
                .filter(leagues::tsdb_league_id.is_not_null())
                .into_boxed();
            if let Some(id) = only_tsdb_league {
                query = query.filter(leagues::tsdb_league_id.eq(id));
            }
            let rows: Vec<LeagueRow> = query
                .order(leagues::league_id)
                .select(LeagueRow::as_select())
                .load(conn)?;
            Ok(rows.into_iter().filter_map(LeagueRow::into_stored).collect())
        })
    }

    fn upsert_season(&self, season: &SeasonRecord) -> Result<Upserted> {
        with_connection(&self.pool, |conn| {
            let row = NewSeasonRow::from(season);
            let was_inserted: bool = diesel::insert_into(seasons::table)
                .values(&row)
                .on_conflict((seasons::league_id, seasons::year))
                .do_update()
                .set((
                    seasons::label.eq(excluded(seasons::label)),
                    seasons::tsdb_season_key.eq(excluded(seasons::tsdb_season_key)),
                    seasons::updated_at.eq(now),
                ))
                .returning(inserted())
                .get_result(conn)?;
            Ok(outcome(was_inserted))
        })
    }

    fn seasons(&self, league_id: i64, latest: Option<usize>) -> Result<Vec<StoredSeason>> {
        with_connection(&self.pool, |conn| {
            let base = seasons::table
                .filter(seasons::league_id.eq(league_id))
                .filter(seasons::tsdb_season_key.is_not_null())
                .select(SeasonRow::as_select());

            let mut rows: Vec<SeasonRow> = match latest {
                Some(n) => base
                    .order(seasons::year.desc())
                    .limit(i64::try_from(n).unwrap_or(i64::MAX))
                    .load(conn)?,
                None => base.order(seasons::year.asc()).load(conn)?,
            };
            rows.sort_by_key(|s| s.year);
            Ok(rows.into_iter().map(StoredSeason::from).collect())
        })
    }

    fn upsert_team(&self, team: &TeamRecord) -> Result<(i64, Upserted)> {
        with_connection(&self.pool, |conn| {
            let row = NewTeamRow::from(team);
            let (team_id, was_inserted): (i64, bool) = diesel::insert_into(teams::table)
                .values(&row)
                .on_conflict(teams::tsdb_team_id)
                .do_update()
                .set((
                    teams::name.eq(excluded(teams::name)),
                    teams::short_name.eq(excluded(teams::short_name)),
                    teams::slug.eq(excluded(teams::slug)),
                    teams::country.eq(excluded(teams::country)),
                    teams::sport.eq(excluded(teams::sport)),
                    teams::badge_url.eq(excluded(teams::badge_url)),
                    teams::updated_at.eq(now),
                ))
                .returning((teams::team_id, inserted()))
                .get_result(conn)?;
            Ok((team_id, outcome(was_inserted)))
        })
    }

    fn link_team_season(&self, league_id: i64, season_id: i64, team_id: i64) -> Result<()> {
        with_connection(&self.pool, |conn| {
            diesel::insert_into(league_team_seasons::table)
                .values((
                    league_team_seasons::league_id.eq(league_id),
                    league_team_seasons::season_id.eq(season_id),
                    league_team_seasons::team_id.eq(team_id),
                ))
                .on_conflict((
                    league_team_seasons::league_id,
                    league_team_seasons::season_id,
                    league_team_seasons::team_id,
                ))
                .do_update()
                .set(league_team_seasons::updated_at.eq(now))
                .execute(conn)?;
            Ok(())
        })
    }

    fn upsert_venue(&self, venue: &VenueRecord) -> Result<Upserted> {
        with_connection(&self.pool, |conn| {
            let row = NewVenueRow::from(venue);
            let was_inserted: bool = diesel::insert_into(venues::table)
                .values(&row)
                .on_conflict(venues::tsdb_venue_id)
                .do_update()
                .set((
                    venues::name.eq(excluded(venues::name)),
                    venues::city.eq(excluded(venues::city)),
                    venues::country.eq(excluded(venues::country)),
                    venues::latitude.eq(excluded(venues::latitude)),
                    venues::longitude.eq(excluded(venues::longitude)),
                    venues::updated_at.eq(now),
                ))
                .returning(inserted())
                .get_result(conn)?;
            Ok(outcome(was_inserted))
        })
    }

    fn team_id(&self, tsdb_team_id: &str) -> Result<Option<i64>> {
        with_connection(&self.pool, |conn| {
            Ok(teams::table
                .filter(teams::tsdb_team_id.eq(tsdb_team_id))
                .select(teams::team_id)
                .first::<i64>(conn)
                .optional()?)
        })
    }

    fn venue_id(&self, tsdb_venue_id: &str) -> Result<Option<i64>> {
        with_connection(&self.pool, |conn| {
            Ok(venues::table
                .filter(venues::tsdb_venue_id.eq(tsdb_venue_id))
                .select(venues::venue_id)
                .first::<i64>(conn)
                .optional()?)
        })
    }

    fn upsert_matches(&self, batch: &[MatchRecord]) -> Result<UpsertCounts> {
        with_connection(&self.pool, |conn| {
            conn.transaction::<_, Error, _>(|conn| {
                let mut counts = UpsertCounts::default();
                for m in batch {
                    counts.record(Self::upsert_match(conn, m)?);
                }
                debug!(
                    inserted = counts.inserted,
                    updated = counts.updated,
                    "Committed match batch"
                );
                Ok(counts)
            })
        })
    }

    fn completed_results(
        &self,
        league_id: i64,
        season_id: Option<i64>,
    ) -> Result<Vec<MatchResult>> {
        with_connection(&self.pool, |conn| {
            let mut query = matches::table
                .filter(matches::league_id.eq(league_id))
                .filter(matches::home_score.is_not_null())
                .filter(matches::away_score.is_not_null())
                .into_boxed();
            if let Some(season_id) = season_id {
                query = query.filter(matches::season_id.eq(season_id));
            }
            let rows: Vec<(i64, i64, i64, Option<i32>, Option<i32>)> = query
                .order(matches::match_id)
                .select((
                    matches::season_id,
                    matches::home_team_id,
                    matches::away_team_id,
                    matches::home_score,
                    matches::away_score,
                ))
                .load(conn)?;

            Ok(rows
                .into_iter()
                .filter_map(|(season_id, home, away, hs, as_)| {
                    Some(MatchResult {
                        league_id,
                        season_id,
                        home_team_id: home,
                        away_team_id: away,
                        home_score: hs?,
                        away_score: as_?,
                    })
                })
                .collect())
        })
    }

    fn save_team_season_stats(&self, stats: &[TeamSeasonStats]) -> Result<usize> {
        with_connection(&self.pool, |conn| {
            conn.transaction::<_, Error, _>(|conn| {
                let mut written = 0;
                for s in stats {
                    let row = TeamSeasonStatsRow::from(s);
                    written += diesel::insert_into(team_season_stats::table)
                        .values(&row)
                        .on_conflict((
                            team_season_stats::league_id,
                            team_season_stats::season_id,
                            team_season_stats::team_id,
                        ))
                        .do_update()
                        .set((
                            team_season_stats::games_played.eq(excluded(team_season_stats::games_played)),
                            team_season_stats::wins.eq(excluded(team_season_stats::wins)),
                            team_season_stats::draws.eq(excluded(team_season_stats::draws)),
                            team_season_stats::losses.eq(excluded(team_season_stats::losses)),
                            team_season_stats::points_for.eq(excluded(team_season_stats::points_for)),
                            team_season_stats::points_against
                                .eq(excluded(team_season_stats::points_against)),
                            team_season_stats::points_diff.eq(excluded(team_season_stats::points_diff)),
                            team_season_stats::competition_points
                                .eq(excluded(team_season_stats::competition_points)),
                            team_season_stats::losing_bonus_points
                                .eq(excluded(team_season_stats::losing_bonus_points)),
                            team_season_stats::try_bonus_points
                                .eq(excluded(team_season_stats::try_bonus_points)),
                            team_season_stats::updated_at.eq(now),
                        ))
                        .execute(conn)?;
                }
                Ok(written)
            })
        })
    }
}
