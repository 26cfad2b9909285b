//! Store and report adapters against a live Postgres.
//!
//! Run with `TEST_DATABASE_URL=postgres://... cargo test --features integration-tests`.
//! Every test works under its own upstream id prefix and removes its rows.

#![cfg(feature = "integration-tests")]

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use rugby_ingest::adapter::outbound::postgres::{
    create_pool, execute, run_migrations, with_connection, DbPool, PgIngestStore, PgReportReader,
};
use rugby_ingest::application::ingest::{
    compute_standings, Ingest, MatchesOptions, SeasonRetry, SeasonsOptions, StandingsOptions,
    TeamsOptions,
};
use rugby_ingest::domain::fixture::{Outcome, Side};
use rugby_ingest::domain::naming::slugify;
use rugby_ingest::error::Error;
use rugby_ingest::infrastructure::config::DatabaseUrl;
use rugby_ingest::infrastructure::data_dir::DataDir;
use rugby_ingest::port::outbound::report::{ReportReader, SeasonSelector, TeamSelector};
use rugby_ingest::port::outbound::store::{IngestStore, LeagueRecord, Upserted};
use rugby_ingest::testkit::fixtures;
use rugby_ingest::testkit::source::ScriptedSource;
use serde_json::json;
use tempfile::TempDir;

const SEASON: &str = "2023-2024";

fn pool() -> DbPool {
    let url = std::env::var("TEST_DATABASE_URL").expect("TEST_DATABASE_URL is set");
    let url = DatabaseUrl::parse("TEST_DATABASE_URL", &url).expect("valid TEST_DATABASE_URL");
    let pool = create_pool(&url).expect("connect to test database");
    run_migrations(&pool).expect("apply migrations");
    pool
}

/// Upstream ids of one test run, removed again on drop.
struct Fixture {
    pool: DbPool,
    prefix: String,
}

impl Fixture {
    fn new(name: &str) -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        Self {
            pool: pool(),
            prefix: format!("it-{name}-{nanos}-"),
        }
    }

    fn id(&self, local: &str) -> String {
        format!("{}{local}", self.prefix)
    }

    fn store(&self) -> PgIngestStore {
        PgIngestStore::new(self.pool.clone())
    }

    fn league(&self, store: &PgIngestStore) -> String {
        let tsdb_league_id = self.id("league");
        store
            .upsert_league(&LeagueRecord {
                tsdb_league_id: tsdb_league_id.clone(),
                name: format!("Test League {}", self.prefix),
                short_name: None,
                slug: slugify(&self.prefix, "league"),
                country_code: Some("IE".into()),
                sport_id: store.rugby_sport_id().unwrap(),
            })
            .unwrap();
        tsdb_league_id
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        let pattern = format!("{}%", self.prefix);
        let _ = with_connection(&self.pool, |conn| {
            for statement in [
                "DELETE FROM leagues WHERE tsdb_league_id LIKE $1",
                "DELETE FROM teams WHERE tsdb_team_id LIKE $1",
                "DELETE FROM venues WHERE tsdb_venue_id LIKE $1",
            ] {
                execute(conn, statement, &[pattern.as_str().into()])?;
            }
            Ok(())
        });
    }
}

#[test]
fn sport_row_is_seeded() {
    let fixture = Fixture::new("sport");
    assert!(fixture.store().rugby_sport_id().unwrap() > 0);
}

#[test]
fn league_upsert_reports_insert_then_update() {
    let fixture = Fixture::new("league");
    let store = fixture.store();
    let sport_id = store.rugby_sport_id().unwrap();
    let mut record = LeagueRecord {
        tsdb_league_id: fixture.id("league"),
        name: "Original".into(),
        short_name: None,
        slug: "original".into(),
        country_code: None,
        sport_id,
    };

    assert_eq!(store.upsert_league(&record).unwrap(), Upserted::Inserted);
    record.name = "Renamed".into();
    assert_eq!(store.upsert_league(&record).unwrap(), Upserted::Updated);

    let stored = store.rugby_leagues(Some(&record.tsdb_league_id)).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].name, "Renamed");
}

#[test]
fn statements_bind_values_instead_of_interpolating() {
    let fixture = Fixture::new("bind");
    let hostile = fixture.id("x'); DROP TABLE leagues; --");
    let deleted = with_connection(&fixture.pool, |conn| {
        let statement = "DELETE FROM leagues WHERE tsdb_league_id = $1";
        execute(conn, statement, &[hostile.as_str().into()])
    })
    .unwrap();
    assert_eq!(deleted, 0);
    assert!(fixture.store().rugby_sport_id().is_ok());
}

#[test]
fn bad_statement_is_a_query_error() {
    let fixture = Fixture::new("bad-sql");
    let result = with_connection(&fixture.pool, |conn| execute(conn, "SELEC nothing", &[]));
    assert!(matches!(result, Err(Error::Query(_))));
}

#[tokio::test]
async fn pipeline_persists_and_reports_a_table() {
    let fixture = Fixture::new("pipeline");
    let store = fixture.store();
    let league = fixture.league(&store);
    let (home, away) = (fixture.id("10"), fixture.id("11"));
    let (league, home, away) = (league.as_str(), home.as_str(), away.as_str());
    let (e1, e2) = (fixture.id("e1"), fixture.id("e2"));

    let source = ScriptedSource::new()
        .with_response(
            "search_all_seasons.php",
            &[("id", league)],
            json!({"seasons": [fixtures::season("2022-2023"), fixtures::season(SEASON)]}),
        )
        .with_response(
            "eventsseason.php",
            &[("id", league), ("s", SEASON)],
            fixtures::body(
                "events",
                vec![
                    fixtures::event(&e1, (home, "Leinster"), (away, "Munster"), Some((24, 17)), None),
                    fixtures::event(&e2, (away, "Munster"), (home, "Leinster"), Some((10, 30)), None),
                ],
            ),
        )
        .with_response(
            "lookupteam.php",
            &[("id", home)],
            fixtures::body("teams", vec![fixtures::team(home, "Leinster", "Ireland")]),
        )
        .with_response(
            "lookupteam.php",
            &[("id", away)],
            fixtures::body("teams", vec![fixtures::team(away, "Munster", "Ireland")]),
        );

    let dir = TempDir::new().unwrap();
    let data_dir = DataDir::new(dir.path());
    let ingest = Ingest::new(&source, &store, &data_dir);

    let seasons = ingest
        .seasons(&SeasonsOptions {
            only_tsdb_league: Some(league.into()),
            write_csv: false,
        })
        .await
        .unwrap();
    assert_eq!(seasons.counts.inserted, 2);

    let teams = ingest
        .teams(&TeamsOptions {
            tsdb_league_id: league.into(),
            season: Some(SEASON.into()),
            write_csv: false,
        })
        .await
        .unwrap();
    assert_eq!(teams.linked, 2);

    let options = MatchesOptions {
        only_tsdb_league: Some(league.into()),
        limit_seasons_back: Some(1),
        retry: SeasonRetry {
            max_retries: 1,
            base_sleep: Duration::ZERO,
        },
        write_csv: false,
    };
    let first = ingest.matches(&options).await.unwrap();
    assert_eq!(first.counts.inserted, 2);
    let second = ingest.matches(&options).await.unwrap();
    assert_eq!(second.counts.updated, 2);
    assert_eq!(second.counts.inserted, 0);

    let standings = compute_standings(
        &store,
        &StandingsOptions {
            only_tsdb_league: Some(league.into()),
            season_label: Some(SEASON.into()),
        },
    )
    .unwrap();
    assert_eq!(standings.rows, 2);

    let reader = PgReportReader::new(fixture.pool.clone());
    let table = reader
        .league_table(league, &SeasonSelector::Label(SEASON.into()))
        .unwrap();
    let latest = reader.league_table(league, &SeasonSelector::Latest).unwrap();
    assert_eq!(table, latest);
    assert_eq!(table.season, SEASON);
    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.rows[0].team, "Leinster");
    assert_eq!(table.rows[0].competition_points, 8);
    assert_eq!(table.rows[0].points_diff, 27);
    assert_eq!(table.rows[1].team, "Munster");
    assert_eq!(table.rows[1].competition_points, 1);

    let counts = reader.table_counts().unwrap();
    assert_eq!(counts.len(), 8);
    assert!(counts.iter().all(|c| c.rows >= 0));
}

#[tokio::test]
async fn teams_and_fixtures_read_back_stored_matches() {
    let fixture = Fixture::new("fixtures");
    let store = fixture.store();
    let league = fixture.league(&store);
    let (home, away) = (fixture.id("10"), fixture.id("11"));
    let (league, home, away) = (league.as_str(), home.as_str(), away.as_str());
    let (e1, e2) = (fixture.id("e1"), fixture.id("e2"));

    let source = ScriptedSource::new()
        .with_response(
            "search_all_seasons.php",
            &[("id", league)],
            json!({"seasons": [fixtures::season("2022-2023"), fixtures::season(SEASON)]}),
        )
        .with_response(
            "eventsseason.php",
            &[("id", league), ("s", SEASON)],
            fixtures::body(
                "events",
                vec![
                    fixtures::event(&e1, (home, "Leinster"), (away, "Munster"), Some((24, 17)), None),
                    fixtures::event(&e2, (away, "Munster"), (home, "Leinster"), None, None),
                ],
            ),
        )
        .with_response(
            "lookupteam.php",
            &[("id", home)],
            fixtures::body("teams", vec![fixtures::team(home, "Leinster", "Ireland")]),
        )
        .with_response(
            "lookupteam.php",
            &[("id", away)],
            fixtures::body("teams", vec![fixtures::team(away, "Munster", "Ireland")]),
        );

    let dir = TempDir::new().unwrap();
    let data_dir = DataDir::new(dir.path());
    let ingest = Ingest::new(&source, &store, &data_dir);
    ingest
        .seasons(&SeasonsOptions {
            only_tsdb_league: Some(league.into()),
            write_csv: false,
        })
        .await
        .unwrap();
    ingest
        .teams(&TeamsOptions {
            tsdb_league_id: league.into(),
            season: Some(SEASON.into()),
            write_csv: false,
        })
        .await
        .unwrap();
    ingest
        .matches(&MatchesOptions {
            only_tsdb_league: Some(league.into()),
            limit_seasons_back: Some(1),
            retry: SeasonRetry {
                max_retries: 1,
                base_sleep: Duration::ZERO,
            },
            write_csv: false,
        })
        .await
        .unwrap();

    let reader = PgReportReader::new(fixture.pool.clone());

    let all = reader.league_teams(league, None).unwrap();
    assert_eq!(all.season, None);
    let names: Vec<&str> = all.teams.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, ["Leinster", "Munster"]);
    assert!(all.teams.iter().all(|t| t.season == SEASON));
    assert_eq!(all.teams[0].tsdb_team_id.as_deref(), Some(home));

    let latest = reader
        .league_teams(league, Some(&SeasonSelector::Latest))
        .unwrap();
    assert_eq!(latest.season.as_deref(), Some(SEASON));
    assert_eq!(latest.teams, all.teams);

    let leinster = reader
        .team_fixtures(
            league,
            &SeasonSelector::Label(SEASON.into()),
            &TeamSelector::Id(all.teams[0].team_id),
        )
        .unwrap();
    assert_eq!(leinster.team, "Leinster");
    assert_eq!(leinster.season, SEASON);
    let rows: Vec<_> = leinster
        .fixtures
        .iter()
        .map(|f| (f.side, f.opponent.as_str(), f.scored, f.conceded, f.outcome))
        .collect();
    assert_eq!(
        rows,
        [
            (Side::Home, "Munster", Some(24), Some(17), Outcome::Win),
            (Side::Away, "Munster", None, None, Outcome::Pending),
        ]
    );
    assert!(leinster.fixtures.iter().all(|f| f.kickoff_utc.is_some()));

    let munster = reader
        .team_fixtures(league, &SeasonSelector::Latest, &TeamSelector::Name("munst".into()))
        .unwrap();
    assert_eq!(munster.team, "Munster");

    let nobody = TeamSelector::Name(fixture.id("nobody"));
    let missing = reader.team_fixtures(league, &SeasonSelector::Latest, &nobody);
    assert!(matches!(missing, Err(Error::NotFound(_))));
}

#[test]
fn unknown_league_table_is_not_found() {
    let fixture = Fixture::new("missing");
    let reader = PgReportReader::new(fixture.pool.clone());
    let result = reader.league_table(&fixture.id("nope"), &SeasonSelector::Latest);
    assert!(matches!(result, Err(Error::NotFound(_))));
}
