//! Rugby Ingest - TheSportsDB to Postgres ingestion for rugby analytics.
//!
//! Pulls the curated rugby league catalog, seasons, teams, venues and matches
//! from TheSportsDB, upserts them idempotently into a Postgres schema, and
//! derives league tables from completed matches.
//!
//! # Architecture
//!
//! - [`domain`] - Source-agnostic rules: catalog, status and kickoff mapping,
//!   slugs, standings aggregation
//! - [`port`] - Traits the services depend on (`RecordSource`, `IngestStore`,
//!   `ReportReader`)
//! - [`application`] - One ingest service per command
//! - [`adapter`] - TheSportsDB client, Diesel/Postgres store, and the CLI
//! - [`infrastructure`] - Configuration, logging, and the data directory
//! - [`error`] - Error types for the crate
//!
//! # Features
//!
//! - `testkit` - Scripted source, in-memory store and fixtures for tests
//! - `integration-tests` - Tests that need a live Postgres (`TEST_DATABASE_URL`)
//!
//! # Example
//!
//! ```no_run
//! use rugby_ingest::adapter::outbound::postgres::{get_connection, PgIngestStore};
//! use rugby_ingest::adapter::outbound::tsdb::TsdbClient;
//! use rugby_ingest::application::ingest::{Ingest, LeaguesOptions};
//! use rugby_ingest::infrastructure::config::Config;
//! use rugby_ingest::infrastructure::data_dir::DataDir;
//!
//! # async fn run() -> rugby_ingest::error::Result<()> {
//! let config = Config::load()?;
//! let store = PgIngestStore::new(get_connection(&config)?);
//! let source = TsdbClient::new(config.api_key.clone(), config.tsdb.clone())?;
//! let data_dir = DataDir::new(&config.data_dir);
//!
//! let report = Ingest::new(&source, &store, &data_dir)
//!     .leagues(&LeaguesOptions::default())
//!     .await?;
//! println!("{} leagues inserted", report.counts.inserted);
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
