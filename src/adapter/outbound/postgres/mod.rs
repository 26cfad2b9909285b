//! Postgres persistence adapters.
//!
//! Provides the Diesel-backed ingest store, read-side reports, and the
//! connection helpers shared by every command.

pub mod database;
pub mod report;
pub mod store;

pub use database::connection::{
    create_pool, execute, fetch_rows, get_connection, run_migrations, with_connection, DbPool,
    SqlParam,
};
pub use report::PgReportReader;
pub use store::PgIngestStore;
