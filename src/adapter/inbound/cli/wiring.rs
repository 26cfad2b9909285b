//! Adapter construction for CLI handlers.

use crate::adapter::outbound::postgres::{get_connection, DbPool, PgIngestStore, PgReportReader};
use crate::adapter::outbound::tsdb::TsdbClient;
use crate::error::Result;
use crate::infrastructure::config::Config;
use crate::infrastructure::data_dir::DataDir;

use super::output;

/// Connect to the configured database behind a spinner.
///
/// # Errors
/// Returns [`Error::Connection`](crate::error::Error::Connection) when the
/// database is unreachable.
pub fn pool(config: &Config) -> Result<DbPool> {
    let pb = output::spinner(&format!("Connecting to {}", config.database_url));
    match get_connection(config) {
        Ok(pool) => {
            output::spinner_success(&pb, &format!("Connected to {}", config.database_url));
            Ok(pool)
        }
        Err(e) => {
            output::spinner_fail(&pb, "Database unreachable");
            Err(e)
        }
    }
}

/// # Errors
/// See [`pool`].
pub fn store(config: &Config) -> Result<PgIngestStore> {
    pool(config).map(PgIngestStore::new)
}

/// # Errors
/// See [`pool`].
pub fn reader(config: &Config) -> Result<PgReportReader> {
    pool(config).map(PgReportReader::new)
}

/// TheSportsDB client for the configured key and settings.
///
/// # Errors
/// Fails when the HTTP client cannot be built.
pub fn source(config: &Config) -> Result<TsdbClient> {
    TsdbClient::new(config.api_key.clone(), config.tsdb.clone())
}

#[must_use]
pub fn data_dir(config: &Config) -> DataDir {
    DataDir::new(&config.data_dir)
}
