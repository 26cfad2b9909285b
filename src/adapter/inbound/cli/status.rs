//! Handler for the `status` command.

use serde_json::json;

use crate::adapter::inbound::cli::{output, wiring};
use crate::error::Result;
use crate::infrastructure::config::Config;
use crate::port::outbound::report::ReportReader;

/// Print row counts of every core table.
///
/// # Errors
/// Fails when the database is unreachable or the schema is missing.
pub fn execute(config: &Config) -> Result<()> {
    let reader = wiring::reader(config)?;
    let counts = reader.table_counts()?;

    if output::is_json() {
        output::result(
            "status",
            &json!({
                "database": config.database_url.to_string(),
                "data_dir": config.data_dir.display().to_string(),
                "tables": counts,
            }),
        );
        return Ok(());
    }
    if output::is_quiet() {
        return Ok(());
    }

    output::header(env!("CARGO_PKG_VERSION"));
    output::field("Database", &config.database_url);
    output::field("Data dir", config.data_dir.display());

    output::section("Tables");
    for count in &counts {
        let rows = if count.rows == 0 {
            output::muted(0)
        } else {
            count.rows.to_string()
        };
        output::field(count.table, rows);
    }
    if counts.iter().all(|c| c.rows == 0 || c.table == "sports") {
        output::hint("run `rugby-ingest ingest leagues` to load the league catalog");
    }
    Ok(())
}
