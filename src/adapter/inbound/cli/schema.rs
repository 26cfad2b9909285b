//! Handler for the `init-schema` command.

use serde_json::json;

use crate::adapter::inbound::cli::{output, wiring};
use crate::adapter::outbound::postgres::run_migrations;
use crate::error::Result;
use crate::infrastructure::config::Config;

/// Apply pending embedded migrations.
///
/// # Errors
/// Fails when the database is unreachable or a migration fails.
pub fn execute(config: &Config) -> Result<()> {
    let pool = wiring::pool(config)?;
    let applied = run_migrations(&pool)?;

    if output::is_json() {
        output::result("init-schema", &json!({ "applied": applied }));
        return Ok(());
    }
    if applied == 0 {
        output::success("Schema is up to date");
    } else {
        output::success(&format!("Applied {applied} migration(s)"));
    }
    Ok(())
}
