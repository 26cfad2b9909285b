//! Command-line adapter: argument parsing, output and per-command handlers.

pub mod command;
pub mod ingest;
pub mod output;
pub mod schema;
pub mod standings;
pub mod status;
pub mod wiring;

use crate::error::Result;
use crate::infrastructure::config::Config;

use command::{Cli, Commands, StandingsCommand};

/// Run the parsed command to completion.
///
/// # Errors
/// Propagates the handler's error; the caller maps it to an exit code.
pub async fn dispatch(cli: &Cli, config: &Config) -> Result<()> {
    match &cli.command {
        Commands::InitSchema => schema::execute(config),
        Commands::Ingest(command) => ingest::execute(command, config).await,
        Commands::Standings(StandingsCommand::Compute(args)) => standings::compute(args, config),
        Commands::Standings(StandingsCommand::Show(args)) => standings::show(args, config),
        Commands::Standings(StandingsCommand::Teams(args)) => standings::teams(args, config),
        Commands::Standings(StandingsCommand::Fixtures(args)) => standings::fixtures(args, config),
        Commands::Status => status::execute(config),
    }
}
