use clap::Parser;
use rugby_ingest::adapter::inbound::cli::command::Cli;
use rugby_ingest::adapter::inbound::cli::{dispatch, output};
use rugby_ingest::infrastructure::config::Config;
use tracing::error;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    output::configure(output::OutputConfig::new(cli.json, cli.quiet));

    let config = match &cli.env_file {
        Some(path) => Config::from_env_file(path),
        None => Config::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            output::error(&format!("Failed to load configuration: {e}"));
            std::process::exit(e.exit_code());
        }
    };

    config.logging.init(cli.verbose);

    if let Err(e) = dispatch(&cli, &config).await {
        error!(error = %e, "command failed");
        output::error(&e.to_string());
        std::process::exit(e.exit_code());
    }
}
