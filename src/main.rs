//! Cadence CLI - Walking-pace music service
//!
//! Command-line entry point: runs the HTTP server or one-off commands.

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cadence::cli::{commands, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    info!("Cadence v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Some(Commands::Serve { bind, upstream }) => commands::serve(bind, &upstream).await?,
        Some(Commands::Generate { pace, upstream }) => {
            commands::generate(pace.into(), &upstream).await?
        }
        Some(Commands::Adjust { current, pace }) => commands::adjust(current, pace.into())?,
        None => {
            println!("Cadence v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for available commands");
        }
    }

    Ok(())
}
