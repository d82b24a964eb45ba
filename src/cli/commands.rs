//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;

use crate::cli::UpstreamArgs;
use crate::config::Config;
use crate::error::Result;
use crate::server::HttpServer;
use crate::service::MusicSession;
use crate::suno::SunoClient;
use crate::tempo::{self, PaceRequest};

fn build_session(config: &Config) -> Result<Arc<MusicSession>> {
    let client = SunoClient::from_config(config)?;
    info!(base_url = client.base_url(), "using music API");
    Ok(Arc::new(MusicSession::new(
        Arc::new(client),
        config.poll.clone(),
    )))
}

/// Run the HTTP server until Ctrl-C.
pub async fn serve(bind: Option<SocketAddr>, upstream: &UpstreamArgs) -> Result<()> {
    let mut config = upstream.apply(Config::from_env()?);
    if let Some(addr) = bind {
        config = config.with_bind(addr);
    }

    let session = build_session(&config)?;
    let server = HttpServer::bind(config.bind, session)?;
    let shutdown = server.shutdown_handle();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown requested");
            shutdown.shutdown();
        }
    });

    server.run().await
}

/// Generate a single clip and print the result.
pub async fn generate(pace: PaceRequest, upstream: &UpstreamArgs) -> Result<()> {
    let config = upstream.apply(Config::from_env()?);
    let session = build_session(&config)?;

    info!(
        user_bpm = pace.user_bpm,
        goal_bpm = pace.goal_bpm,
        max_wait_secs = config.poll.max_wait().as_secs(),
        "generating clip"
    );

    let clip = session.generate_music(pace).await?;
    println!("{}", serde_json::to_string_pretty(&clip)?);

    Ok(())
}

/// Print the result of one tempo adjustment.
pub fn adjust(current: i32, pace: PaceRequest) -> Result<()> {
    let diff = pace.goal_bpm.saturating_sub(pace.user_bpm);
    let step = tempo::adjustment_for(diff);
    let next = tempo::adjust(current, pace.user_bpm, pace.goal_bpm);

    println!("Pace difference: {:+}", diff);
    println!("Adjustment:      {:+}", step);
    println!("Tempo:           {} -> {} BPM", current, next);

    Ok(())
}
