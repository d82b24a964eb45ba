//! CLI Module
//!
//! Command-line interface for the Cadence music service.

pub mod commands;

use std::net::SocketAddr;

use clap::{Args, Parser, Subcommand};

use crate::config::Config;
use crate::tempo::{PaceRequest, INITIAL_PROMPT_BPM};

/// Cadence - music that keeps pace with your walk
#[derive(Parser, Debug)]
#[command(name = "cadence")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server
    #[command(name = "serve")]
    Serve {
        /// Address to listen on (overrides CADENCE_BIND)
        #[arg(short, long)]
        bind: Option<SocketAddr>,

        #[command(flatten)]
        upstream: UpstreamArgs,
    },

    /// Generate one clip and print it as JSON
    #[command(name = "generate")]
    Generate {
        #[command(flatten)]
        pace: PaceArgs,

        #[command(flatten)]
        upstream: UpstreamArgs,
    },

    /// Show the tempo a single adjustment step would produce
    #[command(name = "adjust")]
    Adjust {
        /// Current prompt tempo
        #[arg(short, long, default_value_t = INITIAL_PROMPT_BPM, allow_negative_numbers = true)]
        current: i32,

        #[command(flatten)]
        pace: PaceArgs,
    },
}

/// Measured and target walking pace
#[derive(Args, Debug, Clone, Copy)]
pub struct PaceArgs {
    /// Measured walking pace in steps per minute
    #[arg(short, long, default_value_t = 70, allow_negative_numbers = true)]
    pub user_bpm: i32,

    /// Target walking pace in steps per minute
    #[arg(short, long, default_value_t = 100, allow_negative_numbers = true)]
    pub goal_bpm: i32,
}

impl From<PaceArgs> for PaceRequest {
    fn from(args: PaceArgs) -> Self {
        PaceRequest {
            user_bpm: args.user_bpm,
            goal_bpm: args.goal_bpm,
        }
    }
}

/// Overrides for the music API connection
#[derive(Args, Debug, Clone, Default)]
pub struct UpstreamArgs {
    /// Music API base URL (overrides SUNO_API_URL)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Per-call timeout for the music API in ms (overrides SUNO_API_TIMEOUT_MS)
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Status polls before giving up (overrides CADENCE_POLL_ATTEMPTS)
    #[arg(long)]
    pub poll_attempts: Option<u32>,

    /// Delay before each poll in ms (overrides CADENCE_POLL_INTERVAL_MS)
    #[arg(long)]
    pub poll_interval_ms: Option<u64>,
}

impl UpstreamArgs {
    /// Apply these overrides on top of environment configuration
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(url) = &self.base_url {
            config = config.with_base_url(url.clone());
        }
        if let Some(ms) = self.timeout_ms {
            config = config.with_request_timeout(std::time::Duration::from_millis(ms));
        }
        if let Some(attempts) = self.poll_attempts {
            config.poll.attempts = attempts;
        }
        if let Some(ms) = self.poll_interval_ms {
            config.poll.interval = std::time::Duration::from_millis(ms);
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_adjust_defaults() {
        let cli = Cli::parse_from(["cadence", "adjust"]);
        match cli.command {
            Some(Commands::Adjust { current, pace }) => {
                assert_eq!(current, 90);
                assert_eq!(PaceRequest::from(pace), PaceRequest::default());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_serve_overrides() {
        let cli = Cli::parse_from([
            "cadence",
            "-v",
            "serve",
            "--bind",
            "0.0.0.0:9000",
            "--poll-attempts",
            "4",
            "--timeout-ms",
            "2500",
        ]);
        assert!(cli.verbose);
        match cli.command {
            Some(Commands::Serve { bind, upstream }) => {
                assert_eq!(bind.map(|b| b.port()), Some(9000));
                assert_eq!(upstream.poll_attempts, Some(4));
                assert_eq!(upstream.timeout_ms, Some(2500));
                assert!(upstream.base_url.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_upstream_args_override_config() {
        let config = Config::from_lookup(|key| match key {
            crate::config::TOKEN_VAR => Some("token".to_string()),
            _ => None,
        })
        .unwrap();

        let args = UpstreamArgs {
            base_url: Some("http://localhost:1234".to_string()),
            timeout_ms: Some(750),
            poll_attempts: None,
            poll_interval_ms: Some(0),
        };
        let config = args.apply(config);

        assert_eq!(config.base_url, "http://localhost:1234");
        assert_eq!(config.request_timeout.as_millis(), 750);
        assert_eq!(config.poll.attempts, 10);
        assert!(config.poll.interval.is_zero());
    }
}
