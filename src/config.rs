//! Runtime configuration
//!
//! Values come from the environment first; CLI flags override them.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use crate::error::{CadenceError, Result};
use crate::poll::PollPolicy;
use crate::suno::{DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT};

/// Bearer token for the music API
pub const TOKEN_VAR: &str = "SUNO_API_TOKEN";
/// Override for the music API base URL
pub const BASE_URL_VAR: &str = "SUNO_API_URL";
/// Per-call timeout for the music API, in milliseconds
pub const TIMEOUT_VAR: &str = "SUNO_API_TIMEOUT_MS";
/// Listen address for the HTTP server
pub const BIND_VAR: &str = "CADENCE_BIND";
/// Number of status polls before giving up
pub const POLL_ATTEMPTS_VAR: &str = "CADENCE_POLL_ATTEMPTS";
/// Delay before each status poll, in milliseconds
pub const POLL_INTERVAL_VAR: &str = "CADENCE_POLL_INTERVAL_MS";

const DEFAULT_BIND: &str = "127.0.0.1:8000";

#[derive(Clone)]
pub struct Config {
    pub api_token: String,
    pub base_url: String,
    pub request_timeout: Duration,
    pub bind: SocketAddr,
    pub poll: PollPolicy,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_token", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("request_timeout", &self.request_timeout)
            .field("bind", &self.bind)
            .field("poll", &self.poll)
            .finish()
    }
}

impl Config {
    /// Load configuration from process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    ///
    /// A missing token is not fatal: the server still answers `/`, and the
    /// music API's rejection is passed through on `/generate-music`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_token = lookup(TOKEN_VAR)
            .map(|t| t.trim().to_string())
            .unwrap_or_default();
        if api_token.is_empty() {
            tracing::warn!("{} is not set; music generation requests will be rejected", TOKEN_VAR);
        }

        let base_url = lookup(BASE_URL_VAR).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let request_timeout = match lookup(TIMEOUT_VAR) {
            Some(raw) => Duration::from_millis(parse_number(TIMEOUT_VAR, &raw)?),
            None => DEFAULT_REQUEST_TIMEOUT,
        };

        let bind = parse_bind(&lookup(BIND_VAR).unwrap_or_else(|| DEFAULT_BIND.to_string()))?;

        let mut poll = PollPolicy::default();
        if let Some(raw) = lookup(POLL_ATTEMPTS_VAR) {
            poll.attempts = parse_number(POLL_ATTEMPTS_VAR, &raw)?;
        }
        if let Some(raw) = lookup(POLL_INTERVAL_VAR) {
            poll.interval = Duration::from_millis(parse_number(POLL_INTERVAL_VAR, &raw)?);
        }

        Ok(Self {
            api_token,
            base_url,
            request_timeout,
            bind,
            poll,
        })
    }

    pub fn with_bind(mut self, bind: SocketAddr) -> Self {
        self.bind = bind;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_poll(mut self, poll: PollPolicy) -> Self {
        self.poll = poll;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn has_token(&self) -> bool {
        !self.api_token.is_empty()
    }
}

fn parse_bind(raw: &str) -> Result<SocketAddr> {
    raw.parse().map_err(|_| CadenceError::Config {
        reason: format!("{} must be host:port, got '{}'", BIND_VAR, raw),
    })
}

fn parse_number<T: std::str::FromStr>(var: &str, raw: &str) -> Result<T> {
    raw.trim().parse().map_err(|_| CadenceError::Config {
        reason: format!("{} must be a non-negative integer, got '{}'", var, raw),
    })
}
