//! Suno HTTP client
//!
//! Talks to the hackathon generation API: one endpoint to start a clip and
//! one to read clip status. Both use bearer-token auth.

use crate::config::Config;
use crate::error::{CadenceError, Result};
use crate::suno::model::{Clip, ClipLookup, GenerateRequest, GenerateResponse, MusicApi};

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;

/// Production base URL of the generation API
pub const DEFAULT_BASE_URL: &str = "https://studio-api.prod.suno.com";

/// Upper bound on a single call to the generation API
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const GENERATE_PATH: &str = "/api/v2/external/hackmit/generate";
const CLIPS_PATH: &str = "/api/v2/external/hackmit/clips";

/// HTTP implementation of [`MusicApi`]
#[derive(Clone)]
pub struct SunoClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl std::fmt::Debug for SunoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SunoClient")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl SunoClient {
    /// Create a client against `base_url` (no trailing slash needed)
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, token, DEFAULT_REQUEST_TIMEOUT)
    }

    /// Create a client whose calls fail once `timeout` elapses
    pub fn with_timeout(
        base_url: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("cadence/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    /// Create a client from loaded configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::with_timeout(
            config.base_url.clone(),
            config.api_token.clone(),
            config.request_timeout,
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

#[async_trait]
impl MusicApi for SunoClient {
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse> {
        let url = format!("{}{}", self.base_url, GENERATE_PATH);

        let response = self
            .http
            .post(&url)
            .header(AUTHORIZATION, self.bearer())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        tracing::info!(status = status.as_u16(), "generation response");
        if !status.is_success() {
            return Err(CadenceError::GenerationFailed {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        tracing::debug!(%body, "generation body");
        serde_json::from_str::<GenerateResponse>(&body).map_err(|e| {
            CadenceError::InvalidResponse {
                reason: format!("generation response missing clip id: {}", e),
            }
        })
    }

    async fn clip_status(&self, clip_id: &str) -> Result<ClipLookup> {
        let url = format!("{}{}", self.base_url, CLIPS_PATH);

        let response = self
            .http
            .get(&url)
            .query(&[("ids", clip_id)])
            .header(AUTHORIZATION, self.bearer())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Ok(ClipLookup::Unavailable {
                status: status.as_u16(),
            });
        }

        let clips = response.json::<Vec<Clip>>().await.map_err(|e| {
            CadenceError::InvalidResponse {
                reason: format!("clip status is not a clip list: {}", e),
            }
        })?;

        Ok(ClipLookup::Found(clips))
    }
}
