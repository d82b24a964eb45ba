//! Music service trait and wire types
//!
//! Defines the interface the clip requestor talks to, plus the JSON shapes
//! exchanged with the generation API.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Body of a generation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Free-text description of the music
    pub topic: String,

    /// Comma separated style tags
    pub tags: String,

    /// Previous clip to cover, if any
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub cover_clip_id: Option<String>,
}

/// Acknowledgement returned by the generation endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub id: String,

    #[serde(default)]
    pub status: Option<String>,
}

/// A clip as reported by the status endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clip {
    pub id: String,
    pub status: String,

    /// Null until the provider has something to stream
    #[serde(default)]
    pub audio_url: Option<String>,
}

/// Outcome of a single status lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipLookup {
    /// The status endpoint answered with a non-success code
    Unavailable { status: u16 },

    /// Clips returned for the requested id (possibly none)
    Found(Vec<Clip>),
}

/// A ready clip, as handed back to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipResult {
    pub id: String,
    pub status: String,
    pub audio_url: Option<String>,
    pub music_bpm: i32,
    pub description: String,
}

/// Remote generative-music API
///
/// `SunoClient` is the production implementation. Tests script their own.
#[async_trait]
pub trait MusicApi: Send + Sync {
    /// Submit a generation request.
    ///
    /// A non-success upstream status must be reported as
    /// `CadenceError::GenerationFailed`.
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse>;

    /// Look up the current state of a clip.
    async fn clip_status(&self, clip_id: &str) -> Result<ClipLookup>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cover_id_omitted_when_absent() {
        let request = GenerateRequest {
            topic: "beat".to_string(),
            tags: "walking".to_string(),
            cover_clip_id: None,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("cover_clip_id").is_none());
        assert_eq!(json["topic"], "beat");
    }

    #[test]
    fn test_cover_id_sent_when_present() {
        let request = GenerateRequest {
            topic: "beat".to_string(),
            tags: "walking".to_string(),
            cover_clip_id: Some("clip-1".to_string()),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["cover_clip_id"], "clip-1");
    }

    #[test]
    fn test_clip_tolerates_missing_audio_and_extra_fields() {
        let clip: Clip = serde_json::from_str(
            r#"{"id": "abc", "status": "queued", "created_at": "2024-09-14T10:00:00Z"}"#,
        )
        .unwrap();

        assert_eq!(clip.id, "abc");
        assert_eq!(clip.status, "queued");
        assert!(clip.audio_url.is_none());
    }

    #[test]
    fn test_generate_response_needs_only_id() {
        let response: GenerateResponse =
            serde_json::from_str(r#"{"id": "xyz", "title": "Walk"}"#).unwrap();
        assert_eq!(response.id, "xyz");
        assert!(response.status.is_none());
    }
}
