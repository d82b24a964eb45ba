//! Walking music session
//!
//! Ties the tempo adjuster to the music API: adjust the tempo, ask for a clip
//! at that tempo (covering the previous clip when there is one), then wait
//! for it to become playable.
//!
//! # Locking
//!
//! Session state sits behind one async mutex. The lock is held from the
//! tempo adjustment through storing the new clip id, so covers chain in
//! request order. Polling happens after the lock is released.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::error::Result;
use crate::poll::{poll_until_ready, PollPolicy};
use crate::suno::{ClipResult, GenerateRequest, MusicApi};
use crate::tempo::{PaceRequest, TempoState};

/// Style tags sent with every generation request
pub const WALKING_TAGS: &str = "instrumental, steady, rhythmic, walking, upbeat";

/// Topic text for a clip at `bpm`
pub fn walking_topic(bpm: i32) -> String {
    format!(
        "A motivational electronic beat at around {} BPM for walking",
        bpm
    )
}

/// Description reported back for a finished clip at `bpm`
pub fn clip_description(bpm: i32) -> String {
    format!("Generated music clip at {} BPM", bpm)
}

/// State carried between requests for the lifetime of the process
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub tempo: TempoState,
    pub last_clip_id: Option<String>,
}

/// Generates walking music against a [`MusicApi`]
pub struct MusicSession {
    api: Arc<dyn MusicApi>,
    policy: PollPolicy,
    state: Mutex<SessionState>,
}

impl MusicSession {
    pub fn new(api: Arc<dyn MusicApi>, policy: PollPolicy) -> Self {
        Self::with_state(api, policy, SessionState::default())
    }

    pub fn with_state(api: Arc<dyn MusicApi>, policy: PollPolicy, state: SessionState) -> Self {
        Self {
            api,
            policy,
            state: Mutex::new(state),
        }
    }

    pub fn policy(&self) -> &PollPolicy {
        &self.policy
    }

    /// Copy of the current session state
    pub async fn snapshot(&self) -> SessionState {
        self.state.lock().await.clone()
    }

    /// Adjust the tempo for `pace` and fetch a clip at that tempo.
    pub async fn generate_music(&self, pace: PaceRequest) -> Result<ClipResult> {
        let (bpm, clip_id) = self.start_generation(pace).await?;
        self.request_clip(bpm, &clip_id).await
    }

    /// Adjust the tempo and submit a generation request, under the session lock.
    ///
    /// On upstream failure the tempo change is kept but `last_clip_id` is not touched.
    async fn start_generation(&self, pace: PaceRequest) -> Result<(i32, String)> {
        let mut state = self.state.lock().await;

        let bpm = state.tempo.adjust(pace);
        tracing::info!(
            user_bpm = pace.user_bpm,
            goal_bpm = pace.goal_bpm,
            bpm,
            "tempo adjusted"
        );

        let request = GenerateRequest {
            topic: walking_topic(bpm),
            tags: WALKING_TAGS.to_string(),
            cover_clip_id: state.last_clip_id.clone(),
        };

        let response = self.api.generate(&request).await?;
        tracing::info!(clip_id = %response.id, cover = ?request.cover_clip_id, "generation accepted");
        state.last_clip_id = Some(response.id.clone());

        Ok((bpm, response.id))
    }

    /// Wait for `clip_id` to become playable and describe it.
    async fn request_clip(&self, bpm: i32, clip_id: &str) -> Result<ClipResult> {
        let clip = poll_until_ready(self.api.as_ref(), clip_id, &self.policy).await?;

        Ok(ClipResult {
            id: clip.id,
            status: clip.status,
            audio_url: clip.audio_url,
            music_bpm: bpm,
            description: clip_description(bpm),
        })
    }
}
