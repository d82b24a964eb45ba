//! Clip status polling
//!
//! A fixed-budget poll: wait, ask, repeat. Misses (non-success status or an
//! empty clip list) are swallowed and still cost an attempt.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CadenceError, Result};
use crate::suno::{Clip, ClipLookup, MusicApi};

/// Default number of status polls.
pub const DEFAULT_POLL_ATTEMPTS: u32 = 10;

/// Default delay before each status poll.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Statuses at which a clip can be handed to the listener.
pub const READY_STATUSES: [&str; 2] = ["streaming", "complete"];

/// How long to wait for a clip and what counts as ready
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollPolicy {
    /// Number of status requests made before timing out
    pub attempts: u32,

    /// Delay preceding every status request
    pub interval: Duration,

    /// Clip statuses that end the poll successfully
    pub ready_statuses: Vec<String>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_POLL_ATTEMPTS,
            interval: DEFAULT_POLL_INTERVAL,
            ready_statuses: READY_STATUSES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl PollPolicy {
    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Policy that never sleeps between polls
    pub fn immediate(attempts: u32) -> Self {
        Self::default()
            .with_attempts(attempts)
            .with_interval(Duration::ZERO)
    }

    pub fn is_ready(&self, status: &str) -> bool {
        self.ready_statuses.iter().any(|s| s == status)
    }

    /// Upper bound on time spent sleeping, ignoring network round-trips
    pub fn max_wait(&self) -> Duration {
        self.interval.saturating_mul(self.attempts)
    }
}

/// Poll `api` until `clip_id` reaches a ready status or the budget runs out.
///
/// Transport errors abort the poll immediately. Dropping the returned future
/// cancels polling at the next await point.
pub async fn poll_until_ready<A>(api: &A, clip_id: &str, policy: &PollPolicy) -> Result<Clip>
where
    A: MusicApi + ?Sized,
{
    for attempt in 1..=policy.attempts {
        tokio::time::sleep(policy.interval).await;

        match api.clip_status(clip_id).await? {
            ClipLookup::Unavailable { status } => {
                tracing::debug!(attempt, status, "clip status unavailable");
            }
            ClipLookup::Found(clips) => match clips.into_iter().next() {
                None => tracing::debug!(attempt, "clip not listed yet"),
                Some(clip) if policy.is_ready(&clip.status) => {
                    tracing::info!(attempt, status = %clip.status, "clip ready");
                    return Ok(clip);
                }
                Some(clip) => tracing::debug!(attempt, status = %clip.status, "clip pending"),
            },
        }
    }

    tracing::warn!(attempts = policy.attempts, clip_id, "gave up waiting for clip");
    Err(CadenceError::Timeout {
        attempts: policy.attempts,
    })
}
