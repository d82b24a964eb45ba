//! Cadence - Walking-pace music service
//!
//! Cadence keeps a generated soundtrack in step with a walker:
//! 1. Tempo adjustment - nudge the prompt BPM toward the goal pace
//! 2. Clip requests - ask a generative music API for a clip at that BPM
//!    and poll until it can be streamed
//!
//! # Architecture
//!
//! - `tempo`: the adjustment heuristic and its carried state
//! - `suno`: the music API trait and its HTTP client
//! - `poll`: the fixed-budget status poll
//! - `service`: one session tying the above together
//! - `server`: the HTTP surface

pub mod cli;
pub mod config;
pub mod error;
pub mod poll;
pub mod server;
pub mod service;
pub mod suno;
pub mod tempo;

pub use config::Config;
pub use error::{CadenceError, Result};
pub use poll::PollPolicy;
pub use service::{MusicSession, SessionState};
pub use tempo::{PaceRequest, TempoState};
