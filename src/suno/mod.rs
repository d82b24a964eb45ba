//! Generative music API integration
//!
//! This module provides:
//! - `MusicApi` trait for anything that can generate and report clips
//! - `SunoClient`, the HTTP implementation
//! - Wire types for requests, responses and clips

mod client;
mod model;

pub use client::{SunoClient, DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT};
pub use model::{Clip, ClipLookup, ClipResult, GenerateRequest, GenerateResponse, MusicApi};
