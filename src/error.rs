//! Error handling for Cadence
//!
//! Every error knows the HTTP status it maps to and the message a caller sees.

use thiserror::Error;

/// Result type alias for Cadence operations
pub type Result<T> = std::result::Result<T, CadenceError>;

/// Main error type for Cadence operations
#[derive(Error, Debug)]
pub enum CadenceError {
    // Upstream Errors
    #[error("Music generation failed with upstream status {status}")]
    GenerationFailed { status: u16 },

    #[error("Clip not ready after {attempts} poll attempts")]
    Timeout { attempts: u32 },

    #[error("HTTP error talking to music service: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid response from music service: {reason}")]
    InvalidResponse { reason: String },

    // Request Errors
    #[error("Invalid parameter '{param}': got '{value}', expected {expected}")]
    InvalidParameter {
        param: String,
        value: String,
        expected: String,
    },

    // Startup Errors
    #[error("Configuration error: {reason}")]
    Config { reason: String },

    #[error("Server error: {reason}")]
    Server { reason: String },

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CadenceError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            CadenceError::GenerationFailed { .. } => "GENERATION_FAILED",
            CadenceError::Timeout { .. } => "TIMEOUT",
            CadenceError::Http(_) => "HTTP_ERROR",
            CadenceError::InvalidResponse { .. } => "INVALID_RESPONSE",
            CadenceError::InvalidParameter { .. } => "INVALID_PARAMETER",
            CadenceError::Config { .. } => "CONFIG_ERROR",
            CadenceError::Server { .. } => "SERVER_ERROR",
            CadenceError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// HTTP status code reported to the caller of `/generate-music`.
    ///
    /// Generation failures pass the upstream status straight through.
    pub fn http_status(&self) -> u16 {
        match self {
            CadenceError::GenerationFailed { status } => *status,
            CadenceError::Timeout { .. } => 504,
            CadenceError::Http(_) | CadenceError::InvalidResponse { .. } => 502,
            CadenceError::InvalidParameter { .. } => 400,
            _ => 500,
        }
    }

    /// Message placed into the `{"error": ...}` response body
    pub fn client_message(&self) -> String {
        match self {
            CadenceError::GenerationFailed { .. } => {
                "Failed to generate music from Suno".to_string()
            }
            CadenceError::Timeout { .. } => "Timed out waiting for clip".to_string(),
            _ => self.to_string(),
        }
    }

    /// Whether the same request could succeed if simply retried
    pub fn is_transient(&self) -> bool {
        match self {
            CadenceError::Timeout { .. } => true,
            CadenceError::Http(_) => true,
            CadenceError::GenerationFailed { status } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}
