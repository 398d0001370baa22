//! Error types for the upstream provider layer

use thiserror::Error;

/// Errors that can occur when calling the upstream completion API
#[derive(Debug, Error)]
pub enum LlmError {
    /// Provider answered with a non-success status
    #[error("Upstream rejected request (status {status}): {details}")]
    UpstreamRejected {
        status: u16,
        details: serde_json::Value,
    },

    /// DNS, TLS, connect or timeout failures
    #[error("Transport error: {0}")]
    Transport(String),

    /// JSON encoding/decoding issues
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The HTTP client could not be constructed
    #[error("Client setup error: {0}")]
    ClientSetup(String),
}

impl LlmError {
    /// Whether a fresh attempt could plausibly succeed
    pub fn is_transport(&self) -> bool {
        matches!(self, LlmError::Transport(_))
    }
}

impl From<serde_json::Error> for LlmError {
    fn from(err: serde_json::Error) -> Self {
        LlmError::Serialization(err.to_string())
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            LlmError::Serialization(err.to_string())
        } else {
            LlmError::Transport(err.to_string())
        }
    }
}
