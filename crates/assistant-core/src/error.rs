//! Error types for collaborator operations.

use thiserror::Error;

/// Errors that can occur while talking to an external collaborator.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Missing or invalid configuration (API key, URL, etc.)
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Network failure, including request timeouts.
    #[error("network error: {0}")]
    Network(String),

    /// The collaborator answered but the response was unusable.
    #[error("processing failed: {0}")]
    ProcessingFailed(String),
}
