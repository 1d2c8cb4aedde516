//! Error types for orchestrator operations.

use assistant_core::CoreError;
use database::DatabaseError;
use thiserror::Error;

/// Errors that can occur while handling a turn.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Persistence failed.
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),

    /// A collaborator (generation or embedding) failed.
    #[error("collaborator error: {0}")]
    Collaborator(#[from] CoreError),

    /// Message delivery failed.
    #[error("send failed: {0}")]
    SendFailed(String),
}
