//! Message sender trait and implementations.

use async_trait::async_trait;

use crate::error::OrchestratorError;

/// Trait for delivering replies to the messaging provider.
///
/// Abstracted to support different transports (Twilio, tests, etc.).
/// Delivery failures are non-fatal to the logical turn: a reply is
/// considered produced once computed, even if delivery later fails.
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Send a text message.
    async fn send(&self, recipient: &str, text: &str) -> Result<(), OrchestratorError>;
}

/// A no-op message sender for testing that discards all messages.
#[derive(Debug, Clone, Default)]
pub struct NoOpSender;

#[async_trait]
impl MessageSender for NoOpSender {
    async fn send(&self, _recipient: &str, _text: &str) -> Result<(), OrchestratorError> {
        Ok(())
    }
}

/// A message sender for debugging that logs all deliveries.
#[derive(Debug, Clone, Default)]
pub struct LoggingSender;

#[async_trait]
impl MessageSender for LoggingSender {
    async fn send(&self, recipient: &str, text: &str) -> Result<(), OrchestratorError> {
        tracing::info!("Sending message to {}: {}", recipient, text);
        Ok(())
    }
}
