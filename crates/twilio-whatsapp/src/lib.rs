//! Twilio WhatsApp transport for Vita.
//!
//! This crate provides the messaging-provider boundary: an outbound client
//! for the Twilio Messages API and the inbound webhook payload types that
//! Twilio posts to the gateway. It knows nothing about conversation
//! semantics; the orchestrator treats it through its `MessageSender` trait.
//!
//! # Example
//!
//! ```no_run
//! use twilio_whatsapp::{TwilioClient, TwilioConfig};
//!
//! # async fn example() -> Result<(), twilio_whatsapp::TwilioError> {
//! let client = TwilioClient::new(TwilioConfig::from_env()?)?;
//! client.send("+918971780778", "Hello from Vita!").await?;
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod webhook;

pub use client::TwilioClient;
pub use config::TwilioConfig;
pub use webhook::{strip_channel_prefix, TwilioWebhook};

use thiserror::Error;

/// Errors that can occur while talking to Twilio.
#[derive(Debug, Error)]
pub enum TwilioError {
    /// Missing or invalid configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Network failure, including request timeouts.
    #[error("network error: {0}")]
    Network(String),

    /// Twilio rejected the request.
    #[error("delivery failed ({status}): {detail}")]
    DeliveryFailed { status: u16, detail: String },
}
