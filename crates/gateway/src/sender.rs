//! Twilio-backed implementation of the orchestrator's sender trait.

use async_trait::async_trait;
use orchestrator::{MessageSender, OrchestratorError};
use twilio_whatsapp::TwilioClient;

/// Delivers orchestrator replies over Twilio WhatsApp.
#[derive(Clone)]
pub struct WhatsappSender {
    client: TwilioClient,
}

impl WhatsappSender {
    /// Create a sender around a Twilio client.
    pub fn new(client: TwilioClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MessageSender for WhatsappSender {
    async fn send(&self, recipient: &str, text: &str) -> Result<(), OrchestratorError> {
        self.client
            .send(recipient, text)
            .await
            .map(|_| ())
            .map_err(|e| OrchestratorError::SendFailed(e.to_string()))
    }
}
