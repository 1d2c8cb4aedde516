//! Inbound webhook payload types.
//!
//! Twilio delivers inbound WhatsApp messages as an
//! application/x-www-form-urlencoded POST with capitalized field names.

use assistant_core::InboundMessage;
use serde::Deserialize;

/// The form payload Twilio posts for an inbound message.
///
/// Only the fields the assistant uses are modeled; the rest of the payload
/// is ignored on deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct TwilioWebhook {
    /// Sender, e.g. "whatsapp:+918971780778".
    #[serde(rename = "From")]
    pub from: String,
    /// Message text. Absent for media-only messages.
    #[serde(rename = "Body")]
    pub body: Option<String>,
    /// Twilio message SID.
    #[serde(rename = "MessageSid")]
    pub message_sid: Option<String>,
    /// WhatsApp display name of the sender.
    #[serde(rename = "ProfileName")]
    pub profile_name: Option<String>,
}

impl TwilioWebhook {
    /// Convert to an [`InboundMessage`], normalizing the phone identifier.
    ///
    /// Returns `None` for payloads the assistant cannot act on: missing
    /// sender or empty/whitespace-only body.
    pub fn into_inbound(self) -> Option<InboundMessage> {
        let phone = strip_channel_prefix(&self.from).to_string();
        if phone.is_empty() {
            return None;
        }

        let text = self.body?.trim().to_string();
        if text.is_empty() {
            return None;
        }

        Some(InboundMessage::new(phone, text))
    }
}

/// Strip the "whatsapp:" channel prefix from a Twilio address.
pub fn strip_channel_prefix(address: &str) -> &str {
    address.strip_prefix("whatsapp:").unwrap_or(address)
}
