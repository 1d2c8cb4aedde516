//! Inbound and outbound message types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An inbound message from a user, normalized from the transport layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Phone identifier of the sender (e.g., "+918971780778").
    pub phone: String,
    /// Message text, trimmed.
    pub text: String,
    /// When the message was received.
    pub received_at: DateTime<Utc>,
}

impl InboundMessage {
    /// Create an inbound message received now.
    pub fn new(phone: impl Into<String>, text: impl Into<String>) -> Self {
        Self::at(phone, text, Utc::now())
    }

    /// Create an inbound message with an explicit receive time.
    ///
    /// Used by tests and by transports that carry their own timestamps.
    pub fn at(
        phone: impl Into<String>,
        text: impl Into<String>,
        received_at: DateTime<Utc>,
    ) -> Self {
        let text: String = text.into();
        Self {
            phone: phone.into(),
            text: text.trim().to_string(),
            received_at,
        }
    }
}

/// An outbound reply destined for the messaging provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundMessage {
    /// Phone identifier of the recipient.
    pub recipient: String,
    /// Reply text.
    pub text: String,
}

impl OutboundMessage {
    /// Create a reply addressed to the sender of an inbound message.
    pub fn reply_to(message: &InboundMessage, text: impl Into<String>) -> Self {
        Self {
            recipient: message.phone.clone(),
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inbound_trims_text() {
        let msg = InboundMessage::new("+1234567890", "  hello  ");
        assert_eq!(msg.text, "hello");
        assert_eq!(msg.phone, "+1234567890");
    }

    #[test]
    fn test_reply_to_targets_sender() {
        let msg = InboundMessage::new("+1234567890", "hi");
        let reply = OutboundMessage::reply_to(&msg, "hello!");
        assert_eq!(reply.recipient, "+1234567890");
        assert_eq!(reply.text, "hello!");
    }
}
