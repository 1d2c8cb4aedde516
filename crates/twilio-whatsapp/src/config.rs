//! Configuration for the Twilio client.

use std::env;
use std::time::Duration;

use crate::TwilioError;

/// Configuration for the Twilio WhatsApp client.
#[derive(Debug, Clone)]
pub struct TwilioConfig {
    /// Twilio API base URL.
    pub api_url: String,
    /// Account SID.
    pub account_sid: String,
    /// Auth token.
    pub auth_token: String,
    /// WhatsApp sender, e.g. "whatsapp:+14155238886".
    pub from_number: String,
    /// Request timeout for outbound sends.
    pub request_timeout: Duration,
}

impl TwilioConfig {
    /// Create configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `TWILIO_ACCOUNT_SID` - Account SID
    /// - `TWILIO_AUTH_TOKEN` - Auth token
    /// - `TWILIO_WHATSAPP_NUMBER` - WhatsApp sender (e.g. "whatsapp:+14155238886")
    ///
    /// Optional environment variables:
    /// - `TWILIO_API_URL` - API base URL (default: https://api.twilio.com)
    /// - `TWILIO_TIMEOUT_SECS` - Request timeout in seconds (default: 15)
    pub fn from_env() -> Result<Self, TwilioError> {
        let account_sid = env::var("TWILIO_ACCOUNT_SID")
            .map_err(|_| TwilioError::Configuration("TWILIO_ACCOUNT_SID not set".to_string()))?;
        let auth_token = env::var("TWILIO_AUTH_TOKEN")
            .map_err(|_| TwilioError::Configuration("TWILIO_AUTH_TOKEN not set".to_string()))?;
        let from_number = env::var("TWILIO_WHATSAPP_NUMBER").map_err(|_| {
            TwilioError::Configuration("TWILIO_WHATSAPP_NUMBER not set".to_string())
        })?;

        let api_url = env::var("TWILIO_API_URL")
            .unwrap_or_else(|_| "https://api.twilio.com".to_string());

        let request_timeout = env::var("TWILIO_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(15));

        Ok(Self {
            api_url,
            account_sid,
            auth_token,
            from_number,
            request_timeout,
        })
    }
}
