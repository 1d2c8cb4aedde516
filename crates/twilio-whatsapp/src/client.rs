//! Outbound Twilio Messages API client.

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::TwilioConfig;
use crate::webhook::strip_channel_prefix;
use crate::TwilioError;

/// Response body for a created message.
#[derive(Debug, Deserialize)]
struct MessageCreated {
    sid: String,
}

/// A client for sending WhatsApp messages through Twilio.
#[derive(Debug, Clone)]
pub struct TwilioClient {
    client: Client,
    config: TwilioConfig,
}

impl TwilioClient {
    /// Create a new client with the given configuration.
    pub fn new(config: TwilioConfig) -> Result<Self, TwilioError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| {
                TwilioError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client, config })
    }

    /// Create a client from environment variables.
    pub fn from_env() -> Result<Self, TwilioError> {
        Self::new(TwilioConfig::from_env()?)
    }

    /// Send a WhatsApp message.
    ///
    /// `to` may be a bare phone ("+918971780778") or already carry the
    /// "whatsapp:" channel prefix. Returns the created message SID.
    pub async fn send(&self, to: &str, body: &str) -> Result<String, TwilioError> {
        let url = format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.config.api_url, self.config.account_sid
        );

        let to = format!("whatsapp:{}", strip_channel_prefix(to));
        let params = [
            ("From", self.config.from_number.as_str()),
            ("To", to.as_str()),
            ("Body", body),
        ];

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&params)
            .send()
            .await
            .map_err(|e| TwilioError::Network(format!("Failed to send request: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            warn!("Twilio rejected message to {}: {} {}", to, status, detail);
            return Err(TwilioError::DeliveryFailed {
                status: status.as_u16(),
                detail,
            });
        }

        let created: MessageCreated = response
            .json()
            .await
            .map_err(|e| TwilioError::Network(format!("Failed to parse response: {}", e)))?;

        debug!("Sent message {} to {}", created.sid, to);
        Ok(created.sid)
    }
}
