//! Telegram Bot API transport
//!
//! Implements [`UpdateSource`] with one `POST {origin}/bot{token}/getUpdates`
//! per call.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::error::{PollerError, Result};
use crate::poller::PollConfig;
use crate::transport::source::{GetUpdatesRequest, PollResponse, UpdateSource};

/// Default Bot API origin
pub const DEFAULT_BASE_URL: &str = "https://api.telegram.org";

/// Default connect timeout
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Error envelope the Bot API sends with non-2xx answers
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    description: Option<String>,
}

/// Bot API client
pub struct TelegramClient {
    client: Client,
    base_url: String,
    access_token: String,
}

impl TelegramClient {
    /// Create a client for the origin and token in `config`.
    ///
    /// No overall request timeout is set: a long poll legitimately stays
    /// open for the configured `timeout` seconds.
    pub fn new(config: &PollConfig, connect_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| PollerError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self::with_client(client, &config.base_url, &config.access_token))
    }

    /// Create a client around an existing reqwest client
    pub fn with_client(client: Client, base_url: &str, access_token: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: access_token.to_string(),
        }
    }

    /// Full getUpdates URL
    fn endpoint(&self) -> String {
        format!("{}/bot{}/getUpdates", self.base_url, self.access_token)
    }

    async fn send_request(&self, request: &GetUpdatesRequest) -> Result<PollResponse> {
        let response = self.client.post(self.endpoint()).json(request).send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let description = serde_json::from_str::<ErrorEnvelope>(&body)
                .ok()
                .and_then(|envelope| envelope.description)
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("Unknown error")
                        .to_string()
                });
            return Err(PollerError::Api {
                status: status.as_u16(),
                description,
            });
        }

        serde_json::from_str(&body)
            .map_err(|e| PollerError::InvalidResponse(format!("Failed to parse getUpdates response: {}", e)))
    }
}

#[async_trait]
impl UpdateSource for TelegramClient {
    async fn get_updates(&self, request: &GetUpdatesRequest) -> Result<PollResponse> {
        self.send_request(request).await
    }
}

// Keep the token out of logs
impl std::fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}
