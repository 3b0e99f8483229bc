//! Outbound notifications.
//!
//! The messaging relay is an external collaborator: it takes a recipient
//! handle and a text and delivers it. [`WebhookNotifier`] posts that pair
//! as JSON to `MEEPLE_RELAY_URL`; [`LogNotifier`] only logs it and is used
//! when no relay is configured.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// Default timeout for relay requests.
pub const DEFAULT_RELAY_TIMEOUT_SECS: u64 = 10;

/// Delivery failure.
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("relay client could not be built: {0}")]
    Client(String),

    #[error("relay request to {recipient} failed: {reason}")]
    Delivery { recipient: String, reason: String },
}

/// Consumed interface of the messaging relay.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, recipient: &str, text: &str) -> Result<(), NotifyError>;
}

/// Logs messages instead of delivering them.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, recipient: &str, text: &str) -> Result<(), NotifyError> {
        tracing::info!(recipient, chars = text.chars().count(), "notification (no relay configured)");
        Ok(())
    }
}

#[derive(Serialize)]
struct OutboundMessage<'a> {
    to: &'a str,
    body: &'a str,
}

/// JSON webhook delivery via `reqwest`.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_RELAY_TIMEOUT_SECS))
            .build()
            .map_err(|e| NotifyError::Client(e.to_string()))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send(&self, recipient: &str, text: &str) -> Result<(), NotifyError> {
        let delivery_error = |reason: String| NotifyError::Delivery {
            recipient: recipient.to_string(),
            reason,
        };
        self.client
            .post(&self.url)
            .json(&OutboundMessage {
                to: recipient,
                body: text,
            })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    delivery_error(format!("timed out after {DEFAULT_RELAY_TIMEOUT_SECS}s"))
                } else {
                    delivery_error(e.to_string())
                }
            })?
            .error_for_status()
            .map_err(|e| delivery_error(e.to_string()))?;
        tracing::debug!(recipient, "notification delivered");
        Ok(())
    }
}
