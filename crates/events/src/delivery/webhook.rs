//! Webhook delivery: one JSON POST per notice.
//!
//! [`WebhookDelivery`] sends the serialized [`OrderNotice`] to an external URL
//! (typically an automation workflow). There is no retry; a failed attempt is
//! reported to the dispatcher and logged there.

use std::time::Duration;

use async_trait::async_trait;

use super::{DeliveryError, NotificationChannel};
use crate::notice::OrderNotice;

/// HTTP request timeout for a single delivery attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for webhook delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The remote server returned a non-2xx status code.
    #[error("Webhook returned HTTP {0}")]
    HttpStatus(u16),
}

// ---------------------------------------------------------------------------
// WebhookDelivery
// ---------------------------------------------------------------------------

/// Delivers order notices to a webhook endpoint.
pub struct WebhookDelivery {
    client: reqwest::Client,
}

impl WebhookDelivery {
    /// Create a delivery service with its own HTTP client.
    pub fn new() -> Result<Self, WebhookError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { client })
    }

    /// POST the notice to `url` once and check the response status.
    pub async fn deliver(&self, url: &str, notice: &OrderNotice) -> Result<(), WebhookError> {
        let response = self.client.post(url).json(notice).send().await?;
        if !response.status().is_success() {
            return Err(WebhookError::HttpStatus(response.status().as_u16()));
        }
        tracing::info!(
            url,
            order_id = %notice.order_id,
            event = notice.event.as_str(),
            status = response.status().as_u16(),
            "Order webhook sent"
        );
        Ok(())
    }
}

#[async_trait]
impl NotificationChannel for WebhookDelivery {
    fn name(&self) -> &'static str {
        "webhook"
    }

    async fn send(&self, destination: &str, notice: &OrderNotice) -> Result<(), DeliveryError> {
        Ok(self.deliver(destination, notice).await?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
