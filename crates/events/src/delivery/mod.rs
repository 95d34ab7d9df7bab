//! Notification channels.

use std::time::Duration;

use async_trait::async_trait;

use crate::notice::OrderNotice;

pub mod email;
pub mod webhook;

pub use email::{EmailConfig, EmailDelivery, EmailError};
pub use webhook::{WebhookDelivery, WebhookError};

/// Error type for any channel failure.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error(transparent)]
    Email(#[from] EmailError),

    #[error(transparent)]
    Webhook(#[from] WebhookError),

    /// The channel did not finish within its bound.
    #[error("Delivery timed out after {0:?}")]
    Timeout(Duration),

    /// The channel task panicked or was aborted.
    #[error("Delivery task panicked: {0}")]
    Panicked(String),
}

/// A single best-effort notification channel.
///
/// `send` makes exactly one attempt. Callers bound it with a timeout and
/// treat every error as non-fatal.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    /// Short name used in logs (`"email"`, `"webhook"`).
    fn name(&self) -> &'static str;

    async fn send(&self, destination: &str, notice: &OrderNotice) -> Result<(), DeliveryError>;
}
