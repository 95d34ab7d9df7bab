//! Staff order e-mails via SMTP.
//!
//! [`EmailDelivery`] wraps the `lettre` async SMTP transport to send a
//! plain-text summary of an order. Configuration is loaded from environment
//! variables; if `SMTP_HOST` is not set, [`EmailConfig::from_env`] returns
//! `None` and the e-mail channel is skipped.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::{DeliveryError, NotificationChannel};
use crate::notice::{OrderEvent, OrderNotice};

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for e-mail delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}

// ---------------------------------------------------------------------------
// EmailConfig
// ---------------------------------------------------------------------------

const DEFAULT_SMTP_PORT: u16 = 587;

const DEFAULT_FROM_ADDRESS: &str = "orders@florist.local";

/// SMTP settings for the e-mail channel.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub from_address: String,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable        | Required | Default                |
    /// |-----------------|----------|------------------------|
    /// | `SMTP_HOST`     | yes      | -                      |
    /// | `SMTP_PORT`     | no       | `587`                  |
    /// | `SMTP_FROM`     | no       | `orders@florist.local` |
    /// | `SMTP_USER`     | no       | -                      |
    /// | `SMTP_PASSWORD` | no       | -                      |
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok()?;
        Some(Self {
            smtp_host,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }
}

// ---------------------------------------------------------------------------
// Message formatting
// ---------------------------------------------------------------------------

pub fn subject(notice: &OrderNotice) -> String {
    match notice.event {
        OrderEvent::NewOrder => format!("New Order: {}", notice.short_id()),
        OrderEvent::OrderCompleted => format!("Order Completed: {}", notice.short_id()),
    }
}

/// Plain-text body: order id, customer, line items, total.
pub fn body(notice: &OrderNotice) -> String {
    let mut lines = vec![
        format!("Order ID: {}", notice.order_id),
        format!("Customer: {}", notice.customer.name),
        format!("Phone: {}", notice.customer.phone),
        format!("Address: {}", notice.customer.address),
        format!("Delivery: {}", notice.delivery.time.format("%Y-%m-%d %H:%M UTC")),
        String::new(),
        "Items:".to_string(),
    ];
    for line in &notice.lines {
        lines.push(format!("- {} x{} @ {}", line.name, line.quantity, line.price));
    }
    lines.push(String::new());
    lines.push(format!("Total: {}", notice.total_amount));

    if let Some(completion) = &notice.completion {
        lines.push(format!(
            "Arrived: {}",
            completion.arrived_time.format("%Y-%m-%d %H:%M UTC")
        ));
        if let Some(url) = &completion.proof_photo_url {
            lines.push(format!("Proof: {url}"));
        }
    }
    lines.join("\n")
}

// ---------------------------------------------------------------------------
// EmailDelivery
// ---------------------------------------------------------------------------

/// Sends order e-mails via SMTP.
pub struct EmailDelivery {
    config: EmailConfig,
}

impl EmailDelivery {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Send one e-mail about `notice` to `to_email`.
    pub async fn deliver(&self, to_email: &str, notice: &OrderNotice) -> Result<(), EmailError> {
        let email = Message::builder()
            .from(self.config.from_address.parse()?)
            .to(to_email.parse()?)
            .subject(subject(notice))
            .header(ContentType::TEXT_PLAIN)
            .body(body(notice))
            .map_err(|e| EmailError::Build(e.to_string()))?;

        let mut transport_builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)?
                .port(self.config.smtp_port);

        if let (Some(user), Some(pass)) = (&self.config.smtp_user, &self.config.smtp_password) {
            transport_builder =
                transport_builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        let mailer = transport_builder.build();
        mailer.send(email).await?;

        tracing::info!(
            to = to_email,
            order_id = %notice.order_id,
            event = notice.event.as_str(),
            "Order email sent"
        );
        Ok(())
    }
}

#[async_trait]
impl NotificationChannel for EmailDelivery {
    fn name(&self) -> &'static str {
        "email"
    }

    async fn send(&self, destination: &str, notice: &OrderNotice) -> Result<(), DeliveryError> {
        Ok(self.deliver(destination, notice).await?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
