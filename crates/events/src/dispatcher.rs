//! Independent fan-out of order notices to the e-mail and webhook channels.
//!
//! Each channel runs in its own task under its own timeout. A failure,
//! timeout, or panic in one never reaches the other, and nothing is ever
//! returned to the request that triggered the dispatch; outcomes are logged
//! and reported in a [`DispatchReport`] for whoever awaits the join handle.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::task::TaskTracker;

use crate::delivery::{DeliveryError, NotificationChannel};
use crate::notice::OrderNotice;

/// Default bound on a single channel attempt.
pub const DEFAULT_CHANNEL_TIMEOUT: Duration = Duration::from_secs(10);

/// Where a notice should go. `None` means the channel is not configured.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Destinations {
    pub email: Option<String>,
    pub webhook: Option<String>,
}

/// What happened on one channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelOutcome {
    Sent,
    /// No destination or no channel configured. Counts as success.
    Skipped,
    Failed(String),
    TimedOut,
}

impl ChannelOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, ChannelOutcome::Sent | ChannelOutcome::Skipped)
    }
}

/// Per-channel outcomes of one dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    pub email: ChannelOutcome,
    pub webhook: ChannelOutcome,
}

/// Fans a notice out to both channels.
#[derive(Clone)]
pub struct NotificationDispatcher {
    email: Option<Arc<dyn NotificationChannel>>,
    webhook: Option<Arc<dyn NotificationChannel>>,
    timeout: Duration,
    tracker: TaskTracker,
}

impl NotificationDispatcher {
    pub fn new(
        email: Option<Arc<dyn NotificationChannel>>,
        webhook: Option<Arc<dyn NotificationChannel>>,
        timeout: Duration,
    ) -> Self {
        Self {
            email,
            webhook,
            timeout,
            tracker: TaskTracker::new(),
        }
    }

    /// A dispatcher with no channels; every dispatch is skipped.
    pub fn disabled() -> Self {
        Self::new(None, None, DEFAULT_CHANNEL_TIMEOUT)
    }

    /// Start a dispatch in the background and return immediately.
    ///
    /// The returned handle resolves to the report once both channels are
    /// done. Dropping it does not cancel the dispatch.
    pub fn spawn(&self, notice: OrderNotice, destinations: Destinations) -> JoinHandle<DispatchReport> {
        let dispatcher = self.clone();
        self.tracker
            .spawn(async move { dispatcher.dispatch(notice, destinations).await })
    }

    /// Send to both channels concurrently and wait for both.
    pub async fn dispatch(&self, notice: OrderNotice, destinations: Destinations) -> DispatchReport {
        let notice = Arc::new(notice);
        let email = self.spawn_channel(self.email.clone(), destinations.email, notice.clone());
        let webhook = self.spawn_channel(self.webhook.clone(), destinations.webhook, notice);

        let (email, webhook) = tokio::join!(email, webhook);
        DispatchReport {
            email: join_outcome(email),
            webhook: join_outcome(webhook),
        }
    }

    fn spawn_channel(
        &self,
        channel: Option<Arc<dyn NotificationChannel>>,
        destination: Option<String>,
        notice: Arc<OrderNotice>,
    ) -> JoinHandle<ChannelOutcome> {
        let timeout = self.timeout;
        self.tracker.spawn(async move {
            let (Some(channel), Some(destination)) = (channel, destination) else {
                tracing::debug!(order_id = %notice.order_id, "Notification channel not configured, skipping");
                return ChannelOutcome::Skipped;
            };
            send_bounded(channel.as_ref(), &destination, &notice, timeout).await
        })
    }

    /// Stop accepting new dispatches and wait up to `grace` for in-flight ones.
    ///
    /// Returns `false` if some dispatches were still running at the deadline.
    pub async fn shutdown(&self, grace: Duration) -> bool {
        self.tracker.close();
        let pending = self.tracker.len();
        if pending > 0 {
            tracing::info!(pending, "Waiting for in-flight notifications");
        }
        tokio::time::timeout(grace, self.tracker.wait()).await.is_ok()
    }
}

async fn send_bounded(
    channel: &dyn NotificationChannel,
    destination: &str,
    notice: &OrderNotice,
    timeout: Duration,
) -> ChannelOutcome {
    let name = channel.name();
    match tokio::time::timeout(timeout, channel.send(destination, notice)).await {
        Ok(Ok(())) => ChannelOutcome::Sent,
        Ok(Err(e)) => {
            tracing::warn!(channel = name, order_id = %notice.order_id, error = %e, "Notification failed");
            ChannelOutcome::Failed(e.to_string())
        }
        Err(_) => {
            let e = DeliveryError::Timeout(timeout);
            tracing::warn!(channel = name, order_id = %notice.order_id, error = %e, "Notification timed out");
            ChannelOutcome::TimedOut
        }
    }
}

fn join_outcome(joined: Result<ChannelOutcome, tokio::task::JoinError>) -> ChannelOutcome {
    joined.unwrap_or_else(|e| {
        let e = DeliveryError::Panicked(e.to_string());
        tracing::error!(error = %e, "Notification task failed");
        ChannelOutcome::Failed(e.to_string())
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
