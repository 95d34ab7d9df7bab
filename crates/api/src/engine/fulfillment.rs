//! The order fulfillment engine: intake, status transitions, completion.
//!
//! Intake follows the hybrid policy in [`florist_core::intake`]: a validated
//! draft is always acknowledged with a redirect target, whatever the store
//! does. Staff transitions and completion are planned and applied inside the
//! store's per-order critical section, and notifications run in background
//! tasks the caller never waits on.

use std::sync::Arc;

use chrono::Utc;
use florist_core::error::CoreError;
use florist_core::intake::{self, IntakeAck, PersistOutcome};
use florist_core::order::{validate_draft, OrderDraft};
use florist_core::settings;
use florist_core::status::{OrderStatus, TransitionPlan};
use florist_core::types::{new_id, EntityId};
use florist_db::models::order::{NewOrder, OrderDetail, StatusChange};
use florist_db::models::product::Product;
use florist_db::store::{OrderStore, ProductStore, SettingsStore};
use florist_db::{Store, StoreError};
use florist_events::{Destinations, DispatchReport, NotificationDispatcher, OrderNotice};
use tokio::task::JoinHandle;

use crate::config::NotifyConfig;
use crate::intake_link::whatsapp_link;

/// Result of a successful intake.
#[derive(Debug)]
pub struct Intake {
    pub ack: IntakeAck,
    /// Deep link the customer is sent to.
    pub redirect_url: String,
    /// The order as recorded, or as it would have been if the store failed.
    pub detail: OrderDetail,
    /// Background notification fan-out. Awaiting it is optional.
    pub dispatch: Option<JoinHandle<DispatchReport>>,
}

/// Validates and applies order lifecycle operations.
pub struct FulfillmentEngine {
    store: Arc<dyn Store>,
    dispatcher: NotificationDispatcher,
    notify: NotifyConfig,
}

impl FulfillmentEngine {
    pub fn new(store: Arc<dyn Store>, dispatcher: NotificationDispatcher, notify: NotifyConfig) -> Self {
        Self {
            store,
            dispatcher,
            notify,
        }
    }

    /// Accept a customer draft.
    ///
    /// Fails only on validation (including an unknown catalog product when the
    /// store can say so). A store outage is logged and absorbed.
    pub async fn create(&self, draft: OrderDraft) -> Result<Intake, CoreError> {
        let order_id = new_id();
        let now = Utc::now();

        let draft = validate_draft(draft).inspect_err(|e| {
            tracing::debug!(error = %e, "Order draft rejected");
        })?;

        let product = match draft.product_id {
            Some(product_id) => self.lookup_product(product_id).await?,
            None => None,
        };

        let new_order = NewOrder::from_draft(order_id, &draft, product.as_ref(), now);
        let persist = match self.store.insert_order(&new_order).await {
            Ok(_) => PersistOutcome::Stored,
            Err(e) => {
                tracing::warn!(
                    order_id = %order_id,
                    error = %e,
                    "Order store write failed; continuing with messaging intake"
                );
                PersistOutcome::Failed(e.to_string())
            }
        };

        let ack = intake::acknowledge(order_id, Ok(()), &persist)?;
        let detail = new_order.to_detail();

        let dispatch = if intake::should_notify(&persist) {
            let notice = OrderNotice::new_order(&detail, now);
            Some(self.dispatcher.spawn(notice, self.destinations().await))
        } else {
            None
        };

        let number = self
            .setting_or(settings::WHATSAPP_NUMBER, Some(&self.notify.whatsapp_number))
            .await
            .unwrap_or_else(|| self.notify.whatsapp_number.clone());
        let redirect_url = whatsapp_link(&number, &new_order)?.to_string();

        tracing::info!(order_id = %order_id, durable = ack.durable, "Order accepted");
        Ok(Intake {
            ack,
            redirect_url,
            detail,
            dispatch,
        })
    }

    /// Catalog lookup for a draft. An unreachable store skips the check.
    async fn lookup_product(&self, product_id: EntityId) -> Result<Option<Product>, CoreError> {
        match self.store.find_product(product_id).await {
            Ok(Some(product)) => Ok(Some(product)),
            Ok(None) => Err(CoreError::NotFound {
                entity: "Product",
                id: product_id,
            }),
            Err(e) => {
                tracing::warn!(product_id = %product_id, error = %e, "Product lookup failed; skipping check");
                Ok(None)
            }
        }
    }

    /// Move an order to `target`. Re-requesting the current status is a no-op.
    pub async fn transition(
        &self,
        id: EntityId,
        target: OrderStatus,
    ) -> Result<OrderDetail, StoreError> {
        let outcome = self
            .store
            .apply_status_change(id, StatusChange::Transition(target), Utc::now())
            .await?;
        if let TransitionPlan::Apply { from, to } = outcome.plan {
            tracing::info!(order_id = %id, from = %from, to = %to, "Order status changed");
        }
        Ok(outcome.detail)
    }

    /// Mark an order delivered with optional photo proof.
    ///
    /// Status and delivery record are written together. An order already
    /// `COMPLETED` without a delivery record gets one now, and the completion
    /// is announced then. Once a record exists, completing again changes
    /// nothing and sends nothing.
    pub async fn complete(
        &self,
        id: EntityId,
        proof_photo_url: Option<String>,
    ) -> Result<(OrderDetail, Option<JoinHandle<DispatchReport>>), StoreError> {
        let now = Utc::now();
        let outcome = self
            .store
            .apply_status_change(id, StatusChange::Complete { proof_photo_url }, now)
            .await?;

        if !outcome.delivery_recorded {
            return Ok((outcome.detail, None));
        }

        tracing::info!(order_id = %id, late_proof = outcome.plan.is_noop(), "Order completed");
        let notice = OrderNotice::completed(&outcome.detail, now);
        let handle = self.dispatcher.spawn(notice, self.destinations().await);
        Ok((outcome.detail, Some(handle)))
    }

    /// Public tracking read for a single order.
    pub async fn track(&self, id: EntityId) -> Result<OrderDetail, StoreError> {
        self.store
            .find_order(id)
            .await?
            .ok_or(StoreError::Rejected(CoreError::NotFound { entity: "Order", id }))
    }

    /// Current notification destinations: settings first, then environment.
    pub async fn destinations(&self) -> Destinations {
        Destinations {
            email: self
                .setting_or(settings::NOTIFY_EMAIL, self.notify.notify_email.as_deref())
                .await,
            webhook: self
                .setting_or(settings::WEBHOOK_URL, self.notify.webhook_url.as_deref())
                .await,
        }
    }

    async fn setting_or(&self, key: &str, fallback: Option<&str>) -> Option<String> {
        match self.store.get_setting(key).await {
            Ok(Some(value)) if !value.trim().is_empty() => Some(value.trim().to_string()),
            Ok(_) => fallback.map(str::to_string),
            Err(e) => {
                tracing::warn!(key, error = %e, "Settings read failed; using environment fallback");
                fallback.map(str::to_string)
            }
        }
    }
}
