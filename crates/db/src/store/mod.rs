//! Storage abstraction for the order service.
//!
//! The HTTP layer talks to an `Arc<dyn Store>` and never to a pool directly,
//! so the same engine runs over Postgres in production and over the volatile
//! in-memory backend in development and tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use florist_core::analytics::OrderFact;
use florist_core::catalog::ProductInput;
use florist_core::error::CoreError;
use florist_core::status::{OrderStatus, TransitionPlan};
use florist_core::types::{EntityId, Timestamp};
use thiserror::Error;

use crate::models::order::{NewOrder, Order, OrderDetail, StatusChange};
use crate::models::product::Product;
use crate::models::store_config::StoreSetting;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store refused the operation on domain grounds (unknown id,
    /// disallowed transition, referenced product). Nothing was written.
    #[error(transparent)]
    Rejected(#[from] CoreError),
    /// The backend could not perform the operation.
    #[error("Store backend error: {0}")]
    Backend(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

impl StoreError {
    /// True for infrastructure faults, as opposed to domain refusals.
    pub fn is_backend(&self) -> bool {
        matches!(self, StoreError::Backend(_))
    }
}

/// Result of a status change carried out inside the store's critical section.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusChangeOutcome {
    pub plan: TransitionPlan,
    pub detail: OrderDetail,
    /// A delivery record was created or updated by this change.
    pub delivery_recorded: bool,
}

/// Durable record of orders, their items, and delivery proof.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Insert an order and its line item together.
    async fn insert_order(&self, order: &NewOrder) -> Result<OrderDetail, StoreError>;

    async fn find_order(&self, id: EntityId) -> Result<Option<OrderDetail>, StoreError>;

    /// Orders newest first, without items.
    async fn list_orders(&self, limit: Option<i64>) -> Result<Vec<Order>, StoreError>;

    /// Apply a status change under the order's single-writer lock.
    ///
    /// The transition is planned against the status read inside the lock. For
    /// [`StatusChange::Complete`] the status write and the delivery upsert
    /// commit together or not at all. An `Unchanged` plan writes nothing,
    /// except that completing an already `COMPLETED` order with no delivery
    /// record creates the record. An existing record is never overwritten
    /// by a repeated completion.
    async fn apply_status_change(
        &self,
        id: EntityId,
        change: StatusChange,
        now: Timestamp,
    ) -> Result<StatusChangeOutcome, StoreError>;

    /// Analytics projection of every order created at or after `since`.
    async fn order_facts_since(&self, since: Timestamp) -> Result<Vec<OrderFact>, StoreError>;

    /// Order count per status; statuses without orders are absent.
    async fn status_counts(&self) -> Result<BTreeMap<OrderStatus, usize>, StoreError>;
}

/// Product catalog.
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn list_products(&self) -> Result<Vec<Product>, StoreError>;

    async fn find_product(&self, id: EntityId) -> Result<Option<Product>, StoreError>;

    async fn create_product(
        &self,
        input: &ProductInput,
        now: Timestamp,
    ) -> Result<Product, StoreError>;

    /// Fails with `Rejected(NotFound)` for an unknown id.
    async fn update_product(
        &self,
        id: EntityId,
        input: &ProductInput,
        now: Timestamp,
    ) -> Result<Product, StoreError>;

    /// Fails with `Rejected(NotFound)` for an unknown id and
    /// `Rejected(Conflict)` while order items reference the product.
    async fn delete_product(&self, id: EntityId) -> Result<(), StoreError>;
}

/// StoreConfig key/value settings.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn get_setting(&self, key: &str) -> Result<Option<String>, StoreError>;

    async fn list_settings(&self) -> Result<Vec<StoreSetting>, StoreError>;

    async fn put_setting(
        &self,
        key: &str,
        value: &str,
        now: Timestamp,
    ) -> Result<StoreSetting, StoreError>;
}

/// Everything the service needs from a backend.
#[async_trait]
pub trait Store: OrderStore + ProductStore + SettingsStore {
    /// Backend name for logs and health output.
    fn backend_name(&self) -> &'static str;

    /// Cheap liveness probe.
    async fn ping(&self) -> Result<(), StoreError>;
}

fn not_found(entity: &'static str, id: EntityId) -> StoreError {
    StoreError::Rejected(CoreError::NotFound { entity, id })
}
