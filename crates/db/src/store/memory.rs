//! Volatile in-memory [`Store`].
//!
//! Used when no `DATABASE_URL` is configured and by the HTTP integration
//! tests. All state sits behind one async mutex, which gives the same
//! single-writer discipline per order that row locks give in Postgres.
//! Multi-entity writes are staged and validated before anything is mutated.

use std::collections::{BTreeMap, HashMap};
#[cfg(any(test, feature = "testing"))]
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use florist_core::analytics::OrderFact;
use florist_core::catalog::ProductInput;
use florist_core::error::CoreError;
use florist_core::status::{plan_transition, OrderStatus, TransitionPlan};
use florist_core::types::{new_id, EntityId, Timestamp};
use tokio::sync::Mutex;

use super::{
    not_found, OrderStore, ProductStore, SettingsStore, StatusChangeOutcome, Store, StoreError,
};
use crate::models::order::{Delivery, NewOrder, Order, OrderDetail, StatusChange};
use crate::models::product::Product;
use crate::models::store_config::StoreSetting;

#[derive(Default)]
struct State {
    orders: HashMap<EntityId, OrderDetail>,
    products: HashMap<EntityId, Product>,
    settings: BTreeMap<String, StoreSetting>,
}

/// In-memory store. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
    #[cfg(any(test, feature = "testing"))]
    faults: Faults,
}

/// Switchable failure modes for exercising fault paths.
#[cfg(any(test, feature = "testing"))]
#[derive(Default)]
struct Faults {
    offline: AtomicBool,
    fail_delivery_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every operation fail with a backend error, as if the database
    /// were unreachable.
    #[cfg(any(test, feature = "testing"))]
    pub fn set_offline(&self, offline: bool) {
        self.faults.offline.store(offline, Ordering::SeqCst);
    }

    /// Make delivery upserts fail, leaving everything else working.
    #[cfg(any(test, feature = "testing"))]
    pub fn fail_delivery_writes(&self, fail: bool) {
        self.faults.fail_delivery_writes.store(fail, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<(), StoreError> {
        #[cfg(any(test, feature = "testing"))]
        {
            if self.faults.offline.load(Ordering::SeqCst) {
                return Err(StoreError::Backend("store is offline".into()));
            }
        }
        Ok(())
    }

    fn check_delivery_write(&self) -> Result<(), StoreError> {
        #[cfg(any(test, feature = "testing"))]
        {
            if self.faults.fail_delivery_writes.load(Ordering::SeqCst) {
                return Err(StoreError::Backend("delivery write failed".into()));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn insert_order(&self, input: &NewOrder) -> Result<OrderDetail, StoreError> {
        self.check_online()?;
        let mut state = self.state.lock().await;
        if state.orders.contains_key(&input.id) {
            return Err(StoreError::Backend(format!(
                "duplicate order id {}",
                input.id
            )));
        }
        if let Some(product_id) = input.item.product_id {
            if !state.products.contains_key(&product_id) {
                return Err(StoreError::Backend(format!(
                    "order item references missing product {product_id}"
                )));
            }
        }
        let detail = input.to_detail();
        state.orders.insert(input.id, detail.clone());
        Ok(detail)
    }

    async fn find_order(&self, id: EntityId) -> Result<Option<OrderDetail>, StoreError> {
        self.check_online()?;
        Ok(self.state.lock().await.orders.get(&id).cloned())
    }

    async fn list_orders(&self, limit: Option<i64>) -> Result<Vec<Order>, StoreError> {
        self.check_online()?;
        let state = self.state.lock().await;
        let mut orders: Vec<Order> = state.orders.values().map(|d| d.order.clone()).collect();
        orders.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        if let Some(limit) = limit {
            orders.truncate(usize::try_from(limit).unwrap_or(0));
        }
        Ok(orders)
    }

    async fn apply_status_change(
        &self,
        id: EntityId,
        change: StatusChange,
        now: Timestamp,
    ) -> Result<StatusChangeOutcome, StoreError> {
        self.check_online()?;
        let mut state = self.state.lock().await;
        let detail = state.orders.get(&id).ok_or_else(|| not_found("Order", id))?;
        let plan = plan_transition(detail.order.status, change.target())?;

        let late_proof = plan.is_noop()
            && matches!(change, StatusChange::Complete { .. })
            && detail.delivery.is_none();
        if plan.is_noop() && !late_proof {
            return Ok(StatusChangeOutcome {
                plan,
                detail: detail.clone(),
                delivery_recorded: false,
            });
        }

        // Stage the new rows, then swap them in once every write is known to succeed.
        let mut staged = detail.clone();
        if let TransitionPlan::Apply { to, .. } = plan {
            staged.order.status = to;
            staged.order.updated_at = now;
        }
        let mut delivery_recorded = false;
        if let StatusChange::Complete { proof_photo_url } = change {
            self.check_delivery_write()?;
            staged.delivery = Some(match staged.delivery.take() {
                Some(existing) => Delivery {
                    arrived_time: now,
                    proof_photo_url,
                    updated_at: now,
                    ..existing
                },
                None => Delivery {
                    id: new_id(),
                    order_id: id,
                    arrived_time: now,
                    proof_photo_url,
                    created_at: now,
                    updated_at: now,
                },
            });
            delivery_recorded = true;
        }

        state.orders.insert(id, staged.clone());
        Ok(StatusChangeOutcome {
            plan,
            detail: staged,
            delivery_recorded,
        })
    }

    async fn order_facts_since(&self, since: Timestamp) -> Result<Vec<OrderFact>, StoreError> {
        self.check_online()?;
        let state = self.state.lock().await;
        let mut details: Vec<&OrderDetail> = state
            .orders
            .values()
            .filter(|d| d.order.created_at >= since)
            .collect();
        details.sort_by_key(|d| (d.order.created_at, d.order.id));
        Ok(details.into_iter().map(OrderDetail::to_fact).collect())
    }

    async fn status_counts(&self) -> Result<BTreeMap<OrderStatus, usize>, StoreError> {
        self.check_online()?;
        let state = self.state.lock().await;
        let mut counts = BTreeMap::new();
        for detail in state.orders.values() {
            *counts.entry(detail.order.status).or_default() += 1;
        }
        Ok(counts)
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        self.check_online()?;
        let state = self.state.lock().await;
        let mut products: Vec<Product> = state.products.values().cloned().collect();
        products.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(products)
    }

    async fn find_product(&self, id: EntityId) -> Result<Option<Product>, StoreError> {
        self.check_online()?;
        Ok(self.state.lock().await.products.get(&id).cloned())
    }

    async fn create_product(
        &self,
        input: &ProductInput,
        now: Timestamp,
    ) -> Result<Product, StoreError> {
        self.check_online()?;
        let product = Product::new(new_id(), input, now);
        self.state
            .lock()
            .await
            .products
            .insert(product.id, product.clone());
        Ok(product)
    }

    async fn update_product(
        &self,
        id: EntityId,
        input: &ProductInput,
        now: Timestamp,
    ) -> Result<Product, StoreError> {
        self.check_online()?;
        let mut state = self.state.lock().await;
        let product = state
            .products
            .get_mut(&id)
            .ok_or_else(|| not_found("Product", id))?;
        product.apply(input, now);
        Ok(product.clone())
    }

    async fn delete_product(&self, id: EntityId) -> Result<(), StoreError> {
        self.check_online()?;
        let mut state = self.state.lock().await;
        if !state.products.contains_key(&id) {
            return Err(not_found("Product", id));
        }
        let referenced = state
            .orders
            .values()
            .flat_map(|d| d.items.iter())
            .any(|item| item.product_id == Some(id));
        if referenced {
            return Err(StoreError::Rejected(CoreError::Conflict(
                "Product is referenced by existing orders and cannot be deleted".into(),
            )));
        }
        state.products.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl SettingsStore for MemoryStore {
    async fn get_setting(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.check_online()?;
        Ok(self
            .state
            .lock()
            .await
            .settings
            .get(key)
            .map(|s| s.value.clone()))
    }

    async fn list_settings(&self) -> Result<Vec<StoreSetting>, StoreError> {
        self.check_online()?;
        Ok(self.state.lock().await.settings.values().cloned().collect())
    }

    async fn put_setting(
        &self,
        key: &str,
        value: &str,
        now: Timestamp,
    ) -> Result<StoreSetting, StoreError> {
        self.check_online()?;
        let setting = StoreSetting {
            key: key.to_string(),
            value: value.to_string(),
            updated_at: now,
        };
        self.state
            .lock()
            .await
            .settings
            .insert(setting.key.clone(), setting.clone());
        Ok(setting)
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check_online()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
