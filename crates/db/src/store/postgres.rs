//! Postgres-backed [`Store`].

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use florist_core::analytics::OrderFact;
use florist_core::catalog::ProductInput;
use florist_core::error::CoreError;
use florist_core::status::{plan_transition, OrderStatus, TransitionPlan};
use florist_core::types::{new_id, EntityId, Timestamp};
use sqlx::{PgConnection, PgPool};

use super::{
    not_found, OrderStore, ProductStore, SettingsStore, StatusChangeOutcome, Store, StoreError,
};
use crate::models::order::{NewOrder, Order, OrderDetail, OrderItem, StatusChange};
use crate::models::product::Product;
use crate::models::store_config::StoreSetting;
use crate::repositories::{DeliveryRepo, OrderItemRepo, OrderRepo, ProductRepo, StoreConfigRepo};
use crate::DbPool;

/// Store over a Postgres pool.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Load an order with its items and delivery on one connection.
async fn load_detail(
    conn: &mut PgConnection,
    id: EntityId,
) -> Result<Option<OrderDetail>, sqlx::Error> {
    let Some(order) = OrderRepo::find_by_id(conn, id).await? else {
        return Ok(None);
    };
    let items = OrderItemRepo::list_for_order(conn, id).await?;
    let delivery = DeliveryRepo::find_for_order(conn, id).await?;
    Ok(Some(OrderDetail {
        order,
        items,
        delivery,
    }))
}

#[async_trait]
impl OrderStore for PgStore {
    async fn insert_order(&self, input: &NewOrder) -> Result<OrderDetail, StoreError> {
        let mut tx = self.pool.begin().await?;
        let order = OrderRepo::insert(&mut tx, input).await?;
        let item = OrderItemRepo::insert(&mut tx, order.id, &input.item).await?;
        tx.commit().await?;

        Ok(OrderDetail {
            order,
            items: vec![item],
            delivery: None,
        })
    }

    async fn find_order(&self, id: EntityId) -> Result<Option<OrderDetail>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        Ok(load_detail(&mut conn, id).await?)
    }

    async fn list_orders(&self, limit: Option<i64>) -> Result<Vec<Order>, StoreError> {
        Ok(OrderRepo::list(&self.pool, limit).await?)
    }

    async fn apply_status_change(
        &self,
        id: EntityId,
        change: StatusChange,
        now: Timestamp,
    ) -> Result<StatusChangeOutcome, StoreError> {
        let mut tx = self.pool.begin().await?;

        let current = OrderRepo::find_for_update(&mut tx, id)
            .await?
            .ok_or_else(|| not_found("Order", id))?;
        let plan = plan_transition(current.status, change.target())?;

        let mut delivery_recorded = false;
        if let TransitionPlan::Apply { to, .. } = plan {
            OrderRepo::update_status(&mut tx, id, to, now).await?;
        }
        if let StatusChange::Complete { proof_photo_url } = &change {
            let missing = DeliveryRepo::find_for_order(&mut tx, id).await?.is_none();
            if !plan.is_noop() || missing {
                DeliveryRepo::upsert(&mut tx, id, now, proof_photo_url.as_deref()).await?;
                delivery_recorded = true;
            }
        }

        let detail = load_detail(&mut tx, id)
            .await?
            .ok_or_else(|| not_found("Order", id))?;
        tx.commit().await?;

        Ok(StatusChangeOutcome {
            plan,
            detail,
            delivery_recorded,
        })
    }

    async fn order_facts_since(&self, since: Timestamp) -> Result<Vec<OrderFact>, StoreError> {
        let orders = OrderRepo::list_created_since(&self.pool, since).await?;
        let ids: Vec<EntityId> = orders.iter().map(|o| o.id).collect();
        let mut items_by_order: HashMap<EntityId, Vec<OrderItem>> = HashMap::new();
        for item in OrderItemRepo::list_for_orders(&self.pool, &ids).await? {
            items_by_order.entry(item.order_id).or_default().push(item);
        }

        Ok(orders
            .into_iter()
            .map(|order| {
                let items = items_by_order.remove(&order.id).unwrap_or_default();
                OrderDetail {
                    order,
                    items,
                    delivery: None,
                }
                .to_fact()
            })
            .collect())
    }

    async fn status_counts(&self) -> Result<BTreeMap<OrderStatus, usize>, StoreError> {
        let rows = OrderRepo::count_by_status(&self.pool).await?;
        let mut counts = BTreeMap::new();
        for (status, count) in rows {
            let status: OrderStatus = status.parse()?;
            counts.insert(status, usize::try_from(count).unwrap_or(0));
        }
        Ok(counts)
    }
}

#[async_trait]
impl ProductStore for PgStore {
    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        Ok(ProductRepo::list(&self.pool).await?)
    }

    async fn find_product(&self, id: EntityId) -> Result<Option<Product>, StoreError> {
        Ok(ProductRepo::find_by_id(&self.pool, id).await?)
    }

    async fn create_product(
        &self,
        input: &ProductInput,
        now: Timestamp,
    ) -> Result<Product, StoreError> {
        let product = Product::new(new_id(), input, now);
        Ok(ProductRepo::create(&self.pool, &product).await?)
    }

    async fn update_product(
        &self,
        id: EntityId,
        input: &ProductInput,
        now: Timestamp,
    ) -> Result<Product, StoreError> {
        // `created_at` is not among the updated columns.
        let product = Product::new(id, input, now);
        ProductRepo::update(&self.pool, &product)
            .await?
            .ok_or_else(|| not_found("Product", id))
    }

    async fn delete_product(&self, id: EntityId) -> Result<(), StoreError> {
        match ProductRepo::delete(&self.pool, id).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(not_found("Product", id)),
            Err(sqlx::Error::Database(db)) if db.is_foreign_key_violation() => {
                Err(StoreError::Rejected(CoreError::Conflict(
                    "Product is referenced by existing orders and cannot be deleted".into(),
                )))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl SettingsStore for PgStore {
    async fn get_setting(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(StoreConfigRepo::get(&self.pool, key).await?.map(|s| s.value))
    }

    async fn list_settings(&self) -> Result<Vec<StoreSetting>, StoreError> {
        Ok(StoreConfigRepo::list(&self.pool).await?)
    }

    async fn put_setting(
        &self,
        key: &str,
        value: &str,
        now: Timestamp,
    ) -> Result<StoreSetting, StoreError> {
        Ok(StoreConfigRepo::upsert(&self.pool, key, value, now).await?)
    }
}

#[async_trait]
impl Store for PgStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(crate::health_check(&self.pool).await?)
    }
}
