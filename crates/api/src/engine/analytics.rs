//! Dashboard and analytics reads.
//!
//! Thin layer over the store: load a snapshot, fold it with the pure
//! functions in [`florist_core::analytics`]. No caching.

use std::collections::BTreeMap;
use std::sync::Arc;

use florist_core::analytics::{
    month_start, monthly_summary, status_buckets, MonthlySummary, DASHBOARD_GROUPS,
    NEEDS_ATTENTION,
};
use chrono::FixedOffset;
use florist_core::status::OrderStatus;
use florist_core::types::{Amount, EntityId, Timestamp};
use florist_db::models::order::Order;
use florist_db::store::OrderStore;
use florist_db::{Store, StoreError};
use serde::Serialize;

use crate::labels::status_label;

/// How many orders the dashboard's "recent" list shows.
pub const RECENT_ORDERS_LIMIT: i64 = 10;

/// Row of the dashboard's recent-orders table.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentOrder {
    pub id: EntityId,
    pub recipient_name: String,
    pub status: OrderStatus,
    pub status_label: &'static str,
    pub total_amount: Amount,
    pub delivery_time: Timestamp,
    pub created_at: Timestamp,
}

impl From<Order> for RecentOrder {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            recipient_name: order.recipient_name,
            status: order.status,
            status_label: status_label(order.status),
            total_amount: order.total_amount,
            delivery_time: order.delivery_time,
            created_at: order.created_at,
        }
    }
}

/// Staff dashboard payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    #[serde(flatten)]
    pub summary: MonthlySummary,
    pub status_buckets: BTreeMap<&'static str, usize>,
    pub recent_orders: Vec<RecentOrder>,
}

/// Analytics page payload: monthly figures plus a count per status.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    #[serde(flatten)]
    pub summary: MonthlySummary,
    pub status_counts: BTreeMap<OrderStatus, usize>,
}

pub struct AnalyticsService {
    store: Arc<dyn Store>,
    offset: FixedOffset,
}

impl AnalyticsService {
    /// `offset` is the shop's wall clock, which decides where a month starts.
    pub fn new(store: Arc<dyn Store>, offset: FixedOffset) -> Self {
        Self { store, offset }
    }

    async fn summary(&self, now: Timestamp) -> Result<MonthlySummary, StoreError> {
        let since = month_start(now, self.offset);
        let facts = self.store.order_facts_since(since).await?;
        Ok(monthly_summary(&facts, now, self.offset))
    }

    pub async fn dashboard(&self, now: Timestamp) -> Result<Dashboard, StoreError> {
        let summary = self.summary(now).await?;
        let counts = self.store.status_counts().await?;
        let recent = self.store.list_orders(Some(RECENT_ORDERS_LIMIT)).await?;

        Ok(Dashboard {
            summary,
            status_buckets: status_buckets(expand(&counts), DASHBOARD_GROUPS),
            recent_orders: recent.into_iter().map(RecentOrder::from).collect(),
        })
    }

    pub async fn analytics(&self, now: Timestamp) -> Result<AnalyticsReport, StoreError> {
        let summary = self.summary(now).await?;
        let status_counts = self.store.status_counts().await?;
        Ok(AnalyticsReport {
            summary,
            status_counts,
        })
    }

    /// Orders still waiting on payment or a design round.
    pub async fn pending_count(&self) -> Result<usize, StoreError> {
        let counts = self.store.status_counts().await?;
        let buckets = status_buckets(expand(&counts), &[NEEDS_ATTENTION]);
        Ok(buckets.get(NEEDS_ATTENTION.name).copied().unwrap_or(0))
    }
}

/// One status per order, for the bucket fold.
fn expand(counts: &BTreeMap<OrderStatus, usize>) -> impl Iterator<Item = OrderStatus> + '_ {
    counts
        .iter()
        .flat_map(|(status, n)| std::iter::repeat(*status).take(*n))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use florist_core::analytics::{business_offset, WIB_OFFSET_SECS};
    use florist_core::order::OrderDraft;
    use florist_core::types::new_id;
    use florist_db::models::order::{NewOrder, StatusChange};
    use florist_db::MemoryStore;

    use super::*;

    fn wib() -> FixedOffset {
        business_offset(WIB_OFFSET_SECS)
    }

    async fn seed(store: &MemoryStore, name: &str, status: OrderStatus) {
        let now = Utc::now();
        let draft = OrderDraft {
            product_id: None,
            product_name: name.into(),
            product_type: "BOUQUET".into(),
            recipient_name: "Sari".into(),
            recipient_phone: "0812".into(),
            delivery_address: "Jl. Melati 7".into(),
            delivery_time: now,
            greeting_type: None,
            target_name: None,
            sender_name: None,
            card_message: None,
            notes: None,
        };
        let order = NewOrder::from_draft(new_id(), &draft, None, now);
        store.insert_order(&order).await.unwrap();
        if status != OrderStatus::PendingPayment {
            store
                .apply_status_change(order.id, StatusChange::Transition(status), now)
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn dashboard_buckets_and_best_seller() {
        let store = Arc::new(MemoryStore::new());
        seed(&store, "Red Roses", OrderStatus::PendingPayment).await;
        seed(&store, "Wedding Board", OrderStatus::InProduction).await;
        seed(&store, "Wedding Board", OrderStatus::OnDelivery).await;
        seed(&store, "Red Roses", OrderStatus::Cancelled).await;

        let service = AnalyticsService::new(store, wib());
        let dashboard = service.dashboard(Utc::now()).await.unwrap();

        assert_eq!(dashboard.summary.orders_count, 3);
        assert_eq!(dashboard.summary.best_seller.as_deref(), Some("Wedding Board"));
        assert_eq!(dashboard.status_buckets["pending"], 1);
        assert_eq!(dashboard.status_buckets["arranging"], 1);
        assert_eq!(dashboard.status_buckets["on_route"], 1);
        assert_eq!(dashboard.status_buckets["delivered"], 0);
        assert_eq!(dashboard.recent_orders.len(), 4);
    }

    #[tokio::test]
    async fn pending_count_includes_design_rounds() {
        let store = Arc::new(MemoryStore::new());
        seed(&store, "A", OrderStatus::PendingPayment).await;
        seed(&store, "B", OrderStatus::DesignDraft).await;
        seed(&store, "C", OrderStatus::Paid).await;

        let service = AnalyticsService::new(store, wib());
        assert_eq!(service.pending_count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn analytics_serializes_status_names_as_keys() {
        let store = Arc::new(MemoryStore::new());
        seed(&store, "A", OrderStatus::Paid).await;

        let report = AnalyticsService::new(store, wib()).analytics(Utc::now()).await.unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["statusCounts"]["PAID"], 1);
        assert_eq!(json["ordersCount"], 1);
    }
}
