//! Order notifications and their webhook wire format.
//!
//! An [`OrderNotice`] is built once per event and handed to every channel.
//! Its serde form is the JSON body POSTed to the webhook:
//!
//! ```json
//! {
//!   "event": "new_order",
//!   "orderId": "0192...",
//!   "timestamp": "2026-10-19T08:00:00Z",
//!   "customer": { "name": "Budi", "phone": "0812...", "address": "Jl. X No.1" },
//!   "product": { "id": null, "name": "Papan Bunga", "type": "BOARD_FLOWER" },
//!   "delivery": { "time": "2026-10-20T09:00:00Z", "greetingType": "Happy Wedding" }
//! }
//! ```
//!
//! Completion notices add a `completion` block with `arrivedTime` and
//! `proofPhotoUrl`.

use florist_core::types::{Amount, EntityId, Timestamp};
use florist_db::models::order::{OrderDetail, OrderItem};
use serde::Serialize;

/// Which lifecycle point a notice reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderEvent {
    NewOrder,
    OrderCompleted,
}

impl OrderEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderEvent::NewOrder => "new_order",
            OrderEvent::OrderCompleted => "order_completed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerBlock {
    pub name: String,
    pub phone: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductBlock {
    pub id: Option<EntityId>,
    pub name: String,
    #[serde(rename = "type")]
    pub product_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryBlock {
    pub time: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub greeting_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionBlock {
    pub arrived_time: Timestamp,
    pub proof_photo_url: Option<String>,
}

/// One line of the e-mail body.
#[derive(Debug, Clone, PartialEq)]
pub struct NoticeLine {
    pub name: String,
    pub quantity: i32,
    pub price: Amount,
}

/// A notification about one order, shared by every channel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderNotice {
    pub event: OrderEvent,
    pub order_id: EntityId,
    pub timestamp: Timestamp,
    pub customer: CustomerBlock,
    pub product: ProductBlock,
    pub delivery: DeliveryBlock,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion: Option<CompletionBlock>,

    /// E-mail only.
    #[serde(skip)]
    pub lines: Vec<NoticeLine>,
    /// E-mail only.
    #[serde(skip)]
    pub total_amount: Amount,
}

impl OrderNotice {
    /// Notice for a freshly accepted order.
    pub fn new_order(detail: &OrderDetail, now: Timestamp) -> Self {
        Self::build(OrderEvent::NewOrder, detail, now)
    }

    /// Notice for a completed order, carrying its delivery proof.
    pub fn completed(detail: &OrderDetail, now: Timestamp) -> Self {
        let mut notice = Self::build(OrderEvent::OrderCompleted, detail, now);
        notice.completion = detail.delivery.as_ref().map(|d| CompletionBlock {
            arrived_time: d.arrived_time,
            proof_photo_url: d.proof_photo_url.clone(),
        });
        notice
    }

    fn build(event: OrderEvent, detail: &OrderDetail, now: Timestamp) -> Self {
        let order = &detail.order;
        let item = detail.primary_item();
        Self {
            event,
            order_id: order.id,
            timestamp: now,
            customer: CustomerBlock {
                name: order.recipient_name.clone(),
                phone: order.recipient_phone.clone(),
                address: order.delivery_address.clone(),
            },
            product: ProductBlock {
                id: item.and_then(|i| i.product_id),
                name: item.map(|i| i.product_name.clone()).unwrap_or_default(),
                product_type: item.map(|i| i.product_type.clone()).unwrap_or_default(),
            },
            delivery: DeliveryBlock {
                time: order.delivery_time,
                greeting_type: item.and_then(|i| i.greeting_type.clone()),
                target_name: item.and_then(|i| i.target_name.clone()),
                sender_name: item.and_then(|i| i.sender_name.clone()),
                card_message: item.and_then(|i| i.card_message.clone()),
                notes: item.and_then(|i| i.notes.clone()),
            },
            completion: None,
            lines: detail.items.iter().map(NoticeLine::from).collect(),
            total_amount: order.total_amount,
        }
    }

    /// First eight characters of the id, as shown in subjects and chat.
    pub fn short_id(&self) -> String {
        self.order_id.to_string().chars().take(8).collect()
    }
}

impl From<&OrderItem> for NoticeLine {
    fn from(item: &OrderItem) -> Self {
        Self {
            name: item.product_name.clone(),
            quantity: item.quantity,
            price: item.price,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
