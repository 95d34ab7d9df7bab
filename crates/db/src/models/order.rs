//! Order, order item, and delivery rows plus the write-side DTOs.

use florist_core::analytics::{ItemFact, OrderFact};
use florist_core::order::OrderDraft;
use florist_core::status::OrderStatus;
use florist_core::types::{new_id, Amount, EntityId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use crate::models::product::Product;

/// A row from the `orders` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: EntityId,
    #[sqlx(try_from = "String")]
    pub status: OrderStatus,
    pub total_amount: Amount,
    pub recipient_name: String,
    pub recipient_phone: String,
    pub delivery_address: String,
    pub delivery_time: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `order_items` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: EntityId,
    pub order_id: EntityId,
    pub product_id: Option<EntityId>,
    pub product_name: String,
    pub product_type: String,
    pub quantity: i32,
    pub price: Amount,
    pub greeting_type: Option<String>,
    pub target_name: Option<String>,
    pub sender_name: Option<String>,
    pub card_message: Option<String>,
    pub notes: Option<String>,
}

/// A row from the `deliveries` table. At most one per order.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Delivery {
    pub id: EntityId,
    pub order_id: EntityId,
    pub arrived_time: Timestamp,
    pub proof_photo_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An order with everything it owns.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
    pub delivery: Option<Delivery>,
}

impl OrderDetail {
    /// The first line item. Orders taken through the form carry exactly one.
    pub fn primary_item(&self) -> Option<&OrderItem> {
        self.items.first()
    }

    /// Project onto the slice the analytics folds need.
    pub fn to_fact(&self) -> OrderFact {
        OrderFact {
            status: self.order.status,
            total_amount: self.order.total_amount,
            created_at: self.order.created_at,
            items: self
                .items
                .iter()
                .map(|item| ItemFact {
                    label: item.product_name.clone(),
                    quantity: item.quantity,
                })
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Write-side DTOs
// ---------------------------------------------------------------------------

/// Everything needed to insert an order and its single line item.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub id: EntityId,
    pub total_amount: Amount,
    pub recipient_name: String,
    pub recipient_phone: String,
    pub delivery_address: String,
    pub delivery_time: Timestamp,
    pub created_at: Timestamp,
    pub item: NewOrderItem,
}

/// The line item written alongside a [`NewOrder`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderItem {
    pub id: EntityId,
    pub product_id: Option<EntityId>,
    pub product_name: String,
    pub product_type: String,
    pub quantity: i32,
    pub price: Amount,
    pub greeting_type: Option<String>,
    pub target_name: Option<String>,
    pub sender_name: Option<String>,
    pub card_message: Option<String>,
    pub notes: Option<String>,
}

impl NewOrder {
    /// Build the insert for a validated draft.
    ///
    /// The order starts with a zero total and one zero-priced item; prices are
    /// negotiated over chat. When the draft references a catalog product the
    /// item snapshots that product's name and type.
    pub fn from_draft(
        id: EntityId,
        draft: &OrderDraft,
        product: Option<&Product>,
        now: Timestamp,
    ) -> Self {
        let (product_id, product_name, product_type) = match product {
            Some(p) => (Some(p.id), p.name.clone(), p.product_type.clone()),
            None => (
                draft.product_id,
                draft.product_name.clone(),
                draft.product_type.clone(),
            ),
        };
        Self {
            id,
            total_amount: Amount::ZERO,
            recipient_name: draft.recipient_name.clone(),
            recipient_phone: draft.recipient_phone.clone(),
            delivery_address: draft.delivery_address.clone(),
            delivery_time: draft.delivery_time,
            created_at: now,
            item: NewOrderItem {
                id: new_id(),
                product_id,
                product_name,
                product_type,
                quantity: 1,
                price: Amount::ZERO,
                greeting_type: draft.greeting_type.clone(),
                target_name: draft.target_name.clone(),
                sender_name: draft.sender_name.clone(),
                card_message: draft.card_message.clone(),
                notes: draft.notes.clone(),
            },
        }
    }

    /// The rows as they read back right after insert.
    pub fn to_detail(&self) -> OrderDetail {
        OrderDetail {
            order: Order {
                id: self.id,
                status: OrderStatus::INITIAL,
                total_amount: self.total_amount,
                recipient_name: self.recipient_name.clone(),
                recipient_phone: self.recipient_phone.clone(),
                delivery_address: self.delivery_address.clone(),
                delivery_time: self.delivery_time,
                created_at: self.created_at,
                updated_at: self.created_at,
            },
            items: vec![OrderItem {
                id: self.item.id,
                order_id: self.id,
                product_id: self.item.product_id,
                product_name: self.item.product_name.clone(),
                product_type: self.item.product_type.clone(),
                quantity: self.item.quantity,
                price: self.item.price,
                greeting_type: self.item.greeting_type.clone(),
                target_name: self.item.target_name.clone(),
                sender_name: self.item.sender_name.clone(),
                card_message: self.item.card_message.clone(),
                notes: self.item.notes.clone(),
            }],
            delivery: None,
        }
    }
}

/// A staff-requested status change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusChange {
    /// Plain status move.
    Transition(OrderStatus),
    /// Move to `COMPLETED` and upsert the delivery proof in the same commit.
    Complete { proof_photo_url: Option<String> },
}

impl StatusChange {
    pub fn target(&self) -> OrderStatus {
        match self {
            StatusChange::Transition(target) => *target,
            StatusChange::Complete { .. } => OrderStatus::Completed,
        }
    }
}
