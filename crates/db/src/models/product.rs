//! Product catalog rows.

use florist_core::catalog::ProductInput;
use florist_core::types::{Amount, EntityId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `products` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: EntityId,
    pub name: String,
    pub description: Option<String>,
    pub price: Amount,
    pub image: Option<String>,
    #[serde(rename = "type")]
    pub product_type: String,
    pub is_available: bool,
    pub stock: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Product {
    /// A fresh row for `input`.
    pub fn new(id: EntityId, input: &ProductInput, now: Timestamp) -> Self {
        Self {
            id,
            name: input.name.clone(),
            description: input.description.clone(),
            price: input.price,
            image: input.image.clone(),
            product_type: input.product_type.clone(),
            is_available: input.is_available,
            stock: input.stock,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite the editable fields, keeping id and `created_at`.
    pub fn apply(&mut self, input: &ProductInput, now: Timestamp) {
        self.name = input.name.clone();
        self.description = input.description.clone();
        self.price = input.price;
        self.image = input.image.clone();
        self.product_type = input.product_type.clone();
        self.is_available = input.is_available;
        self.stock = input.stock;
        self.updated_at = now;
    }

    /// Editable fields as an input, for duplication.
    pub fn to_input(&self) -> ProductInput {
        ProductInput {
            name: self.name.clone(),
            description: self.description.clone(),
            price: self.price,
            image: self.image.clone(),
            product_type: self.product_type.clone(),
            is_available: self.is_available,
            stock: self.stock,
        }
    }
}
