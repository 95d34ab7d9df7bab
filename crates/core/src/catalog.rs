//! Product catalog input validation.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::error::CoreError;
use crate::types::Amount;

/// Suffix appended to a duplicated product's name.
pub const DUPLICATE_SUFFIX: &str = " (Salinan)";

/// Product fields accepted on create and update.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    #[validate(length(min = 1, max = 200, message = "Product name is required"))]
    pub name: String,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    #[validate(custom(function = "validate_price"))]
    pub price: Amount,
    pub image: Option<String>,
    #[validate(length(min = 1, max = 64, message = "Product type is required"))]
    #[serde(rename = "type")]
    pub product_type: String,
    #[serde(default = "default_available")]
    pub is_available: bool,
    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    #[serde(default)]
    pub stock: i32,
}

fn default_available() -> bool {
    true
}

fn validate_price(price: &Amount) -> Result<(), ValidationError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(ValidationError::new("negative_price")
            .with_message("Price cannot be negative".into()));
    }
    Ok(())
}

/// Trim and validate a product input.
pub fn validate_product(mut input: ProductInput) -> Result<ProductInput, CoreError> {
    input.name = input.name.trim().to_string();
    input.product_type = input.product_type.trim().to_string();
    input.description = input
        .description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());
    input
        .validate()
        .map_err(|errors| CoreError::from_validation(&errors))?;
    Ok(input)
}

/// Name given to a copy of `original`.
pub fn duplicate_name(original: &str) -> String {
    format!("{original}{DUPLICATE_SUFFIX}")
}
