//! Intake draft: what a customer submits through the order form.
//!
//! A draft either points at a catalog product (`product_id`) or describes a
//! custom arrangement in free text (`product_name` + `product_type`). The
//! personalization fields are opaque strings carried through to the order
//! item and the notifications; nothing here interprets them.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::types::{EntityId, Timestamp};

/// Customer-submitted order request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    /// Catalog product reference; `None` for a free-text custom order.
    pub product_id: Option<EntityId>,
    /// Defaults to the product type when left blank.
    #[validate(length(min = 1, max = 200, message = "Product name is required"))]
    #[serde(default)]
    pub product_name: String,
    #[validate(length(min = 1, max = 64, message = "Product type is required"))]
    #[serde(default)]
    pub product_type: String,

    #[validate(length(min = 1, max = 200, message = "Recipient name is required"))]
    #[serde(default)]
    pub recipient_name: String,
    #[validate(length(min = 1, max = 32, message = "Recipient phone is required"))]
    #[serde(default)]
    pub recipient_phone: String,
    /// At least five characters; couriers need more than a street name.
    #[validate(length(min = 5, max = 2000, message = "Address MUST be detailed"))]
    #[serde(default)]
    pub delivery_address: String,
    /// Requested delivery time. Past values are accepted (walk-in / ASAP orders).
    pub delivery_time: Timestamp,

    #[validate(length(max = 2000))]
    pub greeting_type: Option<String>,
    #[validate(length(max = 2000))]
    pub target_name: Option<String>,
    #[validate(length(max = 2000))]
    pub sender_name: Option<String>,
    #[validate(length(max = 2000))]
    pub card_message: Option<String>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

impl OrderDraft {
    /// Trim every text field and drop optional fields that end up empty.
    ///
    /// Form posts send `""` for untouched inputs and trailing whitespace from
    /// copy-paste; both should behave like "not provided".
    pub fn normalized(mut self) -> Self {
        fn trim(s: &mut String) {
            let trimmed = s.trim();
            if trimmed.len() != s.len() {
                *s = trimmed.to_string();
            }
        }
        fn trim_opt(s: &mut Option<String>) {
            *s = s
                .take()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty());
        }

        trim(&mut self.product_name);
        trim(&mut self.product_type);
        trim(&mut self.recipient_name);
        trim(&mut self.recipient_phone);
        trim(&mut self.delivery_address);
        trim_opt(&mut self.greeting_type);
        trim_opt(&mut self.target_name);
        trim_opt(&mut self.sender_name);
        trim_opt(&mut self.card_message);
        trim_opt(&mut self.notes);
        if self.product_name.is_empty() {
            self.product_name = self.product_type.clone();
        }
        self
    }

    /// True when the draft is a free-text custom order rather than a catalog pick.
    pub fn is_custom(&self) -> bool {
        self.product_id.is_none()
    }
}

/// Normalize and validate a draft, returning field-level errors on failure.
pub fn validate_draft(draft: OrderDraft) -> Result<OrderDraft, CoreError> {
    let draft = draft.normalized();
    draft
        .validate()
        .map_err(|errors| CoreError::from_validation(&errors))?;
    Ok(draft)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::Utc;

    use super::*;

    fn draft() -> OrderDraft {
        OrderDraft {
            product_id: None,
            product_name: "Papan Bunga Wedding".into(),
            product_type: "BOARD_FLOWER".into(),
            recipient_name: "Budi".into(),
            recipient_phone: "081234567890".into(),
            delivery_address: "Jl. X No.1".into(),
            delivery_time: Utc::now(),
            greeting_type: Some("Happy Wedding".into()),
            target_name: Some("Andi & Sari".into()),
            sender_name: Some("Keluarga Budi".into()),
            card_message: None,
            notes: None,
        }
    }

    #[test]
    fn valid_draft_passes() {
        let validated = validate_draft(draft()).expect("draft should be valid");
        assert_eq!(validated.recipient_name, "Budi");
        assert!(validated.is_custom());
    }

    #[test]
    fn missing_required_fields_are_reported_per_field() {
        let mut d = draft();
        d.recipient_name = "   ".into();
        d.recipient_phone = String::new();
        d.delivery_address = "Jl".into();

        let err = validate_draft(d).unwrap_err();
        assert_matches!(err, CoreError::InvalidFields(fields) => {
            assert_eq!(fields["recipientName"], vec!["Recipient name is required"]);
            assert_eq!(fields["recipientPhone"], vec!["Recipient phone is required"]);
            assert_eq!(fields["deliveryAddress"], vec!["Address MUST be detailed"]);
            assert!(!fields.contains_key("productName"));
        });
    }

    #[test]
    fn blank_product_name_falls_back_to_type() {
        let mut d = draft();
        d.product_name = " ".into();
        let validated = validate_draft(d).unwrap();
        assert_eq!(validated.product_name, "BOARD_FLOWER");
    }

    #[test]
    fn omitted_text_fields_are_reported_not_rejected() {
        let d: OrderDraft = serde_json::from_value(serde_json::json!({
            "productType": "BOUQUET",
            "deliveryTime": "2026-11-01T09:00:00Z"
        }))
        .unwrap();
        assert_matches!(validate_draft(d), Err(CoreError::InvalidFields(fields)) => {
            assert!(fields.contains_key("recipientName"));
            assert!(fields.contains_key("deliveryAddress"));
            assert!(!fields.contains_key("productName"));
        });
    }

    #[test]
    fn past_delivery_time_is_accepted() {
        let mut d = draft();
        d.delivery_time = Utc::now() - chrono::Duration::days(2);
        assert!(validate_draft(d).is_ok());
    }

    #[test]
    fn blank_optional_fields_become_none() {
        let mut d = draft();
        d.card_message = Some("  ".into());
        d.notes = Some(" leave at the gate ".into());

        let validated = validate_draft(d).unwrap();
        assert_eq!(validated.card_message, None);
        assert_eq!(validated.notes.as_deref(), Some("leave at the gate"));
    }
}
