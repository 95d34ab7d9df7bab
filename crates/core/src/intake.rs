//! Hybrid-persistence intake policy.
//!
//! Order intake has two independent outcomes: the draft's validation and the
//! store's durability attempt. The messaging channel (the customer's WhatsApp
//! redirect) is the authoritative intake path, so a store failure after a
//! draft validated is absorbed: the customer is still acknowledged and the
//! notifications still go out. A validation failure is the only outcome that
//! reaches the customer as an error.

use serde::Serialize;

use crate::error::CoreError;
use crate::types::EntityId;

/// Outcome of the durable write for an already-validated draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistOutcome {
    /// The order and its item are in the store.
    Stored,
    /// The store rejected or could not perform the write.
    Failed(String),
}

impl PersistOutcome {
    pub fn is_stored(&self) -> bool {
        matches!(self, PersistOutcome::Stored)
    }
}

/// Caller-visible acknowledgment of an accepted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakeAck {
    pub order_id: EntityId,
    /// Whether the order reached the store. Logged, never shown to customers.
    #[serde(skip)]
    pub durable: bool,
}

/// Store failures never fail intake.
pub const STORE_FAILURE_IS_FATAL_TO_INTAKE: bool = false;

/// Combine the validation and persistence outcomes into the caller's result.
///
/// - validation failed -> that error, nothing was written, nobody is notified
/// - stored -> acknowledged, durable
/// - store failed -> acknowledged, not durable
pub fn acknowledge(
    order_id: EntityId,
    validation: Result<(), CoreError>,
    persist: &PersistOutcome,
) -> Result<IntakeAck, CoreError> {
    validation?;
    match persist {
        PersistOutcome::Stored => Ok(IntakeAck {
            order_id,
            durable: true,
        }),
        PersistOutcome::Failed(reason) if STORE_FAILURE_IS_FATAL_TO_INTAKE => {
            Err(CoreError::Internal(reason.clone()))
        }
        PersistOutcome::Failed(_) => Ok(IntakeAck {
            order_id,
            durable: false,
        }),
    }
}

/// Whether staff notifications should be dispatched after the durability attempt.
///
/// Dispatch happens once the write attempt has finished, whatever its outcome.
/// Drafts that failed validation never reach this point.
pub fn should_notify(persist: &PersistOutcome) -> bool {
    persist.is_stored() || !STORE_FAILURE_IS_FATAL_TO_INTAKE
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::types::new_id;

    #[test]
    fn stored_order_is_acknowledged_as_durable() {
        let id = new_id();
        let ack = acknowledge(id, Ok(()), &PersistOutcome::Stored).unwrap();
        assert_eq!(ack.order_id, id);
        assert!(ack.durable);
    }

    #[test]
    fn store_failure_is_not_fatal_to_intake() {
        let id = new_id();
        let outcome = PersistOutcome::Failed("connection refused".into());
        let ack = acknowledge(id, Ok(()), &outcome).unwrap();
        assert_eq!(ack.order_id, id);
        assert!(!ack.durable);
        assert!(should_notify(&outcome));
    }

    #[test]
    fn validation_failure_wins_over_everything() {
        let err = acknowledge(
            new_id(),
            Err(CoreError::Validation("bad".into())),
            &PersistOutcome::Stored,
        )
        .unwrap_err();
        assert_matches!(err, CoreError::Validation(_));
    }

    #[test]
    fn durable_flag_is_not_serialized() {
        let ack = IntakeAck {
            order_id: new_id(),
            durable: false,
        };
        let json = serde_json::to_value(&ack).unwrap();
        assert!(json.get("durable").is_none());
        assert!(json["orderId"].is_string());
    }
}
