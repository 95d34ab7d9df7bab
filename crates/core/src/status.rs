//! Order status enum and transition rules.
//!
//! Operators may skip forward steps (an unpaid board can go straight into
//! production). `COMPLETED` and `CANCELLED` are terminal.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Canonical order status. Closed set; stored as its SCREAMING_SNAKE_CASE name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    PendingPayment,
    Paid,
    DesignDraft,
    WaitingApproval,
    InProduction,
    ReadyToShip,
    OnDelivery,
    Completed,
    Cancelled,
}

/// Every status, in pipeline order.
pub const ALL_STATUSES: [OrderStatus; 9] = [
    OrderStatus::PendingPayment,
    OrderStatus::Paid,
    OrderStatus::DesignDraft,
    OrderStatus::WaitingApproval,
    OrderStatus::InProduction,
    OrderStatus::ReadyToShip,
    OrderStatus::OnDelivery,
    OrderStatus::Completed,
    OrderStatus::Cancelled,
];

impl OrderStatus {
    /// Status every new order starts in.
    pub const INITIAL: OrderStatus = OrderStatus::PendingPayment;

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::PendingPayment => "PENDING_PAYMENT",
            OrderStatus::Paid => "PAID",
            OrderStatus::DesignDraft => "DESIGN_DRAFT",
            OrderStatus::WaitingApproval => "WAITING_APPROVAL",
            OrderStatus::InProduction => "IN_PRODUCTION",
            OrderStatus::ReadyToShip => "READY_TO_SHIP",
            OrderStatus::OnDelivery => "ON_DELIVERY",
            OrderStatus::Completed => "COMPLETED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }

    /// `COMPLETED` and `CANCELLED` accept no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_STATUSES
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid order status '{s}'. Must be one of: {}",
                    ALL_STATUSES.map(OrderStatus::as_str).join(", ")
                ))
            })
    }
}

impl TryFrom<String> for OrderStatus {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ---------------------------------------------------------------------------
// Status transitions
// ---------------------------------------------------------------------------

/// Returns the set of statuses that `from` may move to.
///
/// Transition rules:
/// - `PENDING_PAYMENT`  -> `PAID`, `DESIGN_DRAFT`, `IN_PRODUCTION`, `ON_DELIVERY`, `COMPLETED`, `CANCELLED`
/// - `PAID`             -> `DESIGN_DRAFT`, `IN_PRODUCTION`, `READY_TO_SHIP`, `ON_DELIVERY`, `COMPLETED`, `CANCELLED`
/// - `DESIGN_DRAFT`     -> `WAITING_APPROVAL`, `IN_PRODUCTION`, `ON_DELIVERY`, `COMPLETED`, `CANCELLED`
/// - `WAITING_APPROVAL` -> `DESIGN_DRAFT` (revision), `IN_PRODUCTION`, `ON_DELIVERY`, `COMPLETED`, `CANCELLED`
/// - `IN_PRODUCTION`    -> `READY_TO_SHIP`, `ON_DELIVERY`, `COMPLETED`, `CANCELLED`
/// - `READY_TO_SHIP`    -> `ON_DELIVERY`, `COMPLETED`, `CANCELLED`
/// - `ON_DELIVERY`      -> `COMPLETED`, `CANCELLED`
/// - `COMPLETED`, `CANCELLED` -> nothing
pub fn valid_transitions(from: OrderStatus) -> &'static [OrderStatus] {
    use OrderStatus::*;
    match from {
        PendingPayment => &[Paid, DesignDraft, InProduction, OnDelivery, Completed, Cancelled],
        Paid => &[DesignDraft, InProduction, ReadyToShip, OnDelivery, Completed, Cancelled],
        DesignDraft => &[WaitingApproval, InProduction, OnDelivery, Completed, Cancelled],
        WaitingApproval => &[DesignDraft, InProduction, OnDelivery, Completed, Cancelled],
        InProduction => &[ReadyToShip, OnDelivery, Completed, Cancelled],
        ReadyToShip => &[OnDelivery, Completed, Cancelled],
        OnDelivery => &[Completed, Cancelled],
        Completed | Cancelled => &[],
    }
}

/// What a store must do to honour a requested transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionPlan {
    /// Write the new status (and bump `updated_at`).
    Apply { from: OrderStatus, to: OrderStatus },
    /// The order is already in the requested status; touch nothing.
    Unchanged(OrderStatus),
}

impl TransitionPlan {
    /// The status the order holds once the plan is carried out.
    pub fn resulting_status(&self) -> OrderStatus {
        match *self {
            TransitionPlan::Apply { to, .. } => to,
            TransitionPlan::Unchanged(status) => status,
        }
    }

    pub fn is_noop(&self) -> bool {
        matches!(self, TransitionPlan::Unchanged(_))
    }
}

/// Decide whether `current -> target` is allowed.
///
/// Re-requesting the current status is always a no-op success, which is what
/// makes repeated `COMPLETED` / `CANCELLED` requests idempotent. Anything else
/// out of a terminal state, or off the graph, is a [`CoreError::Conflict`].
pub fn plan_transition(
    current: OrderStatus,
    target: OrderStatus,
) -> Result<TransitionPlan, CoreError> {
    if current == target {
        return Ok(TransitionPlan::Unchanged(current));
    }
    if current.is_terminal() {
        return Err(CoreError::Conflict(format!(
            "Order is already {current}; cannot move it to {target}"
        )));
    }
    if valid_transitions(current).contains(&target) {
        Ok(TransitionPlan::Apply {
            from: current,
            to: target,
        })
    } else {
        Err(CoreError::Conflict(format!(
            "Cannot transition order from {current} to {target}. Allowed transitions: {}",
            valid_transitions(current)
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
