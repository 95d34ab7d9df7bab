//! Operational summaries derived from order snapshots.
//!
//! Everything here is a pure fold over data the caller already loaded; there
//! is no cache and no stored state. Months follow the shop's wall clock,
//! passed in as a fixed UTC offset.

use std::collections::BTreeMap;

use chrono::{Datelike, FixedOffset, NaiveTime, Offset, TimeZone, Utc};
use serde::Serialize;

use crate::status::OrderStatus;
use crate::types::{Amount, Timestamp};

/// The slice of an order the aggregations need.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderFact {
    pub status: OrderStatus,
    pub total_amount: Amount,
    pub created_at: Timestamp,
    pub items: Vec<ItemFact>,
}

/// One line item, labelled by product name (catalog name or custom description).
#[derive(Debug, Clone, PartialEq)]
pub struct ItemFact {
    pub label: String,
    pub quantity: i32,
}

/// Monthly figures shown on the staff dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    pub revenue: Amount,
    pub orders_count: usize,
    pub best_seller: Option<String>,
}

/// Western Indonesia Time, UTC+7.
pub const WIB_OFFSET_SECS: i32 = 7 * 3600;

/// Fixed offset for `secs` east of UTC, or UTC itself when out of range.
pub fn business_offset(secs: i32) -> FixedOffset {
    FixedOffset::east_opt(secs).unwrap_or_else(|| Utc.fix())
}

/// Local midnight on the first day of `now`'s month at `offset`, as a UTC instant.
pub fn month_start(now: Timestamp, offset: FixedOffset) -> Timestamp {
    let local = now.with_timezone(&offset).date_naive();
    let first = local.with_day(1).unwrap_or(local);
    offset
        .from_local_datetime(&first.and_time(NaiveTime::MIN))
        .single()
        .map_or(now, |start| start.with_timezone(&Utc))
}

/// Orders counted by the monthly figures: created this month and not cancelled.
fn counted_this_month<'a>(
    facts: &'a [OrderFact],
    now: Timestamp,
    offset: FixedOffset,
) -> impl Iterator<Item = &'a OrderFact> {
    let since = month_start(now, offset);
    facts
        .iter()
        .filter(move |f| f.created_at >= since && f.status != OrderStatus::Cancelled)
}

/// Sum of `total_amount` over this month's non-cancelled orders.
pub fn monthly_revenue(facts: &[OrderFact], now: Timestamp, offset: FixedOffset) -> Amount {
    counted_this_month(facts, now, offset).map(|f| f.total_amount).sum()
}

/// Number of this month's non-cancelled orders.
pub fn monthly_order_count(facts: &[OrderFact], now: Timestamp, offset: FixedOffset) -> usize {
    counted_this_month(facts, now, offset).count()
}

/// Product label with the highest item quantity this month.
///
/// Ties go to the label seen first, in the order `facts` is given. Returns
/// `None` when no counted order has items.
pub fn best_seller(facts: &[OrderFact], now: Timestamp, offset: FixedOffset) -> Option<String> {
    // (label, total quantity) in first-seen order.
    let mut tally: Vec<(&str, i64)> = Vec::new();
    for item in counted_this_month(facts, now, offset).flat_map(|f| f.items.iter()) {
        match tally.iter_mut().find(|(label, _)| *label == item.label) {
            Some((_, count)) => *count += i64::from(item.quantity),
            None => tally.push((item.label.as_str(), i64::from(item.quantity))),
        }
    }

    let mut best: Option<(&str, i64)> = None;
    for (label, count) in tally {
        if best.map_or(true, |(_, top)| count > top) {
            best = Some((label, count));
        }
    }
    best.map(|(label, _)| label.to_string())
}

/// Revenue, order count, and best seller over the same snapshot.
pub fn monthly_summary(facts: &[OrderFact], now: Timestamp, offset: FixedOffset) -> MonthlySummary {
    MonthlySummary {
        revenue: monthly_revenue(facts, now, offset),
        orders_count: monthly_order_count(facts, now, offset),
        best_seller: best_seller(facts, now, offset),
    }
}

// ---------------------------------------------------------------------------
// Status buckets
// ---------------------------------------------------------------------------

/// A caller-defined coarse grouping of statuses (e.g. "arranging").
#[derive(Debug, Clone, Copy)]
pub struct StatusGroup {
    pub name: &'static str,
    pub members: &'static [OrderStatus],
}

/// The four groups the staff dashboard shows.
pub const DASHBOARD_GROUPS: &[StatusGroup] = &[
    StatusGroup {
        name: "pending",
        members: &[OrderStatus::PendingPayment],
    },
    StatusGroup {
        name: "arranging",
        members: &[
            OrderStatus::InProduction,
            OrderStatus::DesignDraft,
            OrderStatus::WaitingApproval,
        ],
    },
    StatusGroup {
        name: "on_route",
        members: &[OrderStatus::OnDelivery, OrderStatus::ReadyToShip],
    },
    StatusGroup {
        name: "delivered",
        members: &[OrderStatus::Completed],
    },
];

/// Orders a staff member still has to act on before production can start.
pub const NEEDS_ATTENTION: StatusGroup = StatusGroup {
    name: "needs_attention",
    members: &[
        OrderStatus::PendingPayment,
        OrderStatus::DesignDraft,
        OrderStatus::WaitingApproval,
    ],
};

/// Count statuses into the given groups. Every group appears in the result,
/// zero if empty; statuses outside all groups are ignored.
pub fn status_buckets<I>(statuses: I, groups: &[StatusGroup]) -> BTreeMap<&'static str, usize>
where
    I: IntoIterator<Item = OrderStatus>,
{
    let mut buckets: BTreeMap<&'static str, usize> =
        groups.iter().map(|g| (g.name, 0)).collect();
    for status in statuses {
        for group in groups.iter().filter(|g| g.members.contains(&status)) {
            *buckets.entry(group.name).or_default() += 1;
        }
    }
    buckets
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use rust_decimal::Decimal;

    use super::*;

    fn utc() -> FixedOffset {
        business_offset(0)
    }

    fn at(rfc3339: &str) -> Timestamp {
        chrono::DateTime::parse_from_rfc3339(rfc3339)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn fact(status: OrderStatus, amount: i64, created_at: Timestamp, items: &[(&str, i32)]) -> OrderFact {
        OrderFact {
            status,
            total_amount: Decimal::from(amount),
            created_at,
            items: items
                .iter()
                .map(|(label, quantity)| ItemFact {
                    label: label.to_string(),
                    quantity: *quantity,
                })
                .collect(),
        }
    }

    #[test]
    fn month_start_is_first_day_at_midnight() {
        assert_eq!(
            month_start(at("2026-10-19T15:30:00Z"), utc()),
            at("2026-10-01T00:00:00Z")
        );
        assert_eq!(
            month_start(at("2026-10-01T00:00:00Z"), utc()),
            at("2026-10-01T00:00:00Z")
        );
    }

    #[test]
    fn month_start_follows_shop_wall_clock() {
        let wib = business_offset(WIB_OFFSET_SECS);
        // 01:00 WIB on Nov 1 is still Oct 31 in UTC.
        let now = at("2026-10-31T18:00:00Z");
        assert_eq!(month_start(now, wib), at("2026-10-31T17:00:00Z"));
        assert_eq!(month_start(now, utc()), at("2026-10-01T00:00:00Z"));
    }

    #[test]
    fn early_morning_order_on_the_first_counts_in_the_new_month() {
        let wib = business_offset(WIB_OFFSET_SECS);
        let now = at("2026-11-05T05:00:00Z");
        let facts = vec![
            // 03:00 WIB on Nov 1.
            fact(OrderStatus::Paid, 100, at("2026-10-31T20:00:00Z"), &[]),
            // 23:00 WIB on Oct 31.
            fact(OrderStatus::Paid, 40, at("2026-10-31T16:00:00Z"), &[]),
        ];
        assert_eq!(monthly_revenue(&facts, now, wib), Decimal::from(100));
        assert_eq!(monthly_order_count(&facts, now, wib), 1);
        assert_eq!(monthly_order_count(&facts, now, utc()), 0);
    }

    #[test]
    fn out_of_range_offset_falls_back_to_utc() {
        assert_eq!(business_offset(48 * 3600), utc());
    }

    #[test]
    fn revenue_excludes_cancelled_and_previous_months() {
        let now = at("2026-10-19T12:00:00Z");
        let facts = vec![
            fact(OrderStatus::Completed, 100, now - Duration::days(3), &[]),
            fact(OrderStatus::Cancelled, 200, now - Duration::days(2), &[]),
            fact(OrderStatus::Completed, 50, at("2026-09-28T10:00:00Z"), &[]),
        ];

        assert_eq!(monthly_revenue(&facts, now, utc()), Decimal::from(100));
        assert_eq!(monthly_order_count(&facts, now, utc()), 1);
    }

    #[test]
    fn placeholder_amounts_still_count_as_orders() {
        let now = at("2026-10-19T12:00:00Z");
        let facts = vec![
            fact(OrderStatus::PendingPayment, 0, now, &[]),
            fact(OrderStatus::Paid, 0, now, &[]),
        ];
        assert_eq!(monthly_revenue(&facts, now, utc()), Decimal::ZERO);
        assert_eq!(monthly_order_count(&facts, now, utc()), 2);
    }

    #[test]
    fn best_seller_tallies_quantities_by_label() {
        let now = at("2026-10-19T12:00:00Z");
        let facts = vec![
            fact(OrderStatus::Paid, 0, now, &[("Red Roses Bouquet", 1)]),
            fact(OrderStatus::Paid, 0, now, &[("Wedding Board", 1)]),
            fact(OrderStatus::Completed, 0, now, &[("Wedding Board", 2)]),
            // Cancelled quantities do not count.
            fact(OrderStatus::Cancelled, 0, now, &[("Red Roses Bouquet", 5)]),
        ];
        assert_eq!(best_seller(&facts, now, utc()).as_deref(), Some("Wedding Board"));
    }

    #[test]
    fn best_seller_ties_go_to_first_seen() {
        let now = at("2026-10-19T12:00:00Z");
        let facts = vec![
            fact(OrderStatus::Paid, 0, now, &[("Sympathy Board", 1)]),
            fact(OrderStatus::Paid, 0, now, &[("Sunflower Bouquet", 1)]),
        ];
        assert_eq!(best_seller(&facts, now, utc()).as_deref(), Some("Sympathy Board"));
    }

    #[test]
    fn best_seller_is_none_without_items() {
        let now = at("2026-10-19T12:00:00Z");
        assert_eq!(best_seller(&[], now, utc()), None);
        let facts = vec![fact(OrderStatus::Paid, 10, now, &[])];
        assert_eq!(best_seller(&facts, now, utc()), None);
    }

    #[test]
    fn status_buckets_report_every_group() {
        let buckets = status_buckets(
            [
                OrderStatus::PendingPayment,
                OrderStatus::DesignDraft,
                OrderStatus::InProduction,
                OrderStatus::ReadyToShip,
                OrderStatus::Cancelled,
            ],
            DASHBOARD_GROUPS,
        );
        assert_eq!(buckets["pending"], 1);
        assert_eq!(buckets["arranging"], 2);
        assert_eq!(buckets["on_route"], 1);
        assert_eq!(buckets["delivered"], 0);
        assert_eq!(buckets.len(), 4);
    }

    #[test]
    fn needs_attention_counts_unpaid_and_design_rounds() {
        let buckets = status_buckets(
            [
                OrderStatus::PendingPayment,
                OrderStatus::WaitingApproval,
                OrderStatus::Paid,
            ],
            &[NEEDS_ATTENTION],
        );
        assert_eq!(buckets["needs_attention"], 2);
    }
}
