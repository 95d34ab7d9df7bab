//! Display labels for order statuses, as shown on the staff dashboard and
//! the customer tracking page.

use florist_core::status::OrderStatus;

pub fn status_label(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::PendingPayment => "Menunggu Bayar",
        OrderStatus::Paid => "Lunas",
        OrderStatus::DesignDraft => "Draft Desain",
        OrderStatus::WaitingApproval => "Menunggu Persetujuan",
        OrderStatus::InProduction => "Dalam Produksi",
        OrderStatus::ReadyToShip => "Siap Kirim",
        OrderStatus::OnDelivery => "Sedang Dikirim",
        OrderStatus::Completed => "Selesai",
        OrderStatus::Cancelled => "Dibatalkan",
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use florist_core::status::ALL_STATUSES;

    use super::*;

    #[test]
    fn every_status_has_a_distinct_label() {
        let labels: HashSet<_> = ALL_STATUSES.into_iter().map(status_label).collect();
        assert_eq!(labels.len(), ALL_STATUSES.len());
    }
}
