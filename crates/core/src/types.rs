/// Every entity id is an opaque UUID generated by the service (v7, time-ordered).
pub type EntityId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Monetary amounts in rupiah. `0` is the "negotiated out-of-band" placeholder.
pub type Amount = rust_decimal::Decimal;

/// Generate a fresh entity id.
pub fn new_id() -> EntityId {
    uuid::Uuid::now_v7()
}
