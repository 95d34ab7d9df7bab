//! Zero-sized repositories over Postgres, one per table.

mod delivery_repo;
mod order_item_repo;
mod order_repo;
mod product_repo;
mod store_config_repo;

pub use delivery_repo::DeliveryRepo;
pub use order_item_repo::OrderItemRepo;
pub use order_repo::OrderRepo;
pub use product_repo::ProductRepo;
pub use store_config_repo::StoreConfigRepo;
