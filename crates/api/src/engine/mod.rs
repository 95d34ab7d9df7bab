//! Order fulfillment and analytics services shared by the handlers.

mod analytics;
mod fulfillment;

pub use analytics::{AnalyticsReport, AnalyticsService, Dashboard, RecentOrder};
pub use fulfillment::{FulfillmentEngine, Intake};
