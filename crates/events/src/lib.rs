//! Order notifications for the florist service.
//!
//! - [`notice`]: the [`OrderNotice`] envelope and webhook JSON format
//! - [`delivery`]: the SMTP e-mail and HTTP webhook channels
//! - [`dispatcher`]: independent, bounded fan-out to both channels

pub mod delivery;
pub mod dispatcher;
pub mod notice;

pub use delivery::{DeliveryError, NotificationChannel};
pub use dispatcher::{ChannelOutcome, Destinations, DispatchReport, NotificationDispatcher};
pub use notice::{OrderEvent, OrderNotice};
