use std::sync::Arc;

use florist_db::Store;
use florist_events::NotificationDispatcher;

use crate::config::ServerConfig;
use crate::engine::{AnalyticsService, FulfillmentEngine};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything is behind an `Arc` or is itself a handle.
#[derive(Clone)]
pub struct AppState {
    /// Order, product, and settings storage.
    pub store: Arc<dyn Store>,
    pub config: Arc<ServerConfig>,
    /// Background fan-out of order notices. Also the handle drained at shutdown.
    pub dispatcher: NotificationDispatcher,
    pub engine: Arc<FulfillmentEngine>,
    pub analytics: Arc<AnalyticsService>,
}

impl AppState {
    /// Wire the engine and analytics service over a store and dispatcher.
    pub fn new(
        store: Arc<dyn Store>,
        config: ServerConfig,
        dispatcher: NotificationDispatcher,
    ) -> Self {
        let engine = FulfillmentEngine::new(
            Arc::clone(&store),
            dispatcher.clone(),
            config.notify.clone(),
        );
        let analytics = AnalyticsService::new(Arc::clone(&store), config.business_offset);
        Self {
            store,
            config: Arc::new(config),
            dispatcher,
            engine: Arc::new(engine),
            analytics: Arc::new(analytics),
        }
    }
}
