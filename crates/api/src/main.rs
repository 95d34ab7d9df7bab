use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use florist_db::{MemoryStore, PgStore, Store};
use florist_events::delivery::email::{EmailConfig, EmailDelivery};
use florist_events::delivery::webhook::WebhookDelivery;
use florist_events::{NotificationChannel, NotificationDispatcher};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use florist_api::config::ServerConfig;
use florist_api::router::build_app_router;
use florist_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "florist_api=debug,florist_events=debug,florist_db=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Store ---
    let store: Arc<dyn Store> = match config.database_url.as_deref() {
        Some(database_url) => {
            let pool = florist_db::create_pool(database_url)
                .await
                .expect("Failed to connect to database");
            tracing::info!("Database connection pool created");

            florist_db::health_check(&pool)
                .await
                .expect("Database health check failed");
            tracing::info!("Database health check passed");

            florist_db::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");
            tracing::info!("Database migrations applied");

            Arc::new(PgStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using the in-memory store; orders will not survive a restart");
            Arc::new(MemoryStore::new())
        }
    };

    // --- Notification channels ---
    let email: Option<Arc<dyn NotificationChannel>> = match EmailConfig::from_env() {
        Some(email_config) => {
            tracing::info!(smtp_host = %email_config.smtp_host, "E-mail notifications enabled");
            Some(Arc::new(EmailDelivery::new(email_config)))
        }
        None => {
            tracing::info!("SMTP_HOST not set, e-mail notifications disabled");
            None
        }
    };
    let webhook: Option<Arc<dyn NotificationChannel>> = match WebhookDelivery::new() {
        Ok(delivery) => Some(Arc::new(delivery)),
        Err(e) => {
            tracing::error!(error = %e, "Failed to build webhook client, webhook notifications disabled");
            None
        }
    };
    let dispatcher = NotificationDispatcher::new(
        email,
        webhook,
        Duration::from_secs(config.notify.timeout_secs),
    );

    // --- App state and router ---
    let shutdown_timeout = Duration::from_secs(config.shutdown_timeout_secs);
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    let state = AppState::new(store, config.clone(), dispatcher);
    let dispatcher = state.dispatcher.clone();
    let app = build_app_router(state, &config);

    // --- Start server ---
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, draining notifications");
    if dispatcher.shutdown(shutdown_timeout).await {
        tracing::info!("All notifications finished");
    } else {
        tracing::warn!(
            timeout_secs = shutdown_timeout.as_secs(),
            "Notifications still in flight at shutdown deadline"
        );
    }

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
