use chrono::FixedOffset;

use crate::auth::session::SessionConfig;

/// Fallback deep-link destination when no `WHATSAPP_NUMBER` setting exists.
pub const DEFAULT_WHATSAPP_NUMBER: &str = "6281270121705";

/// Server configuration loaded from environment variables.
///
/// All fields except the session secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long shutdown waits for in-flight notifications (default: `10`).
    pub shutdown_timeout_secs: u64,
    /// Postgres URL. `None` selects the volatile in-memory store.
    pub database_url: Option<String>,
    /// Bootstrap admin password, used until a hash is stored in settings.
    pub admin_password: Option<String>,
    /// Admin session token settings.
    pub session: SessionConfig,
    /// Notification and redirect destinations.
    pub notify: NotifyConfig,
    /// The shop's wall-clock offset; monthly figures roll over at its midnight.
    pub business_offset: FixedOffset,
}

/// Environment-level fallbacks for destinations. StoreConfig settings win.
#[derive(Debug, Clone)]
pub struct NotifyConfig {
    pub whatsapp_number: String,
    pub webhook_url: Option<String>,
    pub notify_email: Option<String>,
    /// Bound on each notification channel attempt, in seconds.
    pub timeout_secs: u64,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            whatsapp_number: DEFAULT_WHATSAPP_NUMBER.to_string(),
            webhook_url: None,
            notify_email: None,
            timeout_secs: 10,
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                  |
    /// |-------------------------|--------------------------|
    /// | `HOST`                  | `0.0.0.0`                |
    /// | `PORT`                  | `3000`                   |
    /// | `CORS_ORIGINS`          | `http://localhost:3000`  |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                     |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `10`                     |
    /// | `DATABASE_URL`          | unset (in-memory store)  |
    /// | `ADMIN_PASSWORD`        | unset                    |
    /// | `WHATSAPP_NUMBER`       | `6281270121705`          |
    /// | `N8N_WEBHOOK_URL`       | unset                    |
    /// | `ORDER_NOTIFY_EMAIL`    | unset                    |
    /// | `NOTIFY_TIMEOUT_SECS`   | `10`                     |
    /// | `STORE_UTC_OFFSET_HOURS`| `7` (WIB)                |
    ///
    /// Session variables are documented on [`SessionConfig::from_env`].
    ///
    /// # Panics
    ///
    /// Panics on malformed numeric values or a missing `SESSION_SECRET`.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let notify = NotifyConfig {
            whatsapp_number: non_empty_var("WHATSAPP_NUMBER")
                .unwrap_or_else(|| DEFAULT_WHATSAPP_NUMBER.to_string()),
            webhook_url: non_empty_var("N8N_WEBHOOK_URL"),
            notify_email: non_empty_var("ORDER_NOTIFY_EMAIL"),
            timeout_secs: std::env::var("NOTIFY_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".into())
                .parse()
                .expect("NOTIFY_TIMEOUT_SECS must be a valid u64"),
        };

        let offset_hours: i32 = std::env::var("STORE_UTC_OFFSET_HOURS")
            .unwrap_or_else(|_| "7".into())
            .parse()
            .expect("STORE_UTC_OFFSET_HOURS must be a whole number of hours");
        let business_offset = FixedOffset::east_opt(offset_hours * 3600)
            .expect("STORE_UTC_OFFSET_HOURS must be between -23 and 23");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            database_url: non_empty_var("DATABASE_URL"),
            admin_password: non_empty_var("ADMIN_PASSWORD"),
            session: SessionConfig::from_env(),
            notify,
            business_offset,
        }
    }
}
