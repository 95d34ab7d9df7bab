#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use chrono::Utc;
use florist_core::analytics::{business_offset, WIB_OFFSET_SECS};
use florist_db::store::{OrderStore, ProductStore, SettingsStore};
use florist_db::MemoryStore;
use florist_events::delivery::WebhookError;
use florist_events::{DeliveryError, NotificationChannel, NotificationDispatcher, OrderNotice};
use http_body_util::BodyExt;
use tower::ServiceExt;

use florist_api::auth::session::{issue_token, SessionConfig};
use florist_api::config::{NotifyConfig, ServerConfig};
use florist_api::router::build_app_router;
use florist_api::state::AppState;

pub const ADMIN_PASSWORD: &str = "florist-admin";
pub const WEBHOOK_URL: &str = "https://hooks.florist.test/orders";
pub const NOTIFY_EMAIL: &str = "staff@florist.test";

/// Build a test `ServerConfig` with safe defaults and fixed destinations.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        database_url: None,
        admin_password: Some(ADMIN_PASSWORD.to_string()),
        session: SessionConfig {
            secret: "integration-test-secret-long-enough".to_string(),
            ttl_secs: 3600,
        },
        notify: NotifyConfig {
            whatsapp_number: "6281200000000".to_string(),
            webhook_url: Some(WEBHOOK_URL.to_string()),
            notify_email: Some(NOTIFY_EMAIL.to_string()),
            timeout_secs: 5,
        },
        business_offset: business_offset(WIB_OFFSET_SECS),
    }
}

// ---------------------------------------------------------------------------
// Recording notification channel
// ---------------------------------------------------------------------------

/// A channel that records every notice it is handed, then succeeds or fails.
pub struct RecordingChannel {
    name: &'static str,
    fail: bool,
    sent: Mutex<Vec<(String, serde_json::Value)>>,
}

impl RecordingChannel {
    pub fn new(name: &'static str, fail: bool) -> Arc<Self> {
        Arc::new(Self {
            name,
            fail,
            sent: Mutex::new(Vec::new()),
        })
    }

    /// `(destination, notice JSON)` for every attempt so far.
    pub fn sent(&self) -> Vec<(String, serde_json::Value)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationChannel for RecordingChannel {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn send(&self, destination: &str, notice: &OrderNotice) -> Result<(), DeliveryError> {
        let json = serde_json::to_value(notice).unwrap();
        self.sent.lock().unwrap().push((destination.to_string(), json));
        if self.fail {
            Err(WebhookError::HttpStatus(502).into())
        } else {
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// Test application
// ---------------------------------------------------------------------------

/// The full router over an in-memory store, with handles for assertions.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub store: Arc<MemoryStore>,
    pub email: Arc<RecordingChannel>,
    pub webhook: Arc<RecordingChannel>,
}

/// Snapshot of everything a request could mutate.
#[derive(Debug, PartialEq)]
pub struct StoreSnapshot {
    pub orders: Vec<florist_db::models::order::OrderDetail>,
    pub products: Vec<florist_db::models::product::Product>,
    pub settings: Vec<florist_db::models::store_config::StoreSetting>,
}

impl TestApp {
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// A valid admin session token.
    pub fn admin_token(&self) -> String {
        issue_token(Utc::now(), &self.state.config.session).unwrap()
    }

    /// Wait for every background notification to finish.
    pub async fn drain_notifications(&self) {
        assert!(
            self.state.dispatcher.shutdown(Duration::from_secs(5)).await,
            "notifications did not finish"
        );
    }

    pub async fn snapshot(&self) -> StoreSnapshot {
        let mut orders = Vec::new();
        for order in self.store.list_orders(None).await.unwrap() {
            orders.push(self.store.find_order(order.id).await.unwrap().unwrap());
        }
        StoreSnapshot {
            orders,
            products: self.store.list_products().await.unwrap(),
            settings: self.store.list_settings().await.unwrap(),
        }
    }
}

/// Build the application with both channels succeeding.
pub fn build_test_app() -> TestApp {
    build_test_app_with(false)
}

/// Build the application; `webhook_fails` makes every webhook send fail.
pub fn build_test_app_with(webhook_fails: bool) -> TestApp {
    let config = test_config();
    let store = Arc::new(MemoryStore::new());
    let email = RecordingChannel::new("email", false);
    let webhook = RecordingChannel::new("webhook", webhook_fails);

    let dispatcher = NotificationDispatcher::new(
        Some(email.clone() as Arc<dyn NotificationChannel>),
        Some(webhook.clone() as Arc<dyn NotificationChannel>),
        Duration::from_secs(config.notify.timeout_secs),
    );
    let state = AppState::new(store.clone(), config.clone(), dispatcher);
    let router = build_app_router(state.clone(), &config);

    TestApp {
        router,
        state,
        store,
        email,
        webhook,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).unwrap())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn patch_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// The customer form body from the order page.
pub fn order_body(recipient: &str) -> serde_json::Value {
    serde_json::json!({
        "recipientName": recipient,
        "recipientPhone": "081234567890",
        "deliveryAddress": "Jl. X No.1",
        "productType": "BOARD_FLOWER",
        "deliveryTime": (Utc::now() + chrono::Duration::days(1)).to_rfc3339(),
        "greetingType": "Happy Wedding",
        "senderName": "Keluarga Budi"
    })
}

/// Create an order through the public endpoint and return its id.
pub async fn create_order(app: &TestApp, recipient: &str) -> String {
    let response = post_json(app.router(), "/api/v1/orders", order_body(recipient)).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    let json = body_json(response).await;
    json["data"]["orderId"].as_str().unwrap().to_string()
}
