//! HTTP-level tests for the dashboard and analytics reads.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_order, get_auth, patch_json_auth};
use serde_json::json;

async fn set_status(app: &common::TestApp, token: &str, id: &str, status: &str) {
    let response = patch_json_auth(
        app.router(),
        &format!("/api/v1/admin/orders/{id}/status"),
        token,
        json!({ "status": status }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn dashboard_reports_buckets_and_recent_orders() {
    let app = common::build_test_app();
    let token = app.admin_token();

    let pending = create_order(&app, "Ani").await;
    let arranging = create_order(&app, "Budi").await;
    let on_route = create_order(&app, "Citra").await;
    let cancelled = create_order(&app, "Dewi").await;
    set_status(&app, &token, &arranging, "DESIGN_DRAFT").await;
    set_status(&app, &token, &on_route, "READY_TO_SHIP").await;
    set_status(&app, &token, &cancelled, "CANCELLED").await;

    let response = get_auth(app.router(), "/api/v1/admin/dashboard", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let data = body_json(response).await["data"].clone();

    assert_eq!(data["ordersCount"], 3, "cancelled orders are not counted");
    assert_eq!(data["revenue"].as_f64(), Some(0.0));
    assert_eq!(data["bestSeller"], "BOARD_FLOWER");
    assert_eq!(data["statusBuckets"]["pending"], 1);
    assert_eq!(data["statusBuckets"]["arranging"], 1);
    assert_eq!(data["statusBuckets"]["on_route"], 1);
    assert_eq!(data["statusBuckets"]["delivered"], 0);

    let recent = data["recentOrders"].as_array().unwrap();
    assert_eq!(recent.len(), 4);
    assert_eq!(recent[3]["id"], pending.as_str());
    assert_eq!(recent[3]["statusLabel"], "Menunggu Bayar");
}

#[tokio::test]
async fn pending_count_covers_payment_and_design_rounds() {
    let app = common::build_test_app();
    let token = app.admin_token();

    create_order(&app, "Ani").await;
    let design = create_order(&app, "Budi").await;
    let paid = create_order(&app, "Citra").await;
    set_status(&app, &token, &design, "DESIGN_DRAFT").await;
    set_status(&app, &token, &design, "WAITING_APPROVAL").await;
    set_status(&app, &token, &paid, "PAID").await;

    let response = get_auth(app.router(), "/api/v1/admin/orders/pending-count", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["count"], 2);
}

#[tokio::test]
async fn analytics_counts_every_status() {
    let app = common::build_test_app();
    let token = app.admin_token();

    let a = create_order(&app, "Ani").await;
    create_order(&app, "Budi").await;
    set_status(&app, &token, &a, "COMPLETED").await;

    let response = get_auth(app.router(), "/api/v1/admin/analytics", &token).await;
    let data = body_json(response).await["data"].clone();
    assert_eq!(data["statusCounts"]["COMPLETED"], 1);
    assert_eq!(data["statusCounts"]["PENDING_PAYMENT"], 1);
    assert_eq!(data["ordersCount"], 2);
}
