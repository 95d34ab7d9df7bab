//! HTTP-level tests for order intake, tracking, and fulfillment.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_order, get, get_auth, order_body, patch_json_auth, post_json,
    post_json_auth,
};
use serde_json::json;

// ---------------------------------------------------------------------------
// Intake
// ---------------------------------------------------------------------------

/// A board order from the form lands as PENDING_PAYMENT with a zero total,
/// and the webhook gets a `new_order` payload naming the customer.
#[tokio::test]
async fn board_order_is_recorded_and_announced() {
    let app = common::build_test_app();

    let response = post_json(app.router(), "/api/v1/orders", order_body("Budi")).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let order_id = json["data"]["orderId"].as_str().unwrap().to_string();
    let redirect = json["data"]["redirectUrl"].as_str().unwrap();
    assert!(redirect.starts_with("https://wa.me/6281200000000?text="));

    let response = get(app.router(), &format!("/api/v1/track/{order_id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let order = body_json(response).await["data"].clone();
    assert_eq!(order["id"], order_id.as_str());
    assert_eq!(order["status"], "PENDING_PAYMENT");
    assert_eq!(order["totalAmount"].as_f64(), Some(0.0));
    assert_eq!(order["items"][0]["productName"], "BOARD_FLOWER");
    assert_eq!(order["items"][0]["quantity"], 1);
    assert!(order["delivery"].is_null());

    app.drain_notifications().await;
    let webhook = app.webhook.sent();
    assert_eq!(webhook.len(), 1);
    let (url, payload) = &webhook[0];
    assert_eq!(url, common::WEBHOOK_URL);
    assert_eq!(payload["event"], "new_order");
    assert_eq!(payload["orderId"], order_id.as_str());
    assert_eq!(payload["customer"]["name"], "Budi");
    assert_eq!(payload["product"]["type"], "BOARD_FLOWER");

    let email = app.email.sent();
    assert_eq!(email.len(), 1);
    assert_eq!(email[0].0, common::NOTIFY_EMAIL);
}

/// A store outage does not fail intake: 201, redirect, notifications.
#[tokio::test]
async fn store_outage_still_acknowledges_order() {
    let app = common::build_test_app();
    app.store.set_offline(true);

    let response = post_json(app.router(), "/api/v1/orders", order_body("Sari")).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert!(json["data"]["orderId"].is_string());
    assert!(json["data"]["redirectUrl"]
        .as_str()
        .unwrap()
        .starts_with("https://wa.me/"));

    app.drain_notifications().await;
    assert_eq!(app.webhook.sent().len(), 1);
    assert_eq!(app.email.sent().len(), 1);

    app.store.set_offline(false);
    assert!(app.snapshot().await.orders.is_empty());
}

/// A failing webhook neither blocks the e-mail nor changes the response.
#[tokio::test]
async fn webhook_failure_does_not_affect_email_or_response() {
    let app = common::build_test_app_with(true);

    let response = post_json(app.router(), "/api/v1/orders", order_body("Budi")).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    app.drain_notifications().await;
    assert_eq!(app.webhook.sent().len(), 1, "webhook was attempted");
    assert_eq!(app.email.sent().len(), 1, "email still sent");
}

#[tokio::test]
async fn missing_required_fields_return_field_errors() {
    let app = common::build_test_app();

    let mut body = order_body("Budi");
    body["recipientName"] = json!("   ");
    body["deliveryAddress"] = json!("Jl");
    let response = post_json(app.router(), "/api/v1/orders", body).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["fields"]["recipientName"].is_array());
    assert!(json["fields"]["deliveryAddress"].is_array());

    app.drain_notifications().await;
    assert!(app.webhook.sent().is_empty(), "rejected drafts are not announced");
    assert!(app.snapshot().await.orders.is_empty());
}

#[tokio::test]
async fn unparseable_delivery_time_is_a_validation_error() {
    let app = common::build_test_app();

    let mut body = order_body("Budi");
    body["deliveryTime"] = json!("tomorrow-ish");
    let response = post_json(app.router(), "/api/v1/orders", body).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn unknown_catalog_product_is_not_found() {
    let app = common::build_test_app();

    let mut body = order_body("Budi");
    body["productId"] = json!(uuid::Uuid::now_v7());
    let response = post_json(app.router(), "/api/v1/orders", body).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn tracking_unknown_order_is_not_found() {
    let app = common::build_test_app();
    let response = get(
        app.router(),
        &format!("/api/v1/track/{}", uuid::Uuid::now_v7()),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Fulfillment
// ---------------------------------------------------------------------------

#[tokio::test]
async fn staff_can_walk_an_order_through_production() {
    let app = common::build_test_app();
    let token = app.admin_token();
    let id = create_order(&app, "Budi").await;

    for status in ["PAID", "DESIGN_DRAFT", "WAITING_APPROVAL", "IN_PRODUCTION", "ON_DELIVERY"] {
        let response = patch_json_auth(
            app.router(),
            &format!("/api/v1/admin/orders/{id}/status"),
            &token,
            json!({ "status": status }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK, "-> {status}");
        let json = body_json(response).await;
        assert_eq!(json["data"]["status"], status);
        assert!(json["data"]["statusLabel"].is_string());
    }
}

/// Leaving a terminal status is a 409 and touches nothing.
#[tokio::test]
async fn terminal_order_rejects_other_statuses() {
    let app = common::build_test_app();
    let token = app.admin_token();
    let id = create_order(&app, "Budi").await;
    let uri = format!("/api/v1/admin/orders/{id}/status");

    let response = patch_json_auth(app.router(), &uri, &token, json!({ "status": "CANCELLED" })).await;
    assert_eq!(response.status(), StatusCode::OK);
    let before = app.snapshot().await;

    for target in ["PAID", "IN_PRODUCTION", "COMPLETED", "PENDING_PAYMENT"] {
        let response = patch_json_auth(app.router(), &uri, &token, json!({ "status": target })).await;
        assert_eq!(response.status(), StatusCode::CONFLICT, "CANCELLED -> {target}");
        assert_eq!(body_json(response).await["code"], "CONFLICT");
    }

    assert_eq!(app.snapshot().await, before);
}

#[tokio::test]
async fn unknown_status_name_is_a_validation_error() {
    let app = common::build_test_app();
    let token = app.admin_token();
    let id = create_order(&app, "Budi").await;

    let response = patch_json_auth(
        app.router(),
        &format!("/api/v1/admin/orders/{id}/status"),
        &token,
        json!({ "status": "SHIPPED" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

/// Re-requesting COMPLETED succeeds and never creates a second delivery.
#[tokio::test]
async fn repeated_completion_is_idempotent() {
    let app = common::build_test_app();
    let token = app.admin_token();
    let id = create_order(&app, "Budi").await;

    let complete_uri = format!("/api/v1/admin/orders/{id}/complete");
    let response = post_json_auth(
        app.router(),
        &complete_uri,
        &token,
        json!({ "proofPhotoUrl": "https://cdn.florist.test/proof/1.jpg" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let first = body_json(response).await["data"].clone();
    assert_eq!(first["status"], "COMPLETED");
    assert_eq!(
        first["delivery"]["proofPhotoUrl"],
        "https://cdn.florist.test/proof/1.jpg"
    );

    let status_uri = format!("/api/v1/admin/orders/{id}/status");
    for _ in 0..2 {
        let response =
            patch_json_auth(app.router(), &status_uri, &token, json!({ "status": "COMPLETED" })).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
    let response = post_json_auth(app.router(), &complete_uri, &token, json!({})).await;
    assert_eq!(response.status(), StatusCode::OK);
    let last = body_json(response).await["data"].clone();

    assert_eq!(last["delivery"]["id"], first["delivery"]["id"]);
    assert_eq!(last["delivery"]["proofPhotoUrl"], first["delivery"]["proofPhotoUrl"]);
    assert_eq!(last["updatedAt"], first["updatedAt"]);
}

/// If the delivery record cannot be written, the status does not change.
#[tokio::test]
async fn failed_delivery_write_leaves_order_untouched() {
    let app = common::build_test_app();
    let token = app.admin_token();
    let id = create_order(&app, "Budi").await;
    let before = app.snapshot().await;

    app.store.fail_delivery_writes(true);
    let response = post_json_auth(
        app.router(),
        &format!("/api/v1/admin/orders/{id}/complete"),
        &token,
        json!({ "proofPhotoUrl": "https://cdn.florist.test/proof/2.jpg" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(app.snapshot().await, before);

    let response = get(app.router(), &format!("/api/v1/track/{id}")).await;
    let order = body_json(response).await["data"].clone();
    assert_eq!(order["status"], "PENDING_PAYMENT");
    assert!(order["delivery"].is_null());
}

#[tokio::test]
async fn completion_is_announced_once() {
    let app = common::build_test_app();
    let token = app.admin_token();
    let id = create_order(&app, "Budi").await;
    let uri = format!("/api/v1/admin/orders/{id}/complete");

    let body = json!({ "proofPhotoUrl": "https://cdn.florist.test/proof/3.jpg" });
    post_json_auth(app.router(), &uri, &token, body.clone()).await;
    post_json_auth(app.router(), &uri, &token, body).await;
    app.drain_notifications().await;

    let events: Vec<_> = app
        .webhook
        .sent()
        .into_iter()
        .map(|(_, payload)| payload)
        .collect();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0]["event"], "new_order");
    assert_eq!(events[1]["event"], "order_completed");
    assert_eq!(
        events[1]["completion"]["proofPhotoUrl"],
        "https://cdn.florist.test/proof/3.jpg"
    );
    assert!(events[1]["completion"]["arrivedTime"].is_string());
}

/// An order moved to COMPLETED by a plain status change still takes its proof.
#[tokio::test]
async fn proof_after_plain_completion_is_recorded() {
    let app = common::build_test_app();
    let token = app.admin_token();
    let id = create_order(&app, "Budi").await;

    let response = patch_json_auth(
        app.router(),
        &format!("/api/v1/admin/orders/{id}/status"),
        &token,
        json!({ "status": "COMPLETED" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let plain = body_json(response).await["data"].clone();
    assert!(plain["delivery"].is_null());

    let uri = format!("/api/v1/admin/orders/{id}/complete");
    let response = post_json_auth(
        app.router(),
        &uri,
        &token,
        json!({ "proofPhotoUrl": "https://cdn.florist.test/proof/late.jpg" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let completed = body_json(response).await["data"].clone();
    assert_eq!(completed["status"], "COMPLETED");
    assert_eq!(
        completed["delivery"]["proofPhotoUrl"],
        "https://cdn.florist.test/proof/late.jpg"
    );
    assert_eq!(completed["updatedAt"], plain["updatedAt"]);

    let response = post_json_auth(
        app.router(),
        &uri,
        &token,
        json!({ "proofPhotoUrl": "https://cdn.florist.test/proof/other.jpg" }),
    )
    .await;
    let again = body_json(response).await["data"].clone();
    assert_eq!(again["delivery"], completed["delivery"]);

    app.drain_notifications().await;
    let completions = app
        .webhook
        .sent()
        .into_iter()
        .filter(|(_, payload)| payload["event"] == "order_completed")
        .count();
    assert_eq!(completions, 1);
}

#[tokio::test]
async fn admin_listing_and_detail() {
    let app = common::build_test_app();
    let token = app.admin_token();
    let first = create_order(&app, "Budi").await;
    let second = create_order(&app, "Sari").await;

    let response = get_auth(app.router(), "/api/v1/admin/orders", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let list = body_json(response).await["data"].clone();
    assert_eq!(list.as_array().unwrap().len(), 2);
    assert_eq!(list[0]["id"], second.as_str(), "newest first");

    let response = get_auth(app.router(), "/api/v1/admin/orders?limit=1", &token).await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 1);

    let response = get_auth(app.router(), &format!("/api/v1/admin/orders/{first}"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let detail = body_json(response).await["data"].clone();
    assert_eq!(detail["recipientName"], "Budi");
    assert_eq!(detail["items"][0]["greetingType"], "Happy Wedding");
}
