use actix_web::{http::StatusCode, test::TestRequest, web};
use botstore_engine::{
    db_types::{OrderId, OrderStatusType},
    order_objects::{NewOrderRequest, PaymentEvent},
    FallbackPolicy,
    OrderStore,
};
use serde_json::json;

use super::{
    helpers::{init_app, send, test_api},
    mocks::{broken_gateway, idle_panel, working_gateway, working_panel, MockGateway},
};
use crate::config::{ServerOptions, WebhookConfig};

fn new_order(body: serde_json::Value) -> TestRequest {
    TestRequest::post().uri("/orders").set_json(body)
}

#[actix_web::test]
async fn create_order() {
    let _ = env_logger::try_init().ok();
    let api = web::Data::new(test_api(working_gateway(), idle_panel(), FallbackPolicy::default()));
    let app = init_app!(api);
    let (status, body) = send(&app, new_order(json!({"package": "standard", "owner_name": "alice_01"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Order created successfully");
    assert_eq!(body["amount"], 750);
    let id = body["order_id"].as_str().unwrap();
    assert!(id.starts_with("WS"));
    assert_eq!(body["qr_string"], format!("QRIS-{id}"));
    assert!(body.get("warning").is_none());

    let order = api.fetch_order(&OrderId::from(id)).await.unwrap();
    assert_eq!(order.status, OrderStatusType::Pending);
    assert_eq!(order.package.unwrap().id, "standard");
}

#[actix_web::test]
async fn username_is_accepted_as_owner_name() {
    let api = web::Data::new(test_api(working_gateway(), idle_panel(), FallbackPolicy::default()));
    let app = init_app!(api);
    let (status, body) = send(&app, new_order(json!({"package": "basic", "username": "bob_the_bot"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["amount"], 500);
}

#[actix_web::test]
async fn invalid_orders_are_rejected() {
    let _ = env_logger::try_init().ok();
    let mut gateway = MockGateway::new();
    gateway.expect_open_deposit().never();
    let api = web::Data::new(test_api(gateway, idle_panel(), FallbackPolicy::default()));
    let app = init_app!(api);

    let (status, body) = send(&app, new_order(json!({"package": "", "owner_name": "alice_01"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Package and username are required");

    let (status, body) = send(&app, new_order(json!({"package": "platinum", "owner_name": "alice_01"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid package selected");

    let (status, body) = send(&app, new_order(json!({"package": "basic", "owner_name": "al"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Username must be 3-16 characters");

    let (status, body) = send(&app, new_order(json!({"package": "basic", "owner_name": "alice-01"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Username can only contain letters, numbers, and underscores");

    let req = TestRequest::post().uri("/orders").insert_header(("content-type", "application/json")).set_payload("{");
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Could not read request body"));
}

#[actix_web::test]
async fn one_pending_order_per_owner() {
    let api = web::Data::new(test_api(working_gateway(), idle_panel(), FallbackPolicy::default()));
    let app = init_app!(api);
    let (_, first) = send(&app, new_order(json!({"package": "basic", "owner_name": "carol"}))).await;
    let (status, body) = send(&app, new_order(json!({"package": "premium", "owner_name": "carol"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "You have a pending order. Please complete it first.");
    assert_eq!(body["order_id"], first["order_id"]);

    // Someone else is not affected
    let (status, _) = send(&app, new_order(json!({"package": "premium", "owner_name": "dave"}))).await;
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn placeholder_payment_when_gateway_fails() {
    let _ = env_logger::try_init().ok();
    let api = web::Data::new(test_api(broken_gateway(), idle_panel(), FallbackPolicy::PlaceholderPayment));
    let app = init_app!(api);
    let (status, body) = send(&app, new_order(json!({"package": "basic", "owner_name": "erin"}))).await;
    assert_eq!(status, StatusCode::OK);
    let id = body["order_id"].as_str().unwrap();
    assert_eq!(body["qr_string"], format!("ORDER-{id}"));
    assert!(body["qr_url"].as_str().unwrap().starts_with("https://api.qrserver.com/v1/create-qr-code/"));
    assert!(body["warning"].is_string());
}

#[actix_web::test]
async fn rejected_order_when_gateway_fails() {
    let api = web::Data::new(test_api(broken_gateway(), idle_panel(), FallbackPolicy::RejectOrder));
    let app = init_app!(api);
    let (status, body) = send(&app, new_order(json!({"package": "basic", "owner_name": "frank"}))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("Payment creation failed"));
    assert!(body.get("details").is_none());

    let failed = api.store().fetch_orders_with_status(OrderStatusType::Failed).await.unwrap();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].owner_name, "frank");
}

#[actix_web::test]
async fn error_details_in_development_mode() {
    let api = web::Data::new(test_api(broken_gateway(), idle_panel(), FallbackPolicy::RejectOrder));
    let options = ServerOptions { development_mode: true, ..Default::default() };
    let app = init_app!(api, options, WebhookConfig::new("secret", true));
    let (status, body) = send(&app, new_order(json!({"package": "basic", "owner_name": "grace"}))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["details"].as_str().unwrap().contains("connection refused"));
}

#[actix_web::test]
async fn fetch_order_status() {
    let api = web::Data::new(test_api(working_gateway(), idle_panel(), FallbackPolicy::default()));
    let app = init_app!(api);
    let deposit = api.create_order(NewOrderRequest::new("premium", "heidi")).await.unwrap();

    let (status, body) = send(&app, TestRequest::get().uri(&format!("/orders/{}", deposit.order_id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let order = &body["order"];
    assert_eq!(order["id"], deposit.order_id.as_str());
    assert_eq!(order["status"], "pending");
    assert_eq!(order["owner_name"], "heidi");
    assert_eq!(order["package"]["id"], "premium");
    assert_eq!(order["amount"], 1000);
    assert!(order["qr_url"].is_string());
    assert!(order.get("server").is_none());
    assert!(order.get("credentials").is_none());
    assert!(order.get("payment_reference").is_none());
    assert!(order.get("password").is_none());
}

#[actix_web::test]
async fn fetch_unknown_or_blank_order() {
    let api = web::Data::new(test_api(working_gateway(), idle_panel(), FallbackPolicy::default()));
    let app = init_app!(api);
    let (status, body) = send(&app, TestRequest::get().uri("/orders/WS0000")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());

    let (status, _) = send(&app, TestRequest::get().uri("/orders/%20%20")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn provisioned_order_shows_server_and_credentials() {
    let api = web::Data::new(test_api(working_gateway(), working_panel(), FallbackPolicy::default()));
    let app = init_app!(api);
    let deposit = api.create_order(NewOrderRequest::new("standard", "ivan_42")).await.unwrap();
    api.handle_payment_event(PaymentEvent::deposit(&deposit.order_id, "success")).await.unwrap();

    let (status, body) = send(&app, TestRequest::get().uri(&format!("/orders/{}", deposit.order_id))).await;
    assert_eq!(status, StatusCode::OK);
    let order = &body["order"];
    assert_eq!(order["status"], "success");
    assert_eq!(order["server"]["identifier"], "abc123");
    assert_eq!(order["server"]["panel_url"], "https://panel.test/server/abc123");
    assert_eq!(order["server"]["memory_mb"], 2048);
    assert_eq!(order["credentials"]["username"], "ivan_42");
    assert_eq!(order["credentials"]["email"], "ivan_42@gmail.com");
    assert_eq!(order["credentials"]["password"].as_str().unwrap().len(), 12);
    assert!(order.get("paid_amount").is_none());
    assert!(order.get("fee").is_none());
}
