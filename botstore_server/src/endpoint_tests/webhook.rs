use actix_web::{http::StatusCode, test::TestRequest, web};
use botstore_engine::{
    db_types::{OrderId, OrderStatusType},
    order_objects::NewOrderRequest,
    traits::PanelError,
    FallbackPolicy,
};
use serde_json::json;

use super::{
    helpers::{deposit_event, init_app, send, signed_webhook, test_api, TestApi},
    mocks::{idle_panel, working_gateway, working_panel, MockPanel},
};
use crate::config::{ServerOptions, WebhookConfig};

async fn order_for(api: &TestApi, owner: &str) -> OrderId {
    api.create_order(NewOrderRequest::new("standard", owner)).await.expect("order is created").order_id
}

#[actix_web::test]
async fn unsigned_webhooks_are_unauthorized() {
    let _ = env_logger::try_init().ok();
    let api = web::Data::new(test_api(working_gateway(), idle_panel(), FallbackPolicy::default()));
    let app = init_app!(api);
    let id = order_for(&api, "alice").await;
    let body = deposit_event(id.as_str(), "success");

    let req = TestRequest::post().uri("/payments/webhook").set_payload(body.clone());
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let req = TestRequest::post()
        .uri("/payments/webhook")
        .insert_header(("X-ATL-Signature", "bm90IHRoZSByaWdodCBzaWduYXR1cmU="))
        .set_payload(body);
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Nothing happened to the order
    let order = api.fetch_order(&id).await.unwrap();
    assert_eq!(order.status, OrderStatusType::Pending);
}

#[actix_web::test]
async fn signature_checks_can_be_disabled() {
    let api = web::Data::new(test_api(working_gateway(), idle_panel(), FallbackPolicy::default()));
    let app = init_app!(api, ServerOptions::default(), WebhookConfig::new("", false));
    let id = order_for(&api, "bob").await;
    let req = TestRequest::post().uri("/payments/webhook").set_payload(deposit_event(id.as_str(), "pending"));
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "settling");
}

#[actix_web::test]
async fn empty_secret_rejects_everything() {
    let api = web::Data::new(test_api(working_gateway(), idle_panel(), FallbackPolicy::default()));
    let app = init_app!(api, ServerOptions::default(), WebhookConfig::new("", true));
    let body = json!({"event": "ping"}).to_string();
    let signature = crate::helpers::calculate_hmac("", body.as_bytes()).unwrap();
    let req =
        TestRequest::post().uri("/payments/webhook").insert_header(("X-ATL-Signature", signature)).set_payload(body);
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn malformed_bodies_are_bad_requests() {
    let api = web::Data::new(test_api(working_gateway(), idle_panel(), FallbackPolicy::default()));
    let app = init_app!(api);
    for body in ["this is not json", "[]", r#"{"data": {"reff_id": "WS1"}}"#, r#"{"event": "deposit"}"#] {
        let (status, response) = send(&app, signed_webhook(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body}");
        assert!(response["error"].is_string());
    }
}

#[actix_web::test]
async fn other_events_are_ignored() {
    let api = web::Data::new(test_api(working_gateway(), idle_panel(), FallbackPolicy::default()));
    let app = init_app!(api);
    let (status, body) = send(&app, signed_webhook(r#"{"event": "withdraw", "data": {"reff_id": "WS1"}}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"received": true, "status": "ignored"}));
}

#[actix_web::test]
async fn unknown_orders_are_not_found() {
    let api = web::Data::new(test_api(working_gateway(), idle_panel(), FallbackPolicy::default()));
    let app = init_app!(api);
    let (status, _) = send(&app, signed_webhook(&deposit_event("WS123", "success"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn successful_payment_provisions_a_server() {
    let _ = env_logger::try_init().ok();
    let api = web::Data::new(test_api(working_gateway(), working_panel(), FallbackPolicy::default()));
    let app = init_app!(api);
    let id = order_for(&api, "carol").await;

    let (status, body) = send(&app, signed_webhook(&deposit_event(id.as_str(), "success"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"received": true, "status": "provisioned", "order_id": id.as_str()}));

    let order = api.fetch_order(&id).await.unwrap();
    assert_eq!(order.status, OrderStatusType::Success);
    assert_eq!(order.payment_reference.as_deref(), Some("DEP-1"));
    assert_eq!(order.paid_amount.map(|a| a.value()), Some(750));
    assert_eq!(order.provisioned.unwrap().identifier, "abc123");

    // A repeated delivery is acknowledged but changes nothing. The panel mock only allows one server.
    let (status, body) = send(&app, signed_webhook(&deposit_event(id.as_str(), "success"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "already_final");
}

#[actix_web::test]
async fn settling_and_failed_payments() {
    let api = web::Data::new(test_api(working_gateway(), idle_panel(), FallbackPolicy::default()));
    let app = init_app!(api);
    let id = order_for(&api, "dave").await;

    let (status, body) = send(&app, signed_webhook(&deposit_event(id.as_str(), "processing"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "settling");
    assert_eq!(api.fetch_order(&id).await.unwrap().status, OrderStatusType::Pending);

    let (status, body) = send(&app, signed_webhook(&deposit_event(id.as_str(), "cancel"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "payment_failed");
    let order = api.fetch_order(&id).await.unwrap();
    assert_eq!(order.status, OrderStatusType::Failed);
    assert_eq!(order.note.as_deref(), Some("Payment cancel"));
}

#[actix_web::test]
async fn provisioning_failures_are_acknowledged() {
    let _ = env_logger::try_init().ok();
    let mut panel = MockPanel::new();
    panel.expect_create_account().times(1).returning(|account| {
        Ok(botstore_engine::traits::PanelAccount {
            id: 42,
            username: account.username.clone(),
            email: account.email.clone(),
        })
    });
    panel
        .expect_create_server()
        .times(1)
        .returning(|_| Err(PanelError::Rejected { status: 500, message: "no free allocation".into() }));
    let api = web::Data::new(test_api(working_gateway(), panel, FallbackPolicy::default()));
    let app = init_app!(api);
    let id = order_for(&api, "erin").await;

    let (status, body) = send(&app, signed_webhook(&deposit_event(id.as_str(), "success"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "provisioning_failed");
    assert_eq!(body["order_id"], id.as_str());

    let order = api.fetch_order(&id).await.unwrap();
    assert_eq!(order.status, OrderStatusType::Failed);
    assert!(order.note.unwrap().starts_with("Provisioning failed"));
}
