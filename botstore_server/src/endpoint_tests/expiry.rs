use std::time::Duration;

use botstore_engine::{
    db_types::OrderStatusType,
    order_objects::NewOrderRequest,
    traits::GatewayDeposit,
    FallbackPolicy,
    EXPIRED_NOTE,
};
use chrono::Utc;

use super::{
    helpers::test_api,
    mocks::{idle_panel, working_gateway, MockGateway},
};
use crate::expiry_worker::start_expiry_worker;

#[actix_web::test]
async fn worker_fails_stale_orders() {
    let _ = env_logger::try_init().ok();
    let mut gateway = MockGateway::new();
    gateway.expect_open_deposit().returning(|req| {
        Ok(GatewayDeposit {
            deposit_id: Some(format!("DEP-{}", req.reference)),
            qr_string: Some("QRIS".into()),
            expires_at: Some(Utc::now() - chrono::Duration::minutes(1)),
            ..Default::default()
        })
    });
    let api = std::sync::Arc::new(test_api(gateway, idle_panel(), FallbackPolicy::default()));
    let stale = api.create_order(NewOrderRequest::new("basic", "alice")).await.unwrap().order_id;

    let handle = start_expiry_worker(api.clone(), Duration::from_millis(10));
    tokio::time::sleep(Duration::from_millis(100)).await;
    handle.abort();

    let order = api.fetch_order(&stale).await.unwrap();
    assert_eq!(order.status, OrderStatusType::Failed);
    assert_eq!(order.note.as_deref(), Some(EXPIRED_NOTE));
}

#[actix_web::test]
async fn worker_leaves_live_orders_alone() {
    let api = std::sync::Arc::new(test_api(working_gateway(), idle_panel(), FallbackPolicy::default()));
    let live = api.create_order(NewOrderRequest::new("basic", "bob")).await.unwrap().order_id;

    let handle = start_expiry_worker(api.clone(), Duration::from_millis(10));
    tokio::time::sleep(Duration::from_millis(50)).await;
    handle.abort();

    assert_eq!(api.fetch_order(&live).await.unwrap().status, OrderStatusType::Pending);
}
