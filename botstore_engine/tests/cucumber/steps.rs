use botstore_common::Rupiah;
use botstore_engine::{
    db_types::OrderStatusType,
    order_objects::{NewOrderRequest, PaymentEvent},
    traits::PaymentGatewayError,
    FallbackPolicy,
};
use chrono::Utc;
use cucumber::{given, then, when};

use crate::cucumber::{StoreSystem, StoreWorld};

fn gateway_down() -> Option<PaymentGatewayError> {
    Some(PaymentGatewayError::Unreachable("connection refused".to_string()))
}

#[given("a storefront with a working payment gateway")]
async fn working_storefront(world: &mut StoreWorld) {
    world.system = Some(StoreSystem::new(None, FallbackPolicy::default()).await);
}

#[given(expr = "a storefront whose payment gateway is down and the fallback policy is {word}")]
async fn broken_storefront(world: &mut StoreWorld, policy: String) {
    let policy = policy.parse::<FallbackPolicy>().expect("Unknown policy");
    world.system = Some(StoreSystem::new(gateway_down(), policy).await);
}

#[given("the panel cannot create servers")]
async fn panel_failure(world: &mut StoreWorld) {
    world.system().panel.set_server_failure(true);
}

#[when(expr = "'{word}' orders the '{word}' package")]
async fn place_order(world: &mut StoreWorld, owner: String, package: String) {
    match world.api().create_order(NewOrderRequest::new(package, owner.clone())).await {
        Ok(result) => {
            world.orders.insert(owner, result.order_id);
            world.last_error = None;
        },
        Err(e) => world.last_error = Some(e.to_string()),
    }
}

#[when(expr = "the gateway reports '{word}' for the order of '{word}'")]
async fn gateway_reports(world: &mut StoreWorld, status: String, owner: String) {
    let event = PaymentEvent::deposit(&world.order_for(&owner), status);
    let outcome = world.api().handle_payment_event(event).await.expect("Error handling payment event");
    world.last_outcomes = vec![outcome];
}

#[when(expr = "the gateway reports '{word}' for the order of '{word}' with {int} paid")]
async fn gateway_reports_payment(world: &mut StoreWorld, status: String, owner: String, paid: i64) {
    let mut event = PaymentEvent::deposit(&world.order_for(&owner), status);
    if let Some(data) = event.data.as_mut() {
        data.nominal = Some(Rupiah::from(paid));
    }
    let outcome = world.api().handle_payment_event(event).await.expect("Error handling payment event");
    world.last_outcomes = vec![outcome];
}

#[when(expr = "the gateway reports '{word}' for the order of '{word}' twice at once")]
async fn duplicate_reports(world: &mut StoreWorld, status: String, owner: String) {
    let id = world.order_for(&owner);
    world.system().panel.set_delay(std::time::Duration::from_millis(25));
    let api = world.api();
    let (a, b) = tokio::join!(
        api.handle_payment_event(PaymentEvent::deposit(&id, status.clone())),
        api.handle_payment_event(PaymentEvent::deposit(&id, status))
    );
    world.last_outcomes = vec![a.expect("first delivery failed"), b.expect("second delivery failed")];
}

#[when(expr = "{int} minutes pass")]
async fn time_passes(world: &mut StoreWorld, minutes: i64) {
    let later = Utc::now() + chrono::Duration::minutes(minutes);
    world.api().expire_stale_orders(later).await.expect("Error expiring orders");
}

#[then(expr = "the order for '{word}' is {word}")]
async fn order_status(world: &mut StoreWorld, owner: String, status: String) {
    let expected = status.parse::<OrderStatusType>().expect("Unknown status");
    let order = world.api().fetch_order(&world.order_for(&owner)).await.expect("Order not found");
    assert_eq!(order.status, expected);
    assert_eq!(order.provisioned.is_some(), expected == OrderStatusType::Success);
}

#[then(expr = "{int} server(s) has/have been created")]
async fn servers_created(world: &mut StoreWorld, count: usize) {
    assert_eq!(world.system().panel.servers().len(), count);
}

#[then(expr = "the server for '{word}' has {int} MB of memory")]
async fn server_memory(world: &mut StoreWorld, owner: String, memory: u64) {
    let order = world.api().fetch_order(&world.order_for(&owner)).await.expect("Order not found");
    let resource = order.provisioned.expect("No server was provisioned");
    assert_eq!(resource.memory_mb, memory);
}

#[then(expr = "the outcomes are {string}")]
async fn outcomes(world: &mut StoreWorld, expected: String) {
    let mut labels = world.last_outcomes.iter().map(|o| o.label()).collect::<Vec<_>>();
    labels.sort_unstable();
    let mut expected = expected.split(',').map(str::trim).collect::<Vec<_>>();
    expected.sort_unstable();
    assert_eq!(labels, expected);
}

#[then(expr = "the order for '{word}' has a placeholder QR code")]
async fn placeholder_qr(world: &mut StoreWorld, owner: String) {
    let id = world.order_for(&owner);
    let order = world.api().fetch_order(&id).await.expect("Order not found");
    assert_eq!(order.qr_string, Some(format!("ORDER-{id}")));
    assert!(order.note.expect("No note on order").starts_with("Placeholder payment"));
}

#[then(expr = "the order is rejected with {string}")]
async fn order_rejected(world: &mut StoreWorld, message: String) {
    let err = world.last_error.as_ref().expect("The order was not rejected");
    assert!(err.contains(&message), "'{err}' does not mention '{message}'");
}

#[then(expr = "{int} order(s) is/are failed")]
async fn failed_orders(world: &mut StoreWorld, count: usize) {
    use botstore_engine::OrderStore;
    let failed = world.api().store().fetch_orders_with_status(OrderStatusType::Failed).await.expect("Store error");
    assert_eq!(failed.len(), count);
}
