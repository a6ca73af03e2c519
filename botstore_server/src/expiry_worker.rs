use std::{sync::Arc, time::Duration};

use botstore_engine::{db_types::OrderId, OrderFlowApi, OrderStore, PaymentGateway, ProvisioningPanel};
use chrono::Utc;
use log::*;
use tokio::task::JoinHandle;

/// Starts the expiry worker, which fails pending orders whose payment window has closed. Do not await the returned
/// JoinHandle, as it will run indefinitely.
///
/// The worker runs on the current actix runtime, so this must be called from within one.
pub fn start_expiry_worker<S, G, P>(api: Arc<OrderFlowApi<S, G, P>>, interval: Duration) -> JoinHandle<()>
where
    S: OrderStore + 'static,
    G: PaymentGateway + 'static,
    P: ProvisioningPanel + 'static,
{
    actix_web::rt::spawn(async move {
        let mut timer = tokio::time::interval(interval);
        info!("🕰️ Pending order expiry worker started. Running every {}s", interval.as_secs());
        loop {
            timer.tick().await;
            trace!("🕰️ Running pending order expiry job");
            match api.expire_stale_orders(Utc::now()).await {
                Ok(expired) if expired.is_empty() => trace!("🕰️ No orders expired"),
                Ok(expired) => {
                    info!("🕰️ {} orders expired", expired.len());
                    debug!("🕰️ Expired orders: {}", order_list(&expired));
                },
                Err(e) => {
                    error!("🕰️ Error running pending order expiry job: {e}");
                },
            }
        }
    })
}

fn order_list(orders: &[OrderId]) -> String {
    orders.iter().map(|id| id.to_string()).collect::<Vec<String>>().join(", ")
}
