use std::fmt::Debug;

use botstore_common::helpers::parse_gateway_timestamp;
use chrono::{DateTime, Utc};
use log::*;

use crate::{
    api::{
        errors::OrderFlowError,
        order_objects::{DepositEventData, DepositResult, EventOutcome, NewOrderRequest, PaymentEvent},
        payment_api::PaymentApi,
        provisioning_api::ProvisioningApi,
    },
    catalog::{find_package, packages, Package},
    db_types::{Order, OrderId, OrderStatusType, OrderUpdate, StorageSummary},
    helpers::OwnerName,
    order_locks::OrderLocks,
    storage::OrderStore,
    traits::{PaymentGateway, ProvisioningPanel},
};

pub const DEPOSIT_EVENT: &str = "deposit";
pub const EXPIRED_NOTE: &str = "Payment window expired";

/// `OrderFlowApi` is the primary API for taking orders and reacting to payment events.
///
/// Every status change of an existing order happens while holding that order's lock, so duplicate or concurrent
/// webhook deliveries are handled one at a time and a paid order is provisioned at most once.
pub struct OrderFlowApi<S, G, P> {
    store: S,
    payments: PaymentApi<S, G>,
    provisioning: ProvisioningApi<S, P>,
    locks: OrderLocks,
}

impl<S, G, P> Debug for OrderFlowApi<S, G, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderFlowApi")
    }
}

impl<S, G, P> OrderFlowApi<S, G, P> {
    pub fn new(store: S, payments: PaymentApi<S, G>, provisioning: ProvisioningApi<S, P>) -> Self {
        Self { store, payments, provisioning, locks: OrderLocks::new() }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn payments(&self) -> &PaymentApi<S, G> {
        &self.payments
    }

    pub fn provisioning(&self) -> &ProvisioningApi<S, P> {
        &self.provisioning
    }

    pub fn packages(&self) -> &'static [Package] {
        packages()
    }
}

impl<S, G, P> OrderFlowApi<S, G, P>
where
    S: OrderStore,
    G: PaymentGateway,
    P: ProvisioningPanel,
{
    /// Validates a new order request and opens a payment for it.
    ///
    /// An owner may only have one live pending order. A pending order whose payment window has passed is failed here
    /// and does not block the new one.
    pub async fn create_order(&self, request: NewOrderRequest) -> Result<DepositResult, OrderFlowError> {
        let package_id = request.package.trim();
        let owner_name = request.owner_name.trim();
        if package_id.is_empty() || owner_name.is_empty() {
            return Err(OrderFlowError::InvalidInput("Package and username are required".to_string()));
        }
        let owner = owner_name.parse::<OwnerName>()?;
        let package = find_package(package_id).ok_or_else(|| OrderFlowError::UnknownPackage(package_id.to_string()))?;

        while let Some(pending) = self.store.fetch_pending_order_for_owner(owner.as_str()).await? {
            if !pending.is_abandoned(Utc::now()) {
                debug!("🔄️📦️ {owner} already has pending order {}", pending.id);
                return Err(OrderFlowError::PendingOrderExists(pending.id));
            }
            self.expire_order(&pending.id, Utc::now()).await?;
        }

        let deposit = self.payments.create_deposit(package.price, &owner).await?;
        let update = OrderUpdate::for_order(&deposit.order_id).with_package(package.selection());
        self.store.upsert_order(update).await?;
        info!("🔄️📦️ Order {} created: {} for {owner}", deposit.order_id, package.name);
        Ok(deposit)
    }

    pub async fn fetch_order(&self, id: &OrderId) -> Result<Order, OrderFlowError> {
        self.store.fetch_order(id).await?.ok_or_else(|| OrderFlowError::OrderNotFound(id.clone()))
    }

    pub async fn storage_summary(&self) -> Result<StorageSummary, OrderFlowError> {
        Ok(self.store.storage_summary().await?)
    }

    /// Applies a payment gateway notification to its order.
    ///
    /// | event status           | order status     | result                                             |
    /// |------------------------|------------------|----------------------------------------------------|
    /// | (not a deposit event)  | -                | `Ignored`                                          |
    /// | any                    | unknown          | `OrderNotFound` error                              |
    /// | any                    | success / failed | `AlreadyFinal`, nothing changes                    |
    /// | pending / processing   | other            | order set to pending, `Settling`                   |
    /// | success                | other            | paid, then `Provisioned` or `ProvisioningFailed`   |
    /// | anything else          | other            | order failed, `PaymentFailed`                      |
    ///
    /// Provisioning failures are recorded on the order and are not retried.
    pub async fn handle_payment_event(&self, event: PaymentEvent) -> Result<EventOutcome, OrderFlowError> {
        if event.event != DEPOSIT_EVENT {
            info!("🔔️ Ignoring '{}' event", event.event);
            return Ok(EventOutcome::Ignored { event: event.event });
        }
        let data = event.data.ok_or_else(|| OrderFlowError::InvalidEvent("deposit event has no data".to_string()))?;
        let reference = data.reff_id.trim();
        if reference.is_empty() {
            return Err(OrderFlowError::InvalidEvent("deposit event has no reff_id".to_string()));
        }
        let id = OrderId::from(reference);
        let _guard = self.locks.lock(&id).await;
        let order = self.store.fetch_order(&id).await?.ok_or_else(|| OrderFlowError::OrderNotFound(id.clone()))?;
        if order.status.is_terminal() {
            info!("🔔️ Order {id} is already {}. Ignoring '{}' notification", order.status, data.status);
            return Ok(EventOutcome::AlreadyFinal { order_id: id, status: order.status });
        }
        let gateway_status = data.status.trim().to_ascii_lowercase();
        match gateway_status.as_str() {
            "success" => self.settle_and_provision(order, data).await,
            "pending" | "processing" => {
                self.store.update_order_status(&id, OrderStatusType::Pending, None).await?;
                debug!("🔔️ Payment for order {id} is still {gateway_status}");
                Ok(EventOutcome::Settling(id))
            },
            _ => {
                let update = OrderUpdate::for_order(&id)
                    .with_status(OrderStatusType::Failed)
                    .with_note(format!("Payment {gateway_status}"));
                self.store.upsert_order(update).await?;
                info!("🔔️ Payment for order {id} failed with gateway status '{gateway_status}'");
                Ok(EventOutcome::PaymentFailed { order_id: id, gateway_status })
            },
        }
    }

    /// Must be called with the order lock held.
    async fn settle_and_provision(&self, order: Order, data: DepositEventData) -> Result<EventOutcome, OrderFlowError> {
        let id = order.id.clone();
        let paid_at = data.created_at.as_deref().and_then(parse_gateway_timestamp).unwrap_or_else(Utc::now);
        let update = OrderUpdate {
            status: Some(OrderStatusType::Processing),
            payment_reference: data.id,
            paid_amount: data.nominal,
            fee: data.fee,
            paid_at: Some(paid_at),
            ..OrderUpdate::for_order(&id)
        };
        let order = self.store.upsert_order(update).await?;
        info!("🔔️ Order {id} is paid ({}). Provisioning", order.paid_amount.unwrap_or(order.amount));
        match self.provisioning.provision(&order).await {
            Ok(resource) => {
                let order = self
                    .store
                    .update_order_status(&id, OrderStatusType::Success, Some(resource))
                    .await?
                    .ok_or_else(|| OrderFlowError::OrderNotFound(id.clone()))?;
                info!("🔔️ Order {id} is complete");
                Ok(EventOutcome::Provisioned(Box::new(order)))
            },
            Err(e) => {
                let reason = e.to_string();
                error!("🔔️ Provisioning failed for paid order {id}. {reason}");
                let update = OrderUpdate::for_order(&id)
                    .with_status(OrderStatusType::Failed)
                    .with_note(format!("Provisioning failed: {reason}"));
                self.store.upsert_order(update).await?;
                Ok(EventOutcome::ProvisioningFailed { order_id: id, reason })
            },
        }
    }

    /// Fails every pending order whose payment window closed before `now`. Returns the ids of the orders that were
    /// expired.
    pub async fn expire_stale_orders(&self, now: DateTime<Utc>) -> Result<Vec<OrderId>, OrderFlowError> {
        let pending = self.store.fetch_orders_with_status(OrderStatusType::Pending).await?;
        let mut expired = Vec::new();
        for order in pending.into_iter().filter(|o| o.is_abandoned(now)) {
            if self.expire_order(&order.id, now).await? {
                expired.push(order.id);
            }
        }
        if !expired.is_empty() {
            info!("⏰️ {} pending orders expired", expired.len());
        }
        Ok(expired)
    }

    /// Fails the order if it is still an abandoned pending order once its lock is held.
    async fn expire_order(&self, id: &OrderId, now: DateTime<Utc>) -> Result<bool, OrderFlowError> {
        let _guard = self.locks.lock(id).await;
        match self.store.fetch_order(id).await? {
            Some(order) if order.is_abandoned(now) => {
                let update = OrderUpdate::for_order(id).with_status(OrderStatusType::Failed).with_note(EXPIRED_NOTE);
                self.store.upsert_order(update).await?;
                debug!("⏰️ Order {id} expired");
                Ok(true)
            },
            _ => Ok(false),
        }
    }
}
