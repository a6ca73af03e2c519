use std::fmt::Debug;

use botstore_common::Rupiah;
use chrono::{Duration, Utc};
use log::*;

use crate::{
    api::{
        errors::PaymentApiError,
        fallback::{placeholder_note, placeholder_qr, FallbackPolicy, PLACEHOLDER_WARNING},
        order_objects::DepositResult,
    },
    db_types::{Order, OrderStatusType, OrderUpdate},
    helpers::{generate_password, OwnerName},
    storage::OrderStore,
    traits::{DepositRequest, PaymentGateway, PaymentGatewayError},
};

/// How long a customer has to pay when the gateway does not say otherwise.
pub const DEFAULT_PAYMENT_WINDOW_MINUTES: i64 = 15;

/// `PaymentApi` opens payments for new orders. The order is always saved before the gateway is contacted, so that a
/// webhook can never arrive for an order we do not know about.
pub struct PaymentApi<S, G> {
    store: S,
    gateway: G,
    policy: FallbackPolicy,
    payment_window: Duration,
}

impl<S, G> Debug for PaymentApi<S, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PaymentApi ({})", self.policy)
    }
}

impl<S, G> PaymentApi<S, G> {
    pub fn new(store: S, gateway: G) -> Self {
        Self {
            store,
            gateway,
            policy: FallbackPolicy::default(),
            payment_window: Duration::minutes(DEFAULT_PAYMENT_WINDOW_MINUTES),
        }
    }

    pub fn with_policy(mut self, policy: FallbackPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_payment_window(mut self, window: Duration) -> Self {
        self.payment_window = window;
        self
    }

    pub fn policy(&self) -> FallbackPolicy {
        self.policy
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }
}

impl<S, G> PaymentApi<S, G>
where
    S: OrderStore,
    G: PaymentGateway,
{
    /// Creates a pending order for `owner` and opens a deposit of `amount` for it.
    ///
    /// If the gateway fails, the fallback policy decides whether the customer gets a placeholder payment or an error.
    pub async fn create_deposit(&self, amount: Rupiah, owner: &OwnerName) -> Result<DepositResult, PaymentApiError> {
        let default_expiry = Utc::now() + self.payment_window;
        let update = OrderUpdate {
            owner_name: Some(owner.to_string()),
            status: Some(OrderStatusType::Pending),
            amount: Some(amount),
            password: Some(generate_password()),
            expires_at: Some(default_expiry),
            ..Default::default()
        };
        let order = self.store.upsert_order(update).await?;
        debug!("💳️ Order {} created for {owner}. Requesting a deposit of {amount}", order.id);
        let request = DepositRequest { reference: order.id.clone(), amount };
        match self.gateway.open_deposit(&request).await {
            Ok(deposit) => {
                let expires_at = deposit.expires_at.unwrap_or(default_expiry);
                let update = OrderUpdate {
                    payment_reference: deposit.deposit_id,
                    qr_url: deposit.qr_url,
                    qr_string: deposit.qr_string,
                    expires_at: Some(expires_at),
                    ..OrderUpdate::for_order(&order.id)
                };
                let order = self.store.upsert_order(update).await?;
                info!("💳️ Deposit opened for order {}. Payment due by {expires_at}", order.id);
                Ok(DepositResult {
                    order_id: order.id,
                    qr_url: order.qr_url,
                    qr_string: order.qr_string,
                    amount,
                    expires_at,
                    warning: None,
                })
            },
            Err(e) => self.apply_fallback(order, e).await,
        }
    }

    async fn apply_fallback(&self, order: Order, err: PaymentGatewayError) -> Result<DepositResult, PaymentApiError> {
        match self.policy {
            FallbackPolicy::PlaceholderPayment => {
                warn!("💳️ Could not open a deposit for order {}. {err}. Issuing a placeholder payment", order.id);
                let (qr_string, qr_url) = placeholder_qr(&order.id);
                let update = OrderUpdate {
                    qr_url: Some(qr_url),
                    qr_string: Some(qr_string),
                    note: Some(placeholder_note(&err)),
                    ..OrderUpdate::for_order(&order.id)
                };
                let order = self.store.upsert_order(update).await?;
                let expires_at = order.expires_at.unwrap_or_else(|| order.created_at + self.payment_window);
                Ok(DepositResult {
                    order_id: order.id,
                    qr_url: order.qr_url,
                    qr_string: order.qr_string,
                    amount: order.amount,
                    expires_at,
                    warning: Some(PLACEHOLDER_WARNING.to_string()),
                })
            },
            FallbackPolicy::RejectOrder => {
                error!("💳️ Could not open a deposit for order {}. {err}. The order is rejected", order.id);
                let update = OrderUpdate::for_order(&order.id)
                    .with_status(OrderStatusType::Failed)
                    .with_note(format!("Payment creation failed: {err}"));
                self.store.upsert_order(update).await?;
                Err(PaymentApiError::GatewayError(err))
            },
        }
    }
}
