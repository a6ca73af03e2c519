use botstore_common::Rupiah;
use chrono::{DateTime, Utc};
use log::*;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::db_types::{Order, OrderId, OrderStatusType};

//--------------------------------------   NewOrderRequest     ---------------------------------------------------------
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrderRequest {
    #[serde(default)]
    pub package: String,
    #[serde(default, alias = "username")]
    pub owner_name: String,
}

impl NewOrderRequest {
    pub fn new<P: Into<String>, O: Into<String>>(package: P, owner_name: O) -> Self {
        Self { package: package.into(), owner_name: owner_name.into() }
    }
}

//--------------------------------------    DepositResult      ---------------------------------------------------------
/// What the customer needs in order to pay for a new order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositResult {
    pub order_id: OrderId,
    pub qr_url: Option<String>,
    pub qr_string: Option<String>,
    pub amount: Rupiah,
    pub expires_at: DateTime<Utc>,
    /// Set when a placeholder payment was issued instead of a real one.
    pub warning: Option<String>,
}

//--------------------------------------    PaymentEvent       ---------------------------------------------------------
/// A webhook notification from the payment gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentEvent {
    pub event: String,
    #[serde(default)]
    pub data: Option<DepositEventData>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DepositEventData {
    /// The order id we sent when opening the deposit.
    #[serde(default)]
    pub reff_id: String,
    /// The gateway's own deposit id.
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub nominal: Option<Rupiah>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub fee: Option<Rupiah>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub created_at: Option<String>,
}

impl PaymentEvent {
    pub fn deposit<S: Into<String>>(reff_id: &OrderId, status: S) -> Self {
        let data = DepositEventData { reff_id: reff_id.to_string(), status: status.into(), ..Default::default() };
        Self { event: "deposit".to_string(), data: Some(data) }
    }
}

/// Accepts strings and numbers.
fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Accepts integers, floats without a fractional part, and strings of either. Anything else is treated as absent.
fn lenient_amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Rupiah>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    let amount = match &value {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)).map(Rupiah::from),
        Some(Value::String(s)) => s.parse::<Rupiah>().ok(),
        _ => None,
    };
    if amount.is_none() && value.as_ref().map(|v| !v.is_null()).unwrap_or(false) {
        warn!("🔔️ Ignoring unreadable amount in payment event: {value:?}");
    }
    Ok(amount)
}

//--------------------------------------     EventOutcome      ---------------------------------------------------------
/// What handling a payment event did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    /// Not a deposit event.
    Ignored { event: String },
    /// The payment has not settled yet.
    Settling(OrderId),
    PaymentFailed { order_id: OrderId, gateway_status: String },
    /// The order had already reached a final state. Nothing was changed.
    AlreadyFinal { order_id: OrderId, status: OrderStatusType },
    Provisioned(Box<Order>),
    ProvisioningFailed { order_id: OrderId, reason: String },
}

impl EventOutcome {
    pub fn order_id(&self) -> Option<&OrderId> {
        match self {
            Self::Ignored { .. } => None,
            Self::Settling(id) => Some(id),
            Self::PaymentFailed { order_id, .. } => Some(order_id),
            Self::AlreadyFinal { order_id, .. } => Some(order_id),
            Self::Provisioned(order) => Some(&order.id),
            Self::ProvisioningFailed { order_id, .. } => Some(order_id),
        }
    }

    /// A short machine-readable name for the outcome.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ignored { .. } => "ignored",
            Self::Settling(_) => "settling",
            Self::PaymentFailed { .. } => "payment_failed",
            Self::AlreadyFinal { .. } => "already_final",
            Self::Provisioned(_) => "provisioned",
            Self::ProvisioningFailed { .. } => "provisioning_failed",
        }
    }
}
