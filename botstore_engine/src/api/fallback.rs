use std::{fmt::Display, str::FromStr};

use thiserror::Error;

use crate::db_types::OrderId;

pub const PLACEHOLDER_QR_SERVICE: &str = "https://api.qrserver.com/v1/create-qr-code/";
pub const PLACEHOLDER_WARNING: &str = "Placeholder payment issued. Check the payment gateway configuration";

/// What to do with a new order when the payment gateway cannot open a deposit for it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FallbackPolicy {
    /// Keep the order and hand out a QR code that only encodes the order id. Useful while the gateway is being set
    /// up; nobody can actually pay it.
    #[default]
    PlaceholderPayment,
    /// Fail the order and report the gateway error.
    RejectOrder,
}

#[derive(Debug, Clone, Error)]
#[error("Unknown payment fallback policy: {0}. Use 'placeholder' or 'reject'")]
pub struct FallbackPolicyParseError(String);

impl FromStr for FallbackPolicy {
    type Err = FallbackPolicyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "placeholder" => Ok(Self::PlaceholderPayment),
            "reject" => Ok(Self::RejectOrder),
            _ => Err(FallbackPolicyParseError(s.to_string())),
        }
    }
}

impl Display for FallbackPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PlaceholderPayment => write!(f, "placeholder"),
            Self::RejectOrder => write!(f, "reject"),
        }
    }
}

/// The QR payload and image link for a placeholder payment.
pub fn placeholder_qr(id: &OrderId) -> (String, String) {
    let qr_string = format!("ORDER-{id}");
    let qr_url = format!("{PLACEHOLDER_QR_SERVICE}?size=300x300&data={qr_string}&format=png");
    (qr_string, qr_url)
}

pub fn placeholder_note<E: Display>(reason: E) -> String {
    format!("Placeholder payment - gateway error: {reason}")
}
