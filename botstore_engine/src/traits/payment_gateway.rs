use botstore_common::Rupiah;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::db_types::OrderId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositRequest {
    /// Echoed back by the gateway in payment events as `reff_id`.
    pub reference: OrderId,
    pub amount: Rupiah,
}

/// What the gateway returned for a new deposit. Any field may be missing. The engine fills in the gaps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GatewayDeposit {
    pub deposit_id: Option<String>,
    pub qr_url: Option<String>,
    pub qr_string: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Error)]
pub enum PaymentGatewayError {
    #[error("The payment gateway is not configured. {0}")]
    NotConfigured(String),
    #[error("The payment gateway could not be reached. {0}")]
    Unreachable(String),
    #[error("The payment gateway did not respond in time")]
    Timeout,
    #[error("The payment gateway rejected the request ({status}). {message}")]
    Rejected { status: u16, message: String },
    #[error("The payment gateway sent a response that could not be understood. {0}")]
    InvalidResponse(String),
}

/// Opens QRIS deposits with a payment provider.
#[allow(async_fn_in_trait)]
pub trait PaymentGateway {
    async fn open_deposit(&self, request: &DepositRequest) -> Result<GatewayDeposit, PaymentGatewayError>;
}
