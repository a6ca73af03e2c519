use std::fmt::Debug;

use atlantic_tools::{AtlanticApi, AtlanticApiError, AtlanticConfig};
use botstore_engine::traits::{DepositRequest, GatewayDeposit, PaymentGateway, PaymentGatewayError};
use log::*;

/// [`PaymentGateway`] backed by the Atlantic H2H deposit API.
#[derive(Clone)]
pub struct AtlanticGateway {
    api: AtlanticApi,
}

impl Debug for AtlanticGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AtlanticGateway({})", self.api.config().base_url)
    }
}

impl AtlanticGateway {
    pub fn new(config: AtlanticConfig) -> Result<Self, AtlanticApiError> {
        let api = AtlanticApi::new(config)?;
        Ok(Self { api })
    }
}

impl PaymentGateway for AtlanticGateway {
    async fn open_deposit(&self, request: &DepositRequest) -> Result<GatewayDeposit, PaymentGatewayError> {
        let deposit = self.api.create_deposit(request.reference.as_str(), request.amount).await.map_err(|e| {
            warn!("💳️ Could not open a deposit for order {}. {e}", request.reference);
            gateway_error(e)
        })?;
        Ok(GatewayDeposit {
            deposit_id: deposit.deposit_id,
            qr_url: deposit.qr_url,
            qr_string: deposit.qr_string,
            expires_at: deposit.expires_at,
        })
    }
}

pub fn gateway_error(e: AtlanticApiError) -> PaymentGatewayError {
    match e {
        AtlanticApiError::Initialization(s) | AtlanticApiError::NotConfigured(s) => PaymentGatewayError::NotConfigured(s),
        AtlanticApiError::Timeout => PaymentGatewayError::Timeout,
        AtlanticApiError::RestRequestError(s) => PaymentGatewayError::Unreachable(s),
        AtlanticApiError::JsonError(s) | AtlanticApiError::InvalidResponse(s) => PaymentGatewayError::InvalidResponse(s),
        AtlanticApiError::QueryError { status, message } => PaymentGatewayError::Rejected { status, message },
    }
}
