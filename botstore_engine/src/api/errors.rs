use thiserror::Error;

use crate::{
    db_types::OrderId,
    helpers::OwnerNameError,
    storage::StorageError,
    traits::{PanelError, PaymentGatewayError},
};

#[derive(Debug, Clone, Error)]
pub enum PaymentApiError {
    #[error("{0}")]
    StorageError(#[from] StorageError),
    #[error("Payment creation failed. {0}")]
    GatewayError(#[from] PaymentGatewayError),
}

#[derive(Debug, Clone, Error)]
pub enum ProvisioningError {
    #[error("{0}")]
    StorageError(#[from] StorageError),
    #[error("{0}")]
    PanelError(#[from] PanelError),
    #[error("The panel reported that account {0} exists, but it could not be found")]
    AccountNotFound(String),
    #[error("The panel account {0} exists, but its password is not on record")]
    UnknownAccountPassword(String),
    #[error("Order {0} has no credentials to provision with")]
    MissingCredentials(OrderId),
}

#[derive(Debug, Clone, Error)]
pub enum OrderFlowError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("Invalid package selected")]
    UnknownPackage(String),
    #[error("{0}")]
    InvalidOwnerName(#[from] OwnerNameError),
    #[error("You have a pending order. Please complete it first.")]
    PendingOrderExists(OrderId),
    #[error("Order {0} not found")]
    OrderNotFound(OrderId),
    #[error("Invalid payment event. {0}")]
    InvalidEvent(String),
    #[error("{0}")]
    StorageError(#[from] StorageError),
    #[error("{0}")]
    PaymentError(#[from] PaymentApiError),
}
