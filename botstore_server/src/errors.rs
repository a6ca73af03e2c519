use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use botstore_engine::{db_types::OrderId, OrderFlowError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    /// Something went wrong behind the API. `details` is only ever shown to clients in development mode.
    #[error("{message}")]
    BackendError { message: String, details: Option<String> },
    /// A request that was understood but failed validation. The message is shown to the customer as-is.
    #[error("{0}")]
    ValidationError(String),
    #[error("You have a pending order. Please complete it first.")]
    PendingOrderExists(OrderId),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("Could not read request path: {0}")]
    InvalidRequestPath(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
}

impl ServerError {
    /// Converts an engine error into a response error. Backend failures carry their debug representation as
    /// `details` when `development_mode` is set.
    pub fn from_flow_error(e: OrderFlowError, development_mode: bool) -> Self {
        match e {
            OrderFlowError::InvalidInput(_) | OrderFlowError::UnknownPackage(_) | OrderFlowError::InvalidOwnerName(_) => {
                Self::ValidationError(e.to_string())
            },
            OrderFlowError::PendingOrderExists(id) => Self::PendingOrderExists(id),
            OrderFlowError::OrderNotFound(id) => Self::NoRecordFound(format!("Order {id} does not exist")),
            OrderFlowError::InvalidEvent(_) => Self::InvalidRequestBody(e.to_string()),
            OrderFlowError::StorageError(_) | OrderFlowError::PaymentError(_) => {
                let details = development_mode.then(|| format!("{e:?}"));
                Self::BackendError { message: e.to_string(), details }
            },
        }
    }
}

impl From<OrderFlowError> for ServerError {
    fn from(e: OrderFlowError) -> Self {
        Self::from_flow_error(e, false)
    }
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::PendingOrderExists(_) => StatusCode::BAD_REQUEST,
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::InvalidRequestPath(_) => StatusCode::BAD_REQUEST,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            Self::PendingOrderExists(id) => json!({ "error": self.to_string(), "order_id": id }),
            Self::BackendError { details: Some(details), .. } => json!({ "error": self.to_string(), "details": details }),
            _ => json!({ "error": self.to_string() }),
        };
        HttpResponse::build(self.status_code()).insert_header(ContentType::json()).body(body.to_string())
    }
}
