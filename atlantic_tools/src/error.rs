use thiserror::Error;

#[derive(Debug, Error)]
pub enum AtlanticApiError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("Payment gateway credentials are not configured: {0}")]
    NotConfigured(String),
    #[error("The request to the payment gateway timed out")]
    Timeout,
    #[error("Invalid REST request: {0}")]
    RestRequestError(String),
    #[error("Could not deserialize JSON: {0}")]
    JsonError(String),
    #[error("Query failed. Error {status}. {message}")]
    QueryError { status: u16, message: String },
    #[error("Unrecognised response from the payment gateway: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for AtlanticApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else {
            Self::RestRequestError(e.to_string())
        }
    }
}
