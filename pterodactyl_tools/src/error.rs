use thiserror::Error;

#[derive(Debug, Error)]
pub enum PterodactylApiError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("Panel credentials are not configured: {0}")]
    NotConfigured(String),
    #[error("The request to the panel timed out")]
    Timeout,
    #[error("Invalid REST request: {0}")]
    RestRequestError(String),
    #[error("Could not deserialize JSON: {0}")]
    JsonError(String),
    /// The panel rejected a new user as a duplicate (HTTP 422 on user creation).
    #[error("The panel rejected the request as a conflict. {0}")]
    Conflict(String),
    #[error("Query failed. Error {status}. {message}")]
    QueryError { status: u16, message: String },
}

impl From<reqwest::Error> for PterodactylApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else {
            Self::RestRequestError(e.to_string())
        }
    }
}
