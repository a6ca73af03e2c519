use botstore_common::Secret;
use thiserror::Error;

use crate::db_types::OrderId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password: Secret<String>,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelAccount {
    pub id: u64,
    pub username: String,
    pub email: String,
}

/// Everything the panel needs to create a server for a paid order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSpec {
    pub name: String,
    pub owner_id: u64,
    pub memory_mb: u64,
    pub disk_mb: u64,
    pub cpu_percent: u64,
    pub order_id: OrderId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelServer {
    pub id: u64,
    pub identifier: String,
    pub name: String,
}

#[derive(Debug, Clone, Error)]
pub enum PanelError {
    #[error("The panel is not configured. {0}")]
    NotConfigured(String),
    #[error("The panel account already exists. {0}")]
    AccountExists(String),
    #[error("The panel could not be reached. {0}")]
    Unreachable(String),
    #[error("The panel did not respond in time")]
    Timeout,
    #[error("The panel rejected the request ({status}). {message}")]
    Rejected { status: u16, message: String },
    #[error("The panel sent a response that could not be understood. {0}")]
    InvalidResponse(String),
}

/// A hosting panel that can create customer accounts and servers.
#[allow(async_fn_in_trait)]
pub trait ProvisioningPanel {
    async fn create_account(&self, account: &NewAccount) -> Result<PanelAccount, PanelError>;

    /// Looks for an existing account, by email first and then by username.
    async fn find_account(&self, email: &str, username: &str) -> Result<Option<PanelAccount>, PanelError>;

    async fn create_server(&self, spec: &ServerSpec) -> Result<PanelServer, PanelError>;

    /// The customer-facing link to a server.
    fn server_url(&self, identifier: &str) -> String;
}
