use std::fmt::Debug;

use botstore_engine::traits::{
    NewAccount,
    PanelAccount,
    PanelError,
    PanelServer,
    ProvisioningPanel,
    ServerSpec,
};
use pterodactyl_tools::{
    data_objects::{NewPanelUser, PanelUserAttributes, ServerLimits},
    PterodactylApi,
    PterodactylApiError,
    PterodactylConfig,
};

const PANEL_LANGUAGE: &str = "en";

/// [`ProvisioningPanel`] backed by the Pterodactyl application API.
#[derive(Clone)]
pub struct PterodactylPanel {
    api: PterodactylApi,
}

impl Debug for PterodactylPanel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PterodactylPanel({})", self.api.config().base_url)
    }
}

impl PterodactylPanel {
    pub fn new(config: PterodactylConfig) -> Result<Self, PterodactylApiError> {
        let api = PterodactylApi::new(config)?;
        Ok(Self { api })
    }
}

impl ProvisioningPanel for PterodactylPanel {
    async fn create_account(&self, account: &NewAccount) -> Result<PanelAccount, PanelError> {
        let user = NewPanelUser {
            email: account.email.clone(),
            username: account.username.clone(),
            first_name: account.first_name.clone(),
            last_name: account.last_name.clone(),
            password: account.password.reveal().clone(),
            language: PANEL_LANGUAGE.to_string(),
        };
        self.api.create_user(user).await.map(panel_account).map_err(panel_error)
    }

    async fn find_account(&self, email: &str, username: &str) -> Result<Option<PanelAccount>, PanelError> {
        let user = self.api.find_user(email, username).await.map_err(panel_error)?;
        Ok(user.map(panel_account))
    }

    async fn create_server(&self, spec: &ServerSpec) -> Result<PanelServer, PanelError> {
        let limits = ServerLimits::new(spec.memory_mb, spec.disk_mb, spec.cpu_percent);
        let server = self
            .api
            .create_server(&spec.name, spec.owner_id, limits, spec.order_id.as_str())
            .await
            .map_err(panel_error)?;
        Ok(PanelServer { id: server.id, identifier: server.identifier, name: server.name })
    }

    fn server_url(&self, identifier: &str) -> String {
        self.api.server_url(identifier)
    }
}

fn panel_account(user: PanelUserAttributes) -> PanelAccount {
    PanelAccount { id: user.id, username: user.username, email: user.email }
}

pub fn panel_error(e: PterodactylApiError) -> PanelError {
    match e {
        PterodactylApiError::Initialization(s) | PterodactylApiError::NotConfigured(s) => PanelError::NotConfigured(s),
        PterodactylApiError::Timeout => PanelError::Timeout,
        PterodactylApiError::RestRequestError(s) => PanelError::Unreachable(s),
        PterodactylApiError::JsonError(s) => PanelError::InvalidResponse(s),
        PterodactylApiError::Conflict(s) => PanelError::AccountExists(s),
        PterodactylApiError::QueryError { status, message } => PanelError::Rejected { status, message },
    }
}
