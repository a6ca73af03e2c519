#![allow(dead_code)]
//! Hand-written stand-ins for the payment gateway and the hosting panel.
use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use botstore_engine::{
    traits::{
        DepositRequest,
        GatewayDeposit,
        NewAccount,
        PanelAccount,
        PanelError,
        PanelServer,
        PaymentGateway,
        PaymentGatewayError,
        ProvisioningPanel,
        ServerSpec,
    },
    DocumentStore,
    FallbackPolicy,
    OrderFlowApi,
    PaymentApi,
    ProvisioningApi,
};
use chrono::{DateTime, Utc};

pub type TestApi = OrderFlowApi<DocumentStore, FakeGateway, FakePanel>;

pub fn build_api(store: DocumentStore, gateway: FakeGateway, panel: FakePanel, policy: FallbackPolicy) -> TestApi {
    let payments = PaymentApi::new(store.clone(), gateway).with_policy(policy);
    let provisioning = ProvisioningApi::new(store.clone(), panel);
    OrderFlowApi::new(store, payments, provisioning)
}

//--------------------------------------     FakeGateway       ---------------------------------------------------------
#[derive(Debug, Clone, Default)]
pub struct FakeGateway {
    state: Arc<Mutex<GatewayState>>,
}

#[derive(Debug, Default)]
struct GatewayState {
    fail_with: Option<PaymentGatewayError>,
    expires_at: Option<DateTime<Utc>>,
    requests: Vec<DepositRequest>,
}

impl FakeGateway {
    pub fn failing(err: PaymentGatewayError) -> Self {
        let gateway = Self::default();
        gateway.state.lock().unwrap().fail_with = Some(err);
        gateway
    }

    pub fn set_expiry(&self, expires_at: Option<DateTime<Utc>>) {
        self.state.lock().unwrap().expires_at = expires_at;
    }

    pub fn set_failure(&self, err: Option<PaymentGatewayError>) {
        self.state.lock().unwrap().fail_with = err;
    }

    pub fn requests(&self) -> Vec<DepositRequest> {
        self.state.lock().unwrap().requests.clone()
    }
}

impl PaymentGateway for FakeGateway {
    async fn open_deposit(&self, request: &DepositRequest) -> Result<GatewayDeposit, PaymentGatewayError> {
        let mut state = self.state.lock().unwrap();
        state.requests.push(request.clone());
        if let Some(err) = &state.fail_with {
            return Err(err.clone());
        }
        let reference = &request.reference;
        Ok(GatewayDeposit {
            deposit_id: Some(format!("DEP-{reference}")),
            qr_url: Some(format!("https://qr.test/{reference}.png")),
            qr_string: Some(format!("QRIS-{reference}")),
            expires_at: state.expires_at,
        })
    }
}

//--------------------------------------      FakePanel        ---------------------------------------------------------
#[derive(Debug, Clone, Default)]
pub struct FakePanel {
    state: Arc<Mutex<PanelState>>,
}

#[derive(Debug, Default)]
struct PanelState {
    accounts: Vec<PanelAccount>,
    servers: Vec<ServerSpec>,
    fail_servers: bool,
    hide_existing_accounts: bool,
    delay: Option<Duration>,
}

impl FakePanel {
    pub fn with_existing_account(username: &str, email: &str) -> Self {
        let panel = Self::default();
        panel.state.lock().unwrap().accounts.push(PanelAccount {
            id: 100,
            username: username.to_string(),
            email: email.to_string(),
        });
        panel
    }

    /// The panel refuses to create servers.
    pub fn set_server_failure(&self, fail: bool) {
        self.state.lock().unwrap().fail_servers = fail;
    }

    /// Account lookups find nothing, even though creation reports a duplicate.
    pub fn hide_existing_accounts(&self) {
        self.state.lock().unwrap().hide_existing_accounts = true;
    }

    /// Server creation takes this long.
    pub fn set_delay(&self, delay: Duration) {
        self.state.lock().unwrap().delay = Some(delay);
    }

    pub fn servers(&self) -> Vec<ServerSpec> {
        self.state.lock().unwrap().servers.clone()
    }

    pub fn accounts(&self) -> Vec<PanelAccount> {
        self.state.lock().unwrap().accounts.clone()
    }
}

impl ProvisioningPanel for FakePanel {
    async fn create_account(&self, account: &NewAccount) -> Result<PanelAccount, PanelError> {
        let mut state = self.state.lock().unwrap();
        if state.accounts.iter().any(|a| a.email == account.email || a.username == account.username) {
            return Err(PanelError::AccountExists(format!("{} is taken", account.username)));
        }
        let created =
            PanelAccount { id: state.accounts.len() as u64 + 1, username: account.username.clone(), email: account.email.clone() };
        state.accounts.push(created.clone());
        Ok(created)
    }

    async fn find_account(&self, email: &str, username: &str) -> Result<Option<PanelAccount>, PanelError> {
        let state = self.state.lock().unwrap();
        if state.hide_existing_accounts {
            return Ok(None);
        }
        let found = state
            .accounts
            .iter()
            .find(|a| a.email == email)
            .or_else(|| state.accounts.iter().find(|a| a.username == username))
            .cloned();
        Ok(found)
    }

    async fn create_server(&self, spec: &ServerSpec) -> Result<PanelServer, PanelError> {
        let delay = self.state.lock().unwrap().delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let mut state = self.state.lock().unwrap();
        if state.fail_servers {
            return Err(PanelError::Rejected { status: 500, message: "no free allocation".to_string() });
        }
        state.servers.push(spec.clone());
        let n = state.servers.len() as u64;
        Ok(PanelServer { id: n, identifier: format!("srv{n:05}"), name: spec.name.clone() })
    }

    fn server_url(&self, identifier: &str) -> String {
        format!("https://panel.test/server/{identifier}")
    }
}
