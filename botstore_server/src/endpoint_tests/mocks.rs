use botstore_engine::traits::{
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
};
use mockall::mock;

mock! {
    pub Gateway {}
    impl PaymentGateway for Gateway {
        async fn open_deposit(&self, request: &DepositRequest) -> Result<GatewayDeposit, PaymentGatewayError>;
    }
}

mock! {
    pub Panel {}
    impl ProvisioningPanel for Panel {
        async fn create_account(&self, account: &NewAccount) -> Result<PanelAccount, PanelError>;
        async fn find_account(&self, email: &str, username: &str) -> Result<Option<PanelAccount>, PanelError>;
        async fn create_server(&self, spec: &ServerSpec) -> Result<PanelServer, PanelError>;
        fn server_url(&self, identifier: &str) -> String;
    }
}

/// A gateway that hands out a deposit for every request.
pub fn working_gateway() -> MockGateway {
    let mut gateway = MockGateway::new();
    gateway.expect_open_deposit().returning(|req| {
        Ok(GatewayDeposit {
            deposit_id: Some(format!("DEP-{}", req.reference)),
            qr_url: Some(format!("https://qr.test/{}.png", req.reference)),
            qr_string: Some(format!("QRIS-{}", req.reference)),
            expires_at: None,
        })
    });
    gateway
}

pub fn broken_gateway() -> MockGateway {
    let mut gateway = MockGateway::new();
    gateway.expect_open_deposit().returning(|_| Err(PaymentGatewayError::Unreachable("connection refused".into())));
    gateway
}

/// A panel that must never be touched.
pub fn idle_panel() -> MockPanel {
    let mut panel = MockPanel::new();
    panel.expect_create_account().never();
    panel.expect_create_server().never();
    panel
}

/// A panel that creates exactly one account and one server.
pub fn working_panel() -> MockPanel {
    let mut panel = MockPanel::new();
    panel.expect_create_account().times(1).returning(|account| {
        Ok(PanelAccount { id: 42, username: account.username.clone(), email: account.email.clone() })
    });
    panel
        .expect_create_server()
        .times(1)
        .returning(|spec| Ok(PanelServer { id: 7, identifier: "abc123".into(), name: spec.name.clone() }));
    panel.expect_server_url().returning(|id| format!("https://panel.test/server/{id}"));
    panel
}
