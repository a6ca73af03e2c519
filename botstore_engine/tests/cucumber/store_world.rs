use std::collections::HashMap;

use botstore_engine::{
    db_types::OrderId,
    order_objects::EventOutcome,
    traits::PaymentGatewayError,
    DocumentStore,
    FallbackPolicy,
};
use cucumber::World;
use log::*;
use tempfile::TempDir;

use crate::support::{build_api, FakeGateway, FakePanel, TestApi};

#[derive(Default, Debug, World)]
pub struct StoreWorld {
    pub system: Option<StoreSystem>,
    pub orders: HashMap<String, OrderId>,
    pub last_outcomes: Vec<EventOutcome>,
    pub last_error: Option<String>,
}

#[derive(Debug)]
pub struct StoreSystem {
    pub data_dir: TempDir,
    pub api: TestApi,
    pub gateway: FakeGateway,
    pub panel: FakePanel,
}

impl StoreWorld {
    pub fn system(&self) -> &StoreSystem {
        self.system.as_ref().expect("Storefront not initialised")
    }

    pub fn api(&self) -> &TestApi {
        &self.system().api
    }

    pub fn order_for(&self, owner: &str) -> OrderId {
        self.orders.get(owner).cloned().unwrap_or_else(|| panic!("{owner} has not ordered anything"))
    }
}

impl StoreSystem {
    pub async fn new(gateway_error: Option<PaymentGatewayError>, policy: FallbackPolicy) -> Self {
        let data_dir = tempfile::Builder::new().prefix("botstore_").tempdir().expect("Could not create data dir");
        let store = DocumentStore::open(data_dir.path()).await.expect("Could not open order store");
        debug!("Created order store in {}", data_dir.path().display());
        let gateway = FakeGateway::default();
        gateway.set_failure(gateway_error);
        let panel = FakePanel::default();
        let api = build_api(store, gateway.clone(), panel.clone(), policy);
        Self { data_dir, api, gateway, panel }
    }
}
