use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use botstore_engine::{
    DocumentStore,
    OrderFlowApi,
    OrderStore,
    PaymentApi,
    PaymentGateway,
    ProvisioningApi,
    ProvisioningPanel,
};
use log::*;

use crate::{
    config::{ServerConfig, ServerOptions, WebhookConfig},
    errors::ServerError,
    expiry_worker::start_expiry_worker,
    integrations::{AtlanticGateway, PterodactylPanel},
    middleware::{HmacMiddlewareFactory, SIGNATURE_HEADER},
    routes::{packages, CreateOrderRoute, HealthRoute, OrderByIdRoute, PaymentWebhookRoute},
};

pub type StoreApi = OrderFlowApi<DocumentStore, AtlanticGateway, PterodactylPanel>;

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let store = DocumentStore::open(&config.data_dir).await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    info!("💾️ Orders are stored in {:?}", store.medium().await);
    let gateway =
        AtlanticGateway::new(config.atlantic.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let panel =
        PterodactylPanel::new(config.panel.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let api = web::Data::new(build_api(store, gateway, panel, &config));
    if let Some(interval) = config.expiry_interval {
        let _handle = start_expiry_worker(api.clone().into_inner(), interval);
    }
    let srv = create_server_instance(config, api)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

/// Wires the payment and provisioning APIs around a shared store.
pub fn build_api<S, G, P>(store: S, gateway: G, panel: P, config: &ServerConfig) -> OrderFlowApi<S, G, P>
where S: OrderStore {
    let payments = PaymentApi::new(store.clone(), gateway).with_policy(config.payment_fallback);
    let provisioning = ProvisioningApi::new(store.clone(), panel).with_contact_domain(config.contact_domain.clone());
    OrderFlowApi::new(store, payments, provisioning)
}

pub fn create_server_instance(config: ServerConfig, api: web::Data<StoreApi>) -> Result<Server, ServerError> {
    let options = ServerOptions::from_config(&config);
    let webhook = config.webhook.clone();
    let srv = HttpServer::new(move || {
        let webhook = webhook.clone();
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("botstore::access_log"))
            .app_data(api.clone())
            .app_data(web::Data::new(options))
            .configure(|cfg| configure_routes::<DocumentStore, AtlanticGateway, PterodactylPanel>(cfg, &webhook))
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}

/// Registers every route of the storefront. The webhook lives in its own scope so that only it is wrapped by the
/// signature check.
pub fn configure_routes<S, G, P>(cfg: &mut web::ServiceConfig, webhook: &WebhookConfig)
where
    S: OrderStore + 'static,
    G: PaymentGateway + 'static,
    P: ProvisioningPanel + 'static,
{
    let json_config = web::JsonConfig::default()
        .error_handler(|err, _req| ServerError::InvalidRequestBody(err.to_string()).into());
    let payments_scope = web::scope("/payments")
        .wrap(HmacMiddlewareFactory::new(SIGNATURE_HEADER, webhook.secret.clone(), webhook.signature_checks))
        .service(PaymentWebhookRoute::<S, G, P>::new());
    cfg.app_data(json_config)
        .service(HealthRoute::<S, G, P>::new())
        .service(packages)
        .service(CreateOrderRoute::<S, G, P>::new())
        .service(OrderByIdRoute::<S, G, P>::new())
        .service(payments_scope);
}
