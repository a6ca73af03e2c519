//! Request handler definitions
//!
//! Define each route and it handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests:
//! ```nocompile
//!     fn my_handler() -> impl Responder {
//!         std::thread::sleep(Duration::from_secs(5)); // <-- Bad practice! Will cause the current worker thread to
//! hang!
//!     }
//! ```
//! For this reason, any long, non-cpu-bound operation (e.g. I/O, remote API calls, etc.) should be expressed as
//! futures or asynchronous functions. Async handlers get executed concurrently by worker threads and thus don’t block
//! execution. Provisioning a server after a payment webhook can take several seconds, so this matters.
use actix_web::{get, web, HttpRequest, HttpResponse, Responder};
use botstore_engine::{
    catalog,
    db_types::OrderId,
    order_objects::{NewOrderRequest, PaymentEvent},
    OrderFlowApi,
    OrderFlowError,
    OrderStore,
    PaymentGateway,
    ProvisioningPanel,
};
use chrono::Utc;
use log::*;
use serde_json::Value;

use crate::{
    config::ServerOptions,
    data_objects::{
        HealthResponse,
        OrderCreatedResponse,
        OrderStatusResponse,
        OrderView,
        PackageView,
        PackagesResponse,
        StorageHealth,
        WebhookAck,
    },
    errors::ServerError,
    helpers::get_remote_ip,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

//----------------------------------------------   Health  ----------------------------------------------------
route!(health => Get "/health" impl OrderStore, PaymentGateway, ProvisioningPanel);
pub async fn health<S, G, P>(api: web::Data<OrderFlowApi<S, G, P>>) -> Result<HttpResponse, ServerError>
where
    S: OrderStore,
    G: PaymentGateway,
    P: ProvisioningPanel,
{
    let summary = api.storage_summary().await?;
    let response = HealthResponse { status: "ok".into(), timestamp: Utc::now(), storage: StorageHealth::from(summary) };
    Ok(HttpResponse::Ok().json(response))
}

//----------------------------------------------   Packages  ----------------------------------------------------
#[get("/packages")]
pub async fn packages() -> impl Responder {
    let packages = catalog::packages().iter().map(PackageView::from).collect();
    HttpResponse::Ok().json(PackagesResponse { success: true, packages })
}

//----------------------------------------------   Orders  ----------------------------------------------------
route!(create_order => Post "/orders" impl OrderStore, PaymentGateway, ProvisioningPanel);
pub async fn create_order<S, G, P>(
    body: web::Json<NewOrderRequest>,
    api: web::Data<OrderFlowApi<S, G, P>>,
    options: web::Data<ServerOptions>,
) -> Result<HttpResponse, ServerError>
where
    S: OrderStore,
    G: PaymentGateway,
    P: ProvisioningPanel,
{
    let request = body.into_inner();
    debug!("💻️ New order request for package '{}' from '{}'", request.package, request.owner_name);
    let deposit = api.create_order(request).await.map_err(|e| {
        match &e {
            OrderFlowError::StorageError(_) | OrderFlowError::PaymentError(_) => {
                error!("💻️ Could not create order. {e}")
            },
            _ => debug!("💻️ Order request rejected. {e}"),
        }
        ServerError::from_flow_error(e, options.development_mode)
    })?;
    info!("💻️ Order {} created", deposit.order_id);
    Ok(HttpResponse::Ok().json(OrderCreatedResponse::from(deposit)))
}

route!(order_by_id => Get "/orders/{id}" impl OrderStore, PaymentGateway, ProvisioningPanel);
pub async fn order_by_id<S, G, P>(
    path: web::Path<String>,
    api: web::Data<OrderFlowApi<S, G, P>>,
    options: web::Data<ServerOptions>,
) -> Result<HttpResponse, ServerError>
where
    S: OrderStore,
    G: PaymentGateway,
    P: ProvisioningPanel,
{
    let id = path.into_inner();
    let id = id.trim();
    if id.is_empty() {
        return Err(ServerError::InvalidRequestPath("Order id is required".into()));
    }
    let order = api
        .fetch_order(&OrderId::from(id))
        .await
        .map_err(|e| ServerError::from_flow_error(e, options.development_mode))?;
    Ok(HttpResponse::Ok().json(OrderStatusResponse { success: true, order: OrderView::from(order) }))
}

//----------------------------------------------   Payments  ----------------------------------------------------
route!(payment_webhook => Post "/webhook" impl OrderStore, PaymentGateway, ProvisioningPanel);
/// Receives payment notifications from the gateway. The signature has already been checked by the HMAC middleware.
///
/// Malformed bodies are rejected and unknown orders get a 404, so that a misconfigured gateway is noticed. Everything
/// else is acknowledged with a 200, including failures while provisioning, since the gateway cannot do anything
/// about those and would only retry.
pub async fn payment_webhook<S, G, P>(
    req: HttpRequest,
    body: web::Bytes,
    api: web::Data<OrderFlowApi<S, G, P>>,
    options: web::Data<ServerOptions>,
) -> Result<HttpResponse, ServerError>
where
    S: OrderStore,
    G: PaymentGateway,
    P: ProvisioningPanel,
{
    let peer = get_remote_ip(&req, options.use_x_forwarded_for, options.use_forwarded)
        .map(|ip| ip.to_string())
        .unwrap_or_else(|| "unknown".into());
    trace!("🔔️ Payment webhook from {peer}: {}", String::from_utf8_lossy(&body));
    let event = parse_payment_event(&body)?;
    info!("🔔️ Received '{}' event from {peer}", event.event);
    match api.handle_payment_event(event).await {
        Ok(outcome) => {
            debug!("🔔️ Webhook outcome: {}", outcome.label());
            Ok(HttpResponse::Ok().json(WebhookAck::from(&outcome)))
        },
        Err(e @ OrderFlowError::OrderNotFound(_)) | Err(e @ OrderFlowError::InvalidEvent(_)) => {
            warn!("🔔️ Rejected payment webhook from {peer}. {e}");
            Err(ServerError::from_flow_error(e, options.development_mode))
        },
        Err(e) => {
            error!("🔔️ Error processing payment webhook. {e}");
            Ok(HttpResponse::Ok().json(WebhookAck::new("error", None)))
        },
    }
}

fn parse_payment_event(body: &[u8]) -> Result<PaymentEvent, ServerError> {
    let value = serde_json::from_slice::<Value>(body)
        .map_err(|e| ServerError::InvalidRequestBody(format!("Webhook body is not valid JSON. {e}")))?;
    let has_event = value.as_object().and_then(|o| o.get("event")).map(Value::is_string).unwrap_or(false);
    if !has_event {
        return Err(ServerError::InvalidRequestBody("Webhook body must be an object with an 'event' field".into()));
    }
    serde_json::from_value(value).map_err(|e| ServerError::InvalidRequestBody(format!("Invalid webhook payload. {e}")))
}
