//! HMAC middleware for Actix Web.
//!
//! This module provides a middleware for Actix Web that checks the HMAC signature of incoming requests.
//!
//! The payment gateway signs every webhook call with the shared `BOTSTORE_WEBHOOK_SECRET`, using the raw body of the
//! request as the data to sign. The base64-encoded HMAC-SHA256 is provided in the `X-ATL-Signature` header.
//!
//! Requests without a signature, or with one that does not match, are rejected with `401 Unauthorized` before they
//! reach the handler. An empty secret never validates anything.

use std::{
    future::{ready, Ready},
    rc::Rc,
};

use actix_http::h1;
use actix_web::{
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    error::{ErrorBadRequest, ErrorUnauthorized},
    web,
    Error,
};
use botstore_common::Secret;
use futures::future::LocalBoxFuture;
use log::{trace, warn};

use crate::helpers::verify_hmac;

pub const SIGNATURE_HEADER: &str = "X-ATL-Signature";

pub struct HmacMiddlewareFactory {
    hmac_header: String,
    key: Secret<String>,
    // If false, then the middleware will not check the HMAC signature and always allow the call
    enabled: bool,
}

impl HmacMiddlewareFactory {
    pub fn new(hmac_header: &str, key: Secret<String>, enabled: bool) -> Self {
        HmacMiddlewareFactory { hmac_header: hmac_header.into(), key, enabled }
    }
}

impl<S, B> Transform<S, ServiceRequest> for HmacMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    type InitError = ();
    type Response = ServiceResponse<B>;
    type Transform = HmacMiddlewareService<S>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(HmacMiddlewareService {
            hmac_header: self.hmac_header.clone(),
            key: self.key.clone(),
            enabled: self.enabled,
            service: Rc::new(service),
        }))
    }
}

pub struct HmacMiddlewareService<S> {
    hmac_header: String,
    key: Secret<String>,
    enabled: bool,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for HmacMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;
    type Response = ServiceResponse<B>;

    forward_ready!(service);

    fn call(&self, mut req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let secret = self.key.clone();
        let hmac_header = self.hmac_header.clone();
        let enabled = self.enabled;
        Box::pin(async move {
            if enabled {
                let body = check_signature(&mut req, &hmac_header, &secret).await?;
                req.set_payload(bytes_to_payload(body));
            } else {
                trace!("🔐️ HMAC checks are disabled. Allowing request.");
            }
            service.call(req).await
        })
    }
}

/// Reads the whole body and checks it against the signature header. On success the body is handed back so that it can
/// be restored for the handler.
async fn check_signature(
    req: &mut ServiceRequest,
    hmac_header: &str,
    secret: &Secret<String>,
) -> Result<web::Bytes, Error> {
    trace!("🔐️ Checking HMAC for request to {}", req.path());
    let signature = req
        .headers()
        .get(hmac_header)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .ok_or_else(|| {
            warn!("🔐️ No HMAC signature found in request to {}. Denying access.", req.path());
            ErrorUnauthorized("No HMAC signature found.")
        })?;
    if secret.reveal().is_empty() {
        warn!("🔐️ No webhook secret has been configured. Denying access.");
        return Err(ErrorUnauthorized("Invalid HMAC signature."));
    }
    let body = req.extract::<web::Bytes>().await.map_err(|e| {
        warn!("🔐️ Failed to extract request data: {:?}", e);
        ErrorBadRequest("Failed to extract request data.")
    })?;
    if verify_hmac(secret.reveal(), body.as_ref(), &signature) {
        trace!("🔐️ HMAC check for request ✅️");
        Ok(body)
    } else {
        warn!("🔐️ Invalid HMAC signature found in request to {}. Denying access.", req.path());
        Err(ErrorUnauthorized("Invalid HMAC signature."))
    }
}

fn bytes_to_payload(buf: web::Bytes) -> Payload {
    let (_, mut pl) = h1::Payload::create(true);
    pl.unread_data(buf);
    Payload::from(pl)
}
