use std::sync::Arc;

use botstore_common::Rupiah;
use log::*;
use reqwest::Client;
use serde_json::Value;

use crate::{config::AtlanticConfig, data_objects::DepositResponse, AtlanticApiError};

#[derive(Clone)]
pub struct AtlanticApi {
    config: AtlanticConfig,
    client: Arc<Client>,
}

impl AtlanticApi {
    pub fn new(config: AtlanticConfig) -> Result<Self, AtlanticApiError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AtlanticApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url)
    }

    pub fn config(&self) -> &AtlanticConfig {
        &self.config
    }

    /// Sends a form-encoded request. The API key is attached to every call; the gateway does not sign requests.
    pub async fn form_query(&self, path: &str, params: &[(&str, &str)]) -> Result<Value, AtlanticApiError> {
        if self.config.api_key.reveal().is_empty() {
            return Err(AtlanticApiError::NotConfigured("the API key is empty".to_string()));
        }
        let url = self.url(path);
        trace!("💳️ Sending form request: {url}");
        let mut form = Vec::with_capacity(params.len() + 1);
        form.push(("api_key", self.config.api_key.reveal().as_str()));
        form.extend_from_slice(params);
        let response = self.client.post(url).form(&form).send().await?;
        let status = response.status();
        if status.is_success() {
            trace!("💳️ Request successful. {status}");
            response.json::<Value>().await.map_err(|e| AtlanticApiError::JsonError(e.to_string()))
        } else {
            let message = response.text().await?;
            Err(AtlanticApiError::QueryError { status: status.as_u16(), message })
        }
    }

    /// Opens a QRIS deposit for `amount`, tagged with `reference` so that the webhook can be matched to the order.
    pub async fn create_deposit(&self, reference: &str, amount: Rupiah) -> Result<DepositResponse, AtlanticApiError> {
        debug!("💳️ Opening QRIS deposit of {amount} for {reference}");
        let nominal = amount.value().to_string();
        let params = [("reff_id", reference), ("nominal", nominal.as_str()), ("type", "ewallet"), ("metode", "qris")];
        let body = self.form_query("/deposit/create", &params).await?;
        let deposit = DepositResponse::from_response_body(&body)?;
        info!("💳️ Deposit {:?} opened for {reference}", deposit.deposit_id);
        Ok(deposit)
    }
}
