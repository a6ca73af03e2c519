use std::sync::Arc;

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION},
    Client,
    Method,
    StatusCode,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::json;

use crate::{
    config::PterodactylConfig,
    data_objects::*,
    PterodactylApiError,
};

#[derive(Clone)]
pub struct PterodactylApi {
    config: PterodactylConfig,
    client: Arc<Client>,
}

impl PterodactylApi {
    pub fn new(config: PterodactylConfig) -> Result<Self, PterodactylApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let bearer = format!("Bearer {}", config.api_key.reveal());
        let mut auth = HeaderValue::from_str(&bearer).map_err(|e| PterodactylApiError::Initialization(e.to_string()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| PterodactylApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub fn config(&self) -> &PterodactylConfig {
        &self.config
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/api/application{path}", self.config.base_url)
    }

    /// The customer-facing link for a server.
    pub fn server_url(&self, identifier: &str) -> String {
        format!("{}/server/{identifier}", self.config.base_url)
    }

    async fn rest_query<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<B>,
    ) -> Result<T, PterodactylApiError> {
        if !self.config.is_configured() {
            return Err(PterodactylApiError::NotConfigured("panel URL or API key is empty".to_string()));
        }
        let url = self.url(path);
        trace!("🦖️ Sending REST query: {method} {url}");
        let mut req = self.client.request(method, url).query(query);
        if let Some(body) = body {
            req = req.json(&body);
        }
        let response = req.send().await?;
        let status = response.status();
        if status.is_success() {
            trace!("🦖️ REST request successful. {status}");
            response.json::<T>().await.map_err(|e| PterodactylApiError::JsonError(e.to_string()))
        } else {
            let message = response.text().await?;
            Err(PterodactylApiError::QueryError { status: status.as_u16(), message })
        }
    }

    pub async fn create_user(&self, user: NewPanelUser) -> Result<PanelUserAttributes, PterodactylApiError> {
        debug!("🦖️ Creating panel user {}", user.username);
        let result: Wrapped<PanelUserAttributes> =
            self.rest_query(Method::POST, "/users", &[], Some(user)).await.map_err(duplicate_user)?;
        info!("🦖️ Created panel user {} with id {}", result.attributes.username, result.attributes.id);
        Ok(result.attributes)
    }

    /// Looks a user up by email first and then by username. Only exact matches count, since the panel filters are
    /// substring matches.
    pub async fn find_user(&self, email: &str, username: &str) -> Result<Option<PanelUserAttributes>, PterodactylApiError> {
        let by_email: ListResponse<PanelUserAttributes> =
            self.rest_query(Method::GET, "/users", &[("filter[email]", email)], None::<()>).await?;
        if let Some(user) = by_email.data.into_iter().map(|w| w.attributes).find(|u| u.email == email) {
            return Ok(Some(user));
        }
        let by_name: ListResponse<PanelUserAttributes> =
            self.rest_query(Method::GET, "/users", &[("filter[username]", username)], None::<()>).await?;
        Ok(by_name.data.into_iter().map(|w| w.attributes).find(|u| u.username == username))
    }

    pub async fn create_server(
        &self,
        name: &str,
        user_id: u64,
        limits: ServerLimits,
        order_id: &str,
    ) -> Result<ServerAttributes, PterodactylApiError> {
        let mut environment = serde_json::Map::new();
        environment.insert("NODE_ENV".into(), json!("production"));
        environment.insert("ORDER_ID".into(), json!(order_id));
        let server = NewServer {
            name: name.to_string(),
            user: user_id,
            egg: self.config.egg_id,
            docker_image: self.config.docker_image.clone(),
            startup: "npm start".to_string(),
            environment,
            limits,
            feature_limits: FeatureLimits { databases: 1, backups: 1 },
            deploy: Deployment { locations: vec![self.config.location_id], dedicated_ip: false, port_range: vec![] },
        };
        debug!("🦖️ Creating server {name} for panel user {user_id}");
        let result: Wrapped<ServerAttributes> = self.rest_query(Method::POST, "/servers", &[], Some(server)).await?;
        info!("🦖️ Created server {} ({})", result.attributes.name, result.attributes.identifier);
        Ok(result.attributes)
    }
}

/// The panel answers 422 when the email or username of a new user is taken. Other endpoints use 422 for plain
/// validation errors, so only user creation treats it as a conflict.
fn duplicate_user(e: PterodactylApiError) -> PterodactylApiError {
    match e {
        PterodactylApiError::QueryError { status, message } if status == StatusCode::UNPROCESSABLE_ENTITY.as_u16() => {
            PterodactylApiError::Conflict(message)
        },
        e => e,
    }
}
