use std::time::Duration;

use botstore_common::Secret;
use log::*;

pub const DEFAULT_LOCATION_ID: u64 = 1;
pub const DEFAULT_EGG_ID: u64 = 15;
pub const DEFAULT_DOCKER_IMAGE: &str = "ghcr.io/parkervcp/yolks:nodejs_20";
pub const DEFAULT_REMOTE_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct PterodactylConfig {
    /// Base URL of the panel, without a trailing slash. Also used to build the customer-facing server links.
    pub base_url: String,
    pub api_key: Secret<String>,
    pub location_id: u64,
    pub egg_id: u64,
    pub docker_image: String,
    pub timeout: Duration,
}

impl Default for PterodactylConfig {
    fn default() -> Self {
        Self {
            base_url: String::default(),
            api_key: Secret::default(),
            location_id: DEFAULT_LOCATION_ID,
            egg_id: DEFAULT_EGG_ID,
            docker_image: DEFAULT_DOCKER_IMAGE.to_string(),
            timeout: DEFAULT_REMOTE_TIMEOUT,
        }
    }
}

impl PterodactylConfig {
    pub fn new_from_env_or_default() -> Self {
        let base_url = std::env::var("BOTSTORE_PANEL_URL").unwrap_or_else(|_| {
            warn!("🦖️ BOTSTORE_PANEL_URL not set. Provisioning will fail until it is configured");
            String::default()
        });
        let api_key = Secret::new(std::env::var("BOTSTORE_PANEL_API_KEY").unwrap_or_else(|_| {
            warn!("🦖️ BOTSTORE_PANEL_API_KEY not set. Provisioning will fail until it is configured");
            String::default()
        }));
        let location_id = numeric_env("BOTSTORE_PANEL_LOCATION_ID", DEFAULT_LOCATION_ID);
        let egg_id = numeric_env("BOTSTORE_PANEL_EGG_ID", DEFAULT_EGG_ID);
        let docker_image = std::env::var("BOTSTORE_PANEL_DOCKER_IMAGE").unwrap_or_else(|_| {
            info!("🦖️ BOTSTORE_PANEL_DOCKER_IMAGE not set, using {DEFAULT_DOCKER_IMAGE}");
            DEFAULT_DOCKER_IMAGE.to_string()
        });
        let timeout = Duration::from_secs(numeric_env("BOTSTORE_REMOTE_TIMEOUT_SECS", DEFAULT_REMOTE_TIMEOUT.as_secs()));
        Self { base_url: base_url.trim_end_matches('/').to_string(), api_key, location_id, egg_id, docker_image, timeout }
    }

    pub fn is_configured(&self) -> bool {
        !self.base_url.is_empty() && !self.api_key.reveal().is_empty()
    }
}

fn numeric_env(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse::<u64>().map_err(|e| warn!("🦖️ Invalid value for {name} ({s}). {e}")).ok())
        .unwrap_or(default)
}
