use std::time::Duration;

use botstore_common::Secret;
use log::*;

pub const DEFAULT_ATLANTIC_BASE_URL: &str = "https://atlantic-payment.h2h.dev";
pub const DEFAULT_REMOTE_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct AtlanticConfig {
    pub base_url: String,
    pub api_key: Secret<String>,
    /// Upper bound for a single call to the gateway. A timeout is reported as [`crate::AtlanticApiError::Timeout`].
    pub timeout: Duration,
}

impl Default for AtlanticConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_ATLANTIC_BASE_URL.to_string(),
            api_key: Secret::default(),
            timeout: DEFAULT_REMOTE_TIMEOUT,
        }
    }
}

impl AtlanticConfig {
    pub fn new_from_env_or_default() -> Self {
        let base_url = std::env::var("BOTSTORE_ATLANTIC_BASE_URL").unwrap_or_else(|_| {
            info!("💳️ BOTSTORE_ATLANTIC_BASE_URL not set, using {DEFAULT_ATLANTIC_BASE_URL}");
            DEFAULT_ATLANTIC_BASE_URL.to_string()
        });
        let api_key = Secret::new(std::env::var("BOTSTORE_ATLANTIC_API_KEY").unwrap_or_else(|_| {
            warn!("💳️ BOTSTORE_ATLANTIC_API_KEY not set. Deposits will fall back to placeholder payments");
            String::default()
        }));
        let timeout = std::env::var("BOTSTORE_REMOTE_TIMEOUT_SECS")
            .ok()
            .and_then(|s| {
                s.parse::<u64>()
                    .map_err(|e| warn!("💳️ Invalid value for BOTSTORE_REMOTE_TIMEOUT_SECS ({s}). {e}"))
                    .ok()
            })
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_REMOTE_TIMEOUT);
        Self { base_url: base_url.trim_end_matches('/').to_string(), api_key, timeout }
    }
}
