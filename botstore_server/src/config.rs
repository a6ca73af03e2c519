use std::{env, path::PathBuf, time::Duration};

use atlantic_tools::AtlanticConfig;
use botstore_common::{helpers::env_flag, Secret};
use botstore_engine::{FallbackPolicy, DEFAULT_CONTACT_DOMAIN};
use log::*;
use pterodactyl_tools::PterodactylConfig;

const DEFAULT_BOTSTORE_HOST: &str = "127.0.0.1";
const DEFAULT_BOTSTORE_PORT: u16 = 3000;
const DEFAULT_DATA_DIR: &str = "./data";
const DEFAULT_EXPIRY_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Production,
    Development,
}

impl Environment {
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory holding the JSON order and user documents.
    pub data_dir: PathBuf,
    pub environment: Environment,
    /// If true, the X-Forwarded-For header will be used to determine the client's IP address, rather than the
    /// connection's remote address.
    pub use_x_forwarded_for: bool,
    /// If true, the Forwarded header will be used to determine the client's IP address, rather than the
    /// connection's remote address.
    pub use_forwarded: bool,
    pub webhook: WebhookConfig,
    /// What to do with a new order when the payment gateway cannot issue a deposit.
    pub payment_fallback: FallbackPolicy,
    /// How often stale pending orders are expired. `None` disables the expiry worker.
    pub expiry_interval: Option<Duration>,
    /// Email domain used to derive panel account contacts from owner names.
    pub contact_domain: String,
    pub atlantic: AtlanticConfig,
    pub panel: PterodactylConfig,
}

#[derive(Clone, Debug)]
pub struct WebhookConfig {
    /// Shared secret for the `X-ATL-Signature` HMAC.
    pub secret: Secret<String>,
    /// If false, the signature middleware lets every request through. **DANGER**
    pub signature_checks: bool,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self { secret: Secret::default(), signature_checks: true }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_BOTSTORE_HOST.to_string(),
            port: DEFAULT_BOTSTORE_PORT,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            environment: Environment::default(),
            use_x_forwarded_for: false,
            use_forwarded: false,
            webhook: WebhookConfig::default(),
            payment_fallback: FallbackPolicy::default(),
            expiry_interval: Some(DEFAULT_EXPIRY_INTERVAL),
            contact_domain: DEFAULT_CONTACT_DOMAIN.to_string(),
            atlantic: AtlanticConfig::default(),
            panel: PterodactylConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("BOTSTORE_HOST").ok().unwrap_or_else(|| DEFAULT_BOTSTORE_HOST.into());
        let port = env::var("BOTSTORE_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for BOTSTORE_PORT. {e} Using the default, {DEFAULT_BOTSTORE_PORT}, \
                         instead."
                    );
                    DEFAULT_BOTSTORE_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_BOTSTORE_PORT);
        let data_dir = env::var("BOTSTORE_DATA_DIR").map(PathBuf::from).unwrap_or_else(|_| {
            info!("🪛️ BOTSTORE_DATA_DIR is not set. Using {DEFAULT_DATA_DIR}");
            PathBuf::from(DEFAULT_DATA_DIR)
        });
        let environment = match env::var("BOTSTORE_ENV").map(|s| s.trim().to_ascii_lowercase()) {
            Ok(s) if s == "development" || s == "dev" => Environment::Development,
            Ok(s) if s == "production" || s == "prod" => Environment::Production,
            Ok(s) => {
                warn!("🪛️ Unknown value for BOTSTORE_ENV: {s}. Assuming production.");
                Environment::Production
            },
            Err(_) => Environment::Production,
        };
        let use_x_forwarded_for = env_flag("BOTSTORE_USE_X_FORWARDED_FOR", false);
        let use_forwarded = env_flag("BOTSTORE_USE_FORWARDED", false);
        let webhook = WebhookConfig::from_env_or_default();
        let payment_fallback = env::var("BOTSTORE_PAYMENT_FALLBACK")
            .ok()
            .map(|s| {
                s.parse::<FallbackPolicy>().unwrap_or_else(|e| {
                    warn!("🪛️ {e}. Using the default payment fallback, {}.", FallbackPolicy::default());
                    FallbackPolicy::default()
                })
            })
            .unwrap_or_default();
        let expiry_interval = configure_expiry_interval();
        let contact_domain = env::var("BOTSTORE_PANEL_CONTACT_DOMAIN")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_CONTACT_DOMAIN.to_string());
        let atlantic = AtlanticConfig::new_from_env_or_default();
        let panel = PterodactylConfig::new_from_env_or_default();
        if !panel.is_configured() {
            warn!("🪛️ The Pterodactyl panel is not configured. Paid orders will fail to provision.");
        }
        Self {
            host,
            port,
            data_dir,
            environment,
            use_x_forwarded_for,
            use_forwarded,
            webhook,
            payment_fallback,
            expiry_interval,
            contact_domain,
            atlantic,
            panel,
        }
    }
}

impl WebhookConfig {
    pub fn new(secret: &str, signature_checks: bool) -> Self {
        Self { secret: Secret::new(secret.to_string()), signature_checks }
    }

    pub fn from_env_or_default() -> Self {
        let secret = env::var("BOTSTORE_WEBHOOK_SECRET").ok().unwrap_or_default();
        let signature_checks = env_flag("BOTSTORE_WEBHOOK_SIGNATURE_CHECKS", true);
        if !signature_checks {
            warn!(
                "🪛️ Webhook signature checks are DISABLED. Anyone can mark orders as paid. Never run like this in \
                 production."
            );
        } else if secret.is_empty() {
            warn!("🪛️ BOTSTORE_WEBHOOK_SECRET is not set. Every payment webhook will be rejected.");
        }
        Self { secret: Secret::new(secret), signature_checks }
    }
}

fn configure_expiry_interval() -> Option<Duration> {
    match env::var("BOTSTORE_EXPIRY_INTERVAL_SECS") {
        Ok(s) => match s.trim().parse::<u64>() {
            Ok(0) => {
                info!("🪛️ BOTSTORE_EXPIRY_INTERVAL_SECS is 0. The order expiry worker is disabled.");
                None
            },
            Ok(secs) => Some(Duration::from_secs(secs)),
            Err(e) => {
                warn!(
                    "🪛️ Invalid value for BOTSTORE_EXPIRY_INTERVAL_SECS ({s}). {e} Using the default of {}s.",
                    DEFAULT_EXPIRY_INTERVAL.as_secs()
                );
                Some(DEFAULT_EXPIRY_INTERVAL)
            },
        },
        Err(_) => Some(DEFAULT_EXPIRY_INTERVAL),
    }
}

//-------------------------------------------------  ServerOptions  ----------------------------------------------------
/// A subset of the server configuration that is used to configure the server's behaviour. Generally we try to keep this
/// as small as possible, and exclude secrets to avoid passing sensitive information around the system.
#[derive(Clone, Copy, Debug, Default)]
pub struct ServerOptions {
    pub use_x_forwarded_for: bool,
    pub use_forwarded: bool,
    /// Include error details in 500 responses.
    pub development_mode: bool,
}

impl ServerOptions {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            use_x_forwarded_for: config.use_x_forwarded_for,
            use_forwarded: config.use_forwarded,
            development_mode: config.environment.is_development(),
        }
    }
}
