use std::fmt::Debug;

use botstore_common::Secret;
use chrono::Utc;
use log::*;

use crate::{
    api::errors::ProvisioningError,
    catalog::tier_for_amount,
    db_types::{Credentials, Order, PanelUser, ProvisionedResource},
    storage::OrderStore,
    traits::{NewAccount, PanelAccount, PanelError, ProvisioningPanel, ServerSpec},
};

pub const DEFAULT_CONTACT_DOMAIN: &str = "gmail.com";

/// `ProvisioningApi` turns a paid order into a panel account and a running server.
pub struct ProvisioningApi<S, P> {
    store: S,
    panel: P,
    contact_domain: String,
}

impl<S, P> Debug for ProvisioningApi<S, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ProvisioningApi")
    }
}

impl<S, P> ProvisioningApi<S, P> {
    pub fn new(store: S, panel: P) -> Self {
        Self { store, panel, contact_domain: DEFAULT_CONTACT_DOMAIN.to_string() }
    }

    pub fn with_contact_domain<D: Into<String>>(mut self, domain: D) -> Self {
        self.contact_domain = domain.into();
        self
    }

    pub fn contact_for(&self, owner_name: &str) -> String {
        format!("{owner_name}@{}", self.contact_domain)
    }

    pub fn panel(&self) -> &P {
        &self.panel
    }
}

impl<S, P> ProvisioningApi<S, P>
where
    S: OrderStore,
    P: ProvisioningPanel,
{
    /// Creates (or reuses) the customer's panel account and creates one server sized for what they paid.
    pub async fn provision(&self, order: &Order) -> Result<ProvisionedResource, ProvisioningError> {
        if order.password.reveal().is_empty() {
            return Err(ProvisioningError::MissingCredentials(order.id.clone()));
        }
        info!("🖥️ Provisioning a server for order {}", order.id);
        let email = self.contact_for(&order.owner_name);
        let (account, password) = self.ensure_account(order, &email).await?;

        let tier = tier_for_amount(order.paid_amount.unwrap_or(order.amount));
        let now = Utc::now();
        let spec = ServerSpec {
            name: format!("bot-{}-{:06}", order.owner_name, now.timestamp_millis() % 1_000_000),
            owner_id: account.id,
            memory_mb: tier.memory_mb,
            disk_mb: tier.disk_mb,
            cpu_percent: tier.cpu_percent,
            order_id: order.id.clone(),
        };
        let server = self.panel.create_server(&spec).await?;
        debug!("🖥️ Server {} ({}) created for order {}", server.name, server.identifier, order.id);

        let user = PanelUser {
            username: order.owner_name.clone(),
            email: email.clone(),
            password: password.clone(),
            panel_user_id: account.id,
            created_at: now,
        };
        self.store.save_panel_user(user).await?;

        Ok(ProvisionedResource {
            server_id: server.id,
            panel_url: self.panel.server_url(&server.identifier),
            identifier: server.identifier,
            name: server.name,
            package_name: tier.name.to_string(),
            memory_mb: tier.memory_mb,
            disk_mb: tier.disk_mb,
            cpu_percent: tier.cpu_percent,
            credentials: Credentials { username: order.owner_name.clone(), email, password },
            created_at: now,
        })
    }

    /// Returns the customer's panel account together with the password that logs into it.
    ///
    /// A new account gets the order's password. An existing account keeps the password it was registered with, which
    /// must be on record in the users collection. Without it the customer could not log in, so provisioning fails.
    async fn ensure_account(
        &self,
        order: &Order,
        email: &str,
    ) -> Result<(PanelAccount, Secret<String>), ProvisioningError> {
        let new_account = NewAccount {
            username: order.owner_name.clone(),
            email: email.to_string(),
            password: order.password.clone(),
            first_name: "Server".to_string(),
            last_name: "Customer".to_string(),
        };
        match self.panel.create_account(&new_account).await {
            Ok(account) => Ok((account, order.password.clone())),
            Err(PanelError::AccountExists(reason)) => {
                debug!("🖥️ Panel account for {} already exists ({reason}). Looking it up", order.owner_name);
                let account = self
                    .panel
                    .find_account(email, &order.owner_name)
                    .await?
                    .ok_or_else(|| ProvisioningError::AccountNotFound(order.owner_name.clone()))?;
                let known = self.store.fetch_panel_user(&order.owner_name).await?;
                match known {
                    Some(user) if !user.password.reveal().is_empty() => {
                        debug!("🖥️ Reusing panel account {} for order {}", account.id, order.id);
                        Ok((account, user.password))
                    },
                    _ => {
                        warn!("🖥️ Panel account {} exists, but its password is not on record", order.owner_name);
                        Err(ProvisioningError::UnknownAccountPassword(order.owner_name.clone()))
                    },
                }
            },
            Err(e) => Err(e.into()),
        }
    }
}
