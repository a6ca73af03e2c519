use std::{fmt::Display, str::FromStr};

use botstore_common::{Rupiah, Secret};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::helpers::generate_order_id;

/// Owner name used when a partial write does not supply one.
pub const UNKNOWN_OWNER: &str = "unknown";

//--------------------------------------      OrderId        ---------------------------------------------------------
/// Opaque order identifier. Also sent to the payment gateway as the deposit reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub String);

impl OrderId {
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for OrderId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for OrderId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

//--------------------------------------   OrderStatusType     ---------------------------------------------------------
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatusType {
    /// Awaiting payment.
    #[default]
    Pending,
    /// Paid, and the server is being provisioned.
    Processing,
    /// Paid and provisioned.
    Success,
    /// The payment failed or expired, or provisioning failed.
    Failed,
}

impl OrderStatusType {
    /// Terminal orders never change status again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Failed)
    }
}

impl Display for OrderStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Processing => write!(f, "processing"),
            Self::Success => write!(f, "success"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid order status: {0}")]
pub struct OrderStatusConversionError(pub String);

impl FromStr for OrderStatusType {
    type Err = OrderStatusConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "success" => Ok(Self::Success),
            "failed" => Ok(Self::Failed),
            _ => Err(OrderStatusConversionError(s.to_string())),
        }
    }
}

//--------------------------------------  PackageSelection   ---------------------------------------------------------
/// A copy of the catalog entry the customer chose, stored with the order so that later catalog changes do not
/// rewrite history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageSelection {
    pub id: String,
    pub name: String,
    pub memory_mb: u64,
    pub disk_mb: u64,
    pub cpu_percent: u64,
    pub price: Rupiah,
}

//--------------------------------------  ProvisionedResource  -------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub email: String,
    pub password: Secret<String>,
}

/// The server that was created for a paid order, along with the panel login the customer should use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionedResource {
    pub server_id: u64,
    pub identifier: String,
    pub name: String,
    pub package_name: String,
    pub memory_mb: u64,
    pub disk_mb: u64,
    pub cpu_percent: u64,
    pub panel_url: String,
    pub credentials: Credentials,
    pub created_at: DateTime<Utc>,
}

//--------------------------------------        Order          ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub owner_name: String,
    #[serde(default)]
    pub package: Option<PackageSelection>,
    pub status: OrderStatusType,
    pub amount: Rupiah,
    /// Generated once when the order is created. Used for the panel account and handed to the customer.
    #[serde(default)]
    pub password: Secret<String>,
    #[serde(default)]
    pub payment_reference: Option<String>,
    #[serde(default)]
    pub qr_url: Option<String>,
    #[serde(default)]
    pub qr_string: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub paid_amount: Option<Rupiah>,
    #[serde(default)]
    pub fee: Option<Rupiah>,
    #[serde(default)]
    pub paid_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub provisioned: Option<ProvisionedResource>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Builds a new record from a partial write, filling in whatever is missing.
    pub fn from_update(update: OrderUpdate, now: DateTime<Utc>) -> Self {
        let mut order = Self {
            id: update.id.clone().unwrap_or_else(generate_order_id),
            owner_name: UNKNOWN_OWNER.to_string(),
            package: None,
            status: OrderStatusType::Pending,
            amount: Rupiah::default(),
            password: Secret::default(),
            payment_reference: None,
            qr_url: None,
            qr_string: None,
            note: None,
            paid_amount: None,
            fee: None,
            paid_at: None,
            provisioned: None,
            created_at: now,
            updated_at: now,
            expires_at: None,
        };
        order.apply(update, now);
        order
    }

    /// Merges the supplied fields into this record.
    ///
    /// The id never changes. The amount and password are only written if they have not been set before. Writing a
    /// status other than `success` clears any provisioned resource.
    pub fn apply(&mut self, update: OrderUpdate, now: DateTime<Utc>) {
        if let Some(owner) = update.owner_name {
            self.owner_name = owner;
        }
        if let Some(package) = update.package {
            self.package = Some(package);
        }
        if let Some(status) = update.status {
            self.set_status(status);
        }
        if let Some(amount) = update.amount {
            if self.amount == Rupiah::default() {
                self.amount = amount;
            }
        }
        if let Some(password) = update.password {
            if self.password.reveal().is_empty() {
                self.password = password;
            }
        }
        merge(&mut self.payment_reference, update.payment_reference);
        merge(&mut self.qr_url, update.qr_url);
        merge(&mut self.qr_string, update.qr_string);
        merge(&mut self.note, update.note);
        merge(&mut self.paid_amount, update.paid_amount);
        merge(&mut self.fee, update.fee);
        merge(&mut self.paid_at, update.paid_at);
        merge(&mut self.expires_at, update.expires_at);
        self.updated_at = now;
    }

    pub fn set_status(&mut self, status: OrderStatusType) {
        self.status = status;
        if status != OrderStatusType::Success {
            self.provisioned = None;
        }
    }

    /// True for a pending order whose payment window has closed.
    pub fn is_abandoned(&self, now: DateTime<Utc>) -> bool {
        self.status == OrderStatusType::Pending && self.expires_at.map(|t| t <= now).unwrap_or(false)
    }
}

fn merge<T>(field: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *field = value;
    }
}

//--------------------------------------     OrderUpdate       ---------------------------------------------------------
/// A partial order write. Fields left as `None` are not touched.
#[derive(Debug, Clone, Default)]
pub struct OrderUpdate {
    pub id: Option<OrderId>,
    pub owner_name: Option<String>,
    pub package: Option<PackageSelection>,
    pub status: Option<OrderStatusType>,
    pub amount: Option<Rupiah>,
    pub password: Option<Secret<String>>,
    pub payment_reference: Option<String>,
    pub qr_url: Option<String>,
    pub qr_string: Option<String>,
    pub note: Option<String>,
    pub paid_amount: Option<Rupiah>,
    pub fee: Option<Rupiah>,
    pub paid_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl OrderUpdate {
    pub fn for_order(id: &OrderId) -> Self {
        Self { id: Some(id.clone()), ..Default::default() }
    }

    pub fn with_status(mut self, status: OrderStatusType) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_note<S: Into<String>>(mut self, note: S) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn with_package(mut self, package: PackageSelection) -> Self {
        self.package = Some(package);
        self
    }
}

//--------------------------------------      PanelUser        ---------------------------------------------------------
/// A customer account on the hosting panel, keyed by username.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelUser {
    pub username: String,
    pub email: String,
    pub password: Secret<String>,
    pub panel_user_id: u64,
    pub created_at: DateTime<Utc>,
}

//--------------------------------------    StorageSummary     ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageMediumKind {
    JsonFiles,
    Volatile,
}

impl Display for StorageMediumKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::JsonFiles => write!(f, "json_files"),
            Self::Volatile => write!(f, "volatile"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSummary {
    pub medium: StorageMediumKind,
    pub orders: usize,
    pub users: usize,
}
