use botstore_common::Rupiah;
use botstore_engine::{
    catalog::Package,
    db_types::{Credentials, Order, OrderId, OrderStatusType, PackageSelection, StorageMediumKind, StorageSummary},
    order_objects::{DepositResult, EventOutcome},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const ORDER_CREATED_MESSAGE: &str = "Order created successfully";

//--------------------------------------    OrderCreated     ---------------------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreatedResponse {
    pub success: bool,
    pub message: String,
    pub order_id: OrderId,
    pub qr_url: Option<String>,
    pub qr_string: Option<String>,
    pub amount: Rupiah,
    pub expires_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl From<DepositResult> for OrderCreatedResponse {
    fn from(deposit: DepositResult) -> Self {
        Self {
            success: true,
            message: ORDER_CREATED_MESSAGE.to_string(),
            order_id: deposit.order_id,
            qr_url: deposit.qr_url,
            qr_string: deposit.qr_string,
            amount: deposit.amount,
            expires_at: deposit.expires_at,
            warning: deposit.warning,
        }
    }
}

//--------------------------------------     OrderView       ---------------------------------------------------------
/// The customer-facing view of an order. Payment internals (gateway reference, paid amount, fee) are never exposed,
/// and the server details only appear once the order has succeeded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderView {
    pub id: OrderId,
    pub status: OrderStatusType,
    pub owner_name: String,
    pub package: Option<PackageSelection>,
    pub amount: Rupiah,
    pub qr_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<ServerView>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<Credentials>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerView {
    pub server_id: u64,
    pub identifier: String,
    pub name: String,
    pub package_name: String,
    pub memory_mb: u64,
    pub disk_mb: u64,
    pub cpu_percent: u64,
    pub panel_url: String,
    pub created_at: DateTime<Utc>,
}

impl From<Order> for OrderView {
    fn from(order: Order) -> Self {
        let (server, credentials) = match (order.status, order.provisioned) {
            (OrderStatusType::Success, Some(resource)) => {
                let server = ServerView {
                    server_id: resource.server_id,
                    identifier: resource.identifier,
                    name: resource.name,
                    package_name: resource.package_name,
                    memory_mb: resource.memory_mb,
                    disk_mb: resource.disk_mb,
                    cpu_percent: resource.cpu_percent,
                    panel_url: resource.panel_url,
                    created_at: resource.created_at,
                };
                (Some(server), Some(resource.credentials))
            },
            _ => (None, None),
        };
        Self {
            id: order.id,
            status: order.status,
            owner_name: order.owner_name,
            package: order.package,
            amount: order.amount,
            qr_url: order.qr_url,
            created_at: order.created_at,
            updated_at: order.updated_at,
            expires_at: order.expires_at,
            server,
            credentials,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusResponse {
    pub success: bool,
    pub order: OrderView,
}

//--------------------------------------     Packages        ---------------------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageView {
    pub id: String,
    pub name: String,
    pub ram: String,
    pub disk: String,
    pub cpu: String,
    pub memory_mb: u64,
    pub disk_mb: u64,
    pub cpu_percent: u64,
    pub price: Rupiah,
}

impl From<&Package> for PackageView {
    fn from(p: &Package) -> Self {
        Self {
            id: p.id.to_string(),
            name: p.name.to_string(),
            ram: p.ram_label(),
            disk: p.disk_label(),
            cpu: p.cpu_label(),
            memory_mb: p.memory_mb,
            disk_mb: p.disk_mb,
            cpu_percent: p.cpu_percent,
            price: p.price,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackagesResponse {
    pub success: bool,
    pub packages: Vec<PackageView>,
}

//--------------------------------------     Webhook         ---------------------------------------------------------
/// Acknowledgement for a payment webhook call. The gateway only cares that it got a 200.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookAck {
    pub received: bool,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<OrderId>,
}

impl WebhookAck {
    pub fn new<S: Into<String>>(status: S, order_id: Option<OrderId>) -> Self {
        Self { received: true, status: status.into(), order_id }
    }
}

impl From<&EventOutcome> for WebhookAck {
    fn from(outcome: &EventOutcome) -> Self {
        Self::new(outcome.label(), outcome.order_id().cloned())
    }
}

//--------------------------------------      Health         ---------------------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub storage: StorageHealth,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageHealth {
    pub medium: StorageMediumKind,
    pub orders_count: usize,
    pub users_count: usize,
}

impl From<StorageSummary> for StorageHealth {
    fn from(summary: StorageSummary) -> Self {
        Self { medium: summary.medium, orders_count: summary.orders, users_count: summary.users }
    }
}
