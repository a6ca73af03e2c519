//! Order and panel-user persistence.
//!
//! [`OrderStore`] is the interface the rest of the engine uses. [`DocumentStore`] is the only implementation: an
//! in-process working set backed by a [`StorageMedium`], which is either a pair of JSON documents on disk or nothing
//! at all.
mod document_store;
mod medium;

pub use document_store::DocumentStore;
pub use medium::{StorageMedium, CORRUPT_SUFFIX, ORDERS_DOCUMENT, USERS_DOCUMENT};
use thiserror::Error;

use crate::db_types::{Order, OrderId, OrderStatusType, OrderUpdate, PanelUser, ProvisionedResource, StorageSummary};

#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("Could not access the storage medium. {0}")]
    Io(String),
    #[error("Could not serialize a document. {0}")]
    Serialization(String),
}

#[allow(async_fn_in_trait)]
pub trait OrderStore: Clone {
    async fn fetch_order(&self, id: &OrderId) -> Result<Option<Order>, StorageError>;

    /// Merges `update` into the order with the same id, or inserts a new order.
    ///
    /// Missing fields of a new order are backfilled rather than rejected. If `update.id` is `None` a fresh, unused id
    /// is generated. `updated_at` is always refreshed.
    async fn upsert_order(&self, update: OrderUpdate) -> Result<Order, StorageError>;

    /// Sets the status of an order, attaching `resource` if the new status is `success`.
    ///
    /// Returns `None`, and changes nothing, if there is no such order.
    async fn update_order_status(
        &self,
        id: &OrderId,
        status: OrderStatusType,
        resource: Option<ProvisionedResource>,
    ) -> Result<Option<Order>, StorageError>;

    async fn fetch_pending_order_for_owner(&self, owner_name: &str) -> Result<Option<Order>, StorageError>;

    async fn fetch_orders_with_status(&self, status: OrderStatusType) -> Result<Vec<Order>, StorageError>;

    /// Inserts or updates the user with the same username. The original `created_at` is kept on update.
    async fn save_panel_user(&self, user: PanelUser) -> Result<PanelUser, StorageError>;

    async fn fetch_panel_user(&self, username: &str) -> Result<Option<PanelUser>, StorageError>;

    async fn storage_summary(&self) -> Result<StorageSummary, StorageError>;
}
