use std::{collections::BTreeMap, io, path::Path, sync::Arc};

use chrono::Utc;
use log::*;
use serde::Serialize;
use tokio::{fs, sync::RwLock};

use super::{
    medium::{is_read_only, StorageMedium},
    OrderStore,
    StorageError,
    ORDERS_DOCUMENT,
    USERS_DOCUMENT,
};
use crate::{
    db_types::{Order, OrderId, OrderStatusType, OrderUpdate, PanelUser, ProvisionedResource, StorageSummary},
    helpers::generate_order_id,
};

/// The order store.
///
/// All reads are served from the working set. Every mutation takes the write lock, applies the change to a copy of
/// the affected collection, persists the copy and only then commits it. If persisting fails for any reason other than
/// a read-only medium, the working set is left as it was.
#[derive(Clone)]
pub struct DocumentStore {
    state: Arc<RwLock<WorkingSet>>,
}

struct WorkingSet {
    orders: BTreeMap<OrderId, Order>,
    users: BTreeMap<String, PanelUser>,
    medium: StorageMedium,
}

impl std::fmt::Debug for DocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DocumentStore")
    }
}

impl DocumentStore {
    /// A store that keeps everything in memory.
    pub fn volatile() -> Self {
        Self::with_state(WorkingSet::empty(StorageMedium::Volatile))
    }

    /// Opens the JSON documents in `dir`, creating the directory and documents as needed.
    ///
    /// If the directory cannot be written to, the store falls back to memory for the rest of the process lifetime.
    /// Whatever could be read from the documents is kept in that case.
    pub async fn open<P: AsRef<Path>>(dir: P) -> Result<Self, StorageError> {
        let dir = dir.as_ref();
        let (mut state, damaged) = match Self::load_files(dir).await {
            Ok(loaded) => loaded,
            Err(e) if is_read_only(&e) => {
                warn!("💾️ {} is not accessible ({e}). Orders will only be kept in memory", dir.display());
                return Ok(Self::volatile());
            },
            Err(e) => return Err(StorageError::Io(format!("{}: {e}", dir.display()))),
        };
        if damaged.orders {
            let orders = state.orders.clone();
            state.commit_orders(orders).await?;
        }
        if damaged.users {
            let users = state.users.clone();
            state.commit_users(users).await?;
        }
        match &state.medium {
            StorageMedium::JsonFiles(_) => info!("💾️ Order store opened in {}", dir.display()),
            StorageMedium::Volatile => {
                warn!("💾️ {} is not writable. Orders will only be kept in memory", dir.display())
            },
        }
        debug!("💾️ Loaded {} orders and {} users", state.orders.len(), state.users.len());
        Ok(Self::with_state(state))
    }

    fn with_state(state: WorkingSet) -> Self {
        Self { state: Arc::new(RwLock::new(state)) }
    }

    /// Reads both documents into a fresh working set. The flags say which documents must be rewritten.
    async fn load_files(dir: &Path) -> io::Result<(WorkingSet, Damaged)> {
        fs::create_dir_all(dir).await?;
        let medium = StorageMedium::JsonFiles(dir.to_path_buf());
        let orders = medium.read_document::<Order>(ORDERS_DOCUMENT).await?;
        let users = medium.read_document::<PanelUser>(USERS_DOCUMENT).await?;
        let damaged = Damaged { orders: orders.needs_rewrite, users: users.needs_rewrite };
        let mut state = WorkingSet::empty(medium);
        state.orders = orders.records.into_iter().map(|o| (o.id.clone(), o)).collect();
        state.users = users.records.into_iter().map(|u| (u.username.clone(), u)).collect();
        Ok((state, damaged))
    }

    /// The medium currently in use. This can change from files to memory, but never back.
    pub async fn medium(&self) -> StorageMedium {
        self.state.read().await.medium.clone()
    }
}

struct Damaged {
    orders: bool,
    users: bool,
}

impl WorkingSet {
    fn empty(medium: StorageMedium) -> Self {
        Self { orders: BTreeMap::new(), users: BTreeMap::new(), medium }
    }

    async fn persist<T: Serialize>(&mut self, document: &str, records: &[T]) -> Result<(), StorageError> {
        match self.medium.write_document(document, records).await {
            Ok(()) => Ok(()),
            Err(e) if is_read_only(&e) => {
                warn!("💾️ The storage medium has become read-only ({e}). Switching to in-memory storage for good");
                self.medium = StorageMedium::Volatile;
                Ok(())
            },
            Err(e) if e.kind() == io::ErrorKind::InvalidData => Err(StorageError::Serialization(e.to_string())),
            Err(e) => {
                error!("💾️ Could not write {document}. {e}");
                Err(StorageError::Io(e.to_string()))
            },
        }
    }

    async fn commit_orders(&mut self, orders: BTreeMap<OrderId, Order>) -> Result<(), StorageError> {
        let records = order_records(&orders);
        self.persist(ORDERS_DOCUMENT, &records).await?;
        self.orders = orders;
        Ok(())
    }

    async fn commit_users(&mut self, users: BTreeMap<String, PanelUser>) -> Result<(), StorageError> {
        let records = users.values().collect::<Vec<_>>();
        self.persist(USERS_DOCUMENT, &records).await?;
        self.users = users;
        Ok(())
    }
}

/// Orders are written oldest first.
fn order_records(orders: &BTreeMap<OrderId, Order>) -> Vec<&Order> {
    let mut records = orders.values().collect::<Vec<_>>();
    records.sort_by_key(|o| o.created_at);
    records
}

impl OrderStore for DocumentStore {
    async fn fetch_order(&self, id: &OrderId) -> Result<Option<Order>, StorageError> {
        Ok(self.state.read().await.orders.get(id).cloned())
    }

    async fn upsert_order(&self, mut update: OrderUpdate) -> Result<Order, StorageError> {
        let now = Utc::now();
        let mut state = self.state.write().await;
        let mut orders = state.orders.clone();
        let id = match update.id.take() {
            Some(id) => id,
            None => {
                let mut id = generate_order_id();
                while orders.contains_key(&id) {
                    trace!("💾️ Order id {id} is taken. Generating another");
                    id = generate_order_id();
                }
                id
            },
        };
        let order = match orders.get_mut(&id) {
            Some(existing) => {
                existing.apply(update, now);
                existing.clone()
            },
            None => {
                update.id = Some(id.clone());
                let order = Order::from_update(update, now);
                orders.insert(id, order.clone());
                order
            },
        };
        state.commit_orders(orders).await?;
        trace!("💾️ Order {} saved with status {}", order.id, order.status);
        Ok(order)
    }

    async fn update_order_status(
        &self,
        id: &OrderId,
        status: OrderStatusType,
        resource: Option<ProvisionedResource>,
    ) -> Result<Option<Order>, StorageError> {
        let mut state = self.state.write().await;
        if !state.orders.contains_key(id) {
            return Ok(None);
        }
        let mut orders = state.orders.clone();
        let order = match orders.get_mut(id) {
            Some(order) => {
                order.set_status(status);
                if status == OrderStatusType::Success {
                    order.provisioned = resource;
                }
                order.updated_at = Utc::now();
                order.clone()
            },
            None => return Ok(None),
        };
        state.commit_orders(orders).await?;
        debug!("💾️ Order {id} is now {status}");
        Ok(Some(order))
    }

    async fn fetch_pending_order_for_owner(&self, owner_name: &str) -> Result<Option<Order>, StorageError> {
        let state = self.state.read().await;
        Ok(state
            .orders
            .values()
            .find(|o| o.owner_name == owner_name && o.status == OrderStatusType::Pending)
            .cloned())
    }

    async fn fetch_orders_with_status(&self, status: OrderStatusType) -> Result<Vec<Order>, StorageError> {
        let state = self.state.read().await;
        Ok(state.orders.values().filter(|o| o.status == status).cloned().collect())
    }

    async fn save_panel_user(&self, user: PanelUser) -> Result<PanelUser, StorageError> {
        let mut state = self.state.write().await;
        let mut users = state.users.clone();
        let saved = match users.get_mut(&user.username) {
            Some(existing) => {
                existing.email = user.email;
                existing.password = user.password;
                existing.panel_user_id = user.panel_user_id;
                existing.clone()
            },
            None => {
                users.insert(user.username.clone(), user.clone());
                user
            },
        };
        state.commit_users(users).await?;
        debug!("💾️ Panel user {} saved", saved.username);
        Ok(saved)
    }

    async fn fetch_panel_user(&self, username: &str) -> Result<Option<PanelUser>, StorageError> {
        Ok(self.state.read().await.users.get(username).cloned())
    }

    async fn storage_summary(&self) -> Result<StorageSummary, StorageError> {
        let state = self.state.read().await;
        Ok(StorageSummary { medium: state.medium.kind(), orders: state.orders.len(), users: state.users.len() })
    }
}
