use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use log::*;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::db_types::OrderId;

/// One async mutex per order id, created on demand.
///
/// Work on different orders proceeds in parallel. Work on the same order is serialised for as long as the guard
/// returned by [`OrderLocks::lock`] is held. Entries nobody holds or waits on are pruned whenever a lock is taken.
#[derive(Debug, Default)]
pub struct OrderLocks {
    locks: Mutex<HashMap<OrderId, Arc<AsyncMutex<()>>>>,
}

impl OrderLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock(&self, id: &OrderId) -> OwnedMutexGuard<()> {
        let mutex = {
            let mut locks = match self.locks.lock() {
                Ok(locks) => locks,
                Err(poisoned) => poisoned.into_inner(),
            };
            locks.retain(|_, m| Arc::strong_count(m) > 1);
            locks.entry(id.clone()).or_default().clone()
        };
        trace!("🔒️ Waiting for the lock on order {id}");
        mutex.lock_owned().await
    }

    /// Number of orders that currently have a lock entry.
    pub fn len(&self) -> usize {
        match self.locks.lock() {
            Ok(locks) => locks.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
