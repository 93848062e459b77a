use std::{collections::BTreeMap, sync::Arc};

use models::item::{Item, ItemInput};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::errors::ServiceError;

const FIRST_ID: i64 = 1;

/// Collection plus id counter. Both live behind the same lock.
///
/// Ids are handed out in strictly increasing order and entries are never
/// re-keyed, so iterating the map by key yields insertion order.
#[derive(Debug)]
struct Inner {
    items: BTreeMap<i64, Item>,
    next_id: i64,
}

impl Default for Inner {
    fn default() -> Self {
        Self { items: BTreeMap::new(), next_id: FIRST_ID }
    }
}

/// In-memory item collection. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct ItemStore {
    inner: RwLock<Inner>,
}

impl ItemStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// All items in insertion order.
    pub async fn list(&self) -> Vec<Item> {
        let inner = self.inner.read().await;
        inner.items.values().cloned().collect()
    }

    pub async fn get(&self, id: i64) -> Result<Item, ServiceError> {
        let inner = self.inner.read().await;
        inner.items.get(&id).cloned().ok_or_else(|| not_found(id))
    }

    /// Store a new item under the next id. Never fails.
    pub async fn create(&self, input: ItemInput) -> Item {
        let mut inner = self.inner.write().await;
        let id = inner.next_id;
        inner.next_id += 1;
        let item = input.into_item(id);
        inner.items.insert(id, item.clone());
        info!(item_id = id, "item created");
        item
    }

    /// Replace the whole record under `id`; fields omitted from `input` get
    /// their create-time defaults, not the stored values.
    pub async fn update(&self, id: i64, input: ItemInput) -> Result<Item, ServiceError> {
        let mut inner = self.inner.write().await;
        let slot = inner.items.get_mut(&id).ok_or_else(|| not_found(id))?;
        *slot = input.into_item(id);
        info!(item_id = id, "item updated");
        Ok(slot.clone())
    }

    /// Remove the item and return it.
    pub async fn delete(&self, id: i64) -> Result<Item, ServiceError> {
        let mut inner = self.inner.write().await;
        let removed = inner.items.remove(&id).ok_or_else(|| not_found(id))?;
        info!(item_id = id, "item deleted");
        Ok(removed)
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.inner.read().await.items.len()
    }

    #[cfg(test)]
    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn not_found(id: i64) -> ServiceError {
    warn!(item_id = id, "item not found");
    ServiceError::NotFound(id)
}
