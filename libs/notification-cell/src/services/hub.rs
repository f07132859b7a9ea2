use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use crate::services::sink::KeyValueStore;
use crate::services::store::NotificationStore;

/// Key prefix shared by every per-user list.
pub const STORAGE_KEY: &str = "notifications";

pub const DEFAULT_MAX_OPEN_STORES: usize = 1024;

/// One `NotificationStore` per user over a shared sink.
///
/// At most `max_open` stores stay cached. Once the cap is reached, stores no
/// request is holding are dropped; their lists live in the sink and are
/// reloaded on next access. Stores in use are never dropped, so one user never
/// has two live stores over the same key.
pub struct NotificationHub {
    sink: Arc<dyn KeyValueStore>,
    stores: RwLock<HashMap<String, Arc<NotificationStore>>>,
    max_open: usize,
}

impl NotificationHub {
    pub fn new(sink: Arc<dyn KeyValueStore>) -> Self {
        Self::with_capacity(sink, DEFAULT_MAX_OPEN_STORES)
    }

    pub fn with_capacity(sink: Arc<dyn KeyValueStore>, max_open: usize) -> Self {
        Self {
            sink,
            stores: RwLock::new(HashMap::new()),
            max_open: max_open.max(1),
        }
    }

    pub async fn open_stores(&self) -> usize {
        self.stores.read().await.len()
    }

    pub fn storage_key(user_id: &str) -> String {
        format!("{}:{}", STORAGE_KEY, user_id)
    }

    pub async fn store_for(&self, user_id: &str) -> Arc<NotificationStore> {
        if let Some(store) = self.stores.read().await.get(user_id) {
            return store.clone();
        }

        let mut stores = self.stores.write().await;
        if !stores.contains_key(user_id) && stores.len() >= self.max_open {
            let before = stores.len();
            stores.retain(|_, store| Arc::strong_count(store) > 1);
            debug!("Evicted {} idle notification stores", before - stores.len());
        }

        stores
            .entry(user_id.to_string())
            .or_insert_with(|| {
                debug!("Opening notification store for user {}", user_id);
                Arc::new(NotificationStore::new(Self::storage_key(user_id), self.sink.clone()))
            })
            .clone()
    }
}
