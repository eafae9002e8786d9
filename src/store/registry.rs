//! Store Registry Module
//!
//! The named-store namespace. Components address stores by name only; the
//! registry hands out shared handles and owns creation and deletion.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::store::CacheStore;

/// Shared handle to a single cache store.
pub type SharedStore = Arc<RwLock<CacheStore>>;

// == Store Registry ==
/// A shared namespace of named cache stores.
///
/// Deleting a name that does not exist is a no-op, so whole-store deletion
/// (activation garbage collection, clear-all) is safe to run concurrently
/// with in-flight strategy executions.
#[derive(Debug, Clone, Default)]
pub struct StoreRegistry {
    stores: Arc<RwLock<HashMap<String, SharedStore>>>,
}

impl StoreRegistry {
    // == Constructor ==
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    // == Open ==
    /// Returns the store with the given name, creating it if absent.
    pub async fn open(&self, name: &str) -> SharedStore {
        {
            let stores = self.stores.read().await;
            if let Some(store) = stores.get(name) {
                return store.clone();
            }
        }

        let mut stores = self.stores.write().await;
        stores
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(RwLock::new(CacheStore::new(name))))
            .clone()
    }

    // == Get ==
    /// Returns the store with the given name without creating it.
    pub async fn get(&self, name: &str) -> Option<SharedStore> {
        self.stores.read().await.get(name).cloned()
    }

    // == Names ==
    /// Returns the names of all existing stores.
    pub async fn names(&self) -> Vec<String> {
        self.stores.read().await.keys().cloned().collect()
    }

    // == Delete ==
    /// Deletes a store by name. Returns true if the store existed.
    pub async fn delete(&self, name: &str) -> bool {
        self.stores.write().await.remove(name).is_some()
    }

    // == Clear All ==
    /// Deletes every store unconditionally. Returns the number deleted.
    pub async fn clear_all(&self) -> usize {
        let mut stores = self.stores.write().await;
        let count = stores.len();
        stores.clear();
        count
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoredResponse;
    use http::{HeaderMap, StatusCode};

    #[tokio::test]
    async fn test_open_creates_once() {
        let registry = StoreRegistry::new();

        let first = registry.open("image-v2").await;
        first.write().await.put(
            "k",
            StoredResponse::new(StatusCode::OK, HeaderMap::new(), "v"),
        );

        let second = registry.open("image-v2").await;
        assert_eq!(second.read().await.len(), 1);
        assert_eq!(registry.names().await, vec!["image-v2".to_string()]);
    }

    #[tokio::test]
    async fn test_get_does_not_create() {
        let registry = StoreRegistry::new();
        assert!(registry.get("shell-v2").await.is_none());
        assert!(registry.names().await.is_empty());
    }

    #[tokio::test]
    async fn test_delete_is_noop_when_absent() {
        let registry = StoreRegistry::new();
        registry.open("api-v1").await;

        assert!(registry.delete("api-v1").await);
        assert!(!registry.delete("api-v1").await);
        assert!(registry.names().await.is_empty());
    }

    #[tokio::test]
    async fn test_clear_all_twice() {
        let registry = StoreRegistry::new();
        registry.open("shell-v2").await;
        registry.open("api-v2").await;

        assert_eq!(registry.clear_all().await, 2);
        assert_eq!(registry.clear_all().await, 0);
        assert!(registry.names().await.is_empty());
    }
}
