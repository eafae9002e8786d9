//! Cache Store Module
//!
//! A named URL-to-response table. Entries have no TTL: they live until the
//! eviction manager removes them or the whole store is cleared.

use std::collections::HashMap;

use crate::store::{StoreStats, StoredResponse};

// == Cache Store ==
/// A named mapping from request URL to stored response.
#[derive(Debug)]
pub struct CacheStore {
    /// Store name (version-tagged, e.g. "image-v2")
    name: String,
    /// Key-response storage
    entries: HashMap<String, StoredResponse>,
    /// Lookup and eviction statistics
    stats: StoreStats,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a new empty store with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: HashMap::new(),
            stats: StoreStats::new(),
        }
    }

    /// Returns the store name.
    pub fn name(&self) -> &str {
        &self.name
    }

    // == Put ==
    /// Stores a response under a URL key, overwriting any existing entry.
    ///
    /// Overwrites are idempotent: a second concurrent write of the same key
    /// simply replaces the first copy.
    pub fn put(&mut self, key: impl Into<String>, response: StoredResponse) {
        self.entries.insert(key.into(), response);
    }

    // == Get ==
    /// Retrieves a copy of the response stored under a key.
    ///
    /// Records a hit or miss in the store statistics.
    pub fn get(&mut self, key: &str) -> Option<StoredResponse> {
        match self.entries.get(key) {
            Some(response) => {
                self.stats.record_hit();
                Some(response.clone())
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    /// Looks up a key without touching statistics.
    pub fn peek(&self, key: &str) -> Option<&StoredResponse> {
        self.entries.get(key)
    }

    // == Delete ==
    /// Removes an entry by key. Returns true if the entry existed.
    pub fn delete(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Records an eviction performed by the eviction manager.
    pub fn record_eviction(&mut self) {
        self.stats.record_eviction();
    }

    // == Enumeration ==
    /// Returns all keys currently in the store.
    pub fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// Iterates over all entries.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &StoredResponse)> {
        self.entries.iter()
    }

    // == Size ==
    /// Sum of `content-length`-reported sizes across all entries.
    ///
    /// This is what the eviction manager budgets against.
    pub fn total_reported_bytes(&self) -> u64 {
        self.entries.values().map(|r| r.size_bytes()).sum()
    }

    /// Sum of actual body bytes across all entries.
    ///
    /// This is what the control channel's size report returns; it can
    /// disagree with [`Self::total_reported_bytes`] when headers are absent.
    pub fn total_body_bytes(&self) -> u64 {
        self.entries.values().map(|r| r.body_len()).sum()
    }

    // == Stats ==
    /// Returns a snapshot of the store statistics.
    pub fn stats(&self) -> StoreStats {
        self.stats.clone()
    }

    // == Length ==
    /// Returns the current number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // == Clear ==
    /// Removes every entry from the store.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
