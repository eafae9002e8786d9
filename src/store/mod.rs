//! Store Module
//!
//! Named response stores, the shared registry that owns them, and the
//! byte-budgeted eviction policy applied to the image store.

mod entry;
mod evict;
mod registry;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::StoredResponse;
pub use evict::{trim, EvictionPolicy};
pub use registry::{SharedStore, StoreRegistry};
pub use stats::StoreStats;
pub use store::CacheStore;
