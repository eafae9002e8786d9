//! Comic Cache - An offline request-caching engine
//!
//! Intercepts read-only requests, classifies them, and applies per-class
//! caching strategies over named stores, with byte-budgeted eviction of the
//! image store and a message-based control channel for the host application.

pub mod config;
pub mod engine;
pub mod error;
pub mod fetch;
pub mod store;
pub mod tasks;

pub use config::Config;
pub use engine::{
    classify, CacheSizeReply, ChapterManifest, ControlMessage, Destination, Engine, FetchRequest,
    Handled, RequestClass,
};
pub use error::{EngineError, Result};
pub use fetch::{Fetch, HttpFetcher};
pub use store::{trim, CacheStore, EvictionPolicy, SharedStore, StoreRegistry, StoredResponse};
pub use tasks::{spawn_control_task, ControlRequest};
