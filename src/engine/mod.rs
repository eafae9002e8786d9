//! Engine Module
//!
//! The request-interception engine: classifier, strategy router, lifecycle
//! transitions, and the control-channel dispatcher, all operating over the
//! shared store registry.

pub mod classify;
pub mod control;
pub mod fallback;
mod lifecycle;
mod strategy;

// Re-export public types
pub use classify::{classify, Destination, FetchRequest, RequestClass, IMAGE_EXTENSIONS};
pub use control::{CacheSizeReply, ChapterManifest, ControlMessage};
pub use strategy::Handled;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::info;

use crate::config::Config;
use crate::fetch::Fetch;
use crate::store::{EvictionPolicy, SharedStore, StoreRegistry};

// == Engine ==
/// The offline caching engine.
///
/// Holds the configuration, the store registry, the network fetcher, and the
/// image-store eviction policy. Cheap to clone; clones share all state.
#[derive(Debug)]
pub struct Engine<F: Fetch> {
    /// Engine configuration, shared read-only
    config: Arc<Config>,
    /// Named-store namespace
    stores: StoreRegistry,
    /// Network seam
    fetcher: Arc<F>,
    /// Eviction policy for the image store
    policy: EvictionPolicy,
    /// Set by install and by the SKIP_WAITING command
    activation_requested: Arc<AtomicBool>,
    /// Set by activate once this version governs requests
    controlling: Arc<AtomicBool>,
}

impl<F: Fetch> Clone for Engine<F> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            stores: self.stores.clone(),
            fetcher: self.fetcher.clone(),
            policy: self.policy,
            activation_requested: self.activation_requested.clone(),
            controlling: self.controlling.clone(),
        }
    }
}

impl<F: Fetch> Engine<F> {
    // == Constructor ==
    /// Creates an engine with an empty store registry.
    pub fn new(config: Config, fetcher: F) -> Self {
        let policy = config.eviction_policy();
        Self {
            config: Arc::new(config),
            stores: StoreRegistry::new(),
            fetcher: Arc::new(fetcher),
            policy,
            activation_requested: Arc::new(AtomicBool::new(false)),
            controlling: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Returns the engine configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the store registry.
    pub fn stores(&self) -> &StoreRegistry {
        &self.stores
    }

    /// Returns the image-store eviction policy.
    pub fn policy(&self) -> EvictionPolicy {
        self.policy
    }

    // == Well-Known Stores ==
    pub(crate) async fn shell_store(&self) -> SharedStore {
        self.stores.open(&self.config.shell_store_name()).await
    }

    pub(crate) async fn api_store(&self) -> SharedStore {
        self.stores.open(&self.config.api_store_name()).await
    }

    pub(crate) async fn image_store(&self) -> SharedStore {
        self.stores.open(&self.config.image_store_name()).await
    }

    // == Activation State ==
    /// Requests immediate activation, skipping the waiting phase.
    ///
    /// Idempotent; fired by install and by the SKIP_WAITING command.
    pub fn request_activation(&self) {
        if !self.activation_requested.swap(true, Ordering::SeqCst) {
            info!("immediate activation requested");
        }
    }

    /// Whether immediate activation has been requested.
    pub fn activation_requested(&self) -> bool {
        self.activation_requested.load(Ordering::SeqCst)
    }

    pub(crate) fn set_controlling(&self) {
        self.controlling.store(true, Ordering::SeqCst);
    }

    /// Whether this engine version has taken over request handling.
    pub fn is_controlling(&self) -> bool {
        self.controlling.load(Ordering::SeqCst)
    }
}
