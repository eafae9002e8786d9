//! Strategy Router Module
//!
//! One strategy per request class: network-first with cache fallback for
//! API and page requests, cache-first with network fallback for images and
//! shell assets. Every path terminates in a response; network and storage
//! failures are converted to fallbacks, never propagated.

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::engine::{classify, fallback, Destination, Engine, FetchRequest, RequestClass};
use crate::fetch::Fetch;
use crate::store::{trim, SharedStore, StoredResponse};

// == Handled ==
/// Outcome of a handled request.
///
/// `background` carries the write-then-evict task spawned for image
/// network hits. The response path never awaits it; tests can, to
/// synchronize deterministically.
#[derive(Debug)]
pub struct Handled {
    /// The response to hand back to the requester
    pub response: StoredResponse,
    /// Detached follow-up work, if any
    pub background: Option<JoinHandle<()>>,
}

impl Handled {
    fn direct(response: StoredResponse) -> Self {
        Self {
            response,
            background: None,
        }
    }
}

impl<F: Fetch> Engine<F> {
    // == Handle ==
    /// Intercepts one request and runs the strategy for its class.
    ///
    /// Returns `None` for non-GET requests, which pass through to the
    /// network uninspected.
    pub async fn handle(&self, request: &FetchRequest) -> Option<Handled> {
        if !request.is_interceptable() {
            debug!(method = %request.method, url = %request.url, "passthrough");
            return None;
        }

        let class = classify(self.config(), request);
        debug!(url = %request.url, ?class, "handling request");

        let handled = match class {
            RequestClass::Api => self.network_first_api(request).await,
            RequestClass::Image => self.cache_first_image(request).await,
            RequestClass::Static => self.cache_first_static(request).await,
            RequestClass::Page => self.network_first_page(request).await,
        };
        Some(handled)
    }

    // == API: network-first ==
    /// Network first; on success the response is copied into the api store.
    /// On failure or non-ok status, the cache is consulted; a miss yields
    /// the offline home feed for the feed endpoint, 503 for everything else.
    async fn network_first_api(&self, request: &FetchRequest) -> Handled {
        let store = self.api_store().await;

        match self.fetcher.fetch(request).await {
            Ok(response) if response.is_ok() => {
                store.write().await.put(request.key(), response.clone());
                return Handled::direct(response);
            }
            Ok(response) => {
                debug!(url = %request.url, status = %response.status, "api non-ok, trying cache");
            }
            Err(err) => {
                warn!(url = %request.url, %err, "api fetch failed, trying cache");
            }
        }

        if let Some(cached) = store.write().await.get(&request.key()) {
            return Handled::direct(cached);
        }

        let response = if request.path() == self.config().home_feed_path {
            fallback::offline_feed()
        } else {
            fallback::offline_unavailable()
        };
        Handled::direct(response)
    }

    // == Image: cache-first ==
    /// Cache first, no network on a hit. On a miss the network response is
    /// returned immediately and the store write plus eviction run detached.
    /// A network failure yields the SVG placeholder.
    async fn cache_first_image(&self, request: &FetchRequest) -> Handled {
        let store = self.image_store().await;

        if let Some(cached) = store.write().await.get(&request.key()) {
            return Handled::direct(cached);
        }

        match self.fetcher.fetch(request).await {
            Ok(response) if response.is_ok() => {
                let background =
                    self.schedule_background_write(store, request.key(), response.clone());
                Handled {
                    response,
                    background: Some(background),
                }
            }
            Ok(response) => Handled::direct(response),
            Err(err) => {
                warn!(url = %request.url, %err, "image fetch failed, serving placeholder");
                Handled::direct(fallback::offline_image_placeholder())
            }
        }
    }

    // == Static: cache-first ==
    /// Cache first against the shell store; misses are fetched and written
    /// through before returning. A network failure yields a 503.
    async fn cache_first_static(&self, request: &FetchRequest) -> Handled {
        let store = self.shell_store().await;

        if let Some(cached) = store.write().await.get(&request.key()) {
            return Handled::direct(cached);
        }

        match self.fetcher.fetch(request).await {
            Ok(response) if response.is_ok() => {
                store.write().await.put(request.key(), response.clone());
                Handled::direct(response)
            }
            Ok(response) => Handled::direct(response),
            Err(err) => {
                warn!(url = %request.url, %err, "static fetch failed");
                Handled::direct(fallback::offline_unavailable())
            }
        }
    }

    // == Page: network-first, no cache write ==
    /// Network first, returned as-is. On failure: the shell store by URL,
    /// then the pre-cached offline page for top-level navigations, then 503.
    async fn network_first_page(&self, request: &FetchRequest) -> Handled {
        match self.fetcher.fetch(request).await {
            Ok(response) => return Handled::direct(response),
            Err(err) => {
                warn!(url = %request.url, %err, "page fetch failed, trying shell store");
            }
        }

        let store = self.shell_store().await;
        if let Some(cached) = store.write().await.get(&request.key()) {
            return Handled::direct(cached);
        }

        if request.destination == Destination::Document {
            let offline_key = self.config().shell_url(&self.config().offline_page_path);
            if let Some(page) = store.write().await.get(&offline_key) {
                return Handled::direct(page);
            }
        }

        Handled::direct(fallback::offline_unavailable())
    }

    // == Background Write ==
    /// Spawns the detached write-then-evict sequence for an image response.
    ///
    /// The caller does not await the handle on the response path; a second
    /// request racing this write at worst double-writes the same key, which
    /// put() makes idempotent.
    pub fn schedule_background_write(
        &self,
        store: SharedStore,
        key: String,
        response: StoredResponse,
    ) -> JoinHandle<()> {
        let policy = self.policy();
        tokio::spawn(async move {
            store.write().await.put(key, response);
            trim(&store, policy).await;
        })
    }
}
