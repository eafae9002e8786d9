//! Lifecycle Module
//!
//! The two per-generation transitions: install (pre-warm the shell store,
//! request immediate activation) and activate (garbage-collect stores from
//! prior versions, take over request handling).

use tracing::{error, info};

use crate::engine::{Engine, FetchRequest};
use crate::error::{EngineError, Result};
use crate::fetch::Fetch;

impl<F: Fetch> Engine<F> {
    // == Install ==
    /// Pre-populates the shell store with the configured asset manifest.
    ///
    /// All-or-nothing: every asset is fetched first, and a single failure
    /// (network error or non-ok status) fails the whole step without
    /// writing anything. On success, immediate activation is requested.
    pub async fn install(&self) -> Result<()> {
        info!(
            assets = self.config().shell_assets.len(),
            "install: pre-warming shell store"
        );

        let mut fetched = Vec::with_capacity(self.config().shell_assets.len());
        for path in &self.config().shell_assets {
            let url = self.config().shell_url(path);
            let request = FetchRequest::get(&url)?;
            match self.fetcher.fetch(&request).await {
                Ok(response) if response.is_ok() => fetched.push((url, response)),
                Ok(response) => {
                    error!(url = %url, status = %response.status, "install: shell asset fetch non-ok");
                    return Err(EngineError::InstallFailed(format!(
                        "{url} returned {}",
                        response.status
                    )));
                }
                Err(err) => {
                    error!(url = %url, %err, "install: shell asset fetch failed");
                    return Err(EngineError::InstallFailed(format!("{url}: {err}")));
                }
            }
        }

        let store = self.shell_store().await;
        let mut guard = store.write().await;
        for (url, response) in fetched {
            guard.put(url, response);
        }
        drop(guard);

        self.request_activation();
        info!("install complete");
        Ok(())
    }

    // == Activate ==
    /// Deletes every store whose name is not owned by the current version,
    /// then takes over request handling for open clients.
    ///
    /// Returns the names of the stores deleted.
    pub async fn activate(&self) -> Vec<String> {
        let current = self.config().current_store_names();
        let mut deleted = Vec::new();

        for name in self.stores().names().await {
            if !current.contains(&name) && self.stores().delete(&name).await {
                info!(store = %name, "activate: deleted stale store");
                deleted.push(name);
            }
        }

        self.set_controlling();
        info!(deleted = deleted.len(), "activate complete, controlling clients");
        deleted
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::engine::testutil::{ok_body, status_only, ScriptedFetch};
    use http::StatusCode;

    fn minimal_config() -> Config {
        let mut config = Config::default();
        config.shell_assets = vec!["/".to_string(), "/offline.html".to_string()];
        config
    }

    #[tokio::test]
    async fn test_install_prewarms_all_assets() {
        let fetcher = ScriptedFetch::new();
        fetcher.respond("https://comichub.io/", ok_body("<html>"));
        fetcher.respond("https://comichub.io/offline.html", ok_body("<html>offline"));
        let engine = Engine::new(minimal_config(), fetcher);

        engine.install().await.unwrap();

        let store = engine.shell_store().await;
        assert_eq!(store.read().await.len(), 2);
        assert!(engine.activation_requested());
    }

    #[tokio::test]
    async fn test_install_is_all_or_nothing_on_network_failure() {
        let fetcher = ScriptedFetch::new();
        fetcher.respond("https://comichub.io/", ok_body("<html>"));
        // /offline.html not scripted: network failure.
        let engine = Engine::new(minimal_config(), fetcher);

        let result = engine.install().await;
        assert!(matches!(result, Err(EngineError::InstallFailed(_))));

        let store = engine.shell_store().await;
        assert!(store.read().await.is_empty());
        assert!(!engine.activation_requested());
    }

    #[tokio::test]
    async fn test_install_fails_on_non_ok_asset() {
        let fetcher = ScriptedFetch::new();
        fetcher.respond("https://comichub.io/", ok_body("<html>"));
        fetcher.respond(
            "https://comichub.io/offline.html",
            status_only(StatusCode::NOT_FOUND),
        );
        let engine = Engine::new(minimal_config(), fetcher);

        assert!(engine.install().await.is_err());
        assert!(engine.shell_store().await.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_activate_deletes_stale_versions_only() {
        let engine = Engine::new(Config::default(), ScriptedFetch::new());

        for name in ["shell-v1", "api-v1", "image-v1"] {
            engine.stores().open(name).await;
        }
        engine.stores().open("image-v2").await;

        let mut deleted = engine.activate().await;
        deleted.sort();

        assert_eq!(deleted, vec!["api-v1", "image-v1", "shell-v1"]);
        assert_eq!(engine.stores().names().await, vec!["image-v2".to_string()]);
        assert!(engine.is_controlling());
    }

    #[tokio::test]
    async fn test_activate_creates_no_stores() {
        let engine = Engine::new(Config::default(), ScriptedFetch::new());

        let deleted = engine.activate().await;

        assert!(deleted.is_empty());
        assert!(engine.stores().names().await.is_empty());
    }
}
