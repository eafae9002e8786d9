//! Configuration Module
//!
//! Single source of truth for store naming, eviction limits, the shell-asset
//! manifest, and the hosts/paths the request classifier matches against.
//! Constructed once at startup and passed by reference into every component.

use std::env;

use tracing::warn;

use crate::store::EvictionPolicy;

/// Engine configuration parameters.
///
/// Store names are derived from `version`; bumping the version tag is the
/// only supported way to invalidate all previously cached content (stale
/// stores are deleted during activation).
#[derive(Debug, Clone)]
pub struct Config {
    /// Version tag suffixed onto every store name (e.g. "v2")
    pub version: String,
    /// Host serving the application shell and pages
    pub app_host: String,
    /// Host of the remote comic API
    pub api_host: String,
    /// Host of the image CDN
    pub cdn_host: String,
    /// Path prefix on the CDN that serves chapter/cover images
    pub cdn_image_prefix: String,
    /// Same-origin path prefix for API requests
    pub api_path_prefix: String,
    /// Path of the home-feed endpoint (gets a dedicated offline fallback)
    pub home_feed_path: String,
    /// Path of the pre-cached offline page served to failed navigations
    pub offline_page_path: String,
    /// Paths pre-warmed into the shell store during install
    pub shell_assets: Vec<String>,
    /// Hard ceiling for the image store, in bytes
    pub image_cache_max_bytes: u64,
    /// Target the image store is trimmed down to once over the ceiling
    pub image_cache_target_bytes: u64,
}

impl Config {
    /// Creates a new Config by loading overrides from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_VERSION` - store version tag (default: "v2")
    /// - `IMAGE_CACHE_MAX_BYTES` - image store hard ceiling (default: 500 MiB)
    /// - `IMAGE_CACHE_TARGET_BYTES` - post-trim target (default: 400 MiB)
    ///
    /// The target must stay strictly below the maximum; an override that
    /// violates this falls back to the default pair with a warning.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(version) = env::var("CACHE_VERSION") {
            if !version.is_empty() {
                config.version = version;
            }
        }

        let max_bytes = env::var("IMAGE_CACHE_MAX_BYTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(config.image_cache_max_bytes);
        let target_bytes = env::var("IMAGE_CACHE_TARGET_BYTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(config.image_cache_target_bytes);

        if target_bytes < max_bytes {
            config.image_cache_max_bytes = max_bytes;
            config.image_cache_target_bytes = target_bytes;
        } else {
            warn!(
                max_bytes,
                target_bytes, "invalid eviction limits (target must be below max), using defaults"
            );
        }

        config
    }

    /// Name of the shell store for the current version.
    pub fn shell_store_name(&self) -> String {
        format!("shell-{}", self.version)
    }

    /// Name of the API store for the current version.
    pub fn api_store_name(&self) -> String {
        format!("api-{}", self.version)
    }

    /// Name of the image store for the current version.
    pub fn image_store_name(&self) -> String {
        format!("image-{}", self.version)
    }

    /// The complete set of store names the current version owns.
    ///
    /// Activation deletes every store whose name is not in this set.
    pub fn current_store_names(&self) -> [String; 3] {
        [
            self.shell_store_name(),
            self.api_store_name(),
            self.image_store_name(),
        ]
    }

    /// Eviction policy applied to the image store.
    pub fn eviction_policy(&self) -> EvictionPolicy {
        EvictionPolicy::new(self.image_cache_max_bytes, self.image_cache_target_bytes)
    }

    /// Origin of the application shell.
    pub fn app_origin(&self) -> String {
        format!("https://{}", self.app_host)
    }

    /// Absolute URL of a shell asset path.
    pub fn shell_url(&self, path: &str) -> String {
        format!("{}{}", self.app_origin(), path)
    }

    /// Store key under which a chapter's offline manifest entry is kept.
    pub fn chapter_key(&self, chapter_id: &str) -> String {
        format!("{}/offline/chapter/{}", self.app_origin(), chapter_id)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "v2".to_string(),
            app_host: "comichub.io".to_string(),
            api_host: "api.comichub.io".to_string(),
            cdn_host: "cdn.comichub.io".to_string(),
            cdn_image_prefix: "/images/".to_string(),
            api_path_prefix: "/api/".to_string(),
            home_feed_path: "/api/home".to_string(),
            offline_page_path: "/offline.html".to_string(),
            shell_assets: vec![
                "/".to_string(),
                "/index.html".to_string(),
                "/offline.html".to_string(),
                "/styles.css".to_string(),
                "/app.js".to_string(),
                "/manifest.json".to_string(),
                "/icons/icon-192.png".to_string(),
            ],
            image_cache_max_bytes: 500 * 1024 * 1024,
            image_cache_target_bytes: 400 * 1024 * 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.version, "v2");
        assert_eq!(config.image_cache_max_bytes, 500 * 1024 * 1024);
        assert_eq!(config.image_cache_target_bytes, 400 * 1024 * 1024);
        assert!(config.image_cache_target_bytes < config.image_cache_max_bytes);
        assert!(config.shell_assets.contains(&config.offline_page_path));
    }

    #[test]
    fn test_store_names_carry_version() {
        let mut config = Config::default();
        config.version = "v7".to_string();

        assert_eq!(config.shell_store_name(), "shell-v7");
        assert_eq!(config.api_store_name(), "api-v7");
        assert_eq!(config.image_store_name(), "image-v7");
        assert_eq!(config.current_store_names().len(), 3);
    }

    #[test]
    fn test_shell_url_and_chapter_key() {
        let config = Config::default();
        assert_eq!(
            config.shell_url("/offline.html"),
            "https://comichub.io/offline.html"
        );
        assert_eq!(
            config.chapter_key("ch-042"),
            "https://comichub.io/offline/chapter/ch-042"
        );
    }

    #[test]
    fn test_from_env_rejects_inverted_limits() {
        env::set_var("IMAGE_CACHE_MAX_BYTES", "100");
        env::set_var("IMAGE_CACHE_TARGET_BYTES", "200");

        let config = Config::from_env();
        assert_eq!(config.image_cache_max_bytes, 500 * 1024 * 1024);
        assert_eq!(config.image_cache_target_bytes, 400 * 1024 * 1024);

        env::remove_var("IMAGE_CACHE_MAX_BYTES");
        env::remove_var("IMAGE_CACHE_TARGET_BYTES");
    }
}
