//! Control Channel Module
//!
//! The message-based command surface the host application uses to manage
//! cache state out-of-band: skip-waiting, bulk chapter caching, clear-all,
//! and the total-size query (the only command with a reply).

use http::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::engine::{Engine, FetchRequest};
use crate::fetch::Fetch;
use crate::store::{trim, StoredResponse};

// == Control Messages ==
/// A command received over the control channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ControlMessage {
    /// Trigger immediate activation
    SkipWaiting,
    /// Pre-cache the listed chapters into the image store
    CacheChapters { chapters: Vec<ChapterManifest> },
    /// Delete every store unconditionally
    ClearCache,
    /// Report total cached bytes (replied via the caller's reply channel)
    GetCacheSize,
}

/// One chapter to pre-cache: an identifier plus its image URLs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChapterManifest {
    /// Chapter identifier
    pub id: String,
    /// Image URLs belonging to the chapter
    #[serde(default)]
    pub images: Vec<String>,
}

/// Reply to `GET_CACHE_SIZE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheSizeReply {
    /// Total cached bytes across all stores, measured from actual bodies
    pub cache_size: u64,
}

impl<F: Fetch> Engine<F> {
    // == Dispatch ==
    /// Handles one control command. Only `GET_CACHE_SIZE` produces a reply.
    pub async fn handle_message(&self, message: ControlMessage) -> Option<CacheSizeReply> {
        match message {
            ControlMessage::SkipWaiting => {
                self.request_activation();
                None
            }
            ControlMessage::CacheChapters { chapters } => {
                self.cache_chapters(&chapters).await;
                None
            }
            ControlMessage::ClearCache => {
                let deleted = self.stores().clear_all().await;
                info!(deleted, "cleared all stores");
                None
            }
            ControlMessage::GetCacheSize => Some(CacheSizeReply {
                cache_size: self.total_cached_bytes().await,
            }),
        }
    }

    // == Cache Chapters ==
    /// Writes each chapter's manifest entry into the image store, then
    /// fetches and stores its images sequentially. Per-image failures are
    /// logged and skipped; they never abort the batch. One eviction
    /// evaluation runs after the whole batch.
    pub async fn cache_chapters(&self, chapters: &[ChapterManifest]) {
        let store = self.image_store().await;

        for chapter in chapters {
            let manifest = serde_json::json!({
                "id": chapter.id,
                "images": chapter.images,
                "cachedAt": chrono::Utc::now().to_rfc3339(),
            });
            let entry = StoredResponse::json(StatusCode::OK, &manifest).with_date_now();
            let key = self.config().chapter_key(&chapter.id);
            store.write().await.put(key, entry);

            let mut stored = 0usize;
            for image in &chapter.images {
                let request = match FetchRequest::get(image) {
                    Ok(request) => request,
                    Err(err) => {
                        warn!(url = %image, %err, "cache-chapters: bad image url, skipping");
                        continue;
                    }
                };
                match self.fetcher.fetch(&request).await {
                    Ok(response) if response.is_ok() => {
                        store.write().await.put(request.key(), response);
                        stored += 1;
                    }
                    Ok(response) => {
                        warn!(url = %image, status = %response.status, "cache-chapters: non-ok image, skipping");
                    }
                    Err(err) => {
                        warn!(url = %image, %err, "cache-chapters: image fetch failed, skipping");
                    }
                }
            }
            info!(chapter = %chapter.id, stored, total = chapter.images.len(), "chapter cached");
        }

        trim(&store, self.policy()).await;
    }

    // == Total Size ==
    /// Sums actual body bytes across every entry of every store.
    ///
    /// Deliberately different from the eviction manager's accounting, which
    /// trusts `content-length`: the two disagree when headers are absent.
    pub async fn total_cached_bytes(&self) -> u64 {
        let mut total = 0u64;
        for name in self.stores().names().await {
            if let Some(store) = self.stores().get(&name).await {
                total += store.read().await.total_body_bytes();
            }
        }
        total
    }
}
