//! Eviction Module
//!
//! Byte-budgeted, oldest-first trimming of the image store. Runs after every
//! image write as a background task; best-effort, never raises.

use tracing::{debug, info};

use crate::store::SharedStore;

// == Eviction Policy ==
/// Byte limits for a size-bounded store.
///
/// Invariant: `target_bytes < max_bytes`. Trimming starts once reported
/// occupancy exceeds `max_bytes` and stops once it falls to `target_bytes`
/// or below.
#[derive(Debug, Clone, Copy)]
pub struct EvictionPolicy {
    /// Hard ceiling that triggers a trim
    pub max_bytes: u64,
    /// Occupancy the trim brings the store down to
    pub target_bytes: u64,
}

impl EvictionPolicy {
    /// Creates a policy with the given limits.
    pub fn new(max_bytes: u64, target_bytes: u64) -> Self {
        Self {
            max_bytes,
            target_bytes,
        }
    }
}

impl Default for EvictionPolicy {
    /// 500 MiB ceiling, 400 MiB target.
    fn default() -> Self {
        Self::new(500 * 1024 * 1024, 400 * 1024 * 1024)
    }
}

// == Trim ==
/// Trims a store down to the policy target, oldest entries first.
///
/// Sizes come from each entry's `content-length` header and timestamps from
/// its `date` header. Entries with unreadable metadata count as zero-size
/// and epoch-dated: they are never the reason a trim starts, but they sort
/// oldest and go first once one does.
///
/// Idempotent and best-effort: the snapshot is taken up front, so an entry
/// deleted concurrently is simply skipped, and a write that lands mid-trim
/// is picked up by the next run.
pub async fn trim(store: &SharedStore, policy: EvictionPolicy) {
    let (name, mut entries): (String, Vec<(String, u64, i64)>) = {
        let guard = store.read().await;
        let entries = guard
            .iter()
            .map(|(key, response)| (key.clone(), response.size_bytes(), response.stored_at_ms()))
            .collect();
        (guard.name().to_string(), entries)
    };

    let total_bytes: u64 = entries.iter().map(|(_, size, _)| size).sum();
    if total_bytes <= policy.max_bytes {
        debug!(
            store = %name,
            total_bytes,
            max_bytes = policy.max_bytes,
            "store within budget, no trim"
        );
        return;
    }

    // Oldest first; epoch-dated (unreadable) entries lead.
    entries.sort_by_key(|(_, _, stored_at)| *stored_at);

    let mut remaining = total_bytes;
    let mut deleted = 0usize;
    let mut guard = store.write().await;
    for (key, size, _) in entries {
        if remaining <= policy.target_bytes {
            break;
        }
        if guard.delete(&key) {
            guard.record_eviction();
            remaining = remaining.saturating_sub(size);
            deleted += 1;
            debug!(key = %key, size, remaining, "evicted entry");
        }
    }

    drop(guard);
    info!(
        store = %name,
        deleted,
        before_bytes = total_bytes,
        after_bytes = remaining,
        target_bytes = policy.target_bytes,
        "trim complete"
    );
}
