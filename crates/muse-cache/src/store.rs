use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::{Duration, Instant},
};

use mini_moka::sync::Cache;
use muse_config::CacheConfig;
use serde_json::Value;

/// A cached generation artifact
#[derive(Debug, Clone)]
pub struct CachedArtifact {
    /// The generated output
    pub value: Value,
    /// Provider that originally produced it
    pub provider: String,
}

#[derive(Clone)]
struct Entry {
    artifact: CachedArtifact,
    expires_at: Instant,
}

/// Cache statistics for the admin surface
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    /// Hits over total lookups since process start (0.0 when no lookups)
    pub hit_rate: f64,
    /// Entries currently held
    pub size: u64,
    /// Entries dropped by TTL expiry or capacity pressure
    pub evictions: u64,
}

/// In-memory TTL + LRU result cache
///
/// Capacity eviction is delegated to mini-moka; expiry is per-entry and
/// checked on read so each operation can carry its own TTL. Safe for
/// concurrent use; `invalidate_all` may run while gets and puts are in
/// flight.
#[derive(Clone)]
pub struct ResultCache {
    enabled: bool,
    max_entries: u64,
    store: Cache<String, Entry>,
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
    evictions: Arc<AtomicU64>,
}

impl ResultCache {
    /// Create a cache from configuration
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            enabled: config.enabled,
            max_entries: config.max_entries,
            store: Cache::builder().max_capacity(config.max_entries).build(),
            hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
            evictions: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Look up an artifact by fingerprint
    ///
    /// Expired entries count as misses and are dropped on the spot.
    pub fn get(&self, fingerprint: &str) -> Option<CachedArtifact> {
        if !self.enabled {
            return None;
        }

        match self.store.get(&fingerprint.to_owned()) {
            Some(entry) if entry.expires_at > Instant::now() => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(fingerprint, "cache hit");
                Some(entry.artifact)
            }
            Some(_) => {
                self.store.invalidate(&fingerprint.to_owned());
                self.evictions.fetch_add(1, Ordering::Relaxed);
                self.misses.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(fingerprint, "cache entry expired");
                None
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(fingerprint, "cache miss");
                None
            }
        }
    }

    /// Store an artifact under a fingerprint with the given TTL
    pub fn put(&self, fingerprint: &str, artifact: CachedArtifact, ttl: Duration) {
        if !self.enabled {
            return;
        }

        // Counted before insert: moka drops the LRU victim internally
        // without telling us
        if self.store.entry_count() >= self.max_entries {
            self.evictions.fetch_add(1, Ordering::Relaxed);
        }

        let ttl_secs = ttl.as_secs();
        self.store.insert(
            fingerprint.to_owned(),
            Entry {
                artifact,
                expires_at: Instant::now() + ttl,
            },
        );
        tracing::debug!(fingerprint, ttl_secs, "cached artifact");
    }

    /// Drop every entry
    pub fn invalidate_all(&self) {
        self.store.invalidate_all();
        tracing::info!("result cache cleared");
    }

    /// Current statistics
    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;

        #[allow(clippy::cast_precision_loss)]
        let hit_rate = if total == 0 { 0.0 } else { hits as f64 / total as f64 };

        CacheStats {
            hit_rate,
            size: self.store.entry_count(),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }
}
