//! In-process TTL cache for fetched response bodies.
//!
//! Keys are `(FetchKind, url)` so an HTML fetch and a raw fetch of the
//! same URL never collide. Entries expire a fixed interval after
//! insertion; expired entries are invisible to readers and pruned
//! opportunistically on write. The cache is cheap to clone (`Arc`
//! inside) so it can be shared across clients or injected into tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use tokio::sync::RwLock;
use tracing::debug;

/// Default entry lifetime: 5 minutes.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// What kind of response a cache entry holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchKind {
    /// Text/HTML page body.
    Html,
    /// Raw bytes (images, manifests, anything non-HTML).
    Raw,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    body: Bytes,
    inserted: Instant,
}

/// Shared TTL cache over fetched bodies.
#[derive(Debug, Clone)]
pub struct FetchCache {
    entries: Arc<RwLock<HashMap<(FetchKind, String), CacheEntry>>>,
    ttl: Duration,
}

impl FetchCache {
    /// Create a cache with the default 5-minute TTL.
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    /// Create a cache with a custom TTL.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Look up an unexpired entry.
    pub async fn get(&self, kind: FetchKind, url: &str) -> Option<Bytes> {
        let entries = self.entries.read().await;
        let entry = entries.get(&(kind, url.to_string()))?;
        if entry.inserted.elapsed() >= self.ttl {
            return None;
        }
        debug!(url, ?kind, "cache hit");
        Some(entry.body.clone())
    }

    /// Store a body, replacing any previous entry for the same key and
    /// pruning entries that have outlived the TTL.
    pub async fn insert(&self, kind: FetchKind, url: &str, body: Bytes) {
        let mut entries = self.entries.write().await;
        let ttl = self.ttl;
        entries.retain(|_, e| e.inserted.elapsed() < ttl);
        entries.insert(
            (kind, url.to_string()),
            CacheEntry {
                body,
                inserted: Instant::now(),
            },
        );
    }

    /// Number of live (possibly expired but not yet pruned) entries.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// True if the cache holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Drop everything.
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}

impl Default for FetchCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn insert_then_get() {
        let cache = FetchCache::new();
        cache
            .insert(FetchKind::Html, "https://example.com/a", Bytes::from("body"))
            .await;
        let hit = cache.get(FetchKind::Html, "https://example.com/a").await;
        assert_eq!(hit, Some(Bytes::from("body")));
    }

    #[tokio::test]
    async fn kinds_do_not_collide() {
        let cache = FetchCache::new();
        cache
            .insert(FetchKind::Html, "https://example.com/a", Bytes::from("html"))
            .await;
        assert!(cache.get(FetchKind::Raw, "https://example.com/a").await.is_none());
    }

    #[tokio::test]
    async fn expired_entries_are_invisible() {
        let cache = FetchCache::with_ttl(Duration::from_millis(10));
        cache
            .insert(FetchKind::Html, "https://example.com/a", Bytes::from("body"))
            .await;
        tokio::time::sleep(Duration::from_millis(25)).await;
        assert!(cache.get(FetchKind::Html, "https://example.com/a").await.is_none());
    }

    #[tokio::test]
    async fn insert_prunes_expired() {
        let cache = FetchCache::with_ttl(Duration::from_millis(10));
        cache
            .insert(FetchKind::Html, "https://example.com/old", Bytes::from("x"))
            .await;
        tokio::time::sleep(Duration::from_millis(25)).await;
        cache
            .insert(FetchKind::Html, "https://example.com/new", Bytes::from("y"))
            .await;
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn insert_replaces() {
        let cache = FetchCache::new();
        cache
            .insert(FetchKind::Html, "https://example.com/a", Bytes::from("one"))
            .await;
        cache
            .insert(FetchKind::Html, "https://example.com/a", Bytes::from("two"))
            .await;
        assert_eq!(
            cache.get(FetchKind::Html, "https://example.com/a").await,
            Some(Bytes::from("two"))
        );
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn clones_share_storage() {
        let cache = FetchCache::new();
        let clone = cache.clone();
        clone
            .insert(FetchKind::Raw, "https://example.com/b", Bytes::from("z"))
            .await;
        assert!(cache.get(FetchKind::Raw, "https://example.com/b").await.is_some());
    }
}
