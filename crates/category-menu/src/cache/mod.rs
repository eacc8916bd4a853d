//! Cache store for menu data.
//!
//! `CacheLayer` is a two-tier store: Moka (L1) in-process, plus an optional
//! shared L2 (Redis in production) used across instances. Entries never
//! expire in the store of record; they live until deleted.
//!
//! With an L2 attached, the L2 is the source of truth. A delete reaches the
//! L2 and the local L1 only, so other instances may keep serving their L1
//! copy until its TTL elapses. Without a TTL the L1 is bypassed entirely
//! and deletes are visible everywhere immediately.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use redis::AsyncCommands;
use redis::Client as RedisClient;
use thiserror::Error;
use tracing::debug;

/// Namespace of full-tree entries.
pub const TREE_CACHE_KEY: &str = "menu.categories.tree";

/// Namespace of id map entries.
pub const MAP_CACHE_KEY: &str = "menu.categories.map";

/// Default maximum L1 cache capacity.
pub const L1_MAX_CAPACITY: u64 = 10_000;

/// Default TTL for L1 entries when an L2 is attached (60 seconds).
pub const L1_TTL_SECS: u64 = 60;

/// Cache store errors.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("redis cache operation failed")]
    Redis(#[from] redis::RedisError),
}

/// Key/value store with get/has/set-forever/delete semantics.
///
/// Deleting an absent key is a no-op.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn has(&self, key: &str) -> Result<bool, CacheError>;

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Store a value without expiry.
    async fn set_forever(&self, key: &str, value: &str) -> Result<(), CacheError>;

    async fn delete(&self, key: &str) -> Result<(), CacheError>;
}

/// Kinds of cached category data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKind {
    /// Full menu tree.
    Tree,
    /// Flat id → name map.
    Map,
}

impl CacheKind {
    pub const ALL: [CacheKind; 2] = [CacheKind::Tree, CacheKind::Map];

    pub fn namespace(self) -> &'static str {
        match self {
            CacheKind::Tree => TREE_CACHE_KEY,
            CacheKind::Map => MAP_CACHE_KEY,
        }
    }

    /// Cache key for a locale: `<namespace>.<locale>`.
    ///
    /// The locale is used verbatim.
    pub fn key(self, locale: &str) -> String {
        format!("{}.{locale}", self.namespace())
    }
}

/// Redis-backed store. Values are written with `SET` and no expiry.
#[derive(Clone)]
pub struct RedisStore {
    client: RedisClient,
}

impl RedisStore {
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CacheStore for RedisStore {
    async fn has(&self, key: &str) -> Result<bool, CacheError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let exists: bool = conn.exists(key).await?;
        Ok(exists)
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let val: Option<String> = conn.get(key).await?;
        Ok(val)
    }

    async fn set_forever(&self, key: &str, value: &str) -> Result<(), CacheError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.set::<_, _, ()>(key, value).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.del::<_, ()>(key).await?;
        Ok(())
    }
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore").finish()
    }
}

/// Two-tier cache layer.
///
/// L1 (Moka): in-process, capacity bounded; no TTL when it is the only tier,
/// `l1_ttl` (or bypassed) when an L2 is attached
/// L2 (shared): optional, store of record, no TTL
#[derive(Clone)]
pub struct CacheLayer {
    inner: Arc<CacheLayerInner>,
}

struct CacheLayerInner {
    /// L1 in-process cache. None when bypassed.
    local: Option<Cache<String, String>>,

    /// L2 shared store.
    shared: Option<Arc<dyn CacheStore>>,
}

impl CacheLayer {
    /// Create an in-process cache layer.
    pub fn new(max_capacity: u64) -> Self {
        let local = Cache::builder().max_capacity(max_capacity).build();

        Self {
            inner: Arc::new(CacheLayerInner {
                local: Some(local),
                shared: None,
            }),
        }
    }

    /// Create a cache layer backed by Redis.
    pub fn with_redis(redis: RedisClient, max_capacity: u64, l1_ttl: Option<Duration>) -> Self {
        Self::with_shared(Arc::new(RedisStore::new(redis)), max_capacity, l1_ttl)
    }

    /// Create a cache layer in front of a shared store.
    ///
    /// L1 entries expire after `l1_ttl`; with `None` every call goes to the
    /// shared store.
    pub fn with_shared(
        shared: Arc<dyn CacheStore>,
        max_capacity: u64,
        l1_ttl: Option<Duration>,
    ) -> Self {
        let local = l1_ttl.map(|ttl| {
            Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                .build()
        });

        Self {
            inner: Arc::new(CacheLayerInner {
                local,
                shared: Some(shared),
            }),
        }
    }

    /// Whether an L2 store is attached.
    pub fn is_shared(&self) -> bool {
        self.inner.shared.is_some()
    }

    /// Get cache statistics (for monitoring).
    pub async fn stats(&self) -> CacheStats {
        let Some(local) = &self.inner.local else {
            return CacheStats {
                l1_entry_count: 0,
                l1_weighted_size: 0,
            };
        };

        local.run_pending_tasks().await;
        CacheStats {
            l1_entry_count: local.entry_count(),
            l1_weighted_size: local.weighted_size(),
        }
    }
}

#[async_trait]
impl CacheStore for CacheLayer {
    async fn has(&self, key: &str) -> Result<bool, CacheError> {
        if let Some(local) = &self.inner.local
            && local.contains_key(key)
        {
            return Ok(true);
        }

        match &self.inner.shared {
            Some(shared) => shared.has(key).await,
            None => Ok(false),
        }
    }

    /// Checks L1 first, then L2. On L2 hit, populates L1.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        if let Some(local) = &self.inner.local
            && let Some(val) = local.get(key).await
        {
            debug!(key = %key, "cache L1 hit");
            return Ok(Some(val));
        }

        let Some(shared) = &self.inner.shared else {
            return Ok(None);
        };

        let val = shared.get(key).await?;

        if let (Some(v), Some(local)) = (&val, &self.inner.local) {
            debug!(key = %key, "cache L2 hit, populating L1");
            local.insert(key.to_string(), v.clone()).await;
        }

        Ok(val)
    }

    /// Writes to L2 first, then L1.
    async fn set_forever(&self, key: &str, value: &str) -> Result<(), CacheError> {
        if let Some(shared) = &self.inner.shared {
            shared.set_forever(key, value).await?;
        }

        if let Some(local) = &self.inner.local {
            local.insert(key.to_string(), value.to_string()).await;
        }

        debug!(key = %key, "cache set");
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        if let Some(local) = &self.inner.local {
            local.invalidate(key).await;
        }

        if let Some(shared) = &self.inner.shared {
            shared.delete(key).await?;
        }

        debug!(key = %key, "cache entry deleted");
        Ok(())
    }
}

/// Cache statistics.
#[derive(Debug, Clone)]
pub struct CacheStats {
    /// Number of entries in L1 cache.
    pub l1_entry_count: u64,

    /// Weighted size of L1 cache.
    pub l1_weighted_size: u64,
}

impl std::fmt::Debug for CacheLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheLayer")
            .field("shared", &self.is_shared())
            .finish()
    }
}

#[cfg(test)]
// Tests are allowed to use unwrap/expect freely.
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_namespaced_per_locale() {
        assert_eq!(CacheKind::Tree.key("en"), "menu.categories.tree.en");
        assert_eq!(CacheKind::Map.key("de"), "menu.categories.map.de");
        assert_ne!(CacheKind::Tree.key("en"), CacheKind::Map.key("en"));
    }

    #[test]
    fn test_locale_used_verbatim() {
        assert_eq!(CacheKind::Tree.key("pt-BR"), "menu.categories.tree.pt-BR");
        assert_eq!(CacheKind::Tree.key(""), "menu.categories.tree.");
    }

    #[tokio::test]
    async fn test_local_set_get_delete() {
        let cache = CacheLayer::new(L1_MAX_CAPACITY);

        assert!(!cache.has("k").await.unwrap());
        assert_eq!(cache.get("k").await.unwrap(), None);

        cache.set_forever("k", "v").await.unwrap();
        assert!(cache.has("k").await.unwrap());
        assert_eq!(cache.get("k").await.unwrap().as_deref(), Some("v"));

        cache.delete("k").await.unwrap();
        assert!(!cache.has("k").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_absent_key_is_noop() {
        let cache = CacheLayer::new(L1_MAX_CAPACITY);
        cache.delete("missing").await.unwrap();
        cache.delete("missing").await.unwrap();
    }

    #[tokio::test]
    async fn test_overwrite_keeps_last_value() {
        let cache = CacheLayer::new(L1_MAX_CAPACITY);
        cache.set_forever("k", "one").await.unwrap();
        cache.set_forever("k", "two").await.unwrap();
        assert_eq!(cache.get("k").await.unwrap().as_deref(), Some("two"));

        let stats = cache.stats().await;
        assert_eq!(stats.l1_entry_count, 1);
    }

    #[tokio::test]
    async fn test_cache_layer_creation() {
        // Opening a client does not connect, so no Redis server is needed here
        let client = RedisClient::open("redis://127.0.0.1:6379").unwrap();
        let cache = CacheLayer::with_redis(
            client,
            L1_MAX_CAPACITY,
            Some(Duration::from_secs(L1_TTL_SECS)),
        );
        assert!(cache.is_shared());

        let stats = cache.stats().await;
        assert_eq!(stats.l1_entry_count, 0);
    }

    /// Two instances in front of one shared store.
    fn instances(l1_ttl: Option<Duration>) -> (CacheLayer, CacheLayer) {
        let shared: Arc<dyn CacheStore> = Arc::new(CacheLayer::new(L1_MAX_CAPACITY));
        (
            CacheLayer::with_shared(shared.clone(), L1_MAX_CAPACITY, l1_ttl),
            CacheLayer::with_shared(shared, L1_MAX_CAPACITY, l1_ttl),
        )
    }

    #[tokio::test]
    async fn test_delete_is_seen_by_other_instance_without_l1() {
        let (a, b) = instances(None);

        a.set_forever("k", "v").await.unwrap();
        assert_eq!(b.get("k").await.unwrap().as_deref(), Some("v"));

        a.delete("k").await.unwrap();

        assert!(!b.has("k").await.unwrap());
        assert_eq!(b.get("k").await.unwrap(), None);
        assert_eq!(b.stats().await.l1_entry_count, 0);
    }

    #[tokio::test]
    async fn test_other_instance_l1_expires_after_ttl() {
        let (a, b) = instances(Some(Duration::from_millis(100)));

        a.set_forever("k", "v").await.unwrap();
        assert_eq!(b.get("k").await.unwrap().as_deref(), Some("v"));

        a.delete("k").await.unwrap();
        assert_eq!(a.get("k").await.unwrap(), None);

        tokio::time::sleep(Duration::from_millis(250)).await;
        assert_eq!(b.get("k").await.unwrap(), None);
        assert!(!b.has("k").await.unwrap());
    }
}
