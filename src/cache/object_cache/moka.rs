use async_trait::async_trait;
use moka::{Expiry, future::Cache};
use std::time::{Duration, Instant};
use tracing::debug;

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::declare_object_cache_plugin;

declare_object_cache_plugin!("moka", MokaObjectCache);

/// 值与其存活时间
#[derive(Clone)]
struct Entry {
    value: String,
    ttl: Duration,
}

/// 每个条目按写入时给定的 TTL 过期
struct PerEntryExpiry;

impl Expiry<String, Entry> for PerEntryExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &Entry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

pub struct MokaObjectCache {
    inner: Cache<String, Entry>,
    default_ttl: u64,
}

impl MokaObjectCache {
    pub fn new(max_capacity: u64, default_ttl: u64) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(PerEntryExpiry)
            .build();

        debug!(
            "MokaObjectCache initialized (max capacity: {}, default TTL: {}s)",
            max_capacity, default_ttl
        );
        Self { inner, default_ttl }
    }

    pub async fn connect() -> Result<Self, String> {
        let config = AppConfig::get();
        Ok(Self::new(
            config.cache.memory.max_capacity,
            config.cache.default_ttl,
        ))
    }
}

#[async_trait]
impl ObjectCache for MokaObjectCache {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        match self.inner.get(key).await {
            Some(entry) => CacheResult::Found(entry.value),
            None => CacheResult::NotFound,
        }
    }

    async fn insert_raw(&self, key: String, value: String, ttl: u64) {
        let secs = if ttl == 0 { self.default_ttl } else { ttl };
        let entry = Entry {
            value,
            ttl: Duration::from_secs(secs),
        };
        self.inner.insert(key, entry).await;
    }

    async fn remove(&self, key: &str) {
        self.inner.invalidate(key).await;
    }

    async fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_get_remove() {
        let cache = MokaObjectCache::new(100, 60);
        assert_eq!(cache.get_raw("user:7").await, CacheResult::NotFound);

        cache
            .insert_raw("user:7".to_string(), "alice".to_string(), 0)
            .await;
        assert_eq!(
            cache.get_raw("user:7").await,
            CacheResult::Found("alice".to_string())
        );

        cache.remove("user:7").await;
        assert_eq!(cache.get_raw("user:7").await, CacheResult::NotFound);
    }

    #[tokio::test]
    async fn test_entry_expires_after_its_ttl() {
        let cache = MokaObjectCache::new(100, 60);
        cache
            .insert_raw("short".to_string(), "v".to_string(), 1)
            .await;
        tokio::time::sleep(Duration::from_millis(1200)).await;
        assert_eq!(cache.get_raw("short").await, CacheResult::NotFound);
    }

    #[tokio::test]
    async fn test_evict_user_helper() {
        let cache = MokaObjectCache::new(100, 60);
        cache
            .insert_raw(crate::cache::user_cache_key(3), "u".to_string(), 0)
            .await;
        crate::cache::evict_user(&cache, 3).await;
        assert_eq!(cache.get_raw("user:3").await, CacheResult::NotFound);
    }
}
