use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::{future::Cache, Expiry};
use serde_json::Value;

use super::CacheStore;

#[derive(Clone)]
struct Entry {
    value: Arc<Value>,
    ttl: Duration,
}

/// Every entry lives exactly as long as the TTL it was stored with.
struct PerEntryTtl;

impl Expiry<String, Entry> for PerEntryTtl {
    fn expire_after_create(&self, _key: &String, value: &Entry, _created_at: Instant) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// In-process cache bounded by entry count.
#[derive(Clone)]
pub struct MokaCache {
    inner: Cache<String, Entry>,
}

impl MokaCache {
    pub fn new(max_capacity: u64) -> Self {
        let inner = Cache::builder().max_capacity(max_capacity).expire_after(PerEntryTtl).build();
        Self { inner }
    }

    pub fn from_config(cfg: &configs::CacheConfig) -> Self {
        Self::new(cfg.max_capacity)
    }
}

#[async_trait]
impl CacheStore for MokaCache {
    async fn get(&self, key: &str) -> Option<Value> {
        self.inner.get(key).await.map(|e| (*e.value).clone())
    }

    async fn set(&self, key: &str, value: Value, ttl: Duration) {
        self.inner.insert(key.to_string(), Entry { value: Arc::new(value), ttl }).await;
    }

    async fn delete(&self, key: &str) {
        self.inner.invalidate(key).await;
    }
}
