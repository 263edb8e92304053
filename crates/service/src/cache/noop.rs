use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::CacheStore;

/// Always misses; used when caching is switched off.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopCache;

#[async_trait]
impl CacheStore for NoopCache {
    async fn get(&self, _key: &str) -> Option<Value> {
        None
    }

    async fn set(&self, _key: &str, _value: Value, _ttl: Duration) {}

    async fn delete(&self, _key: &str) {}
}
