//! Key-value cache in front of the catalog store.
//!
//! Values are the JSON representations handed to callers. The database stays
//! the source of truth; dropping every entry only costs latency.

pub mod moka_cache;
pub mod noop;

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

pub use self::moka_cache::MokaCache;
pub use self::noop::NoopCache;

#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Option<Value>;
    async fn set(&self, key: &str, value: Value, ttl: Duration);
    async fn delete(&self, key: &str);
}

/// Cache key names shared by readers and invalidation.
pub mod keys {
    pub const SERVICE_CATEGORIES: &str = "service_categories";
    pub const FEATURED_SERVICES: &str = "featured_services";

    pub fn service(slug: &str) -> String {
        format!("service_{slug}")
    }

    pub fn category_services(category_slug: &str) -> String {
        format!("category_services_{category_slug}")
    }
}

#[cfg(test)]
mod tests {
    use super::keys;

    #[test]
    fn key_names() {
        assert_eq!(keys::service("web-design"), "service_web-design");
        assert_eq!(keys::category_services("dev"), "category_services_dev");
    }
}
