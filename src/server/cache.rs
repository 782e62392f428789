// Schema cache with lazy TTL expiry

use serde_json::Value;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

struct CacheEntry {
    data: Value,
    timestamp: Instant,
}

/// TTL cache for tool schema documents
///
/// Expiry is checked lazily on read; there is no background sweeper, so an
/// expired entry lingers until the next write overwrites it. Reads share
/// the lock, writes take it exclusively.
pub struct SchemaCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl SchemaCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Get a cached value if present and still fresh
    pub fn get(&self, key: &str) -> Option<Value> {
        let entries = self.entries.read().unwrap();
        let entry = entries.get(key)?;
        if entry.timestamp.elapsed() > self.ttl {
            return None;
        }
        Some(entry.data.clone())
    }

    /// Insert or overwrite a cached value
    pub fn set(&self, key: impl Into<String>, value: Value) {
        self.entries.write().unwrap().insert(
            key.into(),
            CacheEntry {
                data: value,
                timestamp: Instant::now(),
            },
        );
    }

    /// Drop every entry
    pub fn clear(&self) {
        self.entries.write().unwrap().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_within_ttl() {
        let cache = SchemaCache::new(Duration::from_secs(60));
        cache.set("calc", json!({"name": "calc"}));
        assert_eq!(cache.get("calc"), Some(json!({"name": "calc"})));
    }

    #[test]
    fn test_get_missing() {
        let cache = SchemaCache::new(Duration::from_secs(60));
        assert_eq!(cache.get("absent"), None);
    }

    #[test]
    fn test_expired_entry_misses() {
        let cache = SchemaCache::new(Duration::from_millis(20));
        cache.set("calc", json!(1));
        std::thread::sleep(Duration::from_millis(40));
        assert_eq!(cache.get("calc"), None, "entry past its TTL must miss");
    }

    #[test]
    fn test_overwrite_refreshes() {
        let cache = SchemaCache::new(Duration::from_millis(50));
        cache.set("calc", json!(1));
        std::thread::sleep(Duration::from_millis(60));
        cache.set("calc", json!(2));
        assert_eq!(cache.get("calc"), Some(json!(2)));
    }

    #[test]
    fn test_clear() {
        let cache = SchemaCache::new(Duration::from_secs(60));
        cache.set("a", json!(1));
        cache.set("b", json!(2));
        cache.clear();
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), None);
    }
}
