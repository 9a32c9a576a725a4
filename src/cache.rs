//! Cache port for derived artifacts.
//!
//! The parsing core stays pure; callers memoize its string outputs through
//! this injected interface, keyed by source identity (path + modification
//! time) so a touched stylesheet invalidates naturally. Values are
//! write-once per key and treated as immutable until they expire.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::path::Path;
use std::sync::Mutex;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Default time-to-live for cached artifacts: one hour.
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// Key-value store with per-entry expiration.
pub trait CacheStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String, ttl: Duration);
}

/// Derive a deterministic cache key from a namespace and the source
/// identity. Same path and mtime always produce the same key.
pub fn entry_key(namespace: &str, path: &Path, modified: SystemTime) -> String {
    let mut hasher = DefaultHasher::new();
    path.hash(&mut hasher);
    modified
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos()
        .hash(&mut hasher);
    format!("{}_{:x}", namespace, hasher.finish())
}

struct Entry {
    value: String,
    expires_at: Instant,
}

/// In-memory `CacheStore` with lazy expiry, checked on read.
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (non-expired) entries.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .lock()
            .unwrap()
            .values()
            .filter(|entry| entry.expires_at > now)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CacheStore for MemoryCache {
    fn get(&self, key: &str) -> Option<String> {
        let mut entries = self.entries.lock().unwrap();
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    fn set(&self, key: &str, value: String, ttl: Duration) {
        let entry = Entry {
            value,
            expires_at: Instant::now() + ttl,
        };
        self.entries.lock().unwrap().insert(key.to_string(), entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_set_then_get() {
        let cache = MemoryCache::new();
        cache.set("k", "v".to_string(), DEFAULT_TTL);
        assert_eq!(cache.get("k"), Some("v".to_string()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_missing_key() {
        let cache = MemoryCache::new();
        assert_eq!(cache.get("absent"), None);
    }

    #[test]
    fn test_expired_entry_is_dropped() {
        let cache = MemoryCache::new();
        cache.set("k", "v".to_string(), Duration::ZERO);
        assert_eq!(cache.get("k"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_overwrite_replaces_value() {
        let cache = MemoryCache::new();
        cache.set("k", "old".to_string(), DEFAULT_TTL);
        cache.set("k", "new".to_string(), DEFAULT_TTL);
        assert_eq!(cache.get("k"), Some("new".to_string()));
    }

    #[test]
    fn test_entry_key_tracks_source_identity() {
        let path = PathBuf::from("/theme/helpers.scss");
        let t1 = UNIX_EPOCH + Duration::from_secs(1_000);
        let t2 = UNIX_EPOCH + Duration::from_secs(2_000);

        assert_eq!(entry_key("css", &path, t1), entry_key("css", &path, t1));
        assert_ne!(entry_key("css", &path, t1), entry_key("css", &path, t2));
        assert_ne!(
            entry_key("css", &path, t1),
            entry_key("items", &path, t1)
        );
        assert_ne!(
            entry_key("css", &path, t1),
            entry_key("css", &PathBuf::from("/other.scss"), t1)
        );
    }
}
