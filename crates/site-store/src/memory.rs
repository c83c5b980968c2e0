use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::{validate_key, KvStore};

/// In-memory, HashMap-based storage namespace.
///
/// Intended for tests and embedding. An optional byte quota (key plus value
/// lengths, summed over all entries) emulates the limits of browser storage,
/// and the store can be switched to read-only to exercise failure paths.
pub struct InMemoryKvStore {
    entries: RwLock<HashMap<String, String>>,
    quota: Option<u64>,
    read_only: AtomicBool,
}

impl InMemoryKvStore {
    /// Create a new empty store with no quota.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            quota: None,
            read_only: AtomicBool::new(false),
        }
    }

    /// Create a new empty store limited to `quota` bytes.
    pub fn with_quota(quota: u64) -> Self {
        Self {
            quota: Some(quota),
            ..Self::new()
        }
    }

    /// Make every subsequent `set`/`remove` fail with [`StoreError::ReadOnly`].
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.entries.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.read().expect("lock poisoned").is_empty()
    }

    /// Total bytes used, counted as key length plus value length.
    pub fn used_bytes(&self) -> u64 {
        let map = self.entries.read().expect("lock poisoned");
        map.iter().map(|(k, v)| entry_size(k, v)).sum()
    }

    /// Remove all entries.
    pub fn clear(&self) {
        self.entries.write().expect("lock poisoned").clear();
    }

    fn check_writable(&self) -> StoreResult<()> {
        if self.read_only.load(Ordering::SeqCst) {
            Err(StoreError::ReadOnly)
        } else {
            Ok(())
        }
    }
}

fn entry_size(key: &str, value: &str) -> u64 {
    (key.len() + value.len()) as u64
}

impl Default for InMemoryKvStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KvStore for InMemoryKvStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        validate_key(key)?;
        let map = self.entries.read().expect("lock poisoned");
        Ok(map.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        validate_key(key)?;
        self.check_writable()?;
        let mut map = self.entries.write().expect("lock poisoned");
        if let Some(quota) = self.quota {
            let others: u64 = map
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| entry_size(k, v))
                .sum();
            let needed = others + entry_size(key, value);
            if needed > quota {
                return Err(StoreError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    quota,
                });
            }
        }
        map.insert(key.to_string(), value.to_string());
        debug!(key, len = value.len(), "memory store set");
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<bool> {
        validate_key(key)?;
        self.check_writable()?;
        let mut map = self.entries.write().expect("lock poisoned");
        Ok(map.remove(key).is_some())
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        let map = self.entries.read().expect("lock poisoned");
        let mut keys: Vec<String> = map.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }

    fn contains(&self, key: &str) -> StoreResult<bool> {
        validate_key(key)?;
        let map = self.entries.read().expect("lock poisoned");
        Ok(map.contains_key(key))
    }
}

impl std::fmt::Debug for InMemoryKvStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryKvStore")
            .field("key_count", &self.len())
            .field("quota", &self.quota)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // Core get / set / remove
    // -----------------------------------------------------------------------

    #[test]
    fn set_then_get() {
        let store = InMemoryKvStore::new();
        store.set("site_content_v1", "{}").unwrap();
        assert_eq!(store.get("site_content_v1").unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn get_missing_is_none() {
        let store = InMemoryKvStore::new();
        assert!(store.get("cookieConsent").unwrap().is_none());
        assert!(!store.contains("cookieConsent").unwrap());
    }

    #[test]
    fn set_replaces() {
        let store = InMemoryKvStore::new();
        store.set("k", "one").unwrap();
        store.set("k", "two").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("two"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn remove_reports_presence() {
        let store = InMemoryKvStore::new();
        store.set("k", "v").unwrap();
        assert!(store.remove("k").unwrap());
        assert!(!store.remove("k").unwrap());
        assert!(store.is_empty());
    }

    #[test]
    fn keys_are_sorted() {
        let store = InMemoryKvStore::new();
        store.set("site_content_v1", "{}").unwrap();
        store.set("cookieConsent", "true").unwrap();
        assert_eq!(store.keys().unwrap(), vec!["cookieConsent", "site_content_v1"]);
    }

    #[test]
    fn invalid_key_rejected() {
        let store = InMemoryKvStore::new();
        assert!(matches!(store.set("a/b", "v"), Err(StoreError::InvalidKey(_))));
    }

    // -----------------------------------------------------------------------
    // Quota and read-only
    // -----------------------------------------------------------------------

    #[test]
    fn quota_exceeded_keeps_previous_value() {
        let store = InMemoryKvStore::with_quota(10);
        store.set("k", "short").unwrap(); // 1 + 5 bytes
        let err = store.set("k", "much too long").unwrap_err();
        assert!(matches!(err, StoreError::QuotaExceeded { quota: 10, .. }));
        assert_eq!(store.get("k").unwrap().as_deref(), Some("short"));
    }

    #[test]
    fn quota_counts_replaced_value_once() {
        let store = InMemoryKvStore::with_quota(6);
        store.set("k", "12345").unwrap();
        // Replacing a value frees its old bytes first.
        store.set("k", "54321").unwrap();
        assert_eq!(store.used_bytes(), 6);
    }

    #[test]
    fn read_only_blocks_writes() {
        let store = InMemoryKvStore::new();
        store.set("k", "v").unwrap();
        store.set_read_only(true);
        assert!(matches!(store.set("k", "w"), Err(StoreError::ReadOnly)));
        assert!(matches!(store.remove("k"), Err(StoreError::ReadOnly)));
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        store.set_read_only(false);
        store.set("k", "w").unwrap();
    }

    #[test]
    fn clear_removes_all() {
        let store = InMemoryKvStore::new();
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();
        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn concurrent_reads_are_safe() {
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(InMemoryKvStore::new());
        store.set("shared", "data").unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    assert_eq!(store.get("shared").unwrap().as_deref(), Some("data"));
                })
            })
            .collect();

        for h in handles {
            h.join().expect("thread should not panic");
        }
    }

    #[test]
    fn debug_format() {
        let store = InMemoryKvStore::with_quota(64);
        let debug = format!("{store:?}");
        assert!(debug.contains("InMemoryKvStore"));
        assert!(debug.contains("key_count"));
    }
}
