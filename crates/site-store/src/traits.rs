use crate::error::{StoreError, StoreResult};

/// Longest key any backend accepts.
const MAX_KEY_LEN: usize = 128;

/// Durable string key/value namespace.
///
/// All implementations must satisfy these invariants:
/// - `set` replaces the whole value atomically; a failed `set` leaves the
///   previous value in place.
/// - `get` after a successful `set` returns exactly the value written.
/// - Keys are validated with [`validate_key`] before any I/O.
/// - All I/O errors are propagated, never silently ignored.
pub trait KvStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// Returns `Ok(None)` if nothing is stored.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Remove the value under `key`. Returns `true` if a value existed.
    fn remove(&self, key: &str) -> StoreResult<bool>;

    /// All keys currently holding a value, sorted.
    fn keys(&self) -> StoreResult<Vec<String>>;

    /// Check whether a value is stored under `key`.
    ///
    /// Default implementation calls `get()`. Backends may override to avoid
    /// reading the value.
    fn contains(&self, key: &str) -> StoreResult<bool> {
        Ok(self.get(key)?.is_some())
    }
}

/// Reject keys that cannot be stored portably.
pub fn validate_key(key: &str) -> StoreResult<()> {
    let valid = !key.is_empty()
        && key.len() <= MAX_KEY_LEN
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}
