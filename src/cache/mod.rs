//! Cache store seam — the key-value backend route snapshots are persisted to.
//!
//! The protocol only needs three operations ([`CacheStore::get`],
//! [`CacheStore::put`], [`CacheStore::forget`]); the backend's persistence
//! format is its own business. [`MemoryStore`] is the in-process reference
//! implementation, useful for tests and single-process deployments; file or
//! distributed backends implement the same trait on the host side.
//!
//! In request-per-process deployments several processes may race to populate
//! the same key. Rebuilding identical route definitions writes identical
//! payloads, so last-write-wins is acceptable and no cross-process locking is
//! performed here.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Opaque failure from a cache backend.
pub type StoreError = Box<dyn std::error::Error + Send + Sync>;

/// A key-value store holding serialized route snapshots.
///
/// Implementations must tolerate concurrent readers and writers from
/// independent processes; `forget` on a missing key is a no-op, not an error.
pub trait CacheStore {
    /// Fetch the value stored under `key`, if present and not expired.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key` with the given time-to-live.
    fn put(&self, key: &str, value: String, ttl: Duration) -> Result<(), StoreError>;

    /// Delete whatever is stored under `key`. Missing keys are ignored.
    fn forget(&self, key: &str) -> Result<(), StoreError>;
}

impl<S: CacheStore + ?Sized> CacheStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: String, ttl: Duration) -> Result<(), StoreError> {
        (**self).put(key, value, ttl)
    }

    fn forget(&self, key: &str) -> Result<(), StoreError> {
        (**self).forget(key)
    }
}

struct Entry {
    value: String,
    expires_at: Instant,
}

/// In-process cache store with per-entry TTL expiry.
///
/// Entries are reaped lazily: an expired entry is dropped the next time it is
/// read. Interior mutability keeps the [`CacheStore`] methods `&self`, so a
/// `MemoryStore` can be shared behind an [`Arc`].
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use routecache::{CacheStore, MemoryStore};
///
/// let store = MemoryStore::new();
/// store.put("k", "v".to_owned(), Duration::from_secs(60))?;
/// assert_eq!(store.get("k")?.as_deref(), Some("v"));
/// store.forget("k")?;
/// assert_eq!(store.get("k")?, None);
/// # Ok::<(), routecache::StoreError>(())
/// ```
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (unexpired) entries.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.lock().values().filter(|e| e.expires_at > now).count()
    }

    /// Returns `true` if the store holds no live entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Entry>> {
        self.entries.lock().expect("memory store mutex poisoned")
    }
}

impl CacheStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut entries = self.lock();
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Ok(Some(entry.value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    fn put(&self, key: &str, value: String, ttl: Duration) -> Result<(), StoreError> {
        self.lock().insert(
            key.to_owned(),
            Entry {
                value,
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    fn forget(&self, key: &str) -> Result<(), StoreError> {
        self.lock().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINUTE: Duration = Duration::from_secs(60);

    #[test]
    fn get_missing_key_is_none() {
        let store = MemoryStore::new();
        assert_eq!(store.get("absent").unwrap(), None);
    }

    #[test]
    fn put_then_get_round_trips() {
        let store = MemoryStore::new();
        store.put("k", "payload".to_owned(), MINUTE).unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("payload"));
    }

    #[test]
    fn put_overwrites_existing_entry() {
        let store = MemoryStore::new();
        store.put("k", "old".to_owned(), MINUTE).unwrap();
        store.put("k", "new".to_owned(), MINUTE).unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("new"));
    }

    #[test]
    fn forget_is_idempotent() {
        let store = MemoryStore::new();
        store.put("k", "v".to_owned(), MINUTE).unwrap();
        store.forget("k").unwrap();
        store.forget("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn expired_entry_reads_as_missing() {
        let store = MemoryStore::new();
        store.put("k", "v".to_owned(), Duration::ZERO).unwrap();
        assert_eq!(store.get("k").unwrap(), None);
        assert!(store.is_empty());
    }

    #[test]
    fn shared_store_behind_arc() {
        let store = Arc::new(MemoryStore::new());
        let clone = Arc::clone(&store);
        clone.put("k", "v".to_owned(), MINUTE).unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }
}
