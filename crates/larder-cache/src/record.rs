//! Revisioned records keyed by owner.

use std::marker::PhantomData;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{Cache, CacheError, KvStore, MemoryStore};

/// A stored value plus its write bookkeeping.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Record<T> {
    /// The key the record lives under.
    pub key: String,
    /// User-defined payload.
    pub data: T,
    /// Monotonic revision, starting at 1 and bumped on every write.
    pub revision: u64,
    /// When the record was first written (Unix timestamp).
    pub created_at: u64,
    /// When the record was last written (Unix timestamp).
    pub updated_at: u64,
}

/// Store of revisioned records of one payload type.
///
/// Writes are last-writer-wins; the revision counter makes an overwrite
/// visible to anyone who remembers the revision they read.
///
/// # Example
///
/// ```rust
/// use larder_cache::{MemoryStore, RecordStore};
///
/// let records = RecordStore::<Vec<String>>::new(MemoryStore::new());
/// assert_eq!(records.set("cart:user:7", &vec!["flour".into()]).unwrap(), 1);
/// assert_eq!(records.set("cart:user:7", &vec![]).unwrap(), 2);
/// ```
#[derive(Debug)]
pub struct RecordStore<T, S = MemoryStore> {
    cache: Cache<S>,
    _phantom: PhantomData<T>,
}

impl<T, S> RecordStore<T, S>
where
    T: Serialize + DeserializeOwned,
    S: KvStore,
{
    /// Create a record store over a backend.
    pub fn new(store: S) -> Self {
        Self {
            cache: Cache::new(store),
            _phantom: PhantomData,
        }
    }

    /// Get the payload if it exists.
    pub fn get(&self, key: &str) -> Result<Option<T>, CacheError> {
        Ok(self.cache.get::<Record<T>>(key)?.map(|r| r.data))
    }

    /// Get the full record including revision.
    pub fn get_versioned(&self, key: &str) -> Result<Option<Record<T>>, CacheError> {
        self.cache.get::<Record<T>>(key)
    }

    /// Write the payload unconditionally and return the new revision.
    pub fn set(&self, key: &str, data: &T) -> Result<u64, CacheError> {
        let now = current_timestamp();
        let previous = self.cache.get::<Record<serde_json::Value>>(key)?;
        let (revision, created_at) = previous
            .map(|r| (r.revision + 1, r.created_at))
            .unwrap_or((1, now));

        self.cache.set(
            key,
            &RecordRef {
                key,
                data,
                revision,
                created_at,
                updated_at: now,
            },
        )?;
        tracing::trace!(key, revision, "record written");
        Ok(revision)
    }

    /// Delete a record.
    pub fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.cache.delete(key)
    }

    /// Check if a record exists.
    pub fn exists(&self, key: &str) -> Result<bool, CacheError> {
        self.cache.exists(key)
    }

    /// List record keys starting with `prefix`.
    pub fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, CacheError> {
        let mut keys: Vec<String> = self
            .cache
            .keys()?
            .into_iter()
            .filter(|k| k.starts_with(prefix))
            .collect();
        keys.sort();
        Ok(keys)
    }
}

/// Borrowing twin of [`Record`] so writes don't clone the payload.
#[derive(Serialize)]
struct RecordRef<'a, T> {
    key: &'a str,
    data: &'a T,
    revision: u64,
    created_at: u64,
    updated_at: u64,
}

fn current_timestamp() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_write_is_revision_one() {
        let records = RecordStore::<u32>::new(MemoryStore::new());
        assert_eq!(records.set("k", &5).unwrap(), 1);

        let record = records.get_versioned("k").unwrap().unwrap();
        assert_eq!(record.revision, 1);
        assert_eq!(record.key, "k");
        assert_eq!(record.data, 5);
    }

    #[test]
    fn test_revision_is_monotonic_and_created_at_kept() {
        let records = RecordStore::<u32>::new(MemoryStore::new());
        records.set("k", &1).unwrap();
        let first = records.get_versioned("k").unwrap().unwrap();

        records.set("k", &2).unwrap();
        let third = records.set("k", &3).unwrap();
        assert_eq!(third, 3);

        let record = records.get_versioned("k").unwrap().unwrap();
        assert_eq!(record.data, 3);
        assert_eq!(record.created_at, first.created_at);
    }

    #[test]
    fn test_delete_resets_revision() {
        let records = RecordStore::<u32>::new(MemoryStore::new());
        records.set("k", &1).unwrap();
        records.set("k", &2).unwrap();
        records.delete("k").unwrap();

        assert!(!records.exists("k").unwrap());
        assert_eq!(records.set("k", &9).unwrap(), 1);
    }

    #[test]
    fn test_keys_with_prefix() {
        let records = RecordStore::<u32>::new(MemoryStore::new());
        records.set("cart:user:2", &0).unwrap();
        records.set("cart:guest:a", &0).unwrap();
        records.set("cart:user:1", &0).unwrap();

        assert_eq!(
            records.keys_with_prefix("cart:user:").unwrap(),
            vec!["cart:user:1".to_string(), "cart:user:2".to_string()]
        );
    }
}
