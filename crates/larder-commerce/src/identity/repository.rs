//! Cart persistence seam.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::cart::CartStore;
use crate::error::CommerceError;
use crate::identity::OwnerKey;

/// Persists one cart per owner.
pub trait CartRepository {
    /// Load the owner's cart, if one was saved.
    fn load(&self, owner: &OwnerKey) -> Result<Option<CartStore>, CommerceError>;

    /// Save the owner's cart, replacing any previous one.
    fn save(&self, owner: &OwnerKey, cart: &CartStore) -> Result<(), CommerceError>;

    /// Forget the owner's cart.
    fn remove(&self, owner: &OwnerKey) -> Result<(), CommerceError>;
}

/// In-process repository.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    carts: RwLock<HashMap<String, CartStore>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored carts.
    pub fn len(&self) -> usize {
        self.carts.read().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<E>(_: E) -> CommerceError {
    CommerceError::Storage("lock poisoned".into())
}

impl CartRepository for MemoryRepository {
    fn load(&self, owner: &OwnerKey) -> Result<Option<CartStore>, CommerceError> {
        let carts = self.carts.read().map_err(poisoned)?;
        Ok(carts.get(&owner.storage_key()).cloned())
    }

    fn save(&self, owner: &OwnerKey, cart: &CartStore) -> Result<(), CommerceError> {
        let mut carts = self.carts.write().map_err(poisoned)?;
        carts.insert(owner.storage_key(), cart.clone());
        Ok(())
    }

    fn remove(&self, owner: &OwnerKey) -> Result<(), CommerceError> {
        let mut carts = self.carts.write().map_err(poisoned)?;
        carts.remove(&owner.storage_key());
        Ok(())
    }
}

impl<R: CartRepository + ?Sized> CartRepository for &R {
    fn load(&self, owner: &OwnerKey) -> Result<Option<CartStore>, CommerceError> {
        (**self).load(owner)
    }

    fn save(&self, owner: &OwnerKey, cart: &CartStore) -> Result<(), CommerceError> {
        (**self).save(owner, cart)
    }

    fn remove(&self, owner: &OwnerKey) -> Result<(), CommerceError> {
        (**self).remove(owner)
    }
}

#[cfg(feature = "storage")]
pub use cache::CacheRepository;

#[cfg(feature = "storage")]
mod cache {
    use larder_cache::{KvStore, MemoryStore, RecordStore};

    use super::CartRepository;
    use crate::cart::CartStore;
    use crate::error::CommerceError;
    use crate::identity::OwnerKey;

    /// Repository over a `larder-cache` backend.
    ///
    /// Every save bumps the record's revision. Concurrent writers to the
    /// same owner race; the last save wins.
    #[derive(Debug)]
    pub struct CacheRepository<S = MemoryStore> {
        records: RecordStore<CartStore, S>,
    }

    impl<S: KvStore> CacheRepository<S> {
        pub fn new(store: S) -> Self {
            Self {
                records: RecordStore::new(store),
            }
        }

        /// Revision of the owner's stored cart, if any.
        pub fn revision(&self, owner: &OwnerKey) -> Result<Option<u64>, CommerceError> {
            Ok(self
                .records
                .get_versioned(&owner.storage_key())?
                .map(|r| r.revision))
        }

        /// Storage keys of every persisted cart.
        pub fn owners(&self) -> Result<Vec<String>, CommerceError> {
            Ok(self.records.keys_with_prefix("cart:")?)
        }
    }

    impl<S: KvStore> CartRepository for CacheRepository<S> {
        fn load(&self, owner: &OwnerKey) -> Result<Option<CartStore>, CommerceError> {
            Ok(self.records.get(&owner.storage_key())?)
        }

        fn save(&self, owner: &OwnerKey, cart: &CartStore) -> Result<(), CommerceError> {
            let revision = self.records.set(&owner.storage_key(), cart)?;
            tracing::debug!(%owner, revision, lines = cart.unique_line_count(), "cart saved");
            Ok(())
        }

        fn remove(&self, owner: &OwnerKey) -> Result<(), CommerceError> {
            Ok(self.records.delete(&owner.storage_key())?)
        }
    }
}
