//! Cart ownership: who the active cart belongs to and where it is kept.

mod ledger;
mod owner;
mod repository;

pub use ledger::IdentityLedger;
pub use owner::OwnerKey;
#[cfg(feature = "storage")]
pub use repository::CacheRepository;
pub use repository::{CartRepository, MemoryRepository};
