//! Type-safe key-value persistence layer for Larder carts.
//!
//! Provides a small, ergonomic API over a byte-oriented [`KvStore`] with
//! automatic JSON serialization, plus revisioned records for state that is
//! owned by a single key (one cart per owner).
//!
//! # Example
//!
//! ```rust
//! use larder_cache::{Cache, MemoryStore};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Note {
//!     text: String,
//! }
//!
//! let cache = Cache::new(MemoryStore::new());
//! cache.set("note:1", &Note { text: "flour".into() }).unwrap();
//!
//! let note: Option<Note> = cache.get("note:1").unwrap();
//! assert_eq!(note.unwrap().text, "flour");
//! ```

mod error;
mod kv;
mod record;
mod session;

pub use error::CacheError;
pub use kv::{Cache, FileStore, KvStore, MemoryStore};
pub use record::{Record, RecordStore};
pub use session::SessionId;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        Cache, CacheError, FileStore, KvStore, MemoryStore, Record, RecordStore, SessionId,
    };
}
