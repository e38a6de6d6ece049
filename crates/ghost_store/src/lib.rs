//! Ghost store - keyed persistence of games with compare-and-swap writes.
//!
//! Two backends implement [`GameStore`]:
//!
//! - [`MemoryStore`]: a shared in-process map, for tests and embedding
//! - [`SqliteStore`]: a diesel-managed SQLite file
//!
//! Both reject a [`GameStore::conditional_update`] whose guard no longer
//! matches with [`StoreError::Conflict`], leaving the stored game untouched.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod memory;
mod sqlite;
mod store;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use sqlite::{MIGRATIONS, SqliteStore};
pub use store::{GameStore, ReadConsistency};
