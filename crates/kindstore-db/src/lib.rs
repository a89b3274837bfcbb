//! Kindstore DB - native_db storage backend
//!
//! Implements the `kindstore-core` [`Backend`](kindstore_core::Backend)
//! contract on top of `native_db`:
//! - Records of every kind live in one stored model, keyed by key path
//! - A kind secondary index serves queries
//! - A single-row sequence allocates identifiers for incomplete keys

mod model;
mod store;

pub use model::{StoredRecord, StoredSequence};
pub use store::Store;
