//! Kindstore Core - Typed entity mapping over a key-value datastore
//!
//! This crate provides the mapping layer itself:
//! - Keys and key metadata (`Key`, `KeyMetadata`)
//! - The entity contract storable records satisfy (`Entity`, `Model`)
//! - A generic store facade (`Datastore`) for load/create/update/delete
//! - A query runner with paged and streaming iteration (`QueryRunner`)
//! - The backend contract the underlying store implements (`Backend`)
//!
//! Storage itself lives behind the [`Backend`] trait; see `kindstore-db`
//! for the shipped `native_db` implementation.

mod backend;
mod entity;
mod error;
mod key;
mod metadata;
mod query;
mod store;

pub use backend::{Backend, Cursor, Page, Query, DEFAULT_PAGE_SIZE};
pub use entity::{Entity, Model};
pub use error::{Error, Result};
pub use key::{Key, KeyId};
pub use metadata::{tagged_metadata, IdValue, KeyMetadata, TaggedEntity};
pub use query::{Items, Pages, QueryRunner};
pub use store::Datastore;
