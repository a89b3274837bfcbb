//! Stored models for the native_db backend.

use native_db::*;
use native_model::{native_model, Model};
use serde::{Deserialize, Serialize};

/// One stored entry, any kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 1, version = 1)]
#[native_db]
pub struct StoredRecord {
    /// Primary key - full key path, e.g. "/Tags,golang".
    #[primary_key]
    pub path: String,
    /// Kind namespace, indexed for queries.
    #[secondary_key]
    pub kind: String,
    /// Encoded resolved key, handed back on query results.
    pub key: Vec<u8>,
    /// Caller-encoded record bytes.
    pub value: Vec<u8>,
}

/// Identifier sequence for incomplete keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 2, version = 1)]
#[native_db]
pub struct StoredSequence {
    /// Always "ids" - single row.
    #[primary_key]
    pub id: String,
    /// Next identifier to assign.
    pub next: i64,
}
