//! Generic store facade: typed load/create/update/delete over any backend.

use crate::backend::{Backend, Query};
use crate::entity::Entity;
use crate::error::{Error, Result};
use crate::key::Key;
use crate::query::QueryRunner;
use serde::de::DeserializeOwned;
use serde::Serialize;

pub(crate) fn encode_record<T: Serialize>(record: &T) -> Result<Vec<u8>> {
    bincode::serialize(record).map_err(|e| Error::Serialization(e.to_string()))
}

pub(crate) fn decode_record<T: DeserializeOwned>(key: &Key, bytes: &[u8]) -> Result<T> {
    bincode::deserialize(bytes).map_err(|e| {
        Error::InvalidEntityType(format!(
            "stored value under {} does not match destination: {}",
            key, e
        ))
    })
}

/// Typed facade over a [`Backend`].
///
/// Every operation derives the record's key from its metadata (or uses an
/// already resolved key), issues exactly one backend operation, and writes
/// the resolved key back onto the record on success. On failure the
/// record's key is never touched.
pub struct Datastore<B> {
    backend: B,
}

impl<B: Backend> Datastore<B> {
    /// Bind the facade to a backend.
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// The underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Fetch the stored value into `record` and set its resolved key.
    ///
    /// Uses the record's resolved key when present; otherwise the key is
    /// built from metadata and must be complete, since load never
    /// auto-generates identifiers.
    pub fn load<T>(&self, record: &mut T) -> Result<()>
    where
        T: Entity + Serialize + DeserializeOwned,
    {
        let key = match record.key() {
            Some(key) => key.clone(),
            None => {
                let key = record.key_metadata().build()?;
                if !key.is_complete() {
                    return Err(Error::UnresolvableKey(format!(
                        "record of kind {} has no resolved key and no identifier",
                        key.kind()
                    )));
                }
                key
            }
        };

        let bytes = self.backend.get(&key)?;
        *record = decode_record(&key, &bytes)?;
        record.set_key(key);
        Ok(())
    }

    /// Insert `record` as a new entry and write the resulting key back.
    ///
    /// An identifier-less record gets a backend-assigned key.
    pub fn create<T>(&self, record: &mut T) -> Result<()>
    where
        T: Entity + Serialize,
    {
        let key = record.key_metadata().build()?;
        let bytes = encode_record(record)?;
        let resolved = self.backend.put(&key, &bytes)?;
        record.set_key(resolved);
        Ok(())
    }

    /// Overwrite the entry under the record's derived key, creating it if
    /// absent, and write the key back.
    ///
    /// The derived key must be complete: update never auto-generates.
    pub fn update<T>(&self, record: &mut T) -> Result<()>
    where
        T: Entity + Serialize,
    {
        let key = record.key_metadata().build()?;
        if !key.is_complete() {
            return Err(Error::UnresolvableKey(format!(
                "update of kind {} requires an identifier",
                key.kind()
            )));
        }
        let bytes = encode_record(record)?;
        let resolved = self.backend.put(&key, &bytes)?;
        record.set_key(resolved);
        Ok(())
    }

    /// Batch insert: one atomic backend write for all records.
    ///
    /// Keys are built and records encoded before the backend is touched,
    /// and resolved keys are written back positionally only after the whole
    /// batch succeeds. Either every record ends up keyed or none does.
    pub fn create_all<T>(&self, records: &mut [T]) -> Result<()>
    where
        T: Entity + Serialize,
    {
        let mut entries = Vec::with_capacity(records.len());
        for record in records.iter() {
            let key = record.key_metadata().build()?;
            let bytes = encode_record(record)?;
            entries.push((key, bytes));
        }

        let resolved = self.backend.put_all(&entries)?;
        for (record, key) in records.iter_mut().zip(resolved) {
            record.set_key(key);
        }
        Ok(())
    }

    /// Remove the entry under the record's key.
    ///
    /// The in-memory record is not mutated; only the store entry goes away.
    pub fn delete<T>(&self, record: &T) -> Result<()>
    where
        T: Entity,
    {
        let key = match record.key() {
            Some(key) => key.clone(),
            None => {
                let key = record.key_metadata().build()?;
                if !key.is_complete() {
                    return Err(Error::UnresolvableKey(format!(
                        "record of kind {} has no resolved key and no identifier",
                        key.kind()
                    )));
                }
                key
            }
        };
        self.backend.delete(&key)
    }

    /// Run `query` against the backend.
    pub fn query(&self, query: Query) -> QueryRunner<'_, B> {
        QueryRunner::new(&self.backend, query)
    }
}
