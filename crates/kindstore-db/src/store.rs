//! native_db-backed store implementing the core backend contract.

use crate::model::{StoredRecord, StoredRecordKey, StoredSequence};
use kindstore_core::{Backend, Cursor, Error, Key, Page, Query, Result};
use native_db::transaction::RwTransaction;
use native_db::*;
use std::fmt;
use std::path::Path;
use std::sync::LazyLock;

// Static models for the database
static MODELS: LazyLock<Models> = LazyLock::new(|| {
    let mut models = Models::new();
    models.define::<StoredRecord>().unwrap();
    models.define::<StoredSequence>().unwrap();
    models
});

const SEQUENCE_ROW: &str = "ids";

fn db_err(err: impl fmt::Display) -> Error {
    Error::Backend(err.to_string())
}

fn encode_key(key: &Key) -> Result<Vec<u8>> {
    bincode::serialize(key).map_err(|e| Error::Serialization(e.to_string()))
}

fn decode_key(bytes: &[u8]) -> Result<Key> {
    bincode::deserialize(bytes).map_err(|e| Error::Serialization(e.to_string()))
}

fn parse_cursor(cursor: &Cursor) -> Result<usize> {
    usize::from_str_radix(cursor.as_str(), 16)
        .map_err(|_| Error::InvalidCursor(cursor.as_str().to_string()))
}

/// Key-value store backed by native_db.
pub struct Store {
    db: Database<'static>,
}

impl Store {
    /// Open or create a database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = Builder::new()
            .create(&MODELS, path.as_ref())
            .map_err(db_err)?;
        Ok(Self { db })
    }

    /// Create an in-memory database.
    pub fn in_memory() -> Result<Self> {
        let db = Builder::new().create_in_memory(&MODELS).map_err(db_err)?;
        Ok(Self { db })
    }

    fn next_id(&self, rw: &RwTransaction<'_>) -> Result<i64> {
        let sequence: Option<StoredSequence> = rw
            .get()
            .primary(SEQUENCE_ROW.to_string())
            .map_err(db_err)?;
        let next = sequence.map(|s| s.next).unwrap_or(1);
        rw.upsert(StoredSequence {
            id: SEQUENCE_ROW.to_string(),
            next: next + 1,
        })
        .map_err(db_err)?;
        Ok(next)
    }

    fn put_tx(&self, rw: &RwTransaction<'_>, key: &Key, value: &[u8]) -> Result<Key> {
        let resolved = if key.is_complete() {
            key.clone()
        } else {
            key.clone().complete_with(self.next_id(rw)?)
        };
        rw.upsert(StoredRecord {
            path: resolved.path(),
            kind: resolved.kind().to_string(),
            key: encode_key(&resolved)?,
            value: value.to_vec(),
        })
        .map_err(db_err)?;
        Ok(resolved)
    }

    /// All entries matching the query's kind and ancestor, ordered by key
    /// path, with offset and limit applied.
    fn window(&self, query: &Query) -> Result<Vec<StoredRecord>> {
        let r = self.db.r_transaction().map_err(db_err)?;
        let scan = r
            .scan()
            .secondary::<StoredRecord>(StoredRecordKey::kind)
            .map_err(db_err)?;
        let iter = scan.start_with(query.kind_name()).map_err(db_err)?;

        let mut records = Vec::new();
        for item in iter {
            let record = item.map_err(db_err)?;
            if record.kind != query.kind_name() {
                continue;
            }
            if let Some(ancestor) = query.ancestor_key() {
                if !decode_key(&record.key)?.has_ancestor(ancestor) {
                    continue;
                }
            }
            records.push(record);
        }
        records.sort_by(|a, b| a.path.cmp(&b.path));

        let offset = query.offset_value().min(records.len());
        let mut window = records.split_off(offset);
        if let Some(limit) = query.limit_value() {
            window.truncate(limit);
        }
        Ok(window)
    }

    fn start_position(&self, query: &Query) -> Result<usize> {
        match query.start_cursor() {
            Some(cursor) => parse_cursor(cursor),
            None => Ok(0),
        }
    }
}

impl Backend for Store {
    fn get(&self, key: &Key) -> Result<Vec<u8>> {
        let r = self.db.r_transaction().map_err(db_err)?;
        let stored: Option<StoredRecord> = r.get().primary(key.path()).map_err(db_err)?;
        match stored {
            Some(record) => Ok(record.value),
            None => Err(Error::NotFound(key.path())),
        }
    }

    fn put(&self, key: &Key, value: &[u8]) -> Result<Key> {
        let rw = self.db.rw_transaction().map_err(db_err)?;
        let resolved = self.put_tx(&rw, key, value)?;
        rw.commit().map_err(db_err)?;
        Ok(resolved)
    }

    fn put_all(&self, entries: &[(Key, Vec<u8>)]) -> Result<Vec<Key>> {
        let rw = self.db.rw_transaction().map_err(db_err)?;
        let mut resolved = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            resolved.push(self.put_tx(&rw, key, value)?);
        }
        rw.commit().map_err(db_err)?;
        Ok(resolved)
    }

    fn delete(&self, key: &Key) -> Result<()> {
        let rw = self.db.rw_transaction().map_err(db_err)?;
        let stored: Option<StoredRecord> = rw.get().primary(key.path()).map_err(db_err)?;
        if let Some(record) = stored {
            rw.remove(record).map_err(db_err)?;
        }
        rw.commit().map_err(db_err)?;
        Ok(())
    }

    fn count(&self, query: &Query) -> Result<usize> {
        Ok(self.window(query)?.len())
    }

    fn get_all(&self, query: &Query) -> Result<Vec<(Key, Vec<u8>)>> {
        let window = self.window(query)?;
        let start = self.start_position(query)?.min(window.len());
        window[start..]
            .iter()
            .map(|record| Ok((decode_key(&record.key)?, record.value.clone())))
            .collect()
    }

    fn run(&self, query: &Query, page_size: usize) -> Result<Page> {
        let window = self.window(query)?;
        let start = self.start_position(query)?.min(window.len());
        let end = (start + page_size.max(1)).min(window.len());

        let mut items = Vec::with_capacity(end - start);
        for record in &window[start..end] {
            items.push((decode_key(&record.key)?, record.value.clone()));
        }
        let next = if end < window.len() {
            Some(Cursor::new(format!("{:x}", end)))
        } else {
            None
        };
        Ok(Page { items, next })
    }

    fn decode_cursor(&self, token: &str) -> Result<Cursor> {
        let cursor = Cursor::new(token);
        parse_cursor(&cursor)?;
        Ok(cursor)
    }
}
