//! Query runner: typed execution and iteration of backend queries.

use crate::backend::{Backend, Cursor, Query};
use crate::entity::Entity;
use crate::error::{Error, Result};
use crate::store::decode_record;
use serde::de::DeserializeOwned;
use std::collections::VecDeque;
use std::marker::PhantomData;

/// One query bound to a backend.
///
/// Obtained from [`Datastore::query`](crate::Datastore::query). Execution is
/// synchronous; every fetch blocks until the backend responds.
pub struct QueryRunner<'a, B> {
    backend: &'a B,
    query: Query,
}

impl<'a, B: Backend> QueryRunner<'a, B> {
    pub(crate) fn new(backend: &'a B, query: Query) -> Self {
        Self { backend, query }
    }

    /// Number of matching entries.
    pub fn count(&self) -> Result<usize> {
        self.backend.count(&self.query)
    }

    /// Copy the first matching entry into `destination` and set its key.
    ///
    /// Fails with [`Error::NotFound`] when the query matches nothing.
    pub fn result<T>(&self, destination: &mut T) -> Result<()>
    where
        T: Entity + DeserializeOwned,
    {
        let page = self.backend.run(&self.query, 1)?;
        let (key, bytes) = page.items.into_iter().next().ok_or_else(|| {
            Error::NotFound(format!("no {} matches the query", self.query.kind_name()))
        })?;
        *destination = decode_record(&key, &bytes)?;
        destination.set_key(key);
        Ok(())
    }

    /// Append all matching entries to `destination`, key set on each.
    ///
    /// Nothing is appended when any stored value fails to decode as `T`.
    pub fn results<T>(&self, destination: &mut Vec<T>) -> Result<()>
    where
        T: Entity + DeserializeOwned,
    {
        let items = self.backend.get_all(&self.query)?;
        let mut decoded = Vec::with_capacity(items.len());
        for (key, bytes) in items {
            let mut record: T = decode_record(&key, &bytes)?;
            record.set_key(key);
            decoded.push(record);
        }
        destination.append(&mut decoded);
        Ok(())
    }

    /// Resume this query from a previously issued cursor token.
    ///
    /// An undecodable token is a hard [`Error::InvalidCursor`] rather than a
    /// silent no-op, so a caller mixing up tokens hears about it.
    pub fn start_from(self, token: &str) -> Result<Self> {
        let cursor = self.backend.decode_cursor(token)?;
        Ok(Self {
            backend: self.backend,
            query: self.query.start_at(cursor),
        })
    }

    /// Lazy, forward-only iteration over individual matching records.
    pub fn items<T>(self) -> Items<'a, B, T>
    where
        T: Entity + DeserializeOwned,
    {
        let page_size = self.query.page_size_value();
        Items {
            backend: self.backend,
            query: self.query,
            page_size,
            buffer: VecDeque::new(),
            done: false,
        }
    }

    /// Lazy, forward-only iteration over pages of matching records.
    pub fn pages<T>(self) -> Pages<'a, B, T>
    where
        T: Entity + DeserializeOwned,
    {
        let page_size = self.query.page_size_value();
        Pages {
            backend: self.backend,
            query: self.query,
            page_size,
            cursor: None,
            done: false,
            _marker: PhantomData,
        }
    }
}

/// Iterator over individual records, fetched one page at a time.
///
/// Non-restartable; abandoning it mid-iteration is safe since only a cursor
/// position is held.
pub struct Items<'a, B, T> {
    backend: &'a B,
    query: Query,
    page_size: usize,
    buffer: VecDeque<T>,
    done: bool,
}

impl<'a, B, T> Iterator for Items<'a, B, T>
where
    B: Backend,
    T: Entity + DeserializeOwned,
{
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(record) = self.buffer.pop_front() {
                return Some(Ok(record));
            }
            if self.done {
                return None;
            }

            let page = match self.backend.run(&self.query, self.page_size) {
                Ok(page) => page,
                Err(err) => {
                    self.done = true;
                    return Some(Err(err));
                }
            };
            match page.next {
                Some(cursor) => self.query = self.query.clone().start_at(cursor),
                None => self.done = true,
            }
            for (key, bytes) in page.items {
                let mut record: T = match decode_record(&key, &bytes) {
                    Ok(record) => record,
                    Err(err) => {
                        self.done = true;
                        self.buffer.clear();
                        return Some(Err(err));
                    }
                };
                record.set_key(key);
                self.buffer.push_back(record);
            }
        }
    }
}

/// Iterator over pages (bounded batches) of records.
///
/// After each page, [`Pages::cursor`] holds the token to resume from via
/// [`QueryRunner::start_from`].
pub struct Pages<'a, B, T> {
    backend: &'a B,
    query: Query,
    page_size: usize,
    cursor: Option<Cursor>,
    done: bool,
    _marker: PhantomData<T>,
}

impl<'a, B, T> Pages<'a, B, T> {
    /// Cursor positioned after the most recently returned page, if the
    /// store reported more results.
    pub fn cursor(&self) -> Option<&Cursor> {
        self.cursor.as_ref()
    }
}

impl<'a, B, T> Iterator for Pages<'a, B, T>
where
    B: Backend,
    T: Entity + DeserializeOwned,
{
    type Item = Result<Vec<T>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.done {
                return None;
            }

            let page = match self.backend.run(&self.query, self.page_size) {
                Ok(page) => page,
                Err(err) => {
                    self.done = true;
                    return Some(Err(err));
                }
            };
            self.cursor = page.next.clone();
            match page.next {
                Some(cursor) => self.query = self.query.clone().start_at(cursor),
                None => self.done = true,
            }
            if page.items.is_empty() {
                self.done = true;
                continue;
            }

            let mut records = Vec::with_capacity(page.items.len());
            for (key, bytes) in page.items {
                let mut record: T = match decode_record(&key, &bytes) {
                    Ok(record) => record,
                    Err(err) => {
                        self.done = true;
                        return Some(Err(err));
                    }
                };
                record.set_key(key);
                records.push(record);
            }
            return Some(Ok(records));
        }
    }
}
