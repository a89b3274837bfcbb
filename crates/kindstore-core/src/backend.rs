//! Backend contract: the key-value store this layer maps records onto.

use crate::error::Result;
use crate::key::Key;

/// Default number of records fetched per page during iteration.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Opaque resumption token issued by a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor(String);

impl Cursor {
    /// Wrap an encoded token. Backends validate tokens when they consume
    /// them, not here.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The encoded token, suitable for handing to a caller and resuming
    /// later via [`QueryRunner::start_from`](crate::QueryRunner::start_from).
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One page of raw query results plus the position to resume from.
#[derive(Debug, Clone)]
pub struct Page {
    /// Resolved key and stored bytes per matching entry, in query order.
    pub items: Vec<(Key, Vec<u8>)>,
    /// Continuation cursor; `None` when the store has no more results.
    pub next: Option<Cursor>,
}

/// A query over one kind, interpreted by the backend.
#[derive(Debug, Clone)]
pub struct Query {
    kind: String,
    ancestor: Option<Key>,
    offset: usize,
    limit: Option<usize>,
    start: Option<Cursor>,
    page_size: usize,
}

impl Query {
    /// Query all entries of a kind.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ancestor: None,
            offset: 0,
            limit: None,
            start: None,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Restrict results to descendants of the given key.
    pub fn ancestor(mut self, ancestor: Key) -> Self {
        self.ancestor = Some(ancestor);
        self
    }

    /// Skip the first `offset` matching entries.
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Cap the number of returned entries.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Number of entries fetched per page during iteration.
    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Resume from a previously issued cursor.
    pub(crate) fn start_at(mut self, cursor: Cursor) -> Self {
        self.start = Some(cursor);
        self
    }

    /// The kind this query runs over.
    pub fn kind_name(&self) -> &str {
        &self.kind
    }

    /// The ancestor restriction, if any.
    pub fn ancestor_key(&self) -> Option<&Key> {
        self.ancestor.as_ref()
    }

    /// The number of entries to skip.
    pub fn offset_value(&self) -> usize {
        self.offset
    }

    /// The result cap, if any.
    pub fn limit_value(&self) -> Option<usize> {
        self.limit
    }

    /// The cursor this query resumes from, if any.
    pub fn start_cursor(&self) -> Option<&Cursor> {
        self.start.as_ref()
    }

    /// The configured page size.
    pub fn page_size_value(&self) -> usize {
        self.page_size
    }
}

/// Primitive operations supplied by the underlying key-value store.
///
/// The mapping layer delegates all storage-engine work here and adds no
/// caching, retry or consistency logic of its own. Backend errors surface
/// to the caller unmodified.
pub trait Backend {
    /// Fetch the bytes stored under `key`. [`Error::NotFound`] when absent.
    ///
    /// [`Error::NotFound`]: crate::Error::NotFound
    fn get(&self, key: &Key) -> Result<Vec<u8>>;

    /// Upsert `value` under `key`, allocating an identifier when the key is
    /// incomplete. Returns the resolved key.
    fn put(&self, key: &Key, value: &[u8]) -> Result<Key>;

    /// Atomic batch upsert: either every entry is written and every key
    /// resolved positionally, or nothing is written.
    fn put_all(&self, entries: &[(Key, Vec<u8>)]) -> Result<Vec<Key>>;

    /// Remove the entry under `key`. Removing a missing entry is not an
    /// error.
    fn delete(&self, key: &Key) -> Result<()>;

    /// Number of entries matching `query`.
    fn count(&self, query: &Query) -> Result<usize>;

    /// All entries matching `query`, in deterministic query order.
    fn get_all(&self, query: &Query) -> Result<Vec<(Key, Vec<u8>)>>;

    /// One page of at most `page_size` entries, starting from the query's
    /// cursor position.
    fn run(&self, query: &Query, page_size: usize) -> Result<Page>;

    /// Decode an externally supplied cursor token.
    /// [`Error::InvalidCursor`] when the token is malformed.
    ///
    /// [`Error::InvalidCursor`]: crate::Error::InvalidCursor
    fn decode_cursor(&self, token: &str) -> Result<Cursor>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_defaults() {
        let query = Query::new("Tags");
        assert_eq!(query.kind_name(), "Tags");
        assert_eq!(query.offset_value(), 0);
        assert_eq!(query.limit_value(), None);
        assert_eq!(query.page_size_value(), DEFAULT_PAGE_SIZE);
        assert!(query.start_cursor().is_none());
    }

    #[test]
    fn test_query_builder() {
        let query = Query::new("Posts")
            .ancestor(Key::numbered("Accounts", 1))
            .offset(5)
            .limit(10)
            .page_size(2);
        assert_eq!(query.ancestor_key().unwrap().path(), "/Accounts,1");
        assert_eq!(query.offset_value(), 5);
        assert_eq!(query.limit_value(), Some(10));
        assert_eq!(query.page_size_value(), 2);
    }

    #[test]
    fn test_page_size_floor_is_one() {
        let query = Query::new("Posts").page_size(0);
        assert_eq!(query.page_size_value(), 1);
    }
}
