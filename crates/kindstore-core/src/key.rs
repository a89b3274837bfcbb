//! Store keys: kind-namespaced identifiers with optional ancestry.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier component of a [`Key`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum KeyId {
    /// Not yet assigned; the backend allocates one on create.
    #[default]
    Incomplete,
    /// String identifier chosen by the caller.
    Name(String),
    /// Numeric identifier, caller-chosen or backend-assigned.
    Id(i64),
}

/// A resolved store key: kind, identifier and optional parent.
///
/// The textual form follows the path convention `/<Kind>,<id>`, with
/// ancestors prefixed, e.g. `/Accounts,1/Tags,golang`. An incomplete
/// identifier renders as `0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Key {
    kind: String,
    id: KeyId,
    parent: Option<Box<Key>>,
}

impl Key {
    /// Create a key with a string identifier.
    pub fn named(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: KeyId::Name(name.into()),
            parent: None,
        }
    }

    /// Create a key with a numeric identifier.
    pub fn numbered(kind: impl Into<String>, id: i64) -> Self {
        Self {
            kind: kind.into(),
            id: KeyId::Id(id),
            parent: None,
        }
    }

    /// Create an incomplete key; the backend assigns an identifier on create.
    pub fn incomplete(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: KeyId::Incomplete,
            parent: None,
        }
    }

    /// Nest this key under a parent key.
    pub fn with_parent(mut self, parent: Key) -> Self {
        self.parent = Some(Box::new(parent));
        self
    }

    /// The kind namespace this key addresses.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The identifier component.
    pub fn id(&self) -> &KeyId {
        &self.id
    }

    /// The parent key, if any.
    pub fn parent(&self) -> Option<&Key> {
        self.parent.as_deref()
    }

    /// Whether the key carries an identifier.
    pub fn is_complete(&self) -> bool {
        !matches!(self.id, KeyId::Incomplete)
    }

    /// Resolve an incomplete key with a backend-assigned numeric identifier.
    pub fn complete_with(mut self, id: i64) -> Self {
        self.id = KeyId::Id(id);
        self
    }

    /// Whether `ancestor` appears in this key's parent chain.
    pub fn has_ancestor(&self, ancestor: &Key) -> bool {
        let mut current = self.parent();
        while let Some(key) = current {
            if key == ancestor {
                return true;
            }
            current = key.parent();
        }
        false
    }

    /// The full path form, identical to the `Display` output.
    pub fn path(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(parent) = &self.parent {
            write!(f, "{}", parent)?;
        }
        match &self.id {
            KeyId::Name(name) => write!(f, "/{},{}", self.kind, name),
            KeyId::Id(id) => write!(f, "/{},{}", self.kind, id),
            KeyId::Incomplete => write!(f, "/{},0", self.kind),
        }
    }
}
