//! Entity contract for storable records.

use crate::key::Key;
use crate::metadata::KeyMetadata;
use serde::{Deserialize, Serialize};

/// Capability contract every storable record satisfies: it can report and
/// accept its resolved store key, and derive its key metadata.
pub trait Entity {
    /// The resolved key, set after a successful load/create/update.
    fn key(&self) -> Option<&Key>;

    /// Accept a resolved key.
    fn set_key(&mut self, key: Key);

    /// Derive the metadata this record's key is built from.
    fn key_metadata(&self) -> KeyMetadata;
}

/// Embeddable key holder for records.
///
/// Holds the resolved key outside the record's stored bytes; records embed
/// it and delegate [`Entity::key`] and [`Entity::set_key`] to it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Model {
    #[serde(skip)]
    key: Option<Key>,
}

impl Model {
    /// The resolved key, if one has been set.
    pub fn key(&self) -> Option<&Key> {
        self.key.as_ref()
    }

    /// Set the resolved key.
    pub fn set_key(&mut self, key: Key) {
        self.key = Some(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Tag {
        model: Model,
        name: String,
    }

    #[test]
    fn test_key_starts_unset() {
        let model = Model::default();
        assert!(model.key().is_none());
    }

    #[test]
    fn test_set_key() {
        let mut model = Model::default();
        model.set_key(Key::named("Tags", "golang"));
        assert_eq!(model.key().unwrap().path(), "/Tags,golang");
    }

    #[test]
    fn test_key_is_not_serialized() {
        let mut tag = Tag {
            model: Model::default(),
            name: "golang".to_string(),
        };
        tag.model.set_key(Key::named("Tags", "golang"));

        let bytes = bincode::serialize(&tag).unwrap();
        let decoded: Tag = bincode::deserialize(&bytes).unwrap();

        assert_eq!(decoded.name, "golang");
        assert!(decoded.model.key().is_none());
    }
}
