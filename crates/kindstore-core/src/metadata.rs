//! Key metadata: descriptors extracted from records and built into keys.
//!
//! Records supply metadata one of two ways, chosen explicitly per type:
//! - implement [`Entity::key_metadata`](crate::Entity::key_metadata) directly
//!   (the explicit strategy), or
//! - implement [`TaggedEntity`] to declare which field carries the identifier
//!   and wire `key_metadata` to [`tagged_metadata`] (the tag-driven strategy).

use crate::error::{Error, Result};
use crate::key::Key;

/// Descriptor from which a store key is built.
///
/// A string identifier takes precedence over a numeric one when both are
/// present. Neither identifier means the key is incomplete and the backend
/// assigns one on create.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyMetadata {
    /// Kind namespace. Must be non-empty for the metadata to be valid.
    pub kind: String,
    /// String identifier, if the record carries one.
    pub string_id: Option<String>,
    /// Numeric identifier, if the record carries one.
    pub int_id: Option<i64>,
    /// Parent key for hierarchical nesting.
    pub parent: Option<Key>,
}

impl KeyMetadata {
    /// Metadata for the given kind with no identifier.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }

    /// Set the string identifier.
    pub fn with_string_id(mut self, id: impl Into<String>) -> Self {
        self.string_id = Some(id.into());
        self
    }

    /// Set the numeric identifier.
    pub fn with_int_id(mut self, id: i64) -> Self {
        self.int_id = Some(id);
        self
    }

    /// Set the parent key.
    pub fn with_parent(mut self, parent: Key) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Build a concrete key from this metadata.
    ///
    /// Deterministic: equal metadata always builds equal keys. Fails with
    /// [`Error::InvalidMetadata`] when the kind is empty.
    pub fn build(&self) -> Result<Key> {
        if self.kind.is_empty() {
            return Err(Error::InvalidMetadata("missing kind".to_string()));
        }

        let key = match (&self.string_id, self.int_id) {
            (Some(name), _) if !name.is_empty() => Key::named(&self.kind, name),
            (_, Some(id)) => Key::numbered(&self.kind, id),
            _ => Key::incomplete(&self.kind),
        };

        Ok(match &self.parent {
            Some(parent) => key.with_parent(parent.clone()),
            None => key,
        })
    }
}

/// Identifier value reported by a tagged record.
#[derive(Debug, Clone, PartialEq)]
pub enum IdValue {
    /// Textual identifier field.
    Text(String),
    /// Numeric identifier field.
    Number(i64),
    /// No identifier field; the backend assigns one on create.
    None,
}

/// Declarative identifier registration for record types that do not
/// implement metadata extraction by hand.
///
/// The kind defaults to the pluralized short type name (`User` becomes
/// `"Users"`); override [`TaggedEntity::kind`] to pick a different one.
pub trait TaggedEntity {
    /// Value of the field registered as this record's identifier.
    fn id_value(&self) -> IdValue;

    /// Kind namespace for this record type.
    fn kind() -> String
    where
        Self: Sized,
    {
        pluralized_type_name::<Self>()
    }
}

/// Extract key metadata from a tagged record.
pub fn tagged_metadata<T: TaggedEntity>(record: &T) -> KeyMetadata {
    let metadata = KeyMetadata::new(T::kind());
    match record.id_value() {
        IdValue::Text(name) => metadata.with_string_id(name),
        IdValue::Number(id) => metadata.with_int_id(id),
        IdValue::None => metadata,
    }
}

/// Pluralized short name of a type, e.g. `my_app::User` becomes `"Users"`.
fn pluralized_type_name<T: ?Sized>() -> String {
    let name = std::any::type_name::<T>();
    let short = name.rsplit("::").next().unwrap_or(name);
    format!("{}s", short)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct User {
        name: String,
    }

    impl TaggedEntity for User {
        fn id_value(&self) -> IdValue {
            IdValue::Text(self.name.clone())
        }
    }

    struct Account {
        id: i64,
    }

    impl TaggedEntity for Account {
        fn id_value(&self) -> IdValue {
            IdValue::Number(self.id)
        }

        fn kind() -> String {
            "Accounts".to_string()
        }
    }

    #[test]
    fn test_build_is_deterministic() {
        let metadata = KeyMetadata::new("Tags").with_string_id("golang");
        let first = metadata.build().unwrap();
        let second = metadata.build().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_build_string_id() {
        let key = KeyMetadata::new("Tags")
            .with_string_id("golang")
            .build()
            .unwrap();
        assert_eq!(key.path(), "/Tags,golang");
    }

    #[test]
    fn test_build_int_id() {
        let key = KeyMetadata::new("Accounts").with_int_id(123).build().unwrap();
        assert_eq!(key.path(), "/Accounts,123");
    }

    #[test]
    fn test_string_id_wins_over_int_id() {
        let key = KeyMetadata::new("Tags")
            .with_string_id("golang")
            .with_int_id(123)
            .build()
            .unwrap();
        assert_eq!(key.path(), "/Tags,golang");
    }

    #[test]
    fn test_build_without_identifier_is_incomplete() {
        let key = KeyMetadata::new("Posts").build().unwrap();
        assert!(!key.is_complete());
    }

    #[test]
    fn test_build_missing_kind_fails() {
        let err = KeyMetadata::default().build().unwrap_err();
        assert!(matches!(err, Error::InvalidMetadata(_)));
    }

    #[test]
    fn test_build_nests_under_parent() {
        let key = KeyMetadata::new("Tags")
            .with_string_id("golang")
            .with_parent(Key::numbered("Accounts", 1))
            .build()
            .unwrap();
        assert_eq!(key.path(), "/Accounts,1/Tags,golang");
    }

    #[test]
    fn test_tagged_text_field_becomes_string_id() {
        let user = User {
            name: "Diego".to_string(),
        };
        let metadata = tagged_metadata(&user);
        assert_eq!(metadata.string_id.as_deref(), Some("Diego"));
        assert_eq!(metadata.int_id, None);
    }

    #[test]
    fn test_tagged_numeric_field_becomes_int_id() {
        let account = Account { id: 123 };
        let metadata = tagged_metadata(&account);
        assert_eq!(metadata.int_id, Some(123));
        assert_eq!(metadata.string_id, None);
    }

    #[test]
    fn test_tagged_kind_defaults_to_pluralized_type_name() {
        let user = User {
            name: "Diego".to_string(),
        };
        assert_eq!(tagged_metadata(&user).kind, "Users");
    }

    #[test]
    fn test_tagged_kind_override() {
        let account = Account { id: 1 };
        assert_eq!(tagged_metadata(&account).kind, "Accounts");
    }
}
