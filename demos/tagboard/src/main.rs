//! Tagboard Demo
//!
//! Demonstrates the kindstore mapping layer with a tiny tag/post board:
//! explicit and tag-driven key metadata, CRUD round trips, and paged
//! query iteration over an in-memory database.

use kindstore_core::{
    tagged_metadata, Datastore, Entity, IdValue, Key, KeyMetadata, Model, Query, TaggedEntity,
};
use kindstore_db::Store;
use serde::{Deserialize, Serialize};

/// Tag uses the explicit strategy: it derives its own metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Tag {
    model: Model,
    name: String,
    owner: String,
}

impl Entity for Tag {
    fn key(&self) -> Option<&Key> {
        self.model.key()
    }

    fn set_key(&mut self, key: Key) {
        self.model.set_key(key);
    }

    fn key_metadata(&self) -> KeyMetadata {
        KeyMetadata::new("Tags").with_string_id(self.name.as_str())
    }
}

/// Post uses the tag-driven strategy: it registers its identifier field
/// and lets the kind default to the pluralized type name ("Posts").
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Post {
    model: Model,
    description: String,
}

impl TaggedEntity for Post {
    fn id_value(&self) -> IdValue {
        IdValue::None
    }
}

impl Entity for Post {
    fn key(&self) -> Option<&Key> {
        self.model.key()
    }

    fn set_key(&mut self, key: Key) {
        self.model.set_key(key);
    }

    fn key_metadata(&self) -> KeyMetadata {
        tagged_metadata(self)
    }
}

fn main() -> kindstore_core::Result<()> {
    println!("=== Kindstore Tagboard Demo ===\n");

    let store = Datastore::new(Store::in_memory()?);

    // Create a tag under its own name
    let mut tag = Tag {
        model: Model::default(),
        name: "golang".to_string(),
        owner: "Borges".to_string(),
    };
    store.create(&mut tag)?;
    println!("Created tag at {}", tag.key().unwrap());

    // Load it back through a fresh record carrying only the identifier
    let mut loaded = Tag {
        name: "golang".to_string(),
        ..Default::default()
    };
    store.load(&mut loaded)?;
    println!("Loaded tag owned by {}", loaded.owner);

    // Batch-create posts; the store assigns their keys
    let mut posts: Vec<Post> = (1..=5)
        .map(|n| Post {
            model: Model::default(),
            description: format!("Post number {}", n),
        })
        .collect();
    store.create_all(&mut posts)?;
    for post in &posts {
        println!("Created post at {}", post.key().unwrap());
    }

    // Walk the posts two at a time
    let total = store.query(Query::new("Posts")).count()?;
    println!("\nIterating {} posts in pages of 2:", total);
    let pages = store.query(Query::new("Posts").page_size(2)).pages::<Post>();
    for (number, page) in pages.enumerate() {
        let page = page?;
        let descriptions: Vec<&str> = page.iter().map(|p| p.description.as_str()).collect();
        println!("  page {}: {:?}", number + 1, descriptions);
    }

    // Update, then delete
    let mut updated = loaded;
    updated.owner = "Diego".to_string();
    store.update(&mut updated)?;
    store.delete(&updated)?;
    println!("\nDeleted {}", updated.key().unwrap());

    Ok(())
}
