//! Tag reconciliation between caller-declared tags and tags derived from
//! controller names.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Swagger Tag object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Tag {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: Some(description.into()),
        }
    }

    /// A tag derived from a controller: name and description are both the controller name
    pub fn from_controller(controller: &str) -> Self {
        Self::new(controller, controller)
    }

    fn key(&self) -> String {
        self.name.to_lowercase()
    }
}

/// Insertion-ordered set of tags keyed by lower-cased name.
///
/// The first spelling inserted for a name is the one kept.
#[derive(Debug, Clone, Default)]
pub struct TagSet {
    tags: IndexMap<String, Tag>,
}

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `tag` unless a tag with the same name (ignoring case) is present.
    /// Returns whether the tag was added.
    pub fn insert(&mut self, tag: Tag) -> bool {
        let key = tag.key();
        if self.tags.contains_key(&key) {
            return false;
        }
        self.tags.insert(key, tag);
        true
    }

    pub fn into_vec(self) -> Vec<Tag> {
        self.tags.into_values().collect()
    }
}

/// Merges configured tags with derived ones.
///
/// Configured tags come first, in order. A derived tag is appended only when
/// no configured tag has the same name ignoring case; on a collision the
/// configured tag (and its description) is kept and the derived one dropped.
/// Derived tags are not deduplicated against each other.
pub fn merge_tags(configured: &[Tag], derived: &[Tag]) -> Vec<Tag> {
    let mut result = configured.to_vec();

    for tag in derived {
        let key = tag.key();
        let exists = configured.iter().any(|conf| conf.key() == key);
        if !exists {
            result.push(tag.clone());
        }
    }

    result
}
