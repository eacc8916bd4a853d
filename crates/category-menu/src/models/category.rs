//! Category models.
//!
//! - `CategoryRecord`: a flat, persisted row with per-locale translations
//! - `CategoryNode`: an immutable tree snapshot already translated for one locale

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category identifier.
pub type CategoryId = i64;

/// A category in the tree, translated for a single locale.
///
/// `nested_slug` is the slugs of all ancestors joined with this node's own
/// slug, so it is fixed by the node's position in the tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryNode {
    pub id: CategoryId,

    /// Parent category, if any. Not owned.
    pub parent_id: Option<CategoryId>,

    /// Locale-dependent display name.
    pub name: String,

    /// Stable, non-localized code.
    pub code: String,

    /// Local path segment.
    pub slug: String,

    /// Full path from the root (e.g. "clothing/shirts").
    pub nested_slug: String,

    pub updated_at: DateTime<Utc>,

    /// Ordered children; empty for leaves.
    #[serde(default)]
    pub children: Vec<CategoryNode>,
}

impl CategoryNode {
    /// Whether this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Per-locale overrides for the translatable category fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryTranslation {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub slug: Option<String>,
}

/// A stored category row (adjacency list form).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRecord {
    pub id: CategoryId,

    #[serde(default)]
    pub parent_id: Option<CategoryId>,

    pub code: String,

    /// Slug in the default locale.
    pub slug: String,

    /// Name in the default locale.
    pub name: String,

    /// Sort position among siblings (lower = first).
    #[serde(default)]
    pub sort_order: i32,

    pub updated_at: DateTime<Utc>,

    /// Locale code to translated fields.
    #[serde(default)]
    pub translations: HashMap<String, CategoryTranslation>,
}

impl CategoryRecord {
    /// Name in `locale`, falling back to the default name.
    pub fn name_in(&self, locale: &str) -> &str {
        self.translations
            .get(locale)
            .and_then(|t| t.name.as_deref())
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.name)
    }

    /// Slug in `locale`, falling back to the default slug.
    pub fn slug_in(&self, locale: &str) -> &str {
        self.translations
            .get(locale)
            .and_then(|t| t.slug.as_deref())
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.slug)
    }
}
