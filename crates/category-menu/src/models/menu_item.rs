//! Menu item records and the cached per-locale results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::category::{CategoryId, CategoryNode};

/// A single navigation entry built from a category.
///
/// `items` is present only for categories with children; leaves never carry
/// an empty list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemRecord {
    /// Resolved category page URL.
    pub url: String,

    /// True iff `url` equals the current request URL.
    pub is_active: bool,

    /// Last modification time of the source category.
    pub mtime: DateTime<Utc>,

    pub title: String,

    pub code: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<MenuItemRecord>>,
}

impl MenuItemRecord {
    fn mark_active(&mut self, current_url: &str) {
        self.is_active = self.url == current_url;
        for child in self.items.iter_mut().flatten() {
            child.mark_active(current_url);
        }
    }
}

/// The full category menu for one locale. This is the cached unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MenuTreeResult {
    pub items: Vec<MenuItemRecord>,
}

impl MenuTreeResult {
    /// Recompute `is_active` on every item for another request URL.
    ///
    /// The cached tree keeps the flags of the request that built it.
    pub fn mark_active(&mut self, current_url: &str) {
        for item in &mut self.items {
            item.mark_active(current_url);
        }
    }

    /// Total number of items at every depth.
    pub fn len(&self) -> usize {
        fn count(items: &[MenuItemRecord]) -> usize {
            items
                .iter()
                .map(|i| 1 + i.items.as_deref().map_or(0, count))
                .sum()
        }
        count(&self.items)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// One entry of the id map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryMapEntry {
    pub id: CategoryId,
    pub name: String,
    pub nested_slug: String,
}

/// Flat id → name map of every category for one locale, in tree order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryMap {
    pub entries: Vec<CategoryMapEntry>,
}

impl CategoryMap {
    /// Flatten a category forest depth-first.
    pub fn from_nodes(nodes: &[CategoryNode]) -> Self {
        fn walk(nodes: &[CategoryNode], entries: &mut Vec<CategoryMapEntry>) {
            for node in nodes {
                entries.push(CategoryMapEntry {
                    id: node.id,
                    name: node.name.clone(),
                    nested_slug: node.nested_slug.clone(),
                });
                walk(&node.children, entries);
            }
        }

        let mut entries = Vec::new();
        walk(nodes, &mut entries);
        Self { entries }
    }

    /// Display name of a category.
    pub fn name_of(&self, id: CategoryId) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.name.as_str())
    }

    /// Category addressed by a nested slug.
    pub fn id_for_slug(&self, nested_slug: &str) -> Option<CategoryId> {
        let nested_slug = nested_slug.trim_matches('/');
        self.entries
            .iter()
            .find(|e| e.nested_slug == nested_slug)
            .map(|e| e.id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn item(url: &str, items: Option<Vec<MenuItemRecord>>) -> MenuItemRecord {
        MenuItemRecord {
            url: url.to_string(),
            is_active: false,
            mtime: DateTime::<Utc>::default(),
            title: url.to_string(),
            code: url.to_string(),
            items,
        }
    }

    #[test]
    fn leaf_serializes_without_items() {
        let json = serde_json::to_value(item("/a", None)).unwrap();
        assert!(json.get("items").is_none());
        assert_eq!(json["isActive"], false);
        assert_eq!(json["url"], "/a");
    }

    #[test]
    fn mark_active_walks_the_tree() {
        let mut tree = MenuTreeResult {
            items: vec![item("/a", Some(vec![item("/a/b", None)])), item("/c", None)],
        };
        tree.items[0].is_active = true;

        tree.mark_active("/a/b");

        assert!(!tree.items[0].is_active);
        assert!(tree.items[0].items.as_ref().unwrap()[0].is_active);
        assert!(!tree.items[1].is_active);
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn map_lookups() {
        let map = CategoryMap {
            entries: vec![
                CategoryMapEntry {
                    id: 1,
                    name: "A".to_string(),
                    nested_slug: "a".to_string(),
                },
                CategoryMapEntry {
                    id: 2,
                    name: "B".to_string(),
                    nested_slug: "a/b".to_string(),
                },
            ],
        };
        assert_eq!(map.name_of(2), Some("B"));
        assert_eq!(map.name_of(3), None);
        assert_eq!(map.id_for_slug("/a/b/"), Some(2));
        assert_eq!(map.id_for_slug("b"), None);
    }
}
