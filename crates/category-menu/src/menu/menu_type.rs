//! Menu item types offered to the host menu editor.
//!
//! The serialized shapes are matched by the editor UI:
//! - `{"references": {"<id>": "<name>" | {"title": ..., "items": {...}}}}`
//! - `{"dynamicItems": true}`

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

use crate::models::{CategoryId, CategoryNode};

/// Menu entry kinds backed by categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuType {
    /// One picked category.
    Category,
    /// Every category, expanded at render time.
    AllCategories,
}

impl MenuType {
    pub fn as_str(self) -> &'static str {
        match self {
            MenuType::Category => "category",
            MenuType::AllCategories => "all-categories",
        }
    }

    /// Human-readable name shown in the menu editor.
    pub fn label(self) -> &'static str {
        match self {
            MenuType::Category => "Category",
            MenuType::AllCategories => "All categories",
        }
    }

    pub fn parse(kind: &str) -> Option<Self> {
        match kind {
            "category" => Some(MenuType::Category),
            "all-categories" => Some(MenuType::AllCategories),
            _ => None,
        }
    }
}

/// Menu types to register with the host, as (kind, label) pairs.
pub fn registered_menu_types() -> Vec<(&'static str, &'static str)> {
    [MenuType::Category, MenuType::AllCategories]
        .into_iter()
        .map(|t| (t.as_str(), t.label()))
        .collect()
}

/// One picker option: a leaf name, or a titled group of nested options.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CategoryOption {
    Leaf(String),
    Group {
        title: String,
        items: CategoryOptions,
    },
}

/// Ordered id → option map. Serialized as a JSON object in tree order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryOptions(pub Vec<(CategoryId, CategoryOption)>);

impl CategoryOptions {
    /// Build the option list for a category forest, depth-first.
    pub fn from_nodes(nodes: &[CategoryNode]) -> Self {
        Self(
            nodes
                .iter()
                .map(|node| {
                    let option = if node.is_leaf() {
                        CategoryOption::Leaf(node.name.clone())
                    } else {
                        CategoryOption::Group {
                            title: node.name.clone(),
                            items: Self::from_nodes(&node.children),
                        }
                    };
                    (node.id, option)
                })
                .collect(),
        )
    }

    pub fn get(&self, id: CategoryId) -> Option<&CategoryOption> {
        self.0.iter().find(|(i, _)| *i == id).map(|(_, o)| o)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for CategoryOptions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (id, option) in &self.0 {
            map.serialize_entry(id, option)?;
        }
        map.end()
    }
}

/// Metadata for one menu type. Empty for unknown kinds.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuTypeInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub references: Option<CategoryOptions>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dynamic_items: Option<bool>,
}

impl MenuTypeInfo {
    /// Picker metadata listing every category.
    pub fn references(nodes: &[CategoryNode]) -> Self {
        Self {
            references: Some(CategoryOptions::from_nodes(nodes)),
            dynamic_items: None,
        }
    }

    /// Marker for a dynamically sized set of entries.
    pub fn dynamic() -> Self {
        Self {
            references: None,
            dynamic_items: Some(true),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_none() && self.dynamic_items.is_none()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use chrono::Utc;
    use serde_json::json;

    use super::*;

    fn node(id: CategoryId, name: &str, children: Vec<CategoryNode>) -> CategoryNode {
        CategoryNode {
            id,
            parent_id: None,
            name: name.to_string(),
            code: name.to_lowercase(),
            slug: name.to_lowercase(),
            nested_slug: name.to_lowercase(),
            updated_at: Utc::now(),
            children,
        }
    }

    #[test]
    fn menu_type_round_trip() {
        for t in [MenuType::Category, MenuType::AllCategories] {
            assert_eq!(MenuType::parse(t.as_str()), Some(t));
        }
        assert_eq!(MenuType::parse("cms-page"), None);
        assert_eq!(
            registered_menu_types(),
            vec![("category", "Category"), ("all-categories", "All categories")]
        );
    }

    #[test]
    fn options_nest_groups_and_keep_order() {
        let forest = vec![
            node(9, "Shoes", vec![]),
            node(
                2,
                "Clothing",
                vec![node(5, "Shirts", vec![]), node(3, "Pants", vec![])],
            ),
        ];

        let info = MenuTypeInfo::references(&forest);
        let json = serde_json::to_string(&info).unwrap();

        assert_eq!(
            json,
            r#"{"references":{"9":"Shoes","2":{"title":"Clothing","items":{"5":"Shirts","3":"Pants"}}}}"#
        );
    }

    #[test]
    fn dynamic_and_empty_shapes() {
        assert_eq!(
            serde_json::to_value(MenuTypeInfo::dynamic()).unwrap(),
            json!({"dynamicItems": true})
        );
        assert_eq!(
            serde_json::to_value(MenuTypeInfo::default()).unwrap(),
            json!({})
        );
        assert!(MenuTypeInfo::default().is_empty());
    }

    #[test]
    fn options_lookup() {
        let options = CategoryOptions::from_nodes(&[node(1, "A", vec![node(2, "B", vec![])])]);
        assert_eq!(options.len(), 1);
        match options.get(1).unwrap() {
            CategoryOption::Group { title, items } => {
                assert_eq!(title, "A");
                assert_eq!(items.get(2), Some(&CategoryOption::Leaf("B".to_string())));
            }
            CategoryOption::Leaf(_) => panic!("expected a group"),
        }
    }
}
