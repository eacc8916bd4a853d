//! Nested menu tree construction.

use crate::error::MenuResult;
use crate::models::{CategoryNode, MenuItemRecord};

use super::item::MenuItemBuilder;

/// Build menu items for a category forest, depth-first.
///
/// Sibling order is kept as given. `items` is attached only to nodes with
/// children. Nodes are locale snapshots, so no translation state is touched
/// here. The input must be acyclic.
pub fn materialize(
    builder: &MenuItemBuilder<'_>,
    nodes: &[CategoryNode],
    current_url: &str,
) -> MenuResult<Vec<MenuItemRecord>> {
    nodes
        .iter()
        .map(|node| {
            let mut item = builder.build(node, current_url)?;
            if !node.is_leaf() {
                item.items = Some(materialize(builder, &node.children, current_url)?);
            }
            Ok(item)
        })
        .collect()
}
