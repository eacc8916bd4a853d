//! Data models for categories and the menu items built from them.

mod category;
mod menu_item;

pub use category::{CategoryId, CategoryNode, CategoryRecord, CategoryTranslation};
pub use menu_item::{CategoryMap, CategoryMapEntry, MenuItemRecord, MenuTreeResult};
