//! Category navigation menus.
//!
//! Menus are resolved from the category taxonomy and provide:
//! - Single category entries for a picked category
//! - The full, nested category tree, cached per locale
//! - Menu type metadata for the host's menu editor

mod category_cache;
mod item;
mod menu_type;
mod service;
mod tree;

pub use category_cache::CategoryCache;
pub use item::MenuItemBuilder;
pub use menu_type::{
    CategoryOption, CategoryOptions, MenuType, MenuTypeInfo, registered_menu_types,
};
pub use service::CategoryMenu;
pub use tree::materialize;
