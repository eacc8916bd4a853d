//! Category menu library.
//!
//! Turns a category taxonomy into navigation menu items and keeps a
//! per-locale cache of the full menu tree. The `category-menu` binary wraps
//! this library for operators.

pub mod cache;
pub mod config;
pub mod error;
pub mod menu;
pub mod models;
pub mod services;

pub use cache::{CacheError, CacheKind, CacheLayer, CacheStore};
pub use config::Config;
pub use error::{MenuError, MenuResult};
pub use menu::{CategoryCache, CategoryMenu, MenuItemBuilder, MenuType, MenuTypeInfo};
pub use models::{CategoryId, CategoryMap, CategoryNode, MenuItemRecord, MenuTreeResult};
