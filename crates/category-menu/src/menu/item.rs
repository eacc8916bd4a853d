//! Single menu item construction.

use std::collections::HashMap;

use crate::error::{MenuError, MenuResult};
use crate::models::{CategoryNode, MenuItemRecord};
use crate::services::{CATEGORY_PAGE_SETTING, PageUrlResolver, SLUG_PARAM, SettingsStore};

/// Builds menu items for categories, linking to the configured category page.
///
/// A builder only exists once a category page is configured, so a missing
/// setting fails the whole resolution before any item is produced.
pub struct MenuItemBuilder<'a> {
    page: String,
    urls: &'a dyn PageUrlResolver,
}

impl<'a> MenuItemBuilder<'a> {
    pub fn new(page: impl Into<String>, urls: &'a dyn PageUrlResolver) -> Self {
        Self {
            page: page.into(),
            urls,
        }
    }

    /// Create a builder for the page stored in the `category_page` setting.
    pub async fn from_settings(
        settings: &dyn SettingsStore,
        urls: &'a dyn PageUrlResolver,
    ) -> MenuResult<Self> {
        let page = settings
            .get(CATEGORY_PAGE_SETTING)
            .await
            .map_err(MenuError::Settings)?
            .filter(|p| !p.trim().is_empty())
            .ok_or(MenuError::Configuration)?;

        Ok(Self::new(page, urls))
    }

    /// Page reference the items link to.
    pub fn page(&self) -> &str {
        &self.page
    }

    /// Build the item for one category. Children are not visited.
    pub fn build(&self, node: &CategoryNode, current_url: &str) -> MenuResult<MenuItemRecord> {
        let params = HashMap::from([(SLUG_PARAM, node.nested_slug.as_str())]);
        let url = self
            .urls
            .page_url(&self.page, &params)
            .map_err(|source| MenuError::PageUrl {
                page: self.page.clone(),
                source,
            })?;

        Ok(MenuItemRecord {
            is_active: url == current_url,
            url,
            mtime: node.updated_at,
            title: node.name.clone(),
            code: node.code.clone(),
            items: None,
        })
    }
}
