//! Entry points used by the host CMS.

use std::sync::Arc;

use tracing::debug;

use crate::error::{MenuError, MenuResult};
use crate::models::{CategoryId, MenuItemRecord, MenuTreeResult};
use crate::services::LocaleResolver;

use super::category_cache::CategoryCache;
use super::menu_type::{MenuType, MenuTypeInfo};

/// Category menu resolution for the active locale.
#[derive(Clone)]
pub struct CategoryMenu {
    cache: CategoryCache,
    locales: Arc<dyn LocaleResolver>,
}

impl CategoryMenu {
    pub fn new(cache: CategoryCache, locales: Arc<dyn LocaleResolver>) -> Self {
        Self { cache, locales }
    }

    pub fn cache(&self) -> &CategoryCache {
        &self.cache
    }

    /// Resolve a "category" menu entry.
    ///
    /// Returns `Ok(None)` when the referenced category no longer exists.
    pub async fn resolve_category_item(
        &self,
        reference: CategoryId,
        current_url: &str,
    ) -> MenuResult<Option<MenuItemRecord>> {
        let locale = self.locales.active_locale();
        let node = self
            .cache
            .repository()
            .find(reference, &locale)
            .await
            .map_err(MenuError::Repository)?;

        let Some(node) = node else {
            debug!(reference = reference, "menu references a missing category");
            return Ok(None);
        };

        let builder = self.cache.item_builder().await?;
        builder.build(&node, current_url).map(Some)
    }

    /// Resolve an "all-categories" menu entry.
    pub async fn resolve_categories_item(&self, current_url: &str) -> MenuResult<MenuTreeResult> {
        let locale = self.locales.active_locale();
        self.cache.resolve_tree(&locale, current_url).await
    }

    /// Editor metadata for a menu type. Unknown kinds yield empty metadata.
    pub async fn menu_type_info(&self, kind: &str) -> MenuResult<MenuTypeInfo> {
        match MenuType::parse(kind) {
            Some(MenuType::Category) => {
                let locale = self.locales.active_locale();
                let roots = self
                    .cache
                    .repository()
                    .nested(&locale)
                    .await
                    .map_err(MenuError::Repository)?;
                Ok(MenuTypeInfo::references(&roots))
            }
            Some(MenuType::AllCategories) => Ok(MenuTypeInfo::dynamic()),
            None => Ok(MenuTypeInfo::default()),
        }
    }

    /// Purge cached data for every available locale.
    pub async fn purge_all(&self) -> MenuResult<()> {
        self.cache.purge(&self.locales.available_locales()).await
    }

    /// Warm cached data for every available locale.
    pub async fn warm_all(&self) -> MenuResult<()> {
        self.cache.warm(&self.locales.available_locales()).await
    }

    /// Call after categories are saved or deleted.
    pub async fn categories_changed(&self) -> MenuResult<()> {
        self.purge_all().await?;
        self.warm_all().await
    }
}

impl std::fmt::Debug for CategoryMenu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CategoryMenu")
            .field("active_locale", &self.locales.active_locale())
            .finish()
    }
}
