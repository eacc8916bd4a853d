//! Per-locale cache of category menu data.
//!
//! Every (kind, locale) slot is either absent or populated. Slots are filled
//! on first resolution or by `warm`, and cleared by `purge`. Entries never
//! expire and are never versioned.
//!
//! No lock is taken: concurrent cold misses for the same slot may both build
//! the value and both store it. The output is deterministic and the store
//! overwrites, so the race only costs a redundant build.

use std::sync::Arc;

use tracing::{debug, info};

use crate::cache::{CacheKind, CacheStore};
use crate::error::{MenuError, MenuResult};
use crate::models::{CategoryMap, MenuTreeResult};
use crate::services::{CategoryRepository, PageUrlResolver, SettingsStore};

use super::item::MenuItemBuilder;
use super::tree::materialize;

/// Read-through cache for category trees and id maps.
#[derive(Clone)]
pub struct CategoryCache {
    store: Arc<dyn CacheStore>,
    repository: Arc<dyn CategoryRepository>,
    settings: Arc<dyn SettingsStore>,
    urls: Arc<dyn PageUrlResolver>,
}

impl CategoryCache {
    pub fn new(
        store: Arc<dyn CacheStore>,
        repository: Arc<dyn CategoryRepository>,
        settings: Arc<dyn SettingsStore>,
        urls: Arc<dyn PageUrlResolver>,
    ) -> Self {
        Self {
            store,
            repository,
            settings,
            urls,
        }
    }

    /// Cache key of a slot: `<namespace>.<locale>`.
    pub fn key_for(kind: CacheKind, locale: &str) -> String {
        kind.key(locale)
    }

    pub fn repository(&self) -> &dyn CategoryRepository {
        self.repository.as_ref()
    }

    /// Item builder for the configured category page.
    pub async fn item_builder(&self) -> MenuResult<MenuItemBuilder<'_>> {
        MenuItemBuilder::from_settings(self.settings.as_ref(), self.urls.as_ref()).await
    }

    /// Full menu tree for a locale.
    ///
    /// A cached tree is returned as stored, including the `is_active` flags
    /// computed for the request that built it.
    pub async fn resolve_tree(
        &self,
        locale: &str,
        current_url: &str,
    ) -> MenuResult<MenuTreeResult> {
        let key = Self::key_for(CacheKind::Tree, locale);

        if let Some(cached) = self.store.get(&key).await? {
            debug!(key = %key, "category tree cache hit");
            return Ok(serde_json::from_str(&cached)?);
        }

        debug!(key = %key, "category tree cache miss, building");
        let builder = self.item_builder().await?;
        let roots = self
            .repository
            .eager_root(locale)
            .await
            .map_err(MenuError::Repository)?;

        let tree = MenuTreeResult {
            items: materialize(&builder, &roots, current_url)?,
        };

        self.store
            .set_forever(&key, &serde_json::to_string(&tree)?)
            .await?;
        debug!(key = %key, items = tree.len(), "category tree cached");

        Ok(tree)
    }

    /// Id → name map for a locale.
    pub async fn resolve_map(&self, locale: &str) -> MenuResult<CategoryMap> {
        let key = Self::key_for(CacheKind::Map, locale);

        if let Some(cached) = self.store.get(&key).await? {
            debug!(key = %key, "category map cache hit");
            return Ok(serde_json::from_str(&cached)?);
        }

        let roots = self
            .repository
            .nested(locale)
            .await
            .map_err(MenuError::Repository)?;
        let map = CategoryMap::from_nodes(&roots);

        self.store
            .set_forever(&key, &serde_json::to_string(&map)?)
            .await?;
        debug!(key = %key, entries = map.len(), "category map cached");

        Ok(map)
    }

    /// Whether a slot is populated.
    pub async fn is_cached(&self, kind: CacheKind, locale: &str) -> MenuResult<bool> {
        Ok(self.store.has(&Self::key_for(kind, locale)).await?)
    }

    /// Clear the tree and map slots of every given locale.
    pub async fn purge<S: AsRef<str>>(&self, locales: &[S]) -> MenuResult<()> {
        for locale in locales {
            for kind in CacheKind::ALL {
                self.store
                    .delete(&Self::key_for(kind, locale.as_ref()))
                    .await?;
            }
        }

        info!(locales = locales.len(), "category menu cache purged");
        Ok(())
    }

    /// Populate the map slot of every given locale.
    ///
    /// Trees depend on the request URL and are built on first request.
    pub async fn warm<S: AsRef<str>>(&self, locales: &[S]) -> MenuResult<()> {
        for locale in locales {
            self.resolve_map(locale.as_ref()).await?;
        }

        info!(locales = locales.len(), "category menu cache warmed");
        Ok(())
    }
}

impl std::fmt::Debug for CategoryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CategoryCache").finish()
    }
}
