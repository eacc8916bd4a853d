//! Settings store access.

use anyhow::Result;
use async_trait::async_trait;
use dashmap::DashMap;

/// Setting holding the page reference category links point to.
pub const CATEGORY_PAGE_SETTING: &str = "category_page";

/// Key/value settings lookup.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
}

/// In-memory settings.
#[derive(Debug, Default)]
pub struct StaticSettings {
    values: DashMap<String, String>,
}

impl StaticSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Settings with the category page configured.
    pub fn with_category_page(page: impl Into<String>) -> Self {
        let settings = Self::new();
        settings.set(CATEGORY_PAGE_SETTING, page);
        settings
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn remove(&self, key: &str) {
        self.values.remove(key);
    }
}

#[async_trait]
impl SettingsStore for StaticSettings {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).map(|v| v.value().clone()))
    }
}
