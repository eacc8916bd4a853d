#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Category menu test utilities.
//!
//! Helpers for integration testing: category fixtures, instrumented
//! collaborators, and a fully wired menu over in-process stores.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;

use category_menu::cache::{CacheError, CacheLayer, CacheStore, L1_MAX_CAPACITY};
use category_menu::models::{CategoryId, CategoryNode, CategoryRecord, CategoryTranslation};
use category_menu::services::{
    CategoryRepository, InMemoryCategoryRepository, RoutePageUrlResolver, StaticLocaleResolver,
    StaticSettings,
};
use category_menu::{CategoryCache, CategoryMenu};

/// Page identifier the test menus link to.
pub const TEST_PAGE: &str = "category";

/// Route pattern of [`TEST_PAGE`].
pub const TEST_PAGE_PATTERN: &str = "/cat/:slug";

/// Fixed timestamp for fixtures (2024-01-01T00:00:00Z plus `offset` seconds).
pub fn timestamp(offset: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_704_067_200 + offset, 0).unwrap()
}

/// Create a test category with default values.
///
/// Slug and name are derived from the code.
pub fn test_category(id: CategoryId, code: &str) -> TestCategory {
    TestCategory {
        record: CategoryRecord {
            id,
            parent_id: None,
            code: code.to_string(),
            slug: code.to_lowercase(),
            name: format!("{code} name"),
            sort_order: 0,
            updated_at: timestamp(id),
            translations: HashMap::new(),
        },
    }
}

/// A category record builder for creating test fixtures.
#[derive(Debug, Clone)]
pub struct TestCategory {
    record: CategoryRecord,
}

impl TestCategory {
    /// Set the parent category.
    pub fn with_parent(mut self, parent_id: CategoryId) -> Self {
        self.record.parent_id = Some(parent_id);
        self
    }

    /// Set the default-locale slug.
    pub fn with_slug(mut self, slug: &str) -> Self {
        self.record.slug = slug.to_string();
        self
    }

    /// Set the default-locale name.
    pub fn with_name(mut self, name: &str) -> Self {
        self.record.name = name.to_string();
        self
    }

    /// Set the sibling sort order.
    pub fn with_sort_order(mut self, sort_order: i32) -> Self {
        self.record.sort_order = sort_order;
        self
    }

    /// Add a translation for a locale.
    pub fn with_translation(mut self, locale: &str, name: &str, slug: Option<&str>) -> Self {
        self.record.translations.insert(
            locale.to_string(),
            CategoryTranslation {
                name: Some(name.to_string()),
                slug: slug.map(str::to_string),
            },
        );
        self
    }

    /// Set the update timestamp.
    pub fn updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.record.updated_at = updated_at;
        self
    }

    pub fn build(self) -> CategoryRecord {
        self.record
    }
}

/// Root category A (id 1, slug "a") with a single child B (id 2, slug "b").
pub fn sample_records() -> Vec<CategoryRecord> {
    vec![
        test_category(1, "A").with_name("Alpha").build(),
        test_category(2, "B")
            .with_name("Beta")
            .with_parent(1)
            .build(),
    ]
}

/// A small shop taxonomy with German translations.
///
/// ```text
/// clothing (1)
/// ├── shirts (2)
/// │   └── t-shirts (4)
/// └── pants (3)
/// shoes (5)
/// ```
pub fn shop_records() -> Vec<CategoryRecord> {
    vec![
        test_category(5, "SHOES")
            .with_slug("shoes")
            .with_name("Shoes")
            .with_sort_order(1)
            .with_translation("de", "Schuhe", Some("schuhe"))
            .build(),
        test_category(1, "CLOTHING")
            .with_slug("clothing")
            .with_name("Clothing")
            .with_translation("de", "Bekleidung", Some("bekleidung"))
            .build(),
        test_category(3, "PANTS")
            .with_slug("pants")
            .with_name("Pants")
            .with_parent(1)
            .with_sort_order(1)
            .with_translation("de", "Hosen", Some("hosen"))
            .build(),
        test_category(2, "SHIRTS")
            .with_slug("shirts")
            .with_name("Shirts")
            .with_parent(1)
            .with_translation("de", "Hemden", None)
            .build(),
        test_category(4, "T-SHIRTS")
            .with_slug("t-shirts")
            .with_name("T-Shirts")
            .with_parent(2)
            .build(),
    ]
}

/// Repository wrapper counting calls per operation.
pub struct CountingRepository<R> {
    inner: R,
    finds: AtomicUsize,
    eager_roots: AtomicUsize,
    nested: AtomicUsize,
}

impl<R> CountingRepository<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            finds: AtomicUsize::new(0),
            eager_roots: AtomicUsize::new(0),
            nested: AtomicUsize::new(0),
        }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    pub fn find_calls(&self) -> usize {
        self.finds.load(Ordering::SeqCst)
    }

    /// Number of full tree walks requested.
    pub fn eager_root_calls(&self) -> usize {
        self.eager_roots.load(Ordering::SeqCst)
    }

    pub fn nested_calls(&self) -> usize {
        self.nested.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<R: CategoryRepository> CategoryRepository for CountingRepository<R> {
    async fn find(&self, id: CategoryId, locale: &str) -> Result<Option<CategoryNode>> {
        self.finds.fetch_add(1, Ordering::SeqCst);
        self.inner.find(id, locale).await
    }

    async fn eager_root(&self, locale: &str) -> Result<Vec<CategoryNode>> {
        self.eager_roots.fetch_add(1, Ordering::SeqCst);
        self.inner.eager_root(locale).await
    }

    async fn nested(&self, locale: &str) -> Result<Vec<CategoryNode>> {
        self.nested.fetch_add(1, Ordering::SeqCst);
        self.inner.nested(locale).await
    }
}

/// Repository whose every call fails.
#[derive(Debug, Default)]
pub struct FailingRepository;

#[async_trait]
impl CategoryRepository for FailingRepository {
    async fn find(&self, _id: CategoryId, _locale: &str) -> Result<Option<CategoryNode>> {
        Err(anyhow!("category storage offline"))
    }

    async fn eager_root(&self, _locale: &str) -> Result<Vec<CategoryNode>> {
        Err(anyhow!("category storage offline"))
    }

    async fn nested(&self, _locale: &str) -> Result<Vec<CategoryNode>> {
        Err(anyhow!("category storage offline"))
    }
}

/// Cache store wrapper recording every written and deleted key.
pub struct RecordingStore {
    inner: CacheLayer,
    writes: Mutex<Vec<String>>,
    deletes: Mutex<Vec<String>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self {
            inner: CacheLayer::new(L1_MAX_CAPACITY),
            writes: Mutex::new(Vec::new()),
            deletes: Mutex::new(Vec::new()),
        }
    }

    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().clone()
    }

    pub fn deletes(&self) -> Vec<String> {
        self.deletes.lock().clone()
    }
}

impl Default for RecordingStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheStore for RecordingStore {
    async fn has(&self, key: &str) -> Result<bool, CacheError> {
        self.inner.has(key).await
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        self.inner.get(key).await
    }

    async fn set_forever(&self, key: &str, value: &str) -> Result<(), CacheError> {
        self.writes.lock().push(key.to_string());
        self.inner.set_forever(key, value).await
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.deletes.lock().push(key.to_string());
        self.inner.delete(key).await
    }
}

/// Which [`FailingStore`] operations fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreFailure {
    /// Every operation fails.
    All,
    /// Reads succeed against an empty in-process store; writes and deletes fail.
    Writes,
}

/// Cache store standing in for an unreachable Redis.
pub struct FailingStore {
    failure: StoreFailure,
    inner: CacheLayer,
}

impl FailingStore {
    pub fn new(failure: StoreFailure) -> Self {
        Self {
            failure,
            inner: CacheLayer::new(L1_MAX_CAPACITY),
        }
    }

    fn offline() -> CacheError {
        CacheError::Redis(redis::RedisError::from((
            redis::ErrorKind::IoError,
            "cache offline",
        )))
    }

    fn check_read(&self) -> Result<(), CacheError> {
        match self.failure {
            StoreFailure::All => Err(Self::offline()),
            StoreFailure::Writes => Ok(()),
        }
    }
}

#[async_trait]
impl CacheStore for FailingStore {
    async fn has(&self, key: &str) -> Result<bool, CacheError> {
        self.check_read()?;
        self.inner.has(key).await
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        self.check_read()?;
        self.inner.get(key).await
    }

    async fn set_forever(&self, _key: &str, _value: &str) -> Result<(), CacheError> {
        Err(Self::offline())
    }

    async fn delete(&self, _key: &str) -> Result<(), CacheError> {
        Err(Self::offline())
    }
}

/// Wire a category menu over `store` with the test page configured.
pub fn menu_with_store(
    repository: Arc<dyn CategoryRepository>,
    store: Arc<dyn CacheStore>,
    active: &str,
) -> CategoryMenu {
    let mut urls = RoutePageUrlResolver::new("");
    urls.register(TEST_PAGE, TEST_PAGE_PATTERN);

    let cache = CategoryCache::new(
        store,
        repository,
        Arc::new(StaticSettings::with_category_page(TEST_PAGE)),
        Arc::new(urls),
    );
    let locales = StaticLocaleResolver::new(active, vec!["en".to_string(), "de".to_string()]);
    CategoryMenu::new(cache, Arc::new(locales))
}

/// A fully wired category menu over in-process collaborators.
pub struct TestMenu {
    pub menu: CategoryMenu,
    pub repository: Arc<CountingRepository<InMemoryCategoryRepository>>,
    pub settings: Arc<StaticSettings>,
    pub store: Arc<RecordingStore>,
}

impl TestMenu {
    /// Menu over `records`, active locale "en", locales ["en", "de"], with
    /// the category page configured.
    pub fn new(records: Vec<CategoryRecord>) -> Self {
        Self::with_locale(records, "en")
    }

    /// Same as [`TestMenu::new`] with another active locale.
    pub fn with_locale(records: Vec<CategoryRecord>, active: &str) -> Self {
        let repository = Arc::new(CountingRepository::new(InMemoryCategoryRepository::new(
            records,
        )));
        let settings = Arc::new(StaticSettings::with_category_page(TEST_PAGE));
        let store = Arc::new(RecordingStore::new());

        let mut urls = RoutePageUrlResolver::new("");
        urls.register(TEST_PAGE, TEST_PAGE_PATTERN);

        let cache = CategoryCache::new(
            store.clone(),
            repository.clone(),
            settings.clone(),
            Arc::new(urls),
        );
        let locales = StaticLocaleResolver::new(active, vec!["en".to_string(), "de".to_string()]);

        Self {
            menu: CategoryMenu::new(cache, Arc::new(locales)),
            repository,
            settings,
            store,
        }
    }

    pub fn cache(&self) -> &CategoryCache {
        self.menu.cache()
    }

    /// Replace the stored categories (no cache purge).
    pub fn replace_records(&self, records: Vec<CategoryRecord>) {
        self.repository.inner().replace(records);
    }
}

/// Assertion helpers for JSON output.
pub mod assert {
    use serde_json::Value;

    /// Assert that a JSON value has a specific key.
    pub fn has_key(value: &Value, key: &str) {
        assert!(
            value.get(key).is_some(),
            "Expected JSON to have key '{key}', got: {value}"
        );
    }

    /// Assert that a JSON value lacks a specific key.
    pub fn lacks_key(value: &Value, key: &str) {
        assert!(
            value.get(key).is_none(),
            "Expected JSON to NOT have key '{key}', got: {value}"
        );
    }

    /// Assert that a JSON value equals expected.
    pub fn json_eq(actual: &Value, expected: &Value) {
        assert_eq!(
            actual,
            expected,
            "JSON mismatch:\nactual: {}\nexpected: {}",
            serde_json::to_string_pretty(actual).unwrap(),
            serde_json::to_string_pretty(expected).unwrap()
        );
    }
}
