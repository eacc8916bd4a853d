#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Full category tree resolution tests.

use category_menu::{CacheKind, CategoryCache, MenuError, MenuItemRecord};
use category_menu_test_utils::{
    TestMenu, assert, sample_records, shop_records, test_category, timestamp,
};
use serde_json::json;

fn codes(items: &[MenuItemRecord]) -> Vec<&str> {
    items.iter().map(|i| i.code.as_str()).collect()
}

#[tokio::test]
async fn resolves_parent_and_child_example() {
    let t = TestMenu::new(sample_records());

    let tree = t.menu.resolve_categories_item("/cat/a/b").await.unwrap();

    assert::json_eq(
        &serde_json::to_value(&tree).unwrap(),
        &json!({
            "items": [{
                "url": "/cat/a",
                "isActive": false,
                "mtime": timestamp(1),
                "title": "Alpha",
                "code": "A",
                "items": [{
                    "url": "/cat/a/b",
                    "isActive": true,
                    "mtime": timestamp(2),
                    "title": "Beta",
                    "code": "B"
                }]
            }]
        }),
    );
}

#[tokio::test]
async fn tree_mirrors_category_structure() {
    let t = TestMenu::new(shop_records());

    let tree = t.menu.resolve_categories_item("/").await.unwrap();

    assert_eq!(codes(&tree.items), vec!["CLOTHING", "SHOES"]);
    assert!(tree.items[1].items.is_none());

    let clothing = tree.items[0].items.as_ref().unwrap();
    assert_eq!(codes(clothing), vec!["SHIRTS", "PANTS"]);
    assert!(clothing[1].items.is_none());

    let shirts = clothing[0].items.as_ref().unwrap();
    assert_eq!(codes(shirts), vec!["T-SHIRTS"]);
    assert_eq!(shirts[0].url, "/cat/clothing/shirts/t-shirts");
    assert!(shirts[0].items.is_none());
    assert_eq!(tree.len(), 5);
}

#[tokio::test]
async fn second_resolution_is_a_cache_hit() {
    let t = TestMenu::new(shop_records());

    let first = t.menu.resolve_categories_item("/cat/shoes").await.unwrap();
    let second = t.menu.resolve_categories_item("/cat/shoes").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
    assert_eq!(t.repository.eager_root_calls(), 1);
    assert_eq!(t.store.writes(), vec![CategoryCache::key_for(CacheKind::Tree, "en")]);
}

#[tokio::test]
async fn cached_tree_keeps_active_flags_of_first_request() {
    let t = TestMenu::new(sample_records());

    t.menu.resolve_categories_item("/cat/a").await.unwrap();
    let mut cached = t.menu.resolve_categories_item("/cat/a/b").await.unwrap();

    assert!(cached.items[0].is_active);

    cached.mark_active("/cat/a/b");
    assert!(!cached.items[0].is_active);
    assert!(cached.items[0].items.as_ref().unwrap()[0].is_active);
}

#[tokio::test]
async fn purge_forces_a_fresh_walk() {
    let t = TestMenu::new(sample_records());

    let before = t.menu.resolve_categories_item("/").await.unwrap();
    t.cache().purge(&["en"]).await.unwrap();
    let after = t.menu.resolve_categories_item("/").await.unwrap();

    assert_eq!(t.repository.eager_root_calls(), 2);
    assert_eq!(before, after);
}

#[tokio::test]
async fn changes_are_invisible_until_purged() {
    let t = TestMenu::new(sample_records());
    t.menu.resolve_categories_item("/").await.unwrap();

    let mut records = sample_records();
    records.push(test_category(3, "C").build());
    t.replace_records(records);

    let stale = t.menu.resolve_categories_item("/").await.unwrap();
    assert_eq!(codes(&stale.items), vec!["A"]);

    t.menu.categories_changed().await.unwrap();

    let fresh = t.menu.resolve_categories_item("/").await.unwrap();
    assert_eq!(codes(&fresh.items), vec!["A", "C"]);
}

#[tokio::test]
async fn locales_use_separate_slots() {
    let en = TestMenu::new(shop_records());
    let tree_en = en.menu.resolve_categories_item("/").await.unwrap();

    let de = TestMenu::with_locale(shop_records(), "de");
    let tree_de = de.menu.resolve_categories_item("/").await.unwrap();

    assert_eq!(tree_en.items[0].title, "Clothing");
    assert_eq!(tree_de.items[0].title, "Bekleidung");
    assert_eq!(tree_de.items[0].url, "/cat/bekleidung");

    // Shirts has no translated slug, so it keeps its default one
    let shirts = &tree_de.items[0].items.as_ref().unwrap()[0];
    assert_eq!(shirts.title, "Hemden");
    assert_eq!(shirts.url, "/cat/bekleidung/shirts");

    assert_eq!(de.store.writes(), vec!["menu.categories.tree.de"]);
}

#[tokio::test]
async fn locales_do_not_interfere_on_a_shared_cache() {
    let t = TestMenu::new(shop_records());

    let de = t.cache().resolve_tree("de", "/").await.unwrap();
    let en = t.cache().resolve_tree("en", "/").await.unwrap();

    assert_eq!(de.items[0].title, "Bekleidung");
    assert_eq!(en.items[0].title, "Clothing");
    assert!(t.cache().is_cached(CacheKind::Tree, "de").await.unwrap());
    assert!(t.cache().is_cached(CacheKind::Tree, "en").await.unwrap());
}

#[tokio::test]
async fn missing_category_page_fails_without_caching() {
    let t = TestMenu::new(sample_records());
    t.settings.remove(category_menu::services::CATEGORY_PAGE_SETTING);

    let err = t.menu.resolve_categories_item("/").await.unwrap_err();

    assert!(matches!(err, MenuError::Configuration));
    assert!(!t.cache().is_cached(CacheKind::Tree, "en").await.unwrap());
    assert!(t.store.writes().is_empty());
}

#[tokio::test]
async fn concurrent_cold_misses_agree() {
    let t = TestMenu::new(shop_records());

    let (a, b) = tokio::join!(
        t.menu.resolve_categories_item("/"),
        t.menu.resolve_categories_item("/")
    );

    assert_eq!(a.unwrap(), b.unwrap());
    assert!(t.cache().is_cached(CacheKind::Tree, "en").await.unwrap());
}

#[tokio::test]
async fn empty_taxonomy_yields_empty_tree() {
    let t = TestMenu::new(Vec::new());
    let tree = t.menu.resolve_categories_item("/").await.unwrap();
    assert!(tree.is_empty());
    assert::json_eq(&serde_json::to_value(&tree).unwrap(), &json!({"items": []}));
}
