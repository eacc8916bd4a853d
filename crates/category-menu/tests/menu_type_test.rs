#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Menu type metadata tests.

use category_menu::MenuType;
use category_menu_test_utils::{TestMenu, assert, shop_records};
use serde_json::json;

#[tokio::test]
async fn category_type_lists_nested_references() {
    let t = TestMenu::new(shop_records());

    let info = t
        .menu
        .menu_type_info(MenuType::Category.as_str())
        .await
        .unwrap();
    let value = serde_json::to_value(&info).unwrap();

    assert::lacks_key(&value, "dynamicItems");
    assert::json_eq(
        &value,
        &json!({
            "references": {
                "1": {
                    "title": "Clothing",
                    "items": {
                        "2": {"title": "Shirts", "items": {"4": "T-Shirts"}},
                        "3": "Pants"
                    }
                },
                "5": "Shoes"
            }
        }),
    );
}

#[tokio::test]
async fn references_keep_tree_order() {
    let t = TestMenu::new(shop_records());

    let info = t.menu.menu_type_info("category").await.unwrap();
    let json = serde_json::to_string(&info).unwrap();

    let clothing = json.find("\"1\":").unwrap();
    let shoes = json.find("\"5\":").unwrap();
    let shirts = json.find("\"2\":").unwrap();
    let pants = json.find("\"3\":").unwrap();
    assert!(clothing < shirts && shirts < pants && pants < shoes);
}

#[tokio::test]
async fn references_use_active_locale() {
    let t = TestMenu::with_locale(shop_records(), "de");

    let info = t.menu.menu_type_info("category").await.unwrap();
    let value = serde_json::to_value(&info).unwrap();

    assert_eq!(value["references"]["5"], "Schuhe");
    assert_eq!(value["references"]["1"]["title"], "Bekleidung");
}

#[tokio::test]
async fn all_categories_type_is_dynamic() {
    let t = TestMenu::new(shop_records());

    let info = t.menu.menu_type_info("all-categories").await.unwrap();

    assert::json_eq(
        &serde_json::to_value(&info).unwrap(),
        &json!({"dynamicItems": true}),
    );
    assert_eq!(t.repository.nested_calls(), 0);
}

#[tokio::test]
async fn unknown_type_is_empty() {
    let t = TestMenu::new(shop_records());

    let info = t.menu.menu_type_info("cms-page").await.unwrap();

    assert!(info.is_empty());
    assert::json_eq(&serde_json::to_value(&info).unwrap(), &json!({}));
}

#[tokio::test]
async fn references_are_not_cached() {
    let t = TestMenu::new(shop_records());

    t.menu.menu_type_info("category").await.unwrap();
    t.menu.menu_type_info("category").await.unwrap();

    assert_eq!(t.repository.nested_calls(), 2);
    assert!(t.store.writes().is_empty());
}
