use super::*;
use cart::CartPersistence;
use shared::domain::{CatalogId, LineItem, Price};

fn item(id: &str, cents: i64, quantity: u32) -> LineItem {
    LineItem {
        id: CatalogId::from(id),
        title: format!("title-{id}"),
        author: format!("author-{id}"),
        unit_price: Price::from_cents(cents),
        quantity,
    }
}

#[tokio::test]
async fn health_check_succeeds_for_live_pool() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage.health_check().await.expect("health check");
}

#[tokio::test]
async fn creates_database_file_when_missing() {
    let suffix = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let temp_root = std::env::temp_dir().join(format!("bookstore_storage_test_{suffix}"));
    let db_path = temp_root.join("nested").join("storage.db");
    let database_url = format!("sqlite://{}", db_path.to_string_lossy().replace('\\', "/"));

    let storage = Storage::new(&database_url).await.expect("db");
    drop(storage);

    assert!(
        db_path.exists(),
        "database file should exist: {}",
        db_path.display()
    );

    std::fs::remove_dir_all(temp_root).expect("cleanup");
}

#[tokio::test]
async fn put_slot_overwrites_previous_value() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage.put_slot("bookCart", "first").await.expect("put");
    storage.put_slot("bookCart", "second").await.expect("put again");

    let slot = storage
        .get_slot("bookCart")
        .await
        .expect("get")
        .expect("slot exists");
    assert_eq!(slot.key, "bookCart");
    assert_eq!(slot.value, "second");
    assert!(slot.updated_at.is_some());
    assert_eq!(storage.list_slot_keys().await.expect("keys"), vec!["bookCart"]);
}

#[tokio::test]
async fn delete_slot_reports_whether_anything_was_removed() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage.put_slot("bookCart", "[]").await.expect("put");

    assert!(storage.delete_slot("bookCart").await.expect("delete"));
    assert!(!storage.delete_slot("bookCart").await.expect("delete again"));
    assert!(storage.get_slot("bookCart").await.expect("get").is_none());
}

#[tokio::test]
async fn cart_slot_round_trips_items_in_order() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let slot = SqliteCartSlot::new(storage, "bookCart");
    let items = vec![item("sapiens", 1699, 2), item("1984", 999, 1), item("educated", 1599, 4)];

    slot.save(&items).await.expect("save");
    let loaded = slot.load().await.expect("load").expect("cart stored");

    assert_eq!(loaded, items);
}

#[tokio::test]
async fn empty_slot_loads_as_none() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let slot = SqliteCartSlot::new(storage, "bookCart");
    assert!(slot.load().await.expect("load").is_none());
}

#[tokio::test]
async fn saved_blob_carries_schema_version() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let slot = SqliteCartSlot::new(storage.clone(), "bookCart");
    slot.save(&[item("1984", 999, 2)]).await.expect("save");

    let raw = storage
        .get_slot("bookCart")
        .await
        .expect("get")
        .expect("slot")
        .value;
    let json: serde_json::Value = serde_json::from_str(&raw).expect("json");
    assert_eq!(json["version"], 1);
    assert_eq!(json["items"][0]["id"], "1984");
    assert_eq!(json["items"][0]["unit_price"], 9.99);
    assert_eq!(json["items"][0]["quantity"], 2);

    let decoded = slot.load_decoded().await.expect("load").expect("cart");
    assert_eq!(decoded.version, CART_SCHEMA_VERSION);
    assert!(decoded.saved_at.is_some());
}

#[tokio::test]
async fn legacy_array_is_read_and_upgraded_on_save() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage
        .put_slot(
            "bookCart",
            r#"[{"id":"1984","title":"1984","author":"George Orwell","price":9.99,"image":"cover.jpg","quantity":2}]"#,
        )
        .await
        .expect("seed legacy");
    let slot = SqliteCartSlot::new(storage, "bookCart");

    let decoded = slot.load_decoded().await.expect("load").expect("cart");
    assert_eq!(decoded.version, 0);
    assert_eq!(decoded.items[0].unit_price, Price::from_cents(999));
    assert_eq!(decoded.items[0].quantity, 2);

    slot.save(&decoded.items).await.expect("save");
    let upgraded = slot.load_decoded().await.expect("load").expect("cart");
    assert_eq!(upgraded.version, CART_SCHEMA_VERSION);
    assert_eq!(upgraded.items, decoded.items);
}

#[tokio::test]
async fn unreadable_cart_is_copied_aside_before_it_can_be_overwritten() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let future = r#"{"version":7,"saved_at":"2030-01-01T00:00:00Z","items":[]}"#;
    storage.put_slot("bookCart", future).await.expect("seed");
    let slot = SqliteCartSlot::new(storage.clone(), "bookCart");

    let err = slot.load().await.expect_err("unsupported version");
    assert!(format!("{err:#}").contains("bookCart.unreadable"));

    slot.save(&[item("1984", 999, 1)]).await.expect("save");
    let backup = storage
        .get_slot(&slot.backup_key())
        .await
        .expect("get")
        .expect("backup kept");
    assert_eq!(backup.value, future);
    assert_eq!(
        storage.list_slot_keys().await.expect("keys"),
        vec!["bookCart", "bookCart.unreadable"]
    );
}

#[test]
fn rejects_unknown_schema_version() {
    let err = decode_cart(r#"{"version":7,"saved_at":"2024-01-01T00:00:00Z","items":[]}"#)
        .expect_err("future version");
    assert!(err.to_string().contains("unsupported cart schema version 7"));
}

#[test]
fn rejects_non_cart_json() {
    assert!(decode_cart("42").is_err());
    assert!(decode_cart("not json").is_err());
    assert!(decode_cart(r#"{"items":[]}"#).is_err());
}

#[test]
fn resolves_sqlite_paths() {
    assert_eq!(sqlite_path("sqlite::memory:"), None);
    assert_eq!(
        sqlite_path("sqlite://./data/bookstore.db?mode=rwc"),
        Some(PathBuf::from("./data/bookstore.db"))
    );
    assert_eq!(sqlite_path("postgres://localhost/db"), None);
}
