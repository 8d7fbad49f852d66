use std::sync::Arc;

use cart::{CartStore, CheckoutFlow, StaticCatalog};
use shared::domain::CatalogId;
use storage::{SqliteCartSlot, Storage};

#[tokio::test]
async fn cart_survives_restart_and_checkout_clears_it() {
    let suffix = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let temp_root = std::env::temp_dir().join(format!("bookstore_cart_acceptance_{suffix}"));
    let database_url = format!(
        "sqlite://{}",
        temp_root
            .join("bookstore.db")
            .to_string_lossy()
            .replace('\\', "/")
    );
    let catalog = Arc::new(StaticCatalog::bookstore_default());

    {
        let storage = Storage::new(&database_url).await.expect("db");
        let slot = Arc::new(SqliteCartSlot::new(storage, "bookCart"));
        let mut store = CartStore::open(catalog.clone(), slot).await;
        store.add_item(&CatalogId::from("1984"), 1).await.expect("add");
        store
            .add_item(&CatalogId::from("harry-potter"), 1)
            .await
            .expect("add");
        store.add_item(&CatalogId::from("1984"), 1).await.expect("add");
        store
            .add_item(&CatalogId::from("no-such-book"), 1)
            .await
            .expect_err("unknown id");
    }

    let storage = Storage::new(&database_url).await.expect("reopen db");
    let slot = Arc::new(SqliteCartSlot::new(storage, "bookCart"));
    let mut store = CartStore::open(catalog, slot.clone()).await;

    let ids: Vec<&str> = store.items().iter().map(|item| item.id.as_str()).collect();
    assert_eq!(ids, vec!["1984", "harry-potter"]);
    assert_eq!(store.item_count(), 3);
    assert_eq!(store.view().total, "32.97");

    let mut flow = CheckoutFlow::new();
    flow.open_cart().expect("open");
    flow.begin_checkout(store.cart()).expect("begin");
    flow.confirm(&mut store).await.expect("confirm");

    let decoded = slot.load_decoded().await.expect("load").expect("cart slot");
    assert!(decoded.items.is_empty());

    std::fs::remove_dir_all(temp_root).expect("cleanup");
}
