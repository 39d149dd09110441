//! Persistence across store restarts with the file-backed cache.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::Arc;

use rust_decimal_macros::dec;
use uhsin_core::{LogSeverity, Price, Product, ProductDraft, ProductId};
use uhsin_integration_tests::{address, admin, shopper};
use uhsin_store::{CacheKey, FileCache, OrderFilter, StateCache, StateCacheExt, Store};

fn open(dir: &std::path::Path) -> (Store, Arc<FileCache>) {
    let cache = Arc::new(FileCache::open(dir).unwrap());
    let store = Store::open(cache.clone(), None).unwrap();
    (store, cache)
}

#[tokio::test]
async fn test_session_survives_restart() {
    let dir = tempfile::tempdir().unwrap();

    let (mut store, _cache) = open(dir.path());
    let customer = shopper();
    store.sign_in(customer.clone());
    store.toggle_wishlist(&ProductId::new("2")).unwrap();
    store.add_to_cart(&ProductId::new("2")).unwrap();
    let order = store.checkout("Paytm", address()).await.unwrap().order;
    store.close().unwrap();

    let (store, _cache) = open(dir.path());
    assert_eq!(store.user().unwrap().id, customer.id);
    assert!(store.user().unwrap().wishlist.contains(&ProductId::new("2")));
    let orders = store.my_orders(&OrderFilter::default()).unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].id, order.id);
    // The cart is not persisted
    assert!(store.cart().is_empty());
}

#[test]
fn test_catalog_edits_and_logs_persist() {
    let dir = tempfile::tempdir().unwrap();

    let (mut store, _cache) = open(dir.path());
    store.sign_in(admin());
    let draft = ProductDraft::edit(store.product(&ProductId::new("1")).unwrap())
        .price(Price::new(dec!(44.99)));
    let product = store.save_product(draft).unwrap();
    drop(store);

    let (store, cache) = open(dir.path());
    assert_eq!(
        store.product(&product.id).unwrap().price,
        Price::new(dec!(44.99))
    );
    let logs = store.admin_logs().unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].severity, LogSeverity::Success);

    // One JSON file per entry
    for key in [CacheKey::Products, CacheKey::User, CacheKey::Users, CacheKey::AdminLogs] {
        assert!(cache.dir().join(format!("{}.json", key.name())).exists());
    }
}

#[test]
fn test_sign_out_removes_user_entry() {
    let dir = tempfile::tempdir().unwrap();
    let (mut store, cache) = open(dir.path());
    store.sign_in(shopper());
    assert!(cache.get(CacheKey::User).unwrap().is_some());

    store.sign_out();
    assert!(cache.get(CacheKey::User).unwrap().is_none());
    // The roster keeps the account
    assert!(cache.get(CacheKey::Users).unwrap().is_some());
}

#[test]
fn test_corrupt_catalog_is_reseeded() {
    let dir = tempfile::tempdir().unwrap();
    let cache = FileCache::open(dir.path()).unwrap();
    cache.set(CacheKey::Products, "{ not json").unwrap();

    let (store, cache) = open(dir.path());
    assert_eq!(store.products().len(), 5);
    let stored: Vec<Product> = cache.load(CacheKey::Products).unwrap();
    assert_eq!(stored.len(), 5);
}

#[test]
fn test_emptied_catalog_is_not_reseeded() {
    let dir = tempfile::tempdir().unwrap();

    let (mut store, _cache) = open(dir.path());
    store.sign_in(admin());
    let ids: Vec<ProductId> = store.products().iter().map(|p| p.id.clone()).collect();
    for id in &ids {
        store.delete_product(id).unwrap();
    }
    store.close().unwrap();

    let (store, cache) = open(dir.path());
    assert!(store.products().is_empty());
    let stored: Vec<Product> = cache.load(CacheKey::Products).unwrap();
    assert!(stored.is_empty());
    // Five deletions, all logged
    assert_eq!(store.admin_logs().unwrap().len(), 5);
}
