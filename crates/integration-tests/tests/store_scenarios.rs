//! End-to-end session flows against an offline store.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use rust_decimal_macros::dec;
use uhsin_core::{
    Category, LogBook, LogSeverity, OrderStatus, Price, ProductDraft, ProductId, ProfileUpdate,
    ReviewDraft, View,
};
use uhsin_integration_tests::{address, admin, offline_store, shopper};
use uhsin_store::{OrderFilter, ProductQuery, SortOrder, StoreError};

#[test]
fn test_cart_holds_one_line_per_product() {
    let (mut store, _cache) = offline_store();
    let ids: Vec<ProductId> = ["1", "2", "1", "3", "1", "2"]
        .into_iter()
        .map(ProductId::new)
        .collect();
    for id in &ids {
        store.add_to_cart(id).unwrap();
    }
    store.remove_from_cart(&ProductId::new("3"));

    let cart = store.cart();
    assert_eq!(cart.len(), 2);
    let quantity = |id: &str| {
        cart.iter()
            .find(|i| i.product_id.as_str() == id)
            .map(|i| i.quantity)
    };
    assert_eq!(quantity("1"), Some(3));
    assert_eq!(quantity("2"), Some(2));
    assert_eq!(quantity("3"), None);

    // Re-adding after removal starts over at one
    store.remove_from_cart(&ProductId::new("1"));
    assert_eq!(store.add_to_cart(&ProductId::new("1")).unwrap(), 1);
}

#[tokio::test]
async fn test_shopper_journey() {
    let (mut store, _cache) = offline_store();

    // Browsing is open to everyone; account views redirect to sign-in
    assert_eq!(store.navigate(View::Products), View::Products);
    assert_eq!(store.navigate(View::Profile), View::Auth);

    store.sign_in(shopper());
    let audio = store.search(&ProductQuery {
        category: Some(Category::Audio),
        ..ProductQuery::default()
    });
    let earbuds = audio[0].id.clone();

    store.toggle_wishlist(&earbuds).unwrap();
    store.add_to_cart(&earbuds).unwrap();
    store.add_to_cart(&ProductId::new("1")).unwrap();
    store.apply_coupon("WELCOME15").unwrap();

    let summary = store.cart_summary();
    // 129.00 + 49.99
    assert_eq!(summary.subtotal, Price::new(dec!(178.99)));
    assert_eq!(summary.discount, Price::new(dec!(26.85)));
    assert_eq!(summary.total, Price::new(dec!(152.14)));

    let checkout = store.checkout("UPI", address()).await.unwrap();
    // Coupons only affect the summary; the order keeps the line-item sum
    assert_eq!(checkout.order.total, Price::new(dec!(178.99)));
    assert_eq!(store.cart_count(), 0);
    assert!(store.cart_summary().coupon.is_none());

    store.cancel_order(&checkout.order.id).unwrap();
    let cancelled = store
        .my_orders(&OrderFilter {
            status: Some(OrderStatus::Cancelled),
            ..OrderFilter::default()
        })
        .unwrap();
    assert_eq!(cancelled.len(), 1);

    store
        .add_review(&earbuds, ReviewDraft {
            user_name: "Meera".to_owned(),
            rating: 5,
            comment: "Great bass".to_owned(),
        })
        .unwrap();
    assert_eq!(store.product(&earbuds).unwrap().reviews.len(), 1);
    assert_eq!(store.wishlist_products().len(), 1);
}

#[test]
fn test_rating_scenario() {
    let (mut store, _cache) = offline_store();
    store.sign_in(admin());
    let product = store
        .save_product(
            ProductDraft::new()
                .name("Test Puck")
                .price(Price::new(dec!(15)))
                .category(Category::Power),
        )
        .unwrap();
    // Draft products start at 5.0 over one rating
    let rated = store.rate_product(&product.id, 3).unwrap();
    assert!((rated.rating - 4.0).abs() < f64::EPSILON);
    assert_eq!(rated.rating_count, 2);

    for _ in 0..7 {
        store.rate_product(&product.id, 4).unwrap();
    }
    // 4.0 over 9 ratings, then a 5
    let rated = store.rate_product(&product.id, 5).unwrap();
    assert!((rated.rating - 4.1).abs() < f64::EPSILON);
    assert_eq!(rated.rating_count, 10);
}

#[test]
fn test_admin_catalog_flow() {
    let (mut store, _cache) = offline_store();
    store.sign_in(admin());

    let created = store
        .save_product(
            ProductDraft::new()
                .name("MagSafe Stand")
                .price(Price::new(dec!(39.00)))
                .category(Category::Power)
                .stock(4),
        )
        .unwrap();
    let sorted = store.search(&ProductQuery {
        category: Some(Category::Power),
        sort: SortOrder::PriceLowToHigh,
        ..ProductQuery::default()
    });
    assert_eq!(sorted[0].id, created.id);
    assert_eq!(store.dashboard().unwrap().low_stock_count, 1);

    let removed = store.delete_product(&created.id).unwrap();
    let logs = store.admin_logs().unwrap();
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0].severity, LogSeverity::Error);
    assert_eq!(logs[0].target, removed.name);
    assert_eq!(logs[1].severity, LogSeverity::Success);
    assert!(store.product(&created.id).is_none());
}

#[test]
fn test_admin_log_is_capped() {
    let (mut store, _cache) = offline_store();
    store.sign_in(admin());
    for n in 0..LogBook::CAPACITY {
        store.record_log("Updated Product", format!("#{n}"), LogSeverity::Info);
    }
    assert_eq!(store.admin_logs().unwrap().len(), LogBook::CAPACITY);

    store.record_log("Deleted Product", "#overflow", LogSeverity::Error);
    let logs = store.admin_logs().unwrap();
    assert_eq!(logs.len(), LogBook::CAPACITY);
    assert_eq!(logs[0].target, "#overflow");
    assert_eq!(logs[LogBook::CAPACITY - 1].target, "#1");
}

#[test]
fn test_non_admin_is_sent_home() {
    let (mut store, _cache) = offline_store();
    store.sign_in(shopper());
    let err = store.dashboard().unwrap_err();
    assert!(matches!(err, StoreError::Forbidden));
    assert_eq!(err.redirect(), Some(View::Home));
    assert_eq!(store.navigate(View::Admin), View::Home);
}

#[test]
fn test_roster_follows_profile_and_role_changes() {
    let (mut store, _cache) = offline_store();
    let customer = shopper();
    store.sign_in(customer.clone());

    let mut form = ProfileUpdate::from_user(store.user().unwrap());
    form.address = address();
    store.update_profile(form).unwrap();

    store.sign_out();
    store.sign_in(admin());
    let roster = store.users().unwrap();
    let entry = roster.iter().find(|u| u.id == customer.id).unwrap();
    assert_eq!(entry.address.as_ref().unwrap().city, "Pune");

    let promoted = store.toggle_user_role(&customer.id).unwrap();
    assert!(promoted.is_admin());
    assert_eq!(store.admin_logs().unwrap()[0].action, "Updated User");
    assert_eq!(store.dashboard().unwrap().user_count, 2);
}

#[tokio::test]
async fn test_admin_order_status_progression() {
    let (mut store, _cache) = offline_store();
    let customer = shopper();
    store.sign_in(customer);
    store.add_to_cart(&ProductId::new("5")).unwrap();
    let order = store.checkout("Paytm", address()).await.unwrap().order;

    store.sign_out();
    store.sign_in(admin());
    for status in [
        OrderStatus::Shipped,
        OrderStatus::OutForDelivery,
        OrderStatus::Delivered,
    ] {
        assert_eq!(store.set_order_status(&order.id, status).unwrap().status, status);
    }
    let err = store
        .set_order_status(&order.id, OrderStatus::Shipped)
        .unwrap_err();
    assert!(matches!(err, StoreError::Transition(_)));

    let stats = store.dashboard().unwrap();
    assert_eq!(stats.revenue, Price::new(dec!(89.99)));
    assert_eq!(stats.order_count, 1);
}
