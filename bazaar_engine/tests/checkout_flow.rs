mod common;

use bazaar_common::Paise;
use bazaar_engine::{
    db_types::{OrderStatus, ProductId, UpdateProductRequest, UserId},
    traits::{CartManagement, OrderManagement, ProductManagement},
    CheckoutApi,
    CheckoutError,
};
use common::{add_to_cart, new_test_db, seed_product, stock_of};

#[tokio::test]
async fn checkout_prices_stock_and_cart_follow_the_order() {
    let db = new_test_db().await;
    let api = CheckoutApi::new(db.clone());
    let user = UserId::from("alice");
    let p1 = seed_product(&db, "Wireless Headphones", 100.0, 5).await;
    add_to_cart(&db, "alice", &p1.id, 3).await;

    let detail = api.create_order(&user).await.expect("Checkout should succeed");
    assert_eq!(detail.order.status, OrderStatus::Created);
    assert_eq!(detail.order.total_amount, Paise::from_rupees(300.0));
    assert_eq!(detail.items.len(), 1);
    assert_eq!(detail.items[0].quantity, 3);
    assert_eq!(detail.items[0].unit_price, Paise::from_rupees(100.0));

    assert_eq!(stock_of(&db, &p1.id).await, 2);
    assert!(db.fetch_cart_items(&user).await.unwrap().is_empty());
}

#[tokio::test]
async fn empty_cart_cannot_be_checked_out() {
    let db = new_test_db().await;
    let api = CheckoutApi::new(db.clone());
    let err = api.create_order(&UserId::from("bob")).await.unwrap_err();
    assert!(matches!(err, CheckoutError::EmptyCart(_)));
}

#[tokio::test]
async fn insufficient_stock_leaves_everything_unchanged() {
    let db = new_test_db().await;
    let api = CheckoutApi::new(db.clone());
    let user = UserId::from("carol");
    let p1 = seed_product(&db, "Limited Widget", 50.0, 5).await;
    add_to_cart(&db, "carol", &p1.id, 10).await;

    let err = api.create_order(&user).await.unwrap_err();
    match err {
        CheckoutError::InsufficientStock { product, available, requested } => {
            assert_eq!(product, "Limited Widget");
            assert_eq!(available, 5);
            assert_eq!(requested, 10);
        },
        other => panic!("Expected InsufficientStock, got {other:?}"),
    }
    assert_eq!(stock_of(&db, &p1.id).await, 5);
    let cart = db.fetch_cart_items(&user).await.unwrap();
    assert_eq!(cart.len(), 1);
    assert_eq!(cart[0].quantity, 10);
    assert!(db.fetch_orders(Some(&user)).await.unwrap().is_empty());
}

#[tokio::test]
async fn vanished_product_fails_the_whole_checkout() {
    let db = new_test_db().await;
    let api = CheckoutApi::new(db.clone());
    let user = UserId::from("dave");
    let ghost = ProductId::from("prd_does_not_exist".to_string());
    add_to_cart(&db, "dave", &ghost, 1).await;

    let err = api.create_order(&user).await.unwrap_err();
    assert!(matches!(err, CheckoutError::ProductNotFound(_)));
    assert_eq!(db.fetch_cart_items(&user).await.unwrap().len(), 1);
}

#[tokio::test]
async fn validation_failure_on_a_later_line_touches_no_stock() {
    let db = new_test_db().await;
    let api = CheckoutApi::new(db.clone());
    let user = UserId::from("erin");
    let plentiful = seed_product(&db, "Plentiful", 10.0, 100).await;
    let scarce = seed_product(&db, "Scarce", 10.0, 1).await;
    add_to_cart(&db, "erin", &plentiful.id, 2).await;
    add_to_cart(&db, "erin", &scarce.id, 5).await;

    let err = api.create_order(&user).await.unwrap_err();
    assert!(matches!(err, CheckoutError::InsufficientStock { .. }));
    // The first line validated fine, but nothing may be debited before every line has passed.
    assert_eq!(stock_of(&db, &plentiful.id).await, 100);
    assert_eq!(stock_of(&db, &scarce.id).await, 1);
}

#[tokio::test]
async fn multi_line_totals_accumulate_in_cart_order() {
    let db = new_test_db().await;
    let api = CheckoutApi::new(db.clone());
    let user = UserId::from("frank");
    let p1 = seed_product(&db, "Keyboard", 2499.99, 10).await;
    let p2 = seed_product(&db, "Mouse", 899.5, 10).await;
    add_to_cart(&db, "frank", &p1.id, 1).await;
    add_to_cart(&db, "frank", &p2.id, 2).await;

    let detail = api.create_order(&user).await.expect("Checkout should succeed");
    let expected = Paise::from_rupees(2499.99) + Paise::from_rupees(899.5) * 2;
    assert_eq!(detail.order.total_amount, expected);
    assert_eq!(detail.items.len(), 2);
    assert_eq!(detail.items[0].product_id, p1.id);
    assert_eq!(detail.items[1].product_id, p2.id);
    assert_eq!(stock_of(&db, &p1.id).await, 9);
    assert_eq!(stock_of(&db, &p2.id).await, 8);
}

#[tokio::test]
async fn order_total_is_a_snapshot_immune_to_price_changes() {
    let db = new_test_db().await;
    let api = CheckoutApi::new(db.clone());
    let user = UserId::from("grace");
    let p1 = seed_product(&db, "Volatile", 100.0, 5).await;
    add_to_cart(&db, "grace", &p1.id, 3).await;
    let placed = api.create_order(&user).await.expect("Checkout should succeed");

    db.update_product(&p1.id, UpdateProductRequest { price: Some(Paise::from_rupees(999.0)), ..Default::default() })
        .await
        .expect("Price update should succeed");

    let detail = api.order_detail(&placed.order.order_id).await.expect("Order should resolve");
    assert_eq!(detail.order.total_amount, Paise::from_rupees(300.0));
    assert_eq!(detail.items[0].unit_price, Paise::from_rupees(100.0));
}

#[tokio::test]
async fn cancellation_is_terminal() {
    let db = new_test_db().await;
    let api = CheckoutApi::new(db.clone());
    let user = UserId::from("heidi");
    let p1 = seed_product(&db, "Cancellable", 10.0, 5).await;
    add_to_cart(&db, "heidi", &p1.id, 1).await;
    let placed = api.create_order(&user).await.expect("Checkout should succeed");

    let cancelled = api.cancel_order(&placed.order.order_id).await.expect("Cancel should succeed");
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    let err = api.cancel_order(&placed.order.order_id).await.unwrap_err();
    assert!(matches!(err, CheckoutError::InvalidOrderState { .. }));
}

#[tokio::test]
async fn readding_a_product_increments_the_existing_cart_line() {
    let db = new_test_db().await;
    let user = UserId::from("ivan");
    let p1 = seed_product(&db, "Stackable", 10.0, 50).await;
    add_to_cart(&db, "ivan", &p1.id, 2).await;
    let line = add_to_cart(&db, "ivan", &p1.id, 3).await;
    assert_eq!(line.quantity, 5);
    assert_eq!(db.fetch_cart_items(&user).await.unwrap().len(), 1);
}
