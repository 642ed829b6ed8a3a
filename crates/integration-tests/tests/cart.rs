//! Session cart and checkout.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use bbs_core::{NewProduct, OrderStatus, ProductId};
use bbs_integration_tests::TestApp;
use bbs_storefront::db::{OrderRepository, ProductRepository};

#[tokio::test]
async fn test_subtotal_uses_effective_prices() {
    let mut app = TestApp::new().await;

    let response = app
        .post_form("/cart/add", &[("product_id", "prod2"), ("quantity", "2")])
        .await;
    assert!(response.is_redirect_to("/products/prod2"));
    app.post_form("/cart/add", &[("product_id", "prod3"), ("quantity", "1")])
        .await;

    let response = app.get("/cart").await;
    assert_eq!(response.status, StatusCode::OK);
    // 2 x 299.00 (sale) + 69.99
    assert!(response.body.contains("$667.99"));
    assert!(response.body.contains("$15.00"));
    assert!(response.body.contains("$682.99"));
}

#[tokio::test]
async fn test_add_flashes_and_merges_lines() {
    let mut app = TestApp::new().await;

    app.post_form("/cart/add", &[("product_id", "prod3"), ("quantity", "1")])
        .await;
    let page = app.get("/products/prod3").await;
    assert!(page.body.contains("Added to cart!"));
    assert!(page.body.contains("1 x NovaPlay Gaming Controller"));

    app.post_form("/cart/add", &[("product_id", "prod3"), ("quantity", "2")])
        .await;
    let cart = app.get("/cart").await;
    // 3 x 69.99
    assert!(cart.body.contains("$209.97"));
}

#[tokio::test]
async fn test_removing_last_unit_removes_line() {
    let mut app = TestApp::new().await;

    app.post_form("/cart/add", &[("product_id", "prod4"), ("quantity", "1")])
        .await;
    let response = app
        .post_form("/cart/update", &[("product_id", "prod4"), ("quantity", "0")])
        .await;
    assert!(response.is_redirect_to("/cart"));

    let cart = app.get("/cart").await;
    assert!(cart.body.contains("Your cart is empty"));
    assert!(cart.body.contains("Start Shopping"));
}

#[tokio::test]
async fn test_remove_flashes() {
    let mut app = TestApp::new().await;

    app.post_form("/cart/add", &[("product_id", "prod5"), ("quantity", "1")])
        .await;
    app.post_form("/cart/remove", &[("product_id", "prod5")]).await;

    let cart = app.get("/cart").await;
    assert!(cart.body.contains("Item removed"));
    assert!(cart.body.contains("Strummer-X Electric Guitar has been removed from your cart."));
    assert!(cart.body.contains("Your cart is empty"));
}

#[tokio::test]
async fn test_checkout_requires_sign_in() {
    let mut app = TestApp::new().await;

    app.post_form("/cart/add", &[("product_id", "prod1"), ("quantity", "1")])
        .await;
    let response = app.post_form("/checkout", &[]).await;
    assert!(response.is_redirect_to("/login"));
}

#[tokio::test]
async fn test_checkout_places_order_and_clears_cart() {
    let mut app = TestApp::new().await;
    app.sign_up("Dana", "dana@example.com", "correct-horse-battery").await;

    app.post_form("/cart/add", &[("product_id", "prod3"), ("quantity", "2")])
        .await;
    let response = app.post_form("/checkout", &[]).await;
    assert!(response.is_redirect_to("/account"));

    let user = app.user("dana@example.com").await;
    assert_eq!(user.order_count, 1);

    let orders = OrderRepository::new(app.store())
        .list_for_user(&user.id)
        .await
        .unwrap();
    assert_eq!(orders.len(), 1);
    let order = orders.first().unwrap();
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.item_count, 2);
    assert_eq!(order.total_display(), "$154.98");

    let account = app.get("/account").await;
    assert!(account.body.contains("Order placed!"));
    assert!(account.body.contains(&format!("Order #{}", order.id)));

    assert!(app.get("/cart").await.body.contains("Your cart is empty"));
}

#[tokio::test]
async fn test_checkout_with_empty_cart_goes_back_to_cart() {
    let mut app = TestApp::new().await;
    app.sign_up("Eve", "eve@example.com", "correct-horse-battery").await;

    let response = app.post_form("/checkout", &[]).await;
    assert!(response.is_redirect_to("/cart"));
}

#[tokio::test]
async fn test_out_of_stock_product_is_not_added() {
    let mut app = TestApp::new().await;
    let ghost = NewProduct::draft("Ghost Speaker", "Sold out everywhere.", "silent")
        .with_id(ProductId::new("ghost"));
    ProductRepository::new(app.store()).put(&ghost).await.unwrap();

    let response = app
        .post_form("/cart/add", &[("product_id", "ghost"), ("quantity", "3")])
        .await;
    assert!(response.is_redirect_to("/products/ghost"));

    let page = app.get("/products/ghost").await;
    assert!(page.body.contains("Out of Stock"));
    assert!(page.body.contains("Ghost Speaker is currently unavailable."));

    let cart = app.get("/cart").await;
    assert!(!cart.body.contains("Ghost Speaker"));
    assert!(cart.body.contains("Start Shopping"));
}

#[tokio::test]
async fn test_cart_line_is_capped_at_stock() {
    let mut app = TestApp::new().await;

    // prod8 has 12 units in stock.
    app.post_form("/cart/add", &[("product_id", "prod8"), ("quantity", "500")])
        .await;
    let page = app.get("/products/prod8").await;
    assert!(page.body.contains("12 x MixMaster Go DJ Console"));

    let cart = app.get("/cart").await;
    assert!(cart.body.contains("Cart (12)"));
    assert!(cart.body.contains("$10799.88"));

    app.post_form("/cart/add", &[("product_id", "prod8"), ("quantity", "1")])
        .await;
    let page = app.get("/products/prod8").await;
    assert!(page.body.contains("Stock Limit Reached"));

    app.post_form("/cart/update", &[("product_id", "prod8"), ("quantity", "40")])
        .await;
    let cart = app.get("/cart").await;
    assert!(cart.body.contains("Cart (12)"));
    assert!(!cart.body.contains("Cart (40)"));
}
