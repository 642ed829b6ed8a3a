//! Sign-up, sign-in, sign-out and the account page.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use axum::http::StatusCode;
use bbs_integration_tests::{FailingGenerator, STUB_RECOMMENDATION, TestApp};
use bbs_storefront::db::{DocumentStore, collections};
use serde_json::json;

const PASSWORD: &str = "correct-horse-battery";

#[tokio::test]
async fn test_account_requires_sign_in() {
    let mut app = TestApp::new().await;
    assert!(app.get("/account").await.is_redirect_to("/login"));
}

#[tokio::test]
async fn test_sign_up_signs_in_and_creates_profile() {
    let mut app = TestApp::new().await;
    app.sign_up("Frank", "frank@example.com", PASSWORD).await;

    let account = app.get("/account").await;
    assert_eq!(account.status, StatusCode::OK);
    assert!(account.body.contains("Account Created!"));
    assert!(account.body.contains("Welcome to BBS Entertainment!"));
    assert!(account.body.contains("Frank Tester"));
    assert!(account.body.contains("You have no orders yet."));

    let user = app.user("frank@example.com").await;
    assert!(!user.is_admin);
    assert_eq!(user.order_count, 0);
    assert!(user.avatar.starts_with("user-avatar-"));
}

#[tokio::test]
async fn test_sign_up_rejects_duplicate_email_and_weak_password() {
    let mut app = TestApp::new().await;
    app.sign_up("Gina", "gina@example.com", PASSWORD).await;
    app.post_form("/logout", &[]).await;

    let response = app
        .post_form(
            "/signup",
            &[
                ("first_name", "Gina"),
                ("last_name", "Again"),
                ("email", "gina@example.com"),
                ("password", PASSWORD),
            ],
        )
        .await;
    assert!(response.is_redirect_to("/signup"));
    assert!(app.get("/signup").await.body.contains("Sign-up Failed"));

    let response = app
        .post_form(
            "/signup",
            &[
                ("first_name", "Hal"),
                ("last_name", "Short"),
                ("email", "hal@example.com"),
                ("password", "short"),
            ],
        )
        .await;
    assert!(response.is_redirect_to("/signup"));
}

#[tokio::test]
async fn test_sign_in_and_out() {
    let mut app = TestApp::new().await;
    app.sign_up("Ivy", "ivy@example.com", PASSWORD).await;

    let response = app.post_form("/logout", &[]).await;
    assert!(response.is_redirect_to("/"));
    assert!(app.get("/account").await.is_redirect_to("/login"));

    let response = app
        .post_form("/login", &[("email", "ivy@example.com"), ("password", "wrong-password")])
        .await;
    assert!(response.is_redirect_to("/login"));
    let page = app.get("/login").await;
    assert!(page.body.contains("Sign-in Failed"));
    assert!(page.body.contains("Invalid email or password."));

    let response = app
        .post_form("/login", &[("email", "ivy@example.com"), ("password", PASSWORD)])
        .await;
    assert!(response.is_redirect_to("/account"));
    assert_eq!(app.get("/account").await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_email_gets_same_message_as_wrong_password() {
    let mut app = TestApp::new().await;

    app.post_form("/login", &[("email", "nobody@example.com"), ("password", PASSWORD)])
        .await;
    assert!(app.get("/login").await.body.contains("Invalid email or password."));
}

#[tokio::test]
async fn test_favorites_and_recommendations() {
    let mut app = TestApp::new().await;
    app.sign_up("Jo", "jo@example.com", PASSWORD).await;

    let response = app.post_form("/account/favorites/prod1", &[]).await;
    assert!(response.is_redirect_to("/products/prod1"));
    assert!(app.get("/products/prod1").await.body.contains("Added to favorites"));

    let user = app.user("jo@example.com").await;
    assert_eq!(user.favorite_product_ids.len(), 1);

    let account = app.get("/account").await;
    assert!(account.body.contains("RetroShot Pro Camera"));
    assert!(account.body.contains("Recommended for You"));
    assert!(account.body.contains(&format!("/products/{STUB_RECOMMENDATION}")));

    app.post_form("/account/favorites/prod1", &[]).await;
    assert!(app.user("jo@example.com").await.favorite_product_ids.is_empty());
}

#[tokio::test]
async fn test_account_page_survives_recommendation_failure() {
    let mut app = TestApp::with_generator(Some(Arc::new(FailingGenerator))).await;
    app.sign_up("Kim", "kim@example.com", PASSWORD).await;

    let account = app.get("/account").await;
    assert_eq!(account.status, StatusCode::OK);
    assert!(!account.body.contains("Recommended for You"));
}

#[tokio::test]
async fn test_account_page_survives_unreadable_catalog() {
    let mut app = TestApp::new().await;
    app.sign_up("Lee", "lee@example.com", PASSWORD).await;
    app.store()
        .put(collections::PRODUCTS, "broken", json!({ "name": 42 }))
        .await
        .unwrap();

    let account = app.get("/account").await;
    assert_eq!(account.status, StatusCode::OK);
    assert!(account.body.contains("Lee"));
    assert!(!account.body.contains("Recommended for You"));
}
