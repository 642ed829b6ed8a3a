//! Integration tests for the BBS Entertainment storefront.
//!
//! Tests drive the full router in-process: the same routes and middleware
//! stack the binary serves, backed by the in-memory document store,
//! `tower_sessions::MemoryStore` and a stub text generator. No database or
//! network is needed.
//!
//! ```bash
//! cargo test -p bbs-integration-tests
//! ```
//!
//! Every [`TestApp`] starts from the demo catalog in
//! `crates/storefront/seed/catalog.yaml`.

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use secrecy::SecretString;
use tower::ServiceExt;
use tower_sessions::MemoryStore;

use bbs_core::{Email, User};
use bbs_storefront::ai::{AiError, TextGenerator};
use bbs_storefront::config::{SentryConfig, StorefrontConfig};
use bbs_storefront::db::{MemoryDocumentStore, SeedCatalog, UserRepository};
use bbs_storefront::middleware::session_layer;
use bbs_storefront::routes;
use bbs_storefront::state::AppState;

const CATALOG: &str = include_str!("../../storefront/seed/catalog.yaml");

/// Description the stub generator writes for every product.
pub const STUB_DESCRIPTION: &str = "A stub description for testing.";

/// Product the stub generator recommends to everyone.
pub const STUB_RECOMMENDATION: &str = "prod6";

/// Replies to each prompt flow with fixed JSON.
pub struct StubGenerator;

#[async_trait]
impl TextGenerator for StubGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, AiError> {
        if prompt.contains("Product Name:") {
            Ok(format!(r#"{{"productDescription": "{STUB_DESCRIPTION}"}}"#))
        } else {
            Ok(format!(
                r#"{{"productRecommendations": ["{STUB_RECOMMENDATION}", "not-a-product"]}}"#
            ))
        }
    }
}

/// Always fails, as an unreachable backend would.
pub struct FailingGenerator;

#[async_trait]
impl TextGenerator for FailingGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, AiError> {
        Err(AiError::Api {
            error_type: "overloaded_error".to_string(),
            message: "backend unavailable".to_string(),
        })
    }
}

/// A response with its body read.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    /// `Location` header, for redirects.
    pub location: Option<String>,
    pub body: String,
}

impl TestResponse {
    #[must_use]
    pub fn is_redirect_to(&self, path: &str) -> bool {
        self.status.is_redirection() && self.location.as_deref() == Some(path)
    }
}

/// One visitor's view of a freshly seeded app.
///
/// The session cookie is kept between requests, so a `TestApp` behaves
/// like a single browser.
pub struct TestApp {
    router: Router,
    store: Arc<MemoryDocumentStore>,
    cookie: Option<String>,
}

fn test_config() -> StorefrontConfig {
    StorefrontConfig {
        database_url: SecretString::from("postgres://unused"),
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        base_url: "http://localhost:3000".to_string(),
        ai: None,
        sentry: SentryConfig::default(),
    }
}

impl TestApp {
    /// App with the stub generator.
    ///
    /// # Panics
    ///
    /// Panics if the seed catalog does not load.
    pub async fn new() -> Self {
        Self::with_generator(Some(Arc::new(StubGenerator))).await
    }

    /// App with a specific generator, or none to disable the AI flows.
    ///
    /// # Panics
    ///
    /// Panics if the seed catalog does not load.
    #[allow(clippy::expect_used)]
    pub async fn with_generator(generator: Option<Arc<dyn TextGenerator>>) -> Self {
        let store = Arc::new(MemoryDocumentStore::new());
        SeedCatalog::from_yaml(CATALOG)
            .expect("seed catalog parses")
            .apply(store.as_ref())
            .await
            .expect("seed catalog applies");

        let state = AppState::new(test_config(), store.clone(), generator);
        let router = routes::app(state, session_layer(MemoryStore::default(), false));

        Self {
            router,
            store,
            cookie: None,
        }
    }

    #[must_use]
    pub fn store(&self) -> &MemoryDocumentStore {
        self.store.as_ref()
    }

    /// Send a GET request.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the body cannot be read.
    pub async fn get(&mut self, path: &str) -> TestResponse {
        self.send("GET", path, None).await
    }

    /// Send a form POST.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the body cannot be read.
    pub async fn post_form(&mut self, path: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = fields
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        self.send("POST", path, Some(body)).await
    }

    #[allow(clippy::expect_used)]
    async fn send(&mut self, method: &str, path: &str, form: Option<String>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match form {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body)),
            None => builder.body(Body::empty()),
        }
        .expect("request builds");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        if let Some(set_cookie) = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            && let Some(pair) = set_cookie.split(';').next()
        {
            self.cookie = Some(pair.to_string());
        }

        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body reads");

        TestResponse {
            status,
            location,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    /// Sign up and stay signed in.
    ///
    /// # Panics
    ///
    /// Panics if sign-up does not redirect to the account page.
    pub async fn sign_up(&mut self, first_name: &str, email: &str, password: &str) {
        let response = self
            .post_form(
                "/signup",
                &[
                    ("first_name", first_name),
                    ("last_name", "Tester"),
                    ("email", email),
                    ("password", password),
                ],
            )
            .await;
        assert!(
            response.is_redirect_to("/account"),
            "sign-up failed: {response:?}"
        );
    }

    /// The stored profile for an email.
    ///
    /// # Panics
    ///
    /// Panics if the email is malformed or has no profile.
    #[allow(clippy::expect_used)]
    pub async fn user(&self, email: &str) -> User {
        UserRepository::new(self.store())
            .get_by_email(&Email::parse(email).expect("valid email"))
            .await
            .expect("store reads")
            .expect("profile exists")
    }

    /// Set the admin flag on a profile, as `bbs-cli admin grant` does.
    ///
    /// # Panics
    ///
    /// Panics if the profile cannot be read or written.
    #[allow(clippy::expect_used)]
    pub async fn grant_admin(&self, email: &str) {
        let mut user = self.user(email).await;
        user.is_admin = true;
        UserRepository::new(self.store())
            .put(&user)
            .await
            .expect("store writes");
    }
}
