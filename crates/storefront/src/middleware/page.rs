//! Per-page chrome: navigation state and pending toasts.

use axum::{
    extract::{FromRef, FromRequestParts, OriginalUri, Query},
    http::request::Parts,
};
use serde::Deserialize;
use tower_sessions::Session;

use bbs_core::Cart;

use crate::models::{CurrentUser, Flash, session_keys};
use crate::state::AppState;

/// What the header and bottom nav need to render.
#[derive(Debug, Clone, Default)]
pub struct Nav {
    pub signed_in: bool,
    pub is_admin: bool,
    /// First letter of the signed-in user's first name.
    pub initial: String,
    pub cart_count: u32,
    /// Request path, for highlighting the active link.
    pub path: String,
    /// Current search term, echoed into the header search box.
    pub search: String,
}

impl Nav {
    /// Whether a nav link points at the current page.
    ///
    /// The home link only matches `/` exactly; others also match their
    /// sub-pages.
    #[must_use]
    pub fn is_active(&self, href: &str) -> bool {
        if href == "/" {
            self.path == "/"
        } else {
            self.path == href
                || self
                    .path
                    .strip_prefix(href)
                    .is_some_and(|rest| rest.starts_with('/'))
        }
    }

    /// CSS class for an admin sidebar link, which only highlights on an
    /// exact path match.
    #[must_use]
    pub fn sidebar_class(&self, href: &str) -> &'static str {
        if self.path == href {
            "sidebar-link active"
        } else {
            "sidebar-link"
        }
    }

    /// CSS class for a nav link.
    #[must_use]
    pub fn link_class(&self, href: &str) -> &'static str {
        if self.is_active(href) {
            "nav-link active"
        } else {
            "nav-link"
        }
    }
}

/// Extractor for everything the base layout renders around a page.
///
/// Taking the flashes consumes them, so only extract this in handlers that
/// render HTML.
#[derive(Debug, Clone, Default)]
pub struct PageContext {
    pub nav: Nav,
    pub flashes: Vec<Flash>,
    /// Public URL of this page, without the query string.
    pub canonical_url: String,
}

#[derive(Deserialize)]
struct SearchParam {
    q: Option<String>,
}

impl<S> FromRequestParts<S> for PageContext
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Nested routers see a stripped path; the nav needs the full one.
        let path = parts
            .extensions
            .get::<OriginalUri>()
            .map_or_else(|| parts.uri.path(), |original| original.0.path())
            .to_string();
        let canonical_url = canonical_url(&AppState::from_ref(state).config().base_url, &path);

        let mut nav = Nav {
            path,
            search: Query::<SearchParam>::try_from_uri(&parts.uri)
                .ok()
                .and_then(|Query(p)| p.q)
                .unwrap_or_default(),
            ..Nav::default()
        };

        let Some(session) = parts.extensions.get::<Session>() else {
            return Ok(Self {
                nav,
                flashes: Vec::new(),
                canonical_url,
            });
        };

        if let Ok(Some(user)) = session
            .get::<CurrentUser>(session_keys::CURRENT_USER)
            .await
        {
            nav.signed_in = true;
            nav.is_admin = user.is_admin;
            nav.initial = user
                .first_name
                .chars()
                .next()
                .map(|c| c.to_uppercase().to_string())
                .unwrap_or_default();
        }

        if let Ok(Some(cart)) = session.get::<Cart>(session_keys::CART).await {
            nav.cart_count = cart.item_count();
        }

        let flashes = Flash::take_all(session).await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to read flash messages");
            Vec::new()
        });

        Ok(Self {
            nav,
            flashes,
            canonical_url,
        })
    }
}

fn canonical_url(base_url: &str, path: &str) -> String {
    format!("{}{path}", base_url.trim_end_matches('/'))
}
