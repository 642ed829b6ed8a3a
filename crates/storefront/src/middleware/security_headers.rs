//! Security headers middleware for XSS, clickjacking, and isolation protection.
//!
//! The storefront serves its own CSS and images and runs no scripts, so the
//! policy can stay fully locked down.

use axum::{
    extract::Request,
    http::{
        HeaderName, HeaderValue,
        header::{
            CACHE_CONTROL, CONTENT_SECURITY_POLICY, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS,
            X_FRAME_OPTIONS,
        },
    },
    middleware::Next,
    response::Response,
};

const CSP: &str = "default-src 'none'; \
                   script-src 'none'; \
                   style-src 'self'; \
                   font-src 'self'; \
                   img-src 'self'; \
                   connect-src 'self'; \
                   frame-src 'none'; \
                   object-src 'none'; \
                   base-uri 'self'; \
                   form-action 'self'; \
                   frame-ancestors 'none'";

const PERMISSIONS_POLICY: &str = "accelerometer=(), \
                                  camera=(), \
                                  display-capture=(), \
                                  geolocation=(), \
                                  gyroscope=(), \
                                  microphone=(), \
                                  payment=(), \
                                  usb=()";

/// Add security headers to all responses.
///
/// Pages are marked `no-store` since they carry the cart and identity.
/// `/static` assets and responses that set their own `Cache-Control` are
/// left alone.
pub async fn security_headers_middleware(request: Request, next: Next) -> Response {
    let is_static = request.uri().path().starts_with("/static/");
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(REFERRER_POLICY, HeaderValue::from_static("same-origin"));
    headers.insert(CONTENT_SECURITY_POLICY, HeaderValue::from_static(CSP));
    headers.insert(
        HeaderName::from_static("permissions-policy"),
        HeaderValue::from_static(PERMISSIONS_POLICY),
    );
    headers.insert(
        HeaderName::from_static("cross-origin-opener-policy"),
        HeaderValue::from_static("same-origin"),
    );
    headers.insert(
        HeaderName::from_static("cross-origin-resource-policy"),
        HeaderValue::from_static("same-origin"),
    );

    if !is_static && !headers.contains_key(CACHE_CONTROL) {
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store, max-age=0"));
    }

    response
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::Request as HttpRequest, middleware, routing::get};
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route("/cart", get(|| async { "cart" }))
            .route("/static/css/main.css", get(|| async { "body{}" }))
            .layer(middleware::from_fn(security_headers_middleware))
    }

    async fn get_headers(uri: &str) -> axum::http::HeaderMap {
        app()
            .oneshot(HttpRequest::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .headers()
            .clone()
    }

    #[tokio::test]
    async fn test_pages_are_locked_down_and_uncached() {
        let headers = get_headers("/cart").await;
        assert_eq!(headers.get(X_FRAME_OPTIONS).unwrap(), "DENY");
        assert!(
            headers
                .get(CONTENT_SECURITY_POLICY)
                .unwrap()
                .to_str()
                .unwrap()
                .contains("frame-ancestors 'none'")
        );
        assert_eq!(headers.get(CACHE_CONTROL).unwrap(), "no-store, max-age=0");
    }

    #[tokio::test]
    async fn test_static_assets_stay_cacheable() {
        let headers = get_headers("/static/css/main.css").await;
        assert!(headers.get(CACHE_CONTROL).is_none());
        assert_eq!(headers.get(X_CONTENT_TYPE_OPTIONS).unwrap(), "nosniff");
    }
}
