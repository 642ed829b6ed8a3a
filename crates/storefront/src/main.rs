//! BBS Entertainment storefront - public shop and admin console.
//!
//! This binary serves both on port 3000.
//!
//! # Architecture
//!
//! - Axum web framework, Askama templates for server-side rendering
//! - `PostgreSQL` document store for products, categories, users and orders
//! - `tower-sessions` with the `PostgreSQL` store for carts and sign-in
//! - Optional Anthropic backend for the admin description and account
//!   recommendation flows
//!
//! Migrations are not run on startup. Run `bbs-cli migrate` first.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use bbs_storefront::ai::{AnthropicClient, TextGenerator};
use bbs_storefront::config::StorefrontConfig;
use bbs_storefront::db::{self, PgDocumentStore};
use bbs_storefront::middleware::create_session_layer;
use bbs_storefront::routes;
use bbs_storefront::state::AppState;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Start Sentry when a DSN is configured. Drop the guard to flush.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry.dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry
                .environment
                .clone()
                .map(std::borrow::Cow::Owned),
            sample_rate: config.sentry.sample_rate,
            traces_sample_rate: config.sentry.traces_sample_rate,
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Warnings become Sentry events; info and debug become breadcrumbs.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

/// Build the generative-text backend, or `None` when no API key is set.
fn init_generator(config: &StorefrontConfig) -> Option<Arc<dyn TextGenerator>> {
    let Some(ai) = config.ai.as_ref() else {
        tracing::info!("ANTHROPIC_API_KEY not set, AI flows disabled");
        return None;
    };

    match AnthropicClient::new(ai) {
        Ok(client) => {
            tracing::info!(model = %client.model(), "AI client initialized");
            Some(Arc::new(client))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to initialize AI client, AI flows disabled");
            None
        }
    }
}

/// Structured logs to stdout, warnings and errors to Sentry.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "bbs_storefront=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let config = StorefrontConfig::from_env().expect("Failed to load configuration");

    // Sentry has to be up before the subscriber so its layer has a client.
    let _sentry_guard = init_sentry(&config);
    init_tracing();

    let pool = db::create_pool(&config.database_url)
        .await
        .expect("Failed to connect to PostgreSQL");

    let session_layer = create_session_layer(&pool, &config);
    let generator = init_generator(&config);
    let addr = config.socket_addr();
    let state = AppState::new(config, Arc::new(PgDocumentStore::new(pool)), generator);

    let app = routes::app(state, session_layer)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    tracing::info!(%addr, "Storefront listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
