//! Shared handler state.

use std::sync::Arc;

use crate::ai::TextGenerator;
use crate::config::StorefrontConfig;
use crate::db::DocumentStore;

/// Handles every request handler can reach. Cloning bumps one `Arc`.
#[derive(Clone)]
pub struct AppState(Arc<Shared>);

struct Shared {
    config: StorefrontConfig,
    store: Arc<dyn DocumentStore>,
    generator: Option<Arc<dyn TextGenerator>>,
}

impl AppState {
    /// Bundle the configuration with its backends.
    ///
    /// Passing `None` for `generator` turns the description and
    /// recommendation flows into their "unavailable" fallbacks.
    #[must_use]
    pub fn new(
        config: StorefrontConfig,
        store: Arc<dyn DocumentStore>,
        generator: Option<Arc<dyn TextGenerator>>,
    ) -> Self {
        Self(Arc::new(Shared {
            config,
            store,
            generator,
        }))
    }

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.0.config
    }

    /// Products, categories, users and orders.
    #[must_use]
    pub fn store(&self) -> &dyn DocumentStore {
        self.0.store.as_ref()
    }

    #[must_use]
    pub fn generator(&self) -> Option<&dyn TextGenerator> {
        self.0.generator.as_deref()
    }
}
