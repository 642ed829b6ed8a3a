//! Generative-text integration.
//!
//! Two single-shot prompt flows sit on top of a [`TextGenerator`]:
//!
//! - [`flows::generate_product_description`] - admin "Add Product" helper
//! - [`flows::recommend_products`] - account page recommendations
//!
//! Each flow validates its input, renders one askama prompt template, sends
//! it to the generator once and validates the JSON reply. Nothing is retried
//! or streamed.

pub mod client;
pub mod error;
pub mod flows;
pub mod types;

use async_trait::async_trait;

pub use client::AnthropicClient;
pub use error::AiError;
pub use flows::FlowError;

/// A backend that turns a prompt into text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a completion for a single user prompt.
    async fn generate(&self, prompt: &str) -> Result<String, AiError>;
}
