//! Product description generation for the admin console.

use askama::Template;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{FlowError, parse_reply};
use crate::ai::TextGenerator;

/// Flow input.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateProductDescriptionInput {
    pub product_name: String,
    /// Free-form, usually comma-separated.
    pub key_features: String,
}

/// Flow output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateProductDescriptionOutput {
    pub product_description: String,
}

#[derive(Template)]
#[template(path = "prompts/product_description.txt", escape = "none")]
struct ProductDescriptionPrompt<'a> {
    product_name: &'a str,
    key_features: &'a str,
}

/// Write a marketing description from a product name and its key features.
///
/// # Errors
///
/// Returns `FlowError::InvalidInput` if either field is blank,
/// `FlowError::Generation` if the backend call fails and
/// `FlowError::MalformedOutput` if the reply lacks a non-empty description.
#[instrument(skip(generator, input), fields(product = %input.product_name))]
pub async fn generate_product_description(
    generator: &dyn TextGenerator,
    input: &GenerateProductDescriptionInput,
) -> Result<GenerateProductDescriptionOutput, FlowError> {
    let product_name = input.product_name.trim();
    let key_features = input.key_features.trim();
    if product_name.is_empty() {
        return Err(FlowError::InvalidInput("productName is required".to_string()));
    }
    if key_features.is_empty() {
        return Err(FlowError::InvalidInput("keyFeatures is required".to_string()));
    }

    let prompt = ProductDescriptionPrompt {
        product_name,
        key_features,
    }
    .render()?;

    let reply = generator.generate(&prompt).await?;
    let output: GenerateProductDescriptionOutput = parse_reply(&reply)?;

    let product_description = output.product_description.trim().to_string();
    if product_description.is_empty() {
        return Err(FlowError::MalformedOutput(
            "productDescription is empty".to_string(),
        ));
    }

    Ok(GenerateProductDescriptionOutput {
        product_description,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ai::flows::testing::CannedGenerator;

    fn input(name: &str, features: &str) -> GenerateProductDescriptionInput {
        GenerateProductDescriptionInput {
            product_name: name.to_string(),
            key_features: features.to_string(),
        }
    }

    #[tokio::test]
    async fn test_generates_description() {
        let generator = CannedGenerator::replying(
            r#"{"productDescription": "  Crisp 4K footage from the sky.  "}"#,
        );

        let output = generate_product_description(
            &generator,
            &input("AeroView 4K Drone", "4K camera, 30 minute flight"),
        )
        .await
        .unwrap();

        assert_eq!(output.product_description, "Crisp 4K footage from the sky.");
        let prompt = generator.last_prompt().unwrap();
        assert!(prompt.contains("Product Name: AeroView 4K Drone"));
        assert!(prompt.contains("Key Features: 4K camera, 30 minute flight"));
    }

    #[tokio::test]
    async fn test_blank_input_is_rejected_without_a_call() {
        let generator = CannedGenerator::replying("{}");

        let err = generate_product_description(&generator, &input("  ", "features"))
            .await
            .unwrap_err();
        assert!(matches!(err, FlowError::InvalidInput(_)));

        let err = generate_product_description(&generator, &input("Drone", ""))
            .await
            .unwrap_err();
        assert!(matches!(err, FlowError::InvalidInput(_)));
        assert!(generator.last_prompt().is_none());
    }

    #[tokio::test]
    async fn test_empty_description_is_malformed() {
        let generator = CannedGenerator::replying(r#"{"productDescription": ""}"#);
        let err = generate_product_description(&generator, &input("Drone", "4K"))
            .await
            .unwrap_err();
        assert!(matches!(err, FlowError::MalformedOutput(_)));
    }

    #[tokio::test]
    async fn test_backend_failure_surfaces() {
        let generator = CannedGenerator::failing("Overloaded");
        let err = generate_product_description(&generator, &input("Drone", "4K"))
            .await
            .unwrap_err();
        assert!(matches!(err, FlowError::Generation(_)));
    }
}
