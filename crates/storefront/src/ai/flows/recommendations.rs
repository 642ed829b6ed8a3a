//! Personalized product recommendations.

use askama::Template;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{FlowError, parse_reply};
use crate::ai::TextGenerator;

/// Flow input. Histories are product ids.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecommendationsInput {
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browsing_history: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_history: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferences: Option<String>,
    /// Product ids the model may choose from. Omitted from the prompt when
    /// empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub catalog: Vec<String>,
}

/// Flow output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecommendationsOutput {
    pub product_recommendations: Vec<String>,
}

#[derive(Template)]
#[template(path = "prompts/recommendations.txt", escape = "none")]
struct RecommendationsPrompt<'a> {
    user_id: &'a str,
    browsing_history: String,
    purchase_history: String,
    preferences: String,
    catalog: String,
}

/// Render an optional list the way the prompt expects: comma-joined, or
/// "None" when absent or empty.
fn or_none(values: Option<&[String]>) -> String {
    match values {
        Some(values) if !values.is_empty() => values.join(","),
        _ => "None".to_string(),
    }
}

/// Recommend product ids for a user.
///
/// Blank ids in the reply are dropped and duplicates collapse to their
/// first occurrence.
///
/// # Errors
///
/// Returns `FlowError::InvalidInput` if the user id is blank,
/// `FlowError::Generation` if the backend call fails and
/// `FlowError::MalformedOutput` if the reply is not a list of ids.
#[instrument(skip(generator, input), fields(user_id = %input.user_id))]
pub async fn recommend_products(
    generator: &dyn TextGenerator,
    input: &ProductRecommendationsInput,
) -> Result<ProductRecommendationsOutput, FlowError> {
    let user_id = input.user_id.trim();
    if user_id.is_empty() {
        return Err(FlowError::InvalidInput("userId is required".to_string()));
    }

    let preferences = input
        .preferences
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .unwrap_or("None")
        .to_string();

    let prompt = RecommendationsPrompt {
        user_id,
        browsing_history: or_none(input.browsing_history.as_deref()),
        purchase_history: or_none(input.purchase_history.as_deref()),
        preferences,
        catalog: input.catalog.join(","),
    }
    .render()?;

    let reply = generator.generate(&prompt).await?;
    let output: ProductRecommendationsOutput = parse_reply(&reply)?;

    let mut product_recommendations: Vec<String> = Vec::new();
    for id in output.product_recommendations {
        let id = id.trim();
        if !id.is_empty() && !product_recommendations.iter().any(|seen| seen == id) {
            product_recommendations.push(id.to_string());
        }
    }

    Ok(ProductRecommendationsOutput {
        product_recommendations,
    })
}
