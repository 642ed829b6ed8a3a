//! Prompt flows.

mod product_description;
mod recommendations;

pub use product_description::{
    GenerateProductDescriptionInput, GenerateProductDescriptionOutput,
    generate_product_description,
};
pub use recommendations::{
    ProductRecommendationsInput, ProductRecommendationsOutput, recommend_products,
};

use serde::de::DeserializeOwned;
use thiserror::Error;

use super::AiError;

/// Errors from a prompt flow.
#[derive(Debug, Error)]
pub enum FlowError {
    /// The input failed validation; nothing was sent.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The prompt template failed to render.
    #[error("prompt rendering failed: {0}")]
    Prompt(#[from] askama::Error),

    /// The generator call failed.
    #[error("generation failed: {0}")]
    Generation(#[from] AiError),

    /// The reply was not the expected JSON shape.
    #[error("malformed output: {0}")]
    MalformedOutput(String),
}

/// Parse the JSON object in a model reply.
///
/// Models sometimes wrap JSON in a Markdown fence or add a sentence around
/// it, so parsing starts at the first `{` and ends at the last `}`.
fn parse_reply<T: DeserializeOwned>(reply: &str) -> Result<T, FlowError> {
    let start = reply.find('{');
    let end = reply.rfind('}');
    let json = match (start, end) {
        (Some(start), Some(end)) if start < end => reply.get(start..=end).unwrap_or_default(),
        _ => {
            return Err(FlowError::MalformedOutput(
                "reply contains no JSON object".to_string(),
            ));
        }
    };

    serde_json::from_str(json).map_err(|e| FlowError::MalformedOutput(e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Reply {
        answer: String,
    }

    #[test]
    fn test_parse_reply_plain_and_fenced() {
        let plain: Reply = parse_reply(r#"{"answer":"yes"}"#).unwrap();
        assert_eq!(plain.answer, "yes");

        let fenced: Reply = parse_reply("Sure!\n```json\n{\"answer\": \"ok\"}\n```\n").unwrap();
        assert_eq!(fenced.answer, "ok");
    }

    #[test]
    fn test_parse_reply_rejects_non_json() {
        assert!(matches!(
            parse_reply::<Reply>("I cannot help with that."),
            Err(FlowError::MalformedOutput(_))
        ));
        assert!(matches!(
            parse_reply::<Reply>(r#"{"different": 1}"#),
            Err(FlowError::MalformedOutput(_))
        ));
    }
}

/// Generators with canned replies for flow tests.
#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::ai::{AiError, TextGenerator};

    /// Replies with a fixed string and remembers the prompts it saw.
    pub struct CannedGenerator {
        reply: Result<String, String>,
        pub prompts: Mutex<Vec<String>>,
    }

    impl CannedGenerator {
        pub fn replying(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn failing(message: &str) -> Self {
            Self {
                reply: Err(message.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        #[allow(clippy::unwrap_used)]
        pub fn last_prompt(&self) -> Option<String> {
            self.prompts.lock().unwrap().last().cloned()
        }
    }

    #[async_trait]
    impl TextGenerator for CannedGenerator {
        #[allow(clippy::unwrap_used)]
        async fn generate(&self, prompt: &str) -> Result<String, AiError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.reply.clone().map_err(|message| AiError::Api {
                error_type: "overloaded_error".to_string(),
                message,
            })
        }
    }
}
