//! Transport errors from the generative-text backend.
//!
//! These cover getting a reply at all. Whether the reply is usable is the
//! prompt flow's concern ([`FlowError`](super::FlowError)).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Error body returned by the Messages API.
    #[error("API error ({error_type}): {message}")]
    Api { error_type: String, message: String },

    /// HTTP 429. Nothing retries; the seconds are only logged.
    #[error("rate limited, retry after {retry_after_secs} seconds")]
    RateLimited { retry_after_secs: u64 },

    /// HTTP 401, almost always a revoked or mistyped key.
    #[error("API key rejected")]
    Unauthorized,

    /// A 2xx reply whose body is not a Messages API response.
    #[error("unexpected response body: {0}")]
    Parse(String),

    #[error("client configuration error: {0}")]
    Config(String),
}

impl AiError {
    /// Whether the failure points at our configuration rather than the
    /// backend being unavailable.
    #[must_use]
    pub const fn is_misconfiguration(&self) -> bool {
        matches!(self, Self::Unauthorized | Self::Config(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_api_details() {
        let err = AiError::Api {
            error_type: "overloaded_error".to_string(),
            message: "Overloaded".to_string(),
        };
        assert_eq!(err.to_string(), "API error (overloaded_error): Overloaded");

        let err = AiError::RateLimited {
            retry_after_secs: 30,
        };
        assert_eq!(err.to_string(), "rate limited, retry after 30 seconds");
    }

    #[test]
    fn test_misconfiguration() {
        assert!(AiError::Unauthorized.is_misconfiguration());
        assert!(AiError::Config("bad key".to_string()).is_misconfiguration());
        assert!(!AiError::RateLimited { retry_after_secs: 1 }.is_misconfiguration());
    }
}
