//! Storefront configuration.
//!
//! Read once at startup from the process environment (and `.env` when
//! present):
//!
//! | Variable | Default |
//! |----------|---------|
//! | `BBS_DATABASE_URL` (or `DATABASE_URL`) | required |
//! | `BBS_BASE_URL` | required |
//! | `BBS_HOST` | `127.0.0.1` |
//! | `BBS_PORT` | `3000` |
//! | `ANTHROPIC_API_KEY` | unset, prompt flows disabled |
//! | `AI_MODEL` | [`DEFAULT_AI_MODEL`] |
//! | `SENTRY_DSN` | unset, reporting disabled |
//! | `SENTRY_ENVIRONMENT` | unset |
//! | `SENTRY_SAMPLE_RATE` | `1.0` |
//! | `SENTRY_TRACES_SAMPLE_RATE` | `0.1` |

use std::collections::HashMap;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;

use secrecy::SecretString;
use thiserror::Error;

/// Model used by the prompt flows unless `AI_MODEL` says otherwise.
pub const DEFAULT_AI_MODEL: &str = "claude-sonnet-4-20250514";

const DEFAULT_PORT: u16 = 3000;

/// Real API keys sit well above this; `.env.example` copies do not.
const MIN_KEY_ENTROPY: f64 = 3.3;

/// Fragments that only show up in copied sample values.
const SAMPLE_VALUE_MARKERS: &[&str] = &[
    "your-", "changeme", "replace", "placeholder", "example", "xxx", "todo", "insert", "put-your",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
    #[error("{var} looks like a sample value: {reason}")]
    SampleValue { var: &'static str, reason: String },
}

/// Everything the storefront binary needs to start.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    pub database_url: SecretString,
    pub host: IpAddr,
    pub port: u16,
    /// Public origin, e.g. `https://shop.bbs.test`.
    pub base_url: String,
    /// Prompt flow backend. `None` disables generation and recommendations.
    pub ai: Option<AiConfig>,
    pub sentry: SentryConfig,
}

/// Anthropic credentials. `Debug` never prints the key.
#[derive(Clone)]
pub struct AiConfig {
    pub api_key: SecretString,
    pub model: String,
}

impl fmt::Debug for AiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AiConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .finish()
    }
}

/// Error reporting settings.
#[derive(Debug, Clone)]
pub struct SentryConfig {
    pub dsn: Option<String>,
    pub environment: Option<String>,
    pub sample_rate: f32,
    pub traces_sample_rate: f32,
}

impl Default for SentryConfig {
    fn default() -> Self {
        Self {
            dsn: None,
            environment: None,
            sample_rate: 1.0,
            traces_sample_rate: 0.1,
        }
    }
}

impl StorefrontConfig {
    /// Load from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a required variable is missing, a value
    /// does not parse, or the API key is a sample value.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_vars(&Vars(|key: &str| std::env::var(key).ok()))
    }

    fn from_vars<F>(vars: &Vars<F>) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = vars
            .get("BBS_DATABASE_URL")
            .or_else(|| vars.get("DATABASE_URL"))
            .ok_or(ConfigError::Missing("BBS_DATABASE_URL"))?;

        let defaults = SentryConfig::default();

        Ok(Self {
            database_url: SecretString::from(database_url),
            host: vars.parse_or("BBS_HOST", IpAddr::V4(Ipv4Addr::LOCALHOST))?,
            port: vars.parse_or("BBS_PORT", DEFAULT_PORT)?,
            base_url: vars.required("BBS_BASE_URL")?,
            ai: AiConfig::from_vars(vars)?,
            sentry: SentryConfig {
                dsn: vars.get("SENTRY_DSN"),
                environment: vars.get("SENTRY_ENVIRONMENT"),
                sample_rate: vars.rate("SENTRY_SAMPLE_RATE", defaults.sample_rate)?,
                traces_sample_rate: vars
                    .rate("SENTRY_TRACES_SAMPLE_RATE", defaults.traces_sample_rate)?,
            },
        })
    }

    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl AiConfig {
    fn from_vars<F>(vars: &Vars<F>) -> Result<Option<Self>, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let Some(api_key) = vars.get("ANTHROPIC_API_KEY") else {
            return Ok(None);
        };
        check_api_key("ANTHROPIC_API_KEY", &api_key)?;

        Ok(Some(Self {
            api_key: SecretString::from(api_key),
            model: vars
                .get("AI_MODEL")
                .unwrap_or_else(|| DEFAULT_AI_MODEL.to_owned()),
        }))
    }
}

/// Variable lookup. Blank values count as unset.
struct Vars<F>(F);

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    fn required(&self, key: &'static str) -> Result<String, ConfigError> {
        self.get(key).ok_or(ConfigError::Missing(key))
    }

    fn parse_or<T>(&self, key: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        self.get(key).map_or(Ok(default), |raw| {
            raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
                var: key,
                reason: e.to_string(),
            })
        })
    }

    fn rate(&self, key: &'static str, default: f32) -> Result<f32, ConfigError> {
        let rate: f32 = self.parse_or(key, default)?;
        if (0.0..=1.0).contains(&rate) {
            Ok(rate)
        } else {
            Err(ConfigError::Invalid {
                var: key,
                reason: format!("{rate} is outside 0.0..=1.0"),
            })
        }
    }
}

/// Shannon entropy in bits per character.
fn entropy(s: &str) -> f64 {
    let mut counts: HashMap<char, u32> = HashMap::new();
    let mut total = 0_u32;
    for c in s.chars() {
        *counts.entry(c).or_default() += 1;
        total += 1;
    }
    if total == 0 {
        return 0.0;
    }

    let total = f64::from(total);
    counts
        .values()
        .map(|&n| {
            let p = f64::from(n) / total;
            -p * p.log2()
        })
        .sum()
}

fn check_api_key(var: &'static str, key: &str) -> Result<(), ConfigError> {
    let lower = key.to_lowercase();
    if let Some(marker) = SAMPLE_VALUE_MARKERS.iter().find(|m| lower.contains(*m)) {
        return Err(ConfigError::SampleValue {
            var,
            reason: format!("contains '{marker}'"),
        });
    }

    let bits = entropy(key);
    if bits < MIN_KEY_ENTROPY {
        return Err(ConfigError::SampleValue {
            var,
            reason: format!("entropy {bits:.2} bits/char is below {MIN_KEY_ENTROPY}"),
        });
    }

    Ok(())
}
