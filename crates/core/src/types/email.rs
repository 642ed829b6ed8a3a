//! Email addresses.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    #[error("email cannot be empty")]
    Empty,
    #[error("email must be at most {max} characters")]
    TooLong { max: usize },
    #[error("email cannot contain spaces")]
    ContainsWhitespace,
    #[error("email must contain exactly one @")]
    BadAtSign,
    #[error("email needs something before the @")]
    EmptyLocalPart,
    #[error("email domain must look like name.tld")]
    BadDomain,
}

/// A trimmed, lowercased email address.
///
/// Accounts are keyed by email, so `Alice@Example.com` and
/// `alice@example.com` parse to the same value.
///
/// ```
/// use bbs_core::Email;
///
/// let email = Email::parse("  Alice@Example.com ").unwrap();
/// assert_eq!(email.as_str(), "alice@example.com");
/// assert_eq!(email.local_part(), "alice");
///
/// for bad in ["", "no-at-symbol", "@domain.com", "user@", "user@localhost"] {
///     assert!(Email::parse(bad).is_err(), "{bad}");
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// RFC 5321 path limit.
    pub const MAX_LENGTH: usize = 254;

    /// Parse and normalize an address.
    ///
    /// # Errors
    ///
    /// Returns an [`EmailError`] naming the first rule the trimmed input
    /// breaks.
    pub fn parse(input: &str) -> Result<Self, EmailError> {
        let s = input.trim();
        if s.is_empty() {
            return Err(EmailError::Empty);
        }
        if s.len() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        if s.chars().any(char::is_whitespace) {
            return Err(EmailError::ContainsWhitespace);
        }

        let mut parts = s.split('@');
        let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(EmailError::BadAtSign);
        };
        if local.is_empty() {
            return Err(EmailError::EmptyLocalPart);
        }
        if !is_plausible_domain(domain) {
            return Err(EmailError::BadDomain);
        }

        Ok(Self(s.to_lowercase()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Everything before the `@`.
    #[must_use]
    pub fn local_part(&self) -> &str {
        self.0.split_once('@').map_or("", |(local, _)| local)
    }
}

/// At least two dot-separated labels, none of them empty.
fn is_plausible_domain(domain: &str) -> bool {
    domain.contains('.') && domain.split('.').all(|label| !label.is_empty())
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_common_shapes() {
        for ok in ["user@example.com", "user.name+tag@example.co.uk", "a@b.c"] {
            assert!(Email::parse(ok).is_ok(), "{ok}");
        }
    }

    #[test]
    fn test_normalizes_case_and_whitespace() {
        let email: Email = " Bob@Example.COM\n".parse().unwrap();
        assert_eq!(email.to_string(), "bob@example.com");
    }

    #[test]
    fn test_reports_first_broken_rule() {
        let cases = [
            ("   ", EmailError::Empty),
            ("no-at", EmailError::BadAtSign),
            ("a@b@c.com", EmailError::BadAtSign),
            ("jo smith@x.com", EmailError::ContainsWhitespace),
            ("@x.com", EmailError::EmptyLocalPart),
            ("user@", EmailError::BadDomain),
            ("user@localhost", EmailError::BadDomain),
            ("user@example..com", EmailError::BadDomain),
        ];
        for (input, expected) in cases {
            assert_eq!(Email::parse(input), Err(expected), "{input:?}");
        }
    }

    #[test]
    fn test_too_long() {
        let long = format!("{}@example.com", "a".repeat(250));
        assert!(matches!(Email::parse(&long), Err(EmailError::TooLong { .. })));
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let email = Email::parse("alice@example.com").unwrap();
        assert_eq!(
            serde_json::to_string(&email).unwrap(),
            "\"alice@example.com\""
        );
    }
}
