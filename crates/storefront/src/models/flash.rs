//! One-shot notifications shown as toasts on the next rendered page.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use super::session::keys;

/// Toast style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashKind {
    Success,
    Error,
}

impl FlashKind {
    /// CSS modifier for the toast.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Success => "toast-success",
            Self::Error => "toast-error",
        }
    }
}

/// A queued toast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub title: String,
    pub description: String,
}

impl Flash {
    #[must_use]
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            title: title.into(),
            description: description.into(),
        }
    }

    #[must_use]
    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            title: title.into(),
            description: description.into(),
        }
    }

    /// Queue this flash for the next rendered page.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be read or written.
    pub async fn push(self, session: &Session) -> Result<(), tower_sessions::session::Error> {
        let mut pending: Vec<Self> = session.get(keys::FLASH).await?.unwrap_or_default();
        pending.push(self);
        session.insert(keys::FLASH, pending).await
    }

    /// Remove and return every queued flash.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be read or written.
    pub async fn take_all(session: &Session) -> Result<Vec<Self>, tower_sessions::session::Error> {
        Ok(session
            .remove::<Vec<Self>>(keys::FLASH)
            .await?
            .unwrap_or_default())
    }
}
