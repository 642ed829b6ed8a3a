//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use bbs_core::{Email, User, UserId};

/// Session-stored user identity.
///
/// `is_admin` is a snapshot taken at sign-in and only drives navigation.
/// Admin routes re-read the stored profile on every request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Profile document id.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
    /// First name, for the header greeting.
    pub first_name: String,
    /// Whether the profile had the admin flag at sign-in.
    pub is_admin: bool,
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            is_admin: user.is_admin,
        }
    }
}

/// Session keys.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the cart lines.
    pub const CART: &str = "cart";

    /// Key for pending flash messages.
    pub const FLASH: &str = "flash";
}
