//! Customer profiles.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{Email, ProductId, UserId};

/// A user profile document.
///
/// Credentials live elsewhere; this is what pages and the admin console
/// read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub joined: NaiveDate,
    /// Image id.
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub order_count: u32,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub favorite_product_ids: Vec<ProductId>,
}

impl User {
    /// A freshly signed-up, non-admin customer.
    #[must_use]
    pub fn new_customer(
        id: UserId,
        first_name: &str,
        last_name: &str,
        email: Email,
        joined: NaiveDate,
        avatar: &str,
    ) -> Self {
        Self {
            id,
            first_name: first_name.trim().to_owned(),
            last_name: last_name.trim().to_owned(),
            email,
            joined,
            avatar: avatar.to_owned(),
            order_count: 0,
            is_admin: false,
            favorite_product_ids: Vec::new(),
        }
    }

    #[must_use]
    pub fn full_name(&self) -> String {
        match (self.first_name.is_empty(), self.last_name.is_empty()) {
            (false, false) => format!("{} {}", self.first_name, self.last_name),
            (false, true) => self.first_name.clone(),
            (true, false) => self.last_name.clone(),
            (true, true) => self.email.local_part().to_owned(),
        }
    }

    /// Initials shown in avatar fallbacks.
    #[must_use]
    pub fn initials(&self) -> String {
        self.full_name()
            .split_whitespace()
            .filter_map(|w| w.chars().next())
            .take(2)
            .flat_map(char::to_uppercase)
            .collect()
    }

    #[must_use]
    pub fn is_favorite(&self, product_id: &ProductId) -> bool {
        self.favorite_product_ids.contains(product_id)
    }

    /// Add or remove a favorite. Returns `true` if the product is now a
    /// favorite.
    pub fn toggle_favorite(&mut self, product_id: &ProductId) -> bool {
        if let Some(pos) = self
            .favorite_product_ids
            .iter()
            .position(|id| id == product_id)
        {
            self.favorite_product_ids.remove(pos);
            false
        } else {
            self.favorite_product_ids.push(product_id.clone());
            true
        }
    }
}
