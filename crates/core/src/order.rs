//! Customer orders.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::CartTotals;
use crate::types::{OrderId, OrderStatus, Price, UserId};
use crate::user::User;

/// An order document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    /// Owner of the order. Orders imported without an owner only show up in
    /// the admin console.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    pub customer_name: String,
    /// Image id of the customer's avatar at the time of ordering.
    #[serde(default)]
    pub customer_avatar: String,
    pub date: NaiveDate,
    pub status: OrderStatus,
    pub total: Decimal,
    pub item_count: u32,
}

impl Order {
    #[must_use]
    pub fn total_display(&self) -> String {
        Price::usd(self.total).display()
    }

    #[must_use]
    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        self.user_id.as_ref() == Some(user_id)
    }
}

/// An order that has not been written to the store yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    pub customer_name: String,
    pub customer_avatar: String,
    pub date: NaiveDate,
    pub status: OrderStatus,
    pub total: Decimal,
    pub item_count: u32,
}

impl NewOrder {
    /// A pending order for `user` covering the given cart totals.
    #[must_use]
    pub fn from_cart(user: &User, totals: &CartTotals, date: NaiveDate) -> Self {
        Self {
            user_id: Some(user.id.clone()),
            customer_name: user.full_name(),
            customer_avatar: user.avatar.clone(),
            date,
            status: OrderStatus::Pending,
            total: totals.total,
            item_count: totals.item_count,
        }
    }

    #[must_use]
    pub fn with_id(self, id: OrderId) -> Order {
        Order {
            id,
            user_id: self.user_id,
            customer_name: self.customer_name,
            customer_avatar: self.customer_avatar,
            date: self.date,
            status: self.status,
            total: self.total,
            item_count: self.item_count,
        }
    }
}

/// Revenue across orders, excluding cancelled ones.
#[must_use]
pub fn revenue(orders: &[Order]) -> Decimal {
    orders
        .iter()
        .filter(|o| o.status.counts_as_revenue())
        .map(|o| o.total)
        .sum()
}
