//! Order status.

use serde::{Deserialize, Serialize};

/// Order status as stored on order documents.
///
/// Orders are created with a status and never advanced programmatically;
/// there is no transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    #[default]
    Pending,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// All statuses in display order.
    pub const ALL: [Self; 4] = [
        Self::Pending,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }

    /// CSS modifier used for status badges.
    #[must_use]
    pub const fn badge_class(&self) -> &'static str {
        match self {
            Self::Pending => "badge-pending",
            Self::Shipped => "badge-shipped",
            Self::Delivered => "badge-delivered",
            Self::Cancelled => "badge-cancelled",
        }
    }

    /// Whether the order counts toward revenue.
    #[must_use]
    pub const fn counts_as_revenue(&self) -> bool {
        !matches!(self, Self::Cancelled)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Shipped" => Ok(Self::Shipped),
            "Delivered" => Ok(Self::Delivered),
            "Cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_format() {
        let json = serde_json::to_string(&OrderStatus::Delivered).unwrap();
        assert_eq!(json, "\"Delivered\"");

        let parsed: OrderStatus = serde_json::from_str("\"Cancelled\"").unwrap();
        assert_eq!(parsed, OrderStatus::Cancelled);
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        assert!("Refunded".parse::<OrderStatus>().is_err());
        assert_eq!("Shipped".parse::<OrderStatus>(), Ok(OrderStatus::Shipped));
    }

    #[test]
    fn test_cancelled_is_not_revenue() {
        assert!(!OrderStatus::Cancelled.counts_as_revenue());
        assert!(OrderStatus::Pending.counts_as_revenue());
    }
}
