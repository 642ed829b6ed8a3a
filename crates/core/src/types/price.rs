//! Money in the store currency.
//!
//! Catalog documents carry bare decimal amounts in US dollars. [`Price`]
//! wraps one so templates format every amount the same way.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// An amount in US dollars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price {
    pub amount: Decimal,
}

impl Price {
    pub const SYMBOL: &'static str = "$";

    #[must_use]
    pub const fn usd(amount: Decimal) -> Self {
        Self { amount }
    }

    /// Two decimal places, half-cents rounded away from zero (`$12.35`).
    #[must_use]
    pub fn display(&self) -> String {
        let cents = self
            .amount
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        format!("{}{cents:.2}", Self::SYMBOL)
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_pads_to_cents() {
        assert_eq!(Price::usd(Decimal::new(349, 0)).display(), "$349.00");
        assert_eq!(Price::usd(Decimal::new(79999, 2)).display(), "$799.99");
    }

    #[test]
    fn test_display_rounds_half_cents_up() {
        assert_eq!(Price::usd(Decimal::new(12345, 3)).display(), "$12.35");
        assert_eq!(Price::usd(Decimal::new(12325, 3)).display(), "$12.33");
        assert_eq!(Price::usd(Decimal::new(12344, 3)).display(), "$12.34");
    }

    #[test]
    fn test_display_matches_to_string() {
        let price = Price::usd(Decimal::new(1500, 2));
        assert_eq!(price.to_string(), "$15.00");
    }
}
