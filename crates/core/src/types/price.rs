//! Type-safe price representation using decimal arithmetic.
//!
//! Every price in the marketplace is in Brazilian reais; the backend
//! stores plain numerics, so there is no currency column to carry around.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price in Brazilian reais (BRL).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price {
    /// Amount in reais (not centavos).
    pub amount: Decimal,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self { amount }
    }

    /// Format for display (e.g., "R$ 4.50"), always with two decimals.
    #[must_use]
    pub fn display(&self) -> String {
        format!("R$ {:.2}", self.amount)
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_display_pads_decimals() {
        let price = Price::new(Decimal::new(50, 2)); // 0.50
        assert_eq!(price.display(), "R$ 0.50");

        let price = Price::new(Decimal::new(25, 0)); // 25
        assert_eq!(price.display(), "R$ 25.00");
    }

    #[test]
    fn test_serde_is_transparent() {
        let price = Price::new(Decimal::new(450, 2)); // 4.50
        let json = serde_json::to_string(&price).unwrap();
        let back: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(back.display(), "R$ 4.50");
    }
}
