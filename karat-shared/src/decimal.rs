//! Decimal aliases used across the workspace.
//!
//! Weights are grams and money is in the shop currency. Both are carried as
//! [`Decimal`] so that rounding to a fixed number of places is exact.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Grams.
pub type Weight = Decimal;

/// Shop currency.
pub type Money = Decimal;

/// A percentage expressed on the 0..100 scale (`10` means ten percent).
pub type Percent = Decimal;

/// How midpoints are resolved when rounding to a fixed scale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// 0.125 -> 0.13
    #[default]
    HalfUp,
    /// 0.125 -> 0.12
    Bankers,
}

impl RoundingMode {
    fn strategy(self) -> RoundingStrategy {
        match self {
            RoundingMode::HalfUp => RoundingStrategy::MidpointAwayFromZero,
            RoundingMode::Bankers => RoundingStrategy::MidpointNearestEven,
        }
    }

    /// Round `value` to `scale` decimal places and pin the scale, so `10`
    /// at scale 3 becomes `10.000`.
    pub fn round(self, value: Decimal, scale: u32) -> Decimal {
        let mut rounded = value.round_dp_with_strategy(scale, self.strategy());
        rounded.rescale(scale);
        rounded
    }
}

/// Percentage of `base`, i.e. `base * pct / 100`. Saturates at
/// [`Decimal::MAX`] when the product does not fit.
pub fn percent_of(base: Decimal, pct: Percent) -> Decimal {
    base.checked_mul(pct)
        .map(|product| product / Decimal::ONE_HUNDRED)
        .unwrap_or(Decimal::MAX)
}
