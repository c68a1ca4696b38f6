//! Percentage value object (0-100 scale).

use serde::{Deserialize, Serialize};
use std::fmt;

/// A whole-number value between 0 and 100 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percentage(u8);

impl Percentage {
    /// Zero percent.
    pub const ZERO: Self = Self(0);

    /// Creates a new Percentage, clamping to valid range.
    pub fn new(value: u8) -> Self {
        Self(value.min(100))
    }

    /// Computes `round(100 * part / whole)`, rounding halves up.
    ///
    /// A zero `whole` yields zero. Ratios above one clamp to 100.
    pub fn from_ratio(part: u64, whole: u64) -> Self {
        if whole == 0 {
            return Self::ZERO;
        }
        let part = u128::from(part);
        let whole = u128::from(whole);
        let rounded = (200 * part + whole) / (2 * whole);
        Self(rounded.min(100) as u8)
    }

    /// Returns the value as u8.
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl Default for Percentage {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn percentage_new_clamps_to_100() {
        assert_eq!(Percentage::new(50).value(), 50);
        assert_eq!(Percentage::new(255).value(), 100);
    }

    #[test]
    fn from_ratio_rounds_to_nearest() {
        assert_eq!(Percentage::from_ratio(4, 5).value(), 80);
        assert_eq!(Percentage::from_ratio(1, 3).value(), 33);
        assert_eq!(Percentage::from_ratio(2, 3).value(), 67);
    }

    #[test]
    fn from_ratio_rounds_half_up() {
        // 1/8 = 12.5%
        assert_eq!(Percentage::from_ratio(1, 8).value(), 13);
    }

    #[test]
    fn from_ratio_of_zero_whole_is_zero() {
        assert_eq!(Percentage::from_ratio(0, 0), Percentage::ZERO);
        assert_eq!(Percentage::from_ratio(3, 0), Percentage::ZERO);
    }

    #[test]
    fn displays_with_percent_sign() {
        assert_eq!(Percentage::new(80).to_string(), "80%");
    }

    proptest! {
        #[test]
        fn from_ratio_stays_within_bounds(whole in 1u64..10_000, part_seed in 0u64..10_000) {
            let part = part_seed % (whole + 1);
            let pct = Percentage::from_ratio(part, whole).value();
            prop_assert!(pct <= 100);
            let exact = 100.0 * part as f64 / whole as f64;
            prop_assert!((f64::from(pct) - exact).abs() <= 0.5);
        }
    }
}
