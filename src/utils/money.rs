//! Price rounding helpers
//!
//! All monetary values are stored with exactly 2 decimal places.

use rust_decimal::{Decimal, RoundingStrategy};

/// Round a monetary amount to 2 decimal places (half away from zero)
pub fn to_fixed_2(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().expect("decimal literal")
    }

    #[test]
    fn test_rounds_to_two_places() {
        assert_eq!(to_fixed_2(dec("9.505")), dec("9.51"));
        assert_eq!(to_fixed_2(dec("9.504")), dec("9.50"));
        assert_eq!(to_fixed_2(dec("12")), dec("12"));
    }

    #[test]
    fn test_midpoint_rounds_away_from_zero() {
        assert_eq!(to_fixed_2(dec("2.125")), dec("2.13"));
        assert_eq!(to_fixed_2(dec("-2.125")), dec("-2.13"));
    }
}
