//! Rounding and grouping shared by the pricing helpers.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds to cents; a trailing 5 rounds away from zero.
///
/// ```
/// use rust_decimal_macros::dec;
/// use checkout_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(74.985)), dec!(74.99));
/// assert_eq!(round_half_up(dec!(-0.005)), dec!(-0.01));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Inserts `separator` between every group of three digits of an unsigned
/// integer string.
///
/// # Examples
///
/// ```
/// use checkout_core::calculations::common::group_thousands;
///
/// assert_eq!(group_thousands("1234567", ','), "1,234,567");
/// assert_eq!(group_thousands("999", ','), "999");
/// ```
pub fn group_thousands(
    digits: &str,
    separator: char,
) -> String {
    let len = digits.chars().count();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(c);
    }
    grouped
}
