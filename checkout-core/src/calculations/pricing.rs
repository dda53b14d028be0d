//! Subtotal and total price calculations for the order summary.
//!
//! Prices travel through the checkout in two shapes: as [`Decimal`] values
//! and as display strings such as `"1,234.50"` or `"$20"`. The functions
//! here convert between the two and derive the order total:
//!
//! | Step | Value |
//! |------|-------|
//! | 1    | Subtotal: Σ price × quantity over the cart, rounded to cents |
//! | 2    | Delivery fee of the selected slot |
//! | 3    | Fee of every selected add-on service |
//! | 4    | Total: Line 1 + Line 2 + Line 3 |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use checkout_core::calculations::pricing::{compute_subtotal, compute_total};
//! use checkout_core::{CartSnapshot, ServiceFees, ServiceSelection};
//!
//! let cart = CartSnapshot::new()
//!     .with_entry("A", dec!(10), 2)
//!     .with_entry("B", dec!(5), 1);
//! let subtotal = compute_subtotal(&cart);
//!
//! let services = ServiceSelection {
//!     assembly: true,
//!     ..Default::default()
//! };
//! let total = compute_total(subtotal, dec!(20), &services, &ServiceFees::default());
//!
//! assert_eq!(subtotal, dec!(25.00));
//! assert_eq!(total, dec!(74.99));
//! ```

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, warn};

use crate::calculations::common::{group_thousands, round_half_up};
use crate::models::{AdditionalService, CartSnapshot, ServiceFees, ServiceSelection};

/// Errors that can occur when reading a price from display text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PriceParseError {
    /// The text held no digits at all.
    #[error("price is empty")]
    Empty,

    /// The text could not be read as a decimal number.
    #[error("invalid price '{input}': {reason}")]
    Invalid { input: String, reason: String },
}

/// Strips the currency sign, whitespace and thousands separators.
fn normalize_price_input(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, '$' | ',') && !c.is_whitespace())
        .collect()
}

/// Reads a price from display text.
///
/// Accepts a leading `$` and `,` thousands separators, so both the calendar
/// labels (`"$20"`) and formatted subtotals (`"1,234.50"`) parse.
///
/// # Errors
///
/// * [`PriceParseError::Empty`] – nothing but separators or whitespace.
/// * [`PriceParseError::Invalid`] – anything that is not a decimal number.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use checkout_core::calculations::pricing::parse_price;
///
/// assert_eq!(parse_price("$20"), Ok(dec!(20)));
/// assert_eq!(parse_price("1,234.50"), Ok(dec!(1234.50)));
/// assert!(parse_price("Not Available - Full").is_err());
/// ```
pub fn parse_price(s: &str) -> Result<Decimal, PriceParseError> {
    let normalized = normalize_price_input(s);
    if normalized.is_empty() {
        return Err(PriceParseError::Empty);
    }
    normalized
        .parse::<Decimal>()
        .map_err(|e| PriceParseError::Invalid {
            input: s.to_string(),
            reason: e.to_string(),
        })
}

/// Formats a price with exactly two decimals and `,` thousands grouping.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use checkout_core::calculations::pricing::format_price;
///
/// assert_eq!(format_price(dec!(1234.5)), "1,234.50");
/// assert_eq!(format_price(dec!(0)), "0.00");
/// assert_eq!(format_price(dec!(-1000)), "-1,000.00");
/// ```
pub fn format_price(value: Decimal) -> String {
    let rounded = round_half_up(value);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let text = format!("{:.2}", rounded.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    format!("{sign}{}.{fraction}", group_thousands(whole, ','))
}

/// Sums price × quantity over every cart entry, rounded to cents.
pub fn compute_subtotal(cart: &CartSnapshot) -> Decimal {
    let subtotal: Decimal = cart.entries.values().map(|entry| entry.line_total()).sum();
    round_half_up(subtotal)
}

/// Sum of the fees of every selected add-on service.
pub fn service_fees_total(
    services: &ServiceSelection,
    fees: &ServiceFees,
) -> Decimal {
    AdditionalService::all()
        .iter()
        .filter(|service| services.is_selected(**service))
        .map(|service| fees.fee(*service))
        .sum()
}

/// Calculates the order total.
///
/// # Arguments
///
/// * `subtotal` - Cart subtotal
/// * `slot_fee` - Delivery fee of the selected slot
/// * `services` - Which add-on services are selected
/// * `fees` - Fee of each add-on service
pub fn compute_total(
    subtotal: Decimal,
    slot_fee: Decimal,
    services: &ServiceSelection,
    fees: &ServiceFees,
) -> Decimal {
    let extras = service_fees_total(services, fees);
    let total = round_half_up(subtotal + slot_fee + extras);
    debug!(
        subtotal = %subtotal,
        slot_fee = %slot_fee,
        extras = %extras,
        total = %total,
        "computed order total"
    );
    total
}

/// Calculates the order total from display strings.
///
/// Used where the subtotal and slot fee are only available as the text shown
/// to the customer. If either cannot be parsed the total is zero and a
/// warning is logged; no error leaves this function.
///
/// # Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use rust_decimal_macros::dec;
/// use checkout_core::calculations::pricing::compute_total_from_text;
/// use checkout_core::{ServiceFees, ServiceSelection};
///
/// let none = ServiceSelection::default();
/// let fees = ServiceFees::default();
///
/// assert_eq!(compute_total_from_text("1,000.00", "$15", &none, &fees), dec!(1015.00));
/// assert_eq!(compute_total_from_text("1,000.00", "", &none, &fees), Decimal::ZERO);
/// ```
pub fn compute_total_from_text(
    subtotal: &str,
    slot_fee: &str,
    services: &ServiceSelection,
    fees: &ServiceFees,
) -> Decimal {
    let subtotal = match parse_price(subtotal) {
        Ok(value) => value,
        Err(e) => {
            warn!(input = %subtotal, "subtotal is not a number; total set to zero: {}", e);
            return Decimal::ZERO;
        }
    };
    let slot_fee = match parse_price(slot_fee) {
        Ok(value) => value,
        Err(e) => {
            warn!(input = %slot_fee, "slot fee is not a number; total set to zero: {}", e);
            return Decimal::ZERO;
        }
    };
    compute_total(subtotal, slot_fee, services, fees)
}
