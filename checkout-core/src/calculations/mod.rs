//! Price calculations for the checkout summary.

pub mod common;
pub mod pricing;

pub use pricing::{
    PriceParseError, compute_subtotal, compute_total, compute_total_from_text, format_price,
    parse_price, service_fees_total,
};
