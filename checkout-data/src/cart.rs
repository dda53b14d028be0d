//! Loader for cart snapshots.
//!
//! ## CSV Format
//!
//! | Column       | Required | Type    | Notes                          |
//! |--------------|----------|---------|--------------------------------|
//! | `product_id` | yes      | string  | e.g. `HT-1000`                 |
//! | `price`      | yes      | decimal | unit price, not negative       |
//! | `quantity`   | yes      | integer | at least 1                     |
//!
//! Rows for the same product are merged by adding their quantities.

use std::io::Read;
use std::path::Path;

use checkout_core::calculations::compute_subtotal;
use checkout_core::{CartEntry, CartSnapshot};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartLoadError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("cannot read cart '{path}': {message}")]
    Io { path: String, message: String },

    #[error("negative price for '{product_id}' on row {row}")]
    NegativePrice { product_id: String, row: usize },

    #[error("zero quantity for '{product_id}' on row {row}")]
    ZeroQuantity { product_id: String, row: usize },

    #[error("quantity of '{product_id}' overflows on row {row}")]
    QuantityOverflow { product_id: String, row: usize },
}

impl From<csv::Error> for CartLoadError {
    fn from(err: csv::Error) -> Self {
        CartLoadError::CsvParse(err.to_string())
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CartRecord {
    pub product_id: String,
    pub price: Decimal,
    pub quantity: u32,
}

pub struct CartLoader;

impl CartLoader {
    /// Parse a cart from a CSV reader. The snapshot's subtotal is computed
    /// from the loaded entries.
    pub fn parse<R: Read>(reader: R) -> Result<CartSnapshot, CartLoadError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut cart = CartSnapshot::new();
        for (idx, result) in csv_reader.deserialize::<CartRecord>().enumerate() {
            let record = result?;
            let row = idx + 1;
            if record.price.is_sign_negative() && !record.price.is_zero() {
                return Err(CartLoadError::NegativePrice {
                    product_id: record.product_id,
                    row,
                });
            }
            if record.quantity == 0 {
                return Err(CartLoadError::ZeroQuantity {
                    product_id: record.product_id,
                    row,
                });
            }
            cart.add(record.product_id, CartEntry::new(record.price, record.quantity))
                .map_err(|overflow| CartLoadError::QuantityOverflow {
                    product_id: overflow.product_id,
                    row,
                })?;
        }
        cart.subtotal = compute_subtotal(&cart);
        Ok(cart)
    }

    pub fn load_from_str(input: &str) -> Result<CartSnapshot, CartLoadError> {
        Self::parse(input.as_bytes())
    }

    pub fn load_from_file(path: &Path) -> Result<CartSnapshot, CartLoadError> {
        let contents = std::fs::read_to_string(path).map_err(|e| CartLoadError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::load_from_str(&contents)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn loads_entries_and_subtotal() {
        let csv = "product_id,price,quantity\nA,10,2\nB,5,1\n";

        let cart = CartLoader::load_from_str(csv).unwrap();

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.entries["A"], CartEntry::new(dec!(10), 2));
        assert_eq!(cart.subtotal, dec!(25.00));
    }

    #[test]
    fn repeated_product_is_merged() {
        let csv = "product_id,price,quantity\nA,10,2\nA,10,3\n";

        let cart = CartLoader::load_from_str(csv).unwrap();

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.entries["A"].quantity, 5);
    }

    #[test]
    fn merged_quantity_overflow_is_rejected() {
        let csv = "product_id,price,quantity\nA,1,4294967295\nA,1,1\n";

        assert_eq!(
            CartLoader::load_from_str(csv),
            Err(CartLoadError::QuantityOverflow {
                product_id: "A".to_string(),
                row: 2,
            })
        );
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let csv = "product_id,price,quantity\nA,10,2\nB,5,0\n";

        assert_eq!(
            CartLoader::load_from_str(csv),
            Err(CartLoadError::ZeroQuantity {
                product_id: "B".to_string(),
                row: 2,
            })
        );
    }

    #[test]
    fn negative_price_is_rejected() {
        let csv = "product_id,price,quantity\nA,-1.50,1\n";

        assert!(matches!(
            CartLoader::load_from_str(csv),
            Err(CartLoadError::NegativePrice { row: 1, .. })
        ));
    }

    #[test]
    fn header_only_gives_empty_cart() {
        let cart = CartLoader::load_from_str("product_id,price,quantity\n").unwrap();

        assert!(cart.is_empty());
        assert_eq!(cart.subtotal, Decimal::ZERO);
    }
}
