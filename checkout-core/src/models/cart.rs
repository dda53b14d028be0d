use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Merging two entries would push a quantity past `u32::MAX`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("quantity of '{product_id}' exceeds {}", u32::MAX)]
pub struct QuantityOverflow {
    pub product_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
    pub price: Decimal,
    pub quantity: u32,
}

impl CartEntry {
    pub fn new(
        price: Decimal,
        quantity: u32,
    ) -> Self {
        Self { price, quantity }
    }

    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Contents of the shopping cart as seen by the checkout.
///
/// Entries are keyed by product id. `subtotal` is the value last shown to
/// the customer and is written back by the checkout when it formats the
/// subtotal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSnapshot {
    pub entries: BTreeMap<String, CartEntry>,
    pub subtotal: Decimal,
}

impl CartSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `entry`, merging quantities when the product is already present.
    ///
    /// The cart is left untouched when the merged quantity overflows.
    pub fn add(
        &mut self,
        product_id: impl Into<String>,
        entry: CartEntry,
    ) -> Result<(), QuantityOverflow> {
        let product_id = product_id.into();
        match self.entries.get_mut(&product_id) {
            Some(existing) => {
                let Some(quantity) = existing.quantity.checked_add(entry.quantity) else {
                    return Err(QuantityOverflow { product_id });
                };
                existing.quantity = quantity;
                existing.price = entry.price;
            }
            None => {
                self.entries.insert(product_id, entry);
            }
        }
        Ok(())
    }

    /// Builder form of [`CartSnapshot::add`]; replaces any entry already
    /// held for the product instead of merging.
    pub fn with_entry(
        mut self,
        product_id: impl Into<String>,
        price: Decimal,
        quantity: u32,
    ) -> Self {
        self.entries
            .insert(product_id.into(), CartEntry::new(price, quantity));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Empties the cart and zeroes the subtotal.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.subtotal = Decimal::ZERO;
    }
}
