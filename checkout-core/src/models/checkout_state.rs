//! Selections collected by the checkout wizard.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{
    Address, CashOnDeliveryContact, CreditCard, DeliveryMethod, PaymentMethod, SelectedSlot,
    ServiceSelection,
};

/// Everything the customer has entered so far.
///
/// Lives for one checkout session. Nothing here is persisted; the whole
/// record is reset to its defaults when the order is submitted or cancelled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutState {
    pub payment_method: PaymentMethod,
    pub delivery_method: DeliveryMethod,

    /// When false the invoice address doubles as the delivery address and
    /// `delivery_address` is never validated.
    pub different_delivery_address: bool,
    pub invoice_address: Address,
    pub delivery_address: Address,

    // Payment details; only the record matching `payment_method` is checked.
    pub credit_card: CreditCard,
    pub cash_on_delivery: CashOnDeliveryContact,

    pub delivery_slot: SelectedSlot,
    pub services: ServiceSelection,

    /// Mirrors `services.any_selected()` once the wizard is completed.
    pub additional_service_selected: bool,

    // Calculated values
    pub subtotal: Decimal,
    pub total: Decimal,
}

impl CheckoutState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Address the order ships to.
    pub fn shipping_address(&self) -> &Address {
        if self.different_delivery_address {
            &self.delivery_address
        } else {
            &self.invoice_address
        }
    }

    /// Restore every field to its initial value.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Last confirmed value of each selection that needs a discard confirmation
/// once the wizard has moved past it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryBuffer {
    pub payment_method: Option<PaymentMethod>,
    pub different_delivery_address: Option<bool>,
}

impl HistoryBuffer {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
