use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::{CheckoutState, PaymentMethod};

/// One page of the checkout wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WizardStep {
    Contents,
    PaymentType,
    CreditCard,
    BankAccount,
    CashOnDelivery,
    InvoiceAddress,
    DeliveryAddress,
    DeliveryTime,
    AdditionalServices,
}

impl WizardStep {
    pub fn id(&self) -> &'static str {
        match self {
            Self::Contents => "contentsStep",
            Self::PaymentType => "paymentTypeStep",
            Self::CreditCard => "creditCardStep",
            Self::BankAccount => "bankAccountStep",
            Self::CashOnDelivery => "cashOnDeliveryStep",
            Self::InvoiceAddress => "invoiceStep",
            Self::DeliveryAddress => "deliveryAddressStep",
            Self::DeliveryTime => "deliveryTypeStep",
            Self::AdditionalServices => "assemblyChoiceStep",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::all().iter().copied().find(|step| step.id() == id)
    }

    pub fn all() -> &'static [WizardStep] {
        &[
            WizardStep::Contents,
            WizardStep::PaymentType,
            WizardStep::CreditCard,
            WizardStep::BankAccount,
            WizardStep::CashOnDelivery,
            WizardStep::InvoiceAddress,
            WizardStep::DeliveryAddress,
            WizardStep::DeliveryTime,
            WizardStep::AdditionalServices,
        ]
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Contents => "Items",
            Self::PaymentType => "Payment Type",
            Self::CreditCard => "Credit Card Info",
            Self::BankAccount => "Bank Account Info",
            Self::CashOnDelivery => "Cash on Delivery",
            Self::InvoiceAddress => "Invoice Address",
            Self::DeliveryAddress => "Delivery Address",
            Self::DeliveryTime => "Delivery Time",
            Self::AdditionalServices => "Additional Services",
        }
    }

    /// Whether the step may be left before anything has been entered.
    ///
    /// Steps with required inputs start out blocked and are unlocked by the
    /// validator.
    pub fn initially_validated(&self) -> bool {
        matches!(
            self,
            Self::Contents | Self::PaymentType | Self::BankAccount | Self::AdditionalServices
        )
    }

    /// The page collecting details for `method`.
    pub fn for_payment(method: PaymentMethod) -> Self {
        match method {
            PaymentMethod::CreditCard => Self::CreditCard,
            PaymentMethod::BankTransfer => Self::BankAccount,
            PaymentMethod::CashOnDelivery => Self::CashOnDelivery,
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Ordered steps the wizard walks through for the current selections.
///
/// The payment method decides which details page follows the payment type,
/// and the delivery address page is only included when the customer ships
/// somewhere other than the invoice address.
pub fn route(state: &CheckoutState) -> Vec<WizardStep> {
    let mut steps = vec![
        WizardStep::Contents,
        WizardStep::PaymentType,
        WizardStep::for_payment(state.payment_method),
        WizardStep::InvoiceAddress,
    ];
    if state.different_delivery_address {
        steps.push(WizardStep::DeliveryAddress);
    }
    steps.push(WizardStep::DeliveryTime);
    steps.push(WizardStep::AdditionalServices);
    steps
}

/// The step that follows `step` for the current selections, if any.
pub fn next_after(
    step: WizardStep,
    state: &CheckoutState,
) -> Option<WizardStep> {
    let steps = route(state);
    let position = steps.iter().position(|s| *s == step)?;
    steps.get(position + 1).copied()
}
