use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[default]
    CreditCard,
    BankTransfer,
    CashOnDelivery,
}

impl PaymentMethod {
    pub fn all() -> &'static [PaymentMethod] {
        &[
            PaymentMethod::CreditCard,
            PaymentMethod::BankTransfer,
            PaymentMethod::CashOnDelivery,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreditCard => "Credit Card",
            Self::BankTransfer => "Bank Transfer",
            Self::CashOnDelivery => "Cash on Delivery",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "Credit Card" => Some(Self::CreditCard),
            "Bank Transfer" => Some(Self::BankTransfer),
            "Cash on Delivery" => Some(Self::CashOnDelivery),
            _ => None,
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeliveryMethod {
    #[default]
    StandardDelivery,
    ExpressDelivery,
}

impl DeliveryMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StandardDelivery => "Standard Delivery",
            Self::ExpressDelivery => "Express Delivery",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "Standard Delivery" => Some(Self::StandardDelivery),
            "Express Delivery" => Some(Self::ExpressDelivery),
            _ => None,
        }
    }
}

impl fmt::Display for DeliveryMethod {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn default_payment_method_is_credit_card() {
        assert_eq!(PaymentMethod::default(), PaymentMethod::CreditCard);
    }

    #[test]
    fn payment_method_parses_display_names() {
        for method in PaymentMethod::all() {
            assert_eq!(PaymentMethod::parse(method.as_str()), Some(*method));
        }
        assert_eq!(PaymentMethod::parse("Cheque"), None);
    }

    #[test]
    fn delivery_method_parses_display_names() {
        assert_eq!(
            DeliveryMethod::parse(" Express Delivery "),
            Some(DeliveryMethod::ExpressDelivery)
        );
        assert_eq!(DeliveryMethod::parse("Drone"), None);
        assert_eq!(
            DeliveryMethod::default().to_string(),
            "Standard Delivery"
        );
    }
}
