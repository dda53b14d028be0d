use serde::{Deserialize, Serialize};

/// Postal address entered on the invoice or delivery step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    pub address: String,
    pub city: String,
    pub zip_code: String,
    pub country: String,
    /// Free text for the courier; never required.
    pub note: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreditCard {
    pub holder_name: String,
    pub card_number: String,
    pub security_code: String,
    /// `MM/YY` or `MM/YYYY`.
    pub expiry: String,
}

impl CreditCard {
    /// Card number with everything but the last four digits masked.
    pub fn masked_number(&self) -> String {
        let digits: Vec<char> = self
            .card_number
            .chars()
            .filter(char::is_ascii_digit)
            .collect();
        let visible = digits.len().saturating_sub(4);
        digits
            .iter()
            .enumerate()
            .map(|(i, c)| if i < visible { '*' } else { *c })
            .collect()
    }
}

/// Contact for the courier when paying cash on delivery.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CashOnDeliveryContact {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub email: String,
}
