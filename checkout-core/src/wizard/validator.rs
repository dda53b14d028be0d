//! Required-input checks for the wizard steps.
//!
//! Four steps collect free text: credit card, cash on delivery, invoice
//! address and delivery address. Each has a fixed list of required fields
//! and every field has a format rule. A step is complete when all of its
//! fields pass and no validation error is pending anywhere in the checkout.
//!
//! | Step            | Fields                                            |
//! |-----------------|---------------------------------------------------|
//! | CreditCard      | holder name, card number, security code, expiry   |
//! | CashOnDelivery  | first name, last name, phone number, email        |
//! | InvoiceAddress  | address, city, zip code, country                  |
//! | DeliveryAddress | address, city, zip code, country (if different)   |

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::step::WizardStep;
use crate::models::CheckoutState;
use crate::ports::MessageSink;

static CARD_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{12,19}$").expect("Invalid regex"));
static SECURITY_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{3,4}$").expect("Invalid regex"));
static EXPIRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(0[1-9]|1[0-2])/(\d{2}|\d{4})$").expect("Invalid regex"));
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid regex"));
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9+\-()/ ]+$").expect("Invalid regex"));

const MIN_PHONE_DIGITS: usize = 5;

/// An input of one of the validated steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldId {
    CreditCardHolderName,
    CreditCardNumber,
    CreditCardSecurityCode,
    CreditCardExpiry,
    CashOnDeliveryFirstName,
    CashOnDeliveryLastName,
    CashOnDeliveryPhoneNumber,
    CashOnDeliveryEmail,
    InvoiceAddress,
    InvoiceCity,
    InvoiceZipCode,
    InvoiceCountry,
    DeliveryAddress,
    DeliveryCity,
    DeliveryZipCode,
    DeliveryCountry,
}

/// Format rule applied to a field once it is non-empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    /// Any non-blank text.
    Text,
    CardNumber,
    SecurityCode,
    Expiry,
    Email,
    Phone,
}

impl FieldRule {
    pub fn accepts(
        &self,
        value: &str,
    ) -> bool {
        match self {
            Self::Text => !value.is_empty(),
            Self::CardNumber => {
                let digits: String = value.chars().filter(|c| *c != ' ' && *c != '-').collect();
                CARD_NUMBER_RE.is_match(&digits)
            }
            Self::SecurityCode => SECURITY_CODE_RE.is_match(value),
            Self::Expiry => EXPIRY_RE.is_match(value),
            Self::Email => EMAIL_RE.is_match(value),
            Self::Phone => {
                PHONE_RE.is_match(value)
                    && value.chars().filter(char::is_ascii_digit).count() >= MIN_PHONE_DIGITS
            }
        }
    }
}

impl FieldId {
    /// Id of the input on screen; validation messages target it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreditCardHolderName => "creditCardHolderName",
            Self::CreditCardNumber => "creditCardNumber",
            Self::CreditCardSecurityCode => "creditCardSecurityNumber",
            Self::CreditCardExpiry => "creditCardExpirationDate",
            Self::CashOnDeliveryFirstName => "cashOnDeliveryName",
            Self::CashOnDeliveryLastName => "cashOnDeliveryLastName",
            Self::CashOnDeliveryPhoneNumber => "cashOnDeliveryPhoneNumber",
            Self::CashOnDeliveryEmail => "cashOnDeliveryEmail",
            Self::InvoiceAddress => "invoiceAddressAddress",
            Self::InvoiceCity => "invoiceAddressCity",
            Self::InvoiceZipCode => "invoiceAddressZip",
            Self::InvoiceCountry => "invoiceAddressCountry",
            Self::DeliveryAddress => "deliveryAddressAddress",
            Self::DeliveryCity => "deliveryAddressCity",
            Self::DeliveryZipCode => "deliveryAddressZip",
            Self::DeliveryCountry => "deliveryAddressCountry",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::CreditCardHolderName => "Name on Card",
            Self::CreditCardNumber => "Card Number",
            Self::CreditCardSecurityCode => "Security Code",
            Self::CreditCardExpiry => "Expiration Date",
            Self::CashOnDeliveryFirstName => "First Name",
            Self::CashOnDeliveryLastName => "Last Name",
            Self::CashOnDeliveryPhoneNumber => "Phone Number",
            Self::CashOnDeliveryEmail => "Email",
            Self::InvoiceAddress | Self::DeliveryAddress => "Address",
            Self::InvoiceCity | Self::DeliveryCity => "City",
            Self::InvoiceZipCode | Self::DeliveryZipCode => "ZIP Code",
            Self::InvoiceCountry | Self::DeliveryCountry => "Country",
        }
    }

    pub fn rule(&self) -> FieldRule {
        match self {
            Self::CreditCardNumber => FieldRule::CardNumber,
            Self::CreditCardSecurityCode => FieldRule::SecurityCode,
            Self::CreditCardExpiry => FieldRule::Expiry,
            Self::CashOnDeliveryPhoneNumber => FieldRule::Phone,
            Self::CashOnDeliveryEmail => FieldRule::Email,
            _ => FieldRule::Text,
        }
    }

    /// Current input of the field, trimmed.
    pub fn value<'a>(
        &self,
        state: &'a CheckoutState,
    ) -> &'a str {
        let raw = match self {
            Self::CreditCardHolderName => &state.credit_card.holder_name,
            Self::CreditCardNumber => &state.credit_card.card_number,
            Self::CreditCardSecurityCode => &state.credit_card.security_code,
            Self::CreditCardExpiry => &state.credit_card.expiry,
            Self::CashOnDeliveryFirstName => &state.cash_on_delivery.first_name,
            Self::CashOnDeliveryLastName => &state.cash_on_delivery.last_name,
            Self::CashOnDeliveryPhoneNumber => &state.cash_on_delivery.phone_number,
            Self::CashOnDeliveryEmail => &state.cash_on_delivery.email,
            Self::InvoiceAddress => &state.invoice_address.address,
            Self::InvoiceCity => &state.invoice_address.city,
            Self::InvoiceZipCode => &state.invoice_address.zip_code,
            Self::InvoiceCountry => &state.invoice_address.country,
            Self::DeliveryAddress => &state.delivery_address.address,
            Self::DeliveryCity => &state.delivery_address.city,
            Self::DeliveryZipCode => &state.delivery_address.zip_code,
            Self::DeliveryCountry => &state.delivery_address.country,
        };
        raw.trim()
    }

    /// Required fields of `step`, in screen order.
    pub fn for_step(step: WizardStep) -> &'static [FieldId] {
        match step {
            WizardStep::CreditCard => &[
                Self::CreditCardHolderName,
                Self::CreditCardNumber,
                Self::CreditCardSecurityCode,
                Self::CreditCardExpiry,
            ],
            WizardStep::CashOnDelivery => &[
                Self::CashOnDeliveryFirstName,
                Self::CashOnDeliveryLastName,
                Self::CashOnDeliveryPhoneNumber,
                Self::CashOnDeliveryEmail,
            ],
            WizardStep::InvoiceAddress => &[
                Self::InvoiceAddress,
                Self::InvoiceCity,
                Self::InvoiceZipCode,
                Self::InvoiceCountry,
            ],
            WizardStep::DeliveryAddress => &[
                Self::DeliveryAddress,
                Self::DeliveryCity,
                Self::DeliveryZipCode,
                Self::DeliveryCountry,
            ],
            _ => &[],
        }
    }

    /// Checks the field's current input.
    pub fn check(
        &self,
        state: &CheckoutState,
    ) -> Result<(), FieldErrorKind> {
        let value = self.value(state);
        if value.is_empty() {
            Err(FieldErrorKind::Missing)
        } else if !self.rule().accepts(value) {
            Err(FieldErrorKind::Malformed)
        } else {
            Ok(())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldErrorKind {
    Missing,
    Malformed,
}

/// A required field that is empty or not in the expected format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: FieldId,
    pub kind: FieldErrorKind,
}

impl FieldError {
    /// Key of the text describing the error; takes the field label as `{0}`.
    pub fn text_key(&self) -> &'static str {
        match self.kind {
            FieldErrorKind::Missing => "checkoutFieldRequired",
            FieldErrorKind::Malformed => "checkoutFieldInvalid",
        }
    }
}

/// Collects every field error of `step`.
///
/// The delivery address is only checked when the customer asked for a
/// delivery address different from the invoice address. Steps without free
/// text input never report errors.
pub fn validate(
    step: WizardStep,
    state: &CheckoutState,
) -> Vec<FieldError> {
    if step == WizardStep::DeliveryAddress && !state.different_delivery_address {
        return Vec::new();
    }
    FieldId::for_step(step)
        .iter()
        .filter_map(|field| {
            field
                .check(state)
                .err()
                .map(|kind| FieldError { field: *field, kind })
        })
        .collect()
}

/// Whether `step` may be left.
///
/// Any error message still pending in `messages` blocks the step, even one
/// reported for another step. `Contents` depends on the cart, which the
/// session checks; here it is always complete.
pub fn is_step_complete(
    step: WizardStep,
    state: &CheckoutState,
    messages: &dyn MessageSink,
) -> bool {
    if messages.has_errors() {
        return false;
    }
    match step {
        WizardStep::DeliveryTime => state.delivery_slot.is_selected(),
        _ => validate(step, state).is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::ports::{MessageLog, ValidationMessage};

    fn filled_credit_card() -> CheckoutState {
        let mut state = CheckoutState::default();
        state.credit_card.holder_name = "Jane Doe".to_string();
        state.credit_card.card_number = "4111 1111 1111 1111".to_string();
        state.credit_card.security_code = "123".to_string();
        state.credit_card.expiry = "09/27".to_string();
        state
    }

    fn filled_cash_on_delivery() -> CheckoutState {
        let mut state = CheckoutState::default();
        state.cash_on_delivery.first_name = "Jane".to_string();
        state.cash_on_delivery.last_name = "Doe".to_string();
        state.cash_on_delivery.phone_number = "+49 (0)6227 747474".to_string();
        state.cash_on_delivery.email = "jane.doe@example.com".to_string();
        state
    }

    // =========================================================================
    // Field rule tests
    // =========================================================================

    #[test]
    fn card_number_ignores_spaces_and_dashes() {
        assert!(FieldRule::CardNumber.accepts("4111-1111-1111-1111"));
        assert!(FieldRule::CardNumber.accepts("411111111111"));
        assert!(!FieldRule::CardNumber.accepts("4111 1111"));
        assert!(!FieldRule::CardNumber.accepts("4111 1111 1111 111a"));
    }

    #[test]
    fn expiry_requires_valid_month() {
        assert!(FieldRule::Expiry.accepts("01/25"));
        assert!(FieldRule::Expiry.accepts("12/2030"));
        assert!(!FieldRule::Expiry.accepts("13/25"));
        assert!(!FieldRule::Expiry.accepts("1/25"));
        assert!(!FieldRule::Expiry.accepts("01/253"));
    }

    #[test]
    fn security_code_is_three_or_four_digits() {
        assert!(FieldRule::SecurityCode.accepts("123"));
        assert!(FieldRule::SecurityCode.accepts("1234"));
        assert!(!FieldRule::SecurityCode.accepts("12"));
        assert!(!FieldRule::SecurityCode.accepts("12a"));
    }

    #[test]
    fn email_and_phone_rules() {
        assert!(FieldRule::Email.accepts("a@b.de"));
        assert!(!FieldRule::Email.accepts("a@b"));
        assert!(!FieldRule::Email.accepts("a b@c.de"));
        assert!(FieldRule::Phone.accepts("0800/12345"));
        assert!(!FieldRule::Phone.accepts("1234"));
        assert!(!FieldRule::Phone.accepts("call me 12345"));
    }

    // =========================================================================
    // Step validation tests
    // =========================================================================

    #[test]
    fn complete_credit_card_step_passes() {
        let state = filled_credit_card();

        assert_eq!(validate(WizardStep::CreditCard, &state), vec![]);
        assert!(is_step_complete(
            WizardStep::CreditCard,
            &state,
            &MessageLog::new()
        ));
    }

    #[test]
    fn empty_field_is_missing() {
        let mut state = filled_credit_card();
        state.credit_card.holder_name = "   ".to_string();

        assert_eq!(
            validate(WizardStep::CreditCard, &state),
            vec![FieldError {
                field: FieldId::CreditCardHolderName,
                kind: FieldErrorKind::Missing,
            }]
        );
        assert!(!is_step_complete(
            WizardStep::CreditCard,
            &state,
            &MessageLog::new()
        ));
    }

    #[test]
    fn malformed_field_is_reported() {
        let mut state = filled_cash_on_delivery();
        state.cash_on_delivery.email = "jane.doe".to_string();

        assert_eq!(
            validate(WizardStep::CashOnDelivery, &state),
            vec![FieldError {
                field: FieldId::CashOnDeliveryEmail,
                kind: FieldErrorKind::Malformed,
            }]
        );
    }

    #[test]
    fn empty_invoice_address_reports_every_field() {
        let state = CheckoutState::default();

        let errors = validate(WizardStep::InvoiceAddress, &state);

        assert_eq!(errors.len(), 4);
        assert!(errors.iter().all(|e| e.kind == FieldErrorKind::Missing));
    }

    #[test]
    fn delivery_address_is_skipped_without_flag() {
        let mut state = CheckoutState::default();

        assert!(validate(WizardStep::DeliveryAddress, &state).is_empty());

        state.different_delivery_address = true;
        assert_eq!(validate(WizardStep::DeliveryAddress, &state).len(), 4);
    }

    #[test]
    fn pending_error_blocks_any_step() {
        let state = filled_cash_on_delivery();
        let mut messages = MessageLog::new();
        messages.push(ValidationMessage::error("invoiceAddressZip", "required"));

        assert!(!is_step_complete(
            WizardStep::CashOnDelivery,
            &state,
            &messages
        ));
        assert!(!is_step_complete(
            WizardStep::PaymentType,
            &state,
            &messages
        ));
    }

    #[test]
    fn delivery_time_needs_selected_slot() {
        let mut state = CheckoutState::default();
        let messages = MessageLog::new();

        assert!(!is_step_complete(
            WizardStep::DeliveryTime,
            &state,
            &messages
        ));

        state.delivery_slot.from = chrono::NaiveDate::from_ymd_opt(2019, 10, 27)
            .and_then(|d| d.and_hms_opt(8, 0, 0));
        assert!(is_step_complete(
            WizardStep::DeliveryTime,
            &state,
            &messages
        ));
    }

    #[test]
    fn steps_without_inputs_are_complete() {
        let state = CheckoutState::default();
        let messages = MessageLog::new();

        for step in [
            WizardStep::PaymentType,
            WizardStep::BankAccount,
            WizardStep::AdditionalServices,
        ] {
            assert!(is_step_complete(step, &state, &messages), "{step}");
        }
    }
}
