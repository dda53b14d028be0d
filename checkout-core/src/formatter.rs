//! Display helpers for cart and product views.

use rust_decimal::Decimal;

use crate::calculations::pricing::{compute_subtotal, format_price};
use crate::models::{CartSnapshot, ProductStatus, StatusState};
use crate::ports::TextProvider;

/// Formats an amount with two decimals and `,` grouping.
pub fn price(value: Decimal) -> String {
    format_price(value)
}

/// Localized subtotal line for the cart.
///
/// Recomputes the subtotal from the cart entries and stores it on the
/// snapshot before rendering it.
pub fn subtotal_text(
    cart: &mut CartSnapshot,
    texts: &dyn TextProvider,
) -> String {
    cart.subtotal = compute_subtotal(cart);
    texts.get_text("cartSubtotalPrice", &[&format_price(cart.subtotal)])
}

/// Localized label for a status code; unknown codes are returned unchanged.
pub fn status_text(
    status: &str,
    texts: &dyn TextProvider,
) -> String {
    match ProductStatus::parse(status) {
        Some(known) => texts.get_text(known.text_key(), &[]),
        None => status.to_string(),
    }
}

/// Like [`status_text`] with " By" appended to known codes.
pub fn status_text_by(
    status: &str,
    texts: &dyn TextProvider,
) -> String {
    match ProductStatus::parse(status) {
        Some(known) => format!("{} By", texts.get_text(known.text_key(), &[])),
        None => status.to_string(),
    }
}

pub fn status_state(status: &str) -> StatusState {
    ProductStatus::parse(status)
        .map(|known| known.state())
        .unwrap_or_default()
}

/// Footer below the saved-for-later list; empty when nothing is saved.
pub fn footer_text_for_cart(
    saved_for_later: &CartSnapshot,
    texts: &dyn TextProvider,
) -> String {
    if saved_for_later.is_empty() {
        return String::new();
    }
    texts.get_text("cartSavedForLaterFooterText", &[])
}

/// True if either collection has at least one entry.
pub fn has_items(
    first: Option<&CartSnapshot>,
    second: Option<&CartSnapshot>,
) -> bool {
    [first, second]
        .into_iter()
        .flatten()
        .any(|cart| !cart.is_empty())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::ports::ResourceBundle;

    #[test]
    fn subtotal_text_updates_snapshot() {
        let texts = ResourceBundle::english();
        let mut cart = CartSnapshot::new()
            .with_entry("HT-1000", dec!(956), 1)
            .with_entry("HT-1001", dec!(139.5), 2);

        let text = subtotal_text(&mut cart, &texts);

        assert_eq!(text, "Subtotal: $1,235.00");
        assert_eq!(cart.subtotal, dec!(1235.00));
    }

    #[test]
    fn status_text_resolves_known_codes() {
        let texts = ResourceBundle::english();

        assert_eq!(status_text("A", &texts), "Available");
        assert_eq!(status_text("O", &texts), "Out of Stock");
        assert_eq!(status_text("X", &texts), "X");
        assert_eq!(status_text_by("D", &texts), "Discontinued By");
        assert_eq!(status_text_by("", &texts), "");
    }

    #[test]
    fn status_state_defaults_to_none() {
        assert_eq!(status_state("A"), StatusState::Success);
        assert_eq!(status_state("O"), StatusState::Warning);
        assert_eq!(status_state("D"), StatusState::Error);
        assert_eq!(status_state("a"), StatusState::None);
    }

    #[test]
    fn footer_text_is_empty_without_saved_items() {
        let texts = ResourceBundle::english();
        let saved = CartSnapshot::new().with_entry("HT-1000", dec!(10), 1);

        assert_eq!(footer_text_for_cart(&CartSnapshot::new(), &texts), "");
        assert_eq!(
            footer_text_for_cart(&saved, &texts),
            texts.get_text("cartSavedForLaterFooterText", &[])
        );
    }

    #[test]
    fn has_items_checks_both_collections() {
        let empty = CartSnapshot::new();
        let filled = CartSnapshot::new().with_entry("HT-1000", dec!(10), 1);

        assert!(!has_items(None, None));
        assert!(!has_items(Some(&empty), None));
        assert!(has_items(Some(&empty), Some(&filled)));
        assert!(has_items(Some(&filled), None));
        assert_eq!(price(dec!(1234.5)), "1,234.50");
    }
}
