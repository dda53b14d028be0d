use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use super::{CheckoutPage, CheckoutSession};
use crate::calculations::pricing::{compute_subtotal, compute_total, format_price};
use crate::models::{AdditionalService, Address, DeliveryMethod, PaymentMethod, SelectedSlot};
use crate::wizard::{self, WizardStep};

/// Why the wizard cannot move on to the order summary.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CompletionError {
    /// Validation messages are still pending.
    #[error("{message}")]
    PendingValidation { message: String },

    #[error("{message}")]
    MissingDeliveryTime { message: String },

    /// The wizard has not been walked to the end, or a step on the current
    /// route no longer validates.
    #[error("step '{0}' is not complete")]
    IncompleteStep(WizardStep),
}

/// One cart line on the summary page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryLine {
    pub product_id: String,
    pub price: Decimal,
    pub quantity: u32,
    pub line_total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceLine {
    pub service: AdditionalService,
    pub fee: Decimal,
}

/// Everything shown on the order summary page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderSummary {
    pub lines: Vec<SummaryLine>,
    pub subtotal: Decimal,
    pub payment_method: PaymentMethod,
    pub delivery_method: DeliveryMethod,
    pub invoice_address: Address,
    pub shipping_address: Address,
    pub delivery_slot: SelectedSlot,
    pub services: Vec<ServiceLine>,
    pub total: Decimal,
    /// Localized total line, e.g. `Total: $74.99`.
    pub total_label: String,
}

impl CheckoutSession {
    /// Finishes the wizard and shows the order summary.
    ///
    /// Stores whether any add-on service was chosen, the subtotal and the
    /// total on the checkout state.
    ///
    /// # Errors
    ///
    /// * [`CompletionError::PendingValidation`] – an input still has an error.
    /// * [`CompletionError::MissingDeliveryTime`] – no delivery slot is selected.
    /// * [`CompletionError::IncompleteStep`] – the wizard is not on its last
    ///   step, or a step on the current route fails its checks.
    pub fn complete(&mut self) -> Result<OrderSummary, CompletionError> {
        if self.messages.has_errors() {
            warn!(
                pending = self.messages.messages().len(),
                "checkout not completed: validation messages pending"
            );
            return Err(CompletionError::PendingValidation {
                message: self.texts.get_text("popOverMessageText", &[]),
            });
        }
        if !self.state.delivery_slot.is_selected() {
            warn!("checkout not completed: no delivery time selected");
            return Err(CompletionError::MissingDeliveryTime {
                message: self.texts.get_text("checkoutDeliveryTimeRequired", &[]),
            });
        }
        let progress = self.wizard.progress_step();
        if progress != WizardStep::AdditionalServices {
            warn!(step = progress.id(), "checkout not completed: wizard not finished");
            return Err(CompletionError::IncompleteStep(progress));
        }
        for step in wizard::route(&self.state) {
            if !self.check_step(step) {
                warn!(step = step.id(), "checkout not completed: step no longer valid");
                return Err(CompletionError::IncompleteStep(step));
            }
        }

        self.state.additional_service_selected = self.state.services.any_selected();

        let subtotal = compute_subtotal(&self.cart);
        self.cart.subtotal = subtotal;
        self.state.subtotal = subtotal;
        let total = compute_total(
            subtotal,
            self.state.delivery_slot.fee,
            &self.state.services,
            &self.fees,
        );
        self.state.total = total;
        self.page = CheckoutPage::Summary;
        info!(total = %total, "checkout completed");

        let lines = self
            .cart
            .entries
            .iter()
            .map(|(product_id, entry)| SummaryLine {
                product_id: product_id.clone(),
                price: entry.price,
                quantity: entry.quantity,
                line_total: entry.line_total(),
            })
            .collect();
        let services = self
            .state
            .services
            .selected()
            .into_iter()
            .map(|service| ServiceLine {
                service,
                fee: self.fees.fee(service),
            })
            .collect();

        Ok(OrderSummary {
            lines,
            subtotal,
            payment_method: self.state.payment_method,
            delivery_method: self.state.delivery_method,
            invoice_address: self.state.invoice_address.clone(),
            shipping_address: self.state.shipping_address().clone(),
            delivery_slot: self.state.delivery_slot.clone(),
            services,
            total,
            total_label: self
                .texts
                .get_text("cartTotalPrice", &[&format_price(total)]),
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::super::test_support::*;
    use super::*;
    use crate::ports::{MessageSink, ValidationMessage};

    /// Initializes tracing subscriber for tests that verify log output.
    fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    #[test]
    fn complete_computes_total_with_slot_and_services() {
        let _guard = init_test_tracing();
        let (mut session, _) = session();
        advance_to_services(&mut session, 0);
        session.state_mut().services.assembly = true;

        let summary = session.complete().unwrap();

        assert_eq!(summary.subtotal, dec!(25.00));
        assert_eq!(summary.total, dec!(74.99));
        assert_eq!(summary.total_label, "Total: $74.99");
        assert_eq!(summary.lines.len(), 2);
        assert_eq!(summary.lines[0].line_total, dec!(20));
        assert_eq!(
            summary.services,
            vec![ServiceLine {
                service: AdditionalService::Assembly,
                fee: dec!(29.99),
            }]
        );
        assert_eq!(summary.shipping_address.city, "Walldorf");
        assert!(session.state().additional_service_selected);
        assert_eq!(session.state().total, dec!(74.99));
        assert_eq!(session.page(), CheckoutPage::Summary);
    }

    #[test]
    fn complete_without_services_clears_flag() {
        let (mut session, _) = session();
        advance_to_services(&mut session, 1);
        session.state_mut().additional_service_selected = true;

        let summary = session.complete().unwrap();

        assert_eq!(summary.total, dec!(40.00));
        assert!(summary.services.is_empty());
        assert!(!session.state().additional_service_selected);
    }

    #[test]
    fn pending_validation_blocks_completion() {
        let router = RecordingRouter::default();
        let mut messages = crate::ports::MessageLog::new();
        messages.push(ValidationMessage::error("invoiceAddressZip", "required"));
        let mut session = CheckoutSession::new(
            cart(),
            catalog(),
            Box::new(crate::ports::ResourceBundle::english()),
            Box::new(router),
        )
        .with_messages(Box::new(messages));
        session.select_slot(0).unwrap();

        let result = session.complete();

        assert_eq!(
            result,
            Err(CompletionError::PendingValidation {
                message: session.texts().get_text("popOverMessageText", &[]),
            })
        );
        assert_eq!(session.page(), CheckoutPage::Wizard);
    }

    #[test]
    fn missing_delivery_time_blocks_completion() {
        let (mut session, _) = session();

        let result = session.complete();

        assert_eq!(
            result,
            Err(CompletionError::MissingDeliveryTime {
                message: "Please select a valid delivery time".to_string(),
            })
        );
        assert_eq!(session.state().total, Decimal::ZERO);
    }

    #[test]
    fn navigate_back_from_summary_returns_to_wizard() {
        let (mut session, _) = session();
        advance_to_services(&mut session, 0);
        session.complete().unwrap();

        session.navigate_back_to(WizardStep::InvoiceAddress).unwrap();

        assert_eq!(session.page(), CheckoutPage::Wizard);
        assert_eq!(session.wizard().current_step(), WizardStep::InvoiceAddress);
    }

    #[test]
    fn complete_from_first_step_is_rejected() {
        let (mut session, routes) = session();
        session.select_slot(0).unwrap();

        let result = session.complete();

        assert_eq!(result, Err(CompletionError::IncompleteStep(WizardStep::Contents)));
        assert_eq!(session.page(), CheckoutPage::Wizard);
        assert_eq!(session.state().total, Decimal::ZERO);
        assert!(routes.borrow().is_empty());
    }

    #[test]
    fn complete_rechecks_steps_edited_after_reaching_the_end() {
        let (mut session, _) = session();
        advance_to_services(&mut session, 0);
        session.navigate_back_to(WizardStep::CreditCard).unwrap();
        session.state_mut().credit_card.holder_name.clear();
        session.on_field_input(WizardStep::CreditCard);

        let result = session.complete();

        assert_eq!(
            result,
            Err(CompletionError::IncompleteStep(WizardStep::CreditCard))
        );
        assert_eq!(session.page(), CheckoutPage::Wizard);
    }

    #[test]
    fn complete_checks_delivery_address_when_requested() {
        let (mut session, _) = session();
        advance_to_services(&mut session, 0);
        // Flag flipped without the guard, so nothing was discarded.
        session.state_mut().different_delivery_address = true;

        let result = session.complete();

        assert_eq!(
            result,
            Err(CompletionError::IncompleteStep(WizardStep::DeliveryAddress))
        );
    }
}
