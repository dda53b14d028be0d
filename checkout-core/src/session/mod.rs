//! The checkout session.
//!
//! A [`CheckoutSession`] owns everything one checkout needs: the customer's
//! selections, the confirmed history of discardable choices, the wizard
//! navigation, the cart and the delivery-slot catalog. UI events are turned
//! into method calls; each call updates the state, re-validates the affected
//! step and, once the order is submitted or cancelled, resets everything and
//! navigates away exactly once.
//!
//! Operations that need the customer's confirmation come in two halves:
//! a `request_*` method returning an owned pending token, and a `resolve_*`
//! method consuming that token together with the answer.

mod finalize;
mod guard;
mod slots;
mod summary;

pub use finalize::{FinalizeAction, FinalizeError, PendingFinalize};
pub use guard::{ChangeDecision, DiscardableChange, PendingChange};
pub use slots::SlotSelectionError;
pub use summary::{CompletionError, OrderSummary, ServiceLine, SummaryLine};

use tracing::{debug, info};

use crate::calculations::pricing::compute_subtotal;
use crate::formatter;
use crate::models::{AppointmentCatalog, CartSnapshot, CheckoutState, HistoryBuffer, ServiceFees};
use crate::ports::{MessageLog, MessageSink, Route, Router, TextProvider, ValidationMessage};
use crate::wizard::{
    FieldErrorKind, FieldId, NavigationError, WizardProgress, WizardStep, validator,
};

/// Which page of the checkout is on screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CheckoutPage {
    #[default]
    Wizard,
    Summary,
}

pub struct CheckoutSession {
    state: CheckoutState,
    history: HistoryBuffer,
    wizard: WizardProgress,
    page: CheckoutPage,
    cart: CartSnapshot,
    catalog: AppointmentCatalog,
    fees: ServiceFees,
    texts: Box<dyn TextProvider>,
    router: Box<dyn Router>,
    messages: Box<dyn MessageSink>,
}

impl CheckoutSession {
    /// Starts a checkout for `cart` with an in-memory message log.
    pub fn new(
        cart: CartSnapshot,
        catalog: AppointmentCatalog,
        texts: Box<dyn TextProvider>,
        router: Box<dyn Router>,
    ) -> Self {
        info!(
            entries = cart.len(),
            slots = catalog.len(),
            "checkout session started"
        );
        Self {
            state: CheckoutState::new(),
            history: HistoryBuffer::default(),
            wizard: WizardProgress::new(),
            page: CheckoutPage::Wizard,
            cart,
            catalog,
            fees: ServiceFees::default(),
            texts,
            router,
            messages: Box::new(MessageLog::new()),
        }
    }

    /// Replaces the message sink validation messages are published to.
    pub fn with_messages(
        mut self,
        messages: Box<dyn MessageSink>,
    ) -> Self {
        self.messages = messages;
        self
    }

    pub fn with_service_fees(
        mut self,
        fees: ServiceFees,
    ) -> Self {
        self.fees = fees;
        self
    }

    pub fn state(&self) -> &CheckoutState {
        &self.state
    }

    /// Direct access for field input. Follow edits with
    /// [`on_field_input`](Self::on_field_input) so the step is re-validated.
    pub fn state_mut(&mut self) -> &mut CheckoutState {
        &mut self.state
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    pub fn wizard(&self) -> &WizardProgress {
        &self.wizard
    }

    pub fn page(&self) -> CheckoutPage {
        self.page
    }

    pub fn cart(&self) -> &CartSnapshot {
        &self.cart
    }

    pub fn cart_mut(&mut self) -> &mut CartSnapshot {
        &mut self.cart
    }

    pub fn catalog(&self) -> &AppointmentCatalog {
        &self.catalog
    }

    pub fn fees(&self) -> &ServiceFees {
        &self.fees
    }

    pub fn messages(&self) -> &dyn MessageSink {
        self.messages.as_ref()
    }

    pub fn texts(&self) -> &dyn TextProvider {
        self.texts.as_ref()
    }

    // =========================================================================
    // Step validation
    // =========================================================================

    /// Re-evaluates `step` and records the result on the wizard.
    pub fn check_step(
        &mut self,
        step: WizardStep,
    ) -> bool {
        let complete = match step {
            WizardStep::Contents => !self.cart.is_empty() && !self.messages.has_errors(),
            _ => validator::is_step_complete(step, &self.state, self.messages.as_ref()),
        };
        self.wizard.set_validated(step, complete);
        debug!(step = step.id(), complete, "step checked");
        complete
    }

    /// Called when `step` is shown: drops every pending message, then
    /// checks the step.
    pub fn activate_step(
        &mut self,
        step: WizardStep,
    ) -> bool {
        self.messages.clear();
        self.check_step(step)
    }

    /// Called after an input of `step` changed.
    ///
    /// Replaces the messages of the step's own fields with fresh ones for
    /// malformed inputs and re-checks the step. Messages reported for other
    /// steps are kept and keep blocking.
    pub fn on_field_input(
        &mut self,
        step: WizardStep,
    ) -> bool {
        let targets: Vec<&str> = FieldId::for_step(step)
            .iter()
            .map(FieldId::as_str)
            .collect();
        self.messages.remove_for_targets(&targets);

        for error in validator::validate(step, &self.state) {
            if error.kind == FieldErrorKind::Malformed {
                let text = self
                    .texts
                    .get_text(error.text_key(), &[error.field.label()]);
                self.messages
                    .push(ValidationMessage::error(error.field.as_str(), text));
            }
        }
        self.check_step(step)
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Leaves the current step for the next one and activates it.
    ///
    /// # Errors
    ///
    /// Returns [`NavigationError`] if the current step is incomplete or the
    /// last one.
    pub fn next_step(&mut self) -> Result<WizardStep, NavigationError> {
        let current = self.wizard.current_step();
        self.check_step(current);
        let next = self.wizard.next_step(&self.state)?;
        self.activate_step(next);
        Ok(next)
    }

    /// Goes back from the summary (or within the wizard) to a reached step.
    pub fn navigate_back_to(
        &mut self,
        step: WizardStep,
    ) -> Result<(), NavigationError> {
        self.wizard.go_to_step(step)?;
        self.page = CheckoutPage::Wizard;
        self.activate_step(step);
        Ok(())
    }

    /// Leaves the checkout for the shop, keeping everything entered so far.
    pub fn return_to_shop(&mut self) {
        info!("returning to shop");
        self.router.navigate_to(Route::Home);
    }

    /// Localized subtotal line; also stores the subtotal on the cart and
    /// the checkout state.
    pub fn subtotal_text(&mut self) -> String {
        let text = formatter::subtotal_text(&mut self.cart, self.texts.as_ref());
        self.state.subtotal = self.cart.subtotal;
        text
    }

    /// Current cart subtotal without touching any state.
    pub fn cart_subtotal(&self) -> rust_decimal::Decimal {
        compute_subtotal(&self.cart)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::cell::RefCell;
    use std::rc::Rc;

    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::AppointmentSlot;
    use crate::ports::ResourceBundle;

    /// Router remembering every navigation.
    #[derive(Clone, Default)]
    pub struct RecordingRouter {
        pub routes: Rc<RefCell<Vec<Route>>>,
    }

    impl Router for RecordingRouter {
        fn navigate_to(
            &mut self,
            route: Route,
        ) {
            self.routes.borrow_mut().push(route);
        }
    }

    pub fn slot(
        day: u32,
        from: u32,
        label: &str,
    ) -> AppointmentSlot {
        let date = NaiveDate::from_ymd_opt(2019, 10, day).unwrap();
        AppointmentSlot::new(
            date.and_hms_opt(from, 0, 0).unwrap(),
            date.and_hms_opt(from + 2, 0, 0).unwrap(),
            label,
        )
    }

    pub fn catalog() -> AppointmentCatalog {
        AppointmentCatalog::from_slots(vec![
            slot(27, 8, "$20"),
            slot(29, 14, "$15"),
            slot(30, 18, "Not Available - Full"),
        ])
        .unwrap()
    }

    pub fn cart() -> CartSnapshot {
        CartSnapshot::new()
            .with_entry("HT-1000", dec!(10), 2)
            .with_entry("HT-1001", dec!(5), 1)
    }

    pub fn session() -> (CheckoutSession, Rc<RefCell<Vec<Route>>>) {
        let router = RecordingRouter::default();
        let routes = router.routes.clone();
        let session = CheckoutSession::new(
            cart(),
            catalog(),
            Box::new(ResourceBundle::english()),
            Box::new(router),
        );
        (session, routes)
    }

    pub fn fill_credit_card(state: &mut CheckoutState) {
        state.credit_card.holder_name = "Jane Doe".to_string();
        state.credit_card.card_number = "4111 1111 1111 1111".to_string();
        state.credit_card.security_code = "123".to_string();
        state.credit_card.expiry = "09/27".to_string();
    }

    pub fn fill_invoice_address(state: &mut CheckoutState) {
        state.invoice_address.address = "Dietmar-Hopp-Allee 16".to_string();
        state.invoice_address.city = "Walldorf".to_string();
        state.invoice_address.zip_code = "69190".to_string();
        state.invoice_address.country = "Germany".to_string();
    }

    /// Fills the default route up to and including the invoice address and
    /// leaves the wizard on the delivery time step.
    pub fn advance_to_delivery_time(session: &mut CheckoutSession) {
        session.next_step().unwrap();
        session.next_step().unwrap();
        fill_credit_card(session.state_mut());
        session.on_field_input(WizardStep::CreditCard);
        session.next_step().unwrap();
        fill_invoice_address(session.state_mut());
        session.on_field_input(WizardStep::InvoiceAddress);
        session.next_step().unwrap();
    }

    /// Like [`advance_to_delivery_time`], then books catalog slot `slot` and
    /// moves on to the last step.
    pub fn advance_to_services(
        session: &mut CheckoutSession,
        slot: usize,
    ) {
        advance_to_delivery_time(session);
        session.select_slot(slot).unwrap();
        session.next_step().unwrap();
    }

    /// Walks the default route and opens the order summary.
    pub fn complete_checkout(session: &mut CheckoutSession) {
        advance_to_services(session, 0);
        session.complete().unwrap();
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::test_support::*;
    use super::*;
    use crate::ports::ResourceBundle;

    #[test]
    fn new_session_starts_on_contents() {
        let (session, routes) = session();

        assert_eq!(session.wizard().current_step(), WizardStep::Contents);
        assert_eq!(session.page(), CheckoutPage::Wizard);
        assert_eq!(session.state(), &CheckoutState::default());
        assert!(routes.borrow().is_empty());
    }

    #[test]
    fn contents_step_requires_cart_entries() {
        let router = RecordingRouter::default();
        let mut session = CheckoutSession::new(
            CartSnapshot::new(),
            catalog(),
            Box::new(ResourceBundle::english()),
            Box::new(router),
        );

        assert!(!session.activate_step(WizardStep::Contents));
        assert_eq!(
            session.next_step(),
            Err(NavigationError::StepNotValidated(WizardStep::Contents))
        );
    }

    #[test]
    fn entering_a_step_blocks_until_fields_are_filled() {
        let (mut session, _) = session();

        session.next_step().unwrap();
        assert_eq!(session.next_step(), Ok(WizardStep::CreditCard));
        assert!(!session.wizard().is_validated(WizardStep::CreditCard));

        fill_credit_card(session.state_mut());
        assert!(session.on_field_input(WizardStep::CreditCard));
        assert_eq!(session.next_step(), Ok(WizardStep::InvoiceAddress));
    }

    #[test]
    fn malformed_input_publishes_message() {
        let (mut session, _) = session();
        fill_credit_card(session.state_mut());
        session.state_mut().credit_card.expiry = "13/27".to_string();

        assert!(!session.on_field_input(WizardStep::CreditCard));

        let messages = session.messages().messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].target, "creditCardExpirationDate");
        assert_eq!(messages[0].message, "Expiration Date is not valid");
    }

    #[test]
    fn field_input_keeps_messages_of_other_steps() {
        let (mut session, _) = session();
        session.state_mut().cash_on_delivery.email = "not-an-email".to_string();
        session.on_field_input(WizardStep::CashOnDelivery);
        fill_credit_card(session.state_mut());

        assert!(!session.on_field_input(WizardStep::CreditCard));
        assert_eq!(session.messages().messages().len(), 1);

        assert!(session.activate_step(WizardStep::CreditCard));
        assert!(session.messages().messages().is_empty());
    }

    #[test]
    fn correcting_input_removes_its_message() {
        let (mut session, _) = session();
        fill_credit_card(session.state_mut());
        session.state_mut().credit_card.card_number = "1234".to_string();
        session.on_field_input(WizardStep::CreditCard);

        session.state_mut().credit_card.card_number = "4111111111111111".to_string();

        assert!(session.on_field_input(WizardStep::CreditCard));
        assert!(session.messages().messages().is_empty());
    }

    #[test]
    fn navigate_back_to_reached_step_only() {
        let (mut session, _) = session();
        advance_to_delivery_time(&mut session);

        assert_eq!(session.navigate_back_to(WizardStep::CreditCard), Ok(()));
        assert_eq!(session.wizard().current_step(), WizardStep::CreditCard);
        assert_eq!(
            session.navigate_back_to(WizardStep::AdditionalServices),
            Err(NavigationError::NotReached(WizardStep::AdditionalServices))
        );
    }

    #[test]
    fn subtotal_text_stores_subtotal() {
        let (mut session, _) = session();

        assert_eq!(session.subtotal_text(), "Subtotal: $25.00");
        assert_eq!(session.state().subtotal, dec!(25.00));
        assert_eq!(session.cart().subtotal, dec!(25.00));
        assert_eq!(session.cart_subtotal(), dec!(25.00));
    }

    #[test]
    fn return_to_shop_navigates_home() {
        let (mut session, routes) = session();

        session.return_to_shop();

        assert_eq!(*routes.borrow(), vec![Route::Home]);
    }
}
