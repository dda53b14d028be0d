use std::fmt;

use thiserror::Error;
use tracing::{info, warn};

use super::{CheckoutPage, CheckoutSession};
use crate::ports::{ConfirmationDialog, DialogKind, Route};

/// How the customer leaves the order summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinalizeAction {
    Submit,
    Cancel,
}

impl FinalizeAction {
    pub fn message_key(&self) -> &'static str {
        match self {
            Self::Submit => "checkoutControllerAreYouSureSubmit",
            Self::Cancel => "checkoutControllerAreYouSureCancel",
        }
    }

    pub fn dialog_kind(&self) -> DialogKind {
        match self {
            Self::Submit => DialogKind::Confirm,
            Self::Cancel => DialogKind::Warning,
        }
    }

    /// Where the application goes once the action is confirmed.
    pub fn route(&self) -> Route {
        match self {
            Self::Submit => Route::OrderCompleted,
            Self::Cancel => Route::Home,
        }
    }
}

impl fmt::Display for FinalizeAction {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Submit => f.write_str("submit"),
            Self::Cancel => f.write_str("cancel"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FinalizeError {
    /// Submit and cancel are only offered on the order summary.
    #[error("cannot {0} the order outside the summary page")]
    NotOnSummary(FinalizeAction),
}

/// A submit or cancel waiting for the customer's answer.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a pending submit or cancel has to be resolved"]
pub struct PendingFinalize {
    action: FinalizeAction,
    message: String,
}

impl PendingFinalize {
    pub fn action(&self) -> FinalizeAction {
        self.action
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn dialog_kind(&self) -> DialogKind {
        self.action.dialog_kind()
    }
}

impl CheckoutSession {
    fn ensure_on_summary(
        &self,
        action: FinalizeAction,
    ) -> Result<(), FinalizeError> {
        if self.page == CheckoutPage::Summary {
            return Ok(());
        }
        warn!(%action, "finalize requested outside the summary page");
        Err(FinalizeError::NotOnSummary(action))
    }

    /// Asks for confirmation to submit or cancel the order.
    ///
    /// # Errors
    ///
    /// [`FinalizeError::NotOnSummary`] unless the summary page is shown.
    pub fn request_finalize(
        &self,
        action: FinalizeAction,
    ) -> Result<PendingFinalize, FinalizeError> {
        self.ensure_on_summary(action)?;
        Ok(PendingFinalize {
            action,
            message: self.texts.get_text(action.message_key(), &[]),
        })
    }

    /// Settles a pending submit or cancel.
    ///
    /// On "yes" the wizard goes back to its first step with all progress
    /// discarded, the selections, their history and the cart are reset, and
    /// the router navigates once to the action's route, which is returned.
    /// On "no" nothing changes and `None` is returned.
    ///
    /// # Errors
    ///
    /// [`FinalizeError::NotOnSummary`] if the customer went back into the
    /// wizard since the request; nothing changes then either.
    pub fn resolve_finalize(
        &mut self,
        pending: PendingFinalize,
        confirmed: bool,
    ) -> Result<Option<Route>, FinalizeError> {
        let action = pending.action;
        self.ensure_on_summary(action)?;
        if !confirmed {
            info!(%action, "finalize declined");
            return Ok(None);
        }

        self.wizard.reset();
        self.page = CheckoutPage::Wizard;
        self.state.reset();
        self.history.reset();
        self.cart.clear();
        self.messages.clear();

        let route = action.route();
        info!(%action, route = route.as_str(), "order finalized");
        self.router.navigate_to(route);
        Ok(Some(route))
    }

    /// Submits or cancels after asking `dialog`. Outside the summary page
    /// the dialog is not shown.
    pub fn finalize_with_dialog(
        &mut self,
        action: FinalizeAction,
        dialog: &mut dyn ConfirmationDialog,
    ) -> Result<Option<Route>, FinalizeError> {
        let pending = self.request_finalize(action)?;
        let confirmed = dialog.confirm(pending.dialog_kind(), pending.message());
        self.resolve_finalize(pending, confirmed)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    use super::super::test_support::*;
    use super::*;
    use crate::models::{CartSnapshot, CheckoutState, HistoryBuffer, PaymentMethod};
    use crate::session::DiscardableChange;
    use crate::wizard::{WizardProgress, WizardStep};

    struct Answer(bool, Vec<DialogKind>);

    impl ConfirmationDialog for Answer {
        fn confirm(
            &mut self,
            kind: DialogKind,
            _message: &str,
        ) -> bool {
            self.1.push(kind);
            self.0
        }
    }

    #[test]
    fn cancel_resets_everything_and_navigates_home_once() {
        let (mut session, routes) = session();
        let _ = session.request_change(DiscardableChange::PaymentMethod(PaymentMethod::CreditCard));
        complete_checkout(&mut session);

        let pending = session.request_finalize(FinalizeAction::Cancel).unwrap();
        assert_eq!(pending.dialog_kind(), DialogKind::Warning);
        let route = session.resolve_finalize(pending, true).unwrap();

        assert_eq!(route, Some(Route::Home));
        assert_eq!(*routes.borrow(), vec![Route::Home]);
        assert_eq!(session.state(), &CheckoutState::default());
        assert_eq!(session.history(), &HistoryBuffer::default());
        assert_eq!(session.wizard(), &WizardProgress::new());
        assert_eq!(session.cart(), &CartSnapshot::default());
        assert_eq!(session.cart().subtotal, Decimal::ZERO);
    }

    #[test]
    fn submit_navigates_to_order_completed() {
        let (mut session, routes) = session();
        complete_checkout(&mut session);
        let mut dialog = Answer(true, Vec::new());

        let route = session.finalize_with_dialog(FinalizeAction::Submit, &mut dialog);

        assert_eq!(route, Ok(Some(Route::OrderCompleted)));
        assert_eq!(dialog.1, vec![DialogKind::Confirm]);
        assert_eq!(*routes.borrow(), vec![Route::OrderCompleted]);
        assert!(session.cart().is_empty());
    }

    #[test]
    fn declined_finalize_changes_nothing() {
        let (mut session, routes) = session();
        complete_checkout(&mut session);
        let state_before = session.state().clone();
        let mut dialog = Answer(false, Vec::new());

        let route = session.finalize_with_dialog(FinalizeAction::Cancel, &mut dialog);

        assert_eq!(route, Ok(None));
        assert!(routes.borrow().is_empty());
        assert_eq!(session.state(), &state_before);
        assert_eq!(session.page(), CheckoutPage::Summary);
        assert_eq!(
            session.wizard().current_step(),
            WizardStep::AdditionalServices
        );
        assert_eq!(session.cart().len(), 2);
    }

    #[test]
    fn finalize_messages_are_localized() {
        let (mut session, _) = session();
        complete_checkout(&mut session);

        let submit = session.request_finalize(FinalizeAction::Submit).unwrap();

        assert_eq!(submit.message(), "Are you sure you want to submit your order?");
        assert_eq!(submit.action(), FinalizeAction::Submit);
    }

    #[test]
    fn finalize_outside_summary_is_rejected_without_asking() {
        let (mut session, routes) = session();
        advance_to_services(&mut session, 0);
        let mut dialog = Answer(true, Vec::new());

        let result = session.finalize_with_dialog(FinalizeAction::Submit, &mut dialog);

        assert_eq!(
            result,
            Err(FinalizeError::NotOnSummary(FinalizeAction::Submit))
        );
        assert!(dialog.1.is_empty());
        assert!(routes.borrow().is_empty());
        assert_eq!(session.cart().len(), 2);
    }

    #[test]
    fn pending_finalize_expires_when_leaving_summary() {
        let (mut session, routes) = session();
        complete_checkout(&mut session);
        let pending = session.request_finalize(FinalizeAction::Cancel).unwrap();
        session.navigate_back_to(WizardStep::InvoiceAddress).unwrap();

        let result = session.resolve_finalize(pending, true);

        assert_eq!(
            result,
            Err(FinalizeError::NotOnSummary(FinalizeAction::Cancel))
        );
        assert!(routes.borrow().is_empty());
        assert_eq!(session.cart().len(), 2);
    }
}
