//! Changes that discard wizard progress.
//!
//! The payment method and the different-delivery-address flag decide which
//! steps follow them. Once the customer has moved past the step owning one
//! of them, changing it throws away everything entered after that step, so
//! the change has to be confirmed first. A declined change leaves the last
//! confirmed value in place.

use tracing::{debug, info};

use super::CheckoutSession;
use crate::models::{CheckoutState, HistoryBuffer, PaymentMethod};
use crate::ports::{ConfirmationDialog, DialogKind};
use crate::wizard::WizardStep;

/// A new value for one of the discardable selections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardableChange {
    PaymentMethod(PaymentMethod),
    DifferentDeliveryAddress(bool),
}

impl DiscardableChange {
    /// Step whose successors depend on the selection.
    pub fn owning_step(&self) -> WizardStep {
        match self {
            Self::PaymentMethod(_) => WizardStep::PaymentType,
            Self::DifferentDeliveryAddress(_) => WizardStep::InvoiceAddress,
        }
    }

    /// Key of the warning shown before discarding progress.
    pub fn message_key(&self) -> &'static str {
        match self {
            Self::PaymentMethod(_) => "checkoutControllerChangePayment",
            Self::DifferentDeliveryAddress(_) => "checkoutControllerChangeDelivery",
        }
    }

    /// Whether `state` already holds the new value.
    fn is_current(
        &self,
        state: &CheckoutState,
    ) -> bool {
        match *self {
            Self::PaymentMethod(method) => state.payment_method == method,
            Self::DifferentDeliveryAddress(different) => {
                state.different_delivery_address == different
            }
        }
    }

    fn apply(
        &self,
        state: &mut CheckoutState,
    ) {
        match *self {
            Self::PaymentMethod(method) => state.payment_method = method,
            Self::DifferentDeliveryAddress(different) => {
                state.different_delivery_address = different;
            }
        }
    }

    fn remember(
        &self,
        history: &mut HistoryBuffer,
    ) {
        match *self {
            Self::PaymentMethod(method) => history.payment_method = Some(method),
            Self::DifferentDeliveryAddress(different) => {
                history.different_delivery_address = Some(different);
            }
        }
    }

    /// Puts the last confirmed value of the same selection back.
    fn restore(
        &self,
        state: &mut CheckoutState,
        history: &HistoryBuffer,
    ) {
        match self {
            Self::PaymentMethod(_) => {
                if let Some(method) = history.payment_method {
                    state.payment_method = method;
                }
            }
            Self::DifferentDeliveryAddress(_) => {
                if let Some(different) = history.different_delivery_address {
                    state.different_delivery_address = different;
                }
            }
        }
    }
}

/// A change waiting for the customer's answer.
///
/// Resolved by passing it back to [`CheckoutSession::resolve_change`], which
/// consumes it.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a pending change has to be resolved"]
pub struct PendingChange {
    change: DiscardableChange,
    message: String,
}

impl PendingChange {
    pub fn change(&self) -> DiscardableChange {
        self.change
    }

    /// Localized warning to show.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn dialog_kind(&self) -> DialogKind {
        DialogKind::Warning
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ChangeDecision {
    /// The change took effect right away.
    Applied,
    /// The change discards progress and needs confirmation.
    Confirm(PendingChange),
}

impl CheckoutSession {
    /// Requests a change of a discardable selection.
    ///
    /// Before the wizard has moved past the owning step the change is applied
    /// and remembered immediately. Afterwards nothing changes until the
    /// returned [`PendingChange`] is resolved. Selecting the value already in
    /// place is applied without touching the wizard.
    pub fn request_change(
        &mut self,
        change: DiscardableChange,
    ) -> ChangeDecision {
        if change.is_current(&self.state) {
            debug!(step = change.owning_step().id(), "selection unchanged");
            change.remember(&mut self.history);
            return ChangeDecision::Applied;
        }
        if self.wizard.is_past(change.owning_step()) {
            let message = self.texts.get_text(change.message_key(), &[]);
            return ChangeDecision::Confirm(PendingChange { change, message });
        }

        change.apply(&mut self.state);
        change.remember(&mut self.history);
        ChangeDecision::Applied
    }

    /// Settles a pending change.
    ///
    /// Accepting commits the new value, discards the wizard progress after
    /// the owning step and remembers the value. Declining restores the last
    /// confirmed value.
    pub fn resolve_change(
        &mut self,
        pending: PendingChange,
        accepted: bool,
    ) {
        let change = pending.change;
        if accepted {
            let step = change.owning_step();
            change.apply(&mut self.state);
            self.wizard.discard_progress(step);
            change.remember(&mut self.history);
            self.activate_step(step);
            info!(step = step.id(), "selection changed; later progress discarded");
        } else {
            change.restore(&mut self.state, &self.history);
            info!(step = change.owning_step().id(), "selection change declined");
        }
    }

    /// Requests a change and asks `dialog` when confirmation is needed.
    ///
    /// Returns whether the change took effect.
    pub fn request_change_with_dialog(
        &mut self,
        change: DiscardableChange,
        dialog: &mut dyn ConfirmationDialog,
    ) -> bool {
        match self.request_change(change) {
            ChangeDecision::Applied => true,
            ChangeDecision::Confirm(pending) => {
                let accepted = dialog.confirm(pending.dialog_kind(), pending.message());
                self.resolve_change(pending, accepted);
                accepted
            }
        }
    }
}
