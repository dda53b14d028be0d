//! Navigation state of the checkout wizard.
//!
//! The wizard remembers which steps the customer has reached, which one is
//! on screen and which steps are currently validated. A step can only be
//! left forwards while it is validated; steps already reached can be
//! revisited freely.

use std::collections::HashSet;

use thiserror::Error;
use tracing::debug;

use super::step::{WizardStep, next_after};
use crate::models::CheckoutState;

/// Errors that can occur while moving through the wizard.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NavigationError {
    /// The current step still has missing or invalid inputs.
    #[error("step '{0}' is not complete")]
    StepNotValidated(WizardStep),

    /// There is no step after the current one.
    #[error("step '{0}' is the last step")]
    LastStep(WizardStep),

    /// Only steps already reached can be jumped to.
    #[error("step '{0}' has not been reached yet")]
    NotReached(WizardStep),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardProgress {
    /// Steps reached so far, in order. The last one is the progress step.
    reached: Vec<WizardStep>,
    /// Index into `reached` of the step on screen.
    current: usize,
    validated: HashSet<WizardStep>,
}

impl WizardProgress {
    pub fn new() -> Self {
        Self {
            reached: vec![WizardStep::Contents],
            current: 0,
            validated: WizardStep::all()
                .iter()
                .copied()
                .filter(WizardStep::initially_validated)
                .collect(),
        }
    }

    /// Step currently on screen.
    pub fn current_step(&self) -> WizardStep {
        self.reached
            .get(self.current)
            .copied()
            .unwrap_or(WizardStep::Contents)
    }

    /// Furthest step reached.
    pub fn progress_step(&self) -> WizardStep {
        self.reached
            .last()
            .copied()
            .unwrap_or(WizardStep::Contents)
    }

    pub fn reached(&self) -> &[WizardStep] {
        &self.reached
    }

    pub fn has_reached(
        &self,
        step: WizardStep,
    ) -> bool {
        self.reached.contains(&step)
    }

    /// True when the wizard has already moved on from `step`.
    pub fn is_past(
        &self,
        step: WizardStep,
    ) -> bool {
        self.has_reached(step) && self.progress_step() != step
    }

    pub fn is_validated(
        &self,
        step: WizardStep,
    ) -> bool {
        self.validated.contains(&step)
    }

    pub fn validate_step(
        &mut self,
        step: WizardStep,
    ) {
        self.validated.insert(step);
    }

    pub fn invalidate_step(
        &mut self,
        step: WizardStep,
    ) {
        self.validated.remove(&step);
    }

    /// Set the validation flag of `step` to `valid`.
    pub fn set_validated(
        &mut self,
        step: WizardStep,
        valid: bool,
    ) {
        if valid {
            self.validate_step(step);
        } else {
            self.invalidate_step(step);
        }
    }

    /// Moves to the next step.
    ///
    /// Steps already reached are simply revisited. Moving past the progress
    /// step requires it to be validated and extends the progress with the
    /// step that follows it for the current selections.
    ///
    /// # Errors
    ///
    /// * [`NavigationError::StepNotValidated`] – the current step blocks.
    /// * [`NavigationError::LastStep`] – nothing follows the current step.
    pub fn next_step(
        &mut self,
        state: &CheckoutState,
    ) -> Result<WizardStep, NavigationError> {
        let current = self.current_step();
        if !self.is_validated(current) {
            return Err(NavigationError::StepNotValidated(current));
        }

        if self.current + 1 < self.reached.len() {
            self.current += 1;
            return Ok(self.current_step());
        }

        let next = next_after(current, state).ok_or(NavigationError::LastStep(current))?;
        self.reached.push(next);
        self.current = self.reached.len() - 1;
        debug!(step = next.id(), "wizard progressed");
        Ok(next)
    }

    /// Jumps to a step that has already been reached.
    pub fn go_to_step(
        &mut self,
        step: WizardStep,
    ) -> Result<(), NavigationError> {
        let index = self
            .reached
            .iter()
            .position(|s| *s == step)
            .ok_or(NavigationError::NotReached(step))?;
        self.current = index;
        Ok(())
    }

    /// Forgets every step reached after `step`.
    ///
    /// `step` becomes the progress step, the steps after it fall back to
    /// their initial validation state, and the wizard shows `step` if it was
    /// further along. Does nothing when `step` has not been reached.
    pub fn discard_progress(
        &mut self,
        step: WizardStep,
    ) {
        let Some(index) = self.reached.iter().position(|s| *s == step) else {
            return;
        };

        let discarded: Vec<WizardStep> = self.reached.drain(index + 1..).collect();
        for later in &discarded {
            self.set_validated(*later, later.initially_validated());
        }
        self.current = self.current.min(index);
        debug!(
            step = step.id(),
            discarded = discarded.len(),
            "wizard progress discarded"
        );
    }

    /// Back to the first step with nothing reached or validated.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for WizardProgress {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::PaymentMethod;

    /// Walks to `target`, validating every step on the way.
    fn walk_to(
        progress: &mut WizardProgress,
        state: &CheckoutState,
        target: WizardStep,
    ) {
        while progress.current_step() != target {
            progress.validate_step(progress.current_step());
            progress.next_step(state).unwrap();
        }
    }

    #[test]
    fn starts_on_contents() {
        let progress = WizardProgress::new();

        assert_eq!(progress.current_step(), WizardStep::Contents);
        assert_eq!(progress.progress_step(), WizardStep::Contents);
        assert!(progress.is_validated(WizardStep::Contents));
        assert!(!progress.is_validated(WizardStep::CreditCard));
    }

    #[test]
    fn next_step_follows_route() {
        let state = CheckoutState::default();
        let mut progress = WizardProgress::new();

        assert_eq!(progress.next_step(&state), Ok(WizardStep::PaymentType));
        assert_eq!(progress.next_step(&state), Ok(WizardStep::CreditCard));
    }

    #[test]
    fn next_step_blocks_on_unvalidated_step() {
        let state = CheckoutState::default();
        let mut progress = WizardProgress::new();
        walk_to(&mut progress, &state, WizardStep::CreditCard);
        progress.invalidate_step(WizardStep::CreditCard);

        assert_eq!(
            progress.next_step(&state),
            Err(NavigationError::StepNotValidated(WizardStep::CreditCard))
        );
        assert_eq!(progress.current_step(), WizardStep::CreditCard);
    }

    #[test]
    fn next_step_fails_on_last_step() {
        let state = CheckoutState::default();
        let mut progress = WizardProgress::new();
        walk_to(&mut progress, &state, WizardStep::AdditionalServices);

        assert_eq!(
            progress.next_step(&state),
            Err(NavigationError::LastStep(WizardStep::AdditionalServices))
        );
    }

    #[test]
    fn go_to_step_only_reaches_visited_steps() {
        let state = CheckoutState::default();
        let mut progress = WizardProgress::new();
        walk_to(&mut progress, &state, WizardStep::InvoiceAddress);

        assert_eq!(progress.go_to_step(WizardStep::PaymentType), Ok(()));
        assert_eq!(progress.current_step(), WizardStep::PaymentType);
        assert_eq!(progress.progress_step(), WizardStep::InvoiceAddress);
        assert_eq!(
            progress.go_to_step(WizardStep::DeliveryTime),
            Err(NavigationError::NotReached(WizardStep::DeliveryTime))
        );
    }

    #[test]
    fn revisiting_walks_forward_without_extending_progress() {
        let state = CheckoutState::default();
        let mut progress = WizardProgress::new();
        walk_to(&mut progress, &state, WizardStep::InvoiceAddress);
        progress.go_to_step(WizardStep::Contents).unwrap();

        assert_eq!(progress.next_step(&state), Ok(WizardStep::PaymentType));
        assert_eq!(progress.progress_step(), WizardStep::InvoiceAddress);
    }

    #[test]
    fn is_past_is_false_on_the_progress_step() {
        let state = CheckoutState::default();
        let mut progress = WizardProgress::new();
        walk_to(&mut progress, &state, WizardStep::PaymentType);

        assert!(!progress.is_past(WizardStep::PaymentType));
        assert!(progress.is_past(WizardStep::Contents));
        assert!(!progress.is_past(WizardStep::InvoiceAddress));
    }

    #[test]
    fn discard_progress_truncates_and_resets_validation() {
        let state = CheckoutState::default();
        let mut progress = WizardProgress::new();
        walk_to(&mut progress, &state, WizardStep::DeliveryTime);
        progress.validate_step(WizardStep::DeliveryTime);

        progress.discard_progress(WizardStep::PaymentType);

        assert_eq!(progress.progress_step(), WizardStep::PaymentType);
        assert_eq!(progress.current_step(), WizardStep::PaymentType);
        assert!(!progress.is_validated(WizardStep::CreditCard));
        assert!(!progress.is_validated(WizardStep::InvoiceAddress));
        assert!(!progress.is_validated(WizardStep::DeliveryTime));
        assert!(progress.is_validated(WizardStep::PaymentType));
    }

    #[test]
    fn progress_after_discard_follows_new_route() {
        let mut state = CheckoutState::default();
        let mut progress = WizardProgress::new();
        walk_to(&mut progress, &state, WizardStep::InvoiceAddress);

        progress.discard_progress(WizardStep::PaymentType);
        state.payment_method = PaymentMethod::BankTransfer;

        assert_eq!(progress.next_step(&state), Ok(WizardStep::BankAccount));
    }

    #[test]
    fn discard_progress_ignores_unreached_step() {
        let state = CheckoutState::default();
        let mut progress = WizardProgress::new();
        walk_to(&mut progress, &state, WizardStep::PaymentType);
        let before = progress.clone();

        progress.discard_progress(WizardStep::DeliveryTime);

        assert_eq!(progress, before);
    }

    #[test]
    fn reset_returns_to_initial_state() {
        let state = CheckoutState::default();
        let mut progress = WizardProgress::new();
        walk_to(&mut progress, &state, WizardStep::InvoiceAddress);

        progress.reset();

        assert_eq!(progress, WizardProgress::new());
    }
}
