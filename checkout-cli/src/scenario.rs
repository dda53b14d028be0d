//! Scripted checkout runs.
//!
//! A scenario file describes what a customer enters on each wizard step, the
//! answers they give to confirmation dialogs and how they leave the order
//! summary:
//!
//! ```toml
//! payment_method = "Cash on Delivery"
//! slot = 3
//! services = ["assembly"]
//! finalize = "submit"
//! answers = [true]
//!
//! [[cart]]
//! product_id = "HT-1000"
//! price = "956.00"
//! quantity = 1
//!
//! [cash_on_delivery]
//! first_name = "Jane"
//! last_name = "Doe"
//! phone_number = "+49 6227 747474"
//! email = "jane.doe@example.com"
//!
//! [invoice_address]
//! address = "Dietmar-Hopp-Allee 16"
//! city = "Walldorf"
//! zip_code = "69190"
//! country = "Germany"
//! ```
//!
//! `[[changes]]` entries revisit the wizard after the summary was reached
//! and change a selection that discards progress; each confirmation consumes
//! the next value of `answers`.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use checkout_core::models::{
    Address, CartEntry, CartSnapshot, CashOnDeliveryContact, CreditCard, PaymentMethod,
    QuantityOverflow,
};
use checkout_core::ports::{ConfirmationDialog, DialogKind, Route, Router};
use checkout_core::session::{
    CompletionError, DiscardableChange, FinalizeAction, FinalizeError, OrderSummary,
};
use checkout_core::wizard::{NavigationError, WizardStep, validate};
use checkout_core::{CheckoutSession, calculations::compute_subtotal};
use checkout_data::{CartLoadError, CartLoader};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::utils::{UnknownServiceError, parse_services};

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("cannot read scenario '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid scenario: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("unknown payment method '{0}'")]
    UnknownPaymentMethod(String),

    #[error(transparent)]
    UnknownService(#[from] UnknownServiceError),

    #[error("change #{0} names neither a payment method nor a delivery address flag")]
    EmptyChange(usize),

    #[error(transparent)]
    Cart(#[from] CartLoadError),

    #[error(transparent)]
    QuantityOverflow(#[from] QuantityOverflow),

    #[error(transparent)]
    Navigation(#[from] NavigationError),

    #[error(transparent)]
    Finalize(#[from] FinalizeError),
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScenarioItem {
    pub product_id: String,
    pub price: Decimal,
    pub quantity: u32,
}

/// A selection changed after the summary was reached.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ScenarioChange {
    pub payment_method: Option<String>,
    pub different_delivery_address: Option<bool>,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioFinalize {
    Submit,
    Cancel,
}

impl From<ScenarioFinalize> for FinalizeAction {
    fn from(value: ScenarioFinalize) -> Self {
        match value {
            ScenarioFinalize::Submit => FinalizeAction::Submit,
            ScenarioFinalize::Cancel => FinalizeAction::Cancel,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Scenario {
    pub cart: Vec<ScenarioItem>,
    /// Cart CSV used instead of `cart` entries.
    pub cart_file: Option<PathBuf>,
    pub payment_method: Option<String>,
    pub different_delivery_address: bool,
    pub credit_card: CreditCard,
    pub cash_on_delivery: CashOnDeliveryContact,
    pub invoice_address: Address,
    pub delivery_address: Address,
    /// Index into the slot catalog.
    pub slot: Option<usize>,
    pub services: Vec<String>,
    pub changes: Vec<ScenarioChange>,
    /// Answers to confirmation dialogs, in the order they are asked.
    pub answers: Vec<bool>,
    pub finalize: Option<ScenarioFinalize>,
}

impl Scenario {
    pub fn from_toml_str(input: &str) -> Result<Self, ScenarioError> {
        Ok(toml::from_str(input)?)
    }

    /// Reads a scenario; `cart_file` is resolved against the scenario's
    /// directory.
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let mut scenario = Self::from_toml_str(&contents)?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        scenario.cart_file = scenario.cart_file.map(|p| base.join(p));
        Ok(scenario)
    }

    pub fn cart_snapshot(&self) -> Result<CartSnapshot, ScenarioError> {
        if let Some(path) = &self.cart_file {
            return Ok(CartLoader::load_from_file(path)?);
        }
        let mut cart = CartSnapshot::new();
        for item in &self.cart {
            cart.add(
                item.product_id.clone(),
                CartEntry::new(item.price, item.quantity),
            )?;
        }
        cart.subtotal = compute_subtotal(&cart);
        Ok(cart)
    }

    fn discardable_changes(&self) -> Result<Vec<DiscardableChange>, ScenarioError> {
        let mut changes = Vec::new();
        for (i, change) in self.changes.iter().enumerate() {
            if change.payment_method.is_none() && change.different_delivery_address.is_none() {
                return Err(ScenarioError::EmptyChange(i + 1));
            }
            if let Some(name) = &change.payment_method {
                changes.push(DiscardableChange::PaymentMethod(parse_payment_method(name)?));
            }
            if let Some(different) = change.different_delivery_address {
                changes.push(DiscardableChange::DifferentDeliveryAddress(different));
            }
        }
        Ok(changes)
    }
}

fn parse_payment_method(name: &str) -> Result<PaymentMethod, ScenarioError> {
    PaymentMethod::parse(name).ok_or_else(|| ScenarioError::UnknownPaymentMethod(name.to_string()))
}

/// Answers confirmation dialogs from a fixed list. Once the list is used up
/// every dialog is closed, which counts as "no".
#[derive(Debug, Default)]
pub struct ScriptedDialog {
    answers: VecDeque<bool>,
    asked: Vec<(DialogKind, String)>,
}

impl ScriptedDialog {
    pub fn new(answers: &[bool]) -> Self {
        Self {
            answers: answers.iter().copied().collect(),
            asked: Vec::new(),
        }
    }

    /// Every question asked so far.
    pub fn asked(&self) -> &[(DialogKind, String)] {
        &self.asked
    }
}

impl ConfirmationDialog for ScriptedDialog {
    fn confirm(
        &mut self,
        kind: DialogKind,
        message: &str,
    ) -> bool {
        let answer = self.answers.pop_front().unwrap_or(false);
        info!(?kind, answer, "{}", message);
        self.asked.push((kind, message.to_string()));
        answer
    }
}

/// Router for a headless run: there is nowhere to go, so it only logs.
#[derive(Debug, Default)]
pub struct LoggingRouter;

impl Router for LoggingRouter {
    fn navigate_to(
        &mut self,
        route: Route,
    ) {
        info!(route = route.as_str(), "navigating");
    }
}

/// Why a scenario did not reach the summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScenarioStop {
    IncompleteStep {
        step: WizardStep,
        messages: Vec<String>,
    },
    NotCompleted(CompletionError),
}

#[derive(Debug)]
pub struct ScenarioOutcome {
    pub summary: Option<OrderSummary>,
    pub stop: Option<ScenarioStop>,
    /// Route taken after submitting or cancelling.
    pub route: Option<Route>,
}

/// Drives `session` through `scenario`.
///
/// Validation problems end the run with a [`ScenarioStop`]; only malformed
/// scenarios are errors.
pub fn run_scenario(
    scenario: &Scenario,
    session: &mut CheckoutSession,
    dialog: &mut ScriptedDialog,
) -> Result<ScenarioOutcome, ScenarioError> {
    if let Some(name) = &scenario.payment_method {
        let method = parse_payment_method(name)?;
        session.request_change_with_dialog(DiscardableChange::PaymentMethod(method), dialog);
    }
    session.request_change_with_dialog(
        DiscardableChange::DifferentDeliveryAddress(scenario.different_delivery_address),
        dialog,
    );

    let mut summary = match walk_and_complete(scenario, session)? {
        Ok(summary) => summary,
        Err(stop) => return Ok(stopped(stop)),
    };

    let changes = scenario.discardable_changes()?;
    if !changes.is_empty() {
        for change in changes {
            session.navigate_back_to(change.owning_step())?;
            let applied = session.request_change_with_dialog(change, dialog);
            info!(?change, applied, "selection revisited");
        }
        summary = match walk_and_complete(scenario, session)? {
            Ok(summary) => summary,
            Err(stop) => return Ok(stopped(stop)),
        };
    }

    let route = match scenario.finalize {
        Some(action) => session.finalize_with_dialog(action.into(), dialog)?,
        None => None,
    };

    Ok(ScenarioOutcome {
        summary: Some(summary),
        stop: None,
        route,
    })
}

fn stopped(stop: ScenarioStop) -> ScenarioOutcome {
    warn!(?stop, "scenario stopped before the summary");
    ScenarioOutcome {
        summary: None,
        stop: Some(stop),
        route: None,
    }
}

/// Walks forward from the current step to the last one, then completes.
fn walk_and_complete(
    scenario: &Scenario,
    session: &mut CheckoutSession,
) -> Result<Result<OrderSummary, ScenarioStop>, ScenarioError> {
    loop {
        let step = session.wizard().current_step();
        fill_step(scenario, session, step)?;
        match session.next_step() {
            Ok(_) => {}
            Err(NavigationError::LastStep(_)) => break,
            Err(NavigationError::StepNotValidated(step)) => {
                return Ok(Err(ScenarioStop::IncompleteStep {
                    step,
                    messages: step_problems(session, step),
                }));
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(session.complete().map_err(ScenarioStop::NotCompleted))
}

fn fill_step(
    scenario: &Scenario,
    session: &mut CheckoutSession,
    step: WizardStep,
) -> Result<(), ScenarioError> {
    let state = session.state_mut();
    match step {
        WizardStep::CreditCard => state.credit_card = scenario.credit_card.clone(),
        WizardStep::CashOnDelivery => state.cash_on_delivery = scenario.cash_on_delivery.clone(),
        WizardStep::InvoiceAddress => state.invoice_address = scenario.invoice_address.clone(),
        WizardStep::DeliveryAddress => state.delivery_address = scenario.delivery_address.clone(),
        WizardStep::AdditionalServices => {
            state.services = parse_services(&scenario.services)?;
            return Ok(());
        }
        WizardStep::DeliveryTime => {
            if let Some(index) = scenario.slot {
                if let Err(e) = session.select_slot(index) {
                    warn!(index, "{}", e);
                }
            }
            return Ok(());
        }
        WizardStep::Contents | WizardStep::PaymentType | WizardStep::BankAccount => {
            return Ok(());
        }
    }
    session.on_field_input(step);
    Ok(())
}

/// Human-readable reasons why `step` cannot be left.
fn step_problems(
    session: &CheckoutSession,
    step: WizardStep,
) -> Vec<String> {
    let texts = session.texts();
    let mut problems: Vec<String> = session
        .messages()
        .messages()
        .iter()
        .map(|m| m.message.clone())
        .collect();
    for error in validate(step, session.state()) {
        let text = texts.get_text(error.text_key(), &[error.field.label()]);
        if !problems.contains(&text) {
            problems.push(text);
        }
    }
    match step {
        WizardStep::DeliveryTime if !session.state().delivery_slot.is_selected() => {
            problems.push(texts.get_text("checkoutDeliveryTimeRequired", &[]));
        }
        WizardStep::Contents if session.cart().is_empty() => {
            problems.push("cart is empty".to_string());
        }
        _ => {}
    }
    problems
}
