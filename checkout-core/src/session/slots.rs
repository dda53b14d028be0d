use thiserror::Error;
use tracing::{debug, info};

use super::CheckoutSession;
use crate::models::{AppointmentSlot, SelectedSlot, SlotOffer};
use crate::wizard::WizardStep;

/// Why a calendar selection did not yield a delivery slot.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlotSelectionError {
    #[error("no delivery slot selected")]
    NothingSelected,

    #[error("delivery slot '{label}' cannot be booked")]
    Unavailable { label: String },

    #[error("no delivery slot at index {0}")]
    UnknownSlot(usize),
}

impl CheckoutSession {
    /// Handles a selection change in the delivery-time calendar.
    ///
    /// Only the first selected slot counts. A priced slot becomes the
    /// delivery slot and validates the delivery time step; an empty selection
    /// or an unavailable slot clears the delivery slot and invalidates the
    /// step.
    ///
    /// # Errors
    ///
    /// * [`SlotSelectionError::NothingSelected`] – `selection` is empty.
    /// * [`SlotSelectionError::Unavailable`] – the first slot has no price.
    pub fn select_appointments(
        &mut self,
        selection: &[AppointmentSlot],
    ) -> Result<SelectedSlot, SlotSelectionError> {
        let Some(first) = selection.first() else {
            self.clear_slot();
            return Err(SlotSelectionError::NothingSelected);
        };

        match first.offer {
            SlotOffer::Priced(fee) => {
                let selected = SelectedSlot {
                    from: Some(first.start),
                    to: Some(first.end),
                    fee,
                };
                self.state.delivery_slot = selected.clone();
                self.wizard.validate_step(WizardStep::DeliveryTime);
                info!(from = %first.start, to = %first.end, fee = %fee, "delivery slot selected");
                Ok(selected)
            }
            SlotOffer::Unavailable => {
                self.clear_slot();
                Err(SlotSelectionError::Unavailable {
                    label: first.label.clone(),
                })
            }
        }
    }

    /// Selects the catalog slot at `index`.
    ///
    /// An unknown index is treated like an empty selection.
    pub fn select_slot(
        &mut self,
        index: usize,
    ) -> Result<SelectedSlot, SlotSelectionError> {
        match self.catalog.get(index).cloned() {
            Some(slot) => self.select_appointments(std::slice::from_ref(&slot)),
            None => {
                self.clear_slot();
                Err(SlotSelectionError::UnknownSlot(index))
            }
        }
    }

    /// Deselects the delivery slot.
    pub fn clear_slot(&mut self) {
        self.state.delivery_slot = SelectedSlot::default();
        self.wizard.invalidate_step(WizardStep::DeliveryTime);
        debug!("delivery slot cleared");
    }
}
