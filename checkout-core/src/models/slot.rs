use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::calculations::pricing::parse_price;

/// What a calendar slot offers, derived from its label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotOffer {
    /// Bookable at the given delivery fee.
    Priced(Decimal),
    /// Fully booked or otherwise not selectable.
    Unavailable,
}

impl SlotOffer {
    /// Interprets a calendar label.
    ///
    /// Only labels carrying a `$` amount (e.g. `"$20"`) are priced; anything
    /// else, including `"Not Available - Full"` and an empty label, is
    /// unavailable.
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        if label.is_empty() || !label.contains('$') {
            return Self::Unavailable;
        }
        match parse_price(label) {
            Ok(fee) => Self::Priced(fee),
            Err(e) => {
                warn!(label, "slot label looks priced but is not a number: {}", e);
                Self::Unavailable
            }
        }
    }

    pub fn fee(&self) -> Option<Decimal> {
        match self {
            Self::Priced(fee) => Some(*fee),
            Self::Unavailable => None,
        }
    }
}

/// A bookable delivery interval shown in the delivery-time calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentSlot {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub label: String,
    pub offer: SlotOffer,
}

impl AppointmentSlot {
    pub fn new(
        start: NaiveDateTime,
        end: NaiveDateTime,
        label: impl Into<String>,
    ) -> Self {
        let label = label.into();
        let offer = SlotOffer::from_label(&label);
        Self {
            start,
            end,
            label,
            offer,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self.offer, SlotOffer::Priced(_))
    }
}

/// The delivery slot currently chosen in the checkout.
///
/// Empty timestamps and a zero fee mean nothing valid is selected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedSlot {
    pub from: Option<NaiveDateTime>,
    pub to: Option<NaiveDateTime>,
    pub fee: Decimal,
}

impl SelectedSlot {
    pub fn is_selected(&self) -> bool {
        self.from.is_some()
    }
}

/// Fixed set of delivery slots offered for one checkout session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentCatalog {
    start_date: NaiveDate,
    slots: Vec<AppointmentSlot>,
}

impl AppointmentCatalog {
    pub fn new(
        start_date: NaiveDate,
        slots: Vec<AppointmentSlot>,
    ) -> Self {
        Self { start_date, slots }
    }

    /// Builds a catalog whose calendar opens on the date of the earliest slot.
    ///
    /// Returns `None` when `slots` is empty since there is no date to open on.
    pub fn from_slots(slots: Vec<AppointmentSlot>) -> Option<Self> {
        let start_date = slots.iter().map(|slot| slot.start.date()).min()?;
        Some(Self::new(start_date, slots))
    }

    /// First day shown by the calendar.
    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn slots(&self) -> &[AppointmentSlot] {
        &self.slots
    }

    pub fn get(
        &self,
        index: usize,
    ) -> Option<&AppointmentSlot> {
        self.slots.get(index)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn available(&self) -> impl Iterator<Item = &AppointmentSlot> {
        self.slots.iter().filter(|slot| slot.is_available())
    }

    pub fn on_date(
        &self,
        date: NaiveDate,
    ) -> impl Iterator<Item = &AppointmentSlot> {
        self.slots
            .iter()
            .filter(move |slot| slot.start.date() == date)
    }
}
