use checkout_core::formatter;
use checkout_core::models::{AdditionalService, AppointmentSlot, ServiceSelection, SlotOffer};
use chrono::NaiveDate;
use thiserror::Error;

/// Error returned when a service name is not one of the offered add-ons.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown service '{0}' (expected one of: assembly, advanced-assembly, green-return, indoor-delivery)")]
pub struct UnknownServiceError(pub String);

/// Builds a selection from service names such as `assembly` or `green-return`.
pub fn parse_services<S: AsRef<str>>(names: &[S]) -> Result<ServiceSelection, UnknownServiceError> {
    let mut selection = ServiceSelection::default();
    for name in names {
        let name = name.as_ref();
        let service =
            AdditionalService::parse(name).ok_or_else(|| UnknownServiceError(name.to_string()))?;
        selection.set(service, true);
    }
    Ok(selection)
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
}

/// One line of the slot listing, e.g. `  3  2019-10-28 08:00-10:00  $20.00`.
pub fn slot_line(
    index: usize,
    slot: &AppointmentSlot,
) -> String {
    let offer = match slot.offer {
        SlotOffer::Priced(fee) => format!("${}", formatter::price(fee)),
        SlotOffer::Unavailable => slot.label.clone(),
    };
    format!(
        "{:>3}  {}-{}  {}",
        index,
        slot.start.format("%Y-%m-%d %H:%M"),
        slot.end.format("%H:%M"),
        offer
    )
}
