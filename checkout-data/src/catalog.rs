//! Loader for the delivery-slot catalog.
//!
//! ## CSV Format
//!
//! | Column  | Required | Type      | Notes                                   |
//! |---------|----------|-----------|-----------------------------------------|
//! | `start` | yes      | timestamp | `YYYY-MM-DD HH:MM`, local time          |
//! | `end`   | yes      | timestamp | `YYYY-MM-DD HH:MM`, after `start`       |
//! | `label` | yes      | string    | `$20` for a priced slot, anything else  |
//! |         |          |           | (e.g. `Not Available - Full`) disables  |
//! |         |          |           | the slot                                |
//!
//! ```csv
//! start,end,label
//! 2019-10-27 08:00,2019-10-27 10:00,$20
//! 2019-10-30 18:00,2019-10-30 20:00,Not Available - Full
//! ```
//!
//! The calendar opens on the date of the earliest slot.

use std::io::Read;
use std::path::Path;

use checkout_core::{AppointmentCatalog, AppointmentSlot};
use chrono::NaiveDateTime;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Timestamp layout used by the catalog and cart tables.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

const DEFAULT_CATALOG: &str = include_str!("../data/appointments.csv");

/// Errors that can occur when loading a slot catalog.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogLoadError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("cannot read catalog '{path}': {message}")]
    Io { path: String, message: String },

    /// `row` is 1-based (header = row 0).
    #[error("invalid timestamp '{value}' on row {row}, expected YYYY-MM-DD HH:MM")]
    InvalidTimestamp { value: String, row: usize },

    #[error("slot on row {row} ends before it starts")]
    EmptyInterval { row: usize },

    #[error("catalog has no slots")]
    Empty,
}

impl From<csv::Error> for CatalogLoadError {
    fn from(err: csv::Error) -> Self {
        CatalogLoadError::CsvParse(err.to_string())
    }
}

/// A single record of the catalog CSV.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CatalogRecord {
    pub start: String,
    pub end: String,
    pub label: String,
}

fn parse_timestamp(
    value: &str,
    row: usize,
) -> Result<NaiveDateTime, CatalogLoadError> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).map_err(|_| {
        CatalogLoadError::InvalidTimestamp {
            value: value.to_string(),
            row,
        }
    })
}

fn convert_record(
    record: CatalogRecord,
    row: usize,
) -> Result<AppointmentSlot, CatalogLoadError> {
    let start = parse_timestamp(&record.start, row)?;
    let end = parse_timestamp(&record.end, row)?;
    if end <= start {
        return Err(CatalogLoadError::EmptyInterval { row });
    }
    Ok(AppointmentSlot::new(start, end, record.label))
}

/// Loader for delivery-slot catalogs.
pub struct CatalogLoader;

impl CatalogLoader {
    /// Parse slots from a CSV reader, in file order.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<AppointmentSlot>, CatalogLoadError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        csv_reader
            .deserialize::<CatalogRecord>()
            .enumerate()
            .map(|(idx, result)| convert_record(result?, idx + 1))
            .collect()
    }

    /// Build a catalog from CSV text.
    ///
    /// # Errors
    ///
    /// * [`CatalogLoadError::CsvParse`] – structurally invalid CSV.
    /// * [`CatalogLoadError::InvalidTimestamp`] / [`CatalogLoadError::EmptyInterval`]
    ///   – a row does not describe a time interval.
    /// * [`CatalogLoadError::Empty`] – the table has no rows.
    pub fn load_from_str(input: &str) -> Result<AppointmentCatalog, CatalogLoadError> {
        let slots = Self::parse(input.as_bytes())?;
        let catalog = AppointmentCatalog::from_slots(slots).ok_or(CatalogLoadError::Empty)?;
        debug!(
            slots = catalog.len(),
            start = %catalog.start_date(),
            "slot catalog loaded"
        );
        Ok(catalog)
    }

    pub fn load_from_file(path: &Path) -> Result<AppointmentCatalog, CatalogLoadError> {
        let contents = std::fs::read_to_string(path).map_err(|e| CatalogLoadError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::load_from_str(&contents)
    }
}

/// The demo catalog shipped with the crate: one week of two-hour slots
/// starting 2019-10-27.
pub fn default_catalog() -> Result<AppointmentCatalog, CatalogLoadError> {
    CatalogLoader::load_from_str(DEFAULT_CATALOG)
}
