//! Parse-and-validate step for every startup input
//!
//! Raw text fields are parsed into typed values exactly once here. A row
//! with an unparseable required value is rejected and counted; a row whose
//! country code cannot be resolved is kept but left unattached from the map.

mod reference;
mod rows;
mod shapes;

pub use reference::parse_reference_table;
pub use rows::{RawDisasterRow, RawSalaryRow};
pub use shapes::parse_shapes;

use csv::ReaderBuilder;
use dv_core::CountryRegistry;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::NullConfig;
use crate::records::Record;
use crate::DataError;

/// Why a single row was rejected
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RowError {
    #[error("missing value for '{0}'")]
    MissingField(&'static str),

    #[error("invalid number {value:?} for '{field}'")]
    InvalidNumber { field: &'static str, value: String },

    #[error("unknown value {value:?} for '{field}'")]
    InvalidCategory { field: &'static str, value: String },

    #[error("value {value} for '{field}' is out of range")]
    OutOfRange { field: &'static str, value: f64 },

    #[error("malformed row: {0}")]
    Malformed(String),
}

/// Counters describing one ingestion pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Rows turned into records
    pub accepted: usize,
    /// Rows dropped because of invalid values
    pub rejected: usize,
    /// Accepted records without a resolvable map country
    pub unattached: usize,
}

/// Records together with the report of how they were ingested
#[derive(Debug, Clone)]
pub struct Ingested<R> {
    pub records: Vec<R>,
    pub report: IngestReport,
}

/// Lookups available while validating a row
pub struct RowContext<'a> {
    pub registry: &'a CountryRegistry,
    pub nulls: &'a NullConfig,
}

impl<'a> RowContext<'a> {
    /// Non-null trimmed text of a required field
    pub fn required<'v>(&self, field: &'static str, value: &'v str) -> Result<&'v str, RowError> {
        self.nulls.value(value).ok_or(RowError::MissingField(field))
    }

    /// Required finite number
    pub fn number(&self, field: &'static str, value: &str) -> Result<f64, RowError> {
        let text = self.required(field, value)?;
        parse_number(field, text)
    }

    /// Optional finite number; null yields `None`, garbage is an error
    pub fn optional_number(&self, field: &'static str, value: &str) -> Result<Option<f64>, RowError> {
        match self.nulls.value(value) {
            Some(text) => parse_number(field, text).map(Some),
            None => Ok(None),
        }
    }

    /// Required whole year
    pub fn year(&self, field: &'static str, value: &str) -> Result<i32, RowError> {
        let text = self.required(field, value)?;
        text.parse::<i32>().map_err(|_| RowError::InvalidNumber {
            field,
            value: text.to_string(),
        })
    }
}

fn parse_number(field: &'static str, text: &str) -> Result<f64, RowError> {
    // Thousands separators show up in hand-edited exports
    let cleaned = text.replace(',', "");
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(RowError::InvalidNumber {
            field,
            value: text.to_string(),
        }),
    }
}

/// A raw CSV row that validates into a record
pub trait IngestRow: DeserializeOwned {
    type Output: Record;

    /// Columns that must be present in the header
    const REQUIRED_COLUMNS: &'static [&'static str];

    fn validate(self, ctx: &RowContext<'_>) -> Result<Self::Output, RowError>;
}

/// Parse a record CSV into validated records.
///
/// Missing required columns fail the whole load; bad rows are only counted.
pub fn parse_records<Raw: IngestRow>(
    source_name: &str,
    text: &str,
    registry: &CountryRegistry,
    nulls: &NullConfig,
) -> Result<Ingested<Raw::Output>, DataError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    require_columns(source_name, &headers, Raw::REQUIRED_COLUMNS)?;

    let ctx = RowContext { registry, nulls };
    let mut records = Vec::new();
    let mut report = IngestReport::default();

    for (line, row) in reader.deserialize::<Raw>().enumerate() {
        let validated = row
            .map_err(|e| RowError::Malformed(e.to_string()))
            .and_then(|raw| raw.validate(&ctx));
        match validated {
            Ok(record) => {
                if record.country().is_none() {
                    report.unattached += 1;
                }
                report.accepted += 1;
                records.push(record);
            }
            Err(e) => {
                // +2: one for the header, one for 1-based numbering
                tracing::warn!("{}: rejecting row {}: {}", source_name, line + 2, e);
                report.rejected += 1;
            }
        }
    }

    tracing::info!(
        "{}: {} records accepted, {} rejected, {} without a map country",
        source_name,
        report.accepted,
        report.rejected,
        report.unattached
    );

    Ok(Ingested { records, report })
}

pub(crate) fn require_columns(
    source_name: &str,
    headers: &csv::StringRecord,
    required: &[&'static str],
) -> Result<(), DataError> {
    for column in required {
        if !headers.iter().any(|h| h == *column) {
            return Err(DataError::MissingColumn {
                source_name: source_name.to_string(),
                column,
            });
        }
    }
    Ok(())
}
