//! Country reference table

use csv::ReaderBuilder;
use dv_core::{CountryCodeError, CountryIdentity, CountryRegistry};
use serde::Deserialize;

use super::require_columns;
use crate::DataError;

#[derive(Debug, Deserialize)]
struct ReferenceRow {
    country_code_alpha2: String,
    country_code_alpha3: String,
    country_id: String,
    country_name: String,
}

impl ReferenceRow {
    fn to_identity(&self) -> Result<CountryIdentity, CountryCodeError> {
        Ok(CountryIdentity {
            id: self.country_id.parse()?,
            alpha2: self.country_code_alpha2.parse()?,
            alpha3: self.country_code_alpha3.parse()?,
            name: self.country_name.clone(),
        })
    }
}

const REFERENCE_COLUMNS: &[&str] = &[
    "country_code_alpha2",
    "country_code_alpha3",
    "country_id",
    "country_name",
];

/// Parse the reference CSV into a [`CountryRegistry`].
///
/// Rows with unparseable codes are skipped with a warning.
pub fn parse_reference_table(source_name: &str, text: &str) -> Result<CountryRegistry, DataError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    require_columns(source_name, &headers, REFERENCE_COLUMNS)?;

    let mut identities = Vec::new();
    let mut skipped = 0usize;
    for row in reader.deserialize::<ReferenceRow>() {
        let row = row?;
        match row.to_identity() {
            Ok(identity) => identities.push(identity),
            Err(e) => {
                tracing::warn!("{}: skipping reference row for {:?}: {}", source_name, row.country_name, e);
                skipped += 1;
            }
        }
    }

    let registry = CountryRegistry::from_identities(identities);
    tracing::info!(
        "{}: {} countries registered, {} rows skipped",
        source_name,
        registry.len(),
        skipped
    );
    Ok(registry)
}
