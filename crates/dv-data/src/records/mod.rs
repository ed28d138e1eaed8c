//! Typed dataset records
//!
//! Rows are parsed and validated once at ingestion (see [`crate::ingest`]);
//! after that they are immutable and every aggregation works through the
//! [`Record`] trait.

mod disaster;
mod salary;

pub use disaster::{DeathToll, DisasterRecord};
pub use salary::{SalaryBand, SalaryRecord, Seniority, WorkArrangement};

use dv_core::CountryId;

use crate::DatasetKind;

/// Common view of a dataset row used by every aggregation
pub trait Record: Clone + Send + Sync + 'static {
    /// Dataset kind this record type is loaded for
    const KIND: DatasetKind;

    /// Country the record is attached to on the map, `None` if unresolved
    fn country(&self) -> Option<CountryId>;

    /// Second country the record relates to (e.g. employee residence)
    fn linked_country(&self) -> Option<CountryId> {
        None
    }

    fn year(&self) -> i32;

    /// Primary numeric measure (histogram, medians)
    fn measure(&self) -> f64;

    /// Category label used by the bar chart
    fn category(&self) -> &str;

    /// Labels of the three flow-diagram stages
    fn flow_stages(&self) -> [&str; 3];

    /// Human-readable name of the measure
    fn measure_label() -> &'static str;
}
