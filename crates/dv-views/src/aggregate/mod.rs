//! Derived datasets behind every view
//!
//! All functions here are pure: the same record slice and selection always
//! produce the same output. Views call them with the slice returned by
//! [`filter_records`] for their [`FilterScope`].

mod country;
mod flow;
mod histogram;
mod series;

pub use country::{country_scatter, linkage_counts, median_by_country, ScatterPoint};
pub use flow::{FlowEdge, FlowGraph, FlowNode};
pub use histogram::{bin_index, bin_width, histogram, HistogramBin};
pub use series::{top_categories, year_series, CategoryCount, YearPoint};

use dv_core::SelectionState;
use dv_data::Record;
use statrs::statistics::{Data, Median};

/// Which selection facets restrict a view's records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterScope {
    /// Country and year
    Both,
    /// Year only; the view selects countries itself
    YearOnly,
    /// Country only; the view selects years itself
    CountryOnly,
}

impl FilterScope {
    fn applies_country(self) -> bool {
        matches!(self, FilterScope::Both | FilterScope::CountryOnly)
    }

    fn applies_year(self) -> bool {
        matches!(self, FilterScope::Both | FilterScope::YearOnly)
    }
}

/// Records matching the selection facets covered by `scope`
pub fn filter_records<'a, R: Record>(
    records: &'a [R],
    selection: &SelectionState,
    scope: FilterScope,
) -> Vec<&'a R> {
    let country = selection.country.filter(|_| scope.applies_country());
    let year = selection.year.filter(|_| scope.applies_year());

    records
        .iter()
        .filter(|r| country.map_or(true, |c| r.country() == Some(c)))
        .filter(|r| year.map_or(true, |y| r.year() == y))
        .collect()
}

/// Median of a non-empty sample
pub(crate) fn median(values: Vec<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(Data::new(values).median())
}
