//! Per-country aggregates

use ahash::AHashMap;
use dv_core::CountryId;
use dv_data::Record;
use indexmap::IndexMap;

use super::median;

fn group_by_country<R: Record>(records: &[&R]) -> AHashMap<CountryId, Vec<f64>> {
    let mut groups: AHashMap<CountryId, Vec<f64>> = AHashMap::new();
    for record in records {
        if let Some(country) = record.country() {
            groups.entry(country).or_default().push(record.measure());
        }
    }
    groups
}

/// Median measure per country; countries without records are absent
pub fn median_by_country<R: Record>(records: &[&R]) -> AHashMap<CountryId, f64> {
    group_by_country(records)
        .into_iter()
        .filter_map(|(country, values)| median(values).map(|m| (country, m)))
        .collect()
}

/// Count of records per `(target, home)` pair, in first-appearance order.
///
/// Only records carrying both countries contribute.
pub fn linkage_counts<R: Record>(records: &[&R]) -> IndexMap<(CountryId, CountryId), u32> {
    let mut counts = IndexMap::new();
    for record in records {
        if let (Some(target), Some(home)) = (record.country(), record.linked_country()) {
            *counts.entry((target, home)).or_insert(0) += 1;
        }
    }
    counts
}

/// One country in the count/median scatter plot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterPoint {
    pub country: CountryId,
    pub count: usize,
    pub median: f64,
}

/// Record count and median measure per country, by ascending country id
pub fn country_scatter<R: Record>(records: &[&R]) -> Vec<ScatterPoint> {
    let mut points: Vec<ScatterPoint> = group_by_country(records)
        .into_iter()
        .filter_map(|(country, values)| {
            let count = values.len();
            median(values).map(|median| ScatterPoint { country, count, median })
        })
        .collect();
    points.sort_by_key(|p| p.country);
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::fixtures::*;
    use crate::aggregate::{filter_records, FilterScope};
    use dv_core::SelectionState;

    #[test]
    fn test_median_by_country() {
        let records = sample();
        let refs: Vec<_> = records.iter().collect();
        let medians = median_by_country(&refs);

        assert_eq!(medians.len(), 2);
        assert!((medians[&US] - 150_000.0).abs() < 1e-6);
        assert_eq!(medians[&DE], 80_000.0);
        // Canada only appears as a residence
        assert!(!medians.contains_key(&CA));
    }

    #[test]
    fn test_median_of_small_groups() {
        let records = vec![
            salary(2022, "Data Scientist", 10.0, Some(US), None),
            salary(2022, "Data Scientist", 30.0, Some(US), None),
            salary(2022, "Data Scientist", 20.0, Some(US), None),
            salary(2022, "Data Scientist", 5.0, Some(DE), None),
        ];
        let refs: Vec<_> = records.iter().collect();
        let medians = median_by_country(&refs);

        assert_eq!(medians.len(), 2);
        assert!((medians[&US] - 20.0).abs() < 1e-9);
        assert!((medians[&DE] - 5.0).abs() < 1e-9);
        assert!(medians.get(&CA).is_none());
    }

    #[test]
    fn test_linkage_for_selected_country() {
        let records = sample();
        let selection = SelectionState {
            country: Some(US),
            year: None,
        };
        let filtered = filter_records(&records, &selection, FilterScope::Both);
        let links = linkage_counts(&filtered);

        assert_eq!(links.len(), 2);
        assert_eq!(links[&(US, US)], 1);
        assert_eq!(links[&(US, CA)], 1);
    }

    #[test]
    fn test_linkage_skips_unattached() {
        let records = sample();
        let refs: Vec<_> = records.iter().collect();
        let links = linkage_counts(&refs);
        // The unattached record has a residence but no company country
        assert!(links.keys().all(|(target, _)| *target != CA));
        assert_eq!(links.values().sum::<u32>(), 3);
    }

    #[test]
    fn test_country_scatter() {
        let records = sample();
        let refs: Vec<_> = records.iter().collect();
        let points = country_scatter(&refs);

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].country, DE);
        assert_eq!(points[0].median, 80_000.0);
        assert_eq!(points[1].country, US);
        assert_eq!(points[1].count, 2);
    }
}
