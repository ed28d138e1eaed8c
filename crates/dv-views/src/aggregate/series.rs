//! Year series and category counts

use std::collections::BTreeMap;

use ahash::AHashMap;
use dv_data::Record;

use super::median;

/// One point of the per-year line chart
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YearPoint {
    pub year: i32,
    pub count: usize,
    pub median: f64,
}

/// Record count and median measure per year, ascending by year
pub fn year_series<R: Record>(records: &[&R]) -> Vec<YearPoint> {
    let mut by_year: BTreeMap<i32, Vec<f64>> = BTreeMap::new();
    for record in records {
        by_year.entry(record.year()).or_default().push(record.measure());
    }
    by_year
        .into_iter()
        .filter_map(|(year, values)| {
            let count = values.len();
            median(values).map(|median| YearPoint { year, count, median })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCount {
    pub label: String,
    pub count: usize,
}

/// The `k` most frequent categories; equal counts are ordered by name
pub fn top_categories<R: Record>(records: &[&R], k: usize) -> Vec<CategoryCount> {
    let mut counts: AHashMap<&str, usize> = AHashMap::new();
    for record in records {
        *counts.entry(record.category()).or_insert(0) += 1;
    }

    let mut ranked: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(label, count)| CategoryCount {
            label: label.to_string(),
            count,
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    ranked.truncate(k);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::fixtures::*;

    #[test]
    fn test_year_series_is_ascending() {
        let records = sample();
        let refs: Vec<_> = records.iter().collect();
        let series = year_series(&refs);

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].year, 2021);
        assert_eq!(series[0].count, 2);
        assert_eq!(series[1].year, 2022);
        assert!((series[1].median - 150_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_top_categories_breaks_ties_by_name() {
        let records = sample();
        let refs: Vec<_> = records.iter().collect();

        let top = top_categories(&refs, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0], CategoryCount { label: "Data Scientist".to_string(), count: 2 });
        // "Data Analyst" and "Data Engineer" both have one record
        assert_eq!(top[1].label, "Data Analyst");

        assert!(top_categories(&refs, 0).is_empty());
    }
}
