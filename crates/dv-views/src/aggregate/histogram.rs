//! Measure histogram with a trailing headroom bin

/// One histogram bin, closed on the right: `(range_start, range_end]`.
/// The first bin also includes its start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub range_start: f64,
    pub range_end: f64,
    pub count: usize,
}

/// Bin width for `bins` regular bins covering `[0, max]`
pub fn bin_width(max: f64, bins: usize) -> f64 {
    if !(max > 0.0) || bins == 0 {
        return 1.0;
    }
    (max / bins as f64).ceil()
}

/// Index of the bin holding `value`, out of `bins + 1` bins of `width`
pub fn bin_index(value: f64, width: f64, bins: usize) -> usize {
    if !(value > 0.0) {
        return 0;
    }
    let index = (value / width).ceil() as usize;
    index.saturating_sub(1).min(bins)
}

/// Bin `values` into `bins` regular bins plus one headroom bin.
///
/// The width is `ceil(max / bins)`, so the maximum always falls in a regular
/// bin and the last bin stays free. An empty input has no bins.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    let bins = bins.max(1);
    let Some(max) = values.iter().copied().filter(|v| v.is_finite()).reduce(f64::max) else {
        return Vec::new();
    };

    let width = bin_width(max, bins);
    let mut result: Vec<HistogramBin> = (0..=bins)
        .map(|i| HistogramBin {
            range_start: i as f64 * width,
            range_end: (i + 1) as f64 * width,
            count: 0,
        })
        .collect();

    for value in values.iter().copied().filter(|v| v.is_finite()) {
        result[bin_index(value, width, bins)].count += 1;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_has_no_bins() {
        assert!(histogram(&[], 10).is_empty());
    }

    #[test]
    fn test_width_and_headroom() {
        let values = [10.0, 45.0, 95.0];
        let bins = histogram(&values, 10);

        // ceil(95 / 10) = 10, eleven bins over [0, 110]
        assert_eq!(bins.len(), 11);
        assert_eq!(bins[0].range_end, 10.0);
        assert_eq!(bins[10].range_end, 110.0);
        assert_eq!(bins[10].count, 0);

        // 10 is the right edge of the first bin
        assert_eq!(bins[0].count, 1);
        assert_eq!(bins[4].count, 1);
        assert_eq!(bins[9].count, 1);
    }

    #[test]
    fn test_every_value_lands_once_and_max_avoids_last_bin() {
        for max in [1.0, 7.0, 99.0, 100.0, 101.0, 123_456.0] {
            let values: Vec<f64> = (0..=20).map(|i| max * i as f64 / 20.0).collect();
            let bins = histogram(&values, 10);
            let total: usize = bins.iter().map(|b| b.count).sum();
            assert_eq!(total, values.len());
            assert_eq!(bins.last().unwrap().count, 0, "max {} reached the headroom bin", max);
        }
    }

    #[test]
    fn test_non_positive_values() {
        let bins = histogram(&[0.0, -5.0], 4);
        assert_eq!(bin_width(0.0, 4), 1.0);
        assert_eq!(bins.len(), 5);
        assert_eq!(bins[0].count, 2);
    }
}
