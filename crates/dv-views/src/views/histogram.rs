//! Measure distribution

use dv_data::Record;

use super::RebuildView;
use crate::aggregate::{histogram, FilterScope, HistogramBin};
use crate::DashboardContext;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistogramScene {
    pub bins: Vec<HistogramBin>,
    pub measure_label: &'static str,
    pub total: usize,
}

#[derive(Debug, Default)]
pub struct HistogramView {
    scene: HistogramScene,
    generation: u64,
}

impl HistogramView {
    pub fn scene(&self) -> &HistogramScene {
        &self.scene
    }
}

impl<R: Record> RebuildView<R> for HistogramView {
    fn name(&self) -> &'static str {
        "Distribution"
    }

    fn rebuild(&mut self, ctx: &DashboardContext<R>) {
        self.generation += 1;
        let values: Vec<f64> = ctx.filtered(FilterScope::Both).iter().map(|r| r.measure()).collect();
        self.scene = HistogramScene {
            bins: histogram(&values, ctx.settings.histogram_bins),
            measure_label: R::measure_label(),
            total: values.len(),
        };
    }

    fn generation(&self) -> u64 {
        self.generation
    }
}
