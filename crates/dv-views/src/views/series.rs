//! Per-year line chart; also the year selector

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dv_core::CountryId;
use dv_data::Record;
use parking_lot::{RwLock, RwLockReadGuard};

use super::PatchView;
use crate::aggregate::{year_series, FilterScope, YearPoint};
use crate::DashboardContext;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct YearSeriesScene {
    pub points: Vec<YearPoint>,
    pub selected_year: Option<i32>,
    pub measure_label: &'static str,
}

impl YearSeriesScene {
    pub fn selected_point(&self) -> Option<&YearPoint> {
        let year = self.selected_year?;
        self.points.iter().find(|p| p.year == year)
    }
}

/// Patch-mode view: the year facet only moves the highlight
pub struct YearSeriesView {
    scene: Arc<RwLock<YearSeriesScene>>,
    refreshes: Arc<AtomicU64>,
}

impl YearSeriesView {
    pub fn new<R: Record>(ctx: &DashboardContext<R>) -> Self {
        let mut scene = YearSeriesScene {
            measure_label: R::measure_label(),
            ..YearSeriesScene::default()
        };
        <Self as PatchView<R>>::update(ctx, &mut scene);
        Self {
            scene: Arc::new(RwLock::new(scene)),
            refreshes: Arc::default(),
        }
    }

    /// Aggregate refreshes since the view was built
    pub fn refreshes(&self) -> u64 {
        self.refreshes.load(Ordering::Relaxed)
    }

    pub fn read(&self) -> RwLockReadGuard<'_, YearSeriesScene> {
        self.scene.read()
    }
}

impl<R: Record> PatchView<R> for YearSeriesView {
    type Scene = YearSeriesScene;
    /// The series ignores the year facet
    type Key = Option<CountryId>;

    fn name(&self) -> &'static str {
        "Years"
    }

    fn scene(&self) -> Arc<RwLock<YearSeriesScene>> {
        Arc::clone(&self.scene)
    }

    fn refresh_counter(&self) -> Arc<AtomicU64> {
        Arc::clone(&self.refreshes)
    }

    fn aggregate_key(ctx: &DashboardContext<R>) -> Option<CountryId> {
        ctx.selection_state().country
    }

    fn refresh(ctx: &DashboardContext<R>, scene: &mut YearSeriesScene) {
        let records = ctx.filtered(FilterScope::CountryOnly);
        scene.points = year_series(&records);
    }

    fn patch(ctx: &DashboardContext<R>, scene: &mut YearSeriesScene) {
        scene.selected_year = ctx.selection_state().year;
    }
}
