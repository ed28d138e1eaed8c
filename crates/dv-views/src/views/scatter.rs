//! Record count against median measure, one point per country

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dv_core::CountryId;
use dv_data::Record;
use parking_lot::{RwLock, RwLockReadGuard};

use super::PatchView;
use crate::aggregate::{country_scatter, FilterScope, ScatterPoint};
use crate::DashboardContext;

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterEntry {
    pub point: ScatterPoint,
    pub name: String,
    pub selected: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScatterScene {
    pub entries: Vec<ScatterEntry>,
    pub selected: Option<CountryId>,
    pub measure_label: &'static str,
}

/// Patch-mode scatter plot; clicking a point selects its country
pub struct CountryScatterView {
    scene: Arc<RwLock<ScatterScene>>,
    refreshes: Arc<AtomicU64>,
}

impl CountryScatterView {
    pub fn new<R: Record>(ctx: &DashboardContext<R>) -> Self {
        let mut scene = ScatterScene {
            measure_label: R::measure_label(),
            ..ScatterScene::default()
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

    pub fn read(&self) -> RwLockReadGuard<'_, ScatterScene> {
        self.scene.read()
    }
}

impl<R: Record> PatchView<R> for CountryScatterView {
    type Scene = ScatterScene;
    /// Points ignore the country facet
    type Key = Option<i32>;

    fn name(&self) -> &'static str {
        "Countries"
    }

    fn scene(&self) -> Arc<RwLock<ScatterScene>> {
        Arc::clone(&self.scene)
    }

    fn refresh_counter(&self) -> Arc<AtomicU64> {
        Arc::clone(&self.refreshes)
    }

    fn aggregate_key(ctx: &DashboardContext<R>) -> Option<i32> {
        ctx.selection_state().year
    }

    fn refresh(ctx: &DashboardContext<R>, scene: &mut ScatterScene) {
        let records = ctx.filtered(FilterScope::YearOnly);
        scene.entries = country_scatter(&records)
            .into_iter()
            .map(|point| ScatterEntry {
                name: ctx.country_name(point.country),
                selected: false,
                point,
            })
            .collect();
    }

    fn patch(ctx: &DashboardContext<R>, scene: &mut ScatterScene) {
        let selected = ctx.selection_state().country;
        scene.selected = selected;
        for entry in &mut scene.entries {
            entry.selected = selected == Some(entry.point.country);
        }
    }
}
