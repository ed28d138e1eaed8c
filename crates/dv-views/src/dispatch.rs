//! Selection changes and redraw dispatch
//!
//! [`Dashboard`] is the single writer of the selection store and the view
//! transform. Every interaction goes through one of its entry points, which
//! run a [`RedrawPlan`]: rebuild-mode views are rebuilt first, then the
//! redraw registry patches the remaining views in registration order.

use std::sync::Arc;

use dv_core::{
    preprocess, CountryId, GeometryIndex, GeometrySettings, Projection, RedrawRegistry, SelectionChange,
    SelectionState, SelectionStore, SelectionTarget, ViewTransform,
};
use dv_data::{DashboardConfig, DashboardInputs, IngestReport, Record};
use geo_types::Coord;
use parking_lot::{RwLock, RwLockReadGuard};

use crate::views::{
    CategoryBarView, CountryScatterView, FlowView, HistogramView, LinkArcsView, MapScene, MapView, PatchView,
    RebuildView, ScatterScene, YearSeriesScene, YearSeriesView,
};
use crate::{DashboardContext, ViewSettings};

/// What a dispatch has to redraw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedrawPlan {
    /// Rebuild the rebuild-mode views, then patch the rest
    Full,
    /// Only run the patch callbacks (zoom and pan)
    PatchOnly,
}

/// User interaction reported by the painters
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewEvent {
    Select(SelectionTarget),
    ClearSelection,
    /// Zoom by `factor` around a point in canvas coordinates
    ZoomAt { focus: Coord<f64>, factor: f64 },
    Pan { dx: f64, dy: f64 },
    ResetZoom,
}

/// All views of one dataset plus the state they are synchronized on
pub struct Dashboard<R: Record> {
    ctx: DashboardContext<R>,
    report: IngestReport,

    map: MapView,
    year_series: YearSeriesView,
    scatter: CountryScatterView,

    arcs: LinkArcsView,
    histogram: HistogramView,
    flow: FlowView,
    bars: CategoryBarView,

    redraw: RedrawRegistry,
    dispatches: u64,
}

impl<R: Record> Dashboard<R> {
    /// Preprocess the geometry and build every view from loaded inputs
    pub fn new(inputs: DashboardInputs<R>, config: &DashboardConfig) -> Self {
        let [width, height] = config.canvas;
        let [fx, fy] = config.fallback_centroid;
        let settings = GeometrySettings {
            projection: Projection::fitted(config.projection, width, height),
            excluded_territories: config.excluded_territories.clone(),
            fallback_centroid: Coord { x: fx, y: fy },
        };
        let geometry = preprocess(inputs.shapes, &settings);

        let unknown = geometry
            .iter()
            .filter(|g| !g.id.is_some_and(|id| inputs.registry.contains(id)))
            .count();
        if unknown > 0 {
            tracing::warn!("{} map shapes have no reference entry and cannot be selected", unknown);
        }

        let ctx = DashboardContext {
            records: Arc::new(inputs.records),
            registry: Arc::new(inputs.registry),
            geometry: Arc::new(geometry),
            selection: SelectionStore::new(),
            transform: Arc::new(RwLock::new(ViewTransform::IDENTITY)),
            settings: ViewSettings::from_config(config),
        };
        Self::from_context(ctx, inputs.report)
    }

    /// Build the views on an existing context
    pub fn from_context(ctx: DashboardContext<R>, report: IngestReport) -> Self {
        let map = MapView::new(&ctx);
        let year_series = YearSeriesView::new(&ctx);
        let scatter = CountryScatterView::new(&ctx);

        let mut redraw = RedrawRegistry::new();
        map.register(&ctx, &mut redraw);
        year_series.register(&ctx, &mut redraw);
        scatter.register(&ctx, &mut redraw);

        let mut dashboard = Self {
            ctx,
            report,
            map,
            year_series,
            scatter,
            arcs: LinkArcsView::default(),
            histogram: HistogramView::default(),
            flow: FlowView::default(),
            bars: CategoryBarView::default(),
            redraw,
            dispatches: 0,
        };
        dashboard.dispatch(RedrawPlan::Full);
        tracing::info!(
            "Dashboard ready: {} records, {} countries on the map",
            dashboard.ctx.records.len(),
            dashboard.ctx.geometry.len()
        );
        dashboard
    }

    /// Toggle a facet and redraw everything
    pub fn select(&mut self, target: SelectionTarget) -> SelectionChange {
        if let SelectionTarget::Country(id) = target {
            if !self.ctx.registry.contains(id) {
                tracing::debug!("Ignoring click on unreferenced country {}", id);
                let current = self.ctx.selection.current();
                return SelectionChange {
                    previous: current,
                    current,
                };
            }
        }
        let change = self.ctx.selection.select(target);
        if !change.is_noop() {
            self.dispatch(RedrawPlan::Full);
        }
        change
    }

    /// Reset both facets (the "Global" view)
    pub fn clear_selection(&mut self) -> SelectionChange {
        let change = self.ctx.selection.clear();
        if !change.is_noop() {
            self.dispatch(RedrawPlan::Full);
        }
        change
    }

    pub fn zoom_at(&mut self, focus: Coord<f64>, factor: f64) -> bool {
        let changed = self.ctx.transform.write().zoom_at(focus, factor);
        if changed {
            self.dispatch(RedrawPlan::PatchOnly);
        }
        changed
    }

    pub fn pan(&mut self, dx: f64, dy: f64) -> bool {
        let changed = self.ctx.transform.write().pan(dx, dy);
        if changed {
            self.dispatch(RedrawPlan::PatchOnly);
        }
        changed
    }

    pub fn reset_zoom(&mut self) -> bool {
        let changed = self.ctx.transform.write().reset();
        if changed {
            self.dispatch(RedrawPlan::PatchOnly);
        }
        changed
    }

    /// Apply a batch of painter events in order
    pub fn apply(&mut self, events: impl IntoIterator<Item = ViewEvent>) {
        for event in events {
            match event {
                ViewEvent::Select(target) => {
                    self.select(target);
                }
                ViewEvent::ClearSelection => {
                    self.clear_selection();
                }
                ViewEvent::ZoomAt { focus, factor } => {
                    self.zoom_at(focus, factor);
                }
                ViewEvent::Pan { dx, dy } => {
                    self.pan(dx, dy);
                }
                ViewEvent::ResetZoom => {
                    self.reset_zoom();
                }
            }
        }
    }

    /// Run a redraw plan; the single entry point for every redraw
    pub fn dispatch(&mut self, plan: RedrawPlan) {
        self.dispatches += 1;
        if plan == RedrawPlan::Full {
            let ctx = &self.ctx;
            let views: [&mut dyn RebuildView<R>; 4] =
                [&mut self.arcs, &mut self.histogram, &mut self.flow, &mut self.bars];
            for view in views {
                view.rebuild(ctx);
                tracing::debug!("Rebuilt {} (generation {})", view.name(), view.generation());
            }
        }
        self.redraw.notify_all();
    }

    pub fn context(&self) -> &DashboardContext<R> {
        &self.ctx
    }

    pub fn selection(&self) -> SelectionState {
        self.ctx.selection.current()
    }

    pub fn transform(&self) -> ViewTransform {
        self.ctx.transform()
    }

    pub fn geometry(&self) -> &GeometryIndex {
        &self.ctx.geometry
    }

    pub fn report(&self) -> IngestReport {
        self.report
    }

    pub fn country_name(&self, id: CountryId) -> String {
        self.ctx.country_name(id)
    }

    pub fn is_selectable(&self, id: CountryId) -> bool {
        self.ctx.registry.contains(id)
    }

    /// Number of dispatches run so far
    pub fn dispatch_count(&self) -> u64 {
        self.dispatches
    }

    pub fn map_scene(&self) -> RwLockReadGuard<'_, MapScene> {
        self.map.read()
    }

    pub fn year_series_scene(&self) -> RwLockReadGuard<'_, YearSeriesScene> {
        self.year_series.read()
    }

    pub fn scatter_scene(&self) -> RwLockReadGuard<'_, ScatterScene> {
        self.scatter.read()
    }

    pub fn arcs(&self) -> &LinkArcsView {
        &self.arcs
    }

    pub fn histogram(&self) -> &HistogramView {
        &self.histogram
    }

    pub fn flow(&self) -> &FlowView {
        &self.flow
    }

    pub fn bars(&self) -> &CategoryBarView {
        &self.bars
    }
}
