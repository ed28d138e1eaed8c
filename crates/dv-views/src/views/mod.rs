//! Scene models for the dashboard views
//!
//! A scene is the data a painter needs, already derived from the records
//! and the current selection. Views come in two modes:
//!
//! - rebuild views ([`RebuildView`]) throw their scene away and derive a
//!   new one on every selection change;
//! - patch views ([`PatchView`]) build their scene once and register a
//!   redraw callback that updates it in place (fill, opacity, stroke,
//!   labels, highlights).

mod arcs;
mod bars;
mod flow;
mod histogram;
mod map;
mod scatter;
mod series;

pub use arcs::{LinkArc, LinkArcsScene, LinkArcsView};
pub use bars::{CategoryBarScene, CategoryBarView};
pub use flow::{FlowLayout, FlowLink, FlowNodeBox, FlowScene, FlowView};
pub use histogram::{HistogramScene, HistogramView};
pub use map::{MapCountry, MapScene, MapView};
pub use scatter::{CountryScatterView, ScatterEntry, ScatterScene};
pub use series::{YearSeriesScene, YearSeriesView};

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dv_core::{redraw_from_fn, RedrawHandle, RedrawRegistry};
use dv_data::Record;
use parking_lot::RwLock;

use crate::DashboardContext;

/// A view whose scene is rebuilt from scratch on selection changes
pub trait RebuildView<R: Record>: Send + Sync {
    /// Display name
    fn name(&self) -> &'static str;

    /// Discard the scene and derive a new one
    fn rebuild(&mut self, ctx: &DashboardContext<R>);

    /// Number of rebuilds so far
    fn generation(&self) -> u64;
}

/// A view whose scene is built once and then patched in place
///
/// Aggregates behind the scene are refreshed only when the selection facets
/// they depend on ([`PatchView::Key`]) change; zoom and pan only patch.
pub trait PatchView<R: Record>: Send + Sync {
    type Scene: Send + Sync + 'static;

    /// Selection facets the scene's aggregates are derived from
    type Key: PartialEq + Send + Sync + 'static;

    fn name(&self) -> &'static str;

    /// Shared handle to the scene the painter reads
    fn scene(&self) -> Arc<RwLock<Self::Scene>>;

    /// Counter bumped by the redraw callback on every refresh
    fn refresh_counter(&self) -> Arc<AtomicU64>;

    fn aggregate_key(ctx: &DashboardContext<R>) -> Self::Key;

    /// Recompute the aggregates behind the scene
    fn refresh(ctx: &DashboardContext<R>, scene: &mut Self::Scene);

    /// Update highlights and labels for the current selection and transform
    fn patch(ctx: &DashboardContext<R>, scene: &mut Self::Scene);

    /// Refresh, then patch
    fn update(ctx: &DashboardContext<R>, scene: &mut Self::Scene) {
        Self::refresh(ctx, scene);
        Self::patch(ctx, scene);
    }

    /// Register the patch step with the redraw registry.
    ///
    /// The scene must already be up to date for the current selection.
    fn register(&self, ctx: &DashboardContext<R>, registry: &mut RedrawRegistry) -> RedrawHandle
    where
        Self: Sized + 'static,
    {
        let scene = self.scene();
        let refreshes = self.refresh_counter();
        let ctx = ctx.clone();
        let name = self.name();
        let mut refreshed_for = Self::aggregate_key(&ctx);
        registry.register(redraw_from_fn(move || {
            let key = Self::aggregate_key(&ctx);
            let mut scene = scene.write();
            if key != refreshed_for {
                tracing::debug!("Refreshing {}", name);
                Self::refresh(&ctx, &mut scene);
                refreshes.fetch_add(1, Ordering::Relaxed);
                refreshed_for = key;
            }
            tracing::trace!("Patching {}", name);
            Self::patch(&ctx, &mut scene);
        }))
    }
}
