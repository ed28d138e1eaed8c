//! Shared state every view reads from

use std::sync::Arc;

use dv_core::{CountryRegistry, GeometryIndex, LabelViewport, SelectionState, SelectionStore, ViewTransform};
use dv_data::{DashboardConfig, Record};
use parking_lot::RwLock;

use crate::aggregate::{filter_records, FilterScope};

/// View parameters taken from the dashboard configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewSettings {
    pub histogram_bins: usize,
    pub bar_chart_top_k: usize,
    /// Map canvas size, in projected units
    pub canvas: [f64; 2],
    pub label_min_fraction: f64,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self::from_config(&DashboardConfig::default())
    }
}

impl ViewSettings {
    pub fn from_config(config: &DashboardConfig) -> Self {
        Self {
            histogram_bins: config.histogram_bins,
            bar_chart_top_k: config.bar_chart_top_k,
            canvas: config.canvas,
            label_min_fraction: config.label_min_viewport_fraction,
        }
    }
}

/// Context passed to views when they are built, rebuilt or patched
pub struct DashboardContext<R> {
    /// Immutable record set
    pub records: Arc<Vec<R>>,

    /// Country code lookups
    pub registry: Arc<CountryRegistry>,

    /// Projected country geometry
    pub geometry: Arc<GeometryIndex>,

    /// Current country/year selection
    pub selection: SelectionStore,

    /// Map zoom/pan
    pub transform: Arc<RwLock<ViewTransform>>,

    pub settings: ViewSettings,
}

// Manual impl: cloning the context never clones `R`
impl<R> Clone for DashboardContext<R> {
    fn clone(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
            registry: Arc::clone(&self.registry),
            geometry: Arc::clone(&self.geometry),
            selection: self.selection.clone(),
            transform: Arc::clone(&self.transform),
            settings: self.settings,
        }
    }
}

impl<R: Record> DashboardContext<R> {
    pub fn selection_state(&self) -> SelectionState {
        self.selection.current()
    }

    pub fn transform(&self) -> ViewTransform {
        *self.transform.read()
    }

    /// Records restricted by the current selection
    pub fn filtered(&self, scope: FilterScope) -> Vec<&R> {
        filter_records(&self.records, &self.selection.current(), scope)
    }

    pub fn label_viewport(&self) -> LabelViewport {
        let [width, height] = self.settings.canvas;
        LabelViewport {
            width,
            height,
            transform: self.transform(),
            min_fraction: self.settings.label_min_fraction,
        }
    }

    /// Display name of a country, falling back to its shape name
    pub fn country_name(&self, id: dv_core::CountryId) -> String {
        self.registry
            .id_to_name(id)
            .or_else(|| self.geometry.get(id).map(|g| g.name.as_str()))
            .map(str::to_string)
            .unwrap_or_else(|| id.to_string())
    }
}
