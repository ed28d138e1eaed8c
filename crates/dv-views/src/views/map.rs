//! Choropleth world map

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dv_core::{label_visible, CountryId};
use dv_data::Record;
use geo::TriangulateEarcut;
use geo_types::Coord;
use parking_lot::{RwLock, RwLockReadGuard};

use super::PatchView;
use crate::aggregate::{median_by_country, FilterScope};
use crate::DashboardContext;

/// Opacity of countries that are not the selected one
pub const DIMMED_OPACITY: f32 = 0.35;

const STROKE_WIDTH: f32 = 0.5;
const SELECTED_STROKE_WIDTH: f32 = 2.0;

/// Drawing state of one country
#[derive(Debug, Clone)]
pub struct MapCountry {
    /// `None` for shapes without a country id
    pub id: Option<CountryId>,
    pub name: String,
    /// Position of the shape in the geometry index
    pub geometry_index: usize,
    /// Whether clicking the country selects it
    pub selectable: bool,
    /// Fill triangles in projected coordinates, computed once
    pub triangles: Vec<[Coord<f64>; 3]>,
    pub centroid: Coord<f64>,

    /// Median measure, `None` when the country has no records
    pub value: Option<f64>,
    pub opacity: f32,
    pub stroke_width: f32,
    pub selected: bool,
    pub label_visible: bool,
}

#[derive(Debug, Clone, Default)]
pub struct MapScene {
    pub countries: Vec<MapCountry>,
    /// Min and max of the country values
    pub value_range: Option<(f64, f64)>,
    pub measure_label: &'static str,
    pub selected: Option<CountryId>,
}

impl MapScene {
    pub fn country(&self, id: CountryId) -> Option<&MapCountry> {
        self.countries.iter().find(|c| c.id == Some(id))
    }
}

/// Patch-mode choropleth: geometry is triangulated once, fills and
/// highlights are patched on every redraw
pub struct MapView {
    scene: Arc<RwLock<MapScene>>,
    refreshes: Arc<AtomicU64>,
}

impl MapView {
    pub fn new<R: Record>(ctx: &DashboardContext<R>) -> Self {
        let countries = ctx
            .geometry
            .iter()
            .enumerate()
            .map(|(geometry_index, geometry)| MapCountry {
                id: geometry.id,
                name: geometry.id.map_or_else(|| geometry.name.clone(), |id| ctx.country_name(id)),
                geometry_index,
                selectable: geometry.id.is_some_and(|id| ctx.registry.contains(id)),
                triangles: geometry
                    .outline
                    .0
                    .iter()
                    .flat_map(|polygon| polygon.earcut_triangles_iter())
                    .map(|t| [t.0, t.1, t.2])
                    .collect(),
                centroid: geometry.centroid,
                value: None,
                opacity: 1.0,
                stroke_width: STROKE_WIDTH,
                selected: false,
                label_visible: false,
            })
            .collect();

        let mut scene = MapScene {
            countries,
            value_range: None,
            measure_label: R::measure_label(),
            selected: None,
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

    pub fn read(&self) -> RwLockReadGuard<'_, MapScene> {
        self.scene.read()
    }
}

impl<R: Record> PatchView<R> for MapView {
    type Scene = MapScene;
    /// Fills ignore the country facet
    type Key = Option<i32>;

    fn name(&self) -> &'static str {
        "Map"
    }

    fn scene(&self) -> Arc<RwLock<MapScene>> {
        Arc::clone(&self.scene)
    }

    fn refresh_counter(&self) -> Arc<AtomicU64> {
        Arc::clone(&self.refreshes)
    }

    fn aggregate_key(ctx: &DashboardContext<R>) -> Option<i32> {
        ctx.selection_state().year
    }

    fn refresh(ctx: &DashboardContext<R>, scene: &mut MapScene) {
        let records = ctx.filtered(FilterScope::YearOnly);
        let medians = median_by_country(&records);

        scene.value_range = medians.values().fold(None, |range, &v| match range {
            None => Some((v, v)),
            Some((lo, hi)) => Some((f64::min(lo, v), f64::max(hi, v))),
        });
        for country in &mut scene.countries {
            country.value = country.id.and_then(|id| medians.get(&id).copied());
        }
    }

    fn patch(ctx: &DashboardContext<R>, scene: &mut MapScene) {
        let selection = ctx.selection_state();
        let viewport = ctx.label_viewport();

        scene.selected = selection.country;
        for country in &mut scene.countries {
            let selected = country.id.is_some() && selection.country == country.id;
            country.selected = selected;
            country.opacity = if selection.country.is_none() || selected {
                1.0
            } else {
                DIMMED_OPACITY
            };
            country.stroke_width = if selected { SELECTED_STROKE_WIDTH } else { STROKE_WIDTH };
            country.label_visible = ctx
                .geometry
                .nth(country.geometry_index)
                .map(|geometry| label_visible(geometry, &viewport, selected))
                .unwrap_or(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{context, geometry, rectangle, shapes};
    use crate::aggregate::fixtures::{CA, US};
    use dv_core::SelectionTarget;

    #[test]
    fn test_initial_scene() {
        let ctx = context();
        let view = MapView::new(&ctx);
        let scene = view.scene.read();

        assert_eq!(scene.countries.len(), 3);
        let us = scene.country(US).unwrap();
        assert!(us.selectable);
        assert!(!us.triangles.is_empty());
        assert!((us.value.unwrap() - 150_000.0).abs() < 1e-6);
        assert_eq!(us.opacity, 1.0);
        // Canada has residents but no companies
        assert_eq!(scene.country(CA).unwrap().value, None);
    }

    #[test]
    fn test_patch_highlights_selection() {
        let ctx = context();
        let view = MapView::new(&ctx);

        ctx.selection.select(SelectionTarget::Country(US));
        <MapView as PatchView<_>>::update(&ctx, &mut view.scene.write());

        let scene = view.scene.read();
        let us = scene.country(US).unwrap();
        let ca = scene.country(CA).unwrap();
        assert!(us.selected);
        assert!(us.label_visible);
        assert_eq!(us.stroke_width, SELECTED_STROKE_WIDTH);
        assert_eq!(ca.opacity, DIMMED_OPACITY);
        // The country facet does not filter the map itself
        assert!(scene.country(dv_core::CountryId(276)).unwrap().value.is_some());
    }

    #[test]
    fn test_unattached_shape_is_drawn_but_not_selectable() {
        let mut ctx = context();
        let mut shapes = shapes();
        shapes.push(rectangle("-99", "Kosovo", (20.0, 22.0), (42.0, 43.0)));
        ctx.geometry = Arc::new(geometry(shapes));

        let view = MapView::new(&ctx);
        let scene = view.scene.read();
        assert_eq!(scene.countries.len(), 4);

        let kosovo = scene.countries.iter().find(|c| c.name == "Kosovo").unwrap();
        assert_eq!(kosovo.id, None);
        assert!(!kosovo.selectable);
        assert!(!kosovo.triangles.is_empty());
        assert_eq!(kosovo.value, None);
        assert_eq!(kosovo.opacity, 1.0);
    }
}
