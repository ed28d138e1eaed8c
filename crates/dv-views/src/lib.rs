//! Linked views of the world dashboard
//!
//! [`aggregate`] derives the datasets, [`views`] turns them into scenes,
//! [`Dashboard`] keeps the scenes in sync with the selection, and [`render`]
//! paints them with egui.

pub mod aggregate;
mod context;
mod dispatch;
pub mod render;
pub mod views;
mod viewport;

pub use context::{DashboardContext, ViewSettings};
pub use dispatch::{Dashboard, RedrawPlan, ViewEvent};
pub use viewport::{DashboardTab, Viewport};

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use dv_core::{
        preprocess, CountryIdentity, CountryRegistry, CountryShape, GeometryIndex, GeometrySettings, Projection,
        ProjectionKind, SelectionStore, ShapeGeometry, ViewTransform,
    };
    use dv_data::{IngestReport, SalaryRecord};
    use geo_types::{polygon, Coord};
    use parking_lot::RwLock;

    use crate::aggregate::fixtures::{sample, CA, DE, US};
    use crate::{Dashboard, DashboardContext, ViewSettings};

    pub fn rectangle(id: &str, name: &str, lon: (f64, f64), lat: (f64, f64)) -> CountryShape {
        CountryShape {
            raw_id: Some(id.to_string()),
            name: name.to_string(),
            geometry: ShapeGeometry::Polygon(polygon![
                (x: lon.0, y: lat.0),
                (x: lon.1, y: lat.0),
                (x: lon.1, y: lat.1),
                (x: lon.0, y: lat.1),
                (x: lon.0, y: lat.0),
            ]),
        }
    }

    fn identity(id: dv_core::CountryId, alpha2: &str, alpha3: &str, name: &str) -> CountryIdentity {
        CountryIdentity {
            id,
            alpha2: alpha2.parse().unwrap(),
            alpha3: alpha3.parse().unwrap(),
            name: name.to_string(),
        }
    }

    pub fn shapes() -> Vec<CountryShape> {
        vec![
            rectangle("840", "United States of America", (-120.0, -70.0), (30.0, 48.0)),
            rectangle("124", "Canada", (-120.0, -60.0), (50.0, 70.0)),
            rectangle("276", "Germany", (6.0, 15.0), (47.0, 55.0)),
        ]
    }

    /// Preprocess on a 360x180 equirectangular canvas, where projected
    /// x = lon + 180 and y = 90 - lat
    pub fn geometry(shapes: Vec<CountryShape>) -> GeometryIndex {
        preprocess(
            shapes,
            &GeometrySettings {
                projection: Projection::fitted(ProjectionKind::Equirectangular, 360.0, 180.0),
                excluded_territories: vec!["Antarctica".to_string()],
                fallback_centroid: Coord { x: 0.0, y: 0.0 },
            },
        )
    }

    /// Three rectangular countries, see [`shapes`]
    pub fn context() -> DashboardContext<SalaryRecord> {
        let registry = CountryRegistry::from_identities(vec![
            identity(US, "US", "USA", "United States of America"),
            identity(CA, "CA", "CAN", "Canada"),
            identity(DE, "DE", "DEU", "Germany"),
        ]);
        let settings = ViewSettings {
            histogram_bins: 10,
            bar_chart_top_k: 10,
            canvas: [360.0, 180.0],
            label_min_fraction: 0.04,
        };
        let geometry = geometry(shapes());

        DashboardContext {
            records: Arc::new(sample()),
            registry: Arc::new(registry),
            geometry: Arc::new(geometry),
            selection: SelectionStore::new(),
            transform: Arc::new(RwLock::new(ViewTransform::IDENTITY)),
            settings,
        }
    }

    pub fn dashboard() -> Dashboard<SalaryRecord> {
        Dashboard::from_context(context(), IngestReport::default())
    }
}
