//! Country geometry preprocessing
//!
//! Every country shape is projected once at load time. For each country we
//! keep the projected outline for drawing, plus the dominant polygon (the
//! part whose outer ring has the largest planar area) and its centroid,
//! which place labels and anchor arcs between countries.

use ahash::AHashMap;
use geo::{BoundingRect, Contains, MapCoords};
use geo_types::{Coord, LineString, MultiPolygon, Point, Polygon, Rect};

use crate::country::CountryId;
use crate::projection::Projection;
use crate::transform::ViewTransform;

/// Areas below this are treated as zero
const AREA_EPSILON: f64 = 1e-12;

/// Raw country geometry in geographic (lon/lat) coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeGeometry {
    Polygon(Polygon<f64>),
    MultiPolygon(MultiPolygon<f64>),
}

/// One feature of the country shape collection, before reconciliation
#[derive(Debug, Clone)]
pub struct CountryShape {
    /// Raw topology id, as found in the shape file
    pub raw_id: Option<String>,
    pub name: String,
    pub geometry: ShapeGeometry,
}

/// Derived geometry of one country, in projected screen coordinates
#[derive(Debug, Clone)]
pub struct CountryGeometry {
    /// `None` for shapes without a usable country id; they are drawn but
    /// never hit or selected
    pub id: Option<CountryId>,
    pub name: String,
    /// Every part of the country, projected
    pub outline: MultiPolygon<f64>,
    /// Index of the dominant polygon within `outline`
    pub dominant_index: usize,
    pub centroid: Coord<f64>,
    /// False when the centroid is a fallback; the label stays hidden
    pub centroid_valid: bool,
    /// Bounding box of the dominant polygon
    pub dominant_bounds: Option<Rect<f64>>,
}

impl CountryGeometry {
    pub fn dominant_polygon(&self) -> Option<&Polygon<f64>> {
        self.outline.0.get(self.dominant_index)
    }

    /// Whether a projected point lies inside any part, outside its holes
    pub fn contains(&self, point: Coord<f64>) -> bool {
        self.outline.contains(&Point::from(point))
    }
}

/// Settings for [`preprocess`]
#[derive(Debug, Clone)]
pub struct GeometrySettings {
    pub projection: Projection,
    /// Territory ids or names removed before processing
    pub excluded_territories: Vec<String>,
    /// Used when a centroid comes out non-finite
    pub fallback_centroid: Coord<f64>,
}

/// Preprocessed geometry of every country, in shape-file order
#[derive(Debug, Clone, Default)]
pub struct GeometryIndex {
    countries: Vec<CountryGeometry>,
    by_id: AHashMap<CountryId, usize>,
}

impl GeometryIndex {
    pub fn get(&self, id: CountryId) -> Option<&CountryGeometry> {
        self.by_id.get(&id).and_then(|&idx| self.countries.get(idx))
    }

    /// Geometry at a position of [`GeometryIndex::iter`]
    pub fn nth(&self, index: usize) -> Option<&CountryGeometry> {
        self.countries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CountryGeometry> {
        self.countries.iter()
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    pub fn centroid(&self, id: CountryId) -> Option<Coord<f64>> {
        self.get(id).filter(|g| g.centroid_valid).map(|g| g.centroid)
    }

    /// Number of shapes kept without a country id
    pub fn unattached(&self) -> usize {
        self.countries.iter().filter(|g| g.id.is_none()).count()
    }

    /// Country under a projected (untransformed) point
    pub fn hit_test(&self, point: Coord<f64>) -> Option<CountryId> {
        self.countries
            .iter()
            .filter(|g| g.id.is_some())
            .find(|g| g.contains(point))
            .and_then(|g| g.id)
    }
}

/// Remove excluded territories, project every shape and compute dominant
/// polygons and centroids.
pub fn preprocess<I>(shapes: I, settings: &GeometrySettings) -> GeometryIndex
where
    I: IntoIterator<Item = CountryShape>,
{
    let mut index = GeometryIndex::default();

    for shape in shapes {
        if is_excluded(&shape, &settings.excluded_territories) {
            tracing::info!("Excluding territory {} from the map", shape.name);
            continue;
        }

        let id = shape.raw_id.as_deref().and_then(|raw| raw.parse::<CountryId>().ok());
        match id {
            None => tracing::warn!("Shape {} has no usable country id, drawing it unattached", shape.name),
            Some(id) if index.by_id.contains_key(&id) => {
                tracing::warn!("Duplicate shape for country {} ({}), keeping the first", id, shape.name);
                continue;
            }
            Some(_) => {}
        }

        let outline = match shape.geometry {
            ShapeGeometry::Polygon(polygon) => MultiPolygon(vec![polygon]),
            ShapeGeometry::MultiPolygon(multi) => multi,
        };
        let projection = settings.projection;
        let outline = outline.map_coords(|c| projection.project(c.x, c.y));

        let dominant_index = dominant_polygon_index(&outline.0).unwrap_or(0);
        let (centroid, centroid_valid) = match outline.0.get(dominant_index) {
            Some(polygon) => match ring_centroid(polygon.exterior()) {
                Centroid::Valid(c) => (c, true),
                Centroid::Degenerate => (Coord { x: 0.0, y: 0.0 }, false),
                Centroid::NonFinite => (settings.fallback_centroid, false),
            },
            None => (Coord { x: 0.0, y: 0.0 }, false),
        };
        let dominant_bounds = outline.0.get(dominant_index).and_then(|p| p.bounding_rect());

        if let Some(id) = id {
            index.by_id.insert(id, index.countries.len());
        }
        index.countries.push(CountryGeometry {
            id,
            name: shape.name,
            outline,
            dominant_index,
            centroid,
            centroid_valid,
            dominant_bounds,
        });
    }

    tracing::info!(
        "Preprocessed geometry for {} shapes ({} unattached)",
        index.len(),
        index.unattached()
    );
    index
}

fn is_excluded(shape: &CountryShape, excluded: &[String]) -> bool {
    let shape_id = shape.raw_id.as_deref().and_then(|raw| raw.parse::<CountryId>().ok());
    excluded.iter().any(|entry| {
        let by_id = match (entry.parse::<CountryId>(), shape_id) {
            (Ok(a), Some(b)) => a == b,
            _ => false,
        };
        by_id || entry.trim().eq_ignore_ascii_case(shape.name.trim())
    })
}

/// Absolute planar (shoelace) area of a ring, orientation independent.
///
/// Works on open and closed rings alike; non-finite input yields 0.
pub fn ring_area(ring: &LineString<f64>) -> f64 {
    let area = signed_area(&ring.0).abs();
    if area.is_finite() {
        area
    } else {
        0.0
    }
}

fn signed_area(coords: &[Coord<f64>]) -> f64 {
    let n = coords.len();
    if n < 3 {
        return 0.0;
    }
    let twice: f64 = (0..n)
        .map(|i| {
            let a = coords[i];
            let b = coords[(i + 1) % n];
            a.x * b.y - b.x * a.y
        })
        .sum();
    twice / 2.0
}

/// Index of the polygon whose outer ring has the largest area.
///
/// Equal areas are broken by the lexicographically smallest vertex, so the
/// result does not depend on polygon order or ring orientation.
pub fn dominant_polygon_index(polygons: &[Polygon<f64>]) -> Option<usize> {
    let mut best: Option<(usize, f64, (f64, f64))> = None;
    for (idx, polygon) in polygons.iter().enumerate() {
        let area = ring_area(polygon.exterior());
        let key = min_vertex(polygon.exterior());
        let better = match best {
            None => true,
            Some((_, best_area, best_key)) => {
                area > best_area || (area == best_area && key < best_key)
            }
        };
        if better {
            best = Some((idx, area, key));
        }
    }
    best.map(|(idx, _, _)| idx)
}

fn min_vertex(ring: &LineString<f64>) -> (f64, f64) {
    ring.0
        .iter()
        .filter(|c| c.x.is_finite() && c.y.is_finite())
        .map(|c| (c.x, c.y))
        .fold((f64::INFINITY, f64::INFINITY), |acc, v| if v < acc { v } else { acc })
}

/// Outcome of a centroid computation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Centroid {
    Valid(Coord<f64>),
    /// Empty ring or zero area
    Degenerate,
    /// NaN or infinite coordinates
    NonFinite,
}

/// Area-weighted centroid of a ring
pub fn ring_centroid(ring: &LineString<f64>) -> Centroid {
    let coords = &ring.0;
    let n = coords.len();
    if n < 3 {
        return Centroid::Degenerate;
    }

    let area = signed_area(coords);
    if !area.is_finite() {
        return Centroid::NonFinite;
    }
    if area.abs() < AREA_EPSILON {
        return Centroid::Degenerate;
    }

    let (mut cx, mut cy) = (0.0, 0.0);
    for i in 0..n {
        let a = coords[i];
        let b = coords[(i + 1) % n];
        let cross = a.x * b.y - b.x * a.y;
        cx += (a.x + b.x) * cross;
        cy += (a.y + b.y) * cross;
    }
    let centroid = Coord {
        x: cx / (6.0 * area),
        y: cy / (6.0 * area),
    };

    if centroid.x.is_finite() && centroid.y.is_finite() {
        Centroid::Valid(centroid)
    } else {
        Centroid::NonFinite
    }
}

/// Viewport parameters for label visibility
#[derive(Debug, Clone, Copy)]
pub struct LabelViewport {
    pub width: f64,
    pub height: f64,
    pub transform: ViewTransform,
    /// Minimum on-screen extent of the dominant polygon, as a fraction of
    /// the viewport width
    pub min_fraction: f64,
}

/// Whether a country label should be drawn at the current zoom.
///
/// Selected countries are always labelled; unselected ones need a valid
/// centroid inside the viewport and a dominant polygon large enough on
/// screen.
pub fn label_visible(geometry: &CountryGeometry, viewport: &LabelViewport, selected: bool) -> bool {
    if !geometry.centroid_valid {
        return false;
    }
    if selected {
        return true;
    }

    let center = viewport.transform.apply(geometry.centroid);
    if center.x < 0.0 || center.x > viewport.width || center.y < 0.0 || center.y > viewport.height {
        return false;
    }

    let Some(bounds) = geometry.dominant_bounds else {
        return false;
    };
    let extent = bounds.width().max(bounds.height()) * viewport.transform.k;
    viewport.width > 0.0 && extent / viewport.width >= viewport.min_fraction
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::ProjectionKind;
    use geo_types::polygon;

    fn square(x: f64, y: f64, size: f64) -> Polygon<f64> {
        polygon![
            (x: x, y: y),
            (x: x + size, y: y),
            (x: x + size, y: y + size),
            (x: x, y: y + size),
            (x: x, y: y),
        ]
    }

    fn reversed(polygon: &Polygon<f64>) -> Polygon<f64> {
        let mut coords = polygon.exterior().0.clone();
        coords.reverse();
        Polygon::new(LineString(coords), vec![])
    }

    fn settings() -> GeometrySettings {
        GeometrySettings {
            projection: Projection::fitted(ProjectionKind::Equirectangular, 360.0, 180.0),
            excluded_territories: vec!["Antarctica".to_string(), "010".to_string()],
            fallback_centroid: Coord { x: -1.0, y: -1.0 },
        }
    }

    #[test]
    fn test_ring_area_ignores_orientation() {
        let sq = square(0.0, 0.0, 2.0);
        assert_eq!(ring_area(sq.exterior()), 4.0);
        assert_eq!(ring_area(reversed(&sq).exterior()), 4.0);
    }

    #[test]
    fn test_dominant_polygon_is_order_and_orientation_invariant() {
        let small = square(0.0, 0.0, 1.0);
        let large = square(5.0, 5.0, 3.0);
        let medium = square(-4.0, 2.0, 2.0);

        let a = vec![small.clone(), large.clone(), medium.clone()];
        let b = vec![reversed(&medium), reversed(&large), small.clone()];
        assert_eq!(a[dominant_polygon_index(&a).unwrap()].exterior().0.len(), 5);
        assert_eq!(ring_area(a[dominant_polygon_index(&a).unwrap()].exterior()), 9.0);
        assert_eq!(ring_area(b[dominant_polygon_index(&b).unwrap()].exterior()), 9.0);

        // Equal areas resolve to the same polygon regardless of order
        let left = square(0.0, 0.0, 1.0);
        let right = square(3.0, 0.0, 1.0);
        let first = vec![left.clone(), right.clone()];
        let second = vec![reversed(&right), left.clone()];
        assert_eq!(min_vertex(first[dominant_polygon_index(&first).unwrap()].exterior()), (0.0, 0.0));
        assert_eq!(min_vertex(second[dominant_polygon_index(&second).unwrap()].exterior()), (0.0, 0.0));
    }

    #[test]
    fn test_centroid_of_square() {
        match ring_centroid(square(2.0, 4.0, 2.0).exterior()) {
            Centroid::Valid(c) => {
                assert!((c.x - 3.0).abs() < 1e-9);
                assert!((c.y - 5.0).abs() < 1e-9);
            }
            other => panic!("unexpected centroid {:?}", other),
        }
    }

    #[test]
    fn test_degenerate_and_nan_centroids() {
        assert_eq!(ring_centroid(&LineString(vec![])), Centroid::Degenerate);
        let flat = LineString::from(vec![(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);
        assert_eq!(ring_centroid(&flat), Centroid::Degenerate);
        let nan = LineString::from(vec![(0.0, 0.0), (f64::NAN, 1.0), (1.0, 1.0)]);
        assert_eq!(ring_centroid(&nan), Centroid::NonFinite);
    }

    #[test]
    fn test_preprocess_excludes_and_falls_back() {
        let shapes = vec![
            CountryShape {
                raw_id: Some("010".to_string()),
                name: "Antarctica".to_string(),
                geometry: ShapeGeometry::Polygon(square(0.0, -80.0, 10.0)),
            },
            CountryShape {
                raw_id: Some("250".to_string()),
                name: "France".to_string(),
                geometry: ShapeGeometry::MultiPolygon(MultiPolygon(vec![
                    square(-50.0, 4.0, 1.0),
                    square(0.0, 43.0, 6.0),
                ])),
            },
            CountryShape {
                raw_id: Some("999".to_string()),
                name: "Broken".to_string(),
                geometry: ShapeGeometry::Polygon(Polygon::new(
                    LineString::from(vec![(0.0, 0.0), (f64::NAN, 1.0), (1.0, 1.0)]),
                    vec![],
                )),
            },
            CountryShape {
                raw_id: Some("-99".to_string()),
                name: "Unknown".to_string(),
                geometry: ShapeGeometry::Polygon(square(100.0, 0.0, 1.0)),
            },
        ];

        let index = preprocess(shapes, &settings());
        assert_eq!(index.len(), 3);
        assert_eq!(index.unattached(), 1);
        assert!(index.get(CountryId(10)).is_none());

        let france = index.get(CountryId(250)).unwrap();
        assert_eq!(france.dominant_index, 1);
        assert!(france.centroid_valid);
        // Equirectangular on a 360x180 canvas: 1 degree per pixel, y flipped
        assert!((france.centroid.x - 183.0).abs() < 1e-6);
        assert!((france.centroid.y - (90.0 - 46.0)).abs() < 1e-6);

        let broken = index.get(CountryId(999)).unwrap();
        assert!(!broken.centroid_valid);
        assert_eq!(broken.centroid, Coord { x: -1.0, y: -1.0 });
        assert_eq!(index.centroid(CountryId(999)), None);

        // Kept for drawing, but never hit
        let unknown = index.nth(2).unwrap();
        assert_eq!(unknown.id, None);
        assert_eq!(unknown.name, "Unknown");
        assert!(unknown.contains(unknown.centroid));
        assert_eq!(index.hit_test(unknown.centroid), None);
    }

    #[test]
    fn test_shapes_without_ids_are_kept() {
        let shapes = vec![
            CountryShape {
                raw_id: Some("-99".to_string()),
                name: "Kosovo".to_string(),
                geometry: ShapeGeometry::Polygon(square(20.0, 42.0, 2.0)),
            },
            CountryShape {
                raw_id: None,
                name: "Somaliland".to_string(),
                geometry: ShapeGeometry::Polygon(square(43.0, 8.0, 4.0)),
            },
        ];
        let index = preprocess(shapes, &settings());

        assert_eq!(index.len(), 2);
        assert_eq!(index.unattached(), 2);
        assert!(index.iter().all(|g| g.centroid_valid));
    }

    #[test]
    fn test_hit_test_skips_holes() {
        let ring = |x: f64, y: f64, size: f64| {
            LineString::from(vec![(x, y), (x + size, y), (x + size, y + size), (x, y + size), (x, y)])
        };
        let shapes = vec![CountryShape {
            raw_id: Some("380".to_string()),
            name: "Italy".to_string(),
            geometry: ShapeGeometry::Polygon(Polygon::new(ring(0.0, 30.0, 20.0), vec![ring(5.0, 35.0, 10.0)])),
        }];
        let index = preprocess(shapes, &settings());

        // Projected x = lon + 180, y = 90 - lat
        assert_eq!(index.hit_test(Coord { x: 182.0, y: 58.0 }), Some(CountryId(380)));
        assert_eq!(index.hit_test(Coord { x: 190.0, y: 50.0 }), None);
    }

    #[test]
    fn test_hit_test_and_label_visibility() {
        let shapes = vec![CountryShape {
            raw_id: Some("250".to_string()),
            name: "France".to_string(),
            geometry: ShapeGeometry::Polygon(square(0.0, 43.0, 6.0)),
        }];
        let index = preprocess(shapes, &settings());
        let france = index.get(CountryId(250)).unwrap();

        assert_eq!(index.hit_test(france.centroid), Some(CountryId(250)));
        assert_eq!(index.hit_test(Coord { x: 10.0, y: 10.0 }), None);

        let mut viewport = LabelViewport {
            width: 360.0,
            height: 180.0,
            transform: ViewTransform::IDENTITY,
            min_fraction: 0.04,
        };
        // 6px wide on a 360px viewport is below the 4% threshold
        assert!(!label_visible(france, &viewport, false));
        assert!(label_visible(france, &viewport, true));

        viewport.transform.zoom_at(france.centroid, 4.0);
        assert!(label_visible(france, &viewport, false));
    }
}
