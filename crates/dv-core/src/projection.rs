//! Map projections from geographic to screen coordinates

use geo_types::Coord;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Latitude limit used by the Mercator projection
const MERCATOR_MAX_LAT: f64 = 85.051_128_78;

/// Supported projection types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionKind {
    #[default]
    NaturalEarth,
    Equirectangular,
    Mercator,
}

/// A projection fitted to a canvas: the world's longitude span fills the
/// canvas width and the origin sits in the canvas center, y grows downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    kind: ProjectionKind,
    scale: f64,
    center: Coord<f64>,
}

impl Projection {
    /// Fit a projection of the given kind to a canvas of `width` x `height`
    pub fn fitted(kind: ProjectionKind, width: f64, height: f64) -> Self {
        // Half-width of the unscaled projection at the equator, in radians
        let half_span = match kind {
            ProjectionKind::NaturalEarth => PI * 0.8707,
            ProjectionKind::Equirectangular | ProjectionKind::Mercator => PI,
        };
        Self {
            kind,
            scale: width / (2.0 * half_span),
            center: Coord { x: width / 2.0, y: height / 2.0 },
        }
    }

    pub fn kind(&self) -> ProjectionKind {
        self.kind
    }

    /// Project a (longitude, latitude) pair given in degrees
    pub fn project(&self, lon: f64, lat: f64) -> Coord<f64> {
        let lambda = lon.to_radians();
        let (x, y) = match self.kind {
            ProjectionKind::Equirectangular => (lambda, lat.to_radians()),
            ProjectionKind::Mercator => {
                let phi = lat.clamp(-MERCATOR_MAX_LAT, MERCATOR_MAX_LAT).to_radians();
                (lambda, (PI / 4.0 + phi / 2.0).tan().ln())
            }
            ProjectionKind::NaturalEarth => natural_earth(lambda, lat.to_radians()),
        };

        Coord {
            x: self.center.x + x * self.scale,
            y: self.center.y - y * self.scale,
        }
    }
}

/// Natural Earth I polynomial approximation
fn natural_earth(lambda: f64, phi: f64) -> (f64, f64) {
    let phi2 = phi * phi;
    let phi4 = phi2 * phi2;
    let x = lambda
        * (0.8707 - 0.131979 * phi2 + phi4 * (-0.013791 + phi4 * (0.003971 * phi2 - 0.001529 * phi4)));
    let y = phi
        * (1.007226 + phi2 * (0.015085 + phi4 * (-0.044475 + 0.028874 * phi2 - 0.005916 * phi4)));
    (x, y)
}
