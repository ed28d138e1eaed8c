//! Core functionality for the world dashboard
//!
//! This crate provides the country reconciliation tables, the geometry
//! preprocessing, and the shared selection/redraw state the views are
//! synchronized through.

pub mod country;
pub mod geometry;
pub mod projection;
pub mod redraw;
pub mod selection;
pub mod transform;

// Re-export commonly used types
pub use country::{Alpha2, Alpha3, CountryCodeError, CountryId, CountryIdentity, CountryRegistry};
pub use geometry::{
    label_visible, preprocess, CountryGeometry, CountryShape, GeometryIndex, GeometrySettings,
    LabelViewport, ShapeGeometry,
};
pub use projection::{Projection, ProjectionKind};
pub use redraw::{redraw_from_fn, RedrawCallback, RedrawHandle, RedrawRegistry};
pub use selection::{SelectionChange, SelectionState, SelectionStore, SelectionTarget};
pub use transform::ViewTransform;
