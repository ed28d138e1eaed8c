//! egui painters for the dashboard scenes
//!
//! Painters only read scenes. Clicks, drags and scrolls are reported back
//! as [`ViewEvent`](crate::ViewEvent)s and applied by the dashboard after
//! the frame is drawn.

pub mod colors;
mod charts;
mod flow;
mod map;

pub use charts::{category_bars_ui, histogram_ui, scatter_ui, year_series_ui};
pub use flow::flow_ui;
pub use map::{map_ui, CanvasFit};
