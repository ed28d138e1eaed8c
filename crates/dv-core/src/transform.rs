//! Zoom/pan state of the map view
//!
//! The transform lives next to the selection store but is independent of
//! it: a selection change never resets the zoom, and a full redraw reuses
//! the current transform.

use geo_types::Coord;

pub const MIN_SCALE: f64 = 1.0;
pub const MAX_SCALE: f64 = 8.0;

/// Uniform scale followed by a translation: `screen = world * k + t`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub k: f64,
    pub x: f64,
    pub y: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ViewTransform {
    pub const IDENTITY: Self = Self { k: 1.0, x: 0.0, y: 0.0 };

    pub fn apply(&self, point: Coord<f64>) -> Coord<f64> {
        Coord {
            x: point.x * self.k + self.x,
            y: point.y * self.k + self.y,
        }
    }

    pub fn invert(&self, point: Coord<f64>) -> Coord<f64> {
        Coord {
            x: (point.x - self.x) / self.k,
            y: (point.y - self.y) / self.k,
        }
    }

    /// Scale by `factor` around a fixed screen point, clamping the scale.
    ///
    /// Returns `true` if the transform changed.
    pub fn zoom_at(&mut self, focus: Coord<f64>, factor: f64) -> bool {
        if !factor.is_finite() || factor <= 0.0 {
            return false;
        }
        let k = (self.k * factor).clamp(MIN_SCALE, MAX_SCALE);
        if k == self.k {
            return false;
        }
        let anchor = self.invert(focus);
        self.k = k;
        self.x = focus.x - anchor.x * k;
        self.y = focus.y - anchor.y * k;
        true
    }

    /// Translate by a screen-space delta
    pub fn pan(&mut self, dx: f64, dy: f64) -> bool {
        if dx == 0.0 && dy == 0.0 {
            return false;
        }
        self.x += dx;
        self.y += dy;
        true
    }

    pub fn reset(&mut self) -> bool {
        let changed = *self != Self::IDENTITY;
        *self = Self::IDENTITY;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zoom_keeps_focus_fixed() {
        let mut transform = ViewTransform::default();
        let focus = Coord { x: 300.0, y: 200.0 };
        let before = transform.invert(focus);
        assert!(transform.zoom_at(focus, 2.0));
        let after = transform.invert(focus);
        assert!((before.x - after.x).abs() < 1e-9);
        assert!((before.y - after.y).abs() < 1e-9);
        assert_eq!(transform.k, 2.0);
    }

    #[test]
    fn test_scale_is_clamped() {
        let mut transform = ViewTransform::default();
        assert!(!transform.zoom_at(Coord { x: 0.0, y: 0.0 }, 0.5));
        transform.zoom_at(Coord { x: 0.0, y: 0.0 }, 100.0);
        assert_eq!(transform.k, MAX_SCALE);
    }

    #[test]
    fn test_apply_inverts() {
        let transform = ViewTransform { k: 3.0, x: 10.0, y: -5.0 };
        let p = Coord { x: 12.5, y: 7.0 };
        let back = transform.invert(transform.apply(p));
        assert!((back.x - p.x).abs() < 1e-9 && (back.y - p.y).abs() < 1e-9);
    }
}
