//! Color scales for the dashboard

use egui::Color32;

/// Fill of countries without records
pub const NO_DATA: Color32 = Color32::from_gray(205);

pub const OCEAN: Color32 = Color32::from_rgb(230, 240, 250);

pub const HIGHLIGHT: Color32 = Color32::from_rgb(250, 100, 100);

/// Get a categorical color from a palette
pub fn categorical_color(index: usize) -> Color32 {
    const PALETTE: &[Color32] = &[
        Color32::from_rgb(100, 150, 250),
        Color32::from_rgb(250, 150, 100),
        Color32::from_rgb(150, 250, 100),
        Color32::from_rgb(250, 100, 150),
        Color32::from_rgb(150, 100, 250),
        Color32::from_rgb(250, 250, 100),
        Color32::from_rgb(100, 250, 250),
        Color32::from_rgb(250, 100, 100),
    ];
    PALETTE[index % PALETTE.len()]
}

/// Viridis color map, linear between five stops
pub fn viridis_color(t: f32) -> Color32 {
    const STOPS: [[f32; 3]; 5] = [
        [68.0, 1.0, 84.0],
        [53.0, 91.0, 125.0],
        [42.0, 117.0, 142.0],
        [86.0, 163.0, 92.0],
        [253.0, 231.0, 36.0],
    ];
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let scaled = t * (STOPS.len() - 1) as f32;
    let i = (scaled.floor() as usize).min(STOPS.len() - 2);
    let s = scaled - i as f32;
    let [a, b] = [STOPS[i], STOPS[i + 1]];
    let channel = |k: usize| (a[k] * (1.0 - s) + b[k] * s).round() as u8;
    Color32::from_rgb(channel(0), channel(1), channel(2))
}

/// Choropleth fill for a value within `range`
pub fn choropleth_color(value: Option<f64>, range: Option<(f64, f64)>) -> Color32 {
    match (value, range) {
        (Some(v), Some((lo, hi))) if hi > lo => viridis_color(((v - lo) / (hi - lo)) as f32),
        (Some(_), Some(_)) => viridis_color(0.5),
        _ => NO_DATA,
    }
}
