//! Choropleth painter with the link arcs overlay

use dv_core::{SelectionTarget, ViewTransform};
use dv_data::Record;
use egui::epaint::QuadraticBezierShape;
use egui::{Align2, Color32, FontId, Mesh, Pos2, Rect, Rounding, Sense, Shape, Stroke, Ui, Vec2};
use geo_types::Coord;

use super::colors::{choropleth_color, HIGHLIGHT, OCEAN};
use crate::{Dashboard, ViewEvent};

/// Scroll distance that doubles the zoom
const SCROLL_PER_DOUBLING: f64 = 200.0;

const BORDER_COLOR: Color32 = Color32::from_gray(90);

/// Maps the projected canvas into a screen rectangle, preserving aspect
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasFit {
    pub offset: Vec2,
    pub scale: f32,
}

impl CanvasFit {
    pub fn new(rect: Rect, canvas: [f64; 2]) -> Self {
        let [width, height] = canvas;
        let scale = (rect.width() / width as f32).min(rect.height() / height as f32).max(f32::EPSILON);
        let used = Vec2::new(width as f32, height as f32) * scale;
        Self {
            offset: rect.min.to_vec2() + (rect.size() - used) / 2.0,
            scale,
        }
    }

    pub fn to_screen(&self, point: Coord<f64>) -> Pos2 {
        Pos2::new(point.x as f32 * self.scale, point.y as f32 * self.scale) + self.offset
    }

    pub fn to_canvas(&self, pos: Pos2) -> Coord<f64> {
        let p = (pos - self.offset).to_vec2() / self.scale;
        Coord {
            x: p.x as f64,
            y: p.y as f64,
        }
    }
}

/// Draw the map and collect its interactions.
///
/// Click selects a country, drag pans, scroll zooms around the pointer and
/// double click resets the zoom.
pub fn map_ui<R: Record>(ui: &mut Ui, dashboard: &Dashboard<R>, events: &mut Vec<ViewEvent>) {
    let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
    let rect = response.rect;
    painter.rect_filled(rect, Rounding::ZERO, OCEAN);

    let fit = CanvasFit::new(rect, dashboard.context().settings.canvas);
    let transform = dashboard.transform();
    let project = |c: Coord<f64>| fit.to_screen(transform.apply(c));

    {
        let scene = dashboard.map_scene();
        for country in &scene.countries {
            let fill = choropleth_color(country.value, scene.value_range).gamma_multiply(country.opacity);
            let mut mesh = Mesh::default();
            for triangle in &country.triangles {
                let base = mesh.vertices.len() as u32;
                for corner in triangle {
                    mesh.colored_vertex(project(*corner), fill);
                }
                mesh.add_triangle(base, base + 1, base + 2);
            }
            painter.add(Shape::mesh(mesh));

            let stroke_color = if country.selected { HIGHLIGHT } else { BORDER_COLOR };
            let stroke = Stroke::new(country.stroke_width, stroke_color.gamma_multiply(country.opacity));
            if let Some(geometry) = dashboard.geometry().nth(country.geometry_index) {
                for polygon in &geometry.outline.0 {
                    for ring in std::iter::once(polygon.exterior()).chain(polygon.interiors()) {
                        let points: Vec<Pos2> = ring.coords().map(|c| project(*c)).collect();
                        painter.add(Shape::closed_line(points, stroke));
                    }
                }
            }
        }

        paint_arcs(&painter, dashboard, &project);

        for country in scene.countries.iter().filter(|c| c.label_visible) {
            painter.text(
                project(country.centroid),
                Align2::CENTER_CENTER,
                &country.name,
                FontId::proportional(if country.selected { 13.0 } else { 10.0 }),
                Color32::from_gray(30),
            );
        }
    }

    if response.double_clicked() {
        events.push(ViewEvent::ResetZoom);
    } else if response.clicked() {
        if let Some(pos) = response.interact_pointer_pos() {
            if let Some(target) = pick_country(dashboard, &fit, &transform, pos) {
                events.push(ViewEvent::Select(target));
            }
        }
    }

    if response.dragged() {
        let delta = response.drag_delta() / fit.scale;
        events.push(ViewEvent::Pan {
            dx: delta.x as f64,
            dy: delta.y as f64,
        });
    }

    if let Some(pos) = response.hover_pos() {
        let scroll = ui.input(|i| i.scroll_delta.y) as f64;
        if scroll != 0.0 {
            events.push(ViewEvent::ZoomAt {
                focus: fit.to_canvas(pos),
                factor: 2f64.powf(scroll / SCROLL_PER_DOUBLING),
            });
        }
    }
}

fn pick_country<R: Record>(
    dashboard: &Dashboard<R>,
    fit: &CanvasFit,
    transform: &ViewTransform,
    pos: Pos2,
) -> Option<SelectionTarget> {
    let point = transform.invert(fit.to_canvas(pos));
    let id = dashboard.geometry().hit_test(point)?;
    dashboard.is_selectable(id).then_some(SelectionTarget::Country(id))
}

fn paint_arcs<R: Record>(painter: &egui::Painter, dashboard: &Dashboard<R>, project: &impl Fn(Coord<f64>) -> Pos2) {
    let scene = dashboard.arcs().scene();
    let max_weight = scene.max_weight.max(1) as f32;
    for arc in &scene.arcs {
        let from = project(arc.from);
        let to = project(arc.to);
        // Bend each arc to the left of its direction
        let mid = from + (to - from) / 2.0;
        let normal = Vec2::new(-(to.y - from.y), to.x - from.x) * 0.25;
        let width = 1.0 + 3.0 * arc.weight as f32 / max_weight;
        painter.add(Shape::QuadraticBezier(QuadraticBezierShape::from_points_stroke(
            [from, mid + normal, to],
            false,
            Color32::TRANSPARENT,
            Stroke::new(width, HIGHLIGHT.gamma_multiply(0.8)),
        )));
        painter.circle_filled(to, 2.5, HIGHLIGHT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canvas_fit_round_trip() {
        let rect = Rect::from_min_size(Pos2::new(10.0, 20.0), Vec2::new(720.0, 500.0));
        let fit = CanvasFit::new(rect, [360.0, 180.0]);

        // Width-limited: scale 2, letterboxed vertically
        assert_eq!(fit.scale, 2.0);
        assert_eq!(fit.to_screen(Coord { x: 0.0, y: 0.0 }), Pos2::new(10.0, 90.0));

        let back = fit.to_canvas(fit.to_screen(Coord { x: 183.0, y: 44.0 }));
        assert!((back.x - 183.0).abs() < 1e-3);
        assert!((back.y - 44.0).abs() < 1e-3);
    }
}
