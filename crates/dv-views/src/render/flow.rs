//! Flow diagram painter

use egui::epaint::CubicBezierShape;
use egui::{Align2, Color32, FontId, Pos2, Rect, Rounding, Sense, Shape, Stroke, Ui, Vec2};

use super::colors::categorical_color;
use crate::views::{FlowNodeBox, FlowScene};

const NODE_WIDTH: f32 = 14.0;

/// Horizontal room kept free on both sides for node labels
const LABEL_MARGIN: f32 = 110.0;

struct FlowFrame {
    rect: Rect,
}

impl FlowFrame {
    fn x(&self, x: f64) -> f32 {
        self.rect.left() + x as f32 * (self.rect.width() - NODE_WIDTH)
    }

    fn y(&self, y: f64) -> f32 {
        self.rect.top() + y as f32 * self.rect.height()
    }

    fn node_rect(&self, node: &FlowNodeBox) -> Rect {
        Rect::from_min_max(
            Pos2::new(self.x(node.x), self.y(node.y0)),
            Pos2::new(self.x(node.x) + NODE_WIDTH, self.y(node.y1)),
        )
    }
}

pub fn flow_ui(ui: &mut Ui, scene: &FlowScene) {
    let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::hover());
    if scene.layout.nodes.is_empty() {
        painter.text(
            response.rect.center(),
            Align2::CENTER_CENTER,
            "No records for the current selection",
            FontId::proportional(13.0),
            ui.visuals().weak_text_color(),
        );
        return;
    }

    let frame = FlowFrame {
        rect: response.rect.shrink2(Vec2::new(LABEL_MARGIN, 8.0)),
    };
    let nodes = &scene.layout.nodes;

    for link in &scene.layout.links {
        let source = frame.node_rect(&nodes[link.source]);
        let target = frame.node_rect(&nodes[link.target]);
        let thickness = (frame.y(link.source_y1) - frame.y(link.source_y0)).max(1.0);
        let start = Pos2::new(source.right(), (frame.y(link.source_y0) + frame.y(link.source_y1)) / 2.0);
        let end = Pos2::new(target.left(), (frame.y(link.target_y0) + frame.y(link.target_y1)) / 2.0);
        let bend = (end.x - start.x) / 2.0;
        let color = categorical_color(nodes[link.source].stage).gamma_multiply(0.35);

        painter.add(Shape::CubicBezier(CubicBezierShape::from_points_stroke(
            [start, Pos2::new(start.x + bend, start.y), Pos2::new(end.x - bend, end.y), end],
            false,
            Color32::TRANSPARENT,
            Stroke::new(thickness, color),
        )));
    }

    for node in nodes {
        let rect = frame.node_rect(node);
        painter.rect_filled(rect, Rounding::same(2.0), categorical_color(node.stage));

        // Outer columns label outwards, the middle column to the right
        let (anchor, pos) = if node.stage == 0 {
            (Align2::RIGHT_CENTER, Pos2::new(rect.left() - 4.0, rect.center().y))
        } else {
            (Align2::LEFT_CENTER, Pos2::new(rect.right() + 4.0, rect.center().y))
        };
        painter.text(
            pos,
            anchor,
            format!("{} ({})", node.label, node.value),
            FontId::proportional(11.0),
            ui.visuals().text_color(),
        );
    }

    if let Some(hover) = response.hover_pos() {
        if let Some(node) = nodes.iter().find(|n| frame.node_rect(n).expand(2.0).contains(hover)) {
            response.on_hover_text(format!("{}: {} records", node.label, node.value));
        }
    }
}
