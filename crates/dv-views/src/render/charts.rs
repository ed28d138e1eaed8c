//! Plot-based views: histogram, category bars, year series, country scatter

use dv_core::SelectionTarget;
use egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Line, MarkerShape, Plot, PlotPoint, PlotPoints, Points};

use super::colors::{categorical_color, HIGHLIGHT};
use crate::views::{CategoryBarScene, HistogramScene, ScatterScene, YearSeriesScene};
use crate::ViewEvent;

/// Pixel radius within which a click picks a scatter point
const PICK_RADIUS: f32 = 8.0;

fn empty_notice(ui: &mut Ui) {
    ui.centered_and_justified(|ui| {
        ui.label(egui::RichText::new("No records for the current selection").weak());
    });
}

pub fn histogram_ui(ui: &mut Ui, scene: &HistogramScene) {
    if scene.bins.is_empty() {
        empty_notice(ui);
        return;
    }

    let bars: Vec<Bar> = scene
        .bins
        .iter()
        .map(|bin| {
            Bar::new((bin.range_start + bin.range_end) / 2.0, bin.count as f64)
                .width(bin.range_end - bin.range_start)
                .name(format!("{:.0} - {:.0}", bin.range_start, bin.range_end))
        })
        .collect();

    Plot::new("histogram")
        .x_axis_label(scene.measure_label)
        .y_axis_label("Records")
        .allow_drag(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(categorical_color(0)));
        });
}

pub fn category_bars_ui(ui: &mut Ui, scene: &CategoryBarScene) {
    if scene.bars.is_empty() {
        empty_notice(ui);
        return;
    }

    // Highest count on top
    let n = scene.bars.len();
    let bars: Vec<Bar> = scene
        .bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            Bar::new((n - 1 - i) as f64, bar.count as f64)
                .name(&bar.label)
                .fill(categorical_color(i))
        })
        .collect();

    Plot::new("category_bars")
        .x_axis_label("Records")
        .show_y(false)
        .allow_drag(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal());
            for (i, bar) in scene.bars.iter().enumerate() {
                plot_ui.text(
                    egui_plot::Text::new(PlotPoint::new(0.0, (n - 1 - i) as f64), bar.label.as_str())
                        .anchor(egui::Align2::LEFT_CENTER)
                        .color(Color32::from_gray(20)),
                );
            }
        });
}

/// Line of the median measure per year; clicking near a year selects it
pub fn year_series_ui(ui: &mut Ui, scene: &YearSeriesScene, events: &mut Vec<ViewEvent>) {
    if scene.points.is_empty() {
        empty_notice(ui);
        return;
    }

    let line: PlotPoints = scene.points.iter().map(|p| [p.year as f64, p.median]).collect();
    let markers: PlotPoints = scene.points.iter().map(|p| [p.year as f64, p.median]).collect();

    let clicked = Plot::new("year_series")
        .x_axis_label("Year")
        .y_axis_label(format!("Median {}", scene.measure_label))
        .allow_drag(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new(line).color(categorical_color(0)).width(2.0));
            plot_ui.points(Points::new(markers).radius(4.0).color(categorical_color(0)));
            if let Some(point) = scene.selected_point() {
                plot_ui.points(
                    Points::new(vec![[point.year as f64, point.median]])
                        .radius(7.0)
                        .shape(MarkerShape::Diamond)
                        .color(HIGHLIGHT),
                );
            }

            if plot_ui.response().clicked() {
                plot_ui.pointer_coordinate()
            } else {
                None
            }
        })
        .inner;

    if let Some(pointer) = clicked {
        let nearest = scene
            .points
            .iter()
            .map(|p| (p.year, (p.year as f64 - pointer.x).abs()))
            .filter(|(_, distance)| *distance <= 0.5)
            .min_by(|a, b| a.1.total_cmp(&b.1));
        if let Some((year, _)) = nearest {
            events.push(ViewEvent::Select(SelectionTarget::Year(year)));
        }
    }
}

/// Record count against median measure; clicking a point selects its country
pub fn scatter_ui(ui: &mut Ui, scene: &ScatterScene, events: &mut Vec<ViewEvent>) {
    if scene.entries.is_empty() {
        empty_notice(ui);
        return;
    }

    let clicked = Plot::new("country_scatter")
        .x_axis_label("Records")
        .y_axis_label(format!("Median {}", scene.measure_label))
        .show(ui, |plot_ui| {
            for entry in &scene.entries {
                let (radius, color) = if entry.selected {
                    (7.0, HIGHLIGHT)
                } else if scene.selected.is_some() {
                    (4.0, categorical_color(0).gamma_multiply(0.4))
                } else {
                    (4.0, categorical_color(0))
                };
                plot_ui.points(
                    Points::new(vec![[entry.point.count as f64, entry.point.median]])
                        .radius(radius)
                        .color(color)
                        .name(&entry.name),
                );
            }

            if !plot_ui.response().clicked() {
                return None;
            }
            let pointer = plot_ui.pointer_coordinate()?;
            let pointer = plot_ui.screen_from_plot(pointer);
            scene
                .entries
                .iter()
                .map(|entry| {
                    let at = PlotPoint::new(entry.point.count as f64, entry.point.median);
                    (entry.point.country, plot_ui.screen_from_plot(at).distance(pointer))
                })
                .filter(|(_, distance)| *distance <= PICK_RADIUS)
                .min_by(|a, b| a.1.total_cmp(&b.1))
                .map(|(country, _)| country)
        })
        .inner;

    if let Some(country) = clicked {
        events.push(ViewEvent::Select(SelectionTarget::Country(country)));
    }
}
