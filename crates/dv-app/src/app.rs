//! Application shell around the dashboard

use eframe::egui::{self, Context, RichText};

use dv_core::SelectionState;
use dv_data::Record;
use dv_views::{Dashboard, ViewEvent, Viewport};

/// The interactive dashboard window
pub struct DashboardApp<R: Record> {
    dashboard: Dashboard<R>,
    viewport: Viewport,
}

impl<R: Record> DashboardApp<R> {
    pub fn new(dashboard: Dashboard<R>) -> Self {
        Self {
            dashboard,
            viewport: Viewport::new(),
        }
    }

    fn selection_text(&self, selection: SelectionState) -> String {
        let country = selection.country.map(|id| self.dashboard.country_name(id));
        match (country, selection.year) {
            (None, None) => "All countries, all years".to_string(),
            (Some(country), None) => format!("{}, all years", country),
            (None, Some(year)) => format!("All countries, {}", year),
            (Some(country), Some(year)) => format!("{}, {}", country, year),
        }
    }

    fn top_bar(&self, ui: &mut egui::Ui, events: &mut Vec<ViewEvent>) {
        ui.horizontal(|ui| {
            let selection = self.dashboard.selection();
            if ui
                .add_enabled(!selection.is_empty(), egui::Button::new("Global"))
                .on_hover_text("Clear the country and year selection")
                .clicked()
            {
                events.push(ViewEvent::ClearSelection);
            }
            if ui.button("Reset zoom").clicked() {
                events.push(ViewEvent::ResetZoom);
            }

            ui.separator();
            ui.label(RichText::new(self.selection_text(selection)).strong());

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let report = self.dashboard.report();
                ui.label(
                    RichText::new(format!(
                        "{} records, {} rejected, {} without a map country",
                        report.accepted, report.rejected, report.unattached
                    ))
                    .weak(),
                );
            });
        });
    }
}

impl<R: Record> eframe::App for DashboardApp<R> {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut events = Vec::new();

        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            events.push(ViewEvent::ClearSelection);
        }

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            self.top_bar(ui, &mut events);
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::central_panel(&ctx.style()).inner_margin(0.0))
            .show(ctx, |ui| {
                events.extend(self.viewport.ui(ui, &self.dashboard));
            });

        if !events.is_empty() {
            self.dashboard.apply(events);
            ctx.request_repaint();
        }
    }
}

/// Shown instead of the dashboard when startup loading fails
pub struct ErrorApp {
    message: String,
}

impl ErrorApp {
    pub fn new(error: &anyhow::Error) -> Self {
        Self {
            message: format!("{:#}", error),
        }
    }
}

impl eframe::App for ErrorApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(40.0);
                ui.heading("The dashboard could not be loaded");
                ui.add_space(12.0);
                ui.label(RichText::new(&self.message).color(ui.visuals().error_fg_color));
            });
        });
    }
}
