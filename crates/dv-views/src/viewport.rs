//! Viewport - docks the dashboard views

use dv_data::Record;
use egui::Ui;
use egui_dock::{DockArea, DockState, NodeIndex, Style, TabViewer};

use crate::render::{category_bars_ui, flow_ui, histogram_ui, map_ui, scatter_ui, year_series_ui};
use crate::{Dashboard, ViewEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DashboardTab {
    Map,
    Distribution,
    Flow,
    Years,
    Categories,
    Countries,
}

impl DashboardTab {
    pub const ALL: [DashboardTab; 6] = [
        DashboardTab::Map,
        DashboardTab::Distribution,
        DashboardTab::Flow,
        DashboardTab::Years,
        DashboardTab::Categories,
        DashboardTab::Countries,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            DashboardTab::Map => "World map",
            DashboardTab::Distribution => "Distribution",
            DashboardTab::Flow => "Flow",
            DashboardTab::Years => "By year",
            DashboardTab::Categories => "Top categories",
            DashboardTab::Countries => "Countries",
        }
    }
}

/// The main viewport: map on the left, charts docked around it
pub struct Viewport {
    dock_state: DockState<DashboardTab>,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}

impl Viewport {
    pub fn new() -> Self {
        let mut dock_state = DockState::new(vec![DashboardTab::Map]);
        let surface = dock_state.main_surface_mut();
        let [map, charts] = surface.split_right(
            NodeIndex::root(),
            0.55,
            vec![DashboardTab::Distribution, DashboardTab::Categories],
        );
        surface.split_below(map, 0.65, vec![DashboardTab::Years, DashboardTab::Countries]);
        surface.split_below(charts, 0.5, vec![DashboardTab::Flow]);
        Self { dock_state }
    }

    /// Tabs currently docked, in traversal order
    pub fn tabs(&self) -> Vec<DashboardTab> {
        self.dock_state
            .main_surface()
            .iter()
            .filter_map(|node| node.tabs())
            .flatten()
            .copied()
            .collect()
    }

    /// Draw every docked view and return the interactions they produced
    pub fn ui<R: Record>(&mut self, ui: &mut Ui, dashboard: &Dashboard<R>) -> Vec<ViewEvent> {
        let mut viewer = DashboardTabViewer {
            dashboard,
            events: Vec::new(),
        };
        DockArea::new(&mut self.dock_state)
            .style(Style::from_egui(ui.style().as_ref()))
            .show_close_buttons(false)
            .draggable_tabs(true)
            .show_inside(ui, &mut viewer);
        viewer.events
    }
}

struct DashboardTabViewer<'a, R: Record> {
    dashboard: &'a Dashboard<R>,
    events: Vec<ViewEvent>,
}

impl<'a, R: Record> TabViewer for DashboardTabViewer<'a, R> {
    type Tab = DashboardTab;

    fn title(&mut self, tab: &mut Self::Tab) -> egui::WidgetText {
        tab.title().into()
    }

    fn ui(&mut self, ui: &mut Ui, tab: &mut Self::Tab) {
        match tab {
            DashboardTab::Map => map_ui(ui, self.dashboard, &mut self.events),
            DashboardTab::Distribution => histogram_ui(ui, self.dashboard.histogram().scene()),
            DashboardTab::Flow => flow_ui(ui, self.dashboard.flow().scene()),
            DashboardTab::Years => {
                year_series_ui(ui, &self.dashboard.year_series_scene(), &mut self.events)
            }
            DashboardTab::Categories => category_bars_ui(ui, self.dashboard.bars().scene()),
            DashboardTab::Countries => {
                scatter_ui(ui, &self.dashboard.scatter_scene(), &mut self.events)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout_docks_every_tab() {
        let viewport = Viewport::new();
        let mut tabs = viewport.tabs();
        tabs.sort_by_key(|tab| DashboardTab::ALL.iter().position(|t| t == tab));
        assert_eq!(tabs, DashboardTab::ALL.to_vec());
    }
}
