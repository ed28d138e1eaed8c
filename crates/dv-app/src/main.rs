//! World dashboard entry point

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use eframe::egui;
use tracing::{error, info};

use dv_data::{load_dataset, DashboardConfig, DatasetKind, DisasterRecord, Loadable, SalaryRecord};
use dv_views::Dashboard;

mod app;

use app::{DashboardApp, ErrorApp};

const DEFAULT_CONFIG: &str = "dashboard.json";

/// Load all inputs and build the dashboard for one record type
fn build_dashboard<R: Loadable>(
    runtime: &tokio::runtime::Runtime,
    config: &DashboardConfig,
) -> Result<Dashboard<R>> {
    let inputs = runtime
        .block_on(load_dataset::<R>(&config.dataset, &config.null_values))
        .with_context(|| format!("loading {:?}", config.dataset.records))?;
    Ok(Dashboard::new(inputs, config))
}

fn create_app(config_path: PathBuf) -> Result<Box<dyn eframe::App>> {
    let config = DashboardConfig::load_or_default(&config_path)
        .with_context(|| format!("reading configuration {:?}", config_path))?;
    let runtime = tokio::runtime::Runtime::new()?;

    info!("Loading {:?} dataset", config.dataset.kind);
    let app: Box<dyn eframe::App> = match config.dataset.kind {
        DatasetKind::Salary => Box::new(DashboardApp::new(build_dashboard::<SalaryRecord>(&runtime, &config)?)),
        DatasetKind::Disaster => Box::new(DashboardApp::new(build_dashboard::<DisasterRecord>(&runtime, &config)?)),
    };
    Ok(app)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));

    info!("Starting world dashboard");

    let app = create_app(config_path).unwrap_or_else(|e| {
        error!("Startup failed: {:#}", e);
        Box::new(ErrorApp::new(&e))
    });

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([900.0, 600.0]),
        default_theme: eframe::Theme::Light,
        persist_window: false,
        ..Default::default()
    };

    eframe::run_native("World Dashboard", options, Box::new(move |_cc| app))
        .map_err(|e| anyhow::anyhow!("Failed to run app: {}", e))?;

    Ok(())
}
