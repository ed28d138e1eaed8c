//! Data loading and record types for the world dashboard

pub mod config;
pub mod ingest;
pub mod loader;
pub mod records;
pub mod sources;

use tokio::task::JoinError;
use thiserror::Error;

// Re-exports
pub use config::{DashboardConfig, DatasetConfig, DatasetKind, NullConfig};
pub use ingest::{IngestReport, Ingested, RowError};
pub use loader::{load_dataset, load_inputs, DashboardInputs, Loadable};
pub use records::{DisasterRecord, Record, SalaryRecord};
pub use sources::{FileSource, InlineSource, TableSource};

/// Errors that can occur in data operations
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("GeoJSON error: {0}")]
    GeoJson(String),

    #[error("{source_name}: missing required column '{column}'")]
    MissingColumn {
        source_name: String,
        column: &'static str,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Join error: {0}")]
    Join(#[from] JoinError),
}

impl From<csv::Error> for DataError {
    fn from(error: csv::Error) -> Self {
        match error.kind() {
            csv::ErrorKind::Io(io_err) => DataError::Io(std::io::Error::new(io_err.kind(), error.to_string())),
            _ => DataError::Csv(error.to_string()),
        }
    }
}

impl From<geojson::Error> for DataError {
    fn from(error: geojson::Error) -> Self {
        DataError::GeoJson(error.to_string())
    }
}
