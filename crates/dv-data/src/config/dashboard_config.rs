//! Dashboard configuration

use std::path::{Path, PathBuf};
use serde::{Serialize, Deserialize};
use dv_core::ProjectionKind;

use super::null_handling::NullConfig;
use crate::DataError;

/// Which record type the dataset holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetKind {
    #[default]
    Salary,
    Disaster,
}

/// Locations of the three startup inputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Record type of `records`
    pub kind: DatasetKind,

    /// Record CSV
    pub records: PathBuf,

    /// Country reference CSV
    pub reference: PathBuf,

    /// Country shapes (GeoJSON feature collection)
    pub shapes: PathBuf,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            kind: DatasetKind::Salary,
            records: PathBuf::from("data/ds_salaries.csv"),
            reference: PathBuf::from("data/countries.csv"),
            shapes: PathBuf::from("data/countries.geojson"),
        }
    }
}

/// Configuration for the whole dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub dataset: DatasetConfig,

    /// Number of regular histogram bins (one headroom bin is added)
    pub histogram_bins: usize,

    /// Number of categories shown in the bar chart
    pub bar_chart_top_k: usize,

    pub projection: ProjectionKind,

    /// Map canvas size in pixels
    pub canvas: [f64; 2],

    /// Territory ids or names removed from the map
    pub excluded_territories: Vec<String>,

    /// Minimum on-screen label extent, as a fraction of the viewport width
    pub label_min_viewport_fraction: f64,

    /// Centroid used when the computed one is not finite
    pub fallback_centroid: [f64; 2],

    /// Values treated as missing during ingestion
    pub null_values: NullConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            dataset: DatasetConfig::default(),
            histogram_bins: 10,
            bar_chart_top_k: 10,
            projection: ProjectionKind::NaturalEarth,
            canvas: [960.0, 500.0],
            excluded_territories: vec!["Antarctica".to_string(), "010".to_string()],
            label_min_viewport_fraction: 0.04,
            fallback_centroid: [0.0, 0.0],
            null_values: NullConfig::default(),
        }
    }
}

impl DashboardConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json(text: &str) -> Result<Self, DataError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read the configuration from `path`, or the defaults if it does not exist
    pub fn load_or_default(path: &Path) -> Result<Self, DataError> {
        if !path.exists() {
            tracing::info!("No configuration at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Reject settings the aggregators cannot work with
    pub fn validate(&self) -> Result<(), DataError> {
        if self.histogram_bins == 0 {
            return Err(DataError::Config("histogram_bins must be at least 1".to_string()));
        }
        let [width, height] = self.canvas;
        if !(width > 0.0 && height > 0.0) {
            return Err(DataError::Config(format!("canvas must be positive, got {}x{}", width, height)));
        }
        if !self.label_min_viewport_fraction.is_finite() || self.label_min_viewport_fraction < 0.0 {
            return Err(DataError::Config("label_min_viewport_fraction must be non-negative".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = DashboardConfig::from_json(
            r#"{ "histogram_bins": 20, "dataset": {
                "kind": "disaster",
                "records": "emdat.csv",
                "reference": "countries.csv",
                "shapes": "world.geojson"
            } }"#,
        )
        .unwrap();

        assert_eq!(config.histogram_bins, 20);
        assert_eq!(config.dataset.kind, DatasetKind::Disaster);
        assert_eq!(config.projection, ProjectionKind::NaturalEarth);
        assert_eq!(config.bar_chart_top_k, 10);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(matches!(
            DashboardConfig::from_json(r#"{ "histogram_bins": 0 }"#),
            Err(DataError::Config(_))
        ));
        assert!(matches!(
            DashboardConfig::from_json(r#"{ "canvas": [0, 500] }"#),
            Err(DataError::Config(_))
        ));
        assert!(matches!(
            DashboardConfig::from_json(r#"{ "projection": "robinson" }"#),
            Err(DataError::Json(_))
        ));
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = DashboardConfig::load_or_default(Path::new("does/not/exist.json")).unwrap();
        assert_eq!(config, DashboardConfig::default());
    }
}
