//! Concurrent loading of the three startup inputs

use dv_core::{CountryRegistry, CountryShape};

use crate::config::{DatasetConfig, NullConfig};
use crate::ingest::{
    parse_records, parse_reference_table, parse_shapes, IngestReport, IngestRow, RawDisasterRow, RawSalaryRow,
};
use crate::records::{DisasterRecord, Record, SalaryRecord};
use crate::sources::{FileSource, TableSource};
use crate::DataError;

/// Record types that can be ingested from CSV
pub trait Loadable: Record {
    type Row: IngestRow<Output = Self> + Send;
}

impl Loadable for SalaryRecord {
    type Row = RawSalaryRow;
}

impl Loadable for DisasterRecord {
    type Row = RawDisasterRow;
}

/// Everything the dashboard needs at startup
#[derive(Debug, Clone)]
pub struct DashboardInputs<R> {
    pub registry: CountryRegistry,
    pub shapes: Vec<CountryShape>,
    pub records: Vec<R>,
    pub report: IngestReport,
}

/// Read all three inputs concurrently, then parse them off the async threads.
///
/// Fails as soon as any input cannot be read or parsed; there is no partial
/// result.
pub async fn load_inputs<R: Loadable>(
    reference: &dyn TableSource,
    shapes: &dyn TableSource,
    records: &dyn TableSource,
    nulls: &NullConfig,
) -> Result<DashboardInputs<R>, DataError> {
    let (reference_text, shapes_text, records_text) =
        tokio::try_join!(reference.read_text(), shapes.read_text(), records.read_text())?;

    let reference_name = reference.source_name().to_string();
    let shapes_name = shapes.source_name().to_string();
    let registry_task =
        tokio::task::spawn_blocking(move || parse_reference_table(&reference_name, &reference_text));
    let shapes_task = tokio::task::spawn_blocking(move || parse_shapes(&shapes_name, &shapes_text));

    let (registry, shapes) = tokio::try_join!(
        async { registry_task.await.map_err(DataError::from).and_then(|parsed| parsed) },
        async { shapes_task.await.map_err(DataError::from).and_then(|parsed| parsed) },
    )?;

    // Records resolve their countries against the registry, so they go last
    let records_name = records.source_name().to_string();
    let nulls = nulls.clone();
    let (registry, ingested) = tokio::task::spawn_blocking(move || {
        parse_records::<R::Row>(&records_name, &records_text, &registry, &nulls).map(|ingested| (registry, ingested))
    })
    .await??;

    tracing::info!(
        "Loaded {} countries, {} shapes and {} records",
        registry.len(),
        shapes.len(),
        ingested.records.len()
    );

    Ok(DashboardInputs {
        registry,
        shapes,
        records: ingested.records,
        report: ingested.report,
    })
}

/// Load the inputs named by a dataset configuration from disk
pub async fn load_dataset<R: Loadable>(
    dataset: &DatasetConfig,
    nulls: &NullConfig,
) -> Result<DashboardInputs<R>, DataError> {
    let reference = FileSource::new(&dataset.reference);
    let shapes = FileSource::new(&dataset.shapes);
    let records = FileSource::new(&dataset.records);
    load_inputs::<R>(&reference, &shapes, &records, nulls).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::InlineSource;
    use dv_core::CountryId;

    const REFERENCE: &str = "\
country_code_alpha2,country_code_alpha3,country_id,country_name
US,USA,840,United States of America
CA,CAN,124,Canada
";

    const SHAPES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            { "type": "Feature", "id": "840", "properties": { "name": "United States of America" },
              "geometry": { "type": "Polygon", "coordinates": [[[-120, 30], [-70, 30], [-70, 48], [-120, 48], [-120, 30]]] } },
            { "type": "Feature", "id": "124", "properties": { "name": "Canada" },
              "geometry": { "type": "Polygon", "coordinates": [[[-120, 50], [-60, 50], [-60, 70], [-120, 70], [-120, 50]]] } }
        ]
    }"#;

    const SALARIES: &str = "\
work_year,experience_level,employment_type,job_title,salary_in_usd,employee_residence,remote_ratio,company_location,company_size
2022,SE,FT,Data Scientist,100000,US,100,US,M
2022,MI,FT,Data Engineer,200000,US,0,US,L
2021,EN,FT,Data Analyst,50000,CA,50,US,S
";

    #[tokio::test]
    async fn test_load_inputs() {
        let inputs = load_inputs::<SalaryRecord>(
            &InlineSource::new("countries", REFERENCE),
            &InlineSource::new("shapes", SHAPES),
            &InlineSource::new("salaries", SALARIES),
            &NullConfig::default(),
        )
        .await
        .unwrap();

        assert_eq!(inputs.registry.len(), 2);
        assert_eq!(inputs.shapes.len(), 2);
        assert_eq!(inputs.records.len(), 3);
        assert_eq!(inputs.report.rejected, 0);
        assert_eq!(inputs.records[2].employee_residence, Some(CountryId(124)));
    }

    #[tokio::test]
    async fn test_any_failure_is_fatal() {
        let result = load_inputs::<SalaryRecord>(
            &InlineSource::new("countries", REFERENCE),
            &InlineSource::new("shapes", "{ broken"),
            &InlineSource::new("salaries", SALARIES),
            &NullConfig::default(),
        )
        .await;
        assert!(matches!(result, Err(DataError::GeoJson(_))));

        let dataset = DatasetConfig {
            records: "missing/records.csv".into(),
            ..DatasetConfig::default()
        };
        let result = load_dataset::<SalaryRecord>(&dataset, &NullConfig::default()).await;
        assert!(matches!(result, Err(DataError::Io(_))));
    }
}
