//! Raw CSV rows and their validation into records

use serde::Deserialize;

use super::{IngestRow, RowContext, RowError};
use crate::records::{DisasterRecord, SalaryRecord, Seniority, WorkArrangement};

/// One line of the salary CSV, every field still text
#[derive(Debug, Clone, Deserialize)]
pub struct RawSalaryRow {
    work_year: String,
    experience_level: String,
    employment_type: String,
    job_title: String,
    salary_in_usd: String,
    employee_residence: String,
    remote_ratio: String,
    company_location: String,
    company_size: String,
}

impl IngestRow for RawSalaryRow {
    type Output = SalaryRecord;

    const REQUIRED_COLUMNS: &'static [&'static str] = &[
        "work_year",
        "experience_level",
        "employment_type",
        "job_title",
        "salary_in_usd",
        "employee_residence",
        "remote_ratio",
        "company_location",
        "company_size",
    ];

    fn validate(self, ctx: &RowContext<'_>) -> Result<SalaryRecord, RowError> {
        let work_year = ctx.year("work_year", &self.work_year)?;

        let level = ctx.required("experience_level", &self.experience_level)?;
        let seniority = level.parse::<Seniority>().map_err(|_| RowError::InvalidCategory {
            field: "experience_level",
            value: level.to_string(),
        })?;

        let salary_in_usd = ctx.number("salary_in_usd", &self.salary_in_usd)?;
        if salary_in_usd < 0.0 {
            return Err(RowError::OutOfRange {
                field: "salary_in_usd",
                value: salary_in_usd,
            });
        }

        let remote_ratio = ctx.number("remote_ratio", &self.remote_ratio)?;
        if !(0.0..=100.0).contains(&remote_ratio) {
            return Err(RowError::OutOfRange {
                field: "remote_ratio",
                value: remote_ratio,
            });
        }

        let job_title = ctx.required("job_title", &self.job_title)?.to_string();

        // Codes skip the null matcher ("NA" is Namibia); unknown codes leave
        // the record unattached rather than rejecting it
        let employee_residence = ctx.registry.resolve_alpha2(self.employee_residence.trim());
        let company_location = ctx.registry.resolve_alpha2(self.company_location.trim());

        Ok(SalaryRecord {
            work_year,
            seniority,
            employment_type: ctx.nulls.value(&self.employment_type).unwrap_or_default().to_string(),
            job_title,
            salary_in_usd,
            arrangement: WorkArrangement::from_remote_ratio(remote_ratio),
            employee_residence,
            company_location,
            company_size: ctx.nulls.value(&self.company_size).unwrap_or_default().to_string(),
        })
    }
}

/// One line of the disaster CSV
#[derive(Debug, Clone, Deserialize)]
pub struct RawDisasterRow {
    #[serde(rename = "Year")]
    year: String,
    #[serde(rename = "Disaster Group")]
    disaster_group: String,
    #[serde(rename = "Disaster Type")]
    disaster_type: String,
    #[serde(rename = "ISO")]
    iso: String,
    #[serde(rename = "Country")]
    country: String,
    #[serde(rename = "Total Deaths")]
    total_deaths: String,
    #[serde(rename = "Total Affected")]
    total_affected: String,
}

impl IngestRow for RawDisasterRow {
    type Output = DisasterRecord;

    const REQUIRED_COLUMNS: &'static [&'static str] = &[
        "Year",
        "Disaster Group",
        "Disaster Type",
        "ISO",
        "Country",
        "Total Deaths",
        "Total Affected",
    ];

    fn validate(self, ctx: &RowContext<'_>) -> Result<DisasterRecord, RowError> {
        let year = ctx.year("Year", &self.year)?;
        let disaster_group = ctx.required("Disaster Group", &self.disaster_group)?.to_string();
        let disaster_type = ctx.required("Disaster Type", &self.disaster_type)?.to_string();

        // Unreported tolls are common; they count as zero
        let total_deaths = ctx.optional_number("Total Deaths", &self.total_deaths)?.unwrap_or(0.0);
        let total_affected = ctx.optional_number("Total Affected", &self.total_affected)?.unwrap_or(0.0);
        if total_deaths < 0.0 {
            return Err(RowError::OutOfRange {
                field: "Total Deaths",
                value: total_deaths,
            });
        }

        let country_name = ctx.nulls.value(&self.country).unwrap_or_default().to_string();
        let country = ctx
            .registry
            .resolve_alpha3(self.iso.trim())
            .or_else(|| ctx.registry.name_to_id(&country_name));

        Ok(DisasterRecord {
            year,
            disaster_group,
            disaster_type,
            country,
            country_name,
            total_deaths,
            total_affected,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NullConfig;
    use crate::ingest::parse_records;
    use crate::ingest::IngestReport;
    use dv_core::{CountryId, CountryIdentity, CountryRegistry};

    fn registry() -> CountryRegistry {
        CountryRegistry::from_identities(vec![
            CountryIdentity {
                id: CountryId(356),
                alpha2: "IN".parse().unwrap(),
                alpha3: "IND".parse().unwrap(),
                name: "India".to_string(),
            },
            CountryIdentity {
                id: CountryId(516),
                alpha2: "NA".parse().unwrap(),
                alpha3: "NAM".parse().unwrap(),
                name: "Namibia".to_string(),
            },
        ])
    }

    const DISASTERS: &str = "\
Year,Disaster Group,Disaster Type,ISO,Country,Total Deaths,Total Affected
2004,Natural,Flood,IND,India,120,50000
2005,Natural,Storm,,India,,1000
2006,Natural,Drought,ZZZ,Atlantis,0,10
2007,Natural,Flood,IND,India,many,0
";

    #[test]
    fn test_disaster_rows() {
        let ingested =
            parse_records::<RawDisasterRow>("disasters", DISASTERS, &registry(), &NullConfig::default()).unwrap();

        assert_eq!(ingested.report, IngestReport { accepted: 3, rejected: 1, unattached: 1 });

        let flood = &ingested.records[0];
        assert_eq!(flood.country, Some(CountryId(356)));
        assert_eq!(flood.total_deaths, 120.0);

        // Resolved by name when the ISO code is missing; null deaths read as zero
        let storm = &ingested.records[1];
        assert_eq!(storm.country, Some(CountryId(356)));
        assert_eq!(storm.total_deaths, 0.0);

        assert_eq!(ingested.records[2].country, None);
        assert_eq!(ingested.records[2].country_name, "Atlantis");
    }

    #[test]
    fn test_remote_ratio_out_of_range() {
        let text = "\
work_year,experience_level,employment_type,job_title,salary_in_usd,employee_residence,remote_ratio,company_location,company_size
2022,SE,FT,Data Scientist,100000,IN,150,IN,M
";
        let ingested = parse_records::<RawSalaryRow>("salaries", text, &registry(), &NullConfig::default()).unwrap();
        assert_eq!(ingested.report.rejected, 1);
        assert!(ingested.records.is_empty());
    }

    #[test]
    fn test_namibia_code_is_not_null() {
        let text = "\
work_year,experience_level,employment_type,job_title,salary_in_usd,employee_residence,remote_ratio,company_location,company_size
2022,SE,FT,Data Scientist,100000,NA,0,NA,M
2022,SE,FT,Data Scientist,90000, na ,0,,M
";
        let ingested = parse_records::<RawSalaryRow>("salaries", text, &registry(), &NullConfig::default()).unwrap();

        assert_eq!(ingested.report, IngestReport { accepted: 2, rejected: 0, unattached: 1 });
        assert_eq!(ingested.records[0].company_location, Some(CountryId(516)));
        assert_eq!(ingested.records[0].employee_residence, Some(CountryId(516)));
        // Lowercase and padded codes still resolve; an empty company location does not
        assert_eq!(ingested.records[1].employee_residence, Some(CountryId(516)));
        assert_eq!(ingested.records[1].company_location, None);
    }
}
