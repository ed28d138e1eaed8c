//! Salary records (one row per reported salary)

use std::str::FromStr;
use dv_core::CountryId;

use super::Record;
use crate::DatasetKind;

/// Experience level of the employee
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Seniority {
    Entry,
    Mid,
    Senior,
    Executive,
}

impl Seniority {
    pub fn label(&self) -> &'static str {
        match self {
            Seniority::Entry => "Entry",
            Seniority::Mid => "Mid",
            Seniority::Senior => "Senior",
            Seniority::Executive => "Executive",
        }
    }
}

impl FromStr for Seniority {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "EN" | "ENTRY" => Ok(Seniority::Entry),
            "MI" | "MID" => Ok(Seniority::Mid),
            "SE" | "SENIOR" => Ok(Seniority::Senior),
            "EX" | "EXECUTIVE" => Ok(Seniority::Executive),
            _ => Err(()),
        }
    }
}

/// Work arrangement derived from the remote ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkArrangement {
    OnSite,
    Hybrid,
    Remote,
}

impl WorkArrangement {
    /// 0 is on-site, 100 is remote, anything in between is hybrid
    pub fn from_remote_ratio(ratio: f64) -> Self {
        if ratio <= 0.0 {
            WorkArrangement::OnSite
        } else if ratio >= 100.0 {
            WorkArrangement::Remote
        } else {
            WorkArrangement::Hybrid
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WorkArrangement::OnSite => "on-site",
            WorkArrangement::Hybrid => "hybrid",
            WorkArrangement::Remote => "remote",
        }
    }
}

/// Coarse salary range used by the flow diagram
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SalaryBand {
    Below50k,
    From50kTo100k,
    From100kTo150k,
    From150kTo200k,
    Above200k,
}

impl SalaryBand {
    /// Lower bounds of each band, in USD
    const THRESHOLDS: [(f64, SalaryBand); 5] = [
        (200_000.0, SalaryBand::Above200k),
        (150_000.0, SalaryBand::From150kTo200k),
        (100_000.0, SalaryBand::From100kTo150k),
        (50_000.0, SalaryBand::From50kTo100k),
        (f64::NEG_INFINITY, SalaryBand::Below50k),
    ];

    pub fn from_usd(salary: f64) -> Self {
        Self::THRESHOLDS
            .iter()
            .find(|(lower, _)| salary >= *lower)
            .map(|(_, band)| *band)
            .unwrap_or(SalaryBand::Below50k)
    }

    pub fn label(&self) -> &'static str {
        match self {
            SalaryBand::Below50k => "<50k",
            SalaryBand::From50kTo100k => "50k-100k",
            SalaryBand::From100kTo150k => "100k-150k",
            SalaryBand::From150kTo200k => "150k-200k",
            SalaryBand::Above200k => "200k+",
        }
    }
}

/// One salary report
#[derive(Debug, Clone, PartialEq)]
pub struct SalaryRecord {
    pub work_year: i32,
    pub seniority: Seniority,
    pub employment_type: String,
    pub job_title: String,
    pub salary_in_usd: f64,
    pub arrangement: WorkArrangement,
    /// Where the employee lives
    pub employee_residence: Option<CountryId>,
    /// Where the employer is located; this is the record's map country
    pub company_location: Option<CountryId>,
    pub company_size: String,
}

impl Record for SalaryRecord {
    const KIND: DatasetKind = DatasetKind::Salary;

    fn country(&self) -> Option<CountryId> {
        self.company_location
    }

    fn linked_country(&self) -> Option<CountryId> {
        self.employee_residence
    }

    fn year(&self) -> i32 {
        self.work_year
    }

    fn measure(&self) -> f64 {
        self.salary_in_usd
    }

    fn category(&self) -> &str {
        &self.job_title
    }

    fn flow_stages(&self) -> [&str; 3] {
        [
            SalaryBand::from_usd(self.salary_in_usd).label(),
            self.seniority.label(),
            self.arrangement.label(),
        ]
    }

    fn measure_label() -> &'static str {
        "Salary (USD)"
    }
}
