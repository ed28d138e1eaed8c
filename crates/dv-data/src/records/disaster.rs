//! Disaster event records

use dv_core::CountryId;

use super::Record;
use crate::DatasetKind;

/// Death toll band used by the flow diagram
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeathToll {
    None,
    UpTo10,
    UpTo100,
    UpTo1000,
    Above1000,
}

impl DeathToll {
    pub fn from_deaths(deaths: f64) -> Self {
        if deaths <= 0.0 {
            DeathToll::None
        } else if deaths <= 10.0 {
            DeathToll::UpTo10
        } else if deaths <= 100.0 {
            DeathToll::UpTo100
        } else if deaths <= 1000.0 {
            DeathToll::UpTo1000
        } else {
            DeathToll::Above1000
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DeathToll::None => "0 deaths",
            DeathToll::UpTo10 => "1-10 deaths",
            DeathToll::UpTo100 => "11-100 deaths",
            DeathToll::UpTo1000 => "101-1000 deaths",
            DeathToll::Above1000 => "1000+ deaths",
        }
    }
}

/// One disaster event
#[derive(Debug, Clone, PartialEq)]
pub struct DisasterRecord {
    pub year: i32,
    pub disaster_group: String,
    pub disaster_type: String,
    pub country: Option<CountryId>,
    /// Country name as written in the source row
    pub country_name: String,
    pub total_deaths: f64,
    pub total_affected: f64,
}

impl Record for DisasterRecord {
    const KIND: DatasetKind = DatasetKind::Disaster;

    fn country(&self) -> Option<CountryId> {
        self.country
    }

    fn year(&self) -> i32 {
        self.year
    }

    fn measure(&self) -> f64 {
        self.total_deaths
    }

    fn category(&self) -> &str {
        &self.disaster_type
    }

    fn flow_stages(&self) -> [&str; 3] {
        [
            self.disaster_group.as_str(),
            self.disaster_type.as_str(),
            DeathToll::from_deaths(self.total_deaths).label(),
        ]
    }

    fn measure_label() -> &'static str {
        "Total deaths"
    }
}
