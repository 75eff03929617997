use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Fire row as read from the source, cells kept as text
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawFireRow {
    pub row_id: String,
    pub state: String,
    pub county: Option<String>,
    pub discovery_date: Option<String>,
    pub cont_date: Option<String>,
    pub fire_year: Option<String>,
    pub start_date: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

/// Normalized fire incident, fields renamed to stay distinct from the pollution schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FireRecord {
    pub fire_id: String,
    pub fire_state: String,
    pub fire_county: Option<String>,
    pub discovery_date: Option<NaiveDate>,
    pub cont_date: Option<NaiveDate>,
    pub fire_year: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl FireRecord {
    pub fn new(fire_id: impl Into<String>, fire_state: impl Into<String>) -> Self {
        Self {
            fire_id: fire_id.into(),
            fire_state: fire_state.into(),
            fire_county: None,
            discovery_date: None,
            cont_date: None,
            fire_year: None,
            start_date: None,
            latitude: None,
            longitude: None,
        }
    }

    pub fn with_start_date(mut self, start_date: NaiveDate) -> Self {
        self.start_date = Some(start_date);
        self
    }

    pub fn with_fire_year(mut self, fire_year: i32) -> Self {
        self.fire_year = Some(fire_year);
        self
    }

    pub fn with_location(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }

    /// Containment must not precede discovery; unknown dates are not a violation.
    pub fn has_consistent_dates(&self) -> bool {
        match (self.discovery_date, self.cont_date) {
            (Some(discovered), Some(contained)) => discovered <= contained,
            _ => true,
        }
    }
}
