use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Pollution row as read from the source, cells kept as text
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPollutionRow {
    pub date_local: Option<String>,
    pub state: String,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub co_aqi: Option<String>,
    pub so2_aqi: Option<String>,
    pub no2_aqi: Option<String>,
    pub o3_aqi: Option<String>,
}

/// Air-quality measurements carried by a monitoring reading
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AqiReadings {
    pub co: Option<f64>,
    pub so2: Option<f64>,
    pub no2: Option<f64>,
    pub o3: Option<f64>,
}

/// AQI measurements a joined row may be required to carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Measurement {
    #[serde(rename = "CO AQI")]
    Co,
    #[serde(rename = "SO2 AQI")]
    So2,
    #[serde(rename = "NO2 AQI")]
    No2,
    #[serde(rename = "O3 AQI")]
    O3,
}

impl Measurement {
    pub fn column(&self) -> &'static str {
        match self {
            Measurement::Co => crate::utils::constants::POLLUTION_CO_AQI,
            Measurement::So2 => crate::utils::constants::POLLUTION_SO2_AQI,
            Measurement::No2 => crate::utils::constants::POLLUTION_NO2_AQI,
            Measurement::O3 => crate::utils::constants::POLLUTION_O3_AQI,
        }
    }
}

impl AqiReadings {
    pub fn get(&self, measurement: Measurement) -> Option<f64> {
        match measurement {
            Measurement::Co => self.co,
            Measurement::So2 => self.so2,
            Measurement::No2 => self.no2,
            Measurement::O3 => self.o3,
        }
    }
}

/// Monitoring reading with a known location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollutionRecord {
    pub state: String,
    pub date_local: Option<NaiveDate>,
    pub latitude: f64,
    pub longitude: f64,

    pub aqi: AqiReadings,
}

impl PollutionRecord {
    pub fn new(
        state: impl Into<String>,
        date_local: Option<NaiveDate>,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            state: state.into(),
            date_local,
            latitude,
            longitude,
            aqi: AqiReadings::default(),
        }
    }

    pub fn with_aqi(mut self, co: Option<f64>, so2: Option<f64>) -> Self {
        self.aqi.co = co;
        self.aqi.so2 = so2;
        self
    }
}
