use crate::error::Result;
use crate::models::RawPollutionRow;
use crate::readers::csv_source::{cell, optional_cell, ColumnIndex, CsvSource};
use crate::utils::constants::*;
use std::path::Path;

struct PollutionColumns {
    date_local: usize,
    state: usize,
    latitude: usize,
    longitude: usize,
    co_aqi: usize,
    so2_aqi: usize,
    no2_aqi: Option<usize>,
    o3_aqi: Option<usize>,
}

impl PollutionColumns {
    fn resolve(index: &ColumnIndex) -> Result<Self> {
        Ok(Self {
            date_local: index.require(POLLUTION_DATE_LOCAL)?,
            state: index.require(POLLUTION_STATE)?,
            latitude: index.require(POLLUTION_LATITUDE)?,
            longitude: index.require(POLLUTION_LONGITUDE)?,
            co_aqi: index.require(POLLUTION_CO_AQI)?,
            so2_aqi: index.require(POLLUTION_SO2_AQI)?,
            no2_aqi: index.optional(POLLUTION_NO2_AQI),
            o3_aqi: index.optional(POLLUTION_O3_AQI),
        })
    }
}

pub struct PollutionReader {
    source: CsvSource,
}

impl PollutionReader {
    pub fn new() -> Self {
        Self {
            source: CsvSource::new(),
        }
    }

    pub fn with_mmap(use_mmap: bool) -> Self {
        Self {
            source: CsvSource::with_mmap(use_mmap),
        }
    }

    /// Read monitoring rows; `NO2 AQI` and `O3 AQI` are carried when present
    pub fn read_pollution(&self, path: &Path) -> Result<Vec<RawPollutionRow>> {
        let text = self.source.load_text(path)?;
        self.parse_pollution(&text)
    }

    pub fn parse_pollution(&self, text: &str) -> Result<Vec<RawPollutionRow>> {
        let mut reader = self.source.reader(text);
        let index = ColumnIndex::from_headers("pollution", reader.headers()?);
        let columns = PollutionColumns::resolve(&index)?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(RawPollutionRow {
                date_local: cell(&record, columns.date_local),
                state: cell(&record, columns.state).unwrap_or_default(),
                latitude: cell(&record, columns.latitude),
                longitude: cell(&record, columns.longitude),
                co_aqi: cell(&record, columns.co_aqi),
                so2_aqi: cell(&record, columns.so2_aqi),
                no2_aqi: optional_cell(&record, columns.no2_aqi),
                o3_aqi: optional_cell(&record, columns.o3_aqi),
            });
        }

        tracing::debug!(rows = rows.len(), "Pollution rows read");
        Ok(rows)
    }
}

impl Default for PollutionReader {
    fn default() -> Self {
        Self::new()
    }
}
