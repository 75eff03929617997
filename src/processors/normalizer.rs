use crate::config::PipelineConfig;
use crate::models::{AqiReadings, FireRecord, PollutionRecord, RawFireRow, RawPollutionRow};
use crate::utils::coordinates::parse_location;
use crate::utils::dates::{parse_iso_date, parse_short_us_date};
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};

/// Why a pollution row did not survive normalization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollutionRejection {
    MissingCoordinates,
    OutsideAnalysisStates,
}

/// Normalized fires with the observations made while parsing them
#[derive(Debug, Default)]
pub struct NormalizedFires {
    pub records: Vec<FireRecord>,
    pub start_dates_unparsed: usize,
    pub dates_inconsistent: usize,
}

/// Retained pollution readings with rejection counts
#[derive(Debug, Default)]
pub struct NormalizedPollution {
    pub records: Vec<PollutionRecord>,
    pub dates_unparsed: usize,
    pub missing_coordinates: usize,
    pub outside_states: usize,
}

/// Canonicalizes state names and coerces text cells into typed fields
pub struct Normalizer {
    state_names: HashMap<String, String>,
    analysis_states: HashSet<String>,
}

impl Normalizer {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            state_names: config
                .state_abbreviations
                .iter()
                .map(|alias| (alias.abbreviation.clone(), alias.name.clone()))
                .collect(),
            analysis_states: config.analysis_states.iter().cloned().collect(),
        }
    }

    /// Full state name for a mapped abbreviation; anything else passes through
    pub fn canonical_state(&self, state: &str) -> String {
        self.state_names
            .get(state)
            .cloned()
            .unwrap_or_else(|| state.to_string())
    }

    pub fn normalize_fire(&self, raw: RawFireRow) -> FireRecord {
        let location = parse_location(raw.latitude.as_deref(), raw.longitude.as_deref());
        FireRecord {
            fire_state: self.canonical_state(&raw.state),
            fire_id: raw.row_id,
            fire_county: raw.county,
            discovery_date: raw.discovery_date.as_deref().and_then(parse_iso_date),
            cont_date: raw.cont_date.as_deref().and_then(parse_iso_date),
            fire_year: raw.fire_year.as_deref().and_then(parse_year),
            start_date: raw.start_date.as_deref().and_then(parse_iso_date),
            latitude: location.map(|(lat, _)| lat),
            longitude: location.map(|(_, lon)| lon),
        }
    }

    pub fn normalize_fires(&self, rows: Vec<RawFireRow>) -> NormalizedFires {
        let (records, unparsed): (Vec<FireRecord>, Vec<bool>) = rows
            .into_par_iter()
            .map(|raw| {
                let had_start_date = raw.start_date.is_some();
                let record = self.normalize_fire(raw);
                let unparsed = had_start_date && record.start_date.is_none();
                (record, unparsed)
            })
            .unzip();

        let start_dates_unparsed = unparsed.iter().filter(|&&flag| flag).count();
        let dates_inconsistent = records.iter().filter(|r| !r.has_consistent_dates()).count();

        if start_dates_unparsed > 0 {
            tracing::warn!(count = start_dates_unparsed, "Fire start dates could not be parsed");
        }
        if dates_inconsistent > 0 {
            tracing::warn!(
                count = dates_inconsistent,
                "Fires contained before they were discovered"
            );
        }

        NormalizedFires {
            records,
            start_dates_unparsed,
            dates_inconsistent,
        }
    }

    /// Parse a monitoring row, dropping it without a location or outside the analysis states
    pub fn normalize_pollution(
        &self,
        raw: RawPollutionRow,
    ) -> Result<PollutionRecord, PollutionRejection> {
        let date_local = raw.date_local.as_deref().and_then(parse_short_us_date);

        let (latitude, longitude) =
            parse_location(raw.latitude.as_deref(), raw.longitude.as_deref())
                .ok_or(PollutionRejection::MissingCoordinates)?;

        if !self.analysis_states.contains(&raw.state) {
            return Err(PollutionRejection::OutsideAnalysisStates);
        }

        Ok(PollutionRecord {
            state: raw.state,
            date_local,
            latitude,
            longitude,
            aqi: AqiReadings {
                co: raw.co_aqi.as_deref().and_then(parse_measurement),
                so2: raw.so2_aqi.as_deref().and_then(parse_measurement),
                no2: raw.no2_aqi.as_deref().and_then(parse_measurement),
                o3: raw.o3_aqi.as_deref().and_then(parse_measurement),
            },
        })
    }

    pub fn normalize_pollution_rows(&self, rows: Vec<RawPollutionRow>) -> NormalizedPollution {
        let outcomes: Vec<(Result<PollutionRecord, PollutionRejection>, bool)> = rows
            .into_par_iter()
            .map(|raw| {
                let had_date = raw.date_local.is_some();
                let outcome = self.normalize_pollution(raw);
                let unparsed = had_date
                    && matches!(&outcome, Ok(record) if record.date_local.is_none());
                (outcome, unparsed)
            })
            .collect();

        let mut normalized = NormalizedPollution::default();
        for (outcome, unparsed) in outcomes {
            if unparsed {
                normalized.dates_unparsed += 1;
            }
            match outcome {
                Ok(record) => normalized.records.push(record),
                Err(PollutionRejection::MissingCoordinates) => normalized.missing_coordinates += 1,
                Err(PollutionRejection::OutsideAnalysisStates) => normalized.outside_states += 1,
            }
        }

        if normalized.dates_unparsed > 0 {
            tracing::warn!(
                count = normalized.dates_unparsed,
                "Pollution dates could not be parsed"
            );
        }

        normalized
    }
}

/// Integer year, also accepting a float rendering such as `2014.0`
fn parse_year(value: &str) -> Option<i32> {
    let trimmed = value.trim();
    trimmed.parse::<i32>().ok().or_else(|| {
        trimmed
            .parse::<f64>()
            .ok()
            .filter(|year| year.is_finite() && year.fract() == 0.0)
            .filter(|year| (i32::MIN as f64..=i32::MAX as f64).contains(year))
            .map(|year| year as i32)
    })
}

fn parse_measurement(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|aqi| aqi.is_finite())
}
