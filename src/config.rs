use crate::error::{ProcessingError, Result};
use crate::models::Measurement;
use crate::utils::constants::*;
use crate::utils::dates::parse_date_bound;
use chrono::NaiveDate;
use config::{Config, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::Path;
use validator::Validate;

/// Abbreviation rewritten to a canonical state name on fire rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct StateAlias {
    #[validate(length(min = 1))]
    pub abbreviation: String,

    #[validate(length(min = 1))]
    pub name: String,
}

/// Analytic constants of a correlation run.
///
/// Defaults reproduce the published analysis; a TOML file passed with
/// `--config` may override any field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PipelineConfig {
    #[validate(nested)]
    pub state_abbreviations: Vec<StateAlias>,

    #[validate(length(min = 1))]
    pub analysis_states: Vec<String>,

    #[validate(range(min = 0, max = 366))]
    pub window_days: i64,

    pub max_distance_miles: f64,

    pub earth_radius_miles: f64,

    pub min_fire_year: i32,
    pub max_fire_year: i32,

    pub start_date_from: NaiveDate,
    pub start_date_to: NaiveDate,

    #[validate(length(min = 1))]
    pub required_measurements: Vec<Measurement>,
}

impl PipelineConfig {
    /// Load defaults, layering the TOML file at `path` on top when given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                if !path.exists() {
                    return Err(ProcessingError::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                // Fields absent from the file fall back to `Default` through `#[serde(default)]`
                Config::builder()
                    .add_source(File::from(path).format(FileFormat::Toml).required(true))
                    .build()?
                    .try_deserialize::<PipelineConfig>()?
            }
            None => Self::default(),
        };
        config.check()?;

        tracing::debug!(?config, "Pipeline configuration loaded");
        Ok(config)
    }

    /// Field-level validation plus the cross-field bounds `validator` cannot express
    pub fn check(&self) -> Result<()> {
        self.validate()?;

        if !(self.max_distance_miles.is_finite() && self.max_distance_miles > 0.0) {
            return Err(ProcessingError::Config(format!(
                "max_distance_miles must be positive, got {}",
                self.max_distance_miles
            )));
        }

        if !(self.earth_radius_miles.is_finite() && self.earth_radius_miles > 0.0) {
            return Err(ProcessingError::Config(format!(
                "earth_radius_miles must be positive, got {}",
                self.earth_radius_miles
            )));
        }

        if self.min_fire_year > self.max_fire_year {
            return Err(ProcessingError::Config(format!(
                "Fire year range is inverted: [{}, {}]",
                self.min_fire_year, self.max_fire_year
            )));
        }

        if self.start_date_from > self.start_date_to {
            return Err(ProcessingError::Config(format!(
                "Start date range is inverted: [{}, {}]",
                self.start_date_from, self.start_date_to
            )));
        }

        Ok(())
    }

    pub fn fire_years(&self) -> RangeInclusive<i32> {
        self.min_fire_year..=self.max_fire_year
    }

    pub fn start_dates(&self) -> RangeInclusive<NaiveDate> {
        self.start_date_from..=self.start_date_to
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        // The default bounds are compile-time literals
        let start_date_from = parse_date_bound(DEFAULT_START_DATE_FROM).unwrap_or(NaiveDate::MIN);
        let start_date_to = parse_date_bound(DEFAULT_START_DATE_TO).unwrap_or(NaiveDate::MAX);

        Self {
            state_abbreviations: STATE_ABBREVIATIONS
                .iter()
                .map(|(abbreviation, name)| StateAlias {
                    abbreviation: abbreviation.to_string(),
                    name: name.to_string(),
                })
                .collect(),
            analysis_states: ANALYSIS_STATES.iter().map(|s| s.to_string()).collect(),
            window_days: DEFAULT_WINDOW_DAYS,
            max_distance_miles: DEFAULT_MAX_DISTANCE_MILES,
            earth_radius_miles: EARTH_RADIUS_MILES,
            min_fire_year: DEFAULT_MIN_FIRE_YEAR,
            max_fire_year: DEFAULT_MAX_FIRE_YEAR,
            start_date_from,
            start_date_to,
            required_measurements: vec![Measurement::Co, Measurement::So2],
        }
    }
}
