use crate::models::{JoinedRecord, Measurement};
use chrono::{Datelike, NaiveDate};
use rayon::prelude::*;
use std::ops::RangeInclusive;

/// Drops pairs lacking required measurements, derives date columns, and
/// restricts to the fire-year and start-date ranges of the analysis.
///
/// The year range is largely implied by a tight start-date range; both are
/// applied so either bound can be moved independently.
pub struct QualityFilter {
    required: Vec<Measurement>,
    fire_years: RangeInclusive<i32>,
    start_dates: RangeInclusive<NaiveDate>,
}

/// Rows remaining after each quality step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QualityCounts {
    pub with_measurements: usize,
    pub within_fire_years: usize,
    pub within_start_dates: usize,
}

impl QualityFilter {
    pub fn new(
        required: Vec<Measurement>,
        fire_years: RangeInclusive<i32>,
        start_dates: RangeInclusive<NaiveDate>,
    ) -> Self {
        Self {
            required,
            fire_years,
            start_dates,
        }
    }

    /// Every required measurement must be present
    pub fn has_required_measurements(&self, record: &JoinedRecord) -> bool {
        self.required
            .iter()
            .all(|&measurement| record.pollution.aqi.get(measurement).is_some())
    }

    pub fn derive_columns(record: JoinedRecord) -> JoinedRecord {
        let date_diff = record.day_offset();
        let fire_month = record.start_date().map(|start| start.month());
        record.with_date_fields(date_diff, fire_month)
    }

    pub fn in_fire_years(&self, record: &JoinedRecord) -> bool {
        record
            .fire
            .fire_year
            .is_some_and(|year| self.fire_years.contains(&year))
    }

    pub fn in_start_dates(&self, record: &JoinedRecord) -> bool {
        record
            .start_date()
            .is_some_and(|start| self.start_dates.contains(&start))
    }

    pub fn drop_incomplete(&self, records: Vec<JoinedRecord>) -> Vec<JoinedRecord> {
        records
            .into_par_iter()
            .filter(|record| self.has_required_measurements(record))
            .map(Self::derive_columns)
            .collect()
    }

    pub fn restrict_fire_years(&self, records: Vec<JoinedRecord>) -> Vec<JoinedRecord> {
        records
            .into_par_iter()
            .filter(|record| self.in_fire_years(record))
            .collect()
    }

    pub fn restrict_start_dates(&self, records: Vec<JoinedRecord>) -> Vec<JoinedRecord> {
        records
            .into_par_iter()
            .filter(|record| self.in_start_dates(record))
            .collect()
    }

    /// All quality steps in order, with the count left after each
    pub fn apply(&self, records: Vec<JoinedRecord>) -> (Vec<JoinedRecord>, QualityCounts) {
        let complete = self.drop_incomplete(records);
        let with_measurements = complete.len();

        let in_years = self.restrict_fire_years(complete);
        let within_fire_years = in_years.len();

        let in_dates = self.restrict_start_dates(in_years);
        let within_start_dates = in_dates.len();

        tracing::debug!(
            with_measurements,
            within_fire_years,
            within_start_dates,
            "Quality filter applied"
        );

        (
            in_dates,
            QualityCounts {
                with_measurements,
                within_fire_years,
                within_start_dates,
            },
        )
    }
}
