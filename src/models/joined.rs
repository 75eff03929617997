use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{FireRecord, PollutionRecord};

/// A fire paired with one monitoring reading from the same state, plus derived columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinedRecord {
    pub fire: FireRecord,
    pub pollution: PollutionRecord,
    pub distance_miles: Option<f64>,
    pub date_diff_fire_pollution: Option<i64>,
    pub fire_month: Option<u32>,
}

impl JoinedRecord {
    pub fn new(fire: FireRecord, pollution: PollutionRecord) -> Self {
        Self {
            fire,
            pollution,
            distance_miles: None,
            date_diff_fire_pollution: None,
            fire_month: None,
        }
    }

    pub fn with_distance(self, distance_miles: Option<f64>) -> Self {
        Self {
            distance_miles,
            ..self
        }
    }

    pub fn with_date_fields(
        self,
        date_diff_fire_pollution: Option<i64>,
        fire_month: Option<u32>,
    ) -> Self {
        Self {
            date_diff_fire_pollution,
            fire_month,
            ..self
        }
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.fire.start_date
    }

    pub fn local_date(&self) -> Option<NaiveDate> {
        self.pollution.date_local
    }

    /// Signed days from fire start to the reading; `None` if either date is unknown
    pub fn day_offset(&self) -> Option<i64> {
        let start = self.start_date()?;
        let local = self.local_date()?;
        Some((local - start).num_days())
    }
}
