use crate::models::{FireRecord, JoinedRecord, PollutionRecord};
use chrono::{Days, NaiveDate};
use rayon::prelude::*;
use std::collections::HashMap;

/// Joins fires to monitoring readings from the same state within a date window.
///
/// Every qualifying pair yields one row: a reading near several fires
/// appears once per fire, and a fire with many readings once per reading.
pub struct Correlator {
    window_days: u64,
}

impl Correlator {
    pub fn new(window_days: i64) -> Self {
        Self {
            window_days: window_days.max(0) as u64,
        }
    }

    /// Closed window `[start - w, start + w]`; unknown dates never match
    pub fn within_window(
        &self,
        start_date: Option<NaiveDate>,
        local_date: Option<NaiveDate>,
    ) -> bool {
        match (start_date, local_date) {
            (Some(start), Some(local)) => {
                let (from, to) = self.window(start);
                from <= local && local <= to
            }
            _ => false,
        }
    }

    fn window(&self, start: NaiveDate) -> (NaiveDate, NaiveDate) {
        let days = Days::new(self.window_days);
        (
            start.checked_sub_days(days).unwrap_or(NaiveDate::MIN),
            start.checked_add_days(days).unwrap_or(NaiveDate::MAX),
        )
    }

    pub fn correlate(
        &self,
        fires: &[FireRecord],
        pollution: &[PollutionRecord],
    ) -> Vec<JoinedRecord> {
        let index = StateIndex::build(pollution);

        let joined: Vec<JoinedRecord> = fires
            .par_iter()
            .flat_map_iter(|fire| {
                let matches: &[&PollutionRecord] = match fire.start_date {
                    Some(start) => index.readings_between(&fire.fire_state, self.window(start)),
                    None => &[],
                };
                matches
                    .iter()
                    .map(move |reading| JoinedRecord::new(fire.clone(), (*reading).clone()))
            })
            .collect();

        tracing::debug!(
            fires = fires.len(),
            readings = pollution.len(),
            pairs = joined.len(),
            "Correlation complete"
        );
        joined
    }
}

/// Dated readings grouped by state and sorted by date
struct StateIndex<'a> {
    by_state: HashMap<&'a str, Vec<&'a PollutionRecord>>,
}

impl<'a> StateIndex<'a> {
    fn build(pollution: &'a [PollutionRecord]) -> Self {
        let mut by_state: HashMap<&'a str, Vec<&'a PollutionRecord>> = HashMap::new();
        for reading in pollution.iter().filter(|r| r.date_local.is_some()) {
            by_state.entry(reading.state.as_str()).or_default().push(reading);
        }

        // Stable sort keeps input order among readings of the same day
        for readings in by_state.values_mut() {
            readings.sort_by_key(|r| r.date_local);
        }

        Self { by_state }
    }

    fn readings_between(
        &self,
        state: &str,
        (from, to): (NaiveDate, NaiveDate),
    ) -> &[&'a PollutionRecord] {
        let Some(readings) = self.by_state.get(state) else {
            return &[];
        };

        let lower = readings.partition_point(|r| r.date_local < Some(from));
        let upper = readings.partition_point(|r| r.date_local <= Some(to));
        &readings[lower..upper.max(lower)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn fire(id: &str, state: &str, start: Option<NaiveDate>) -> FireRecord {
        let mut fire = FireRecord::new(id, state).with_location(34.0, -118.0);
        fire.start_date = start;
        fire
    }

    fn reading(state: &str, local: Option<NaiveDate>) -> PollutionRecord {
        PollutionRecord::new(state, local, 34.05, -118.05).with_aqi(Some(5.0), Some(2.0))
    }

    /// Cross join then filter, the straightforward formulation
    fn naive_correlate(
        correlator: &Correlator,
        fires: &[FireRecord],
        pollution: &[PollutionRecord],
    ) -> Vec<(String, Option<NaiveDate>)> {
        let mut pairs = Vec::new();
        for fire in fires {
            for reading in pollution {
                if fire.fire_state == reading.state
                    && correlator.within_window(fire.start_date, reading.date_local)
                {
                    pairs.push((fire.fire_id.clone(), reading.date_local));
                }
            }
        }
        pairs.sort();
        pairs
    }

    #[test]
    fn test_window_is_inclusive() {
        let correlator = Correlator::new(7);
        let start = Some(date(2014, 5, 10));

        assert!(correlator.within_window(start, Some(date(2014, 5, 3))));
        assert!(correlator.within_window(start, Some(date(2014, 5, 17))));
        assert!(correlator.within_window(start, Some(date(2014, 5, 10))));
        assert!(!correlator.within_window(start, Some(date(2014, 5, 2))));
        assert!(!correlator.within_window(start, Some(date(2014, 5, 18))));
    }

    #[test]
    fn test_null_dates_never_match() {
        let correlator = Correlator::new(7);
        assert!(!correlator.within_window(None, Some(date(2014, 5, 10))));
        assert!(!correlator.within_window(Some(date(2014, 5, 10)), None));
        assert!(!correlator.within_window(None, None));
    }

    #[test]
    fn test_join_requires_same_state() {
        let correlator = Correlator::new(7);
        let fires = vec![fire("1", "California", Some(date(2014, 5, 10)))];
        let pollution = vec![
            reading("California", Some(date(2014, 5, 12))),
            reading("Arizona", Some(date(2014, 5, 12))),
        ];

        let joined = correlator.correlate(&fires, &pollution);
        assert_eq!(joined.len(), 1);
        assert_eq!(joined[0].fire.fire_state, joined[0].pollution.state);
    }

    #[test]
    fn test_reading_outside_window_is_excluded() {
        let correlator = Correlator::new(7);
        let fires = vec![fire("1", "California", Some(date(2014, 5, 10)))];
        let pollution = vec![reading("California", Some(date(2014, 5, 25)))];

        assert!(correlator.correlate(&fires, &pollution).is_empty());
    }

    #[test]
    fn test_no_deduplication() {
        let correlator = Correlator::new(7);
        let fires = vec![
            fire("1", "California", Some(date(2014, 5, 10))),
            fire("2", "California", Some(date(2014, 5, 11))),
            fire("3", "California", None),
        ];
        let pollution = vec![
            reading("California", Some(date(2014, 5, 12))),
            reading("California", Some(date(2014, 5, 12))),
            reading("California", Some(date(2014, 5, 14))),
            reading("California", None),
        ];

        let joined = correlator.correlate(&fires, &pollution);
        // Two fires times three dated readings
        assert_eq!(joined.len(), 6);
        assert!(joined.iter().all(|row| row.fire.fire_id != "3"));
    }

    #[test]
    fn test_matches_cross_join_formulation() {
        let correlator = Correlator::new(7);
        let states = ["California", "Arizona", "Nevada"];

        let fires: Vec<FireRecord> = (0..30)
            .map(|i| {
                let start = if i % 7 == 0 {
                    None
                } else {
                    Some(date(2014, 5, 1) + Days::new(i as u64))
                };
                fire(&i.to_string(), states[i % states.len()], start)
            })
            .collect();

        let pollution: Vec<PollutionRecord> = (0..90)
            .map(|i| {
                let local = if i % 11 == 0 {
                    None
                } else {
                    Some(date(2014, 4, 20) + Days::new((i * 5 % 60) as u64))
                };
                reading(states[(i / 2) % states.len()], local)
            })
            .collect();

        let mut indexed: Vec<(String, Option<NaiveDate>)> = correlator
            .correlate(&fires, &pollution)
            .into_iter()
            .map(|row| (row.fire.fire_id, row.pollution.date_local))
            .collect();
        indexed.sort();

        let expected = naive_correlate(&correlator, &fires, &pollution);
        assert!(!expected.is_empty());
        assert_eq!(indexed, expected);
    }

    #[test]
    fn test_joined_rows_satisfy_window() {
        let correlator = Correlator::new(7);
        let fires = vec![fire("1", "Arizona", Some(date(2014, 5, 20)))];
        let pollution: Vec<PollutionRecord> = (0..40)
            .map(|i| reading("Arizona", Some(date(2014, 5, 1) + Days::new(i))))
            .collect();

        let joined = correlator.correlate(&fires, &pollution);
        assert_eq!(joined.len(), 15);
        for row in &joined {
            let offset = row.day_offset().unwrap();
            assert!(offset.abs() <= 7);
        }
    }

    #[test]
    fn test_window_at_calendar_extremes() {
        let correlator = Correlator::new(7);
        assert!(correlator.within_window(Some(NaiveDate::MIN), Some(NaiveDate::MIN)));
        assert!(correlator.within_window(Some(NaiveDate::MAX), Some(NaiveDate::MAX)));
    }
}
