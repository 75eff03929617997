use crate::models::JoinedRecord;
use crate::utils::coordinates::spherical_cosine_distance;
use rayon::prelude::*;

/// Attaches fire-to-station distance and keeps pairs strictly closer than the threshold
pub struct DistanceFilter {
    max_distance_miles: f64,
    earth_radius_miles: f64,
}

impl DistanceFilter {
    pub fn new(max_distance_miles: f64, earth_radius_miles: f64) -> Self {
        Self {
            max_distance_miles,
            earth_radius_miles,
        }
    }

    /// Distance in miles, or `None` when the fire has no location
    pub fn distance(&self, record: &JoinedRecord) -> Option<f64> {
        let (fire_lat, fire_lon) = record.fire.coordinates()?;
        Some(spherical_cosine_distance(
            fire_lat,
            fire_lon,
            record.pollution.latitude,
            record.pollution.longitude,
            self.earth_radius_miles,
        ))
    }

    pub fn is_within(&self, distance_miles: Option<f64>) -> bool {
        matches!(distance_miles, Some(d) if d < self.max_distance_miles)
    }

    pub fn apply(&self, records: Vec<JoinedRecord>) -> Vec<JoinedRecord> {
        let input = records.len();
        let kept: Vec<JoinedRecord> = records
            .into_par_iter()
            .filter_map(|record| {
                let distance = self.distance(&record);
                self.is_within(distance)
                    .then(|| record.with_distance(distance))
            })
            .collect();

        tracing::debug!(input, kept = kept.len(), "Distance filter applied");
        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FireRecord, PollutionRecord};
    use crate::utils::constants::{DEFAULT_MAX_DISTANCE_MILES, EARTH_RADIUS_MILES};
    use chrono::NaiveDate;

    fn filter() -> DistanceFilter {
        DistanceFilter::new(DEFAULT_MAX_DISTANCE_MILES, EARTH_RADIUS_MILES)
    }

    fn pair(fire_location: Option<(f64, f64)>, station: (f64, f64)) -> JoinedRecord {
        let mut fire = FireRecord::new("1", "California")
            .with_start_date(NaiveDate::from_ymd_opt(2014, 5, 10).unwrap());
        if let Some((lat, lon)) = fire_location {
            fire = fire.with_location(lat, lon);
        }
        let reading = PollutionRecord::new(
            "California",
            NaiveDate::from_ymd_opt(2014, 5, 12),
            station.0,
            station.1,
        );
        JoinedRecord::new(fire, reading)
    }

    #[test]
    fn test_nearby_station_is_kept_with_distance() {
        let kept = filter().apply(vec![pair(Some((34.0, -118.0)), (34.05, -118.05))]);

        assert_eq!(kept.len(), 1);
        let distance = kept[0].distance_miles.unwrap();
        assert!((distance - 4.49).abs() < 0.05);
    }

    #[test]
    fn test_distant_station_is_dropped() {
        let kept = filter().apply(vec![pair(Some((34.0, -118.0)), (40.0, -122.0))]);
        assert!(kept.is_empty());
    }

    #[test]
    fn test_fire_without_location_is_dropped() {
        let kept = filter().apply(vec![pair(None, (34.05, -118.05))]);
        assert!(kept.is_empty());
    }

    #[test]
    fn test_threshold_is_strict() {
        let filter = filter();
        assert!(filter.is_within(Some(19.999)));
        assert!(!filter.is_within(Some(20.0)));
        assert!(!filter.is_within(None));
        assert!(!filter.is_within(Some(f64::NAN)));
    }

    #[test]
    fn test_co_located_fire_and_station() {
        let kept = filter().apply(vec![pair(Some((33.4484, -112.074)), (33.4484, -112.074))]);

        assert_eq!(kept.len(), 1);
        let distance = kept[0].distance_miles.unwrap();
        assert!(!distance.is_nan());
        assert!(distance < 1e-3);
    }

    #[test]
    fn test_all_survivors_are_closer_than_threshold() {
        let records: Vec<JoinedRecord> = (0..50)
            .map(|i| pair(Some((34.0, -118.0)), (34.0 + i as f64 * 0.01, -118.0)))
            .collect();

        let kept = filter().apply(records);
        assert!(!kept.is_empty());
        assert!(kept.len() < 50);
        assert!(kept.iter().all(|r| r.distance_miles.unwrap() < 20.0));
    }
}
