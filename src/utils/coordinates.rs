use crate::error::{ProcessingError, Result};
use crate::utils::constants::EARTH_RADIUS_MILES;

/// Parse a decimal-degree coordinate cell. Empty or malformed cells yield `None`.
///
/// # Examples
/// ```
/// use fire_pollution::utils::coordinates::parse_coordinate;
///
/// assert_eq!(parse_coordinate(" -118.25 "), Some(-118.25));
/// assert_eq!(parse_coordinate(""), None);
/// ```
pub fn parse_coordinate(coord_str: &str) -> Option<f64> {
    coord_str
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Validate that a coordinate pair lies on the globe
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<()> {
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(ProcessingError::InvalidCoordinate(format!(
            "Latitude {} is outside [-90, 90]",
            latitude
        )));
    }

    if !(-180.0..=180.0).contains(&longitude) {
        return Err(ProcessingError::InvalidCoordinate(format!(
            "Longitude {} is outside [-180, 180]",
            longitude
        )));
    }

    Ok(())
}

/// Parse a latitude/longitude pair.
///
/// A pair with a missing, malformed, or off-globe half yields `None`.
pub fn parse_location(latitude: Option<&str>, longitude: Option<&str>) -> Option<(f64, f64)> {
    let (lat, lon) = latitude
        .and_then(parse_coordinate)
        .zip(longitude.and_then(parse_coordinate))?;

    match validate_coordinates(lat, lon) {
        Ok(()) => Some((lat, lon)),
        Err(e) => {
            tracing::debug!(error = %e, "Coordinate pair discarded");
            None
        }
    }
}

/// Great-circle distance via the spherical law of cosines.
///
/// The cosine sum is clamped to `[-1, 1]` before `acos`: for identical or
/// antipodal points rounding can push it just outside the domain.
pub fn spherical_cosine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64, radius: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let cosine = lat1_rad.sin() * lat2_rad.sin()
        + lat1_rad.cos() * lat2_rad.cos() * delta_lon.cos();

    cosine.clamp(-1.0, 1.0).acos() * radius
}

/// Great-circle distance in miles on a sphere of radius 3958.8 mi
pub fn distance_miles(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    spherical_cosine_distance(lat1, lon1, lat2, lon2, EARTH_RADIUS_MILES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_coordinate() {
        assert!((parse_coordinate("34.0522").unwrap() - 34.0522).abs() < 0.000001);
        assert!((parse_coordinate(" -118.2437 ").unwrap() - -118.2437).abs() < 0.000001);
        assert_eq!(parse_coordinate("NA"), None);
        assert_eq!(parse_coordinate("NaN"), None);
        assert_eq!(parse_coordinate(""), None);
    }

    #[test]
    fn test_coordinate_validation() {
        assert!(validate_coordinates(34.0, -118.0).is_ok());
        assert!(validate_coordinates(-90.0, 180.0).is_ok());
        assert!(validate_coordinates(91.0, 0.0).is_err());
        assert!(validate_coordinates(0.0, -181.0).is_err());
    }

    #[test]
    fn test_parse_location() {
        assert_eq!(parse_location(Some("34.05"), Some("-118.05")), Some((34.05, -118.05)));
        assert_eq!(parse_location(Some("34.05"), None), None);
        assert_eq!(parse_location(Some("34.05"), Some("abc")), None);
        assert_eq!(parse_location(Some("134.05"), Some("-118.05")), None);
    }

    #[test]
    fn test_known_distance() {
        // Los Angeles to San Francisco, roughly 347 miles
        let distance = distance_miles(34.0522, -118.2437, 37.7749, -122.4194);
        assert!((distance - 347.0).abs() < 5.0, "got {}", distance);
    }

    #[test]
    fn test_nearby_station_distance() {
        let distance = distance_miles(34.0, -118.0, 34.05, -118.05);
        assert!((distance - 4.49).abs() < 0.05, "got {}", distance);
    }

    #[test]
    fn test_identical_points_are_zero() {
        for &(lat, lon) in &[(34.0, -118.0), (0.0, 0.0), (89.999, 179.5), (-45.123456, 12.3)] {
            let distance = distance_miles(lat, lon, lat, lon);
            assert!(!distance.is_nan());
            assert!(distance.abs() < 1e-3, "({}, {}) -> {}", lat, lon, distance);
        }
    }

    #[test]
    fn test_antipodal_points_are_finite() {
        let distance = distance_miles(0.0, 0.0, 0.0, 180.0);
        assert!(distance.is_finite());
        let half_circumference = std::f64::consts::PI * EARTH_RADIUS_MILES;
        assert!((distance - half_circumference).abs() < 1e-6);

        let pole_to_pole = distance_miles(90.0, 0.0, -90.0, 0.0);
        assert!((pole_to_pole - half_circumference).abs() < 1e-6);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let pairs = [
            ((34.0, -118.0), (34.05, -118.05)),
            ((33.4484, -112.074), (32.2226, -110.9747)),
            ((-12.5, 170.0), (40.0, -170.0)),
        ];
        for ((lat1, lon1), (lat2, lon2)) in pairs {
            let there = distance_miles(lat1, lon1, lat2, lon2);
            let back = distance_miles(lat2, lon2, lat1, lon1);
            assert!((there - back).abs() < 1e-9);
        }
    }

    #[test]
    fn test_grid_never_produces_nan() {
        let mut lat = -90.0;
        while lat <= 90.0 {
            let mut lon = -180.0;
            while lon <= 180.0 {
                assert!(!distance_miles(lat, lon, lat, lon).is_nan());
                assert!(!distance_miles(lat, lon, -lat, lon + 180.0).is_nan());
                lon += 7.5;
            }
            lat += 7.5;
        }
    }
}
