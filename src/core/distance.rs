use crate::models::GeoPoint;

/// Earth's radius in kilometers
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Calculate the Haversine distance between two points in kilometers
///
/// # Arguments
/// * `lat1` - Latitude of first point in degrees
/// * `lon1` - Longitude of first point in degrees
/// * `lat2` - Latitude of second point in degrees
/// * `lon2` - Longitude of second point in degrees
///
/// # Returns
/// Distance in kilometers
#[inline]
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Distance between buyer and vendor in kilometers
///
/// Returns `None` when either point is missing or has a non-finite
/// coordinate.
pub fn distance_km(from: Option<&GeoPoint>, to: Option<&GeoPoint>) -> Option<f64> {
    let (from, to) = (from?, to?);
    if !from.is_finite() || !to.is_finite() {
        return None;
    }

    Some(haversine_distance(from.lat, from.lng, to.lat, to.lng))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_distance() {
        // Delhi to Mumbai (approximately 1148 km)
        let distance = haversine_distance(28.6139, 77.2090, 19.0760, 72.8777);
        assert!(
            distance > 1140.0 && distance < 1165.0,
            "Distance should be ~1148km, got {}",
            distance
        );
    }

    #[test]
    fn test_distance_is_symmetric() {
        let delhi = GeoPoint::new(28.6139, 77.2090);
        let pune = GeoPoint::new(18.5204, 73.8567);

        let there = distance_km(Some(&delhi), Some(&pune)).unwrap();
        let back = distance_km(Some(&pune), Some(&delhi)).unwrap();
        assert!((there - back).abs() < 1e-9);
    }

    #[test]
    fn test_same_point_is_zero() {
        let point = GeoPoint::new(12.9716, 77.5946);
        assert_eq!(distance_km(Some(&point), Some(&point)), Some(0.0));
    }

    #[test]
    fn test_unknown_distance() {
        let point = GeoPoint::new(12.9716, 77.5946);
        let broken = GeoPoint::new(f64::NAN, 77.5946);

        assert_eq!(distance_km(None, Some(&point)), None);
        assert_eq!(distance_km(Some(&point), None), None);
        assert_eq!(distance_km(Some(&point), Some(&broken)), None);
        assert_eq!(
            distance_km(Some(&GeoPoint::new(0.0, f64::INFINITY)), Some(&point)),
            None
        );
    }
}
