//! Geodesic measurement helpers
//!
//! Distances use the haversine formula on the mean earth radius, which is what
//! map widgets report for marker-to-marker measurements.

use geo::{Coord, Distance, Haversine, LineString, Point};

/// Great-circle distance in meters between two `(lat, lng)` points
pub fn compute_distance(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    Haversine.distance(Point::new(lng1, lat1), Point::new(lng2, lat2))
}

/// Cumulative great-circle length in meters along the path
pub fn compute_polyline_length(path: &LineString<f64>) -> f64 {
    path.lines()
        .map(|segment| Haversine.distance(Point::from(segment.start), Point::from(segment.end)))
        .sum()
}

/// Builds a path from `(lat, lng)` pairs
pub fn path_from_lat_lng(points: &[(f64, f64)]) -> LineString<f64> {
    points
        .iter()
        .map(|&(lat, lng)| Coord { x: lng, y: lat })
        .collect()
}

pub(crate) fn is_valid_latitude(lat: f64) -> bool {
    lat.is_finite() && (-90.0..=90.0).contains(&lat)
}

pub(crate) fn is_valid_longitude(lng: f64) -> bool {
    lng.is_finite() && (-180.0..=180.0).contains(&lng)
}

pub(crate) fn is_valid_position(lat: f64, lng: f64) -> bool {
    is_valid_latitude(lat) && is_valid_longitude(lng)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_between_nearby_points() {
        // One degree north-east of central India, roughly 152 km.
        let d = compute_distance(20.0, 78.0, 21.0, 79.0);
        assert!((150_000.0..155_000.0).contains(&d), "unexpected distance {d}");
        assert_eq!(compute_distance(20.0, 78.0, 20.0, 78.0), 0.0);
    }

    #[test]
    fn two_point_length_matches_distance() {
        let path = path_from_lat_lng(&[(20.0, 78.0), (21.0, 79.0)]);
        let length = compute_polyline_length(&path);
        let distance = compute_distance(20.0, 78.0, 21.0, 79.0);
        assert!((length - distance).abs() < 1e-6);
    }

    #[test]
    fn length_accumulates_segments() {
        let path = path_from_lat_lng(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0)]);
        let expected = compute_distance(0.0, 0.0, 0.0, 1.0) + compute_distance(0.0, 1.0, 1.0, 1.0);
        assert!((compute_polyline_length(&path) - expected).abs() < 1e-6);
    }

    #[test]
    fn degenerate_paths_have_zero_length() {
        assert_eq!(compute_polyline_length(&LineString::new(vec![])), 0.0);
        assert_eq!(compute_polyline_length(&path_from_lat_lng(&[(5.0, 5.0)])), 0.0);
    }

    #[test]
    fn position_validation() {
        assert!(is_valid_position(20.0, 78.0));
        assert!(!is_valid_position(91.0, 0.0));
        assert!(!is_valid_position(0.0, 181.0));
        assert!(!is_valid_position(f64::NAN, 0.0));
    }
}
