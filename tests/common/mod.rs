use approx::assert_relative_eq;
use geocoord::Position;

/// Absolute difference of two bearings in degrees, folded into [0, 180].
pub fn bearing_diff(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(360.0);
    d.min(360.0 - d)
}

pub fn assert_same_place(actual: &Position, latitude: f64, longitude: f64, epsilon: f64) {
    assert_relative_eq!(actual.latitude(), latitude, epsilon = epsilon);
    assert_relative_eq!(actual.longitude(), longitude, epsilon = epsilon);
}
