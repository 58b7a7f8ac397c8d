//! Low-precision solar coordinates (Meeus, *Astronomical Algorithms*, ch. 25).
//!
//! Accuracy is about 0.01° in longitude between 1900 and 2100, which is far below the
//! refraction uncertainty at the horizon.

use crate::constants::{Radian, JD, RADEG};
use crate::conversion::{normalize_angle, normalize_degrees};
use crate::time::julian_centuries;

/// Geocentric apparent position of the Sun.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunPosition {
    /// Apparent ecliptic longitude, radians in [0, 2π).
    pub longitude: Radian,
    pub right_ascension: Radian,
    pub declination: Radian,
    /// Sun–Earth distance, astronomical units.
    pub distance: f64,
}

/// True obliquity of the ecliptic (mean obliquity plus the dominant nutation term), radians.
///
/// Arguments
/// -----------------
/// * `t`: Julian centuries since J2000.0.
pub fn obliquity(t: f64) -> Radian {
    let eps0_arcsec = 84381.448 - 46.8150 * t - 0.00059 * t * t + 0.001813 * t * t * t;
    let omega = (125.04 - 1934.136 * t) * RADEG;
    (eps0_arcsec / 3600.0 + 0.00256 * omega.cos()) * RADEG
}

/// Compute the apparent geocentric position of the Sun at a Julian Date.
pub fn sun_position(jd: JD) -> SunPosition {
    let t = julian_centuries(jd);

    let l0 = 280.46646 + 36000.76983 * t + 0.0003032 * t * t;
    let m = 357.52911 + 35999.05029 * t - 0.0001537 * t * t;
    let e = 0.016708634 - 0.000042037 * t - 0.0000001267 * t * t;
    let m_rad = m * RADEG;

    let c = (1.914602 - 0.004817 * t - 0.000014 * t * t) * m_rad.sin()
        + (0.019993 - 0.000101 * t) * (2.0 * m_rad).sin()
        + 0.000289 * (3.0 * m_rad).sin();

    let true_longitude = l0 + c;
    let true_anomaly = (m + c) * RADEG;
    let distance = 1.000001018 * (1.0 - e * e) / (1.0 + e * true_anomaly.cos());

    let omega = (125.04 - 1934.136 * t) * RADEG;
    let apparent = normalize_degrees(true_longitude - 0.00569 - 0.00478 * omega.sin()) * RADEG;

    let eps = obliquity(t);
    let right_ascension = normalize_angle((eps.cos() * apparent.sin()).atan2(apparent.cos()));
    let declination = (eps.sin() * apparent.sin()).asin();

    SunPosition {
        longitude: apparent,
        right_ascension,
        declination,
        distance,
    }
}
