//! # Calendar instants and sidereal time
//!
//! Helpers around [`hifitime::Epoch`], the calendar instant type of the crate. All conversions
//! use the UTC time scale; the low-precision celestial engine does not distinguish UT1 from UTC.

use hifitime::Epoch;

use crate::constants::{Radian, DAYS_PER_JULIAN_CENTURY, DPI, J2000_JD, JD, JD_TO_MJD, MJD, T2000};
use crate::conversion::normalize_angle;

/// Default instant of a position: 1900-01-01T00:00:00 UTC.
pub fn default_instant() -> Epoch {
    Epoch::from_gregorian_utc_at_midnight(1900, 1, 1)
}

/// Julian Date of an epoch, UTC scale.
pub fn julian_day(epoch: &Epoch) -> JD {
    epoch.to_jde_utc_days()
}

/// Modified Julian Date of an epoch, UTC scale.
pub fn modified_julian_day(epoch: &Epoch) -> MJD {
    epoch.to_mjd_utc_days()
}

/// Epoch of a Julian Date given in the UTC scale.
pub fn epoch_from_jd(jd: JD) -> Epoch {
    Epoch::from_jde_utc(jd)
}

/// Julian centuries elapsed since J2000.0.
pub fn julian_centuries(jd: JD) -> f64 {
    (jd - J2000_JD) / DAYS_PER_JULIAN_CENTURY
}

/// Julian Date of the 0h UTC that starts the civil day containing `jd`.
pub fn start_of_utc_day(jd: JD) -> JD {
    (jd - 0.5).floor() + 0.5
}

/// Transformation from Julian Date (JD) to Modified Julian Date (MJD)
pub fn jd_to_mjd(jd: JD) -> MJD {
    jd - JD_TO_MJD
}

/// Compute the Greenwich Mean Sidereal Time (GMST) in radians
/// for a given Modified Julian Date (UT time scale).
///
/// The mean sidereal time at 0h is taken from the IAU 1982 cubic polynomial, then the
/// fraction of the day is added at the sidereal rate.
///
/// # Arguments
/// * `tjm` - Modified Julian Date
///
/// # Returns
/// * GMST angle in radians, normalized to the interval [0, 2π).
///
/// # References
/// * IAU 1982, IERS Conventions 1996/2000.
pub fn gmst(tjm: MJD) -> Radian {
    // GMST at 0h UT, in seconds
    const C0: f64 = 24110.54841;
    const C1: f64 = 8640184.812866;
    const C2: f64 = 9.3104e-2;
    const C3: f64 = -6.2e-6;

    // Ratio of sidereal day to solar day
    const RAP: f64 = 1.00273790934;

    let midnight = tjm.floor();
    let t = (midnight - T2000) / DAYS_PER_JULIAN_CENTURY;

    let gmst0 = (((C3 * t + C2) * t + C1) * t + C0) * DPI / 86400.0;
    normalize_angle(gmst0 + tjm.fract() * DPI * RAP)
}

/// Local mean sidereal time for an east-positive longitude, radians in [0, 2π).
pub fn local_sidereal_time(tjm: MJD, longitude: Radian) -> Radian {
    normalize_angle(gmst(tjm) + longitude)
}

#[cfg(test)]
mod time_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_instant() {
        let epoch = default_instant();
        assert_relative_eq!(julian_day(&epoch), 2_415_020.5, epsilon = 1e-9);
        assert_relative_eq!(modified_julian_day(&epoch), 15_020.0, epsilon = 1e-9);
    }

    #[test]
    fn test_julian_day_conversions() {
        let epoch = epoch_from_jd(2_459_215.5);
        assert_relative_eq!(modified_julian_day(&epoch), 59_215.0, epsilon = 1e-9);
        assert_eq!(jd_to_mjd(2_459_216.5), 59_216.0);
        assert_eq!(start_of_utc_day(2_459_216.2), 2_459_215.5);
        assert_eq!(start_of_utc_day(2_459_216.5), 2_459_216.5);
        assert_relative_eq!(julian_centuries(J2000_JD + 36_525.0), 1.0);
    }

    #[test]
    fn test_gmst() {
        assert_relative_eq!(gmst(57028.478514610404), 4.851925725092499, epsilon = 1e-12);
        assert_relative_eq!(gmst(T2000), 4.894961212789145, epsilon = 1e-12);
    }

    #[test]
    fn test_local_sidereal_time_wraps() {
        let lst = local_sidereal_time(T2000, std::f64::consts::PI);
        assert!((0.0..DPI).contains(&lst));
        assert_relative_eq!(lst, 4.894961212789145 - std::f64::consts::PI, epsilon = 1e-12);
    }
}
