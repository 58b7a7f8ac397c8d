//! Lunar position, phase and apsides.
//!
//! The position uses the largest terms of the ELP-2000/82 series as tabulated by Meeus
//! (*Astronomical Algorithms*, ch. 47): fourteen terms in longitude, thirteen in distance and
//! eight in latitude. The truncation error is below 0.01° in longitude and about 20 km in
//! distance.

use crate::constants::{Kilometer, Radian, JD, RADEG};
use crate::conversion::{normalize_angle, normalize_degrees};
use crate::time::julian_centuries;

use super::sun::{obliquity, SunPosition};

/// Astronomical unit, kilometers.
const AU_KM: Kilometer = 149_597_870.7;

/// Mean Earth–Moon distance of the series, kilometers.
const MEAN_DISTANCE: Kilometer = 385_000.56;

/// Periodic term: multiples of (D, M, M', F) and the coefficient.
type Term = (i8, i8, i8, i8, f64);

/// Longitude terms, 1e-6 degree.
const LONGITUDE_TERMS: [Term; 14] = [
    (0, 0, 1, 0, 6_288_774.0),
    (2, 0, -1, 0, 1_274_027.0),
    (2, 0, 0, 0, 658_314.0),
    (0, 0, 2, 0, 213_618.0),
    (0, 1, 0, 0, -185_116.0),
    (0, 0, 0, 2, -114_332.0),
    (2, 0, -2, 0, 58_793.0),
    (2, -1, -1, 0, 57_066.0),
    (2, 0, 1, 0, 53_322.0),
    (2, -1, 0, 0, 45_758.0),
    (0, 1, -1, 0, -40_923.0),
    (1, 0, 0, 0, -34_720.0),
    (0, 1, 1, 0, -30_383.0),
    (2, 0, 0, -2, 15_327.0),
];

/// Distance terms, 1e-3 km.
const DISTANCE_TERMS: [Term; 13] = [
    (0, 0, 1, 0, -20_905_355.0),
    (2, 0, -1, 0, -3_699_111.0),
    (2, 0, 0, 0, -2_955_968.0),
    (0, 0, 2, 0, -569_925.0),
    (0, 1, 0, 0, 48_888.0),
    (0, 0, 0, 2, -3_149.0),
    (2, 0, -2, 0, 246_158.0),
    (2, -1, -1, 0, -152_138.0),
    (2, 0, 1, 0, -170_733.0),
    (2, -1, 0, 0, -204_586.0),
    (0, 1, -1, 0, -129_620.0),
    (1, 0, 0, 0, 108_743.0),
    (0, 1, 1, 0, 104_755.0),
];

/// Latitude terms, 1e-6 degree.
const LATITUDE_TERMS: [Term; 8] = [
    (0, 0, 0, 1, 5_128_122.0),
    (0, 0, 1, 1, 280_602.0),
    (0, 0, 1, -1, 277_693.0),
    (2, 0, 0, -1, 173_237.0),
    (2, 0, -1, 1, 55_413.0),
    (2, 0, -1, -1, 46_271.0),
    (2, 0, 0, 1, 32_573.0),
    (0, 0, 2, 1, 17_198.0),
];

/// Geocentric position of the Moon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoonPosition {
    /// Ecliptic longitude, radians in [0, 2π).
    pub longitude: Radian,
    pub latitude: Radian,
    pub distance: Kilometer,
    pub right_ascension: Radian,
    pub declination: Radian,
}

/// Fundamental arguments (D, M, M', F) in degrees and the eccentricity factor E.
struct Arguments {
    elongation: f64,
    sun_anomaly: f64,
    moon_anomaly: f64,
    node_distance: f64,
    e: f64,
}

impl Arguments {
    fn series(&self, terms: &[Term], trig: fn(f64) -> f64) -> f64 {
        terms
            .iter()
            .map(|&(d, m, mp, f, coefficient)| {
                let angle = d as f64 * self.elongation
                    + m as f64 * self.sun_anomaly
                    + mp as f64 * self.moon_anomaly
                    + f as f64 * self.node_distance;
                coefficient * self.e.powi(m.unsigned_abs() as i32) * trig(angle * RADEG)
            })
            .sum()
    }
}

/// Compute the geocentric position of the Moon at a Julian Date.
pub fn moon_position(jd: JD) -> MoonPosition {
    let t = julian_centuries(jd);

    let mean_longitude = 218.3164477 + 481267.88123421 * t;
    let args = Arguments {
        elongation: 297.8501921 + 445267.1114034 * t,
        sun_anomaly: 357.5291092 + 35999.0502909 * t,
        moon_anomaly: 134.9633964 + 477198.8675055 * t,
        node_distance: 93.2720950 + 483202.0175233 * t,
        e: 1.0 - 0.002516 * t,
    };

    let longitude = normalize_degrees(mean_longitude + args.series(&LONGITUDE_TERMS, f64::sin) / 1e6)
        * RADEG;
    let latitude = args.series(&LATITUDE_TERMS, f64::sin) / 1e6 * RADEG;
    let distance = MEAN_DISTANCE + args.series(&DISTANCE_TERMS, f64::cos) / 1e3;

    let eps = obliquity(t);
    let right_ascension = normalize_angle(
        (longitude.sin() * eps.cos() - latitude.tan() * eps.sin()).atan2(longitude.cos()),
    );
    let declination =
        (latitude.sin() * eps.cos() + latitude.cos() * eps.sin() * longitude.sin()).asin();

    MoonPosition {
        longitude,
        latitude,
        distance,
        right_ascension,
        declination,
    }
}

/// Named lunar phase, one of eight 45° sectors of the Sun–Moon longitude difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoonPhase {
    New,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    Full,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

impl MoonPhase {
    /// Phase from the Moon-minus-Sun ecliptic longitude, degrees.
    pub fn from_age_angle(angle: f64) -> Self {
        const PHASES: [MoonPhase; 8] = [
            MoonPhase::New,
            MoonPhase::WaxingCrescent,
            MoonPhase::FirstQuarter,
            MoonPhase::WaxingGibbous,
            MoonPhase::Full,
            MoonPhase::WaningGibbous,
            MoonPhase::LastQuarter,
            MoonPhase::WaningCrescent,
        ];
        let sector = ((normalize_degrees(angle) + 22.5) / 45.0).floor() as usize % 8;
        PHASES[sector]
    }
}

/// Illuminated fraction of the lunar disk and its geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoonIllumination {
    /// Illuminated fraction, 0 (new) to 1 (full).
    pub fraction: f64,
    /// Sun–Moon–Earth angle, degrees.
    pub phase_angle: f64,
    /// Geocentric elongation of the Moon from the Sun, degrees.
    pub elongation: f64,
    /// Moon-minus-Sun ecliptic longitude, degrees in [0, 360).
    pub age_angle: f64,
    pub phase: MoonPhase,
}

impl MoonIllumination {
    pub fn is_waxing(&self) -> bool {
        self.age_angle < 180.0
    }
}

/// Illumination of the Moon from its geocentric elongation (Meeus ch. 48).
pub fn illumination(moon: &MoonPosition, sun: &SunPosition) -> MoonIllumination {
    let cos_elongation = moon.latitude.cos() * (moon.longitude - sun.longitude).cos();
    let elongation = cos_elongation.clamp(-1.0, 1.0).acos();

    let sun_distance = sun.distance * AU_KM;
    let phase_angle = (sun_distance * elongation.sin())
        .atan2(moon.distance - sun_distance * elongation.cos());

    let age_angle = normalize_degrees((moon.longitude - sun.longitude).to_degrees());
    MoonIllumination {
        fraction: (1.0 + phase_angle.cos()) / 2.0,
        phase_angle: phase_angle.to_degrees(),
        elongation: elongation.to_degrees(),
        age_angle,
        phase: MoonPhase::from_age_angle(age_angle),
    }
}

/// Julian Ephemeris Day of the mean perigee (`k` integer) or mean apogee (`k` half-integer).
fn mean_apsis(k: f64) -> JD {
    let t = k / 1325.55;
    2451534.6698 + 27.55454989 * k - 0.0006691 * t * t - 0.000001098 * t * t * t
        + 0.0000000052 * t * t * t * t
}

/// Next mean perigee (`apogee = false`) or apogee at or after `jd` (Meeus ch. 50, without the
/// periodic terms, accurate to about a day).
pub fn next_mean_apsis(jd: JD, apogee: bool) -> JD {
    let offset = if apogee { 0.5 } else { 0.0 };
    let mut k = ((jd - 2451534.6698) / 27.55454989).floor() + offset;
    while mean_apsis(k) < jd {
        k += 1.0;
    }
    mean_apsis(k)
}

#[cfg(test)]
mod moon_test {
    use super::*;
    use crate::celestial::sun::sun_position;
    use approx::assert_relative_eq;

    #[test]
    fn test_moon_position_meeus_47a() {
        // 1992 April 12, 0h TD; full series gives λ = 133.1627°, β = -3.2291°, Δ = 368409.7 km
        let moon = moon_position(2_448_724.5);
        assert_relative_eq!(moon.longitude.to_degrees(), 133.1627, epsilon = 0.01);
        assert_relative_eq!(moon.latitude.to_degrees(), -3.2291, epsilon = 0.01);
        assert_relative_eq!(moon.distance, 368_409.7, epsilon = 30.0);
        assert_relative_eq!(moon.declination.to_degrees(), 13.7684, epsilon = 0.01);
    }

    #[test]
    fn test_illumination_at_full_and_new_moon() {
        // penumbral lunar eclipse of 2024-03-25, 07:00 UTC
        let jd = 2_460_394.79;
        let full = illumination(&moon_position(jd), &sun_position(jd));
        assert!(full.fraction > 0.99, "{}", full.fraction);
        assert_eq!(full.phase, MoonPhase::Full);

        // total solar eclipse of 2024-04-08, 18:18 UTC
        let jd = 2_460_409.26;
        let new = illumination(&moon_position(jd), &sun_position(jd));
        assert!(new.fraction < 0.01, "{}", new.fraction);
        assert_eq!(new.phase, MoonPhase::New);
    }

    #[test]
    fn test_phase_sectors() {
        assert_eq!(MoonPhase::from_age_angle(350.0), MoonPhase::New);
        assert_eq!(MoonPhase::from_age_angle(90.0), MoonPhase::FirstQuarter);
        assert_eq!(MoonPhase::from_age_angle(200.0), MoonPhase::Full);
        assert_eq!(MoonPhase::from_age_angle(300.0), MoonPhase::WaningCrescent);
    }

    #[test]
    fn test_next_mean_apsis() {
        let jd = 2_460_371.5; // 2024-03-01
        assert_relative_eq!(next_mean_apsis(jd, false), 2_460_379.680_275, epsilon = 1e-5);
        assert_relative_eq!(next_mean_apsis(jd, true), 2_460_393.457_550, epsilon = 1e-5);
    }
}
