//! # Solar and lunar data for a position and an instant
//!
//! The celestial representation of a [`Position`](crate::position::Position) is produced by a
//! [`CelestialEngine`]: a stateless strategy called once per resynchronization with the current
//! latitude, longitude and instant. The position shares its engine through an
//! `Arc<dyn CelestialEngine>`, so custom engines can be plugged in without touching the
//! aggregate.
//!
//! ## Overview
//!
//! [`LowPrecisionEngine`] is the default engine. It combines:
//!
//! - the Meeus low-precision solar coordinates ([`sun`]),
//! - a truncated Meeus lunar series, illumination and mean apsides ([`moon`]),
//! - rise/set times by sampled altitude crossings and eclipse predictions ([`events`]),
//! - tropical zodiac signs of the Sun and the Moon.
//!
//! Altitudes are geometric. The rise/set scan uses the standard altitudes
//! [`events::SUN_STANDARD_ALTITUDE`] and [`events::MOON_STANDARD_ALTITUDE`], which fold in
//! refraction, semi-diameter and (for the Moon) horizontal parallax. The reported Moon
//! altitude is topocentric.
//!
//! ## See also
//! * [`crate::time::local_sidereal_time`] – Hour angle reference.

pub mod events;
pub mod moon;
pub mod sun;

use std::fmt;

use hifitime::Epoch;

use crate::constants::{Degree, Kilometer, Radian, EARTH_RADIUS_KM, JD};
use crate::conversion::normalize_angle;
use crate::load_policy::RepresentationKind;
use crate::position::derived::{PositionSnapshot, Representation};
use crate::time::{epoch_from_jd, jd_to_mjd, julian_day, local_sidereal_time, start_of_utc_day};
use events::{
    next_lunar_eclipse, next_solar_eclipse, rise_and_set, LunarEclipseKind, SolarEclipseKind,
    MOON_STANDARD_ALTITUDE, SUN_STANDARD_ALTITUDE,
};
use moon::{illumination, moon_position, next_mean_apsis, MoonIllumination};
use sun::sun_position;

/// Altitude above the horizon and azimuth east of north, degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HorizontalCoordinates {
    pub altitude: Degree,
    pub azimuth: Degree,
}

/// Tropical zodiac sign, 30° of ecliptic longitude each starting at the vernal equinox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZodiacSign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl ZodiacSign {
    const ALL: [ZodiacSign; 12] = [
        ZodiacSign::Aries,
        ZodiacSign::Taurus,
        ZodiacSign::Gemini,
        ZodiacSign::Cancer,
        ZodiacSign::Leo,
        ZodiacSign::Virgo,
        ZodiacSign::Libra,
        ZodiacSign::Scorpio,
        ZodiacSign::Sagittarius,
        ZodiacSign::Capricorn,
        ZodiacSign::Aquarius,
        ZodiacSign::Pisces,
    ];

    /// Sign containing an ecliptic longitude in radians.
    pub fn from_longitude(longitude: Radian) -> Self {
        let index = (normalize_angle(longitude).to_degrees() / 30.0).floor() as usize;
        ZodiacSign::ALL[index.min(11)]
    }

    pub fn name(self) -> &'static str {
        match self {
            ZodiacSign::Aries => "Aries",
            ZodiacSign::Taurus => "Taurus",
            ZodiacSign::Gemini => "Gemini",
            ZodiacSign::Cancer => "Cancer",
            ZodiacSign::Leo => "Leo",
            ZodiacSign::Virgo => "Virgo",
            ZodiacSign::Libra => "Libra",
            ZodiacSign::Scorpio => "Scorpio",
            ZodiacSign::Sagittarius => "Sagittarius",
            ZodiacSign::Capricorn => "Capricorn",
            ZodiacSign::Aquarius => "Aquarius",
            ZodiacSign::Pisces => "Pisces",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Astrology {
    pub sun_sign: ZodiacSign,
    pub moon_sign: ZodiacSign,
}

/// An upcoming eclipse: time of greatest eclipse and its kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EclipseInfo<K> {
    pub instant: Epoch,
    pub kind: K,
}

/// Everything a [`CelestialEngine`] reports for one position and instant.
#[derive(Debug, Clone, PartialEq)]
pub struct CelestialResult {
    pub sunrise: Option<Epoch>,
    pub sunset: Option<Epoch>,
    pub moonrise: Option<Epoch>,
    pub moonset: Option<Epoch>,
    pub sun_altaz: HorizontalCoordinates,
    pub moon_altaz: HorizontalCoordinates,
    /// Geocentric distance of the Moon.
    pub moon_distance: Kilometer,
    pub illumination: MoonIllumination,
    /// Next mean lunar perigee.
    pub perigee: Epoch,
    /// Next mean lunar apogee.
    pub apogee: Epoch,
    pub astrology: Astrology,
    pub solar_eclipse: Option<EclipseInfo<SolarEclipseKind>>,
    pub lunar_eclipse: Option<EclipseInfo<LunarEclipseKind>>,
    pub sun_up: bool,
    pub moon_up: bool,
}

/// Strategy computing the celestial data of a position.
///
/// Implementations must be pure: the same inputs always yield the same result.
pub trait CelestialEngine: fmt::Debug {
    /// Arguments
    /// -----------------
    /// * `latitude`, `longitude`: geodetic degrees, east-positive longitude.
    /// * `instant`: the calendar instant of the position.
    fn compute(&self, latitude: Degree, longitude: Degree, instant: &Epoch) -> CelestialResult;
}

/// Default engine built on low-precision analytical series.
#[derive(Debug, Clone, Copy, Default)]
pub struct LowPrecisionEngine;

/// Geometric horizontal coordinates of an equatorial direction.
fn horizontal(
    right_ascension: Radian,
    declination: Radian,
    latitude: Radian,
    longitude: Radian,
    jd: JD,
) -> HorizontalCoordinates {
    let hour_angle = local_sidereal_time(jd_to_mjd(jd), longitude) - right_ascension;
    let (sin_phi, cos_phi) = latitude.sin_cos();

    let altitude = (sin_phi * declination.sin()
        + cos_phi * declination.cos() * hour_angle.cos())
    .clamp(-1.0, 1.0)
    .asin();
    let azimuth = hour_angle
        .sin()
        .atan2(hour_angle.cos() * sin_phi - declination.tan() * cos_phi)
        + std::f64::consts::PI;

    HorizontalCoordinates {
        altitude: altitude.to_degrees(),
        azimuth: normalize_angle(azimuth).to_degrees(),
    }
}

fn sun_horizontal(latitude: Radian, longitude: Radian, jd: JD) -> HorizontalCoordinates {
    let sun = sun_position(jd);
    horizontal(sun.right_ascension, sun.declination, latitude, longitude, jd)
}

fn moon_horizontal(latitude: Radian, longitude: Radian, jd: JD) -> HorizontalCoordinates {
    let moon = moon_position(jd);
    horizontal(moon.right_ascension, moon.declination, latitude, longitude, jd)
}

impl CelestialEngine for LowPrecisionEngine {
    fn compute(&self, latitude: Degree, longitude: Degree, instant: &Epoch) -> CelestialResult {
        let jd = julian_day(instant);
        let (phi, lambda) = (latitude.to_radians(), longitude.to_radians());

        let sun = sun_position(jd);
        let moon = moon_position(jd);

        let sun_altaz = horizontal(sun.right_ascension, sun.declination, phi, lambda, jd);
        let moon_geocentric = horizontal(moon.right_ascension, moon.declination, phi, lambda, jd);

        // topocentric correction for the lunar horizontal parallax
        let parallax = (EARTH_RADIUS_KM / moon.distance
            * moon_geocentric.altitude.to_radians().cos())
        .asin();
        let moon_altaz = HorizontalCoordinates {
            altitude: moon_geocentric.altitude - parallax.to_degrees(),
            azimuth: moon_geocentric.azimuth,
        };

        let day_start = start_of_utc_day(jd);
        let (sunrise, sunset) = rise_and_set(day_start, SUN_STANDARD_ALTITUDE, |t| {
            sun_horizontal(phi, lambda, t).altitude
        });
        let (moonrise, moonset) = rise_and_set(day_start, MOON_STANDARD_ALTITUDE, |t| {
            moon_horizontal(phi, lambda, t).altitude
        });

        CelestialResult {
            sunrise: sunrise.map(epoch_from_jd),
            sunset: sunset.map(epoch_from_jd),
            moonrise: moonrise.map(epoch_from_jd),
            moonset: moonset.map(epoch_from_jd),
            sun_altaz,
            moon_altaz,
            moon_distance: moon.distance,
            illumination: illumination(&moon, &sun),
            perigee: epoch_from_jd(next_mean_apsis(jd, false)),
            apogee: epoch_from_jd(next_mean_apsis(jd, true)),
            astrology: Astrology {
                sun_sign: ZodiacSign::from_longitude(sun.longitude),
                moon_sign: ZodiacSign::from_longitude(moon.longitude),
            },
            solar_eclipse: next_solar_eclipse(jd).map(|e| EclipseInfo {
                instant: epoch_from_jd(e.jde),
                kind: e.kind,
            }),
            lunar_eclipse: next_lunar_eclipse(jd).map(|e| EclipseInfo {
                instant: epoch_from_jd(e.jde),
                kind: e.kind,
            }),
            sun_up: sun_altaz.altitude > SUN_STANDARD_ALTITUDE,
            moon_up: moon_geocentric.altitude > MOON_STANDARD_ALTITUDE,
        }
    }
}

/// Celestial representation held by a position: the engine result and the instant it is for.
#[derive(Debug, Clone, PartialEq)]
pub struct CelestialRepresentation {
    result: CelestialResult,
    instant: Epoch,
}

impl CelestialRepresentation {
    pub fn result(&self) -> &CelestialResult {
        &self.result
    }

    /// Instant the result was computed for.
    pub fn instant(&self) -> &Epoch {
        &self.instant
    }
}

impl std::ops::Deref for CelestialRepresentation {
    type Target = CelestialResult;

    fn deref(&self) -> &Self::Target {
        &self.result
    }
}

impl Representation for CelestialRepresentation {
    const KIND: RepresentationKind = RepresentationKind::Celestial;

    fn materialize(snapshot: &PositionSnapshot<'_>) -> Self {
        CelestialRepresentation {
            result: snapshot.engine.compute(
                snapshot.geodetic.latitude(),
                snapshot.geodetic.longitude(),
                snapshot.instant,
            ),
            instant: *snapshot.instant,
        }
    }

    fn recompute(&mut self, snapshot: &PositionSnapshot<'_>) {
        *self = CelestialRepresentation::materialize(snapshot);
    }
}

#[cfg(test)]
mod celestial_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_paris_summer_solstice() {
        // 2024-06-21 12:00 UTC, Paris
        let instant = epoch_from_jd(2_460_483.0);
        let result = LowPrecisionEngine.compute(48.8566, 2.3522, &instant);

        assert!(result.sun_up);
        assert_relative_eq!(result.sun_altaz.altitude, 64.54, epsilon = 0.05);
        assert_relative_eq!(result.sun_altaz.azimuth, 184.0, epsilon = 0.1);

        // 03:47 and 19:58 UTC
        assert_relative_eq!(julian_day(&result.sunrise.unwrap()), 2_460_482.6576, epsilon = 2e-3);
        assert_relative_eq!(julian_day(&result.sunset.unwrap()), 2_460_483.3319, epsilon = 2e-3);

        // the June solstice of 2024 fell on June 20, 20:51 UTC
        assert_eq!(result.astrology.sun_sign, ZodiacSign::Cancer);
        assert!(result.illumination.fraction > 0.9);
        assert!(result.moon_distance > 356_000.0 && result.moon_distance < 407_000.0);
    }

    #[test]
    fn test_polar_night_has_no_sunrise() {
        // Longyearbyen, 2024-12-21 12:00 UTC
        let instant = epoch_from_jd(2_460_666.0);
        let result = LowPrecisionEngine.compute(78.22, 15.65, &instant);
        assert!(!result.sun_up);
        assert_eq!(result.sunrise, None);
        assert_eq!(result.sunset, None);
    }

    #[test]
    fn test_upcoming_events_follow_the_instant() {
        let instant = epoch_from_jd(2_460_371.5);
        let result = LowPrecisionEngine.compute(0.0, 0.0, &instant);

        let solar = result.solar_eclipse.unwrap();
        assert_eq!(solar.kind, SolarEclipseKind::Total);
        assert!(julian_day(&solar.instant) > 2_460_409.0);
        assert_eq!(result.lunar_eclipse.unwrap().kind, LunarEclipseKind::Penumbral);

        assert!(julian_day(&result.perigee) >= 2_460_371.5);
        assert!(julian_day(&result.apogee) >= 2_460_371.5);
    }

    #[test]
    fn test_zodiac_boundaries() {
        assert_eq!(ZodiacSign::from_longitude(0.0), ZodiacSign::Aries);
        assert_eq!(ZodiacSign::from_longitude(95f64.to_radians()), ZodiacSign::Cancer);
        assert_eq!(ZodiacSign::from_longitude(-1f64.to_radians()), ZodiacSign::Pisces);
        assert_eq!(ZodiacSign::Capricorn.name(), "Capricorn");
    }
}
