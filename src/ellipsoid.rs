//! # Reference ellipsoids
//!
//! [`EllipsoidParameters`] is the `(equatorial radius, inverse flattening)` pair shared by every
//! ellipsoid-dependent conversion of a [`Position`](crate::position::Position): the UTM/MGRS grid,
//! the earth-centered Cartesian frame and the ellipsoidal geodesic solver.
//!
//! The value is small and `Copy`. A position owns exactly one; converters read it through a
//! shared reference for the duration of one recompute and keep a copy of the parameters they were
//! computed with, so a stale representation can be detected by comparing datums.
//!
//! Named presets are available through [`Datum`].

use serde::{Deserialize, Serialize};

use crate::constants::{Meter, WGS84_EQUATORIAL_RADIUS, WGS84_INVERSE_FLATTENING};
use crate::geocoord_errors::GeoCoordError;

/// Equatorial radius and inverse flattening of a reference ellipsoid.
///
/// Units
/// -----
/// * `equatorial_radius`: meters.
/// * `inverse_flattening`: dimensionless (`1/f`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EllipsoidParameters {
    equatorial_radius: Meter,
    inverse_flattening: f64,
}

impl Default for EllipsoidParameters {
    fn default() -> Self {
        EllipsoidParameters::WGS84
    }
}

impl EllipsoidParameters {
    /// World Geodetic System 1984.
    pub const WGS84: EllipsoidParameters = EllipsoidParameters {
        equatorial_radius: WGS84_EQUATORIAL_RADIUS,
        inverse_flattening: WGS84_INVERSE_FLATTENING,
    };

    /// Build user-defined ellipsoid parameters.
    ///
    /// Arguments
    /// -----------------
    /// * `equatorial_radius`: semi-major axis in **meters**.
    /// * `inverse_flattening`: `1/f`.
    ///
    /// Errors
    /// ----------
    /// * [`GeoCoordError::InvalidEllipsoid`] if either value is not finite or not strictly positive.
    pub fn new(equatorial_radius: Meter, inverse_flattening: f64) -> Result<Self, GeoCoordError> {
        if !(equatorial_radius.is_finite() && equatorial_radius > 0.0) {
            return Err(GeoCoordError::InvalidEllipsoid(format!(
                "equatorial radius must be finite and > 0, got {equatorial_radius}"
            )));
        }
        if !(inverse_flattening.is_finite() && inverse_flattening > 0.0) {
            return Err(GeoCoordError::InvalidEllipsoid(format!(
                "inverse flattening must be finite and > 0, got {inverse_flattening}"
            )));
        }
        Ok(EllipsoidParameters {
            equatorial_radius,
            inverse_flattening,
        })
    }

    /// The semimajor axis, *a*
    pub fn equatorial_radius(&self) -> Meter {
        self.equatorial_radius
    }

    /// The inverse flattening, *1/f*
    pub fn inverse_flattening(&self) -> f64 {
        self.inverse_flattening
    }

    /// The flattening, *f = (a - b)/a*
    pub fn flattening(&self) -> f64 {
        1.0 / self.inverse_flattening
    }

    /// The semiminor axis, *b*
    pub fn polar_radius(&self) -> Meter {
        self.equatorial_radius * (1.0 - self.flattening())
    }

    /// The third flattening, *n = (a - b) / (a + b) = f / (2 - f)*
    pub fn third_flattening(&self) -> f64 {
        let f = self.flattening();
        f / (2.0 - f)
    }

    /// The squared eccentricity *e² = (a² - b²) / a²*.
    pub fn eccentricity_squared(&self) -> f64 {
        let f = self.flattening();
        f * (2.0 - f)
    }

    /// The squared second eccentricity *e'² = e² / (1 - e²)*
    pub fn second_eccentricity_squared(&self) -> f64 {
        let es = self.eccentricity_squared();
        es / (1.0 - es)
    }

    /// The radius of curvature in the prime vertical, *N*, at a geodetic latitude in radians.
    pub fn prime_vertical_radius(&self, latitude: f64) -> Meter {
        self.equatorial_radius / (1.0 - self.eccentricity_squared() * latitude.sin().powi(2)).sqrt()
    }

    /// Length of a meridian quadrant (equator to pole), Helmert's series in *n*.
    pub fn meridian_quadrant(&self) -> Meter {
        let n = self.third_flattening();
        let n2 = n * n;
        self.equatorial_radius / (1.0 + n)
            * (1.0 + n2 / 4.0 + n2 * n2 / 64.0)
            * std::f64::consts::FRAC_PI_2
    }
}

impl From<Datum> for EllipsoidParameters {
    fn from(datum: Datum) -> Self {
        datum.parameters()
    }
}

/// Named reference ellipsoids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Datum {
    Wgs84,
    Grs80,
    Wgs72,
    Clarke1866,
    Clarke1880,
    International1924,
    Bessel1841,
    Airy1830,
    Krassovsky1940,
    AustralianNational,
}

impl Datum {
    /// Every named datum, in declaration order.
    pub const ALL: [Datum; 10] = [
        Datum::Wgs84,
        Datum::Grs80,
        Datum::Wgs72,
        Datum::Clarke1866,
        Datum::Clarke1880,
        Datum::International1924,
        Datum::Bessel1841,
        Datum::Airy1830,
        Datum::Krassovsky1940,
        Datum::AustralianNational,
    ];

    /// `(equatorial radius in meters, inverse flattening)` of the datum.
    pub const fn radius_and_inverse_flattening(self) -> (Meter, f64) {
        match self {
            Datum::Wgs84 => (WGS84_EQUATORIAL_RADIUS, WGS84_INVERSE_FLATTENING),
            Datum::Grs80 => (6_378_137.0, 298.257_222_101),
            Datum::Wgs72 => (6_378_135.0, 298.26),
            Datum::Clarke1866 => (6_378_206.4, 294.978_698_2),
            Datum::Clarke1880 => (6_378_249.145, 293.465),
            Datum::International1924 => (6_378_388.0, 297.0),
            Datum::Bessel1841 => (6_377_397.155, 299.152_812_8),
            Datum::Airy1830 => (6_377_563.396, 299.324_964_6),
            Datum::Krassovsky1940 => (6_378_245.0, 298.3),
            Datum::AustralianNational => (6_378_160.0, 298.25),
        }
    }

    pub const fn parameters(self) -> EllipsoidParameters {
        let (equatorial_radius, inverse_flattening) = self.radius_and_inverse_flattening();
        EllipsoidParameters {
            equatorial_radius,
            inverse_flattening,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Datum::Wgs84 => "WGS84",
            Datum::Grs80 => "GRS80",
            Datum::Wgs72 => "WGS72",
            Datum::Clarke1866 => "Clarke 1866",
            Datum::Clarke1880 => "Clarke 1880",
            Datum::International1924 => "International 1924",
            Datum::Bessel1841 => "Bessel 1841",
            Datum::Airy1830 => "Airy 1830",
            Datum::Krassovsky1940 => "Krassovsky 1940",
            Datum::AustralianNational => "Australian National",
        }
    }
}

#[cfg(test)]
mod ellipsoid_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_wgs84_derived_quantities() {
        let wgs84 = EllipsoidParameters::default();
        assert_eq!(wgs84, EllipsoidParameters::WGS84);
        assert_relative_eq!(wgs84.polar_radius(), 6_356_752.314_245, epsilon = 1e-6);
        assert_relative_eq!(
            wgs84.eccentricity_squared(),
            0.006_694_379_990_14,
            epsilon = 1e-14
        );
        // Meridian quadrant of WGS84 is 10 001 965.729 m
        assert_relative_eq!(wgs84.meridian_quadrant(), 10_001_965.729, epsilon = 1e-3);
    }

    #[test]
    fn test_invalid_parameters_are_rejected() {
        assert!(matches!(
            EllipsoidParameters::new(0.0, 298.0),
            Err(GeoCoordError::InvalidEllipsoid(_))
        ));
        assert!(matches!(
            EllipsoidParameters::new(6_378_137.0, -1.0),
            Err(GeoCoordError::InvalidEllipsoid(_))
        ));
        assert!(matches!(
            EllipsoidParameters::new(f64::NAN, 298.0),
            Err(GeoCoordError::InvalidEllipsoid(_))
        ));
    }

    #[test]
    fn test_named_datums_are_valid() {
        for datum in Datum::ALL {
            let (a, inv_f) = datum.radius_and_inverse_flattening();
            let params = EllipsoidParameters::new(a, inv_f).unwrap();
            assert_eq!(params, EllipsoidParameters::from(datum), "{}", datum.name());
        }
    }
}
