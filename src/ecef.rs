//! # Earth-centered, earth-fixed Cartesian coordinates
//!
//! Conversion between geodetic coordinates (latitude, longitude, height above the ellipsoid) and
//! the earth-centered earth-fixed (ECEF) frame, for an arbitrary reference ellipsoid.
//!
//! ## Overview
//!
//! - [`geodetic_to_ecef`]: closed form through the parametric latitude.
//! - [`ecef_to_geodetic`]: fixed-point iteration on the geodetic latitude, converging in a few
//!   steps everywhere except on the polar axis, which is handled separately.
//! - [`EarthCenteredCartesian`]: the derived representation held by a
//!   [`Position`](crate::position::Position). It preserves its geodetic height across every
//!   resynchronization; only an explicit height update changes it.
//!
//! ## Units
//!
//! - Input/output latitude and longitude in **radians** (east-positive longitude).
//! - Height and ECEF components in **meters**.
//!
//! ## Frame
//!
//! - `x` axis: equator ∩ prime meridian.
//! - `y` axis: equator ∩ 90°E.
//! - `z` axis: north pole.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::constants::{Meter, Radian, ANGULAR_TOLERANCE};
use crate::ellipsoid::EllipsoidParameters;
use crate::load_policy::RepresentationKind;
use crate::position::derived::{PositionSnapshot, Representation};

/// Maximum number of latitude refinements in [`ecef_to_geodetic`].
const MAX_LATITUDE_ITERATIONS: usize = 10;

/// Convert geodetic coordinates to an ECEF position vector.
///
/// Arguments
/// -----------------
/// * `latitude`: geodetic latitude in **radians**.
/// * `longitude`: east-positive longitude in **radians**.
/// * `height`: height above the ellipsoid in **meters**.
/// * `ellipsoid`: reference ellipsoid.
///
/// Return
/// ----------
/// * The ECEF vector in **meters**.
///
/// Details
/// ----------
/// With the parametric latitude `u = atan2((b/a) sin φ, cos φ)`:
///
/// ```text
/// x = (a cos u + h cos φ) cos λ
/// y = (a cos u + h cos φ) sin λ
/// z =  b sin u + h sin φ
/// ```
pub fn geodetic_to_ecef(
    latitude: Radian,
    longitude: Radian,
    height: Meter,
    ellipsoid: &EllipsoidParameters,
) -> Vector3<f64> {
    let a = ellipsoid.equatorial_radius();
    let b = ellipsoid.polar_radius();

    let (sin_phi, cos_phi) = latitude.sin_cos();
    let u = (sin_phi * b / a).atan2(cos_phi);

    let equatorial = a * u.cos() + height * cos_phi;
    let axial = b * u.sin() + height * sin_phi;

    Vector3::new(
        equatorial * longitude.cos(),
        equatorial * longitude.sin(),
        axial,
    )
}

/// Convert an ECEF position vector to geodetic coordinates.
///
/// Arguments
/// -----------------
/// * `position`: ECEF vector in **meters**.
/// * `ellipsoid`: reference ellipsoid.
///
/// Return
/// ----------
/// * `(latitude, longitude, height)` in radians, radians (east positive) and meters.
pub fn ecef_to_geodetic(
    position: &Vector3<f64>,
    ellipsoid: &EllipsoidParameters,
) -> (Radian, Radian, Meter) {
    let (x, y, z) = (position.x, position.y, position.z);
    let longitude = y.atan2(x);
    let p = x.hypot(y);

    // on the polar axis the iteration divides by p
    if p < 1e-9 {
        let latitude = std::f64::consts::FRAC_PI_2.copysign(z);
        return (latitude, longitude, z.abs() - ellipsoid.polar_radius());
    }

    let e2 = ellipsoid.eccentricity_squared();
    let mut latitude = (z / (p * (1.0 - e2))).atan();
    let mut height = 0.0;

    for _ in 0..MAX_LATITUDE_ITERATIONS {
        let n = ellipsoid.prime_vertical_radius(latitude);
        height = p / latitude.cos() - n;
        let next = (z / p / (1.0 - e2 * n / (n + height))).atan();
        let step = (next - latitude).abs();
        latitude = next;
        if step < ANGULAR_TOLERANCE {
            break;
        }
    }
    let n = ellipsoid.prime_vertical_radius(latitude);
    height = if latitude.cos().abs() > 1e-6 {
        p / latitude.cos() - n
    } else {
        height
    };

    (latitude, longitude, height)
}

/// ECEF representation of a position, with the geodetic height it was computed at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarthCenteredCartesian {
    position: Vector3<f64>,
    height: Meter,
    datum: EllipsoidParameters,
}

impl EarthCenteredCartesian {
    /// Compute the ECEF vector of a geodetic point at the given height.
    pub fn new(
        latitude: Radian,
        longitude: Radian,
        height: Meter,
        ellipsoid: &EllipsoidParameters,
    ) -> Self {
        EarthCenteredCartesian {
            position: geodetic_to_ecef(latitude, longitude, height, ellipsoid),
            height,
            datum: *ellipsoid,
        }
    }

    pub fn x(&self) -> Meter {
        self.position.x
    }

    pub fn y(&self) -> Meter {
        self.position.y
    }

    pub fn z(&self) -> Meter {
        self.position.z
    }

    /// The ECEF vector, meters.
    pub fn vector(&self) -> &Vector3<f64> {
        &self.position
    }

    /// Height above the ellipsoid, meters.
    pub fn height(&self) -> Meter {
        self.height
    }

    /// Ellipsoid the vector was computed with.
    pub fn datum(&self) -> &EllipsoidParameters {
        &self.datum
    }

    /// Geocentric distance, meters.
    pub fn radius(&self) -> Meter {
        self.position.norm()
    }

    pub(crate) fn set_height(&mut self, height: Meter) {
        self.height = height;
    }
}

impl Representation for EarthCenteredCartesian {
    const KIND: RepresentationKind = RepresentationKind::Cartesian;

    fn materialize(snapshot: &PositionSnapshot<'_>) -> Self {
        let (latitude, longitude) = snapshot.geodetic.to_radians();
        EarthCenteredCartesian::new(latitude, longitude, 0.0, snapshot.ellipsoid)
    }

    fn recompute(&mut self, snapshot: &PositionSnapshot<'_>) {
        let (latitude, longitude) = snapshot.geodetic.to_radians();
        *self = EarthCenteredCartesian::new(latitude, longitude, self.height, snapshot.ellipsoid);
    }
}

#[cfg(test)]
mod ecef_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_geodetic_to_ecef() {
        let wgs84 = EllipsoidParameters::WGS84;
        let lat = 25.0_f64.to_radians();
        let lon = 25.0_f64.to_radians();

        let v = geodetic_to_ecef(lat, lon, 0.0, &wgs84);
        assert_relative_eq!(v.x, 5_242_097.032_506, epsilon = 1e-5);
        assert_relative_eq!(v.y, 2_444_429.991_049, epsilon = 1e-5);
        assert_relative_eq!(v.z, 2_679_074.462_958, epsilon = 1e-5);

        let v = geodetic_to_ecef(lat, lon, 1000.0, &wgs84);
        assert_relative_eq!(v.x, 5_242_918.426_311, epsilon = 1e-5);
        assert_relative_eq!(v.z, 2_679_497.081_220, epsilon = 1e-5);
    }

    #[test]
    fn test_round_trip() {
        let wgs84 = EllipsoidParameters::WGS84;
        for (lat, lon, h) in [
            (48.8583, 2.2945, 330.0),
            (-33.8568, 151.2153, 0.0),
            (89.9, -120.0, 25.0),
            (0.0, 180.0, -50.0),
        ] {
            let v = geodetic_to_ecef(f64::to_radians(lat), f64::to_radians(lon), h, &wgs84);
            let (lat2, lon2, h2) = ecef_to_geodetic(&v, &wgs84);
            assert_relative_eq!(lat2.to_degrees(), lat, epsilon = 1e-9);
            assert_relative_eq!(lon2.to_degrees().abs(), lon.abs(), epsilon = 1e-9);
            assert_relative_eq!(h2, h, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_polar_axis() {
        let wgs84 = EllipsoidParameters::WGS84;
        let v = Vector3::new(0.0, 0.0, -(wgs84.polar_radius() + 10.0));
        let (lat, _, h) = ecef_to_geodetic(&v, &wgs84);
        assert_relative_eq!(lat, -std::f64::consts::FRAC_PI_2);
        assert_relative_eq!(h, 10.0, epsilon = 1e-6);
    }

    #[test]
    fn test_datum_is_recorded() {
        let intl = crate::ellipsoid::Datum::International1924.parameters();
        let ecef = EarthCenteredCartesian::new(
            25.0_f64.to_radians(),
            25.0_f64.to_radians(),
            0.0,
            &intl,
        );
        assert_eq!(ecef.datum(), &intl);
        assert_relative_eq!(ecef.x(), 5_242_316.585_710, epsilon = 1e-5);
    }
}
