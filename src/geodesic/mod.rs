//! # Geodesic problems on a sphere or an ellipsoid
//!
//! This module solves the two classical geodesic problems:
//!
//! - **Direct**: from a start point, an initial bearing and a distance, find the end point
//!   ([`solve_direct`]).
//! - **Inverse**: from two points, find the distance and the bearings at both ends
//!   ([`solve_inverse`]).
//!
//! ## Overview
//!
//! Two earth models are supported through [`EarthShape`]:
//!
//! - [`EarthShape::Sphere`]: a sphere of radius [`MEAN_EARTH_RADIUS`]; closed-form great-circle
//!   formulas (haversine distance, spherical trigonometry for the end point).
//! - [`EarthShape::Ellipsoid`]: Vincenty's iterations on the reduced latitude, parameterized by the
//!   supplied [`EllipsoidParameters`]. The direct iteration is capped at
//!   [`DIRECT_MAX_ITERATIONS`], the inverse at [`INVERSE_MAX_ITERATIONS`], both stopping once the
//!   update falls below [`ANGULAR_TOLERANCE`].
//!
//! Non-convergence is not an error. The best estimate is returned with `converged = false` and a
//! `log::warn!` is emitted.
//!
//! ## Longitude convention
//!
//! Every solver entry point takes and returns **west-positive** longitudes in radians (a point at
//! 25°E is passed as `-25°`). Callers working with east-positive longitudes negate on the way in
//! and on the way out; [`Position`](crate::position::Position) does so. Latitudes are north
//! positive, bearings are measured clockwise from north and reported in `[0, 2π)`.
//!
//! ## Special cases
//!
//! - Coincident points: distance `0`, both bearings `0`.
//! - Exact antipodes: the geodesic runs over a pole; distance is half a meridian
//!   (`π R` on the sphere, twice the meridian quadrant on the ellipsoid), bearings `0` and `π`.
//!
//! ## See also
//! * [`EllipsoidParameters::meridian_quadrant`] – Half of the antipodal distance.
//! * [`crate::position::Position::move_by`] – Public east-positive wrapper.

pub mod direct;
pub mod inverse;

use serde::{Deserialize, Serialize};

use crate::constants::{Degree, Meter, Radian, DPI};
use crate::ellipsoid::EllipsoidParameters;

pub use crate::constants::{
    ANGULAR_TOLERANCE, DIRECT_MAX_ITERATIONS, INVERSE_MAX_ITERATIONS, MEAN_EARTH_RADIUS,
};
pub use direct::solve_direct;
pub use inverse::solve_inverse;

/// Earth model requested by a caller of [`Position`](crate::position::Position).
///
/// [`Shape::Ellipsoid`] resolves to the position's own ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Shape {
    Sphere,
    #[default]
    Ellipsoid,
}

impl Shape {
    /// Bind the requested model to concrete ellipsoid parameters.
    pub fn with_ellipsoid(self, ellipsoid: EllipsoidParameters) -> EarthShape {
        match self {
            Shape::Sphere => EarthShape::Sphere,
            Shape::Ellipsoid => EarthShape::Ellipsoid(ellipsoid),
        }
    }
}

/// Earth model consumed by the solvers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EarthShape {
    Sphere,
    Ellipsoid(EllipsoidParameters),
}

impl EarthShape {
    /// Half the length of a meridian: the distance between two exact antipodes.
    pub(crate) fn half_meridian(&self) -> Meter {
        match self {
            EarthShape::Sphere => std::f64::consts::PI * MEAN_EARTH_RADIUS,
            EarthShape::Ellipsoid(params) => 2.0 * params.meridian_quadrant(),
        }
    }
}

/// End point of a direct problem.
///
/// * `latitude`: radians, north positive.
/// * `longitude`: radians, **west positive**, in `[-π, π)`.
/// * `final_bearing`: forward azimuth at the end point, radians in `[0, 2π)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectSolution {
    pub latitude: Radian,
    pub longitude: Radian,
    pub final_bearing: Radian,
    pub converged: bool,
    pub iterations: usize,
}

/// Distance and end bearings of an inverse problem. Bearings in radians, `[0, 2π)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InverseSolution {
    pub distance: Meter,
    pub initial_bearing: Radian,
    pub final_bearing: Radian,
    pub converged: bool,
    pub iterations: usize,
}

/// Inverse solution expressed in the public units of the crate (meters and degrees).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeodesicDistance {
    pub meters: Meter,
    pub initial_bearing: Degree,
    pub final_bearing: Degree,
    pub converged: bool,
}

impl From<InverseSolution> for GeodesicDistance {
    fn from(solution: InverseSolution) -> Self {
        GeodesicDistance {
            meters: solution.distance,
            initial_bearing: solution.initial_bearing.to_degrees(),
            final_bearing: solution.final_bearing.to_degrees(),
            converged: solution.converged,
        }
    }
}

/// Wrap a longitude in radians into `[-π, π)`.
pub(crate) fn wrap_longitude(longitude: Radian) -> Radian {
    use std::f64::consts::PI;
    (longitude + PI).rem_euclid(DPI) - PI
}

/// Exact antipodes: opposite latitudes and longitudes half a turn apart.
pub(crate) fn are_antipodal(lat1: Radian, lon1: Radian, lat2: Radian, lon2: Radian) -> bool {
    (lat1 + lat2).abs() < ANGULAR_TOLERANCE
        && (wrap_longitude(lon1 - lon2).abs() - std::f64::consts::PI).abs() < ANGULAR_TOLERANCE
}

#[cfg(test)]
mod geodesic_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_wrap_longitude() {
        use std::f64::consts::PI;
        assert_relative_eq!(wrap_longitude(1.5 * PI), -0.5 * PI, epsilon = 1e-15);
        assert_relative_eq!(wrap_longitude(-1.5 * PI), 0.5 * PI, epsilon = 1e-15);
        assert_relative_eq!(wrap_longitude(PI), -PI, epsilon = 1e-15);
    }

    #[test]
    fn test_antipode_detection() {
        let lat = 25.0_f64.to_radians();
        let lon = 25.0_f64.to_radians();
        assert!(are_antipodal(lat, lon, -lat, lon - std::f64::consts::PI));
        assert!(are_antipodal(0.0, 0.0, 0.0, std::f64::consts::PI));
        assert!(!are_antipodal(lat, lon, -lat, lon - 3.0));
    }

    #[test]
    fn test_shape_binding() {
        let wgs84 = EllipsoidParameters::WGS84;
        assert_eq!(Shape::Sphere.with_ellipsoid(wgs84), EarthShape::Sphere);
        assert_eq!(
            Shape::default().with_ellipsoid(wgs84),
            EarthShape::Ellipsoid(wgs84)
        );
        assert_relative_eq!(
            EarthShape::Ellipsoid(wgs84).half_meridian(),
            20_003_931.458_6,
            epsilon = 1e-3
        );
    }
}
