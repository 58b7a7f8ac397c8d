use log::{trace, warn};

use super::direct::delta_sigma;
use super::{are_antipodal, EarthShape, InverseSolution};
use crate::constants::{Radian, ANGULAR_TOLERANCE, INVERSE_MAX_ITERATIONS, MEAN_EARTH_RADIUS};
use crate::conversion::normalize_angle;
use crate::ellipsoid::EllipsoidParameters;

/// Solve the inverse geodesic problem.
///
/// Arguments
/// -----------------
/// * `lat1`, `lon1`: first point in **radians**, longitude **west positive**.
/// * `lat2`, `lon2`: second point in **radians**, longitude **west positive**.
/// * `shape`: earth model.
///
/// Return
/// ----------
/// * An [`InverseSolution`]: distance in meters, initial bearing at the first point and forward
///   bearing at the second point, both in `[0, 2π)`.
///
/// Coincident points yield a zero distance with zero bearings. Exact antipodes yield half a
/// meridian with bearings `0` and `π`.
///
/// When the ellipsoidal iteration does not converge (nearly antipodal points, mostly on the
/// equator), the solution is built from the last λ iterate and `converged` is `false`. That
/// distance is not reliable: it need not even grow with the longitude gap.
pub fn solve_inverse(
    lat1: Radian,
    lon1: Radian,
    lat2: Radian,
    lon2: Radian,
    shape: &EarthShape,
) -> InverseSolution {
    if lat1 == lat2 && super::wrap_longitude(lon1 - lon2) == 0.0 {
        return InverseSolution {
            distance: 0.0,
            initial_bearing: 0.0,
            final_bearing: 0.0,
            converged: true,
            iterations: 0,
        };
    }
    if are_antipodal(lat1, lon1, lat2, lon2) {
        return InverseSolution {
            distance: shape.half_meridian(),
            initial_bearing: 0.0,
            final_bearing: std::f64::consts::PI,
            converged: true,
            iterations: 0,
        };
    }

    match shape {
        EarthShape::Sphere => sphere_inverse(lat1, lon1, lat2, lon2),
        EarthShape::Ellipsoid(params) => vincenty_inverse(lat1, lon1, lat2, lon2, params),
    }
}

/// Initial great-circle bearing from point 1 to point 2, west-positive longitudes.
pub(crate) fn sphere_bearing(lat1: Radian, lon1: Radian, lat2: Radian, lon2: Radian) -> Radian {
    let dlon = lon1 - lon2;
    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();
    normalize_angle(y.atan2(x))
}

fn sphere_inverse(lat1: Radian, lon1: Radian, lat2: Radian, lon2: Radian) -> InverseSolution {
    let h = ((lat1 - lat2) / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * ((lon1 - lon2) / 2.0).sin().powi(2);
    let central_angle = 2.0 * h.sqrt().clamp(0.0, 1.0).asin();

    let back = sphere_bearing(lat2, lon2, lat1, lon1);
    InverseSolution {
        distance: MEAN_EARTH_RADIUS * central_angle,
        initial_bearing: sphere_bearing(lat1, lon1, lat2, lon2),
        final_bearing: normalize_angle(back + std::f64::consts::PI),
        converged: true,
        iterations: 0,
    }
}

fn vincenty_inverse(
    lat1: Radian,
    lon1: Radian,
    lat2: Radian,
    lon2: Radian,
    params: &EllipsoidParameters,
) -> InverseSolution {
    let a = params.equatorial_radius();
    let b = params.polar_radius();
    let f = params.flattening();

    // eastward longitude difference
    let l = super::wrap_longitude(lon1 - lon2);
    let u1 = ((1.0 - f) * lat1.tan()).atan();
    let u2 = ((1.0 - f) * lat2.tan()).atan();
    let (sin_u1, cos_u1) = u1.sin_cos();
    let (sin_u2, cos_u2) = u2.sin_cos();

    let mut lambda = l;
    let mut iterations = 0;
    let mut converged = false;

    let mut sin_lambda;
    let mut cos_lambda;
    let mut sin_sigma;
    let mut cos_sigma;
    let mut sigma;
    let mut cos_sq_alpha;
    let mut cos_2sigma_m;

    loop {
        iterations += 1;
        (sin_lambda, cos_lambda) = lambda.sin_cos();
        let t1 = cos_u2 * sin_lambda;
        let t2 = cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda;
        sin_sigma = (t1 * t1 + t2 * t2).sqrt();
        cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;
        sigma = sin_sigma.atan2(cos_sigma);

        let sin_alpha = if sin_sigma == 0.0 {
            0.0
        } else {
            cos_u1 * cos_u2 * sin_lambda / sin_sigma
        };
        cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;
        // equatorial line: cos²α = 0
        cos_2sigma_m = if cos_sq_alpha == 0.0 {
            0.0
        } else {
            cos_sigma - 2.0 * sin_u1 * sin_u2 / cos_sq_alpha
        };

        let c = f / 16.0 * cos_sq_alpha * (4.0 + f * (4.0 - 3.0 * cos_sq_alpha));
        let next = l
            + (1.0 - c)
                * f
                * sin_alpha
                * (sigma
                    + c * sin_sigma
                        * (cos_2sigma_m
                            + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)));
        let step = (next - lambda).abs();
        lambda = next;

        if step < ANGULAR_TOLERANCE {
            converged = true;
            break;
        }
        if iterations >= INVERSE_MAX_ITERATIONS {
            break;
        }
    }

    if converged {
        trace!("Vincenty inverse converged after {iterations} iterations");
    } else {
        warn!(
            "Vincenty inverse did not converge after {iterations} iterations \
             (nearly antipodal points?), returning the last estimate"
        );
        // keep the estimate consistent with the last λ used for σ
        (sin_lambda, cos_lambda) = lambda.sin_cos();
    }

    let u_sq = cos_sq_alpha * (a * a - b * b) / (b * b);
    let big_a = 1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
    let big_b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));
    let distance = b * big_a * (sigma - delta_sigma(big_b, sin_sigma, cos_sigma, cos_2sigma_m));

    let initial_bearing =
        (cos_u2 * sin_lambda).atan2(cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda);
    let final_bearing =
        (cos_u1 * sin_lambda).atan2(-sin_u1 * cos_u2 + cos_u1 * sin_u2 * cos_lambda);

    InverseSolution {
        distance,
        initial_bearing: normalize_angle(initial_bearing),
        final_bearing: normalize_angle(final_bearing),
        converged,
        iterations,
    }
}

#[cfg(test)]
mod inverse_test {
    use super::*;
    use approx::assert_relative_eq;

    fn rad(lat: f64, lon_east: f64) -> (Radian, Radian) {
        (lat.to_radians(), -lon_east.to_radians())
    }

    #[test]
    fn test_sphere_inverse() {
        let (lat1, lon1) = rad(25.0, 25.0);
        let (lat2, lon2) = rad(28.0, 30.0);
        let sol = solve_inverse(lat1, lon1, lat2, lon2, &EarthShape::Sphere);
        assert_relative_eq!(sol.distance, 598_928.62, epsilon = 0.05);
        assert_relative_eq!(sol.initial_bearing.to_degrees(), 55.0639, epsilon = 1e-3);
    }

    #[test]
    fn test_vincenty_inverse() {
        let (lat1, lon1) = rad(25.0, 25.0);
        let (lat2, lon2) = rad(28.0, 30.0);
        let shape = EarthShape::Ellipsoid(EllipsoidParameters::WGS84);
        let sol = solve_inverse(lat1, lon1, lat2, lon2, &shape);
        assert!(sol.converged);
        assert_relative_eq!(sol.distance, 599_002.44, epsilon = 0.05);
        assert_relative_eq!(sol.initial_bearing.to_degrees(), 55.2064, epsilon = 1e-3);
        assert_relative_eq!(sol.final_bearing.to_degrees(), 57.4393, epsilon = 1e-3);

        let back = solve_inverse(lat2, lon2, lat1, lon1, &shape);
        assert_relative_eq!(back.distance, sol.distance, epsilon = 1e-6);
        assert_relative_eq!(back.initial_bearing.to_degrees(), 237.4393, epsilon = 1e-3);
    }

    #[test]
    fn test_coincident_points() {
        let (lat, lon) = rad(-12.5, 140.0);
        for shape in [EarthShape::Sphere, EarthShape::Ellipsoid(EllipsoidParameters::WGS84)] {
            let sol = solve_inverse(lat, lon, lat, lon, &shape);
            assert_eq!(sol.distance, 0.0);
            assert_eq!(sol.initial_bearing, 0.0);
            assert!(sol.converged);
        }
    }

    #[test]
    fn test_exact_antipodes() {
        let (lat1, lon1) = rad(25.0, 25.0);
        let (lat2, lon2) = rad(-25.0, -155.0);
        let wgs84 = EllipsoidParameters::WGS84;
        let sol = solve_inverse(lat1, lon1, lat2, lon2, &EarthShape::Ellipsoid(wgs84));
        assert_relative_eq!(sol.distance, 2.0 * wgs84.meridian_quadrant());
        assert_eq!(sol.initial_bearing, 0.0);
        assert_eq!(sol.final_bearing, std::f64::consts::PI);

        let sphere = solve_inverse(lat1, lon1, lat2, lon2, &EarthShape::Sphere);
        assert_relative_eq!(sphere.distance, std::f64::consts::PI * MEAN_EARTH_RADIUS);
    }

    #[test]
    fn test_nearly_antipodal_does_not_panic() {
        let (lat1, lon1) = rad(0.0, 0.0);
        let (lat2, lon2) = rad(0.5, 179.7);
        let sol = solve_inverse(
            lat1,
            lon1,
            lat2,
            lon2,
            &EarthShape::Ellipsoid(EllipsoidParameters::WGS84),
        );
        assert!(sol.iterations <= INVERSE_MAX_ITERATIONS);
        assert!(sol.distance.is_finite());
        assert!(sol.distance > 19_900_000.0 && sol.distance < 20_010_000.0);
    }

    #[test]
    fn test_equatorial_near_antipode_reports_no_convergence() {
        let (lat1, lon1) = rad(0.0, 0.0);
        let (lat2, lon2) = rad(0.0, 179.9);
        let sol = solve_inverse(
            lat1,
            lon1,
            lat2,
            lon2,
            &EarthShape::Ellipsoid(EllipsoidParameters::WGS84),
        );
        assert!(!sol.converged);
        assert_eq!(sol.iterations, INVERSE_MAX_ITERATIONS);
        assert!(sol.distance.is_finite());

        // the sphere has no iteration to fail
        let sphere = solve_inverse(lat1, lon1, lat2, lon2, &EarthShape::Sphere);
        assert!(sphere.converged);
    }
}
