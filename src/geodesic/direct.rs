use log::{trace, warn};

use super::{wrap_longitude, DirectSolution, EarthShape};
use crate::constants::{
    Meter, Radian, ANGULAR_TOLERANCE, DIRECT_MAX_ITERATIONS, MEAN_EARTH_RADIUS,
};
use crate::conversion::normalize_angle;
use crate::ellipsoid::EllipsoidParameters;

/// Solve the direct geodesic problem.
///
/// Arguments
/// -----------------
/// * `latitude`: start latitude in **radians**, north positive.
/// * `longitude`: start longitude in **radians**, **west positive**.
/// * `bearing`: initial bearing in **radians**, clockwise from north.
/// * `distance`: path length in **meters** (may be negative to travel backwards).
/// * `shape`: earth model.
///
/// Return
/// ----------
/// * A [`DirectSolution`] with the end point (west-positive longitude in `[-π, π)`), the forward
///   azimuth at the end point and the convergence diagnostic of the ellipsoidal iteration.
///   Spherical solutions are closed-form and always converged.
///
/// See also
/// ------------
/// * [`super::solve_inverse`] – The reverse problem.
pub fn solve_direct(
    latitude: Radian,
    longitude: Radian,
    bearing: Radian,
    distance: Meter,
    shape: &EarthShape,
) -> DirectSolution {
    match shape {
        EarthShape::Sphere => sphere_direct(latitude, longitude, bearing, distance),
        EarthShape::Ellipsoid(params) => {
            vincenty_direct(latitude, longitude, bearing, distance, params)
        }
    }
}

fn sphere_direct(lat1: Radian, lon1: Radian, bearing: Radian, distance: Meter) -> DirectSolution {
    let d = distance / MEAN_EARTH_RADIUS;
    let (sin_lat1, cos_lat1) = lat1.sin_cos();
    let (sin_d, cos_d) = d.sin_cos();

    let lat2 = (sin_lat1 * cos_d + cos_lat1 * sin_d * bearing.cos())
        .clamp(-1.0, 1.0)
        .asin();
    let dlon = (bearing.sin() * sin_d * cos_lat1).atan2(cos_d - sin_lat1 * lat2.sin());
    let lon2 = wrap_longitude(lon1 - dlon);

    // forward azimuth at the end point is the reverse of the back azimuth towards the start
    let back = super::inverse::sphere_bearing(lat2, lon2, lat1, lon1);

    DirectSolution {
        latitude: lat2,
        longitude: lon2,
        final_bearing: normalize_angle(back + std::f64::consts::PI),
        converged: true,
        iterations: 0,
    }
}

fn vincenty_direct(
    lat1: Radian,
    lon1: Radian,
    bearing: Radian,
    distance: Meter,
    params: &EllipsoidParameters,
) -> DirectSolution {
    let a = params.equatorial_radius();
    let b = params.polar_radius();
    let f = params.flattening();

    let (sin_alpha1, cos_alpha1) = bearing.sin_cos();
    let tan_u1 = (1.0 - f) * lat1.tan();
    let cos_u1 = 1.0 / (1.0 + tan_u1 * tan_u1).sqrt();
    let sin_u1 = tan_u1 * cos_u1;

    let sigma1 = tan_u1.atan2(cos_alpha1);
    let sin_alpha = cos_u1 * sin_alpha1;
    let cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;
    let u_sq = cos_sq_alpha * (a * a - b * b) / (b * b);
    let big_a = 1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
    let big_b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));

    let sigma0 = distance / (b * big_a);
    let mut sigma = sigma0;
    let mut converged = false;
    let mut iterations = 0;

    while iterations < DIRECT_MAX_ITERATIONS {
        iterations += 1;
        let cos_2sigma_m = (2.0 * sigma1 + sigma).cos();
        let (sin_sigma, cos_sigma) = sigma.sin_cos();
        let delta_sigma = delta_sigma(big_b, sin_sigma, cos_sigma, cos_2sigma_m);
        let next = sigma0 + delta_sigma;
        let step = (next - sigma).abs();
        sigma = next;
        if step < ANGULAR_TOLERANCE {
            converged = true;
            break;
        }
    }

    if converged {
        trace!("Vincenty direct converged after {iterations} iterations");
    } else {
        warn!(
            "Vincenty direct did not converge after {iterations} iterations \
             (distance = {distance} m, bearing = {bearing} rad)"
        );
    }

    let cos_2sigma_m = (2.0 * sigma1 + sigma).cos();
    let (sin_sigma, cos_sigma) = sigma.sin_cos();
    let tmp = sin_u1 * sin_sigma - cos_u1 * cos_sigma * cos_alpha1;

    let lat2 = (sin_u1 * cos_sigma + cos_u1 * sin_sigma * cos_alpha1)
        .atan2((1.0 - f) * (sin_alpha * sin_alpha + tmp * tmp).sqrt());
    let lambda = (sin_sigma * sin_alpha1).atan2(cos_u1 * cos_sigma - sin_u1 * sin_sigma * cos_alpha1);
    let c = f / 16.0 * cos_sq_alpha * (4.0 + f * (4.0 - 3.0 * cos_sq_alpha));
    let l = lambda
        - (1.0 - c)
            * f
            * sin_alpha
            * (sigma
                + c * sin_sigma
                    * (cos_2sigma_m + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)));

    // L is the eastward longitude difference; west-positive longitudes decrease by it
    let lon2 = wrap_longitude(lon1 - l);
    let final_bearing = normalize_angle(sin_alpha.atan2(-tmp));

    DirectSolution {
        latitude: lat2,
        longitude: lon2,
        final_bearing,
        converged,
        iterations,
    }
}

/// Vincenty's Δσ correction, shared by the direct and inverse iterations.
pub(crate) fn delta_sigma(big_b: f64, sin_sigma: f64, cos_sigma: f64, cos_2sigma_m: f64) -> f64 {
    let c2 = cos_2sigma_m * cos_2sigma_m;
    big_b
        * sin_sigma
        * (cos_2sigma_m
            + big_b / 4.0
                * (cos_sigma * (-1.0 + 2.0 * c2)
                    - big_b / 6.0
                        * cos_2sigma_m
                        * (-3.0 + 4.0 * sin_sigma * sin_sigma)
                        * (-3.0 + 4.0 * c2)))
}
