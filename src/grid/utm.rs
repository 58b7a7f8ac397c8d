//! # Universal Transverse Mercator
//!
//! Forward and inverse transverse Mercator projection using Krüger's series to fourth order in
//! the third flattening *n*, evaluated on an arbitrary [`EllipsoidParameters`]. Sub-millimetre
//! accuracy inside a zone.
//!
//! ## Zones and bands
//!
//! - Zones are 6° wide, numbered 1 to 60 eastward from 180°W.
//! - Latitude bands are 8° tall, lettered `C` to `X` (without `I` and `O`) from 80°S; band `X`
//!   covers 72°N to 84°N.
//! - The Norway (zone 32V widened to 9°) and Svalbard (zones 31X, 33X, 35X, 37X) exceptions apply.
//!
//! Outside the UTM latitude limits the projection is still evaluated in the longitude zone so the
//! value stays finite, but the band is `None` and [`UtmCoordinate::within_limits`] is `false`.

use serde::{Deserialize, Serialize};

use crate::constants::{Degree, Meter};
use crate::ellipsoid::EllipsoidParameters;
use crate::geocoord_errors::GeoCoordError;
use crate::geodetic::{GeodeticPosition, Hemisphere};

/// Central scale factor.
pub const SCALE_FACTOR: f64 = 0.9996;
/// Easting of the central meridian.
pub const FALSE_EASTING: Meter = 500_000.0;
/// Northing of the equator in the southern hemisphere.
pub const FALSE_NORTHING_SOUTH: Meter = 10_000_000.0;
/// Southern latitude limit of the UTM grid.
pub const MIN_LATITUDE: Degree = -80.0;
/// Northern latitude limit of the UTM grid.
pub const MAX_LATITUDE: Degree = 84.0;

pub(crate) const BAND_LETTERS: &[u8; 20] = b"CDEFGHJKLMNPQRSTUVWX";

/// A UTM grid coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UtmCoordinate {
    pub zone: u8,
    pub band: Option<char>,
    pub hemisphere: Hemisphere,
    pub easting: Meter,
    pub northing: Meter,
    pub within_limits: bool,
}

/// Projection constants derived once per ellipsoid.
struct KruegerSeries {
    /// Rectifying radius *A*
    rectifying_radius: Meter,
    eccentricity: f64,
    alpha: [f64; 4],
    beta: [f64; 4],
    delta: [f64; 4],
}

impl KruegerSeries {
    fn new(ellipsoid: &EllipsoidParameters) -> Self {
        let n = ellipsoid.third_flattening();
        let n2 = n * n;
        let n3 = n2 * n;
        let n4 = n3 * n;

        KruegerSeries {
            rectifying_radius: ellipsoid.equatorial_radius() / (1.0 + n)
                * (1.0 + n2 / 4.0 + n4 / 64.0),
            eccentricity: ellipsoid.eccentricity_squared().sqrt(),
            alpha: [
                n / 2.0 - 2.0 * n2 / 3.0 + 5.0 * n3 / 16.0 + 41.0 * n4 / 180.0,
                13.0 * n2 / 48.0 - 3.0 * n3 / 5.0 + 557.0 * n4 / 1440.0,
                61.0 * n3 / 240.0 - 103.0 * n4 / 140.0,
                49561.0 * n4 / 161280.0,
            ],
            beta: [
                n / 2.0 - 2.0 * n2 / 3.0 + 37.0 * n3 / 96.0 - n4 / 360.0,
                n2 / 48.0 + n3 / 15.0 - 437.0 * n4 / 1440.0,
                17.0 * n3 / 480.0 - 37.0 * n4 / 840.0,
                4397.0 * n4 / 161280.0,
            ],
            delta: [
                2.0 * n - 2.0 * n2 / 3.0 - 2.0 * n3 + 116.0 * n4 / 45.0,
                7.0 * n2 / 3.0 - 8.0 * n3 / 5.0 - 227.0 * n4 / 45.0,
                56.0 * n3 / 15.0 - 136.0 * n4 / 35.0,
                4279.0 * n4 / 630.0,
            ],
        }
    }
}

/// Longitude of the central meridian of a zone, in degrees.
pub fn central_meridian(zone: u8) -> Degree {
    (zone as f64 - 1.0) * 6.0 - 180.0 + 3.0
}

/// UTM zone of a point, including the Norway and Svalbard exceptions.
pub fn zone_for(latitude: Degree, longitude: Degree) -> u8 {
    let mut zone = (((longitude + 180.0) / 6.0).floor() as i64 + 1).clamp(1, 60) as u8;

    if (56.0..64.0).contains(&latitude) && (3.0..12.0).contains(&longitude) {
        zone = 32;
    }
    if (72.0..=84.0).contains(&latitude) && (0.0..42.0).contains(&longitude) {
        zone = match longitude {
            l if l < 9.0 => 31,
            l if l < 21.0 => 33,
            l if l < 33.0 => 35,
            _ => 37,
        };
    }
    zone
}

/// Latitude band letter, `None` outside `[-80, 84]`.
pub fn band_for(latitude: Degree) -> Option<char> {
    if !(MIN_LATITUDE..=MAX_LATITUDE).contains(&latitude) {
        return None;
    }
    let index = (((latitude - MIN_LATITUDE) / 8.0).floor() as usize).min(BAND_LETTERS.len() - 1);
    Some(BAND_LETTERS[index] as char)
}

/// Southern edge of a band and its height, in degrees.
fn band_bounds(band: char) -> Option<(Degree, Degree)> {
    let index = BAND_LETTERS
        .iter()
        .position(|&b| b as char == band.to_ascii_uppercase())?;
    let south = MIN_LATITUDE + 8.0 * index as f64;
    let height = if index == BAND_LETTERS.len() - 1 { 12.0 } else { 8.0 };
    Some((south, height))
}

impl UtmCoordinate {
    /// Project a geodetic position.
    ///
    /// Arguments
    /// -----------------
    /// * `position`: the geodetic value (east-positive longitude).
    /// * `ellipsoid`: the reference ellipsoid of the projection.
    ///
    /// Return
    /// ----------
    /// * The grid coordinate in the zone selected by [`zone_for`]. Points beyond the latitude
    ///   limits are flagged with `within_limits = false` and carry no band.
    pub fn from_geodetic(position: &GeodeticPosition, ellipsoid: &EllipsoidParameters) -> Self {
        let latitude = position.latitude();
        let longitude = position.longitude();
        let zone = zone_for(latitude, longitude);
        let series = KruegerSeries::new(ellipsoid);

        let phi = latitude.to_radians();
        let lambda = (longitude - central_meridian(zone)).to_radians();
        let e = series.eccentricity;

        let t = (phi.sin().atanh() - e * (e * phi.sin()).atanh()).sinh();
        let xi_p = t.atan2(lambda.cos());
        let eta_p = (lambda.sin() / (1.0 + t * t).sqrt()).atanh();

        let (mut xi, mut eta) = (xi_p, eta_p);
        for (j, alpha) in series.alpha.iter().enumerate() {
            let k = 2.0 * (j + 1) as f64;
            xi += alpha * (k * xi_p).sin() * (k * eta_p).cosh();
            eta += alpha * (k * xi_p).cos() * (k * eta_p).sinh();
        }

        let hemisphere = if latitude < 0.0 {
            Hemisphere::South
        } else {
            Hemisphere::North
        };
        let false_northing = match hemisphere {
            Hemisphere::South => FALSE_NORTHING_SOUTH,
            _ => 0.0,
        };
        let band = band_for(latitude);

        UtmCoordinate {
            zone,
            band,
            hemisphere,
            easting: FALSE_EASTING + SCALE_FACTOR * series.rectifying_radius * eta,
            northing: false_northing + SCALE_FACTOR * series.rectifying_radius * xi,
            within_limits: band.is_some(),
        }
    }

    /// Validate raw grid input.
    ///
    /// Arguments
    /// -----------------
    /// * `zone`: 1 to 60.
    /// * `band`: a latitude band letter `C`..`X`; it also fixes the hemisphere (`N` and above is
    ///   north).
    /// * `easting`, `northing`: meters, finite.
    ///
    /// Errors
    /// ----------
    /// * [`GeoCoordError::InvalidGrid`] for a zone, band or offset outside the grid.
    pub fn new(zone: u8, band: char, easting: Meter, northing: Meter) -> Result<Self, GeoCoordError> {
        if !(1..=60).contains(&zone) {
            return Err(GeoCoordError::InvalidGrid(format!(
                "zone must be in 1..=60, got {zone}"
            )));
        }
        let band = band.to_ascii_uppercase();
        if band_bounds(band).is_none() {
            return Err(GeoCoordError::InvalidGrid(format!(
                "unknown latitude band '{band}'"
            )));
        }
        if !(easting.is_finite() && easting > 0.0 && easting < 1_000_000.0) {
            return Err(GeoCoordError::InvalidGrid(format!(
                "easting out of range: {easting}"
            )));
        }
        if !(northing.is_finite() && (0.0..=FALSE_NORTHING_SOUTH).contains(&northing)) {
            return Err(GeoCoordError::InvalidGrid(format!(
                "northing out of range: {northing}"
            )));
        }

        Ok(UtmCoordinate {
            zone,
            band: Some(band),
            hemisphere: if band >= 'N' {
                Hemisphere::North
            } else {
                Hemisphere::South
            },
            easting,
            northing,
            within_limits: true,
        })
    }

    /// Inverse projection back to a geodetic position.
    ///
    /// Errors
    /// ----------
    /// * [`GeoCoordError::InvalidGrid`] if the decoded latitude does not fall in the coordinate's
    ///   band (half a degree of slack on each side).
    /// * [`GeoCoordError::InvalidRange`] if the decoded point is not a valid geodetic value.
    pub fn to_geodetic(
        &self,
        ellipsoid: &EllipsoidParameters,
    ) -> Result<GeodeticPosition, GeoCoordError> {
        let series = KruegerSeries::new(ellipsoid);
        let false_northing = match self.hemisphere {
            Hemisphere::South => FALSE_NORTHING_SOUTH,
            _ => 0.0,
        };

        let scale = SCALE_FACTOR * series.rectifying_radius;
        let xi = (self.northing - false_northing) / scale;
        let eta = (self.easting - FALSE_EASTING) / scale;

        let (mut xi_p, mut eta_p) = (xi, eta);
        for (j, beta) in series.beta.iter().enumerate() {
            let k = 2.0 * (j + 1) as f64;
            xi_p -= beta * (k * xi).sin() * (k * eta).cosh();
            eta_p -= beta * (k * xi).cos() * (k * eta).sinh();
        }

        let chi = (xi_p.sin() / eta_p.cosh()).clamp(-1.0, 1.0).asin();
        let phi = series
            .delta
            .iter()
            .enumerate()
            .fold(chi, |acc, (j, delta)| {
                acc + delta * (2.0 * (j + 1) as f64 * chi).sin()
            });
        let lambda = eta_p.sinh().atan2(xi_p.cos());

        let latitude = phi.to_degrees();
        let longitude =
            crate::conversion::normalize_longitude(central_meridian(self.zone) + lambda.to_degrees());

        if let Some((south, height)) = self.band.and_then(band_bounds) {
            if latitude < south - 0.5 || latitude > south + height + 0.5 {
                return Err(GeoCoordError::InvalidGrid(format!(
                    "decoded latitude {latitude:.4} is outside band {}",
                    self.band.unwrap_or('?')
                )));
            }
        }

        GeodeticPosition::new(latitude, longitude)
    }
}
