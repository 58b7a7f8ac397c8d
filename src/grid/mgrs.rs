//! # Military Grid Reference System
//!
//! MGRS references derived from a [`UtmCoordinate`] with the `AA` 100 km square lettering:
//!
//! - column letters cycle through three sets of eight letters, selected by `(zone - 1) % 3`;
//! - row letters cycle through twenty letters every 2 000 km of northing, shifted by five letters
//!   in even zones.
//!
//! Only points inside the UTM latitude limits have an MGRS reference; polar (UPS) references are
//! not produced.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::utm::UtmCoordinate;
use crate::constants::Meter;

const COLUMN_SETS: [&[u8; 8]; 3] = [b"ABCDEFGH", b"JKLMNPQR", b"STUVWXYZ"];
const ROW_LETTERS: &[u8; 20] = b"ABCDEFGHJKLMNPQRSTUV";
const SQUARE_SIZE: Meter = 100_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MgrsCoordinate {
    pub zone: u8,
    pub band: char,
    /// 100 km square identifier, column letter then row letter.
    pub square: [char; 2],
    /// Offset inside the square, meters.
    pub easting: Meter,
    pub northing: Meter,
}

impl MgrsCoordinate {
    /// Derive the MGRS reference of a UTM coordinate, `None` outside the UTM latitude limits.
    pub fn from_utm(utm: &UtmCoordinate) -> Option<Self> {
        if !utm.within_limits {
            return None;
        }
        let band = utm.band?;

        let set = COLUMN_SETS[(utm.zone as usize - 1) % 3];
        let column_index = ((utm.easting / SQUARE_SIZE).floor() as i64 - 1).rem_euclid(8) as usize;

        let row_offset = if utm.zone % 2 == 0 { 5 } else { 0 };
        let row_index =
            ((utm.northing / SQUARE_SIZE).floor() as i64 + row_offset).rem_euclid(20) as usize;

        Some(MgrsCoordinate {
            zone: utm.zone,
            band,
            square: [set[column_index] as char, ROW_LETTERS[row_index] as char],
            easting: utm.easting.rem_euclid(SQUARE_SIZE),
            northing: utm.northing.rem_euclid(SQUARE_SIZE),
        })
    }

    /// The reference at a given precision, in digits per axis (1 to 5, clamped).
    pub fn to_string_with_precision(&self, digits: usize) -> String {
        let digits = digits.clamp(1, 5);
        let divisor = 10f64.powi(5 - digits as i32);
        format!(
            "{}{} {}{} {:0width$} {:0width$}",
            self.zone,
            self.band,
            self.square[0],
            self.square[1],
            (self.easting / divisor).floor() as u64,
            (self.northing / divisor).floor() as u64,
            width = digits
        )
    }
}

impl fmt::Display for MgrsCoordinate {
    /// 1 m precision, e.g. `31U DQ 48251 11943`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string_with_precision(5))
    }
}

#[cfg(test)]
mod mgrs_test {
    use super::*;
    use crate::ellipsoid::EllipsoidParameters;
    use crate::geodetic::GeodeticPosition;

    fn mgrs(lat: f64, lon: f64) -> Option<MgrsCoordinate> {
        let utm = UtmCoordinate::from_geodetic(
            &GeodeticPosition::new(lat, lon).unwrap(),
            &EllipsoidParameters::WGS84,
        );
        MgrsCoordinate::from_utm(&utm)
    }

    #[test]
    fn test_square_identification() {
        assert_eq!(mgrs(48.8583, 2.2945).unwrap().to_string(), "31U DQ 48251 11943");
        assert_eq!(mgrs(-33.8568, 151.2153).unwrap().to_string(), "56H LH 34900 52288");
        assert_eq!(mgrs(25.0, 25.0).unwrap().to_string(), "35R KH 98154 66436");
    }

    #[test]
    fn test_precision() {
        let reference = mgrs(48.8583, 2.2945).unwrap();
        assert_eq!(reference.to_string_with_precision(3), "31U DQ 482 119");
        assert_eq!(reference.to_string_with_precision(1), "31U DQ 4 1");
    }

    #[test]
    fn test_polar_regions_have_no_reference() {
        assert!(mgrs(84.5, 0.0).is_none());
        assert!(mgrs(-80.5, 0.0).is_none());
    }
}
