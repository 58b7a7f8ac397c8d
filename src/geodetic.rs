//! # Geodetic latitude/longitude values
//!
//! A [`CoordinatePart`] holds one signed decimal angle together with its sexagesimal
//! decomposition (degrees, minutes, seconds, hemisphere). Both forms always agree: every
//! constructor and every `with_*` method rebuilds the other form from the one it was given.
//!
//! A [`GeodeticPosition`] pairs a latitude part and a longitude part. It is a plain value; the
//! [`Position`](crate::position::Position) aggregate owns one and is the only place where a change
//! is propagated to the derived representations.
//!
//! ## Conventions
//!
//! - Latitude: **degrees**, north positive, `[-90, 90]`.
//! - Longitude: **degrees**, east positive, `[-180, 180]`.
//! - Zero maps to the North / East hemisphere.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{Degree, Radian};
use crate::conversion::{decimal_to_dms, dms_to_decimal};
use crate::geocoord_errors::GeoCoordError;

/// Which axis a [`CoordinatePart`] measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoordinateKind {
    Latitude,
    Longitude,
}

impl CoordinateKind {
    /// Largest admissible magnitude in degrees.
    pub fn limit(self) -> Degree {
        match self {
            CoordinateKind::Latitude => 90.0,
            CoordinateKind::Longitude => 180.0,
        }
    }

    fn hemisphere_for(self, decimal: Degree) -> Hemisphere {
        match (self, decimal < 0.0) {
            (CoordinateKind::Latitude, false) => Hemisphere::North,
            (CoordinateKind::Latitude, true) => Hemisphere::South,
            (CoordinateKind::Longitude, false) => Hemisphere::East,
            (CoordinateKind::Longitude, true) => Hemisphere::West,
        }
    }

    /// Validate a decimal value against the axis domain.
    pub fn check(self, value: Degree) -> Result<Degree, GeoCoordError> {
        if value.is_finite() && value.abs() <= self.limit() {
            Ok(value)
        } else {
            Err(GeoCoordError::InvalidRange { kind: self, value })
        }
    }
}

impl fmt::Display for CoordinateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordinateKind::Latitude => write!(f, "latitude"),
            CoordinateKind::Longitude => write!(f, "longitude"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hemisphere {
    North,
    South,
    East,
    West,
}

impl Hemisphere {
    pub fn kind(self) -> CoordinateKind {
        match self {
            Hemisphere::North | Hemisphere::South => CoordinateKind::Latitude,
            Hemisphere::East | Hemisphere::West => CoordinateKind::Longitude,
        }
    }

    /// `-1.0` for South and West, `1.0` otherwise.
    pub fn sign(self) -> f64 {
        match self {
            Hemisphere::South | Hemisphere::West => -1.0,
            Hemisphere::North | Hemisphere::East => 1.0,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Hemisphere::North => 'N',
            Hemisphere::South => 'S',
            Hemisphere::East => 'E',
            Hemisphere::West => 'W',
        }
    }

    pub fn from_letter(letter: char) -> Option<Hemisphere> {
        match letter.to_ascii_uppercase() {
            'N' => Some(Hemisphere::North),
            'S' => Some(Hemisphere::South),
            'E' => Some(Hemisphere::East),
            'W' => Some(Hemisphere::West),
            _ => None,
        }
    }
}

/// One latitude or longitude value in both decimal and sexagesimal form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordinatePart {
    kind: CoordinateKind,
    decimal: Degree,
    degrees: u32,
    minutes: u32,
    seconds: f64,
    hemisphere: Hemisphere,
}

impl CoordinatePart {
    /// Build a part from a signed decimal angle.
    ///
    /// Errors
    /// ----------
    /// * [`GeoCoordError::InvalidRange`] if the value is outside the axis domain or not finite.
    pub fn new(kind: CoordinateKind, decimal: Degree) -> Result<Self, GeoCoordError> {
        let decimal = kind.check(decimal)?;
        let (degrees, minutes, seconds) = decimal_to_dms(decimal);
        Ok(CoordinatePart {
            kind,
            decimal,
            degrees,
            minutes,
            seconds,
            hemisphere: kind.hemisphere_for(decimal),
        })
    }

    /// Build a part from its sexagesimal components.
    ///
    /// Arguments
    /// -----------------
    /// * `degrees`, `minutes`, `seconds`: unsigned magnitudes, `minutes < 60`, `0 <= seconds < 60`.
    /// * `hemisphere`: must belong to the same axis as the part (N/S for latitude, E/W for longitude).
    ///
    /// Errors
    /// ----------
    /// * [`GeoCoordError::InvalidCoordinatePart`] for out-of-range minutes/seconds or a hemisphere
    ///   of the other axis.
    /// * [`GeoCoordError::InvalidRange`] if the resulting decimal value is outside the axis domain.
    pub fn from_dms(
        degrees: u32,
        minutes: u32,
        seconds: f64,
        hemisphere: Hemisphere,
    ) -> Result<Self, GeoCoordError> {
        if minutes >= 60 {
            return Err(GeoCoordError::InvalidCoordinatePart(format!(
                "minutes must be below 60, got {minutes}"
            )));
        }
        if !(seconds.is_finite() && (0.0..60.0).contains(&seconds)) {
            return Err(GeoCoordError::InvalidCoordinatePart(format!(
                "seconds must be in [0, 60), got {seconds}"
            )));
        }
        let kind = hemisphere.kind();
        let decimal =
            hemisphere.sign() * dms_to_decimal(degrees as f64, minutes as f64, seconds);
        let decimal = kind.check(decimal)?;

        // Keep the caller's components verbatim; only the hemisphere of an exact zero is normalized.
        Ok(CoordinatePart {
            kind,
            decimal,
            degrees,
            minutes,
            seconds,
            hemisphere: if decimal == 0.0 {
                kind.hemisphere_for(0.0)
            } else {
                hemisphere
            },
        })
    }

    pub fn kind(&self) -> CoordinateKind {
        self.kind
    }

    /// Signed decimal degrees.
    pub fn decimal(&self) -> Degree {
        self.decimal
    }

    pub fn radians(&self) -> Radian {
        self.decimal.to_radians()
    }

    pub fn degrees(&self) -> u32 {
        self.degrees
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    pub fn seconds(&self) -> f64 {
        self.seconds
    }

    pub fn hemisphere(&self) -> Hemisphere {
        self.hemisphere
    }

    /// Decimal minutes (`minutes + seconds / 60`), used by degree-decimal-minute displays.
    pub fn decimal_minutes(&self) -> f64 {
        self.minutes as f64 + self.seconds / 60.0
    }

    /// Same axis, new decimal value.
    pub fn with_decimal(&self, decimal: Degree) -> Result<Self, GeoCoordError> {
        CoordinatePart::new(self.kind, decimal)
    }

    pub fn with_degrees(&self, degrees: u32) -> Result<Self, GeoCoordError> {
        CoordinatePart::from_dms(degrees, self.minutes, self.seconds, self.hemisphere)
    }

    pub fn with_minutes(&self, minutes: u32) -> Result<Self, GeoCoordError> {
        CoordinatePart::from_dms(self.degrees, minutes, self.seconds, self.hemisphere)
    }

    pub fn with_seconds(&self, seconds: f64) -> Result<Self, GeoCoordError> {
        CoordinatePart::from_dms(self.degrees, self.minutes, seconds, self.hemisphere)
    }

    /// Flip or set the hemisphere while keeping the magnitude.
    pub fn with_hemisphere(&self, hemisphere: Hemisphere) -> Result<Self, GeoCoordError> {
        if hemisphere.kind() != self.kind {
            return Err(GeoCoordError::InvalidCoordinatePart(format!(
                "hemisphere {} does not apply to a {}",
                hemisphere.letter(),
                self.kind
            )));
        }
        CoordinatePart::from_dms(self.degrees, self.minutes, self.seconds, hemisphere)
    }
}

/// A latitude/longitude pair on the reference ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeodeticPosition {
    latitude: CoordinatePart,
    longitude: CoordinatePart,
}

impl GeodeticPosition {
    /// Validate and build a geodetic value from signed decimal degrees.
    pub fn new(latitude: Degree, longitude: Degree) -> Result<Self, GeoCoordError> {
        Ok(GeodeticPosition {
            latitude: CoordinatePart::new(CoordinateKind::Latitude, latitude)?,
            longitude: CoordinatePart::new(CoordinateKind::Longitude, longitude)?,
        })
    }

    /// Assemble a geodetic value from two already validated parts.
    ///
    /// Errors
    /// ----------
    /// * [`GeoCoordError::InvalidCoordinatePart`] if the parts are swapped.
    pub fn from_parts(
        latitude: CoordinatePart,
        longitude: CoordinatePart,
    ) -> Result<Self, GeoCoordError> {
        if latitude.kind() != CoordinateKind::Latitude
            || longitude.kind() != CoordinateKind::Longitude
        {
            return Err(GeoCoordError::InvalidCoordinatePart(
                "expected a latitude part followed by a longitude part".into(),
            ));
        }
        Ok(GeodeticPosition {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> Degree {
        self.latitude.decimal()
    }

    pub fn longitude(&self) -> Degree {
        self.longitude.decimal()
    }

    pub fn latitude_part(&self) -> &CoordinatePart {
        &self.latitude
    }

    pub fn longitude_part(&self) -> &CoordinatePart {
        &self.longitude
    }

    /// `(latitude, longitude)` in radians, east positive.
    pub fn to_radians(&self) -> (Radian, Radian) {
        (self.latitude.radians(), self.longitude.radians())
    }
}

impl Default for GeodeticPosition {
    fn default() -> Self {
        let zero = |kind| CoordinatePart {
            kind,
            decimal: 0.0,
            degrees: 0,
            minutes: 0,
            seconds: 0.0,
            hemisphere: kind.hemisphere_for(0.0),
        };
        GeodeticPosition {
            latitude: zero(CoordinateKind::Latitude),
            longitude: zero(CoordinateKind::Longitude),
        }
    }
}
