use thiserror::Error;

use crate::geodetic::CoordinateKind;
use crate::load_policy::RepresentationKind;

#[derive(Error, Debug)]
pub enum GeoCoordError {
    #[error("{kind} out of range: {value}")]
    InvalidRange { kind: CoordinateKind, value: f64 },

    #[error("Invalid ellipsoid parameters: {0}")]
    InvalidEllipsoid(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{0} representation is not loaded")]
    Precondition(RepresentationKind),

    #[error("Invalid grid coordinate: {0}")]
    InvalidGrid(String),

    #[error("Invalid coordinate part: {0}")]
    InvalidCoordinatePart(String),
}

impl PartialEq for GeoCoordError {
    fn eq(&self, other: &Self) -> bool {
        use GeoCoordError::*;
        match (self, other) {
            (
                InvalidRange {
                    kind: k1,
                    value: v1,
                },
                InvalidRange {
                    kind: k2,
                    value: v2,
                },
            ) => k1 == k2 && (v1 == v2 || (v1.is_nan() && v2.is_nan())),
            (InvalidEllipsoid(a), InvalidEllipsoid(b)) => a == b,
            (InvalidArgument(a), InvalidArgument(b)) => a == b,
            (Precondition(a), Precondition(b)) => a == b,
            (InvalidGrid(a), InvalidGrid(b)) => a == b,
            (InvalidCoordinatePart(a), InvalidCoordinatePart(b)) => a == b,

            _ => false,
        }
    }
}
