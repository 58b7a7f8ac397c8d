//! # Projected grid representation
//!
//! A [`GridRepresentation`] holds the UTM coordinate of a position and, when the point lies inside
//! the UTM latitude limits, its MGRS reference. Both depend on the geodetic value and on the
//! ellipsoid; neither depends on the instant.
//!
//! ## See also
//! * [`utm`] – Krüger series projection and zone rules.
//! * [`mgrs`] – 100 km square lettering.

pub mod mgrs;
pub mod utm;

use serde::{Deserialize, Serialize};

use crate::ellipsoid::EllipsoidParameters;
use crate::geodetic::GeodeticPosition;
use crate::load_policy::RepresentationKind;
use crate::position::derived::{PositionSnapshot, Representation};
use mgrs::MgrsCoordinate;
use utm::UtmCoordinate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridRepresentation {
    utm: UtmCoordinate,
    mgrs: Option<MgrsCoordinate>,
    datum: EllipsoidParameters,
}

impl GridRepresentation {
    pub fn from_geodetic(geodetic: &GeodeticPosition, ellipsoid: &EllipsoidParameters) -> Self {
        let utm = UtmCoordinate::from_geodetic(geodetic, ellipsoid);
        GridRepresentation {
            mgrs: MgrsCoordinate::from_utm(&utm),
            utm,
            datum: *ellipsoid,
        }
    }

    pub fn utm(&self) -> &UtmCoordinate {
        &self.utm
    }

    /// `None` outside `[-80°, 84°]`.
    pub fn mgrs(&self) -> Option<&MgrsCoordinate> {
        self.mgrs.as_ref()
    }

    /// Ellipsoid the projection was evaluated on.
    pub fn datum(&self) -> &EllipsoidParameters {
        &self.datum
    }
}

impl Representation for GridRepresentation {
    const KIND: RepresentationKind = RepresentationKind::Grid;

    fn materialize(snapshot: &PositionSnapshot<'_>) -> Self {
        GridRepresentation::from_geodetic(snapshot.geodetic, snapshot.ellipsoid)
    }

    fn recompute(&mut self, snapshot: &PositionSnapshot<'_>) {
        *self = GridRepresentation::from_geodetic(snapshot.geodetic, snapshot.ellipsoid);
    }
}
