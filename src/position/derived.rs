//! Derived-representation plumbing of a [`Position`](super::Position).
//!
//! A representation never holds a reference back to its position. During a resynchronization it
//! receives a [`PositionSnapshot`]: read-only borrows of the values it depends on, valid for the
//! duration of one recompute.

use hifitime::Epoch;
use log::debug;

use crate::celestial::CelestialEngine;
use crate::ellipsoid::EllipsoidParameters;
use crate::geodetic::GeodeticPosition;
use crate::load_policy::RepresentationKind;

/// Read-only view of the inputs of every representation.
#[derive(Debug, Clone, Copy)]
pub struct PositionSnapshot<'a> {
    pub geodetic: &'a GeodeticPosition,
    pub ellipsoid: &'a EllipsoidParameters,
    pub instant: &'a Epoch,
    pub engine: &'a dyn CelestialEngine,
}

/// A value derived from a position.
///
/// Both operations are infallible: a snapshot only ever carries validated inputs.
pub trait Representation: Clone {
    const KIND: RepresentationKind;

    /// Build the representation from scratch.
    fn materialize(snapshot: &PositionSnapshot<'_>) -> Self;

    /// Bring an existing representation in line with the snapshot, keeping whatever state the
    /// representation owns beyond the snapshot (e.g. the Cartesian height).
    fn recompute(&mut self, snapshot: &PositionSnapshot<'_>);
}

/// Present/absent slot of a representation.
#[derive(Debug, Clone, PartialEq)]
pub enum Derived<T> {
    Absent,
    Present(T),
}

impl<T> Default for Derived<T> {
    fn default() -> Self {
        Derived::Absent
    }
}

impl<T: Representation> Derived<T> {
    /// `Present` if `include` is set, `Absent` otherwise.
    pub fn materialize_if(include: bool, snapshot: &PositionSnapshot<'_>) -> Self {
        if include {
            Derived::Present(T::materialize(snapshot))
        } else {
            Derived::Absent
        }
    }

    pub fn get(&self) -> Option<&T> {
        match self {
            Derived::Present(value) => Some(value),
            Derived::Absent => None,
        }
    }

    pub(crate) fn get_mut(&mut self) -> Option<&mut T> {
        match self {
            Derived::Present(value) => Some(value),
            Derived::Absent => None,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Derived::Present(_))
    }

    /// A recomputed copy of the present value; `None` when absent.
    ///
    /// The slot itself is untouched, so a mutation can stage every refresh before committing any.
    pub(crate) fn refreshed(&self, snapshot: &PositionSnapshot<'_>) -> Option<T> {
        self.get().map(|value| {
            debug!("staging a refresh of the {:?} representation", T::KIND);
            let mut value = value.clone();
            value.recompute(snapshot);
            value
        })
    }

    /// Recompute in place when present, materialize when absent.
    pub(crate) fn load(&mut self, snapshot: &PositionSnapshot<'_>) {
        match self {
            Derived::Present(value) => {
                debug!("recomputing the loaded {:?} representation", T::KIND);
                value.recompute(snapshot)
            }
            Derived::Absent => {
                debug!("materializing the {:?} representation", T::KIND);
                *self = Derived::Present(T::materialize(snapshot))
            }
        }
    }
}

#[cfg(test)]
mod derived_test {
    use super::*;
    use crate::celestial::LowPrecisionEngine;
    use crate::grid::GridRepresentation;

    #[test]
    fn test_refresh_rule() {
        let geodetic = GeodeticPosition::new(48.8583, 2.2945).unwrap();
        let ellipsoid = EllipsoidParameters::WGS84;
        let instant = crate::time::default_instant();
        let snapshot = PositionSnapshot {
            geodetic: &geodetic,
            ellipsoid: &ellipsoid,
            instant: &instant,
            engine: &LowPrecisionEngine,
        };

        let mut slot: Derived<GridRepresentation> = Derived::materialize_if(false, &snapshot);
        assert!(!slot.is_present());
        assert!(slot.refreshed(&snapshot).is_none());

        slot.load(&snapshot);
        assert_eq!(slot.get().map(|g| g.utm().zone), Some(31));

        let moved = GeodeticPosition::new(-33.8568, 151.2153).unwrap();
        let snapshot = PositionSnapshot {
            geodetic: &moved,
            ..snapshot
        };
        let staged = slot.refreshed(&snapshot).unwrap();
        assert_eq!(staged.utm().zone, 56);
        // staging leaves the slot alone
        assert_eq!(slot.get().map(|g| g.utm().zone), Some(31));
    }

    #[test]
    fn test_representation_kinds() {
        use crate::celestial::CelestialRepresentation;
        use crate::ecef::EarthCenteredCartesian;

        assert_eq!(GridRepresentation::KIND, RepresentationKind::Grid);
        assert_eq!(EarthCenteredCartesian::KIND, RepresentationKind::Cartesian);
        assert_eq!(CelestialRepresentation::KIND, RepresentationKind::Celestial);
    }
}
