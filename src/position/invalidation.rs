//! Which representations a mutation resynchronizes, and what a datum update reports.
//!
//! | Trigger    | Refreshes (in order)         |
//! |------------|------------------------------|
//! | `Geodetic` | Celestial, Grid, Cartesian   |
//! | `Instant`  | Celestial                    |
//! | `Datum`    | Grid, Cartesian              |
//!
//! Only *present* representations are refreshed; an absent one is skipped without error.

use crate::constants::Degree;
use crate::geocoord_errors::GeoCoordError;
use crate::load_policy::RepresentationKind;

/// The input of a position that changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    Geodetic,
    Instant,
    Datum,
}

impl Trigger {
    /// Representations depending on this input, in refresh order.
    pub const fn targets(self) -> &'static [RepresentationKind] {
        match self {
            Trigger::Geodetic => &[
                RepresentationKind::Celestial,
                RepresentationKind::Grid,
                RepresentationKind::Cartesian,
            ],
            Trigger::Instant => &[RepresentationKind::Celestial],
            Trigger::Datum => &[RepresentationKind::Grid, RepresentationKind::Cartesian],
        }
    }
}

/// One member of a [`DatumScope`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatumTarget {
    Grid,
    Cartesian,
    /// Update the position's ellipsoid only.
    GeodeticOnly,
}

/// Set of representations a datum change should refresh.
///
/// The position's own ellipsoid always takes the new value. `GeodeticOnly` contributes no
/// representation, so a scope made of it alone refreshes nothing and leaves the grid and
/// Cartesian values computed on the previous ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DatumScope {
    grid: bool,
    cartesian: bool,
    geodetic_only: bool,
}

impl DatumScope {
    /// Grid and Cartesian.
    pub const fn all() -> Self {
        DatumScope {
            grid: true,
            cartesian: true,
            geodetic_only: false,
        }
    }

    pub const fn geodetic_only() -> Self {
        DatumScope {
            grid: false,
            cartesian: false,
            geodetic_only: true,
        }
    }

    pub fn of(targets: &[DatumTarget]) -> Self {
        targets
            .iter()
            .fold(DatumScope::default(), |scope, target| scope.with(*target))
    }

    pub fn with(mut self, target: DatumTarget) -> Self {
        match target {
            DatumTarget::Grid => self.grid = true,
            DatumTarget::Cartesian => self.cartesian = true,
            DatumTarget::GeodeticOnly => self.geodetic_only = true,
        }
        self
    }

    pub fn contains(&self, target: DatumTarget) -> bool {
        match target {
            DatumTarget::Grid => self.grid,
            DatumTarget::Cartesian => self.cartesian,
            DatumTarget::GeodeticOnly => self.geodetic_only,
        }
    }

    /// Whether a representation is selected for refresh.
    pub fn includes(&self, kind: RepresentationKind) -> bool {
        match kind {
            RepresentationKind::Grid => self.grid,
            RepresentationKind::Cartesian => self.cartesian,
            RepresentationKind::Celestial => false,
        }
    }
}

/// Outcome of a datum change: which selected representations were refreshed and which were
/// skipped because they were not loaded.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DatumUpdateReport {
    pub refreshed: Vec<RepresentationKind>,
    pub skipped: Vec<RepresentationKind>,
}

impl DatumUpdateReport {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }

    /// Turn a skipped target into an error.
    ///
    /// Errors
    /// ----------
    /// * [`GeoCoordError::Precondition`] naming the first skipped representation.
    pub fn require_all(self) -> Result<Self, GeoCoordError> {
        match self.skipped.first() {
            Some(kind) => Err(GeoCoordError::Precondition(*kind)),
            None => Ok(self),
        }
    }
}

/// Result of moving a position along a geodesic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveOutcome {
    pub latitude: Degree,
    pub longitude: Degree,
    /// Forward bearing at the destination, degrees in [0, 360).
    pub final_bearing: Degree,
    /// `false` when the ellipsoidal iteration hit its cap; the destination is the best estimate.
    pub converged: bool,
    pub iterations: usize,
}
