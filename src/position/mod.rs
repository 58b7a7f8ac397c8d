//! # Position: a geodetic value and the representations derived from it
//!
//! A [`Position`] owns four inputs (the geodetic value, the ellipsoid, the calendar instant and
//! the celestial engine) and up to three derived representations:
//!
//! | Representation | Depends on | Type |
//! |----------------|------------|------|
//! | Grid (UTM + MGRS) | geodetic, ellipsoid | [`GridRepresentation`] |
//! | Cartesian (ECEF) | geodetic, ellipsoid | [`EarthCenteredCartesian`] |
//! | Celestial | geodetic, instant | [`CelestialRepresentation`] |
//!
//! Which representations are computed at construction is decided by the [`LoadPolicy`]; the
//! others stay absent until a `load_*` call materializes them.
//!
//! ## Resynchronization
//!
//! Every mutator validates its input first, then stages a refreshed copy of each *present*
//! representation listed by its [`Trigger`](invalidation::Trigger), and only then commits the new
//! input together with the staged copies. A failed mutation leaves the position untouched and a
//! successful one never materializes an absent representation.
//!
//! ## Longitudes
//!
//! Longitudes are east positive everywhere in this module. The geodesic solvers work west
//! positive; [`Position::move_by`] and [`Position::distance_to`] negate on the way in and out.
//!
//! ## Example
//!
//! ```rust
//! use geocoord::geodesic::Shape;
//! use geocoord::load_policy::LoadPolicy;
//! use geocoord::position::Position;
//! use geocoord::time::default_instant;
//!
//! let mut paris =
//!     Position::with_policy(48.8583, 2.2945, default_instant(), LoadPolicy::lazy()).unwrap();
//! assert!(paris.grid().is_none());
//!
//! paris.load_grid();
//! assert_eq!(paris.grid().unwrap().utm().zone, 31);
//!
//! paris.move_by(10_000.0, 90.0, Shape::Ellipsoid).unwrap();
//! assert!(paris.longitude() > 2.2945);
//! ```
//!
//! ## See also
//! * [`derived`] – Present/absent slots and the snapshot handed to representations.
//! * [`invalidation`] – Trigger table, datum scopes and update reports.

pub mod derived;
pub mod invalidation;

use std::sync::Arc;

use hifitime::Epoch;
use log::debug;
use nalgebra::Vector3;

use crate::celestial::{CelestialEngine, CelestialRepresentation, LowPrecisionEngine};
use crate::constants::{Degree, Meter};
use crate::conversion::{normalize_degrees, normalize_longitude};
use crate::ecef::{ecef_to_geodetic, EarthCenteredCartesian};
use crate::ellipsoid::{Datum, EllipsoidParameters};
use crate::geocoord_errors::GeoCoordError;
use crate::geodesic::{solve_direct, solve_inverse, GeodesicDistance, Shape};
use crate::geodetic::{CoordinateKind, CoordinatePart, GeodeticPosition};
use crate::grid::utm::UtmCoordinate;
use crate::grid::GridRepresentation;
use crate::load_policy::{LoadPolicy, RepresentationKind};
use crate::parser::{CartesianKind, CoordinateParser, FormatTag, RegexParser};
use crate::time::default_instant;

use derived::{Derived, PositionSnapshot, Representation};
use invalidation::{DatumScope, DatumUpdateReport, MoveOutcome, Trigger};

/// Snapshot built from disjoint field borrows, so that a representation slot of the same
/// position can be borrowed mutably at the same time.
macro_rules! snapshot_of {
    ($position:expr) => {
        PositionSnapshot {
            geodetic: &$position.geodetic,
            ellipsoid: &$position.ellipsoid,
            instant: &$position.instant,
            engine: $position.engine.as_ref(),
        }
    };
}

/// Refreshed copies waiting to be committed.
#[derive(Default)]
struct Staged {
    celestial: Option<CelestialRepresentation>,
    grid: Option<GridRepresentation>,
    cartesian: Option<EarthCenteredCartesian>,
}

impl Staged {
    fn kinds(&self) -> Vec<RepresentationKind> {
        let mut kinds = Vec::with_capacity(3);
        if self.celestial.is_some() {
            kinds.push(RepresentationKind::Celestial);
        }
        if self.grid.is_some() {
            kinds.push(RepresentationKind::Grid);
        }
        if self.cartesian.is_some() {
            kinds.push(RepresentationKind::Cartesian);
        }
        kinds
    }
}

#[derive(Debug, Clone)]
pub struct Position {
    geodetic: GeodeticPosition,
    ellipsoid: EllipsoidParameters,
    instant: Epoch,
    policy: LoadPolicy,
    engine: Arc<dyn CelestialEngine>,
    format: FormatTag,
    grid: Derived<GridRepresentation>,
    cartesian: Derived<EarthCenteredCartesian>,
    celestial: Derived<CelestialRepresentation>,
}

impl Default for Position {
    /// (0, 0) on WGS84 at 1900-01-01 UTC, everything loaded.
    fn default() -> Self {
        Position::assemble(
            GeodeticPosition::default(),
            EllipsoidParameters::WGS84,
            default_instant(),
            LoadPolicy::full(),
            Arc::new(LowPrecisionEngine),
            FormatTag::DecimalDegrees,
        )
    }
}

impl Position {
    fn assemble(
        geodetic: GeodeticPosition,
        ellipsoid: EllipsoidParameters,
        instant: Epoch,
        policy: LoadPolicy,
        engine: Arc<dyn CelestialEngine>,
        format: FormatTag,
    ) -> Self {
        let snapshot = PositionSnapshot {
            geodetic: &geodetic,
            ellipsoid: &ellipsoid,
            instant: &instant,
            engine: engine.as_ref(),
        };
        let celestial = Derived::materialize_if(policy.celestial, &snapshot);
        let grid = Derived::materialize_if(policy.grid, &snapshot);
        let cartesian = Derived::materialize_if(policy.cartesian, &snapshot);

        Position {
            geodetic,
            ellipsoid,
            instant,
            policy,
            engine,
            format,
            grid,
            cartesian,
            celestial,
        }
    }

    /// Position on WGS84 at the default instant, everything loaded.
    ///
    /// Errors
    /// ----------
    /// * [`GeoCoordError::InvalidRange`] when a coordinate lies outside its domain.
    pub fn new(latitude: Degree, longitude: Degree) -> Result<Self, GeoCoordError> {
        Position::with_instant(latitude, longitude, default_instant())
    }

    pub fn with_instant(
        latitude: Degree,
        longitude: Degree,
        instant: Epoch,
    ) -> Result<Self, GeoCoordError> {
        Position::with_policy(latitude, longitude, instant, LoadPolicy::full())
    }

    /// Build a position and eagerly compute the representations selected by `policy`.
    ///
    /// Arguments
    /// -----------------
    /// * `latitude`: decimal degrees in `[-90, 90]`.
    /// * `longitude`: decimal degrees in `[-180, 180]`, east positive.
    /// * `instant`: calendar instant used by the celestial representation.
    /// * `policy`: representations to compute now.
    ///
    /// Return
    /// ----------
    /// * The new position, or [`GeoCoordError::InvalidRange`]; values are never clamped.
    pub fn with_policy(
        latitude: Degree,
        longitude: Degree,
        instant: Epoch,
        policy: LoadPolicy,
    ) -> Result<Self, GeoCoordError> {
        Ok(Position::assemble(
            GeodeticPosition::new(latitude, longitude)?,
            EllipsoidParameters::WGS84,
            instant,
            policy,
            Arc::new(LowPrecisionEngine),
            FormatTag::DecimalDegrees,
        ))
    }

    pub fn builder() -> PositionBuilder {
        PositionBuilder::default()
    }

    /// Position on WGS84 decoded from a UTM coordinate.
    ///
    /// Errors
    /// ----------
    /// * [`GeoCoordError::InvalidGrid`] for an unknown zone or band, offsets outside the grid,
    ///   or a northing that does not fall inside the given band.
    pub fn from_utm(
        zone: u8,
        band: char,
        easting: Meter,
        northing: Meter,
    ) -> Result<Self, GeoCoordError> {
        let geodetic = UtmCoordinate::new(zone, band, easting, northing)?
            .to_geodetic(&EllipsoidParameters::WGS84)?;
        Ok(Position::assemble(
            geodetic,
            EllipsoidParameters::WGS84,
            default_instant(),
            LoadPolicy::full(),
            Arc::new(LowPrecisionEngine),
            FormatTag::Utm,
        ))
    }

    /// Position on WGS84 decoded from an ECEF vector in meters. The geodetic height of the
    /// vector is kept by the Cartesian representation.
    ///
    /// Errors
    /// ----------
    /// * [`GeoCoordError::InvalidArgument`] for a non-finite component or the geocenter itself.
    pub fn from_ecef(x: Meter, y: Meter, z: Meter) -> Result<Self, GeoCoordError> {
        let vector = Vector3::new(x, y, z);
        let norm = vector.norm();
        if !norm.is_finite() || norm == 0.0 {
            return Err(GeoCoordError::InvalidArgument(format!(
                "ECEF vector ({x}, {y}, {z}) has no geodetic counterpart"
            )));
        }

        let (latitude, longitude, height) = ecef_to_geodetic(&vector, &EllipsoidParameters::WGS84);
        let geodetic = GeodeticPosition::new(
            latitude.to_degrees().clamp(-90.0, 90.0),
            longitude.to_degrees(),
        )?;
        let mut position = Position::assemble(
            geodetic,
            EllipsoidParameters::WGS84,
            default_instant(),
            LoadPolicy::full(),
            Arc::new(LowPrecisionEngine),
            FormatTag::Ecef,
        );
        position.set_cartesian_height(height)?;
        Ok(position)
    }

    /// Parse free text with the default [`RegexParser`] at the default instant.
    pub fn try_parse(text: &str) -> Option<Self> {
        Position::try_parse_with(&RegexParser, text, default_instant())
    }

    pub fn try_parse_with_instant(text: &str, instant: Epoch) -> Option<Self> {
        Position::try_parse_with(&RegexParser, text, instant)
    }

    /// Build a fresh, fully loaded position from the output of `parser`.
    ///
    /// The format the text was written in is kept in [`Position::format`]. For an earth-centered
    /// input the parsed height is carried over onto the Cartesian representation.
    pub fn try_parse_with(
        parser: &dyn CoordinateParser,
        text: &str,
        instant: Epoch,
    ) -> Option<Self> {
        let parsed = parser.try_parse(text)?;
        let geodetic = GeodeticPosition::new(parsed.latitude, parsed.longitude).ok()?;
        let mut position = Position::assemble(
            geodetic,
            EllipsoidParameters::WGS84,
            instant,
            LoadPolicy::full(),
            Arc::new(LowPrecisionEngine),
            parsed.format,
        );
        if let (Some(CartesianKind::EarthCentered), Some(height)) =
            (parsed.cartesian, parsed.height)
        {
            position.set_cartesian_height(height).ok()?;
        }
        Some(position)
    }

    pub fn latitude(&self) -> Degree {
        self.geodetic.latitude()
    }

    pub fn longitude(&self) -> Degree {
        self.geodetic.longitude()
    }

    /// Decimal value and degree/minute/second parts of both coordinates.
    pub fn geodetic(&self) -> &GeodeticPosition {
        &self.geodetic
    }

    pub fn ellipsoid(&self) -> &EllipsoidParameters {
        &self.ellipsoid
    }

    pub fn instant(&self) -> &Epoch {
        &self.instant
    }

    pub fn policy(&self) -> &LoadPolicy {
        &self.policy
    }

    /// Surface form the position was read from.
    pub fn format(&self) -> FormatTag {
        self.format
    }

    pub fn engine(&self) -> &dyn CelestialEngine {
        self.engine.as_ref()
    }

    pub fn grid(&self) -> Option<&GridRepresentation> {
        self.grid.get()
    }

    pub fn cartesian(&self) -> Option<&EarthCenteredCartesian> {
        self.cartesian.get()
    }

    pub fn celestial(&self) -> Option<&CelestialRepresentation> {
        self.celestial.get()
    }

    pub fn is_loaded(&self, kind: RepresentationKind) -> bool {
        match kind {
            RepresentationKind::Grid => self.grid.is_present(),
            RepresentationKind::Cartesian => self.cartesian.is_present(),
            RepresentationKind::Celestial => self.celestial.is_present(),
        }
    }

    /// Refreshed copies of the present representations that `trigger` lists and `selected`
    /// accepts, computed against `snapshot`.
    fn stage(
        &self,
        trigger: Trigger,
        snapshot: &PositionSnapshot<'_>,
        selected: impl Fn(RepresentationKind) -> bool,
    ) -> Staged {
        let mut staged = Staged::default();
        for kind in trigger.targets().iter().copied().filter(|k| selected(*k)) {
            match kind {
                RepresentationKind::Celestial => {
                    staged.celestial = self.celestial.refreshed(snapshot)
                }
                RepresentationKind::Grid => staged.grid = self.grid.refreshed(snapshot),
                RepresentationKind::Cartesian => {
                    staged.cartesian = self.cartesian.refreshed(snapshot)
                }
            }
        }
        staged
    }

    fn commit(&mut self, staged: Staged) {
        if let Some(celestial) = staged.celestial {
            self.celestial = Derived::Present(celestial);
        }
        if let Some(grid) = staged.grid {
            self.grid = Derived::Present(grid);
        }
        if let Some(cartesian) = staged.cartesian {
            self.cartesian = Derived::Present(cartesian);
        }
    }

    fn apply_geodetic(&mut self, geodetic: GeodeticPosition) {
        let staged = {
            let snapshot = PositionSnapshot {
                geodetic: &geodetic,
                ..snapshot_of!(self)
            };
            self.stage(Trigger::Geodetic, &snapshot, |_| true)
        };
        debug!(
            "geodetic value set to ({}, {}), refreshed {:?}",
            geodetic.latitude(),
            geodetic.longitude(),
            staged.kinds()
        );
        self.geodetic = geodetic;
        self.commit(staged);
    }

    pub fn set_latitude(&mut self, latitude: Degree) -> Result<(), GeoCoordError> {
        let part = CoordinatePart::new(CoordinateKind::Latitude, latitude)?;
        self.set_latitude_part(part)
    }

    pub fn set_longitude(&mut self, longitude: Degree) -> Result<(), GeoCoordError> {
        let part = CoordinatePart::new(CoordinateKind::Longitude, longitude)?;
        self.set_longitude_part(part)
    }

    /// Replace both coordinates at once; either both are applied or neither.
    pub fn set_geodetic(&mut self, latitude: Degree, longitude: Degree) -> Result<(), GeoCoordError> {
        let geodetic = GeodeticPosition::new(latitude, longitude)?;
        self.apply_geodetic(geodetic);
        Ok(())
    }

    /// Replace the latitude by a part built from degrees/minutes/seconds or decimal degrees.
    ///
    /// Errors
    /// ----------
    /// * [`GeoCoordError::InvalidCoordinatePart`] if `part` is a longitude.
    pub fn set_latitude_part(&mut self, part: CoordinatePart) -> Result<(), GeoCoordError> {
        let geodetic = GeodeticPosition::from_parts(part, *self.geodetic.longitude_part())?;
        self.apply_geodetic(geodetic);
        Ok(())
    }

    pub fn set_longitude_part(&mut self, part: CoordinatePart) -> Result<(), GeoCoordError> {
        let geodetic = GeodeticPosition::from_parts(*self.geodetic.latitude_part(), part)?;
        self.apply_geodetic(geodetic);
        Ok(())
    }

    /// Change the calendar instant; only the celestial representation depends on it.
    pub fn set_instant(&mut self, instant: Epoch) {
        let staged = {
            let snapshot = PositionSnapshot {
                instant: &instant,
                ..snapshot_of!(self)
            };
            self.stage(Trigger::Instant, &snapshot, |_| true)
        };
        debug!("instant set to {instant}, refreshed {:?}", staged.kinds());
        self.instant = instant;
        self.commit(staged);
    }

    /// Replace the ellipsoid and refresh the grid and Cartesian representations that are loaded.
    ///
    /// Errors
    /// ----------
    /// * [`GeoCoordError::InvalidEllipsoid`] for a non-positive or non-finite parameter.
    pub fn set_datum(
        &mut self,
        equatorial_radius: Meter,
        inverse_flattening: f64,
    ) -> Result<DatumUpdateReport, GeoCoordError> {
        self.set_datum_scoped(equatorial_radius, inverse_flattening, DatumScope::all())
    }

    /// Replace the ellipsoid, refreshing only the representations selected by `scope`.
    ///
    /// The position's own ellipsoid always takes the new value. Selected representations that
    /// are not loaded are listed in [`DatumUpdateReport::skipped`]; unselected ones keep the
    /// values computed on the previous ellipsoid (see their `datum()` accessor).
    ///
    /// Arguments
    /// -----------------
    /// * `equatorial_radius`: meters, finite and positive.
    /// * `inverse_flattening`: finite and positive.
    /// * `scope`: representations to refresh.
    ///
    /// Return
    /// ----------
    /// * Which selected representations were refreshed and which were skipped.
    ///
    /// See also
    /// ------------
    /// * [`DatumUpdateReport::require_all`] – Turn skipped targets into an error.
    pub fn set_datum_scoped(
        &mut self,
        equatorial_radius: Meter,
        inverse_flattening: f64,
        scope: DatumScope,
    ) -> Result<DatumUpdateReport, GeoCoordError> {
        let ellipsoid = EllipsoidParameters::new(equatorial_radius, inverse_flattening)?;
        Ok(self.apply_datum(ellipsoid, scope))
    }

    /// Switch to a named ellipsoid, refreshing grid and Cartesian when loaded.
    pub fn set_named_datum(&mut self, datum: Datum) -> DatumUpdateReport {
        self.apply_datum(datum.parameters(), DatumScope::all())
    }

    fn apply_datum(&mut self, ellipsoid: EllipsoidParameters, scope: DatumScope) -> DatumUpdateReport {
        let (refreshed, skipped): (Vec<_>, Vec<_>) = Trigger::Datum
            .targets()
            .iter()
            .copied()
            .filter(|kind| scope.includes(*kind))
            .partition(|kind| self.is_loaded(*kind));

        let staged = {
            let snapshot = PositionSnapshot {
                ellipsoid: &ellipsoid,
                ..snapshot_of!(self)
            };
            self.stage(Trigger::Datum, &snapshot, |kind| scope.includes(kind))
        };
        debug!(
            "ellipsoid set to a = {} m, 1/f = {}, refreshed {:?}",
            ellipsoid.equatorial_radius(),
            ellipsoid.inverse_flattening(),
            staged.kinds()
        );
        self.ellipsoid = ellipsoid;
        self.commit(staged);

        DatumUpdateReport { refreshed, skipped }
    }

    /// Move along a geodesic.
    ///
    /// Arguments
    /// -----------------
    /// * `distance`: meters, finite.
    /// * `bearing`: initial bearing in degrees clockwise from north, finite.
    /// * `shape`: mean-radius sphere, or the position's own ellipsoid.
    ///
    /// Return
    /// ----------
    /// * The destination, the forward bearing on arrival and the solver diagnostic. A solver that
    ///   did not converge still moves the position to its best estimate.
    ///
    /// Longitudes are east positive on both sides of the solver: a bearing of 90° increases the
    /// longitude. Starting from (25, 25), 10 km at 25° lands near (25.0815, 25.0418), which is
    /// the point [`Position::distance_to`] and [`Position::move_toward`] agree with. Code that
    /// expects the west-positive result (25.0815, 24.9582) must mirror the longitude itself.
    pub fn move_by(
        &mut self,
        distance: Meter,
        bearing: Degree,
        shape: Shape,
    ) -> Result<MoveOutcome, GeoCoordError> {
        if !distance.is_finite() {
            return Err(GeoCoordError::InvalidArgument(format!(
                "distance must be finite, got {distance}"
            )));
        }
        if !bearing.is_finite() {
            return Err(GeoCoordError::InvalidArgument(format!(
                "bearing must be finite, got {bearing}"
            )));
        }

        let (latitude, longitude) = self.geodetic.to_radians();
        let solution = solve_direct(
            latitude,
            -longitude,
            normalize_degrees(bearing).to_radians(),
            distance,
            &shape.with_ellipsoid(self.ellipsoid),
        );

        let latitude = solution.latitude.to_degrees().clamp(-90.0, 90.0);
        let longitude = normalize_longitude(-solution.longitude.to_degrees());
        let geodetic = GeodeticPosition::new(latitude, longitude)?;
        self.apply_geodetic(geodetic);

        Ok(MoveOutcome {
            latitude,
            longitude,
            final_bearing: normalize_degrees(solution.final_bearing.to_degrees()),
            converged: solution.converged,
            iterations: solution.iterations,
        })
    }

    /// Move `distance` meters along the geodesic heading to `target`.
    ///
    /// When the position already sits on `target` the heading is north.
    pub fn move_toward(
        &mut self,
        target: &GeodeticPosition,
        distance: Meter,
        shape: Shape,
    ) -> Result<MoveOutcome, GeoCoordError> {
        let bearing = self.distance_to(target, shape).initial_bearing;
        self.move_by(distance, bearing, shape)
    }

    /// Geodesic distance and end bearings to `target`.
    pub fn distance_to(&self, target: &GeodeticPosition, shape: Shape) -> GeodesicDistance {
        let (lat1, lon1) = self.geodetic.to_radians();
        let (lat2, lon2) = target.to_radians();
        solve_inverse(lat1, -lon1, lat2, -lon2, &shape.with_ellipsoid(self.ellipsoid)).into()
    }

    /// Compute the grid representation now, or recompute it when already loaded.
    pub fn load_grid(&mut self) {
        let snapshot = snapshot_of!(self);
        self.grid.load(&snapshot);
    }

    pub fn load_cartesian(&mut self) {
        let snapshot = snapshot_of!(self);
        self.cartesian.load(&snapshot);
    }

    pub fn load_celestial(&mut self) {
        let snapshot = snapshot_of!(self);
        self.celestial.load(&snapshot);
    }

    /// Recompute one loaded representation from the current inputs.
    ///
    /// Errors
    /// ----------
    /// * [`GeoCoordError::Precondition`] when the representation is not loaded.
    pub fn refresh(&mut self, kind: RepresentationKind) -> Result<(), GeoCoordError> {
        let snapshot = snapshot_of!(self);
        let recomputed = match kind {
            RepresentationKind::Grid => self.grid.get_mut().map(|g| g.recompute(&snapshot)),
            RepresentationKind::Cartesian => {
                self.cartesian.get_mut().map(|c| c.recompute(&snapshot))
            }
            RepresentationKind::Celestial => {
                self.celestial.get_mut().map(|c| c.recompute(&snapshot))
            }
        };
        recomputed.ok_or(GeoCoordError::Precondition(kind))
    }

    /// Overwrite the geodetic height kept by the Cartesian representation and recompute it.
    ///
    /// Errors
    /// ----------
    /// * [`GeoCoordError::InvalidArgument`] for a non-finite height.
    /// * [`GeoCoordError::Precondition`] when Cartesian is not loaded.
    pub fn set_cartesian_height(&mut self, height: Meter) -> Result<(), GeoCoordError> {
        if !height.is_finite() {
            return Err(GeoCoordError::InvalidArgument(format!(
                "height must be finite, got {height}"
            )));
        }
        let snapshot = snapshot_of!(self);
        let cartesian = self
            .cartesian
            .get_mut()
            .ok_or(GeoCoordError::Precondition(RepresentationKind::Cartesian))?;
        cartesian.set_height(height);
        cartesian.recompute(&snapshot);
        Ok(())
    }
}

/// Fluent construction of a [`Position`]; every input is validated in [`PositionBuilder::build`].
#[derive(Debug, Clone)]
pub struct PositionBuilder {
    latitude: Degree,
    longitude: Degree,
    instant: Option<Epoch>,
    policy: LoadPolicy,
    equatorial_radius: Meter,
    inverse_flattening: f64,
    engine: Option<Arc<dyn CelestialEngine>>,
}

impl Default for PositionBuilder {
    fn default() -> Self {
        let wgs84 = EllipsoidParameters::WGS84;
        PositionBuilder {
            latitude: 0.0,
            longitude: 0.0,
            instant: None,
            policy: LoadPolicy::full(),
            equatorial_radius: wgs84.equatorial_radius(),
            inverse_flattening: wgs84.inverse_flattening(),
            engine: None,
        }
    }
}

impl PositionBuilder {
    pub fn latitude(mut self, latitude: Degree) -> Self {
        self.latitude = latitude;
        self
    }

    pub fn longitude(mut self, longitude: Degree) -> Self {
        self.longitude = longitude;
        self
    }

    pub fn instant(mut self, instant: Epoch) -> Self {
        self.instant = Some(instant);
        self
    }

    pub fn policy(mut self, policy: LoadPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn datum(self, datum: Datum) -> Self {
        let params = datum.parameters();
        self.ellipsoid(params.equatorial_radius(), params.inverse_flattening())
    }

    pub fn ellipsoid(mut self, equatorial_radius: Meter, inverse_flattening: f64) -> Self {
        self.equatorial_radius = equatorial_radius;
        self.inverse_flattening = inverse_flattening;
        self
    }

    /// Replace the default [`LowPrecisionEngine`].
    pub fn engine(mut self, engine: Arc<dyn CelestialEngine>) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Errors
    /// ----------
    /// * [`GeoCoordError::InvalidRange`] for an out-of-domain coordinate.
    /// * [`GeoCoordError::InvalidEllipsoid`] for invalid ellipsoid parameters.
    pub fn build(self) -> Result<Position, GeoCoordError> {
        let geodetic = GeodeticPosition::new(self.latitude, self.longitude)?;
        let ellipsoid = EllipsoidParameters::new(self.equatorial_radius, self.inverse_flattening)?;
        Ok(Position::assemble(
            geodetic,
            ellipsoid,
            self.instant.unwrap_or_else(default_instant),
            self.policy,
            self.engine.unwrap_or_else(|| Arc::new(LowPrecisionEngine)),
            FormatTag::DecimalDegrees,
        ))
    }
}
