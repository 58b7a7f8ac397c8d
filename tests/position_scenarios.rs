mod common;

use approx::assert_relative_eq;
use common::{assert_same_place, bearing_diff};
use geocoord::ellipsoid::Datum;
use geocoord::geodesic::Shape;
use geocoord::geodetic::GeodeticPosition;
use geocoord::load_policy::{LoadPolicy, RepresentationKind};
use geocoord::position::invalidation::{DatumScope, DatumTarget};
use geocoord::time::{default_instant, epoch_from_jd, julian_day};
use geocoord::{GeoCoordError, Position};

#[test]
fn construct_and_read_back() {
    for (lat, lon) in [
        (0.0, 0.0),
        (25.0, 25.0),
        (-33.8568, 151.2153),
        (90.0, -180.0),
        (-89.999999, 179.999999),
        (40.446195, -79.948862),
    ] {
        let position = Position::new(lat, lon).unwrap();
        assert_same_place(&position, lat, lon, 1e-9);

        let parts = position.geodetic().latitude_part();
        let rebuilt = parts.hemisphere().sign()
            * (parts.degrees() as f64 + parts.minutes() as f64 / 60.0 + parts.seconds() / 3600.0);
        assert_relative_eq!(rebuilt, lat, epsilon = 1e-9);
    }
}

#[test]
fn move_by_and_back() {
    for shape in [Shape::Sphere, Shape::Ellipsoid] {
        for (distance, bearing) in [(10_000.0, 25.0), (850_000.0, 310.0), (2_500_000.0, 181.0)] {
            let mut position = Position::new(25.0, 25.0).unwrap();
            let outcome = position.move_by(distance, bearing, shape).unwrap();
            assert!(outcome.converged);

            let back = position
                .move_by(distance, outcome.final_bearing + 180.0, shape)
                .unwrap();
            assert!(back.converged);
            assert_same_place(&position, 25.0, 25.0, 1e-8);
        }
    }
}

#[test]
fn move_by_reference_destination() {
    let mut position = Position::new(25.0, 25.0).unwrap();
    position.move_by(10_000.0, 25.0, Shape::Ellipsoid).unwrap();
    assert_same_place(&position, 25.0815, 25.0418, 1e-3);
}

#[test]
fn east_stays_east() {
    // a move toward the east must increase an east-positive longitude
    let mut position = Position::new(0.0, 0.0).unwrap();
    position.move_by(1_000_000.0, 90.0, Shape::Ellipsoid).unwrap();
    assert_relative_eq!(position.latitude(), 0.0, epsilon = 1e-9);
    assert_relative_eq!(position.longitude(), 8.993216059, epsilon = 1e-8);

    let mut position = Position::new(10.0, 179.9).unwrap();
    position.move_by(50_000.0, 90.0, Shape::Sphere).unwrap();
    assert!(position.longitude() < -179.0);

    let origin = Position::new(10.0, 10.0).unwrap();
    let east = GeodeticPosition::new(10.0, 11.0).unwrap();
    let west = GeodeticPosition::new(10.0, 9.0).unwrap();
    assert!(bearing_diff(origin.distance_to(&east, Shape::Sphere).initial_bearing, 90.0) < 1.0);
    assert!(bearing_diff(origin.distance_to(&west, Shape::Sphere).initial_bearing, 270.0) < 1.0);
}

#[test]
fn reference_distances() {
    let start = Position::new(25.0, 25.0).unwrap();
    let target = GeodeticPosition::new(28.0, 30.0).unwrap();

    let sphere = start.distance_to(&target, Shape::Sphere);
    assert_relative_eq!(sphere.meters / 1000.0, 598.93, epsilon = 1e-2);

    let ellipsoid = start.distance_to(&target, Shape::Ellipsoid);
    assert_relative_eq!(ellipsoid.meters / 1000.0, 599.00, epsilon = 1e-2);
    assert!(ellipsoid.converged);
}

#[test]
fn non_convergence_reaches_the_caller() {
    let start = Position::new(0.0, 0.0).unwrap();
    let target = GeodeticPosition::new(0.0, 179.9).unwrap();

    let ellipsoid = start.distance_to(&target, Shape::Ellipsoid);
    assert!(!ellipsoid.converged);
    assert!(ellipsoid.meters.is_finite());

    let sphere = start.distance_to(&target, Shape::Sphere);
    assert!(sphere.converged);
}

#[test]
fn distance_is_symmetric() {
    let a = Position::new(25.0, 25.0).unwrap();
    let b = Position::new(-12.5, 130.25).unwrap();

    for shape in [Shape::Sphere, Shape::Ellipsoid] {
        let ab = a.distance_to(b.geodetic(), shape);
        let ba = b.distance_to(a.geodetic(), shape);
        assert_relative_eq!(ab.meters, ba.meters, epsilon = 1e-4);
        assert_relative_eq!(bearing_diff(ab.initial_bearing, ba.final_bearing), 180.0, epsilon = 1e-6);
    }
}

#[test]
fn coincident_points() {
    let position = Position::new(25.0, 25.0).unwrap();
    for shape in [Shape::Sphere, Shape::Ellipsoid] {
        let d = position.distance_to(position.geodetic(), shape);
        assert_eq!(d.meters, 0.0);
        assert_eq!(d.initial_bearing, 0.0);
        assert!(d.converged);
    }
}

#[test]
fn datum_change_moves_grid_and_ecef_only() {
    let mut position = Position::new(25.0, 25.0).unwrap();
    let geodetic = *position.geodetic();
    let easting = position.grid().unwrap().utm().easting;
    let x = position.cartesian().unwrap().x();
    let celestial = position.celestial().cloned();

    let report = position.set_datum(6_378_388.0, 297.0).unwrap();
    assert!(report.is_complete());
    assert_eq!(
        report.refreshed,
        vec![RepresentationKind::Grid, RepresentationKind::Cartesian]
    );

    assert_eq!(position.geodetic(), &geodetic);
    assert_relative_eq!(position.grid().unwrap().utm().easting, 298_145.592, epsilon = 1e-3);
    assert!((position.grid().unwrap().utm().easting - easting).abs() > 1.0);
    assert!((position.cartesian().unwrap().x() - x).abs() > 1.0);
    assert_eq!(position.grid().unwrap().datum(), &Datum::International1924.parameters());
    assert_eq!(position.celestial().cloned(), celestial);
}

#[test]
fn geodetic_only_datum_changes_no_output() {
    let mut position = Position::new(25.0, 25.0).unwrap();
    let grid = position.grid().cloned();
    let cartesian = position.cartesian().cloned();

    let report = position
        .set_datum_scoped(6_378_388.0, 297.0, DatumScope::geodetic_only())
        .unwrap();
    assert!(report.refreshed.is_empty());
    assert_eq!(position.grid().cloned(), grid);
    assert_eq!(position.cartesian().cloned(), cartesian);
    assert_eq!(position.ellipsoid(), &Datum::International1924.parameters());

    // the stale representation catches up on an explicit refresh
    position.refresh(RepresentationKind::Grid).unwrap();
    assert_relative_eq!(position.grid().unwrap().utm().easting, 298_145.592, epsilon = 1e-3);
}

#[test]
fn scoped_datum_on_lazy_position_reports_skips() {
    let mut position =
        Position::with_policy(25.0, 25.0, default_instant(), LoadPolicy::lazy()).unwrap();
    let scope = DatumScope::of(&[DatumTarget::Grid, DatumTarget::Cartesian]);

    let report = position.set_datum_scoped(6_378_388.0, 297.0, scope).unwrap();
    assert!(report.refreshed.is_empty());
    assert_eq!(report.skipped.len(), 2);
    assert!(matches!(
        report.require_all(),
        Err(GeoCoordError::Precondition(RepresentationKind::Grid))
    ));
    assert!(position.grid().is_none());
}

#[test]
fn lazy_load_matches_eager() {
    let instant = epoch_from_jd(2_460_483.0);
    let eager = Position::with_instant(48.8566, 2.3522, instant).unwrap();
    let mut lazy = Position::with_policy(48.8566, 2.3522, instant, LoadPolicy::lazy()).unwrap();

    lazy.load_grid();
    lazy.load_cartesian();
    lazy.load_celestial();
    assert_eq!(lazy.grid(), eager.grid());
    assert_eq!(lazy.cartesian(), eager.cartesian());
    assert_eq!(lazy.celestial(), eager.celestial());

    // loading twice changes nothing
    lazy.load_grid();
    assert_eq!(lazy.grid(), eager.grid());
}

#[test]
fn celestial_follows_instant_and_place() {
    let mut position =
        Position::with_instant(48.8566, 2.3522, epoch_from_jd(2_460_483.0)).unwrap();
    let noon = position.celestial().unwrap().sun_altaz.altitude;
    assert_relative_eq!(noon, 64.54, epsilon = 0.05);

    position.set_instant(epoch_from_jd(2_460_483.5));
    let celestial = position.celestial().unwrap();
    assert_relative_eq!(julian_day(celestial.instant()), 2_460_483.5, epsilon = 1e-9);
    assert!(celestial.sun_altaz.altitude < 0.0);
    assert!(!celestial.sun_up);

    position.set_latitude(-48.8566).unwrap();
    assert!(position.celestial().unwrap().sun_altaz.altitude < noon);
}

#[test]
fn clones_are_independent() {
    let original = Position::new(25.0, 25.0).unwrap();
    let mut copy = original.clone();
    copy.set_geodetic(30.0, 30.0).unwrap();
    copy.set_named_datum(Datum::Airy1830);

    assert_same_place(&original, 25.0, 25.0, 0.0);
    assert_eq!(original.ellipsoid(), &Datum::Wgs84.parameters());
    assert_eq!(original.grid().unwrap().utm().zone, 35);
    assert_eq!(copy.grid().unwrap().utm().zone, 36);
}
