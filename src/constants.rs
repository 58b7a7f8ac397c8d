//! # Constants and type definitions for geocoord
//!
//! This module centralizes the **geodetic constants**, **conversion factors**, and **common type
//! aliases** used throughout the crate.
//!
//! ## Overview
//!
//! - Reference ellipsoid defaults (WGS84) and the spherical-earth radius
//! - Unit conversions (degrees ↔ radians, Julian ↔ Modified Julian Dates)
//! - Core type aliases used across the crate
//! - Iteration caps and tolerances of the geodesic solver

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Julian Date of J2000.0 (2000-01-01 12:00:00 TT)
pub const J2000_JD: f64 = 2_451_545.0;

/// Days per Julian century
pub const DAYS_PER_JULIAN_CENTURY: f64 = 36_525.0;

/// Modified Julian Date of J2000.0
pub const T2000: f64 = 51_544.5;

/// Offset between Julian Date and Modified Julian Date
pub const JD_TO_MJD: f64 = 2_400_000.5;

/// WGS84 equatorial radius in meters
pub const WGS84_EQUATORIAL_RADIUS: f64 = 6_378_137.0;

/// WGS84 inverse flattening
pub const WGS84_INVERSE_FLATTENING: f64 = 298.257_223_563;

/// Mean earth radius in meters, used by every spherical-earth computation
pub const MEAN_EARTH_RADIUS: f64 = 6_371_000.0;

/// Mean equatorial radius of the Earth in kilometers, used for lunar parallax
pub const EARTH_RADIUS_KM: f64 = 6_378.14;

// -------------------------------------------------------------------------------------------------
// Solver controls
// -------------------------------------------------------------------------------------------------

/// Maximum iterations of the ellipsoidal direct solve
pub const DIRECT_MAX_ITERATIONS: usize = 20;

/// Maximum iterations of the ellipsoidal inverse solve (slow near antipodes)
pub const INVERSE_MAX_ITERATIONS: usize = 200;

/// Angular convergence tolerance of both ellipsoidal solves, in radians
pub const ANGULAR_TOLERANCE: f64 = 1e-12;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in radians
pub type Radian = f64;
/// Distance in meters
pub type Meter = f64;
/// Distance in kilometers
pub type Kilometer = f64;
/// Julian Date (days)
pub type JD = f64;
/// Modified Julian Date (days)
pub type MJD = f64;
