//! # Free-text coordinate parsing
//!
//! The [`CoordinateParser`] trait is the boundary between raw text and a
//! [`Position`](crate::position::Position). A parser either recognizes the whole input or returns
//! `None`; it never yields a partially filled coordinate.
//!
//! ## Recognized forms ([`RegexParser`])
//!
//! | Form | Example | Tag |
//! |------|---------|-----|
//! | signed decimal degrees | `48.8583, -2.2945` | [`FormatTag::DecimalDegrees`] |
//! | decimal degrees with hemispheres | `48.8583 N 2.2945 W` | [`FormatTag::DecimalDegrees`] |
//! | degrees, decimal minutes | `48°51.498'N 2°17.67'E` | [`FormatTag::DegreesDecimalMinutes`] |
//! | degrees, minutes, seconds | `40°26'46"N 79°58'56"W` | [`FormatTag::DegreesMinutesSeconds`] |
//! | UTM | `31U 448251 5411943` | [`FormatTag::Utm`] |
//! | earth-centered triple (meters) | `4201161.1, 168332.1, 4780454.2` | [`FormatTag::Ecef`] |
//! | unit-sphere triple | `0.62, 0.02, 0.78` | [`FormatTag::UnitSphere`] |
//!
//! A Cartesian triple whose norm is below 2 is read as a direction on the unit sphere; otherwise
//! it is read as an ECEF position on WGS84 and must lie at least 1000 km from the geocenter.
//! Hemisphere letters are upper case; the lower-case `d`, `m` and `s` are unit markers.

use std::sync::LazyLock;

use log::debug;
use nalgebra::Vector3;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::constants::{Degree, Meter};
use crate::conversion::parse_sexagesimal;
use crate::ecef::ecef_to_geodetic;
use crate::ellipsoid::EllipsoidParameters;
use crate::geodetic::{CoordinateKind, Hemisphere};
use crate::grid::utm::UtmCoordinate;

/// Surface form a position was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FormatTag {
    #[default]
    DecimalDegrees,
    DegreesMinutesSeconds,
    DegreesDecimalMinutes,
    Utm,
    Ecef,
    UnitSphere,
}

/// Interpretation of a Cartesian triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CartesianKind {
    /// Earth-centered earth-fixed, meters.
    EarthCentered,
    /// Direction on the unit sphere.
    Spherical,
}

/// A successfully parsed coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedCoordinate {
    pub latitude: Degree,
    pub longitude: Degree,
    pub cartesian: Option<CartesianKind>,
    pub format: FormatTag,
    /// Height above the ellipsoid, only for earth-centered input.
    pub height: Option<Meter>,
}

pub trait CoordinateParser {
    fn try_parse(&self, text: &str) -> Option<ParsedCoordinate>;
}

/// Default parser, one regular expression per family of forms.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexParser;

const NUMBER: &str = r"[+-]?\d+(?:\.\d+)?(?:[eE][+-]?\d+)?";
const SEPARATOR: &str = r"(?:\s*[,;]\s*|\s+)";

/// Norm under which a triple is a unit-sphere direction.
const UNIT_SPHERE_LIMIT: f64 = 2.0;
/// Minimal geocentric distance of an earth-centered triple.
const MIN_ECEF_NORM: Meter = 1_000_000.0;

struct Patterns {
    decimal: Regex,
    triple: Regex,
    utm: Regex,
    /// `N 40 26 46, W 79 58 56`
    leading_letters: Regex,
    /// `40 26 46 N, 79 58 56 W`
    trailing_letters: Regex,
}

fn angle_pattern(prefix: &str) -> String {
    format!(
        r#"(?P<{prefix}d>\d+(?:\.\d+)?)\s*(?:°|º|deg|d)?\s*(?:(?P<{prefix}m>\d+(?:\.\d+)?)\s*(?:'|′|min|m)?\s*)?(?:(?P<{prefix}s>\d+(?:\.\d+)?)\s*(?:"|″|''|sec|s)?)?"#
    )
}

impl Patterns {
    fn compile() -> Result<Self, regex::Error> {
        Ok(Patterns {
            decimal: Regex::new(&format!(
                r"^\s*(?P<lat>{NUMBER}){SEPARATOR}(?P<lon>{NUMBER})\s*$"
            ))?,
            triple: Regex::new(&format!(
                r"^\s*(?P<x>{NUMBER}){SEPARATOR}(?P<y>{NUMBER}){SEPARATOR}(?P<z>{NUMBER})\s*$"
            ))?,
            utm: Regex::new(
                r"^\s*(?P<zone>\d{1,2})\s*(?P<band>[C-HJ-NP-Xc-hj-np-x])\s+(?P<e>\d+(?:\.\d+)?)(?:\s*m?E)?(?:\s*[,;]\s*|\s+)(?P<n>\d+(?:\.\d+)?)(?:\s*m?N)?\s*$",
            )?,
            leading_letters: Regex::new(&format!(
                r"^\s*(?P<ah>[NSEW])\s*{}\s*[,;/]?\s*(?P<bh>[NSEW])\s*{}\s*$",
                angle_pattern("a"),
                angle_pattern("b")
            ))?,
            trailing_letters: Regex::new(&format!(
                r"^\s*{}\s*(?P<ah>[NSEW])\s*[,;/]?\s*{}\s*(?P<bh>[NSEW])\s*$",
                angle_pattern("a"),
                angle_pattern("b")
            ))?,
        })
    }
}

static PATTERNS: LazyLock<Result<Patterns, regex::Error>> = LazyLock::new(Patterns::compile);

fn number(caps: &Captures<'_>, name: &str) -> Option<f64> {
    caps.name(name)?.as_str().parse::<f64>().ok()
}

/// Signed decimal angle of one half of a hemisphere-lettered pair, with its sexagesimal depth
/// (1: degrees only, 2: with minutes, 3: with seconds).
fn lettered_angle(caps: &Captures<'_>, prefix: &str) -> Option<(Hemisphere, Degree, usize)> {
    let group = |suffix: &str| caps.name(&format!("{prefix}{suffix}"));
    let letter = group("h")?.as_str().chars().next()?;
    let hemisphere = Hemisphere::from_letter(letter)?;

    let fields: Vec<&str> = ["d", "m", "s"]
        .iter()
        .map_while(|suffix| group(suffix).map(|m| m.as_str()))
        .collect();
    // seconds without minutes are meaningless
    if group("s").is_some() && group("m").is_none() {
        return None;
    }
    let magnitude = parse_sexagesimal(&fields)?;
    let value = hemisphere.kind().check(hemisphere.sign() * magnitude).ok()?;
    Some((hemisphere, value, fields.len()))
}

impl RegexParser {
    fn parse_decimal(patterns: &Patterns, text: &str) -> Option<ParsedCoordinate> {
        let caps = patterns.decimal.captures(text)?;
        let latitude = CoordinateKind::Latitude.check(number(&caps, "lat")?).ok()?;
        let longitude = CoordinateKind::Longitude.check(number(&caps, "lon")?).ok()?;
        Some(ParsedCoordinate {
            latitude,
            longitude,
            cartesian: None,
            format: FormatTag::DecimalDegrees,
            height: None,
        })
    }

    fn parse_lettered(patterns: &Patterns, text: &str) -> Option<ParsedCoordinate> {
        let caps = patterns
            .trailing_letters
            .captures(text)
            .or_else(|| patterns.leading_letters.captures(text))?;
        let first = lettered_angle(&caps, "a")?;
        let second = lettered_angle(&caps, "b")?;

        let (lat, lon) = match (first.0.kind(), second.0.kind()) {
            (CoordinateKind::Latitude, CoordinateKind::Longitude) => (first, second),
            (CoordinateKind::Longitude, CoordinateKind::Latitude) => (second, first),
            _ => return None,
        };
        let format = match lat.2.max(lon.2) {
            3 => FormatTag::DegreesMinutesSeconds,
            2 => FormatTag::DegreesDecimalMinutes,
            _ => FormatTag::DecimalDegrees,
        };
        Some(ParsedCoordinate {
            latitude: lat.1,
            longitude: lon.1,
            cartesian: None,
            format,
            height: None,
        })
    }

    fn parse_utm(patterns: &Patterns, text: &str) -> Option<ParsedCoordinate> {
        let caps = patterns.utm.captures(text)?;
        let zone = caps.name("zone")?.as_str().parse::<u8>().ok()?;
        let band = caps.name("band")?.as_str().chars().next()?;
        let utm = UtmCoordinate::new(zone, band, number(&caps, "e")?, number(&caps, "n")?).ok()?;
        let geodetic = utm.to_geodetic(&EllipsoidParameters::WGS84).ok()?;
        Some(ParsedCoordinate {
            latitude: geodetic.latitude(),
            longitude: geodetic.longitude(),
            cartesian: None,
            format: FormatTag::Utm,
            height: None,
        })
    }

    fn parse_triple(patterns: &Patterns, text: &str) -> Option<ParsedCoordinate> {
        let caps = patterns.triple.captures(text)?;
        let v = Vector3::new(number(&caps, "x")?, number(&caps, "y")?, number(&caps, "z")?);
        let norm = v.norm();
        if !norm.is_finite() || norm == 0.0 {
            return None;
        }

        if norm < UNIT_SPHERE_LIMIT {
            let latitude = (v.z / norm)
                .clamp(-1.0, 1.0)
                .asin()
                .to_degrees()
                .clamp(-90.0, 90.0);
            let longitude = v.y.atan2(v.x).to_degrees();
            return Some(ParsedCoordinate {
                latitude,
                longitude,
                cartesian: Some(CartesianKind::Spherical),
                format: FormatTag::UnitSphere,
                height: None,
            });
        }
        if norm < MIN_ECEF_NORM {
            return None;
        }

        let (latitude, longitude, height) = ecef_to_geodetic(&v, &EllipsoidParameters::WGS84);
        Some(ParsedCoordinate {
            latitude: latitude.to_degrees(),
            longitude: longitude.to_degrees(),
            cartesian: Some(CartesianKind::EarthCentered),
            format: FormatTag::Ecef,
            height: Some(height),
        })
    }
}

impl CoordinateParser for RegexParser {
    fn try_parse(&self, text: &str) -> Option<ParsedCoordinate> {
        let patterns = match PATTERNS.as_ref() {
            Ok(patterns) => patterns,
            Err(err) => {
                debug!("coordinate patterns failed to compile: {err}");
                return None;
            }
        };

        let parsed = Self::parse_decimal(patterns, text)
            .or_else(|| Self::parse_triple(patterns, text))
            .or_else(|| Self::parse_utm(patterns, text))
            .or_else(|| Self::parse_lettered(patterns, text));

        if parsed.is_none() {
            debug!("no coordinate form matches {text:?}");
        }
        parsed
    }
}

#[cfg(test)]
mod parser_test {
    use super::*;
    use approx::assert_relative_eq;

    fn parse(text: &str) -> Option<ParsedCoordinate> {
        RegexParser.try_parse(text)
    }

    #[test]
    fn test_signed_decimal() {
        let p = parse("48.8583, -2.2945").unwrap();
        assert_eq!(p.format, FormatTag::DecimalDegrees);
        assert_eq!((p.latitude, p.longitude), (48.8583, -2.2945));
        assert_eq!(parse(" -33.8568 151.2153 ").unwrap().latitude, -33.8568);
        assert!(parse("91.0, 10.0").is_none());
        assert!(parse("10.0, 180.5").is_none());
    }

    #[test]
    fn test_dms_and_ddm() {
        let p = parse(r#"40°26'46.302"N 79°56'55.903"W"#).unwrap();
        assert_eq!(p.format, FormatTag::DegreesMinutesSeconds);
        assert_relative_eq!(p.latitude, 40.446195, epsilon = 1e-9);
        assert_relative_eq!(p.longitude, -79.948862, epsilon = 1e-6);

        let p = parse("40 26.7717 N, 79 56.93172 W").unwrap();
        assert_eq!(p.format, FormatTag::DegreesDecimalMinutes);
        assert_relative_eq!(p.latitude, 40.446195, epsilon = 1e-7);

        let p = parse("E 2.2945 N 48.8583").unwrap();
        assert_eq!(p.format, FormatTag::DecimalDegrees);
        assert_eq!((p.latitude, p.longitude), (48.8583, 2.2945));

        let p = parse("N 40 26 46, W 79 58 56").unwrap();
        assert_eq!(p.format, FormatTag::DegreesMinutesSeconds);
        assert!(p.longitude < -79.0);

        assert!(parse("40 26 46 N 79 58 56 N").is_none());
        assert!(parse("40 26 46 79 58 56 W").is_none());
        assert!(parse("40 61 N 79 58 W").is_none());
    }

    #[test]
    fn test_utm() {
        let p = parse("31U 448252 5411944").unwrap();
        assert_eq!(p.format, FormatTag::Utm);
        assert_relative_eq!(p.latitude, 48.8583, epsilon = 1e-4);
        assert_relative_eq!(p.longitude, 2.2945, epsilon = 1e-4);
        assert!(parse("61U 448252 5411944").is_none());
    }

    #[test]
    fn test_cartesian_triples() {
        let p = parse("4201161.127, 168332.130, 4780454.244").unwrap();
        assert_eq!(p.cartesian, Some(CartesianKind::EarthCentered));
        assert_eq!(p.format, FormatTag::Ecef);
        assert_relative_eq!(p.latitude, 48.8583, epsilon = 1e-7);
        assert_relative_eq!(p.longitude, 2.2945, epsilon = 1e-7);
        assert_relative_eq!(p.height.unwrap(), 330.0, epsilon = 1e-3);

        let p = parse("0 0 1").unwrap();
        assert_eq!(p.cartesian, Some(CartesianKind::Spherical));
        assert_eq!(p.latitude, 90.0);
        assert_eq!(p.height, None);

        // neither a unit vector nor a point near the earth's surface
        assert!(parse("40 26 46").is_none());
    }

    #[test]
    fn test_garbage() {
        assert!(parse("").is_none());
        assert!(parse("somewhere over the rainbow").is_none());
        assert!(parse("12").is_none());
    }
}
