//! Rise/set times and eclipse predictions.
//!
//! ## Rise and set
//!
//! The altitude of the body is sampled every [`SAMPLE_STEP_MINUTES`] over the UTC day containing
//! the instant. Each pair of consecutive samples that brackets the standard altitude `h0` yields
//! a rise (upward crossing) or a set (downward crossing), located by linear interpolation. The
//! first crossing of each kind is reported; a body that stays above or below `h0` all day has no
//! event.
//!
//! ## Eclipses
//!
//! Eclipses are searched lunation by lunation from the instant onward, using the mean phases of
//! Meeus (*Astronomical Algorithms*, ch. 54). A lunation whose argument of latitude satisfies
//! `|sin F| > 0.36` cannot host an eclipse; the others are classified through the least distance
//! `γ` of the shadow axis and the radius `u` of the umbral cone. Times are in dynamical time and
//! are not corrected for ΔT.

use itertools::Itertools;

use crate::constants::{Degree, JD, RADEG};

/// Sampling step of the rise/set scan.
pub const SAMPLE_STEP_MINUTES: f64 = 10.0;

/// Standard altitude of the Sun's upper limb at rise/set (refraction + semi-diameter), degrees.
pub const SUN_STANDARD_ALTITUDE: Degree = -0.833;

/// Standard altitude of the Moon's center at rise/set for a geocentric altitude, degrees.
pub const MOON_STANDARD_ALTITUDE: Degree = 0.125;

/// Lunations scanned before giving up on an eclipse.
const MAX_LUNATIONS: usize = 60;

/// First upward and downward crossings of `h0` during one UTC day.
///
/// Arguments
/// -----------------
/// * `day_start`: Julian Date of 0h UTC.
/// * `h0`: standard altitude in degrees.
/// * `altitude`: altitude of the body in degrees at a Julian Date.
///
/// Return
/// ----------
/// * `(rise, set)` Julian Dates, each `None` when no crossing happens that day.
pub fn rise_and_set<F>(day_start: JD, h0: Degree, altitude: F) -> (Option<JD>, Option<JD>)
where
    F: Fn(JD) -> Degree,
{
    let step = SAMPLE_STEP_MINUTES / 1440.0;
    let samples = (1440.0 / SAMPLE_STEP_MINUTES) as usize;

    let mut rise = None;
    let mut set = None;

    for ((t0, a0), (t1, a1)) in (0..=samples)
        .map(|i| {
            let t = day_start + i as f64 * step;
            (t, altitude(t) - h0)
        })
        .tuple_windows()
    {
        if rise.is_none() && a0 < 0.0 && a1 >= 0.0 {
            rise = Some(t0 + (t1 - t0) * (-a0) / (a1 - a0));
        }
        if set.is_none() && a0 >= 0.0 && a1 < 0.0 {
            set = Some(t0 + (t1 - t0) * a0 / (a0 - a1));
        }
        if rise.is_some() && set.is_some() {
            break;
        }
    }
    (rise, set)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolarEclipseKind {
    Partial,
    Annular,
    Total,
    /// Annular along part of the track, total along the rest.
    Hybrid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LunarEclipseKind {
    Penumbral,
    Partial,
    Total,
}

/// Time of greatest eclipse (JDE) and its geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarEclipseEvent {
    pub jde: JD,
    pub kind: SolarEclipseKind,
    pub gamma: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LunarEclipseEvent {
    pub jde: JD,
    pub kind: LunarEclipseKind,
    pub gamma: f64,
    /// Umbral magnitude, negative for a penumbral eclipse.
    pub magnitude: f64,
}

/// Geometry of the lunation `k` (integer: new moon, half-integer: full moon).
struct Syzygy {
    jde: JD,
    gamma: f64,
    u: f64,
}

fn syzygy(k: f64, lunar: bool) -> Option<Syzygy> {
    let t = k / 1236.85;
    let t2 = t * t;
    let t3 = t2 * t;
    let t4 = t3 * t;

    let f = 160.7108 + 390.67050284 * k - 0.0016118 * t2 - 0.00000227 * t3 + 0.000000011 * t4;
    if (f * RADEG).sin().abs() > 0.36 {
        return None;
    }

    let mean_jde =
        2451550.09766 + 29.530588861 * k + 0.00015437 * t2 - 0.000000150 * t3 + 0.00000000073 * t4;
    let m = 2.5534 + 29.10535670 * k - 0.0000014 * t2 - 0.00000011 * t3;
    let mp = 201.5643 + 385.81693528 * k + 0.0107582 * t2 + 0.00001238 * t3 - 0.000000058 * t4;
    let omega = 124.7746 - 1.56375588 * k + 0.0020672 * t2 + 0.00000215 * t3;
    let e = 1.0 - 0.002516 * t - 0.0000074 * t2;
    let f1 = f - 0.02665 * (omega * RADEG).sin();
    let a1 = 299.77 + 0.107408 * k - 0.009173 * t2;

    let s = |x: f64| (x * RADEG).sin();
    let c = |x: f64| (x * RADEG).cos();

    let mut correction = if lunar {
        -0.4065 * s(mp) + 0.1727 * e * s(m)
    } else {
        -0.4075 * s(mp) + 0.1721 * e * s(m)
    };
    correction += 0.0161 * s(2.0 * mp) - 0.0097 * s(2.0 * f1) + 0.0073 * e * s(mp - m)
        - 0.0050 * e * s(mp + m)
        - 0.0023 * s(mp - 2.0 * f1)
        + 0.0021 * e * s(2.0 * m)
        + 0.0012 * s(mp + 2.0 * f1)
        + 0.0006 * e * s(2.0 * mp + m)
        - 0.0004 * s(3.0 * mp)
        - 0.0003 * e * s(m + 2.0 * f1)
        + 0.0003 * s(a1)
        - 0.0002 * e * s(m - 2.0 * f1)
        - 0.0002 * e * s(2.0 * mp - m)
        - 0.0002 * s(omega);

    let p = 0.2070 * e * s(m) + 0.0024 * e * s(2.0 * m) - 0.0392 * s(mp) + 0.0116 * s(2.0 * mp)
        - 0.0073 * e * s(mp + m)
        + 0.0067 * e * s(mp - m)
        + 0.0118 * s(2.0 * f1);
    let q = 5.2207 - 0.0048 * e * c(m) + 0.0020 * e * c(2.0 * m) - 0.3299 * c(mp)
        - 0.0060 * e * c(mp + m)
        + 0.0041 * e * c(mp - m);
    let w = c(f1).abs();
    let gamma = (p * c(f1) + q * s(f1)) * (1.0 - 0.0048 * w);
    let u = 0.0059 + 0.0046 * e * c(m) - 0.0182 * c(mp) + 0.0004 * c(2.0 * mp)
        - 0.0005 * c(m + mp);

    Some(Syzygy {
        jde: mean_jde + correction,
        gamma,
        u,
    })
}

fn classify_solar(k: f64) -> Option<SolarEclipseEvent> {
    let Syzygy { jde, gamma, u } = syzygy(k, false)?;
    if gamma.abs() > 1.5433 + u {
        return None;
    }
    let kind = if gamma.abs() >= 0.9972 {
        SolarEclipseKind::Partial
    } else if u < 0.0 {
        SolarEclipseKind::Total
    } else if u > 0.0047 || u >= 0.00464 * (1.0 - gamma * gamma).sqrt() {
        SolarEclipseKind::Annular
    } else {
        SolarEclipseKind::Hybrid
    };
    Some(SolarEclipseEvent { jde, kind, gamma })
}

fn classify_lunar(k: f64) -> Option<LunarEclipseEvent> {
    let Syzygy { jde, gamma, u } = syzygy(k, true)?;
    let penumbral = (1.5573 + u - gamma.abs()) / 0.5450;
    if penumbral <= 0.0 {
        return None;
    }
    let magnitude = (1.0128 - u - gamma.abs()) / 0.5450;
    let kind = if magnitude <= 0.0 {
        LunarEclipseKind::Penumbral
    } else if magnitude >= 1.0 {
        LunarEclipseKind::Total
    } else {
        LunarEclipseKind::Partial
    };
    Some(LunarEclipseEvent {
        jde,
        kind,
        gamma,
        magnitude,
    })
}

/// Index of the lunation whose mean phase precedes `jd`, shifted by `offset` (0 or 0.5).
fn lunation_before(jd: JD, offset: f64) -> f64 {
    ((jd - 2451550.09766) / 29.530588861).floor() - 1.0 + offset
}

/// Next solar eclipse at or after `jd`.
pub fn next_solar_eclipse(jd: JD) -> Option<SolarEclipseEvent> {
    let k0 = lunation_before(jd, 0.0);
    (0..MAX_LUNATIONS)
        .filter_map(|i| classify_solar(k0 + i as f64))
        .find(|event| event.jde >= jd)
}

/// Next lunar eclipse at or after `jd`.
pub fn next_lunar_eclipse(jd: JD) -> Option<LunarEclipseEvent> {
    let k0 = lunation_before(jd, 0.5);
    (0..MAX_LUNATIONS)
        .filter_map(|i| classify_lunar(k0 + i as f64))
        .find(|event| event.jde >= jd)
}

#[cfg(test)]
mod events_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rise_and_set_of_a_sinusoid() {
        // altitude peaks at noon, crosses zero at 6h and 18h
        let day = 2_460_000.5;
        let (rise, set) = rise_and_set(day, 0.0, |t| {
            -30.0 * (2.0 * std::f64::consts::PI * (t - day)).cos()
        });
        assert_relative_eq!(rise.unwrap() - day, 0.25, epsilon = 1e-3);
        assert_relative_eq!(set.unwrap() - day, 0.75, epsilon = 1e-3);
    }

    #[test]
    fn test_no_crossing() {
        let (rise, set) = rise_and_set(2_460_000.5, SUN_STANDARD_ALTITUDE, |_| 10.0);
        assert_eq!((rise, set), (None, None));
    }

    #[test]
    fn test_meeus_examples() {
        // 54.a: partial solar eclipse of 1993 May 21
        let solar = classify_solar(-82.0).unwrap();
        assert_relative_eq!(solar.jde, 2_449_129.0979, epsilon = 1e-4);
        assert_relative_eq!(solar.gamma, 1.1348, epsilon = 1e-4);
        assert_eq!(solar.kind, SolarEclipseKind::Partial);

        // 54.b: penumbral lunar eclipse of 1973 June 15
        let lunar = classify_lunar(-328.5).unwrap();
        assert_relative_eq!(lunar.jde, 2_441_849.3687, epsilon = 1e-3);
        assert_relative_eq!(lunar.gamma, -1.3249, epsilon = 1e-4);
        assert_eq!(lunar.kind, LunarEclipseKind::Penumbral);
    }

    #[test]
    fn test_next_eclipses_from_march_2024() {
        let jd = 2_460_371.5;
        let solar = next_solar_eclipse(jd).unwrap();
        assert_relative_eq!(solar.jde, 2_460_409.263, epsilon = 1e-3);
        assert_eq!(solar.kind, SolarEclipseKind::Total);

        let lunar = next_lunar_eclipse(jd).unwrap();
        assert_relative_eq!(lunar.jde, 2_460_394.802, epsilon = 1e-3);
        assert_eq!(lunar.kind, LunarEclipseKind::Penumbral);
    }
}
