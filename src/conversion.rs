use crate::constants::{Degree, Radian, DPI};

/// Split an unsigned decimal angle into whole degrees, whole minutes and seconds.
///
/// Arguments
/// ---------------
/// * `value`: an angle in degrees; only its magnitude is used
///
/// Return
/// ----------
/// * `(degrees, minutes, seconds)` with `minutes < 60` and `0 <= seconds < 60`
pub fn decimal_to_dms(value: Degree) -> (u32, u32, f64) {
    let abs = value.abs();
    let mut degrees = abs.trunc();
    let total_minutes = (abs - degrees) * 60.0;
    let mut minutes = total_minutes.trunc();
    let mut seconds = (total_minutes - minutes) * 60.0;

    // floating noise such as 59.99999999999 seconds carries into the next minute
    if seconds >= 60.0 - 1e-9 {
        seconds = 0.0;
        minutes += 1.0;
    }
    if minutes >= 60.0 {
        minutes -= 60.0;
        degrees += 1.0;
    }
    (degrees as u32, minutes as u32, seconds)
}

/// Combine degree/minute/second magnitudes into an unsigned decimal angle.
pub fn dms_to_decimal(degrees: f64, minutes: f64, seconds: f64) -> Degree {
    degrees + minutes / 60.0 + seconds / 3600.0
}

/// Parse a sexagesimal angle from one to three numeric fields.
///
/// Arguments
/// ---------
/// * `fields`: `[degrees]`, `[degrees, minutes]` or `[degrees, minutes, seconds]`. Only the
///   last field may carry a fractional part; minutes and seconds must be below 60.
///
/// Returns
/// -------
/// * `Option<Degree>`: the unsigned decimal angle, `None` if the fields are malformed.
pub(crate) fn parse_sexagesimal(fields: &[&str]) -> Option<Degree> {
    if fields.is_empty() || fields.len() > 3 {
        return None;
    }
    let values = fields
        .iter()
        .map(|f| f.trim().parse::<f64>().ok())
        .collect::<Option<Vec<f64>>>()?;

    if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
        return None;
    }
    let leading = &values[..values.len() - 1];
    if leading.iter().any(|v| v.fract() != 0.0) {
        return None;
    }

    match values.as_slice() {
        [d] => Some(*d),
        [d, m] if *m < 60.0 => Some(dms_to_decimal(*d, *m, 0.0)),
        [d, m, s] if *m < 60.0 && *s < 60.0 => Some(dms_to_decimal(*d, *m, *s)),
        _ => None,
    }
}

/// Wrap a longitude into `[-180, 180)`; `180` is kept as `180`.
pub fn normalize_longitude(longitude: Degree) -> Degree {
    if (-180.0..=180.0).contains(&longitude) {
        return longitude;
    }
    (longitude + 180.0).rem_euclid(360.0) - 180.0
}

/// Wrap an angle in radians into `[0, 2π)`.
pub fn normalize_angle(angle: Radian) -> Radian {
    let wrapped = angle.rem_euclid(DPI);
    if wrapped >= DPI {
        0.0
    } else {
        wrapped
    }
}

/// Wrap an angle in degrees into `[0, 360)`.
pub fn normalize_degrees(angle: Degree) -> Degree {
    let wrapped = angle.rem_euclid(360.0);
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}
