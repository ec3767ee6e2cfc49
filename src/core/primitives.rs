use chrono::{DateTime, Utc};

pub const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Performs a zoom of `value` by `zoom` about `center`.
///
/// `zoom < 1` pulls `value` toward `center`, `zoom > 1` pushes it away.
/// `center` itself is a fixed point.
#[must_use]
pub fn zoom_at(value: f64, zoom: f64, center: f64) -> f64 {
    center - (center - value) * zoom
}

/// Returns the `center` that makes `zoom_at(value, zoom, center) == target`.
///
/// Undefined for `zoom == 1`; callers only use it when zooming out.
#[must_use]
pub fn zoom_center_for_target(value: f64, zoom: f64, target: f64) -> f64 {
    (value * zoom - target) / (zoom - 1.0)
}

/// Checks if `x` lies in the inclusive interval spanned by `a` and `b`.
#[must_use]
pub fn in_range(x: f64, a: f64, b: f64) -> bool {
    a.min(b) <= x && x <= a.max(b)
}

#[must_use]
pub fn datetime_to_unix_millis(time: DateTime<Utc>) -> f64 {
    time.timestamp_micros() as f64 / 1000.0
}

/// Converts epoch milliseconds back to a UTC timestamp.
///
/// Values outside chrono's representable range saturate to its min/max.
#[must_use]
pub fn unix_millis_to_datetime(millis: f64) -> DateTime<Utc> {
    let micros = (millis * 1000.0).round();
    if micros.is_nan() {
        return DateTime::<Utc>::default();
    }
    if micros >= i64::MAX as f64 {
        return DateTime::<Utc>::MAX_UTC;
    }
    if micros <= i64::MIN as f64 {
        return DateTime::<Utc>::MIN_UTC;
    }
    DateTime::from_timestamp_micros(micros as i64).unwrap_or(if micros < 0.0 {
        DateTime::<Utc>::MIN_UTC
    } else {
        DateTime::<Utc>::MAX_UTC
    })
}
