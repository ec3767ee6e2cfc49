use chrono::{DateTime, Datelike, NaiveDate, Utc};

use crate::core::linear_scale::tick_step;
use crate::core::primitives::{MILLIS_PER_DAY, datetime_to_unix_millis, unix_millis_to_datetime};
use crate::core::quantitative_scale::{QuantitativeKind, QuantitativeScale};
use crate::error::{ChartError, ChartResult};

/// Temporal kind: UTC timestamps, handled internally as epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Time;

pub type TimeScale = QuantitativeScale<Time>;

const SECOND: f64 = 1_000.0;
const MINUTE: f64 = 60.0 * SECOND;
const HOUR: f64 = 60.0 * MINUTE;
const WEEK: f64 = 7.0 * MILLIS_PER_DAY;
const MONTH: f64 = 30.0 * MILLIS_PER_DAY;
const YEAR: f64 = 365.0 * MILLIS_PER_DAY;
// 1970-01-04 is the first Sunday after the epoch.
const FIRST_SUNDAY: f64 = 3.0 * MILLIS_PER_DAY;

/// Calendar step a time domain can snap to.
#[derive(Debug, Clone, Copy, PartialEq)]
enum TimeInterval {
    Millis(f64),
    Weeks,
    Months(u32),
    Years(i32),
}

const INTERVAL_LADDER: [(TimeInterval, f64); 18] = [
    (TimeInterval::Millis(SECOND), SECOND),
    (TimeInterval::Millis(5.0 * SECOND), 5.0 * SECOND),
    (TimeInterval::Millis(15.0 * SECOND), 15.0 * SECOND),
    (TimeInterval::Millis(30.0 * SECOND), 30.0 * SECOND),
    (TimeInterval::Millis(MINUTE), MINUTE),
    (TimeInterval::Millis(5.0 * MINUTE), 5.0 * MINUTE),
    (TimeInterval::Millis(15.0 * MINUTE), 15.0 * MINUTE),
    (TimeInterval::Millis(30.0 * MINUTE), 30.0 * MINUTE),
    (TimeInterval::Millis(HOUR), HOUR),
    (TimeInterval::Millis(3.0 * HOUR), 3.0 * HOUR),
    (TimeInterval::Millis(6.0 * HOUR), 6.0 * HOUR),
    (TimeInterval::Millis(12.0 * HOUR), 12.0 * HOUR),
    (TimeInterval::Millis(MILLIS_PER_DAY), MILLIS_PER_DAY),
    (TimeInterval::Millis(2.0 * MILLIS_PER_DAY), 2.0 * MILLIS_PER_DAY),
    (TimeInterval::Weeks, WEEK),
    (TimeInterval::Months(1), MONTH),
    (TimeInterval::Months(3), 3.0 * MONTH),
    (TimeInterval::Years(1), YEAR),
];

impl QuantitativeKind for Time {
    type Value = DateTime<Utc>;

    fn to_numeric(value: &DateTime<Utc>) -> f64 {
        datetime_to_unix_millis(*value)
    }

    fn from_numeric(value: f64) -> DateTime<Utc> {
        unix_millis_to_datetime(value)
    }

    fn default_extent() -> (f64, f64) {
        (0.0, MILLIS_PER_DAY)
    }

    fn expand_single_value(value: f64) -> (f64, f64) {
        (value - MILLIS_PER_DAY, value + MILLIS_PER_DAY)
    }

    fn nice_domain(domain: (f64, f64), count: usize) -> (f64, f64) {
        let (start, stop) = domain;
        if !start.is_finite() || !stop.is_finite() || start >= stop {
            return domain;
        }
        let interval = select_interval(start, stop, count);
        (floor_to(interval, start), ceil_to(interval, stop))
    }

    fn validate_domain(start: f64, end: f64) -> ChartResult<()> {
        if end < start {
            return Err(ChartError::InvalidData(
                "time scale domain values must be in chronological order".to_owned(),
            ));
        }
        Ok(())
    }
}

fn select_interval(start: f64, stop: f64, count: usize) -> TimeInterval {
    let target = (stop - start) / (count.max(1) as f64);
    let index = INTERVAL_LADDER.partition_point(|(_, duration)| *duration <= target);
    if index == INTERVAL_LADDER.len() {
        let years = tick_step(start / YEAR, stop / YEAR, count).max(1.0);
        return TimeInterval::Years(years as i32);
    }
    if index == 0 {
        return TimeInterval::Millis(tick_step(start, stop, count).max(1.0));
    }
    let (below, below_duration) = INTERVAL_LADDER[index - 1];
    let (above, above_duration) = INTERVAL_LADDER[index];
    if target / below_duration < above_duration / target {
        below
    } else {
        above
    }
}

fn floor_to(interval: TimeInterval, millis: f64) -> f64 {
    match interval {
        TimeInterval::Millis(step) => (millis / step).floor() * step,
        TimeInterval::Weeks => ((millis - FIRST_SUNDAY) / WEEK).floor() * WEEK + FIRST_SUNDAY,
        TimeInterval::Months(step) => {
            let time = unix_millis_to_datetime(millis);
            let month0 = time.month0() - time.month0() % step;
            month_start(time.year(), month0).unwrap_or(millis)
        }
        TimeInterval::Years(step) => {
            let year = unix_millis_to_datetime(millis).year();
            month_start(year - year.rem_euclid(step.max(1)), 0).unwrap_or(millis)
        }
    }
}

fn ceil_to(interval: TimeInterval, millis: f64) -> f64 {
    let floored = floor_to(interval, millis);
    if floored >= millis {
        return floored;
    }
    match interval {
        TimeInterval::Millis(step) => floored + step,
        TimeInterval::Weeks => floored + WEEK,
        TimeInterval::Months(step) => {
            let time = unix_millis_to_datetime(floored);
            let months = time.year() * 12 + time.month0() as i32 + step as i32;
            month_start(months.div_euclid(12), months.rem_euclid(12) as u32).unwrap_or(millis)
        }
        TimeInterval::Years(step) => {
            let year = unix_millis_to_datetime(floored).year();
            month_start(year + step.max(1), 0).unwrap_or(millis)
        }
    }
}

fn month_start(year: i32, month0: u32) -> Option<f64> {
    let date = NaiveDate::from_ymd_opt(year, month0 + 1, 1)?;
    let time = date.and_hms_opt(0, 0, 0)?.and_utc();
    Some(datetime_to_unix_millis(time))
}

#[cfg(test)]
mod tests {
    use super::{HOUR, MILLIS_PER_DAY, Time};
    use crate::core::primitives::datetime_to_unix_millis;
    use crate::core::quantitative_scale::QuantitativeKind;
    use chrono::{TimeZone, Utc};

    fn millis(y: i32, m: u32, d: u32, h: u32, min: u32) -> f64 {
        datetime_to_unix_millis(Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap())
    }

    #[test]
    fn nice_snaps_hours_for_a_day_long_span() {
        let start = millis(2024, 5, 10, 1, 17);
        let stop = millis(2024, 5, 11, 0, 40);
        let (nice_start, nice_stop) = Time::nice_domain((start, stop), 10);
        assert_eq!(nice_start, millis(2024, 5, 10, 0, 0));
        assert_eq!(nice_stop, millis(2024, 5, 11, 3, 0));
        assert_eq!((nice_stop - nice_start) % (3.0 * HOUR), 0.0);
    }

    #[test]
    fn nice_snaps_to_month_starts_for_multi_month_spans() {
        let start = millis(2023, 2, 14, 0, 0);
        let stop = millis(2023, 11, 3, 0, 0);
        let (nice_start, nice_stop) = Time::nice_domain((start, stop), 10);
        assert_eq!(nice_start, millis(2023, 2, 1, 0, 0));
        assert_eq!(nice_stop, millis(2023, 12, 1, 0, 0));
    }

    #[test]
    fn single_value_expands_by_one_day() {
        let value = millis(2020, 1, 1, 0, 0);
        assert_eq!(
            Time::expand_single_value(value),
            (value - MILLIS_PER_DAY, value + MILLIS_PER_DAY)
        );
    }

    #[test]
    fn reversed_domain_is_rejected() {
        assert!(Time::validate_domain(10.0, 0.0).is_err());
        assert!(Time::validate_domain(0.0, 10.0).is_ok());
    }
}
