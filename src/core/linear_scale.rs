use crate::core::quantitative_scale::{QuantitativeKind, QuantitativeScale};

/// Numeric kind: the domain is plain `f64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Linear;

pub type LinearScale = QuantitativeScale<Linear>;

impl QuantitativeKind for Linear {
    type Value = f64;

    fn to_numeric(value: &f64) -> f64 {
        *value
    }

    fn from_numeric(value: f64) -> f64 {
        value
    }

    fn default_extent() -> (f64, f64) {
        (0.0, 1.0)
    }

    fn expand_single_value(value: f64) -> (f64, f64) {
        (value - 1.0, value + 1.0)
    }

    fn nice_domain(domain: (f64, f64), count: usize) -> (f64, f64) {
        nice_linear(domain, count)
    }
}

const E10: f64 = 7.071_067_811_865_476; // sqrt(50)
const E5: f64 = 3.162_277_660_168_379_5; // sqrt(10)
const E2: f64 = std::f64::consts::SQRT_2;

/// Round tick increment for roughly `count` ticks over `[start, stop]`.
///
/// Positive results are the increment itself; negative results `-k` stand
/// for an increment of `1 / k`, which keeps small steps exact.
#[must_use]
pub fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    let step = (stop - start) / (count.max(1) as f64);
    if !step.is_finite() || step <= 0.0 {
        return 0.0;
    }
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };
    if power >= 0.0 {
        factor * 10f64.powf(power)
    } else {
        -(10f64.powf(-power)) / factor
    }
}

/// Positive round step for roughly `count` ticks over `[start, stop]`.
#[must_use]
pub fn tick_step(start: f64, stop: f64, count: usize) -> f64 {
    let raw = (stop - start).abs() / (count.max(1) as f64);
    if !raw.is_finite() || raw == 0.0 {
        return 0.0;
    }
    let mut step = 10f64.powf(raw.log10().floor());
    let error = raw / step;
    if error >= E10 {
        step *= 10.0;
    } else if error >= E5 {
        step *= 5.0;
    } else if error >= E2 {
        step *= 2.0;
    }
    step
}

/// Extends `domain` outward so both edges land on a round tick increment.
#[must_use]
pub fn nice_linear(domain: (f64, f64), count: usize) -> (f64, f64) {
    let reversed = domain.1 < domain.0;
    let (mut start, mut stop) = if reversed {
        (domain.1, domain.0)
    } else {
        domain
    };
    if !start.is_finite() || !stop.is_finite() || start == stop {
        return domain;
    }

    let mut previous_step = None;
    for _ in 0..10 {
        let step = tick_increment(start, stop, count);
        if previous_step == Some(step) {
            break;
        }
        if step > 0.0 {
            start = (start / step).floor() * step;
            stop = (stop / step).ceil() * step;
        } else if step < 0.0 {
            start = (start * step).ceil() / step;
            stop = (stop * step).floor() / step;
        } else {
            break;
        }
        previous_step = Some(step);
    }

    if reversed { (stop, start) } else { (start, stop) }
}
