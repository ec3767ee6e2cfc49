use tracing::warn;

use super::{DeltaMode, WheelEvent};

/// Pixels a line- or page-based wheel delta counts for.
pub const PIXELS_PER_LINE: f64 = 120.0;

const WHEEL_ZOOM_RATE: f64 = 0.002;
const MIN_PINCH_DISTANCE: f64 = 1e-9;

/// Zoom factor for one wheel event: `2^(pixels * 0.002)`.
///
/// Returns `None` when the event would not zoom.
#[must_use]
pub fn resolve_wheel_zoom_factor(event: WheelEvent) -> Option<f64> {
    if event.delta_y == 0.0 || !event.delta_y.is_finite() {
        return None;
    }
    let pixels = match event.delta_mode {
        DeltaMode::Pixel => event.delta_y,
        DeltaMode::Line | DeltaMode::Page => event.delta_y * PIXELS_PER_LINE,
    };
    let factor = 2.0_f64.powf(pixels * WHEEL_ZOOM_RATE);
    (factor.is_finite() && factor > 0.0).then_some(factor)
}

/// Zoom factor for a pinch that moved fingers from `old_distance` apart to
/// `new_distance` apart. Spreading fingers zooms in.
///
/// Returns `None` for degenerate distances, which happen whenever two
/// fingers briefly overlap.
#[must_use]
pub fn resolve_pinch_zoom_factor(old_distance: f64, new_distance: f64) -> Option<f64> {
    if pinch_distance_is_degenerate(old_distance) || pinch_distance_is_degenerate(new_distance) {
        warn!(
            old_distance,
            new_distance, "ignoring pinch with near-zero finger distance"
        );
        return None;
    }
    let factor = old_distance / new_distance;
    factor.is_finite().then_some(factor)
}

fn pinch_distance_is_degenerate(distance: f64) -> bool {
    !distance.is_finite() || distance <= MIN_PINCH_DISTANCE
}

#[cfg(test)]
mod tests {
    use super::{resolve_pinch_zoom_factor, resolve_wheel_zoom_factor};
    use crate::interaction::WheelEvent;

    #[test]
    fn zero_wheel_delta_returns_none() {
        assert!(resolve_wheel_zoom_factor(WheelEvent::pixels(0.0)).is_none());
        assert!(resolve_wheel_zoom_factor(WheelEvent::pixels(f64::NAN)).is_none());
    }

    #[test]
    fn positive_wheel_delta_zooms_out() {
        let factor = resolve_wheel_zoom_factor(WheelEvent::pixels(500.0)).expect("factor");
        assert!((factor - 2.0).abs() < 1e-12);

        let factor = resolve_wheel_zoom_factor(WheelEvent::pixels(-500.0)).expect("factor");
        assert!((factor - 0.5).abs() < 1e-12);
    }

    #[test]
    fn line_deltas_are_scaled_to_pixels() {
        let lines = resolve_wheel_zoom_factor(WheelEvent::lines(1.0)).expect("factor");
        let pixels = resolve_wheel_zoom_factor(WheelEvent::pixels(120.0)).expect("factor");
        assert_eq!(lines, pixels);
    }

    #[test]
    fn pinch_factor_is_ratio_of_old_to_new_distance() {
        let factor = resolve_pinch_zoom_factor(100.0, 200.0).expect("factor");
        assert_eq!(factor, 0.5);
    }

    #[test]
    fn degenerate_pinch_distances_are_ignored() {
        assert!(resolve_pinch_zoom_factor(0.0, 10.0).is_none());
        assert!(resolve_pinch_zoom_factor(10.0, 0.0).is_none());
        assert!(resolve_pinch_zoom_factor(f64::NAN, 10.0).is_none());
    }
}
