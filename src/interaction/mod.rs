mod constrained_transform;
mod constraints;
mod pan_zoom;
mod touch;
mod zoom_factor_resolver;

use serde::{Deserialize, Serialize};

pub use constrained_transform::{
    ConstrainedPan, EdgeSnap, constrain_zoom_extents, constrain_zoom_values, constrained_translation,
    constrained_zoom,
};
pub use constraints::PanZoomConstraints;
pub use pan_zoom::PanZoomController;
pub use touch::TouchTracker;
pub use zoom_factor_resolver::{PIXELS_PER_LINE, resolve_pinch_zoom_factor, resolve_wheel_zoom_factor};

/// Unit of a wheel event's delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeltaMode {
    #[default]
    Pixel,
    Line,
    Page,
}

/// Wheel input in the host's native units. Positive `delta_y` zooms out.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelEvent {
    pub delta_y: f64,
    #[serde(default)]
    pub delta_mode: DeltaMode,
}

impl WheelEvent {
    #[must_use]
    pub fn pixels(delta_y: f64) -> Self {
        Self {
            delta_y,
            delta_mode: DeltaMode::Pixel,
        }
    }

    #[must_use]
    pub fn lines(delta_y: f64) -> Self {
        Self {
            delta_y,
            delta_mode: DeltaMode::Line,
        }
    }
}

/// Host-assigned identifier of one touch point, stable for its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TouchId(pub u64);
