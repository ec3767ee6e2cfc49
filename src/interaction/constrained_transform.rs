//! Pixel-space math that keeps pan and zoom inside [`PanZoomConstraints`].
//!
//! Everything here reads the scale and returns adjusted gesture parameters;
//! nothing mutates the scale.

use crate::core::primitives::{zoom_at, zoom_center_for_target};
use crate::core::transformable::TransformableScale;

use super::PanZoomConstraints;

/// Domain edge a clamped pan ends up on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EdgeSnap {
    /// The lower domain edge should equal this value after the pan.
    Min(f64),
    /// The upper domain edge should equal this value after the pan.
    Max(f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstrainedPan {
    pub translation: f64,
    /// Set when a value bound limited the translation.
    pub snap: Option<EdgeSnap>,
}

/// Limits `translation` (pixels) so neither domain edge crosses its value
/// bound.
#[must_use]
pub fn constrained_translation(
    scale: &dyn TransformableScale,
    constraints: &PanZoomConstraints,
    translation: f64,
) -> ConstrainedPan {
    let unconstrained = ConstrainedPan {
        translation,
        snap: None,
    };
    if !translation.is_finite() {
        return unconstrained;
    }
    let (domain_min, domain_max) = scale.transformation_domain();
    let reversed = scale.is_range_reversed();

    if (translation > 0.0) != reversed {
        let Some(bound) = constraints.max_domain_value else {
            return unconstrained;
        };
        let current = scale.scale_transformation(domain_max);
        let limit = scale.scale_transformation(bound);
        let target = current + translation;
        let limited = if reversed { target <= limit } else { target >= limit };
        if !limited {
            return unconstrained;
        }
        ConstrainedPan {
            translation: limit - current,
            snap: Some(EdgeSnap::Max(bound)),
        }
    } else {
        let Some(bound) = constraints.min_domain_value else {
            return unconstrained;
        };
        let current = scale.scale_transformation(domain_min);
        let limit = scale.scale_transformation(bound);
        let target = current + translation;
        let limited = if reversed { target >= limit } else { target <= limit };
        if !limited {
            return unconstrained;
        }
        ConstrainedPan {
            translation: limit - current,
            snap: Some(EdgeSnap::Min(bound)),
        }
    }
}

/// Clamps `factor` so the domain extent stays within the extent bounds:
/// the max extent when zooming out, the min extent when zooming in.
#[must_use]
pub fn constrain_zoom_extents(
    scale: &dyn TransformableScale,
    constraints: &PanZoomConstraints,
    factor: f64,
) -> f64 {
    let extent_increasing = factor > 1.0;
    let bound = if extent_increasing {
        constraints.max_domain_extent
    } else {
        constraints.min_domain_extent
    };
    let Some(bound) = bound else {
        return factor;
    };

    let (domain_min, domain_max) = scale.transformation_domain();
    let extent = (domain_max - domain_min).abs();
    if extent == 0.0 || !extent.is_finite() {
        return factor;
    }
    let limit = bound / extent;
    if extent_increasing {
        factor.min(limit)
    } else {
        factor.max(limit)
    }
}

/// Moves the zoom center (and, if both bounds would be crossed, the factor)
/// so a zoom-out never pushes a domain edge past its value bound.
///
/// Returns `(factor, center)`.
#[must_use]
pub fn constrain_zoom_values(
    scale: &dyn TransformableScale,
    constraints: &PanZoomConstraints,
    factor: f64,
    center: f64,
) -> (f64, f64) {
    if factor <= 1.0 {
        return (factor, center);
    }
    let (min_bound, max_bound) = (constraints.min_domain_value, constraints.max_domain_value);
    if min_bound.is_none() && max_bound.is_none() {
        return (factor, center);
    }

    let reversed = scale.is_range_reversed();
    let (domain_min, domain_max) = scale.transformation_domain();
    let current_max = scale.scale_transformation(domain_max);
    let current_min = scale.scale_transformation(domain_min);
    let overflows_max =
        |limit: f64, center: f64| (zoom_at(current_max, factor, center) > limit) != reversed;
    let overflows_min =
        |limit: f64, center: f64| (zoom_at(current_min, factor, center) < limit) != reversed;

    let mut center = center;
    if let Some(bound) = max_bound {
        let limit = scale.scale_transformation(bound);
        if overflows_max(limit, center) {
            center = zoom_center_for_target(current_max, factor, limit);
        }
    }
    if let Some(bound) = min_bound {
        let limit = scale.scale_transformation(bound);
        if overflows_min(limit, center) {
            center = zoom_center_for_target(current_min, factor, limit);
        }
    }

    let (Some(min_bound), Some(max_bound)) = (min_bound, max_bound) else {
        return (factor, center);
    };
    let max_limit = scale.scale_transformation(max_bound);
    let min_limit = scale.scale_transformation(min_bound);
    if !overflows_max(max_limit, center) && !overflows_min(min_limit, center) {
        return (factor, center);
    }

    // Solve zoom_at(current_min) == min_limit and
    // zoom_at(current_max) == max_limit for (center, factor).
    let denominator = current_max - current_min + min_limit - max_limit;
    if denominator == 0.0 {
        return (1.0, (current_max + current_min) / 2.0);
    }
    let center = (current_max * min_limit - current_min * max_limit) / denominator;
    let factor = (max_limit - min_limit) / (current_max - current_min);
    (factor, center)
}

/// Extent clamp followed by value clamp. Returns `(factor, center)`.
#[must_use]
pub fn constrained_zoom(
    scale: &dyn TransformableScale,
    constraints: &PanZoomConstraints,
    factor: f64,
    center: f64,
) -> (f64, f64) {
    let factor = constrain_zoom_extents(scale, constraints, factor);
    constrain_zoom_values(scale, constraints, factor, center)
}
