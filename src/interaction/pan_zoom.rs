use std::fmt;

use indexmap::IndexMap;
use tracing::{debug, trace, warn};

use crate::core::listeners::CallbackSet;
use crate::core::transformable::{SharedTransformable, TransformableScale};
use crate::core::types::{Bounds, ListenerId, Point, ScaleId};
use crate::error::{ChartError, ChartResult};

use super::constrained_transform::{
    ConstrainedPan, EdgeSnap, constrained_translation, constrained_zoom,
};
use super::zoom_factor_resolver::{resolve_pinch_zoom_factor, resolve_wheel_zoom_factor};
use super::{PanZoomConstraints, TouchId, TouchTracker, WheelEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    X,
    Y,
}

impl Axis {
    fn coordinate(self, point: Point) -> f64 {
        match self {
            Self::X => point.x,
            Self::Y => point.y,
        }
    }
}

struct AxisScale {
    id: ScaleId,
    scale: SharedTransformable,
}

/// Turns drag, wheel and pinch input into constrained pan/zoom of the
/// registered x and y scales.
///
/// All gesture state lives here and is only changed by the controller's own
/// methods. Gesture methods never fail: requests that would break a
/// constraint are clamped, degenerate input is ignored.
pub struct PanZoomController {
    x_scales: Vec<AxisScale>,
    y_scales: Vec<AxisScale>,
    constraints: IndexMap<ScaleId, PanZoomConstraints>,
    component_bounds: Option<Bounds>,
    last_drag_point: Option<Point>,
    touches: TouchTracker,
    pan_end: CallbackSet,
    zoom_end: CallbackSet,
}

impl fmt::Debug for PanZoomController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ids = |scales: &[AxisScale]| scales.iter().map(|entry| entry.id).collect::<Vec<_>>();
        f.debug_struct("PanZoomController")
            .field("x_scales", &ids(&self.x_scales))
            .field("y_scales", &ids(&self.y_scales))
            .field("constraints", &self.constraints)
            .field("component_bounds", &self.component_bounds)
            .field("last_drag_point", &self.last_drag_point)
            .field("touches", &self.touches)
            .field("pan_end", &self.pan_end)
            .field("zoom_end", &self.zoom_end)
            .finish()
    }
}

impl Default for PanZoomController {
    fn default() -> Self {
        Self::new()
    }
}

impl PanZoomController {
    #[must_use]
    pub fn new() -> Self {
        Self {
            x_scales: Vec::new(),
            y_scales: Vec::new(),
            constraints: IndexMap::new(),
            component_bounds: None,
            last_drag_point: None,
            touches: TouchTracker::new(),
            pan_end: CallbackSet::default(),
            zoom_end: CallbackSet::default(),
        }
    }

    /// Restricts wheel and pinch input to `bounds` (component-local pixels).
    #[must_use]
    pub fn with_component_bounds(mut self, bounds: Bounds) -> Self {
        self.component_bounds = Some(bounds);
        self
    }

    pub fn set_component_bounds(&mut self, bounds: Option<Bounds>) {
        self.component_bounds = bounds;
    }

    #[must_use]
    pub fn component_bounds(&self) -> Option<Bounds> {
        self.component_bounds
    }

    pub fn add_x_scale(&mut self, scale: SharedTransformable) -> ChartResult<ScaleId> {
        self.add_scale(Axis::X, scale)
    }

    pub fn add_y_scale(&mut self, scale: SharedTransformable) -> ChartResult<ScaleId> {
        self.add_scale(Axis::Y, scale)
    }

    /// Unregisters an x scale and forgets its constraints.
    pub fn remove_x_scale(&mut self, id: ScaleId) -> bool {
        self.remove_scale(Axis::X, id)
    }

    /// Unregisters a y scale and forgets its constraints.
    pub fn remove_y_scale(&mut self, id: ScaleId) -> bool {
        self.remove_scale(Axis::Y, id)
    }

    #[must_use]
    pub fn x_scale_ids(&self) -> Vec<ScaleId> {
        self.x_scales.iter().map(|entry| entry.id).collect()
    }

    #[must_use]
    pub fn y_scale_ids(&self) -> Vec<ScaleId> {
        self.y_scales.iter().map(|entry| entry.id).collect()
    }

    /// Constraints currently in effect for `id` (unbounded if none were set).
    #[must_use]
    pub fn constraints(&self, id: ScaleId) -> PanZoomConstraints {
        self.constraints.get(&id).copied().unwrap_or_default()
    }

    /// Replaces every constraint of `id` at once. Invalid combinations are
    /// rejected and leave the previous constraints in place.
    pub fn set_constraints(
        &mut self,
        id: ScaleId,
        constraints: PanZoomConstraints,
    ) -> ChartResult<()> {
        constraints.validate()?;
        if constraints.has_extent_bounds() && !self.scale_is_linear(id) {
            warn!(
                scale = id.get(),
                "extent constraints on a non-linear scale may pan and zoom unexpectedly"
            );
        }
        if constraints == PanZoomConstraints::default() {
            self.constraints.shift_remove(&id);
        } else {
            self.constraints.insert(id, constraints);
        }
        Ok(())
    }

    #[must_use]
    pub fn min_domain_extent(&self, id: ScaleId) -> Option<f64> {
        self.constraints(id).min_domain_extent
    }

    pub fn set_min_domain_extent(&mut self, id: ScaleId, extent: Option<f64>) -> ChartResult<()> {
        let mut constraints = self.constraints(id);
        constraints.min_domain_extent = extent;
        self.set_constraints(id, constraints)
    }

    #[must_use]
    pub fn max_domain_extent(&self, id: ScaleId) -> Option<f64> {
        self.constraints(id).max_domain_extent
    }

    pub fn set_max_domain_extent(&mut self, id: ScaleId, extent: Option<f64>) -> ChartResult<()> {
        let mut constraints = self.constraints(id);
        constraints.max_domain_extent = extent;
        self.set_constraints(id, constraints)
    }

    #[must_use]
    pub fn min_domain_value(&self, id: ScaleId) -> Option<f64> {
        self.constraints(id).min_domain_value
    }

    pub fn set_min_domain_value(&mut self, id: ScaleId, value: Option<f64>) -> ChartResult<()> {
        let mut constraints = self.constraints(id);
        constraints.min_domain_value = value;
        self.set_constraints(id, constraints)
    }

    #[must_use]
    pub fn max_domain_value(&self, id: ScaleId) -> Option<f64> {
        self.constraints(id).max_domain_value
    }

    pub fn set_max_domain_value(&mut self, id: ScaleId, value: Option<f64>) -> ChartResult<()> {
        let mut constraints = self.constraints(id);
        constraints.max_domain_value = value;
        self.set_constraints(id, constraints)
    }

    /// Bounds a registered scale's domain values to its current
    /// transformation domain, so pan/zoom can never show more than is
    /// visible now.
    pub fn set_min_max_domain_values_to(&mut self, id: ScaleId) -> ChartResult<()> {
        let (start, end) = {
            let entry = self.find_scale(id).ok_or_else(|| {
                ChartError::InvalidConfiguration(format!(
                    "scale {} is not registered with this controller",
                    id.get()
                ))
            })?;
            let scale = entry.scale.try_borrow().map_err(|_| {
                ChartError::InvalidConfiguration(
                    "cannot read the domain of a scale that is updating".to_owned(),
                )
            })?;
            scale.transformation_domain()
        };
        let constraints = self
            .constraints(id)
            .with_domain_values(Some(start.min(end)), Some(start.max(end)));
        self.set_constraints(id, constraints)
    }

    /// Pans every scale by `translation` pixels, clamped per scale so no
    /// domain edge crosses its value bound.
    pub fn pan(&mut self, translation: Point) {
        for (axis, scales) in [(Axis::X, &self.x_scales), (Axis::Y, &self.y_scales)] {
            for entry in scales {
                let constraints = self.constraints(entry.id);
                pan_scale(entry, &constraints, axis.coordinate(translation));
            }
        }
        debug!(dx = translation.x, dy = translation.y, "applied pan");
    }

    /// Zooms every scale by `factor` about `center` (pixels), or about the
    /// middle of each scale's range when `center` is `None`.
    ///
    /// Each scale is constrained on its own. A factor of exactly 1 leaves
    /// every domain untouched.
    pub fn zoom(&mut self, factor: f64, center: Option<Point>) {
        if factor == 1.0 {
            return;
        }
        if !factor.is_finite() || factor <= 0.0 {
            warn!(factor, "ignoring zoom with a non-positive or non-finite factor");
            return;
        }
        for (axis, scales) in [(Axis::X, &self.x_scales), (Axis::Y, &self.y_scales)] {
            for entry in scales {
                let Ok(mut scale) = entry.scale.try_borrow_mut() else {
                    trace!(scale = entry.id.get(), "skipping zoom of a scale that is updating");
                    continue;
                };
                if !scale.has_usable_range() {
                    trace!(scale = entry.id.get(), "skipping zoom of a scale without a range");
                    continue;
                }
                let (range_start, range_end) = scale.transformation_range();
                let pixel = center.map_or((range_start + range_end) / 2.0, |point| {
                    axis.coordinate(point)
                });
                let constraints = self.constraints(entry.id);
                let (factor, pixel) = constrained_zoom(&*scale, &constraints, factor, pixel);
                scale.zoom(factor, pixel);
                debug!(scale = entry.id.get(), factor, center = pixel, "applied zoom");
            }
        }
    }

    pub fn drag_start(&mut self, point: Point) {
        self.last_drag_point = Some(point);
    }

    /// Pans by the pointer movement since the previous drag event. Ignored
    /// while a pinch is in progress.
    pub fn drag(&mut self, point: Point) {
        if self.touches.is_pinching() {
            return;
        }
        let Some(last) = self.last_drag_point else {
            return;
        };
        self.pan(Point::new(last.x - point.x, last.y - point.y));
        self.last_drag_point = Some(point);
    }

    pub fn drag_end(&mut self) {
        if self.last_drag_point.take().is_some() {
            self.pan_end.call_all();
        }
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.last_drag_point.is_some()
    }

    /// Zooms about the cursor. Returns `false` when the event was outside
    /// the component or would not zoom.
    pub fn handle_wheel(&mut self, point: Point, event: WheelEvent) -> bool {
        if !self.is_inside(point) {
            return false;
        }
        let Some(factor) = resolve_wheel_zoom_factor(event) else {
            return false;
        };
        let (factor, center) = self.chained_constrained_zoom(factor, point);
        self.apply_zoom(factor, center);
        debug!(factor, x = center.x, y = center.y, "applied wheel zoom");
        self.zoom_end.call_all();
        true
    }

    pub fn touch_start(&mut self, touches: &[(TouchId, Point)]) {
        self.touches.start(touches);
    }

    /// Pinch-zooms once two touches are tracked: zooms by the ratio of old
    /// to new finger distance, then pans so the fingers stay over the same
    /// content. Overlapping fingers skip the zoom but still move the tracked
    /// touches, so the next move can pinch from their new positions.
    pub fn touch_move(&mut self, touches: &[(TouchId, Point)]) {
        let Some((old_first, old_second)) = self.touches.pair() else {
            return;
        };
        if !self.is_inside(old_first) || !self.is_inside(old_second) {
            return;
        }
        self.touches.update(touches);
        let Some((new_first, new_second)) = self.touches.pair() else {
            return;
        };
        let Some(factor) = resolve_pinch_zoom_factor(
            old_first.distance(old_second),
            new_first.distance(new_second),
        ) else {
            return;
        };

        let normalized = |new: Point, old: Point| {
            Point::new((new.x - old.x) / factor, (new.y - old.y) / factor)
        };
        let first_diff = normalized(new_first, old_first);
        let second_diff = normalized(new_second, old_second);

        let (factor, center) = self.chained_constrained_zoom(factor, old_first.center(old_second));

        let first = Point::new(
            first_diff.x * factor + old_first.x,
            first_diff.y * factor + old_first.y,
        );
        let second = Point::new(
            second_diff.x * factor + old_second.x,
            second_diff.y * factor + old_second.y,
        );
        let midpoint = first.center(second);
        let translation = Point::new(center.x - midpoint.x, center.y - midpoint.y);

        self.apply_zoom(factor, center);
        self.pan(translation);
        trace!(factor, dx = translation.x, dy = translation.y, "applied pinch");
    }

    pub fn touch_end(&mut self, ids: &[TouchId]) {
        let was_pinching = self.touches.is_pinching();
        let removed = self.touches.remove(ids);
        if was_pinching && removed > 0 && !self.touches.is_empty() {
            self.zoom_end.call_all();
        }
    }

    pub fn touch_cancel(&mut self, ids: &[TouchId]) {
        self.touch_end(ids);
    }

    #[must_use]
    pub fn active_touches(&self) -> usize {
        self.touches.len()
    }

    pub fn on_pan_end<F>(&mut self, callback: F) -> ListenerId
    where
        F: FnMut() + 'static,
    {
        self.pan_end.add(Box::new(callback))
    }

    pub fn off_pan_end(&mut self, id: ListenerId) -> bool {
        self.pan_end.remove(id)
    }

    pub fn on_zoom_end<F>(&mut self, callback: F) -> ListenerId
    where
        F: FnMut() + 'static,
    {
        self.zoom_end.add(Box::new(callback))
    }

    pub fn off_zoom_end(&mut self, id: ListenerId) -> bool {
        self.zoom_end.remove(id)
    }

    fn add_scale(&mut self, axis: Axis, scale: SharedTransformable) -> ChartResult<ScaleId> {
        let id = scale
            .try_borrow()
            .map_err(|_| {
                ChartError::InvalidConfiguration(
                    "cannot register a scale that is updating".to_owned(),
                )
            })?
            .scale_id();
        let scales = self.axis_mut(axis);
        if !scales.iter().any(|entry| entry.id == id) {
            scales.push(AxisScale { id, scale });
        }
        Ok(id)
    }

    fn remove_scale(&mut self, axis: Axis, id: ScaleId) -> bool {
        let scales = self.axis_mut(axis);
        let before = scales.len();
        scales.retain(|entry| entry.id != id);
        let removed = scales.len() != before;
        if removed {
            self.constraints.shift_remove(&id);
        }
        removed
    }

    fn axis_mut(&mut self, axis: Axis) -> &mut Vec<AxisScale> {
        match axis {
            Axis::X => &mut self.x_scales,
            Axis::Y => &mut self.y_scales,
        }
    }

    fn find_scale(&self, id: ScaleId) -> Option<&AxisScale> {
        self.x_scales
            .iter()
            .chain(self.y_scales.iter())
            .find(|entry| entry.id == id)
    }

    fn scale_is_linear(&self, id: ScaleId) -> bool {
        self.find_scale(id)
            .and_then(|entry| {
                entry
                    .scale
                    .try_borrow()
                    .ok()
                    .map(|scale| scale.transformation_is_linear())
            })
            .unwrap_or(true)
    }

    fn is_inside(&self, point: Point) -> bool {
        self.component_bounds
            .is_none_or(|bounds| bounds.contains(point))
    }

    /// Feeds `(factor, center)` through the constraints of every x scale and
    /// then every y scale, each step starting from the previous result.
    fn chained_constrained_zoom(&self, factor: f64, center: Point) -> (f64, Point) {
        let mut factor = factor;
        let (mut center_x, mut center_y) = (center.x, center.y);
        for entry in &self.x_scales {
            let Ok(scale) = entry.scale.try_borrow() else {
                continue;
            };
            if scale.has_usable_range() {
                (factor, center_x) =
                    constrained_zoom(&*scale, &self.constraints(entry.id), factor, center_x);
            }
        }
        for entry in &self.y_scales {
            let Ok(scale) = entry.scale.try_borrow() else {
                continue;
            };
            if scale.has_usable_range() {
                (factor, center_y) =
                    constrained_zoom(&*scale, &self.constraints(entry.id), factor, center_y);
            }
        }
        (factor, Point::new(center_x, center_y))
    }

    fn apply_zoom(&self, factor: f64, center: Point) {
        for (axis, scales) in [(Axis::X, &self.x_scales), (Axis::Y, &self.y_scales)] {
            for entry in scales {
                match entry.scale.try_borrow_mut() {
                    Ok(mut scale) => scale.zoom(factor, axis.coordinate(center)),
                    Err(_) => {
                        trace!(scale = entry.id.get(), "skipping zoom of a scale that is updating")
                    }
                }
            }
        }
    }
}

fn pan_scale(entry: &AxisScale, constraints: &PanZoomConstraints, translation: f64) {
    let Ok(mut scale) = entry.scale.try_borrow_mut() else {
        trace!(scale = entry.id.get(), "skipping pan of a scale that is updating");
        return;
    };
    if !scale.has_usable_range() {
        trace!(scale = entry.id.get(), "skipping pan of a scale without a range");
        return;
    }
    let ConstrainedPan { translation, snap } =
        constrained_translation(&*scale, constraints, translation);
    let Some(snap) = snap else {
        scale.pan(translation);
        return;
    };

    // Land the clamped edge exactly on its bound instead of wherever the
    // pixel round trip puts it.
    let mut domain = panned_domain(&*scale, translation);
    match snap {
        EdgeSnap::Min(bound) => domain.0 = bound,
        EdgeSnap::Max(bound) => domain.1 = bound,
    }
    if domain != scale.transformation_domain() {
        scale.set_transformation_domain(domain);
    }
}

fn panned_domain(scale: &dyn TransformableScale, translation: f64) -> (f64, f64) {
    let (range_start, range_end) = scale.transformation_range();
    (
        scale.inverted_transformation(range_start + translation),
        scale.inverted_transformation(range_end + translation),
    )
}
