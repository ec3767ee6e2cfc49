//! Cheap previews while a gesture is still moving the domain.
//!
//! During pan/zoom the last full render is shown under an affine pixel
//! transform, and the real render happens once the domain has been quiet for
//! a debounce interval. Time is passed in explicitly so hosts can drive this
//! from whatever event loop they run.

use std::time::{Duration, Instant};

use tracing::trace;

use crate::core::transformable::TransformableScale;

pub const DEFERRED_RENDERING_DELAY: Duration = Duration::from_millis(200);

/// Fires once, `delay` after the most recent trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrailingDebounce {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Default for TrailingDebounce {
    fn default() -> Self {
        Self::new(DEFERRED_RENDERING_DELAY)
    }
}

impl TrailingDebounce {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Restarts the countdown from `now`.
    pub fn trigger(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns `true` exactly once when the deadline has passed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}

/// `pixel' = translate + scale * pixel` along one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewTransform {
    pub translate: f64,
    pub scale: f64,
}

impl PreviewTransform {
    pub const IDENTITY: Self = Self {
        translate: 0.0,
        scale: 1.0,
    };

    #[must_use]
    pub fn apply(self, pixel: f64) -> f64 {
        self.translate + self.scale * pixel
    }

    #[must_use]
    pub fn is_identity(self) -> bool {
        self == Self::IDENTITY
    }
}

impl Default for PreviewTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Preview state for one axis of a plot.
#[derive(Debug, Clone)]
pub struct DeferredPreview {
    rendered_domain: Option<(f64, f64)>,
    latest_domain: Option<(f64, f64)>,
    transform: PreviewTransform,
    debounce: TrailingDebounce,
}

impl Default for DeferredPreview {
    fn default() -> Self {
        Self::new(DEFERRED_RENDERING_DELAY)
    }
}

impl DeferredPreview {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            rendered_domain: None,
            latest_domain: None,
            transform: PreviewTransform::IDENTITY,
            debounce: TrailingDebounce::new(delay),
        }
    }

    /// Records the domain the plot was last fully rendered with.
    pub fn mark_rendered(&mut self, scale: &dyn TransformableScale) {
        let domain = scale.transformation_domain();
        self.rendered_domain = Some(domain);
        self.latest_domain = Some(domain);
        self.transform = PreviewTransform::IDENTITY;
        self.debounce.cancel();
    }

    #[must_use]
    pub fn rendered_domain(&self) -> Option<(f64, f64)> {
        self.rendered_domain
    }

    #[must_use]
    pub fn transform(&self) -> PreviewTransform {
        self.transform
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.debounce.is_pending()
    }

    /// Recomputes the preview for the scale's new domain and restarts the
    /// debounce.
    ///
    /// Mapping the old rendering through the returned transform puts every
    /// value where the scale now projects it.
    pub fn on_domain_change(
        &mut self,
        scale: &dyn TransformableScale,
        now: Instant,
    ) -> PreviewTransform {
        let latest = scale.transformation_domain();
        self.latest_domain = Some(latest);
        self.transform = match self.rendered_domain {
            Some(rendered) => preview_for(scale, rendered),
            None => PreviewTransform::IDENTITY,
        };
        self.debounce.trigger(now);
        trace!(
            translate = self.transform.translate,
            scale = self.transform.scale,
            "deferred preview updated"
        );
        self.transform
    }

    /// Returns `true` once the debounce elapsed; the caller renders for real
    /// and the preview resets to identity.
    pub fn poll(&mut self, now: Instant) -> bool {
        if !self.debounce.poll(now) {
            return false;
        }
        self.reconcile();
        true
    }

    /// Reconciles immediately, without waiting for the debounce.
    pub fn settle(&mut self) -> bool {
        if !self.debounce.is_pending() {
            return false;
        }
        self.debounce.cancel();
        self.reconcile();
        true
    }

    fn reconcile(&mut self) {
        if self.latest_domain.is_some() {
            self.rendered_domain = self.latest_domain;
        }
        self.transform = PreviewTransform::IDENTITY;
    }
}

fn preview_for(scale: &dyn TransformableScale, rendered: (f64, f64)) -> PreviewTransform {
    let (range_start, range_end) = scale.transformation_range();
    let start = scale.scale_transformation(rendered.0);
    let end = scale.scale_transformation(rendered.1);

    let mut factor = (end - start) / (range_end - range_start);
    if !factor.is_finite() || factor == 0.0 {
        factor = 1.0;
    }
    let mut translate = start - factor * range_start;
    if !translate.is_finite() {
        translate = 0.0;
    }
    PreviewTransform {
        translate,
        scale: factor,
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::{DeferredPreview, TrailingDebounce};
    use crate::core::linear_scale::LinearScale;
    use crate::core::transformable::TransformableScale;

    #[test]
    fn debounce_fires_once_after_the_last_trigger() {
        let start = Instant::now();
        let mut debounce = TrailingDebounce::new(Duration::from_millis(200));
        debounce.trigger(start);
        debounce.trigger(start + Duration::from_millis(150));
        assert!(!debounce.poll(start + Duration::from_millis(300)));
        assert!(debounce.poll(start + Duration::from_millis(350)));
        assert!(!debounce.poll(start + Duration::from_millis(400)));
    }

    #[test]
    fn preview_maps_rendered_pixels_onto_new_positions() {
        let mut scale = LinearScale::new().with_range(0.0, 100.0);
        scale.set_transformation_domain((0.0, 10.0));
        let mut preview = DeferredPreview::default();
        preview.mark_rendered(&scale);

        scale.zoom(2.0, 50.0);
        let transform = preview.on_domain_change(&scale, Instant::now());

        for value in [0.0, 2.5, 5.0, 10.0] {
            let old_pixel = value * 10.0;
            let new_pixel = scale.scale_transformation(value);
            assert!((transform.apply(old_pixel) - new_pixel).abs() < 1e-9);
        }
    }

    #[test]
    fn preview_handles_reversed_ranges() {
        let mut scale = LinearScale::new().with_range(300.0, 0.0);
        scale.set_transformation_domain((0.0, 30.0));
        let mut preview = DeferredPreview::default();
        preview.mark_rendered(&scale);

        scale.pan(-30.0);
        let transform = preview.on_domain_change(&scale, Instant::now());
        let old_pixel = 300.0 - 12.0 * 10.0;
        assert!((transform.apply(old_pixel) - scale.scale_transformation(12.0)).abs() < 1e-9);
    }

    #[test]
    fn settle_adopts_latest_domain_and_resets_transform() {
        let mut scale = LinearScale::new().with_range(0.0, 100.0);
        scale.set_transformation_domain((0.0, 10.0));
        let mut preview = DeferredPreview::default();
        preview.mark_rendered(&scale);

        scale.pan(10.0);
        preview.on_domain_change(&scale, Instant::now());
        assert!(preview.is_pending());
        assert!(preview.settle());
        assert!(preview.transform().is_identity());
        assert_eq!(preview.rendered_domain(), Some(scale.transformation_domain()));
        assert!(!preview.settle());
    }
}
