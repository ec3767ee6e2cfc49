use std::cell::RefCell;
use std::rc::Rc;

use crate::core::primitives::zoom_at;
use crate::core::types::ScaleId;

/// Capability the pan/zoom controller needs from a scale.
///
/// The transformation domain is a numeric stand-in for the scale's domain
/// (epoch milliseconds for time, band space for categories) in which pan and
/// zoom are plain affine maps against the transformation range.
pub trait TransformableScale {
    fn scale_id(&self) -> ScaleId;

    /// Maps a transformation-domain value to pixels.
    fn scale_transformation(&self, value: f64) -> f64;

    /// Maps pixels back to the transformation domain.
    fn inverted_transformation(&self, pixel: f64) -> f64;

    /// Transformation-domain edges matching the first and second range edge.
    fn transformation_domain(&self) -> (f64, f64);

    fn set_transformation_domain(&mut self, domain: (f64, f64));

    fn transformation_range(&self) -> (f64, f64);

    /// `false` for scales whose domain is not an affine image of the
    /// transformation domain; extent constraints are approximate there.
    fn transformation_is_linear(&self) -> bool {
        true
    }

    /// `false` while the range is zero-width or non-finite (e.g. before the
    /// first layout). Pixels cannot be inverted then, so pan and zoom are
    /// skipped instead of collapsing the domain onto one value.
    fn has_usable_range(&self) -> bool {
        let (start, end) = self.transformation_range();
        start.is_finite() && end.is_finite() && start != end
    }

    /// Zooms by `factor` about the pixel `center`. `factor > 1` zooms out.
    fn zoom(&mut self, factor: f64, center: f64) {
        if factor == 1.0 || !factor.is_finite() || factor <= 0.0 || !center.is_finite() {
            return;
        }
        if !self.has_usable_range() {
            return;
        }
        let (range_start, range_end) = self.transformation_range();
        let start = self.inverted_transformation(zoom_at(range_start, factor, center));
        let end = self.inverted_transformation(zoom_at(range_end, factor, center));
        self.set_transformation_domain((start, end));
    }

    /// Shifts the visible window by `translation` pixels.
    fn pan(&mut self, translation: f64) {
        if translation == 0.0 || !translation.is_finite() || !self.has_usable_range() {
            return;
        }
        let (range_start, range_end) = self.transformation_range();
        let start = self.inverted_transformation(range_start + translation);
        let end = self.inverted_transformation(range_end + translation);
        self.set_transformation_domain((start, end));
    }

    fn is_range_reversed(&self) -> bool {
        let (start, end) = self.transformation_range();
        end < start
    }
}

pub type SharedTransformable = Rc<RefCell<dyn TransformableScale>>;
