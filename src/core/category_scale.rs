use indexmap::IndexSet;
use tracing::debug;

use crate::core::listeners::UpdateListeners;
use crate::core::scale::{Scale, ScaleCore};
use crate::core::transformable::TransformableScale;
use crate::core::types::ScaleId;
use crate::error::{ChartError, ChartResult};

pub const DEFAULT_INNER_PADDING: f64 = 0.3;
pub const DEFAULT_OUTER_PADDING: f64 = 0.5;

/// Discrete scale laying categories out as equal bands across the range.
///
/// Pan and zoom act on a separate transformation domain that starts equal
/// to the range; band positions are computed against the range and then
/// mapped through it.
#[derive(Debug)]
pub struct CategoryScale {
    core: ScaleCore<String>,
    domain: Vec<String>,
    range: (f64, f64),
    inner_padding: f64,
    outer_padding: f64,
    transformation_domain: (f64, f64),
    listeners: UpdateListeners<Self>,
}

impl Default for CategoryScale {
    fn default() -> Self {
        Self::new()
    }
}

impl CategoryScale {
    #[must_use]
    pub fn new() -> Self {
        Self {
            core: ScaleCore::default(),
            domain: Vec::new(),
            range: (0.0, 1.0),
            inner_padding: DEFAULT_INNER_PADDING,
            outer_padding: DEFAULT_OUTER_PADDING,
            transformation_domain: (0.0, 1.0),
            listeners: UpdateListeners::default(),
        }
    }

    #[must_use]
    pub fn with_range(mut self, start: f64, end: f64) -> Self {
        self.range = (start, end);
        self.transformation_domain = (start, end);
        self
    }

    #[must_use]
    pub fn domain(&self) -> &[String] {
        &self.domain
    }

    /// Assigns a fixed category list (duplicates dropped) and leaves
    /// automatic mode.
    pub fn set_domain<I, S>(&mut self, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        let domain = unique_in_order(&values);
        self.core.set_auto_domain(false);
        if domain != self.domain {
            self.domain = domain;
            self.dispatch_update();
        }
    }

    #[must_use]
    pub fn inner_padding(&self) -> f64 {
        self.inner_padding
    }

    /// Share of each step left empty between bands, in `[0, 1)`.
    pub fn set_inner_padding(&mut self, inner_padding: f64) -> ChartResult<()> {
        if !inner_padding.is_finite() || !(0.0..1.0).contains(&inner_padding) {
            return Err(ChartError::InvalidConfiguration(
                "category inner padding must be in [0, 1)".to_owned(),
            ));
        }
        self.inner_padding = inner_padding;
        self.dispatch_update();
        Ok(())
    }

    #[must_use]
    pub fn outer_padding(&self) -> f64 {
        self.outer_padding
    }

    /// Space before the first and after the last band, in steps.
    pub fn set_outer_padding(&mut self, outer_padding: f64) -> ChartResult<()> {
        if !outer_padding.is_finite() || outer_padding < 0.0 {
            return Err(ChartError::InvalidConfiguration(
                "category outer padding must be finite and >= 0".to_owned(),
            ));
        }
        self.outer_padding = outer_padding;
        self.dispatch_update();
        Ok(())
    }

    /// Pixel center of `value`'s band, or `None` outside the domain.
    #[must_use]
    pub fn scale(&self, value: &str) -> Option<f64> {
        let index = self.domain.iter().position(|category| category == value)?;
        let (band_start, band_width) = self.untransformed_band(index);
        Some(self.scale_transformation(band_start + band_width / 2.0))
    }

    /// Width of one band after pan/zoom.
    #[must_use]
    pub fn range_band(&self) -> f64 {
        let (step, _) = self.untransformed_step();
        step * (1.0 - self.inner_padding) * self.zoom_ratio()
    }

    /// Distance between neighboring band starts after pan/zoom.
    #[must_use]
    pub fn step_width(&self) -> f64 {
        let (step, _) = self.untransformed_step();
        step * self.zoom_ratio()
    }

    fn zoom_ratio(&self) -> f64 {
        let (t0, t1) = self.transformation_domain;
        let (r0, r1) = self.range;
        if t0 == t1 {
            return 1.0;
        }
        ((r1 - r0) / (t1 - t0)).abs()
    }

    // Band step and the offset of the first band from the low range edge.
    fn untransformed_step(&self) -> (f64, f64) {
        let count = self.domain.len() as f64;
        let (low, high) = ordered(self.range);
        let slots = (count - self.inner_padding + self.outer_padding * 2.0).max(1.0);
        let step = (high - low) / slots;
        let offset = (high - low - step * (count - self.inner_padding)) / 2.0;
        (step, offset)
    }

    fn untransformed_band(&self, index: usize) -> (f64, f64) {
        let (step, offset) = self.untransformed_step();
        let (low, _) = ordered(self.range);
        let slot = if self.range.1 < self.range.0 {
            self.domain.len() - 1 - index
        } else {
            index
        };
        let band_width = step * (1.0 - self.inner_padding);
        (low + offset + step * slot as f64, band_width)
    }
}

fn ordered((a, b): (f64, f64)) -> (f64, f64) {
    if b < a { (b, a) } else { (a, b) }
}

fn unique_in_order(values: &[String]) -> Vec<String> {
    values
        .iter()
        .cloned()
        .collect::<IndexSet<String>>()
        .into_iter()
        .collect()
}

impl Scale for CategoryScale {
    type Value = String;

    fn core(&self) -> &ScaleCore<String> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ScaleCore<String> {
        &mut self.core
    }

    fn listeners_mut(&mut self) -> &mut UpdateListeners<Self> {
        &mut self.listeners
    }

    fn project(&self, value: &String) -> Option<f64> {
        self.scale(value)
    }

    fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Keeps the current pan/zoom by re-expressing the transformation domain
    /// relative to the new range. A zero-width range leaves the
    /// transformation domain as it is.
    fn store_range(&mut self, range: (f64, f64)) {
        let (old0, old1) = self.range;
        let (t0, t1) = self.transformation_domain;
        if range.0 != range.1 {
            self.transformation_domain = if old0 == old1 {
                range
            } else {
                let rescale =
                    |t: f64| range.0 + (t - old0) / (old1 - old0) * (range.1 - range.0);
                (rescale(t0), rescale(t1))
            };
        }
        self.range = range;
    }

    fn extent_of_values(&self, values: &[String]) -> Vec<String> {
        unique_in_order(values)
    }

    fn recompute_domain(&mut self) -> bool {
        let mut values = self.core.included_values().all_values();
        values.extend(self.core.padding_exceptions().all_values());
        let domain = unique_in_order(&values);
        if domain == self.domain {
            return false;
        }
        debug!(
            scale = self.core.id().get(),
            categories = domain.len(),
            "category auto-domain changed"
        );
        self.domain = domain;
        true
    }
}

impl TransformableScale for CategoryScale {
    fn scale_id(&self) -> ScaleId {
        self.core.id()
    }

    fn scale_transformation(&self, value: f64) -> f64 {
        let (t0, t1) = self.transformation_domain;
        let (r0, r1) = self.range;
        if t0 == t1 {
            return (r0 + r1) / 2.0;
        }
        r0 + (value - t0) / (t1 - t0) * (r1 - r0)
    }

    fn inverted_transformation(&self, pixel: f64) -> f64 {
        let (t0, t1) = self.transformation_domain;
        let (r0, r1) = self.range;
        if r0 == r1 {
            return t0;
        }
        t0 + (pixel - r0) / (r1 - r0) * (t1 - t0)
    }

    fn transformation_domain(&self) -> (f64, f64) {
        self.transformation_domain
    }

    fn set_transformation_domain(&mut self, domain: (f64, f64)) {
        if !domain.0.is_finite() || !domain.1.is_finite() || domain == self.transformation_domain
        {
            return;
        }
        self.transformation_domain = domain;
        self.dispatch_update();
    }

    fn transformation_range(&self) -> (f64, f64) {
        self.range
    }

    fn transformation_is_linear(&self) -> bool {
        false
    }
}
