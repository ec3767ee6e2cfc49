use std::fmt;
use std::marker::PhantomData;

use ordered_float::OrderedFloat;
use tracing::{debug, warn};

use crate::core::listeners::UpdateListeners;
use crate::core::scale::{Scale, ScaleCore};
use crate::core::transformable::TransformableScale;
use crate::core::types::ScaleId;
use crate::error::{ChartError, ChartResult};

/// Target tick count used when snapping an auto-computed domain.
pub const NICE_TICK_COUNT: usize = 10;

pub const DEFAULT_PAD_PROPORTION: f64 = 0.05;

/// Type-specific pieces of a continuous scale.
///
/// The scale itself works on an `f64` representation of the domain; the kind
/// converts user-facing values in and out of it.
pub trait QuantitativeKind: fmt::Debug + 'static {
    type Value: Clone + fmt::Debug + PartialEq;

    fn to_numeric(value: &Self::Value) -> f64;

    fn from_numeric(value: f64) -> Self::Value;

    /// Domain used when no provider contributes a value.
    fn default_extent() -> (f64, f64);

    /// Widens a zero-width domain around `value`.
    fn expand_single_value(value: f64) -> (f64, f64);

    /// Snaps `domain` outward to round values.
    fn nice_domain(domain: (f64, f64), count: usize) -> (f64, f64);

    fn validate_domain(_start: f64, _end: f64) -> ChartResult<()> {
        Ok(())
    }
}

/// Continuous scale with padding, snapping and optional edge overrides.
#[derive(Debug)]
pub struct QuantitativeScale<K: QuantitativeKind> {
    core: ScaleCore<K::Value>,
    domain: (f64, f64),
    range: (f64, f64),
    pad_proportion: f64,
    snapping_domain_enabled: bool,
    domain_min: Option<f64>,
    domain_max: Option<f64>,
    listeners: UpdateListeners<Self>,
    kind: PhantomData<K>,
}

impl<K: QuantitativeKind> Default for QuantitativeScale<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: QuantitativeKind> QuantitativeScale<K> {
    /// Creates an automatic-mode scale over the kind's default extent and
    /// the unit pixel range.
    #[must_use]
    pub fn new() -> Self {
        Self {
            core: ScaleCore::default(),
            domain: K::default_extent(),
            range: (0.0, 1.0),
            pad_proportion: DEFAULT_PAD_PROPORTION,
            snapping_domain_enabled: true,
            domain_min: None,
            domain_max: None,
            listeners: UpdateListeners::default(),
            kind: PhantomData,
        }
    }

    #[must_use]
    pub fn with_range(mut self, start: f64, end: f64) -> Self {
        self.range = (start, end);
        self
    }

    /// Returns a scale in manual mode over `[start, end]`.
    pub fn with_domain(mut self, start: K::Value, end: K::Value) -> ChartResult<Self> {
        self.set_domain(start, end)?;
        Ok(self)
    }

    #[must_use]
    pub fn domain(&self) -> (K::Value, K::Value) {
        (K::from_numeric(self.domain.0), K::from_numeric(self.domain.1))
    }

    #[must_use]
    pub fn numeric_domain(&self) -> (f64, f64) {
        self.domain
    }

    /// Assigns a fixed domain and leaves automatic mode until
    /// [`Scale::auto_domain`] is called again.
    pub fn set_domain(&mut self, start: K::Value, end: K::Value) -> ChartResult<()> {
        let start = K::to_numeric(&start);
        let end = K::to_numeric(&end);
        if !start.is_finite() || !end.is_finite() {
            return Err(ChartError::InvalidData(
                "scale domain must be finite".to_owned(),
            ));
        }
        K::validate_domain(start, end)?;
        self.core.set_auto_domain(false);
        self.assign_domain((start, end));
        Ok(())
    }

    /// Forward transform on the numeric representation.
    ///
    /// A zero-width domain maps everything to the middle of the range.
    #[must_use]
    pub fn scale_numeric(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d0 == d1 {
            return (r0 + r1) / 2.0;
        }
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }

    #[must_use]
    pub fn scale(&self, value: &K::Value) -> f64 {
        self.scale_numeric(K::to_numeric(value))
    }

    #[must_use]
    pub fn invert_numeric(&self, pixel: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if r0 == r1 {
            return d0;
        }
        d0 + (pixel - r0) / (r1 - r0) * (d1 - d0)
    }

    #[must_use]
    pub fn invert(&self, pixel: f64) -> K::Value {
        K::from_numeric(self.invert_numeric(pixel))
    }

    #[must_use]
    pub fn pad_proportion(&self) -> f64 {
        self.pad_proportion
    }

    /// Sets the share of the extent added as padding (half on each side).
    pub fn set_pad_proportion(&mut self, pad_proportion: f64) -> ChartResult<()> {
        if !pad_proportion.is_finite() || pad_proportion < 0.0 {
            return Err(ChartError::InvalidConfiguration(
                "pad proportion must be finite and >= 0".to_owned(),
            ));
        }
        self.pad_proportion = pad_proportion;
        self.auto_domain_if_automatic();
        Ok(())
    }

    #[must_use]
    pub fn snapping_domain_enabled(&self) -> bool {
        self.snapping_domain_enabled
    }

    pub fn set_snapping_domain_enabled(&mut self, enabled: bool) {
        self.snapping_domain_enabled = enabled;
        self.auto_domain_if_automatic();
    }

    #[must_use]
    pub fn domain_min(&self) -> Option<K::Value> {
        self.domain_min.map(K::from_numeric)
    }

    /// Pins the lower edge of the auto-computed domain.
    pub fn set_domain_min(&mut self, domain_min: Option<K::Value>) -> ChartResult<()> {
        self.domain_min = validate_override(domain_min.as_ref().map(K::to_numeric), "min")?;
        self.auto_domain_if_automatic();
        Ok(())
    }

    #[must_use]
    pub fn domain_max(&self) -> Option<K::Value> {
        self.domain_max.map(K::from_numeric)
    }

    /// Pins the upper edge of the auto-computed domain.
    pub fn set_domain_max(&mut self, domain_max: Option<K::Value>) -> ChartResult<()> {
        self.domain_max = validate_override(domain_max.as_ref().map(K::to_numeric), "max")?;
        self.auto_domain_if_automatic();
        Ok(())
    }

    /// Finite numeric values currently contributed by every provider,
    /// padding exceptions included.
    #[must_use]
    pub fn included_values(&self) -> Vec<f64> {
        self.core
            .included_values()
            .all_values()
            .iter()
            .chain(self.core.padding_exceptions().all_values().iter())
            .map(K::to_numeric)
            .filter(|value| value.is_finite())
            .collect()
    }

    /// The domain auto-domain would assign right now.
    #[must_use]
    pub fn compute_extent(&self) -> (f64, f64) {
        let values = self.included_values();
        let min = values.iter().copied().map(OrderedFloat).min();
        let max = values.iter().copied().map(OrderedFloat).max();
        let mut extent = match (min, max) {
            (Some(min), Some(max)) => self.pad_domain((min.0, max.0)),
            _ => K::default_extent(),
        };
        if let Some(domain_min) = self.domain_min {
            extent.0 = domain_min;
        }
        if let Some(domain_max) = self.domain_max {
            extent.1 = domain_max;
        }
        if extent.0 > extent.1 {
            warn!(
                min = extent.0,
                max = extent.1,
                "domain overrides produced a reversed domain"
            );
        }
        if extent.0 == extent.1 {
            warn!(
                value = extent.0,
                "domain overrides produced a zero-width domain, expanding"
            );
            extent = K::expand_single_value(extent.0);
        }
        extent
    }

    fn pad_domain(&self, (min, max): (f64, f64)) -> (f64, f64) {
        if min == max {
            return K::expand_single_value(min);
        }
        if self.pad_proportion == 0.0 {
            return (min, max);
        }

        let exceptions: Vec<f64> = self
            .core
            .padding_exceptions()
            .all_values()
            .iter()
            .map(K::to_numeric)
            .collect();
        let min_is_exception = exceptions.contains(&min);
        let max_is_exception = exceptions.contains(&max);

        let half = self.pad_proportion / 2.0;
        let span = max - min;
        let padded_min = if min_is_exception {
            min
        } else {
            min - span * half
        };
        let padded_max = if max_is_exception {
            max
        } else {
            max + span * half
        };

        if self.snapping_domain_enabled {
            K::nice_domain((padded_min, padded_max), NICE_TICK_COUNT)
        } else {
            (padded_min, padded_max)
        }
    }

    fn assign_domain(&mut self, domain: (f64, f64)) {
        if self.domain == domain {
            return;
        }
        self.domain = domain;
        self.dispatch_update();
    }
}

fn validate_override(value: Option<f64>, edge: &str) -> ChartResult<Option<f64>> {
    match value {
        Some(value) if !value.is_finite() => Err(ChartError::InvalidConfiguration(format!(
            "domain {edge} override must be finite"
        ))),
        other => Ok(other),
    }
}

impl<K: QuantitativeKind> Scale for QuantitativeScale<K> {
    type Value = K::Value;

    fn core(&self) -> &ScaleCore<K::Value> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ScaleCore<K::Value> {
        &mut self.core
    }

    fn listeners_mut(&mut self) -> &mut UpdateListeners<Self> {
        &mut self.listeners
    }

    fn project(&self, value: &K::Value) -> Option<f64> {
        let numeric = K::to_numeric(value);
        numeric.is_finite().then(|| self.scale_numeric(numeric))
    }

    fn range(&self) -> (f64, f64) {
        self.range
    }

    fn store_range(&mut self, range: (f64, f64)) {
        self.range = range;
    }

    fn extent_of_values(&self, values: &[K::Value]) -> Vec<K::Value> {
        let mut min: Option<(f64, &K::Value)> = None;
        let mut max: Option<(f64, &K::Value)> = None;
        for value in values {
            let numeric = K::to_numeric(value);
            if !numeric.is_finite() {
                continue;
            }
            if min.is_none_or(|(current, _)| numeric < current) {
                min = Some((numeric, value));
            }
            if max.is_none_or(|(current, _)| numeric > current) {
                max = Some((numeric, value));
            }
        }
        match (min, max) {
            (Some((_, min)), Some((_, max))) => vec![min.clone(), max.clone()],
            _ => Vec::new(),
        }
    }

    fn recompute_domain(&mut self) -> bool {
        let extent = self.compute_extent();
        if extent == self.domain {
            return false;
        }
        debug!(
            scale = self.core.id().get(),
            from_min = self.domain.0,
            from_max = self.domain.1,
            to_min = extent.0,
            to_max = extent.1,
            "auto-domain changed"
        );
        self.domain = extent;
        true
    }
}

impl<K: QuantitativeKind> TransformableScale for QuantitativeScale<K> {
    fn scale_id(&self) -> ScaleId {
        self.core.id()
    }

    fn scale_transformation(&self, value: f64) -> f64 {
        self.scale_numeric(value)
    }

    fn inverted_transformation(&self, pixel: f64) -> f64 {
        self.invert_numeric(pixel)
    }

    fn transformation_domain(&self) -> (f64, f64) {
        self.domain
    }

    fn set_transformation_domain(&mut self, domain: (f64, f64)) {
        if !domain.0.is_finite() || !domain.1.is_finite() {
            warn!(
                scale = self.core.id().get(),
                "ignoring non-finite transformation domain"
            );
            return;
        }
        self.core.set_auto_domain(false);
        self.assign_domain(domain);
    }

    fn transformation_range(&self) -> (f64, f64) {
        self.range
    }
}
