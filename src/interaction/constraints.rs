use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Per-scale limits a pan/zoom gesture may not exceed.
///
/// Extents bound `|domain_max - domain_min|`; values bound where the domain
/// edges may go. All values are in transformation-domain units (epoch
/// milliseconds for time scales).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PanZoomConstraints {
    #[serde(default)]
    pub min_domain_extent: Option<f64>,
    #[serde(default)]
    pub max_domain_extent: Option<f64>,
    #[serde(default)]
    pub min_domain_value: Option<f64>,
    #[serde(default)]
    pub max_domain_value: Option<f64>,
}

impl PanZoomConstraints {
    #[must_use]
    pub fn with_domain_extents(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_domain_extent = min;
        self.max_domain_extent = max;
        self
    }

    #[must_use]
    pub fn with_domain_values(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_domain_value = min;
        self.max_domain_value = max;
        self
    }

    #[must_use]
    pub fn has_extent_bounds(&self) -> bool {
        self.min_domain_extent.is_some() || self.max_domain_extent.is_some()
    }

    #[must_use]
    pub fn has_value_bounds(&self) -> bool {
        self.min_domain_value.is_some() || self.max_domain_value.is_some()
    }

    pub fn validate(&self) -> ChartResult<()> {
        if let Some(min) = self.min_domain_extent {
            if !min.is_finite() || min < 0.0 {
                return Err(ChartError::InvalidConfiguration(
                    "min domain extent must be finite and non-negative".to_owned(),
                ));
            }
        }
        if let Some(max) = self.max_domain_extent {
            if !max.is_finite() || max <= 0.0 {
                return Err(ChartError::InvalidConfiguration(
                    "max domain extent must be finite and positive".to_owned(),
                ));
            }
        }
        if let (Some(min), Some(max)) = (self.min_domain_extent, self.max_domain_extent) {
            if min > max {
                return Err(ChartError::InvalidConfiguration(
                    "min domain extent must not exceed max domain extent".to_owned(),
                ));
            }
        }

        for value in [self.min_domain_value, self.max_domain_value]
            .into_iter()
            .flatten()
        {
            if !value.is_finite() {
                return Err(ChartError::InvalidConfiguration(
                    "domain value bounds must be finite".to_owned(),
                ));
            }
        }
        if let (Some(min), Some(max)) = (self.min_domain_value, self.max_domain_value) {
            if min > max {
                return Err(ChartError::InvalidConfiguration(
                    "min domain value must not exceed max domain value".to_owned(),
                ));
            }
        }
        Ok(())
    }
}
