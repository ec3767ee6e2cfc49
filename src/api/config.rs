use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::quantitative_scale::{
    DEFAULT_PAD_PROPORTION, QuantitativeKind, QuantitativeScale,
};
use crate::core::stacking::{StackLayout, StackingOrder};
use crate::core::types::ScaleId;
use crate::error::{ChartError, ChartResult};
use crate::interaction::{PanZoomConstraints, PanZoomController};

/// Stacking options of a stacked plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StackingConfig {
    #[serde(default)]
    pub order: StackingOrder,
}

/// Serializable scale and interaction setup.
///
/// Host applications persist/load this instead of inventing their own
/// format. Pan/zoom constraints are keyed by a host-chosen scale name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ChartScalesConfigInput")]
pub struct ChartScalesConfig {
    pub scales: IndexMap<String, PanZoomConstraints>,
    pub stacking: StackingConfig,
    pub pad_proportion: f64,
    pub snapping_domain_enabled: bool,
}

impl Default for ChartScalesConfig {
    fn default() -> Self {
        Self {
            scales: IndexMap::new(),
            stacking: StackingConfig::default(),
            pad_proportion: default_pad_proportion(),
            snapping_domain_enabled: default_snapping_domain_enabled(),
        }
    }
}

impl ChartScalesConfig {
    /// Sets pan/zoom constraints for the scale called `name`.
    #[must_use]
    pub fn with_scale_constraints(
        mut self,
        name: impl Into<String>,
        constraints: PanZoomConstraints,
    ) -> Self {
        self.scales.insert(name.into(), constraints);
        self
    }

    #[must_use]
    pub fn with_stacking_order(mut self, order: StackingOrder) -> Self {
        self.stacking.order = order;
        self
    }

    #[must_use]
    pub fn with_pad_proportion(mut self, pad_proportion: f64) -> Self {
        self.pad_proportion = pad_proportion;
        self
    }

    #[must_use]
    pub fn with_snapping_domain_enabled(mut self, enabled: bool) -> Self {
        self.snapping_domain_enabled = enabled;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.pad_proportion.is_finite() || self.pad_proportion < 0.0 {
            return Err(ChartError::InvalidConfiguration(
                "pad proportion must be finite and >= 0".to_owned(),
            ));
        }
        for (name, constraints) in &self.scales {
            constraints.validate().map_err(|e| match e {
                ChartError::InvalidConfiguration(reason) => {
                    ChartError::InvalidConfiguration(format!("scale `{name}`: {reason}"))
                }
                other => other,
            })?;
        }
        Ok(())
    }

    #[must_use]
    pub fn constraints_for(&self, name: &str) -> Option<&PanZoomConstraints> {
        self.scales.get(name)
    }

    /// Applies padding and snapping options to a continuous scale.
    pub fn apply_to_scale<K: QuantitativeKind>(
        &self,
        scale: &mut QuantitativeScale<K>,
    ) -> ChartResult<()> {
        scale.set_pad_proportion(self.pad_proportion)?;
        scale.set_snapping_domain_enabled(self.snapping_domain_enabled);
        Ok(())
    }

    /// Installs the constraints configured under `name` for scale `id`.
    /// Unknown names are left unconstrained.
    pub fn apply_to_controller(
        &self,
        controller: &mut PanZoomController,
        name: &str,
        id: ScaleId,
    ) -> ChartResult<()> {
        match self.scales.get(name) {
            Some(constraints) => controller.set_constraints(id, *constraints),
            None => Ok(()),
        }
    }

    pub fn apply_to_stack_layout<K>(&self, layout: &mut StackLayout<K>) {
        layout.set_order(self.stacking.order);
    }

    /// Serializes config to pretty JSON for debug/config files.
    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ChartError::Serialization(format!("failed to serialize config: {e}")))
    }

    /// Deserializes and validates config from JSON.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let input: ChartScalesConfigInput = serde_json::from_str(input).map_err(parse_error)?;
        let config = Self::try_from(input)?;
        config.validate()?;
        Ok(config)
    }
}

/// Wire form of [`ChartScalesConfig`]. The stacking order stays a raw token
/// until [`StackingOrder::from_str`] accepts it, so an unknown order is
/// reported as [`ChartError::UnsupportedStackingOrder`].
#[derive(Debug, Deserialize)]
pub(super) struct ChartScalesConfigInput {
    #[serde(default)]
    scales: IndexMap<String, PanZoomConstraints>,
    #[serde(default)]
    stacking: StackingConfigInput,
    #[serde(default = "default_pad_proportion")]
    pad_proportion: f64,
    #[serde(default = "default_snapping_domain_enabled")]
    snapping_domain_enabled: bool,
}

#[derive(Debug, Default, Deserialize)]
struct StackingConfigInput {
    #[serde(default)]
    order: Option<String>,
}

impl TryFrom<ChartScalesConfigInput> for ChartScalesConfig {
    type Error = ChartError;

    fn try_from(input: ChartScalesConfigInput) -> ChartResult<Self> {
        let order = input
            .stacking
            .order
            .as_deref()
            .map(StackingOrder::from_str)
            .transpose()?
            .unwrap_or_default();
        Ok(Self {
            scales: input.scales,
            stacking: StackingConfig { order },
            pad_proportion: input.pad_proportion,
            snapping_domain_enabled: input.snapping_domain_enabled,
        })
    }
}

pub(super) fn parse_error(error: serde_json::Error) -> ChartError {
    ChartError::Serialization(format!("failed to parse config: {error}"))
}

fn default_pad_proportion() -> f64 {
    DEFAULT_PAD_PROPORTION
}

fn default_snapping_domain_enabled() -> bool {
    true
}
