use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

use super::ChartScalesConfig;
use super::config::{ChartScalesConfigInput, parse_error};

pub const CHART_SCALES_CONFIG_JSON_SCHEMA_V1: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartScalesConfigJsonContractV1 {
    pub schema_version: u32,
    pub config: ChartScalesConfig,
}

impl ChartScalesConfig {
    pub fn to_json_contract_v1_pretty(&self) -> ChartResult<String> {
        let payload = ChartScalesConfigJsonContractV1 {
            schema_version: CHART_SCALES_CONFIG_JSON_SCHEMA_V1,
            config: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            ChartError::Serialization(format!("failed to serialize config contract v1: {e}"))
        })
    }

    /// Accepts either a bare config or a versioned v1 contract.
    pub fn from_json_compat_str(input: &str) -> ChartResult<Self> {
        let value: serde_json::Value = serde_json::from_str(input).map_err(|e| {
            ChartError::Serialization(format!("failed to parse config json payload: {e}"))
        })?;
        if value.get("schema_version").is_none() {
            return Self::from_json_str(input);
        }

        let payload: ContractV1Input = serde_json::from_value(value).map_err(parse_error)?;
        if payload.schema_version != CHART_SCALES_CONFIG_JSON_SCHEMA_V1 {
            return Err(ChartError::Serialization(format!(
                "unsupported config schema version: {}",
                payload.schema_version
            )));
        }
        let config = Self::try_from(payload.config)?;
        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Deserialize)]
struct ContractV1Input {
    schema_version: u32,
    config: ChartScalesConfigInput,
}
