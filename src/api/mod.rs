mod config;
mod json_contract;

pub use config::{ChartScalesConfig, StackingConfig};
pub use json_contract::{CHART_SCALES_CONFIG_JSON_SCHEMA_V1, ChartScalesConfigJsonContractV1};
