use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("unsupported stacking order: {0}")]
    UnsupportedStackingOrder(String),

    #[error("serialization failed: {0}")]
    Serialization(String),
}
