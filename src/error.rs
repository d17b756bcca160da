use thiserror::Error;

/// Errors raised while building or extending a candle series.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SeriesError {
    #[error("Invalid candle at index {index}: {reason}")]
    InvalidCandle { index: usize, reason: String },

    #[error("Candle at index {index} is not newer than its predecessor")]
    OutOfOrder { index: usize },
}

/// Hard preconditions of the indicator layer.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum IndicatorError {
    #[error("Insufficient data: {required} candles required, {available} available")]
    InsufficientData { required: usize, available: usize },

    #[error("Last close is zero, percentage indicators are undefined")]
    ZeroPrice,
}

/// Raised when text cannot be parsed into a trade side.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DirectionError {
    #[error("Invalid direction: {0}")]
    InvalidDirection(String),
}

/// Rejected configuration values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid config field `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Engine error types.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Data unavailable: {0}")]
    DataUnavailable(#[from] IndicatorError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Series(#[from] SeriesError),
}

pub type Result<T> = std::result::Result<T, EngineError>;
