use thiserror::Error;

//errors raised by the simulator and the indicator engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid candle shape: {0}")]
    InvalidShape(String),
    #[error("Entry index {index} out of range for {len} candles")]
    InvalidIndex { index: usize, len: usize },
    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),
    #[error("Unknown indicator: {0}")]
    UnknownIndicator(String),
}

impl SimError {
    pub fn invalid_parameter(name: &str, reason: impl Into<String>) -> Self {
        SimError::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
