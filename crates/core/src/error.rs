use thiserror::Error;

#[derive(Error, Debug)]
pub enum GridwatchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid reading: {0}")]
    InvalidReading(String),

    #[error("Zone not found: {0}")]
    ZoneNotFound(String),

    #[error("Alert not found: {0}")]
    AlertNotFound(String),

    #[error("Invalid weights: {0}")]
    InvalidWeights(String),

    #[error("Forecast baseline not set for zone: {0}")]
    BaselineNotSet(String),

    #[error("Zone config error: {0}")]
    ZoneConfig(String),

    #[error("{0}")]
    Other(String),
}
