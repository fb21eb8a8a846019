use thiserror::Error;

/// Failure of a single pipeline run. Every variant is terminal for that run.
#[derive(Debug, Error)]
pub enum LookupError {
    /// Transport failure or non-success HTTP status.
    #[error("Network error during {stage}: {message}")]
    Network { stage: &'static str, message: String },

    /// Geocoding (or IP location) produced no usable place.
    #[error("Location not found: {0}")]
    LocationNotFound(String),

    /// Response body was not the JSON shape we expect.
    #[error("Failed to parse {stage} response: {message}")]
    Parse { stage: &'static str, message: String },

    /// The forecast did not contain the current hour and the fallback policy is `fail`.
    #[error("Forecast has no entry for the current hour ({0})")]
    HourNotFound(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl LookupError {
    pub(crate) fn network(stage: &'static str, message: impl Into<String>) -> Self {
        Self::Network { stage, message: message.into() }
    }

    pub(crate) fn parse(stage: &'static str, message: impl Into<String>) -> Self {
        Self::Parse { stage, message: message.into() }
    }
}

pub type Result<T, E = LookupError> = std::result::Result<T, E>;
