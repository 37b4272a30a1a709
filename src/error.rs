/// Rejection of a single route before any feature is derived from it.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("unknown vehicle category '{0}'")]
    UnknownVehicle(String),
    #[error("unknown traffic category '{0}'")]
    UnknownTraffic(String),
    #[error("{field} must be a positive number, found {value}")]
    NonPositive { field: &'static str, value: f64 },
    #[error("{field} of {value} is too large to derive finite features")]
    OutOfRange { field: &'static str, value: f64 },
}

impl ValidationError {
    /// Name of the offending input field, as it appears on the wire.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::UnknownVehicle(_) => "vehicle",
            ValidationError::UnknownTraffic(_) => "traffic",
            ValidationError::NonPositive { field, .. } => field,
            ValidationError::OutOfRange { field, .. } => field,
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PredictionError {
    #[error("route {route_id}: {source}")]
    InvalidRoute {
        route_id: usize,
        #[source]
        source: ValidationError,
    },
    #[error("no routes submitted")]
    EmptyBatch,
    #[error("route {route_id}: model returned a non-finite estimate")]
    NonFiniteEstimate { route_id: usize },
}

/// The model artifact is missing or unusable. Fatal at startup.
#[derive(thiserror::Error, Debug)]
pub enum ModelError {
    #[error("failed reading model artifact '{filepath}': {error}")]
    ReadError { filepath: String, error: String },
    #[error("failed parsing model artifact: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("invalid model artifact: {0}")]
    Invalid(String),
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("environment variable {key} has invalid value '{value}': {msg}")]
    InvalidValue {
        key: &'static str,
        value: String,
        msg: String,
    },
}
