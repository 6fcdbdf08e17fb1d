//! Error types.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, SignalError>;

/// Errors raised while validating configuration or an optimization request.
///
/// Degenerate timing plans are not errors; they are reported as
/// [`Diagnostic`](crate::models::Diagnostic)s on the solution.
#[derive(Debug, Error)]
pub enum SignalError {
    #[error("request contains no lanes")]
    EmptyRequest,

    #[error("negative count {count} for '{category}' in lane '{lane}'")]
    NegativeCount {
        lane: String,
        category: String,
        count: i64,
    },

    #[error("duplicate lane identifier '{0}'")]
    DuplicateLane(String),

    #[error("saturation flow must be positive and finite, got {0}")]
    NonPositiveSaturationFlow(f64),

    #[error("min cycle time {min}s exceeds max cycle time {max}s")]
    CycleBounds { min: u32, max: u32 },

    #[error("weight for '{category}' must be non-negative and finite, got {weight}")]
    InvalidWeight { category: String, weight: f64 },

    #[error("configuration parse error: {0}")]
    ConfigParse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(String),
}

impl SignalError {
    /// Returns `true` for errors caused by a malformed request.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            SignalError::EmptyRequest
                | SignalError::NegativeCount { .. }
                | SignalError::DuplicateLane(_)
                | SignalError::Json(_)
        )
    }

    /// Returns `true` for errors caused by solver configuration.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            SignalError::NonPositiveSaturationFlow(_)
                | SignalError::CycleBounds { .. }
                | SignalError::InvalidWeight { .. }
                | SignalError::ConfigParse(_)
                | SignalError::Io(_)
        )
    }
}

impl From<toml::de::Error> for SignalError {
    fn from(err: toml::de::Error) -> Self {
        SignalError::ConfigParse(err.to_string())
    }
}
