//! Error types for the cost model.

use std::path::PathBuf;

use printcost_mesh::MeshError;
use thiserror::Error;

/// Errors that can occur while building parameters or estimating a cost.
#[derive(Error, Debug)]
pub enum EstimateError {
    /// A numeric input is outside its accepted range.
    #[error("invalid {field}: {reason}")]
    Validation {
        /// Name of the offending parameter.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// The model file could not be read.
    #[error(transparent)]
    Mesh(#[from] MeshError),

    /// The configuration is inconsistent.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        /// Config file path.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for this schema.
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

impl EstimateError {
    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        EstimateError::Validation {
            field,
            reason: reason.into(),
        }
    }
}

/// Result type for cost model operations.
pub type Result<T> = std::result::Result<T, EstimateError>;

/// Reject NaN, infinities and negative values.
pub(crate) fn ensure_non_negative(field: &'static str, value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(EstimateError::validation(field, format!("{value} is not a finite number")));
    }
    if value < 0.0 {
        return Err(EstimateError::validation(field, format!("{value} is negative")));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_non_negative() {
        assert_eq!(ensure_non_negative("hours", 0.0).unwrap(), 0.0);
        assert_eq!(ensure_non_negative("hours", 2.5).unwrap(), 2.5);
        assert!(ensure_non_negative("hours", -0.1).is_err());
        assert!(ensure_non_negative("hours", f64::NAN).is_err());
        assert!(ensure_non_negative("hours", f64::INFINITY).is_err());
    }

    #[test]
    fn test_validation_message_names_field() {
        let err = ensure_non_negative("cost_per_kg", -3.0).unwrap_err();
        assert_eq!(err.to_string(), "invalid cost_per_kg: -3 is negative");
    }
}
