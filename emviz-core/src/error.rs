//! Error types for parameter validation and config loading.
//!
//! Sampling a waveform never fails; these only surface where parameters
//! enter the system (constructors, TOML files, unit strings).

use std::path::PathBuf;

/// A waveform parameter that would make a visualization meaningless.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParameterError {
    #[error("{field} must be finite, got {value}")]
    NotFinite { field: &'static str, value: f64 },

    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    #[error("slip must lie strictly between 0 and 1, got {0}")]
    SlipOutOfRange(f64),

    #[error("phase count must be at least 3, got {0}")]
    TooFewPhases(usize),

    #[error("phase count must be at most {max}, got {count}")]
    TooManyPhases { count: usize, max: usize },

    #[error("particle flow needs at least one marker")]
    NoMarkers,

    #[error("particle flow takes at most {max} markers, got {count}")]
    TooManyMarkers { count: usize, max: usize },

    #[error("degenerate path: {0}")]
    DegeneratePath(String),

    #[error("invalid angular speed '{input}': {reason}")]
    InvalidSpeed { input: String, reason: String },
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config read error: {0}")]
    ReadError(String),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),

    #[error("unknown visualization '{0}'")]
    UnknownVisualization(String),

    #[error(transparent)]
    Parameter(#[from] ParameterError),
}

/// Reject NaN and infinities.
pub(crate) fn ensure_finite(field: &'static str, value: f64) -> Result<f64, ParameterError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ParameterError::NotFinite { field, value })
    }
}

/// Reject non-finite, zero and negative values.
pub(crate) fn ensure_positive(field: &'static str, value: f64) -> Result<f64, ParameterError> {
    let value = ensure_finite(field, value)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(ParameterError::NotPositive { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finite_check_rejects_nan() {
        assert!(ensure_finite("omega", f64::NAN).is_err());
        assert_eq!(ensure_finite("omega", -1.5), Ok(-1.5));
    }

    #[test]
    fn positive_check_rejects_zero() {
        let err = ensure_positive("peak_voltage", 0.0).unwrap_err();
        assert_eq!(err.to_string(), "peak_voltage must be positive, got 0");
    }

    #[test]
    fn parameter_error_converts_into_config_error() {
        let err: ConfigError = ParameterError::TooFewPhases(2).into();
        assert_eq!(err.to_string(), "phase count must be at least 3, got 2");
    }
}
