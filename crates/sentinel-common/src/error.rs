//! Error types for Sentinel.

use thiserror::Error;

/// Top-level error type for Sentinel operations.
#[derive(Debug, Error)]
pub enum SentinelError {
    /// Configuration errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Invalid values found while validating a configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Field must be strictly greater than zero
    #[error("{field} must be positive, got {value}")]
    NotPositive {
        /// Field name
        field: &'static str,
        /// Offending value
        value: f32,
    },

    /// Field must not be negative
    #[error("{field} must not be negative, got {value}")]
    Negative {
        /// Field name
        field: &'static str,
        /// Offending value
        value: f32,
    },

    /// Field is outside its allowed range
    #[error("{field} must be within [{min}, {max}], got {value}")]
    OutOfRange {
        /// Field name
        field: &'static str,
        /// Offending value
        value: f32,
        /// Inclusive lower bound
        min: f32,
        /// Inclusive upper bound
        max: f32,
    },

    /// Field is NaN or infinite
    #[error("{field} must be finite")]
    NotFinite {
        /// Field name
        field: &'static str,
    },

    /// Two fields contradict each other
    #[error("{field} is inconsistent: {reason}")]
    Inconsistent {
        /// Field name
        field: &'static str,
        /// Why the value is rejected
        reason: String,
    },
}

impl ConfigError {
    /// Checks that `value` is finite and strictly positive.
    pub fn require_positive(field: &'static str, value: f32) -> Result<(), Self> {
        if !value.is_finite() {
            return Err(Self::NotFinite { field });
        }
        if value <= 0.0 {
            return Err(Self::NotPositive { field, value });
        }
        Ok(())
    }

    /// Checks that `value` is finite and not negative.
    pub fn require_non_negative(field: &'static str, value: f32) -> Result<(), Self> {
        if !value.is_finite() {
            return Err(Self::NotFinite { field });
        }
        if value < 0.0 {
            return Err(Self::Negative { field, value });
        }
        Ok(())
    }

    /// Checks that `value` lies within `[min, max]`.
    pub fn require_range(field: &'static str, value: f32, min: f32, max: f32) -> Result<(), Self> {
        if !value.is_finite() {
            return Err(Self::NotFinite { field });
        }
        if value < min || value > max {
            return Err(Self::OutOfRange {
                field,
                value,
                min,
                max,
            });
        }
        Ok(())
    }
}

/// Result type alias for Sentinel operations.
pub type SentinelResult<T> = Result<T, SentinelError>;
