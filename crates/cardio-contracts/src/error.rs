//! Error types for the cardio risk pipeline.
//!
//! All fallible operations return `CardioResult<T>`. Variants carry enough
//! context to tell the caller which input to fix, without leaking internals
//! of the risk oracle.

use thiserror::Error;

/// The unified error type for the cardio crates.
#[derive(Debug, Error)]
pub enum CardioError {
    /// A patient field is missing, non-finite, or outside its clinical range.
    #[error("invalid patient field '{field}': {reason}")]
    InvalidPatient { field: String, reason: String },

    /// An action id outside the closed range 0..=4.
    #[error("invalid action id {value}: expected an integer between 0 and 4")]
    InvalidAction { value: i64 },

    /// The risk oracle has no model loaded.
    ///
    /// Fatal for the calling request. No fallback prediction is attempted.
    #[error("risk oracle not ready: {reason}")]
    OracleNotReady { reason: String },

    /// The feature schema of the record does not match the oracle's schema.
    #[error("feature mismatch: expected [{expected}], found [{found}]")]
    FeatureMismatch { expected: String, found: String },

    /// The oracle failed while computing a prediction.
    #[error("prediction failed: {reason}")]
    PredictionFailed { reason: String },

    /// A configuration document or model artifact is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// Raw patient input failed JSON Schema validation.
    #[error("schema validation failed: {}", .failures.join("; "))]
    SchemaValidation { failures: Vec<String> },

    /// A file could not be read or written.
    #[error("i/o error on '{path}': {reason}")]
    Io { path: String, reason: String },
}

impl CardioError {
    /// True when the error means the service cannot answer at all right now,
    /// as opposed to the caller sending bad input.
    pub fn is_service_unavailable(&self) -> bool {
        matches!(self, CardioError::OracleNotReady { .. })
    }

    /// True for errors caused by the caller's input.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            CardioError::InvalidPatient { .. }
                | CardioError::InvalidAction { .. }
                | CardioError::SchemaValidation { .. }
        )
    }
}

/// Convenience alias used throughout the cardio crates.
pub type CardioResult<T> = Result<T, CardioError>;
