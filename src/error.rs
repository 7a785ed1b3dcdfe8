// src/error.rs
use thiserror::Error;

/// Errors surfaced by the pattern engine.
///
/// `InsufficientData` is handled locally by detectors as "cannot evaluate";
/// the other variants are caller-facing and raised at the ingestion or
/// configuration boundary, never in the middle of a detection pass.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("insufficient data: required {required} candles, {available} available")]
    InsufficientData { required: usize, available: usize },

    #[error("invalid candle at index {index}: {reason}")]
    InvalidCandle { index: usize, reason: String },

    #[error("configuration error: {0}")]
    Configuration(String),
}

impl From<config::ConfigError> for EngineError {
    fn from(err: config::ConfigError) -> Self {
        EngineError::Configuration(err.to_string())
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
