//! Error types for flood risk scoring
//!
//! Library operations return `FloodError`. Binaries and the training pipeline
//! wrap these in `anyhow::Error` with added context.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the scoring core
#[derive(Debug, Error)]
pub enum FloodError {
    /// Model artifact missing at startup
    #[error("model unavailable: no artifact at {path:?}")]
    ModelUnavailable { path: PathBuf },

    /// Model artifact present but unusable
    #[error("invalid model artifact {path:?}: {reason}")]
    ModelInvalid { path: PathBuf, reason: String },

    /// Estimator parameters do not match the declared feature list
    #[error("model shape mismatch: expected {expected} coefficients, found {found}")]
    ModelShape { expected: usize, found: usize },

    /// NaN or infinite reading supplied
    #[error("reading '{field}' is not a finite number")]
    NonFiniteReading { field: &'static str },

    /// Bad configuration value
    #[error("invalid configuration {key}={value:?}")]
    Config { key: &'static str, value: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FloodError>;
