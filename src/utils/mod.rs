//! Utility modules for flood risk scoring
//!
//! Contains shared functionality used by the feature mapper and scorers:
//! - Normalization: clamps, ramps, piecewise interpolation, rounding

pub mod normalization;

// Re-export commonly used helpers
pub use normalization::{clamp_unit, inverse_ramp, piecewise_linear, round2, to_percent};
