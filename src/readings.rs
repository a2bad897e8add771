//! Raw environmental readings
//!
//! One `RawReadings` value is built per prediction request and never stored.
//! Values outside the documented ranges are accepted as-is; every consumer
//! clamps what it needs.

use serde::{Deserialize, Serialize};
use crate::error::{FloodError, Result};

/// Documented input ranges (used by the CLI help text and the API docs)
pub const RAINFALL_RANGE_MM: (f64, f64) = (0.0, 600.0);
pub const HUMIDITY_RANGE_PCT: (f64, f64) = (0.0, 100.0);
pub const TEMPERATURE_RANGE_C: (f64, f64) = (-10.0, 60.0);
pub const SOIL_MOISTURE_RANGE_PCT: (f64, f64) = (0.0, 100.0);

/// Four readings for a single prediction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawReadings {
    pub rainfall_mm: f64,
    pub humidity_pct: f64,
    pub temperature_c: f64,
    pub soil_moisture_pct: f64,
}

impl RawReadings {
    pub fn new(rainfall_mm: f64, humidity_pct: f64, temperature_c: f64, soil_moisture_pct: f64) -> Self {
        Self {
            rainfall_mm,
            humidity_pct,
            temperature_c,
            soil_moisture_pct,
        }
    }

    /// Static "live data" snapshot shown on the dashboard's first tab
    pub fn mumbai_sample() -> Self {
        Self::new(215.0, 82.0, 29.0, 55.0)
    }

    /// Reject NaN and infinite values; range violations pass through
    pub fn ensure_finite(&self) -> Result<()> {
        let fields = [
            ("rainfall_mm", self.rainfall_mm),
            ("humidity_pct", self.humidity_pct),
            ("temperature_c", self.temperature_c),
            ("soil_moisture_pct", self.soil_moisture_pct),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(FloodError::NonFiniteReading { field });
            }
        }
        Ok(())
    }
}
