//! Closed-form flood risk formulas
//!
//! Two generations of the formula exist:
//!
//! - **Cutoff** (canonical): low-rainfall cutoff, piecewise rainfall ramp,
//!   weights 0.40/0.25/0.15/0.10/0.10, and a post-hoc 0.15 ceiling for
//!   rainfall at or below 150mm.
//! - **WeightedSum**: the earlier plain five-term sum with no cutoff or cap.
//!
//! The variants are never blended; a scorer runs exactly one.

use serde::{Deserialize, Serialize};
use crate::readings::RawReadings;
use crate::utils::{clamp_unit, inverse_ramp, piecewise_linear};

/// Rainfall below this returns zero risk
pub const NO_FLOOD_RAINFALL_MM: f64 = 50.0;

/// Rainfall at or below this is capped at `LOW_RAINFALL_CEILING`
pub const CAPPED_RAINFALL_MM: f64 = 150.0;
pub const LOW_RAINFALL_CEILING: f64 = 0.15;

/// Rainfall factor breakpoints (mm, factor)
const RAINFALL_RAMP: [(f64, f64); 3] = [(0.0, 0.0), (150.0, 0.15), (300.0, 1.0)];

/// Heat band: factor is 1 at 10°C falling to 0 at 45°C
const HEAT_BAND_FLOOR_C: f64 = 10.0;
const HEAT_BAND_WIDTH_C: f64 = 35.0;

const DRAINAGE_SCALE: f64 = 120.0;

const W_RAINFALL: f64 = 0.40;
const W_HUMIDITY: f64 = 0.25;
const W_HEAT: f64 = 0.15;
const W_DRAINAGE: f64 = 0.10;
const W_SOIL: f64 = 0.10;

/// Which formula generation to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormulaVariant {
    #[default]
    Cutoff,
    WeightedSum,
}

/// Per-factor breakdown of a formula score
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FactorBreakdown {
    pub rainfall_factor: f64,
    pub humidity_factor: f64,
    pub heat_factor: f64,
    pub drainage_factor: f64,
    pub soil_factor: f64,
    /// Weighted sum clamped to [0,1], before any ceiling
    pub weighted_sum: f64,
    /// Final score after cutoff and ceiling
    pub score: f64,
    pub rainfall_cutoff: bool,
    pub ceiling_applied: bool,
}

impl FactorBreakdown {
    fn zeroed() -> Self {
        Self {
            rainfall_factor: 0.0,
            humidity_factor: 0.0,
            heat_factor: 0.0,
            drainage_factor: 0.0,
            soil_factor: 0.0,
            weighted_sum: 0.0,
            score: 0.0,
            rainfall_cutoff: false,
            ceiling_applied: false,
        }
    }
}

/// Formula scorer for one variant
#[derive(Debug, Clone, Copy, Default)]
pub struct FormulaScorer {
    variant: FormulaVariant,
}

impl FormulaScorer {
    pub fn new(variant: FormulaVariant) -> Self {
        Self { variant }
    }

    pub fn variant(&self) -> FormulaVariant {
        self.variant
    }

    pub fn name(&self) -> &'static str {
        match self.variant {
            FormulaVariant::Cutoff => "formula-cutoff",
            FormulaVariant::WeightedSum => "formula-weighted-sum",
        }
    }

    /// Probability of flooding in [0,1]
    pub fn score(&self, readings: &RawReadings) -> f64 {
        self.breakdown(readings).score
    }

    /// Non-finite readings score 0 with all factors zeroed
    pub fn breakdown(&self, readings: &RawReadings) -> FactorBreakdown {
        if readings.ensure_finite().is_err() {
            return FactorBreakdown::zeroed();
        }
        match self.variant {
            FormulaVariant::Cutoff => cutoff_breakdown(readings),
            FormulaVariant::WeightedSum => weighted_sum_breakdown(readings),
        }
    }
}

fn cutoff_breakdown(readings: &RawReadings) -> FactorBreakdown {
    let rainfall = readings.rainfall_mm;

    let rainfall_factor = piecewise_linear(rainfall, &RAINFALL_RAMP);
    let humidity_factor = clamp_unit(readings.humidity_pct / 100.0);
    let heat_factor = clamp_unit(1.0 - (readings.temperature_c - HEAT_BAND_FLOOR_C) / HEAT_BAND_WIDTH_C);
    let drainage_factor = clamp_unit(inverse_ramp(readings.soil_moisture_pct, DRAINAGE_SCALE));
    let soil_factor = clamp_unit(readings.soil_moisture_pct / 100.0);

    let weighted_sum = clamp_unit(
        W_RAINFALL * rainfall_factor
            + W_HUMIDITY * humidity_factor
            + W_HEAT * (1.0 - heat_factor)
            + W_DRAINAGE * drainage_factor
            + W_SOIL * soil_factor,
    );

    let rainfall_cutoff = rainfall < NO_FLOOD_RAINFALL_MM;
    let ceiling_applied = !rainfall_cutoff
        && rainfall <= CAPPED_RAINFALL_MM
        && weighted_sum > LOW_RAINFALL_CEILING;

    // Cutoff wins over everything; the ceiling overrides the weighted sum
    let score = if rainfall_cutoff {
        0.0
    } else if rainfall <= CAPPED_RAINFALL_MM {
        weighted_sum.min(LOW_RAINFALL_CEILING)
    } else {
        weighted_sum
    };

    FactorBreakdown {
        rainfall_factor,
        humidity_factor,
        heat_factor,
        drainage_factor,
        soil_factor,
        weighted_sum,
        score,
        rainfall_cutoff,
        ceiling_applied,
    }
}

fn weighted_sum_breakdown(readings: &RawReadings) -> FactorBreakdown {
    let rainfall_factor = readings.rainfall_mm / 400.0;
    let humidity_factor = readings.humidity_pct / 100.0;
    let heat_factor = readings.temperature_c / 45.0;
    let drainage_factor = inverse_ramp(readings.soil_moisture_pct, DRAINAGE_SCALE);
    let soil_factor = readings.soil_moisture_pct / 100.0;

    let weighted_sum = clamp_unit(
        0.30 * rainfall_factor
            + 0.20 * humidity_factor
            + 0.15 * heat_factor
            + 0.20 * (1.0 - drainage_factor)
            + 0.15 * soil_factor,
    );

    FactorBreakdown {
        rainfall_factor,
        humidity_factor,
        heat_factor,
        drainage_factor,
        soil_factor,
        weighted_sum,
        score: weighted_sum,
        rainfall_cutoff: false,
        ceiling_applied: false,
    }
}
