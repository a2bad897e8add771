//! Risk scorers
//!
//! A `RiskScorer` is built once at startup and shared immutably by every
//! request. It runs exactly one scoring variant.

pub mod formula;
pub mod model;

pub use formula::{FactorBreakdown, FormulaScorer, FormulaVariant};
pub use model::{Estimator, ModelArtifact, ModelFeature, ModelScorer, OutputScale, RegressionTree, TreeNode};

use serde::{Deserialize, Serialize};
use std::path::Path;
use crate::error::{FloodError, Result};
use crate::readings::RawReadings;

/// Scorer selection as written in configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScorerKind {
    #[default]
    Formula,
    Weighted,
    Model,
}

impl std::str::FromStr for ScorerKind {
    type Err = FloodError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "formula" | "cutoff" => Ok(ScorerKind::Formula),
            "weighted" | "weighted_sum" => Ok(ScorerKind::Weighted),
            "model" => Ok(ScorerKind::Model),
            _ => Err(FloodError::Config {
                key: "FLOOD_SCORER",
                value: s.to_string(),
            }),
        }
    }
}

/// The active scoring function
#[derive(Debug, Clone)]
pub enum RiskScorer {
    Formula(FormulaScorer),
    Model(ModelScorer),
}

impl RiskScorer {
    /// Build the scorer for `kind`; the model path is only read for `Model`
    pub fn build(kind: ScorerKind, model_path: &Path) -> Result<Self> {
        match kind {
            ScorerKind::Formula => Ok(RiskScorer::Formula(FormulaScorer::new(FormulaVariant::Cutoff))),
            ScorerKind::Weighted => Ok(RiskScorer::Formula(FormulaScorer::new(FormulaVariant::WeightedSum))),
            ScorerKind::Model => Ok(RiskScorer::Model(ModelScorer::load(model_path)?)),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            RiskScorer::Formula(f) => f.name(),
            RiskScorer::Model(m) => m.name(),
        }
    }

    /// Probability of flooding in [0,1]
    pub fn score(&self, readings: &RawReadings) -> f64 {
        match self {
            RiskScorer::Formula(f) => f.score(readings),
            RiskScorer::Model(m) => m.score(readings),
        }
    }

    /// Factor breakdown, available for the formula scorers only
    pub fn breakdown(&self, readings: &RawReadings) -> Option<FactorBreakdown> {
        match self {
            RiskScorer::Formula(f) => Some(f.breakdown(readings)),
            RiskScorer::Model(_) => None,
        }
    }
}

impl Default for RiskScorer {
    fn default() -> Self {
        RiskScorer::Formula(FormulaScorer::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scorer_kind() {
        assert_eq!("formula".parse::<ScorerKind>().unwrap(), ScorerKind::Formula);
        assert_eq!(" Weighted ".parse::<ScorerKind>().unwrap(), ScorerKind::Weighted);
        assert_eq!("MODEL".parse::<ScorerKind>().unwrap(), ScorerKind::Model);
        assert!(matches!(
            "forest".parse::<ScorerKind>(),
            Err(FloodError::Config { key: "FLOOD_SCORER", .. })
        ));
    }

    #[test]
    fn test_build_formula_ignores_model_path() {
        let scorer = RiskScorer::build(ScorerKind::Formula, Path::new("/does/not/exist.json")).unwrap();
        assert_eq!(scorer.name(), "formula-cutoff");
        assert!(scorer.breakdown(&RawReadings::mumbai_sample()).is_some());
    }

    #[test]
    fn test_build_model_fails_fast_without_artifact() {
        let result = RiskScorer::build(ScorerKind::Model, Path::new("/does/not/exist.json"));
        assert!(matches!(result, Err(FloodError::ModelUnavailable { .. })));
    }
}
