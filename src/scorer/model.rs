//! Trained-model scorer
//!
//! Loads a frozen estimator from a JSON artifact once at startup and scores
//! readings with it. Training happens offline (see the `train_model` binary).
//!
//! Artifact layout:
//!
//! ```json
//! {
//!   "name": "mumbai-ols",
//!   "output": "percent",
//!   "features": ["rainfall", "temperature", "humidity", "soil_moisture"],
//!   "estimator": { "type": "linear", "intercept": 1.5, "coefficients": [0.2, 0.0, 0.1, 0.3] }
//! }
//! ```
//!
//! `estimator` may also be `logistic` (probability classifier) or `forest`
//! (mean of regression trees stored as flat node arrays).

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use crate::error::{FloodError, Result};
use crate::readings::RawReadings;
use crate::scorer::formula::NO_FLOOD_RAINFALL_MM;
use crate::utils::clamp_unit;

/// Reading consumed by a model, in artifact column order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelFeature {
    Rainfall,
    Temperature,
    Humidity,
    SoilMoisture,
}

impl ModelFeature {
    fn extract(self, readings: &RawReadings) -> f64 {
        match self {
            ModelFeature::Rainfall => readings.rainfall_mm,
            ModelFeature::Temperature => readings.temperature_c,
            ModelFeature::Humidity => readings.humidity_pct,
            ModelFeature::SoilMoisture => readings.soil_moisture_pct,
        }
    }
}

/// Scale of the estimator's raw output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputScale {
    /// Regressor predicting a risk percentage in [0,100]
    Percent,
    /// Classifier predicting flood probability in [0,1]
    Probability,
}

/// Regression tree node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Leaf { leaf: f64 },
    /// Go left when x[feature] <= threshold
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    pub nodes: Vec<TreeNode>,
}

impl RegressionTree {
    pub fn predict(&self, x: &[f64]) -> f64 {
        let mut idx = 0;
        // Validation guarantees indices are in range; the step bound guards cycles
        for _ in 0..=self.nodes.len() {
            match &self.nodes[idx] {
                TreeNode::Leaf { leaf } => return *leaf,
                TreeNode::Split { feature, threshold, left, right } => {
                    idx = if x[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
        0.0
    }

    fn validate(&self, n_features: usize) -> std::result::Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        for (i, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Leaf { leaf } => {
                    if !leaf.is_finite() {
                        return Err(format!("node {} has a non-finite leaf", i));
                    }
                }
                TreeNode::Split { feature, threshold, left, right } => {
                    if *feature >= n_features {
                        return Err(format!("node {} splits on feature {} of {}", i, feature, n_features));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("node {} has a non-finite threshold", i));
                    }
                    // Children must point forward, which rules out cycles
                    for child in [*left, *right] {
                        if child <= i || child >= self.nodes.len() {
                            return Err(format!("node {} has invalid child {}", i, child));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

/// Frozen estimator parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Estimator {
    Linear { intercept: f64, coefficients: Vec<f64> },
    Logistic { intercept: f64, coefficients: Vec<f64> },
    Forest { trees: Vec<RegressionTree> },
}

impl Estimator {
    fn predict(&self, x: &[f64]) -> f64 {
        match self {
            Estimator::Linear { intercept, coefficients } => linear_term(*intercept, coefficients, x),
            Estimator::Logistic { intercept, coefficients } => {
                let z = linear_term(*intercept, coefficients, x);
                1.0 / (1.0 + (-z).exp())
            }
            Estimator::Forest { trees } => {
                let total: f64 = trees.iter().map(|t| t.predict(x)).sum();
                total / trees.len() as f64
            }
        }
    }
}

fn linear_term(intercept: f64, coefficients: &[f64], x: &[f64]) -> f64 {
    intercept + coefficients.iter().zip(x).map(|(c, v)| c * v).sum::<f64>()
}

/// Serialized model document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub name: String,
    pub output: OutputScale,
    pub features: Vec<ModelFeature>,
    pub estimator: Estimator,
}

impl ModelArtifact {
    /// Check parameter shapes against the declared feature list
    pub fn validate(&self) -> Result<()> {
        let n = self.features.len();
        if !(3..=4).contains(&n) {
            return Err(FloodError::ModelShape { expected: 4, found: n });
        }
        if !self.features.contains(&ModelFeature::Rainfall) {
            return Err(FloodError::ModelInvalid {
                path: PathBuf::new(),
                reason: "feature list must include rainfall".to_string(),
            });
        }
        for (i, feature) in self.features.iter().enumerate() {
            if self.features[..i].contains(feature) {
                return Err(FloodError::ModelInvalid {
                    path: PathBuf::new(),
                    reason: format!("duplicate feature {:?}", feature),
                });
            }
        }

        match &self.estimator {
            Estimator::Linear { intercept, coefficients }
            | Estimator::Logistic { intercept, coefficients } => {
                if coefficients.len() != n {
                    return Err(FloodError::ModelShape { expected: n, found: coefficients.len() });
                }
                if !intercept.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
                    return Err(FloodError::ModelInvalid {
                        path: PathBuf::new(),
                        reason: "non-finite coefficient".to_string(),
                    });
                }
            }
            Estimator::Forest { trees } => {
                if trees.is_empty() {
                    return Err(FloodError::ModelInvalid {
                        path: PathBuf::new(),
                        reason: "forest has no trees".to_string(),
                    });
                }
                for (i, tree) in trees.iter().enumerate() {
                    tree.validate(n).map_err(|reason| FloodError::ModelInvalid {
                        path: PathBuf::new(),
                        reason: format!("tree {}: {}", i, reason),
                    })?;
                }
            }
        }
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// Scorer backed by a loaded, validated artifact
#[derive(Debug, Clone)]
pub struct ModelScorer {
    artifact: ModelArtifact,
}

impl ModelScorer {
    /// Load and validate an artifact, failing fast when it is missing
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(FloodError::ModelUnavailable { path: path.to_path_buf() });
        }

        let contents = fs::read_to_string(path)?;
        let artifact: ModelArtifact = serde_json::from_str(&contents).map_err(|e| FloodError::ModelInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        artifact.validate().map_err(|e| match e {
            FloodError::ModelInvalid { reason, .. } => FloodError::ModelInvalid {
                path: path.to_path_buf(),
                reason,
            },
            other => other,
        })?;

        tracing::info!(
            "Loaded model '{}' ({} features, {:?} output) from {:?}",
            artifact.name,
            artifact.features.len(),
            artifact.output,
            path
        );

        Ok(Self { artifact })
    }

    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self> {
        artifact.validate()?;
        Ok(Self { artifact })
    }

    pub fn name(&self) -> &str {
        &self.artifact.name
    }

    pub fn artifact(&self) -> &ModelArtifact {
        &self.artifact
    }

    /// Probability of flooding in [0,1]
    ///
    /// Rainfall below the no-flood cutoff short-circuits to 0 without
    /// consulting the estimator. Non-finite readings also score 0.
    pub fn score(&self, readings: &RawReadings) -> f64 {
        if readings.ensure_finite().is_err() || readings.rainfall_mm < NO_FLOOD_RAINFALL_MM {
            return 0.0;
        }

        let x: Vec<f64> = self
            .artifact
            .features
            .iter()
            .map(|f| f.extract(readings))
            .collect();
        let raw = self.artifact.estimator.predict(&x);

        let probability = match self.artifact.output {
            OutputScale::Percent => raw.clamp(0.0, 100.0) / 100.0,
            OutputScale::Probability => clamp_unit(raw),
        };
        // NaN from a degenerate estimator maps to no risk
        if probability.is_nan() { 0.0 } else { probability }
    }
}
