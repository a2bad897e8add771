//! Offline training pipeline
//!
//! Turns hourly weather observations into a frozen model artifact that
//! `ModelScorer` can load: a random forest by default, or an OLS `linear`
//! model. Runs from the `train_model` binary.

pub mod daily;
pub mod forest;
pub mod regression;

pub use daily::{aggregate_daily, read_hourly_csv, to_dataframe, with_proxy_columns, write_daily_csv, DailyRecord};
pub use forest::{fit_forest, ForestFit, ForestParams};
pub use regression::{evaluate, feature_importance, fit_ols, train_test_split, Evaluation, LinearFit};

use anyhow::{bail, Result};
use crate::scorer::{Estimator, ModelArtifact, ModelFeature, OutputScale};

/// Column order of the regressor's design matrix
pub const TRAINING_FEATURES: [ModelFeature; 4] = [
    ModelFeature::Rainfall,
    ModelFeature::Temperature,
    ModelFeature::Humidity,
    ModelFeature::SoilMoisture,
];

pub const TEST_FRACTION: f64 = 0.2;
pub const DEFAULT_SEED: u64 = 42;

/// Which estimator to fit
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Trainer {
    Forest(ForestParams),
    Linear,
}

impl Default for Trainer {
    fn default() -> Self {
        Trainer::Forest(ForestParams::default())
    }
}

/// Everything the trainer reports
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub artifact: ModelArtifact,
    pub evaluation: Evaluation,
    /// Normalized importance per entry of `TRAINING_FEATURES`
    pub importance: Vec<f64>,
    pub n_train: usize,
    pub n_test: usize,
}

fn design_row(record: &DailyRecord) -> Vec<f64> {
    vec![record.rainfall, record.temperature, record.humidity, record.soil_moisture]
}

/// Fit and evaluate the default forest on daily records
pub fn train(records: &[DailyRecord], name: &str, seed: u64) -> Result<TrainingOutcome> {
    train_with(records, name, seed, Trainer::default())
}

/// Fit and evaluate the chosen estimator on daily records
pub fn train_with(records: &[DailyRecord], name: &str, seed: u64, trainer: Trainer) -> Result<TrainingOutcome> {
    // Days with no temperature/humidity samples cannot be used
    let usable: Vec<DailyRecord> = records
        .iter()
        .filter(|r| design_row(r).iter().all(|v| v.is_finite()) && r.flood_risk_pct.is_finite())
        .cloned()
        .collect();
    if usable.len() < 10 {
        bail!("need at least 10 complete days to train, got {}", usable.len());
    }

    let (train_rows, test_rows) = train_test_split(&usable, TEST_FRACTION, seed);
    tracing::info!("Training on {} days, evaluating on {}", train_rows.len(), test_rows.len());

    let x_train: Vec<Vec<f64>> = train_rows.iter().map(design_row).collect();
    let y_train: Vec<f64> = train_rows.iter().map(|r| r.flood_risk_pct).collect();
    let x_test: Vec<Vec<f64>> = test_rows.iter().map(design_row).collect();
    let y_test: Vec<f64> = test_rows.iter().map(|r| r.flood_risk_pct).collect();

    let (estimator, evaluation, importance) = match trainer {
        Trainer::Forest(params) => {
            let fit = fit_forest(&x_train, &y_train, &params, seed)?;
            let evaluation = evaluate(|row| fit.predict(row), &x_test, &y_test);
            (Estimator::Forest { trees: fit.trees }, evaluation, fit.importance)
        }
        Trainer::Linear => {
            let fit = fit_ols(&x_train, &y_train)?;
            let evaluation = evaluate(|row| fit.predict(row), &x_test, &y_test);
            let importance = feature_importance(&fit, &x_train);
            let estimator = Estimator::Linear {
                intercept: fit.intercept,
                coefficients: fit.coefficients,
            };
            (estimator, evaluation, importance)
        }
    };

    let artifact = ModelArtifact {
        name: name.to_string(),
        output: OutputScale::Percent,
        features: TRAINING_FEATURES.to_vec(),
        estimator,
    };
    artifact.validate()?;

    Ok(TrainingOutcome {
        artifact,
        evaluation,
        importance,
        n_train: train_rows.len(),
        n_test: test_rows.len(),
    })
}
