//! Ordinary least squares fit, split and evaluation helpers
//!
//! The linear fit solves the least-squares problem over an intercept column
//! with nalgebra's SVD, rejecting rank-deficient designs.

use anyhow::{anyhow, bail, Result};
use nalgebra::{DMatrix, DVector};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Relative singular value below which the design counts as rank deficient
const RANK_TOLERANCE: f64 = 1e-10;

/// Fitted linear model
#[derive(Debug, Clone, PartialEq)]
pub struct LinearFit {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

impl LinearFit {
    pub fn predict(&self, x: &[f64]) -> f64 {
        self.intercept + self.coefficients.iter().zip(x).map(|(c, v)| c * v).sum::<f64>()
    }
}

/// Held-out evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub r2: f64,
    pub rmse: f64,
}

/// Shuffle with a fixed seed and split off `test_fraction` of the rows
pub fn train_test_split<T: Clone>(rows: &[T], test_fraction: f64, seed: u64) -> (Vec<T>, Vec<T>) {
    let mut indices: Vec<usize> = (0..rows.len()).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let n_test = ((rows.len() as f64) * test_fraction).ceil() as usize;
    let n_test = n_test.min(rows.len());

    let test = indices[..n_test].iter().map(|&i| rows[i].clone()).collect();
    let train = indices[n_test..].iter().map(|&i| rows[i].clone()).collect();
    (train, test)
}

/// Fit y ≈ b0 + Σ b_j x_j by SVD least squares
pub fn fit_ols(x: &[Vec<f64>], y: &[f64]) -> Result<LinearFit> {
    if x.is_empty() || x.len() != y.len() {
        bail!("need matching non-empty X ({} rows) and y ({} rows)", x.len(), y.len());
    }
    let p = x[0].len();
    if x.iter().any(|row| row.len() != p) {
        bail!("ragged feature matrix");
    }
    let k = p + 1;
    if x.len() < k {
        bail!("need at least {} rows to fit {} coefficients, got {}", k, k, x.len());
    }

    // Design matrix with a leading intercept column
    let design = DMatrix::from_fn(x.len(), k, |r, c| if c == 0 { 1.0 } else { x[r][c - 1] });
    let target = DVector::from_column_slice(y);

    let svd = design.svd(true, true);
    let largest = svd.singular_values.max();
    let smallest = svd.singular_values.min();
    if smallest <= largest * RANK_TOLERANCE {
        bail!("singular design matrix (a column is constant or collinear)");
    }

    let beta = svd.solve(&target, 0.0).map_err(|e| anyhow!(e))?;
    Ok(LinearFit {
        intercept: beta[0],
        coefficients: beta.iter().skip(1).copied().collect(),
    })
}

pub fn r2_score(y_true: &[f64], y_pred: &[f64]) -> f64 {
    let n = y_true.len() as f64;
    let mean = y_true.iter().sum::<f64>() / n;
    let ss_res: f64 = y_true.iter().zip(y_pred).map(|(t, p)| (t - p).powi(2)).sum();
    let ss_tot: f64 = y_true.iter().map(|t| (t - mean).powi(2)).sum();
    if ss_tot == 0.0 {
        return if ss_res == 0.0 { 1.0 } else { 0.0 };
    }
    1.0 - ss_res / ss_tot
}

pub fn rmse(y_true: &[f64], y_pred: &[f64]) -> f64 {
    let n = y_true.len() as f64;
    let mse: f64 = y_true.iter().zip(y_pred).map(|(t, p)| (t - p).powi(2)).sum::<f64>() / n;
    mse.sqrt()
}

/// Score any fitted predictor on held-out rows
pub fn evaluate<F>(predict: F, x: &[Vec<f64>], y: &[f64]) -> Evaluation
where
    F: Fn(&[f64]) -> f64,
{
    let predicted: Vec<f64> = x.iter().map(|row| predict(row)).collect();
    Evaluation {
        r2: r2_score(y, &predicted),
        rmse: rmse(y, &predicted),
    }
}

/// Standardized coefficient magnitudes |b_j|·sd(x_j), normalized to sum to 1
pub fn feature_importance(fit: &LinearFit, x: &[Vec<f64>]) -> Vec<f64> {
    let n = x.len() as f64;
    let raw: Vec<f64> = fit
        .coefficients
        .iter()
        .enumerate()
        .map(|(j, c)| {
            let mean = x.iter().map(|row| row[j]).sum::<f64>() / n;
            let var = x.iter().map(|row| (row[j] - mean).powi(2)).sum::<f64>() / n;
            c.abs() * var.sqrt()
        })
        .collect();

    let total: f64 = raw.iter().sum();
    if total > 0.0 {
        raw.iter().map(|v| v / total).collect()
    } else {
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_recovers_exact_linear_relationship() {
        // y = 2 + 0.5 a - 1.5 b + 3 c
        let x: Vec<Vec<f64>> = (0..30)
            .map(|i| {
                let i = i as f64;
                vec![i, (i * 7.0) % 11.0, (i * 3.0) % 5.0]
            })
            .collect();
        let y: Vec<f64> = x.iter().map(|r| 2.0 + 0.5 * r[0] - 1.5 * r[1] + 3.0 * r[2]).collect();

        let fit = fit_ols(&x, &y).unwrap();
        assert_relative_eq!(fit.intercept, 2.0, epsilon = 1e-8);
        assert_relative_eq!(fit.coefficients[0], 0.5, epsilon = 1e-8);
        assert_relative_eq!(fit.coefficients[1], -1.5, epsilon = 1e-8);
        assert_relative_eq!(fit.coefficients[2], 3.0, epsilon = 1e-8);

        let eval = evaluate(|row| fit.predict(row), &x, &y);
        assert_relative_eq!(eval.r2, 1.0, epsilon = 1e-9);
        assert!(eval.rmse < 1e-8);
    }

    #[test]
    fn test_constant_column_is_singular() {
        let x: Vec<Vec<f64>> = (0..10).map(|i| vec![i as f64, 1.0]).collect();
        let y: Vec<f64> = (0..10).map(|i| i as f64).collect();
        assert!(fit_ols(&x, &y).is_err());
    }

    #[test]
    fn test_too_few_rows() {
        let x = vec![vec![1.0, 2.0]];
        assert!(fit_ols(&x, &[1.0]).is_err());
    }

    #[test]
    fn test_split_is_deterministic_and_complete() {
        let rows: Vec<usize> = (0..100).collect();
        let (train_a, test_a) = train_test_split(&rows, 0.2, 42);
        let (train_b, test_b) = train_test_split(&rows, 0.2, 42);

        assert_eq!(test_a.len(), 20);
        assert_eq!(train_a.len(), 80);
        assert_eq!(test_a, test_b);
        assert_eq!(train_a, train_b);

        let mut all: Vec<usize> = train_a.into_iter().chain(test_a).collect();
        all.sort_unstable();
        assert_eq!(all, rows);
    }

    #[test]
    fn test_r2_and_rmse() {
        let y = [1.0, 2.0, 3.0, 4.0];
        assert_relative_eq!(r2_score(&y, &y), 1.0, epsilon = 1e-12);
        assert_relative_eq!(rmse(&y, &[2.0, 3.0, 4.0, 5.0]), 1.0, epsilon = 1e-12);
        // Predicting the mean scores zero
        assert_relative_eq!(r2_score(&y, &[2.5; 4]), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_feature_importance_sums_to_one() {
        let fit = LinearFit { intercept: 0.0, coefficients: vec![1.0, 0.0, 2.0] };
        let x: Vec<Vec<f64>> = (0..10).map(|i| vec![i as f64, i as f64, i as f64]).collect();
        let importance = feature_importance(&fit, &x);

        assert_relative_eq!(importance.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
        assert_eq!(importance[1], 0.0);
        assert_relative_eq!(importance[2], 2.0 / 3.0, epsilon = 1e-12);
    }
}
