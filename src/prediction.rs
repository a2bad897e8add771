//! Flood Predictor - Main coordinator for scoring readings
//!
//! Combines the scorer, the feature mapper and the safety guide into a single
//! prediction. Includes both sequential and parallel (Rayon) batch paths.

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::Serialize;
use crate::error::Result;
use crate::features::{map_inputs_to_features, MappedFeatures};
use crate::guidance::{lookup_in, GuidanceTier, SAFETY_GUIDE};
use crate::readings::RawReadings;
use crate::scorer::{FactorBreakdown, RiskScorer};
use crate::utils::to_percent;

/// Result of one prediction
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub readings: RawReadings,
    pub scorer: String,
    /// Probability in [0,1]
    pub risk_score: f64,
    /// Percentage in [0,100], two decimals
    pub risk_percent: f64,
    /// None when the percentage falls in a gap of the guide
    pub tier: Option<GuidanceTier>,
    pub features: MappedFeatures,
    pub factors: Option<FactorBreakdown>,
    pub generated_at: DateTime<Utc>,
}

/// Immutable prediction handle, built once and shared by reference
#[derive(Debug)]
pub struct FloodPredictor {
    scorer: RiskScorer,
    guide: &'static [GuidanceTier],
}

impl FloodPredictor {
    pub fn new(scorer: RiskScorer) -> Self {
        tracing::info!("Initializing flood predictor (scorer: {})", scorer.name());
        Self {
            scorer,
            guide: SAFETY_GUIDE,
        }
    }

    /// Predictor over a custom ordered guide
    pub fn with_guide(scorer: RiskScorer, guide: &'static [GuidanceTier]) -> Self {
        Self { scorer, guide }
    }

    pub fn scorer(&self) -> &RiskScorer {
        &self.scorer
    }

    pub fn guide(&self) -> &'static [GuidanceTier] {
        self.guide
    }

    /// Guidance for a percentage, first match in guide order
    pub fn guidance_for(&self, risk_pct: f64) -> Option<&'static GuidanceTier> {
        lookup_in(self.guide, risk_pct)
    }

    /// Score one set of readings
    pub fn predict(&self, readings: &RawReadings) -> Result<Prediction> {
        readings.ensure_finite()?;

        let risk_score = self.scorer.score(readings);
        let risk_percent = to_percent(risk_score);
        let tier = self.guidance_for(risk_percent).cloned();

        if tier.is_none() {
            tracing::debug!("No guidance tier matches {}%", risk_percent);
        }
        tracing::debug!(
            "Predicted {}% ({}) for {:?}",
            risk_percent,
            self.scorer.name(),
            readings
        );

        Ok(Prediction {
            readings: *readings,
            scorer: self.scorer.name().to_string(),
            risk_score,
            risk_percent,
            tier,
            features: map_inputs_to_features(readings),
            factors: self.scorer.breakdown(readings),
            generated_at: Utc::now(),
        })
    }

    /// Score many readings sequentially
    pub fn predict_all(&self, readings: &[RawReadings]) -> Vec<Result<Prediction>> {
        readings.iter().map(|r| self.predict(r)).collect()
    }

    /// Score many readings in parallel, preserving input order
    pub fn predict_batch(&self, readings: &[RawReadings]) -> Vec<Result<Prediction>> {
        readings.par_iter().map(|r| self.predict(r)).collect()
    }
}

impl Default for FloodPredictor {
    fn default() -> Self {
        Self::new(RiskScorer::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FloodError;

    #[test]
    fn test_predict_mumbai_sample() {
        let predictor = FloodPredictor::default();
        let prediction = predictor.predict(&RawReadings::mumbai_sample()).unwrap();

        assert_eq!(prediction.risk_percent, 60.29);
        assert_eq!(prediction.scorer, "formula-cutoff");
        let tier = prediction.tier.unwrap();
        assert_eq!((tier.low, tier.high), (60.0, 70.0));
        assert!(prediction.factors.is_some());
    }

    #[test]
    fn test_zero_risk_gets_first_tier() {
        let predictor = FloodPredictor::default();
        let prediction = predictor.predict(&RawReadings::new(10.0, 90.0, 30.0, 80.0)).unwrap();

        assert_eq!(prediction.risk_percent, 0.0);
        assert_eq!(prediction.tier.unwrap().low, 0.0);
    }

    #[test]
    fn test_non_finite_rejected() {
        let predictor = FloodPredictor::default();
        let result = predictor.predict(&RawReadings::new(f64::INFINITY, 50.0, 25.0, 40.0));
        assert!(matches!(result, Err(FloodError::NonFiniteReading { field: "rainfall_mm" })));
    }

    #[test]
    fn test_gap_in_guide_yields_no_tier() {
        static TOP_ONLY: &[GuidanceTier] = &[GuidanceTier {
            low: 90.0,
            high: 100.0,
            before: "b",
            during: "d",
            after: "a",
        }];
        let predictor = FloodPredictor::with_guide(RiskScorer::default(), TOP_ONLY);
        let prediction = predictor.predict(&RawReadings::mumbai_sample()).unwrap();
        assert!(prediction.tier.is_none());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let predictor = FloodPredictor::default();
        let readings: Vec<RawReadings> = (0..64)
            .map(|i| RawReadings::new(i as f64 * 8.0, 60.0 + (i % 40) as f64, 25.0, (i * 3 % 100) as f64))
            .collect();

        let sequential = predictor.predict_all(&readings);
        let parallel = predictor.predict_batch(&readings);

        assert_eq!(sequential.len(), parallel.len());
        for (s, p) in sequential.iter().zip(&parallel) {
            let (s, p) = (s.as_ref().unwrap(), p.as_ref().unwrap());
            assert_eq!(s.readings, p.readings);
            assert_eq!(s.risk_percent, p.risk_percent);
        }
    }
}
