//! Flood Risk Scorer
//!
//! Estimates flood risk from four environmental readings and maps the result
//! to tiered safety guidance.
//!
//! Layout:
//! - `features/`: ten bounded display features derived from the readings
//! - `scorer/`: closed-form formulas and the trained-model scorer
//! - `guidance/`: the ordered safety guide and first-match lookup
//! - `prediction`: the coordinator tying scorer, features and guide together
//! - `report/`: Markdown and JSON formatters
//! - `batch`: CSV batch input
//! - `training/`: offline pipeline producing model artifacts
//! - `api_server`: Axum HTTP API (feature `api`)

pub mod api_server;
pub mod batch;
pub mod config;
pub mod error;
pub mod features;
pub mod guidance;
pub mod prediction;
pub mod readings;
pub mod report;
pub mod scorer;
pub mod training;
pub mod utils;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{FloodError, Result};
pub use features::{map_inputs_to_features, FeatureName, MappedFeatures};
pub use guidance::{lookup, GuidanceTier, SAFETY_GUIDE};
pub use prediction::{FloodPredictor, Prediction};
pub use readings::RawReadings;
pub use report::{JsonFormatter, MarkdownFormatter};
pub use scorer::{FormulaScorer, FormulaVariant, ModelScorer, RiskScorer, ScorerKind};

#[cfg(feature = "api")]
pub use api_server::{create_router, AppState};
