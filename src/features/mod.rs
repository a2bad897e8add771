//! Feature mapping for display
//!
//! Derives ten bounded domain features from the four raw readings. The mapped
//! values are a diagnostic aid only and never feed the scorers.

pub mod mapper;

pub use mapper::{map_inputs_to_features, FeatureName, MappedFeatures, FEATURE_ORDER};
