use crate::prediction::Prediction;
use serde_json;

/// JSON formatter for predictions
pub struct JsonFormatter;

impl JsonFormatter {
    /// Format prediction as pretty-printed JSON
    pub fn format(prediction: &Prediction) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(prediction)
    }

    /// Format prediction as compact JSON (no whitespace)
    pub fn format_compact(prediction: &Prediction) -> Result<String, serde_json::Error> {
        serde_json::to_string(prediction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prediction::FloodPredictor;
    use crate::readings::RawReadings;

    #[test]
    fn test_format_json() {
        let prediction = FloodPredictor::default()
            .predict(&RawReadings::mumbai_sample())
            .unwrap();
        let json = JsonFormatter::format(&prediction).unwrap();

        assert!(json.contains("\"risk_percent\": 60.29"));
        assert!(json.contains("\"scorer\": \"formula-cutoff\""));
        assert!(json.contains("\"low\": 60.0"));
    }

    #[test]
    fn test_format_compact() {
        let prediction = FloodPredictor::default()
            .predict(&RawReadings::mumbai_sample())
            .unwrap();
        let json = JsonFormatter::format_compact(&prediction).unwrap();

        // Compact format should have no newlines (except potentially in strings)
        assert!(!json.contains("\n  "));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let drainage = value["features"]["TopographyDrainage"].as_f64().unwrap();
        assert!((drainage - 9.75).abs() < 1e-9);
    }
}
