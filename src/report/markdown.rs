use crate::guidance::GuidanceTier;
use crate::prediction::Prediction;

/// Markdown formatter for predictions
pub struct MarkdownFormatter;

impl MarkdownFormatter {
    /// Format a prediction with its safety actions
    pub fn format(prediction: &Prediction) -> String {
        Self::render(prediction, false)
    }

    /// Same as `format`, plus the mapped feature table
    pub fn format_with_features(prediction: &Prediction) -> String {
        Self::render(prediction, true)
    }

    fn render(prediction: &Prediction, with_features: bool) -> String {
        let mut md = String::with_capacity(1024);

        md.push_str(&format!("## Predicted Flood Risk: {}%\n\n", prediction.risk_percent));

        let r = &prediction.readings;
        md.push_str("| Rainfall (mm) | Humidity (%) | Temperature (°C) | Soil Moisture (%) |\n");
        md.push_str("|---|---|---|---|\n");
        md.push_str(&format!(
            "| {} | {} | {} | {} |\n\n",
            r.rainfall_mm, r.humidity_pct, r.temperature_c, r.soil_moisture_pct
        ));
        md.push_str(&format!("*Scorer:* {}\n\n", prediction.scorer));

        if let Some(factors) = &prediction.factors {
            if factors.rainfall_cutoff {
                md.push_str("*Rainfall below 50mm: no flood expected.*\n\n");
            } else if factors.ceiling_applied {
                md.push_str("*Rainfall at or below 150mm: risk capped at 15%.*\n\n");
            }
        }

        if with_features {
            md.push_str("### Mapped Features\n\n");
            md.push_str("| Feature | Value |\n|---|---|\n");
            for (name, value) in prediction.features.iter() {
                md.push_str(&format!("| {} | {:.2} |\n", name.as_str(), value));
            }
            md.push('\n');
        }

        if let Some(tier) = &prediction.tier {
            md.push_str(&format!("### Flood Safety Actions ({}% Risk)\n\n", tier.label()));
            Self::push_actions(&mut md, tier);
        }

        md
    }

    /// Format a single guide band, as shown by the manual risk lookup
    pub fn format_tier(tier: &GuidanceTier) -> String {
        let mut md = String::with_capacity(768);
        md.push_str(&format!("### For {}% Flood Risk:\n\n", tier.label()));
        Self::push_actions(&mut md, tier);
        md
    }

    fn push_actions(md: &mut String, tier: &GuidanceTier) {
        md.push_str(&format!("**Before Flood:** {}\n\n", tier.before));
        md.push_str(&format!("**During Flood:** {}\n\n", tier.during));
        md.push_str(&format!("**After Flood:** {}\n\n", tier.after));
    }
}
