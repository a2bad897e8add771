//! Feature Mapper
//!
//! Each feature is an independent affine/ratio transform of one or two raw
//! readings, scaled by a fixed per-feature maximum and clamped to [0, max].
//!
//! | Feature               | Max | Source                         |
//! |-----------------------|-----|--------------------------------|
//! | MonsoonIntensity      | 16  | rainfall / 10                  |
//! | TopographyDrainage    | 18  | 1 - soil/120                   |
//! | ClimateChange         | 17  | temperature / 45               |
//! | DamsQuality           | 16  | 1 - rainfall/180               |
//! | Siltation             | 16  | (rainfall + soil) / 200        |
//! | AgriculturalPractices | 16  | soil / 100                     |
//! | DrainageSystems       | 17  | 1 - soil/110                   |
//! | CoastalVulnerability  | 17  | (humidity + rainfall/6) / 110  |
//! | Landslides            | 16  | (rainfall + soil) / 240        |
//! | Watersheds            | 16  | 1 - rainfall/300               |

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use crate::readings::RawReadings;
use crate::utils::inverse_ramp;

/// The ten mapped feature names, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureName {
    MonsoonIntensity,
    TopographyDrainage,
    ClimateChange,
    DamsQuality,
    Siltation,
    AgriculturalPractices,
    DrainageSystems,
    CoastalVulnerability,
    Landslides,
    Watersheds,
}

pub const FEATURE_ORDER: [FeatureName; 10] = [
    FeatureName::MonsoonIntensity,
    FeatureName::TopographyDrainage,
    FeatureName::ClimateChange,
    FeatureName::DamsQuality,
    FeatureName::Siltation,
    FeatureName::AgriculturalPractices,
    FeatureName::DrainageSystems,
    FeatureName::CoastalVulnerability,
    FeatureName::Landslides,
    FeatureName::Watersheds,
];

impl FeatureName {
    pub fn as_str(self) -> &'static str {
        match self {
            FeatureName::MonsoonIntensity => "MonsoonIntensity",
            FeatureName::TopographyDrainage => "TopographyDrainage",
            FeatureName::ClimateChange => "ClimateChange",
            FeatureName::DamsQuality => "DamsQuality",
            FeatureName::Siltation => "Siltation",
            FeatureName::AgriculturalPractices => "AgriculturalPractices",
            FeatureName::DrainageSystems => "DrainageSystems",
            FeatureName::CoastalVulnerability => "CoastalVulnerability",
            FeatureName::Landslides => "Landslides",
            FeatureName::Watersheds => "Watersheds",
        }
    }

    /// Upper clamp bound
    pub fn max_value(self) -> f64 {
        match self {
            FeatureName::TopographyDrainage => 18.0,
            FeatureName::ClimateChange
            | FeatureName::DrainageSystems
            | FeatureName::CoastalVulnerability => 17.0,
            FeatureName::MonsoonIntensity
            | FeatureName::DamsQuality
            | FeatureName::Siltation
            | FeatureName::AgriculturalPractices
            | FeatureName::Landslides
            | FeatureName::Watersheds => 16.0,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Mapped feature values indexed by `FeatureName`
///
/// Serializes as a JSON object whose keys follow `FEATURE_ORDER`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MappedFeatures {
    values: [f64; 10],
}

impl MappedFeatures {
    pub fn get(&self, name: FeatureName) -> f64 {
        self.values[name.index()]
    }

    /// (name, value) pairs in display order
    pub fn iter(&self) -> impl Iterator<Item = (FeatureName, f64)> + '_ {
        FEATURE_ORDER.iter().map(move |&name| (name, self.get(name)))
    }
}

impl Serialize for MappedFeatures {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FEATURE_ORDER.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name.as_str(), &value)?;
        }
        map.end()
    }
}

/// Map raw readings into the ten bounded display features
pub fn map_inputs_to_features(readings: &RawReadings) -> MappedFeatures {
    let rainfall = readings.rainfall_mm;
    let humidity = readings.humidity_pct;
    let temperature = readings.temperature_c;
    let soil = readings.soil_moisture_pct;

    let mut values = [0.0; 10];
    for name in FEATURE_ORDER {
        let max = name.max_value();
        let raw = match name {
            // Not scaled by max; the clamp alone bounds it
            FeatureName::MonsoonIntensity => rainfall / 10.0,
            FeatureName::TopographyDrainage => inverse_ramp(soil, 120.0) * max,
            FeatureName::ClimateChange => (temperature / 45.0) * max,
            FeatureName::DamsQuality => inverse_ramp(rainfall, 180.0) * max,
            FeatureName::Siltation => ((rainfall + soil) / 200.0) * max,
            FeatureName::AgriculturalPractices => (soil / 100.0) * max,
            FeatureName::DrainageSystems => inverse_ramp(soil, 110.0) * max,
            FeatureName::CoastalVulnerability => ((humidity + rainfall / 6.0) / 110.0) * max,
            FeatureName::Landslides => ((rainfall + soil) / 240.0) * max,
            FeatureName::Watersheds => inverse_ramp(rainfall, 300.0) * max,
        };
        values[name.index()] = raw.clamp(0.0, max);
    }

    MappedFeatures { values }
}
