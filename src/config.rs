//! Generation parameters
//!
//! Every tunable of a run in one serde value. Missing fields fall back to
//! their defaults, so a config file only needs to name what it changes.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::accessibility::AccessibilityParams;
use crate::error::{MapGenError, Result};
use crate::generators::{CityParams, FeatureParams, RiverParams};
use crate::range::IntRange;
use crate::road_cost::RoadCostParams;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub accessibility: AccessibilityParams,
    pub mountain: FeatureParams,
    pub sea: FeatureParams,
    pub forest: FeatureParams,
    pub desert: FeatureParams,
    pub river: RiverParams,
    pub city: CityParams,
    pub road_cost: RoadCostParams,
}

impl GenerationConfig {
    /// Load and validate a JSON config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&text)?;
        log::info!("loaded generation config from {}", path.as_ref().display());
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: GenerationConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let a = &self.accessibility;
        if !(0.0..=1.0).contains(&a.min_fill_ratio) {
            return Err(invalid(format!(
                "accessibility.min_fill_ratio must be within [0, 1], got {}",
                a.min_fill_ratio
            )));
        }
        if a.wide_threshold < 0 || a.narrow_threshold < 0 {
            return Err(invalid("accessibility thresholds must not be negative".into()));
        }

        for (name, feature) in [
            ("mountain", &self.mountain),
            ("sea", &self.sea),
            ("forest", &self.forest),
            ("desert", &self.desert),
        ] {
            check_positive(name, "width", feature.width_min, feature.width_max)?;
            check_positive(name, "range", feature.range_min, feature.range_max)?;
            if feature.disparity < 0 {
                return Err(invalid(format!("{}.disparity must not be negative", name)));
            }
        }

        check_positive("river", "length", self.river.length_min, self.river.length_max)?;
        if self.river.directness_min < 0 || self.river.directness_max.min < 0 {
            return Err(invalid("river.directness must not be negative".into()));
        }

        if self.city.spacing == 0 {
            return Err(invalid("city.spacing must be positive".into()));
        }
        if self.city.density_min < 0 || self.city.density_max.min < 0 {
            return Err(invalid("city.density must not be negative".into()));
        }
        Ok(())
    }
}

fn invalid(reason: String) -> MapGenError {
    MapGenError::InvalidConfig(reason)
}

fn check_positive(section: &str, field: &str, min: i32, max: IntRange) -> Result<()> {
    if min <= 0 || max.min <= 0 {
        return Err(invalid(format!("{}.{} must be positive", section, field)));
    }
    Ok(())
}
