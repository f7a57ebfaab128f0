// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Analytics configuration: training categories, feeling scale, load zones
//! and overreaching thresholds
//!
//! The configuration is immutable once loaded and is handed to the
//! aggregators and analyzers explicitly.

use crate::constants::{categories, env_config, feeling, load, overreaching};
use crate::models::{Feeling, TrainingType};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main analytics configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitnessConfig {
    pub categories: CategoryConfig,
    pub feeling_scale: FeelingScale,
    pub training_load: LoadZoneThresholds,
    pub overreaching: OverreachingThresholds,
}

/// Which training types count as running or gym work
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryConfig {
    pub running_types: Vec<TrainingType>,
    pub gym_types: Vec<TrainingType>,
    /// Feelings counted as tough sessions
    pub tough_feelings: Vec<Feeling>,
}

/// Ordinal score for each known feeling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeelingScale {
    pub exhausted: u8,
    pub tired: u8,
    pub okay: u8,
    pub good: u8,
    pub great: u8,
    /// Scores at or above this count towards the good/great percentage
    pub good_threshold: u8,
}

/// ACWR zone boundaries
///
/// `acwr < detraining_below` is detraining, `<= optimal_max` optimal,
/// `<= caution_max` caution, anything above is danger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadZoneThresholds {
    pub detraining_below: f64,
    pub optimal_max: f64,
    pub caution_max: f64,
    /// Prior periods averaged into the chronic load
    pub chronic_window: usize,
}

/// Health-marker thresholds for overreaching detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverreachingThresholds {
    pub acwr_threshold: f64,
    pub body_battery_ratio: f64,
    pub sleep_ratio: f64,
    pub resting_hr_ratio: f64,
}

impl FitnessConfig {
    /// Load analytics configuration from file or use defaults
    ///
    /// Lookup order: explicit path, `FITNESS_CONFIG_PATH`,
    /// `fitness_config.toml` in the working directory, built-in defaults.
    pub fn load(path: Option<String>) -> Result<Self> {
        if let Some(config_path) = path.or_else(env_config::fitness_config_path) {
            return Self::load_from_file(&config_path);
        }

        if Path::new(env_config::DEFAULT_FITNESS_CONFIG_FILE).exists() {
            return Self::load_from_file(env_config::DEFAULT_FITNESS_CONFIG_FILE);
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read fitness config file: {}", path))?;

        let config: FitnessConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse fitness config file: {}", path))?;

        Ok(config)
    }
}

impl CategoryConfig {
    pub fn is_running(&self, training_type: &TrainingType) -> bool {
        self.running_types.contains(training_type)
    }

    pub fn is_gym(&self, training_type: &TrainingType) -> bool {
        self.gym_types.contains(training_type)
    }

    pub fn is_tough(&self, feeling: &Feeling) -> bool {
        self.tough_feelings.contains(feeling)
    }
}

impl Default for CategoryConfig {
    fn default() -> Self {
        Self {
            running_types: categories::RUNNING_TYPES
                .iter()
                .map(|&t| TrainingType::from(t))
                .collect(),
            gym_types: categories::GYM_TYPES
                .iter()
                .map(|&t| TrainingType::from(t))
                .collect(),
            tough_feelings: categories::TOUGH_FEELINGS
                .iter()
                .map(|&f| Feeling::from(f))
                .collect(),
        }
    }
}

impl FeelingScale {
    /// Ordinal score, `None` for feelings outside the scale
    pub fn score(&self, feeling: &Feeling) -> Option<u8> {
        match feeling {
            Feeling::Exhausted => Some(self.exhausted),
            Feeling::Tired => Some(self.tired),
            Feeling::Okay => Some(self.okay),
            Feeling::Good => Some(self.good),
            Feeling::Great => Some(self.great),
            Feeling::Other(_) => None,
        }
    }
}

impl Default for FeelingScale {
    fn default() -> Self {
        Self {
            exhausted: feeling::EXHAUSTED,
            tired: feeling::TIRED,
            okay: feeling::OKAY,
            good: feeling::GOOD,
            great: feeling::GREAT,
            good_threshold: feeling::GOOD_THRESHOLD,
        }
    }
}

impl Default for LoadZoneThresholds {
    fn default() -> Self {
        Self {
            detraining_below: load::DETRAINING_BELOW,
            optimal_max: load::OPTIMAL_MAX,
            caution_max: load::CAUTION_MAX,
            chronic_window: load::CHRONIC_WINDOW,
        }
    }
}

impl Default for OverreachingThresholds {
    fn default() -> Self {
        Self {
            acwr_threshold: overreaching::ACWR_THRESHOLD,
            body_battery_ratio: overreaching::BODY_BATTERY_RATIO,
            sleep_ratio: overreaching::SLEEP_RATIO,
            resting_hr_ratio: overreaching::RESTING_HR_RATIO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_categories() {
        let config = FitnessConfig::default();
        let categories = &config.categories;

        assert!(categories.is_running(&TrainingType::Running));
        assert!(!categories.is_running(&TrainingType::Mobility));
        assert!(categories.is_gym(&TrainingType::GymStrength));
        assert!(categories.is_gym(&TrainingType::GymCrossfit));
        assert!(!categories.is_gym(&TrainingType::Other("Yoga".to_string())));
        assert!(categories.is_tough(&Feeling::Tired));
        assert!(categories.is_tough(&Feeling::Exhausted));
        assert!(!categories.is_tough(&Feeling::Okay));
    }

    #[test]
    fn test_feeling_scale() {
        let scale = FeelingScale::default();

        assert_eq!(scale.score(&Feeling::Exhausted), Some(1));
        assert_eq!(scale.score(&Feeling::Okay), Some(3));
        assert_eq!(scale.score(&Feeling::Great), Some(5));
        assert_eq!(scale.score(&Feeling::Other("Meh".to_string())), None);
        assert_eq!(scale.good_threshold, 4);
    }

    #[test]
    fn test_load_zone_defaults() {
        let zones = LoadZoneThresholds::default();

        assert_eq!(zones.detraining_below, 0.8);
        assert_eq!(zones.optimal_max, 1.3);
        assert_eq!(zones.caution_max, 1.5);
        assert_eq!(zones.chronic_window, 3);
    }

    #[test]
    fn test_config_file_loading() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(
            temp_file,
            r#"
[categories]
running_types = ["Running", "Trail"]
gym_types = ["Gym-Strength"]
tough_feelings = ["Exhausted"]

[training_load]
detraining_below = 0.75
optimal_max = 1.25
caution_max = 1.5
chronic_window = 4

[overreaching]
acwr_threshold = 1.2
        "#
        )?;

        let config = FitnessConfig::load_from_file(temp_file.path().to_str().unwrap())?;

        assert!(config
            .categories
            .is_running(&TrainingType::Other("Trail".to_string())));
        assert!(!config.categories.is_gym(&TrainingType::GymCrossfit));
        assert!(!config.categories.is_tough(&Feeling::Tired));
        assert_eq!(config.training_load.chronic_window, 4);
        assert_eq!(config.overreaching.acwr_threshold, 1.2);
        // Sections and keys left out keep their defaults
        assert_eq!(config.overreaching.sleep_ratio, 0.9);
        assert_eq!(config.feeling_scale, FeelingScale::default());

        Ok(())
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = FitnessConfig::load_from_file("/nonexistent/fitness_config.toml");
        assert!(result.is_err());
    }
}
