// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Configuration management for the training dashboard

pub mod fitness_config;

use crate::constants::{env_config, periods};
use crate::intelligence::periods::PeriodType;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub use fitness_config::FitnessConfig;

/// Configuration problems that must stop the run before any work is done
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("Missing required environment variables: {}", .0.join(", "))]
    MissingVariables(Vec<String>),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub sources: SourceConfig,
    #[serde(default)]
    pub output: OutputConfig,
    /// Weeks on the overview dashboard
    #[serde(default = "default_overview_weeks")]
    pub overview_weeks: usize,
    /// Periodic reports built alongside the overview
    #[serde(default = "default_reports")]
    pub reports: Vec<ReportSchedule>,
    /// Optional path to the analytics configuration
    #[serde(default)]
    pub fitness_config_path: Option<String>,
}

/// Where the record source reads from
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourceConfig {
    /// Source implementation ("json")
    #[serde(default = "default_source_kind")]
    pub kind: String,
    pub training_path: PathBuf,
    pub health_path: PathBuf,
}

/// Where the sink writes to
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    pub directory: PathBuf,
}

/// One periodic report: `count` periods of `period_type`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ReportSchedule {
    pub title: String,
    pub period_type: PeriodType,
    pub count: usize,
}

impl Config {
    /// Load configuration from a TOML file, falling back to the environment
    pub fn load(path: Option<String>) -> Result<Self> {
        if let Some(explicit) = path {
            return Self::load_from_file(Path::new(&explicit));
        }

        let default_path = dirs::config_dir()
            .map(|p| {
                p.join(env_config::CONFIG_DIR_NAME)
                    .join(env_config::CONFIG_FILE_NAME)
            })
            .unwrap_or_else(|| PathBuf::from(env_config::CONFIG_FILE_NAME));

        if default_path.exists() {
            Self::load_from_file(&default_path)
        } else {
            dotenv::dotenv().ok();
            Ok(Self::from_env()?)
        }
    }

    /// Load configuration from a specific TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Build configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigurationError> {
        let training_path = env::var(env_config::TRAINING_RECORDS_PATH).ok();
        let health_path = env::var(env_config::HEALTH_RECORDS_PATH).ok();

        let mut missing = Vec::new();
        if training_path.as_deref().map_or(true, str::is_empty) {
            missing.push(env_config::TRAINING_RECORDS_PATH.to_string());
        }
        if health_path.as_deref().map_or(true, str::is_empty) {
            missing.push(env_config::HEALTH_RECORDS_PATH.to_string());
        }

        match (training_path, health_path) {
            (Some(training), Some(health)) if missing.is_empty() => {
                let config = Self {
                    sources: SourceConfig {
                        kind: default_source_kind(),
                        training_path: PathBuf::from(training),
                        health_path: PathBuf::from(health),
                    },
                    output: OutputConfig::default(),
                    overview_weeks: default_overview_weeks(),
                    reports: default_reports(),
                    fitness_config_path: env_config::fitness_config_path(),
                };
                config.validate()?;
                Ok(config)
            }
            _ => Err(ConfigurationError::MissingVariables(missing)),
        }
    }

    /// Reject period counts of zero
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.overview_weeks == 0 {
            return Err(ConfigurationError::InvalidValue {
                key: "overview_weeks".to_string(),
                value: "0".to_string(),
            });
        }
        if let Some(report) = self.reports.iter().find(|r| r.count == 0) {
            return Err(ConfigurationError::InvalidValue {
                key: format!("reports.{}.count", report.title),
                value: "0".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(env_config::output_dir()),
        }
    }
}

impl ReportSchedule {
    /// File-name friendly form of the title ("Monthly Report" -> "monthly-report")
    pub fn slug(&self) -> String {
        slugify(&self.title)
    }
}

/// Lowercase ASCII alphanumerics joined by single dashes
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

fn default_source_kind() -> String {
    "json".to_string()
}

fn default_overview_weeks() -> usize {
    periods::OVERVIEW_WEEKS
}

fn default_reports() -> Vec<ReportSchedule> {
    ReportSchedule::default_schedule()
}

impl ReportSchedule {
    /// Monthly, quarterly and yearly reports
    pub fn default_schedule() -> Vec<Self> {
        periods::REPORT_SCHEDULE
            .iter()
            .filter_map(|&(title, period_type, count)| {
                period_type.parse().ok().map(|period_type| ReportSchedule {
                    title: title.to_string(),
                    period_type,
                    count,
                })
            })
            .collect()
    }
}
