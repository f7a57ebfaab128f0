// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Record sources feeding the analytics pipeline
//!
//! A source hands over flat, already-normalized records. Fetching from
//! vendor APIs happens upstream; sources here only read what was synced.
//! The [`garmin`], [`stryd`] and [`hevy`] modules turn already-fetched vendor
//! payloads into that record schema.

use crate::config::SourceConfig;
use crate::models::{HealthRecord, TrainingRecord};
use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::path::PathBuf;

pub mod garmin;
pub mod hevy;
pub mod json_file;
pub mod memory;
pub mod stryd;

pub use json_file::JsonFileSource;
pub use memory::InMemorySource;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Unknown record source: {0}. Currently supported: json")]
    UnknownSource(String),

    #[error("Failed to read records from {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse records from {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Training records dated on or after `since`, or all of them when `None`
    async fn training_records(&self, since: Option<NaiveDate>) -> Result<Vec<TrainingRecord>>;

    /// Health records dated on or after `since`, or all of them when `None`
    async fn health_records(&self, since: Option<NaiveDate>) -> Result<Vec<HealthRecord>>;

    fn source_name(&self) -> &'static str;
}

pub fn create_source(kind: &str, config: &SourceConfig) -> Result<Box<dyn RecordSource>> {
    match kind.to_lowercase().as_str() {
        "json" => Ok(Box::new(JsonFileSource::new(
            config.training_path.clone(),
            config.health_path.clone(),
        ))),
        _ => Err(SourceError::UnknownSource(kind.to_string()).into()),
    }
}

/// Keep records dated on or after `since`
///
/// Undated records are kept; they can never be bucketed but still count
/// towards record totals.
pub(crate) fn retain_since<R>(records: Vec<R>, since: Option<NaiveDate>, date: impl Fn(&R) -> Option<NaiveDate>) -> Vec<R> {
    match since {
        Some(since) => records
            .into_iter()
            .filter(|r| date(r).map_or(true, |d| d >= since))
            .collect(),
        None => records,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source_config() -> SourceConfig {
        SourceConfig {
            kind: "json".to_string(),
            training_path: PathBuf::from("training.json"),
            health_path: PathBuf::from("health.json"),
        }
    }

    #[test]
    fn test_create_source() {
        let config = source_config();

        assert_eq!(create_source("json", &config).unwrap().source_name(), "json");
        assert_eq!(create_source("JSON", &config).unwrap().source_name(), "json");

        let err = create_source("notion", &config).err().unwrap();
        assert!(err.to_string().contains("Unknown record source: notion"));

        // in-memory sources are built directly, never from configuration
        let err = create_source("memory", &config).err().unwrap();
        assert!(matches!(
            err.downcast_ref::<SourceError>(),
            Some(SourceError::UnknownSource(kind)) if kind == "memory"
        ));
    }

    #[test]
    fn test_retain_since_keeps_undated() {
        let dates = vec![
            NaiveDate::from_ymd_opt(2026, 1, 1),
            None,
            NaiveDate::from_ymd_opt(2026, 2, 1),
        ];

        let kept = retain_since(dates.clone(), NaiveDate::from_ymd_opt(2026, 1, 15), |d| *d);
        assert_eq!(kept, vec![None, NaiveDate::from_ymd_opt(2026, 2, 1)]);

        assert_eq!(retain_since(dates.clone(), None, |d| *d), dates);
    }
}
