// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use super::{retain_since, RecordSource, SourceError};
use crate::models::{HealthRecord, TrainingRecord};
use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::info;

/// Reads two JSON arrays of flat records, one per record kind
pub struct JsonFileSource {
    training_path: PathBuf,
    health_path: PathBuf,
}

impl JsonFileSource {
    pub fn new(training_path: PathBuf, health_path: PathBuf) -> Self {
        Self {
            training_path,
            health_path,
        }
    }
}

#[async_trait]
impl RecordSource for JsonFileSource {
    async fn training_records(&self, since: Option<NaiveDate>) -> Result<Vec<TrainingRecord>> {
        let records: Vec<TrainingRecord> = read_records(&self.training_path).await?;
        let total = records.len();
        let records = retain_since(records, since, |r| r.date);

        info!(
            path = %self.training_path.display(),
            total,
            kept = records.len(),
            "Loaded training records"
        );
        Ok(records)
    }

    async fn health_records(&self, since: Option<NaiveDate>) -> Result<Vec<HealthRecord>> {
        let records: Vec<HealthRecord> = read_records(&self.health_path).await?;
        let total = records.len();
        let records = retain_since(records, since, |r| r.date);

        info!(
            path = %self.health_path.display(),
            total,
            kept = records.len(),
            "Loaded health records"
        );
        Ok(records)
    }

    fn source_name(&self) -> &'static str {
        "json"
    }
}

async fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, SourceError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SourceError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    serde_json::from_str(&content).map_err(|source| SourceError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
