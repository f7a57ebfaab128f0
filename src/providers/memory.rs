// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use super::{retain_since, RecordSource};
use crate::models::{HealthRecord, TrainingRecord};
use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Serves records held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    training: Vec<TrainingRecord>,
    health: Vec<HealthRecord>,
}

impl InMemorySource {
    pub fn new(training: Vec<TrainingRecord>, health: Vec<HealthRecord>) -> Self {
        Self { training, health }
    }
}

#[async_trait]
impl RecordSource for InMemorySource {
    async fn training_records(&self, since: Option<NaiveDate>) -> Result<Vec<TrainingRecord>> {
        Ok(retain_since(self.training.clone(), since, |r| r.date))
    }

    async fn health_records(&self, since: Option<NaiveDate>) -> Result<Vec<HealthRecord>> {
        Ok(retain_since(self.health.clone(), since, |r| r.date))
    }

    fn source_name(&self) -> &'static str {
        "memory"
    }
}
