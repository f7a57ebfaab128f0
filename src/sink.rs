// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Destinations for computed dashboards, reports and charts data
//!
//! Sinks receive plain data; any rendering happens downstream.

use crate::config::slugify;
use crate::constants::output;
use crate::dashboard::{ChartsData, DashboardData, PeriodReport};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[async_trait]
pub trait DashboardSink: Send + Sync {
    async fn publish_dashboard(&self, dashboard: &DashboardData) -> Result<()>;

    async fn publish_report(&self, report: &PeriodReport) -> Result<()>;

    async fn publish_charts(&self, charts: &ChartsData) -> Result<()>;
}

/// Writes pretty-printed JSON files into one output directory
pub struct JsonFileSink {
    directory: PathBuf,
    charts_path: Option<PathBuf>,
}

impl JsonFileSink {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            charts_path: None,
        }
    }

    /// Write charts data to `path` instead of `<directory>/data.json`
    pub fn with_charts_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.charts_path = Some(path.into());
        self
    }

    pub fn dashboard_path(&self) -> PathBuf {
        self.directory.join(output::DASHBOARD_FILE)
    }

    pub fn report_path(&self, title: &str) -> PathBuf {
        self.directory
            .join(format!("{}{}.json", output::REPORT_PREFIX, slugify(title)))
    }

    pub fn charts_path(&self) -> PathBuf {
        self.charts_path
            .clone()
            .unwrap_or_else(|| self.directory.join(output::CHARTS_FILE))
    }
}

#[async_trait]
impl DashboardSink for JsonFileSink {
    async fn publish_dashboard(&self, dashboard: &DashboardData) -> Result<()> {
        write_json(&self.dashboard_path(), dashboard).await
    }

    async fn publish_report(&self, report: &PeriodReport) -> Result<()> {
        write_json(&self.report_path(&report.title), report).await
    }

    async fn publish_charts(&self, charts: &ChartsData) -> Result<()> {
        write_json(&self.charts_path(), charts).await
    }
}

async fn write_json<T: Serialize + Sync>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    info!(path = %path.display(), "Wrote output file");
    Ok(())
}
