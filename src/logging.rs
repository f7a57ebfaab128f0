// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Logging configuration with structured output

use crate::constants::service;
use crate::intelligence::aggregation::{HealthWeek, RunningPeriod, TrainingWeek};
use crate::intelligence::training_load::TrainingLoad;
use anyhow::Result;
use std::env;
use std::io;
use tracing::{info, warn};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    pub format: LogFormat,
    /// Include source file and line numbers
    pub include_location: bool,
    pub include_thread: bool,
    /// Emit span open/close events
    pub include_spans: bool,
    pub service_name: String,
    pub service_version: String,
    /// Environment (development, production)
    pub environment: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per event, for scheduled runs
    Json,
    Pretty,
    Compact,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            include_location: false,
            include_thread: false,
            include_spans: false,
            service_name: service::SERVICE_NAME.to_string(),
            service_version: service::SERVICE_VERSION.to_string(),
            environment: "development".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Create logging configuration from environment variables
    pub fn from_env() -> Self {
        let level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let format = match env::var("LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            Ok("compact") => LogFormat::Compact,
            _ => LogFormat::Pretty,
        };

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
        let is_production = environment == "production";

        Self {
            level,
            format,
            include_location: is_production || env::var("LOG_INCLUDE_LOCATION").is_ok(),
            include_thread: is_production || env::var("LOG_INCLUDE_THREAD").is_ok(),
            include_spans: env::var("LOG_INCLUDE_SPANS").is_ok(),
            service_name: env::var("SERVICE_NAME").unwrap_or_else(|_| service::SERVICE_NAME.to_string()),
            service_version: env::var("SERVICE_VERSION")
                .unwrap_or_else(|_| service::SERVICE_VERSION.to_string()),
            environment,
        }
    }

    /// Override the level, e.g. for a `--verbose` flag
    pub fn with_level(mut self, level: &str) -> Self {
        self.level = level.to_string();
        self
    }

    /// Initialize the global tracing subscriber
    ///
    /// `RUST_LOG` directives take precedence over `level` when both are set.
    pub fn init(&self) -> Result<()> {
        let env_filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.level))
            .unwrap_or_else(|_| EnvFilter::new("info"));

        let registry = tracing_subscriber::registry().with(env_filter);
        let span_events = if self.include_spans {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };

        match self.format {
            LogFormat::Json => {
                let layer = fmt::layer()
                    .with_file(self.include_location)
                    .with_line_number(self.include_location)
                    .with_thread_ids(self.include_thread)
                    .with_thread_names(self.include_thread)
                    .with_target(true)
                    .with_writer(io::stderr)
                    .with_span_events(span_events)
                    .json();
                registry.with(layer).try_init()?;
            }
            LogFormat::Pretty => {
                let layer = fmt::layer()
                    .with_file(self.include_location)
                    .with_line_number(self.include_location)
                    .with_thread_ids(self.include_thread)
                    .with_thread_names(self.include_thread)
                    .with_target(false)
                    .with_writer(io::stderr)
                    .with_span_events(span_events);
                registry.with(layer).try_init()?;
            }
            LogFormat::Compact => {
                let layer = fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(io::stderr)
                    .with_span_events(FmtSpan::NONE);
                registry.with(layer).try_init()?;
            }
        }

        info!(
            service.name = %self.service_name,
            service.version = %self.service_version,
            environment = %self.environment,
            log.level = %self.level,
            log.format = ?self.format,
            "Training dashboard starting"
        );

        Ok(())
    }
}

/// Structured events for one pipeline run
pub struct AppLogger;

impl AppLogger {
    pub fn log_records_loaded(source: &str, training: usize, health: usize) {
        info!(
            source.name = %source,
            records.training = training,
            records.health = health,
            "Records loaded"
        );
    }

    pub fn log_training_period(week: &TrainingWeek) {
        info!(
            period.label = %week.label,
            training.sessions = week.sessions,
            training.active_days = week.active_days,
            training.running_km = week.running_km,
            training.gym_volume = week.gym_volume,
            training.duration_min = week.total_duration_min,
            "Training period"
        );
    }

    pub fn log_running_period(period: &RunningPeriod) {
        info!(
            period.label = %period.label,
            running.runs = period.run_count,
            running.total_km = period.total_km,
            running.avg_power_w = period.avg_power_w,
            running.total_rss = period.total_rss,
            "Running period"
        );
    }

    pub fn log_health_period(week: &HealthWeek) {
        info!(
            period.label = %week.label,
            health.entries = week.entries,
            health.avg_sleep_hours = week.avg_sleep_hours,
            health.avg_resting_hr = week.avg_resting_hr,
            health.avg_body_battery = week.avg_body_battery,
            "Health period"
        );
    }

    pub fn log_training_load(load: &TrainingLoad) {
        info!(
            load.acute = load.acute_load,
            load.chronic = load.chronic_load,
            load.acwr = load.acwr,
            load.status = load.load_status.map_or("none", |s| s.as_str()),
            "Training load"
        );
    }

    pub fn log_overreaching_warning(warning: &str) {
        warn!(overreaching.warning = %warning, "Overreaching warning");
    }

    pub fn log_output_published(kind: &str, title: &str, dry_run: bool) {
        info!(
            output.kind = %kind,
            output.title = %title,
            output.dry_run = dry_run,
            "Output published"
        );
    }
}
