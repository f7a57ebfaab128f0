// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Training Dashboard
//!
//! Fitness telemetry aggregation and training-load analytics. Flat training
//! and health records synced from wearables and training apps are bucketed
//! into calendar periods, rolled up into per-period aggregates, and analysed
//! for Acute:Chronic Workload Ratio, overreaching signals and week-over-week
//! trends.
//!
//! ## Features
//!
//! - **Period boundaries**: weeks (Monday to Sunday), months, quarters, years
//! - **Aggregation**: training volume, running performance, sleep and recovery
//! - **Training load**: ACWR with load zones, rolling load history
//! - **Insights**: short human-readable summaries with trend arrows
//!
//! ## Architecture
//!
//! - **Intelligence**: the pure analytics core, no I/O
//! - **Dashboard**: orchestration into dashboards, reports and charts data
//! - **Providers**: record sources (JSON files, in-memory) and Garmin, Stryd
//!   and Hevy payload normalization
//! - **Sink**: output destinations (JSON files)
//! - **Config**: application and analytics configuration
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use training_dashboard::config::Config;
//! use training_dashboard::dashboard::DashboardBuilder;
//! use training_dashboard::providers::create_source;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load(None)?;
//!     let source = create_source(&config.sources.kind, &config.sources)?;
//!
//!     let training = source.training_records(None).await?;
//!     let health = source.health_records(None).await?;
//!
//!     let today = chrono::Local::now().date_naive();
//!     let dashboard = DashboardBuilder::new().compute_dashboard(&training, &health, today);
//!     println!("{}", dashboard.training_load.label);
//!
//!     Ok(())
//! }
//! ```

/// Training and health record models
pub mod models;

/// Configuration management
pub mod config;

/// Default values and fixed design constants
pub mod constants;

/// Period bucketing, aggregation, training load and insights
pub mod intelligence;

/// Dashboard, report and charts pipeline
pub mod dashboard;

/// Record sources
pub mod providers;

/// Output sinks
pub mod sink;

/// Logging and structured output
pub mod logging;
