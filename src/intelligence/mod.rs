// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Intelligence Module
//!
//! The analytics core: turns flat training and health records into
//! period aggregates, training-load analysis and written insights.
//!
//! This module includes:
//! - Calendar period boundaries and record bucketing
//! - Training, health and running-performance aggregation
//! - Acute:Chronic Workload Ratio and overreaching detection
//! - Trend detection and insight text
//!
//! Everything here is synchronous and free of I/O. Each call only reads its
//! inputs and allocates fresh output, so the pipeline can run concurrently
//! without coordination.

pub mod aggregation;
pub mod bucketing;
pub mod insights;
pub mod periods;
pub mod training_load;

pub use aggregation::{HealthWeek, PeriodAggregator, RunningPeriod, TrainingWeek};
pub use bucketing::{group_by_period, DatedRecord};
pub use insights::{format_num, trend_direction, InsightGenerator, InsightKind, TrendDirection};
pub use periods::{period_boundaries, Period, PeriodType};
pub use training_load::{LoadPoint, LoadStatus, TrainingLoad, TrainingLoadAnalyzer};
