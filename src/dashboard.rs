// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Dashboard Pipeline
//!
//! Orchestrates the analytics core into the three outputs handed to a sink:
//!
//! - [`DashboardData`]: the rolling overview of the last few weeks with
//!   training load, overreaching warnings and insights
//! - [`PeriodReport`]: monthly / quarterly / yearly rollups
//! - [`ChartsData`]: the complete weekly history plus the rolling load series
//!
//! The builder is stateless apart from its configuration; every call takes
//! the records and the reference date explicitly.

use crate::config::{FitnessConfig, ReportSchedule};
use crate::constants::periods as period_defaults;
use crate::intelligence::aggregation::{HealthWeek, PeriodAggregator, RunningPeriod, TrainingWeek};
use crate::intelligence::bucketing::group_by_period;
use crate::intelligence::insights::{InsightGenerator, InsightKind};
use crate::intelligence::periods::{period_boundaries, weekly_periods_between, Period, PeriodType};
use crate::intelligence::training_load::{LoadPoint, TrainingLoad, TrainingLoadAnalyzer};
use crate::models::{HealthRecord, TrainingRecord};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Overview dashboard for the most recent weeks
///
/// Every per-period list is ordered most recent first and lines up with `periods`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardData {
    pub generated_at: DateTime<Utc>,
    pub periods: Vec<Period>,
    pub training_weeks: Vec<TrainingWeek>,
    pub health_weeks: Vec<HealthWeek>,
    pub running_periods: Vec<RunningPeriod>,
    pub training_load: TrainingLoad,
    pub overreaching_warnings: Vec<String>,
    pub training_trends: Vec<String>,
    pub health_trends: Vec<String>,
    pub insights: BTreeMap<InsightKind, String>,
}

/// Rollup over monthly, quarterly or yearly periods
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodReport {
    pub title: String,
    pub period_type: PeriodType,
    pub periods: Vec<Period>,
    pub training: Vec<TrainingWeek>,
    pub running: Vec<RunningPeriod>,
    pub health: Vec<HealthWeek>,
}

/// Complete history for the charts page, oldest week first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartsData {
    pub generated_at: DateTime<Utc>,
    pub meta: ChartsMeta,
    pub sessions: Vec<TrainingRecord>,
    pub health: Vec<HealthRecord>,
    pub weekly: WeeklySeries,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartsMeta {
    pub total_training: usize,
    pub total_health: usize,
    /// Earliest dated record across both record kinds
    pub earliest: Option<NaiveDate>,
    pub latest: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeeklySeries {
    pub training: Vec<Weekly<TrainingWeek>>,
    pub health: Vec<Weekly<HealthWeek>>,
    pub running: Vec<Weekly<RunningPeriod>>,
    pub load: Vec<LoadPoint>,
}

/// An aggregate tagged with the Monday of its week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weekly<T> {
    pub week_start: NaiveDate,
    #[serde(flatten)]
    pub data: T,
}

/// Builds dashboards, reports and charts data from raw records
pub struct DashboardBuilder {
    aggregator: PeriodAggregator,
    load_analyzer: TrainingLoadAnalyzer,
    insights: InsightGenerator,
    overview_weeks: usize,
}

impl DashboardBuilder {
    /// Create a builder with default analytics configuration
    pub fn new() -> Self {
        Self::with_config(FitnessConfig::default(), period_defaults::OVERVIEW_WEEKS)
    }

    pub fn with_config(config: FitnessConfig, overview_weeks: usize) -> Self {
        Self {
            aggregator: PeriodAggregator::with_config(config.clone()),
            load_analyzer: TrainingLoadAnalyzer::with_config(config.clone()),
            insights: InsightGenerator::with_config(config),
            overview_weeks,
        }
    }

    /// Compute the overview dashboard for the weeks up to and including `today`'s week
    pub fn compute_dashboard(
        &self,
        training: &[TrainingRecord],
        health: &[HealthRecord],
        today: NaiveDate,
    ) -> DashboardData {
        let periods = period_boundaries(today, PeriodType::Week, self.overview_weeks);
        let (training_weeks, running_periods, health_weeks) = self.aggregate(training, health, &periods);

        let training_load = self.load_analyzer.calculate_training_load(&running_periods);
        let overreaching_warnings = self
            .load_analyzer
            .detect_overreaching(&training_load, &health_weeks);
        let training_trends = self.insights.training_trends(&training_weeks);
        let health_trends = self.insights.health_trends(&health_weeks);
        let insights = self
            .insights
            .generate_all(&training_weeks, &health_weeks, &running_periods, &training_load);

        info!(
            weeks = periods.len(),
            training_records = training.len(),
            health_records = health.len(),
            load.label = %training_load.label,
            warnings = overreaching_warnings.len(),
            "Computed dashboard"
        );

        DashboardData {
            generated_at: Utc::now(),
            periods,
            training_weeks,
            health_weeks,
            running_periods,
            training_load,
            overreaching_warnings,
            training_trends,
            health_trends,
            insights,
        }
    }

    /// Compute one periodic report ending with the period containing `today`
    pub fn build_period_report(
        &self,
        training: &[TrainingRecord],
        health: &[HealthRecord],
        today: NaiveDate,
        schedule: &ReportSchedule,
    ) -> PeriodReport {
        let periods = period_boundaries(today, schedule.period_type, schedule.count);
        let (training, running, health) = self.aggregate(training, health, &periods);

        info!(
            report = %schedule.title,
            period_type = %schedule.period_type,
            periods = periods.len(),
            "Built period report"
        );

        PeriodReport {
            title: schedule.title.clone(),
            period_type: schedule.period_type,
            periods,
            training,
            running,
            health,
        }
    }

    /// Build the full weekly history and rolling training-load series
    ///
    /// Weeks run from the Monday of the earliest dated record through the
    /// week containing `today`. Without any dated record everything is
    /// empty, including the record lists and totals.
    pub fn build_charts_data(
        &self,
        training: &[TrainingRecord],
        health: &[HealthRecord],
        today: NaiveDate,
    ) -> ChartsData {
        let dates = training
            .iter()
            .filter_map(|r| r.date)
            .chain(health.iter().filter_map(|r| r.date));
        let (earliest, latest) = dates.fold((None, None), |(min, max): (Option<NaiveDate>, Option<NaiveDate>), d| {
            (
                Some(min.map_or(d, |m| m.min(d))),
                Some(max.map_or(d, |m| m.max(d))),
            )
        });

        let Some(earliest) = earliest else {
            debug!(
                records.training = training.len(),
                records.health = health.len(),
                "No dated records, charts data is empty"
            );
            return ChartsData {
                generated_at: Utc::now(),
                meta: ChartsMeta::default(),
                sessions: Vec::new(),
                health: Vec::new(),
                weekly: WeeklySeries::default(),
            };
        };

        let meta = ChartsMeta {
            total_training: training.len(),
            total_health: health.len(),
            earliest: Some(earliest),
            latest,
        };

        let chronological = weekly_periods_between(earliest, today);
        let week_starts: Vec<NaiveDate> = chronological.iter().map(|p| p.start).collect();
        let mut recent_first = chronological;
        recent_first.reverse();

        let (mut training_weeks, mut running_periods, mut health_weeks) =
            self.aggregate(training, health, &recent_first);
        training_weeks.reverse();
        running_periods.reverse();
        health_weeks.reverse();

        let load = self
            .load_analyzer
            .rolling_training_load(&running_periods, &week_starts);

        info!(
            weeks = week_starts.len(),
            earliest = %earliest,
            "Built charts data"
        );

        ChartsData {
            generated_at: Utc::now(),
            meta,
            sessions: training.to_vec(),
            health: health.to_vec(),
            weekly: WeeklySeries {
                training: tag_weeks(training_weeks, &week_starts),
                health: tag_weeks(health_weeks, &week_starts),
                running: tag_weeks(running_periods, &week_starts),
                load,
            },
        }
    }

    fn aggregate(
        &self,
        training: &[TrainingRecord],
        health: &[HealthRecord],
        periods: &[Period],
    ) -> (Vec<TrainingWeek>, Vec<RunningPeriod>, Vec<HealthWeek>) {
        let training_buckets = group_by_period(training, periods);
        let health_buckets = group_by_period(health, periods);

        let training_weeks = training_buckets
            .iter()
            .zip(periods)
            .map(|(bucket, period)| self.aggregator.calculate_training_week(bucket, &period.label))
            .collect();
        let running_periods = training_buckets
            .iter()
            .zip(periods)
            .map(|(bucket, period)| self.aggregator.calculate_running_period(bucket, &period.label))
            .collect();
        let health_weeks = health_buckets
            .iter()
            .zip(periods)
            .map(|(bucket, period)| self.aggregator.calculate_health_week(bucket, &period.label))
            .collect();

        (training_weeks, running_periods, health_weeks)
    }
}

impl Default for DashboardBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Earliest date any overview week or scheduled report period reaches back to
///
/// Record sources only need to supply records on or after this date.
pub fn earliest_required_date(today: NaiveDate, overview_weeks: usize, schedules: &[ReportSchedule]) -> NaiveDate {
    let overview = period_boundaries(today, PeriodType::Week, overview_weeks)
        .last()
        .map(|p| p.start);
    let reports = schedules.iter().filter_map(|schedule| {
        period_boundaries(today, schedule.period_type, schedule.count)
            .last()
            .map(|p| p.start)
    });

    overview.into_iter().chain(reports).min().unwrap_or(today)
}

fn tag_weeks<T>(aggregates: Vec<T>, week_starts: &[NaiveDate]) -> Vec<Weekly<T>> {
    aggregates
        .into_iter()
        .zip(week_starts)
        .map(|(data, &week_start)| Weekly { week_start, data })
        .collect()
}
