// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Acute:Chronic Workload Ratio and overreaching detection
//!
//! Acute load is the current period's RSS, chronic load the mean RSS of up to
//! `chronic_window` immediately prior periods. The ratio is bucketed into a
//! load zone using [`LoadZoneThresholds`](crate::config::fitness_config::LoadZoneThresholds).

use super::aggregation::{round_to, safe_avg, HealthWeek, RunningPeriod};
use super::insights::format_num;
use crate::config::FitnessConfig;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// Load zone of an ACWR value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadStatus {
    /// Acute load well below the chronic baseline
    Detraining,
    Optimal,
    Caution,
    /// Load spike, elevated injury risk
    Danger,
}

impl LoadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Detraining => "detraining",
            Self::Optimal => "optimal",
            Self::Caution => "caution",
            Self::Danger => "danger",
        }
    }
}

impl fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Training load snapshot for the current period
///
/// `load_status` is `None` only when there was no running history at all.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingLoad {
    /// Display form, e.g. `"ACWR 1.25 (optimal)"`
    pub label: String,
    pub weekly_rss: f64,
    pub acute_load: f64,
    pub chronic_load: f64,
    pub acwr: f64,
    pub load_status: Option<LoadStatus>,
}

/// One entry of the rolling training-load series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadPoint {
    pub week_start: NaiveDate,
    /// Label of the period this point belongs to
    pub label: String,
    pub weekly_rss: f64,
    pub acute_load: f64,
    pub chronic_load: f64,
    pub acwr: f64,
    pub load_status: Option<LoadStatus>,
}

/// Training load analyzer
pub struct TrainingLoadAnalyzer {
    config: FitnessConfig,
}

impl TrainingLoadAnalyzer {
    pub fn new() -> Self {
        Self {
            config: FitnessConfig::default(),
        }
    }

    pub fn with_config(config: FitnessConfig) -> Self {
        Self { config }
    }

    /// Compute the training load from running periods ordered most recent first
    pub fn calculate_training_load(&self, periods: &[RunningPeriod]) -> TrainingLoad {
        let Some(current) = periods.first() else {
            return TrainingLoad::default();
        };

        let acute_load = current.total_rss;
        let window = self.config.training_load.chronic_window;
        let prior: Vec<f64> = periods
            .iter()
            .skip(1)
            .take(window)
            .map(|p| p.total_rss)
            .collect();

        let chronic_load = if prior.is_empty() {
            acute_load
        } else {
            round_to(prior.iter().sum::<f64>() / prior.len() as f64, 1)
        };

        let acwr = if chronic_load > 0.0 {
            round_to(acute_load / chronic_load, 2)
        } else {
            0.0
        };
        let status = self.classify(acwr);

        debug!(
            load.acute = acute_load,
            load.chronic = chronic_load,
            load.acwr = acwr,
            load.status = %status,
            "Calculated training load"
        );

        TrainingLoad {
            label: format!("ACWR {} ({})", format_num(acwr, 2), status),
            weekly_rss: acute_load,
            acute_load,
            chronic_load,
            acwr,
            load_status: Some(status),
        }
    }

    /// Training load for every period of a chronological (oldest first) series
    ///
    /// Each point is computed over a trailing window of the period itself plus
    /// up to `chronic_window` earlier periods. `week_starts` must line up with
    /// `periods`; surplus entries on either side are ignored.
    pub fn rolling_training_load(&self, periods: &[RunningPeriod], week_starts: &[NaiveDate]) -> Vec<LoadPoint> {
        if periods.len() != week_starts.len() {
            warn!(
                periods = periods.len(),
                week_starts = week_starts.len(),
                "Rolling training load inputs differ in length; truncating to the shorter"
            );
        }

        let window = self.config.training_load.chronic_window;

        periods
            .iter()
            .zip(week_starts)
            .enumerate()
            .map(|(i, (period, &week_start))| {
                let start = i.saturating_sub(window);
                let trailing: Vec<RunningPeriod> = periods[start..=i].iter().rev().cloned().collect();
                let load = self.calculate_training_load(&trailing);

                LoadPoint {
                    week_start,
                    label: period.label.clone(),
                    weekly_rss: period.total_rss,
                    acute_load: load.acute_load,
                    chronic_load: load.chronic_load,
                    acwr: load.acwr,
                    load_status: load.load_status,
                }
            })
            .collect()
    }

    /// Flag high training load combined with declining health markers
    ///
    /// `health_weeks` are ordered most recent first. Each marker is compared
    /// against the mean of all prior periods and skipped when that mean is 0.
    pub fn detect_overreaching(&self, load: &TrainingLoad, health_weeks: &[HealthWeek]) -> Vec<String> {
        let thresholds = &self.config.overreaching;
        let mut warnings = Vec::new();

        let Some((current, prior)) = health_weeks.split_first() else {
            return warnings;
        };
        if load.acwr < thresholds.acwr_threshold || prior.is_empty() {
            return warnings;
        }

        let prior_mean = |field: fn(&HealthWeek) -> f64| {
            let values: Vec<f64> = prior.iter().map(field).collect();
            safe_avg(&values)
        };

        let avg_battery = prior_mean(|w| w.avg_body_battery);
        if avg_battery > 0.0 && current.avg_body_battery < avg_battery * thresholds.body_battery_ratio {
            warnings.push(format!(
                "Body battery declining ({} vs avg {}) with high training load (ACWR {})",
                format_num(current.avg_body_battery, 1),
                format_num(avg_battery, 1),
                format_num(load.acwr, 2)
            ));
        }

        let avg_sleep = prior_mean(|w| w.avg_sleep_hours);
        if avg_sleep > 0.0 && current.avg_sleep_hours < avg_sleep * thresholds.sleep_ratio {
            warnings.push(format!(
                "Sleep declining ({}h vs avg {}h) with high training load",
                format_num(current.avg_sleep_hours, 1),
                format_num(avg_sleep, 1)
            ));
        }

        let avg_hr = prior_mean(|w| w.avg_resting_hr);
        if avg_hr > 0.0 && current.avg_resting_hr > avg_hr * thresholds.resting_hr_ratio {
            warnings.push(format!(
                "Resting HR elevated ({} vs avg {}) with high training load",
                format_num(current.avg_resting_hr, 1),
                format_num(avg_hr, 1)
            ));
        }

        for warning in &warnings {
            warn!(load.acwr = load.acwr, "Overreaching: {}", warning);
        }

        warnings
    }

    /// Map an ACWR value onto its load zone
    pub fn classify(&self, acwr: f64) -> LoadStatus {
        let zones = &self.config.training_load;
        if acwr < zones.detraining_below {
            LoadStatus::Detraining
        } else if acwr <= zones.optimal_max {
            LoadStatus::Optimal
        } else if acwr <= zones.caution_max {
            LoadStatus::Caution
        } else {
            LoadStatus::Danger
        }
    }
}

impl Default for TrainingLoadAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
