// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Trend detection and human-readable insight generation
//!
//! Every generator takes aggregate sequences ordered most recent first and
//! compares the current period against the mean of all prior periods. Values
//! are formatted with [`format_num`], which never re-rounds.

use super::aggregation::{safe_avg, HealthWeek, RunningPeriod, TrainingWeek};
use super::training_load::{LoadStatus, TrainingLoad};
use crate::config::FitnessConfig;
use crate::constants::trend;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Direction of a metric compared with its prior average
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
}

impl TrendDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Stable => "stable",
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            Self::Up => trend::ARROW_UP,
            Self::Down => trend::ARROW_DOWN,
            Self::Stable => trend::ARROW_STABLE,
        }
    }
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify `current` against `prior_mean` with a fixed ±5% dead-band.
///
/// A zero prior mean has no meaningful percentage change: any non-zero
/// current value counts as up.
pub fn trend_direction(current: f64, prior_mean: f64) -> TrendDirection {
    if prior_mean == 0.0 {
        return if current == 0.0 {
            TrendDirection::Stable
        } else {
            TrendDirection::Up
        };
    }

    let change = (current - prior_mean) / prior_mean.abs();
    if change > trend::DEAD_BAND {
        TrendDirection::Up
    } else if change < -trend::DEAD_BAND {
        TrendDirection::Down
    } else {
        TrendDirection::Stable
    }
}

/// Render whole numbers without a fractional part, anything else with
/// exactly `decimals` places.
pub fn format_num(value: f64, decimals: usize) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.*}", decimals, value)
    }
}

/// Render minutes per kilometre as `M:SS`, truncating partial seconds
pub fn format_pace(min_per_km: f64) -> String {
    let minutes = min_per_km.trunc();
    let seconds = ((min_per_km - minutes) * 60.0).trunc();
    format!("{}:{:02}", minutes as i64, seconds as i64)
}

/// Keys of the generated insight map
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    RunningPower,
    RunningBiomechanics,
    RunningTakeaway,
    TrainingRunningTrend,
    TrainingStrength,
    TrainingRecovery,
    TrainingTakeaway,
    HealthSleep,
    HealthHeartRate,
    HealthRecovery,
    HealthTakeaway,
    Correlation,
}

/// Insight generator for period aggregates
pub struct InsightGenerator {
    config: FitnessConfig,
}

impl InsightGenerator {
    pub fn new() -> Self {
        Self {
            config: FitnessConfig::default(),
        }
    }

    pub fn with_config(config: FitnessConfig) -> Self {
        Self { config }
    }

    /// Generate the full insight map for one dashboard
    pub fn generate_all(
        &self,
        training: &[TrainingWeek],
        health: &[HealthWeek],
        running: &[RunningPeriod],
        load: &TrainingLoad,
    ) -> BTreeMap<InsightKind, String> {
        let mut insights = BTreeMap::new();

        insights.insert(InsightKind::RunningPower, self.running_power(running));
        insights.insert(InsightKind::RunningBiomechanics, self.running_biomechanics(running));
        insights.insert(InsightKind::RunningTakeaway, self.running_takeaway(running));
        insights.insert(InsightKind::TrainingRunningTrend, self.running_trend(training, running));
        insights.insert(InsightKind::TrainingStrength, self.strength(training));
        insights.insert(InsightKind::TrainingRecovery, self.recovery(training, health));
        insights.insert(InsightKind::TrainingTakeaway, self.training_takeaway(training));
        insights.insert(InsightKind::HealthSleep, self.sleep(health));
        insights.insert(InsightKind::HealthHeartRate, self.heart_rate(health));
        insights.insert(InsightKind::HealthRecovery, self.recovery_health(health));
        insights.insert(InsightKind::HealthTakeaway, self.health_takeaway(health));
        insights.insert(InsightKind::Correlation, self.correlation(training, health, load));

        insights
    }

    /// Training metric lines, with trend arrows when prior weeks exist
    pub fn training_trends(&self, weeks: &[TrainingWeek]) -> Vec<String> {
        let Some((current, prior)) = weeks.split_first() else {
            return Vec::new();
        };

        if prior.is_empty() {
            return vec![
                format!("Sessions: {}", current.sessions),
                format!("Duration: {}min", current.total_duration_min),
                format!("Gym volume: {}kg", format_num(current.gym_volume, 1)),
                format!("Running: {}km", format_num(current.running_km, 1)),
            ];
        }

        let sessions = prior_mean(prior, |w| w.sessions as f64);
        let duration = prior_mean(prior, |w| f64::from(w.total_duration_min));
        let volume = prior_mean(prior, |w| w.gym_volume);
        let running = prior_mean(prior, |w| w.running_km);

        vec![
            format!(
                "{} Sessions: {} (avg {})",
                arrow(current.sessions as f64, sessions),
                current.sessions,
                format_num(sessions, 1)
            ),
            format!(
                "{} Duration: {}min (avg {}min)",
                arrow(f64::from(current.total_duration_min), duration),
                current.total_duration_min,
                format_num(duration, 1)
            ),
            format!(
                "{} Gym volume: {}kg (avg {}kg)",
                arrow(current.gym_volume, volume),
                format_num(current.gym_volume, 1),
                format_num(volume, 1)
            ),
            format!(
                "{} Running: {}km (avg {}km)",
                arrow(current.running_km, running),
                format_num(current.running_km, 1),
                format_num(running, 1)
            ),
        ]
    }

    /// Health metric lines, with trend arrows when prior weeks exist
    pub fn health_trends(&self, weeks: &[HealthWeek]) -> Vec<String> {
        let Some((current, prior)) = weeks.split_first() else {
            return Vec::new();
        };

        if prior.is_empty() {
            return vec![
                format!("Sleep: {}h", format_num(current.avg_sleep_hours, 1)),
                format!("Resting HR: {}bpm", format_num(current.avg_resting_hr, 1)),
                format!("Steps: {}", format_num(current.avg_steps, 1)),
                format!("Body battery: {}", format_num(current.avg_body_battery, 1)),
            ];
        }

        let sleep = prior_mean(prior, |w| w.avg_sleep_hours);
        let resting_hr = prior_mean(prior, |w| w.avg_resting_hr);
        let steps = prior_mean(prior, |w| w.avg_steps);
        let battery = prior_mean(prior, |w| w.avg_body_battery);

        vec![
            format!(
                "{} Sleep: {}h (avg {}h)",
                arrow(current.avg_sleep_hours, sleep),
                format_num(current.avg_sleep_hours, 1),
                format_num(sleep, 1)
            ),
            format!(
                "{} Resting HR: {}bpm (avg {}bpm)",
                arrow(current.avg_resting_hr, resting_hr),
                format_num(current.avg_resting_hr, 1),
                format_num(resting_hr, 1)
            ),
            format!(
                "{} Steps: {} (avg {})",
                arrow(current.avg_steps, steps),
                format_num(current.avg_steps, 1),
                format_num(steps, 1)
            ),
            format!(
                "{} Body battery: {} (avg {})",
                arrow(current.avg_body_battery, battery),
                format_num(current.avg_body_battery, 1),
                format_num(battery, 1)
            ),
        ]
    }

    pub fn training_takeaway(&self, weeks: &[TrainingWeek]) -> String {
        let Some(current) = weeks.first().filter(|w| w.sessions > 0) else {
            return "No training data this week.".to_string();
        };

        let mut parts = vec![format!(
            "{} sessions, {} active days",
            current.sessions, current.active_days
        )];
        if current.gym_volume > 0.0 {
            parts.push(format!("{}kg gym volume", format_num(current.gym_volume, 1)));
        }
        if current.running_km > 0.0 {
            parts.push(format!("{}km running", format_num(current.running_km, 1)));
        }
        if current.feeling_avg > 0.0 {
            parts.push(format!("avg feeling {}/5", format_num(current.feeling_avg, 1)));
        }

        format!("This week: {}.", parts.join(", "))
    }

    pub fn health_takeaway(&self, weeks: &[HealthWeek]) -> String {
        let Some(current) = weeks.first().filter(|w| w.entries > 0) else {
            return "No health data this week.".to_string();
        };

        let mut parts = Vec::new();
        if current.avg_sleep_hours > 0.0 {
            parts.push(format!("{}h avg sleep", format_num(current.avg_sleep_hours, 1)));
        }
        if current.avg_resting_hr > 0.0 {
            parts.push(format!("{}bpm resting HR", format_num(current.avg_resting_hr, 1)));
        }
        if current.avg_steps > 0.0 {
            parts.push(format!("{} avg steps", format_num(current.avg_steps, 1)));
        }
        if current.sick_days > 0 {
            parts.push(format!("{} sick days", current.sick_days));
        }

        if parts.is_empty() {
            return "Health data logged but no specific metrics this week.".to_string();
        }
        format!("This week: {}.", parts.join(", "))
    }

    /// Power and running stress for the current period
    pub fn running_power(&self, periods: &[RunningPeriod]) -> String {
        let Some((current, prior)) = current_runs(periods) else {
            return "No running data this period.".to_string();
        };

        let mut lines = vec![
            format!("Avg Power: {}W", format_num(current.avg_power_w, 1)),
            format!(
                "Total RSS: {} ({}/run)",
                format_num(current.total_rss, 1),
                format_num(current.avg_rss_per_run, 1)
            ),
        ];

        if !prior.is_empty() {
            let power = prior_mean(prior, |p| p.avg_power_w);
            lines.push(format!(
                "{} Power vs prior: {}W avg",
                arrow(current.avg_power_w, power),
                format_num(power, 1)
            ));

            let rss = prior_mean(prior, |p| p.total_rss);
            lines.push(format!(
                "{} Load vs prior: {} RSS avg",
                arrow(current.total_rss, rss),
                format_num(rss, 1)
            ));
        }

        if current.power_to_hr_ratio > 0.0 {
            lines.push(format!("Power:HR ratio: {}", format_num(current.power_to_hr_ratio, 2)));
        }

        lines.join("\n")
    }

    /// Running form metrics; only measured metrics are listed
    pub fn running_biomechanics(&self, periods: &[RunningPeriod]) -> String {
        let Some((current, prior)) = current_runs(periods) else {
            return "No running biomechanics data.".to_string();
        };

        let mut lines = Vec::new();
        if current.avg_cadence_spm > 0.0 {
            lines.push(format!("Cadence: {} spm", format_num(current.avg_cadence_spm, 1)));
        }
        if current.avg_stride_length_m > 0.0 {
            lines.push(format!("Stride: {}m", format_num(current.avg_stride_length_m, 2)));
        }
        if current.avg_ground_contact_ms > 0.0 {
            lines.push(format!("Ground Contact: {}ms", format_num(current.avg_ground_contact_ms, 1)));
        }
        if current.avg_vertical_oscillation_cm > 0.0 {
            lines.push(format!(
                "Vert Oscillation: {}cm",
                format_num(current.avg_vertical_oscillation_cm, 1)
            ));
        }
        if current.avg_leg_spring_stiffness > 0.0 {
            lines.push(format!("Leg Spring: {}", format_num(current.avg_leg_spring_stiffness, 1)));
        }

        if !prior.is_empty() {
            if current.avg_cadence_spm > 0.0 {
                let cadence = prior_mean(prior, |p| p.avg_cadence_spm);
                if cadence > 0.0 {
                    lines.push(format!(
                        "{} Cadence vs prior: {} spm",
                        arrow(current.avg_cadence_spm, cadence),
                        format_num(cadence, 1)
                    ));
                }
            }
            if current.avg_ground_contact_ms > 0.0 {
                let contact = prior_mean(prior, |p| p.avg_ground_contact_ms);
                if contact > 0.0 {
                    lines.push(format!(
                        "{} GCT vs prior: {}ms",
                        arrow(current.avg_ground_contact_ms, contact),
                        format_num(contact, 1)
                    ));
                }
            }
        }

        if lines.is_empty() {
            "No biomechanics data available.".to_string()
        } else {
            lines.join("\n")
        }
    }

    pub fn running_takeaway(&self, periods: &[RunningPeriod]) -> String {
        let Some((current, _)) = current_runs(periods) else {
            return "No runs this period.".to_string();
        };

        let mut parts = vec![format!(
            "{} runs, {}km",
            current.run_count,
            format_num(current.total_km, 1)
        )];
        if current.avg_power_w > 0.0 {
            parts.push(format!("{}W avg power", format_num(current.avg_power_w, 1)));
        }
        if current.avg_pace_min_per_km > 0.0 {
            parts.push(format!("{}/km avg pace", format_pace(current.avg_pace_min_per_km)));
        }
        if current.avg_rpe > 0.0 {
            parts.push(format!("RPE {}", format_num(current.avg_rpe, 1)));
        }

        format!("Running: {}.", parts.join(", "))
    }

    pub fn sleep(&self, weeks: &[HealthWeek]) -> String {
        let Some((current, prior)) = current_health(weeks) else {
            return "No sleep data.".to_string();
        };

        let mut lines = vec![format!("Avg: {}h", format_num(current.avg_sleep_hours, 1))];
        if let Some(quality) = &current.sleep_quality_mode {
            lines.push(format!("Quality: {}", quality));
        }
        if !prior.is_empty() {
            let sleep = prior_mean(prior, |w| w.avg_sleep_hours);
            lines.push(format!(
                "{} vs prior avg {}h",
                arrow(current.avg_sleep_hours, sleep),
                format_num(sleep, 1)
            ));
        }

        lines.join("\n")
    }

    /// Resting heart rate; a falling resting HR is the good direction
    pub fn heart_rate(&self, weeks: &[HealthWeek]) -> String {
        let Some((current, prior)) = current_health(weeks) else {
            return "No HR data.".to_string();
        };

        let mut lines = vec![format!("Avg: {} bpm", format_num(current.avg_resting_hr, 1))];
        if !prior.is_empty() {
            let resting_hr = prior_mean(prior, |w| w.avg_resting_hr);
            let direction = trend_direction(current.avg_resting_hr, resting_hr);
            let hint = match direction {
                TrendDirection::Down => "good",
                TrendDirection::Up => "watch",
                TrendDirection::Stable => "stable",
            };
            lines.push(format!(
                "{} vs prior avg {} bpm ({})",
                direction.arrow(),
                format_num(resting_hr, 1),
                hint
            ));
        }

        lines.join("\n")
    }

    /// Body battery, steps and sick/rest days
    pub fn recovery_health(&self, weeks: &[HealthWeek]) -> String {
        let Some((current, prior)) = current_health(weeks) else {
            return "No recovery data.".to_string();
        };

        let mut lines = Vec::new();
        if current.avg_body_battery > 0.0 {
            lines.push(format!("Body Battery: {}", format_num(current.avg_body_battery, 1)));
        }
        if current.avg_steps > 0.0 {
            lines.push(format!("Avg Steps: {}", format_num(current.avg_steps, 0)));
        }
        if current.sick_days > 0 {
            lines.push(format!("Sick days: {}", current.sick_days));
        }
        if current.rest_days > 0 {
            lines.push(format!("Rest days: {}", current.rest_days));
        }

        if !prior.is_empty() {
            let battery = prior_mean(prior, |w| w.avg_body_battery);
            if battery > 0.0 && current.avg_body_battery > 0.0 {
                lines.push(format!(
                    "{} Battery vs prior: {}",
                    arrow(current.avg_body_battery, battery),
                    format_num(battery, 1)
                ));
            }
        }

        if lines.is_empty() {
            "No recovery data available.".to_string()
        } else {
            lines.join("\n")
        }
    }

    /// Running volume summary for the training section
    pub fn running_trend(&self, weeks: &[TrainingWeek], periods: &[RunningPeriod]) -> String {
        let (Some((current_week, prior_weeks)), Some((current_run, _))) =
            (weeks.split_first(), current_runs(periods))
        else {
            return "No running data.".to_string();
        };

        let mut lines = vec![format!(
            "{} runs, {}km",
            current_run.run_count,
            format_num(current_run.total_km, 1)
        )];
        if current_week.longest_run_km > 0.0 {
            lines.push(format!("Longest: {}km", format_num(current_week.longest_run_km, 1)));
        }
        if current_run.avg_power_w > 0.0 {
            lines.push(format!("Avg power: {}W", format_num(current_run.avg_power_w, 1)));
        }
        if !prior_weeks.is_empty() {
            let km = prior_mean(prior_weeks, |w| w.running_km);
            lines.push(format!(
                "{} Volume vs prior: {}km",
                arrow(current_week.running_km, km),
                format_num(km, 1)
            ));
        }

        lines.join("\n")
    }

    pub fn strength(&self, weeks: &[TrainingWeek]) -> String {
        let Some((current, prior)) = weeks.split_first() else {
            return "No training data.".to_string();
        };
        if current.gym_sessions == 0 {
            return "No gym sessions this period.".to_string();
        }

        let mut lines = vec![format!(
            "{} sessions, {}kg total",
            current.gym_sessions,
            format_num(current.gym_volume, 1)
        )];
        if current.gym_volume_per_session > 0.0 {
            lines.push(format!("{}kg/session", format_num(current.gym_volume_per_session, 1)));
        }
        if !prior.is_empty() {
            let volume = prior_mean(prior, |w| w.gym_volume);
            lines.push(format!(
                "{} Volume vs prior: {}kg",
                arrow(current.gym_volume, volume),
                format_num(volume, 1)
            ));
        }

        lines.join("\n")
    }

    /// Recovery signals combining session feelings with health markers
    pub fn recovery(&self, weeks: &[TrainingWeek], health: &[HealthWeek]) -> String {
        let Some(current) = weeks.first() else {
            return "No data.".to_string();
        };

        let mut lines = Vec::new();
        if current.feeling_pct > 0.0 {
            lines.push(format!("Feeling good/great: {}%", format_num(current.feeling_pct, 1)));
        }
        if current.tough_sessions > 0 {
            lines.push(format!("Tough sessions: {}", current.tough_sessions));
        }
        if let Some(week) = health.first().filter(|w| w.entries > 0) {
            if week.avg_body_battery > 0.0 {
                lines.push(format!("Body battery: {}", format_num(week.avg_body_battery, 1)));
            }
            if week.avg_resting_hr > 0.0 {
                lines.push(format!("Resting HR: {} bpm", format_num(week.avg_resting_hr, 1)));
            }
        }

        if lines.is_empty() {
            "No recovery data.".to_string()
        } else {
            lines.join("\n")
        }
    }

    /// Relate training load and volume to recovery markers
    pub fn correlation(&self, weeks: &[TrainingWeek], health: &[HealthWeek], load: &TrainingLoad) -> String {
        let mut lines = Vec::new();

        if load.acwr > 0.0 {
            if let Some(status) = load.load_status {
                lines.push(format!("Training load: ACWR {} ({})", format_num(load.acwr, 2), status));
                lines.push(self.load_advice(status));
            }
        }

        if let (Some((current_week, prior_weeks)), Some((current_health, prior_health))) =
            (weeks.split_first(), health.split_first())
        {
            if !prior_weeks.is_empty() && !prior_health.is_empty() {
                let duration = prior_mean(prior_weeks, |w| f64::from(w.total_duration_min));
                let battery = prior_mean(prior_health, |w| w.avg_body_battery);

                if duration > 0.0 && battery > 0.0 {
                    let duration_trend = trend_direction(f64::from(current_week.total_duration_min), duration);
                    let battery_trend = trend_direction(current_health.avg_body_battery, battery);

                    match (duration_trend, battery_trend) {
                        (TrendDirection::Up, TrendDirection::Down) => lines.push(
                            "Training volume up while body battery declining: watch for overtraining"
                                .to_string(),
                        ),
                        (TrendDirection::Up, TrendDirection::Up) => lines.push(
                            "Training volume and recovery both improving: good adaptation".to_string(),
                        ),
                        _ => {}
                    }
                }
            }
        }

        if lines.is_empty() {
            "Insufficient data for correlation analysis.".to_string()
        } else {
            lines.join("\n")
        }
    }

    fn load_advice(&self, status: LoadStatus) -> String {
        let zones = &self.config.training_load;
        match status {
            LoadStatus::Optimal => format!(
                "Training load is in the optimal zone ({}-{})",
                format_num(zones.detraining_below, 1),
                format_num(zones.optimal_max, 1)
            ),
            LoadStatus::Caution => "Training load is elevated: monitor recovery closely".to_string(),
            LoadStatus::Danger => "Training load spike detected: high injury risk".to_string(),
            LoadStatus::Detraining => "Training load is low: consider increasing volume".to_string(),
        }
    }
}

impl Default for InsightGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn prior_mean<T>(prior: &[T], field: impl Fn(&T) -> f64) -> f64 {
    let values: Vec<f64> = prior.iter().map(field).collect();
    safe_avg(&values)
}

fn arrow(current: f64, prior_mean: f64) -> &'static str {
    trend_direction(current, prior_mean).arrow()
}

/// Current running period and its predecessors, `None` when the current period has no runs
fn current_runs(periods: &[RunningPeriod]) -> Option<(&RunningPeriod, &[RunningPeriod])> {
    periods.split_first().filter(|(current, _)| current.run_count > 0)
}

fn current_health(weeks: &[HealthWeek]) -> Option<(&HealthWeek, &[HealthWeek])> {
    weeks.split_first().filter(|(current, _)| current.entries > 0)
}
