// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Per-period rollups of training, health and running-performance records
//!
//! Every aggregate is rebuilt from scratch for each call. Rounding happens
//! here, once; formatting downstream never re-rounds.

use crate::config::FitnessConfig;
use crate::models::{HealthRecord, HealthStatus, TrainingRecord};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Aggregated training metrics for one period
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingWeek {
    pub label: String,
    pub sessions: usize,
    /// Distinct calendar days with at least one session
    pub active_days: usize,
    pub running_km: f64,
    pub longest_run_km: f64,
    pub running_count: usize,
    pub gym_sessions: usize,
    pub gym_volume: f64,
    pub gym_volume_per_session: f64,
    /// Mean feeling on the 1-5 scale
    pub feeling_avg: f64,
    /// Percentage of rated sessions that felt good or great
    pub feeling_pct: f64,
    pub tough_sessions: usize,
    pub total_duration_min: u32,
}

/// Aggregated health metrics for one period
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthWeek {
    pub label: String,
    pub entries: usize,
    pub avg_sleep_hours: f64,
    /// Most frequent sleep rating, first seen wins on ties
    pub sleep_quality_mode: Option<String>,
    pub avg_resting_hr: f64,
    pub avg_steps: f64,
    pub avg_body_battery: f64,
    pub sick_days: usize,
    pub injured_days: usize,
    pub rest_days: usize,
}

/// Aggregated running performance for one period
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunningPeriod {
    pub label: String,
    pub run_count: usize,
    pub total_km: f64,
    pub total_duration_min: u32,
    pub avg_power_w: f64,
    pub total_rss: f64,
    pub avg_rss_per_run: f64,
    pub avg_critical_power_w: f64,
    pub avg_cadence_spm: f64,
    pub avg_stride_length_m: f64,
    pub avg_ground_contact_ms: f64,
    pub avg_vertical_oscillation_cm: f64,
    pub avg_leg_spring_stiffness: f64,
    pub avg_rpe: f64,
    pub avg_hr: f64,
    pub power_to_hr_ratio: f64,
    pub avg_pace_min_per_km: f64,
}

/// Reduces one period's bucket of records into an aggregate
pub struct PeriodAggregator {
    config: FitnessConfig,
}

impl PeriodAggregator {
    /// Create an aggregator with the default category sets and feeling scale
    pub fn new() -> Self {
        Self {
            config: FitnessConfig::default(),
        }
    }

    pub fn with_config(config: FitnessConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FitnessConfig {
        &self.config
    }

    /// Compute training metrics for one period's records
    pub fn calculate_training_week(&self, records: &[&TrainingRecord], label: &str) -> TrainingWeek {
        let categories = &self.config.categories;
        let scale = &self.config.feeling_scale;

        let mut week = TrainingWeek {
            label: label.to_string(),
            sessions: records.len(),
            ..Default::default()
        };

        let mut active_dates = HashSet::new();
        let mut run_distances = Vec::new();
        let mut feeling_scores = Vec::new();

        for record in records {
            if let Some(date) = record.date {
                active_dates.insert(date);
            }

            week.total_duration_min = week.total_duration_min.saturating_add(whole_minutes(record.duration_min));

            if let Some(training_type) = &record.training_type {
                if categories.is_running(training_type) {
                    let distance = record.distance_km.unwrap_or(0.0);
                    week.running_count += 1;
                    week.running_km += distance;
                    run_distances.push(distance);
                }
                if categories.is_gym(training_type) {
                    week.gym_sessions += 1;
                    week.gym_volume += record.volume_kg.unwrap_or(0.0);
                }
            }

            if let Some(feeling) = &record.feeling {
                if let Some(score) = scale.score(feeling) {
                    feeling_scores.push(score);
                }
                if categories.is_tough(feeling) {
                    week.tough_sessions += 1;
                }
            }
        }

        week.active_days = active_dates.len();
        week.running_km = round_to(week.running_km, 1);
        week.longest_run_km = run_distances
            .iter()
            .copied()
            .fold(None, |max: Option<f64>, d| Some(max.map_or(d, |m| m.max(d))))
            .map_or(0.0, |m| round_to(m, 1));
        week.gym_volume = round_to(week.gym_volume, 1);
        week.gym_volume_per_session = if week.gym_sessions > 0 {
            round_to(week.gym_volume / week.gym_sessions as f64, 1)
        } else {
            0.0
        };

        let scores: Vec<f64> = feeling_scores.iter().map(|&s| f64::from(s)).collect();
        week.feeling_avg = safe_avg(&scores);
        week.feeling_pct = if feeling_scores.is_empty() {
            0.0
        } else {
            let good = feeling_scores
                .iter()
                .filter(|&&s| s >= scale.good_threshold)
                .count();
            round_to(good as f64 / feeling_scores.len() as f64 * 100.0, 0)
        };

        debug!(
            period.label = %week.label,
            sessions = week.sessions,
            running_km = week.running_km,
            gym_volume = week.gym_volume,
            "Aggregated training period"
        );

        week
    }

    /// Compute health metrics for one period's records
    pub fn calculate_health_week(&self, records: &[&HealthRecord], label: &str) -> HealthWeek {
        let mut week = HealthWeek {
            label: label.to_string(),
            entries: records.len(),
            ..Default::default()
        };

        for record in records {
            match record.status {
                Some(HealthStatus::Sick) => week.sick_days += 1,
                Some(HealthStatus::Injured) => week.injured_days += 1,
                Some(HealthStatus::RestDay) => week.rest_days += 1,
                _ => {}
            }
        }

        week.avg_sleep_hours = mean_of(records, |r| r.sleep_hours);
        week.avg_resting_hr = mean_of(records, |r| r.resting_hr);
        week.avg_steps = mean_of(records, |r| r.steps);
        week.avg_body_battery = mean_of(records, |r| r.body_battery);
        week.sleep_quality_mode = most_common(
            records
                .iter()
                .filter_map(|r| r.sleep_quality.as_deref())
                .filter(|q| !q.is_empty()),
        );

        debug!(
            period.label = %week.label,
            entries = week.entries,
            avg_sleep_hours = week.avg_sleep_hours,
            avg_resting_hr = week.avg_resting_hr,
            "Aggregated health period"
        );

        week
    }

    /// Compute running performance metrics for one period's records
    ///
    /// Non-running records are ignored; a period without runs yields a
    /// zero-valued aggregate.
    pub fn calculate_running_period(&self, records: &[&TrainingRecord], label: &str) -> RunningPeriod {
        let categories = &self.config.categories;
        let runs: Vec<&TrainingRecord> = records
            .iter()
            .copied()
            .filter(|r| r.training_type.as_ref().map_or(false, |t| categories.is_running(t)))
            .collect();

        let mut period = RunningPeriod {
            label: label.to_string(),
            run_count: runs.len(),
            ..Default::default()
        };
        if runs.is_empty() {
            return period;
        }

        for run in &runs {
            period.total_km += run.distance_km.unwrap_or(0.0);
            period.total_duration_min = period.total_duration_min.saturating_add(whole_minutes(run.duration_min));
            period.total_rss += run.rss.unwrap_or(0.0);
        }

        period.total_km = round_to(period.total_km, 1);
        period.total_rss = round_to(period.total_rss, 1);
        period.avg_rss_per_run = round_to(period.total_rss / period.run_count as f64, 1);
        period.avg_power_w = mean_of(&runs, |r| r.power_w);
        period.avg_critical_power_w = mean_of(&runs, |r| r.critical_power_w);
        period.avg_cadence_spm = mean_of(&runs, |r| r.cadence_spm);
        period.avg_stride_length_m = mean_of(&runs, |r| r.stride_length_m);
        period.avg_ground_contact_ms = mean_of(&runs, |r| r.ground_contact_ms);
        period.avg_vertical_oscillation_cm = mean_of(&runs, |r| r.vertical_oscillation_cm);
        period.avg_leg_spring_stiffness = mean_of(&runs, |r| r.leg_spring_stiffness);
        period.avg_rpe = mean_of(&runs, |r| r.rpe);
        period.avg_hr = mean_of(&runs, |r| r.avg_hr);

        period.power_to_hr_ratio = if period.avg_power_w > 0.0 && period.avg_hr > 0.0 {
            round_to(period.avg_power_w / period.avg_hr, 2)
        } else {
            0.0
        };
        period.avg_pace_min_per_km = if period.total_km > 0.0 {
            round_to(f64::from(period.total_duration_min) / period.total_km, 2)
        } else {
            0.0
        };

        debug!(
            period.label = %period.label,
            run_count = period.run_count,
            total_km = period.total_km,
            total_rss = period.total_rss,
            "Aggregated running period"
        );

        period
    }
}

impl Default for PeriodAggregator {
    fn default() -> Self {
        Self::new()
    }
}

/// Round to `decimals` places
///
/// Works on the exact binary value and breaks exact ties to even, so
/// `7.25` becomes `7.2` while `0.15` (stored just below) becomes `0.1`.
pub fn round_to(value: f64, decimals: usize) -> f64 {
    format!("{:.*}", decimals, value).parse().unwrap_or(value)
}

/// Mean rounded to one decimal, 0.0 for an empty slice
pub fn safe_avg(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    round_to(values.iter().sum::<f64>() / values.len() as f64, 1)
}

/// Most frequent value; ties go to the value seen first
pub fn most_common<'a>(values: impl IntoIterator<Item = &'a str>) -> Option<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();

    for value in values {
        let count = counts.entry(value).or_insert(0);
        if *count == 0 {
            order.push(value);
        }
        *count += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for value in order {
        let count = counts[value];
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value.to_string())
}

fn mean_of<R>(records: &[&R], field: impl Fn(&R) -> Option<f64>) -> f64 {
    let values: Vec<f64> = records.iter().filter_map(|r| field(r)).collect();
    safe_avg(&values)
}

/// Whole minutes of a session; fractional minutes are truncated and
/// out-of-range values clamp to the `u32` bounds
fn whole_minutes(duration_min: Option<f64>) -> u32 {
    duration_min.map_or(0, |m| m as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Feeling, TrainingType};
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, day)
    }

    fn run(date: Option<NaiveDate>, distance: f64, duration: f64) -> TrainingRecord {
        TrainingRecord {
            date,
            training_type: Some(TrainingType::Running),
            distance_km: Some(distance),
            duration_min: Some(duration),
            ..Default::default()
        }
    }

    fn gym(date: Option<NaiveDate>, training_type: TrainingType, volume: Option<f64>) -> TrainingRecord {
        TrainingRecord {
            date,
            training_type: Some(training_type),
            volume_kg: volume,
            duration_min: Some(45.0),
            ..Default::default()
        }
    }

    fn with_feeling(mut record: TrainingRecord, feeling: Feeling) -> TrainingRecord {
        record.feeling = Some(feeling);
        record
    }

    #[test]
    fn test_empty_training_week_is_zero() {
        let aggregator = PeriodAggregator::new();
        let week = aggregator.calculate_training_week(&[], "Feb 02 \u{2013} Feb 08");

        assert_eq!(week.label, "Feb 02 \u{2013} Feb 08");
        assert_eq!(week.sessions, 0);
        assert_eq!(week.active_days, 0);
        assert_eq!(week.running_km, 0.0);
        assert_eq!(week.longest_run_km, 0.0);
        assert_eq!(week.gym_volume_per_session, 0.0);
        assert_eq!(week.feeling_avg, 0.0);
        assert_eq!(week.feeling_pct, 0.0);
        assert_eq!(week.total_duration_min, 0);
    }

    #[test]
    fn test_two_runs_in_one_week() {
        let aggregator = PeriodAggregator::new();
        let a = run(d(2026, 2, 3), 5.0, 30.0);
        let b = run(d(2026, 2, 5), 10.0, 60.0);

        let week = aggregator.calculate_training_week(&[&a, &b], "week");

        assert_eq!(week.sessions, 2);
        assert_eq!(week.active_days, 2);
        assert_eq!(week.running_km, 15.0);
        assert_eq!(week.running_count, 2);
        assert_eq!(week.longest_run_km, 10.0);
        assert_eq!(week.total_duration_min, 90);
    }

    #[test]
    fn test_gym_volume_and_unknown_types() {
        let aggregator = PeriodAggregator::new();
        let strength = gym(d(2026, 2, 2), TrainingType::GymStrength, Some(5000.0));
        let crossfit = gym(d(2026, 2, 2), TrainingType::GymCrossfit, Some(2500.5));
        let climbing = gym(d(2026, 2, 4), TrainingType::Other("Climbing".to_string()), Some(900.0));
        let untyped = TrainingRecord {
            date: d(2026, 2, 6),
            duration_min: Some(20.0),
            ..Default::default()
        };

        let week = aggregator.calculate_training_week(&[&strength, &crossfit, &climbing, &untyped], "week");

        assert_eq!(week.sessions, 4);
        assert_eq!(week.active_days, 3);
        assert_eq!(week.gym_sessions, 2);
        assert_eq!(week.gym_volume, 7500.5);
        // 3750.25 is an exact tie
        assert_eq!(week.gym_volume_per_session, 3750.2);
        assert_eq!(week.running_count, 0);
        assert_eq!(week.total_duration_min, 45 * 3 + 20);
    }

    #[test]
    fn test_feeling_scores() {
        let aggregator = PeriodAggregator::new();
        let records = [
            with_feeling(run(d(2026, 2, 2), 5.0, 30.0), Feeling::Great),
            with_feeling(run(d(2026, 2, 3), 5.0, 30.0), Feeling::Good),
            with_feeling(run(d(2026, 2, 4), 5.0, 30.0), Feeling::Tired),
            with_feeling(run(d(2026, 2, 5), 5.0, 30.0), Feeling::Other("Meh".to_string())),
            run(d(2026, 2, 6), 5.0, 30.0),
        ];
        let refs: Vec<&TrainingRecord> = records.iter().collect();

        let week = aggregator.calculate_training_week(&refs, "week");

        // (5 + 4 + 2) / 3
        assert_eq!(week.feeling_avg, 3.7);
        assert_eq!(week.feeling_pct, 67.0);
        assert_eq!(week.tough_sessions, 1);
    }

    #[test]
    fn test_missing_distance_counts_run_without_distance() {
        let aggregator = PeriodAggregator::new();
        let no_gps = TrainingRecord {
            date: d(2026, 2, 3),
            training_type: Some(TrainingType::Running),
            duration_min: Some(25.9),
            ..Default::default()
        };

        let week = aggregator.calculate_training_week(&[&no_gps], "week");

        assert_eq!(week.running_count, 1);
        assert_eq!(week.running_km, 0.0);
        assert_eq!(week.total_duration_min, 25);
    }

    #[test]
    fn test_health_week_averages_skip_missing_values() {
        let aggregator = PeriodAggregator::new();
        let records = [
            HealthRecord {
                date: d(2026, 2, 2),
                sleep_hours: Some(7.0),
                sleep_quality: Some("Good".to_string()),
                resting_hr: Some(50.0),
                steps: Some(0.0),
                status: Some(HealthStatus::RestDay),
                ..Default::default()
            },
            HealthRecord {
                date: d(2026, 2, 3),
                sleep_hours: Some(8.0),
                sleep_quality: Some("Poor".to_string()),
                body_battery: Some(62.0),
                status: Some(HealthStatus::Sick),
                ..Default::default()
            },
            HealthRecord {
                date: d(2026, 2, 4),
                sleep_quality: Some("Poor".to_string()),
                resting_hr: Some(53.0),
                steps: Some(10000.0),
                status: Some(HealthStatus::Normal),
                ..Default::default()
            },
        ];
        let refs: Vec<&HealthRecord> = records.iter().collect();

        let week = aggregator.calculate_health_week(&refs, "week");

        assert_eq!(week.entries, 3);
        assert_eq!(week.avg_sleep_hours, 7.5);
        assert_eq!(week.avg_resting_hr, 51.5);
        assert_eq!(week.avg_steps, 5000.0);
        assert_eq!(week.avg_body_battery, 62.0);
        assert_eq!(week.sleep_quality_mode.as_deref(), Some("Poor"));
        assert_eq!(week.sick_days, 1);
        assert_eq!(week.rest_days, 1);
        assert_eq!(week.injured_days, 0);
    }

    #[test]
    fn test_empty_health_week() {
        let week = PeriodAggregator::new().calculate_health_week(&[], "week");

        assert_eq!(week.entries, 0);
        assert_eq!(week.avg_sleep_hours, 0.0);
        assert!(week.sleep_quality_mode.is_none());
    }

    #[test]
    fn test_most_common_first_seen_wins_ties() {
        assert_eq!(most_common(["Fair", "Good", "Good", "Fair"]).as_deref(), Some("Fair"));
        assert_eq!(most_common(["Good", "Fair", "Fair"]).as_deref(), Some("Fair"));
        assert_eq!(most_common(Vec::<&str>::new()), None);
    }

    #[test]
    fn test_running_period_metrics() {
        let aggregator = PeriodAggregator::new();
        let mut a = run(d(2026, 2, 3), 5.0, 30.0);
        a.power_w = Some(250.0);
        a.avg_hr = Some(150.0);
        a.rss = Some(40.0);
        a.cadence_spm = Some(172.0);
        a.rpe = Some(4.0);
        let mut b = run(d(2026, 2, 5), 10.0, 60.0);
        b.power_w = Some(240.0);
        b.avg_hr = Some(146.0);
        b.rss = Some(80.5);
        b.cadence_spm = None;
        let lifting = gym(d(2026, 2, 4), TrainingType::GymStrength, Some(4000.0));

        let period = aggregator.calculate_running_period(&[&a, &lifting, &b], "week");

        assert_eq!(period.run_count, 2);
        assert_eq!(period.total_km, 15.0);
        assert_eq!(period.total_duration_min, 90);
        assert_eq!(period.avg_power_w, 245.0);
        assert_eq!(period.avg_hr, 148.0);
        assert_eq!(period.total_rss, 120.5);
        assert_eq!(period.avg_rss_per_run, 60.2);
        assert_eq!(period.avg_cadence_spm, 172.0);
        assert_eq!(period.avg_rpe, 4.0);
        assert_eq!(period.avg_ground_contact_ms, 0.0);
        assert_eq!(period.power_to_hr_ratio, 1.66);
        assert_eq!(period.avg_pace_min_per_km, 6.0);
    }

    #[test]
    fn test_running_period_without_runs() {
        let lifting = gym(d(2026, 2, 4), TrainingType::GymStrength, Some(4000.0));
        let period = PeriodAggregator::new().calculate_running_period(&[&lifting], "week");

        assert_eq!(period, RunningPeriod {
            label: "week".to_string(),
            ..Default::default()
        });
    }

    #[test]
    fn test_power_to_hr_requires_both() {
        let mut a = run(d(2026, 2, 3), 5.0, 30.0);
        a.power_w = Some(250.0);

        let period = PeriodAggregator::new().calculate_running_period(&[&a], "week");
        assert_eq!(period.power_to_hr_ratio, 0.0);
    }

    #[test]
    fn test_custom_categories() {
        let mut config = FitnessConfig::default();
        config.categories.running_types.push(TrainingType::Other("Trail".to_string()));
        let aggregator = PeriodAggregator::with_config(config);
        let trail = TrainingRecord {
            date: d(2026, 2, 3),
            training_type: Some(TrainingType::Other("Trail".to_string())),
            distance_km: Some(12.3),
            ..Default::default()
        };

        let week = aggregator.calculate_training_week(&[&trail], "week");
        assert_eq!(week.running_km, 12.3);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(3.75, 1), 3.8);
        assert_eq!(round_to(7.25, 1), 7.2);
        assert_eq!(round_to(12.5, 0), 12.0);
        assert_eq!(round_to(13.5, 0), 14.0);
        assert_eq!(round_to(0.15, 1), 0.1);
        assert_eq!(round_to(2.675, 2), 2.67);
        assert_eq!(round_to(66.666, 0), 67.0);
        assert_eq!(round_to(1.6438, 2), 1.64);
        assert_eq!(safe_avg(&[]), 0.0);
        assert_eq!(safe_avg(&[1.0, 2.0, 2.0]), 1.7);
    }

    #[test]
    fn test_exact_ties_round_to_even() {
        let aggregator = PeriodAggregator::new();
        let health = [
            HealthRecord {
                date: d(2026, 2, 2),
                sleep_hours: Some(7.0),
                ..Default::default()
            },
            HealthRecord {
                date: d(2026, 2, 3),
                sleep_hours: Some(7.5),
                ..Default::default()
            },
        ];
        let health_refs: Vec<&HealthRecord> = health.iter().collect();
        assert_eq!(aggregator.calculate_health_week(&health_refs, "week").avg_sleep_hours, 7.2);

        let mut sessions: Vec<TrainingRecord> = (0..7)
            .map(|_| with_feeling(run(d(2026, 2, 4), 5.0, 30.0), Feeling::Tired))
            .collect();
        sessions.push(with_feeling(run(d(2026, 2, 5), 5.0, 30.0), Feeling::Good));
        let refs: Vec<&TrainingRecord> = sessions.iter().collect();

        // 1 of 8 is 12.5%
        assert_eq!(aggregator.calculate_training_week(&refs, "week").feeling_pct, 12.0);
    }

    #[test]
    fn test_huge_durations_saturate() {
        let aggregator = PeriodAggregator::new();
        let a = run(d(2026, 2, 3), 5.0, 1e12);
        let b = run(d(2026, 2, 4), 5.0, 30.0);

        let week = aggregator.calculate_training_week(&[&a, &b], "week");
        let period = aggregator.calculate_running_period(&[&a, &b], "week");

        assert_eq!(week.total_duration_min, u32::MAX);
        assert_eq!(period.total_duration_min, u32::MAX);
    }
}
