// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Training load integration tests
//!
//! Builds running and health aggregates from raw records and checks the
//! ACWR analysis, load zones and overreaching detection on top of them.

use chrono::{Duration, NaiveDate};
use training_dashboard::config::FitnessConfig;
use training_dashboard::intelligence::{
    group_by_period, period_boundaries, trend_direction, LoadStatus, PeriodAggregator, PeriodType,
    RunningPeriod, TrainingLoadAnalyzer, TrendDirection,
};
use training_dashboard::models::{HealthRecord, TrainingRecord, TrainingType};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 2, 5).unwrap()
}

fn run(date: NaiveDate, rss: f64) -> TrainingRecord {
    TrainingRecord {
        date: Some(date),
        training_type: Some(TrainingType::Running),
        distance_km: Some(rss / 10.0),
        duration_min: Some(rss / 2.0),
        rss: Some(rss),
        ..Default::default()
    }
}

fn health_day(date: NaiveDate, sleep: f64, resting_hr: f64, battery: f64) -> HealthRecord {
    HealthRecord {
        date: Some(date),
        sleep_hours: Some(sleep),
        resting_hr: Some(resting_hr),
        body_battery: Some(battery),
        ..Default::default()
    }
}

/// One run per week with the given RSS values, most recent week first
fn weekly_runs(rss: &[f64]) -> Vec<TrainingRecord> {
    rss.iter()
        .enumerate()
        .map(|(weeks_back, &value)| run(today() - Duration::weeks(weeks_back as i64), value))
        .collect()
}

#[test]
fn test_spike_week_from_records() {
    let weeks = period_boundaries(today(), PeriodType::Week, 4);
    let records = weekly_runs(&[200.0, 80.0, 80.0, 80.0]);
    let aggregator = PeriodAggregator::new();

    let running: Vec<_> = group_by_period(&records, &weeks)
        .iter()
        .zip(&weeks)
        .map(|(bucket, week)| aggregator.calculate_running_period(bucket, &week.label))
        .collect();

    let load = TrainingLoadAnalyzer::new().calculate_training_load(&running);

    assert_eq!(load.acute_load, 200.0);
    assert_eq!(load.chronic_load, 80.0);
    assert_eq!(load.acwr, 2.5);
    assert_eq!(load.load_status, Some(LoadStatus::Danger));
}

#[test]
fn test_steady_training_is_optimal() {
    let weeks = period_boundaries(today(), PeriodType::Week, 4);
    let records = weekly_runs(&[100.0, 95.0, 105.0, 100.0]);
    let aggregator = PeriodAggregator::new();

    let running: Vec<_> = group_by_period(&records, &weeks)
        .iter()
        .zip(&weeks)
        .map(|(bucket, week)| aggregator.calculate_running_period(bucket, &week.label))
        .collect();

    let load = TrainingLoadAnalyzer::new().calculate_training_load(&running);

    assert_eq!(load.chronic_load, 100.0);
    assert_eq!(load.acwr, 1.0);
    assert_eq!(load.load_status, Some(LoadStatus::Optimal));
    assert_eq!(load.label, "ACWR 1 (optimal)");
}

#[test]
fn test_custom_zone_thresholds() {
    let mut config = FitnessConfig::default();
    config.training_load.optimal_max = 1.1;
    let analyzer = TrainingLoadAnalyzer::with_config(config);

    assert_eq!(analyzer.classify(1.2), LoadStatus::Caution);
    assert_eq!(TrainingLoadAnalyzer::new().classify(1.2), LoadStatus::Optimal);
}

#[test]
fn test_overreaching_from_health_records() {
    let weeks = period_boundaries(today(), PeriodType::Week, 3);
    let mut health = Vec::new();
    for (weeks_back, (sleep, resting_hr, battery)) in [(6.0, 58.0, 35.0), (8.0, 50.0, 70.0), (8.0, 50.0, 70.0)]
        .into_iter()
        .enumerate()
    {
        let date = today() - Duration::weeks(weeks_back as i64);
        health.push(health_day(date, sleep, resting_hr, battery));
        health.push(health_day(date - Duration::days(1), sleep, resting_hr, battery));
    }

    let aggregator = PeriodAggregator::new();
    let health_weeks: Vec<_> = group_by_period(&health, &weeks)
        .iter()
        .zip(&weeks)
        .map(|(bucket, week)| aggregator.calculate_health_week(bucket, &week.label))
        .collect();

    let analyzer = TrainingLoadAnalyzer::new();
    let spike = analyzer.calculate_training_load(&[
        running_period(150.0),
        running_period(100.0),
        running_period(100.0),
    ]);
    assert_eq!(spike.load_status, Some(LoadStatus::Caution));

    let warnings = analyzer.detect_overreaching(&spike, &health_weeks);
    assert_eq!(warnings.len(), 3);
    assert!(warnings[0].contains("Body battery declining (35 vs avg 70)"));
    assert!(warnings[1].contains("Sleep declining (6h vs avg 8h)"));
    assert!(warnings[2].contains("Resting HR elevated (58 vs avg 50)"));

    let steady = analyzer.calculate_training_load(&[running_period(110.0), running_period(100.0)]);
    assert!(steady.acwr < 1.3);
    assert!(analyzer.detect_overreaching(&steady, &health_weeks).is_empty());
}

#[test]
fn test_trend_direction_dead_band() {
    assert_eq!(trend_direction(105.1, 100.0), TrendDirection::Up);
    assert_eq!(trend_direction(94.9, 100.0), TrendDirection::Down);
    assert_eq!(trend_direction(102.0, 100.0), TrendDirection::Stable);
    assert_eq!(trend_direction(5.0, 0.0), TrendDirection::Up);
    assert_eq!(trend_direction(0.0, 0.0), TrendDirection::Stable);
}

fn running_period(total_rss: f64) -> RunningPeriod {
    RunningPeriod {
        run_count: 1,
        total_rss,
        ..Default::default()
    }
}
