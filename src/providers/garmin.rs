// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Garmin Connect payload normalization
//!
//! Converts activity summaries and the per-day sleep, steps, resting HR and
//! body battery payloads into [`TrainingRecord`] and [`HealthRecord`].

use crate::intelligence::aggregation::round_to;
use crate::models::{HealthRecord, TrainingRecord, TrainingType};
use chrono::NaiveDate;
use serde::Deserialize;

pub const SOURCE_NAME: &str = "Garmin";

/// Map a Garmin activity `typeKey` to a training type
///
/// Matching is case-insensitive; unmapped types fall back to `Specifics`.
pub fn garmin_type_to_training_type(activity_type: &str) -> TrainingType {
    match activity_type.to_lowercase().as_str() {
        "running" | "trail_running" | "treadmill_running" => TrainingType::Running,
        "walking" => TrainingType::Mobility,
        "strength_training" => TrainingType::GymStrength,
        "hiit" => TrainingType::GymCrossfit,
        _ => TrainingType::Specifics,
    }
}

/// Activity summary as returned by the activities-by-date endpoint
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GarminActivity {
    pub activity_id: Option<u64>,
    pub activity_name: Option<String>,
    /// Seconds
    pub duration: Option<f64>,
    /// Metres
    pub distance: Option<f64>,
    #[serde(rename = "averageHR")]
    pub average_hr: Option<f64>,
    pub activity_type: Option<GarminActivityType>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GarminActivityType {
    pub type_key: Option<String>,
}

impl GarminActivity {
    /// Convert into a training record for the day it was fetched for
    pub fn into_record(self, date: NaiveDate) -> TrainingRecord {
        let type_key = self
            .activity_type
            .and_then(|t| t.type_key)
            .unwrap_or_else(|| "other".to_string());
        let distance_km = round_to(self.distance.unwrap_or(0.0) / 1000.0, 2);

        TrainingRecord {
            date: Some(date),
            name: Some(
                self.activity_name
                    .unwrap_or_else(|| "Garmin Activity".to_string()),
            ),
            training_type: Some(garmin_type_to_training_type(&type_key)),
            duration_min: Some(round_to(self.duration.unwrap_or(0.0) / 60.0, 0)),
            distance_km: (distance_km > 0.0).then_some(distance_km),
            avg_hr: self.average_hr.filter(|hr| *hr != 0.0).map(f64::trunc),
            source: Some(SOURCE_NAME.to_string()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GarminSleepData {
    #[serde(rename = "dailySleepDTO")]
    pub daily_sleep: Option<GarminDailySleep>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GarminDailySleep {
    pub sleep_time_seconds: Option<f64>,
    /// EXCELLENT, GOOD, FAIR or POOR
    pub sleep_quality_type: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GarminStepsEntry {
    pub steps: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GarminRestingHeartRate {
    pub resting_heart_rate: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GarminBodyBatteryEntry {
    pub charged: Option<f64>,
}

/// Sleep hours (1dp) and quality; both absent when no sleep was recorded
pub fn extract_sleep_data(sleep: Option<&GarminSleepData>) -> (Option<f64>, Option<String>) {
    let Some(daily) = sleep.and_then(|s| s.daily_sleep.as_ref()) else {
        return (None, None);
    };
    let seconds = daily.sleep_time_seconds.unwrap_or(0.0);
    if seconds == 0.0 {
        return (None, None);
    }
    (Some(round_to(seconds / 3600.0, 1)), daily.sleep_quality_type.clone())
}

/// Total steps over the day's intervals, absent unless positive
pub fn extract_steps(steps: Option<&[GarminStepsEntry]>) -> Option<f64> {
    let total: f64 = steps?.iter().filter_map(|e| e.steps).sum();
    (total > 0.0).then_some(total)
}

pub fn extract_resting_hr(rhr: Option<&GarminRestingHeartRate>) -> Option<f64> {
    rhr?.resting_heart_rate.map(f64::trunc)
}

/// Highest charged value of the day
pub fn extract_body_battery(battery: Option<&[GarminBodyBatteryEntry]>) -> Option<f64> {
    battery?
        .iter()
        .filter_map(|e| e.charged)
        .fold(None, |max: Option<f64>, c| Some(max.map_or(c, |m| m.max(c))))
}

/// The four health payloads for one day; each may be missing when its
/// endpoint failed
#[derive(Debug, Clone, Default)]
pub struct GarminDailyHealth {
    pub sleep: Option<GarminSleepData>,
    pub steps: Option<Vec<GarminStepsEntry>>,
    pub resting_hr: Option<GarminRestingHeartRate>,
    pub body_battery: Option<Vec<GarminBodyBatteryEntry>>,
}

impl GarminDailyHealth {
    pub fn into_record(self, date: NaiveDate) -> HealthRecord {
        let (sleep_hours, sleep_quality) = extract_sleep_data(self.sleep.as_ref());

        HealthRecord {
            date: Some(date),
            sleep_hours,
            sleep_quality,
            resting_hr: extract_resting_hr(self.resting_hr.as_ref()),
            steps: extract_steps(self.steps.as_deref()),
            body_battery: extract_body_battery(self.body_battery.as_deref()),
            status: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sleep(value: serde_json::Value) -> GarminSleepData {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_activity_type_mapping() {
        assert_eq!(garmin_type_to_training_type("running"), TrainingType::Running);
        assert_eq!(garmin_type_to_training_type("trail_running"), TrainingType::Running);
        assert_eq!(garmin_type_to_training_type("treadmill_running"), TrainingType::Running);
        assert_eq!(garmin_type_to_training_type("cycling"), TrainingType::Specifics);
        assert_eq!(garmin_type_to_training_type("walking"), TrainingType::Mobility);
        assert_eq!(garmin_type_to_training_type("strength_training"), TrainingType::GymStrength);
        assert_eq!(garmin_type_to_training_type("hiit"), TrainingType::GymCrossfit);
    }

    #[test]
    fn test_unknown_type_and_case() {
        assert_eq!(garmin_type_to_training_type("surfing"), TrainingType::Specifics);
        assert_eq!(garmin_type_to_training_type("RUNNING"), TrainingType::Running);
        assert_eq!(garmin_type_to_training_type("Cycling"), TrainingType::Specifics);
    }

    #[test]
    fn test_activity_into_record() {
        let activity: GarminActivity = serde_json::from_value(json!({
            "activityId": 123,
            "activityName": "Morning Run",
            "duration": 1830.0,
            "distance": 5012.0,
            "averageHR": 148.7,
            "activityType": {"typeKey": "trail_running"}
        }))
        .unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 2, 7).unwrap();

        let record = activity.into_record(date);

        assert_eq!(record.date, Some(date));
        assert_eq!(record.name.as_deref(), Some("Morning Run"));
        assert_eq!(record.training_type, Some(TrainingType::Running));
        // 30.5 minutes is a tie
        assert_eq!(record.duration_min, Some(30.0));
        assert_eq!(record.distance_km, Some(5.01));
        assert_eq!(record.avg_hr, Some(148.0));
        assert_eq!(record.source.as_deref(), Some("Garmin"));
    }

    #[test]
    fn test_sparse_activity_into_record() {
        let date = NaiveDate::from_ymd_opt(2026, 2, 7).unwrap();
        let record = GarminActivity::default().into_record(date);

        assert_eq!(record.name.as_deref(), Some("Garmin Activity"));
        assert_eq!(record.training_type, Some(TrainingType::Specifics));
        assert_eq!(record.duration_min, Some(0.0));
        assert!(record.distance_km.is_none());
        assert!(record.avg_hr.is_none());
    }

    #[test]
    fn test_extract_sleep_data() {
        let normal = sleep(json!({
            "dailySleepDTO": {"sleepTimeSeconds": 27000, "sleepQualityType": "GOOD"}
        }));
        assert_eq!(extract_sleep_data(Some(&normal)), (Some(7.5), Some("GOOD".to_string())));

        assert_eq!(extract_sleep_data(Some(&sleep(json!({})))), (None, None));
        assert_eq!(extract_sleep_data(None), (None, None));

        let zero = sleep(json!({
            "dailySleepDTO": {"sleepTimeSeconds": 0, "sleepQualityType": "POOR"}
        }));
        assert_eq!(extract_sleep_data(Some(&zero)), (None, None));

        let null = sleep(json!({
            "dailySleepDTO": {"sleepTimeSeconds": null, "sleepQualityType": "POOR"}
        }));
        assert_eq!(extract_sleep_data(Some(&null)), (None, None));
    }

    #[test]
    fn test_extract_steps() {
        let steps: Vec<GarminStepsEntry> = serde_json::from_value(json!([{"steps": 5000}, {"steps": 3000}])).unwrap();
        assert_eq!(extract_steps(Some(steps.as_slice())), Some(8000.0));
        assert_eq!(extract_steps(Some(&[][..])), None);
        assert_eq!(extract_steps(None), None);

        let zero: Vec<GarminStepsEntry> = serde_json::from_value(json!([{"steps": 0}])).unwrap();
        assert_eq!(extract_steps(Some(zero.as_slice())), None);
    }

    #[test]
    fn test_extract_resting_hr() {
        let rhr: GarminRestingHeartRate = serde_json::from_value(json!({"restingHeartRate": 55})).unwrap();
        assert_eq!(extract_resting_hr(Some(&rhr)), Some(55.0));
        assert_eq!(extract_resting_hr(Some(&GarminRestingHeartRate::default())), None);
        assert_eq!(extract_resting_hr(None), None);
    }

    #[test]
    fn test_extract_body_battery() {
        let battery: Vec<GarminBodyBatteryEntry> =
            serde_json::from_value(json!([{"charged": 60}, {"charged": 80}, {"charged": 45}])).unwrap();
        assert_eq!(extract_body_battery(Some(battery.as_slice())), Some(80.0));
        assert_eq!(extract_body_battery(Some(&[][..])), None);
        assert_eq!(extract_body_battery(None), None);

        let drained_only: Vec<GarminBodyBatteryEntry> = serde_json::from_value(json!([{"drained": 10}])).unwrap();
        assert_eq!(extract_body_battery(Some(drained_only.as_slice())), None);
    }

    #[test]
    fn test_daily_health_into_record() {
        let date = NaiveDate::from_ymd_opt(2026, 2, 7).unwrap();
        let full = GarminDailyHealth {
            sleep: Some(sleep(json!({
                "dailySleepDTO": {"sleepTimeSeconds": 27000, "sleepQualityType": "GOOD"}
            }))),
            steps: Some(vec![GarminStepsEntry { steps: Some(9200.0) }]),
            resting_hr: Some(GarminRestingHeartRate {
                resting_heart_rate: Some(55.0),
            }),
            body_battery: Some(vec![GarminBodyBatteryEntry { charged: Some(80.0) }]),
        };

        let record = full.into_record(date);
        assert_eq!(record.date, Some(date));
        assert_eq!(record.sleep_hours, Some(7.5));
        assert_eq!(record.sleep_quality.as_deref(), Some("GOOD"));
        assert_eq!(record.steps, Some(9200.0));
        assert_eq!(record.resting_hr, Some(55.0));
        assert_eq!(record.body_battery, Some(80.0));

        let partial = GarminDailyHealth {
            resting_hr: Some(GarminRestingHeartRate {
                resting_heart_rate: Some(55.0),
            }),
            ..Default::default()
        }
        .into_record(date);
        assert!(partial.sleep_hours.is_none());
        assert!(partial.sleep_quality.is_none());
        assert!(partial.steps.is_none());
        assert_eq!(partial.resting_hr, Some(55.0));
        assert!(partial.body_battery.is_none());
    }
}
