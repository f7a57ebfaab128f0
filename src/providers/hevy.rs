// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Hevy workout normalization

use crate::intelligence::aggregation::round_to;
use crate::models::{parse_record_date, TrainingRecord, TrainingType};
use chrono::DateTime;
use serde::Deserialize;
use tracing::warn;

pub const SOURCE_NAME: &str = "Hevy";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HevyWorkout {
    pub id: Option<String>,
    pub title: Option<String>,
    /// ISO-8601 with offset
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub exercises: Vec<HevyExercise>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HevyExercise {
    pub title: Option<String>,
    pub sets: Vec<HevySet>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HevySet {
    pub weight_kg: Option<f64>,
    pub reps: Option<f64>,
    pub distance_meters: Option<f64>,
    pub duration_seconds: Option<f64>,
}

/// Total weight x reps over every set, to one decimal
pub fn calculate_volume(exercises: &[HevyExercise]) -> f64 {
    let total: f64 = exercises
        .iter()
        .flat_map(|e| &e.sets)
        .map(|s| s.weight_kg.unwrap_or(0.0) * s.reps.unwrap_or(0.0))
        .sum();
    round_to(total, 1)
}

/// Whole minutes between two RFC 3339 timestamps
pub fn calculate_duration_min(start_time: &str, end_time: &str) -> Result<f64, chrono::ParseError> {
    let start = DateTime::parse_from_rfc3339(start_time)?;
    let end = DateTime::parse_from_rfc3339(end_time)?;
    let seconds = (end - start).num_seconds() as f64;
    Ok(round_to(seconds / 60.0, 0))
}

impl From<HevyWorkout> for TrainingRecord {
    fn from(workout: HevyWorkout) -> Self {
        let start = workout.start_time.as_deref().unwrap_or_default();
        let end = workout.end_time.as_deref().unwrap_or_default();

        let duration_min = match calculate_duration_min(start, end) {
            Ok(minutes) => Some(minutes),
            Err(e) => {
                warn!(
                    workout.id = workout.id.as_deref().unwrap_or_default(),
                    error = %e,
                    "Unparseable Hevy workout times, duration left empty"
                );
                None
            }
        };

        TrainingRecord {
            date: parse_record_date(start),
            name: Some(workout.title.unwrap_or_else(|| "Hevy Workout".to_string())),
            training_type: Some(TrainingType::GymStrength),
            duration_min,
            volume_kg: Some(calculate_volume(&workout.exercises)),
            source: Some(SOURCE_NAME.to_string()),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn exercises(value: serde_json::Value) -> Vec<HevyExercise> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_calculate_volume() {
        let bench = exercises(json!([{
            "title": "Bench Press",
            "sets": [{"weight_kg": 80, "reps": 10}, {"weight_kg": 80, "reps": 8}]
        }]));
        assert_eq!(calculate_volume(&bench), 1440.0);
        assert_eq!(calculate_volume(&[]), 0.0);

        let pull_up = exercises(json!([{"title": "Pull Up", "sets": [{"weight_kg": null, "reps": 12}]}]));
        assert_eq!(calculate_volume(&pull_up), 0.0);

        let compound = exercises(json!([
            {"title": "Squat", "sets": [{"weight_kg": 100, "reps": 5}]},
            {"title": "Deadlift", "sets": [{"weight_kg": 120, "reps": 3}]}
        ]));
        assert_eq!(calculate_volume(&compound), 860.0);
    }

    #[test]
    fn test_calculate_duration_min() {
        let start = "2024-06-15T10:00:00+00:00";
        assert_eq!(calculate_duration_min(start, "2024-06-15T11:30:00+00:00").unwrap(), 90.0);
        assert_eq!(calculate_duration_min(start, "2024-06-15T10:15:00+00:00").unwrap(), 15.0);
        assert_eq!(calculate_duration_min(start, start).unwrap(), 0.0);
        assert!(calculate_duration_min("", start).is_err());
    }

    #[test]
    fn test_workout_into_record() {
        let workout: HevyWorkout = serde_json::from_value(json!({
            "id": "abc-123",
            "title": "Push Day",
            "start_time": "2026-02-03T18:00:00+01:00",
            "end_time": "2026-02-03T19:05:00+01:00",
            "exercises": [
                {"title": "Bench Press", "sets": [{"weight_kg": 80, "reps": 10}]},
                {"title": "Plank", "sets": [{"weight_kg": 0, "duration_seconds": 60}]}
            ]
        }))
        .unwrap();

        let record = TrainingRecord::from(workout);

        assert_eq!(record.date, NaiveDate::from_ymd_opt(2026, 2, 3));
        assert_eq!(record.name.as_deref(), Some("Push Day"));
        assert_eq!(record.training_type, Some(TrainingType::GymStrength));
        assert_eq!(record.duration_min, Some(65.0));
        assert_eq!(record.volume_kg, Some(800.0));
        assert_eq!(record.source.as_deref(), Some("Hevy"));
    }

    #[test]
    fn test_workout_without_times() {
        let record = TrainingRecord::from(HevyWorkout::default());

        assert!(record.date.is_none());
        assert!(record.duration_min.is_none());
        assert_eq!(record.name.as_deref(), Some("Hevy Workout"));
        assert_eq!(record.volume_kg, Some(0.0));
    }
}
