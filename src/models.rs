// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Data Models
//!
//! Flat record types produced by the record sources and consumed by the
//! aggregation engine. Every record mirrors one row of the upstream training
//! log or daily health log once it has been normalized across providers
//! (Garmin, Stryd, Hevy, ...).
//!
//! ## Design Principles
//!
//! - **Absent is not zero**: every measurement is an `Option`. `None` means the
//!   value was never recorded and is excluded from averages; `Some(0.0)` is a
//!   real measurement.
//! - **Closed but extensible vocabularies**: [`TrainingType`], [`Feeling`] and
//!   [`HealthStatus`] cover the known categories and fall back to `Other` for
//!   anything a provider adds later.
//! - **Immutable input**: the engine only ever borrows records.
//!
//! ## Core Models
//!
//! - [`TrainingRecord`]: one training session
//! - [`HealthRecord`]: one day of health/recovery data

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use tracing::warn;

/// A single training session from any source
///
/// # Examples
///
/// ```rust
/// use training_dashboard::models::{TrainingRecord, TrainingType, Feeling};
/// use chrono::NaiveDate;
///
/// let run = TrainingRecord {
///     date: NaiveDate::from_ymd_opt(2026, 2, 3),
///     name: Some("Easy run".to_string()),
///     training_type: Some(TrainingType::Running),
///     duration_min: Some(30.0),
///     distance_km: Some(5.0),
///     feeling: Some(Feeling::Good),
///     ..Default::default()
/// };
/// assert!(run.volume_kg.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingRecord {
    /// Calendar day of the session (absent records are never bucketed)
    #[serde(deserialize_with = "deserialize_record_date")]
    pub date: Option<NaiveDate>,
    /// Session title
    pub name: Option<String>,
    /// Category tag (Running, Gym-Strength, ...)
    pub training_type: Option<TrainingType>,
    /// Session duration in minutes
    pub duration_min: Option<f64>,
    /// Distance in kilometres
    pub distance_km: Option<f64>,
    /// Total lifted volume in kilograms
    pub volume_kg: Option<f64>,
    /// Subjective post-session feeling
    pub feeling: Option<Feeling>,
    /// Average heart rate (BPM)
    pub avg_hr: Option<f64>,
    /// Average running power (W)
    pub power_w: Option<f64>,
    /// Running Stress Score
    pub rss: Option<f64>,
    /// Critical power at the time of the session (W)
    pub critical_power_w: Option<f64>,
    /// Cadence in steps per minute
    pub cadence_spm: Option<f64>,
    /// Stride length in metres
    pub stride_length_m: Option<f64>,
    /// Ground contact time in milliseconds
    pub ground_contact_ms: Option<f64>,
    /// Vertical oscillation in centimetres
    pub vertical_oscillation_cm: Option<f64>,
    /// Leg spring stiffness (kN/m)
    pub leg_spring_stiffness: Option<f64>,
    /// Rate of perceived exertion (1-10)
    pub rpe: Option<f64>,
    /// Ambient temperature in Celsius
    pub temperature_c: Option<f64>,
    /// Wind speed
    pub wind_speed: Option<f64>,
    /// Provenance tag (Garmin, Stryd, Hevy, Manual, ...)
    pub source: Option<String>,
}

/// One day of health and recovery data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthRecord {
    #[serde(deserialize_with = "deserialize_record_date")]
    pub date: Option<NaiveDate>,
    /// Total sleep in hours
    pub sleep_hours: Option<f64>,
    /// Categorical sleep rating (e.g. "Good", "Poor")
    pub sleep_quality: Option<String>,
    /// Resting heart rate (BPM)
    pub resting_hr: Option<f64>,
    /// Daily step count
    pub steps: Option<f64>,
    /// Vendor 0-100 energy score
    pub body_battery: Option<f64>,
    /// Day status (Sick, Injured, Rest Day, Normal, ...)
    pub status: Option<HealthStatus>,
}

/// Training category tag
///
/// Serialized as the label used in the training log so that unknown labels
/// survive a round trip through [`TrainingType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TrainingType {
    Running,
    GymStrength,
    GymCrossfit,
    Mobility,
    Specifics,
    /// Any label outside the known vocabulary
    Other(String),
}

impl TrainingType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Running => "Running",
            Self::GymStrength => "Gym-Strength",
            Self::GymCrossfit => "Gym-Crossfit",
            Self::Mobility => "Mobility",
            Self::Specifics => "Specifics",
            Self::Other(label) => label,
        }
    }
}

impl From<&str> for TrainingType {
    fn from(label: &str) -> Self {
        match label {
            "Running" => Self::Running,
            "Gym-Strength" => Self::GymStrength,
            "Gym-Crossfit" => Self::GymCrossfit,
            "Mobility" => Self::Mobility,
            "Specifics" => Self::Specifics,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for TrainingType {
    fn from(label: String) -> Self {
        Self::from(label.as_str())
    }
}

impl From<TrainingType> for String {
    fn from(training_type: TrainingType) -> Self {
        match training_type {
            TrainingType::Other(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for TrainingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Subjective session feeling, ordered from worst to best
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Feeling {
    Exhausted,
    Tired,
    Okay,
    Good,
    Great,
    Other(String),
}

impl Feeling {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Exhausted => "Exhausted",
            Self::Tired => "Tired",
            Self::Okay => "Okay",
            Self::Good => "Good",
            Self::Great => "Great",
            Self::Other(label) => label,
        }
    }
}

impl From<&str> for Feeling {
    fn from(label: &str) -> Self {
        match label {
            "Exhausted" => Self::Exhausted,
            "Tired" => Self::Tired,
            "Okay" => Self::Okay,
            "Good" => Self::Good,
            "Great" => Self::Great,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for Feeling {
    fn from(label: String) -> Self {
        Self::from(label.as_str())
    }
}

impl From<Feeling> for String {
    fn from(feeling: Feeling) -> Self {
        match feeling {
            Feeling::Other(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Feeling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Day status from the health log
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum HealthStatus {
    Sick,
    Injured,
    RestDay,
    Normal,
    Other(String),
}

impl HealthStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Sick => "Sick",
            Self::Injured => "Injured",
            Self::RestDay => "Rest Day",
            Self::Normal => "Normal",
            Self::Other(label) => label,
        }
    }
}

impl From<&str> for HealthStatus {
    fn from(label: &str) -> Self {
        match label {
            "Sick" => Self::Sick,
            "Injured" => Self::Injured,
            "Rest Day" => Self::RestDay,
            "Normal" => Self::Normal,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for HealthStatus {
    fn from(label: String) -> Self {
        Self::from(label.as_str())
    }
}

impl From<HealthStatus> for String {
    fn from(status: HealthStatus) -> Self {
        match status {
            HealthStatus::Other(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse a record date from `YYYY-MM-DD` or any ISO-8601 datetime string.
///
/// Only the calendar day matters, so the first ten characters are used.
pub fn parse_record_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    let day = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

fn deserialize_record_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| {
        let parsed = parse_record_date(&value);
        if parsed.is_none() {
            warn!(record.date = %value, "Unparseable record date, treating as absent");
        }
        parsed
    }))
}
