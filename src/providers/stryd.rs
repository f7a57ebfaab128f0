// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Stryd activity normalization
//!
//! Stryd summaries carry power and biomechanics metrics. They either enrich
//! a Garmin run logged on the same day or become a Stryd-only record.
//! Summary fields are loosely typed (numbers or numeric strings), so the
//! extractors read a raw [`serde_json::Value`] and treat any non-positive or
//! unparseable value as absent.

use crate::intelligence::aggregation::round_to;
use crate::models::{Feeling, TrainingRecord, TrainingType};
use chrono::{DateTime, NaiveDate};
use serde_json::Value;
use tracing::{debug, warn};

use super::garmin;

pub const SOURCE_NAME: &str = "Stryd";

/// Power and biomechanics metrics from one activity summary
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PowerMetrics {
    pub power_w: Option<f64>,
    pub critical_power_w: Option<f64>,
    pub rss: Option<f64>,
    pub cadence_spm: Option<f64>,
    pub stride_length_m: Option<f64>,
    pub ground_contact_ms: Option<f64>,
    pub vertical_oscillation_cm: Option<f64>,
    pub leg_spring_stiffness: Option<f64>,
    pub temperature_c: Option<f64>,
    pub wind_speed: Option<f64>,
    pub elevation_gain_m: Option<f64>,
}

impl PowerMetrics {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Copy every present metric onto `record`, leaving the rest untouched
    pub fn apply_to(&self, record: &mut TrainingRecord) {
        let fields = [
            (self.power_w, &mut record.power_w),
            (self.critical_power_w, &mut record.critical_power_w),
            (self.rss, &mut record.rss),
            (self.cadence_spm, &mut record.cadence_spm),
            (self.stride_length_m, &mut record.stride_length_m),
            (self.ground_contact_ms, &mut record.ground_contact_ms),
            (self.vertical_oscillation_cm, &mut record.vertical_oscillation_cm),
            (self.leg_spring_stiffness, &mut record.leg_spring_stiffness),
            (self.temperature_c, &mut record.temperature_c),
            (self.wind_speed, &mut record.wind_speed),
        ];
        for (value, slot) in fields {
            if value.is_some() {
                *slot = value;
            }
        }
    }
}

/// Positive float from a number or numeric string
pub fn safe_float(value: Option<&Value>) -> Option<f64> {
    let parsed = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|f| *f > 0.0)
}

/// Positive integer from a number (truncated) or an integer string
pub fn safe_int(value: Option<&Value>) -> Option<i64> {
    let parsed = match value? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed.filter(|i| *i > 0)
}

pub fn safe_round(value: Option<&Value>, decimals: usize) -> Option<f64> {
    safe_float(value).map(|f| round_to(f, decimals))
}

/// Activity start date in UTC; a missing timestamp yields 1970-01-01
pub fn extract_date(activity: &Value) -> NaiveDate {
    let timestamp = activity
        .get("timestamp")
        .and_then(|t| t.as_i64().or_else(|| t.as_f64().map(|f| f as i64)))
        .unwrap_or(0);
    DateTime::from_timestamp(timestamp, 0)
        .map(|dt| dt.date_naive())
        .unwrap_or_default()
}

pub fn extract_power_metrics(activity: &Value) -> PowerMetrics {
    let field = |key: &str| activity.get(key);

    PowerMetrics {
        power_w: safe_round(field("average_power"), 1),
        critical_power_w: safe_round(field("ftp"), 1),
        rss: safe_round(field("stress"), 1),
        cadence_spm: safe_int(field("average_cadence")).map(|c| c as f64),
        stride_length_m: safe_round(field("average_stride_length"), 2),
        ground_contact_ms: safe_round(field("average_ground_time"), 1),
        vertical_oscillation_cm: safe_round(field("average_oscillation"), 1),
        leg_spring_stiffness: safe_round(field("average_leg_spring"), 1),
        temperature_c: safe_round(field("temperature"), 1),
        wind_speed: safe_round(field("windSpeed"), 1),
        elevation_gain_m: safe_round(field("total_elevation_gain"), 1),
    }
}

/// Post-run RPE on the 1-10 scale; 0 means it was never entered
pub fn extract_rpe(activity: &Value) -> Option<i64> {
    safe_int(activity.get("rpe"))
}

/// Map the post-run `feel` answer to a feeling; RPE never substitutes for it
pub fn extract_feel(activity: &Value) -> Option<Feeling> {
    let feel = activity.get("feel")?.as_str()?;
    match feel.to_lowercase().as_str() {
        "great" => Some(Feeling::Great),
        "good" | "normal" | "ok" => Some(Feeling::Good),
        "bad" => Some(Feeling::Tired),
        "terrible" => Some(Feeling::Exhausted),
        _ => None,
    }
}

/// Copy power metrics, RPE and feeling onto an existing record
pub fn enrich_record(record: &mut TrainingRecord, metrics: &PowerMetrics, rpe: Option<i64>, feel: Option<Feeling>) {
    metrics.apply_to(record);
    if let Some(rpe) = rpe {
        record.rpe = Some(rpe as f64);
    }
    if feel.is_some() {
        record.feeling = feel;
    }
}

/// Build a standalone running record from a Stryd summary
pub fn to_training_record(activity: &Value, metrics: &PowerMetrics, rpe: Option<i64>, feel: Option<Feeling>) -> TrainingRecord {
    let name = activity
        .get("name")
        .and_then(Value::as_str)
        .filter(|n| !n.is_empty())
        .unwrap_or("Stryd Run");
    let moving_seconds = safe_float(activity.get("moving_time"));
    let distance_m = safe_float(activity.get("distance"));

    let mut record = TrainingRecord {
        date: Some(extract_date(activity)),
        name: Some(name.to_string()),
        training_type: Some(TrainingType::Running),
        duration_min: moving_seconds.map(|s| round_to(s / 60.0, 0)),
        distance_km: distance_m.map(|m| round_to(m / 1000.0, 2)),
        avg_hr: safe_int(activity.get("average_heart_rate")).map(|hr| hr as f64),
        source: Some(SOURCE_NAME.to_string()),
        ..Default::default()
    };
    enrich_record(&mut record, metrics, rpe, feel);
    record
}

/// What happened to one Stryd activity during a merge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Metrics were added to a Garmin run on the same day
    Updated,
    /// No Garmin run matched, a Stryd-only record was appended
    Created,
    /// The activity had no power data
    Skipped,
}

/// Merge one Stryd activity into a record list
///
/// The first Garmin running record on the same day receives the metrics;
/// otherwise a new record is appended.
pub fn merge_activity(records: &mut Vec<TrainingRecord>, activity: &Value) -> MergeOutcome {
    let metrics = extract_power_metrics(activity);
    if metrics.power_w.is_none() {
        debug!("Skipping Stryd activity without power data");
        return MergeOutcome::Skipped;
    }
    let rpe = extract_rpe(activity);
    let feel = extract_feel(activity);
    let date = extract_date(activity);

    let mut garmin_runs = records
        .iter()
        .enumerate()
        .filter(|(_, r)| {
            r.date == Some(date)
                && r.source.as_deref() == Some(garmin::SOURCE_NAME)
                && r.training_type == Some(TrainingType::Running)
        })
        .map(|(index, _)| index);
    let first = garmin_runs.next();
    let ambiguous = garmin_runs.next().is_some();

    match first {
        Some(index) => {
            if ambiguous {
                warn!(date = %date, "Multiple Garmin runs on one day, enriching the first");
            }
            enrich_record(&mut records[index], &metrics, rpe, feel);
            debug!(date = %date, "Enriched Garmin run with Stryd metrics");
            MergeOutcome::Updated
        }
        None => {
            records.push(to_training_record(activity, &metrics, rpe, feel));
            debug!(date = %date, "Created Stryd-only run");
            MergeOutcome::Created
        }
    }
}
