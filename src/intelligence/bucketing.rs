// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Assignment of date-stamped records to period buckets

use super::periods::Period;
use crate::models::{parse_record_date, HealthRecord, TrainingRecord};
use chrono::NaiveDate;
use serde_json::Value;
use tracing::trace;

/// Anything that can be placed on the calendar
pub trait DatedRecord {
    /// Calendar day of the record, `None` when unknown
    fn record_date(&self) -> Option<NaiveDate>;
}

impl DatedRecord for TrainingRecord {
    fn record_date(&self) -> Option<NaiveDate> {
        self.date
    }
}

impl DatedRecord for HealthRecord {
    fn record_date(&self) -> Option<NaiveDate> {
        self.date
    }
}

/// Flat JSON mappings with a `"date"` key holding an ISO-8601 string
impl DatedRecord for Value {
    fn record_date(&self) -> Option<NaiveDate> {
        self.get("date")?.as_str().and_then(parse_record_date)
    }
}

impl<T: DatedRecord + ?Sized> DatedRecord for &T {
    fn record_date(&self) -> Option<NaiveDate> {
        (**self).record_date()
    }
}

/// Bucket records into periods, returning one bucket per period in the same order.
///
/// A record lands in the first period whose inclusive range contains its
/// date. Records without a date, or outside every period, are dropped.
/// Relative order within a bucket follows the input order.
pub fn group_by_period<'a, R: DatedRecord>(records: &'a [R], periods: &[Period]) -> Vec<Vec<&'a R>> {
    let mut buckets: Vec<Vec<&R>> = vec![Vec::new(); periods.len()];
    let mut dropped = 0usize;

    for record in records {
        let Some(date) = record.record_date() else {
            dropped += 1;
            continue;
        };
        match periods.iter().position(|p| p.contains(date)) {
            Some(idx) => buckets[idx].push(record),
            None => dropped += 1,
        }
    }

    trace!(
        records = records.len(),
        periods = periods.len(),
        dropped,
        "Bucketed records into periods"
    );

    buckets
}
