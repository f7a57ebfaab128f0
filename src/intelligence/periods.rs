// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Calendar period boundaries (week, month, quarter, year)

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Granularity of a reporting period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodType {
    /// Monday to Sunday
    Week,
    Month,
    /// Jan-Mar, Apr-Jun, Jul-Sep, Oct-Dec
    Quarter,
    Year,
}

impl PeriodType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Month => "month",
            Self::Quarter => "quarter",
            Self::Year => "year",
        }
    }
}

impl fmt::Display for PeriodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown period type: {0}. Expected week, month, quarter or year")]
pub struct UnknownPeriodType(String);

impl FromStr for PeriodType {
    type Err = UnknownPeriodType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "quarter" => Ok(Self::Quarter),
            "year" => Ok(Self::Year),
            _ => Err(UnknownPeriodType(s.to_string())),
        }
    }
}

/// An inclusive date range with a display label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub start: NaiveDate,
    /// Inclusive
    pub end: NaiveDate,
    pub label: String,
}

impl Period {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Produce `count` consecutive periods, the first containing `reference`,
/// ordered most recent first.
///
/// Labels: weeks `"Feb 02 – Feb 08"`, months `"Feb 2026"`, quarters
/// `"Q1 2026"`, years `"2026"`.
pub fn period_boundaries(reference: NaiveDate, period_type: PeriodType, count: usize) -> Vec<Period> {
    match period_type {
        PeriodType::Week => week_periods(reference, count),
        PeriodType::Month => month_periods(reference, count),
        PeriodType::Quarter => quarter_periods(reference, count),
        PeriodType::Year => year_periods(reference, count),
    }
}

/// Monday of the week containing `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Every week from the one containing `earliest` up to the one containing
/// `reference`, oldest first. Empty when `earliest` falls after `reference`'s week.
pub fn weekly_periods_between(earliest: NaiveDate, reference: NaiveDate) -> Vec<Period> {
    let current_monday = week_start(reference);
    let mut monday = week_start(earliest);
    let mut weeks = Vec::new();

    while monday <= current_monday {
        weeks.push(week_period(monday));
        monday += Duration::weeks(1);
    }

    weeks
}

fn week_period(monday: NaiveDate) -> Period {
    let sunday = monday + Duration::days(6);
    Period {
        start: monday,
        end: sunday,
        label: format!("{} \u{2013} {}", monday.format("%b %d"), sunday.format("%b %d")),
    }
}

fn week_periods(reference: NaiveDate, count: usize) -> Vec<Period> {
    let current_monday = week_start(reference);
    (0..count)
        .map(|i| week_period(current_monday - Duration::weeks(i as i64)))
        .collect()
}

fn month_periods(reference: NaiveDate, count: usize) -> Vec<Period> {
    let (mut year, mut month) = (reference.year(), reference.month());
    let mut periods = Vec::with_capacity(count);

    while periods.len() < count {
        let Some(period) = month_period(year, month) else {
            break;
        };
        periods.push(period);

        if month == 1 {
            month = 12;
            year -= 1;
        } else {
            month -= 1;
        }
    }

    periods
}

fn quarter_periods(reference: NaiveDate, count: usize) -> Vec<Period> {
    let mut quarter = (reference.month() - 1) / 3 + 1;
    let mut year = reference.year();
    let mut periods = Vec::with_capacity(count);

    while periods.len() < count {
        let first_month = (quarter - 1) * 3 + 1;
        let span = NaiveDate::from_ymd_opt(year, first_month, 1)
            .zip(last_day_of_month(year, first_month + 2));
        let Some((start, end)) = span else {
            break;
        };
        periods.push(Period {
            start,
            end,
            label: format!("Q{} {}", quarter, year),
        });

        if quarter == 1 {
            quarter = 4;
            year -= 1;
        } else {
            quarter -= 1;
        }
    }

    periods
}

fn year_periods(reference: NaiveDate, count: usize) -> Vec<Period> {
    let mut periods = Vec::with_capacity(count);
    let mut year = reference.year();

    while periods.len() < count {
        let span = NaiveDate::from_ymd_opt(year, 1, 1).zip(NaiveDate::from_ymd_opt(year, 12, 31));
        let Some((start, end)) = span else {
            break;
        };
        periods.push(Period {
            start,
            end,
            label: year.to_string(),
        });
        year -= 1;
    }

    periods
}

fn month_period(year: i32, month: u32) -> Option<Period> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let end = last_day_of_month(year, month)?;
    Some(Period {
        start,
        end,
        label: start.format("%b %Y").to_string(),
    })
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}
