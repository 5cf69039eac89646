//! ISO week bucketing of daily bars.

use crate::domain::bar::DailyBar;
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;
use std::fmt;

/// ISO (year, week) pair. The ISO year differs from the calendar year for
/// days near New Year, so it must be part of the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WeekKey {
    pub iso_year: i32,
    pub week: u32,
}

impl WeekKey {
    pub fn of(date: NaiveDate) -> Self {
        let iso = date.iso_week();
        Self {
            iso_year: iso.year(),
            week: iso.week(),
        }
    }
}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-W{:02}", self.iso_year, self.week)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeekBucket {
    pub key: WeekKey,
    pub week_high: f64,
    pub week_low: f64,
    pub members: Vec<DailyBar>,
}

impl WeekBucket {
    fn open(first: DailyBar) -> Self {
        Self {
            key: first.week_key(),
            week_high: first.high,
            week_low: first.low,
            members: vec![first],
        }
    }

    fn push(&mut self, bar: DailyBar) {
        if bar.high > self.week_high {
            self.week_high = bar.high;
        }
        if bar.low < self.week_low {
            self.week_low = bar.low;
        }
        self.members.push(bar);
    }

    /// Members whose high equals the week high. Exact equality: prices are
    /// compared at the precision the source delivered them.
    pub fn high_days(&self) -> impl Iterator<Item = &DailyBar> {
        self.members.iter().filter(|b| b.high == self.week_high)
    }

    pub fn low_days(&self) -> impl Iterator<Item = &DailyBar> {
        self.members.iter().filter(|b| b.low == self.week_low)
    }

    pub fn has_high_tie(&self) -> bool {
        self.high_days().count() > 1
    }

    pub fn has_low_tie(&self) -> bool {
        self.low_days().count() > 1
    }
}

/// Groups bars by ISO week. Buckets come back in ascending week order and
/// members keep their input order. Weekend bars are bucketed like any other.
pub fn bucket_by_week(bars: &[DailyBar]) -> Vec<WeekBucket> {
    let mut buckets: BTreeMap<WeekKey, WeekBucket> = BTreeMap::new();

    for bar in bars {
        match buckets.get_mut(&bar.week_key()) {
            Some(bucket) => bucket.push(*bar),
            None => {
                buckets.insert(bar.week_key(), WeekBucket::open(*bar));
            }
        }
    }

    buckets.into_values().collect()
}
