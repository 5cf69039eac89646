//! Daily price bar.

use crate::domain::week::WeekKey;
use chrono::{Datelike, NaiveDate};

/// Number of tracked weekdays (Monday through Friday).
pub const TRADING_WEEKDAYS: usize = 5;

pub const WEEKDAY_NAMES: [&str; TRADING_WEEKDAYS] =
    ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl DailyBar {
    /// Bar with only the fields the weekly attribution reads; open and close
    /// are filled from high and low. Meant for building fixtures in tests,
    /// not for loading market data.
    pub fn from_range(date: NaiveDate, high: f64, low: f64) -> Self {
        Self {
            date,
            open: high,
            high,
            low,
            close: low,
            volume: 0.0,
        }
    }

    /// 0 = Monday .. 4 = Friday; `None` on weekends.
    pub fn weekday_index(&self) -> Option<usize> {
        let idx = self.date.weekday().num_days_from_monday() as usize;
        (idx < TRADING_WEEKDAYS).then_some(idx)
    }

    pub fn week_key(&self) -> WeekKey {
        WeekKey::of(self.date)
    }
}
