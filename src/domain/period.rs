//! Lookback periods accepted by bar sources.
//!
//! The string forms match the `range` values understood by the Yahoo chart
//! API, so an online source can pass them through unchanged. Offline sources
//! resolve a period into a window anchored on the latest bar they hold.

use chrono::{Datelike, Months, NaiveDate};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Period {
    OneDay,
    FiveDays,
    OneMonth,
    #[default]
    ThreeMonths,
    SixMonths,
    OneYear,
    TwoYears,
    FiveYears,
    TenYears,
    YearToDate,
    Max,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid period '{value}' (expected one of: {})", Period::valid_list())]
pub struct ParsePeriodError {
    pub value: String,
}

impl Period {
    pub const ALL: [Period; 11] = [
        Period::OneDay,
        Period::FiveDays,
        Period::OneMonth,
        Period::ThreeMonths,
        Period::SixMonths,
        Period::OneYear,
        Period::TwoYears,
        Period::FiveYears,
        Period::TenYears,
        Period::YearToDate,
        Period::Max,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::OneDay => "1d",
            Period::FiveDays => "5d",
            Period::OneMonth => "1mo",
            Period::ThreeMonths => "3mo",
            Period::SixMonths => "6mo",
            Period::OneYear => "1y",
            Period::TwoYears => "2y",
            Period::FiveYears => "5y",
            Period::TenYears => "10y",
            Period::YearToDate => "ytd",
            Period::Max => "max",
        }
    }

    fn valid_list() -> String {
        Self::ALL
            .iter()
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Day periods are counted in trading bars, not calendar days.
    pub fn trailing_bars(&self) -> Option<usize> {
        match self {
            Period::OneDay => Some(1),
            Period::FiveDays => Some(5),
            _ => None,
        }
    }

    fn months(&self) -> Option<u32> {
        match self {
            Period::OneMonth => Some(1),
            Period::ThreeMonths => Some(3),
            Period::SixMonths => Some(6),
            Period::OneYear => Some(12),
            Period::TwoYears => Some(24),
            Period::FiveYears => Some(60),
            Period::TenYears => Some(120),
            _ => None,
        }
    }

    /// First date (inclusive) of the calendar window ending at `latest`.
    ///
    /// Returns `None` when the window is unbounded (`max`) or counted in bars
    /// (`1d`, `5d`); see [`Period::trailing_bars`].
    pub fn window_start(&self, latest: NaiveDate) -> Option<NaiveDate> {
        if let Some(months) = self.months() {
            // Exclusive of the anchor day one period back, like a rolling range.
            return latest
                .checked_sub_months(Months::new(months))
                .and_then(|d| d.succ_opt());
        }
        match self {
            Period::YearToDate => NaiveDate::from_ymd_opt(latest.year(), 1, 1),
            _ => None,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = ParsePeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == needle)
            .ok_or_else(|| ParsePeriodError {
                value: s.to_string(),
            })
    }
}
