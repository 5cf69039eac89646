//! Percentages derived from weekday frequency counts.

use crate::domain::analyzer::WeekdayStats;
use crate::domain::bar::{TRADING_WEEKDAYS, WEEKDAY_NAMES};

/// Label printed in every percentage column of the summary row.
pub const SUMMARY_PERCENTAGE: f64 = 100.0;

#[derive(Debug, Clone, PartialEq)]
pub struct WeekdayRow {
    pub weekday: &'static str,
    pub high_freq: u32,
    pub high_pct: f64,
    pub low_freq: u32,
    pub low_pct: f64,
    pub extreme_points: u32,
    pub extreme_pct: f64,
    pub total_occurrences: u32,
    pub weeks_analyzed: u32,
}

/// Column totals. The percentage columns are a fixed label and are not the
/// sum of the weekday rows (ties make that sum exceed 100).
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub high_freq: u32,
    pub low_freq: u32,
    pub extreme_points: u32,
    pub total_occurrences: u32,
    pub weeks_analyzed: u32,
}

impl SummaryRow {
    pub fn label(&self) -> String {
        format!("Total ({} weeks)", self.weeks_analyzed)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatsTable {
    pub rows: Vec<WeekdayRow>,
    pub summary: SummaryRow,
}

fn pct(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    f64::from(part) / f64::from(whole) * 100.0
}

impl StatsTable {
    /// Percentages are not capped: a weekday that ties for the high in every
    /// week can legitimately show more than 100%.
    pub fn from_stats(stats: &WeekdayStats) -> Self {
        let weeks = stats.total_weeks;
        let rows: Vec<WeekdayRow> = (0..TRADING_WEEKDAYS)
            .map(|day| {
                let high_freq = stats.high_freq[day];
                let low_freq = stats.low_freq[day];
                let extreme_points = high_freq + low_freq;
                WeekdayRow {
                    weekday: WEEKDAY_NAMES[day],
                    high_freq,
                    high_pct: pct(high_freq, weeks),
                    low_freq,
                    low_pct: pct(low_freq, weeks),
                    extreme_points,
                    extreme_pct: pct(extreme_points, weeks * 2),
                    total_occurrences: stats.total_occurrences[day],
                    weeks_analyzed: weeks,
                }
            })
            .collect();

        let summary = SummaryRow {
            high_freq: rows.iter().map(|r| r.high_freq).sum(),
            low_freq: rows.iter().map(|r| r.low_freq).sum(),
            extreme_points: rows.iter().map(|r| r.extreme_points).sum(),
            total_occurrences: rows.iter().map(|r| r.total_occurrences).sum(),
            weeks_analyzed: weeks,
        };

        Self { rows, summary }
    }

    pub fn row(&self, weekday: usize) -> Option<&WeekdayRow> {
        self.rows.get(weekday)
    }
}
