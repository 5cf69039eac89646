//! Weekly extreme attribution.
//!
//! For every ISO week the bars whose high equals the week high (and whose low
//! equals the week low) are credited to their weekday. A tie credits every
//! tied weekday, so the per-weekday frequencies can sum to more than the
//! number of weeks.

use crate::domain::bar::{DailyBar, TRADING_WEEKDAYS};
use crate::domain::error::ExtremesError;
use crate::domain::period::Period;
use crate::domain::week::bucket_by_week;
use crate::ports::bar_source::BarSource;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("cannot analyze an empty bar series")]
pub struct EmptySeries;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WeekdayStats {
    pub high_freq: [u32; TRADING_WEEKDAYS],
    pub low_freq: [u32; TRADING_WEEKDAYS],
    pub total_occurrences: [u32; TRADING_WEEKDAYS],
    pub total_weeks: u32,
}

impl WeekdayStats {
    pub fn high_hits(&self) -> u32 {
        self.high_freq.iter().sum()
    }

    pub fn low_hits(&self) -> u32 {
        self.low_freq.iter().sum()
    }

    /// Weekday bars seen; weekend bars are not counted.
    pub fn bars_counted(&self) -> u32 {
        self.total_occurrences.iter().sum()
    }
}

pub fn analyze(bars: &[DailyBar]) -> Result<WeekdayStats, EmptySeries> {
    if bars.is_empty() {
        return Err(EmptySeries);
    }

    let buckets = bucket_by_week(bars);
    let mut stats = WeekdayStats {
        total_weeks: buckets.len() as u32,
        ..WeekdayStats::default()
    };

    for bucket in &buckets {
        for bar in &bucket.members {
            let Some(day) = bar.weekday_index() else {
                continue;
            };
            stats.total_occurrences[day] += 1;
            if bar.high == bucket.week_high {
                stats.high_freq[day] += 1;
            }
            if bar.low == bucket.week_low {
                stats.low_freq[day] += 1;
            }
        }
    }

    Ok(stats)
}

/// Fetches `ticker` and analyzes it. Errors are returned to the caller as-is.
pub fn analyze_ticker(
    source: &dyn BarSource,
    ticker: &str,
    period: Period,
) -> Result<WeekdayStats, ExtremesError> {
    let bars = source.fetch(ticker, period)?;

    if let (Some(first), Some(last)) = (bars.first(), bars.last()) {
        debug!(
            ticker,
            bars = bars.len(),
            first = %first.date,
            last = %last.date,
            "fetched bars"
        );
    }

    let stats = analyze(&bars).map_err(|EmptySeries| ExtremesError::EmptySeries {
        ticker: ticker.to_string(),
    })?;
    debug!(ticker, weeks = stats.total_weeks, "analyzed weekly extremes");
    Ok(stats)
}
