//! Cross-instrument comparison of weekday extreme percentages.
//!
//! Each ticker runs through fetch, analysis and formatting on its own. A
//! failing ticker keeps its error in the matrix and the batch carries on, so
//! a comparison always returns whatever could be computed.

use crate::domain::analyzer::analyze_ticker;
use crate::domain::bar::{TRADING_WEEKDAYS, WEEKDAY_NAMES};
use crate::domain::error::ExtremesError;
use crate::domain::period::Period;
use crate::domain::stats_table::{StatsTable, WeekdayRow};
use crate::ports::bar_source::BarSource;
use std::fmt;
use std::str::FromStr;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Metric {
    High,
    Low,
    #[default]
    Extreme,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid metric '{value}' (expected high, low or extreme)")]
pub struct ParseMetricError {
    pub value: String,
}

impl Metric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::High => "high",
            Metric::Low => "low",
            Metric::Extreme => "extreme",
        }
    }

    pub fn select(&self, row: &WeekdayRow) -> f64 {
        match self {
            Metric::High => row.high_pct,
            Metric::Low => row.low_pct,
            Metric::Extreme => row.extreme_pct,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = ParseMetricError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" | "highs" => Ok(Metric::High),
            "low" | "lows" => Ok(Metric::Low),
            "extreme" | "extremes" => Ok(Metric::Extreme),
            _ => Err(ParseMetricError {
                value: s.to_string(),
            }),
        }
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug)]
pub struct MatrixColumn {
    pub ticker: String,
    pub outcome: Result<[f64; TRADING_WEEKDAYS], ExtremesError>,
}

impl MatrixColumn {
    pub fn values(&self) -> Option<&[f64; TRADING_WEEKDAYS]> {
        self.outcome.as_ref().ok()
    }
}

/// Weekday rows (Monday..Friday) by ticker columns, in request order.
#[derive(Debug)]
pub struct ComparisonMatrix {
    pub metric: Metric,
    pub period: Period,
    pub columns: Vec<MatrixColumn>,
}

impl ComparisonMatrix {
    pub fn weekday_names(&self) -> &'static [&'static str; TRADING_WEEKDAYS] {
        &WEEKDAY_NAMES
    }

    pub fn tickers(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.ticker.as_str())
    }

    /// `None` marks a missing value: the weekday index is out of range, the
    /// column does not exist, or that ticker's analysis failed.
    pub fn cell(&self, weekday: usize, column: usize) -> Option<f64> {
        self.columns
            .get(column)?
            .values()
            .and_then(|v| v.get(weekday).copied())
    }

    pub fn column(&self, ticker: &str) -> Option<&MatrixColumn> {
        self.columns.iter().find(|c| c.ticker == ticker)
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &ExtremesError)> {
        self.columns
            .iter()
            .filter_map(|c| c.outcome.as_ref().err().map(|e| (c.ticker.as_str(), e)))
    }

    pub fn succeeded(&self) -> usize {
        self.columns.iter().filter(|c| c.outcome.is_ok()).count()
    }
}

fn metric_column(
    source: &dyn BarSource,
    ticker: &str,
    metric: Metric,
    period: Period,
) -> Result<[f64; TRADING_WEEKDAYS], ExtremesError> {
    let stats = analyze_ticker(source, ticker, period)?;
    let table = StatsTable::from_stats(&stats);

    let mut values = [0.0; TRADING_WEEKDAYS];
    for (slot, row) in values.iter_mut().zip(&table.rows) {
        *slot = round2(metric.select(row));
    }
    Ok(values)
}

/// Runs every ticker sequentially in the given order. Never fails; per-ticker
/// errors are logged and recorded in the returned matrix.
pub fn compare(
    source: &dyn BarSource,
    tickers: &[String],
    metric: Metric,
    period: Period,
) -> ComparisonMatrix {
    let mut columns = Vec::with_capacity(tickers.len());

    for ticker in tickers {
        let outcome = metric_column(source, ticker, metric, period);
        match &outcome {
            Ok(_) => info!(ticker = %ticker, %metric, %period, "analyzed"),
            Err(e) => warn!(ticker = %ticker, error = %e, "analysis failed, column left empty"),
        }
        columns.push(MatrixColumn {
            ticker: ticker.clone(),
            outcome,
        });
    }

    ComparisonMatrix {
        metric,
        period,
        columns,
    }
}
