//! CSV file bar source.
//!
//! Reads `{base_path}/{TICKER}.csv`. Columns are located by header name
//! (`date`, `open`, `high`, `low`, `close`, optional `volume`, any case), so
//! both hand-written files and `Date,Open,High,Low,Close,Adj Close,Volume`
//! downloads load unchanged.

use crate::domain::bar::DailyBar;
use crate::domain::error::ExtremesError;
use crate::domain::period::Period;
use crate::ports::bar_source::BarSource;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

pub struct CsvAdapter {
    base_path: PathBuf,
}

struct Columns {
    date: usize,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
    volume: Option<usize>,
}

impl Columns {
    fn locate(headers: &csv::StringRecord) -> Result<Self, String> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let require = |name: &str| find(name).ok_or_else(|| format!("missing {} column", name));

        Ok(Self {
            date: require("date")?,
            open: require("open")?,
            high: require("high")?,
            low: require("low")?,
            close: require("close")?,
            volume: find("volume"),
        })
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    // Timestamped exports carry "2024-01-15 00:00:00-05:00"; the day is the prefix.
    let day = raw.trim().get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map_err(|e| format!("invalid date '{}': {}", raw, e))
}

fn parse_price(record: &csv::StringRecord, idx: usize, name: &str) -> Result<f64, String> {
    let raw = record
        .get(idx)
        .ok_or_else(|| format!("missing {} value", name))?
        .trim();
    let value: f64 = raw
        .parse()
        .map_err(|e| format!("invalid {} value: {}", name, e))?;
    // `f64::from_str` accepts "NaN" and "inf"; neither can be a weekly extreme.
    if !value.is_finite() {
        return Err(format!("non-finite {} value '{}'", name, raw));
    }
    Ok(value)
}

/// Cuts a chronologically sorted series down to `period`, anchored on the
/// latest bar rather than today's date.
pub fn apply_period(mut bars: Vec<DailyBar>, period: Period) -> Vec<DailyBar> {
    if let Some(n) = period.trailing_bars() {
        let skip = bars.len().saturating_sub(n);
        return bars.split_off(skip);
    }

    let Some(latest) = bars.last().map(|b| b.date) else {
        return bars;
    };
    match period.window_start(latest) {
        Some(start) => bars.into_iter().filter(|b| b.date >= start).collect(),
        None => bars,
    }
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, ticker: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", ticker))
    }

    fn read_bars(&self, ticker: &str) -> Result<Vec<DailyBar>, String> {
        let path = self.csv_path(ticker);
        let content = fs::read_to_string(&path)
            .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| format!("CSV header error: {}", e))?
            .clone();
        let cols = Columns::locate(&headers)?;

        let mut bars = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| format!("CSV parse error: {}", e))?;

            let date = parse_date(record.get(cols.date).unwrap_or_default())?;
            // Holidays show up as rows with empty prices in some exports.
            if record.get(cols.high).is_some_and(|v| v.trim().is_empty()) {
                continue;
            }

            // Volume is informational; an empty cell reads as zero.
            let volume = match cols.volume {
                Some(idx) if record.get(idx).is_some_and(|v| !v.trim().is_empty()) => {
                    parse_price(&record, idx, "volume")?
                }
                _ => 0.0,
            };

            bars.push(DailyBar {
                date,
                open: parse_price(&record, cols.open, "open")?,
                high: parse_price(&record, cols.high, "high")?,
                low: parse_price(&record, cols.low, "low")?,
                close: parse_price(&record, cols.close, "close")?,
                volume,
            });
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }

    /// Tickers with a CSV file in the base directory, sorted.
    pub fn list_symbols(&self) -> Result<Vec<String>, ExtremesError> {
        let entries = fs::read_dir(&self.base_path)?;

        let mut symbols = Vec::new();
        for entry in entries {
            let name = entry?.file_name();
            let name_str = name.to_string_lossy();
            if let Some(ticker) = name_str.strip_suffix(".csv") {
                symbols.push(ticker.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}

impl BarSource for CsvAdapter {
    fn fetch(&self, ticker: &str, period: Period) -> Result<Vec<DailyBar>, ExtremesError> {
        let bars = self
            .read_bars(ticker)
            .map_err(|reason| ExtremesError::source_unavailable(ticker, reason))?;
        let total = bars.len();
        let bars = apply_period(bars, period);
        debug!(ticker, %period, kept = bars.len(), total, "loaded csv bars");
        Ok(bars)
    }
}
