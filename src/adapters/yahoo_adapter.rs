//! Yahoo Finance chart API bar source.
//!
//! Uses the v8 chart endpoint with `interval=1d`. The lookback period is
//! passed straight through as the `range` parameter. Requests are blocking;
//! comparisons fetch one ticker at a time.

use crate::domain::bar::DailyBar;
use crate::domain::error::ExtremesError;
use crate::domain::period::Period;
use crate::ports::bar_source::BarSource;
use chrono::DateTime;
use reqwest::Url;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

#[derive(Deserialize, Debug)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Deserialize, Debug)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Deserialize, Debug)]
struct ChartError {
    code: Option<String>,
    description: String,
}

#[derive(Deserialize, Debug)]
struct ChartResult {
    meta: Option<ChartMeta>,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Deserialize, Debug)]
struct ChartMeta {
    /// Exchange offset from UTC in seconds.
    gmtoffset: Option<i64>,
}

#[derive(Deserialize, Debug)]
struct Indicators {
    quote: Vec<Quote>,
}

#[derive(Deserialize, Debug, Default)]
struct Quote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

/// Decodes a chart payload into daily bars.
///
/// Rows without a high or low are dropped (Yahoo emits nulls for halted or
/// not-yet-settled sessions). Timestamps are shifted into exchange time
/// before the calendar date is taken, so a session that opens at 09:30 New
/// York time is not dated the previous UTC day.
pub fn parse_chart(ticker: &str, body: &str) -> Result<Vec<DailyBar>, ExtremesError> {
    let response: ChartResponse = serde_json::from_str(body)
        .map_err(|e| ExtremesError::source_unavailable(ticker, format!("invalid chart payload: {}", e)))?;

    if let Some(err) = response.chart.error {
        let reason = match err.code {
            Some(code) => format!("{}: {}", code, err.description),
            None => err.description,
        };
        return Err(ExtremesError::source_unavailable(ticker, reason));
    }

    let result = response
        .chart
        .result
        .and_then(|mut r| r.pop())
        .ok_or_else(|| ExtremesError::source_unavailable(ticker, "no chart result"))?;

    let offset = result.meta.and_then(|m| m.gmtoffset).unwrap_or(0);
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();

    let mut bars = Vec::with_capacity(result.timestamp.len());
    for (i, &ts) in result.timestamp.iter().enumerate() {
        let (Some(high), Some(low)) = (
            quote.high.get(i).copied().flatten(),
            quote.low.get(i).copied().flatten(),
        ) else {
            continue;
        };
        let Some(local) = DateTime::from_timestamp(ts + offset, 0) else {
            continue;
        };

        bars.push(DailyBar {
            date: local.date_naive(),
            open: quote.open.get(i).copied().flatten().unwrap_or(high),
            high,
            low,
            close: quote.close.get(i).copied().flatten().unwrap_or(low),
            volume: quote.volume.get(i).copied().flatten().unwrap_or(0.0),
        });
    }

    bars.sort_by_key(|b| b.date);
    Ok(bars)
}

pub struct YahooAdapter {
    client: Client,
    base_url: String,
}

impl YahooAdapter {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ExtremesError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ExtremesError::ConfigInvalid {
                section: "source".into(),
                key: "timeout_secs".into(),
                reason: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn chart_url(&self, ticker: &str, period: Period) -> Result<Url, ExtremesError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ExtremesError::source_unavailable(ticker, format!("bad base url: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| ExtremesError::source_unavailable(ticker, "base url cannot take a path"))?
            .pop_if_empty()
            .extend(["v8", "finance", "chart", ticker]);
        url.query_pairs_mut()
            .append_pair("range", period.as_str())
            .append_pair("interval", "1d")
            .append_pair("includePrePost", "false");
        Ok(url)
    }
}

impl BarSource for YahooAdapter {
    fn fetch(&self, ticker: &str, period: Period) -> Result<Vec<DailyBar>, ExtremesError> {
        let url = self.chart_url(ticker, period)?;
        debug!(ticker, %url, "requesting chart");

        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| ExtremesError::source_unavailable(ticker, e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .map_err(|e| ExtremesError::source_unavailable(ticker, e.to_string()))?;

        // Unknown tickers come back as 404 with a chart.error body; prefer its message.
        if !status.is_success() {
            return match parse_chart(ticker, &body) {
                Err(e @ ExtremesError::SourceUnavailable { .. }) if body.contains("\"error\"") => Err(e),
                _ => Err(ExtremesError::source_unavailable(ticker, format!("HTTP {}", status))),
            };
        }

        parse_chart(ticker, &body)
    }
}
