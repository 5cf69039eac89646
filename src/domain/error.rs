//! Domain error types.

use crate::domain::comparator::ParseMetricError;
use crate::domain::period::ParsePeriodError;
use crate::domain::tickers::TickerListError;

/// Top-level error type for weekday-extremes.
#[derive(Debug, thiserror::Error)]
pub enum ExtremesError {
    #[error("source unavailable for {ticker}: {reason}")]
    SourceUnavailable { ticker: String, reason: String },

    #[error("no bars returned for {ticker}")]
    EmptySeries { ticker: String },

    #[error("failed to export to {destination}: {reason}")]
    ExportFailure { destination: String, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    TickerList(#[from] TickerListError),

    #[error(transparent)]
    Period(#[from] ParsePeriodError),

    #[error(transparent)]
    Metric(#[from] ParseMetricError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ExtremesError {
    pub fn source_unavailable(ticker: &str, reason: impl Into<String>) -> Self {
        ExtremesError::SourceUnavailable {
            ticker: ticker.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&ExtremesError> for std::process::ExitCode {
    fn from(err: &ExtremesError) -> Self {
        let code: u8 = match err {
            ExtremesError::Io(_) => 1,
            ExtremesError::ConfigParse { .. }
            | ExtremesError::ConfigMissing { .. }
            | ExtremesError::ConfigInvalid { .. }
            | ExtremesError::TickerList(_)
            | ExtremesError::Period(_)
            | ExtremesError::Metric(_) => 2,
            ExtremesError::SourceUnavailable { .. } => 3,
            ExtremesError::EmptySeries { .. } => 5,
            ExtremesError::ExportFailure { .. } => 6,
        };
        std::process::ExitCode::from(code)
    }
}
