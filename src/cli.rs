//! CLI definition and dispatch.

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::str::FromStr;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::adapters::console_report::{render_matrix, render_stats_table, render_week_breakdown};
use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::delimited_exporter::DelimitedExporter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::yahoo_adapter::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, YahooAdapter};
use crate::domain::analyzer::analyze_ticker;
use crate::domain::comparator::{ComparisonMatrix, Metric, compare};
use crate::domain::error::ExtremesError;
use crate::domain::period::Period;
use crate::domain::stats_table::StatsTable;
use crate::domain::tickers::parse_tickers;
use crate::domain::week::bucket_by_week;
use crate::ports::bar_source::BarSource;
use crate::ports::config_port::ConfigPort;
use crate::ports::export_port::MatrixExporter;

#[derive(Parser, Debug)]
#[command(
    name = "weekday-extremes",
    about = "Which weekday most often sets the weekly high or low"
)]
pub struct Cli {
    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Where bars come from; every flag overrides the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// `yahoo` or `csv`
    #[arg(long)]
    pub source: Option<String>,
    /// Directory of `{TICKER}.csv` files for the csv source
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Weekday high/low statistics for one ticker
    Analyze {
        #[arg(short, long)]
        ticker: String,
        #[arg(short, long)]
        period: Option<String>,
        /// Only weekday, extreme points, extreme percentage and weeks
        #[arg(long)]
        brief: bool,
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Compare one percentage column across tickers
    Compare {
        /// Comma separated tickers (defaults to [analysis] tickers)
        #[arg(long)]
        tickers: Option<String>,
        /// `high`, `low` or `extreme`
        #[arg(short, long)]
        metric: Option<String>,
        #[arg(short, long)]
        period: Option<String>,
        /// Write the matrix here (`.dat` is space separated, otherwise comma)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Export tickers as rows instead of weekdays
        #[arg(long)]
        transpose: bool,
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Per-week high/low days for one ticker
    Weeks {
        #[arg(short, long)]
        ticker: String,
        #[arg(short, long)]
        period: Option<String>,
        #[command(flatten)]
        source: SourceArgs,
    },
    /// List tickers available to the csv source
    ListSymbols {
        #[arg(long)]
        data_dir: Option<PathBuf>,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Yahoo,
    Csv,
}

impl FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "yahoo" => Ok(SourceKind::Yahoo),
            "csv" => Ok(SourceKind::Csv),
            other => Err(format!("unknown source '{}' (expected yahoo or csv)", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SourceSettings {
    pub kind: SourceKind,
    pub data_dir: PathBuf,
    pub base_url: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSettings {
    pub period: Period,
    pub metric: Metric,
    pub tickers: Vec<String>,
    pub output: Option<PathBuf>,
    pub transpose: bool,
    pub source: SourceSettings,
}

/// Result of a comparison run. The matrix is kept even when exporting fails.
#[derive(Debug)]
pub struct CompareRun {
    pub matrix: ComparisonMatrix,
    pub export: Option<Result<PathBuf, ExtremesError>>,
}

pub fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Analyze {
            ticker,
            period,
            brief,
            source,
        } => run_analyze(&ticker, period.as_deref(), brief, &source),
        Command::Compare {
            tickers,
            metric,
            period,
            output,
            transpose,
            source,
        } => run_compare(
            tickers.as_deref(),
            metric.as_deref(),
            period.as_deref(),
            output,
            transpose,
            &source,
        ),
        Command::Weeks {
            ticker,
            period,
            source,
        } => run_weeks(&ticker, period.as_deref(), &source),
        Command::ListSymbols { data_dir, config } => run_list_symbols(data_dir, config.as_ref()),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            error!("{e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: Option<&PathBuf>) -> Result<FileConfigAdapter, ExtremesError> {
    let Some(path) = path else {
        return Ok(FileConfigAdapter::empty());
    };
    info!("Loading config from {}", path.display());
    FileConfigAdapter::from_file(path).map_err(|e| ExtremesError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> ExtremesError {
    ExtremesError::ConfigInvalid {
        section: section.into(),
        key: key.into(),
        reason: reason.into(),
    }
}

pub fn build_source_settings(config: &dyn ConfigPort) -> Result<SourceSettings, ExtremesError> {
    let kind = match config.get_string("source", "kind") {
        Some(k) => k
            .parse::<SourceKind>()
            .map_err(|e| invalid("source", "kind", e))?,
        None => SourceKind::Yahoo,
    };

    let timeout_secs = config
        .get_uint("source", "timeout_secs")
        .map_err(|e| invalid("source", "timeout_secs", e))?
        .unwrap_or(DEFAULT_TIMEOUT_SECS);
    if timeout_secs == 0 {
        return Err(invalid("source", "timeout_secs", "timeout_secs must be positive"));
    }

    Ok(SourceSettings {
        kind,
        data_dir: config
            .get_string("source", "data_dir")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("data")),
        base_url: config
            .get_string("source", "base_url")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        timeout: Duration::from_secs(timeout_secs),
    })
}

const KNOWN_SECTIONS: [&str; 3] = ["analysis", "source", "export"];

pub fn build_settings(config: &dyn ConfigPort) -> Result<AnalysisSettings, ExtremesError> {
    for section in config.sections() {
        if !KNOWN_SECTIONS.contains(&section.as_str()) {
            warn!("Ignoring unknown config section [{}]", section);
        }
    }

    let period = match config.get_string("analysis", "period") {
        Some(p) => p
            .parse::<Period>()
            .map_err(|e| invalid("analysis", "period", e.to_string()))?,
        None => Period::default(),
    };

    let metric = match config.get_string("analysis", "metric") {
        Some(m) => m
            .parse::<Metric>()
            .map_err(|e| invalid("analysis", "metric", e.to_string()))?,
        None => Metric::default(),
    };

    let tickers = match config.get_string("analysis", "tickers") {
        Some(t) => parse_tickers(&t).map_err(|e| invalid("analysis", "tickers", e.to_string()))?,
        None => Vec::new(),
    };

    let transpose = config
        .get_bool("export", "transpose")
        .map_err(|e| invalid("export", "transpose", e))?
        .unwrap_or(false);

    Ok(AnalysisSettings {
        period,
        metric,
        tickers,
        output: config.get_string("export", "output").map(PathBuf::from),
        transpose,
        source: build_source_settings(config)?,
    })
}

pub fn apply_source_overrides(
    settings: &mut SourceSettings,
    args: &SourceArgs,
) -> Result<(), ExtremesError> {
    if let Some(kind) = &args.source {
        settings.kind = kind
            .parse::<SourceKind>()
            .map_err(|e| invalid("source", "kind", e))?;
    }
    if let Some(dir) = &args.data_dir {
        settings.data_dir = dir.clone();
        // A data directory on the command line only makes sense for csv.
        if args.source.is_none() {
            settings.kind = SourceKind::Csv;
        }
    }
    Ok(())
}

fn resolve_settings(
    args: &SourceArgs,
    period: Option<&str>,
) -> Result<AnalysisSettings, ExtremesError> {
    let config = load_config(args.config.as_ref())?;
    let mut settings = build_settings(&config)?;
    apply_source_overrides(&mut settings.source, args)?;
    if let Some(p) = period {
        settings.period = p.parse()?;
    }
    Ok(settings)
}

pub fn open_source(settings: &SourceSettings) -> Result<Box<dyn BarSource>, ExtremesError> {
    match settings.kind {
        SourceKind::Yahoo => {
            info!("Using Yahoo chart source at {}", settings.base_url);
            Ok(Box::new(YahooAdapter::new(&settings.base_url, settings.timeout)?))
        }
        SourceKind::Csv => {
            info!("Using csv source in {}", settings.data_dir.display());
            Ok(Box::new(CsvAdapter::new(settings.data_dir.clone())))
        }
    }
}

pub fn analyze_report(
    source: &dyn BarSource,
    ticker: &str,
    period: Period,
    brief: bool,
) -> Result<String, ExtremesError> {
    let stats = analyze_ticker(source, ticker, period)?;
    let table = StatsTable::from_stats(&stats);

    let mut out = format!(
        "Weekly High/Low Analysis for {} over period: {}\n\n",
        ticker, period
    );
    out.push_str(&render_stats_table(&table, brief));
    Ok(out)
}

pub fn weeks_report(
    source: &dyn BarSource,
    ticker: &str,
    period: Period,
) -> Result<String, ExtremesError> {
    let bars = source.fetch(ticker, period)?;
    if bars.is_empty() {
        return Err(ExtremesError::EmptySeries {
            ticker: ticker.to_string(),
        });
    }
    let buckets = bucket_by_week(&bars);

    let mut out = format!(
        "Weekly extremes for {} over period: {} ({} weeks)\n\n",
        ticker,
        period,
        buckets.len()
    );
    out.push_str(&render_week_breakdown(&buckets));

    let tied_highs = buckets.iter().filter(|b| b.has_high_tie()).count();
    let tied_lows = buckets.iter().filter(|b| b.has_low_tie()).count();
    if tied_highs + tied_lows > 0 {
        out.push_str(&format!(
            "\nTied weeks: {} high, {} low (every tied day is credited)\n",
            tied_highs, tied_lows
        ));
    }
    Ok(out)
}

/// Compares `settings.tickers` and exports the matrix when an output is set.
pub fn compare_pipeline(source: &dyn BarSource, settings: &AnalysisSettings) -> CompareRun {
    info!(
        "Comparing {} tickers, metric {}, period {}",
        settings.tickers.len(),
        settings.metric,
        settings.period
    );
    let matrix = compare(source, &settings.tickers, settings.metric, settings.period);

    let export = settings.output.as_ref().map(|path| {
        let exporter = DelimitedExporter::for_path(path).transposed(settings.transpose);
        export_matrix(&exporter, &matrix, path)
    });

    CompareRun { matrix, export }
}

fn export_matrix(
    exporter: &dyn MatrixExporter,
    matrix: &ComparisonMatrix,
    path: &Path,
) -> Result<PathBuf, ExtremesError> {
    exporter.export(matrix, path)?;
    Ok(path.to_path_buf())
}

fn run_analyze(
    ticker: &str,
    period: Option<&str>,
    brief: bool,
    args: &SourceArgs,
) -> Result<ExitCode, ExtremesError> {
    let settings = resolve_settings(args, period)?;
    let source = open_source(&settings.source)?;
    let ticker = ticker.trim().to_uppercase();

    let report = analyze_report(source.as_ref(), &ticker, settings.period, brief)?;
    print!("{report}");
    Ok(ExitCode::SUCCESS)
}

fn run_weeks(
    ticker: &str,
    period: Option<&str>,
    args: &SourceArgs,
) -> Result<ExitCode, ExtremesError> {
    let settings = resolve_settings(args, period)?;
    let source = open_source(&settings.source)?;
    let ticker = ticker.trim().to_uppercase();

    let report = weeks_report(source.as_ref(), &ticker, settings.period)?;
    print!("{report}");
    Ok(ExitCode::SUCCESS)
}

fn run_compare(
    tickers: Option<&str>,
    metric: Option<&str>,
    period: Option<&str>,
    output: Option<PathBuf>,
    transpose: bool,
    args: &SourceArgs,
) -> Result<ExitCode, ExtremesError> {
    let mut settings = resolve_settings(args, period)?;
    if let Some(t) = tickers {
        settings.tickers = parse_tickers(t)?;
    }
    if let Some(m) = metric {
        settings.metric = m.parse()?;
    }
    if output.is_some() {
        settings.output = output;
    }
    settings.transpose |= transpose;

    if settings.tickers.is_empty() {
        return Err(ExtremesError::ConfigMissing {
            section: "analysis".into(),
            key: "tickers".into(),
        });
    }

    let source = open_source(&settings.source)?;
    let run = compare_pipeline(source.as_ref(), &settings);

    print!("{}", render_matrix(&run.matrix));
    let failed = run.matrix.failures().count();
    if failed > 0 {
        warn!("{} of {} tickers could not be analyzed", failed, run.matrix.columns.len());
    }

    match run.export {
        Some(Ok(path)) => eprintln!("Matrix written to: {}", path.display()),
        Some(Err(e)) => {
            error!("{e}");
            return Ok((&e).into());
        }
        None => {}
    }

    if run.matrix.succeeded() == 0 {
        error!("no ticker could be analyzed");
        return Ok(ExitCode::from(5u8));
    }
    Ok(ExitCode::SUCCESS)
}

fn run_list_symbols(
    data_dir: Option<PathBuf>,
    config_path: Option<&PathBuf>,
) -> Result<ExitCode, ExtremesError> {
    let config = load_config(config_path)?;
    let settings = build_source_settings(&config)?;
    let dir = data_dir.unwrap_or(settings.data_dir);

    let symbols = CsvAdapter::new(dir.clone()).list_symbols()?;
    if symbols.is_empty() {
        eprintln!("No symbols found in {}", dir.display());
    } else {
        for symbol in &symbols {
            println!("{}", symbol);
        }
        eprintln!("{} symbols found", symbols.len());
    }
    Ok(ExitCode::SUCCESS)
}
