//! CLI-level tests: argument parsing, config loading and the report pipelines.

mod common;

use clap::Parser;
use common::*;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;
use weekday_extremes::adapters::file_config_adapter::FileConfigAdapter;
use weekday_extremes::adapters::yahoo_adapter::DEFAULT_BASE_URL;
use weekday_extremes::cli::{
    AnalysisSettings, Cli, Command, SourceArgs, SourceKind, analyze_report,
    apply_source_overrides, build_settings, compare_pipeline, load_config, weeks_report,
};
use weekday_extremes::domain::comparator::Metric;
use weekday_extremes::domain::error::ExtremesError;
use weekday_extremes::domain::period::Period;

fn settings_from(content: &str) -> Result<AnalysisSettings, ExtremesError> {
    let adapter = FileConfigAdapter::from_string(content).unwrap();
    build_settings(&adapter)
}

mod argument_parsing {
    use super::*;

    #[test]
    fn analyze_with_period_and_brief() {
        let cli = Cli::try_parse_from([
            "weekday-extremes",
            "analyze",
            "--ticker",
            "NVDA",
            "-p",
            "2y",
            "--brief",
        ])
        .unwrap();

        match cli.command {
            Command::Analyze {
                ticker,
                period,
                brief,
                source,
            } => {
                assert_eq!(ticker, "NVDA");
                assert_eq!(period.as_deref(), Some("2y"));
                assert!(brief);
                assert!(source.config.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn compare_with_source_flags() {
        let cli = Cli::try_parse_from([
            "weekday-extremes",
            "-vv",
            "compare",
            "--tickers",
            "YM=F,ES=F",
            "-m",
            "low",
            "-o",
            "out.dat",
            "--source",
            "csv",
            "--data-dir",
            "/tmp/bars",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Compare {
                tickers,
                metric,
                output,
                transpose,
                source,
                ..
            } => {
                assert_eq!(tickers.as_deref(), Some("YM=F,ES=F"));
                assert_eq!(metric.as_deref(), Some("low"));
                assert_eq!(output, Some(PathBuf::from("out.dat")));
                assert!(!transpose);
                assert_eq!(source.source.as_deref(), Some("csv"));
                assert_eq!(source.data_dir, Some(PathBuf::from("/tmp/bars")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn analyze_requires_ticker() {
        assert!(Cli::try_parse_from(["weekday-extremes", "analyze"]).is_err());
    }

    #[test]
    fn list_symbols_parses() {
        let cli = Cli::try_parse_from(["weekday-extremes", "list-symbols", "--data-dir", "d"])
            .unwrap();
        assert!(matches!(cli.command, Command::ListSymbols { .. }));
    }
}

mod config_loading {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let settings = build_settings(&FileConfigAdapter::empty()).unwrap();

        assert_eq!(settings.period, Period::ThreeMonths);
        assert_eq!(settings.metric, Metric::Extreme);
        assert!(settings.tickers.is_empty());
        assert!(settings.output.is_none());
        assert!(!settings.transpose);
        assert_eq!(settings.source.kind, SourceKind::Yahoo);
        assert_eq!(settings.source.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.source.timeout, Duration::from_secs(10));
    }

    #[test]
    fn full_config_is_read() {
        let settings = settings_from(
            r#"
[analysis]
period = 2y
metric = low
tickers = ym=f, es=f,NQ=F

[source]
kind = csv
data_dir = /srv/bars
timeout_secs = 30

[export]
output = low_points_analysis.dat
transpose = true
"#,
        )
        .unwrap();

        assert_eq!(settings.period, Period::TwoYears);
        assert_eq!(settings.metric, Metric::Low);
        assert_eq!(settings.tickers, vec!["YM=F", "ES=F", "NQ=F"]);
        assert_eq!(settings.output, Some(PathBuf::from("low_points_analysis.dat")));
        assert!(settings.transpose);
        assert_eq!(settings.source.kind, SourceKind::Csv);
        assert_eq!(settings.source.data_dir, PathBuf::from("/srv/bars"));
        assert_eq!(settings.source.timeout, Duration::from_secs(30));
    }

    #[test]
    fn invalid_period_is_config_invalid() {
        let err = settings_from("[analysis]\nperiod = 3w\n").unwrap_err();
        assert!(matches!(
            err,
            ExtremesError::ConfigInvalid { ref key, .. } if key == "period"
        ));
        assert!(err.to_string().contains("3w"));
    }

    #[test]
    fn invalid_metric_is_config_invalid() {
        let err = settings_from("[analysis]\nmetric = close\n").unwrap_err();
        assert!(matches!(err, ExtremesError::ConfigInvalid { ref key, .. } if key == "metric"));
    }

    #[test]
    fn duplicate_ticker_is_config_invalid() {
        let err = settings_from("[analysis]\ntickers = A,B,a\n").unwrap_err();
        assert!(err.to_string().contains("duplicate ticker: A"));
    }

    #[test]
    fn unknown_source_kind_is_rejected() {
        let err = settings_from("[source]\nkind = bloomberg\n").unwrap_err();
        assert!(matches!(err, ExtremesError::ConfigInvalid { ref key, .. } if key == "kind"));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = settings_from("[source]\ntimeout_secs = 0\n").unwrap_err();
        assert!(err.to_string().contains("timeout_secs"));
    }

    #[test]
    fn non_numeric_timeout_is_rejected() {
        let err = settings_from("[source]\ntimeout_secs = soon\n").unwrap_err();
        assert!(matches!(
            err,
            ExtremesError::ConfigInvalid { ref key, .. } if key == "timeout_secs"
        ));
    }

    #[test]
    fn garbage_transpose_is_rejected() {
        let err = settings_from("[export]\ntranspose = sideways\n").unwrap_err();
        assert!(matches!(err, ExtremesError::ConfigInvalid { ref key, .. } if key == "transpose"));
    }

    #[test]
    fn unknown_section_is_ignored() {
        let settings = settings_from("[plotting]\nstyle = dark\n[analysis]\nperiod = 6mo\n").unwrap();
        assert_eq!(settings.period, Period::SixMonths);
    }

    #[test]
    fn load_config_without_path_is_empty() {
        let adapter = load_config(None).unwrap();
        assert!(build_settings(&adapter).unwrap().tickers.is_empty());
    }

    #[test]
    fn load_config_missing_file_is_parse_error() {
        let path = PathBuf::from("/nonexistent/weekday.ini");
        let err = load_config(Some(&path)).unwrap_err();
        assert!(matches!(err, ExtremesError::ConfigParse { .. }));
    }

    #[test]
    fn load_config_reads_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("weekday.ini");
        fs::write(&path, "[analysis]\nperiod = ytd\n").unwrap();

        let adapter = load_config(Some(&path)).unwrap();
        assert_eq!(build_settings(&adapter).unwrap().period, Period::YearToDate);
    }
}

mod source_overrides {
    use super::*;

    #[test]
    fn data_dir_switches_to_csv() {
        let mut settings = build_settings(&FileConfigAdapter::empty()).unwrap().source;
        let args = SourceArgs {
            data_dir: Some(PathBuf::from("bars")),
            ..SourceArgs::default()
        };

        apply_source_overrides(&mut settings, &args).unwrap();

        assert_eq!(settings.kind, SourceKind::Csv);
        assert_eq!(settings.data_dir, PathBuf::from("bars"));
    }

    #[test]
    fn explicit_source_wins_over_data_dir() {
        let mut settings = build_settings(&FileConfigAdapter::empty()).unwrap().source;
        let args = SourceArgs {
            source: Some("yahoo".into()),
            data_dir: Some(PathBuf::from("bars")),
            ..SourceArgs::default()
        };

        apply_source_overrides(&mut settings, &args).unwrap();
        assert_eq!(settings.kind, SourceKind::Yahoo);
    }

    #[test]
    fn bad_source_flag_is_rejected() {
        let mut settings = build_settings(&FileConfigAdapter::empty()).unwrap().source;
        let args = SourceArgs {
            source: Some("ftp".into()),
            ..SourceArgs::default()
        };
        assert!(apply_source_overrides(&mut settings, &args).is_err());
    }
}

mod report_pipelines {
    use super::*;

    fn settings(tickers: &[&str], output: Option<PathBuf>) -> AnalysisSettings {
        let mut settings = build_settings(&FileConfigAdapter::empty()).unwrap();
        settings.tickers = tickers.iter().map(|t| t.to_string()).collect();
        settings.output = output;
        settings
    }

    #[test]
    fn analyze_report_has_title_and_table() {
        let source = MockBarSource::new().with_bars("NVDA", two_weeks());
        let report = analyze_report(&source, "NVDA", Period::OneMonth, false).unwrap();

        assert!(report.starts_with("Weekly High/Low Analysis for NVDA over period: 1mo"));
        assert!(report.contains("Wednesday"));
        assert!(report.contains("Total (2 weeks)"));
    }

    #[test]
    fn analyze_report_brief_omits_frequency_columns() {
        let source = MockBarSource::new().with_bars("NVDA", two_weeks());
        let report = analyze_report(&source, "NVDA", Period::OneMonth, true).unwrap();

        assert!(report.contains("Extreme_Percentage"));
        assert!(!report.contains("High_Frequency"));
    }

    #[test]
    fn analyze_report_propagates_source_error() {
        let source = MockBarSource::new().with_error("NVDA", "connection refused");
        let err = analyze_report(&source, "NVDA", Period::OneMonth, false).unwrap_err();
        assert!(matches!(err, ExtremesError::SourceUnavailable { .. }));
    }

    #[test]
    fn weeks_report_lists_each_week() {
        let source = MockBarSource::new().with_bars("ES=F", two_weeks());
        let report = weeks_report(&source, "ES=F", Period::OneMonth).unwrap();

        assert!(report.contains("(2 weeks)"));
        assert!(report.contains("2024-W03"));
        assert!(report.contains("2024-W04"));
    }

    #[test]
    fn weeks_report_counts_tied_weeks() {
        let bars = vec![
            bar("2024-01-15", 10.0, 8.0),
            bar("2024-01-16", 12.0, 9.0),
            bar("2024-01-17", 12.0, 7.0),
        ];
        let source = MockBarSource::new().with_bars("ES=F", bars);
        let report = weeks_report(&source, "ES=F", Period::OneMonth).unwrap();

        assert!(report.contains("Tue/Wed"));
        assert!(report.contains("Tied weeks: 1 high, 0 low"));
    }

    #[test]
    fn weeks_report_without_ties_has_no_footer() {
        let source = MockBarSource::new().with_bars("ES=F", two_weeks());
        let report = weeks_report(&source, "ES=F", Period::OneMonth).unwrap();
        assert!(!report.contains("Tied weeks"));
    }

    #[test]
    fn weeks_report_empty_is_empty_series() {
        let source = MockBarSource::new();
        let err = weeks_report(&source, "ES=F", Period::OneMonth).unwrap_err();
        assert!(matches!(err, ExtremesError::EmptySeries { .. }));
    }

    #[test]
    fn compare_pipeline_without_output_skips_export() {
        let source = MockBarSource::new().with_bars("A", single_week());
        let run = compare_pipeline(&source, &settings(&["A"], None));

        assert!(run.export.is_none());
        assert_eq!(run.matrix.succeeded(), 1);
    }

    #[test]
    fn compare_pipeline_exports_csv() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("matrix.csv");
        let source = MockBarSource::new()
            .with_bars("A", single_week())
            .with_error("B", "down");

        let run = compare_pipeline(&source, &settings(&["A", "B"], Some(path.clone())));

        assert_eq!(run.export.unwrap().unwrap(), path);
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with(",A,B\n"));
        assert!(content.contains("Wednesday,50.00,NaN"));
    }

    #[test]
    fn compare_pipeline_export_failure_keeps_matrix() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("matrix.dat");
        let source = MockBarSource::new().with_bars("A", single_week());

        let run = compare_pipeline(&source, &settings(&["A"], Some(path)));

        assert!(matches!(
            run.export,
            Some(Err(ExtremesError::ExportFailure { .. }))
        ));
        assert_eq!(run.matrix.succeeded(), 1);
    }
}
