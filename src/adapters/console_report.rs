//! Plain-text tables for terminal output.
//!
//! Provides functions to render:
//! - The per-weekday statistics table (full or brief column set)
//! - The weekday x ticker comparison matrix
//! - The per-week extreme breakdown

use crate::domain::bar::DailyBar;
use crate::domain::comparator::ComparisonMatrix;
use crate::domain::stats_table::{SUMMARY_PERCENTAGE, StatsTable};
use crate::domain::week::WeekBucket;
use chrono::Datelike;

/// Printed in place of a value a failed ticker could not provide.
pub const MISSING_MARKER: &str = "NaN";

fn format_pct(value: f64) -> String {
    format!("{:.2}%", value)
}

/// Right-aligns every column to its widest cell, pandas style.
fn render_grid(header: &[String], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = header.iter().map(|h| h.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.len());
            }
        }
    }

    let line = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, w)| format!("{:>width$}", cell, width = *w))
            .collect::<Vec<_>>()
            .join("  ")
    };

    let mut out = line(header);
    out.push('\n');
    for row in rows {
        out.push_str(&line(row.as_slice()));
        out.push('\n');
    }
    out
}

pub fn render_stats_table(table: &StatsTable, brief: bool) -> String {
    let summary_pct = format_pct(SUMMARY_PERCENTAGE);
    let s = &table.summary;

    if brief {
        let header: Vec<String> = ["Weekday", "Extreme_Points", "Extreme_Percentage", "Weeks_Analyzed"]
            .iter()
            .map(|h| h.to_string())
            .collect();
        let mut rows: Vec<Vec<String>> = table
            .rows
            .iter()
            .map(|r| {
                vec![
                    r.weekday.to_string(),
                    r.extreme_points.to_string(),
                    format_pct(r.extreme_pct),
                    r.weeks_analyzed.to_string(),
                ]
            })
            .collect();
        rows.push(vec![
            s.label(),
            s.extreme_points.to_string(),
            summary_pct,
            s.weeks_analyzed.to_string(),
        ]);
        return render_grid(&header, &rows);
    }

    let header: Vec<String> = [
        "Weekday",
        "High_Frequency",
        "High_Percentage",
        "Low_Frequency",
        "Low_Percentage",
        "Extreme_Points",
        "Extreme_Percentage",
        "Total_Occurrences",
        "Weeks_Analyzed",
    ]
    .iter()
    .map(|h| h.to_string())
    .collect();

    let mut rows: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|r| {
            vec![
                r.weekday.to_string(),
                r.high_freq.to_string(),
                format_pct(r.high_pct),
                r.low_freq.to_string(),
                format_pct(r.low_pct),
                r.extreme_points.to_string(),
                format_pct(r.extreme_pct),
                r.total_occurrences.to_string(),
                r.weeks_analyzed.to_string(),
            ]
        })
        .collect();
    rows.push(vec![
        s.label(),
        s.high_freq.to_string(),
        summary_pct.clone(),
        s.low_freq.to_string(),
        summary_pct.clone(),
        s.extreme_points.to_string(),
        summary_pct,
        s.total_occurrences.to_string(),
        s.weeks_analyzed.to_string(),
    ]);

    render_grid(&header, &rows)
}

pub fn render_matrix(matrix: &ComparisonMatrix) -> String {
    if matrix.columns.is_empty() {
        return "No tickers compared.\n".to_string();
    }

    let mut header = vec![String::new()];
    header.extend(matrix.tickers().map(|t| t.to_string()));

    let rows: Vec<Vec<String>> = matrix
        .weekday_names()
        .iter()
        .enumerate()
        .map(|(day, name)| {
            let mut row = vec![name.to_string()];
            row.extend((0..matrix.columns.len()).map(|col| match matrix.cell(day, col) {
                Some(v) => format!("{:.2}", v),
                None => MISSING_MARKER.to_string(),
            }));
            row
        })
        .collect();

    render_grid(&header, &rows)
}

fn day_list<'a>(bars: impl Iterator<Item = &'a DailyBar>) -> String {
    bars.map(|b| b.date.weekday().to_string())
        .collect::<Vec<_>>()
        .join("/")
}

pub fn render_week_breakdown(buckets: &[WeekBucket]) -> String {
    if buckets.is_empty() {
        return "No weeks to show.\n".to_string();
    }

    let header: Vec<String> = ["Week", "Bars", "High", "High_Days", "Low", "Low_Days"]
        .iter()
        .map(|h| h.to_string())
        .collect();

    let rows: Vec<Vec<String>> = buckets
        .iter()
        .map(|b| {
            vec![
                b.key.to_string(),
                b.members.len().to_string(),
                format!("{:.2}", b.week_high),
                day_list(b.high_days()),
                format!("{:.2}", b.week_low),
                day_list(b.low_days()),
            ]
        })
        .collect();

    render_grid(&header, &rows)
}
