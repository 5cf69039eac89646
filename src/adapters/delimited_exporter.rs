//! Delimited text export of a comparison matrix.
//!
//! `.dat` files are space separated, everything else comma separated. The
//! header row starts with an empty corner cell followed by the column labels;
//! the first field of every other row is the row label.

use crate::adapters::console_report::MISSING_MARKER;
use crate::domain::comparator::ComparisonMatrix;
use crate::domain::error::ExtremesError;
use crate::ports::export_port::MatrixExporter;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelimitedExporter {
    delimiter: u8,
    /// Tickers as rows and weekdays as columns instead of the default layout.
    transpose: bool,
}

impl DelimitedExporter {
    pub fn space() -> Self {
        Self {
            delimiter: b' ',
            transpose: false,
        }
    }

    pub fn comma() -> Self {
        Self {
            delimiter: b',',
            transpose: false,
        }
    }

    /// Picks the delimiter from the destination's extension.
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("dat") => Self::space(),
            _ => Self::comma(),
        }
    }

    pub fn transposed(mut self, transpose: bool) -> Self {
        self.transpose = transpose;
        self
    }

    fn cell(matrix: &ComparisonMatrix, weekday: usize, column: usize) -> String {
        match matrix.cell(weekday, column) {
            Some(v) => format!("{:.2}", v),
            None => MISSING_MARKER.to_string(),
        }
    }

    /// Header plus data records in the configured layout.
    pub fn records(&self, matrix: &ComparisonMatrix) -> Vec<Vec<String>> {
        let weekdays = matrix.weekday_names();
        let mut records = Vec::new();

        if self.transpose {
            let mut header = vec![String::new()];
            header.extend(weekdays.iter().map(|d| d.to_string()));
            records.push(header);
            for (col, ticker) in matrix.tickers().enumerate() {
                let mut row = vec![ticker.to_string()];
                row.extend((0..weekdays.len()).map(|day| Self::cell(matrix, day, col)));
                records.push(row);
            }
        } else {
            let mut header = vec![String::new()];
            header.extend(matrix.tickers().map(|t| t.to_string()));
            records.push(header);
            for (day, name) in weekdays.iter().enumerate() {
                let mut row = vec![name.to_string()];
                row.extend((0..matrix.columns.len()).map(|col| Self::cell(matrix, day, col)));
                records.push(row);
            }
        }

        records
    }
}

impl MatrixExporter for DelimitedExporter {
    fn export(&self, matrix: &ComparisonMatrix, destination: &Path) -> Result<(), ExtremesError> {
        let fail = |reason: String| ExtremesError::ExportFailure {
            destination: destination.display().to_string(),
            reason,
        };

        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_path(destination)
            .map_err(|e| fail(e.to_string()))?;

        for record in self.records(matrix) {
            writer
                .write_record(&record)
                .map_err(|e| fail(e.to_string()))?;
        }
        writer.flush().map_err(|e| fail(e.to_string()))?;

        info!(
            destination = %destination.display(),
            metric = %matrix.metric,
            columns = matrix.columns.len(),
            "matrix exported"
        );
        Ok(())
    }
}
