//! Comparison matrix export port.

use crate::domain::comparator::ComparisonMatrix;
use crate::domain::error::ExtremesError;
use std::path::Path;

/// Port for writing a comparison matrix to a destination.
pub trait MatrixExporter {
    /// A failed write is returned as [`ExtremesError::ExportFailure`]; the
    /// matrix itself is left untouched.
    fn export(&self, matrix: &ComparisonMatrix, destination: &Path) -> Result<(), ExtremesError>;
}
