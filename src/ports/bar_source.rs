//! Daily bar source port.

use crate::domain::bar::DailyBar;
use crate::domain::error::ExtremesError;
use crate::domain::period::Period;

pub trait BarSource {
    /// Daily bars for `ticker` covering `period`, oldest first.
    ///
    /// Unknown tickers and transport failures are reported as
    /// [`ExtremesError::SourceUnavailable`]. An empty `Ok` is allowed; the
    /// analyzer rejects it.
    fn fetch(&self, ticker: &str, period: Period) -> Result<Vec<DailyBar>, ExtremesError>;
}
