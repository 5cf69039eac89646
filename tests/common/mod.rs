#![allow(dead_code)]

use chrono::NaiveDate;
use std::cell::RefCell;
use std::collections::HashMap;
pub use weekday_extremes::domain::bar::DailyBar;
use weekday_extremes::domain::error::ExtremesError;
use weekday_extremes::domain::period::Period;
use weekday_extremes::ports::bar_source::BarSource;

/// In-memory bar source. Records every ticker it is asked for.
pub struct MockBarSource {
    pub data: HashMap<String, Vec<DailyBar>>,
    pub errors: HashMap<String, String>,
    pub requests: RefCell<Vec<(String, Period)>>,
}

impl MockBarSource {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn with_bars(mut self, ticker: &str, bars: Vec<DailyBar>) -> Self {
        self.data.insert(ticker.to_string(), bars);
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requests.borrow().iter().map(|(t, _)| t.clone()).collect()
    }
}

impl BarSource for MockBarSource {
    fn fetch(&self, ticker: &str, period: Period) -> Result<Vec<DailyBar>, ExtremesError> {
        self.requests.borrow_mut().push((ticker.to_string(), period));
        if let Some(reason) = self.errors.get(ticker) {
            return Err(ExtremesError::source_unavailable(ticker, reason.clone()));
        }
        Ok(self.data.get(ticker).cloned().unwrap_or_default())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn bar(date_str: &str, high: f64, low: f64) -> DailyBar {
    DailyBar::from_range(
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap(),
        high,
        low,
    )
}

/// Mon 2024-01-15 .. Fri 2024-01-19: high on Wednesday, low on Monday.
pub fn single_week() -> Vec<DailyBar> {
    vec![
        bar("2024-01-15", 10.0, 5.0),
        bar("2024-01-16", 11.0, 6.0),
        bar("2024-01-17", 12.0, 7.0),
        bar("2024-01-18", 11.5, 6.5),
        bar("2024-01-19", 11.0, 6.0),
    ]
}

/// Two full weeks: week one high Wed / low Mon, week two high Mon / low Fri.
pub fn two_weeks() -> Vec<DailyBar> {
    let mut bars = single_week();
    bars.extend([
        bar("2024-01-22", 20.0, 15.0),
        bar("2024-01-23", 19.0, 14.0),
        bar("2024-01-24", 18.0, 13.0),
        bar("2024-01-25", 17.0, 12.0),
        bar("2024-01-26", 16.0, 11.0),
    ]);
    bars
}

/// `weeks` consecutive Mon-Fri weeks starting Monday 2024-01-01, prices rising
/// through each week so the high lands on Friday and the low on Monday.
pub fn rising_weeks(weeks: usize) -> Vec<DailyBar> {
    let start = date(2024, 1, 1);
    (0..weeks)
        .flat_map(|w| {
            (0..5).map(move |d| {
                let day = start + chrono::Duration::days((w * 7 + d) as i64);
                DailyBar::from_range(day, 100.0 + d as f64, 90.0 + d as f64)
            })
        })
        .collect()
}
