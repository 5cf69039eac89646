//! Core domain types and logic.

pub mod analyzer;
pub mod bar;
pub mod comparator;
pub mod error;
pub mod period;
pub mod stats_table;
pub mod tickers;
pub mod week;
