//! Concrete adapter implementations for ports.

pub mod console_report;
pub mod csv_adapter;
pub mod delimited_exporter;
pub mod file_config_adapter;
pub mod yahoo_adapter;
