//! Port traits the domain depends on.

pub mod bar_source;
pub mod config_port;
pub mod export_port;
