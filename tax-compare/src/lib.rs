//! Command-line glue around `tax-core`: settings, text reports and charts.

pub mod chart;
pub mod config;
pub mod report;
