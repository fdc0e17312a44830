//! Calculations built on top of the bracket and plan models.
//!
//! `common` holds decimal helpers; `series` samples plans across an income
//! range and compares them point by point.

pub mod common;
pub mod series;

pub use series::{
    ComparisonRow, IncomeRange, MAX_SAMPLES, PlanComparison, SeriesError, TaxPoint, TaxSeries,
};
