//! Progressive income tax under piecewise-linear marginal-rate schedules.
//!
//! [`TaxBracket`] taxes one income interval, [`TaxPlan`] sums its brackets
//! after subtracting the deduction and exemption, and [`schedules`] holds the
//! two built-in plans. [`calculations::series`] samples plans over an income
//! range for charting.

pub mod calculations;
pub mod models;
pub mod schedules;

pub use models::*;
pub use schedules::NamedPlan;
