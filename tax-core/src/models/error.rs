use thiserror::Error;

/// Errors raised while building a tax schedule.
///
/// Both variants describe a static configuration mistake: the schedule
/// literals are wrong, so nothing is constructed and there is nothing to
/// retry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// A single bracket has bad bounds or a negative rate.
    #[error("invalid tax bracket: {0}")]
    InvalidBracket(String),

    /// The bracket sequence or the plan-level amounts are inconsistent.
    #[error("invalid tax plan: {0}")]
    InvalidPlan(String),
}
