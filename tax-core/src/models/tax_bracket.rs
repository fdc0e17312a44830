use rust_decimal::Decimal;
use serde::Serialize;

use super::ScheduleError;
use crate::calculations::common::{max, min};

/// One marginal-rate interval of a progressive schedule.
///
/// Income between `min_income` and `max_income` is taxed at `rate`. A
/// `max_income` of `None` marks the top bracket, which has no upper bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxBracket {
    min_income: Decimal,
    max_income: Option<Decimal>,
    rate: Decimal,
}

impl TaxBracket {
    /// Builds a bracket, rejecting bounds that do not describe a non-empty,
    /// non-negative interval and negative rates.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::InvalidBracket`] if:
    /// - `min_income` is negative
    /// - `max_income` is not greater than `min_income`
    /// - `rate` is negative
    pub fn new(
        min_income: Decimal,
        max_income: Option<Decimal>,
        rate: Decimal,
    ) -> Result<Self, ScheduleError> {
        if min_income < Decimal::ZERO {
            return Err(ScheduleError::InvalidBracket(format!(
                "min_income {min_income} is negative"
            )));
        }

        if let Some(max_income) = max_income {
            if max_income <= min_income {
                return Err(ScheduleError::InvalidBracket(format!(
                    "max_income {max_income} must be greater than min_income {min_income}"
                )));
            }
        }

        if rate < Decimal::ZERO {
            return Err(ScheduleError::InvalidBracket(format!(
                "rate {rate} is negative"
            )));
        }

        Ok(Self {
            min_income,
            max_income,
            rate,
        })
    }

    pub fn min_income(&self) -> Decimal {
        self.min_income
    }

    /// Upper bound of the bracket, `None` when uncapped.
    pub fn max_income(&self) -> Option<Decimal> {
        self.max_income
    }

    pub fn rate(&self) -> Decimal {
        self.rate
    }

    /// Size of the interval, `None` for the uncapped top bracket.
    pub fn width(&self) -> Option<Decimal> {
        self.max_income.map(|max_income| max_income - self.min_income)
    }

    /// Whether `taxable_income` falls inside this bracket.
    ///
    /// The lower bound is exclusive and the upper bound inclusive, so an
    /// income sitting exactly on a boundary belongs to the lower bracket.
    pub fn contains(
        &self,
        taxable_income: Decimal,
    ) -> bool {
        taxable_income > self.min_income
            && self
                .max_income
                .is_none_or(|max_income| taxable_income <= max_income)
    }

    /// Tax owed on the slice of `taxable_income` that falls in this bracket.
    ///
    /// Zero at or below `min_income`, rising with slope `rate` across the
    /// bracket and flat at `width * rate` above `max_income`. Any input is
    /// accepted; out-of-range incomes are clamped rather than rejected.
    pub fn tax(
        &self,
        taxable_income: Decimal,
    ) -> Decimal {
        let income_over_min = max(taxable_income.saturating_sub(self.min_income), Decimal::ZERO);
        let income_in_bracket = match self.width() {
            Some(width) => min(income_over_min, width),
            None => income_over_min,
        };
        income_in_bracket * self.rate
    }
}
