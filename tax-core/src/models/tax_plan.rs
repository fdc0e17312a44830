use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use tracing::debug;

use super::{ScheduleError, TaxBracket};
use crate::calculations::common::max;

/// Personal exemption subtracted from gross income by every plan built
/// with [`TaxPlan::new`].
pub const PERSONAL_EXEMPTION: Decimal = dec!(4050);

/// A progressive tax schedule: contiguous marginal brackets with strictly
/// increasing rates, applied after a flat deduction and an exemption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxPlan {
    brackets: Vec<TaxBracket>,
    deduction: Decimal,
    exemption: Decimal,
}

impl TaxPlan {
    /// Builds a plan using the standard [`PERSONAL_EXEMPTION`].
    ///
    /// # Errors
    ///
    /// See [`TaxPlan::with_exemption`].
    pub fn new(
        brackets: Vec<TaxBracket>,
        deduction: Decimal,
    ) -> Result<Self, ScheduleError> {
        Self::with_exemption(brackets, deduction, PERSONAL_EXEMPTION)
    }

    /// Builds a plan with an explicit exemption amount.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::InvalidPlan`] if:
    /// - no brackets are given
    /// - `deduction` or `exemption` is negative
    /// - a bracket does not start where its predecessor ends
    /// - a bracket's rate is not strictly above its predecessor's
    pub fn with_exemption(
        brackets: Vec<TaxBracket>,
        deduction: Decimal,
        exemption: Decimal,
    ) -> Result<Self, ScheduleError> {
        if brackets.is_empty() {
            return Err(ScheduleError::InvalidPlan(
                "at least one bracket is required".to_string(),
            ));
        }

        if deduction < Decimal::ZERO {
            return Err(ScheduleError::InvalidPlan(format!(
                "deduction {deduction} is negative"
            )));
        }

        if exemption < Decimal::ZERO {
            return Err(ScheduleError::InvalidPlan(format!(
                "exemption {exemption} is negative"
            )));
        }

        for (index, pair) in brackets.windows(2).enumerate() {
            check_adjacent(index, &pair[0], &pair[1])?;
        }

        debug!(
            brackets = brackets.len(),
            %deduction,
            %exemption,
            "built tax plan"
        );

        Ok(Self {
            brackets,
            deduction,
            exemption,
        })
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    pub fn deduction(&self) -> Decimal {
        self.deduction
    }

    pub fn exemption(&self) -> Decimal {
        self.exemption
    }

    /// Gross income at or below which no tax is owed.
    pub fn threshold(&self) -> Decimal {
        self.deduction + self.exemption
    }

    /// Gross income less the deduction and exemption, floored at zero.
    pub fn taxable_income(
        &self,
        total_income: Decimal,
    ) -> Decimal {
        // Saturates at Decimal::MIN for huge negative incomes, then floors.
        max(total_income.saturating_sub(self.threshold()), Decimal::ZERO)
    }

    /// Total tax owed on `total_income`.
    ///
    /// Never fails: negative or small incomes yield zero, and the result is
    /// non-decreasing in `total_income`.
    pub fn tax(
        &self,
        total_income: Decimal,
    ) -> Decimal {
        let taxable_income = self.taxable_income(total_income);
        self.brackets
            .iter()
            .map(|bracket| bracket.tax(taxable_income))
            .sum()
    }

    /// Rate applied to the next dollar of income.
    pub fn marginal_rate(
        &self,
        total_income: Decimal,
    ) -> Decimal {
        let taxable_income = self.taxable_income(total_income);
        self.brackets
            .iter()
            .find(|bracket| bracket.contains(taxable_income))
            .map_or(Decimal::ZERO, TaxBracket::rate)
    }

    /// Share of gross income paid as tax. Zero for non-positive income.
    pub fn effective_rate(
        &self,
        total_income: Decimal,
    ) -> Decimal {
        if total_income <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        self.tax(total_income) / total_income
    }
}

fn check_adjacent(
    index: usize,
    lower: &TaxBracket,
    upper: &TaxBracket,
) -> Result<(), ScheduleError> {
    match lower.max_income() {
        None => {
            return Err(ScheduleError::InvalidPlan(format!(
                "bracket {} is uncapped but is followed by another bracket",
                index
            )));
        }
        Some(max_income) if max_income != upper.min_income() => {
            return Err(ScheduleError::InvalidPlan(format!(
                "bracket {} ends at {} but bracket {} starts at {}",
                index,
                max_income,
                index + 1,
                upper.min_income()
            )));
        }
        Some(_) => {}
    }

    if lower.rate() >= upper.rate() {
        return Err(ScheduleError::InvalidPlan(format!(
            "rate {} of bracket {} is not above rate {} of bracket {}",
            upper.rate(),
            index + 1,
            lower.rate(),
            index
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn bracket(
        min_income: Decimal,
        max_income: Option<Decimal>,
        rate: Decimal,
    ) -> TaxBracket {
        TaxBracket::new(min_income, max_income, rate).unwrap()
    }

    fn three_bracket_plan() -> TaxPlan {
        TaxPlan::new(
            vec![
                bracket(dec!(0), Some(dec!(37500)), dec!(0.12)),
                bracket(dec!(37500), Some(dec!(112500)), dec!(0.25)),
                bracket(dec!(112500), None, dec!(0.33)),
            ],
            dec!(15000),
        )
        .unwrap()
    }

    // =========================================================================
    // construction tests
    // =========================================================================

    #[test]
    fn new_uses_personal_exemption() {
        let plan = three_bracket_plan();

        assert_eq!(plan.exemption(), dec!(4050));
        assert_eq!(plan.deduction(), dec!(15000));
        assert_eq!(plan.threshold(), dec!(19050));
        assert_eq!(plan.brackets().len(), 3);
    }

    #[test]
    fn new_accepts_single_bracket() {
        let result = TaxPlan::new(vec![bracket(dec!(0), None, dec!(0.10))], dec!(0));

        assert!(result.is_ok());
    }

    #[test]
    fn new_rejects_empty_brackets() {
        let result = TaxPlan::new(vec![], dec!(0));

        assert!(matches!(result, Err(ScheduleError::InvalidPlan(_))));
    }

    #[test]
    fn new_rejects_negative_deduction() {
        let result = TaxPlan::new(vec![bracket(dec!(0), None, dec!(0.10))], dec!(-1));

        assert!(matches!(result, Err(ScheduleError::InvalidPlan(_))));
    }

    #[test]
    fn with_exemption_rejects_negative_exemption() {
        let result =
            TaxPlan::with_exemption(vec![bracket(dec!(0), None, dec!(0.10))], dec!(0), dec!(-1));

        assert!(matches!(result, Err(ScheduleError::InvalidPlan(_))));
    }

    #[test]
    fn new_rejects_gap_between_brackets() {
        let result = TaxPlan::new(
            vec![
                bracket(dec!(0), Some(dec!(100)), dec!(0.10)),
                bracket(dec!(150), Some(dec!(200)), dec!(0.20)),
            ],
            dec!(0),
        );

        let Err(ScheduleError::InvalidPlan(msg)) = result else {
            panic!("expected InvalidPlan, got {result:?}");
        };
        assert!(msg.contains("100") && msg.contains("150"), "got: {msg}");
    }

    #[test]
    fn new_rejects_overlapping_brackets() {
        let result = TaxPlan::new(
            vec![
                bracket(dec!(0), Some(dec!(200)), dec!(0.10)),
                bracket(dec!(150), None, dec!(0.20)),
            ],
            dec!(0),
        );

        assert!(matches!(result, Err(ScheduleError::InvalidPlan(_))));
    }

    #[test]
    fn new_rejects_decreasing_rates() {
        let result = TaxPlan::new(
            vec![
                bracket(dec!(0), Some(dec!(100)), dec!(0.2)),
                bracket(dec!(100), None, dec!(0.1)),
            ],
            dec!(0),
        );

        assert!(matches!(result, Err(ScheduleError::InvalidPlan(_))));
    }

    #[test]
    fn new_rejects_equal_rates() {
        let result = TaxPlan::new(
            vec![
                bracket(dec!(0), Some(dec!(100)), dec!(0.2)),
                bracket(dec!(100), None, dec!(0.2)),
            ],
            dec!(0),
        );

        assert!(matches!(result, Err(ScheduleError::InvalidPlan(_))));
    }

    #[test]
    fn new_rejects_bracket_after_uncapped_bracket() {
        let result = TaxPlan::new(
            vec![
                bracket(dec!(0), None, dec!(0.1)),
                bracket(dec!(100), None, dec!(0.2)),
            ],
            dec!(0),
        );

        let Err(ScheduleError::InvalidPlan(msg)) = result else {
            panic!("expected InvalidPlan, got {result:?}");
        };
        assert!(msg.contains("uncapped"), "got: {msg}");
    }

    #[test]
    fn new_checks_every_adjacent_pair() {
        // First pair is fine, the failure is between brackets 1 and 2.
        let result = TaxPlan::new(
            vec![
                bracket(dec!(0), Some(dec!(100)), dec!(0.1)),
                bracket(dec!(100), Some(dec!(200)), dec!(0.2)),
                bracket(dec!(250), None, dec!(0.3)),
            ],
            dec!(0),
        );

        let Err(ScheduleError::InvalidPlan(msg)) = result else {
            panic!("expected InvalidPlan, got {result:?}");
        };
        assert!(msg.contains("bracket 1") && msg.contains("bracket 2"), "got: {msg}");
    }

    // =========================================================================
    // taxable_income tests
    // =========================================================================

    #[test]
    fn taxable_income_subtracts_deduction_and_exemption() {
        let plan = three_bracket_plan();

        assert_eq!(plan.taxable_income(dec!(119050)), dec!(100000));
    }

    #[test]
    fn taxable_income_is_floored_at_zero() {
        let plan = three_bracket_plan();

        assert_eq!(plan.taxable_income(dec!(10000)), dec!(0));
        assert_eq!(plan.taxable_income(dec!(-10000)), dec!(0));
    }

    #[test]
    fn taxable_income_handles_extreme_incomes() {
        let plan = three_bracket_plan();

        assert_eq!(plan.taxable_income(Decimal::MIN), dec!(0));
        assert_eq!(plan.taxable_income(Decimal::MAX), Decimal::MAX - dec!(19050));
    }

    // =========================================================================
    // tax tests
    // =========================================================================

    #[test]
    fn tax_is_zero_at_threshold() {
        let plan = three_bracket_plan();

        assert_eq!(plan.tax(dec!(19050)), dec!(0));
    }

    #[test]
    fn tax_sums_brackets() {
        let plan = three_bracket_plan();

        // 37500 * 0.12 + (100000 - 37500) * 0.25 = 4500 + 15625 = 20125
        assert_eq!(plan.tax(dec!(119050)), dec!(20125));
    }

    #[test]
    fn tax_reaches_top_bracket() {
        let plan = three_bracket_plan();

        // taxable 200000: 4500 + 18750 + (200000 - 112500) * 0.33 = 52125
        assert_eq!(plan.tax(dec!(219050)), dec!(52125));
    }

    #[test]
    fn tax_is_zero_for_most_negative_income() {
        let plan = three_bracket_plan();

        assert_eq!(plan.tax(Decimal::MIN), dec!(0));
        assert_eq!(plan.marginal_rate(Decimal::MIN), dec!(0));
        assert_eq!(plan.effective_rate(Decimal::MIN), dec!(0));
    }

    #[test]
    fn tax_honours_explicit_exemption() {
        let plan =
            TaxPlan::with_exemption(vec![bracket(dec!(0), None, dec!(0.10))], dec!(1000), dec!(0))
                .unwrap();

        assert_eq!(plan.tax(dec!(2000)), dec!(100));
    }

    // =========================================================================
    // rate tests
    // =========================================================================

    #[test]
    fn marginal_rate_is_zero_without_taxable_income() {
        let plan = three_bracket_plan();

        assert_eq!(plan.marginal_rate(dec!(19050)), dec!(0));
    }

    #[test]
    fn marginal_rate_follows_bracket_boundaries() {
        let plan = three_bracket_plan();

        assert_eq!(plan.marginal_rate(dec!(19051)), dec!(0.12));
        assert_eq!(plan.marginal_rate(dec!(56550)), dec!(0.12));
        assert_eq!(plan.marginal_rate(dec!(56551)), dec!(0.25));
        assert_eq!(plan.marginal_rate(dec!(1000000)), dec!(0.33));
    }

    #[test]
    fn effective_rate_divides_tax_by_income() {
        let plan = TaxPlan::with_exemption(
            vec![bracket(dec!(0), None, dec!(0.10))],
            dec!(5000),
            dec!(0),
        )
        .unwrap();

        // tax on 10000 is 500, 500 / 10000 = 0.05
        assert_eq!(plan.effective_rate(dec!(10000)), dec!(0.05));
    }

    #[test]
    fn effective_rate_is_zero_for_zero_income() {
        let plan = three_bracket_plan();

        assert_eq!(plan.effective_rate(dec!(0)), dec!(0));
    }
}
