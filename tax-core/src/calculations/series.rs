//! Income sweeps for charting and tabulating plans.
//!
//! Nothing here renders anything. A [`TaxSeries`] is an ordered list of
//! (income, tax) points, and a [`PlanComparison`] holds two of them sampled
//! on the same [`IncomeRange`] plus their point-wise difference. Callers hand
//! these to whatever chart or table writer they use.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::calculations::{IncomeRange, PlanComparison};
//! use tax_core::schedules;
//!
//! let range = IncomeRange::new(dec!(0), dec!(500000), dec!(1000)).unwrap();
//! let [trump, current] = schedules::all();
//! let comparison = PlanComparison::new(current, trump, &range);
//!
//! assert_eq!(comparison.baseline().points().len(), 500);
//! assert_eq!(comparison.advantage().label(), "trump plan advantage");
//! ```

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, trace};

use crate::schedules::NamedPlan;

/// Most incomes an [`IncomeRange`] may sample.
pub const MAX_SAMPLES: u64 = 1_000_000;

/// Errors raised for income ranges that cannot be sampled.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SeriesError {
    /// The step between samples is zero or negative.
    #[error("income step must be positive, got {0}")]
    InvalidStep(Decimal),

    /// The end of the range is not above its start.
    #[error("income range {start}..{end} is empty")]
    EmptyRange { start: Decimal, end: Decimal },

    /// Sampling the range would yield more than [`MAX_SAMPLES`] incomes.
    #[error("income range {start}..{end} with step {step} has more than {max} samples", max = MAX_SAMPLES)]
    TooManySamples {
        start: Decimal,
        end: Decimal,
        step: Decimal,
    },
}

/// Half-open range of gross incomes, `start` inclusive and `end` exclusive,
/// sampled every `step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IncomeRange {
    start: Decimal,
    end: Decimal,
    step: Decimal,
}

impl IncomeRange {
    /// # Errors
    ///
    /// Returns [`SeriesError::InvalidStep`] for a non-positive `step`,
    /// [`SeriesError::EmptyRange`] when `end <= start` and
    /// [`SeriesError::TooManySamples`] when the range holds more than
    /// [`MAX_SAMPLES`] incomes.
    pub fn new(
        start: Decimal,
        end: Decimal,
        step: Decimal,
    ) -> Result<Self, SeriesError> {
        if step <= Decimal::ZERO {
            return Err(SeriesError::InvalidStep(step));
        }
        if end <= start {
            return Err(SeriesError::EmptyRange { start, end });
        }

        let samples = end
            .checked_sub(start)
            .and_then(|span| span.checked_div(step))
            .map(|count| count.ceil());
        match samples {
            Some(count) if count <= Decimal::from(MAX_SAMPLES) => {}
            _ => return Err(SeriesError::TooManySamples { start, end, step }),
        }

        Ok(Self { start, end, step })
    }

    pub fn start(&self) -> Decimal {
        self.start
    }

    pub fn end(&self) -> Decimal {
        self.end
    }

    pub fn step(&self) -> Decimal {
        self.step
    }

    /// Sample incomes in ascending order.
    ///
    /// Ends early if the next sample would overflow `Decimal`.
    pub fn incomes(&self) -> impl Iterator<Item = Decimal> + '_ {
        std::iter::successors(Some(self.start), |income| income.checked_add(self.step))
            .take_while(|income| *income < self.end)
    }
}

impl Default for IncomeRange {
    /// Zero to 500,000 in steps of 1,000.
    fn default() -> Self {
        Self {
            start: Decimal::ZERO,
            end: dec!(500000),
            step: dec!(1000),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaxPoint {
    pub income: Decimal,
    pub tax: Decimal,
}

/// A labelled, income-ordered list of points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxSeries {
    label: String,
    points: Vec<TaxPoint>,
}

impl TaxSeries {
    pub fn new(
        label: impl Into<String>,
        points: Vec<TaxPoint>,
    ) -> Self {
        Self {
            label: label.into(),
            points,
        }
    }

    /// Samples `named.plan` at every income in `range`.
    pub fn for_plan(
        named: NamedPlan<'_>,
        range: &IncomeRange,
    ) -> Self {
        let points: Vec<TaxPoint> = range
            .incomes()
            .map(|income| {
                let tax = named.plan.tax(income);
                trace!(plan = named.name, %income, %tax, "sampled");
                TaxPoint { income, tax }
            })
            .collect();

        debug!(plan = named.name, points = points.len(), "built tax series");
        Self::new(named.name, points)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn points(&self) -> &[TaxPoint] {
        &self.points
    }
}

/// One sampled income with both plans' tax and their difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ComparisonRow {
    pub income: Decimal,
    pub candidate: Decimal,
    pub baseline: Decimal,
    pub advantage: Decimal,
}

/// Two plans sampled on the same income range.
///
/// The advantage at an income is `baseline - candidate`: positive where the
/// candidate plan charges less.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanComparison {
    baseline: TaxSeries,
    candidate: TaxSeries,
}

impl PlanComparison {
    pub fn new(
        baseline: NamedPlan<'_>,
        candidate: NamedPlan<'_>,
        range: &IncomeRange,
    ) -> Self {
        Self {
            baseline: TaxSeries::for_plan(baseline, range),
            candidate: TaxSeries::for_plan(candidate, range),
        }
    }

    pub fn baseline(&self) -> &TaxSeries {
        &self.baseline
    }

    pub fn candidate(&self) -> &TaxSeries {
        &self.candidate
    }

    pub fn rows(&self) -> impl Iterator<Item = ComparisonRow> + '_ {
        self.baseline
            .points
            .iter()
            .zip(&self.candidate.points)
            .map(|(baseline, candidate)| ComparisonRow {
                income: baseline.income,
                candidate: candidate.tax,
                baseline: baseline.tax,
                advantage: baseline.tax - candidate.tax,
            })
    }

    /// Point-wise `baseline - candidate`, labelled after the candidate.
    pub fn advantage(&self) -> TaxSeries {
        let points = self
            .rows()
            .map(|row| TaxPoint {
                income: row.income,
                tax: row.advantage,
            })
            .collect();

        TaxSeries::new(format!("{} plan advantage", self.candidate.label), points)
    }

    /// Sampled incomes at which the advantage changes sign.
    ///
    /// Zero-advantage samples do not count as a sign of their own; the
    /// reported income is the first sample on the new side.
    pub fn crossovers(&self) -> Vec<Decimal> {
        let mut crossovers = Vec::new();
        let mut last_positive: Option<bool> = None;

        for row in self.rows() {
            if row.advantage.is_zero() {
                continue;
            }
            let positive = row.advantage.is_sign_positive();
            if last_positive.is_some_and(|last| last != positive) {
                crossovers.push(row.income);
            }
            last_positive = Some(positive);
        }

        crossovers
    }
}
