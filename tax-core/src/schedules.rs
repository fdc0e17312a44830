//! The two single-filer schedules under comparison.
//!
//! Both use the standard deduction, no dependents and the
//! [`PERSONAL_EXEMPTION`](crate::PERSONAL_EXEMPTION). They are built once,
//! on first use, and shared read-only for the rest of the process.

use std::sync::LazyLock;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use crate::models::{TaxBracket, TaxPlan};

/// (min_income, max_income, rate); `None` marks the uncapped top bracket.
type BracketRow = (Decimal, Option<Decimal>, Decimal);

const TRUMP_DEDUCTION: Decimal = dec!(15000);

const TRUMP_BRACKETS: [BracketRow; 3] = [
    (dec!(0), Some(dec!(37500)), dec!(0.12)),
    (dec!(37500), Some(dec!(112500)), dec!(0.25)),
    (dec!(112500), None, dec!(0.33)),
];

const CURRENT_DEDUCTION: Decimal = dec!(6300);

const CURRENT_BRACKETS: [BracketRow; 7] = [
    (dec!(0), Some(dec!(9275)), dec!(0.10)),
    (dec!(9275), Some(dec!(37650)), dec!(0.15)),
    (dec!(37650), Some(dec!(91150)), dec!(0.25)),
    (dec!(91150), Some(dec!(190150)), dec!(0.28)),
    (dec!(190150), Some(dec!(413350)), dec!(0.33)),
    (dec!(413350), Some(dec!(415050)), dec!(0.35)),
    (dec!(415050), None, dec!(0.40)),
];

static TRUMP: LazyLock<TaxPlan> = LazyLock::new(|| build("trump", &TRUMP_BRACKETS, TRUMP_DEDUCTION));

static CURRENT: LazyLock<TaxPlan> =
    LazyLock::new(|| build("current", &CURRENT_BRACKETS, CURRENT_DEDUCTION));

fn build(
    name: &str,
    rows: &[BracketRow],
    deduction: Decimal,
) -> TaxPlan {
    let plan = rows
        .iter()
        .map(|&(min_income, max_income, rate)| TaxBracket::new(min_income, max_income, rate))
        .collect::<Result<Vec<_>, _>>()
        .and_then(|brackets| TaxPlan::new(brackets, deduction));

    match plan {
        Ok(plan) => plan,
        // Literal rows; an error here is a bug in the tables above.
        Err(err) => panic!("built-in schedule '{name}' is invalid: {err}"),
    }
}

/// Proposed three-bracket schedule with a 15,000 standard deduction.
pub fn trump() -> &'static TaxPlan {
    &TRUMP
}

/// Seven-bracket schedule in force before the proposal, with a 6,300
/// standard deduction.
pub fn current() -> &'static TaxPlan {
    &CURRENT
}

/// A plan paired with the label it is charted and tabulated under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NamedPlan<'a> {
    pub name: &'a str,
    pub plan: &'a TaxPlan,
}

impl<'a> NamedPlan<'a> {
    pub fn new(
        name: &'a str,
        plan: &'a TaxPlan,
    ) -> Self {
        Self { name, plan }
    }
}

/// Both built-in schedules, proposed plan first.
pub fn all() -> [NamedPlan<'static>; 2] {
    [
        NamedPlan::new("trump", trump()),
        NamedPlan::new("current", current()),
    ]
}
