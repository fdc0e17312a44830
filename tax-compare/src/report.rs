//! Text output for the `tax` and `table` commands.

use std::io::Write;

use rust_decimal::Decimal;
use tax_core::NamedPlan;
use tax_core::calculations::PlanComparison;
use tax_core::calculations::common::round_half_up;

/// Amount rounded to cents and always shown with two decimals.
fn money(amount: Decimal) -> String {
    format!("{:.2}", round_half_up(amount))
}

/// Rate as a percentage with at most two decimal places, e.g. `16.9%`.
fn percent(rate: Decimal) -> String {
    format!("{}%", (rate * Decimal::ONE_HUNDRED).round_dp(2).normalize())
}

/// Writes one block per income: each plan's tax and rates, then how much
/// less the candidate charges than the baseline.
pub fn write_tax_summary<W: Write>(
    mut out: W,
    baseline: NamedPlan<'_>,
    candidate: NamedPlan<'_>,
    incomes: &[Decimal],
) -> std::io::Result<()> {
    for &income in incomes {
        let candidate_tax = candidate.plan.tax(income);
        let baseline_tax = baseline.plan.tax(income);

        writeln!(out, "income {}", money(income))?;
        for (named, tax) in [(candidate, candidate_tax), (baseline, baseline_tax)] {
            writeln!(
                out,
                "  {:<10} tax {:>12}  marginal {:>6}  effective {:>7}",
                named.name,
                money(tax),
                percent(named.plan.marginal_rate(income)),
                percent(named.plan.effective_rate(income)),
            )?;
        }
        let advantage = baseline_tax - candidate_tax;
        writeln!(
            out,
            "  {} plan advantage {}",
            candidate.name,
            money(advantage)
        )?;
    }
    Ok(())
}

/// Writes the comparison as CSV: `income,<candidate>,<baseline>,advantage`.
pub fn write_comparison_csv<W: Write>(
    out: W,
    comparison: &PlanComparison,
) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record([
        "income",
        comparison.candidate().label(),
        comparison.baseline().label(),
        "advantage",
    ])?;

    for row in comparison.rows() {
        writer.write_record([
            money(row.income),
            money(row.candidate),
            money(row.baseline),
            money(row.advantage),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
