//! SVG rendering of a plan comparison.
//!
//! The upper panel plots both plans' tax against income; the lower panel
//! plots the candidate's advantage over the baseline.

use std::ops::Range;
use std::path::Path;

use plotters::prelude::*;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use tax_core::calculations::{PlanComparison, TaxSeries};
use thiserror::Error;
use tracing::debug;

const TAX_TITLE: &str = "Single, standard deduction, no dependents";

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("nothing to plot: the comparison has no points")]
    Empty,

    #[error("chart rendering failed: {0}")]
    Render(String),
}

fn render_err<E: std::fmt::Display>(err: E) -> ChartError {
    ChartError::Render(err.to_string())
}

fn to_xy(series: &TaxSeries) -> Vec<(f64, f64)> {
    series
        .points()
        .iter()
        .map(|point| (to_f64(point.income), to_f64(point.tax)))
        .collect()
}

fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

/// Axis range covering `values`, padded by 5% and never zero-width.
fn padded_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (low, high) = values.fold((0.0_f64, 0.0_f64), |(low, high), v| {
        (low.min(v), high.max(v))
    });
    let pad = ((high - low) * 0.05).max(1.0);
    let low = if low < 0.0 { low - pad } else { low };
    low..high + pad
}

/// Colour for a plan's line; the baseline is blue, the candidate red.
fn series_color(is_baseline: bool) -> RGBColor {
    if is_baseline { BLUE } else { RED }
}

/// Renders `comparison` to an SVG file at `path`.
///
/// # Errors
///
/// Returns [`ChartError::Empty`] for a comparison without points and
/// [`ChartError::Render`] when plotters cannot lay out or write the chart.
pub fn render_svg(
    comparison: &PlanComparison,
    path: &Path,
    (width, height): (u32, u32),
) -> Result<(), ChartError> {
    if comparison.baseline().points().is_empty() {
        return Err(ChartError::Empty);
    }

    let candidate = to_xy(comparison.candidate());
    let baseline = to_xy(comparison.baseline());
    let advantage_series = comparison.advantage();
    let advantage = to_xy(&advantage_series);

    let x_range = {
        let first = candidate.first().map_or(0.0, |p| p.0);
        let last = candidate.last().map_or(first, |p| p.0);
        first..last.max(first + 1.0)
    };
    let tax_range = padded_range(candidate.iter().chain(&baseline).map(|p| p.1));
    let advantage_range = padded_range(advantage.iter().map(|p| p.1));

    let root = SVGBackend::new(path, (width, height)).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;
    let (upper, lower) = root.split_vertically(height / 2);

    let mut tax_chart = ChartBuilder::on(&upper)
        .caption(TAX_TITLE, ("sans-serif", 20).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(x_range.clone(), tax_range)
        .map_err(render_err)?;

    tax_chart
        .configure_mesh()
        .x_desc("Income")
        .y_desc("Tax")
        .x_label_formatter(&|v| format!("{v:.0}"))
        .y_label_formatter(&|v| format!("{v:.0}"))
        .draw()
        .map_err(render_err)?;

    for (series, points, is_baseline) in [
        (comparison.candidate(), candidate, false),
        (comparison.baseline(), baseline, true),
    ] {
        let color = series_color(is_baseline);
        tax_chart
            .draw_series(LineSeries::new(points, color.stroke_width(2)))
            .map_err(render_err)?
            .label(series.label())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    tax_chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .draw()
        .map_err(render_err)?;

    let advantage_title = capitalize(advantage_series.label());
    let mut advantage_chart = ChartBuilder::on(&lower)
        .caption(&advantage_title, ("sans-serif", 20).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(x_range, advantage_range)
        .map_err(render_err)?;

    advantage_chart
        .configure_mesh()
        .x_desc("Income")
        .y_desc("Difference")
        .x_label_formatter(&|v| format!("{v:.0}"))
        .y_label_formatter(&|v| format!("{v:.0}"))
        .draw()
        .map_err(render_err)?;

    advantage_chart
        .draw_series(LineSeries::new(advantage, GREEN.stroke_width(2)))
        .map_err(render_err)?;

    root.present().map_err(render_err)?;
    debug!(path = %path.display(), width, height, "rendered chart");
    Ok(())
}

fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
