use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use tax_compare::{chart, config::ChartConfig, report};
use tax_core::calculations::PlanComparison;
use tax_core::schedules;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Compare the proposed and current single-filer tax schedules.
#[derive(Debug, Parser)]
#[command(name = "tax-compare", version, about, long_about = None)]
struct Cli {
    /// TOML file with range and chart settings.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print both plans' tax for one or more gross incomes.
    Tax {
        #[arg(required = true, allow_negative_numbers = true)]
        incomes: Vec<Decimal>,
    },

    /// Write the comparison over an income range as CSV to stdout.
    Table {
        #[command(flatten)]
        range: RangeArgs,
    },

    /// Render the comparison over an income range as an SVG chart.
    Plot {
        #[command(flatten)]
        range: RangeArgs,

        /// Where to write the SVG.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Args)]
struct RangeArgs {
    /// First sampled income.
    #[arg(long)]
    start: Option<Decimal>,

    /// Sampling stops before this income.
    #[arg(long)]
    end: Option<Decimal>,

    /// Distance between sampled incomes.
    #[arg(long)]
    step: Option<Decimal>,
}

// ─── tracing ─────────────────────────────────────────────────────────────────

/// Initialise the tracing subscriber.
///
/// * Honours `RUST_LOG` when set.
/// * Falls back to `info`, or `debug` with `--verbose`.
/// * Writes to stderr so CSV on stdout stays clean.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .with_target(false)
        .init();
}

fn load_config(
    cli_config: Option<PathBuf>,
    range: &RangeArgs,
    output: Option<PathBuf>,
) -> anyhow::Result<ChartConfig> {
    let config = ChartConfig::load(cli_config.as_deref())?.with_cli_overrides(
        range.start,
        range.end,
        range.step,
        output,
    );
    debug!(?config, "resolved settings");
    Ok(config)
}

fn comparison(config: &ChartConfig) -> anyhow::Result<PlanComparison> {
    let range = config
        .income_range()
        .context("invalid income range")?;
    let [trump, current] = schedules::all();
    Ok(PlanComparison::new(current, trump, &range))
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Tax { incomes } => {
            let [trump, current] = schedules::all();
            report::write_tax_summary(io::stdout().lock(), current, trump, &incomes)
                .context("Failed to write tax summary")?;
        }
        Command::Table { range } => {
            let config = load_config(cli.config, &range, None)?;
            let comparison = comparison(&config)?;
            report::write_comparison_csv(io::stdout().lock(), &comparison)
                .context("Failed to write comparison table")?;
        }
        Command::Plot { range, output } => {
            let config = load_config(cli.config, &range, output)?;
            let comparison = comparison(&config)?;
            chart::render_svg(&comparison, &config.output, (config.width, config.height))
                .with_context(|| format!("Failed to render: {}", config.output.display()))?;

            for income in comparison.crossovers() {
                info!(%income, "plans swap places");
            }
            info!(path = %config.output.display(), "wrote chart");
        }
    }

    Ok(())
}
