use clap::Args;
use colored::Colorize;

use mca_core::export::DEFAULT_EXPORT_FILENAME;
use mca_core::merchant_cash_advance::{self, McaMetrics};

use super::advance::{export_schedule, resolve_terms, TermsArgs};
use super::chart::{terminal_chart, write_svg};
use crate::input::cash_flow::read_cash_flow_file;
use crate::output::table::render_cash_flow_table;

/// Arguments for the full underwriting dashboard
#[derive(Args)]
pub struct DashboardArgs {
    /// Path to a CSV or Excel (.xlsx) cash-flow file
    #[arg(long)]
    pub file: Option<String>,

    #[command(flatten)]
    pub terms: TermsArgs,

    /// Maximum uploaded rows to display
    #[arg(long, default_value = "20")]
    pub rows: usize,

    /// Write the remaining balance CSV (default: remaining_balance.csv)
    #[arg(long, num_args = 0..=1, default_missing_value = DEFAULT_EXPORT_FILENAME)]
    pub export: Option<String>,

    /// Write the remaining balance chart as SVG to this path
    #[arg(long)]
    pub svg: Option<String>,
}

/// Walk through the dashboard sections: uploaded data, key metrics,
/// remaining balance chart and export.
pub fn run_dashboard(args: DashboardArgs) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}\n", "Merchant Cash Advance (MCA) Underwriting Dashboard".bold());

    let Some(ref path) = args.file else {
        println!("{}", "Please upload a cash flow file to proceed (--file <path>).".cyan());
        return Ok(());
    };

    let table = read_cash_flow_file(path)?;
    section("Uploaded Data");
    println!("{}", render_cash_flow_table(&table, args.rows));

    let terms = resolve_terms(&args.terms)?;
    let metrics = merchant_cash_advance::calculate_mca_metrics(&terms)?;
    section("Key MCA Metrics");
    println!("{}", serde_json::to_string_pretty(&key_metrics(&metrics.result))?);
    for w in &metrics.warnings {
        println!("{} {}", "warning:".yellow().bold(), w);
    }

    let schedule = merchant_cash_advance::compute(&terms)?;
    section("Remaining Balance Over Time");
    println!("{}", terminal_chart(&schedule, 72, 16));
    if let Some(ref svg) = args.svg {
        write_svg(&terms, &schedule, svg)?;
        println!("\nSVG chart written to {}", svg);
    }

    section("Export Adjusted Data");
    match args.export {
        Some(ref out) => {
            export_schedule(&terms, out)?;
            println!("Remaining balance data ({} rows) written to {}", schedule.len(), out);
        }
        None => println!("Pass --export <path> to save the remaining balance data as CSV."),
    }
    Ok(())
}

fn section(title: &str) {
    println!("\n{}", format!("### {title}").green().bold());
}

/// Metrics keyed the way the dashboard labels them.
fn key_metrics(m: &McaMetrics) -> serde_json::Value {
    serde_json::json!({
        "Advance Amount ($)": m.advance_amount,
        "Factor Rate": m.factor_rate,
        "Total Payback Amount ($)": m.total_payback,
        "Daily Collections ($)": m.daily_collections,
        "Estimated Payback Period (Days)": m.estimated_payback_days,
    })
}
