mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::advance::{MetricsArgs, ScheduleArgs};
use commands::cash_flow::UploadArgs;
use commands::chart::ChartArgs;
use commands::dashboard::DashboardArgs;

/// Merchant cash advance underwriting from the command line
#[derive(Parser)]
#[command(
    name = "mca",
    version,
    about = "Merchant cash advance underwriting",
    long_about = "Projects the daily payback of a merchant cash advance from its \
                  advance amount, factor rate, retrieval rate and daily revenue. \
                  Renders the schedule as a table, chart or CSV export, and loads \
                  merchant cash-flow files (CSV/XLSX) for review."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Project the day-by-day remaining balance
    Schedule(ScheduleArgs),
    /// Key MCA metrics: total payback, daily collections, payback period
    Metrics(MetricsArgs),
    /// Chart the remaining balance over time
    Chart(ChartArgs),
    /// Load and display a cash-flow file
    Upload(UploadArgs),
    /// Full dashboard: uploaded data, metrics, chart and export
    Dashboard(DashboardArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Schedule(args) => commands::advance::run_schedule(args),
        Commands::Metrics(args) => commands::advance::run_metrics(args),
        Commands::Upload(args) => commands::cash_flow::run_upload(args),
        Commands::Chart(args) => exit_with(commands::chart::run_chart(args)),
        Commands::Dashboard(args) => exit_with(commands::dashboard::run_dashboard(args)),
        Commands::Version => {
            println!("mca {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => fail(e),
    }
}

/// Commands that render their own output only report errors.
fn exit_with(result: Result<(), Box<dyn std::error::Error>>) -> ! {
    match result {
        Ok(()) => process::exit(0),
        Err(e) => fail(e),
    }
}

fn fail(e: Box<dyn std::error::Error>) -> ! {
    log::debug!("command failed: {e:?}");
    eprintln!("{}: {}", "error".red().bold(), e);
    process::exit(1);
}
