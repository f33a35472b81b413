use clap::Args;
use colored::Colorize;
use serde_json::Value;

use crate::input::cash_flow::read_cash_flow_file;
use crate::output::table::render_cash_flow_table;

/// Arguments for loading an uploaded cash-flow file
#[derive(Args)]
pub struct UploadArgs {
    /// Path to a CSV or Excel (.xlsx) cash-flow file
    #[arg(long)]
    pub file: String,

    /// Maximum rows to display
    #[arg(long, default_value = "50")]
    pub rows: usize,
}

/// Show the uploaded data followed by the numeric column summary.
pub fn run_upload(args: UploadArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let table = read_cash_flow_file(&args.file)?;

    println!("{}", "Uploaded Data".bold());
    println!("{}\n", render_cash_flow_table(&table, args.rows));

    Ok(serde_json::json!({ "result": table.summary() }))
}
