use clap::Args;
use colored::Colorize;
use std::fs;

use mca_core::chart::{render_balance_ascii, render_balance_svg, ChartOptions};
use mca_core::merchant_cash_advance::{self, AdvanceTerms, PaybackSchedule};

use super::advance::{resolve_terms, TermsArgs};

/// Arguments for the remaining-balance chart
#[derive(Args)]
pub struct ChartArgs {
    #[command(flatten)]
    pub terms: TermsArgs,

    /// Plot columns in the terminal chart
    #[arg(long, default_value = "72")]
    pub width: usize,

    /// Plot rows in the terminal chart
    #[arg(long, default_value = "16")]
    pub height: usize,

    /// Also write the chart as an SVG document to this path
    #[arg(long)]
    pub svg: Option<String>,
}

pub fn run_chart(args: ChartArgs) -> Result<(), Box<dyn std::error::Error>> {
    let terms = resolve_terms(&args.terms)?;
    let schedule = merchant_cash_advance::compute(&terms)?;

    println!("{}", terminal_chart(&schedule, args.width, args.height));
    if let Some(ref path) = args.svg {
        write_svg(&terms, &schedule, path)?;
        println!("\nSVG chart written to {}", path);
    }
    Ok(())
}

/// Terminal chart with the zero reference line highlighted.
pub fn terminal_chart(schedule: &PaybackSchedule, width: usize, height: usize) -> String {
    render_balance_ascii(schedule, width, height)
        .lines()
        .map(|line| {
            if line.contains(" +-") {
                line.red().to_string()
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn write_svg(
    terms: &AdvanceTerms,
    schedule: &PaybackSchedule,
    path: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let opts = ChartOptions {
        title: format!(
            "Remaining Balance Over Time ({} advance at {}x)",
            terms.advance_amount.normalize(),
            terms.factor_rate.normalize()
        ),
        ..ChartOptions::default()
    };
    fs::write(path, render_balance_svg(schedule, &opts))
        .map_err(|e| format!("Failed to write '{}': {}", path, e))?;
    log::info!("wrote balance chart to {}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn small_schedule() -> PaybackSchedule {
        merchant_cash_advance::compute(&AdvanceTerms {
            advance_amount: dec!(1000),
            factor_rate: dec!(1.0),
            retrieval_rate: dec!(30.0),
            daily_revenue: dec!(100),
            funding_date: None,
        })
        .unwrap()
    }

    #[test]
    fn test_only_zero_line_is_red() {
        colored::control::set_override(true);
        let chart = terminal_chart(&small_schedule(), 40, 8);
        colored::control::unset_override();

        let lines: Vec<&str> = chart.lines().collect();
        // 8 plot rows, zero line, day axis, axis title
        assert_eq!(lines.len(), 11);

        let zero_line = lines[8];
        assert!(zero_line.starts_with("\x1b[31m"));
        assert!(zero_line.contains(" +-"));
        assert!(zero_line.ends_with("\x1b[0m"));

        for (i, line) in lines.iter().enumerate().filter(|(i, _)| *i != 8) {
            assert!(!line.contains('\x1b'), "line {i} is coloured: {line:?}");
        }
    }

    #[test]
    fn test_empty_chart_when_no_rows() {
        assert!(terminal_chart(&small_schedule(), 40, 0).is_empty());
    }
}
