use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;
use std::fs::File;
use std::io::BufWriter;

use mca_core::export::{write_schedule_csv, DEFAULT_EXPORT_FILENAME};
use mca_core::merchant_cash_advance::{self, AdvanceTerms};

use crate::input;

/// Advance terms, from flags or a terms file. Unset flags fall back to the
/// underwriting form defaults.
#[derive(Args, Debug, Clone)]
pub struct TermsArgs {
    /// Advance amount in dollars [default: 50000]
    #[arg(long, alias = "advance")]
    pub advance_amount: Option<Decimal>,

    /// Factor rate multiplier, typically 1.0 to 2.0 [default: 1.2]
    #[arg(long, alias = "factor")]
    pub factor_rate: Option<Decimal>,

    /// Retrieval rate in percent of daily revenue, typically 5 to 30 [default: 10.0]
    #[arg(long, alias = "retrieval")]
    pub retrieval_rate: Option<Decimal>,

    /// Expected daily revenue in dollars [default: 1000]
    #[arg(long, alias = "revenue")]
    pub daily_revenue: Option<Decimal>,

    /// Funding date (YYYY-MM-DD); dates every schedule entry
    #[arg(long)]
    pub funding_date: Option<NaiveDate>,

    /// Path to JSON or YAML terms file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the payback schedule
#[derive(Args)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub terms: TermsArgs,

    /// Also write the schedule as `Day,Remaining Balance` CSV (default: remaining_balance.csv)
    #[arg(long, num_args = 0..=1, default_missing_value = DEFAULT_EXPORT_FILENAME)]
    pub export: Option<String>,
}

/// Arguments for the key metrics
#[derive(Args)]
pub struct MetricsArgs {
    #[command(flatten)]
    pub terms: TermsArgs,
}

/// Resolve terms: `--input` file first, then piped stdin, then flags.
pub fn resolve_terms(args: &TermsArgs) -> Result<AdvanceTerms, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        return input::file::read_terms_file(path);
    }
    if let Some(data) = input::stdin::read_stdin()? {
        return Ok(serde_json::from_value(data)?);
    }
    Ok(terms_from_flags(args))
}

fn terms_from_flags(args: &TermsArgs) -> AdvanceTerms {
    let defaults = AdvanceTerms::default();
    AdvanceTerms {
        advance_amount: args.advance_amount.unwrap_or(defaults.advance_amount),
        factor_rate: args.factor_rate.unwrap_or(defaults.factor_rate),
        retrieval_rate: args.retrieval_rate.unwrap_or(defaults.retrieval_rate),
        daily_revenue: args.daily_revenue.unwrap_or(defaults.daily_revenue),
        funding_date: args.funding_date,
    }
}

/// Write the CSV export to `path`.
pub fn export_schedule(
    terms: &AdvanceTerms,
    path: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let schedule = merchant_cash_advance::compute(terms)?;
    let file = File::create(path).map_err(|e| format!("Failed to create '{}': {}", path, e))?;
    write_schedule_csv(&schedule, BufWriter::new(file))?;
    log::info!("exported {} schedule rows to {}", schedule.len(), path);
    Ok(())
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let terms = resolve_terms(&args.terms)?;
    let result = merchant_cash_advance::build_payback_schedule(&terms)?;
    if let Some(ref path) = args.export {
        export_schedule(&terms, path)?;
    }
    Ok(serde_json::to_value(result)?)
}

pub fn run_metrics(args: MetricsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let terms = resolve_terms(&args.terms)?;
    let result = merchant_cash_advance::calculate_mca_metrics(&terms)?;
    Ok(serde_json::to_value(result)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn no_flags() -> TermsArgs {
        TermsArgs {
            advance_amount: None,
            factor_rate: None,
            retrieval_rate: None,
            daily_revenue: None,
            funding_date: None,
            input: None,
        }
    }

    #[test]
    fn test_flags_default_to_form_values() {
        assert_eq!(terms_from_flags(&no_flags()), AdvanceTerms::default());
    }

    #[test]
    fn test_flags_override_defaults() {
        let args = TermsArgs {
            advance_amount: Some(dec!(1000)),
            factor_rate: Some(dec!(1.0)),
            retrieval_rate: Some(dec!(30.0)),
            daily_revenue: Some(dec!(100)),
            ..no_flags()
        };
        let terms = terms_from_flags(&args);
        assert_eq!(terms.total_payback().unwrap(), dec!(1000));
        assert_eq!(terms.daily_collections().unwrap(), dec!(30));
    }

    #[test]
    fn test_yaml_terms_file() {
        let path = std::env::temp_dir().join("mca_terms_test.yaml");
        std::fs::write(
            &path,
            "advance_amount: '20000'\nfactor_rate: '1.35'\nretrieval_rate: '12'\ndaily_revenue: '1500'\nfunding_date: 2024-03-01\n",
        )
        .unwrap();
        let args = TermsArgs {
            input: Some(path.to_string_lossy().into_owned()),
            ..no_flags()
        };
        let terms = resolve_terms(&args).unwrap();
        assert_eq!(terms.total_payback().unwrap(), dec!(27000));
        assert_eq!(terms.daily_collections().unwrap(), dec!(180));
        assert_eq!(terms.funding_date, NaiveDate::from_ymd_opt(2024, 3, 1));
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_export_writes_file() {
        let path = std::env::temp_dir().join("mca_export_test.csv");
        export_schedule(&AdvanceTerms::default(), path.to_str().unwrap()).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("Day,Remaining Balance"));
        assert_eq!(contents.lines().count(), 602);
        let _ = std::fs::remove_file(path);
    }
}
