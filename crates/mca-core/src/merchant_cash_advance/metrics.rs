use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::payback::{date_for_day, payback_days, payoff_day};
use super::terms::AdvanceTerms;
use crate::types::{with_metadata, ComputationOutput, Money, Multiple, Percent};
use crate::McaResult;

/// Headline figures of an advance, as shown above the schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McaMetrics {
    pub advance_amount: Money,
    pub factor_rate: Multiple,
    pub retrieval_rate: Percent,
    pub total_payback: Money,
    pub daily_collections: Money,
    /// Fractional days, rounded to 2 dp.
    pub estimated_payback_days: Decimal,
    /// Day the balance reaches zero, counting a final partial collection.
    pub payoff_day: u32,
    /// Total payback less the advance.
    pub financing_cost: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_payoff_date: Option<NaiveDate>,
}

pub fn calculate_mca_metrics(terms: &AdvanceTerms) -> McaResult<ComputationOutput<McaMetrics>> {
    let start = Instant::now();
    terms.validate()?;
    let warnings = terms.guidance_warnings();

    let total_payback = terms.total_payback()?;
    let daily_collections = terms.daily_collections()?;
    let estimated = payback_days(total_payback, daily_collections)?;
    let payoff = payoff_day(estimated)?;

    let output = McaMetrics {
        advance_amount: terms.advance_amount,
        factor_rate: terms.factor_rate,
        retrieval_rate: terms.retrieval_rate,
        total_payback,
        daily_collections,
        estimated_payback_days: estimated.round_dp(2),
        payoff_day: payoff,
        financing_cost: total_payback - terms.advance_amount,
        estimated_payoff_date: date_for_day(terms.funding_date, payoff)?,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "MCA key metrics (factor-rate payback, fixed daily retrieval)",
        terms,
        warnings,
        elapsed,
        output,
    ))
}
