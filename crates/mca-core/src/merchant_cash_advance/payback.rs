//! Linear payback projection for a merchant cash advance.
//!
//! The merchant remits a fixed share of a fixed daily revenue, so the balance
//! falls by the same amount every day. The projection covers whole
//! collection days only: it ends on day `floor(total / daily)`, so when the
//! division is inexact the last entry still carries the residual that a
//! final partial collection would clear. There is no compounding and no
//! variance.

use chrono::{Days, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::terms::AdvanceTerms;
use crate::error::McaError;
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::McaResult;

/// Upper bound on the projection horizon (100 years of daily collections).
pub const MAX_SCHEDULE_DAYS: u32 = 36_500;

/// Balance outstanding at the end of a collection day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub day: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    pub remaining_balance: Money,
}

/// Day-by-day remaining balance, starting at day 0 with the full payback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaybackSchedule {
    entries: Vec<ScheduleEntry>,
}

impl PaybackSchedule {
    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn balances(&self) -> impl Iterator<Item = Money> + '_ {
        self.entries.iter().map(|e| e.remaining_balance)
    }

    pub fn opening_balance(&self) -> Money {
        self.entries
            .first()
            .map(|e| e.remaining_balance)
            .unwrap_or(Decimal::ZERO)
    }

    pub fn final_balance(&self) -> Money {
        self.entries
            .last()
            .map(|e| e.remaining_balance)
            .unwrap_or(Decimal::ZERO)
    }

    /// First day on which the balance reaches zero.
    pub fn payoff_day(&self) -> Option<u32> {
        self.entries
            .iter()
            .find(|e| e.remaining_balance.is_zero())
            .map(|e| e.day)
    }

    pub fn into_entries(self) -> Vec<ScheduleEntry> {
        self.entries
    }
}

/// Schedule plus the totals it was derived from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaybackScheduleOutput {
    pub total_payback: Money,
    pub daily_collections: Money,
    pub estimated_payback_days: Decimal,
    /// `ceil(estimated_payback_days)`: one past the schedule's last day when a
    /// partial collection remains.
    pub payoff_day: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payoff_date: Option<NaiveDate>,
    pub schedule: Vec<ScheduleEntry>,
}

/// Compute the payback schedule for the given terms.
///
/// Emits one entry per day from day 0 through `floor(total / daily)`, with
/// `remaining_balance(i) = max(total - i * daily, 0)`. The last entry is
/// zero when the division is exact and below one day's collection otherwise.
pub fn compute(terms: &AdvanceTerms) -> McaResult<PaybackSchedule> {
    terms.validate()?;

    let total_payback = terms.total_payback()?;
    let daily_collections = terms.daily_collections()?;
    let estimated_days = payback_days(total_payback, daily_collections)?;
    let last_day = horizon(estimated_days)?;

    log::debug!(
        "payback schedule: total={total_payback} daily={daily_collections} \
         estimated_days={estimated_days} last_day={last_day}"
    );

    let entries = (0..=last_day)
        .map(|day| -> McaResult<ScheduleEntry> {
            let collected = daily_collections * Decimal::from(day);
            let remaining_balance = (total_payback - collected).max(Decimal::ZERO);
            Ok(ScheduleEntry {
                day,
                date: date_for_day(terms.funding_date, day)?,
                remaining_balance,
            })
        })
        .collect::<McaResult<Vec<_>>>()?;

    Ok(PaybackSchedule { entries })
}

/// Compute the schedule wrapped in the standard envelope, with the form's
/// guidance ranges reported as warnings.
pub fn build_payback_schedule(
    terms: &AdvanceTerms,
) -> McaResult<ComputationOutput<PaybackScheduleOutput>> {
    let start = Instant::now();

    let schedule = compute(terms)?;
    let warnings = terms.guidance_warnings();

    let total_payback = terms.total_payback()?;
    let daily_collections = terms.daily_collections()?;
    let estimated_payback_days = payback_days(total_payback, daily_collections)?;
    let payoff = payoff_day(estimated_payback_days)?;

    let output = PaybackScheduleOutput {
        total_payback,
        daily_collections,
        estimated_payback_days: estimated_payback_days.round_dp(2),
        payoff_day: payoff,
        payoff_date: date_for_day(terms.funding_date, payoff)?,
        schedule: schedule.into_entries(),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Linear MCA payback projection (fixed daily retrieval)",
        terms,
        warnings,
        elapsed,
        output,
    ))
}

/// Estimated (fractional) number of collection days to retire the payback.
pub(crate) fn payback_days(
    total_payback: Money,
    daily_collections: Money,
) -> McaResult<Decimal> {
    if daily_collections <= Decimal::ZERO {
        return Err(McaError::invalid(
            "daily_collections",
            "Daily collections must be positive; the payback horizon is otherwise infinite",
        ));
    }
    total_payback
        .checked_div(daily_collections)
        .ok_or_else(|| McaError::invalid("daily_collections", "Payback horizon overflows"))
}

/// Last whole collection day of the projection, bounded by [`MAX_SCHEDULE_DAYS`].
pub(crate) fn horizon(estimated_days: Decimal) -> McaResult<u32> {
    bounded_days(estimated_days.floor(), estimated_days)
}

/// Day on which the balance is fully retired, counting a final partial
/// collection as a day.
pub(crate) fn payoff_day(estimated_days: Decimal) -> McaResult<u32> {
    bounded_days(estimated_days.ceil(), estimated_days)
}

fn bounded_days(days: Decimal, estimated_days: Decimal) -> McaResult<u32> {
    days.to_u32()
        .filter(|d| *d <= MAX_SCHEDULE_DAYS)
        .ok_or_else(|| {
            McaError::invalid(
                "daily_collections",
                format!(
                    "Payback horizon of {} days exceeds the {MAX_SCHEDULE_DAYS} day limit",
                    estimated_days.round_dp(2)
                ),
            )
        })
}

pub(crate) fn date_for_day(
    funding_date: Option<NaiveDate>,
    day: u32,
) -> McaResult<Option<NaiveDate>> {
    match funding_date {
        None => Ok(None),
        Some(d) => d
            .checked_add_days(Days::new(u64::from(day)))
            .map(Some)
            .ok_or_else(|| {
                McaError::invalid("funding_date", "Schedule runs past the last representable date")
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn standard_terms() -> AdvanceTerms {
        AdvanceTerms {
            advance_amount: dec!(50000),
            factor_rate: dec!(1.2),
            retrieval_rate: dec!(10.0),
            daily_revenue: dec!(1000),
            funding_date: None,
        }
    }

    fn small_terms() -> AdvanceTerms {
        AdvanceTerms {
            advance_amount: dec!(1000),
            factor_rate: dec!(1.0),
            retrieval_rate: dec!(30.0),
            daily_revenue: dec!(100),
            funding_date: None,
        }
    }

    fn assert_non_increasing(schedule: &PaybackSchedule) {
        let balances: Vec<Money> = schedule.balances().collect();
        for pair in balances.windows(2) {
            assert!(pair[1] <= pair[0], "balance rose from {} to {}", pair[0], pair[1]);
        }
    }

    // -----------------------------------------------------------------------
    // 1. Exact division: 60,000 retired at 100 per day
    // -----------------------------------------------------------------------
    #[test]
    fn test_standard_schedule() {
        let schedule = compute(&standard_terms()).unwrap();

        assert_eq!(schedule.len(), 601);
        assert_eq!(schedule.entries()[0].remaining_balance, dec!(60000));
        assert_eq!(schedule.entries()[1].remaining_balance, dec!(59900));
        assert_eq!(schedule.entries()[300].remaining_balance, dec!(30000));
        assert_eq!(schedule.entries()[600].remaining_balance, Decimal::ZERO);
        assert_eq!(schedule.payoff_day(), Some(600));
        assert_non_increasing(&schedule);
    }

    // -----------------------------------------------------------------------
    // 2. Inexact division: 1,000 at 30 per day stops at the last whole day
    // -----------------------------------------------------------------------
    #[test]
    fn test_inexact_division_stops_at_last_whole_day() {
        let terms = small_terms();
        assert_eq!(terms.total_payback().unwrap(), dec!(1000));
        assert_eq!(terms.daily_collections().unwrap(), dec!(30));

        let schedule = compute(&terms).unwrap();

        // floor(1000 / 30) = 33 collection days, plus day 0
        assert_eq!(schedule.len(), 34);
        assert_eq!(schedule.entries()[32].remaining_balance, dec!(40));
        assert_eq!(schedule.entries()[33].remaining_balance, dec!(10));
        assert_eq!(schedule.final_balance(), dec!(10));
        assert_eq!(schedule.payoff_day(), None);
        assert_non_increasing(&schedule);
    }

    #[test]
    fn test_daily_reduction_never_exceeds_collections() {
        let terms = small_terms();
        let daily = terms.daily_collections().unwrap();
        let schedule = compute(&terms).unwrap();
        let balances: Vec<Money> = schedule.balances().collect();
        for pair in balances.windows(2) {
            assert!(pair[0] - pair[1] <= daily);
        }
    }

    #[test]
    fn test_length_matches_floor_plus_one_when_exact() {
        let terms = AdvanceTerms {
            advance_amount: dec!(10000),
            factor_rate: dec!(1.5),
            retrieval_rate: dec!(15),
            daily_revenue: dec!(2000),
            funding_date: None,
        };
        // 15,000 / 300 = 50 exactly
        let schedule = compute(&terms).unwrap();
        assert_eq!(schedule.len(), 51);
        assert_eq!(schedule.final_balance(), Decimal::ZERO);
    }

    #[test]
    fn test_compute_is_deterministic() {
        let terms = small_terms();
        let a = compute(&terms).unwrap();
        let b = compute(&terms).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_daily_revenue_is_invalid_input() {
        let mut terms = standard_terms();
        terms.daily_revenue = Decimal::ZERO;
        assert!(matches!(compute(&terms), Err(McaError::InvalidInput { .. })));
    }

    #[test]
    fn test_zero_retrieval_rate_is_invalid_input() {
        let mut terms = standard_terms();
        terms.retrieval_rate = Decimal::ZERO;
        assert!(matches!(compute(&terms), Err(McaError::InvalidInput { .. })));
    }

    #[test]
    fn test_overflowing_advance_is_invalid_input() {
        let terms = AdvanceTerms {
            advance_amount: Decimal::MAX,
            ..standard_terms()
        };
        assert!(matches!(compute(&terms), Err(McaError::InvalidInput { .. })));
        assert!(build_payback_schedule(&terms).is_err());
    }

    #[test]
    fn test_horizon_limit() {
        let terms = AdvanceTerms {
            advance_amount: dec!(10_000_000),
            factor_rate: dec!(1.5),
            retrieval_rate: dec!(1),
            daily_revenue: dec!(1),
            funding_date: None,
        };
        match compute(&terms) {
            Err(McaError::InvalidInput { field, reason }) => {
                assert_eq!(field, "daily_collections");
                assert!(reason.contains("36500"));
            }
            other => panic!("expected horizon error, got {other:?}"),
        }
    }

    #[test]
    fn test_funding_date_dates_every_entry() {
        let mut terms = small_terms();
        terms.funding_date = NaiveDate::from_ymd_opt(2024, 1, 30);
        let schedule = compute(&terms).unwrap();

        assert_eq!(schedule.entries()[0].date, NaiveDate::from_ymd_opt(2024, 1, 30));
        assert_eq!(schedule.entries()[1].date, NaiveDate::from_ymd_opt(2024, 1, 31));
        assert_eq!(schedule.entries()[33].date, NaiveDate::from_ymd_opt(2024, 3, 3));
    }

    #[test]
    fn test_envelope_totals_and_warnings() {
        let result = build_payback_schedule(&standard_terms()).unwrap();
        let out = &result.result;

        assert_eq!(out.total_payback, dec!(60000));
        assert_eq!(out.daily_collections, dec!(100));
        assert_eq!(out.estimated_payback_days, dec!(600));
        assert_eq!(out.payoff_day, 600);
        assert_eq!(out.schedule.len(), 601);
        assert!(result.warnings.is_empty());
        assert_eq!(result.metadata.precision, "rust_decimal_128bit");
    }

    #[test]
    fn test_envelope_rounds_estimated_days() {
        let result = build_payback_schedule(&small_terms()).unwrap();
        assert_eq!(result.result.estimated_payback_days, dec!(33.33));
        assert_eq!(result.result.payoff_day, 34);
        assert_eq!(result.result.schedule.len(), 34);
    }

    #[test]
    fn test_envelope_flags_out_of_range_terms() {
        let mut terms = standard_terms();
        terms.retrieval_rate = dec!(45);
        let result = build_payback_schedule(&terms).unwrap();
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("Retrieval rate"));
    }
}
