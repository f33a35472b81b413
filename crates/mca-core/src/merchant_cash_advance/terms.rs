use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::McaError;
use crate::types::{Money, Multiple, Percent};
use crate::McaResult;

// ---------------------------------------------------------------------------
// Form defaults and guidance ranges
// ---------------------------------------------------------------------------

pub const DEFAULT_ADVANCE_AMOUNT: Money = dec!(50000);
pub const DEFAULT_RETRIEVAL_RATE: Percent = dec!(10.0);
pub const DEFAULT_FACTOR_RATE: Multiple = dec!(1.2);
pub const DEFAULT_DAILY_REVENUE: Money = dec!(1000);

const MIN_ADVANCE_AMOUNT: Money = dec!(1000);
const MIN_RETRIEVAL_RATE: Percent = dec!(5.0);
const MAX_RETRIEVAL_RATE: Percent = dec!(30.0);
const MIN_FACTOR_RATE: Multiple = dec!(1.0);
const MAX_FACTOR_RATE: Multiple = dec!(2.0);
const MIN_DAILY_REVENUE: Money = dec!(100);

const PERCENT_DIVISOR: Decimal = dec!(100);

/// Contract terms of a merchant cash advance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvanceTerms {
    /// Principal extended to the merchant.
    pub advance_amount: Money,
    /// Multiplier on the principal giving the total payback (not an interest rate).
    pub factor_rate: Multiple,
    /// Share of daily revenue collected toward payback, in percent.
    pub retrieval_rate: Percent,
    /// Expected merchant revenue per day.
    pub daily_revenue: Money,
    /// Day zero of the schedule. When set, every entry carries a calendar date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub funding_date: Option<NaiveDate>,
}

impl Default for AdvanceTerms {
    fn default() -> Self {
        Self {
            advance_amount: DEFAULT_ADVANCE_AMOUNT,
            factor_rate: DEFAULT_FACTOR_RATE,
            retrieval_rate: DEFAULT_RETRIEVAL_RATE,
            daily_revenue: DEFAULT_DAILY_REVENUE,
            funding_date: None,
        }
    }
}

impl AdvanceTerms {
    pub fn total_payback(&self) -> McaResult<Money> {
        self.advance_amount
            .checked_mul(self.factor_rate)
            .ok_or_else(|| McaError::invalid("advance_amount", "Total payback overflows"))
    }

    pub fn daily_collections(&self) -> McaResult<Money> {
        self.retrieval_rate
            .checked_div(PERCENT_DIVISOR)
            .and_then(|share| self.daily_revenue.checked_mul(share))
            .ok_or_else(|| McaError::invalid("daily_revenue", "Daily collections overflow"))
    }

    /// Hard checks. Anything rejected here would make the schedule undefined.
    pub fn validate(&self) -> McaResult<()> {
        if self.advance_amount <= Decimal::ZERO {
            return Err(McaError::invalid(
                "advance_amount",
                "Advance amount must be positive",
            ));
        }
        if self.factor_rate < Decimal::ONE {
            return Err(McaError::invalid(
                "factor_rate",
                "Factor rate must be at least 1.0",
            ));
        }
        if self.retrieval_rate <= Decimal::ZERO || self.retrieval_rate > PERCENT_DIVISOR {
            return Err(McaError::invalid(
                "retrieval_rate",
                "Retrieval rate must be in (0, 100] percent",
            ));
        }
        if self.daily_revenue <= Decimal::ZERO {
            return Err(McaError::invalid(
                "daily_revenue",
                "Daily revenue must be positive",
            ));
        }
        if self.daily_collections()? <= Decimal::ZERO {
            return Err(McaError::invalid(
                "daily_collections",
                "Daily collections must be positive; the payback horizon is otherwise infinite",
            ));
        }
        self.total_payback()?;
        Ok(())
    }

    /// Soft checks against the ranges the underwriting form offers.
    /// Out-of-range values still compute; they are only flagged.
    pub fn guidance_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.advance_amount < MIN_ADVANCE_AMOUNT {
            warnings.push(format!(
                "Advance amount {} is below the usual minimum of {MIN_ADVANCE_AMOUNT}",
                self.advance_amount
            ));
        }
        if self.retrieval_rate < MIN_RETRIEVAL_RATE || self.retrieval_rate > MAX_RETRIEVAL_RATE {
            warnings.push(format!(
                "Retrieval rate {}% is outside the usual {MIN_RETRIEVAL_RATE}%-{MAX_RETRIEVAL_RATE}% range",
                self.retrieval_rate
            ));
        }
        if self.factor_rate < MIN_FACTOR_RATE || self.factor_rate > MAX_FACTOR_RATE {
            warnings.push(format!(
                "Factor rate {} is outside the usual {MIN_FACTOR_RATE}-{MAX_FACTOR_RATE} range",
                self.factor_rate
            ));
        }
        if self.daily_revenue < MIN_DAILY_REVENUE {
            warnings.push(format!(
                "Daily revenue {} is below the usual minimum of {MIN_DAILY_REVENUE}",
                self.daily_revenue
            ));
        }

        for w in &warnings {
            log::warn!("{w}");
        }
        warnings
    }
}
