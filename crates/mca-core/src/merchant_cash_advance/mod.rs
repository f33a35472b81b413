//! Merchant cash advance terms, payback projection and headline metrics.

pub mod metrics;
pub mod payback;
pub mod terms;

pub use metrics::{calculate_mca_metrics, McaMetrics};
pub use payback::{
    build_payback_schedule, compute, PaybackSchedule, PaybackScheduleOutput, ScheduleEntry,
};
pub use terms::AdvanceTerms;
