pub mod cash_flow;
pub mod chart;
pub mod error;
pub mod export;
pub mod merchant_cash_advance;
pub mod types;

pub use error::McaError;
pub use types::*;

/// Standard result type for all MCA operations
pub type McaResult<T> = Result<T, McaError>;
