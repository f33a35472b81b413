pub mod advance;
pub mod cash_flow;
pub mod chart;
pub mod dashboard;
