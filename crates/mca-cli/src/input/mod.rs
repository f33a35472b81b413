pub mod cash_flow;
pub mod file;
pub mod stdin;
