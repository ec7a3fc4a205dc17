//! billbox-analysis: reference fee analyzer
//!
//! A local, deterministic stand-in for the remote reasoning backend: scans
//! extracted bill text for fee phrases by category, pairs each with the
//! nearest dollar amount, and flags fees that look disputable against a
//! table of known provider add-on charges and questionable keywords. The
//! bill category is detected from the text when the caller does not fix one.

pub mod detect;
pub mod patterns;
pub mod scanner;

pub use detect::detect_bill_type;
pub use scanner::PatternAnalyzer;
