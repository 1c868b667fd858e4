//! Verification harness for the pgmspace routines.
//!
//! This crate provides:
//! - Fixture verify: run JSON fixture cases against the word-parallel routines
//! - Differential sweep: every alignment and short length, word paths vs the
//!   byte-at-a-time oracle
//! - Fixture capture: record oracle behavior as JSON reference data
//! - Report generation: markdown + JSON summaries
//! - Structured JSONL logging for all of the above

#![forbid(unsafe_code)]

pub mod capture;
pub mod error;
pub mod execute;
pub mod fixtures;
pub mod report;
pub mod runner;
pub mod structured_log;
pub mod sweep;
pub mod verify;

pub use error::HarnessError;
pub use fixtures::{FixtureCase, FixtureSet};
pub use report::ConformanceReport;
pub use runner::TestRunner;
pub use sweep::SweepReport;
pub use verify::VerificationResult;
