//! Quality module - per-rep form checks and scoring
//!
//! Re-exports only. All logic in submodules.

mod checks;
mod report;
mod analyzer;

pub use checks::{run_checks, FormCheck, Finding, RepContext};
pub use report::{QualityReport, PERFECT_SCORE};
pub use analyzer::FormQualityAnalyzer;
