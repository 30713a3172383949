//! Orchestrator - the engine's functional surface
//!
//! Front ends call these functions with a validated [`ParameterSet`] and
//! render whatever comes back. See `analysis.rs` for the analysis flow.
//!
//! [`ParameterSet`]: crate::models::ParameterSet

pub mod analysis;
pub mod fingerprint;

// Re-export main types for convenience
pub use analysis::{
    allocate_deterministic, analyze, run_group_a, run_group_b, run_group_b_with, suggest,
    AnalysisConfig, AnalysisError, AnalysisReport, MseCheck, PreferenceRankings,
};
pub use fingerprint::parameter_fingerprint;
