//! Admission Equilibrium Core - Rust Engine
//!
//! Equilibrium analysis for a two-group, three-programme admission market.
//! A higher-priority Group A and a lower-priority Group B compete for seats
//! in Type A, B and C programmes (V_A > V_B > V_C).
//!
//! # Architecture
//!
//! - **models**: Parameters, derived statistics, analysis event log
//! - **allocation**: Group A priority allocation and the waterfall mode
//! - **equilibrium**: Group B interior MSE, corner solutions, feasibility band
//! - **advisor**: Value adjustment suggestions
//! - **orchestrator**: The functional surface front ends call
//!
//! # Critical Invariants
//!
//! 1. Every operation is a pure function of its inputs
//! 2. Admission probabilities are always within [0, 1]
//! 3. The MSE band is open: K on an edge is infeasible
//!
//! # Example
//!
//! ```rust
//! use admission_equilibrium_core::{analyze, validate, AnalysisConfig, RawParameters};
//!
//! let params = validate(RawParameters {
//!     value_b: 1.2,
//!     value_c: 1.0,
//!     ..RawParameters::default()
//! })
//! .unwrap();
//!
//! let report = analyze(&params, &AnalysisConfig::default()).unwrap();
//! assert!(report.group_b.is_interior());
//! assert!(report.group_b.indifference_holds);
//! ```

// Module declarations
pub mod advisor;
pub mod allocation;
pub mod equilibrium;
pub mod models;
pub mod orchestrator;

// Re-exports for convenience
pub use advisor::{Suggestion, SuggestionIssue, ValueBound};
pub use allocation::{AdmissionOutcome, AllocationError, AllocationTable};
pub use equilibrium::{
    BandMode, EquilibriumKind, EquilibriumResult, FeasibilityBand, GroupBMarket, MseInfeasible,
};
pub use models::{
    event::{Event, EventLog},
    parameters::{
        validate, GroupStatistics, ParameterSet, ProgrammeType, RawParameters, ValidationError,
    },
};
pub use orchestrator::{
    allocate_deterministic, analyze, run_group_a, run_group_b, run_group_b_with, suggest,
    AnalysisConfig, AnalysisError, AnalysisReport, PreferenceRankings,
};

// FFI module (when feature enabled)
#[cfg(feature = "pyo3")]
pub mod ffi;

// PyO3 exports (when feature enabled)
#[cfg(feature = "pyo3")]
use pyo3::prelude::*;

#[cfg(feature = "pyo3")]
#[pymodule]
fn admission_equilibrium_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(ffi::analyze, m)?)?;
    m.add_function(wrap_pyfunction!(ffi::suggest, m)?)?;
    Ok(())
}
