//! Seat Allocation Module
//!
//! - **priority**: Group A against Type-A seats (first stage of the analysis)
//! - **waterfall**: deterministic priority waterfall, an independent
//!   alternative to the equilibrium analysis
//!
//! # Example
//!
//! ```rust
//! use admission_equilibrium_core::allocation::priority;
//!
//! let outcome = priority::allocate(10_000, 3_000, 3_000, 3.0);
//! assert!(outcome.complete);
//! assert_eq!(outcome.expected_payoff, 3.0);
//! ```

pub mod priority;
pub mod waterfall;

// Re-export public API
pub use priority::{AdmissionOutcome, SizeAllocation};
pub use waterfall::{
    AllocationError, AllocationTable, GroupAllocation, GroupDemand, SeatPool,
};
