//! Group B Equilibrium Module
//!
//! Group B (the lower-priority group) realistically competes only for Type B
//! and Type C seats. This module decides how it splits between them:
//! - **mse**: interior mixed-strategy equilibrium, when K is inside the band
//! - **corner**: symmetric corner solutions plus a deviation probe otherwise
//! - **band**: the feasibility band deciding between the two
//!
//! # Critical Invariants
//!
//! 1. **Probabilities**: every reported admission probability lies in [0, 1]
//! 2. **Open band**: K on a band edge is infeasible
//! 3. **No division by zero**: a degenerate market (no applicants, or no
//!    Type B/C seats) short-circuits to [`EquilibriumResult::degenerate`]
//!
//! # Example
//!
//! ```rust
//! use admission_equilibrium_core::equilibrium::{self, FeasibilityBand, GroupBMarket};
//!
//! let market = GroupBMarket::new(7_000, 3_000, 3_000, 1.2, 1.0);
//! let result = equilibrium::mse::solve(&market, &FeasibilityBand::default()).unwrap();
//! assert!(result.indifference_holds);
//! ```

pub mod band;
pub mod corner;
pub mod mse;

pub use band::{BandError, BandMode, FeasibilityBand, DEFAULT_K_LOWER, DEFAULT_K_UPPER};
pub use corner::{DeviationAnalysis, DeviationProbe};
pub use mse::{ClampBound, FractionClamp, MseInfeasible};

use crate::models::{GroupStatistics, ParameterSet};
use serde::{Deserialize, Serialize};

/// Expected payoffs closer than this count as equal
pub const INDIFFERENCE_TOLERANCE: f64 = 1e-3;

/// The slice of the market Group B plays in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupBMarket {
    /// n_B
    pub applicants: u64,
    /// S_B
    pub seats_b: u64,
    /// S_C
    pub seats_c: u64,
    /// V_B
    pub value_b: f64,
    /// V_C
    pub value_c: f64,
}

impl GroupBMarket {
    pub fn new(applicants: u64, seats_b: u64, seats_c: u64, value_b: f64, value_c: f64) -> Self {
        Self {
            applicants,
            seats_b,
            seats_c,
            value_b,
            value_c,
        }
    }

    /// Group B's market for a validated parameter set
    pub fn from_parameters(params: &ParameterSet, stats: &GroupStatistics) -> Self {
        Self::new(
            stats.group_b_size,
            stats.seats_b,
            stats.seats_c,
            params.value_b(),
            params.value_c(),
        )
    }

    /// K = V_B / V_C
    pub fn value_ratio(&self) -> f64 {
        self.value_b / self.value_c
    }

    /// No applicants, or nothing to compete for
    pub fn is_degenerate(&self) -> bool {
        self.applicants == 0 || (self.seats_b == 0 && self.seats_c == 0)
    }
}

/// Outcome class of Group B's play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EquilibriumKind {
    /// Interior mixed-strategy equilibrium
    InteriorMse,
    /// Everyone applies to Type B
    CornerB,
    /// Everyone applies to Type C
    CornerC,
    /// Both corners pay exactly the same
    Indifferent,
    /// Nothing to play for (n_B = 0 or S_B = S_C = 0)
    Degenerate,
}

impl EquilibriumKind {
    pub fn label(&self) -> &'static str {
        match self {
            EquilibriumKind::InteriorMse => "interior_mse",
            EquilibriumKind::CornerB => "corner_B",
            EquilibriumKind::CornerC => "corner_C",
            EquilibriumKind::Indifferent => "indifferent",
            EquilibriumKind::Degenerate => "degenerate",
        }
    }
}

/// Group B's equilibrium
///
/// For corner kinds the admission probabilities and payoffs are the
/// symmetric ("everyone picks this type") values for each type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquilibriumResult {
    pub kind: EquilibriumKind,
    /// Fraction choosing Type B; `None` for corner kinds
    pub fraction_b: Option<f64>,
    /// P_B
    pub admission_b: f64,
    /// P_C
    pub admission_c: f64,
    /// E_B
    pub payoff_b: f64,
    /// E_C
    pub payoff_c: f64,
    /// |E_B - E_C| < [`INDIFFERENCE_TOLERANCE`]
    pub indifference_holds: bool,
    /// Set when the interior fraction had to be moved to respect capacity
    pub clamp: Option<FractionClamp>,
    /// Asymmetric deviation check, for corner kinds
    pub deviation: Option<DeviationAnalysis>,
}

impl EquilibriumResult {
    /// Trivial result for a degenerate market: f = 0, nothing admitted, no payoff
    pub fn degenerate() -> Self {
        Self {
            kind: EquilibriumKind::Degenerate,
            fraction_b: Some(0.0),
            admission_b: 0.0,
            admission_c: 0.0,
            payoff_b: 0.0,
            payoff_c: 0.0,
            indifference_holds: true,
            clamp: None,
            deviation: None,
        }
    }

    pub fn is_interior(&self) -> bool {
        self.kind == EquilibriumKind::InteriorMse
    }

    /// Admission rate at the equilibrium
    ///
    /// The chosen type's rate for a corner, Type B's symmetric rate for an
    /// indifferent tie, and the applicant-weighted rate for an interior MSE.
    pub fn admission_rate(&self) -> f64 {
        match self.kind {
            EquilibriumKind::CornerC => self.admission_c,
            EquilibriumKind::CornerB | EquilibriumKind::Indifferent => self.admission_b,
            EquilibriumKind::InteriorMse | EquilibriumKind::Degenerate => {
                let f = self.fraction_b.unwrap_or(0.0);
                f * self.admission_b + (1.0 - f) * self.admission_c
            }
        }
    }

    /// Expected payoff at the equilibrium, weighted the same way as
    /// [`admission_rate`](Self::admission_rate)
    pub fn expected_payoff(&self) -> f64 {
        match self.kind {
            EquilibriumKind::CornerC => self.payoff_c,
            EquilibriumKind::CornerB | EquilibriumKind::Indifferent => self.payoff_b,
            EquilibriumKind::InteriorMse | EquilibriumKind::Degenerate => {
                let f = self.fraction_b.unwrap_or(0.0);
                f * self.payoff_b + (1.0 - f) * self.payoff_c
            }
        }
    }
}

/// seats / applicants, +inf when nobody applies
pub(crate) fn raw_probability(seats: f64, applicants: f64) -> f64 {
    if applicants > 0.0 {
        seats / applicants
    } else {
        f64::INFINITY
    }
}

pub(crate) fn payoffs_indifferent(payoff_b: f64, payoff_c: f64) -> bool {
    (payoff_b - payoff_c).abs() < INDIFFERENCE_TOLERANCE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_detection() {
        assert!(GroupBMarket::new(0, 10, 10, 2.0, 1.0).is_degenerate());
        assert!(GroupBMarket::new(10, 0, 0, 2.0, 1.0).is_degenerate());
        assert!(!GroupBMarket::new(10, 0, 5, 2.0, 1.0).is_degenerate());
    }

    #[test]
    fn test_degenerate_result_is_zero() {
        let result = EquilibriumResult::degenerate();
        assert_eq!(result.fraction_b, Some(0.0));
        assert_eq!(result.expected_payoff(), 0.0);
        assert_eq!(result.admission_rate(), 0.0);
    }

    #[test]
    fn test_raw_probability_infinite_without_applicants() {
        assert_eq!(raw_probability(5.0, 0.0), f64::INFINITY);
        assert_eq!(raw_probability(5.0, 10.0), 0.5);
    }
}
