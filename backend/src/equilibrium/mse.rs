//! Interior mixed-strategy equilibrium solver
//!
//! When K = V_B / V_C lies inside the feasibility band, Group B randomises
//! between Type B and Type C. A fraction f applies to Type B, where the
//! indifference condition gives f = K / (1 + K).
//!
//! # Solve Flow
//!
//! ```text
//! K in band? ── no ──> Err(MseInfeasible)      (caller falls back to corners)
//!     │
//!    yes
//!     ↓
//! f = K / (1 + K)
//! P_B(f) > 1 ?  ──> raise f to S_B / n_B       (ClampBound::Lower)
//! P_C(f) > 1 ?  ──> lower f to 1 - S_C / n_B   (ClampBound::Upper)
//!     ↓
//! P_B, P_C capped at 1; E_B = P_B·V_B, E_C = P_C·V_C
//! ```
//!
//! Clamping can break indifference. The result keeps both the clamp record
//! and `indifference_holds` so callers can surface it.

use super::{
    payoffs_indifferent, raw_probability, EquilibriumKind, EquilibriumResult, FeasibilityBand,
    GroupBMarket,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// K lies on or outside the feasibility band
#[derive(Debug, Error, Clone, PartialEq)]
#[error("No interior equilibrium: K = {k:.3} outside ({lower:.3}, {upper:.3})", lower = .band.lower(), upper = .band.upper())]
pub struct MseInfeasible {
    pub k: f64,
    pub band: FeasibilityBand,
}

/// Which capacity constraint moved the fraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClampBound {
    /// Raised to S_B / n_B so that P_B <= 1
    Lower,
    /// Lowered to 1 - S_C / n_B so that P_C <= 1
    Upper,
    /// Raised, then lowered again (S_B + S_C > n_B)
    Both,
}

/// Record of a fraction adjustment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FractionClamp {
    /// Indifference fraction K / (1 + K) before clamping
    pub raw_fraction: f64,
    pub bound: ClampBound,
}

/// Indifference fraction f = K / (1 + K)
pub fn indifference_fraction(k: f64) -> f64 {
    k / (1.0 + k)
}

/// Solve for Group B's interior equilibrium
///
/// # Returns
///
/// - `Ok(result)` with kind [`EquilibriumKind::InteriorMse`] when K is
///   strictly inside `band`
/// - `Ok(EquilibriumResult::degenerate())` for a degenerate market, before
///   any band check
/// - `Err(MseInfeasible)` otherwise
///
/// # Example
///
/// ```rust
/// use admission_equilibrium_core::equilibrium::{mse, FeasibilityBand, GroupBMarket};
///
/// // K = 2.0 is outside (0.75, 4/3)
/// let market = GroupBMarket::new(7_000, 3_000, 3_000, 2.0, 1.0);
/// assert!(mse::solve(&market, &FeasibilityBand::default()).is_err());
/// ```
pub fn solve(
    market: &GroupBMarket,
    band: &FeasibilityBand,
) -> Result<EquilibriumResult, MseInfeasible> {
    if market.is_degenerate() {
        return Ok(EquilibriumResult::degenerate());
    }

    let k = market.value_ratio();
    if !band.contains(k) {
        return Err(MseInfeasible { k, band: *band });
    }

    let n_b = market.applicants as f64;
    let s_b = market.seats_b as f64;
    let s_c = market.seats_c as f64;

    let raw_fraction = indifference_fraction(k);
    let mut fraction = raw_fraction;
    let mut bound = None;

    if raw_probability(s_b, n_b * fraction) > 1.0 {
        fraction = s_b / n_b;
        bound = Some(ClampBound::Lower);
    }
    // Re-evaluated at the possibly raised fraction
    if raw_probability(s_c, n_b * (1.0 - fraction)) > 1.0 {
        fraction = 1.0 - s_c / n_b;
        bound = Some(match bound {
            Some(ClampBound::Lower) => ClampBound::Both,
            _ => ClampBound::Upper,
        });
    }
    let fraction = fraction.clamp(0.0, 1.0);

    let admission_b = capped_probability(s_b, n_b * fraction);
    let admission_c = capped_probability(s_c, n_b * (1.0 - fraction));
    let payoff_b = admission_b * market.value_b;
    let payoff_c = admission_c * market.value_c;

    Ok(EquilibriumResult {
        kind: EquilibriumKind::InteriorMse,
        fraction_b: Some(fraction),
        admission_b,
        admission_c,
        payoff_b,
        payoff_c,
        indifference_holds: payoffs_indifferent(payoff_b, payoff_c),
        clamp: bound.map(|bound| FractionClamp {
            raw_fraction,
            bound,
        }),
        deviation: None,
    })
}

/// Post-clamp probability: capped at 1, zero when nobody picks the type
fn capped_probability(seats: f64, applicants: f64) -> f64 {
    if applicants > 0.0 {
        (seats / applicants).min(1.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_band() -> FeasibilityBand {
        FeasibilityBand::default()
    }

    #[test]
    fn test_unclamped_interior_is_indifferent() {
        let market = GroupBMarket::new(7_000, 3_000, 3_000, 1.2, 1.0);
        let result = solve(&market, &default_band()).unwrap();

        assert_eq!(result.kind, EquilibriumKind::InteriorMse);
        assert!((result.fraction_b.unwrap() - 1.2 / 2.2).abs() < 1e-12);
        assert!(result.clamp.is_none());
        assert!(result.indifference_holds);
    }

    #[test]
    fn test_lower_clamp_when_type_b_oversupplied() {
        // b = 0.6 while K just above 1 puts f near 0.5
        let market = GroupBMarket::new(1_000, 600, 100, 1.0, 0.9999);
        let result = solve(&market, &default_band()).unwrap();

        let clamp = result.clamp.unwrap();
        assert_eq!(clamp.bound, ClampBound::Lower);
        assert!((result.fraction_b.unwrap() - 0.6).abs() < 1e-12);
        assert!((result.admission_b - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_upper_clamp_when_type_c_oversupplied() {
        let market = GroupBMarket::new(1_000, 100, 600, 1.0, 0.9999);
        let result = solve(&market, &default_band()).unwrap();

        assert_eq!(result.clamp.unwrap().bound, ClampBound::Upper);
        assert!((result.fraction_b.unwrap() - 0.4).abs() < 1e-12);
        assert!((result.admission_c - 1.0).abs() < 1e-12);
        assert!(!result.indifference_holds);
    }

    #[test]
    fn test_both_clamps_when_seats_exceed_group() {
        let market = GroupBMarket::new(1_000, 600, 600, 1.0, 0.9999);
        let result = solve(&market, &default_band()).unwrap();

        assert_eq!(result.clamp.unwrap().bound, ClampBound::Both);
        assert!((result.fraction_b.unwrap() - 0.4).abs() < 1e-12);
        assert!(result.admission_b <= 1.0 && result.admission_c <= 1.0);
    }

    #[test]
    fn test_degenerate_short_circuits_before_band() {
        let market = GroupBMarket::new(0, 3_000, 3_000, 5.0, 1.0);
        let result = solve(&market, &default_band()).unwrap();
        assert_eq!(result.kind, EquilibriumKind::Degenerate);
    }

    #[test]
    fn test_band_edges_are_infeasible() {
        let lower = GroupBMarket::new(7_000, 3_000, 3_000, 0.75, 1.0);
        let upper = GroupBMarket::new(7_000, 3_000, 3_000, 4.0, 3.0);

        assert!(solve(&lower, &default_band()).is_err());
        let err = solve(&upper, &default_band()).unwrap_err();
        assert_eq!(err.k, 4.0 / 3.0);
    }
}
