//! Corner solution evaluator
//!
//! Used when no interior equilibrium exists. Two questions are answered:
//!
//! 1. **Symmetric move**: if all of Group B applies to one type, which type
//!    pays more? That type is the preferred corner.
//! 2. **Asymmetric move**: starting from everyone in Type B, would a few
//!    applicants gain by switching to Type C? Switching x applicants is
//!    individually rational iff
//!
//! ```text
//! P_C(x) > (V_B / V_C) · P_B(x)
//! P_B(x) = min(1, S_B / (n_B - x))      P_C(x) = min(1, S_C / x)
//! ```
//!
//! Only x = 1 and x = floor(n_B / 2) are probed. `hard_to_achieve` is a
//! heuristic: a deviation may still pay somewhere between the probe points.

use super::{payoffs_indifferent, EquilibriumKind, EquilibriumResult, GroupBMarket};
use serde::{Deserialize, Serialize};

/// One evaluated probe point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeviationProbe {
    /// Applicants hypothetically switching to Type C (x)
    pub switchers: u64,
    /// P_B(x)
    pub admission_b: f64,
    /// P_C(x)
    pub admission_c: f64,
    /// P_C(x) > K · P_B(x)
    pub rational: bool,
}

/// Result of the asymmetric-deviation check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviationAnalysis {
    /// K = V_B / V_C, the ratio P_C must beat
    pub threshold_ratio: f64,
    pub probes: Vec<DeviationProbe>,
    /// No probe point made switching rational
    pub hard_to_achieve: bool,
}

impl DeviationAnalysis {
    /// Switching paid off at some probe point
    pub fn switching_rational(&self) -> bool {
        !self.hard_to_achieve
    }
}

/// Evaluate Group B's corner solutions
///
/// The preferred corner is the type with the strictly larger symmetric
/// payoff; an exact tie yields [`EquilibriumKind::Indifferent`].
///
/// # Example
///
/// ```rust
/// use admission_equilibrium_core::equilibrium::{corner, EquilibriumKind, GroupBMarket};
///
/// let market = GroupBMarket::new(7_000, 3_000, 3_000, 2.0, 1.0);
/// let result = corner::evaluate(&market);
/// assert_eq!(result.kind, EquilibriumKind::CornerB);
/// ```
pub fn evaluate(market: &GroupBMarket) -> EquilibriumResult {
    if market.is_degenerate() {
        return EquilibriumResult::degenerate();
    }

    let n_b = market.applicants as f64;
    let admission_b = (market.seats_b as f64 / n_b).min(1.0);
    let admission_c = (market.seats_c as f64 / n_b).min(1.0);
    let payoff_b = admission_b * market.value_b;
    let payoff_c = admission_c * market.value_c;

    let kind = if payoff_b > payoff_c {
        EquilibriumKind::CornerB
    } else if payoff_c > payoff_b {
        EquilibriumKind::CornerC
    } else {
        EquilibriumKind::Indifferent
    };

    EquilibriumResult {
        kind,
        fraction_b: None,
        admission_b,
        admission_c,
        payoff_b,
        payoff_c,
        indifference_holds: payoffs_indifferent(payoff_b, payoff_c),
        clamp: None,
        deviation: Some(probe_deviation(market)),
    }
}

/// Probe x = 1 and x = floor(n_B / 2)
///
/// Points outside 1..n_B are skipped (their denominators vanish), and the two
/// points collapse into one for n_B < 4.
pub fn probe_deviation(market: &GroupBMarket) -> DeviationAnalysis {
    let threshold_ratio = market.value_ratio();
    let n = market.applicants;

    let mut points = vec![1, n / 2];
    points.dedup();

    let probes: Vec<DeviationProbe> = points
        .into_iter()
        .filter(|&x| x >= 1 && x < n)
        .map(|x| {
            let admission_b = (market.seats_b as f64 / (n - x) as f64).min(1.0);
            let admission_c = (market.seats_c as f64 / x as f64).min(1.0);
            DeviationProbe {
                switchers: x,
                admission_b,
                admission_c,
                rational: admission_c > threshold_ratio * admission_b,
            }
        })
        .collect();

    DeviationAnalysis {
        threshold_ratio,
        hard_to_achieve: !probes.iter().any(|probe| probe.rational),
        probes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corner_c_when_type_c_pays_more() {
        // Type B nearly full of competitors: 100 seats for 7,000 applicants
        let market = GroupBMarket::new(7_000, 100, 3_000, 2.0, 1.0);
        let result = evaluate(&market);

        assert_eq!(result.kind, EquilibriumKind::CornerC);
        assert_eq!(result.expected_payoff(), result.payoff_c);
        assert_eq!(result.fraction_b, None);
    }

    #[test]
    fn test_exact_tie_is_indifferent() {
        // P_B = 0.25, P_C = 0.5; E_B = 0.25 * 2 = E_C = 0.5 * 1
        let market = GroupBMarket::new(400, 100, 200, 2.0, 1.0);
        let result = evaluate(&market);

        assert_eq!(result.kind, EquilibriumKind::Indifferent);
        assert_eq!(result.admission_rate(), 0.25);
        assert_eq!(result.expected_payoff(), 0.5);
    }

    #[test]
    fn test_probe_points_deduplicate_for_tiny_groups() {
        let market = GroupBMarket::new(3, 1, 1, 2.0, 1.0);
        let analysis = probe_deviation(&market);
        assert_eq!(analysis.probes.len(), 1);
        assert_eq!(analysis.probes[0].switchers, 1);
    }

    #[test]
    fn test_single_applicant_has_no_probe_points() {
        let market = GroupBMarket::new(1, 1, 1, 2.0, 1.0);
        let analysis = probe_deviation(&market);
        assert!(analysis.probes.is_empty());
        assert!(analysis.hard_to_achieve);
    }

    #[test]
    fn test_switching_unattractive_when_type_c_scarce() {
        // At x = 1: P_B = min(1, 9000/9999) ≈ 0.9, P_C = min(1, 1/1) = 1 < 2 * 0.9
        let market = GroupBMarket::new(10_000, 9_000, 1, 2.0, 1.0);
        let analysis = probe_deviation(&market);
        assert!(analysis.hard_to_achieve);
        assert_eq!(analysis.probes.len(), 2);
    }
}
