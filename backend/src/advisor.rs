//! Sensitivity advisor
//!
//! Proposes programme value adjustments that bring K = V_B / V_C back into
//! the feasibility band. Purely informational: nothing here touches a
//! [`ParameterSet`](crate::ParameterSet).

use crate::equilibrium::FeasibilityBand;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where K sits relative to the band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SuggestionIssue {
    /// K <= K_lower
    KTooLow,
    /// K >= K_upper
    KTooHigh,
    /// K inside the band; no adjustment needed
    MseExists,
    /// The band is empty: no value ratio admits an interior equilibrium
    NoFeasibleBand,
}

/// A programme value that would reach the target K, the other value held fixed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ValueBound {
    MinValueB(f64),
    MaxValueB(f64),
    MinValueC(f64),
    MaxValueC(f64),
}

impl fmt::Display for ValueBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueBound::MinValueB(v) => write!(f, "raise V_B to at least {:.3}", v),
            ValueBound::MaxValueB(v) => write!(f, "lower V_B to at most {:.3}", v),
            ValueBound::MinValueC(v) => write!(f, "raise V_C to at least {:.3}", v),
            ValueBound::MaxValueC(v) => write!(f, "lower V_C to at most {:.3}", v),
        }
    }
}

/// Value adjustment recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub issue: SuggestionIssue,
    pub current_k: f64,
    pub k_lower: f64,
    pub k_upper: f64,
    /// Band target when K is outside, the current K inside, `None` for an
    /// empty band
    pub target_k: Option<f64>,
    /// Concrete value bounds; empty unless built from the current values
    pub bounds: Vec<ValueBound>,
}

impl Suggestion {
    /// A change of V_B or V_C would reach the band
    pub fn adjustment_needed(&self) -> bool {
        matches!(
            self.issue,
            SuggestionIssue::KTooLow | SuggestionIssue::KTooHigh
        )
    }
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.issue {
            SuggestionIssue::KTooLow => write!(
                f,
                "K = {:.3} <= {:.3}: increase V_B or decrease V_C to achieve K > {:.3}",
                self.current_k, self.k_lower, self.k_lower
            )?,
            SuggestionIssue::KTooHigh => write!(
                f,
                "K = {:.3} >= {:.3}: decrease V_B or increase V_C to achieve K < {:.3}",
                self.current_k, self.k_upper, self.k_upper
            )?,
            SuggestionIssue::MseExists => {
                return write!(
                    f,
                    "{:.3} < K = {:.3} < {:.3}: no adjustment needed for MSE",
                    self.k_lower, self.current_k, self.k_upper
                )
            }
            SuggestionIssue::NoFeasibleBand => {
                return write!(
                    f,
                    "K = {:.3}: no value ratio admits an MSE for these seat counts; \
                     adjust the seat split instead",
                    self.current_k
                )
            }
        }
        match self.target_k {
            Some(target) => write!(f, " (target K = {:.3})", target),
            None => Ok(()),
        }
    }
}

/// Suggest an adjustment against the default band (0.75, 4/3)
///
/// # Example
///
/// ```rust
/// use admission_equilibrium_core::advisor::{suggest, SuggestionIssue};
///
/// let suggestion = suggest(2.0);
/// assert_eq!(suggestion.issue, SuggestionIssue::KTooHigh);
/// let target = suggestion.target_k.unwrap();
/// assert!((target - (0.75 + 4.0 / 3.0) / 2.0).abs() < 1e-12);
/// ```
pub fn suggest(k: f64) -> Suggestion {
    suggest_with_band(k, &FeasibilityBand::default())
}

/// Suggest an adjustment against an explicit band
///
/// An empty band yields [`SuggestionIssue::NoFeasibleBand`] with no target.
pub fn suggest_with_band(k: f64, band: &FeasibilityBand) -> Suggestion {
    let issue = if band.is_empty() {
        SuggestionIssue::NoFeasibleBand
    } else if k <= band.lower() {
        SuggestionIssue::KTooLow
    } else if k >= band.upper() {
        SuggestionIssue::KTooHigh
    } else {
        SuggestionIssue::MseExists
    };
    let target_k = match issue {
        SuggestionIssue::MseExists => Some(k),
        SuggestionIssue::KTooLow | SuggestionIssue::KTooHigh => Some(band.target()),
        SuggestionIssue::NoFeasibleBand => None,
    };

    Suggestion {
        issue,
        current_k: k,
        k_lower: band.lower(),
        k_upper: band.upper(),
        target_k,
        bounds: Vec::new(),
    }
}

/// Suggest an adjustment and the values of V_B or V_C that reach the target
///
/// Each bound moves one value while the other stays fixed; applying either
/// gives K = target exactly. Bounds are only offered for V_C > 0, and a
/// bound that would break V_B > V_C is left out.
pub fn suggest_for_values(value_b: f64, value_c: f64, band: &FeasibilityBand) -> Suggestion {
    let mut suggestion = suggest_with_band(value_b / value_c, band);
    let Some(target) = suggestion.target_k else {
        return suggestion;
    };
    if value_c <= 0.0 {
        return suggestion;
    }

    let candidates = match suggestion.issue {
        SuggestionIssue::KTooLow => vec![
            ValueBound::MinValueB(target * value_c),
            ValueBound::MaxValueC(value_b / target),
        ],
        SuggestionIssue::KTooHigh => vec![
            ValueBound::MaxValueB(target * value_c),
            ValueBound::MinValueC(value_b / target),
        ],
        SuggestionIssue::MseExists | SuggestionIssue::NoFeasibleBand => Vec::new(),
    };
    suggestion.bounds = candidates
        .into_iter()
        .filter(|bound| bound.keeps_ordering(value_b, value_c))
        .collect();
    suggestion
}

impl ValueBound {
    /// Applying the bound to (V_B, V_C) still leaves finite V_B > V_C
    fn keeps_ordering(&self, value_b: f64, value_c: f64) -> bool {
        let (b, c) = match *self {
            ValueBound::MinValueB(v) | ValueBound::MaxValueB(v) => (v, value_c),
            ValueBound::MinValueC(v) | ValueBound::MaxValueC(v) => (value_b, v),
        };
        b.is_finite() && c.is_finite() && b > c
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lower_edge_counts_as_too_low() {
        let suggestion = suggest(0.75);
        assert_eq!(suggestion.issue, SuggestionIssue::KTooLow);
        assert!(suggestion.adjustment_needed());
    }

    #[test]
    fn test_inside_band_targets_current_k() {
        let suggestion = suggest(1.2);
        assert_eq!(suggestion.issue, SuggestionIssue::MseExists);
        assert_eq!(suggestion.target_k, Some(1.2));
        assert!(suggestion.to_string().contains("no adjustment needed"));
    }

    #[test]
    fn test_value_bounds_reach_target() {
        let band = FeasibilityBand::default();
        let suggestion = suggest_for_values(2.0, 1.0, &band);

        let target = band.target();
        assert_eq!(suggestion.target_k, Some(target));
        for bound in &suggestion.bounds {
            let k = match *bound {
                ValueBound::MaxValueB(v_b) => v_b / 1.0,
                ValueBound::MinValueC(v_c) => 2.0 / v_c,
                other => panic!("unexpected bound {:?}", other),
            };
            assert!((k - target).abs() < 1e-12);
        }
        assert_eq!(suggestion.bounds.len(), 2);
    }

    #[test]
    fn test_too_low_bounds_raise_b_or_lower_c() {
        let suggestion = suggest_for_values(1.0, 2.0, &FeasibilityBand::default());
        assert_eq!(suggestion.issue, SuggestionIssue::KTooLow);
        assert!(matches!(suggestion.bounds[0], ValueBound::MinValueB(_)));
        assert!(matches!(suggestion.bounds[1], ValueBound::MaxValueC(_)));
    }

    #[test]
    fn test_empty_band_has_no_target_or_bounds() {
        let empty = FeasibilityBand::derive(1_000, 1_000, 200);
        let suggestion = suggest_for_values(2.0, 1.0, &empty);

        assert_eq!(suggestion.issue, SuggestionIssue::NoFeasibleBand);
        assert_eq!(suggestion.target_k, None);
        assert!(suggestion.bounds.is_empty());
        assert!(!suggestion.adjustment_needed());
        assert!(suggestion.to_string().contains("adjust the seat split"));
    }

    #[test]
    fn test_bounds_dropped_when_they_break_value_ordering() {
        // Target K = 1 / 2 sits below 1, so V_B = 0.5 * V_C would undercut V_C
        let band = FeasibilityBand::new(0.25, 0.75).unwrap();
        let suggestion = suggest_for_values(1.0, 0.5, &band);

        assert_eq!(suggestion.issue, SuggestionIssue::KTooHigh);
        assert!(suggestion.bounds.is_empty());
    }
}
