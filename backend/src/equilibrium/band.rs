//! Feasibility band for the interior equilibrium
//!
//! An interior MSE exists only when K = V_B / V_C lies strictly inside an
//! open interval (K_lower, K_upper). The default band (0.75, 4/3) belongs to
//! the default market (n_B = 7,000 competing for S_B = S_C = 3,000 seats).
//!
//! [`FeasibilityBand::derive`] recovers the band for any market from the two
//! capacity constraints on the indifference fraction f = K / (1 + K):
//!
//! ```text
//! P_B(f) <= 1  <=>  f >= b      <=>  K >= b / (1 - b)     b = S_B / n_B
//! P_C(f) <= 1  <=>  1 - f >= c  <=>  K <= (1 - c) / c     c = S_C / n_B
//! ```
//!
//! With b = c = 3/7 this gives exactly (0.75, 4/3).

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_K_LOWER: f64 = 0.75;
pub const DEFAULT_K_UPPER: f64 = 4.0 / 3.0;

/// Upper edge of a band with no finite upper bound
pub const UNBOUNDED: f64 = f64::MAX;

/// Errors building a fixed band
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BandError {
    #[error("Band edges must be finite and non-negative (got {lower}, {upper})")]
    InvalidEdge { lower: f64, upper: f64 },

    #[error("Band lower edge {lower} must be below upper edge {upper}")]
    Inverted { lower: f64, upper: f64 },
}

/// Open interval of K values admitting an interior equilibrium
///
/// Deserialization goes through [`FeasibilityBand::new`], so a configured
/// band is always non-empty with finite, non-negative edges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BandEdges", into = "BandEdges")]
pub struct FeasibilityBand {
    lower: f64,
    upper: f64,
}

/// Wire form of a band
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct BandEdges {
    lower: f64,
    upper: f64,
}

impl TryFrom<BandEdges> for FeasibilityBand {
    type Error = BandError;

    fn try_from(edges: BandEdges) -> Result<Self, Self::Error> {
        Self::new(edges.lower, edges.upper)
    }
}

impl From<FeasibilityBand> for BandEdges {
    fn from(band: FeasibilityBand) -> Self {
        Self {
            lower: band.lower,
            upper: band.upper,
        }
    }
}

impl Default for FeasibilityBand {
    fn default() -> Self {
        Self {
            lower: DEFAULT_K_LOWER,
            upper: DEFAULT_K_UPPER,
        }
    }
}

impl FeasibilityBand {
    /// Build a fixed band
    ///
    /// # Errors
    ///
    /// Returns [`BandError`] unless 0 <= lower < upper with both edges finite.
    pub fn new(lower: f64, upper: f64) -> Result<Self, BandError> {
        if !lower.is_finite() || !upper.is_finite() || lower < 0.0 {
            return Err(BandError::InvalidEdge { lower, upper });
        }
        if lower >= upper {
            return Err(BandError::Inverted { lower, upper });
        }
        Ok(Self { lower, upper })
    }

    /// Re-derive the band from Group B's seat-to-applicant ratios
    ///
    /// The result may be empty (no K is feasible) when either programme type
    /// alone has at least as many seats as Group B has applicants, and
    /// unbounded above when Type C has no seats.
    pub fn derive(applicants: u64, seats_b: u64, seats_c: u64) -> Self {
        if applicants == 0 {
            return Self {
                lower: 0.0,
                upper: 0.0,
            };
        }
        let n = applicants as f64;
        let b = seats_b as f64 / n;
        let c = seats_c as f64 / n;

        if b >= 1.0 || c >= 1.0 {
            return Self {
                lower: 0.0,
                upper: 0.0,
            };
        }

        let lower = b / (1.0 - b);
        let upper = if c > 0.0 { (1.0 - c) / c } else { UNBOUNDED };
        Self { lower, upper }
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// No K can satisfy the band
    pub fn is_empty(&self) -> bool {
        self.lower >= self.upper
    }

    pub fn is_unbounded(&self) -> bool {
        self.upper == UNBOUNDED
    }

    /// Strict membership: both edges are infeasible
    pub fn contains(&self, k: f64) -> bool {
        self.lower < k && k < self.upper
    }

    /// K the advisor steers towards
    ///
    /// The midpoint of a bounded band; for a band unbounded above, twice the
    /// lower edge (or 1.0 when the lower edge is 0).
    pub fn target(&self) -> f64 {
        if self.is_unbounded() {
            if self.lower > 0.0 {
                2.0 * self.lower
            } else {
                1.0
            }
        } else {
            (self.lower + self.upper) / 2.0
        }
    }
}

/// How the analysis chooses its band
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode")]
pub enum BandMode {
    /// Use the given band regardless of the market
    Fixed { band: FeasibilityBand },
    /// Re-derive the band from each market's seat ratios
    Derived,
}

impl Default for BandMode {
    fn default() -> Self {
        BandMode::Fixed {
            band: FeasibilityBand::default(),
        }
    }
}

impl BandMode {
    /// Resolve the band for a Group B market
    pub fn resolve(&self, applicants: u64, seats_b: u64, seats_c: u64) -> FeasibilityBand {
        match self {
            BandMode::Fixed { band } => *band,
            BandMode::Derived => FeasibilityBand::derive(applicants, seats_b, seats_c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_band_edges_are_open() {
        let band = FeasibilityBand::default();
        assert!(!band.contains(0.75));
        assert!(!band.contains(4.0 / 3.0));
        assert!(band.contains(0.7500001));
        assert!(band.contains(1.3333));
    }

    #[test]
    fn test_derive_reproduces_default_band() {
        let band = FeasibilityBand::derive(7_000, 3_000, 3_000);
        assert!((band.lower() - DEFAULT_K_LOWER).abs() < 1e-12);
        assert!((band.upper() - DEFAULT_K_UPPER).abs() < 1e-12);
    }

    #[test]
    fn test_derive_empty_when_seats_cover_group() {
        let band = FeasibilityBand::derive(1_000, 1_000, 200);
        assert!(band.is_empty());
        assert!(!band.contains(1.0));
    }

    #[test]
    fn test_derive_unbounded_without_type_c_seats() {
        let band = FeasibilityBand::derive(1_000, 500, 0);
        assert!(band.is_unbounded());
        assert_eq!(band.lower(), 1.0);
        assert!(band.contains(1_000.0));
        assert_eq!(band.target(), 2.0);
    }

    #[test]
    fn test_new_rejects_inverted_band() {
        assert_eq!(
            FeasibilityBand::new(2.0, 1.0),
            Err(BandError::Inverted {
                lower: 2.0,
                upper: 1.0
            })
        );
        assert!(FeasibilityBand::new(-0.1, 1.0).is_err());
    }

    #[test]
    fn test_default_target_is_midpoint() {
        let target = FeasibilityBand::default().target();
        assert!((target - (0.75 + 4.0 / 3.0) / 2.0).abs() < 1e-15);
    }

    #[test]
    fn test_deserialize_checks_edges() {
        let inverted = serde_json::from_str::<FeasibilityBand>(r#"{"lower": 2.0, "upper": -1.0}"#);
        assert!(inverted.is_err());

        let mode = serde_json::from_str::<BandMode>(
            r#"{"mode": "Fixed", "band": {"lower": -5.0, "upper": -1.0}}"#,
        );
        assert!(mode.is_err());

        let band: FeasibilityBand =
            serde_json::from_str(r#"{"lower": 1.0, "upper": 3.0}"#).unwrap();
        assert_eq!(band, FeasibilityBand::new(1.0, 3.0).unwrap());
    }
}
