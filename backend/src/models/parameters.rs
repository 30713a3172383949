//! Market parameters and derived group statistics
//!
//! A market is described by a [`RawParameters`] record (applicants, seats,
//! group split, programme values, seat split). Presentation layers build or
//! deserialize that record and hand it to [`validate`], which is the only way
//! to obtain a [`ParameterSet`].
//!
//! # Critical Invariants
//!
//! 1. **Value ordering**: V_A > V_B > V_C for every validated set
//! 2. **Seat split**: s_A + s_B + s_C = 1 within [`SEAT_PROPORTION_TOLERANCE`]
//! 3. **Conservation**: n_A + n_B = N and S_A + S_B + S_C = S exactly
//!
//! Derived quantities ([`GroupStatistics`]) are recomputed from the parameter
//! set on every call and never stored alongside it.
//!
//! # Example
//!
//! ```rust
//! use admission_equilibrium_core::{validate, RawParameters};
//!
//! let params = validate(RawParameters::default()).unwrap();
//! let stats = params.statistics();
//! assert_eq!(stats.group_a_size, 3_000);
//! assert_eq!(stats.group_b_size, 7_000);
//! assert_eq!(stats.seats_a + stats.seats_b + stats.seats_c, 9_000);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Allowed deviation of the seat proportions' sum from 1.0
pub const SEAT_PROPORTION_TOLERANCE: f64 = 0.01;

/// Errors raised while validating raw market parameters
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Total applicants must be positive")]
    NonPositiveApplicants,

    #[error("Total seats must be positive")]
    NonPositiveSeats,

    #[error("Group A proportion must lie strictly between 0 and 1, got {0}")]
    GroupProportion(f64),

    #[error("Programme value {field} must be finite, got {value}")]
    NonFiniteValue { field: &'static str, value: f64 },

    #[error("Programme values must satisfy: V_A > V_B > V_C (got {value_a}, {value_b}, {value_c})")]
    ValueOrdering {
        value_a: f64,
        value_b: f64,
        value_c: f64,
    },

    #[error("Seat proportion for {programme} must lie in [0, 1], got {value}")]
    SeatProportionRange { programme: ProgrammeType, value: f64 },

    #[error("Seat proportions must sum to 1 (got {sum:.4})")]
    SeatProportion { sum: f64 },

    #[error("Invalid programme size profile: {0}")]
    SizeProfile(String),
}

/// The three ranked programme types, highest value first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProgrammeType {
    A,
    B,
    C,
}

impl ProgrammeType {
    /// All types in rank order
    pub const ALL: [ProgrammeType; 3] = [ProgrammeType::A, ProgrammeType::B, ProgrammeType::C];

    /// Stable position used by per-type tables
    pub fn index(self) -> usize {
        match self {
            ProgrammeType::A => 0,
            ProgrammeType::B => 1,
            ProgrammeType::C => 2,
        }
    }
}

impl fmt::Display for ProgrammeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgrammeType::A => write!(f, "Type A"),
            ProgrammeType::B => write!(f, "Type B"),
            ProgrammeType::C => write!(f, "Type C"),
        }
    }
}

/// Capacities of Type-A programmes and the share of Type-A seats each holds
///
/// Used only to break a complete Group A outcome down by programme size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgrammeSizeProfile {
    /// Programme capacities (seats per programme)
    pub sizes: Vec<u64>,
    /// Share of Type-A seats held by programmes of the matching capacity
    pub distribution: Vec<f64>,
}

impl Default for ProgrammeSizeProfile {
    fn default() -> Self {
        Self {
            sizes: vec![20, 50, 100],
            distribution: vec![0.4, 0.4, 0.2],
        }
    }
}

impl ProgrammeSizeProfile {
    fn check(&self) -> Result<(), ValidationError> {
        if self.sizes.len() != self.distribution.len() {
            return Err(ValidationError::SizeProfile(format!(
                "{} sizes but {} distribution entries",
                self.sizes.len(),
                self.distribution.len()
            )));
        }
        if self.sizes.iter().any(|&size| size == 0) {
            return Err(ValidationError::SizeProfile(
                "programme sizes must be positive".to_string(),
            ));
        }
        if let Some(share) = self
            .distribution
            .iter()
            .find(|share| !(0.0..=1.0).contains(*share))
        {
            return Err(ValidationError::SizeProfile(format!(
                "share {} outside [0, 1]",
                share
            )));
        }
        Ok(())
    }
}

/// Unvalidated market description, as collected by a front end
///
/// Missing fields deserialize to the default market (10,000 applicants,
/// 9,000 seats, a 30% Group A, values 3/2/1 and an even seat split).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawParameters {
    /// Total number of applicants (N)
    pub total_applicants: u64,
    /// Total number of seats (S)
    pub total_seats: u64,
    /// Share of applicants in the higher-priority Group A (p_A)
    pub group_a_proportion: f64,
    pub value_a: f64,
    pub value_b: f64,
    pub value_c: f64,
    pub seat_proportion_a: f64,
    pub seat_proportion_b: f64,
    pub seat_proportion_c: f64,
    pub size_profile: ProgrammeSizeProfile,
}

impl Default for RawParameters {
    fn default() -> Self {
        Self {
            total_applicants: 10_000,
            total_seats: 9_000,
            group_a_proportion: 0.3,
            value_a: 3.0,
            value_b: 2.0,
            value_c: 1.0,
            seat_proportion_a: 1.0 / 3.0,
            seat_proportion_b: 1.0 / 3.0,
            seat_proportion_c: 1.0 / 3.0,
            size_profile: ProgrammeSizeProfile::default(),
        }
    }
}

/// A validated market description
///
/// Only [`validate`] (or deserialization, which runs the same checks) can
/// produce one, so every `ParameterSet` satisfies the module invariants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawParameters", into = "RawParameters")]
pub struct ParameterSet {
    raw: RawParameters,
}

impl TryFrom<RawParameters> for ParameterSet {
    type Error = ValidationError;

    fn try_from(raw: RawParameters) -> Result<Self, Self::Error> {
        validate(raw)
    }
}

impl From<ParameterSet> for RawParameters {
    fn from(params: ParameterSet) -> Self {
        params.raw
    }
}

/// Validate a raw parameter record
///
/// Checks run in a fixed order and the first failure is returned verbatim.
///
/// # Errors
///
/// - [`ValidationError::ValueOrdering`] unless V_A > V_B > V_C
/// - [`ValidationError::SeatProportion`] if the seat split is off by more
///   than [`SEAT_PROPORTION_TOLERANCE`]
/// - the remaining variants for non-positive counts, out-of-range
///   proportions, non-finite values or a malformed size profile
pub fn validate(raw: RawParameters) -> Result<ParameterSet, ValidationError> {
    if raw.total_applicants == 0 {
        return Err(ValidationError::NonPositiveApplicants);
    }
    if raw.total_seats == 0 {
        return Err(ValidationError::NonPositiveSeats);
    }
    let p_a = raw.group_a_proportion;
    if !(p_a > 0.0 && p_a < 1.0) {
        return Err(ValidationError::GroupProportion(p_a));
    }

    for (field, value) in [
        ("V_A", raw.value_a),
        ("V_B", raw.value_b),
        ("V_C", raw.value_c),
    ] {
        if !value.is_finite() {
            return Err(ValidationError::NonFiniteValue { field, value });
        }
    }
    if !(raw.value_a > raw.value_b && raw.value_b > raw.value_c) {
        return Err(ValidationError::ValueOrdering {
            value_a: raw.value_a,
            value_b: raw.value_b,
            value_c: raw.value_c,
        });
    }

    let proportions = [
        (ProgrammeType::A, raw.seat_proportion_a),
        (ProgrammeType::B, raw.seat_proportion_b),
        (ProgrammeType::C, raw.seat_proportion_c),
    ];
    for (programme, value) in proportions {
        if !(0.0..=1.0).contains(&value) {
            return Err(ValidationError::SeatProportionRange { programme, value });
        }
    }
    let sum = raw.seat_proportion_a + raw.seat_proportion_b + raw.seat_proportion_c;
    if (sum - 1.0).abs() > SEAT_PROPORTION_TOLERANCE {
        return Err(ValidationError::SeatProportion { sum });
    }

    raw.size_profile.check()?;

    Ok(ParameterSet { raw })
}

impl ParameterSet {
    pub fn total_applicants(&self) -> u64 {
        self.raw.total_applicants
    }

    pub fn total_seats(&self) -> u64 {
        self.raw.total_seats
    }

    pub fn group_a_proportion(&self) -> f64 {
        self.raw.group_a_proportion
    }

    pub fn value_a(&self) -> f64 {
        self.raw.value_a
    }

    pub fn value_b(&self) -> f64 {
        self.raw.value_b
    }

    pub fn value_c(&self) -> f64 {
        self.raw.value_c
    }

    /// Value of the given programme type
    pub fn value(&self, programme: ProgrammeType) -> f64 {
        match programme {
            ProgrammeType::A => self.raw.value_a,
            ProgrammeType::B => self.raw.value_b,
            ProgrammeType::C => self.raw.value_c,
        }
    }

    /// Seat proportion of the given programme type
    pub fn seat_proportion(&self, programme: ProgrammeType) -> f64 {
        match programme {
            ProgrammeType::A => self.raw.seat_proportion_a,
            ProgrammeType::B => self.raw.seat_proportion_b,
            ProgrammeType::C => self.raw.seat_proportion_c,
        }
    }

    /// K = V_B / V_C
    pub fn value_ratio(&self) -> f64 {
        self.raw.value_b / self.raw.value_c
    }

    pub fn size_profile(&self) -> &ProgrammeSizeProfile {
        &self.raw.size_profile
    }

    /// Copy of the underlying record, e.g. for a front end to edit and revalidate
    pub fn to_raw(&self) -> RawParameters {
        self.raw.clone()
    }

    /// Derive group sizes and per-type seat counts
    ///
    /// Floors follow n_A = floor(N·p_A) and S_X = floor(S·s_X) for A and B;
    /// Type C takes the remainder so the seat total is exact.
    pub fn statistics(&self) -> GroupStatistics {
        let n = self.raw.total_applicants;
        let s = self.raw.total_seats;

        let group_a_size = floor_share(n, self.raw.group_a_proportion);
        let seats_a = floor_share(s, self.raw.seat_proportion_a);
        // Inside the tolerance s_A + s_B may exceed 1; never let S_C go negative
        let seats_b = floor_share(s, self.raw.seat_proportion_b).min(s - seats_a);

        GroupStatistics {
            group_a_size,
            group_b_size: n - group_a_size,
            seats_a,
            seats_b,
            seats_c: s - seats_a - seats_b,
        }
    }
}

fn floor_share(total: u64, proportion: f64) -> u64 {
    ((total as f64 * proportion).floor() as u64).min(total)
}

/// Group sizes and seat counts derived from a [`ParameterSet`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupStatistics {
    /// n_A
    pub group_a_size: u64,
    /// n_B
    pub group_b_size: u64,
    /// S_A
    pub seats_a: u64,
    /// S_B
    pub seats_b: u64,
    /// S_C
    pub seats_c: u64,
}

impl GroupStatistics {
    /// Seat count of the given programme type
    pub fn seats(&self, programme: ProgrammeType) -> u64 {
        match programme {
            ProgrammeType::A => self.seats_a,
            ProgrammeType::B => self.seats_b,
            ProgrammeType::C => self.seats_c,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_market_statistics() {
        let params = validate(RawParameters::default()).unwrap();
        let stats = params.statistics();

        assert_eq!(stats.group_a_size, 3_000);
        assert_eq!(stats.group_b_size, 7_000);
        assert_eq!(stats.seats_a, 3_000);
        assert_eq!(stats.seats_b, 3_000);
        assert_eq!(stats.seats_c, 3_000);
    }

    #[test]
    fn test_seat_overshoot_inside_tolerance_keeps_type_c_non_negative() {
        let raw = RawParameters {
            total_seats: 1_000,
            seat_proportion_a: 0.5,
            seat_proportion_b: 0.505,
            seat_proportion_c: 0.0,
            ..RawParameters::default()
        };
        let stats = validate(raw).unwrap().statistics();

        assert_eq!(stats.seats_a, 500);
        assert_eq!(stats.seats_b, 500);
        assert_eq!(stats.seats_c, 0);
    }

    #[test]
    fn test_deserialize_runs_validation() {
        let json = r#"{"value_a": 1.0, "value_b": 2.0, "value_c": 0.5}"#;
        let result: Result<ParameterSet, _> = serde_json::from_str(json);
        assert!(result.is_err());

        let json = r#"{"value_b": 1.2, "value_c": 1.0}"#;
        let params: ParameterSet = serde_json::from_str(json).unwrap();
        assert_eq!(params.value_b(), 1.2);
        assert_eq!(params.total_applicants(), 10_000);
    }

    #[test]
    fn test_size_profile_length_mismatch_rejected() {
        let raw = RawParameters {
            size_profile: ProgrammeSizeProfile {
                sizes: vec![20, 50],
                distribution: vec![1.0],
            },
            ..RawParameters::default()
        };
        assert!(matches!(validate(raw), Err(ValidationError::SizeProfile(_))));
    }
}
