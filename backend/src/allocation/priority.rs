//! Group A priority allocation
//!
//! Group A outranks Group B and only ever competes for Type-A seats, so its
//! outcome is plain arithmetic:
//!
//! ```text
//! n_A <= S_A  →  rate = 1,         payoff = V_A,          complete
//! n_A >  S_A  →  rate = S_A / n_A, payoff = rate · V_A,   partial
//! ```
//!
//! A complete outcome is further broken down by programme size using the
//! market's [`ProgrammeSizeProfile`].

use crate::models::ProgrammeSizeProfile;
use serde::{Deserialize, Serialize};

/// Type-A seats held by programmes of one capacity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeAllocation {
    /// Seats per programme
    pub size: u64,
    /// Number of programmes of this size, floor(S_A · share / size)
    pub programmes: u64,
    /// Share of Type-A seats in programmes of this size
    pub probability: f64,
    pub admission_probability: f64,
    pub expected_payoff: f64,
}

/// Group A's admission outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdmissionOutcome {
    /// Share of Group A admitted to Type A
    pub admission_rate: f64,
    pub expected_payoff: f64,
    /// Every Group A applicant gets a Type-A seat
    pub complete: bool,
    /// Per-size breakdown; empty unless complete
    pub size_mix: Vec<SizeAllocation>,
}

/// Allocate Type-A seats to Group A
///
/// # Arguments
///
/// * `total_applicants` - N, bounds `group_a_size`
/// * `seats_a` - S_A
/// * `group_a_size` - n_A
/// * `value_a` - V_A
///
/// # Example
///
/// ```rust
/// use admission_equilibrium_core::allocation::priority::allocate;
///
/// let outcome = allocate(10_000, 2_000, 3_000, 3.0);
/// assert!(!outcome.complete);
/// assert!((outcome.admission_rate - 2.0 / 3.0).abs() < 1e-12);
/// assert!((outcome.expected_payoff - 2.0).abs() < 1e-12);
/// ```
pub fn allocate(
    total_applicants: u64,
    seats_a: u64,
    group_a_size: u64,
    value_a: f64,
) -> AdmissionOutcome {
    debug_assert!(group_a_size <= total_applicants);

    if group_a_size <= seats_a {
        return AdmissionOutcome {
            admission_rate: 1.0,
            expected_payoff: value_a,
            complete: true,
            size_mix: Vec::new(),
        };
    }

    let admission_rate = seats_a as f64 / group_a_size as f64;
    AdmissionOutcome {
        admission_rate,
        expected_payoff: admission_rate * value_a,
        complete: false,
        size_mix: Vec::new(),
    }
}

/// Break Type-A seats down by programme size
///
/// Sizes whose share cannot fill a single programme are left out.
pub fn size_mix(seats_a: u64, value_a: f64, profile: &ProgrammeSizeProfile) -> Vec<SizeAllocation> {
    profile
        .sizes
        .iter()
        .zip(&profile.distribution)
        .filter_map(|(&size, &share)| {
            let programmes = (seats_a as f64 * share / size as f64).floor() as u64;
            (programmes > 0).then(|| SizeAllocation {
                size,
                programmes,
                probability: share,
                admission_probability: 1.0,
                expected_payoff: value_a,
            })
        })
        .collect()
}
