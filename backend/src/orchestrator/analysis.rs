//! Analysis entry points
//!
//! Stateless functions over an explicit [`ParameterSet`]. Every call derives
//! group statistics afresh; nothing is cached between calls, so the same
//! parameters always produce bit-identical results and independent
//! parameter sets can be analysed from any number of threads.
//!
//! # Analysis Flow
//!
//! ```text
//! ParameterSet
//!     ↓
//! 1. Group A vs Type-A seats          (allocation::priority)
//!     ↓  residual n_B, S_B, S_C
//! 2. Interior MSE?                    (equilibrium::mse)
//!     ├─ yes → interior result
//!     └─ no  → corner analysis        (equilibrium::corner)
//!                 ↓
//! 3. Value adjustment suggestion      (advisor)
//! ```

use crate::advisor::{self, Suggestion};
use crate::allocation::priority::{self, AdmissionOutcome};
use crate::allocation::waterfall::{self, AllocationError, AllocationTable, GroupDemand, SeatPool};
use crate::equilibrium::band::UNBOUNDED;
use crate::equilibrium::{
    corner, mse, BandMode, EquilibriumKind, EquilibriumResult, FeasibilityBand, GroupBMarket,
};
use crate::models::{Event, EventLog, GroupStatistics, ParameterSet, ProgrammeType};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use super::fingerprint::parameter_fingerprint;

/// Errors producing an analysis report
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Caller-owned analysis options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Feasibility band selection; the fixed (0.75, 4/3) band by default
    pub band: BandMode,
}

/// Outcome of the band check on K
///
/// Holds the resolved edges as plain numbers: a derived band may be empty,
/// which no fixed band configuration accepts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MseCheck {
    pub k: f64,
    pub lower: f64,
    pub upper: f64,
    pub feasible: bool,
}

impl MseCheck {
    pub fn is_unbounded(&self) -> bool {
        self.upper == UNBOUNDED
    }
}

/// Everything one analysis produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub parameters: ParameterSet,
    /// SHA-256 of the canonical parameter JSON
    pub fingerprint: String,
    pub statistics: GroupStatistics,
    pub group_a: AdmissionOutcome,
    pub mse_check: MseCheck,
    pub group_b: EquilibriumResult,
    /// Present only when Group B ends in a corner (or a tie between corners)
    pub suggestion: Option<Suggestion>,
    pub events: EventLog,
}

/// Group A's outcome, with the size breakdown when every applicant is placed
pub fn run_group_a(params: &ParameterSet) -> AdmissionOutcome {
    let stats = params.statistics();
    let mut outcome = priority::allocate(
        params.total_applicants(),
        stats.seats_a,
        stats.group_a_size,
        params.value_a(),
    );
    if outcome.complete {
        outcome.size_mix = priority::size_mix(stats.seats_a, params.value_a(), params.size_profile());
    }
    outcome
}

/// Group B's equilibrium against the default band
///
/// # Example
///
/// ```rust
/// use admission_equilibrium_core::{run_group_b, validate, EquilibriumKind, RawParameters};
///
/// let params = validate(RawParameters::default()).unwrap();
/// assert_eq!(run_group_b(&params).kind, EquilibriumKind::CornerB);
/// ```
pub fn run_group_b(params: &ParameterSet) -> EquilibriumResult {
    run_group_b_with(params, &BandMode::default())
}

/// Group B's equilibrium against the band chosen by `mode`
pub fn run_group_b_with(params: &ParameterSet, mode: &BandMode) -> EquilibriumResult {
    let stats = params.statistics();
    let market = GroupBMarket::from_parameters(params, &stats);
    let band = mode.resolve(market.applicants, market.seats_b, market.seats_c);
    solve_group_b(&market, &band)
}

fn solve_group_b(market: &GroupBMarket, band: &FeasibilityBand) -> EquilibriumResult {
    match mse::solve(market, band) {
        Ok(result) => result,
        Err(infeasible) => {
            debug!(%infeasible, "falling back to corner analysis");
            corner::evaluate(market)
        }
    }
}

/// Suggest a value adjustment for K against the default band
pub fn suggest(k: f64) -> Suggestion {
    advisor::suggest(k)
}

/// Preference rankings for the two groups in the waterfall mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreferenceRankings {
    pub group_a: Vec<ProgrammeType>,
    pub group_b: Vec<ProgrammeType>,
}

impl Default for PreferenceRankings {
    /// Both groups rank by programme value: A, then B, then C
    fn default() -> Self {
        Self {
            group_a: ProgrammeType::ALL.to_vec(),
            group_b: ProgrammeType::ALL.to_vec(),
        }
    }
}

/// Allocate seats by priority waterfall instead of equilibrium analysis
///
/// Group A (n_A applicants) is served before Group B (n_B applicants) from the
/// market's S_A / S_B / S_C pool.
pub fn allocate_deterministic(
    params: &ParameterSet,
    rankings: &PreferenceRankings,
) -> Result<AllocationTable, AllocationError> {
    let stats = params.statistics();
    let groups = [
        GroupDemand {
            label: "A".to_string(),
            demand: stats.group_a_size,
            ranking: rankings.group_a.clone(),
        },
        GroupDemand {
            label: "B".to_string(),
            demand: stats.group_b_size,
            ranking: rankings.group_b.clone(),
        },
    ];
    waterfall::allocate(&groups, SeatPool::from_statistics(&stats))
}

/// Run the full analysis and record every decision in the event log
///
/// # Errors
///
/// [`AnalysisError::Serialization`] if the parameter fingerprint cannot be
/// computed.
pub fn analyze(
    params: &ParameterSet,
    config: &AnalysisConfig,
) -> Result<AnalysisReport, AnalysisError> {
    let mut events = EventLog::new();
    let stats = params.statistics();
    info!(
        applicants = params.total_applicants(),
        seats = params.total_seats(),
        group_a = stats.group_a_size,
        group_b = stats.group_b_size,
        "analysing admission market"
    );

    // Step 1: Group A
    let group_a = run_group_a(params);
    events.log(Event::GroupAAllocated {
        applicants: stats.group_a_size,
        seats: stats.seats_a,
        admission_rate: group_a.admission_rate,
        expected_payoff: group_a.expected_payoff,
        complete: group_a.complete,
    });

    // Step 2: Group B
    let market = GroupBMarket::from_parameters(params, &stats);
    let band = config
        .band
        .resolve(market.applicants, market.seats_b, market.seats_c);
    let k = market.value_ratio();
    let mse_check = MseCheck {
        k,
        lower: band.lower(),
        upper: band.upper(),
        feasible: band.contains(k),
    };

    let group_b = if market.is_degenerate() {
        events.log(Event::DegenerateMarket {
            applicants: market.applicants,
            seats_b: market.seats_b,
            seats_c: market.seats_c,
        });
        EquilibriumResult::degenerate()
    } else {
        events.log(Event::MseChecked {
            k,
            lower: mse_check.lower,
            upper: mse_check.upper,
            feasible: mse_check.feasible,
        });
        let result = solve_group_b(&market, &band);
        log_group_b(&mut events, &result);
        result
    };
    debug!(kind = group_b.kind.label(), k, "group B resolved");

    // Step 3: advice, only when no interior equilibrium was reached
    let suggestion = match group_b.kind {
        EquilibriumKind::CornerB | EquilibriumKind::CornerC | EquilibriumKind::Indifferent => {
            let suggestion = advisor::suggest_for_values(market.value_b, market.value_c, &band);
            events.log(Event::SuggestionIssued {
                current_k: suggestion.current_k,
                target_k: suggestion.target_k,
                adjustment_needed: suggestion.adjustment_needed(),
            });
            Some(suggestion)
        }
        EquilibriumKind::InteriorMse | EquilibriumKind::Degenerate => None,
    };

    Ok(AnalysisReport {
        fingerprint: parameter_fingerprint(params)?,
        parameters: params.clone(),
        statistics: stats,
        group_a,
        mse_check,
        group_b,
        suggestion,
        events,
    })
}

fn log_group_b(events: &mut EventLog, result: &EquilibriumResult) {
    if result.is_interior() {
        if let (Some(clamp), Some(fraction)) = (result.clamp, result.fraction_b) {
            events.log(Event::FractionClamped {
                raw_fraction: clamp.raw_fraction,
                fraction,
                bound: clamp.bound,
            });
        }
        events.log(Event::InteriorEquilibrium {
            fraction: result.fraction_b.unwrap_or(0.0),
            payoff_b: result.payoff_b,
            payoff_c: result.payoff_c,
            indifference_holds: result.indifference_holds,
        });
        return;
    }

    events.log(Event::CornerSelected {
        kind: result.kind,
        admission_rate: result.admission_rate(),
        expected_payoff: result.expected_payoff(),
    });
    if let Some(deviation) = &result.deviation {
        for probe in &deviation.probes {
            events.log(Event::DeviationProbed {
                switchers: probe.switchers,
                admission_b: probe.admission_b,
                admission_c: probe.admission_c,
                rational: probe.rational,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{validate, RawParameters};

    fn params(raw: RawParameters) -> ParameterSet {
        validate(raw).unwrap()
    }

    #[test]
    fn test_interior_report_has_no_suggestion() {
        let report = analyze(
            &params(RawParameters {
                value_b: 1.2,
                value_c: 1.0,
                ..RawParameters::default()
            }),
            &AnalysisConfig::default(),
        )
        .unwrap();

        assert!(report.group_b.is_interior());
        assert!(report.suggestion.is_none());
        assert_eq!(report.events.events_of_type("InteriorEquilibrium").len(), 1);
        assert!(report.events.events_of_type("SuggestionIssued").is_empty());
    }

    #[test]
    fn test_corner_report_logs_probes_and_suggestion() {
        let report = analyze(&params(RawParameters::default()), &AnalysisConfig::default()).unwrap();

        assert_eq!(report.group_b.kind, EquilibriumKind::CornerB);
        assert_eq!(report.events.events_of_type("DeviationProbed").len(), 2);
        let suggestion = report.suggestion.unwrap();
        assert!(suggestion.adjustment_needed());
        assert_eq!(suggestion.bounds.len(), 2);
    }

    #[test]
    fn test_derived_band_mode_uses_market_ratios() {
        // n_B = 7000, S_B = 1800, S_C = 4201: derived band about (0.346, 0.666)
        let raw = RawParameters {
            seat_proportion_a: 0.3333,
            seat_proportion_b: 0.2,
            seat_proportion_c: 0.4667,
            value_b: 1.2,
            value_c: 1.0,
            ..RawParameters::default()
        };
        let p = params(raw);
        let config = AnalysisConfig {
            band: BandMode::Derived,
        };
        let report = analyze(&p, &config).unwrap();

        assert!(!report.mse_check.feasible);
        assert!(report.mse_check.upper < 1.0);
        assert_eq!(run_group_b_with(&p, &config.band), report.group_b);
    }

    #[test]
    fn test_default_waterfall_serves_group_a_first() {
        let table =
            allocate_deterministic(&params(RawParameters::default()), &PreferenceRankings::default())
                .unwrap();

        let group_a = table.group("A").unwrap();
        let group_b = table.group("B").unwrap();
        assert_eq!(group_a.placed, [3_000, 0, 0]);
        assert_eq!(group_b.placed, [0, 3_000, 3_000]);
        assert_eq!(group_b.unplaced, 1_000);
    }

    #[test]
    fn test_empty_derived_band_reports_no_target() {
        // S_B = 9,000 seats for n_B = 7,000 applicants: no K is feasible
        let raw = RawParameters {
            total_seats: 20_000,
            seat_proportion_a: 0.1,
            seat_proportion_b: 0.45,
            seat_proportion_c: 0.45,
            ..RawParameters::default()
        };
        let config = AnalysisConfig {
            band: BandMode::Derived,
        };
        let report = analyze(&params(raw), &config).unwrap();

        assert_eq!(report.mse_check.lower, report.mse_check.upper);
        assert!(!report.mse_check.feasible);
        let suggestion = report.suggestion.unwrap();
        assert_eq!(suggestion.issue, crate::advisor::SuggestionIssue::NoFeasibleBand);
        assert!(suggestion.target_k.is_none());
        assert!(suggestion.bounds.is_empty());
        assert_eq!(report.events.events_of_type("SuggestionIssued").len(), 1);
    }
}
