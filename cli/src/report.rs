//! Plain-text rendering of analysis reports and allocation tables

use admission_equilibrium_core::orchestrator::MseCheck;
use admission_equilibrium_core::{AllocationTable, AnalysisReport, ProgrammeType};
use std::fmt;

/// Sectioned text view of an analysis report
pub struct AnalysisText<'a>(pub &'a AnalysisReport);

impl fmt::Display for AnalysisText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        write_market(f, report)?;
        write_group_a(f, report)?;
        write_group_b(f, report)?;

        if let Some(suggestion) = &report.suggestion {
            writeln!(f, "\n=== Advice ===")?;
            writeln!(f, "{}", suggestion)?;
            for bound in &suggestion.bounds {
                writeln!(f, "  - {}", bound)?;
            }
        }

        writeln!(f, "\nFingerprint: {}", report.fingerprint)
    }
}

fn write_market(f: &mut fmt::Formatter<'_>, report: &AnalysisReport) -> fmt::Result {
    let stats = &report.statistics;
    let params = &report.parameters;

    writeln!(f, "=== Market ===")?;
    writeln!(
        f,
        "Applicants: {} (Group A {}, Group B {})",
        params.total_applicants(),
        stats.group_a_size,
        stats.group_b_size
    )?;
    writeln!(
        f,
        "Seats:      {} (A {}, B {}, C {})",
        params.total_seats(),
        stats.seats_a,
        stats.seats_b,
        stats.seats_c
    )?;
    writeln!(
        f,
        "Values:     V_A = {:.3}, V_B = {:.3}, V_C = {:.3}",
        params.value_a(),
        params.value_b(),
        params.value_c()
    )
}

fn write_group_a(f: &mut fmt::Formatter<'_>, report: &AnalysisReport) -> fmt::Result {
    let group_a = &report.group_a;
    writeln!(f, "\n=== Group A ===")?;
    writeln!(
        f,
        "Admission rate: {:.4}  Expected payoff: {:.4}{}",
        group_a.admission_rate,
        group_a.expected_payoff,
        if group_a.complete { "  (complete)" } else { "" }
    )?;
    for entry in &group_a.size_mix {
        writeln!(
            f,
            "  size {:>4}: {:>5} programmes, share {:.2}",
            entry.size, entry.programmes, entry.probability
        )?;
    }
    Ok(())
}

fn write_band_check(f: &mut fmt::Formatter<'_>, check: &MseCheck) -> fmt::Result {
    write!(f, "K = {:.4}, ", check.k)?;
    if check.lower >= check.upper {
        write!(f, "band empty")?;
    } else if check.is_unbounded() {
        write!(f, "band ({:.4}, inf)", check.lower)?;
    } else {
        write!(f, "band ({:.4}, {:.4})", check.lower, check.upper)?;
    }
    writeln!(f, "  MSE feasible: {}", check.feasible)
}

fn write_group_b(f: &mut fmt::Formatter<'_>, report: &AnalysisReport) -> fmt::Result {
    let group_b = &report.group_b;
    writeln!(f, "\n=== Group B ===")?;
    write_band_check(f, &report.mse_check)?;
    writeln!(f, "Equilibrium: {}", group_b.kind.label())?;
    if let Some(fraction) = group_b.fraction_b {
        writeln!(f, "Fraction choosing B: {:.4}", fraction)?;
    }
    writeln!(
        f,
        "P_B = {:.4}  P_C = {:.4}  E_B = {:.4}  E_C = {:.4}",
        group_b.admission_b, group_b.admission_c, group_b.payoff_b, group_b.payoff_c
    )?;
    if let Some(clamp) = &group_b.clamp {
        writeln!(
            f,
            "Fraction clamped ({:?}) from {:.4}; indifference holds: {}",
            clamp.bound, clamp.raw_fraction, group_b.indifference_holds
        )?;
    }
    if let Some(deviation) = &group_b.deviation {
        for probe in &deviation.probes {
            writeln!(
                f,
                "  deviation x = {:>6}: P_B = {:.4}, P_C = {:.4}, rational: {}",
                probe.switchers, probe.admission_b, probe.admission_c, probe.rational
            )?;
        }
        if deviation.hard_to_achieve {
            writeln!(f, "  Asymmetric deviation is hard to achieve")?;
        }
    }
    Ok(())
}

/// Table view of a waterfall allocation
pub struct AllocationText<'a>(pub &'a AllocationTable);

impl fmt::Display for AllocationText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let table = self.0;
        writeln!(
            f,
            "{:<8} {:>8} {:>8} {:>8} {:>10}",
            "Group", "Type A", "Type B", "Type C", "Unplaced"
        )?;
        for group in &table.groups {
            writeln!(
                f,
                "{:<8} {:>8} {:>8} {:>8} {:>10}",
                group.label,
                group.seats(ProgrammeType::A),
                group.seats(ProgrammeType::B),
                group.seats(ProgrammeType::C),
                group.unplaced
            )?;
        }
        let remaining = &table.remaining;
        writeln!(
            f,
            "{:<8} {:>8} {:>8} {:>8}",
            "Empty",
            remaining.seats(ProgrammeType::A),
            remaining.seats(ProgrammeType::B),
            remaining.seats(ProgrammeType::C)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use admission_equilibrium_core::{
        allocate_deterministic, analyze, validate, AnalysisConfig, BandMode, PreferenceRankings,
        RawParameters,
    };

    #[test]
    fn test_corner_report_includes_advice() {
        let params = validate(RawParameters::default()).unwrap();
        let report = analyze(&params, &AnalysisConfig::default()).unwrap();
        let text = AnalysisText(&report).to_string();

        assert!(text.contains("Equilibrium: corner_B"));
        assert!(text.contains("=== Advice ==="));
        assert!(text.contains("deviation x ="));
        assert!(text.ends_with(&format!("Fingerprint: {}\n", report.fingerprint)));
    }

    #[test]
    fn test_interior_report_has_fraction_and_no_advice() {
        let params = validate(RawParameters {
            value_b: 1.2,
            value_c: 1.0,
            ..RawParameters::default()
        })
        .unwrap();
        let report = analyze(&params, &AnalysisConfig::default()).unwrap();
        let text = AnalysisText(&report).to_string();

        assert!(text.contains("Equilibrium: interior_mse"));
        assert!(text.contains("Fraction choosing B: 0.5455"));
        assert!(!text.contains("Advice"));
    }

    #[test]
    fn test_empty_band_report_explains_missing_target() {
        let params = validate(RawParameters {
            total_seats: 20_000,
            seat_proportion_a: 0.1,
            seat_proportion_b: 0.45,
            seat_proportion_c: 0.45,
            ..RawParameters::default()
        })
        .unwrap();
        let config = AnalysisConfig {
            band: BandMode::Derived,
        };
        let text = AnalysisText(&analyze(&params, &config).unwrap()).to_string();

        assert!(text.contains("band empty"));
        assert!(text.contains("adjust the seat split instead"));
        assert!(!text.contains("target K"));
    }

    #[test]
    fn test_allocation_table_rows() {
        let params = validate(RawParameters::default()).unwrap();
        let table = allocate_deterministic(&params, &PreferenceRankings::default()).unwrap();
        let text = AllocationText(&table).to_string();

        assert_eq!(text.lines().count(), 4);
        assert!(text.lines().nth(2).unwrap().contains("1000"));
    }
}
