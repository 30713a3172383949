//! Type conversion utilities for FFI boundary
//!
//! Converts between Rust types and PyO3-compatible types (PyDict, PyList).

use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use crate::advisor::Suggestion;
use crate::allocation::AdmissionOutcome;
use crate::equilibrium::{BandMode, EquilibriumResult, FeasibilityBand};
use crate::models::{ProgrammeSizeProfile, RawParameters};
use crate::orchestrator::{AnalysisConfig, AnalysisReport};

// ========================================================================
// PyDict Extraction Helpers
// ========================================================================

/// Extract a required field from a Python dict with clear error messages.
///
/// # Errors
/// Returns PyValueError if the field is missing or type conversion fails.
fn extract_required<T>(dict: &Bound<'_, PyDict>, key: &str) -> PyResult<T>
where
    for<'py> T: FromPyObject<'py>,
{
    dict.get_item(key)?
        .ok_or_else(|| {
            PyErr::new::<pyo3::exceptions::PyValueError, _>(format!(
                "Missing required field '{}'",
                key
            ))
        })?
        .extract()
}

/// Extract an optional field from a Python dict.
///
/// Errors only if type conversion fails, not if the field is missing.
fn extract_optional<T>(dict: &Bound<'_, PyDict>, key: &str) -> PyResult<Option<T>>
where
    for<'py> T: FromPyObject<'py>,
{
    match dict.get_item(key)? {
        Some(value) => Ok(Some(value.extract()?)),
        None => Ok(None),
    }
}

/// Extract a field with a default value if missing.
fn extract_with_default<T>(dict: &Bound<'_, PyDict>, key: &str, default: T) -> PyResult<T>
where
    for<'py> T: FromPyObject<'py>,
{
    match dict.get_item(key)? {
        Some(value) => value.extract(),
        None => Ok(default),
    }
}

// ========================================================================
// Parameter Parsers
// ========================================================================

/// Convert a Python dict to unvalidated market parameters
///
/// `total_applicants` and `total_seats` are required; every other field
/// falls back to the default market.
pub fn parse_raw_parameters(py_params: &Bound<'_, PyDict>) -> PyResult<RawParameters> {
    let defaults = RawParameters::default();

    let size_profile = match py_params.get_item("size_profile")? {
        Some(py_profile) => {
            let profile: Bound<'_, PyDict> = py_profile.downcast_into()?;
            ProgrammeSizeProfile {
                sizes: extract_required(&profile, "sizes")?,
                distribution: extract_with_default(
                    &profile,
                    "distribution",
                    defaults.size_profile.distribution.clone(),
                )?,
            }
        }
        None => defaults.size_profile.clone(),
    };

    Ok(RawParameters {
        total_applicants: extract_required(py_params, "total_applicants")?,
        total_seats: extract_required(py_params, "total_seats")?,
        group_a_proportion: extract_with_default(
            py_params,
            "group_a_proportion",
            defaults.group_a_proportion,
        )?,
        value_a: extract_with_default(py_params, "value_a", defaults.value_a)?,
        value_b: extract_with_default(py_params, "value_b", defaults.value_b)?,
        value_c: extract_with_default(py_params, "value_c", defaults.value_c)?,
        seat_proportion_a: extract_with_default(
            py_params,
            "seat_proportion_a",
            defaults.seat_proportion_a,
        )?,
        seat_proportion_b: extract_with_default(
            py_params,
            "seat_proportion_b",
            defaults.seat_proportion_b,
        )?,
        seat_proportion_c: extract_with_default(
            py_params,
            "seat_proportion_c",
            defaults.seat_proportion_c,
        )?,
        size_profile,
    })
}

/// Analysis options from the same dict
///
/// `derived_band: bool` selects the derived band; otherwise an optional
/// `band: (lower, upper)` tuple replaces the default fixed band.
pub fn parse_analysis_config(py_params: &Bound<'_, PyDict>) -> PyResult<AnalysisConfig> {
    let derived: bool = extract_with_default(py_params, "derived_band", false)?;
    if derived {
        return Ok(AnalysisConfig {
            band: BandMode::Derived,
        });
    }

    let band = match extract_optional::<(f64, f64)>(py_params, "band")? {
        Some((lower, upper)) => FeasibilityBand::new(lower, upper)
            .map_err(|e| PyErr::new::<pyo3::exceptions::PyValueError, _>(e.to_string()))?,
        None => FeasibilityBand::default(),
    };
    Ok(AnalysisConfig {
        band: BandMode::Fixed { band },
    })
}

// ========================================================================
// Result Converters
// ========================================================================

fn group_a_to_py<'py>(py: Python<'py>, outcome: &AdmissionOutcome) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new_bound(py);
    dict.set_item("admission_rate", outcome.admission_rate)?;
    dict.set_item("expected_payoff", outcome.expected_payoff)?;
    dict.set_item("complete", outcome.complete)?;

    let mix = PyList::empty_bound(py);
    for entry in &outcome.size_mix {
        let item = PyDict::new_bound(py);
        item.set_item("size", entry.size)?;
        item.set_item("programmes", entry.programmes)?;
        item.set_item("probability", entry.probability)?;
        item.set_item("admission_probability", entry.admission_probability)?;
        item.set_item("expected_payoff", entry.expected_payoff)?;
        mix.append(item)?;
    }
    dict.set_item("size_mix", mix)?;
    Ok(dict)
}

fn group_b_to_py<'py>(py: Python<'py>, result: &EquilibriumResult) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new_bound(py);
    dict.set_item("kind", result.kind.label())?;
    dict.set_item("fraction_b", result.fraction_b)?;
    dict.set_item("admission_b", result.admission_b)?;
    dict.set_item("admission_c", result.admission_c)?;
    dict.set_item("payoff_b", result.payoff_b)?;
    dict.set_item("payoff_c", result.payoff_c)?;
    dict.set_item("indifference_holds", result.indifference_holds)?;
    dict.set_item("admission_rate", result.admission_rate())?;
    dict.set_item("expected_payoff", result.expected_payoff())?;
    dict.set_item("clamped", result.clamp.is_some())?;

    if let Some(deviation) = &result.deviation {
        let probes = PyList::empty_bound(py);
        for probe in &deviation.probes {
            let item = PyDict::new_bound(py);
            item.set_item("switchers", probe.switchers)?;
            item.set_item("admission_b", probe.admission_b)?;
            item.set_item("admission_c", probe.admission_c)?;
            item.set_item("rational", probe.rational)?;
            probes.append(item)?;
        }
        let deviation_dict = PyDict::new_bound(py);
        deviation_dict.set_item("threshold_ratio", deviation.threshold_ratio)?;
        deviation_dict.set_item("hard_to_achieve", deviation.hard_to_achieve)?;
        deviation_dict.set_item("probes", probes)?;
        dict.set_item("deviation", deviation_dict)?;
    }
    Ok(dict)
}

/// Convert a suggestion to a Python dict
pub fn suggestion_to_py<'py>(
    py: Python<'py>,
    suggestion: &Suggestion,
) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new_bound(py);
    dict.set_item("issue", format!("{:?}", suggestion.issue))?;
    dict.set_item("current_k", suggestion.current_k)?;
    dict.set_item("k_lower", suggestion.k_lower)?;
    dict.set_item("k_upper", suggestion.k_upper)?;
    dict.set_item("target_k", suggestion.target_k)?;
    dict.set_item("adjustment_needed", suggestion.adjustment_needed())?;
    dict.set_item("message", suggestion.to_string())?;

    let bounds = PyList::empty_bound(py);
    for bound in &suggestion.bounds {
        bounds.append(bound.to_string())?;
    }
    dict.set_item("bounds", bounds)?;
    Ok(dict)
}

/// Convert an analysis report to a Python dict
pub fn report_to_py<'py>(py: Python<'py>, report: &AnalysisReport) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new_bound(py);
    dict.set_item("fingerprint", &report.fingerprint)?;

    let stats = PyDict::new_bound(py);
    stats.set_item("group_a_size", report.statistics.group_a_size)?;
    stats.set_item("group_b_size", report.statistics.group_b_size)?;
    stats.set_item("seats_a", report.statistics.seats_a)?;
    stats.set_item("seats_b", report.statistics.seats_b)?;
    stats.set_item("seats_c", report.statistics.seats_c)?;
    dict.set_item("statistics", stats)?;

    dict.set_item("group_a", group_a_to_py(py, &report.group_a)?)?;

    let mse_check = PyDict::new_bound(py);
    mse_check.set_item("k", report.mse_check.k)?;
    mse_check.set_item("lower", report.mse_check.lower)?;
    mse_check.set_item("upper", report.mse_check.upper)?;
    mse_check.set_item("feasible", report.mse_check.feasible)?;
    dict.set_item("mse_check", mse_check)?;

    dict.set_item("group_b", group_b_to_py(py, &report.group_b)?)?;

    match &report.suggestion {
        Some(suggestion) => dict.set_item("suggestion", suggestion_to_py(py, suggestion)?)?,
        None => dict.set_item("suggestion", py.None())?,
    }

    let events = PyList::empty_bound(py);
    for event in report.events.events() {
        events.append(event.event_type())?;
    }
    dict.set_item("events", events)?;
    Ok(dict)
}
