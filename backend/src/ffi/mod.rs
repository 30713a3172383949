//! Python bindings
//!
//! Thin wrappers over the orchestrator functions. Parameters arrive as a
//! plain dict, results leave as nested dicts; all analysis stays in Rust.

pub mod types;

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::models::validate;
use crate::orchestrator;

/// Analyse a market described by a parameter dict
///
/// # Errors
///
/// Raises `ValueError` for missing fields or invalid parameters.
#[pyfunction]
pub fn analyze<'py>(py: Python<'py>, params: &Bound<'py, PyDict>) -> PyResult<Bound<'py, PyDict>> {
    let raw = types::parse_raw_parameters(params)?;
    let config = types::parse_analysis_config(params)?;
    let params = validate(raw).map_err(|e| PyErr::new::<PyValueError, _>(e.to_string()))?;

    let report = orchestrator::analyze(&params, &config)
        .map_err(|e| PyErr::new::<PyValueError, _>(e.to_string()))?;
    types::report_to_py(py, &report)
}

/// Suggest a value adjustment for K against the default band
#[pyfunction]
pub fn suggest(py: Python<'_>, k: f64) -> PyResult<Bound<'_, PyDict>> {
    if !(k.is_finite() && k > 0.0) {
        return Err(PyErr::new::<PyValueError, _>(format!(
            "K must be a positive finite ratio, got {}",
            k
        )));
    }
    types::suggestion_to_py(py, &orchestrator::suggest(k))
}
