//! Parameter fingerprints
//!
//! A report carries the SHA-256 of its parameter set so front ends can tell
//! whether two reports describe the same market without comparing floats
//! field by field.

use super::AnalysisError;
use crate::models::ParameterSet;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Compute the SHA-256 fingerprint of a parameter set
///
/// Uses canonical JSON serialization with sorted keys so the hash depends
/// only on the parameter values.
pub fn parameter_fingerprint(params: &ParameterSet) -> Result<String, AnalysisError> {
    let value = serde_json::to_value(params).map_err(|e| {
        AnalysisError::Serialization(format!("Parameter serialization failed: {}", e))
    })?;

    fn canonicalize(value: Value) -> Value {
        match value {
            Value::Object(map) => {
                let sorted: BTreeMap<String, Value> =
                    map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect();
                Value::Object(sorted.into_iter().collect())
            }
            Value::Array(arr) => Value::Array(arr.into_iter().map(canonicalize).collect()),
            other => other,
        }
    }

    let json = serde_json::to_string(&canonicalize(value)).map_err(|e| {
        AnalysisError::Serialization(format!("Canonical JSON failed: {}", e))
    })?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{validate, RawParameters};

    #[test]
    fn test_fingerprint_is_stable_and_value_sensitive() {
        let base = validate(RawParameters::default()).unwrap();
        let tweaked = validate(RawParameters {
            value_b: 1.2,
            ..RawParameters::default()
        })
        .unwrap();

        let first = parameter_fingerprint(&base).unwrap();
        assert_eq!(first, parameter_fingerprint(&base).unwrap());
        assert_eq!(first.len(), 64);
        assert_ne!(first, parameter_fingerprint(&tweaked).unwrap());
    }
}
