//! The simulator handoff record.

use crate::error::TransformError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Raw simulator output, conventionally persisted as one JSON object with
/// five hex-string fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationTrace {
    /// Account expected to produce the signature
    pub target_safe: String,
    /// `0x1901 ‖ domainHash ‖ messageHash`
    pub data_to_sign: String,
    /// ABI-encoded `AccountAccess[]`
    pub state_diff: String,
    /// ABI-encoded `(slot, parent, key)[]`
    pub preimages: String,
    /// ABI-encoded `(from, to, data, stateOverrides[])`
    pub overrides: String,
}

impl SimulationTrace {
    pub fn from_json(json: &str) -> Result<Self, TransformError> {
        serde_json::from_str(json).map_err(|e| TransformError::Input(e.to_string()))
    }

    /// Read a trace file. Deleting the file afterwards is the caller's job.
    pub fn from_file(path: &Path) -> Result<Self, TransformError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_camel_case_fields() {
        let json = r#"{
            "targetSafe": "0x0000000000000000000000000000000000000001",
            "dataToSign": "0x1901",
            "stateDiff": "0x",
            "preimages": "0x",
            "overrides": "0x"
        }"#;
        let trace = SimulationTrace::from_json(json).unwrap();
        assert_eq!(trace.data_to_sign, "0x1901");
    }

    #[test]
    fn missing_field_is_input_error() {
        let err = SimulationTrace::from_json(r#"{"targetSafe": "0x"}"#).unwrap_err();
        assert!(matches!(err, TransformError::Input(_)));
    }
}
