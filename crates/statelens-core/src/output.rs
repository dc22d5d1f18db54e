//! The reviewable artifact produced by a transform run.
//!
//! Field order here is the field order of the JSON artifact, and every list
//! is sorted by the assembler, so serializing the same result twice always
//! yields identical bytes.

use crate::error::TransformError;
use serde::{Deserialize, Serialize};

/// Label used for every native balance entry.
pub const NATIVE_BALANCE_FIELD: &str = "native balance (smallest unit)";

/// The hashes the signer is expected to sign over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpectedHashes {
    pub address: String,
    pub domain_hash: String,
    pub message_hash: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverrideEntry {
    pub key: String,
    pub value: String,
    pub description: String,
    pub allow_difference: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateOverride {
    pub name: String,
    pub address: String,
    pub overrides: Vec<OverrideEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateChangeEntry {
    pub key: String,
    pub before: String,
    pub after: String,
    pub description: String,
    pub allow_difference: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateChange {
    pub name: String,
    pub address: String,
    pub changes: Vec<StateChangeEntry>,
}

/// Net native balance movement of one account, in decimal smallest units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceChange {
    pub name: String,
    pub address: String,
    pub field: String,
    pub before: String,
    pub after: String,
    pub description: String,
    pub allow_difference: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformResult {
    pub expected_domain_and_message_hashes: ExpectedHashes,
    pub state_overrides: Vec<StateOverride>,
    pub state_changes: Vec<StateChange>,
    pub balance_changes: Vec<BalanceChange>,
}

impl TransformResult {
    /// Pretty JSON used as the review artifact.
    pub fn to_canonical_json(&self) -> Result<String, TransformError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Total number of reviewable entries across all sections.
    pub fn entry_count(&self) -> usize {
        self.state_overrides.iter().map(|o| o.overrides.len()).sum::<usize>()
            + self.state_changes.iter().map(|c| c.changes.len()).sum::<usize>()
            + self.balance_changes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_camel_case_sections() {
        let result = TransformResult {
            expected_domain_and_message_hashes: ExpectedHashes {
                address: "0x01".into(),
                domain_hash: "0xaa".into(),
                message_hash: "0xbb".into(),
            },
            state_overrides: vec![],
            state_changes: vec![],
            balance_changes: vec![],
        };
        let json = result.to_canonical_json().unwrap();
        assert!(json.contains("expectedDomainAndMessageHashes"));
        assert!(json.contains("domainHash"));
        assert!(json.contains("balanceChanges"));
        assert_eq!(result.entry_count(), 0);
    }
}
