//! Human-facing metadata attached to contracts and storage slots.

use alloy_primitives::B256;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_CONTRACT_NAME: &str = "<<ContractName>>";
pub const DEFAULT_SLOT_TYPE: &str = "<<DecodedKind>>";
pub const DEFAULT_SUMMARY: &str = "<<Summary>>";
pub const DEFAULT_OVERRIDE_MEANING: &str = "<<OverrideMeaning>>";

/// Describes what a storage slot holds and how reviewers should treat it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotDescriptor {
    /// Decoded value type, e.g. "address" or "uint256"
    #[serde(rename = "type")]
    pub ty: String,
    /// What a change to this slot means
    #[serde(default = "default_summary")]
    pub summary: String,
    /// What forcing this slot before simulation means
    #[serde(default = "default_override_meaning")]
    pub override_meaning: String,
    /// Whether the value may legitimately differ between review and execution
    #[serde(default)]
    pub allow_difference: bool,
    /// Whether an override on this slot may sit at an offset from the key
    #[serde(default)]
    pub allow_override_offset: bool,
}

fn default_summary() -> String {
    DEFAULT_SUMMARY.into()
}

fn default_override_meaning() -> String {
    DEFAULT_OVERRIDE_MEANING.into()
}

impl SlotDescriptor {
    /// Fallback for slots with no configured metadata.
    pub fn placeholder() -> Self {
        Self {
            ty: DEFAULT_SLOT_TYPE.into(),
            summary: DEFAULT_SUMMARY.into(),
            override_meaning: DEFAULT_OVERRIDE_MEANING.into(),
            allow_difference: false,
            allow_override_offset: false,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.ty == DEFAULT_SLOT_TYPE
    }
}

/// A contract's display name and its described slots.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContractDescriptor {
    pub name: String,
    pub slots: BTreeMap<B256, SlotDescriptor>,
}

impl ContractDescriptor {
    /// Fallback for contracts missing from the registry.
    pub fn placeholder() -> Self {
        Self {
            name: DEFAULT_CONTRACT_NAME.into(),
            slots: BTreeMap::new(),
        }
    }

    pub fn slot(&self, slot: &B256) -> Option<&SlotDescriptor> {
        self.slots.get(slot)
    }
}
