//! Layout document parser.
//!
//! A layout document is YAML (JSON parses too) of the form:
//!
//! ```yaml
//! layouts:
//!   SafeLayout:
//!     "0x4": { type: uint256, summary: "Signature threshold" }
//! chains:
//!   1:
//!     "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045":
//!       name: TreasurySafe
//!       slots: "{{layouts.SafeLayout}}"
//! ```
//!
//! A contract's `slots` is either an inline slot map or a reference to a
//! shared layout. Keys are kept as written here; normalization happens when
//! the registry is built.

use indexmap::IndexMap;
use serde::Deserialize;
use statelens_core::{descriptor::SlotDescriptor, error::RegistryError};

/// Inline slot map, in document order.
pub type SlotMap = IndexMap<String, SlotDescriptor>;

// ─── Raw serde types ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct LayoutDocumentRaw {
    #[serde(default)]
    layouts: IndexMap<String, SlotMap>,
    // Chain ids may be written as YAML integers or quoted strings.
    #[serde(default)]
    chains: IndexMap<serde_yaml::Value, IndexMap<String, ContractEntryRaw>>,
}

#[derive(Debug, Deserialize)]
struct ContractEntryRaw {
    name: String,
    #[serde(default)]
    slots: Option<SlotSourceRaw>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SlotSourceRaw {
    Reference(String),
    Inline(SlotMap),
}

// ─── Parsed document ──────────────────────────────────────────────────────────

/// Where a contract's slot descriptors come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotSource {
    /// Name of a shared layout under `layouts:`
    LayoutRef(String),
    Inline(SlotMap),
}

impl SlotSource {
    /// Parse a `{{layouts.<Name>}}` reference string.
    pub fn parse_reference(contract: &str, value: &str) -> Result<Self, RegistryError> {
        let invalid = || RegistryError::InvalidLayoutReference {
            contract: contract.to_string(),
            value: value.to_string(),
        };
        let name = value
            .trim()
            .strip_prefix("{{")
            .and_then(|s| s.strip_suffix("}}"))
            .map(str::trim)
            .and_then(|s| s.strip_prefix("layouts."))
            .ok_or_else(invalid)?;
        if name.is_empty() {
            return Err(invalid());
        }
        Ok(SlotSource::LayoutRef(name.to_string()))
    }
}

/// One contract as declared in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractEntry {
    pub chain_id: u64,
    /// Address exactly as written
    pub address: String,
    pub name: String,
    pub slots: SlotSource,
}

/// A parsed but not yet resolved layout document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutDocument {
    pub layouts: IndexMap<String, SlotMap>,
    pub contracts: Vec<ContractEntry>,
}

impl LayoutDocument {
    pub fn parse(yaml: &str) -> Result<Self, RegistryError> {
        let raw: LayoutDocumentRaw =
            serde_yaml::from_str(yaml).map_err(|e| RegistryError::ParseError(e.to_string()))?;

        let mut contracts = Vec::new();
        for (chain_key, entries) in raw.chains {
            let chain_id = parse_chain_id(&chain_key)?;
            for (address, entry) in entries {
                let slots = match entry.slots {
                    None => SlotSource::Inline(SlotMap::new()),
                    Some(SlotSourceRaw::Inline(map)) => SlotSource::Inline(map),
                    Some(SlotSourceRaw::Reference(r)) => SlotSource::parse_reference(&address, &r)?,
                };
                contracts.push(ContractEntry {
                    chain_id,
                    address,
                    name: entry.name,
                    slots,
                });
            }
        }

        Ok(Self {
            layouts: raw.layouts,
            contracts,
        })
    }
}

fn parse_chain_id(key: &serde_yaml::Value) -> Result<u64, RegistryError> {
    let invalid = |reason: &str| RegistryError::InvalidKey {
        key: format!("{key:?}"),
        reason: reason.to_string(),
    };
    match key {
        serde_yaml::Value::Number(n) => n.as_u64().ok_or_else(|| invalid("chain id must be a u64")),
        serde_yaml::Value::String(s) => s
            .trim()
            .parse::<u64>()
            .map_err(|_| invalid("chain id must be a u64")),
        _ => Err(invalid("chain id must be a number")),
    }
}
