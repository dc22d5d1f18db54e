//! The resolved, immutable slot metadata registry.
//!
//! Build it once per process with [`RegistryBuilder`] (or one of the
//! `SlotRegistry::load_*` shortcuts) and share it behind an `Arc`. Layout
//! references are resolved during `build()`; lookups never see a reference.

use alloy_primitives::{Address, B256};
use statelens_core::{
    descriptor::{ContractDescriptor, SlotDescriptor},
    error::RegistryError,
    primitives,
};
use std::{
    collections::{BTreeMap, HashMap},
    path::{Path, PathBuf},
};
use tracing::{debug, info};

use crate::layout::{ContractEntry, LayoutDocument, SlotMap, SlotSource};

/// Accumulates layout documents before resolution.
///
/// Layouts are shared across every added document, so a contract in one
/// file may reference a layout declared in another.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    layouts: HashMap<String, SlotMap>,
    contracts: Vec<ContractEntry>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_document(&mut self, doc: LayoutDocument) -> Result<&mut Self, RegistryError> {
        for (name, slots) in doc.layouts {
            if self.layouts.contains_key(&name) {
                return Err(RegistryError::ParseError(format!(
                    "layout '{name}' declared more than once"
                )));
            }
            self.layouts.insert(name, slots);
        }
        self.contracts.extend(doc.contracts);
        Ok(self)
    }

    pub fn add_yaml(&mut self, yaml: &str) -> Result<&mut Self, RegistryError> {
        self.add_document(LayoutDocument::parse(yaml)?)
    }

    /// Resolve every layout reference and normalize every key.
    ///
    /// # Errors
    /// `UnresolvedLayoutReference` for a reference to a missing layout,
    /// `InvalidKey` for an unparsable address or slot, `ParseError` for a
    /// contract declared twice on the same chain.
    pub fn build(self) -> Result<SlotRegistry, RegistryError> {
        let mut chains: HashMap<u64, HashMap<Address, ContractDescriptor>> = HashMap::new();

        for entry in self.contracts {
            let address = primitives::parse_address(&entry.address).map_err(|reason| {
                RegistryError::InvalidKey {
                    key: entry.address.clone(),
                    reason,
                }
            })?;

            let slot_map = match &entry.slots {
                SlotSource::Inline(map) => map,
                SlotSource::LayoutRef(name) => {
                    self.layouts
                        .get(name)
                        .ok_or_else(|| RegistryError::UnresolvedLayoutReference {
                            contract: entry.address.clone(),
                            layout: name.clone(),
                        })?
                }
            };

            let descriptor = ContractDescriptor {
                name: entry.name.clone(),
                slots: normalize_slots(slot_map)?,
            };

            let contracts = chains.entry(entry.chain_id).or_default();
            if contracts.insert(address, descriptor).is_some() {
                return Err(RegistryError::ParseError(format!(
                    "contract {} declared more than once on chain {}",
                    entry.address, entry.chain_id
                )));
            }
        }

        let registry = SlotRegistry {
            chains,
            placeholder: ContractDescriptor::placeholder(),
        };
        info!(
            chains = registry.chains.len(),
            contracts = registry.contract_count(),
            "slot registry loaded"
        );
        Ok(registry)
    }
}

fn normalize_slots(map: &SlotMap) -> Result<BTreeMap<B256, SlotDescriptor>, RegistryError> {
    let mut out = BTreeMap::new();
    for (key, descriptor) in map {
        let slot = primitives::parse_word(key).map_err(|reason| RegistryError::InvalidKey {
            key: key.clone(),
            reason,
        })?;
        if out.insert(slot, descriptor.clone()).is_some() {
            return Err(RegistryError::ParseError(format!(
                "slot {} declared more than once",
                primitives::word_hex(&slot)
            )));
        }
    }
    Ok(out)
}

/// Read-only slot metadata: chain id → address → contract descriptor.
#[derive(Debug, Clone)]
pub struct SlotRegistry {
    chains: HashMap<u64, HashMap<Address, ContractDescriptor>>,
    placeholder: ContractDescriptor,
}

impl SlotRegistry {
    /// A registry with no contracts; every lookup yields the placeholder.
    pub fn empty() -> Self {
        Self {
            chains: HashMap::new(),
            placeholder: ContractDescriptor::placeholder(),
        }
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, RegistryError> {
        let mut builder = RegistryBuilder::new();
        builder.add_yaml(yaml)?;
        builder.build()
    }

    /// Load a single layout document.
    pub fn load_file(path: &Path) -> Result<Self, RegistryError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Load every `.yaml` / `.yml` file under `dir` recursively, in path
    /// order, as one registry.
    pub fn load_directory(dir: &Path) -> Result<Self, RegistryError> {
        let mut files = walkdir_yaml(dir)?;
        files.sort();
        let mut builder = RegistryBuilder::new();
        for file in &files {
            debug!(file = %file.display(), "loading layout document");
            let content = std::fs::read_to_string(file)?;
            builder.add_yaml(&content)?;
        }
        builder.build()
    }

    /// Load a file or a directory, whichever `path` is.
    pub fn load_path(path: &Path) -> Result<Self, RegistryError> {
        if path.is_dir() {
            Self::load_directory(path)
        } else {
            Self::load_file(path)
        }
    }

    /// Descriptor for `address` on `chain_id`, or the placeholder.
    pub fn resolve(&self, chain_id: u64, address: &Address) -> &ContractDescriptor {
        self.get(chain_id, address).unwrap_or(&self.placeholder)
    }

    pub fn get(&self, chain_id: u64, address: &Address) -> Option<&ContractDescriptor> {
        self.chains.get(&chain_id)?.get(address)
    }

    pub fn chain_ids(&self) -> Vec<u64> {
        let mut ids: Vec<u64> = self.chains.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Contracts on one chain, sorted by address.
    pub fn contracts(&self, chain_id: u64) -> Vec<(Address, &ContractDescriptor)> {
        let mut out: Vec<_> = self
            .chains
            .get(&chain_id)
            .map(|m| m.iter().map(|(a, d)| (*a, d)).collect())
            .unwrap_or_default();
        out.sort_by_key(|(a, _)| *a);
        out
    }

    pub fn contract_count(&self) -> usize {
        self.chains.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.contract_count() == 0
    }
}

/// Collect all `.yaml` / `.yml` files under `dir` recursively.
fn walkdir_yaml(dir: &Path) -> Result<Vec<PathBuf>, RegistryError> {
    let mut files = Vec::new();
    if !dir.is_dir() {
        return Err(RegistryError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} is not a directory", dir.display()),
        )));
    }
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            files.extend(walkdir_yaml(&path)?);
        } else if path
            .extension()
            .map(|e| e == "yaml" || e == "yml")
            .unwrap_or(false)
        {
            files.push(path);
        }
    }
    Ok(files)
}
