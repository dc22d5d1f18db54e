//! Derived-slot resolution.
//!
//! Mapping entries and dynamic array elements live at hashed slots no
//! metadata document can list. The simulator reports, for each such slot,
//! the slot it was derived from; walking that chain upward finds the
//! declaring variable's descriptor.

use alloy_primitives::B256;
use statelens_core::{
    descriptor::{ContractDescriptor, SlotDescriptor},
    primitives,
    trace::PreimageEntry,
};
use std::collections::HashMap;
use tracing::warn;

/// Upper bound on parent hops before a chain is treated as malformed.
pub const MAX_PREIMAGE_HOPS: usize = 256;

/// Derived slot → parent slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParentMap(HashMap<B256, B256>);

impl ParentMap {
    /// Build from decoded preimage entries. The first entry for a slot wins.
    pub fn from_entries(entries: &[PreimageEntry]) -> Self {
        let mut map = HashMap::with_capacity(entries.len());
        for e in entries {
            map.entry(e.slot).or_insert(e.parent);
        }
        Self(map)
    }

    pub fn parent(&self, slot: &B256) -> Option<&B256> {
        self.0.get(slot)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(B256, B256)> for ParentMap {
    fn from_iter<T: IntoIterator<Item = (B256, B256)>>(iter: T) -> Self {
        let mut map = HashMap::new();
        for (slot, parent) in iter {
            map.entry(slot).or_insert(parent);
        }
        Self(map)
    }
}

/// Descriptor for `slot` in `contract`, following derived slots upward.
///
/// Returns the placeholder for an orphan chain, and for a chain longer than
/// [`MAX_PREIMAGE_HOPS`] (which also covers cycles).
pub fn resolve_slot(
    contract: &ContractDescriptor,
    slot: &B256,
    parents: &ParentMap,
) -> SlotDescriptor {
    let mut current = *slot;
    for _ in 0..=MAX_PREIMAGE_HOPS {
        if let Some(found) = contract.slot(&current) {
            return found.clone();
        }
        match parents.parent(&current) {
            Some(parent) => current = *parent,
            None => return SlotDescriptor::placeholder(),
        }
    }

    warn!(
        contract = %contract.name,
        slot = %primitives::word_hex(slot),
        max_hops = MAX_PREIMAGE_HOPS,
        "preimage chain exceeded hop limit"
    );
    SlotDescriptor::placeholder()
}
