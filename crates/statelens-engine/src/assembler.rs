//! Review artifact assembly.
//!
//! The only stage that consults the slot registry: every override, change
//! and balance entry gets its contract name here, and every storage entry
//! its slot description via the preimage resolver.

use alloy_primitives::{Address, B256};
use statelens_core::{
    output::{
        BalanceChange, ExpectedHashes, OverrideEntry, StateChange, StateChangeEntry,
        StateOverride, TransformResult, NATIVE_BALANCE_FIELD,
    },
    primitives,
    trace::OverridePayload,
};
use statelens_registry::{resolve_slot, ParentMap, SlotRegistry};
use std::collections::BTreeMap;

use crate::{balance::NetBalance, diff::StateDiff};

/// Description attached to every native balance entry.
pub const BALANCE_DESCRIPTION: &str = "Net native balance change over the transaction";

/// Attaches registry metadata for one chain.
pub struct Assembler<'a> {
    registry: &'a SlotRegistry,
    chain_id: u64,
    parents: &'a ParentMap,
}

impl<'a> Assembler<'a> {
    pub fn new(registry: &'a SlotRegistry, chain_id: u64, parents: &'a ParentMap) -> Self {
        Self {
            registry,
            chain_id,
            parents,
        }
    }

    /// Build the final result. Every list comes out sorted by address, then
    /// by slot.
    pub fn assemble(
        &self,
        hashes: ExpectedHashes,
        overrides: &OverridePayload,
        diff: &StateDiff,
        balances: &[NetBalance],
    ) -> TransformResult {
        TransformResult {
            expected_domain_and_message_hashes: hashes,
            state_overrides: self.state_overrides(overrides),
            state_changes: self.state_changes(diff),
            balance_changes: self.balance_changes(balances),
        }
    }

    /// Override groups, one per contract.
    ///
    /// The simulator may list the same contract more than once; the groups
    /// merge, and a later value for the same slot replaces an earlier one.
    pub fn state_overrides(&self, payload: &OverridePayload) -> Vec<StateOverride> {
        let mut merged: BTreeMap<Address, BTreeMap<B256, B256>> = BTreeMap::new();
        for contract in &payload.state_overrides {
            let slots = merged.entry(contract.contract).or_default();
            for slot in &contract.slots {
                slots.insert(slot.key, slot.value);
            }
        }

        merged
            .into_iter()
            .filter(|(_, slots)| !slots.is_empty())
            .map(|(address, slots)| {
                let contract = self.registry.resolve(self.chain_id, &address);
                let overrides = slots
                    .into_iter()
                    .map(|(key, value)| {
                        let desc = resolve_slot(contract, &key, self.parents);
                        OverrideEntry {
                            key: primitives::word_hex(&key),
                            value: primitives::word_hex(&value),
                            description: desc.override_meaning,
                            allow_difference: desc.allow_difference,
                        }
                    })
                    .collect();
                StateOverride {
                    name: contract.name.clone(),
                    address: primitives::checksum(&address),
                    overrides,
                }
            })
            .collect()
    }

    pub fn state_changes(&self, diff: &StateDiff) -> Vec<StateChange> {
        diff.iter()
            .map(|(address, slots)| {
                let contract = self.registry.resolve(self.chain_id, address);
                let changes = slots
                    .iter()
                    .map(|(slot, change)| {
                        let desc = resolve_slot(contract, slot, self.parents);
                        StateChangeEntry {
                            key: primitives::word_hex(slot),
                            before: primitives::word_hex(&change.before),
                            after: primitives::word_hex(&change.after),
                            description: desc.summary,
                            allow_difference: desc.allow_difference,
                        }
                    })
                    .collect();
                StateChange {
                    name: contract.name.clone(),
                    address: primitives::checksum(address),
                    changes,
                }
            })
            .collect()
    }

    pub fn balance_changes(&self, balances: &[NetBalance]) -> Vec<BalanceChange> {
        let mut sorted: Vec<&NetBalance> = balances.iter().collect();
        sorted.sort_by_key(|b| b.account);
        sorted
            .into_iter()
            .map(|b| BalanceChange {
                name: self.registry.resolve(self.chain_id, &b.account).name.clone(),
                address: primitives::checksum(&b.account),
                field: NATIVE_BALANCE_FIELD.into(),
                before: b.before.to_string(),
                after: b.after.to_string(),
                description: BALANCE_DESCRIPTION.into(),
                allow_difference: false,
            })
            .collect()
    }
}
