//! Storage diff builder.
//!
//! Two passes over the decoded trace: `accumulate` folds every write into a
//! single before/after pair per `(account, slot)`, then `drop_no_ops`
//! removes pairs whose value ended where it started and accounts left with
//! nothing to show.

use alloy_primitives::{Address, B256};
use statelens_core::trace::AccountAccess;
use std::collections::{btree_map::Entry, BTreeMap};

/// Net change of one storage word over the whole trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordChange {
    pub before: B256,
    pub after: B256,
}

impl WordChange {
    pub fn is_no_op(&self) -> bool {
        self.before == self.after
    }
}

/// Account → slot → net change. Both levels iterate in byte order, which is
/// the order of their lowercase hex forms.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateDiff(BTreeMap<Address, BTreeMap<B256, WordChange>>);

impl StateDiff {
    /// Fold every storage write, in trace order, into one change per slot.
    ///
    /// The first write to a slot fixes `before`; every write moves `after`.
    pub fn accumulate(accesses: &[AccountAccess]) -> Self {
        let mut out: BTreeMap<Address, BTreeMap<B256, WordChange>> = BTreeMap::new();
        for write in accesses
            .iter()
            .flat_map(|a| a.storage_accesses.iter())
            .filter(|s| s.is_write)
        {
            match out.entry(write.account).or_default().entry(write.slot) {
                Entry::Vacant(e) => {
                    e.insert(WordChange {
                        before: write.previous_value,
                        after: write.new_value,
                    });
                }
                Entry::Occupied(mut e) => e.get_mut().after = write.new_value,
            }
        }
        Self(out)
    }

    /// Remove unchanged slots, then accounts with no slots left.
    pub fn drop_no_ops(mut self) -> Self {
        for slots in self.0.values_mut() {
            slots.retain(|_, change| !change.is_no_op());
        }
        self.0.retain(|_, slots| !slots.is_empty());
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Address, &BTreeMap<B256, WordChange>)> {
        self.0.iter()
    }

    pub fn account(&self, address: &Address) -> Option<&BTreeMap<B256, WordChange>> {
        self.0.get(address)
    }

    /// Number of accounts with at least one change.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn slot_count(&self) -> usize {
        self.0.values().map(BTreeMap::len).sum()
    }
}

/// Accumulate then filter.
pub fn build_state_diff(accesses: &[AccountAccess]) -> StateDiff {
    StateDiff::accumulate(accesses).drop_no_ops()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::U256;
    use statelens_core::trace::{AccountAccessKind, ChainInfo, StorageAccess};

    const A: Address = Address::repeat_byte(0x0a);
    const B: Address = Address::repeat_byte(0x0b);

    fn w(b: u8) -> B256 {
        B256::with_last_byte(b)
    }

    fn touch(account: Address, slot: u8, before: u8, after: u8, is_write: bool) -> StorageAccess {
        StorageAccess {
            account,
            slot: w(slot),
            is_write,
            previous_value: w(before),
            new_value: w(after),
            reverted: false,
        }
    }

    fn frame(storage: Vec<StorageAccess>) -> AccountAccess {
        AccountAccess {
            chain_info: ChainInfo::default(),
            kind: AccountAccessKind::Call,
            account: A,
            accessor: B,
            initialized: true,
            old_balance: U256::ZERO,
            new_balance: U256::ZERO,
            deployed_code: vec![],
            value: U256::ZERO,
            data: vec![],
            reverted: false,
            storage_accesses: storage,
            depth: 1,
            old_nonce: 0,
            new_nonce: 0,
        }
    }

    #[test]
    fn repeated_writes_collapse() {
        let trace = vec![
            frame(vec![touch(A, 1, 0, 1, true)]),
            frame(vec![touch(A, 1, 1, 2, true)]),
        ];
        let diff = build_state_diff(&trace);
        assert_eq!(
            diff.account(&A).unwrap()[&w(1)],
            WordChange { before: w(0), after: w(2) }
        );
        assert_eq!(diff.slot_count(), 1);
    }

    #[test]
    fn reads_are_ignored() {
        let diff = build_state_diff(&[frame(vec![touch(A, 1, 0, 5, false)])]);
        assert!(diff.is_empty());
    }

    #[test]
    fn restored_slot_and_empty_account_dropped() {
        let trace = vec![frame(vec![
            touch(A, 1, 3, 4, true),
            touch(A, 1, 4, 3, true),
            touch(B, 2, 0, 7, true),
        ])];
        let accumulated = StateDiff::accumulate(&trace);
        assert_eq!(accumulated.len(), 2);

        let diff = accumulated.drop_no_ops();
        assert!(diff.account(&A).is_none());
        assert_eq!(diff.len(), 1);
    }

    #[test]
    fn keyed_by_storage_account_not_frame() {
        // delegatecall frames report the implementation, storage lands on the proxy
        let mut f = frame(vec![touch(B, 1, 0, 1, true)]);
        f.account = A;
        let diff = build_state_diff(&[f]);
        assert!(diff.account(&B).is_some());
        assert!(diff.account(&A).is_none());
    }

    #[test]
    fn iteration_is_sorted() {
        let trace = vec![frame(vec![
            touch(B, 9, 0, 1, true),
            touch(A, 3, 0, 1, true),
            touch(A, 1, 0, 1, true),
        ])];
        let diff = build_state_diff(&trace);
        let order: Vec<(Address, Vec<B256>)> = diff
            .iter()
            .map(|(a, slots)| (*a, slots.keys().copied().collect()))
            .collect();
        assert_eq!(order, vec![(A, vec![w(1), w(3)]), (B, vec![w(9)])]);
    }
}
