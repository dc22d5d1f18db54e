//! Native balance reconciliation.
//!
//! Each frame reports the touched account's balance before and after it
//! ran. Summing the per-frame deltas per account and subtracting the sum
//! from the last observed balance reconstructs the balance the account held
//! before the transaction. A negative reconstruction means the trace and the
//! decoder disagree, so it is an error, never clamped.

use alloy_primitives::{Address, I256, U256};
use statelens_core::{error::BalanceError, primitives, trace::AccountAccess};
use std::collections::BTreeMap;
use tracing::debug;

/// Net native balance movement of one account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetBalance {
    pub account: Address,
    pub before: U256,
    pub after: U256,
}

#[derive(Debug)]
struct Running {
    delta: I256,
    last_new_balance: U256,
}

impl Default for Running {
    fn default() -> Self {
        Self {
            delta: I256::ZERO,
            last_new_balance: U256::ZERO,
        }
    }
}

/// Net balance changes for every account whose balance moved, sorted by
/// address.
///
/// # Errors
/// `BalanceError::Reconciliation` if any reconstructed pre-transaction
/// balance is negative or the arithmetic leaves the signed 256-bit range.
/// No partial list is returned.
pub fn reconcile_balances(accesses: &[AccountAccess]) -> Result<Vec<NetBalance>, BalanceError> {
    let mut running: BTreeMap<Address, Running> = BTreeMap::new();

    for access in accesses {
        if access.kind.is_value_only() {
            continue;
        }
        let delta = signed(access.new_balance, &access.account)?
            .checked_sub(signed(access.old_balance, &access.account)?)
            .ok_or_else(|| overflow(&access.account))?;
        if delta.is_zero() {
            continue;
        }

        let entry = running.entry(access.account).or_default();
        entry.delta = entry
            .delta
            .checked_add(delta)
            .ok_or_else(|| overflow(&access.account))?;
        entry.last_new_balance = access.new_balance;
    }

    let mut out = Vec::with_capacity(running.len());
    for (account, r) in running {
        if r.delta.is_zero() {
            continue;
        }
        let before = signed(r.last_new_balance, &account)?
            .checked_sub(r.delta)
            .ok_or_else(|| overflow(&account))?;
        if before.is_negative() {
            return Err(BalanceError::Reconciliation {
                account: primitives::checksum(&account),
                reason: format!(
                    "reconstructed balance {before} is negative (last observed {}, net delta {})",
                    r.last_new_balance, r.delta
                ),
            });
        }
        out.push(NetBalance {
            account,
            before: before.into_raw(),
            after: r.last_new_balance,
        });
    }

    debug!(accounts = out.len(), "native balances reconciled");
    Ok(out)
}

fn signed(value: U256, account: &Address) -> Result<I256, BalanceError> {
    I256::try_from(value).map_err(|_| overflow(account))
}

fn overflow(account: &Address) -> BalanceError {
    BalanceError::Reconciliation {
        account: primitives::checksum(account),
        reason: "balance arithmetic overflow".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use statelens_core::trace::{AccountAccessKind, ChainInfo};

    const A: Address = Address::repeat_byte(0x0a);
    const B: Address = Address::repeat_byte(0x0b);

    fn frame(account: Address, kind: AccountAccessKind, old: u64, new: u64) -> AccountAccess {
        AccountAccess {
            chain_info: ChainInfo::default(),
            kind,
            account,
            accessor: Address::ZERO,
            initialized: true,
            old_balance: U256::from(old),
            new_balance: U256::from(new),
            deployed_code: vec![],
            value: U256::ZERO,
            data: vec![],
            reverted: false,
            storage_accesses: vec![],
            depth: 1,
            old_nonce: 0,
            new_nonce: 0,
        }
    }

    #[test]
    fn deltas_accumulate_per_account() {
        let trace = vec![
            frame(A, AccountAccessKind::Call, 100, 70),
            frame(B, AccountAccessKind::Call, 5, 35),
            frame(A, AccountAccessKind::Call, 70, 60),
        ];
        let out = reconcile_balances(&trace).unwrap();
        assert_eq!(
            out,
            vec![
                NetBalance { account: A, before: U256::from(100u64), after: U256::from(60u64) },
                NetBalance { account: B, before: U256::from(5u64), after: U256::from(35u64) },
            ]
        );
    }

    #[test]
    fn value_only_frames_are_skipped() {
        let trace = vec![frame(A, AccountAccessKind::Resume, 0, 50)];
        assert!(reconcile_balances(&trace).unwrap().is_empty());
    }

    #[test]
    fn unknown_kinds_count_as_transfers() {
        let trace = vec![frame(A, AccountAccessKind::Unknown(99), 10, 20)];
        assert_eq!(reconcile_balances(&trace).unwrap().len(), 1);
    }

    #[test]
    fn net_zero_account_is_omitted() {
        let trace = vec![
            frame(A, AccountAccessKind::Call, 10, 20),
            frame(A, AccountAccessKind::Call, 20, 10),
        ];
        assert!(reconcile_balances(&trace).unwrap().is_empty());
    }

    #[test]
    fn before_is_reconstructed_from_last_balance() {
        // +50, -70, +10: net -10, last seen 10
        let trace = vec![
            frame(A, AccountAccessKind::Call, 0, 50),
            frame(A, AccountAccessKind::Call, 100, 30),
            frame(A, AccountAccessKind::Call, 0, 10),
        ];
        let out = reconcile_balances(&trace).unwrap();
        assert_eq!(out[0].before, U256::from(20u64));
        assert_eq!(out[0].after, U256::from(10u64));
    }

    #[test]
    fn negative_before_is_fatal() {
        // net +60 but the account is last seen holding 10
        let trace = vec![
            frame(B, AccountAccessKind::Call, 1, 2),
            frame(A, AccountAccessKind::Call, 0, 50),
            frame(A, AccountAccessKind::Call, 0, 10),
        ];
        let err = reconcile_balances(&trace).unwrap_err();
        assert!(matches!(err, BalanceError::Reconciliation { .. }));
    }
}
