//! ABI encoder, the inverse of [`TraceDecoder`](crate::TraceDecoder).
//!
//! Produces the same `abi.encode` blobs a simulator would, from typed
//! records. Not used by the transform pipeline; it exists to build trace
//! blobs for tests and fixtures.

use alloy_core::dyn_abi::DynSolValue;
use alloy_primitives::{B256, U256};
use statelens_core::trace::{
    AccountAccess, ContractOverride, OverridePayload, PreimageEntry, StorageAccess,
};

fn word(w: B256) -> DynSolValue {
    DynSolValue::FixedBytes(w, 32)
}

fn uint(v: U256, bits: usize) -> DynSolValue {
    DynSolValue::Uint(v, bits)
}

fn storage_access(s: &StorageAccess) -> DynSolValue {
    DynSolValue::Tuple(vec![
        DynSolValue::Address(s.account),
        word(s.slot),
        DynSolValue::Bool(s.is_write),
        word(s.previous_value),
        word(s.new_value),
        DynSolValue::Bool(s.reverted),
    ])
}

fn account_access(a: &AccountAccess) -> DynSolValue {
    DynSolValue::Tuple(vec![
        DynSolValue::Tuple(vec![
            uint(a.chain_info.fork_id, 256),
            uint(a.chain_info.chain_id, 256),
        ]),
        uint(U256::from(a.kind.as_u8()), 8),
        DynSolValue::Address(a.account),
        DynSolValue::Address(a.accessor),
        DynSolValue::Bool(a.initialized),
        uint(a.old_balance, 256),
        uint(a.new_balance, 256),
        DynSolValue::Bytes(a.deployed_code.clone()),
        uint(a.value, 256),
        DynSolValue::Bytes(a.data.clone()),
        DynSolValue::Bool(a.reverted),
        DynSolValue::Array(a.storage_accesses.iter().map(storage_access).collect()),
        uint(U256::from(a.depth), 64),
        uint(U256::from(a.old_nonce), 64),
        uint(U256::from(a.new_nonce), 64),
    ])
}

fn contract_override(o: &ContractOverride) -> DynSolValue {
    DynSolValue::Tuple(vec![
        DynSolValue::Address(o.contract),
        DynSolValue::Array(
            o.slots
                .iter()
                .map(|s| DynSolValue::Tuple(vec![word(s.key), word(s.value)]))
                .collect(),
        ),
    ])
}

/// Encoder for the three tuple-encoded trace blobs.
#[derive(Debug, Default, Clone, Copy)]
pub struct TraceEncoder;

impl TraceEncoder {
    pub fn new() -> Self {
        Self
    }

    pub fn encode_account_accesses(&self, accesses: &[AccountAccess]) -> Vec<u8> {
        DynSolValue::Array(accesses.iter().map(account_access).collect()).abi_encode()
    }

    pub fn encode_preimages(&self, entries: &[PreimageEntry]) -> Vec<u8> {
        DynSolValue::Array(
            entries
                .iter()
                .map(|e| DynSolValue::Tuple(vec![word(e.slot), word(e.parent), word(e.key)]))
                .collect(),
        )
        .abi_encode()
    }

    pub fn encode_overrides(&self, payload: &OverridePayload) -> Vec<u8> {
        DynSolValue::Tuple(vec![
            DynSolValue::Address(payload.from),
            DynSolValue::Address(payload.to),
            DynSolValue::Bytes(payload.data.clone()),
            DynSolValue::Array(payload.state_overrides.iter().map(contract_override).collect()),
        ])
        .abi_encode()
    }

    /// `0x`-prefixed hex of any encoded blob.
    pub fn to_hex(bytes: &[u8]) -> String {
        format!("0x{}", hex::encode(bytes))
    }
}
