//! Converts decoded alloy `DynSolValue` trees into typed statelens records.
//!
//! The schema already pins every field's type, so a mismatch here means the
//! decoded tree does not fit the schema. That is reported as malformed
//! encoding rather than a panic.

use alloy_core::dyn_abi::DynSolValue;
use alloy_primitives::{Address, B256, U256};
use statelens_core::{
    error::DecodeError,
    trace::{
        AccountAccess, ChainInfo, ContractOverride, OverridePayload, OverrideSlot, PreimageEntry,
        StorageAccess,
    },
};

use crate::schema::{ACCOUNT_ACCESS_ARITY, STORAGE_ACCESS_ARITY};

/// Positional reader over one decoded tuple.
struct Fields<'a> {
    what: &'static str,
    values: &'a [DynSolValue],
}

impl<'a> Fields<'a> {
    fn of(what: &'static str, val: &'a DynSolValue, arity: usize) -> Result<Self, DecodeError> {
        match val {
            DynSolValue::Tuple(values) if values.len() == arity => Ok(Self { what, values }),
            DynSolValue::Tuple(values) => Err(DecodeError::malformed(
                what,
                format!("expected {arity} tuple fields, got {}", values.len()),
            )),
            other => Err(mismatch(what, "tuple", other)),
        }
    }

    fn get(&self, idx: usize) -> &'a DynSolValue {
        &self.values[idx]
    }

    fn address(&self, idx: usize) -> Result<Address, DecodeError> {
        match self.get(idx) {
            DynSolValue::Address(a) => Ok(*a),
            other => Err(mismatch(self.what, "address", other)),
        }
    }

    fn word(&self, idx: usize) -> Result<B256, DecodeError> {
        match self.get(idx) {
            DynSolValue::FixedBytes(w, 32) => Ok(*w),
            other => Err(mismatch(self.what, "bytes32", other)),
        }
    }

    fn uint(&self, idx: usize) -> Result<U256, DecodeError> {
        match self.get(idx) {
            DynSolValue::Uint(u, _) => Ok(*u),
            other => Err(mismatch(self.what, "uint", other)),
        }
    }

    fn u64(&self, idx: usize) -> Result<u64, DecodeError> {
        let u = self.uint(idx)?;
        u64::try_from(u).map_err(|_| DecodeError::malformed(self.what, format!("{u} exceeds uint64")))
    }

    fn u8(&self, idx: usize) -> Result<u8, DecodeError> {
        let u = self.uint(idx)?;
        u8::try_from(u).map_err(|_| DecodeError::malformed(self.what, format!("{u} exceeds uint8")))
    }

    fn boolean(&self, idx: usize) -> Result<bool, DecodeError> {
        match self.get(idx) {
            DynSolValue::Bool(b) => Ok(*b),
            other => Err(mismatch(self.what, "bool", other)),
        }
    }

    fn bytes(&self, idx: usize) -> Result<Vec<u8>, DecodeError> {
        match self.get(idx) {
            DynSolValue::Bytes(b) => Ok(b.clone()),
            other => Err(mismatch(self.what, "bytes", other)),
        }
    }

    fn array(&self, idx: usize) -> Result<&'a [DynSolValue], DecodeError> {
        array(self.what, self.get(idx))
    }
}

fn mismatch(what: &'static str, expected: &str, got: &DynSolValue) -> DecodeError {
    let got = got
        .sol_type_name()
        .map(|n| n.into_owned())
        .unwrap_or_else(|| "unknown".into());
    DecodeError::malformed(what, format!("expected {expected}, got {got}"))
}

/// Borrow the elements of a dynamic array value.
pub(crate) fn array<'a>(
    what: &'static str,
    val: &'a DynSolValue,
) -> Result<&'a [DynSolValue], DecodeError> {
    match val {
        DynSolValue::Array(items) => Ok(items),
        other => Err(mismatch(what, "array", other)),
    }
}

pub fn storage_access(val: &DynSolValue) -> Result<StorageAccess, DecodeError> {
    let f = Fields::of("storage access", val, STORAGE_ACCESS_ARITY)?;
    Ok(StorageAccess {
        account: f.address(0)?,
        slot: f.word(1)?,
        is_write: f.boolean(2)?,
        previous_value: f.word(3)?,
        new_value: f.word(4)?,
        reverted: f.boolean(5)?,
    })
}

pub fn account_access(val: &DynSolValue) -> Result<AccountAccess, DecodeError> {
    let f = Fields::of("account access", val, ACCOUNT_ACCESS_ARITY)?;

    let info = Fields::of("chain info", f.get(0), 2)?;
    let chain_info = ChainInfo {
        fork_id: info.uint(0)?,
        chain_id: info.uint(1)?,
    };

    let storage_accesses = f
        .array(11)?
        .iter()
        .map(storage_access)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(AccountAccess {
        chain_info,
        kind: f.u8(1)?.into(),
        account: f.address(2)?,
        accessor: f.address(3)?,
        initialized: f.boolean(4)?,
        old_balance: f.uint(5)?,
        new_balance: f.uint(6)?,
        deployed_code: f.bytes(7)?,
        value: f.uint(8)?,
        data: f.bytes(9)?,
        reverted: f.boolean(10)?,
        storage_accesses,
        depth: f.u64(12)?,
        old_nonce: f.u64(13)?,
        new_nonce: f.u64(14)?,
    })
}

pub fn preimage_entry(val: &DynSolValue) -> Result<PreimageEntry, DecodeError> {
    let f = Fields::of("preimage", val, 3)?;
    Ok(PreimageEntry {
        slot: f.word(0)?,
        parent: f.word(1)?,
        key: f.word(2)?,
    })
}

fn contract_override(val: &DynSolValue) -> Result<ContractOverride, DecodeError> {
    let f = Fields::of("state override", val, 2)?;
    let slots = f
        .array(1)?
        .iter()
        .map(|pair| {
            let kv = Fields::of("override slot", pair, 2)?;
            Ok(OverrideSlot {
                key: kv.word(0)?,
                value: kv.word(1)?,
            })
        })
        .collect::<Result<Vec<_>, DecodeError>>()?;
    Ok(ContractOverride {
        contract: f.address(0)?,
        slots,
    })
}

pub fn override_payload(val: &DynSolValue) -> Result<OverridePayload, DecodeError> {
    let f = Fields::of("overrides", val, 4)?;
    let state_overrides = f
        .array(3)?
        .iter()
        .map(contract_override)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(OverridePayload {
        from: f.address(0)?,
        to: f.address(1)?,
        data: f.bytes(2)?,
        state_overrides,
    })
}
