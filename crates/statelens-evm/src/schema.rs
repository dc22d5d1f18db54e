//! Static tuple schemas of the simulator's encodings.

use alloy_core::dyn_abi::DynSolType;

/// Field count of one `AccountAccess` tuple.
pub const ACCOUNT_ACCESS_ARITY: usize = 15;
/// Field count of one `StorageAccess` tuple.
pub const STORAGE_ACCESS_ARITY: usize = 6;

fn word() -> DynSolType {
    DynSolType::FixedBytes(32)
}

/// `(uint256 forkId, uint256 chainId)`
pub fn chain_info() -> DynSolType {
    DynSolType::Tuple(vec![DynSolType::Uint(256), DynSolType::Uint(256)])
}

/// `(address account, bytes32 slot, bool isWrite, bytes32 previousValue,
/// bytes32 newValue, bool reverted)`
pub fn storage_access() -> DynSolType {
    DynSolType::Tuple(vec![
        DynSolType::Address,
        word(),
        DynSolType::Bool,
        word(),
        word(),
        DynSolType::Bool,
    ])
}

/// One call frame; see [`ACCOUNT_ACCESS_ARITY`] for the field count.
pub fn account_access() -> DynSolType {
    DynSolType::Tuple(vec![
        chain_info(),
        DynSolType::Uint(8),   // kind
        DynSolType::Address,   // account
        DynSolType::Address,   // accessor
        DynSolType::Bool,      // initialized
        DynSolType::Uint(256), // oldBalance
        DynSolType::Uint(256), // newBalance
        DynSolType::Bytes,     // deployedCode
        DynSolType::Uint(256), // value
        DynSolType::Bytes,     // data
        DynSolType::Bool,      // reverted
        DynSolType::Array(Box::new(storage_access())),
        DynSolType::Uint(64), // depth
        DynSolType::Uint(64), // oldNonce
        DynSolType::Uint(64), // newNonce
    ])
}

/// `AccountAccess[]`
pub fn account_accesses() -> DynSolType {
    DynSolType::Array(Box::new(account_access()))
}

/// `(bytes32 slot, bytes32 parent, bytes32 key)[]`
pub fn preimages() -> DynSolType {
    DynSolType::Array(Box::new(DynSolType::Tuple(vec![word(), word(), word()])))
}

/// `(address, (bytes32 key, bytes32 value)[])`
pub fn contract_override() -> DynSolType {
    DynSolType::Tuple(vec![
        DynSolType::Address,
        DynSolType::Array(Box::new(DynSolType::Tuple(vec![word(), word()]))),
    ])
}

/// `(address from, address to, bytes data, (address, (bytes32,bytes32)[])[] stateOverrides)`
pub fn override_payload() -> DynSolType {
    DynSolType::Tuple(vec![
        DynSolType::Address,
        DynSolType::Address,
        DynSolType::Bytes,
        DynSolType::Array(Box::new(contract_override())),
    ])
}
