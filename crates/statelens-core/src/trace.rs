//! Typed records decoded from a simulator trace.

use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What kind of frame an `AccountAccess` record describes.
///
/// Discriminants follow the simulator's `uint8` encoding. Values the
/// simulator may add later decode as `Unknown` and are treated like any
/// other balance-moving frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountAccessKind {
    Call,
    DelegateCall,
    CallCode,
    StaticCall,
    Create,
    SelfDestruct,
    /// Synthetic record emitted when a frame resumes after a sub-call.
    /// Bookkeeping only, never a reviewable balance movement.
    Resume,
    Balance,
    Extcodesize,
    Extcodehash,
    Extcodecopy,
    Unknown(u8),
}

impl AccountAccessKind {
    pub fn as_u8(self) -> u8 {
        match self {
            AccountAccessKind::Call => 0,
            AccountAccessKind::DelegateCall => 1,
            AccountAccessKind::CallCode => 2,
            AccountAccessKind::StaticCall => 3,
            AccountAccessKind::Create => 4,
            AccountAccessKind::SelfDestruct => 5,
            AccountAccessKind::Resume => 6,
            AccountAccessKind::Balance => 7,
            AccountAccessKind::Extcodesize => 8,
            AccountAccessKind::Extcodehash => 9,
            AccountAccessKind::Extcodecopy => 10,
            AccountAccessKind::Unknown(v) => v,
        }
    }

    /// Whether balance deltas on this kind are skipped during reconciliation.
    pub fn is_value_only(self) -> bool {
        matches!(self, AccountAccessKind::Resume)
    }
}

impl From<u8> for AccountAccessKind {
    fn from(v: u8) -> Self {
        match v {
            0 => AccountAccessKind::Call,
            1 => AccountAccessKind::DelegateCall,
            2 => AccountAccessKind::CallCode,
            3 => AccountAccessKind::StaticCall,
            4 => AccountAccessKind::Create,
            5 => AccountAccessKind::SelfDestruct,
            6 => AccountAccessKind::Resume,
            7 => AccountAccessKind::Balance,
            8 => AccountAccessKind::Extcodesize,
            9 => AccountAccessKind::Extcodehash,
            10 => AccountAccessKind::Extcodecopy,
            other => AccountAccessKind::Unknown(other),
        }
    }
}

impl fmt::Display for AccountAccessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountAccessKind::Call => write!(f, "call"),
            AccountAccessKind::DelegateCall => write!(f, "delegatecall"),
            AccountAccessKind::CallCode => write!(f, "callcode"),
            AccountAccessKind::StaticCall => write!(f, "staticcall"),
            AccountAccessKind::Create => write!(f, "create"),
            AccountAccessKind::SelfDestruct => write!(f, "selfdestruct"),
            AccountAccessKind::Resume => write!(f, "resume"),
            AccountAccessKind::Balance => write!(f, "balance"),
            AccountAccessKind::Extcodesize => write!(f, "extcodesize"),
            AccountAccessKind::Extcodehash => write!(f, "extcodehash"),
            AccountAccessKind::Extcodecopy => write!(f, "extcodecopy"),
            AccountAccessKind::Unknown(v) => write!(f, "unknown({v})"),
        }
    }
}

/// Fork and chain the access was recorded on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainInfo {
    pub fork_id: U256,
    pub chain_id: U256,
}

/// A single storage slot touch inside a call frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageAccess {
    /// Account whose storage was touched (the proxy, for delegatecalls)
    pub account: Address,
    pub slot: B256,
    pub is_write: bool,
    pub previous_value: B256,
    pub new_value: B256,
    pub reverted: bool,
}

/// One call frame of the trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountAccess {
    pub chain_info: ChainInfo,
    pub kind: AccountAccessKind,
    pub account: Address,
    pub accessor: Address,
    pub initialized: bool,
    pub old_balance: U256,
    pub new_balance: U256,
    pub deployed_code: Vec<u8>,
    pub value: U256,
    pub data: Vec<u8>,
    pub reverted: bool,
    pub storage_accesses: Vec<StorageAccess>,
    pub depth: u64,
    pub old_nonce: u64,
    pub new_nonce: u64,
}

/// `slot` was derived from `parent` and `key` (e.g. a mapping entry).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreimageEntry {
    pub slot: B256,
    pub parent: B256,
    pub key: B256,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverrideSlot {
    pub key: B256,
    pub value: B256,
}

/// Storage values forced on one contract before simulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractOverride {
    pub contract: Address,
    pub slots: Vec<OverrideSlot>,
}

/// The call that was simulated, plus the overrides applied to make it
/// representative of on-chain execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverridePayload {
    pub from: Address,
    pub to: Address,
    pub data: Vec<u8>,
    pub state_overrides: Vec<ContractOverride>,
}
