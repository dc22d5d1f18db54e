//! # statelens-core
//!
//! Shared records and primitives for the statelens state-diff pipeline.
//! The decoder, registry and engine crates all speak the types defined here:
//! raw trace records on the way in, reviewable diff entries on the way out.

pub mod descriptor;
pub mod error;
pub mod input;
pub mod output;
pub mod primitives;
pub mod trace;

pub use descriptor::{ContractDescriptor, SlotDescriptor};
pub use error::{BalanceError, DecodeError, RegistryError, TransformError};
pub use input::SimulationTrace;
pub use output::{
    BalanceChange, ExpectedHashes, OverrideEntry, StateChange, StateChangeEntry, StateOverride,
    TransformResult,
};
pub use trace::{
    AccountAccess, AccountAccessKind, ChainInfo, ContractOverride, OverridePayload, OverrideSlot,
    PreimageEntry, StorageAccess,
};
