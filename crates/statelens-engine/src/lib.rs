//! # statelens-engine
//!
//! Turns one simulator trace into a deterministic review artifact.
//!
//! ## Pipeline
//! 1. Decode the three ABI blobs (in parallel via Rayon by default) and the
//!    signing payload
//! 2. **Diff builder**: collapse storage writes to one before/after per slot,
//!    then drop no-ops
//! 3. **Balance accountant**: net native balance movement per account, with
//!    a non-negative pre-transaction balance enforced
//! 4. **Assembler**: attach registry names and slot descriptions, sort
//!
//! ## Usage
//! ```no_run
//! use std::sync::Arc;
//! use statelens_core::SimulationTrace;
//! use statelens_engine::{Engine, EngineConfig};
//! use statelens_registry::SlotRegistry;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = Arc::new(SlotRegistry::load_directory("./registry".as_ref())?);
//! let engine = Engine::new(registry, EngineConfig::default());
//! let trace = SimulationTrace::from_file("./trace.json".as_ref())?;
//! let result = engine.transform(&trace, 1)?;
//! println!("{}", result.to_canonical_json()?);
//! # Ok(())
//! # }
//! ```

pub mod assembler;
pub mod balance;
pub mod diff;
pub mod engine;

pub use assembler::Assembler;
pub use balance::{reconcile_balances, NetBalance};
pub use diff::{build_state_diff, StateDiff, WordChange};
pub use engine::{Engine, EngineConfig};
