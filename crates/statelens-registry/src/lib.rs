//! # statelens-registry
//!
//! Slot metadata for statelens.
//!
//! ## Pieces
//! 1. **Layout documents**: YAML files mapping chain → contract → slots,
//!    with shared named layouts contracts can reference instead of inlining
//! 2. **`SlotRegistry`**: the immutable, resolved view built once per process
//!    and shared by reference with every transform run
//! 3. **Preimage resolver**: walks derived slots back to a described ancestor

pub mod layout;
pub mod memory;
pub mod preimage;

pub use layout::{LayoutDocument, SlotSource};
pub use memory::{RegistryBuilder, SlotRegistry};
pub use preimage::{resolve_slot, ParentMap, MAX_PREIMAGE_HOPS};
