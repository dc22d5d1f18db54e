//! # statelens-observability
//!
//! Logging setup shared by statelens binaries.
//!
//! Library crates only emit `tracing` events; installing a subscriber is
//! left to the process entry point via [`init_tracing`]. Text or JSON
//! output, with levels configurable per crate.

pub mod tracing_setup;

pub use tracing_setup::{init_tracing, LogConfig};
