//! # statelens-evm
//!
//! Decoders for the binary blobs a contract-execution simulator hands over.
//!
//! ## Implementation notes
//! - Uses `alloy-core`'s dynamic ABI types; every schema is fixed and built
//!   in [`schema`], never derived from the input
//! - Blobs are `abi.encode`d single values, so dynamic values carry a head
//!   offset before their body
//! - The signing payload is not ABI: it is `0x1901 ‖ domain ‖ message`,
//!   length-checked in [`eip712`]

pub mod decoder;
pub mod eip712;
pub mod encoder;
pub mod normalizer;
pub mod schema;

pub use decoder::TraceDecoder;
pub use eip712::SigningPayload;
pub use encoder::TraceEncoder;
