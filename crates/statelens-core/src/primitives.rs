//! Canonical textual forms for addresses, slots and storage words.
//!
//! Addresses are compared as bytes (so any hex casing is the same key) and
//! always rendered as EIP-55 checksum strings. Slots and storage words are
//! rendered as lowercase, left-zero-padded 32-byte hex.

use alloy_primitives::{Address, B256};
use std::str::FromStr;

/// Parse a hex address in any casing.
pub fn parse_address(s: &str) -> Result<Address, String> {
    let trimmed = s.trim();
    let body = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    if body.len() != 40 {
        return Err(format!("expected 40 hex digits, got {}", body.len()));
    }
    Address::from_str(body).map_err(|e| e.to_string())
}

/// EIP-55 checksum form used for every address in output.
pub fn checksum(address: &Address) -> String {
    address.to_checksum(None)
}

/// Parse a slot or storage word, left-padding short forms to 32 bytes.
///
/// `0x9`, `0x09` and `0x00…09` all yield the same word.
pub fn parse_word(s: &str) -> Result<B256, String> {
    let trimmed = s.trim();
    let body = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    if body.is_empty() {
        return Err("empty word".into());
    }
    if body.len() > 64 {
        return Err(format!("word longer than 32 bytes ({} hex digits)", body.len()));
    }
    let padded = format!("{:0>64}", body.to_ascii_lowercase());
    let mut out = [0u8; 32];
    hex::decode_to_slice(&padded, &mut out).map_err(|e| e.to_string())?;
    Ok(B256::from(out))
}

/// Lowercase `0x`-prefixed 64-digit form of a slot or storage word.
pub fn word_hex(word: &B256) -> String {
    format!("0x{}", hex::encode(word.as_slice()))
}

/// Normalize any textual word to its canonical 32-byte form.
pub fn normalize_word(s: &str) -> Result<String, String> {
    parse_word(s).map(|w| word_hex(&w))
}

/// Decode a hex string with an optional `0x` prefix.
pub fn decode_hex(s: &str) -> Result<Vec<u8>, hex::FromHexError> {
    let trimmed = s.trim();
    hex::decode(trimmed.strip_prefix("0x").unwrap_or(trimmed))
}
