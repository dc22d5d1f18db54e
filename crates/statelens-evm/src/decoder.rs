//! `TraceDecoder`: turns the simulator's hex blobs into typed records.

use alloy_core::dyn_abi::{DynSolType, DynSolValue};
use statelens_core::{
    error::DecodeError,
    primitives::decode_hex,
    trace::{AccountAccess, OverridePayload, PreimageEntry},
};
use tracing::debug;

use crate::{normalizer, schema};

/// Stateless decoder for the three tuple-encoded trace blobs.
/// Thread-safe, cheap to clone (no heap state).
#[derive(Debug, Default, Clone, Copy)]
pub struct TraceDecoder;

impl TraceDecoder {
    pub fn new() -> Self {
        Self
    }

    /// ABI-decode `raw` against `ty`. Any length or offset inconsistency is
    /// reported as `MalformedEncoding`; nothing partial is returned.
    ///
    /// The decoded value must re-encode to exactly `raw`: trailing bytes,
    /// dirty padding and non-0/1 bool words are all rejected.
    fn decode_raw(
        &self,
        what: &'static str,
        raw: &[u8],
        ty: &DynSolType,
    ) -> Result<DynSolValue, DecodeError> {
        if raw.is_empty() {
            return Err(DecodeError::malformed(what, "empty input"));
        }
        let value = ty
            .abi_decode(raw)
            .map_err(|e| DecodeError::malformed(what, e.to_string()))?;
        if value.abi_encode() != raw {
            return Err(DecodeError::malformed(what, "trailing or non-canonical bytes"));
        }
        Ok(value)
    }

    fn hex_input(&self, what: &'static str, hex_str: &str) -> Result<Vec<u8>, DecodeError> {
        decode_hex(hex_str).map_err(|e| DecodeError::malformed(what, format!("invalid hex: {e}")))
    }

    /// Decode `(from, to, data, stateOverrides[])`.
    pub fn decode_overrides(&self, raw: &[u8]) -> Result<OverridePayload, DecodeError> {
        let value = self.decode_raw("overrides", raw, &schema::override_payload())?;
        let payload = normalizer::override_payload(&value)?;
        debug!(
            contracts = payload.state_overrides.len(),
            "decoded override payload"
        );
        Ok(payload)
    }

    /// Decode the `AccountAccess[]` trace, preserving call order.
    pub fn decode_account_accesses(&self, raw: &[u8]) -> Result<Vec<AccountAccess>, DecodeError> {
        let value = self.decode_raw("state diff", raw, &schema::account_accesses())?;
        let accesses = normalizer::array("state diff", &value)?
            .iter()
            .map(normalizer::account_access)
            .collect::<Result<Vec<_>, _>>()?;
        debug!(frames = accesses.len(), "decoded account accesses");
        Ok(accesses)
    }

    /// Decode the `(slot, parent, key)[]` preimage table.
    pub fn decode_preimages(&self, raw: &[u8]) -> Result<Vec<PreimageEntry>, DecodeError> {
        let value = self.decode_raw("preimages", raw, &schema::preimages())?;
        let entries = normalizer::array("preimages", &value)?
            .iter()
            .map(normalizer::preimage_entry)
            .collect::<Result<Vec<_>, _>>()?;
        debug!(entries = entries.len(), "decoded preimage table");
        Ok(entries)
    }

    pub fn decode_overrides_hex(&self, hex_str: &str) -> Result<OverridePayload, DecodeError> {
        self.decode_overrides(&self.hex_input("overrides", hex_str)?)
    }

    pub fn decode_account_accesses_hex(
        &self,
        hex_str: &str,
    ) -> Result<Vec<AccountAccess>, DecodeError> {
        self.decode_account_accesses(&self.hex_input("state diff", hex_str)?)
    }

    pub fn decode_preimages_hex(&self, hex_str: &str) -> Result<Vec<PreimageEntry>, DecodeError> {
        self.decode_preimages(&self.hex_input("preimages", hex_str)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::B256;

    fn preimage_blob() -> Vec<u8> {
        let entry = DynSolValue::Tuple(vec![
            DynSolValue::FixedBytes(B256::with_last_byte(0xa), 32),
            DynSolValue::FixedBytes(B256::with_last_byte(0xb), 32),
            DynSolValue::FixedBytes(B256::with_last_byte(0xc), 32),
        ]);
        DynSolValue::Array(vec![entry]).abi_encode()
    }

    #[test]
    fn decodes_preimage_table() {
        let entries = TraceDecoder::new().decode_preimages(&preimage_blob()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].slot, B256::with_last_byte(0xa));
        assert_eq!(entries[0].key, B256::with_last_byte(0xc));
    }

    #[test]
    fn decoding_is_deterministic() {
        let blob = preimage_blob();
        let dec = TraceDecoder::new();
        assert_eq!(dec.decode_preimages(&blob).unwrap(), dec.decode_preimages(&blob).unwrap());
    }

    #[test]
    fn truncated_blob_is_malformed() {
        let mut blob = preimage_blob();
        blob.truncate(blob.len() - 16);
        let err = TraceDecoder::new().decode_preimages(&blob).unwrap_err();
        assert!(matches!(err, DecodeError::MalformedEncoding { what: "preimages", .. }));
    }

    #[test]
    fn trailing_bytes_are_malformed() {
        let mut blob = preimage_blob();
        blob.extend_from_slice(&[0xff; 64]);
        let err = TraceDecoder::new().decode_preimages(&blob).unwrap_err();
        assert!(matches!(err, DecodeError::MalformedEncoding { what: "preimages", .. }));
    }

    #[test]
    fn empty_and_bad_hex_are_malformed() {
        let dec = TraceDecoder::new();
        assert!(matches!(
            dec.decode_preimages_hex("0x"),
            Err(DecodeError::MalformedEncoding { .. })
        ));
        assert!(matches!(
            dec.decode_preimages_hex("0xnothex"),
            Err(DecodeError::MalformedEncoding { .. })
        ));
    }

    #[test]
    fn empty_array_decodes_to_no_entries() {
        let blob = DynSolValue::Array(vec![]).abi_encode();
        assert!(TraceDecoder::new().decode_preimages(&blob).unwrap().is_empty());
    }
}
