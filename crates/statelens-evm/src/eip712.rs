//! EIP-712 signing payload handling.
//!
//! The simulator reports the exact bytes the signer will hash:
//! `0x19 0x01 ‖ domainSeparator ‖ structHash`. This is not ABI encoded; it
//! is a fixed 66-byte string that splits into the two hashes a reviewer
//! compares against the hardware wallet's display.
//!
//! # Reference
//! <https://eips.ethereum.org/EIPS/eip-712>

use alloy_primitives::{Address, B256};
use statelens_core::{error::DecodeError, output::ExpectedHashes, primitives};

/// EIP-191 version byte pair for structured data.
pub const VERSION_MARKER: [u8; 2] = [0x19, 0x01];

/// Marker plus two 32-byte hashes.
pub const PAYLOAD_LEN: usize = 2 + 32 + 32;

/// The two hashes extracted from `dataToSign`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SigningPayload {
    pub domain_hash: B256,
    pub message_hash: B256,
}

impl SigningPayload {
    pub fn new(domain_hash: B256, message_hash: B256) -> Self {
        Self {
            domain_hash,
            message_hash,
        }
    }

    /// Parse a `0x`-prefixed `dataToSign` string.
    ///
    /// # Errors
    /// `SigningPayloadFormat` if the prefix, hex, marker or length is wrong.
    pub fn parse(data_to_sign: &str) -> Result<Self, DecodeError> {
        let body = data_to_sign
            .strip_prefix("0x")
            .ok_or_else(|| DecodeError::signing("missing 0x prefix"))?;
        let bytes =
            hex::decode(body).map_err(|e| DecodeError::signing(format!("invalid hex: {e}")))?;
        Self::from_bytes(&bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        if bytes.len() != PAYLOAD_LEN {
            return Err(DecodeError::signing(format!(
                "expected {PAYLOAD_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        let (marker, hashes) = bytes.split_at(2);
        if marker != VERSION_MARKER.as_slice() {
            return Err(DecodeError::signing(format!(
                "unexpected version marker 0x{}",
                hex::encode(marker)
            )));
        }
        let (domain, message) = hashes.split_at(32);
        Ok(Self {
            domain_hash: B256::from_slice(domain),
            message_hash: B256::from_slice(message),
        })
    }

    /// The raw 66 payload bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(PAYLOAD_LEN);
        out.extend_from_slice(&VERSION_MARKER);
        out.extend_from_slice(self.domain_hash.as_slice());
        out.extend_from_slice(self.message_hash.as_slice());
        out
    }

    /// `0x`-prefixed hex form, as the simulator writes it.
    pub fn encode(&self) -> String {
        format!("0x{}", hex::encode(self.to_bytes()))
    }

    /// keccak256 over the payload: the digest the signer actually signs.
    pub fn digest(&self) -> B256 {
        B256::from(keccak256(&self.to_bytes()))
    }

    /// Attach the signing account to produce the output record.
    pub fn expected_hashes(&self, signer: &Address) -> ExpectedHashes {
        ExpectedHashes {
            address: primitives::checksum(signer),
            domain_hash: primitives::word_hex(&self.domain_hash),
            message_hash: primitives::word_hex(&self.message_hash),
        }
    }
}

fn keccak256(data: &[u8]) -> [u8; 32] {
    use tiny_keccak::{Hasher, Keccak};
    let mut k = Keccak::v256();
    k.update(data);
    let mut out = [0u8; 32];
    k.finalize(&mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SigningPayload {
        SigningPayload::new(B256::repeat_byte(0xaa), B256::repeat_byte(0xbb))
    }

    #[test]
    fn roundtrip_reproduces_hashes() {
        let encoded = sample().encode();
        assert!(encoded.starts_with("0x1901aaaa"));
        assert_eq!(SigningPayload::parse(&encoded).unwrap(), sample());
    }

    #[test]
    fn off_by_one_lengths_rejected() {
        let mut short = sample().to_bytes();
        short.pop();
        let mut long = sample().to_bytes();
        long.push(0);
        for bytes in [short, long] {
            let s = format!("0x{}", hex::encode(bytes));
            assert!(matches!(
                SigningPayload::parse(&s),
                Err(DecodeError::SigningPayloadFormat { .. })
            ));
        }
    }

    #[test]
    fn missing_prefix_rejected() {
        let encoded = sample().encode();
        let err = SigningPayload::parse(&encoded[2..]).unwrap_err();
        assert!(matches!(err, DecodeError::SigningPayloadFormat { .. }));
    }

    #[test]
    fn wrong_marker_rejected() {
        let mut bytes = sample().to_bytes();
        bytes[1] = 0x00;
        assert!(SigningPayload::from_bytes(&bytes).is_err());
    }

    #[test]
    fn expected_hashes_are_lowercase_words() {
        let addr: Address = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045".parse().unwrap();
        let hashes = sample().expected_hashes(&addr);
        assert_eq!(hashes.address, "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045");
        assert_eq!(hashes.domain_hash, format!("0x{}", "aa".repeat(32)));
        assert_eq!(hashes.message_hash, format!("0x{}", "bb".repeat(32)));
    }

    #[test]
    fn digest_is_keccak_of_payload() {
        let d1 = sample().digest();
        let d2 = SigningPayload::new(B256::repeat_byte(0xaa), B256::repeat_byte(0xbc)).digest();
        assert_ne!(d1, d2);
        assert_eq!(d1, sample().digest());
    }
}
