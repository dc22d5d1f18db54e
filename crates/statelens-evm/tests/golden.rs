//! Decoding of hand-built simulator blobs.
//!
//! Each blob is produced directly with `alloy-dyn-abi`, the way the
//! simulator's `abi.encode` would lay it out, then decoded through the
//! public `TraceDecoder` API.

use alloy_dyn_abi::DynSolValue;
use alloy_primitives::{address, Address, B256, U256};
use statelens_core::{error::DecodeError, trace::AccountAccessKind};
use statelens_evm::{TraceDecoder, TraceEncoder};

const SAFE: Address = address!("0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045");
const PROXY: Address = address!("0xab5801a7d398351b8be11c439e05c5b3259aec9b");

// ─── Helpers ──────────────────────────────────────────────────────────────────

fn word(b: u8) -> DynSolValue {
    DynSolValue::FixedBytes(B256::with_last_byte(b), 32)
}

fn storage_write(slot: u8, before: u8, after: u8) -> DynSolValue {
    DynSolValue::Tuple(vec![
        DynSolValue::Address(PROXY),
        word(slot),
        DynSolValue::Bool(true),
        word(before),
        word(after),
        DynSolValue::Bool(false),
    ])
}

fn frame(kind: u8, old_balance: u64, new_balance: u64, storage: Vec<DynSolValue>) -> DynSolValue {
    DynSolValue::Tuple(vec![
        DynSolValue::Tuple(vec![
            DynSolValue::Uint(U256::ZERO, 256),
            DynSolValue::Uint(U256::from(1u64), 256),
        ]),
        DynSolValue::Uint(U256::from(kind), 8),
        DynSolValue::Address(PROXY),
        DynSolValue::Address(SAFE),
        DynSolValue::Bool(true),
        DynSolValue::Uint(U256::from(old_balance), 256),
        DynSolValue::Uint(U256::from(new_balance), 256),
        DynSolValue::Bytes(vec![]),
        DynSolValue::Uint(U256::from(new_balance.saturating_sub(old_balance)), 256),
        DynSolValue::Bytes(vec![0xde, 0xad, 0xbe, 0xef]),
        DynSolValue::Bool(false),
        DynSolValue::Array(storage),
        DynSolValue::Uint(U256::from(1u64), 64),
        DynSolValue::Uint(U256::from(7u64), 64),
        DynSolValue::Uint(U256::from(8u64), 64),
    ])
}

// ─── Account accesses ─────────────────────────────────────────────────────────

#[test]
fn account_access_trace_golden() {
    let blob = DynSolValue::Array(vec![
        frame(0, 0, 100, vec![storage_write(4, 0, 1), storage_write(5, 2, 2)]),
        frame(6, 0, 0, vec![]),
    ])
    .abi_encode();

    let accesses = TraceDecoder::new().decode_account_accesses(&blob).unwrap();
    assert_eq!(accesses.len(), 2);

    let first = &accesses[0];
    assert_eq!(first.kind, AccountAccessKind::Call);
    assert_eq!(first.account, PROXY);
    assert_eq!(first.accessor, SAFE);
    assert_eq!(first.new_balance, U256::from(100u64));
    assert_eq!(first.chain_info.chain_id, U256::from(1u64));
    assert_eq!(first.data, vec![0xde, 0xad, 0xbe, 0xef]);
    assert_eq!((first.old_nonce, first.new_nonce), (7, 8));
    assert_eq!(first.storage_accesses.len(), 2);
    assert_eq!(first.storage_accesses[0].slot, B256::with_last_byte(4));
    assert_eq!(first.storage_accesses[0].new_value, B256::with_last_byte(1));
    assert!(first.storage_accesses[1].is_write);

    assert_eq!(accesses[1].kind, AccountAccessKind::Resume);
    assert!(accesses[1].storage_accesses.is_empty());
}

#[test]
fn unknown_kind_survives_decoding() {
    let blob = DynSolValue::Array(vec![frame(42, 1, 2, vec![])]).abi_encode();
    let accesses = TraceDecoder::new().decode_account_accesses(&blob).unwrap();
    assert_eq!(accesses[0].kind, AccountAccessKind::Unknown(42));
}

#[test]
fn corrupted_offset_is_malformed() {
    let mut blob = DynSolValue::Array(vec![frame(0, 0, 1, vec![storage_write(1, 0, 1)])])
        .abi_encode();
    // Point the outer array head far past the end of the buffer.
    blob[..32].copy_from_slice(B256::repeat_byte(0x7f).as_slice());
    let err = TraceDecoder::new().decode_account_accesses(&blob).unwrap_err();
    assert!(matches!(err, DecodeError::MalformedEncoding { what: "state diff", .. }));
}

#[test]
fn trailing_junk_after_trace_is_malformed() {
    let mut blob = DynSolValue::Array(vec![frame(0, 0, 1, vec![storage_write(1, 0, 1)])])
        .abi_encode();
    blob.extend_from_slice(&[0xff; 64]);
    let err = TraceDecoder::new().decode_account_accesses(&blob).unwrap_err();
    assert!(matches!(err, DecodeError::MalformedEncoding { what: "state diff", .. }));
}

// ─── Overrides ────────────────────────────────────────────────────────────────

#[test]
fn override_payload_golden() {
    let blob = DynSolValue::Tuple(vec![
        DynSolValue::Address(SAFE),
        DynSolValue::Address(PROXY),
        DynSolValue::Bytes(vec![0x12, 0x34]),
        DynSolValue::Array(vec![DynSolValue::Tuple(vec![
            DynSolValue::Address(SAFE),
            DynSolValue::Array(vec![
                DynSolValue::Tuple(vec![word(4), word(1)]),
                DynSolValue::Tuple(vec![word(3), word(9)]),
            ]),
        ])]),
    ])
    .abi_encode();

    let hex = TraceEncoder::to_hex(&blob);
    let payload = TraceDecoder::new().decode_overrides_hex(&hex).unwrap();
    assert_eq!(payload.from, SAFE);
    assert_eq!(payload.to, PROXY);
    assert_eq!(payload.data, vec![0x12, 0x34]);
    assert_eq!(payload.state_overrides.len(), 1);
    let slots = &payload.state_overrides[0].slots;
    assert_eq!(slots.len(), 2);
    assert_eq!(slots[1].key, B256::with_last_byte(3));
    assert_eq!(slots[1].value, B256::with_last_byte(9));
}

#[test]
fn dirty_address_padding_is_malformed() {
    let mut blob = DynSolValue::Tuple(vec![
        DynSolValue::Address(SAFE),
        DynSolValue::Address(PROXY),
        DynSolValue::Bytes(vec![]),
        DynSolValue::Array(vec![]),
    ])
    .abi_encode();
    // word 0 is the tuple offset, word 1 holds `from`; its 12 padding bytes must be zero
    blob[32] = 0x01;
    let err = TraceDecoder::new().decode_overrides(&blob).unwrap_err();
    assert!(matches!(err, DecodeError::MalformedEncoding { what: "overrides", .. }));
}

#[test]
fn override_blob_decoded_as_trace_fails() {
    let blob = DynSolValue::Tuple(vec![
        DynSolValue::Address(SAFE),
        DynSolValue::Address(PROXY),
        DynSolValue::Bytes(vec![]),
        DynSolValue::Array(vec![]),
    ])
    .abi_encode();
    assert!(TraceDecoder::new().decode_account_accesses(&blob).is_err());
}

// ─── Encoder agreement ────────────────────────────────────────────────────────

#[test]
fn encoder_matches_simulator_layout() {
    let blob = DynSolValue::Array(vec![frame(
        1,
        5,
        5,
        vec![storage_write(2, 0, 3)],
    )])
    .abi_encode();
    let dec = TraceDecoder::new();
    let accesses = dec.decode_account_accesses(&blob).unwrap();
    assert_eq!(TraceEncoder::new().encode_account_accesses(&accesses), blob);
}
