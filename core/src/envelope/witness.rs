// Copyright (c) 2022-2023 The MobileCoin Foundation

use serde::Serialize;

use crate::{
    helpers::hex_bytes,
    value::{decode, DecodedValue},
};

/// Ed25519 public key length
pub const PUBLIC_KEY_LEN: usize = 32;

/// Ed25519 signature length
pub const SIGNATURE_LEN: usize = 64;

/// Raw `[public_key, signature]` witness
#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct WitnessEnvelope {
    #[serde(with = "hex_bytes")]
    pub public_key: [u8; PUBLIC_KEY_LEN],
    #[serde(with = "hex_bytes")]
    pub signature: [u8; SIGNATURE_LEN],
}

/// Match `bytes` as a Cardano witness envelope
///
/// Accepts `[[public_key, signature], ..]`, optionally tagged and optionally
/// held under key `0` of a map. Pairs that are not exactly 32 and 64 bytes
/// are rejected.
pub fn parse_witness_envelope(bytes: &[u8], max_depth: usize) -> Option<WitnessEnvelope> {
    let decoded = decode(bytes).ok()?;

    let root = unwrap_tagged(&decoded, 0, max_depth);

    let container = match root {
        DecodedValue::Map(_) => root.get_numeric(0).unwrap_or(root),
        _ => root,
    };

    let witnesses = unwrap_tagged(container, 0, max_depth).as_sequence()?;
    let witness = unwrap_tagged(witnesses.first()?, 0, max_depth).as_sequence()?;
    if witness.len() < 2 {
        return None;
    }

    let public_key = witness[0].as_bytes()?.try_into().ok()?;
    let signature = witness[1].as_bytes()?.try_into().ok()?;

    Some(WitnessEnvelope {
        public_key,
        signature,
    })
}

/// Strip nested tags, stopping at `max_depth`
fn unwrap_tagged(v: &DecodedValue, depth: usize, max_depth: usize) -> &DecodedValue {
    match v {
        DecodedValue::Tag(_, inner) if depth < max_depth => unwrap_tagged(inner, depth + 1, max_depth),
        _ => v,
    }
}
