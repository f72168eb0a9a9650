// Copyright (c) 2022-2023 The MobileCoin Foundation

use serde::Serialize;

use crate::{
    helpers::hex_bytes,
    value::{decode, printable_ascii, DecodedValue},
};

/// COSE_Sign1 semantic tag
pub const COSE_SIGN1_TAG: u64 = 18;

/// COSE header label for the signing algorithm
pub const HEADER_ALG: &str = "1";

/// Decoded COSE_Sign1 envelope
#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct CoseSign1 {
    /// Protected headers (decoded from the protected bucket)
    pub protected_headers: Vec<(String, DecodedValue)>,
    /// Unprotected headers
    pub unprotected_headers: Vec<(String, DecodedValue)>,
    /// Payload bytes, empty for a detached or non-byte payload
    #[serde(with = "hex_bytes")]
    pub payload: Vec<u8>,
    /// Payload as text, when printable ASCII
    pub payload_text: Option<String>,
    /// Payload decoded as a single CBOR item
    pub payload_structured: Option<DecodedValue>,
    /// Signature bytes, empty when not a byte string
    #[serde(with = "hex_bytes")]
    pub signature: Vec<u8>,
}

impl CoseSign1 {
    /// Signing algorithm header, protected bucket first
    pub fn algorithm(&self) -> Option<&DecodedValue> {
        find_header(&self.protected_headers, HEADER_ALG)
            .or_else(|| find_header(&self.unprotected_headers, HEADER_ALG))
    }
}

fn find_header<'a>(headers: &'a [(String, DecodedValue)], label: &str) -> Option<&'a DecodedValue> {
    headers.iter().find(|(k, _)| k == label).map(|(_, v)| v)
}

/// Match `bytes` as a COSE_Sign1 envelope
///
/// The decoded value is searched (through tags, map key `0` then every map
/// value, and sequence elements) for the first 4-element sequence within
/// `max_depth`. This is deliberately loose and may accept an unrelated
/// 4-tuple, it identifies an envelope on a best-effort basis only.
pub fn parse_cose_sign1(bytes: &[u8], max_depth: usize) -> Option<CoseSign1> {
    let decoded = decode(bytes).ok()?;

    let parts = unwrap_to_sign1(&decoded, 0, max_depth)?;
    let (protected, unprotected, payload, signature) = match parts {
        [a, b, c, d] => (a, b, c, d),
        _ => return None,
    };

    // Protected header failures leave the headers empty
    let protected_headers = match protected.as_bytes() {
        Some(b) if !b.is_empty() => decode(b).map(|v| header_entries(&v)).unwrap_or_default(),
        _ => vec![],
    };

    let payload = payload.as_bytes().map(|b| b.to_vec()).unwrap_or_default();
    let payload_text = printable_ascii(&payload);
    let payload_structured = match payload.is_empty() {
        true => None,
        false => decode(&payload).ok(),
    };

    Some(CoseSign1 {
        protected_headers,
        unprotected_headers: header_entries(unprotected),
        payload,
        payload_text,
        payload_structured,
        signature: signature.as_bytes().map(|b| b.to_vec()).unwrap_or_default(),
    })
}

fn unwrap_to_sign1(v: &DecodedValue, depth: usize, max_depth: usize) -> Option<&[DecodedValue]> {
    if depth > max_depth {
        return None;
    }

    match v {
        DecodedValue::Sequence(items) if items.len() == 4 => Some(items.as_slice()),
        DecodedValue::Sequence(items) => items
            .iter()
            .find_map(|i| unwrap_to_sign1(i, depth + 1, max_depth)),
        // Tag 18 is the registered COSE_Sign1 tag, other tags are descended
        // like any other container
        DecodedValue::Tag(_, inner) => unwrap_to_sign1(inner, depth + 1, max_depth),
        DecodedValue::Map(entries) => {
            if let Some(direct) = v
                .get_numeric(0)
                .and_then(|i| unwrap_to_sign1(i, depth + 1, max_depth))
            {
                return Some(direct);
            }

            entries
                .iter()
                .find_map(|(_, i)| unwrap_to_sign1(i, depth + 1, max_depth))
        }
        DecodedValue::ByteString(_)
        | DecodedValue::TextString(_)
        | DecodedValue::Integer(_)
        | DecodedValue::Float(_)
        | DecodedValue::Boolean(_)
        | DecodedValue::Null => None,
    }
}

/// Flatten a header bucket into `(label, value)` pairs
fn header_entries(v: &DecodedValue) -> Vec<(String, DecodedValue)> {
    match v {
        DecodedValue::Map(entries) => entries
            .iter()
            .map(|(k, v)| (k.key_label(), v.clone()))
            .collect(),
        DecodedValue::Null => vec![],
        other => vec![("value".to_string(), other.clone())],
    }
}

/// Render a header bucket as a JSON object, byte values as hex
pub fn headers_json(headers: &[(String, DecodedValue)]) -> serde_json::Value {
    let mut m = serde_json::Map::new();
    for (k, v) in headers {
        m.insert(k.clone(), v.to_header_json());
    }
    serde_json::Value::Object(m)
}
