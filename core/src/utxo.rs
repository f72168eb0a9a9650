// Copyright (c) 2022-2023 The MobileCoin Foundation

//! UTXO context resolver
//!
//! Multi-part payloads commonly carry resolved-input context (prior
//! addresses and amounts) beside the raw transaction bytes. This walks the
//! payload recognising objects shaped like a spent-output reference and
//! indexes them by `hash#index`.

use std::collections::HashMap;

use serde::Serialize;

use crate::value::DecodedValue;

/// Map field lookup, either by text key or positional numeric key
#[derive(Copy, Clone, PartialEq, Debug)]
enum Alias {
    Key(&'static str),
    Num(i128),
}

/// Transaction hash aliases, in priority order
const TX_HASH_ALIASES: &[Alias] = &[
    Alias::Num(1),
    Alias::Key("txHash"),
    Alias::Key("tx_hash"),
    Alias::Key("transactionHash"),
    Alias::Key("transaction_id"),
];

/// Output index aliases, in priority order
const INDEX_ALIASES: &[Alias] = &[
    Alias::Key("index"),
    Alias::Key("outputIndex"),
    Alias::Key("tx_index"),
    Alias::Key("output_index"),
    Alias::Num(2),
];

/// Address aliases, in priority order
const ADDRESS_ALIASES: &[Alias] = &[Alias::Key("address"), Alias::Key("addr"), Alias::Num(5)];

/// Value aliases, in priority order
const VALUE_ALIASES: &[Alias] = &[
    Alias::Key("value"),
    Alias::Key("amount"),
    Alias::Key("outputAmount"),
    Alias::Key("output_value"),
    Alias::Num(3),
];

/// Lovelace sub-field aliases within a structured value
const LOVELACE_ALIASES: &[&str] = &["lovelace", "coin", "ada", "coins", "amount", "quantity"];

/// Native asset list aliases within a structured value
const ASSET_ALIASES: &[&str] = &["assets", "multiasset", "tokens"];

/// Previously seen output referenced by `hash#index`
#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct UtxoRef {
    /// `hash#index` key
    pub key: String,
    /// Lower-case hex transaction hash
    pub tx_hash: String,
    /// Output index
    pub index: u64,
    /// Owning address, empty when absent
    pub address: String,
    /// Output value in lovelace, if present
    pub lovelace: Option<u64>,
    /// Raw native asset entries
    pub assets: Vec<DecodedValue>,
}

/// UTXO context index
pub type UtxoIndex = HashMap<String, UtxoRef>;

/// Build a `hash#index` key
pub fn utxo_key(tx_hash: &str, index: u64) -> String {
    format!("{tx_hash}#{index}")
}

/// Collect UTXO references from `root`, later observations of a key
/// replace earlier ones in traversal order
pub fn collect_utxos(root: &DecodedValue, max_depth: usize) -> UtxoIndex {
    let mut index = UtxoIndex::new();

    walk(root, 0, max_depth, &mut index);

    #[cfg(feature = "log")]
    log::debug!("collected {} UTXO context entries", index.len());

    index
}

fn walk(node: &DecodedValue, depth: usize, max_depth: usize, index: &mut UtxoIndex) {
    if depth > max_depth {
        return;
    }

    match node {
        DecodedValue::Map(entries) => {
            if let Some(u) = detect_utxo(node) {
                #[cfg(feature = "log")]
                log::trace!("utxo context: {} ({:?} lovelace)", u.key, u.lovelace);

                index.insert(u.key.clone(), u);
            }

            for (_, v) in entries {
                walk(v, depth + 1, max_depth, index);
            }
        }
        DecodedValue::Sequence(items) => {
            for v in items {
                walk(v, depth + 1, max_depth, index);
            }
        }
        DecodedValue::Tag(_, inner) => walk(inner, depth + 1, max_depth, index),
        DecodedValue::ByteString(_)
        | DecodedValue::TextString(_)
        | DecodedValue::Integer(_)
        | DecodedValue::Float(_)
        | DecodedValue::Boolean(_)
        | DecodedValue::Null => (),
    }
}

fn lookup<'a>(node: &'a DecodedValue, alias: &Alias) -> Option<&'a DecodedValue> {
    match alias {
        Alias::Key(k) => node.get(k),
        Alias::Num(n) => node.get_numeric(*n),
    }
}

/// Attempt to recognise a map node as a UTXO reference
pub fn detect_utxo(node: &DecodedValue) -> Option<UtxoRef> {
    node.as_map()?;

    let tx_hash = resolve_tx_hash(node)?;
    let index = resolve_index(node)?;

    let address = ADDRESS_ALIASES
        .iter()
        .filter_map(|a| lookup(node, a))
        .find_map(|v| match v {
            DecodedValue::TextString(s) if !s.is_empty() => Some(s.clone()),
            DecodedValue::ByteString(b) if !b.is_empty() => Some(hex::encode(b)),
            _ => None,
        })
        .unwrap_or_default();

    let (lovelace, assets) = VALUE_ALIASES
        .iter()
        .filter_map(|a| lookup(node, a))
        .find(|v| !is_falsy(v))
        .map(resolve_value)
        .unwrap_or((None, vec![]));

    Some(UtxoRef {
        key: utxo_key(&tx_hash, index),
        tx_hash,
        index,
        address,
        lovelace,
        assets,
    })
}

/// Hash as bytes under any alias first, then as hex text under a named alias
fn resolve_tx_hash(node: &DecodedValue) -> Option<String> {
    let from_bytes = TX_HASH_ALIASES
        .iter()
        .filter_map(|a| lookup(node, a))
        .find_map(|v| v.as_bytes().filter(|b| !b.is_empty()).map(hex::encode));
    if from_bytes.is_some() {
        return from_bytes;
    }

    TX_HASH_ALIASES
        .iter()
        .filter(|a| matches!(a, Alias::Key(_)))
        .filter_map(|a| lookup(node, a))
        .filter_map(|v| v.as_text())
        .map(normalize_hex)
        .find(|s| !s.is_empty())
}

/// First present index alias, which must be a non-negative integer
fn resolve_index(node: &DecodedValue) -> Option<u64> {
    let v = INDEX_ALIASES
        .iter()
        .filter_map(|a| lookup(node, a))
        .find(|v| !matches!(v, DecodedValue::Null))?;

    match v {
        DecodedValue::Integer(n) => u64::try_from(*n).ok(),
        DecodedValue::TextString(s) => parse_decimal(s),
        _ => None,
    }
}

/// Resolve a flat or structured amount
fn resolve_value(v: &DecodedValue) -> (Option<u64>, Vec<DecodedValue>) {
    match v {
        DecodedValue::Map(_) => {
            let lovelace = LOVELACE_ALIASES
                .iter()
                .filter_map(|k| v.get(k))
                .find(|v| !matches!(v, DecodedValue::Null))
                .and_then(parse_lovelace);

            let assets = ASSET_ALIASES
                .iter()
                .filter_map(|k| v.get(k))
                .find(|v| !is_falsy(v))
                .and_then(|v| v.as_sequence())
                .map(|s| s.to_vec())
                .unwrap_or_default();

            (lovelace, assets)
        }
        _ => (parse_lovelace(v), vec![]),
    }
}

/// Parse an integer or decimal text amount
pub fn parse_lovelace(v: &DecodedValue) -> Option<u64> {
    match v {
        DecodedValue::Integer(n) => u64::try_from(*n).ok(),
        DecodedValue::Float(f) if f.is_finite() && *f >= 0.0 && *f < u64::MAX as f64 => {
            Some(f.trunc() as u64)
        }
        DecodedValue::TextString(s) => parse_decimal(s),
        _ => None,
    }
}

fn parse_decimal(s: &str) -> Option<u64> {
    let s = s.trim();
    if s.is_empty() || !s.bytes().all(|c| c.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

fn normalize_hex(s: &str) -> String {
    let s = s.to_lowercase();
    s.strip_prefix("0x").map(str::to_string).unwrap_or(s)
}

/// Absent-like values are skipped when choosing between aliases
///
/// Zero counts as absent, so an explicit zero amount resolves as unknown
/// rather than as a zero input value.
fn is_falsy(v: &DecodedValue) -> bool {
    match v {
        DecodedValue::Null | DecodedValue::Boolean(false) | DecodedValue::Integer(0) => true,
        DecodedValue::TextString(s) => s.is_empty(),
        _ => false,
    }
}
