// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Report formatting
//!
//! Pure functions rendering interpreter and envelope results to ordered
//! text lines.

use crate::{
    envelope::{headers_json, SignatureReport},
    tx::{InterpretError, InterpretedTransaction},
    value::DecodedValue,
};

/// Lovelace per ADA
pub const LOVELACE_PER_ADA: u128 = 1_000_000;

/// Shown for an unresolved value
pub const UNKNOWN: &str = "unknown";

/// Shown for an absent field
pub const NOT_FOUND: &str = "not found";

/// Format a lovelace amount as ADA using integer arithmetic, trimming
/// trailing fractional zeros
pub fn lovelace_to_ada(lovelace: u128) -> String {
    let whole = lovelace / LOVELACE_PER_ADA;
    let frac = lovelace % LOVELACE_PER_ADA;

    match frac {
        0 => format!("{whole} ADA"),
        _ => {
            let frac = format!("{frac:06}");
            format!("{whole}.{} ADA", frac.trim_end_matches('0'))
        }
    }
}

/// Render a transaction interpretation
pub fn format_transaction(
    details: &Result<InterpretedTransaction, InterpretError>,
) -> Vec<String> {
    let tx = match details {
        Ok(v) => v,
        Err(e) => return vec![e.to_string()],
    };

    let mut lines = vec![];

    let output_total = tx.output_total();

    lines.push(format!("Parsed As: {}", tx.parsed_as));
    lines.push(format!("Inputs: {}", tx.inputs.len()));
    lines.push(format!("Outputs: {}", tx.outputs.len()));
    lines.push(format!(
        "Fee: {} lovelace ({})",
        tx.fee_lovelace,
        lovelace_to_ada(tx.fee_lovelace.into())
    ));
    lines.push(match tx.input_total() {
        Some(v) => format!("Input Total: {} ({})", v, lovelace_to_ada(v)),
        None => format!("Input Total: {UNKNOWN}"),
    });
    lines.push(format!(
        "Output Total: {} ({})",
        output_total,
        lovelace_to_ada(output_total)
    ));
    if let Some(v) = tx.balance_delta() {
        lines.push(format!(
            "Balance Delta (excluding change): {} ({})",
            v,
            lovelace_to_ada(v)
        ));
    }
    lines.push(match tx.from_addresses.is_empty() {
        true => format!("From: {UNKNOWN} (requires additional UTXO context)"),
        false => format!("From: {}", tx.from_addresses.join(", ")),
    });
    lines.push(match tx.to_addresses.is_empty() {
        true => format!("To: {UNKNOWN}"),
        false => format!("To: {}", tx.to_addresses.join(", ")),
    });
    if let Some(ttl) = tx.ttl {
        lines.push(format!("TTL: {ttl}"));
    }
    if let Some(start) = tx.validity_start {
        lines.push(format!("Valid From: {start}"));
    }

    lines.push(String::new());
    lines.push("Outputs:".to_string());
    for (n, o) in tx.outputs.iter().enumerate() {
        lines.push(format!("- [{n}] {}", o.address));
        lines.push(format!(
            "  value: {} lovelace ({})",
            o.lovelace,
            lovelace_to_ada(o.lovelace.into())
        ));
        for a in &o.assets {
            let label = match &a.asset_name_ascii {
                Some(ascii) => format!("{ascii} ({})", a.asset_name_hex),
                None => a.asset_name_hex.clone(),
            };
            lines.push(format!("  asset: {}.{} = {}", a.policy_id, label, a.quantity));
        }
    }

    lines.push(String::new());
    lines.push("Inputs:".to_string());
    for (n, i) in tx.inputs.iter().enumerate() {
        lines.push(format!("- [{n}] {}#{}", i.tx_hash, i.index));
        lines.push(format!(
            "  from: {}",
            i.address.as_deref().unwrap_or(UNKNOWN)
        ));
        lines.push(match i.lovelace {
            Some(v) => format!("  value: {} lovelace ({})", v, lovelace_to_ada(v.into())),
            None => format!("  value: {UNKNOWN}"),
        });
    }

    lines
}

/// Render a signature report
pub fn format_signature(report: &SignatureReport) -> Vec<String> {
    let mut lines = vec![];

    let len_or_missing = |b: &Option<Vec<u8>>| match b {
        Some(b) => format!("{} bytes", b.len()),
        None => NOT_FOUND.to_string(),
    };

    lines.push("Parsed As: Cardano Signature".to_string());
    lines.push(format!("Signature: {}", len_or_missing(&report.signature)));
    lines.push(format!("Public Key: {}", len_or_missing(&report.public_key)));
    lines.push(format!("Request ID: {}", len_or_missing(&report.request_id)));

    match (&report.cose, &report.witness) {
        (Some(c), _) => {
            lines.push("COSE_Sign1: detected".to_string());
            lines.push(format!("COSE source path: {}", c.source));
            if let Some(alg) = c.envelope.algorithm() {
                lines.push(format!("Algorithm: {}", header_value(alg)));
            }
        }
        (None, Some(w)) => {
            lines.push("COSE_Sign1: not detected".to_string());
            lines.push("Cardano witness envelope: detected".to_string());
            lines.push(format!("Witness source path: {}", w.source));
        }
        (None, None) => {
            lines.push("COSE_Sign1: not detected".to_string());
        }
    }

    lines.push(String::new());
    if let Some(s) = &report.signature {
        lines.push(format!("signature.hex = {}", hex::encode(s)));
    }
    if let Some(pk) = &report.public_key {
        lines.push(format!("publicKey.hex = {}", hex::encode(pk)));
    }
    if let Some(id) = &report.request_id {
        lines.push(format!("requestId.hex = {}", hex::encode(id)));
    }

    if let Some(c) = &report.cose {
        let e = &c.envelope;

        lines.push(String::new());
        lines.push(format!("cose.signature.hex = {}", hex_or_none(&e.signature)));
        if !e.signature.is_empty() {
            lines.push(format!("cose.signature.length = {}", e.signature.len()));
        }
        lines.push(format!("cose.payload.hex = {}", hex_or_none(&e.payload)));
        if let Some(text) = &e.payload_text {
            lines.push(format!("cose.payload.utf8 = {text}"));
        }
        if let Some(v) = &e.payload_structured {
            lines.push("cose.payload.cbor =".to_string());
            lines.push(structured_value(v));
        }
        if !e.protected_headers.is_empty() {
            lines.push(format!(
                "protectedHeaders = {}",
                headers_json(&e.protected_headers)
            ));
        }
        if !e.unprotected_headers.is_empty() {
            lines.push(format!(
                "unprotectedHeaders = {}",
                headers_json(&e.unprotected_headers)
            ));
        }
    }

    if !report.standard_fields_found {
        lines.push(
            "No standard signature/publicKey/requestId field identified in payload.".to_string(),
        );
    }

    lines
}

fn hex_or_none(b: &[u8]) -> String {
    match b.is_empty() {
        true => "(none)".to_string(),
        false => hex::encode(b),
    }
}

/// Header values print bare for scalars, JSON otherwise
fn header_value(v: &DecodedValue) -> String {
    match v {
        DecodedValue::Integer(n) => n.to_string(),
        DecodedValue::TextString(s) => s.clone(),
        other => other.to_header_json().to_string(),
    }
}

/// Containers print as pretty JSON, scalars as their JSON text
fn structured_value(v: &DecodedValue) -> String {
    let json = v.to_json();
    match v {
        DecodedValue::Map(_) | DecodedValue::Sequence(_) | DecodedValue::Tag(..) => {
            serde_json::to_string_pretty(&json).unwrap_or_else(|_| json.to_string())
        }
        DecodedValue::TextString(s) => s.clone(),
        _ => json.to_string(),
    }
}
