// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Document pipeline
//!
//! Decodes a reassembled UR payload and dispatches on its type tag to the
//! transaction or signature analysis. Each call is independent, repeated
//! calls over the same bytes produce identical results.

use base64::prelude::{Engine as _, BASE64_STANDARD};
use serde::{Serialize, Serializer};

use crate::{
    config::{ScanConfig, TX_HINTS},
    envelope::{analyse_signature, SignatureReport},
    format::{format_signature, format_transaction},
    helpers::hex_bytes,
    scan::best,
    tx::{interpret, InterpretError, InterpretedTransaction, TxCodec},
    value::{decode, DecodedValue},
    Error,
};

/// UR type prefix for Cardano payloads
pub const CARDANO_PREFIX: &str = "cardano-";

/// UR type for detached Cardano signatures
pub const CARDANO_SIGNATURE: &str = "cardano-signature";

const UNREADABLE_UTF8: &str = "[Non-printable UTF-8 text, please use Hex/Base64]";
const INVALID_UTF8: &str = "[Cannot decode as UTF-8, please use Hex/Base64]";

/// Raw views of a payload
#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct RawView {
    pub ur_type: String,
    /// CBOR bytes as hex
    pub hex: String,
    /// CBOR bytes as base64
    pub base64: String,
    /// Text rendering of the decoded payload
    pub text: String,
}

/// Located transaction and its interpretation
#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct TransactionAnalysis {
    /// Path the transaction bytes were found at
    pub source_path: String,
    #[serde(with = "hex_bytes")]
    pub tx_bytes: Vec<u8>,
    #[serde(serialize_with = "serialize_interpretation")]
    pub interpretation: Result<InterpretedTransaction, InterpretError>,
}

/// Payload analysis by UR type
#[derive(Clone, PartialEq, Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Analysis {
    /// Not a Cardano payload, raw views only
    Raw,
    /// Cardano payload without recognisable transaction bytes
    TransactionNotFound,
    Transaction(TransactionAnalysis),
    Signature(SignatureReport),
}

/// Inspection result for one document
#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct Inspection {
    pub raw: RawView,
    pub analysis: Analysis,
}

impl Inspection {
    /// Report lines for the analysis
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![format!("UR Type: {}", self.raw.ur_type)];

        match &self.analysis {
            Analysis::Raw => {
                lines.push(String::new());
                lines.push(self.raw.text.clone());
            }
            Analysis::TransactionNotFound => {
                lines.push("Cardano transaction: not found".to_string());
            }
            Analysis::Transaction(t) => {
                lines.push(format!(
                    "Source Path: {} ({} bytes)",
                    t.source_path,
                    t.tx_bytes.len()
                ));
                lines.push(String::new());
                lines.extend(format_transaction(&t.interpretation));
            }
            Analysis::Signature(s) => {
                lines.push(String::new());
                lines.extend(format_signature(s));
            }
        }

        lines
    }

    /// Transaction hex, or the selected signature hex for signatures
    pub fn primary_hex(&self) -> Option<String> {
        match &self.analysis {
            Analysis::Transaction(t) => Some(hex::encode(&t.tx_bytes)),
            Analysis::Signature(s) => s.selected_signature().map(hex::encode),
            Analysis::Raw | Analysis::TransactionNotFound => None,
        }
    }
}

/// Inspect a reassembled payload of type `ur_type`
///
/// Fails only when `cbor` is not CBOR, every other failure is reported
/// within the [Inspection].
pub fn inspect(
    ur_type: &str,
    cbor: &[u8],
    codec: &impl TxCodec,
    config: &ScanConfig,
) -> Result<Inspection, Error> {
    let decoded = decode(cbor)?;

    let raw = RawView {
        ur_type: ur_type.to_string(),
        hex: hex::encode(cbor),
        base64: BASE64_STANDARD.encode(cbor),
        text: payload_text(&decoded),
    };

    let analysis = analyse(ur_type, &decoded, codec, config);

    Ok(Inspection { raw, analysis })
}

/// Dispatch a decoded payload on its UR type
pub fn analyse(
    ur_type: &str,
    decoded: &DecodedValue,
    codec: &impl TxCodec,
    config: &ScanConfig,
) -> Analysis {
    let ur_type = ur_type.to_lowercase();

    if !ur_type.starts_with(CARDANO_PREFIX) {
        return Analysis::Raw;
    }

    if ur_type == CARDANO_SIGNATURE {
        #[cfg(feature = "log")]
        log::info!("cardano-signature detected, using signature analysis");

        return Analysis::Signature(analyse_signature(decoded, config));
    }

    let candidate = match best(decoded, &TX_HINTS, config.scan_depth) {
        Some(c) => c,
        None => {
            #[cfg(feature = "log")]
            log::info!("no recognizable Cardano transaction bytes in payload");

            return Analysis::TransactionNotFound;
        }
    };

    #[cfg(feature = "log")]
    log::info!(
        "Cardano tx extracted, source path={}, length={} bytes",
        candidate.path_label(),
        candidate.bytes.len()
    );

    let interpretation = interpret(codec, &candidate.bytes, decoded, config.utxo_depth);

    Analysis::Transaction(TransactionAnalysis {
        source_path: candidate.path_label(),
        tx_bytes: candidate.bytes,
        interpretation,
    })
}

/// Render a decoded payload as text
fn payload_text(v: &DecodedValue) -> String {
    match v {
        DecodedValue::ByteString(b) => match std::str::from_utf8(b) {
            Ok(s) if s.chars().all(is_display_char) => s.to_string(),
            Ok(_) => UNREADABLE_UTF8.to_string(),
            Err(_) => INVALID_UTF8.to_string(),
        },
        DecodedValue::TextString(s) => s.clone(),
        _ => {
            let json = v.to_json();
            serde_json::to_string_pretty(&json).unwrap_or_else(|_| json.to_string())
        }
    }
}

fn is_display_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{7e}' | '\u{a0}'..='\u{ffff}')
}

fn serialize_interpretation<S: Serializer>(
    v: &Result<InterpretedTransaction, InterpretError>,
    s: S,
) -> Result<S::Ok, S::Error> {
    let json = match v {
        Ok(tx) => serde_json::json!({
            "transaction": tx,
            "input_total_lovelace": tx.input_total().map(|v| v.to_string()),
            "output_total_lovelace": tx.output_total().to_string(),
            "balance_delta_lovelace": tx.balance_delta().map(|v| v.to_string()),
        }),
        Err(e) => serde_json::json!({ "error": e.to_string() }),
    };

    json.serialize(s)
}
