// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Scanner hint sets and traversal bounds

use serde::Serialize;

/// Key-path hints and minimum length for a byte candidate search
#[derive(Copy, Clone, PartialEq, Debug, Serialize)]
pub struct ScanHints {
    /// Substrings matched against the lower-cased, dot-joined key path
    pub hints: &'static [&'static str],
    /// Minimum candidate length in bytes
    pub min_length: usize,
}

/// Hints for locating transaction / transaction body bytes
pub const TX_HINTS: ScanHints = ScanHints {
    hints: &[
        "tx",
        "transaction",
        "txbody",
        "body",
        "sign_data",
        "signdata",
        "payload",
        "request",
    ],
    min_length: 20,
};

/// Hints for locating signature / envelope bytes
pub const SIGNATURE_HINTS: ScanHints = ScanHints {
    hints: &["signature", "sig", "witness", "cose", "proof"],
    min_length: 32,
};

/// Hints for locating public keys
pub const PUBLIC_KEY_HINTS: ScanHints = ScanHints {
    hints: &["public", "pub", "key"],
    min_length: 16,
};

/// Hints for locating request identifiers
pub const REQUEST_ID_HINTS: ScanHints = ScanHints {
    hints: &["request", "requestid", "id"],
    min_length: 8,
};

/// Traversal bounds applied by the engine
///
/// Every recursive walk stops descending (treating the remainder as
/// not-found) once its bound is reached.
#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct ScanConfig {
    /// Byte candidate scan depth
    pub scan_depth: usize,
    /// UTXO context walk depth
    pub utxo_depth: usize,
    /// COSE_Sign1 unwrap depth
    pub cose_depth: usize,
    /// Witness envelope tag unwrap depth
    pub tag_depth: usize,
    /// Candidates shorter than this are not offered to envelope matchers
    pub min_envelope_length: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            scan_depth: 10,
            utxo_depth: 12,
            cose_depth: 6,
            tag_depth: 8,
            min_envelope_length: 16,
        }
    }
}
