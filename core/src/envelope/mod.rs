// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Signature envelope decoders
//!
//! The sender's framing is not known to the receiver, so both a full
//! COSE_Sign1 envelope and a raw Ed25519 witness pair are tried against an
//! ordered list of candidates. Each matcher takes its first success.

use serde::Serialize;

use crate::{
    config::{ScanConfig, PUBLIC_KEY_HINTS, REQUEST_ID_HINTS, SIGNATURE_HINTS},
    helpers::opt_hex_bytes,
    scan::{best, collect_byte_strings},
    value::DecodedValue,
};

mod cose;
pub use cose::{headers_json, parse_cose_sign1, CoseSign1, COSE_SIGN1_TAG, HEADER_ALG};

mod witness;
pub use witness::{parse_witness_envelope, WitnessEnvelope, PUBLIC_KEY_LEN, SIGNATURE_LEN};

/// Source label for the known signature envelope field
pub const KNOWN_ENVELOPE_SOURCE: &str = "2(signatureEnvelope)";

/// Source label for a heuristic signature without a path
pub const HEURISTIC_SIGNATURE_SOURCE: &str = "signature(heuristic)";

/// Byte string offered to the envelope matchers
#[derive(Clone, PartialEq, Debug)]
pub struct EnvelopeCandidate {
    pub bytes: Vec<u8>,
    pub source: String,
}

/// Successful envelope match with the candidate it came from
#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct EnvelopeMatch<T> {
    pub source: String,
    pub envelope: T,
}

/// Signature facts extracted from a `cardano-signature` payload
#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct SignatureReport {
    /// Signature bytes for display (witness signature, else heuristic)
    #[serde(with = "opt_hex_bytes")]
    pub signature: Option<Vec<u8>>,
    /// Public key bytes for display (witness key, else heuristic)
    #[serde(with = "opt_hex_bytes")]
    pub public_key: Option<Vec<u8>>,
    /// Request identifier (known field, else heuristic)
    #[serde(with = "opt_hex_bytes")]
    pub request_id: Option<Vec<u8>>,
    /// COSE_Sign1 match
    pub cose: Option<EnvelopeMatch<CoseSign1>>,
    /// Witness envelope match
    pub witness: Option<EnvelopeMatch<WitnessEnvelope>>,
    /// Whether any of the hinted signature / key / request id fields was located
    pub standard_fields_found: bool,
}

impl SignatureReport {
    /// Selected signature: COSE signature, else witness, else heuristic
    pub fn selected_signature(&self) -> Option<&[u8]> {
        if let Some(c) = &self.cose {
            if !c.envelope.signature.is_empty() {
                return Some(&c.envelope.signature);
            }
        }

        if let Some(w) = &self.witness {
            return Some(&w.envelope.signature);
        }

        self.signature.as_deref()
    }
}

/// Analyse a decoded `cardano-signature` payload
pub fn analyse_signature(root: &DecodedValue, config: &ScanConfig) -> SignatureReport {
    // Known positional fields
    let known_request_id = root
        .get_numeric(1)
        .and_then(|v| v.as_bytes())
        .map(|b| b.to_vec());
    let known_envelope = root
        .get_numeric(2)
        .and_then(|v| v.as_bytes())
        .map(|b| b.to_vec());

    // Heuristic fields
    let signature = best(root, &SIGNATURE_HINTS, config.scan_depth);
    let public_key = best(root, &PUBLIC_KEY_HINTS, config.scan_depth);
    let request_id = best(root, &REQUEST_ID_HINTS, config.scan_depth);

    let standard_fields_found = signature.is_some() || public_key.is_some() || request_id.is_some();

    let candidates = envelope_candidates(
        root,
        known_envelope.as_deref(),
        signature.as_ref().map(|s| (s.bytes.as_slice(), s.path_label())),
        config,
    );

    let cose = candidates.iter().find_map(|c| {
        parse_cose_sign1(&c.bytes, config.cose_depth).map(|envelope| EnvelopeMatch {
            source: c.source.clone(),
            envelope,
        })
    });

    let witness = candidates.iter().find_map(|c| {
        parse_witness_envelope(&c.bytes, config.tag_depth).map(|envelope| EnvelopeMatch {
            source: c.source.clone(),
            envelope,
        })
    });

    #[cfg(feature = "log")]
    log::debug!(
        "signature envelopes: cose={:?} witness={:?} ({} candidates)",
        cose.as_ref().map(|c| &c.source),
        witness.as_ref().map(|w| &w.source),
        candidates.len()
    );

    // Witness values take precedence for display, a heuristic public key
    // is only reported alongside a distinct heuristic signature
    let (display_signature, display_public_key) = match &witness {
        Some(w) => (
            Some(w.envelope.signature.to_vec()),
            Some(w.envelope.public_key.to_vec()),
        ),
        None => {
            let pk = match (&public_key, &signature) {
                (Some(pk), Some(sig)) if pk.bytes != sig.bytes => Some(pk.bytes.clone()),
                _ => None,
            };
            (signature.as_ref().map(|s| s.bytes.clone()), pk)
        }
    };

    SignatureReport {
        signature: display_signature,
        public_key: display_public_key,
        request_id: known_request_id.or_else(|| request_id.map(|r| r.bytes)),
        cose,
        witness,
        standard_fields_found,
    }
}

/// Build envelope candidates in priority order: the known envelope field,
/// the heuristic signature, then every byte string in the payload
pub fn envelope_candidates(
    root: &DecodedValue,
    known: Option<&[u8]>,
    heuristic: Option<(&[u8], String)>,
    config: &ScanConfig,
) -> Vec<EnvelopeCandidate> {
    let mut candidates = vec![];

    if let Some(b) = known {
        candidates.push(EnvelopeCandidate {
            bytes: b.to_vec(),
            source: KNOWN_ENVELOPE_SOURCE.to_string(),
        });
    }

    if let Some((b, path)) = heuristic {
        let source = match path.is_empty() {
            true => HEURISTIC_SIGNATURE_SOURCE.to_string(),
            false => path,
        };
        candidates.push(EnvelopeCandidate {
            bytes: b.to_vec(),
            source,
        });
    }

    for c in collect_byte_strings(root, config.scan_depth) {
        candidates.push(EnvelopeCandidate {
            source: c.path_label(),
            bytes: c.bytes,
        });
    }

    candidates.retain(|c| c.bytes.len() >= config.min_envelope_length);

    candidates
}
