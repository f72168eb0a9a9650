use ur_inspect_core::{
    decode,
    envelope::{
        analyse_signature, envelope_candidates, parse_cose_sign1, parse_witness_envelope,
        KNOWN_ENVELOPE_SOURCE,
    },
    format::format_signature,
    DecodedValue, ScanConfig,
};

mod helpers;
use helpers::*;

fn analyse(payload: &[u8]) -> ur_inspect_core::envelope::SignatureReport {
    let root = decode(payload).unwrap();
    analyse_signature(&root, &ScanConfig::default())
}

fn has_line(lines: &[String], l: &str) -> bool {
    lines.iter().any(|v| v == l)
}

#[test]
fn cose_sign1_at_known_field() {
    setup_logging();

    let envelope = cose_sign1(b"hello", &SIGNATURE);
    let report = analyse(&signature_payload(&REQUEST_ID, &envelope));

    let cose = report.cose.as_ref().expect("COSE_Sign1 not detected");
    assert_eq!(cose.source, KNOWN_ENVELOPE_SOURCE);
    assert_eq!(cose.envelope.algorithm(), Some(&DecodedValue::Integer(-8)));
    assert_eq!(cose.envelope.payload, b"hello".to_vec());
    assert_eq!(cose.envelope.payload_text.as_deref(), Some("hello"));
    assert_eq!(cose.envelope.payload_structured, None);

    assert!(report.witness.is_none());
    assert_eq!(report.selected_signature(), Some(&SIGNATURE[..]));
    assert_eq!(report.request_id.as_deref(), Some(&REQUEST_ID[..]));

    let lines = format_signature(&report);
    assert!(has_line(&lines, "COSE_Sign1: detected"));
    assert!(has_line(&lines, "COSE source path: 2(signatureEnvelope)"));
    assert!(has_line(&lines, "Algorithm: -8"));
    assert!(has_line(&lines, "Request ID: 16 bytes"));
    assert!(has_line(&lines, "cose.payload.utf8 = hello"));
    assert!(has_line(&lines, "cose.signature.length = 64"));
    assert!(has_line(
        &lines,
        &format!("cose.signature.hex = {}", hex::encode(SIGNATURE))
    ));
    assert!(has_line(&lines, r#"protectedHeaders = {"1":-8}"#));
    assert!(has_line(&lines, r#"unprotectedHeaders = {"4":"6b65792d31"}"#));
}

#[test]
fn cose_structured_and_detached_payloads() {
    let structured = cbor(|e| {
        e.map(1)?.str("a")?.u8(1)?;
        Ok(())
    });
    let c = parse_cose_sign1(&cose_sign1(&structured, &SIGNATURE), 6).unwrap();
    assert_eq!(c.payload_text, None);
    assert!(matches!(c.payload_structured, Some(DecodedValue::Map(_))));

    let detached = cbor(|e| {
        e.array(4)?.bytes(&[])?.map(0)?.null()?.bytes(&SIGNATURE)?;
        Ok(())
    });
    let c = parse_cose_sign1(&detached, 6).unwrap();
    assert!(c.payload.is_empty());
    assert!(c.protected_headers.is_empty());
    assert!(c.unprotected_headers.is_empty());
    assert_eq!(c.algorithm(), None);

    let report = analyse(&signature_payload(&REQUEST_ID, &detached));
    let lines = format_signature(&report);
    assert!(has_line(&lines, "cose.payload.hex = (none)"));
}

#[test]
fn cose_undecodable_protected_headers() {
    let envelope = cbor(|e| {
        e.array(4)?.bytes(&[0xff, 0x00])?.map(0)?;
        e.bytes(b"hello")?.bytes(&SIGNATURE)?;
        Ok(())
    });

    let c = parse_cose_sign1(&envelope, 6).expect("COSE_Sign1 not detected");
    assert!(c.protected_headers.is_empty());
    assert_eq!(c.algorithm(), None);
    assert_eq!(c.payload, b"hello".to_vec());
    assert_eq!(c.signature, SIGNATURE.to_vec());
}

#[test]
fn cose_payload_with_trailing_bytes() {
    // `{"a": 1}` followed by a stray zero
    let payload = [0xa1, 0x61, 0x61, 0x01, 0x00];

    let c = parse_cose_sign1(&cose_sign1(&payload, &SIGNATURE), 6).unwrap();
    assert_eq!(c.payload_structured, None);
    assert_eq!(c.payload_text, None);
    assert_eq!(c.payload, payload.to_vec());

    let report = analyse(&signature_payload(&REQUEST_ID, &cose_sign1(&payload, &SIGNATURE)));
    assert!(has_line(
        &format_signature(&report),
        "cose.payload.hex = a161610100"
    ));
}

#[test]
fn cose_rejects_wrong_arity() {
    for n in [3, 5] {
        let b = cbor(|e| {
            e.array(n)?;
            for _ in 0..n {
                e.bytes(&SIGNATURE)?;
            }
            Ok(())
        });
        assert!(parse_cose_sign1(&b, 6).is_none(), "accepted {n} elements");
    }

    assert!(parse_cose_sign1(&tagged_tuple(18, 3), 6).is_none());
    assert!(parse_cose_sign1(&tagged_tuple(18, 5), 6).is_none());

    let c = parse_cose_sign1(&tagged_tuple(18, 4), 6).unwrap();
    assert_eq!(c.signature, SIGNATURE.to_vec());
}

#[test]
fn cose_rejects_non_cbor() {
    assert!(parse_cose_sign1(&REQUEST_ID, 6).is_none());
    assert!(parse_cose_sign1(&[], 6).is_none());
}

#[test]
fn witness_envelope_at_known_field() {
    let envelope = witness(&PUBLIC_KEY, &SIGNATURE);
    let report = analyse(&signature_payload(&REQUEST_ID, &envelope));

    assert!(report.cose.is_none());

    let w = report.witness.as_ref().expect("witness not detected");
    assert_eq!(w.source, KNOWN_ENVELOPE_SOURCE);
    assert_eq!(w.envelope.public_key, PUBLIC_KEY);
    assert_eq!(w.envelope.signature, SIGNATURE);

    assert_eq!(report.signature.as_deref(), Some(&SIGNATURE[..]));
    assert_eq!(report.public_key.as_deref(), Some(&PUBLIC_KEY[..]));
    assert_eq!(report.selected_signature(), Some(&SIGNATURE[..]));

    let lines = format_signature(&report);
    assert!(has_line(&lines, "COSE_Sign1: not detected"));
    assert!(has_line(&lines, "Cardano witness envelope: detected"));
    assert!(has_line(&lines, "Witness source path: 2(signatureEnvelope)"));
    assert!(has_line(&lines, "Signature: 64 bytes"));
    assert!(has_line(&lines, "Public Key: 32 bytes"));
}

#[test]
fn witness_envelope_wrappers() {
    // Tagged, held under map key 0
    let b = cbor(|e| {
        e.tag(minicbor::data::Tag::new(258))?
            .map(1)?
            .u8(0)?
            .array(1)?
            .array(2)?
            .bytes(&PUBLIC_KEY)?
            .bytes(&SIGNATURE)?;
        Ok(())
    });

    let w = parse_witness_envelope(&b, 8).unwrap();
    assert_eq!(w.public_key, PUBLIC_KEY);
}

#[test]
fn witness_rejects_wrong_lengths() {
    assert!(parse_witness_envelope(&witness(&[0x3c; 31], &SIGNATURE), 8).is_none());
    assert!(parse_witness_envelope(&witness(&PUBLIC_KEY, &[0x5a; 63]), 8).is_none());
    assert!(parse_witness_envelope(&witness(&[0x3c; 33], &SIGNATURE), 8).is_none());

    let single = cbor(|e| {
        e.array(1)?.array(1)?.bytes(&PUBLIC_KEY)?;
        Ok(())
    });
    assert!(parse_witness_envelope(&single, 8).is_none());
}

#[test]
fn matchers_run_independently() {
    let cose_signature = [0x77; 64];

    let payload = cbor(|e| {
        e.map(3)?
            .u8(1)?
            .bytes(&REQUEST_ID)?
            .u8(2)?
            .bytes(&cose_sign1(b"hello", &cose_signature))?
            .u8(3)?
            .bytes(&witness(&PUBLIC_KEY, &SIGNATURE))?;
        Ok(())
    });

    let report = analyse(&payload);

    assert_eq!(report.cose.as_ref().unwrap().source, KNOWN_ENVELOPE_SOURCE);
    assert_eq!(report.witness.as_ref().unwrap().source, "3");

    // COSE labels the report, the witness supplies displayed values
    assert_eq!(report.selected_signature(), Some(&cose_signature[..]));
    assert_eq!(report.signature.as_deref(), Some(&SIGNATURE[..]));
    assert_eq!(report.public_key.as_deref(), Some(&PUBLIC_KEY[..]));

    let lines = format_signature(&report);
    assert!(has_line(&lines, "COSE_Sign1: detected"));
    assert!(!has_line(&lines, "Cardano witness envelope: detected"));
}

#[test]
fn no_signature_fields() {
    let payload = cbor(|e| {
        e.map(1)?.str("note")?.str("hi")?;
        Ok(())
    });

    let report = analyse(&payload);
    assert!(report.cose.is_none());
    assert!(report.witness.is_none());
    assert!(!report.standard_fields_found);
    assert_eq!(report.selected_signature(), None);

    let lines = format_signature(&report);
    assert!(has_line(&lines, "Signature: not found"));
    assert!(has_line(&lines, "Public Key: not found"));
    assert!(has_line(&lines, "Request ID: not found"));
    assert!(has_line(
        &lines,
        "No standard signature/publicKey/requestId field identified in payload."
    ));
}

#[test]
fn short_candidates_are_not_offered() {
    let payload = cbor(|e| {
        e.map(2)?.u8(2)?.bytes(&[0x84; 8])?.str("sig")?.bytes(&[0x01; 40])?;
        Ok(())
    });
    let root = decode(&payload).unwrap();

    let candidates = envelope_candidates(&root, Some(&[0x84; 8]), None, &ScanConfig::default());
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].source, "sig");
}
