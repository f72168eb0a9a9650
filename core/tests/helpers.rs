#![allow(unused)]

use std::convert::Infallible;

use minicbor::{data::Tag, encode::Error as EncodeError, Encoder};

use ur_inspect_core::tx::{BodyInput, BodyOutput, CodecError, TxBody, TxCodec};

pub type Enc = Encoder<Vec<u8>>;

pub type EncResult = Result<(), EncodeError<Infallible>>;

/// Build a CBOR fixture
pub fn cbor(f: impl FnOnce(&mut Enc) -> EncResult) -> Vec<u8> {
    let mut e = Encoder::new(Vec::new());
    f(&mut e).unwrap();
    e.into_writer()
}

/// Setup logging for tests
pub fn setup_logging() {
    let _ = simplelog::SimpleLogger::init(log::LevelFilter::Debug, Default::default());
}

/// Ed25519 signature fixture
pub const SIGNATURE: [u8; 64] = [0x5a; 64];

/// Ed25519 public key fixture
pub const PUBLIC_KEY: [u8; 32] = [0x3c; 32];

/// Request id fixture, not decodable as a single CBOR item
pub const REQUEST_ID: [u8; 16] = [0x01; 16];

/// COSE_Sign1 `[protected, unprotected, payload, signature]` with an
/// EdDSA (-8) protected algorithm header
pub fn cose_sign1(payload: &[u8], signature: &[u8]) -> Vec<u8> {
    let protected = cbor(|e| {
        e.map(1)?.u8(1)?.i8(-8)?;
        Ok(())
    });

    cbor(|e| {
        e.array(4)?
            .bytes(&protected)?
            .map(1)?
            .u8(4)?
            .bytes(b"key-1")?
            .bytes(payload)?
            .bytes(signature)?;
        Ok(())
    })
}

/// COSE_Sign1 with a semantic tag and `n` elements
pub fn tagged_tuple(tag: u64, n: u64) -> Vec<u8> {
    cbor(|e| {
        e.tag(Tag::new(tag))?.array(n)?;
        for _ in 0..n {
            e.bytes(&SIGNATURE)?;
        }
        Ok(())
    })
}

/// Witness envelope `[[public_key, signature]]`
pub fn witness(public_key: &[u8], signature: &[u8]) -> Vec<u8> {
    cbor(|e| {
        e.array(1)?.array(2)?.bytes(public_key)?.bytes(signature)?;
        Ok(())
    })
}

/// `cardano-signature` payload `{1: request_id, 2: envelope}`
pub fn signature_payload(request_id: &[u8], envelope: &[u8]) -> Vec<u8> {
    cbor(|e| {
        e.map(2)?.u8(1)?.bytes(request_id)?.u8(2)?.bytes(envelope)?;
        Ok(())
    })
}

/// UTXO context entry `{txHash, index, address, value}`
pub struct Utxo<'a> {
    pub tx_hash: [u8; 32],
    pub index: u64,
    pub address: &'a str,
    pub lovelace: u64,
}

/// Signing request `{"tx": tx, "utxos": [..]}`
pub fn sign_request(tx: &[u8], utxos: &[Utxo]) -> Vec<u8> {
    cbor(|e| {
        e.map(2)?.str("tx")?.bytes(tx)?;
        e.str("utxos")?.array(utxos.len() as u64)?;
        for u in utxos {
            e.map(4)?
                .str("txHash")?
                .bytes(&u.tx_hash)?
                .str("index")?
                .u64(u.index)?
                .str("address")?
                .str(u.address)?
                .str("value")?
                .u64(u.lovelace)?;
        }
        Ok(())
    })
}

/// Codec returning a fixed body for the expected bytes only
pub struct FakeCodec {
    pub expected: Vec<u8>,
    pub full: bool,
    pub body: TxBody,
}

impl FakeCodec {
    pub fn new(expected: &[u8], body: TxBody) -> Self {
        Self {
            expected: expected.to_vec(),
            full: true,
            body,
        }
    }

    /// Accept the bytes as a bare body only
    pub fn body_only(mut self) -> Self {
        self.full = false;
        self
    }

    fn check(&self, bytes: &[u8]) -> Result<TxBody, CodecError> {
        match bytes == self.expected.as_slice() {
            true => Ok(self.body.clone()),
            false => Err(CodecError("unexpected bytes".to_string())),
        }
    }
}

impl TxCodec for FakeCodec {
    fn parse_transaction(&self, bytes: &[u8]) -> Result<TxBody, CodecError> {
        match self.full {
            true => self.check(bytes),
            false => Err(CodecError("not a transaction".to_string())),
        }
    }

    fn parse_transaction_body(&self, bytes: &[u8]) -> Result<TxBody, CodecError> {
        self.check(bytes)
    }
}

/// Body spending `inputs` into `outputs` (address, lovelace)
pub fn tx_body(inputs: &[([u8; 32], u64)], outputs: &[(&str, u64)], fee: u64) -> TxBody {
    TxBody {
        inputs: inputs
            .iter()
            .map(|(h, i)| BodyInput {
                tx_hash: hex::encode(h),
                index: *i,
            })
            .collect(),
        outputs: outputs
            .iter()
            .map(|(a, v)| BodyOutput {
                address: a.to_string(),
                lovelace: *v,
                assets: vec![],
            })
            .collect(),
        fee,
        ttl: None,
        validity_start: None,
    }
}
