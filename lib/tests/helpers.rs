#![allow(unused)]

use ur_inspect::{Error, FragmentDecoder, UrPayload};

/// Setup logging for tests
pub fn setup_logging() {
    let _ = simplelog::SimpleLogger::init(log::LevelFilter::Debug, Default::default());
}

/// Build a CBOR byte string payload
pub fn cbor_bytes(b: &[u8]) -> Vec<u8> {
    let mut e = minicbor::Encoder::new(Vec::new());
    e.bytes(b).unwrap();
    e.into_writer()
}

/// `cardano-signature` payload `{1: request_id, 2: [[public_key, signature]]}`
pub fn witness_signature_payload() -> Vec<u8> {
    let mut w = minicbor::Encoder::new(Vec::new());
    w.array(1)
        .unwrap()
        .array(2)
        .unwrap()
        .bytes(&[0x3c; 32])
        .unwrap()
        .bytes(&[0x5a; 64])
        .unwrap();
    let witness = w.into_writer();

    let mut e = minicbor::Encoder::new(Vec::new());
    e.map(2)
        .unwrap()
        .u8(1)
        .unwrap()
        .bytes(&[0x01; 16])
        .unwrap()
        .u8(2)
        .unwrap()
        .bytes(&witness)
        .unwrap();
    e.into_writer()
}

/// Decoder accepting `ur:test/` fragments, completing after `needed`
pub struct ScriptedDecoder {
    pub needed: usize,
    pub accepted: Vec<String>,
    pub failure: Option<String>,
}

impl ScriptedDecoder {
    pub fn new(needed: usize) -> Self {
        Self {
            needed,
            accepted: vec![],
            failure: None,
        }
    }

    /// Fail reassembly on completion
    pub fn failing(mut self, e: &str) -> Self {
        self.failure = Some(e.to_string());
        self
    }
}

impl FragmentDecoder for ScriptedDecoder {
    fn receive_fragment(&mut self, fragment: &str) -> bool {
        if !fragment.starts_with("ur:test/") {
            return false;
        }
        self.accepted.push(fragment.to_string());
        true
    }

    fn is_complete(&self) -> bool {
        self.accepted.len() >= self.needed
    }

    fn result(&self) -> Result<Option<UrPayload>, Error> {
        if !self.is_complete() {
            return Ok(None);
        }

        match &self.failure {
            Some(e) => Err(Error::Decode(e.clone())),
            None => Ok(Some(UrPayload {
                ur_type: "test".to_string(),
                cbor: self.accepted.join("|").into_bytes(),
            })),
        }
    }

    fn reset(&mut self) {
        self.accepted.clear();
    }
}
