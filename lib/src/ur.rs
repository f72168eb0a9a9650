// Copyright (c) 2022-2023 The MobileCoin Foundation

//! UR fragment decoding
//!
//! [FragmentDecoder] abstracts the fountain-code reassembly of animated UR
//! QR sequences, with [FountainDecoder] providing an implementation over
//! `foundation-ur`.

use foundation_ur::{bytewords, Decoder, UR};
use log::debug;

use crate::Error;

/// Reassembled UR payload
#[derive(Clone, PartialEq, Debug)]
pub struct UrPayload {
    /// UR type tag (eg. `cardano-sign-request`)
    pub ur_type: String,
    /// CBOR payload bytes
    pub cbor: Vec<u8>,
}

/// Fragment decoder, accepting UR text fragments one at a time
pub trait FragmentDecoder {
    /// Offer a normalised `ur:` fragment, returning whether it was accepted
    fn receive_fragment(&mut self, fragment: &str) -> bool;

    /// Check whether enough fragments have been received to complete the payload
    fn is_complete(&self) -> bool;

    /// Fetch the reassembled payload, or the decoder error on failure
    fn result(&self) -> Result<Option<UrPayload>, Error>;

    /// Discard all received fragments
    fn reset(&mut self);
}

/// [FragmentDecoder] using `foundation-ur`
///
/// Single-part URs complete immediately, multi-part URs are passed to the
/// fountain decoder.
#[derive(Default)]
pub struct FountainDecoder {
    decoder: Decoder,
    ur_type: Option<String>,
    single: Option<Vec<u8>>,
}

impl FountainDecoder {
    /// Create a new fountain decoder
    pub fn new() -> Self {
        Self::default()
    }
}

impl FragmentDecoder for FountainDecoder {
    fn receive_fragment(&mut self, fragment: &str) -> bool {
        let ur = match UR::parse(fragment) {
            Ok(v) => v,
            Err(e) => {
                debug!("UR parse failed: {:?}", e);
                return false;
            }
        };

        let ur_type = ur.as_type().to_string();

        // Fragments from a different payload are not mixed in
        if let Some(t) = &self.ur_type {
            if t != &ur_type {
                debug!("UR type mismatch (expected: {}, actual: {})", t, ur_type);
                return false;
            }
        }

        // Single-part URs carry the whole (bytewords encoded) payload
        let single = match &ur {
            UR::SinglePart { message, .. } => Some(
                bytewords::decode(message, bytewords::Style::Minimal)
                    .map_err(|e| format!("{e:?}")),
            ),
            UR::SinglePartDeserialized { message, .. } => Some(Ok(message.to_vec())),
            _ => None,
        };

        if let Some(r) = single {
            return match r {
                Ok(b) => {
                    self.ur_type = Some(ur_type);
                    self.single = Some(b);
                    true
                }
                Err(e) => {
                    debug!("bytewords decode failed: {}", e);
                    false
                }
            };
        }

        match self.decoder.receive(ur) {
            Ok(_) => {
                self.ur_type = Some(ur_type);
                true
            }
            Err(e) => {
                debug!("fountain decoder rejected fragment: {:?}", e);
                false
            }
        }
    }

    fn is_complete(&self) -> bool {
        self.single.is_some() || self.decoder.is_complete()
    }

    fn result(&self) -> Result<Option<UrPayload>, Error> {
        let ur_type = match &self.ur_type {
            Some(v) => v.clone(),
            None => return Ok(None),
        };

        if let Some(b) = &self.single {
            return Ok(Some(UrPayload {
                ur_type,
                cbor: b.clone(),
            }));
        }

        match self.decoder.message() {
            Ok(Some(m)) => Ok(Some(UrPayload {
                ur_type,
                cbor: m.to_vec(),
            })),
            Ok(None) => Ok(None),
            Err(e) => Err(Error::Decode(format!("{e:?}"))),
        }
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}
