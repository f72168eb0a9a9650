// Copyright (c) 2022-2023 The MobileCoin Foundation

//! UR fragment session
//!
//! Normalises and de-duplicates scanned fragments before passing them to a
//! [FragmentDecoder], reporting progress until the payload completes.

use std::collections::HashSet;
use std::fmt::Display;

use log::{debug, info, warn};
use serde::Serialize;

use crate::{
    ur::{FountainDecoder, FragmentDecoder, UrPayload},
    Error,
};

/// UR scheme prefix
pub const UR_PREFIX: &str = "ur:";

/// Fragment collection progress
#[derive(Copy, Clone, PartialEq, Debug, Default, Serialize)]
pub struct Progress {
    /// Distinct fragments accepted
    pub received: usize,
    /// Fragment count advertised by multi-part URs
    pub expected: Option<usize>,
}

impl Progress {
    /// Completion estimate in the range `0..=1`
    pub fn ratio(&self) -> f64 {
        match self.expected {
            Some(n) if n > 0 => (self.received as f64 / n as f64).min(1.0),
            _ => 0.0,
        }
    }
}

impl Display for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.expected {
            Some(n) => write!(
                f,
                "{}/{} fragments, {:.0}%",
                self.received,
                n,
                self.ratio() * 100.0
            ),
            None => write!(f, "{}/? fragments", self.received),
        }
    }
}

/// Outcome of offering a fragment to a [UrSession]
#[derive(Clone, PartialEq, Debug)]
pub enum Status {
    /// Not a UR fragment
    Ignored,
    /// Fragment already seen in this session
    Duplicate,
    /// Fragment refused by the decoder
    Rejected,
    /// Fragment accepted, payload not yet complete
    Pending(Progress),
    /// Payload reassembled
    Complete(UrPayload),
}

/// UR fragment session
pub struct UrSession<D: FragmentDecoder = FountainDecoder> {
    decoder: D,
    seen: HashSet<String>,
    progress: Progress,
}

impl Default for UrSession<FountainDecoder> {
    fn default() -> Self {
        Self::new(FountainDecoder::new())
    }
}

impl<D: FragmentDecoder> UrSession<D> {
    /// Create a new session using the provided decoder
    pub fn new(decoder: D) -> Self {
        Self {
            decoder,
            seen: HashSet::new(),
            progress: Progress::default(),
        }
    }

    /// Current progress
    pub fn progress(&self) -> Progress {
        self.progress
    }

    /// Offer a scanned fragment
    ///
    /// Decoder failures on completion are returned as errors, every other
    /// outcome is reported via [Status].
    pub fn receive(&mut self, raw: &str) -> Result<Status, Error> {
        let part = raw.trim();
        let normalized = part.to_lowercase();

        if !normalized.starts_with(UR_PREFIX) {
            return Ok(Status::Ignored);
        }

        // Repeats are expected from looping QR animations
        if !self.seen.insert(normalized.clone()) {
            return Ok(Status::Duplicate);
        }

        if !self.decoder.receive_fragment(&normalized) {
            warn!("Fragment rejected");
            return Ok(Status::Rejected);
        }

        self.progress.received += 1;
        if let Some(n) = sequence_count(&normalized) {
            self.progress.expected = Some(n);
        }

        debug!(
            "Fragment received: {} ({})",
            part.chars().take(52).collect::<String>(),
            self.progress
        );

        if !self.decoder.is_complete() {
            return Ok(Status::Pending(self.progress));
        }

        match self.decoder.result()? {
            Some(p) => {
                info!(
                    "UR decoded, type: {} length: {} bytes",
                    p.ur_type,
                    p.cbor.len()
                );
                Ok(Status::Complete(p))
            }
            None => Err(Error::Incomplete(self.progress)),
        }
    }

    /// Fetch the reassembled payload
    pub fn payload(&self) -> Result<UrPayload, Error> {
        match self.decoder.is_complete() {
            true => self.decoder.result()?.ok_or(Error::Incomplete(self.progress)),
            false => Err(Error::Incomplete(self.progress)),
        }
    }

    /// Discard received fragments, the seen-set and progress
    pub fn reset(&mut self) {
        self.decoder.reset();
        self.seen.clear();
        self.progress = Progress::default();

        debug!("Session reset");
    }
}

/// Fetch the advertised fragment count from a multi-part `ur:type/seq-count/..`
fn sequence_count(fragment: &str) -> Option<usize> {
    let mut parts = fragment.strip_prefix(UR_PREFIX)?.split('/');

    let _ur_type = parts.next()?;
    let seq = parts.next()?;
    // Single-part URs have no sequence component
    parts.next()?;

    let (_n, count) = seq.split_once('-')?;
    count.parse().ok()
}
