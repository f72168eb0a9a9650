// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Cardano UR Inspection Library (and CLI)
//!
//! Collects UR fragments via a [UrSession], then passes the reassembled
//! payload to the [engine] for inspection.

/// Re-export `ur-inspect-core` for consumers
pub use ur_inspect_core::{self as engine};

mod error;
pub use error::Error;

pub mod session;
pub use session::{Progress, Status, UrSession};

pub mod ur;
pub use ur::{FountainDecoder, FragmentDecoder, UrPayload};

/// Report output format
#[derive(Copy, Clone, Debug, PartialEq, clap::ValueEnum, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Format {
    /// Report lines
    Text,
    /// JSON document
    Json,
}

/// Inspect a reassembled payload using the pallas transaction codec
#[cfg(feature = "pallas")]
pub fn inspect_payload(payload: &UrPayload) -> Result<engine::Inspection, Error> {
    let i = engine::inspect(
        &payload.ur_type,
        &payload.cbor,
        &engine::tx::PallasCodec,
        &engine::ScanConfig::default(),
    )?;

    Ok(i)
}
