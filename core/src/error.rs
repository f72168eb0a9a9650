// Copyright (c) 2022-2023 The MobileCoin Foundation

use crate::value::DecodeError;

/// Terminal document errors
///
/// Structural mismatches, codec failures and missing context are reported
/// within an [Inspection][crate::inspect::Inspection] rather than here.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Payload is not CBOR
    #[error("Payload decode failed: {0}")]
    Decode(#[from] DecodeError),
}
