// Copyright (c) 2022-2023 The MobileCoin Foundation

use crate::session::Progress;

/// UR inspection API Error Type
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Fountain decoder failed to reassemble the payload
    #[error("UR decode failed: {0}")]
    Decode(String),

    /// Payload requested before all fragments were received
    #[error("UR payload incomplete ({0})")]
    Incomplete(Progress),

    /// Payload inspection error
    #[error("Inspection failed: {0}")]
    Inspect(#[from] ur_inspect_core::Error),
}
