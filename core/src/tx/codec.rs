// Copyright (c) 2022-2023 The MobileCoin Foundation

use serde::Serialize;

/// Transaction codec rejection, carrying the codec's message
#[derive(Clone, PartialEq, Debug, thiserror::Error)]
#[error("{0}")]
pub struct CodecError(pub String);

/// Spent output reference from a transaction body
#[derive(Clone, PartialEq, Debug)]
pub struct BodyInput {
    /// Lower-case hex transaction hash
    pub tx_hash: String,
    pub index: u64,
}

/// Native asset entry attached to an output
#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct AssetEntry {
    /// Hex policy id
    pub policy_id: String,
    /// Hex asset name
    pub asset_name_hex: String,
    /// Asset name as text, when printable ASCII
    pub asset_name_ascii: Option<String>,
    /// Decimal quantity
    pub quantity: String,
}

/// Output from a transaction body
#[derive(Clone, PartialEq, Debug)]
pub struct BodyOutput {
    /// Bech32 address, hex where bech32 is unavailable
    pub address: String,
    pub lovelace: u64,
    pub assets: Vec<AssetEntry>,
}

/// Fields of a parsed transaction body used for auditing
#[derive(Clone, PartialEq, Debug, Default)]
pub struct TxBody {
    pub inputs: Vec<BodyInput>,
    pub outputs: Vec<BodyOutput>,
    /// Declared fee, zero when absent
    pub fee: u64,
    pub ttl: Option<u64>,
    pub validity_start: Option<u64>,
}

/// Cardano transaction codec
///
/// Each operation fails independently, callers fall back from a full
/// transaction to a bare body.
pub trait TxCodec {
    /// Parse signed transaction bytes `[body, witnesses, valid, aux]`
    fn parse_transaction(&self, bytes: &[u8]) -> Result<TxBody, CodecError>;

    /// Parse bare transaction body bytes
    fn parse_transaction_body(&self, bytes: &[u8]) -> Result<TxBody, CodecError>;
}
