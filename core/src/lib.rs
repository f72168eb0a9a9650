// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Cardano UR payload inspection core
//!
//! This provides a synchronous, pure [inspection pipeline][inspect] turning a
//! reassembled UR payload (type tag plus CBOR bytes) into a human-readable
//! report, without any knowledge of how the payload was transported.
//!
//! ## Operations
//!
//! Payloads are first decoded to an order-preserving [DecodedValue][value::DecodedValue]
//! tree, then dispatched on their UR type:
//!
//! - `cardano-signature` payloads are [analysed][envelope::analyse_signature]
//!   for COSE_Sign1 and Ed25519 witness envelopes.
//! - Other `cardano-*` payloads are [scanned][scan] for transaction bytes,
//!   which are [interpreted][tx::interpret] against any UTXO context
//!   [found][utxo::collect_utxos] elsewhere in the payload.
//! - Anything else is shown as [raw views][inspect::RawView] only.
//!
//! Results are rendered to ordered text lines by the [formatter][format],
//! or serialised to JSON via `serde`.
//!
//! Transaction decoding is delegated to a [TxCodec][tx::TxCodec], with
//! a [pallas](https://github.com/txpipe/pallas) backed implementation
//! available via the `pallas` feature.
//!

pub mod config;

pub mod envelope;

mod error;
pub use error::Error;

pub mod format;

pub mod helpers;

pub mod inspect;
pub use inspect::{inspect, Analysis, Inspection, RawView};

pub mod scan;

pub mod tx;

pub mod utxo;

pub mod value;
pub use value::{decode, DecodeError, DecodedValue};

pub use config::ScanConfig;
