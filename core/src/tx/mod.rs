// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Transaction interpreter
//!
//! Parses located transaction bytes via a [TxCodec] and correlates inputs
//! with UTXO context from the surrounding payload to derive balances. All
//! amounts are lovelace integers, display units are applied only by the
//! [formatter][crate::format].

use serde::Serialize;
use strum::Display;

use crate::{
    helpers::insert_ordered,
    utxo::{collect_utxos, utxo_key},
    value::DecodedValue,
};

mod codec;
pub use codec::{AssetEntry, BodyInput, BodyOutput, CodecError, TxBody, TxCodec};

#[cfg(feature = "pallas")]
mod pallas;
#[cfg(feature = "pallas")]
pub use pallas::PallasCodec;

/// Representation the transaction bytes were parsed as
#[derive(Copy, Clone, PartialEq, Debug, Display, Serialize)]
pub enum ParsedAs {
    Transaction,
    TransactionBody,
}

/// Transaction interpretation errors
#[derive(Clone, PartialEq, Debug, thiserror::Error)]
pub enum InterpretError {
    /// Neither a full transaction nor a bare body could be parsed
    #[error("Cannot parse as Cardano Tx/TxBody: {0}")]
    Parse(CodecError),
}

/// Transaction input with any resolved UTXO context
#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct InterpretedInput {
    pub tx_hash: String,
    pub index: u64,
    /// Address from UTXO context
    pub address: Option<String>,
    /// Value from UTXO context
    pub lovelace: Option<u64>,
    /// Raw asset entries from UTXO context
    pub assets: Vec<DecodedValue>,
}

/// Transaction output
#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct InterpretedOutput {
    pub address: String,
    pub lovelace: u64,
    pub assets: Vec<AssetEntry>,
}

/// Interpreted transaction
#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct InterpretedTransaction {
    pub parsed_as: ParsedAs,
    pub inputs: Vec<InterpretedInput>,
    pub outputs: Vec<InterpretedOutput>,
    pub fee_lovelace: u64,
    pub ttl: Option<u64>,
    pub validity_start: Option<u64>,
    /// Input addresses resolved from context, in first-seen order
    pub from_addresses: Vec<String>,
    /// Output addresses, in first-seen order
    pub to_addresses: Vec<String>,
    /// Set only when every input resolved a value
    pub input_value_known: bool,
}

impl InterpretedTransaction {
    /// Total input value, only when every input value is known
    pub fn input_total(&self) -> Option<u128> {
        if !self.input_value_known {
            return None;
        }

        self.inputs
            .iter()
            .map(|i| i.lovelace.map(u128::from))
            .sum::<Option<u128>>()
    }

    /// Total output value
    pub fn output_total(&self) -> u128 {
        self.outputs.iter().map(|o| u128::from(o.lovelace)).sum()
    }

    /// `input_total - output_total - fee`, only when inputs are fully known
    /// and cover outputs plus fee
    ///
    /// Outputs plus fee exceeding known inputs indicates missing context so
    /// no balance is derived.
    pub fn balance_delta(&self) -> Option<u128> {
        let inputs = self.input_total()?;
        let spent = self.output_total() + u128::from(self.fee_lovelace);

        inputs.checked_sub(spent)
    }
}

/// Interpret `tx_bytes`, resolving inputs against UTXO context found in `context`
pub fn interpret(
    codec: &impl TxCodec,
    tx_bytes: &[u8],
    context: &DecodedValue,
    utxo_depth: usize,
) -> Result<InterpretedTransaction, InterpretError> {
    let (parsed_as, body) = parse(codec, tx_bytes)?;

    let utxos = collect_utxos(context, utxo_depth);

    let mut inputs = Vec::with_capacity(body.inputs.len());
    let mut from_addresses = vec![];
    let mut input_value_known = true;

    for i in &body.inputs {
        let lookup = utxos.get(&utxo_key(&i.tx_hash, i.index));
        let lovelace = lookup.and_then(|u| u.lovelace);

        if lovelace.is_none() {
            input_value_known = false;
        }

        let address = lookup.map(|u| u.address.clone()).filter(|a| !a.is_empty());
        if let Some(a) = &address {
            insert_ordered(&mut from_addresses, a);
        }

        inputs.push(InterpretedInput {
            tx_hash: i.tx_hash.clone(),
            index: i.index,
            address,
            lovelace,
            assets: lookup.map(|u| u.assets.clone()).unwrap_or_default(),
        });
    }

    let mut outputs = Vec::with_capacity(body.outputs.len());
    let mut to_addresses = vec![];

    for o in body.outputs {
        insert_ordered(&mut to_addresses, &o.address);

        outputs.push(InterpretedOutput {
            address: o.address,
            lovelace: o.lovelace,
            assets: o.assets,
        });
    }

    #[cfg(feature = "log")]
    log::debug!(
        "interpreted {} with {} inputs ({} resolved), {} outputs",
        parsed_as,
        inputs.len(),
        inputs.iter().filter(|i| i.lovelace.is_some()).count(),
        outputs.len()
    );

    Ok(InterpretedTransaction {
        parsed_as,
        inputs,
        outputs,
        fee_lovelace: body.fee,
        ttl: body.ttl,
        validity_start: body.validity_start,
        from_addresses,
        to_addresses,
        input_value_known,
    })
}

/// Parse as a full transaction, falling back to a bare body
fn parse(codec: &impl TxCodec, tx_bytes: &[u8]) -> Result<(ParsedAs, TxBody), InterpretError> {
    match codec.parse_transaction(tx_bytes) {
        Ok(b) => return Ok((ParsedAs::Transaction, b)),
        Err(_e) => {
            #[cfg(feature = "log")]
            log::debug!("full transaction parse failed ({}), trying body", _e);
        }
    }

    codec
        .parse_transaction_body(tx_bytes)
        .map(|b| (ParsedAs::TransactionBody, b))
        .map_err(InterpretError::Parse)
}
