// Copyright (c) 2022-2023 The MobileCoin Foundation

//! [TxCodec] backed by `pallas-traverse`, covering every era pallas decodes

use pallas_traverse::{MultiEraOutput, MultiEraTx};

use super::codec::{AssetEntry, BodyInput, BodyOutput, CodecError, TxBody, TxCodec};
use crate::value::printable_ascii;

/// Empty witness set, valid flag and null auxiliary data used to frame a
/// bare body as a transaction
const BODY_FRAME_TRAILER: [u8; 3] = [0xa0, 0xf5, 0xf6];

/// Pallas-backed transaction codec
#[derive(Copy, Clone, Debug, Default)]
pub struct PallasCodec;

impl TxCodec for PallasCodec {
    fn parse_transaction(&self, bytes: &[u8]) -> Result<TxBody, CodecError> {
        let tx = MultiEraTx::decode(bytes).map_err(|e| CodecError(e.to_string()))?;

        Ok(tx_body(&tx))
    }

    fn parse_transaction_body(&self, bytes: &[u8]) -> Result<TxBody, CodecError> {
        // Bodies are CBOR maps (major type 5)
        if !matches!(bytes.first(), Some(0xa0..=0xbf)) {
            return Err(CodecError("transaction body is not a CBOR map".to_string()));
        }

        let mut framed = Vec::with_capacity(bytes.len() + 1 + BODY_FRAME_TRAILER.len());
        framed.push(0x84);
        framed.extend_from_slice(bytes);
        framed.extend_from_slice(&BODY_FRAME_TRAILER);

        let tx = MultiEraTx::decode(&framed).map_err(|e| CodecError(e.to_string()))?;

        Ok(tx_body(&tx))
    }
}

fn tx_body(tx: &MultiEraTx<'_>) -> TxBody {
    let inputs = tx
        .inputs()
        .iter()
        .map(|i| BodyInput {
            tx_hash: i.hash().to_string(),
            index: i.index(),
        })
        .collect();

    let outputs = tx.outputs().iter().map(body_output).collect();

    TxBody {
        inputs,
        outputs,
        fee: tx.fee().unwrap_or(0),
        ttl: tx.ttl(),
        validity_start: tx.validity_start(),
    }
}

fn body_output(o: &MultiEraOutput<'_>) -> BodyOutput {
    // Prefer bech32, falling back to hex for eras without a bech32 form
    let address = match o.address() {
        Ok(a) => a.to_bech32().unwrap_or_else(|_| hex::encode(a.to_vec())),
        Err(e) => format!("(unreadable address: {e})"),
    };

    let mut assets = vec![];
    for policy in o.non_ada_assets() {
        let policy_id = policy.policy().to_string();

        for a in policy.assets() {
            assets.push(AssetEntry {
                policy_id: policy_id.clone(),
                asset_name_hex: hex::encode(a.name()),
                asset_name_ascii: printable_ascii(a.name()),
                quantity: a.any_coin().to_string(),
            });
        }
    }

    BodyOutput {
        address,
        lovelace: o.lovelace_amount(),
        assets,
    }
}
