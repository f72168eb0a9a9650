// Copyright (c) 2022-2023 The MobileCoin Foundation

use base64::prelude::{Engine as _, BASE64_STANDARD};

/// Hex encoded bytes, optionally `0x` prefixed
#[derive(Clone, PartialEq, Debug)]
pub struct HexData(pub Vec<u8>);

impl std::str::FromStr for HexData {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s.strip_prefix("0x").unwrap_or(s);

        Ok(HexData(hex::decode(s)?))
    }
}

impl AsRef<[u8]> for HexData {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Base64 (standard alphabet) encoded bytes
#[derive(Clone, PartialEq, Debug)]
pub struct B64Data(pub Vec<u8>);

impl std::str::FromStr for B64Data {
    type Err = base64::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(B64Data(BASE64_STANDARD.decode(s.trim())?))
    }
}

impl AsRef<[u8]> for B64Data {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
