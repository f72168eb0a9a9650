// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Generic decoded CBOR value tree
//!
//! Payloads arrive without a schema so the engine works over a plain tagged
//! union rather than typed structures. Map entries retain their encoded
//! order, traversal order is relied on for candidate tie-breaking.

use minicbor::{data::Type, Decoder};

/// Maximum container nesting decoded by [decode], deeper items are
/// skipped and decode as [DecodedValue::Null]
pub const MAX_DECODE_DEPTH: usize = 64;

/// Decoded CBOR value
#[derive(Clone, PartialEq, Debug)]
pub enum DecodedValue {
    /// Map with entries in encoded order
    Map(Vec<(DecodedValue, DecodedValue)>),
    /// Array / sequence
    Sequence(Vec<DecodedValue>),
    /// Byte string
    ByteString(Vec<u8>),
    /// Text string
    TextString(String),
    /// Integer (covers the full CBOR major type 0/1 range)
    Integer(i128),
    /// Floating point value
    Float(f64),
    /// Semantic tag wrapping an inner value
    Tag(u64, Box<DecodedValue>),
    /// Boolean
    Boolean(bool),
    /// Null, undefined and unassigned simple values
    Null,
}

/// CBOR decoding errors
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// Underlying decoder rejected the input
    #[error("CBOR decode failed: {0}")]
    Cbor(#[from] minicbor::decode::Error),

    /// Input contains data following the first item
    #[error("Trailing data after CBOR item ({0} bytes)")]
    TrailingBytes(usize),

    /// Unsupported major type or reserved encoding
    #[error("Unsupported CBOR item at offset {0}")]
    Unsupported(usize),
}

/// Decode a single CBOR item spanning the whole of `bytes`
pub fn decode(bytes: &[u8]) -> Result<DecodedValue, DecodeError> {
    let mut d = Decoder::new(bytes);

    let v = decode_item(&mut d, 0)?;

    let remaining = bytes.len() - d.position();
    if remaining > 0 {
        return Err(DecodeError::TrailingBytes(remaining));
    }

    Ok(v)
}

fn decode_item(d: &mut Decoder<'_>, depth: usize) -> Result<DecodedValue, DecodeError> {
    if depth > MAX_DECODE_DEPTH {
        d.skip()?;
        return Ok(DecodedValue::Null);
    }

    let v = match d.datatype()? {
        Type::Bool => DecodedValue::Boolean(d.bool()?),
        Type::Null => {
            d.null()?;
            DecodedValue::Null
        }
        Type::Undefined => {
            d.undefined()?;
            DecodedValue::Null
        }
        Type::Simple => {
            d.simple()?;
            DecodedValue::Null
        }
        Type::U8 | Type::U16 | Type::U32 | Type::U64 => DecodedValue::Integer(d.u64()? as i128),
        Type::I8 | Type::I16 | Type::I32 | Type::I64 => DecodedValue::Integer(d.i64()? as i128),
        Type::Int => DecodedValue::Integer(i128::from(d.int()?)),
        Type::F16 => DecodedValue::Float(f64::from(d.f16()?)),
        Type::F32 => DecodedValue::Float(f64::from(d.f32()?)),
        Type::F64 => DecodedValue::Float(d.f64()?),
        Type::Bytes => DecodedValue::ByteString(d.bytes()?.to_vec()),
        Type::BytesIndef => {
            let mut b = Vec::new();
            for chunk in d.bytes_iter()? {
                b.extend_from_slice(chunk?);
            }
            DecodedValue::ByteString(b)
        }
        Type::String => DecodedValue::TextString(d.str()?.to_string()),
        Type::StringIndef => {
            let mut s = String::new();
            for chunk in d.str_iter()? {
                s.push_str(chunk?);
            }
            DecodedValue::TextString(s)
        }
        Type::Array | Type::ArrayIndef => {
            let mut items = Vec::new();
            match d.array()? {
                Some(n) => {
                    for _ in 0..n {
                        items.push(decode_item(d, depth + 1)?);
                    }
                }
                None => {
                    while d.datatype()? != Type::Break {
                        items.push(decode_item(d, depth + 1)?);
                    }
                    skip_break(d);
                }
            }
            DecodedValue::Sequence(items)
        }
        Type::Map | Type::MapIndef => {
            let mut entries = Vec::new();
            match d.map()? {
                Some(n) => {
                    for _ in 0..n {
                        let k = decode_item(d, depth + 1)?;
                        let v = decode_item(d, depth + 1)?;
                        entries.push((k, v));
                    }
                }
                None => {
                    while d.datatype()? != Type::Break {
                        let k = decode_item(d, depth + 1)?;
                        let v = decode_item(d, depth + 1)?;
                        entries.push((k, v));
                    }
                    skip_break(d);
                }
            }
            DecodedValue::Map(entries)
        }
        Type::Tag => {
            let t = d.tag()?;
            let inner = decode_item(d, depth + 1)?;
            DecodedValue::Tag(t.as_u64(), Box::new(inner))
        }
        _ => return Err(DecodeError::Unsupported(d.position())),
    };

    Ok(v)
}

/// Consume the single `0xff` break byte closing an indefinite container
fn skip_break(d: &mut Decoder<'_>) {
    let p = d.position();
    d.set_position(p + 1);
}

impl DecodedValue {
    /// Fetch a byte view of this value if it is a byte string
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            DecodedValue::ByteString(b) => Some(b),
            _ => None,
        }
    }

    /// Fetch a string view of this value if it is a text string
    pub fn as_text(&self) -> Option<&str> {
        match self {
            DecodedValue::TextString(s) => Some(s),
            _ => None,
        }
    }

    /// Fetch map entries if this value is a map
    pub fn as_map(&self) -> Option<&[(DecodedValue, DecodedValue)]> {
        match self {
            DecodedValue::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Fetch sequence items if this value is a sequence
    pub fn as_sequence(&self) -> Option<&[DecodedValue]> {
        match self {
            DecodedValue::Sequence(s) => Some(s),
            _ => None,
        }
    }

    /// Lookup a map entry by text key
    pub fn get(&self, key: &str) -> Option<&DecodedValue> {
        self.as_map()?
            .iter()
            .find(|(k, _)| k.as_text() == Some(key))
            .map(|(_, v)| v)
    }

    /// Lookup a map entry by numeric key, matching either an integer key
    /// or its decimal text spelling
    pub fn get_numeric(&self, key: i128) -> Option<&DecodedValue> {
        let m = self.as_map()?;

        if let Some((_, v)) = m
            .iter()
            .find(|(k, _)| matches!(k, DecodedValue::Integer(n) if *n == key))
        {
            return Some(v);
        }

        let text = key.to_string();
        m.iter()
            .find(|(k, _)| k.as_text() == Some(text.as_str()))
            .map(|(_, v)| v)
    }

    /// Label used when this value appears as a map key in a path
    pub fn key_label(&self) -> String {
        match self {
            DecodedValue::TextString(s) => s.clone(),
            DecodedValue::Integer(n) => n.to_string(),
            DecodedValue::ByteString(b) => hex::encode(b),
            DecodedValue::Boolean(b) => b.to_string(),
            DecodedValue::Float(f) => f.to_string(),
            DecodedValue::Null => "null".to_string(),
            DecodedValue::Tag(t, _) => format!("tag({t})"),
            DecodedValue::Map(_) => "map".to_string(),
            DecodedValue::Sequence(_) => "array".to_string(),
        }
    }

    /// Convert to a JSON tree for display
    ///
    /// Byte strings are rendered as `{"type": "Buffer", "hex": ..}`, tags as
    /// `{"tag": n, "value": ..}` and map keys via [DecodedValue::key_label].
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::{json, Map, Value};

        match self {
            DecodedValue::Map(entries) => {
                let mut m = Map::new();
                for (k, v) in entries {
                    m.insert(k.key_label(), v.to_json());
                }
                Value::Object(m)
            }
            DecodedValue::Sequence(items) => {
                Value::Array(items.iter().map(|v| v.to_json()).collect())
            }
            DecodedValue::ByteString(b) => json!({ "type": "Buffer", "hex": hex::encode(b) }),
            DecodedValue::TextString(s) => Value::String(s.clone()),
            DecodedValue::Integer(n) => match i64::try_from(*n) {
                Ok(v) => json!(v),
                Err(_) => match u64::try_from(*n) {
                    Ok(v) => json!(v),
                    Err(_) => Value::String(n.to_string()),
                },
            },
            DecodedValue::Float(f) => json!(f),
            DecodedValue::Tag(t, inner) => json!({ "tag": t, "value": inner.to_json() }),
            DecodedValue::Boolean(b) => Value::Bool(*b),
            DecodedValue::Null => Value::Null,
        }
    }

    /// Convert to a header-style JSON value, byte strings become bare hex
    pub fn to_header_json(&self) -> serde_json::Value {
        match self {
            DecodedValue::ByteString(b) => serde_json::Value::String(hex::encode(b)),
            _ => self.to_json(),
        }
    }
}

impl serde::Serialize for DecodedValue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// Render bytes as text when every character is printable ASCII
/// (tab, newline and carriage return included), empty otherwise
pub fn printable_ascii(bytes: &[u8]) -> Option<String> {
    if bytes.is_empty() {
        return None;
    }

    let printable = bytes
        .iter()
        .all(|b| matches!(b, b'\t' | b'\n' | b'\r' | 0x20..=0x7e));

    match printable {
        true => Some(String::from_utf8_lossy(bytes).into_owned()),
        false => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_preserves_map_order() {
        // {"b": 1, "a": h'0102'}
        let b = hex::decode("a26162016161420102").unwrap();
        let v = decode(&b).unwrap();

        let m = v.as_map().unwrap();
        assert_eq!(m[0].0, DecodedValue::TextString("b".into()));
        assert_eq!(m[1].1, DecodedValue::ByteString(vec![1, 2]));
    }

    #[test]
    fn decode_indefinite_containers() {
        // [_ 1, [_ 2]] with an indefinite byte string (_ h'01', h'02')
        let b = hex::decode("9f019f02ff5f41014102ffff").unwrap();
        let v = decode(&b).unwrap();

        assert_eq!(
            v,
            DecodedValue::Sequence(vec![
                DecodedValue::Integer(1),
                DecodedValue::Sequence(vec![DecodedValue::Integer(2)]),
                DecodedValue::ByteString(vec![1, 2]),
            ])
        );
    }

    #[test]
    fn decode_tags_and_negatives() {
        // 18([-1, null, true])
        let b = hex::decode("d28320f6f5").unwrap();
        let v = decode(&b).unwrap();

        assert_eq!(
            v,
            DecodedValue::Tag(
                18,
                Box::new(DecodedValue::Sequence(vec![
                    DecodedValue::Integer(-1),
                    DecodedValue::Null,
                    DecodedValue::Boolean(true),
                ]))
            )
        );
    }

    #[test]
    fn decode_rejects_trailing_and_truncated() {
        assert!(matches!(
            decode(&[0x01, 0x02]),
            Err(DecodeError::TrailingBytes(1))
        ));
        assert!(decode(&[0x82, 0x01]).is_err());
        assert!(decode(&[]).is_err());
    }

    #[test]
    fn decode_skips_excessive_nesting() {
        let mut b = vec![0x81; MAX_DECODE_DEPTH + 6];
        b.push(0x01);

        let mut v = decode(&b).unwrap();
        let mut levels = 0;
        while let DecodedValue::Sequence(mut items) = v {
            levels += 1;
            v = items.remove(0);
        }

        assert_eq!(levels, MAX_DECODE_DEPTH + 1);
        assert_eq!(v, DecodedValue::Null);

        // Skipped items must still be well formed
        assert!(decode(&vec![0x81; MAX_DECODE_DEPTH + 6]).is_err());
    }

    #[test]
    fn numeric_lookup_accepts_text_keys() {
        let v = DecodedValue::Map(vec![
            (DecodedValue::TextString("2".into()), DecodedValue::Integer(7)),
            (DecodedValue::Integer(1), DecodedValue::Integer(3)),
        ]);

        assert_eq!(v.get_numeric(1), Some(&DecodedValue::Integer(3)));
        assert_eq!(v.get_numeric(2), Some(&DecodedValue::Integer(7)));
        assert_eq!(v.get_numeric(3), None);
    }

    #[test]
    fn printable_ascii_filter() {
        assert_eq!(printable_ascii(b"hello\n"), Some("hello\n".to_string()));
        assert_eq!(printable_ascii(&[0x68, 0x00]), None);
        assert_eq!(printable_ascii(&[]), None);
    }
}
