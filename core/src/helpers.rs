// Copyright (c) 2022-2023 The MobileCoin Foundation

/// Serialize byte fields as lower-case hex strings
pub mod hex_bytes {
    use serde::Serializer;

    pub fn serialize<S: Serializer, T: AsRef<[u8]>>(b: &T, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&hex::encode(b.as_ref()))
    }
}

/// Serialize optional byte fields as lower-case hex strings
pub mod opt_hex_bytes {
    use serde::Serializer;

    pub fn serialize<S: Serializer, T: AsRef<[u8]>>(
        b: &Option<T>,
        s: S,
    ) -> Result<S::Ok, S::Error> {
        match b {
            Some(v) => s.serialize_some(&hex::encode(v.as_ref())),
            None => s.serialize_none(),
        }
    }
}

/// Insert into an insertion-ordered set
pub(crate) fn insert_ordered(set: &mut Vec<String>, v: &str) {
    if !set.iter().any(|s| s == v) {
        set.push(v.to_string());
    }
}
