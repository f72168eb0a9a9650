// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Byte candidate scanner
//!
//! Walks a decoded payload collecting byte-like leaves, ranked by how well
//! their key path matches a set of naming hints. This is a heuristic ranking,
//! callers must tolerate false positives.

use serde::Serialize;

use crate::{config::ScanHints, helpers::hex_bytes, value::DecodedValue};

/// Byte string located in a decoded payload
#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct ByteCandidate {
    /// Candidate bytes
    #[serde(with = "hex_bytes")]
    pub bytes: Vec<u8>,
    /// Key labels from the payload root
    pub path: Vec<String>,
    /// Heuristic score (higher is better)
    pub score: usize,
}

impl ByteCandidate {
    /// Dot-joined path, `(root)` for the payload itself
    pub fn path_label(&self) -> String {
        match self.path.is_empty() {
            true => "(root)".to_string(),
            false => self.path.join("."),
        }
    }
}

/// Scan `root` for byte candidates matching `hints`, returning candidates
/// ordered by `(score desc, length desc)` with ties kept in traversal order
pub fn scan(root: &DecodedValue, hints: &ScanHints, max_depth: usize) -> Vec<ByteCandidate> {
    let mut out = Vec::new();
    let mut path = Vec::new();

    walk(root, &mut path, 0, max_depth, &mut |path, node| {
        let bytes = match candidate_bytes(node, hints.min_length) {
            Some(b) => b,
            None => return,
        };

        let score = score_path(path, hints) + (bytes.len() / 200).min(3);

        out.push(ByteCandidate {
            bytes,
            path: path.to_vec(),
            score,
        });
    });

    // Stable sort retains traversal order for ties
    out.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| b.bytes.len().cmp(&a.bytes.len()))
    });

    out
}

/// Fetch the best scoring candidate for `hints`
pub fn best(root: &DecodedValue, hints: &ScanHints, max_depth: usize) -> Option<ByteCandidate> {
    let c = scan(root, hints, max_depth).into_iter().next();

    #[cfg(feature = "log")]
    if let Some(c) = &c {
        log::debug!(
            "best candidate for {:?}: {} ({} bytes, score {})",
            hints.hints,
            c.path_label(),
            c.bytes.len(),
            c.score
        );
    }

    c
}

/// Collect every byte string in `root` in traversal order, unscored
pub fn collect_byte_strings(root: &DecodedValue, max_depth: usize) -> Vec<ByteCandidate> {
    let mut out = Vec::new();
    let mut path = Vec::new();

    walk(root, &mut path, 0, max_depth, &mut |path, node| {
        if let DecodedValue::ByteString(b) = node {
            out.push(ByteCandidate {
                bytes: b.clone(),
                path: path.to_vec(),
                score: 0,
            });
        }
    });

    out
}

/// Depth-first pre-order walk, calling `visit` for each node within `max_depth`
fn walk<F>(
    node: &DecodedValue,
    path: &mut Vec<String>,
    depth: usize,
    max_depth: usize,
    visit: &mut F,
) where
    F: FnMut(&[String], &DecodedValue),
{
    if depth > max_depth {
        return;
    }

    visit(path, node);

    match node {
        DecodedValue::Map(entries) => {
            for (k, v) in entries {
                path.push(k.key_label());
                walk(v, path, depth + 1, max_depth, visit);
                path.pop();
            }
        }
        DecodedValue::Sequence(items) => {
            for (i, v) in items.iter().enumerate() {
                path.push(i.to_string());
                walk(v, path, depth + 1, max_depth, visit);
                path.pop();
            }
        }
        DecodedValue::Tag(t, inner) => {
            path.push(format!("tag({t})"));
            walk(inner, path, depth + 1, max_depth, visit);
            path.pop();
        }
        DecodedValue::ByteString(_)
        | DecodedValue::TextString(_)
        | DecodedValue::Integer(_)
        | DecodedValue::Float(_)
        | DecodedValue::Boolean(_)
        | DecodedValue::Null => (),
    }
}

/// Convert a node to candidate bytes, accepting byte strings and
/// hex-encoded text (optionally `0x` prefixed, even length)
fn candidate_bytes(node: &DecodedValue, min_length: usize) -> Option<Vec<u8>> {
    let b = match node {
        DecodedValue::ByteString(b) => b.clone(),
        DecodedValue::TextString(s) => parse_hex_text(s, min_length)?,
        _ => return None,
    };

    match b.len() >= min_length && !b.is_empty() {
        true => Some(b),
        false => None,
    }
}

/// Parse purely hexadecimal text of at least `min_length * 2` characters
pub fn parse_hex_text(s: &str, min_length: usize) -> Option<Vec<u8>> {
    let s = s.trim();
    let raw = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);

    if raw.is_empty() || raw.len() % 2 != 0 || raw.len() < min_length * 2 {
        return None;
    }
    if !raw.bytes().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    hex::decode(raw).ok()
}

fn score_path(path: &[String], hints: &ScanHints) -> usize {
    let joined = path.join(".").to_lowercase();

    1 + hints.hints.iter().filter(|h| joined.contains(*h)).count() * 3
}
