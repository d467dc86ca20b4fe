//! A small, self-contained bencode encoder.
//!
//! Mirrors the shape of `BencodeMut` from the bittorrent library this crate
//! grew out of: a dict variant backed by a sorted map (so keys always
//! serialize in the byte order the format requires), a list variant, and
//! bytes/integer leaves, all converging on a single `encode` entry point.

use std::collections::BTreeMap;

/// A bencoded value under construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bencode {
    Int(i64),
    Bytes(Vec<u8>),
    List(Vec<Bencode>),
    Dict(BTreeMap<Vec<u8>, Bencode>),
}

impl Bencode {
    pub fn bytes(value: impl Into<Vec<u8>>) -> Bencode {
        Bencode::Bytes(value.into())
    }

    pub fn int(value: i64) -> Bencode {
        Bencode::Int(value)
    }

    pub fn list(values: Vec<Bencode>) -> Bencode {
        Bencode::List(values)
    }

    /// Serialize this value, appending to `out`.
    pub fn encode_into(&self, out: &mut Vec<u8>) {
        match self {
            Bencode::Int(n) => {
                out.push(b'i');
                out.extend_from_slice(n.to_string().as_bytes());
                out.push(b'e');
            }
            Bencode::Bytes(bytes) => {
                out.extend_from_slice(bytes.len().to_string().as_bytes());
                out.push(b':');
                out.extend_from_slice(bytes);
            }
            Bencode::List(items) => {
                out.push(b'l');
                for item in items {
                    item.encode_into(out);
                }
                out.push(b'e');
            }
            Bencode::Dict(entries) => {
                out.push(b'd');
                for (key, value) in entries {
                    Bencode::Bytes(key.clone()).encode_into(out);
                    value.encode_into(out);
                }
                out.push(b'e');
            }
        }
    }

    /// Serialize this value into a fresh byte buffer.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.encode_into(&mut out);
        out
    }
}

/// A small builder for dict values, so callers don't hand-roll `BTreeMap`
/// insertions at every call site.
#[derive(Debug, Default, Clone)]
pub struct DictBuilder {
    entries: BTreeMap<Vec<u8>, Bencode>,
}

impl DictBuilder {
    pub fn new() -> DictBuilder {
        DictBuilder::default()
    }

    pub fn insert(mut self, key: &str, value: Bencode) -> DictBuilder {
        self.entries.insert(key.as_bytes().to_vec(), value);
        self
    }

    pub fn build(self) -> Bencode {
        Bencode::Dict(self.entries)
    }
}
