//! Builds a tree of torrent metainfo artifacts, one per file and directory,
//! from a source filesystem tree.
//!
//! The pipeline has four stages, each its own module: [`path`] normalizes
//! filesystem names, [`tree`] walks the source into a size-annotated shape,
//! [`scope`] and [`driver`] stream every leaf's bytes through one rolling
//! hash per active ancestor, and [`writer`] serializes and writes the
//! finalized artifacts.

pub mod bencode;
pub mod driver;
pub mod error;
pub mod path;
pub mod piece_length;
pub mod scope;
pub mod tree;
pub mod writer;

pub use error::{Error, ErrorKind, Result};
