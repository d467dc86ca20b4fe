//! The Hasher Scope: one rolling SHA-1 state plus piece-boundary emitter for
//! one metainfo artifact.

use std::path::PathBuf;

use bip_util::sha::{ShaHash, ShaHashBuilder};

use crate::path::Component;
use crate::piece_length::piece_length_for;

/// One entry in a scope's `files` manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub length: u64,
    pub path: Vec<Component>,
}

/// The finalized, ready-to-serialize contents of one metainfo artifact.
#[derive(Debug, Clone)]
pub struct Metainfo {
    pub target: PathBuf,
    pub announce: String,
    pub creation_date: i64,
    pub name: Component,
    pub piece_length: u64,
    pub pieces: Vec<ShaHash>,
    pub files: Vec<FileEntry>,
}

/// Hashing state and file manifest for a single metainfo artifact.
///
/// A scope is pushed onto the driver's active stack when its node is
/// entered, fed file entries and bytes while its subtree is traversed, and
/// popped and finalized when traversal of its subtree completes. No scope
/// ever reads or mutates another scope's state.
pub struct HasherScope {
    target: PathBuf,
    announce: String,
    creation_date: i64,
    name: Component,
    declared_size: u64,
    piece_length: u64,
    files: Vec<FileEntry>,
    partial: ShaHashBuilder,
    done: u64,
    pieces: Vec<ShaHash>,
    total_hashed: u64,
}

impl HasherScope {
    /// Create a new scope for a node with the given root `name`, declared
    /// subtree `size`, `announce` url, output `target`, and the run's
    /// shared `creation_date`.
    pub fn new(name: Component, target: PathBuf, announce: String, declared_size: u64, creation_date: i64) -> HasherScope {
        HasherScope {
            target,
            announce,
            creation_date,
            name,
            declared_size,
            piece_length: piece_length_for(declared_size),
            files: Vec::new(),
            partial: ShaHashBuilder::new(),
            done: 0,
            pieces: Vec::new(),
            total_hashed: 0,
        }
    }

    /// The piece length this scope buckets bytes into.
    pub fn piece_length(&self) -> u64 {
        self.piece_length
    }

    /// The total size this scope's subtree declares (for diagnostics).
    pub fn declared_size(&self) -> u64 {
        self.declared_size
    }

    /// The output path this scope's artifact will be written to.
    pub fn target(&self) -> &PathBuf {
        &self.target
    }

    /// The root name every scope in a run shares, regardless of this
    /// scope's own depth.
    pub fn root_name(&self) -> &[u8] {
        &self.name
    }

    /// Number of whole pieces emitted so far (excludes any in-progress
    /// partial piece).
    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }

    /// Record a file entry in this scope's manifest. Must be called once
    /// per leaf visited while this scope is active, in traversal order.
    pub fn append_file(&mut self, length: u64, path: Vec<Component>) {
        self.files.push(FileEntry { length, path });
    }

    /// Fold `bytes` into the rolling state, emitting every complete piece
    /// boundary reached as a 20-byte digest. Accepts arbitrary chunk sizes;
    /// the resulting `pieces` sequence is independent of how the caller
    /// chunked its input.
    pub fn absorb(&mut self, mut bytes: &[u8]) {
        let piece_length = self.piece_length as usize;

        while !bytes.is_empty() {
            let remaining_in_piece = piece_length - self.done as usize;
            let take = remaining_in_piece.min(bytes.len());
            let (chunk, rest) = bytes.split_at(take);

            let builder = std::mem::replace(&mut self.partial, ShaHashBuilder::new());
            self.partial = builder.add_bytes(chunk);
            self.done += take as u64;
            self.total_hashed += take as u64;
            bytes = rest;

            if self.done as usize == piece_length {
                self.pieces.push(self.partial.build());
                self.partial = ShaHashBuilder::new();
                self.done = 0;
            }
        }
    }

    /// Flush any in-progress short piece and produce the finalized,
    /// serializable metainfo contents for this scope.
    pub fn finalize(mut self) -> Metainfo {
        if self.done > 0 {
            self.pieces.push(self.partial.build());
        }

        Metainfo {
            target: self.target,
            announce: self.announce,
            creation_date: self.creation_date,
            name: self.name,
            piece_length: self.piece_length,
            pieces: self.pieces,
            files: self.files,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope(size: u64) -> HasherScope {
        HasherScope::new(b"root".to_vec(), PathBuf::from("/tmp/root.torrent"), "udp://tracker".to_owned(), size, 0)
    }

    #[test]
    fn positive_empty_absorb_produces_no_pieces() {
        let s = scope(0);
        let info = s.finalize();
        assert!(info.pieces.is_empty());
    }

    #[test]
    fn positive_exact_boundary() {
        let mut s = scope(2 * crate::piece_length::MIN_PIECE_LENGTH);
        let piece_len = s.piece_length() as usize;
        s.absorb(&vec![0u8; piece_len]);
        s.absorb(&vec![1u8; piece_len]);
        let info = s.finalize();
        assert_eq!(info.pieces.len(), 2);
    }

    #[test]
    fn positive_trailing_short_piece() {
        let mut s = scope(1);
        let piece_len = s.piece_length() as usize;
        s.absorb(&vec![0u8; piece_len + 1]);
        let info = s.finalize();
        assert_eq!(info.pieces.len(), 2);
    }

    #[test]
    fn positive_chunking_independent() {
        let data: Vec<u8> = (0..200u32).map(|n| (n % 256) as u8).collect();

        let mut whole = scope(data.len() as u64);
        whole.absorb(&data);
        let whole_pieces = whole.finalize().pieces;

        let mut chunked = scope(data.len() as u64);
        for byte in &data {
            chunked.absorb(std::slice::from_ref(byte));
        }
        let chunked_pieces = chunked.finalize().pieces;

        assert_eq!(whole_pieces, chunked_pieces);
    }
}
