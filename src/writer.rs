//! The Artifact Writer: assembles a finalized `Metainfo` into a bencoded
//! `.torrent` dictionary and writes it to disk.

use std::fs;

use tracing::debug;

use crate::bencode::{Bencode, DictBuilder};
use crate::error::{ErrorKind, Result};
use crate::scope::Metainfo;

/// Validate and serialize `info` into a metainfo dictionary, write it to
/// `info.target`, creating parent directories as needed.
pub fn write(info: &Metainfo) -> Result<()> {
    validate(info)?;

    let bytes = encode(info);

    if let Some(parent) = info.target.parent() {
        fs::create_dir_all(parent)?;
    }

    debug!(target = %info.target.display(), bytes = bytes.len(), "writing artifact");
    fs::write(&info.target, bytes)?;
    Ok(())
}

/// Structural checks a well-formed metainfo dictionary must satisfy.
fn validate(info: &Metainfo) -> Result<()> {
    if info.name.is_empty() {
        return Err(ErrorKind::InvalidMetainfo("name is empty".to_owned()).into());
    }
    if info.piece_length == 0 {
        return Err(ErrorKind::InvalidMetainfo("piece length is zero".to_owned()).into());
    }
    if info.files.is_empty() {
        return Err(ErrorKind::InvalidMetainfo("files list is empty".to_owned()).into());
    }
    for file in &info.files {
        if file.path.is_empty() {
            return Err(ErrorKind::InvalidMetainfo("file entry has an empty path".to_owned()).into());
        }
    }
    Ok(())
}

fn encode(info: &Metainfo) -> Vec<u8> {
    let files = Bencode::list(
        info.files
            .iter()
            .map(|f| {
                let path = Bencode::list(f.path.iter().map(|c| Bencode::bytes(c.clone())).collect());
                DictBuilder::new()
                    .insert("length", Bencode::int(f.length as i64))
                    .insert("path", path)
                    .build()
            })
            .collect(),
    );

    let mut pieces = Vec::with_capacity(info.pieces.len() * 20);
    for piece in &info.pieces {
        pieces.extend_from_slice(piece.as_ref());
    }

    let info_dict = DictBuilder::new()
        .insert("name", Bencode::bytes(info.name.clone()))
        .insert("piece length", Bencode::int(info.piece_length as i64))
        .insert("pieces", Bencode::bytes(pieces))
        .insert("files", files)
        .build();

    DictBuilder::new()
        .insert("announce", Bencode::bytes(info.announce.as_bytes().to_vec()))
        .insert("creation date", Bencode::int(info.creation_date))
        .insert("info", info_dict)
        .build()
        .encode()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::FileEntry;
    use bip_util::sha::ShaHash;
    use std::path::PathBuf;

    fn sample() -> Metainfo {
        Metainfo {
            target: PathBuf::new(),
            announce: "udp://tracker".to_owned(),
            creation_date: 1700000000,
            name: b"pkg".to_vec(),
            piece_length: 1 << 15,
            pieces: vec![ShaHash::from_bytes(b"abc")],
            files: vec![FileEntry {
                length: 3,
                path: vec![b"a.txt".to_vec()],
            }],
        }
    }

    #[test]
    fn positive_validate_accepts_well_formed() {
        assert!(validate(&sample()).is_ok());
    }

    #[test]
    fn negative_validate_rejects_empty_files() {
        let mut info = sample();
        info.files.clear();
        assert!(validate(&info).is_err());
    }

    #[test]
    fn negative_validate_rejects_empty_name() {
        let mut info = sample();
        info.name.clear();
        assert!(validate(&info).is_err());
    }

    #[test]
    fn positive_encode_round_trips_structure() {
        let bytes = encode(&sample());
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("announce"));
        assert!(text.contains("piece length"));
        assert!(text.contains("5:a.txt"));
    }

    #[test]
    fn positive_write_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let mut info = sample();
        info.target = dir.path().join("a").join("b").join("pkg.torrent");

        write(&info).unwrap();
        assert!(info.target.is_file());
    }
}
