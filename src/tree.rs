//! The Tree Builder: walks the source filesystem in canonical
//! (lexicographic-by-byte, hidden-entries-excluded) order and produces a
//! size-annotated tree mirroring its shape.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{ErrorKind, Result};
use crate::path::{is_hidden, normalize_component, Component};

/// One node of the built tree: either a regular file or a directory with
/// sorted, hidden-filtered children.
#[derive(Debug, Clone)]
pub enum TreeNode {
    Leaf {
        location: PathBuf,
        path: Vec<Component>,
        size: u64,
    },
    Branch {
        location: PathBuf,
        path: Vec<Component>,
        children: Vec<TreeNode>,
        size: u64,
    },
}

impl TreeNode {
    /// Total size of the subtree this node represents.
    pub fn size(&self) -> u64 {
        match self {
            TreeNode::Leaf { size, .. } => *size,
            TreeNode::Branch { size, .. } => *size,
        }
    }

    /// The path of this node, relative to the overall traversal root.
    pub fn path(&self) -> &[Component] {
        match self {
            TreeNode::Leaf { path, .. } => path,
            TreeNode::Branch { path, .. } => path,
        }
    }

    /// The absolute filesystem location this node was built from.
    pub fn location(&self) -> &Path {
        match self {
            TreeNode::Leaf { location, .. } => location,
            TreeNode::Branch { location, .. } => location,
        }
    }
}

/// Build a `TreeNode` rooted at `location`, recording `path` as its logical
/// path (the sequence of components already accumulated above it).
///
/// Fails with `UnsupportedEntry` for anything that is neither a regular
/// file nor a directory, `BadFilename` for any undecodable component, and
/// `IoError` for any other filesystem failure.
pub fn build(location: &Path, path: Vec<Component>) -> Result<TreeNode> {
    let metadata = fs::symlink_metadata(location)?;

    if metadata.is_file() {
        Ok(TreeNode::Leaf {
            location: location.to_path_buf(),
            path,
            size: metadata.len(),
        })
    } else if metadata.is_dir() {
        debug!(path = %crate::path::join_display(&path), "entering directory");

        let mut entries: Vec<fs::DirEntry> = fs::read_dir(location)?.collect::<std::io::Result<_>>()?;
        entries.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        let mut children = Vec::with_capacity(entries.len());
        let mut total_size = 0u64;

        for entry in entries {
            let name = normalize_component(&entry.file_name())?;
            if is_hidden(&name) {
                continue;
            }

            let mut child_path = path.clone();
            child_path.push(name);

            let child = build(&entry.path(), child_path)?;
            total_size += child.size();
            children.push(child);
        }

        Ok(TreeNode::Branch {
            location: location.to_path_buf(),
            path,
            children,
            size: total_size,
        })
    } else {
        Err(ErrorKind::UnsupportedEntry(location.to_path_buf()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::io::Write;

    fn write_file(path: &Path, contents: &[u8]) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        File::create(path).unwrap().write_all(contents).unwrap();
    }

    #[test]
    fn positive_sorts_and_skips_hidden() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("a");
        write_file(&root.join("y"), b"hello");
        write_file(&root.join("x"), b"abc");
        write_file(&root.join(".hidden"), b"nope");

        let node = build(&root, vec![b"a".to_vec()]).unwrap();
        match node {
            TreeNode::Branch { children, size, .. } => {
                assert_eq!(size, 8);
                let names: Vec<_> = children.iter().map(|c| c.path().last().unwrap().clone()).collect();
                assert_eq!(names, vec![b"x".to_vec(), b"y".to_vec()]);
            }
            _ => panic!("expected branch"),
        }
    }

    #[test]
    fn positive_single_file_root() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("f");
        write_file(&file, b"");

        let node = build(&file, vec![b"f".to_vec()]).unwrap();
        assert!(matches!(node, TreeNode::Leaf { size: 0, .. }));
    }

    #[test]
    fn positive_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("empty");
        fs::create_dir_all(&root).unwrap();

        let node = build(&root, vec![b"empty".to_vec()]).unwrap();
        match node {
            TreeNode::Branch { children, size, .. } => {
                assert_eq!(size, 0);
                assert!(children.is_empty());
            }
            _ => panic!("expected branch"),
        }
    }
}
