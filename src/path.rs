//! Decoding OS-native path components into the UTF-8 byte strings stored in
//! metainfo `path` fields.

use std::ffi::OsStr;

use crate::error::{Error, ErrorKind, Result};

/// A single filesystem path component, already validated as UTF-8.
pub type Component = Vec<u8>;

/// A path rooted at the overall traversal root: an ordered sequence of
/// components, never containing a separator.
pub type TreePath = Vec<Component>;

/// Decode one OS-native path component to its UTF-8 byte representation.
///
/// Fails with `BadFilename` if the component cannot be decoded; there is no
/// portable fallback encoding to retry with once a component isn't UTF-8.
pub fn normalize_component(os_str: &OsStr) -> Result<Component> {
    os_str
        .to_str()
        .map(|s| s.as_bytes().to_vec())
        .ok_or_else(|| -> Error { ErrorKind::BadFilename(os_str.to_string_lossy().into_owned()).into() })
}

/// True if a normalized component marks a hidden entry (leading `.`).
pub fn is_hidden(component: &[u8]) -> bool {
    component.first() == Some(&b'.')
}

/// Join a tree path into a single `/`-separated string, for logging and for
/// building output targets.
pub fn join_display(path: &[Component]) -> String {
    path.iter()
        .map(|c| String::from_utf8_lossy(c).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;

    #[test]
    fn positive_normalizes_ascii() {
        let component = normalize_component(OsStr::new("hello.txt")).unwrap();
        assert_eq!(component, b"hello.txt".to_vec());
    }

    #[test]
    fn positive_hidden_detection() {
        assert!(is_hidden(b".git"));
        assert!(!is_hidden(b"git"));
        assert!(!is_hidden(b""));
    }

    #[test]
    fn positive_join_display() {
        let path = vec![b"a".to_vec(), b"b".to_vec(), b"f".to_vec()];
        assert_eq!(join_display(&path), "a/b/f");
    }
}
