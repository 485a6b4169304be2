//! Content areas: flat path to bytes snapshots.

use std::collections::BTreeMap;
use std::fmt;

/// A point-in-time snapshot of a file tree.
///
/// Paths are absolute and slash-separated (`/src/lib.rs`). Iteration is in
/// path order.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ContentArea {
    entries: BTreeMap<String, Vec<u8>>,
}

impl ContentArea {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `bytes` at `path`, replacing any previous content.
    pub fn put_bytes(&mut self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.entries.insert(path.into(), bytes.into());
    }

    /// Store UTF-8 text at `path`.
    pub fn put_string(&mut self, path: impl Into<String>, text: &str) {
        self.put_bytes(path, text.as_bytes().to_vec());
    }

    pub fn get_bytes(&self, path: &str) -> Option<&[u8]> {
        self.entries.get(path).map(Vec::as_slice)
    }

    /// Content at `path` as UTF-8, if present and valid.
    pub fn get_string(&self, path: &str) -> Option<&str> {
        self.get_bytes(path).and_then(|b| std::str::from_utf8(b).ok())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.entries.iter().map(|(p, b)| (p.as_str(), b.as_slice()))
    }

    /// Total content size in bytes.
    pub fn byte_size(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// One `path : size` line per entry.
    pub fn as_list_string(&self) -> String {
        self.entries
            .iter()
            .map(|(path, bytes)| format!("{} : {} bytes", path, bytes.len()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Debug for ContentArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(p, b)| (p, b.len())))
            .finish()
    }
}

impl<P: Into<String>, B: Into<Vec<u8>>> FromIterator<(P, B)> for ContentArea {
    fn from_iter<I: IntoIterator<Item = (P, B)>>(iter: I) -> Self {
        let mut area = ContentArea::new();
        for (path, bytes) in iter {
            area.put_bytes(path, bytes);
        }
        area
    }
}
