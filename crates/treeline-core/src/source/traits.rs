//! Source repository capability set.

use crate::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of an object in the source repository (hex hash).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(String);

impl ObjectId {
    pub fn new(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated form (7 characters).
    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(7) {
            Some((end, _)) => &self.0[..end],
            None => &self.0,
        }
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.0)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A named reference as stored by the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRef {
    /// Full name, e.g. `refs/heads/main`
    pub name: String,
    /// Object the reference points at directly
    pub target: Option<ObjectId>,
    /// Object the reference designates after peeling tags, when known
    pub peeled: Option<ObjectId>,
    /// Whether `peeled` has already been computed
    pub is_peeled: bool,
}

impl SourceRef {
    /// An unpeeled reference to `target`.
    pub fn new(name: impl Into<String>, target: Option<ObjectId>) -> Self {
        Self {
            name: name.into(),
            target,
            peeled: None,
            is_peeled: false,
        }
    }

    /// Mark the reference as peeled to `peeled`.
    pub fn with_peeled(mut self, peeled: Option<ObjectId>) -> Self {
        self.peeled = peeled;
        self.is_peeled = true;
        self
    }
}

/// A commit read from the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceCommit {
    /// Commit hash
    pub id: ObjectId,
    /// Parents in order; the first is the first parent
    pub parents: Vec<ObjectId>,
    /// Author name
    pub author_name: String,
    /// Author email
    pub author_email: String,
    /// Full commit message
    pub message: String,
    /// First paragraph of the message on one line
    pub short_message: String,
    /// Commit time, seconds resolution
    pub time: DateTime<Utc>,
    /// Root tree
    pub tree: ObjectId,
}

impl SourceCommit {
    pub fn first_parent(&self) -> Option<&ObjectId> {
        self.parents.first()
    }

    /// Parents after the first one.
    pub fn other_parents(&self) -> &[ObjectId] {
        self.parents.get(1..).unwrap_or(&[])
    }

    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }
}

/// The first paragraph of `message` with its line breaks folded into spaces.
pub fn short_message(message: &str) -> String {
    let trimmed = message.trim_start();
    let paragraph = trimmed.split("\n\n").next().unwrap_or("");
    paragraph
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Kind of a tree entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Subdirectory
    Tree,
    /// File content
    Blob,
    /// Submodule link to a commit in another repository
    Link,
}

/// One entry of a source tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    /// Path segment
    pub name: String,
    pub kind: EntryKind,
    pub id: ObjectId,
}

/// Read-only access to a source repository.
///
/// Lookups of objects that are missing or of the wrong type return
/// `Ok(None)`; `Err` is reserved for failures to access the repository.
pub trait SourceRepository {
    /// Every reference in the repository.
    fn references(&self) -> Result<Vec<SourceRef>>;

    /// Local branch references.
    fn branches(&self) -> Result<Vec<SourceRef>>;

    /// Tag references.
    fn tags(&self) -> Result<Vec<SourceRef>>;

    /// Peel `reference` through tag objects. `None` when nothing was peeled.
    fn peel(&self, reference: &SourceRef) -> Result<Option<ObjectId>>;

    /// Parse `id` as a commit.
    fn find_commit(&self, id: &ObjectId) -> Result<Option<SourceCommit>>;

    /// Direct entries of the tree `id`.
    fn read_tree(&self, id: &ObjectId) -> Result<Vec<TreeEntry>>;

    /// Raw content of the blob `id`.
    fn read_blob(&self, id: &ObjectId) -> Result<Vec<u8>>;
}
