//! Conversion of git2 objects into source records.

use crate::repository::{GitError, Result};
use chrono::{TimeZone, Utc};
use git2::{Commit, ObjectType, Oid, TreeEntry as GitTreeEntry};
use treeline_core::source::{EntryKind, ObjectId, SourceCommit, TreeEntry};

/// Source identity of a git object id.
pub fn object_id(oid: Oid) -> ObjectId {
    ObjectId::new(oid.to_string())
}

/// Read a git2 commit into a [`SourceCommit`].
///
/// Fails when the commit time cannot be represented.
pub fn source_commit(commit: &Commit) -> Result<SourceCommit> {
    let author = commit.author();
    let author_name = String::from_utf8_lossy(author.name_bytes()).into_owned();
    let author_email = String::from_utf8_lossy(author.email_bytes()).into_owned();

    let message = String::from_utf8_lossy(commit.message_bytes()).into_owned();
    let short_message = commit
        .summary()
        .map(String::from)
        .unwrap_or_else(|| treeline_core::source::short_message(&message));

    let seconds = commit.time().seconds();
    let time = Utc
        .timestamp_opt(seconds, 0)
        .single()
        .ok_or_else(|| GitError::InvalidTime {
            commit: commit.id().to_string(),
            seconds,
        })?;

    Ok(SourceCommit {
        id: object_id(commit.id()),
        parents: commit.parent_ids().map(object_id).collect(),
        author_name,
        author_email,
        message,
        short_message,
        time,
        tree: object_id(commit.tree_id()),
    })
}

/// Read a git2 tree entry, ignoring kinds that cannot appear in a tree.
pub fn tree_entry(entry: &GitTreeEntry) -> Option<TreeEntry> {
    let kind = match entry.kind()? {
        ObjectType::Tree => EntryKind::Tree,
        ObjectType::Blob => EntryKind::Blob,
        ObjectType::Commit => EntryKind::Link,
        _ => return None,
    };
    Some(TreeEntry {
        name: String::from_utf8_lossy(entry.name_bytes()).into_owned(),
        kind,
        id: object_id(entry.id()),
    })
}
