//! In-memory versioned repository.
//!
//! Commits live in an append-only arena and are addressed by [`CommitHandle`].
//! Branches and tags are plain name to handle maps.

use crate::area::ContentArea;
use crate::clock::{Clock, SystemClock};
use crate::content_hash::{ContentHash, ContentHasher};
use crate::tags::CommitTags;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashSet};

/// Handle to a commit inside one [`MemoryRepo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommitHandle(usize);

impl CommitHandle {
    /// Position of the commit in creation order.
    pub fn index(&self) -> usize {
        self.0
    }
}

/// An immutable commit.
#[derive(Debug, Clone)]
pub struct MemoryCommit {
    /// Content-derived identity
    pub id: ContentHash,
    /// When the commit was made
    pub timestamp: DateTime<Utc>,
    /// Commit message
    pub message: String,
    /// Metadata
    pub tags: CommitTags,
    /// Full snapshot of the tree at this commit
    pub snapshot: ContentArea,
    /// First parent, `None` for a root commit
    pub first_parent: Option<CommitHandle>,
    /// Remaining parents of a merge commit, in order
    pub other_parents: Vec<CommitHandle>,
}

impl MemoryCommit {
    pub fn is_root(&self) -> bool {
        self.first_parent.is_none()
    }

    pub fn is_merge(&self) -> bool {
        !self.other_parents.is_empty()
    }

    /// All parents, first parent leading.
    pub fn parents(&self) -> impl Iterator<Item = CommitHandle> + '_ {
        self.first_parent
            .iter()
            .copied()
            .chain(self.other_parents.iter().copied())
    }
}

/// An in-memory repository stamped by a [`Clock`].
#[derive(Debug)]
pub struct MemoryRepo<C: Clock = SystemClock> {
    clock: C,
    commits: Vec<MemoryCommit>,
    branches: BTreeMap<String, CommitHandle>,
    tags: BTreeMap<String, CommitHandle>,
}

impl MemoryRepo<SystemClock> {
    /// Create an empty repository stamped with wall time.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for MemoryRepo<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> MemoryRepo<C> {
    /// Create an empty repository stamped by `clock`.
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            commits: Vec::new(),
            branches: BTreeMap::new(),
            tags: BTreeMap::new(),
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Commit `area` with no parents.
    pub fn commit_root(
        &mut self,
        area: ContentArea,
        message: &str,
        tags: CommitTags,
    ) -> CommitHandle {
        self.push(area, message, tags, None, Vec::new())
    }

    /// Commit `area` as a child of `parent`.
    pub fn commit_child(
        &mut self,
        area: ContentArea,
        message: &str,
        tags: CommitTags,
        parent: CommitHandle,
    ) -> CommitHandle {
        self.push(area, message, tags, Some(parent), Vec::new())
    }

    /// Commit `area` as a merge of `first_parent` and `other_parents`.
    pub fn commit_merge(
        &mut self,
        area: ContentArea,
        message: &str,
        tags: CommitTags,
        first_parent: CommitHandle,
        other_parents: Vec<CommitHandle>,
    ) -> CommitHandle {
        debug_assert!(!other_parents.is_empty(), "a merge needs a second parent");
        self.push(area, message, tags, Some(first_parent), other_parents)
    }

    fn push(
        &mut self,
        snapshot: ContentArea,
        message: &str,
        tags: CommitTags,
        first_parent: Option<CommitHandle>,
        other_parents: Vec<CommitHandle>,
    ) -> CommitHandle {
        debug_assert!(first_parent
            .iter()
            .chain(other_parents.iter())
            .all(|p| p.0 < self.commits.len()));

        let timestamp = self.clock.now();
        let parent_ids: Vec<ContentHash> = first_parent
            .iter()
            .chain(other_parents.iter())
            .map(|p| self.commits[p.0].id)
            .collect();
        let id = commit_id(timestamp, message, &tags, &snapshot, &parent_ids);

        let handle = CommitHandle(self.commits.len());
        self.commits.push(MemoryCommit {
            id,
            timestamp,
            message: message.to_string(),
            tags,
            snapshot,
            first_parent,
            other_parents,
        });
        handle
    }

    pub fn get(&self, handle: CommitHandle) -> Option<&MemoryCommit> {
        self.commits.get(handle.0)
    }

    /// All commits in creation order.
    pub fn commits(&self) -> impl Iterator<Item = (CommitHandle, &MemoryCommit)> {
        self.commits
            .iter()
            .enumerate()
            .map(|(i, c)| (CommitHandle(i), c))
    }

    pub fn len(&self) -> usize {
        self.commits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    /// Point branch `name` at `handle`, moving it if it already exists.
    pub fn create_branch_at_commit(&mut self, name: impl Into<String>, handle: CommitHandle) {
        self.branches.insert(name.into(), handle);
    }

    /// Point tag `name` at `handle`.
    pub fn tag_commit(&mut self, name: impl Into<String>, handle: CommitHandle) {
        self.tags.insert(name.into(), handle);
    }

    pub fn branch(&self, name: &str) -> Option<CommitHandle> {
        self.branches.get(name).copied()
    }

    pub fn tag(&self, name: &str) -> Option<CommitHandle> {
        self.tags.get(name).copied()
    }

    /// Branches in name order.
    pub fn branches(&self) -> impl Iterator<Item = (&str, CommitHandle)> {
        self.branches.iter().map(|(n, h)| (n.as_str(), *h))
    }

    /// Tags in name order.
    pub fn tags(&self) -> impl Iterator<Item = (&str, CommitHandle)> {
        self.tags.iter().map(|(n, h)| (n.as_str(), *h))
    }

    /// The full tree at `handle`.
    pub fn checkout(&self, handle: CommitHandle) -> Option<ContentArea> {
        self.get(handle).map(|c| c.snapshot.clone())
    }

    /// Commits that are not a parent of any other commit.
    pub fn tips(&self) -> Vec<CommitHandle> {
        let parents: HashSet<CommitHandle> = self
            .commits
            .iter()
            .flat_map(|c| c.parents())
            .collect();
        (0..self.commits.len())
            .map(CommitHandle)
            .filter(|h| !parents.contains(h))
            .collect()
    }

    /// History from `handle` back to its root, following first parents.
    pub fn first_parent_log(&self, handle: CommitHandle) -> Vec<CommitHandle> {
        let mut log = Vec::new();
        let mut current = self.get(handle).map(|_| handle);
        while let Some(h) = current {
            log.push(h);
            current = self.commits[h.0].first_parent;
        }
        log
    }
}

fn commit_id(
    timestamp: DateTime<Utc>,
    message: &str,
    tags: &CommitTags,
    snapshot: &ContentArea,
    parents: &[ContentHash],
) -> ContentHash {
    let mut hasher = ContentHasher::new();
    hasher
        .update(&timestamp.timestamp().to_le_bytes())
        .update(&timestamp.timestamp_subsec_nanos().to_le_bytes())
        .update(message.as_bytes());

    hasher.update(&(tags.len() as u64).to_le_bytes());
    for (path, value) in tags.iter() {
        hasher.update(path.as_bytes()).update(value.as_bytes());
    }

    hasher.update(&(snapshot.len() as u64).to_le_bytes());
    for (path, bytes) in snapshot.iter() {
        hasher.update(path.as_bytes()).update(bytes);
    }

    hasher.update(&(parents.len() as u64).to_le_bytes());
    for parent in parents {
        hasher.update(parent.as_bytes());
    }
    hasher.finish()
}
