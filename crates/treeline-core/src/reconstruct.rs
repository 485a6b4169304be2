//! Recreating source commits in the destination repository.

use crate::area::ContentArea;
use crate::clock::OverridableClock;
use crate::memory::{CommitHandle, MemoryRepo};
use crate::source::{ObjectId, SourceCommit};
use crate::tags::{paths, CommitTags};
use crate::{Error, Result};
use std::collections::HashMap;
use tracing::debug;

/// Source commit hash to reconstructed commit.
#[derive(Debug, Clone, Default)]
pub struct IdentityMap {
    by_source: HashMap<ObjectId, CommitHandle>,
}

impl IdentityMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, source: ObjectId, handle: CommitHandle) {
        self.by_source.insert(source, handle);
    }

    pub fn get(&self, source: &ObjectId) -> Option<CommitHandle> {
        self.by_source.get(source).copied()
    }

    pub fn contains(&self, source: &ObjectId) -> bool {
        self.by_source.contains_key(source)
    }

    pub fn len(&self) -> usize {
        self.by_source.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_source.is_empty()
    }
}

/// Parents of a commit as destination handles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParentLinks {
    pub first: Option<CommitHandle>,
    pub others: Vec<CommitHandle>,
}

impl ParentLinks {
    /// Map the parents of `commit` through `identities`, keeping order.
    ///
    /// Every parent must already be reconstructed; a gap means the walk
    /// order was violated.
    pub fn resolve(commit: &SourceCommit, identities: &IdentityMap) -> Result<Self> {
        let lookup = |parent: &ObjectId| {
            identities.get(parent).ok_or_else(|| Error::MissingParent {
                child: commit.id.to_string(),
                parent: parent.to_string(),
            })
        };

        let first = commit.first_parent().map(lookup).transpose()?;
        let others = commit
            .other_parents()
            .iter()
            .map(lookup)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { first, others })
    }
}

/// Metadata recorded for `commit`.
pub fn commit_tags(commit: &SourceCommit) -> CommitTags {
    CommitTags::none()
        .and(paths::AUTHOR_NAME, commit.author_name.as_str())
        .and(paths::AUTHOR_EMAIL, commit.author_email.as_str())
        .and(paths::MESSAGE, commit.message.as_str())
        .and(paths::MESSAGE_SHORT, commit.short_message.as_str())
}

/// Builds the destination repository one source commit at a time.
#[derive(Debug)]
pub struct Reconstructor {
    repo: MemoryRepo<OverridableClock>,
    identities: IdentityMap,
    attach_metadata: bool,
}

impl Reconstructor {
    pub fn new(attach_metadata: bool) -> Self {
        Self {
            repo: MemoryRepo::with_clock(OverridableClock::new()),
            identities: IdentityMap::new(),
            attach_metadata,
        }
    }

    /// Commit `area` as the counterpart of `commit`.
    ///
    /// The destination commit is stamped with the source commit time and
    /// recorded under the source hash.
    pub fn reconstruct(
        &mut self,
        commit: &SourceCommit,
        area: ContentArea,
    ) -> Result<CommitHandle> {
        let links = ParentLinks::resolve(commit, &self.identities)?;
        let tags = if self.attach_metadata {
            commit_tags(commit)
        } else {
            CommitTags::none()
        };

        self.repo.clock().set(commit.time);
        let handle = match links {
            ParentLinks { first: None, .. } => self.repo.commit_root(area, &commit.message, tags),
            ParentLinks {
                first: Some(parent),
                others,
            } if others.is_empty() => self.repo.commit_child(area, &commit.message, tags, parent),
            ParentLinks {
                first: Some(parent),
                others,
            } => self
                .repo
                .commit_merge(area, &commit.message, tags, parent, others),
        };

        debug!(
            "Reconstructed {} as #{} ({} parents)",
            commit.id.short(),
            handle.index(),
            commit.parents.len()
        );
        self.identities.insert(commit.id.clone(), handle);
        Ok(handle)
    }

    pub fn repo(&self) -> &MemoryRepo<OverridableClock> {
        &self.repo
    }

    pub fn identities(&self) -> &IdentityMap {
        &self.identities
    }

    /// Finish the run, releasing the clock override.
    pub fn finish(self) -> (MemoryRepo<OverridableClock>, IdentityMap) {
        self.repo.clock().clear();
        (self.repo, self.identities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{MemorySource, SourceRepository};
    use chrono::{TimeZone, Utc};

    fn load(source: &MemorySource, id: &ObjectId) -> SourceCommit {
        source.find_commit(id).unwrap().unwrap()
    }

    #[test]
    fn test_three_commit_shapes() {
        let mut source = MemorySource::new();
        let a = source.add_commit(&[], &[], "A", 10);
        let b = source.add_commit(&[], &[], "B", 20);
        let c = source.add_commit(&[], &[&a], "C", 30);
        let m = source.add_commit(&[], &[&c, &b, &a], "M", 40);

        let mut rec = Reconstructor::new(true);
        let ha = rec.reconstruct(&load(&source, &a), ContentArea::new()).unwrap();
        let hb = rec.reconstruct(&load(&source, &b), ContentArea::new()).unwrap();
        let hc = rec.reconstruct(&load(&source, &c), ContentArea::new()).unwrap();
        let hm = rec.reconstruct(&load(&source, &m), ContentArea::new()).unwrap();

        let repo = rec.repo();
        assert!(repo.get(ha).unwrap().is_root());
        assert_eq!(repo.get(hc).unwrap().first_parent, Some(ha));
        assert!(repo.get(hc).unwrap().other_parents.is_empty());

        let merge = repo.get(hm).unwrap();
        assert_eq!(merge.first_parent, Some(hc));
        assert_eq!(merge.other_parents, vec![hb, ha]);
        assert_eq!(rec.identities().len(), 4);
    }

    #[test]
    fn test_timestamp_and_metadata() {
        let mut source = MemorySource::new();
        source.set_author("Ada Lovelace", "ada@example.com");
        let a = source.add_commit(&[], &[], "Add engine\n\nDetails follow.", 1_234_567_890);

        let mut rec = Reconstructor::new(true);
        let handle = rec.reconstruct(&load(&source, &a), ContentArea::new()).unwrap();

        let commit = rec.repo().get(handle).unwrap();
        assert_eq!(commit.timestamp, Utc.timestamp_opt(1_234_567_890, 0).unwrap());
        assert_eq!(commit.message, "Add engine\n\nDetails follow.");
        assert_eq!(commit.tags.author_name(), Some("Ada Lovelace"));
        assert_eq!(commit.tags.author_email(), Some("ada@example.com"));
        assert_eq!(commit.tags.message(), Some("Add engine\n\nDetails follow."));
        assert_eq!(commit.tags.short_message(), Some("Add engine"));
    }

    #[test]
    fn test_metadata_can_be_disabled() {
        let mut source = MemorySource::new();
        let a = source.add_commit(&[], &[], "A", 1);

        let mut rec = Reconstructor::new(false);
        let handle = rec.reconstruct(&load(&source, &a), ContentArea::new()).unwrap();
        assert!(rec.repo().get(handle).unwrap().tags.is_empty());
    }

    #[test]
    fn test_missing_parent_is_consistency_error() {
        let mut source = MemorySource::new();
        let a = source.add_commit(&[], &[], "A", 1);
        let b = source.add_commit(&[], &[&a], "B", 2);

        let mut rec = Reconstructor::new(true);
        let err = rec
            .reconstruct(&load(&source, &b), ContentArea::new())
            .unwrap_err();
        match err {
            Error::MissingParent { child, parent } => {
                assert_eq!(child, b.to_string());
                assert_eq!(parent, a.to_string());
            }
            other => panic!("unexpected error {:?}", other),
        }
        assert!(rec.identities().is_empty());
    }

    #[test]
    fn test_finish_releases_clock() {
        let mut source = MemorySource::new();
        let a = source.add_commit(&[], &[], "A", 1);

        let mut rec = Reconstructor::new(true);
        rec.reconstruct(&load(&source, &a), ContentArea::new()).unwrap();
        let (repo, identities) = rec.finish();
        assert_eq!(repo.clock().pinned(), None);
        assert!(identities.contains(&a));
    }
}
