//! Commit graph traversal.

use crate::source::{ObjectId, SourceCommit, SourceRepository};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};
use tracing::debug;

/// Every commit reachable from a set of starting points, parents first.
///
/// The order is computed up front: commits are first arranged
/// children-before-parents, where a commit is only placed once all of its
/// reachable children are. A parent freed by placing its last child goes
/// next, so each line of history is followed down before the walk moves
/// on; otherwise the free commit with the newest commit time goes first
/// (ties broken by id). That order is then reversed, so iteration runs
/// oldest to newest and every parent is yielded before any of its children.
///
/// Each commit is yielded exactly once, however many starting points reach
/// it. The walk is single pass.
pub struct CommitWalk {
    order: std::vec::IntoIter<ObjectId>,
    commits: HashMap<ObjectId, SourceCommit>,
}

impl CommitWalk {
    /// Discover everything reachable from `starts`.
    ///
    /// A parent that cannot be loaded means the source is corrupt and
    /// fails the walk.
    pub fn new<S, I>(source: &S, starts: I) -> Result<Self>
    where
        S: SourceRepository + ?Sized,
        I: IntoIterator<Item = SourceCommit>,
    {
        let mut seen = HashSet::new();
        let mut pending: Vec<SourceCommit> = starts
            .into_iter()
            .filter(|c| seen.insert(c.id.clone()))
            .collect();

        let mut commits: HashMap<ObjectId, SourceCommit> = HashMap::new();
        let mut child_counts: HashMap<ObjectId, usize> = HashMap::new();

        while let Some(commit) = pending.pop() {
            child_counts.entry(commit.id.clone()).or_insert(0);
            for parent in &commit.parents {
                *child_counts.entry(parent.clone()).or_insert(0) += 1;
                if seen.insert(parent.clone()) {
                    let loaded = source.find_commit(parent)?.ok_or_else(|| {
                        Error::Source(format!(
                            "parent {} of commit {} cannot be loaded",
                            parent, commit.id
                        ))
                    })?;
                    pending.push(loaded);
                }
            }
            commits.insert(commit.id.clone(), commit);
        }

        let mut ready: BinaryHeap<(DateTime<Utc>, Reverse<ObjectId>)> = child_counts
            .iter()
            .filter(|(_, count)| **count == 0)
            .map(|(id, _)| (commits[id].time, Reverse(id.clone())))
            .collect();

        // Parents freed by the commit just placed, last parent on top.
        let mut freed: Vec<ObjectId> = Vec::new();
        let mut order = Vec::with_capacity(commits.len());
        while let Some(id) = freed
            .pop()
            .or_else(|| ready.pop().map(|(_, Reverse(id))| id))
        {
            for parent in &commits[&id].parents {
                if let Some(count) = child_counts.get_mut(parent) {
                    *count -= 1;
                    if *count == 0 {
                        freed.push(parent.clone());
                    }
                }
            }
            order.push(id);
        }
        order.reverse();

        debug!("Walk covers {} commits", order.len());
        Ok(Self {
            order: order.into_iter(),
            commits,
        })
    }

    /// Commits not yet yielded.
    pub fn remaining(&self) -> usize {
        self.order.len()
    }
}

impl Iterator for CommitWalk {
    type Item = SourceCommit;

    fn next(&mut self) -> Option<SourceCommit> {
        let id = self.order.next()?;
        self.commits.remove(&id)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}
