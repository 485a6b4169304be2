//! Test utilities for Treeline.
//!
//! Provides reusable source graphs for unit tests.

use crate::source::{MemorySource, ObjectId};

/// Test fixture for building sample source repositories.
pub struct TestFixtures;

impl TestFixtures {
    /// A (root) -> B, with `main` at B.
    pub fn readme_history() -> (MemorySource, ObjectId, ObjectId) {
        let mut source = MemorySource::new();
        let a = source.add_commit(&[("/readme.txt", "Hello World!")], &[], "First Commit", 1_000);
        let b = source.add_commit(
            &[("/readme.txt", "Hello World!"), ("/more.txt", "More!")],
            &[&a],
            "Second Commit",
            2_000,
        );
        source.set_branch("main", &b);
        (source, a, b)
    }

    /// A pseudo-random DAG of `size` commits with merges and several roots.
    ///
    /// Every commit is reachable from some branch. Returns the commits in
    /// creation order.
    pub fn random_dag(seed: u64, size: usize) -> (MemorySource, Vec<ObjectId>) {
        let mut rng = Lcg(seed);
        let mut source = MemorySource::new();
        let mut ids: Vec<ObjectId> = Vec::with_capacity(size);
        let mut has_child = vec![false; size];

        for i in 0..size {
            let parent_count = if i == 0 { 0 } else { rng.below(4).min(i) };
            let mut picked: Vec<usize> = Vec::new();
            while picked.len() < parent_count {
                let candidate = rng.below(i);
                if !picked.contains(&candidate) {
                    picked.push(candidate);
                }
            }
            for p in &picked {
                has_child[*p] = true;
            }

            let parents: Vec<&ObjectId> = picked.iter().map(|p| &ids[*p]).collect();
            let content = format!("content {}", i);
            // Times deliberately not monotonic.
            let time = 10_000 + rng.below(5_000) as i64;
            let id = source.add_commit(
                &[("/counter.txt", content.as_str())],
                &parents,
                &format!("commit {}", i),
                time,
            );
            ids.push(id);
        }

        for (i, id) in ids.iter().enumerate() {
            if !has_child[i] {
                source.set_branch(&format!("tip-{}", i), id);
            }
        }

        (source, ids)
    }
}

/// Seeded linear congruential generator for fixture graphs.
struct Lcg(u64);

impl Lcg {
    fn below(&mut self, bound: usize) -> usize {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((self.0 >> 33) as usize) % bound.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceRepository;

    #[test]
    fn test_readme_history_fixture() {
        let (source, a, b) = TestFixtures::readme_history();
        let commit = source.find_commit(&b).unwrap().unwrap();
        assert_eq!(commit.parents, vec![a]);
        assert_eq!(source.branches().unwrap().len(), 1);
    }

    #[test]
    fn test_random_dag_fixture() {
        let (source, ids) = TestFixtures::random_dag(7, 30);
        assert_eq!(ids.len(), 30);
        assert_eq!(source.commit_count(), 30);
        assert!(!source.branches().unwrap().is_empty());
    }
}
