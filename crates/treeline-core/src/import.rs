//! Whole-repository import.

use crate::clock::OverridableClock;
use crate::config::ImportOptions;
use crate::materialize::materialize_references;
use crate::memory::MemoryRepo;
use crate::reconstruct::{IdentityMap, Reconstructor};
use crate::resolve::resolve_reference;
use crate::snapshot::build_snapshot;
use crate::source::SourceRepository;
use crate::walk::CommitWalk;
use crate::Result;
use serde::Serialize;
use tracing::{debug, info};

/// Summary of an import run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    /// Commits reconstructed
    pub commits: usize,
    /// Of which root commits
    pub root_commits: usize,
    /// Of which merge commits
    pub merge_commits: usize,
    /// Branch names created
    pub branches: Vec<String>,
    /// Tag names created
    pub tags: Vec<String>,
    /// References that did not resolve to a commit and seeded nothing
    pub unresolved_refs: Vec<String>,
    /// Branches and tags that were not recreated
    pub skipped_refs: Vec<String>,
}

/// The outcome of an import.
#[derive(Debug)]
pub struct Import {
    /// The reconstructed repository
    pub repo: MemoryRepo<OverridableClock>,
    /// Source commit hash to reconstructed commit
    pub identities: IdentityMap,
    pub report: ImportReport,
}

/// Replays a source repository into a fresh [`MemoryRepo`].
///
/// Any fatal error aborts the run and nothing is returned.
pub struct Importer<'a, S: ?Sized> {
    source: &'a S,
    options: ImportOptions,
}

impl<'a, S> Importer<'a, S>
where
    S: SourceRepository + ?Sized,
{
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            options: ImportOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ImportOptions) -> Self {
        self.options = options;
        self
    }

    pub fn run(self) -> Result<Import> {
        let mut report = ImportReport::default();

        let mut starts = Vec::new();
        for reference in self.source.references()? {
            match resolve_reference(self.source, &reference)? {
                Some(commit) => starts.push(commit),
                None => report.unresolved_refs.push(reference.name),
            }
        }
        info!(
            "Walking history from {} references ({} unresolved)",
            starts.len(),
            report.unresolved_refs.len()
        );

        let walk = CommitWalk::new(self.source, starts)?;
        let mut reconstructor = Reconstructor::new(self.options.attach_metadata);
        for commit in walk {
            let area = build_snapshot(self.source, &commit.tree)?;
            debug!("{} {} ({} files)", commit.id.short(), commit.short_message, area.len());
            reconstructor.reconstruct(&commit, area)?;

            report.commits += 1;
            if commit.first_parent().is_none() {
                report.root_commits += 1;
            } else if commit.is_merge() {
                report.merge_commits += 1;
            }
        }

        let (mut repo, identities) = reconstructor.finish();
        let refs = materialize_references(
            self.source,
            &mut repo,
            &identities,
            self.options.ref_selection(),
        )?;
        report.branches = refs.branches;
        report.tags = refs.tags;
        report.skipped_refs = refs.skipped;

        info!(
            "Imported {} commits, {} branches, {} tags",
            report.commits,
            report.branches.len(),
            report.tags.len()
        );
        Ok(Import {
            repo,
            identities,
            report,
        })
    }
}

/// Import `source` with default options.
pub fn import<S>(source: &S) -> Result<Import>
where
    S: SourceRepository + ?Sized,
{
    Importer::new(source).run()
}
