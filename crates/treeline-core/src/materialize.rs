//! Recreating branches and tags in the destination repository.

use crate::clock::Clock;
use crate::memory::{CommitHandle, MemoryRepo};
use crate::reconstruct::IdentityMap;
use crate::resolve::{peeled_target, shorten_ref_name};
use crate::source::{SourceRef, SourceRepository};
use crate::Result;
use serde::Serialize;
use tracing::{debug, warn};

/// Names created and skipped while materializing references.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MaterializeReport {
    pub branches: Vec<String>,
    pub tags: Vec<String>,
    /// Full names of references that did not designate a reconstructed commit
    pub skipped: Vec<String>,
}

/// Which reference kinds to recreate.
#[derive(Debug, Clone, Copy)]
pub struct RefSelection {
    pub branches: bool,
    pub tags: bool,
}

impl Default for RefSelection {
    fn default() -> Self {
        Self {
            branches: true,
            tags: true,
        }
    }
}

/// Create a branch for every source branch and a tag for every source tag.
///
/// Must run after all commits are reconstructed. References whose target
/// is not a reconstructed commit are skipped.
pub fn materialize_references<S, C>(
    source: &S,
    repo: &mut MemoryRepo<C>,
    identities: &IdentityMap,
    selection: RefSelection,
) -> Result<MaterializeReport>
where
    S: SourceRepository + ?Sized,
    C: Clock,
{
    let mut report = MaterializeReport::default();

    if selection.branches {
        for reference in source.branches()? {
            if let Some((name, handle)) = locate(source, identities, &reference, &mut report)? {
                debug!("Branch {} -> #{}", name, handle.index());
                repo.create_branch_at_commit(name, handle);
                report.branches.push(name.to_string());
            }
        }
    }

    if selection.tags {
        for reference in source.tags()? {
            if let Some((name, handle)) = locate(source, identities, &reference, &mut report)? {
                debug!("Tag {} -> #{}", name, handle.index());
                repo.tag_commit(name, handle);
                report.tags.push(name.to_string());
            }
        }
    }

    Ok(report)
}

fn locate<'r, S>(
    source: &S,
    identities: &IdentityMap,
    reference: &'r SourceRef,
    report: &mut MaterializeReport,
) -> Result<Option<(&'r str, CommitHandle)>>
where
    S: SourceRepository + ?Sized,
{
    let handle = peeled_target(source, reference)?.and_then(|id| identities.get(&id));
    match handle {
        Some(handle) => Ok(Some((shorten_ref_name(&reference.name), handle))),
        None => {
            warn!("Skipping {}: it does not point at an imported commit", reference.name);
            report.skipped.push(reference.name.clone());
            Ok(None)
        }
    }
}
