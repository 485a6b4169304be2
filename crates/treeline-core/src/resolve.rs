//! Reference resolution.

use crate::source::{ObjectId, SourceCommit, SourceRef, SourceRepository};
use crate::Result;
use tracing::debug;

/// The object a reference designates once peeled.
///
/// Uses the peeled id when there is one and falls back to the direct target
/// otherwise (branches, lightweight tags).
pub fn peeled_target<S>(source: &S, reference: &SourceRef) -> Result<Option<ObjectId>>
where
    S: SourceRepository + ?Sized,
{
    let peeled = if reference.is_peeled {
        reference.peeled.clone()
    } else {
        source.peel(reference)?
    };
    Ok(peeled.or_else(|| reference.target.clone()))
}

/// Resolve `reference` to the commit it ultimately designates.
///
/// Returns `Ok(None)` when the reference has no target, or its target is
/// missing or is not a commit.
pub fn resolve_reference<S>(source: &S, reference: &SourceRef) -> Result<Option<SourceCommit>>
where
    S: SourceRepository + ?Sized,
{
    let Some(id) = peeled_target(source, reference)? else {
        debug!("Reference {} has no target", reference.name);
        return Ok(None);
    };

    let commit = source.find_commit(&id)?;
    if commit.is_none() {
        debug!("Reference {} points at {} which is not a commit", reference.name, id);
    }
    Ok(commit)
}

/// Shorten a full reference name to its simple form.
///
/// `refs/heads/main` becomes `main`, `refs/tags/v1` becomes `v1`,
/// `refs/remotes/origin/main` becomes `origin/main`.
pub fn shorten_ref_name(name: &str) -> &str {
    ["refs/heads/", "refs/tags/", "refs/remotes/"]
        .iter()
        .find_map(|prefix| name.strip_prefix(prefix))
        .unwrap_or(name)
}
