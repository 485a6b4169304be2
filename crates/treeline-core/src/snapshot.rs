//! Flattening source trees into content areas.

use crate::area::ContentArea;
use crate::source::{EntryKind, ObjectId, SourceRepository};
use crate::{Error, Result};
use tracing::debug;

/// Read every file under the tree `root` into a content area.
///
/// Paths are rooted at `/` and joined with `/`. Submodule links have no
/// content in this repository and are left out. If any blob cannot be read
/// the whole snapshot fails with [`Error::ContentRead`].
pub fn build_snapshot<S>(source: &S, root: &ObjectId) -> Result<ContentArea>
where
    S: SourceRepository + ?Sized,
{
    let mut area = ContentArea::new();
    collect(source, root, "", &mut area)?;
    Ok(area)
}

fn collect<S>(source: &S, tree: &ObjectId, prefix: &str, area: &mut ContentArea) -> Result<()>
where
    S: SourceRepository + ?Sized,
{
    for entry in source.read_tree(tree)? {
        let path = format!("{}/{}", prefix, entry.name);
        match entry.kind {
            EntryKind::Tree => collect(source, &entry.id, &path, area)?,
            EntryKind::Blob => {
                let bytes = source.read_blob(&entry.id).map_err(|e| Error::ContentRead {
                    path: path.clone(),
                    reason: e.to_string(),
                })?;
                area.put_bytes(path, bytes);
            }
            EntryKind::Link => debug!("Skipping submodule link {} -> {}", path, entry.id),
        }
    }
    Ok(())
}
