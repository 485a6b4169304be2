//! Treeline Git Integration
//!
//! Reads branches, tags and commit history out of a git repository so the
//! core importer can replay them.

pub mod commit;
pub mod repository;

pub use repository::{GitError, GitRepository};

use std::path::Path;
use tracing::info;
use treeline_core::{Import, ImportOptions, Importer};

/// Import an already opened repository.
pub fn import_repository(
    repo: &GitRepository,
    options: ImportOptions,
) -> treeline_core::Result<Import> {
    info!("Importing {}", repo.root().display());
    Importer::new(repo).with_options(options).run()
}

/// Open the repository at `path` and import it.
pub fn import_path(
    path: impl AsRef<Path>,
    options: ImportOptions,
) -> treeline_core::Result<Import> {
    let repo = GitRepository::open(path)?;
    import_repository(&repo, options)
}

/// Clone `url` into `into` and import the clone.
pub fn import_url(
    url: &str,
    into: impl AsRef<Path>,
    options: ImportOptions,
) -> treeline_core::Result<Import> {
    let repo = GitRepository::clone_from(url, into)?;
    import_repository(&repo, options)
}
