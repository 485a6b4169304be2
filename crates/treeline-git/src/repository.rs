//! Git repository wrapper.

use crate::commit::{object_id, source_commit, tree_entry};
use git2::{BranchType, ErrorCode, ObjectType, Oid, Reference, ReferenceType, Repository};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use treeline_core::source::{ObjectId, SourceCommit, SourceRef, SourceRepository, TreeEntry};

/// Errors from git operations.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Repository not found at {0}")]
    NotFound(PathBuf),

    #[error("Invalid object id: {0}")]
    InvalidId(String),

    #[error("Commit {commit} has an out of range time: {seconds}")]
    InvalidTime { commit: String, seconds: i64 },
}

/// Result type for git operations.
pub type Result<T> = std::result::Result<T, GitError>;

impl From<GitError> for treeline_core::Error {
    fn from(err: GitError) -> Self {
        treeline_core::Error::Source(err.to_string())
    }
}

/// Wrapper around a git repository.
pub struct GitRepository {
    repo: Repository,
    path: PathBuf,
}

impl GitRepository {
    /// Open the git repository containing `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Err(GitError::NotFound(path));
        }
        let repo = Repository::discover(&path)?;

        Ok(Self { repo, path })
    }

    /// Clone `url` into `into` and open the result.
    pub fn clone_from(url: &str, into: impl AsRef<Path>) -> Result<Self> {
        let path = into.as_ref().to_path_buf();
        debug!("Cloning {} into {}", url, path.display());
        let repo = git2::build::RepoBuilder::new().clone(url, &path)?;

        Ok(Self { repo, path })
    }

    /// Wrap an already open repository.
    pub fn from_repository(repo: Repository) -> Self {
        let path = repo.path().to_path_buf();
        Self { repo, path }
    }

    /// Get the repository root path.
    pub fn root(&self) -> PathBuf {
        self.repo
            .workdir()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| self.path.clone())
    }

    /// Short name of the branch HEAD points at, if any.
    pub fn head_branch(&self) -> Option<String> {
        let head = self.repo.head().ok()?;
        if !head.is_branch() {
            return None;
        }
        head.shorthand().map(String::from)
    }

    /// Get the underlying git2 repository.
    pub fn inner(&self) -> &Repository {
        &self.repo
    }

    fn oid(id: &ObjectId) -> Result<Oid> {
        Oid::from_str(id.as_str()).map_err(|_| GitError::InvalidId(id.to_string()))
    }

    /// `HEAD` as a reference, or `None` while it is unborn.
    fn head_ref(&self) -> Result<Option<SourceRef>> {
        match self.repo.head() {
            Ok(head) => Ok(Some(SourceRef::new("HEAD", head.target().map(object_id)))),
            Err(e) if e.code() == ErrorCode::UnbornBranch || missing(&e) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn collect_refs<'r>(
        references: impl Iterator<Item = std::result::Result<Reference<'r>, git2::Error>>,
    ) -> Vec<SourceRef> {
        references
            .filter_map(|reference| match reference {
                Ok(reference) => Some(source_ref(&reference)),
                Err(e) => {
                    warn!("Error loading reference {}, skipping", e);
                    None
                }
            })
            .collect()
    }
}

fn source_ref(reference: &Reference) -> SourceRef {
    let name = String::from_utf8_lossy(reference.name_bytes()).into_owned();
    let target = match reference.kind() {
        Some(ReferenceType::Symbolic) => reference.resolve().ok().and_then(|r| r.target()),
        _ => reference.target(),
    };

    let source = SourceRef::new(name, target.map(object_id));
    // Packed annotated tags carry their peeled id.
    match reference.target_peel() {
        Some(peeled) => source.with_peeled(Some(object_id(peeled))),
        None => source,
    }
}

fn missing(err: &git2::Error) -> bool {
    err.code() == ErrorCode::NotFound
}

impl SourceRepository for GitRepository {
    fn references(&self) -> treeline_core::Result<Vec<SourceRef>> {
        let head = self.head_ref()?;
        let references = self.repo.references().map_err(GitError::from)?;
        Ok(head.into_iter().chain(Self::collect_refs(references)).collect())
    }

    fn branches(&self) -> treeline_core::Result<Vec<SourceRef>> {
        let branches = self
            .repo
            .branches(Some(BranchType::Local))
            .map_err(GitError::from)?;
        Ok(Self::collect_refs(
            branches.map(|branch| branch.map(|(branch, _)| branch.into_reference())),
        ))
    }

    fn tags(&self) -> treeline_core::Result<Vec<SourceRef>> {
        let tags = self
            .repo
            .references_glob("refs/tags/*")
            .map_err(GitError::from)?;
        Ok(Self::collect_refs(tags))
    }

    fn peel(&self, reference: &SourceRef) -> treeline_core::Result<Option<ObjectId>> {
        let Some(target) = &reference.target else {
            return Ok(None);
        };
        let Ok(oid) = Self::oid(target) else {
            return Ok(None);
        };

        let object = match self.repo.find_object(oid, None) {
            Ok(object) => object,
            Err(e) if missing(&e) => return Ok(None),
            Err(e) => return Err(GitError::from(e).into()),
        };
        if object.kind() != Some(ObjectType::Tag) {
            return Ok(None);
        }

        match object.peel(ObjectType::Any) {
            Ok(peeled) => Ok(Some(object_id(peeled.id()))),
            Err(e) if missing(&e) => Ok(None),
            Err(e) => Err(GitError::from(e).into()),
        }
    }

    fn find_commit(&self, id: &ObjectId) -> treeline_core::Result<Option<SourceCommit>> {
        let Ok(oid) = Self::oid(id) else {
            return Ok(None);
        };

        let object = match self.repo.find_object(oid, None) {
            Ok(object) => object,
            Err(e) if missing(&e) => return Ok(None),
            Err(e) => return Err(GitError::from(e).into()),
        };
        Ok(object.as_commit().map(source_commit).transpose()?)
    }

    fn read_tree(&self, id: &ObjectId) -> treeline_core::Result<Vec<TreeEntry>> {
        let tree = self.repo.find_tree(Self::oid(id)?).map_err(GitError::from)?;
        Ok(tree.iter().filter_map(|entry| tree_entry(&entry)).collect())
    }

    fn read_blob(&self, id: &ObjectId) -> treeline_core::Result<Vec<u8>> {
        let blob = self.repo.find_blob(Self::oid(id)?).map_err(GitError::from)?;
        Ok(blob.content().to_vec())
    }
}
