//! In-memory source repository.
//!
//! Builds synthetic commit graphs without touching disk. Object ids are
//! derived from object content so that identical inputs produce identical
//! graphs.

use super::traits::{
    short_message, EntryKind, ObjectId, SourceCommit, SourceRef, SourceRepository, TreeEntry,
};
use crate::content_hash::ContentHasher;
use crate::{Error, Result};
use chrono::{TimeZone, Utc};
use std::collections::{BTreeMap, HashMap, HashSet};

#[derive(Debug, Clone)]
enum Object {
    Commit(SourceCommit),
    Tree(Vec<TreeEntry>),
    Blob(Vec<u8>),
    Tag { target: ObjectId },
}

/// A source repository held entirely in memory.
#[derive(Debug, Clone)]
pub struct MemorySource {
    objects: HashMap<ObjectId, Object>,
    refs: BTreeMap<String, ObjectId>,
    head: Option<ObjectId>,
    unreadable: HashSet<ObjectId>,
    author_name: String,
    author_email: String,
}

impl Default for MemorySource {
    fn default() -> Self {
        Self {
            objects: HashMap::new(),
            refs: BTreeMap::new(),
            head: None,
            unreadable: HashSet::new(),
            author_name: "Treeline".to_string(),
            author_email: "treeline@example.com".to_string(),
        }
    }
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Author recorded on subsequently added commits.
    pub fn set_author(&mut self, name: &str, email: &str) {
        self.author_name = name.to_string();
        self.author_email = email.to_string();
    }

    fn insert(&mut self, kind: &str, fields: &[&[u8]], object: Object) -> ObjectId {
        let mut hasher = ContentHasher::new();
        hasher.update(kind.as_bytes());
        for field in fields {
            hasher.update(field);
        }
        let id = ObjectId::new(&hasher.finish().to_hex()[..40]);
        self.objects.insert(id.clone(), object);
        id
    }

    pub fn add_blob(&mut self, bytes: &[u8]) -> ObjectId {
        self.insert("blob", &[bytes], Object::Blob(bytes.to_vec()))
    }

    /// Build nested trees for `files`. Paths may start with `/`.
    pub fn add_tree(&mut self, files: &[(&str, &[u8])]) -> ObjectId {
        let mut root = DirNode::default();
        for (path, bytes) in files {
            let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
            root.insert(&segments, bytes);
        }
        self.write_dir(&root)
    }

    fn write_dir(&mut self, dir: &DirNode) -> ObjectId {
        let mut entries = Vec::new();
        for (name, child) in &dir.dirs {
            let id = self.write_dir(child);
            entries.push(TreeEntry {
                name: name.clone(),
                kind: EntryKind::Tree,
                id,
            });
        }
        for (name, bytes) in &dir.files {
            let id = self.add_blob(bytes);
            entries.push(TreeEntry {
                name: name.clone(),
                kind: EntryKind::Blob,
                id,
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        self.add_tree_entries(entries)
    }

    /// Store a tree with explicit entries.
    pub fn add_tree_entries(&mut self, entries: Vec<TreeEntry>) -> ObjectId {
        let fields: Vec<Vec<u8>> = entries
            .iter()
            .map(|e| format!("{:?} {} {}", e.kind, e.name, e.id).into_bytes())
            .collect();
        let field_refs: Vec<&[u8]> = fields.iter().map(Vec::as_slice).collect();
        self.insert("tree", &field_refs, Object::Tree(entries))
    }

    /// Add a commit of text `files` on top of `parents`, made at `time`
    /// seconds since the epoch.
    pub fn add_commit(
        &mut self,
        files: &[(&str, &str)],
        parents: &[&ObjectId],
        message: &str,
        time: i64,
    ) -> ObjectId {
        let files: Vec<(&str, &[u8])> = files.iter().map(|(p, c)| (*p, c.as_bytes())).collect();
        let tree = self.add_tree(&files);
        self.add_commit_with_tree(tree, parents, message, time)
    }

    /// Add a commit pointing at an existing tree.
    pub fn add_commit_with_tree(
        &mut self,
        tree: ObjectId,
        parents: &[&ObjectId],
        message: &str,
        time: i64,
    ) -> ObjectId {
        let commit = SourceCommit {
            id: ObjectId::new(""),
            parents: parents.iter().map(|p| (*p).clone()).collect(),
            author_name: self.author_name.clone(),
            author_email: self.author_email.clone(),
            message: message.to_string(),
            short_message: short_message(message),
            time: Utc.timestamp_opt(time, 0).single().unwrap_or_else(Utc::now),
            tree: tree.clone(),
        };

        let parent_list = commit
            .parents
            .iter()
            .map(ObjectId::as_str)
            .collect::<Vec<_>>()
            .join(" ");
        let fields: Vec<Vec<u8>> = vec![
            tree.as_str().as_bytes().to_vec(),
            parent_list.into_bytes(),
            commit.author_name.as_bytes().to_vec(),
            commit.author_email.as_bytes().to_vec(),
            message.as_bytes().to_vec(),
            time.to_le_bytes().to_vec(),
        ];
        let field_refs: Vec<&[u8]> = fields.iter().map(Vec::as_slice).collect();
        let id = self.insert("commit", &field_refs, Object::Commit(commit));
        if let Some(Object::Commit(stored)) = self.objects.get_mut(&id) {
            stored.id = id.clone();
        }
        id
    }

    /// Create an annotated tag object pointing at `target`.
    pub fn add_tag_object(&mut self, name: &str, target: &ObjectId) -> ObjectId {
        self.insert(
            "tag",
            &[name.as_bytes(), target.as_str().as_bytes()],
            Object::Tag {
                target: target.clone(),
            },
        )
    }

    /// Point the full reference `name` at `target`.
    pub fn set_ref(&mut self, name: &str, target: &ObjectId) {
        self.refs.insert(name.to_string(), target.clone());
    }

    pub fn set_branch(&mut self, name: &str, target: &ObjectId) {
        self.set_ref(&format!("refs/heads/{}", name), target);
    }

    /// Lightweight tag: the reference points straight at `target`.
    pub fn set_tag(&mut self, name: &str, target: &ObjectId) {
        self.set_ref(&format!("refs/tags/{}", name), target);
    }

    /// Annotated tag: the reference points at a tag object wrapping `target`.
    pub fn set_annotated_tag(&mut self, name: &str, target: &ObjectId) -> ObjectId {
        let tag = self.add_tag_object(name, target);
        self.set_ref(&format!("refs/tags/{}", name), &tag);
        tag
    }

    /// Detach `HEAD` onto `target`.
    pub fn set_head(&mut self, target: &ObjectId) {
        self.head = Some(target.clone());
    }

    /// Make reads of the blob `id` fail.
    pub fn make_unreadable(&mut self, id: &ObjectId) {
        self.unreadable.insert(id.clone());
    }

    /// Number of commit objects stored.
    pub fn commit_count(&self) -> usize {
        self.objects
            .values()
            .filter(|o| matches!(o, Object::Commit(_)))
            .count()
    }

    fn refs_with_prefix(&self, prefix: &str) -> Vec<SourceRef> {
        self.refs
            .iter()
            .filter(|(name, _)| name.starts_with(prefix))
            .map(|(name, target)| SourceRef::new(name.clone(), Some(target.clone())))
            .collect()
    }
}

impl SourceRepository for MemorySource {
    fn references(&self) -> Result<Vec<SourceRef>> {
        let head = self
            .head
            .as_ref()
            .map(|target| SourceRef::new("HEAD", Some(target.clone())));
        Ok(head.into_iter().chain(self.refs_with_prefix("refs/")).collect())
    }

    fn branches(&self) -> Result<Vec<SourceRef>> {
        Ok(self.refs_with_prefix("refs/heads/"))
    }

    fn tags(&self) -> Result<Vec<SourceRef>> {
        Ok(self.refs_with_prefix("refs/tags/"))
    }

    fn peel(&self, reference: &SourceRef) -> Result<Option<ObjectId>> {
        let Some(mut current) = reference.target.clone() else {
            return Ok(None);
        };
        let mut peeled = false;
        while let Some(Object::Tag { target }) = self.objects.get(&current) {
            current = target.clone();
            peeled = true;
        }
        Ok(peeled.then_some(current))
    }

    fn find_commit(&self, id: &ObjectId) -> Result<Option<SourceCommit>> {
        match self.objects.get(id) {
            Some(Object::Commit(commit)) => Ok(Some(commit.clone())),
            _ => Ok(None),
        }
    }

    fn read_tree(&self, id: &ObjectId) -> Result<Vec<TreeEntry>> {
        match self.objects.get(id) {
            Some(Object::Tree(entries)) => Ok(entries.clone()),
            _ => Err(Error::Source(format!("{} is not a tree", id))),
        }
    }

    fn read_blob(&self, id: &ObjectId) -> Result<Vec<u8>> {
        if self.unreadable.contains(id) {
            return Err(Error::Source(format!("blob {} is unreadable", id)));
        }
        match self.objects.get(id) {
            Some(Object::Blob(bytes)) => Ok(bytes.clone()),
            _ => Err(Error::NotFound(format!("blob {}", id))),
        }
    }
}

#[derive(Default)]
struct DirNode {
    dirs: BTreeMap<String, DirNode>,
    files: BTreeMap<String, Vec<u8>>,
}

impl DirNode {
    fn insert(&mut self, segments: &[&str], bytes: &[u8]) {
        match segments {
            [] => {}
            [name] => {
                self.files.insert(name.to_string(), bytes.to_vec());
            }
            [dir, rest @ ..] => self
                .dirs
                .entry(dir.to_string())
                .or_default()
                .insert(rest, bytes),
        }
    }
}
