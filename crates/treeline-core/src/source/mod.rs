//! Source repository abstraction.
//!
//! The importer reads the source through [`SourceRepository`] only, so any
//! backend (a git object store, a synthetic in-memory graph) can be replayed.

mod memory;
mod traits;

pub use memory::MemorySource;
pub use traits::{
    short_message, EntryKind, ObjectId, SourceCommit, SourceRef, SourceRepository, TreeEntry,
};
