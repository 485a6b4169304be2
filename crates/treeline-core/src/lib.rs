//! Treeline Core Library
//!
//! Replays a version-control commit graph into an in-memory versioned
//! repository, preserving parentage, snapshots, references and commit times.

pub mod area;
pub mod clock;
pub mod config;
pub mod content_hash;
pub mod error;
pub mod import;
pub mod materialize;
pub mod memory;
pub mod reconstruct;
pub mod resolve;
pub mod snapshot;
pub mod source;
pub mod tags;
pub mod walk;

#[cfg(test)]
pub mod testutils;

pub use area::ContentArea;
pub use clock::{Clock, OverridableClock, SystemClock};
pub use config::ImportOptions;
pub use content_hash::ContentHash;
pub use error::{Error, Result};
pub use import::{import, Import, ImportReport, Importer};
pub use memory::{CommitHandle, MemoryCommit, MemoryRepo};
pub use reconstruct::IdentityMap;
pub use source::{ObjectId, SourceCommit, SourceRef, SourceRepository};
pub use tags::CommitTags;
