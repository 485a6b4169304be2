//! Subcommand implementations.

pub mod import;
pub mod log;
pub mod tips;
