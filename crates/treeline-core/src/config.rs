//! Import configuration.

use crate::materialize::RefSelection;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Options for one import run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImportOptions {
    /// Attach author and message metadata to each commit
    pub attach_metadata: bool,
    /// Recreate branches
    pub branches: bool,
    /// Recreate tags
    pub tags: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            attach_metadata: true,
            branches: true,
            tags: true,
        }
    }
}

impl ImportOptions {
    /// Parse options from JSON. Missing fields keep their defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load options from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text).map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn ref_selection(&self) -> RefSelection {
        RefSelection {
            branches: self.branches,
            tags: self.tags,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_enable_everything() {
        let options = ImportOptions::default();
        assert!(options.attach_metadata);
        assert!(options.branches);
        assert!(options.tags);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let options = ImportOptions::from_json(r#"{ "tags": false }"#).unwrap();
        assert!(options.attach_metadata);
        assert!(options.branches);
        assert!(!options.tags);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = ImportOptions::from_json(r#"{ "colour": "blue" }"#).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("treeline.json");
        std::fs::write(&path, r#"{ "attach_metadata": false }"#).unwrap();

        let options = ImportOptions::load(&path).unwrap();
        assert!(!options.attach_metadata);

        let missing = ImportOptions::load(dir.path().join("nope.json"));
        assert!(matches!(missing, Err(Error::Io(_))));
    }

    #[test]
    fn test_load_reports_bad_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, r#"{ "tags": "#).unwrap();

        match ImportOptions::load(&path) {
            Err(Error::Config(message)) => assert!(message.contains("broken.json")),
            other => panic!("expected a configuration error, got {:?}", other),
        }
    }
}
