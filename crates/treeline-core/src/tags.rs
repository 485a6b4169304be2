//! Commit metadata stored at well-known logical paths.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Well-known metadata paths.
pub mod paths {
    /// Root of the author fields.
    pub const AUTHOR: &str = "/author";
    /// Author name.
    pub const AUTHOR_NAME: &str = "/author/name";
    /// Author email address.
    pub const AUTHOR_EMAIL: &str = "/author/email";
    /// Full commit message.
    pub const MESSAGE: &str = "/message";
    /// First paragraph of the message, suitable for one-line display.
    pub const MESSAGE_SHORT: &str = "/message/short";
}

/// A set of metadata values attached to a commit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitTags {
    values: BTreeMap<String, String>,
}

impl CommitTags {
    /// An empty tag set.
    pub fn none() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn and(mut self, path: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(path, value);
        self
    }

    pub fn insert(&mut self, path: impl Into<String>, value: impl Into<String>) {
        self.values.insert(path.into(), value.into());
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.values.get(path).map(String::as_str)
    }

    pub fn author_name(&self) -> Option<&str> {
        self.get(paths::AUTHOR_NAME)
    }

    pub fn author_email(&self) -> Option<&str> {
        self.get(paths::AUTHOR_EMAIL)
    }

    pub fn message(&self) -> Option<&str> {
        self.get(paths::MESSAGE)
    }

    pub fn short_message(&self) -> Option<&str> {
        self.get(paths::MESSAGE_SHORT)
    }

    /// Author in "Name <email>" format.
    pub fn author(&self) -> Option<String> {
        let name = self.author_name()?;
        match self.author_email() {
            Some(email) if !email.is_empty() => Some(format!("{} <{}>", name, email)),
            _ => Some(name.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_known_paths() {
        assert!(paths::AUTHOR_NAME.starts_with(paths::AUTHOR));
        assert!(paths::MESSAGE_SHORT.starts_with(paths::MESSAGE));
    }

    #[test]
    fn test_author_format() {
        let tags = CommitTags::none()
            .and(paths::AUTHOR_NAME, "Ada")
            .and(paths::AUTHOR_EMAIL, "ada@example.com");
        assert_eq!(tags.author(), Some("Ada <ada@example.com>".to_string()));

        let no_email = CommitTags::none().and(paths::AUTHOR_NAME, "Ada");
        assert_eq!(no_email.author(), Some("Ada".to_string()));
        assert_eq!(CommitTags::none().author(), None);
    }
}
