//! Configuration types for the node repository

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Repository-wide settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RepositoryConfig {
    /// Order children by after-relationship and name.
    /// Applied to the root and to every category inserted through the repository.
    pub sort_children: bool,
    /// Log a warning for every unresolved after declaration
    pub warn_on_problems: bool,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            sort_children: true,
            warn_on_problems: true,
        }
    }
}

impl RepositoryConfig {
    /// Parse from a JSON string; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}
