//! Composition options and their YAML loader.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;


/// Name of the back-reference field added to composed nodes by default.
pub const DEFAULT_KEY_FIELD: &str = "_key";


/// Options controlling how entries are composed into a tree.
///
/// ```yaml
/// key_field: _key   # omit or set to "" / null to disable back-references
/// strict: false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposeOptions {
    /// Field added to every container node holding its full path.
    pub key_field: Option<String>,
    /// Reject paths that shape the same prefix inconsistently.
    pub strict: bool,
}

impl ComposeOptions {
    /// Options with back-references turned off.
    pub fn without_key_field() -> Self {
        ComposeOptions {
            key_field: None,
            strict: false,
        }
    }

    pub fn with_key_field(mut self, key_field: Option<&str>) -> Self {
        self.key_field = key_field.map(str::to_string);
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// The effective back-reference field; an empty name counts as disabled.
    pub fn key_field(&self) -> Option<&str> {
        self.key_field.as_deref().filter(|k| !k.is_empty())
    }
}

impl Default for ComposeOptions {
    fn default() -> Self {
        ComposeOptions {
            key_field: Some(DEFAULT_KEY_FIELD.to_string()),
            strict: false,
        }
    }
}


/// Load options from a YAML file. Missing fields take their defaults.
pub fn load(path: &Path) -> Result<ComposeOptions, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let options = parse(&content).map_err(|source| ConfigError::Yaml {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("loaded compose options from {}: {:?}", path.display(), options);
    Ok(options)
}

/// Parse options from a YAML string.
pub fn parse(content: &str) -> Result<ComposeOptions, serde_yaml::Error> {
    if content.trim().is_empty() {
        return Ok(ComposeOptions::default());
    }
    serde_yaml::from_str(content)
}
