//! Error types for the store, the composer and option loading.

use std::path::PathBuf;

use thiserror::Error;


/// Failures of exact-key and pattern operations on a `PathStore`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Create on a key that already exists.
    #[error("key \"{0}\" already exists")]
    DuplicateKey(String),
    /// Retrieve/Update/Delete on an absent key, or an exact pattern
    /// that matched nothing.
    #[error("key \"{0}\" does not exist")]
    NotFound(String),
    /// A pattern carrying more than one `%`.
    #[error("pattern \"{0}\" contains multiple wildcards")]
    InvalidPattern(String),
}


/// Failures while composing entries into a tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComposeError {
    /// The memo lost its root entry. Unreachable unless the composer
    /// itself is broken.
    #[error("internal consistency error: {0}")]
    InternalConsistency(String),
    /// Strict mode only: a path prefix was shaped two different ways.
    #[error("conflicting shape at \"{path}\": {reason}")]
    ShapeConflict { path: String, reason: String },
}


/// Failures loading `ComposeOptions` from disk.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid options in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}
