//! Command execution. Each command reads its input file and returns the
//! text to print.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use flatpath_core::{config, compose_with, flatten, ComposeError, ComposeOptions, ConfigError, PathStore, StoreError, Tree};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::{Format, ShapeArgs};


#[derive(Debug, Error)]
pub enum CliError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("cannot render output: {0}")]
    Render(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Compose(#[from] ComposeError),
}


/// Load options from `config_path` (if any) and apply command-line overrides.
pub fn load_options(config_path: Option<&Path>, shape: &ShapeArgs) -> Result<ComposeOptions, CliError> {
    let mut options = match config_path {
        Some(path) => config::load(path)?,
        None => ComposeOptions::default(),
    };
    if shape.no_key_field {
        options.key_field = None;
    } else if let Some(field) = &shape.key_field {
        options.key_field = Some(field.clone());
    }
    if shape.strict {
        options.strict = true;
    }
    Ok(options)
}

/// `flatpath compose <file>`
pub fn compose_file(file: &Path, options: &ComposeOptions, format: Format) -> Result<String, CliError> {
    let entries: Vec<(String, Value)> = read_json(file)?;
    let tree = compose_with(&entries, options)?;
    render(&tree, format)
}

/// `flatpath query <file> <pattern>...`
pub fn query_file(file: &Path, patterns: &[String]) -> Result<String, CliError> {
    let store = load_store(file)?;
    let entries = store.retrieve_multiple(patterns)?;
    render(&entries, Format::Json)
}

/// `flatpath tree <file> <pattern>...`
///
/// Matches are sorted by path before composing so list order is stable.
pub fn tree_file(
    file: &Path,
    patterns: &[String],
    options: &ComposeOptions,
    format: Format,
) -> Result<String, CliError> {
    let store = load_store(file)?;
    let mut entries = store.retrieve_multiple(patterns)?;
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    let tree = compose_with(&entries, options)?;
    render(&tree, format)
}

/// `flatpath flatten <file>`
pub fn flatten_file(file: &Path, key_field: Option<&str>) -> Result<String, CliError> {
    let value: Value = read_json(file)?;
    let tree = Tree::from_value(value);
    render(&flatten(&tree, key_field), Format::Json)
}


fn load_store(file: &Path) -> Result<PathStore, CliError> {
    let entries: HashMap<String, Value> = read_json(file)?;
    log::debug!("loaded {} entries from {}", entries.len(), file.display());
    Ok(PathStore::from_entries(&entries))
}

fn read_json<T: serde::de::DeserializeOwned>(file: &Path) -> Result<T, CliError> {
    let content = std::fs::read_to_string(file).map_err(|source| CliError::Read {
        path: file.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| CliError::Json {
        path: file.to_path_buf(),
        source,
    })
}

fn render<T: Serialize>(value: &T, format: Format) -> Result<String, CliError> {
    match format {
        Format::Json => serde_json::to_string_pretty(value).map_err(|e| CliError::Render(e.to_string())),
        Format::Yaml => serde_yaml::to_string(value).map_err(|e| CliError::Render(e.to_string())),
    }
}
