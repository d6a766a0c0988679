//! Flat path data model.
//!
//! Hierarchical records are stored as flat dotted paths such as
//! `contacts[c:1].fields[uid:2].phone`. [`PathStore`] holds those entries
//! and answers single-wildcard lookups; [`compose`] rebuilds the nested
//! map/list tree from any ordered list of entries, and [`flatten`] walks a
//! tree back into entries.

pub mod compose;
pub mod config;
pub mod error;
pub mod flatten;
pub mod path;
pub mod store;

pub use compose::{compose, compose_with, Tree};
pub use config::{ComposeOptions, DEFAULT_KEY_FIELD};
pub use error::{ComposeError, ConfigError, StoreError};
pub use flatten::flatten;
pub use path::Segment;
pub use store::{Entry, PathStore, Pattern, StoreValue};
