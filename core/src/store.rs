//! Path store.
//!
//! In-memory key-value store keyed by path strings, with exact-key CRUD
//! and multi-key retrieval through patterns carrying at most one `%`
//! wildcard. Not internally synchronized; wrap it in a lock to share it.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::StoreError;

/// Alias for stored values. The store never inspects them.
pub type StoreValue = Value;

/// A `(path, value)` pair.
pub type Entry = (String, StoreValue);

/// The wildcard character accepted in retrieval patterns.
pub const WILDCARD: char = '%';


/// A parsed retrieval pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern<'a> {
    /// No wildcard: must name an existing key.
    Exact(&'a str),
    /// `prefix%suffix`: matches any key equal to `prefix + anything + suffix`.
    Wildcard { prefix: &'a str, suffix: &'a str },
}

impl<'a> Pattern<'a> {
    /// Parse a pattern, rejecting more than one wildcard.
    pub fn parse(pattern: &'a str) -> Result<Self, StoreError> {
        let mut parts = pattern.splitn(3, WILDCARD);
        let prefix = parts.next().unwrap_or_default();
        match (parts.next(), parts.next()) {
            (None, _) => Ok(Pattern::Exact(prefix)),
            (Some(suffix), None) => Ok(Pattern::Wildcard { prefix, suffix }),
            (Some(_), Some(_)) => Err(StoreError::InvalidPattern(pattern.to_string())),
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Pattern::Wildcard { .. })
    }

    /// True if `key` matches this pattern.
    pub fn matches(&self, key: &str) -> bool {
        match *self {
            Pattern::Exact(exact) => key == exact,
            Pattern::Wildcard { prefix, suffix } => {
                key.len() >= prefix.len() + suffix.len()
                    && key.starts_with(prefix)
                    && key.ends_with(suffix)
            }
        }
    }
}


/// In-memory store keyed by path strings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathStore {
    entries: HashMap<String, StoreValue>,
}

impl PathStore {
    /// Create an empty store.
    pub fn new() -> Self {
        PathStore {
            entries: HashMap::new(),
        }
    }

    /// Create a store seeded with a deep copy of `entries`.
    ///
    /// The caller's map is never aliased or mutated.
    pub fn from_entries(entries: &HashMap<String, StoreValue>) -> Self {
        PathStore {
            entries: entries.clone(),
        }
    }

    /// Insert a new entry. Fails if the key already exists.
    pub fn create(&mut self, key: &str, value: StoreValue) -> Result<(), StoreError> {
        if self.entries.contains_key(key) {
            return Err(StoreError::DuplicateKey(key.to_string()));
        }
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    /// Return the value stored under `key`.
    pub fn retrieve(&self, key: &str) -> Result<&StoreValue, StoreError> {
        self.entries
            .get(key)
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    /// Replace the value of an existing key.
    pub fn update(&mut self, key: &str, value: StoreValue) -> Result<(), StoreError> {
        match self.entries.get_mut(key) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(StoreError::NotFound(key.to_string())),
        }
    }

    /// Remove an existing key, returning its value.
    pub fn delete(&mut self, key: &str) -> Result<StoreValue, StoreError> {
        self.entries
            .remove(key)
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    /// Retrieve every entry matching each pattern, in pattern order.
    ///
    /// Results are concatenated without de-duplication; within one
    /// wildcard pattern the order is unspecified. An exact pattern must
    /// name an existing key, while a wildcard pattern may match nothing.
    /// Patterns are evaluated left to right; the first failure wins.
    pub fn retrieve_multiple<S: AsRef<str>>(&self, patterns: &[S]) -> Result<Vec<Entry>, StoreError> {
        let mut results = Vec::new();
        for raw in patterns {
            let pattern = Pattern::parse(raw.as_ref())?;
            match pattern {
                Pattern::Exact(key) => {
                    let value = self.retrieve(key)?;
                    results.push((key.to_string(), value.clone()));
                }
                Pattern::Wildcard { .. } => {
                    let before = results.len();
                    results.extend(
                        self.entries
                            .iter()
                            .filter(|(k, _)| pattern.matches(k))
                            .map(|(k, v)| (k.clone(), v.clone())),
                    );
                    log::debug!(
                        "pattern {:?} matched {} of {} entries",
                        pattern,
                        results.len() - before,
                        self.entries.len()
                    );
                }
            }
        }
        Ok(results)
    }

    /// Keys matching a single pattern. Exact patterns yield at most one key
    /// and never fail on absence.
    pub fn keys_matching(&self, pattern: &str) -> Result<Vec<String>, StoreError> {
        let pattern = Pattern::parse(pattern)?;
        Ok(self
            .entries
            .keys()
            .filter(|k| pattern.matches(k))
            .cloned()
            .collect())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Iterate over all entries in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &StoreValue)> {
        self.entries.iter()
    }

    /// Number of entries in the store.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the store has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<Entry> for PathStore {
    /// Later duplicates overwrite earlier ones.
    fn from_iter<I: IntoIterator<Item = Entry>>(iter: I) -> Self {
        PathStore {
            entries: iter.into_iter().collect(),
        }
    }
}


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
