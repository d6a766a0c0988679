//! Tree composition.
//!
//! Rebuilds a nested tree from an ordered list of `(path, value)` entries.
//! Every proper prefix of an entry's path becomes a container node, created
//! on first use and memoized by its full path so later entries sharing the
//! prefix land in the same node. A prefix whose last segment is
//! `name[subscript]` becomes a new element appended to the list `name` of
//! its parent; any other prefix becomes a map stored under its name.
//! List order is therefore the order in which subscripts are first seen.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::config::ComposeOptions;
use crate::error::ComposeError;
use crate::path::{self, Segment};


/// A composed tree.
///
/// Serializes untagged: maps as objects, lists as arrays, leaves as the
/// value they carry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Tree {
    Map(IndexMap<String, Tree>),
    List(Vec<Tree>),
    Leaf(Value),
}

impl Tree {
    /// Child of a map node by name.
    pub fn get(&self, name: &str) -> Option<&Tree> {
        self.as_map().and_then(|m| m.get(name))
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, Tree>> {
        match self {
            Tree::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Tree]> {
        match self {
            Tree::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_leaf(&self) -> Option<&Value> {
        match self {
            Tree::Leaf(v) => Some(v),
            _ => None,
        }
    }

    /// Convert into a plain JSON value.
    pub fn into_value(self) -> Value {
        match self {
            Tree::Map(m) => Value::Object(m.into_iter().map(|(k, t)| (k, t.into_value())).collect()),
            Tree::List(items) => Value::Array(items.into_iter().map(Tree::into_value).collect()),
            Tree::Leaf(v) => v,
        }
    }

    /// Interpret a JSON value as a tree.
    ///
    /// Objects become maps and non-empty arrays of objects become lists;
    /// everything else is a leaf. Structured leaves therefore come back
    /// as containers.
    pub fn from_value(value: Value) -> Tree {
        match value {
            Value::Object(m) => Tree::Map(m.into_iter().map(|(k, v)| (k, Tree::from_value(v))).collect()),
            Value::Array(items) if !items.is_empty() && items.iter().all(Value::is_object) => {
                Tree::List(items.into_iter().map(Tree::from_value).collect())
            }
            other => Tree::Leaf(other),
        }
    }
}

impl From<Tree> for Value {
    fn from(tree: Tree) -> Self {
        tree.into_value()
    }
}


/// Compose entries into a tree, adding `key_field` (when given and
/// non-empty) to every container node below the root.
pub fn compose<K: AsRef<str>>(entries: &[(K, Value)], key_field: Option<&str>) -> Result<Tree, ComposeError> {
    let options = ComposeOptions::default().with_key_field(key_field);
    compose_with(entries, &options)
}

/// Compose entries into a tree using the given options.
pub fn compose_with<K: AsRef<str>>(entries: &[(K, Value)], options: &ComposeOptions) -> Result<Tree, ComposeError> {
    let mut composer = Composer::new(options);
    for (key, value) in entries {
        let key = key.as_ref();
        let (parent_path, leaf_name) = path::split_last(key);
        let parent = composer.resolve(parent_path)?;
        composer.set_leaf(parent, key, leaf_name, value.clone())?;
    }
    log::debug!(
        "composed {} entries into {} nodes",
        entries.len(),
        composer.nodes.len()
    );
    Ok(composer.into_tree())
}


// ---------------------------------------------------------------------------
// Internal: arena of map nodes
// ---------------------------------------------------------------------------

/// Index of a map node in the arena.
type NodeId = usize;

const ROOT: NodeId = 0;

#[derive(Debug)]
enum Slot {
    Leaf(Value),
    Node(NodeId),
    List(Vec<NodeId>),
}

impl Slot {
    fn describe(&self) -> &'static str {
        match self {
            Slot::Leaf(_) => "a value",
            Slot::Node(_) => "a map",
            Slot::List(_) => "a list",
        }
    }
}

struct Composer<'o> {
    nodes: Vec<IndexMap<String, Slot>>,
    memo: HashMap<String, NodeId>,
    key_field: Option<&'o str>,
    strict: bool,
}

impl<'o> Composer<'o> {
    fn new(options: &'o ComposeOptions) -> Self {
        let mut memo = HashMap::new();
        memo.insert(String::new(), ROOT);
        Composer {
            nodes: vec![IndexMap::new()],
            memo,
            key_field: options.key_field(),
            strict: options.strict,
        }
    }

    /// Find or create the node for `path`, creating missing ancestors
    /// from the root down.
    fn resolve(&mut self, path: &str) -> Result<NodeId, ComposeError> {
        if let Some(&id) = self.memo.get(path) {
            return Ok(id);
        }
        if path.is_empty() {
            return Err(ComposeError::InternalConsistency(
                "root node is not registered".to_string(),
            ));
        }

        let (parent_path, last) = path::split_last(path);
        let grandparent = self.resolve(parent_path)?;
        let id = self.new_node(path);

        match Segment::parse(last) {
            Segment::Indexed { name, .. } => self.append_to_list(grandparent, name, id, path)?,
            Segment::Field(name) => self.attach(grandparent, name, Slot::Node(id), path)?,
        }

        self.memo.insert(path.to_string(), id);
        log::trace!("created node {} for {:?}", id, path);
        Ok(id)
    }

    fn new_node(&mut self, path: &str) -> NodeId {
        let mut node = IndexMap::new();
        if let Some(field) = self.key_field {
            node.insert(field.to_string(), Slot::Leaf(Value::String(path.to_string())));
        }
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    fn append_to_list(&mut self, parent: NodeId, name: &str, id: NodeId, path: &str) -> Result<(), ComposeError> {
        let strict = self.strict;
        let slot = self.nodes[parent]
            .entry(name.to_string())
            .or_insert_with(|| Slot::List(Vec::new()));
        match slot {
            Slot::List(items) => items.push(id),
            other if strict => {
                return Err(conflict(path, format!("\"{}\" is already {}, not a list", name, other.describe())));
            }
            other => *other = Slot::List(vec![id]),
        }
        Ok(())
    }

    /// Store `slot` under `name`. Non-strict mode overwrites whatever was
    /// there; strict mode only lets a value replace a value.
    fn attach(&mut self, parent: NodeId, name: &str, slot: Slot, path: &str) -> Result<(), ComposeError> {
        let node = &mut self.nodes[parent];
        if self.strict {
            if parent != ROOT && self.key_field == Some(name) {
                return Err(conflict(path, format!("\"{}\" is the back-reference field", name)));
            }
            if let Some(existing) = node.get(name) {
                let both_values = matches!((existing, &slot), (Slot::Leaf(_), Slot::Leaf(_)));
                if !both_values {
                    return Err(conflict(
                        path,
                        format!("\"{}\" is already {}, not {}", name, existing.describe(), slot.describe()),
                    ));
                }
            }
        }
        node.insert(name.to_string(), slot);
        Ok(())
    }

    fn set_leaf(&mut self, parent: NodeId, path: &str, name: &str, value: Value) -> Result<(), ComposeError> {
        self.attach(parent, name, Slot::Leaf(value), path)
    }

    fn into_tree(mut self) -> Tree {
        take_tree(&mut self.nodes, ROOT)
    }
}

fn conflict(path: &str, reason: String) -> ComposeError {
    ComposeError::ShapeConflict {
        path: path.to_string(),
        reason,
    }
}

/// Move node `id` out of the arena. Every node is referenced from at most
/// one slot, so each is taken at most once.
fn take_tree(nodes: &mut Vec<IndexMap<String, Slot>>, id: NodeId) -> Tree {
    let node = std::mem::take(&mut nodes[id]);
    let mut out = IndexMap::with_capacity(node.len());
    for (name, slot) in node {
        let child = match slot {
            Slot::Leaf(v) => Tree::Leaf(v),
            Slot::Node(child) => take_tree(nodes, child),
            Slot::List(items) => Tree::List(items.into_iter().map(|c| take_tree(nodes, c)).collect()),
        };
        out.insert(name, child);
    }
    Tree::Map(out)
}


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
