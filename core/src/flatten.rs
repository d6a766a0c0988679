//! Flattening: the inverse of composition.
//!
//! Walks a composed tree and emits one `(path, value)` entry per leaf, in
//! map order. List elements are addressed as `name[subscript]`; the
//! subscript comes from the element's back-reference field when it has
//! one, otherwise from the element's zero-based position.

use crate::compose::Tree;
use crate::path::{self, Segment};
use crate::store::Entry;


/// Flatten `tree` into entries. Only map roots produce entries; empty
/// maps produce none. The `key_field` itself is never emitted.
pub fn flatten(tree: &Tree, key_field: Option<&str>) -> Vec<Entry> {
    let key_field = key_field.filter(|k| !k.is_empty());
    let mut out = Vec::new();
    walk(tree, "", key_field, &mut out);
    out
}

fn walk(node: &Tree, prefix: &str, key_field: Option<&str>, out: &mut Vec<Entry>) {
    let Some(map) = node.as_map() else {
        return;
    };
    for (name, child) in map {
        if key_field == Some(name.as_str()) {
            continue;
        }
        let child_path = path::join(prefix, name);
        match child {
            Tree::Leaf(value) => out.push((child_path, value.clone())),
            Tree::Map(_) => walk(child, &child_path, key_field, out),
            Tree::List(items) => {
                for (index, item) in items.iter().enumerate() {
                    let subscript = subscript_of(item, key_field).unwrap_or_else(|| index.to_string());
                    let item_path = format!("{}[{}]", child_path, subscript);
                    walk(item, &item_path, key_field, out);
                }
            }
        }
    }
}

/// The subscript recorded in a list element's back-reference, if any.
fn subscript_of(item: &Tree, key_field: Option<&str>) -> Option<String> {
    let back_ref = item.get(key_field?)?.as_leaf()?.as_str()?;
    Segment::parse(path::last_segment(back_ref))
        .subscript()
        .map(str::to_string)
}


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
