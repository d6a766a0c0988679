//! Store -> retrieve -> compose, the way callers combine the two halves.

use std::collections::HashMap;

use flatpath_core::{compose, compose_with, flatten, ComposeOptions, PathStore, StoreError, Tree};
use serde_json::{json, Value};


fn store() -> PathStore {
    let mut s = PathStore::new();
    for (k, v) in [
        ("contacts[c:1].id", json!("c:1")),
        ("contacts[c:1].fields[uid:1].email", json!("user@example.com")),
        ("contacts[c:1].fields[uid:2].phone", json!("+1 650 555-1234")),
        ("contacts[c:2].id", json!("c:2")),
        ("contacts[c:2].fields[uid:4].email", json!("otheruser@example.com")),
        ("sites[s:1].contact", json!("c:2")),
    ] {
        s.create(k, v).unwrap();
    }
    s
}

/// Store order is unspecified; callers sort to get stable lists.
fn sorted(mut entries: Vec<(String, Value)>) -> Vec<(String, Value)> {
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    entries
}


#[test]
fn retrieve_subset_then_compose() {
    let entries = sorted(store().retrieve_multiple(&["contacts[c:1]%"]).unwrap());
    let tree = compose(&entries, Some("_key")).unwrap();
    assert_eq!(
        tree.into_value(),
        json!({"contacts": [{
            "_key": "contacts[c:1]",
            "id": "c:1",
            "fields": [
                {"_key": "contacts[c:1].fields[uid:1]", "email": "user@example.com"},
                {"_key": "contacts[c:1].fields[uid:2]", "phone": "+1 650 555-1234"},
            ],
        }]})
    );
}

#[test]
fn several_patterns_compose_into_one_tree() {
    let entries = sorted(
        store()
            .retrieve_multiple(&["contacts[c:2]%", "sites[s:1].contact"])
            .unwrap(),
    );
    let tree = compose(&entries, None).unwrap();
    assert_eq!(tree.get("contacts").and_then(Tree::as_list).map(|l| l.len()), Some(1));
    assert_eq!(
        tree.get("sites").and_then(Tree::as_list).unwrap()[0].get("contact"),
        Some(&Tree::Leaf(json!("c:2")))
    );
}

#[test]
fn missing_exact_pattern_aborts_the_query() {
    let err = store()
        .retrieve_multiple(&["contacts[c:1]%", "contacts[c:9].id"])
        .unwrap_err();
    assert_eq!(err, StoreError::NotFound("contacts[c:9].id".into()));
}

#[test]
fn composed_tree_is_detached_from_the_store() {
    let mut s = store();
    let entries = sorted(s.retrieve_multiple(&["sites%"]).unwrap());
    let tree = compose(&entries, None).unwrap();
    s.update("sites[s:1].contact", json!("c:1")).unwrap();
    s.delete("contacts[c:1].id").unwrap();
    assert_eq!(tree.into_value(), json!({"sites": [{"contact": "c:2"}]}));
}

#[test]
fn flatten_into_a_new_store_round_trips() {
    let entries = sorted(store().retrieve_multiple(&["%"]).unwrap());
    let tree = compose(&entries, Some("_key")).unwrap();

    let flat = flatten(&tree, Some("_key"));
    let copy: HashMap<String, Value> = flat.iter().cloned().collect();
    let rebuilt = PathStore::from_entries(&copy);
    assert_eq!(rebuilt, store());

    let again = compose(&flat, Some("_key")).unwrap();
    assert_eq!(again, tree);
}

#[test]
fn strict_options_from_yaml() {
    let options: ComposeOptions = serde_yaml::from_str("strict: true\nkey_field: ''\n").unwrap();
    let entries = vec![("a.b", json!(1)), ("a[1].c", json!(2))];
    assert!(compose_with(&entries, &options).is_err());
    assert!(compose(&entries, None).is_ok());
}
