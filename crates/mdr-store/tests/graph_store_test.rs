// Integration tests for the SQLite graph store

use chrono::{TimeZone, Utc};
use mdr_core::graph::{GraphMutation, TriplePattern};
use mdr_core::model::{Form, ManagedItem};
use mdr_core::ops::queries::{load_all, load_item, subtree_triples};
use mdr_core::ops::GraphStore;
use mdr_core::MdrConfig;
use mdr_store::SqliteStore;
use tempfile::TempDir;

fn form(identifier: &str) -> ManagedItem<Form> {
    let mut item = ManagedItem::new(
        &MdrConfig::default(),
        identifier,
        "Vital signs",
        Form::placeholder("Collect \"all\" vitals\nper visit"),
    );
    item.creation_date = Some(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap());
    item
}

#[test]
fn test_item_survives_reopen() {
    // Given: A form written to an on-disk database
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("store.db");
    let item = form("VS1");
    {
        let store = SqliteStore::open(&path).unwrap();
        store.update(&GraphMutation::insert(item.to_graph())).unwrap();
    }

    // When: The database is reopened and the item loaded
    let store = SqliteStore::open(&path).unwrap();
    let loaded: ManagedItem<Form> = load_item(&store, &item.uri, true).unwrap().unwrap();

    // Then: It is identical, escapes and dates included
    assert_eq!(loaded, item);
}

#[test]
fn test_replace_mutation_is_atomic_unit() {
    let store = SqliteStore::open_in_memory().unwrap();
    let v1 = form("VS1");
    store.update(&GraphMutation::insert(v1.to_graph())).unwrap();

    let mut edited = v1.clone();
    edited.label = "Vital signs (edited)".to_string();
    store
        .update(&GraphMutation {
            delete: subtree_triples(&store, &v1.uri).unwrap(),
            insert: edited.to_graph(),
        })
        .unwrap();

    let loaded: ManagedItem<Form> = load_item(&store, &v1.uri, true).unwrap().unwrap();
    assert_eq!(loaded.label, "Vital signs (edited)");
    assert_eq!(
        store.query(&TriplePattern::any()).unwrap().len(),
        edited.to_graph().len()
    );
}

#[test]
fn test_load_all_returns_every_form() {
    let store = SqliteStore::open_in_memory().unwrap();
    for id in ["A1", "B2", "C3"] {
        store.update(&GraphMutation::insert(form(id).to_graph())).unwrap();
    }

    let forms = load_all::<Form>(&store, false).unwrap();
    let ids: Vec<&str> = forms.iter().map(|f| f.identifier()).collect();
    assert_eq!(ids, vec!["A1", "B2", "C3"]);
}
