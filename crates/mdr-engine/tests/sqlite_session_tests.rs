//! Edit sessions over the SQLite store, surviving a reopen

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{alice, placeholder};
use mdr_core::lock::{LockRegistry, SystemClock};
use mdr_core::model::{Form, RegistrationStatus};
use mdr_core::terminology::StaticTerminology;
use mdr_core::MdrConfig;
use mdr_engine::{EditOutcome, EditService, Lifecycle, SaveOutcome};
use mdr_store::SqliteStore;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn open_service(path: &Path) -> (Arc<SqliteStore>, EditService) {
    let config = MdrConfig::default();
    let store = Arc::new(SqliteStore::open(path).unwrap());
    let locks = LockRegistry::new(store.clone(), Arc::new(SystemClock), config.lock_timeout());
    let service = EditService::new(
        Lifecycle::new(store.clone(), config),
        locks,
        store.clone(),
        Arc::new(StaticTerminology::new()),
    );
    (store, service)
}

#[test]
fn test_edit_session_persists_chain_and_audit_trail() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("mdr.db");

    // GIVEN a released form edited into version 2
    let v1_uri = {
        let (_, service) = open_service(&path);
        let v1 = service
            .create(&placeholder("DM101", RegistrationStatus::Standard), &alice())
            .unwrap()
            .into_item();
        let mut payload = match service.begin_edit::<Form>(&v1.uri, &alice()).unwrap() {
            EditOutcome::Editing { payload, .. } => payload,
            other => panic!("expected Editing, got {:?}", other),
        };
        payload.managed_item.label = "Demographics v2".to_string();
        assert!(matches!(
            service.save(&payload, &alice()).unwrap(),
            SaveOutcome::Saved(_)
        ));
        v1.uri
    };

    // WHEN the database is reopened
    let (store, service) = open_service(&path);

    // THEN the chain, the lock and the audit trail are all there
    let history = service.lifecycle().history::<Form>("DM101", "NS-ACME").unwrap();
    let labels: Vec<&str> = history.iter().map(|i| i.label.as_str()).collect();
    assert_eq!(labels, vec!["Demographics v2", "Placeholder form"]);
    assert_eq!(history[1].uri, v1_uri);

    assert_eq!(service.locks().active_locks().unwrap().len(), 1);
    let messages: Vec<String> = store
        .audit_trail(None)
        .unwrap()
        .into_iter()
        .map(|e| e.message)
        .collect();
    assert_eq!(messages, vec!["Form created.", "Form created.", "Form updated."]);
}
