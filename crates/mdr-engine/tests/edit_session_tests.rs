//! Edit-session scenarios: version chains, the lock protocol and audit

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use chrono::Duration;
use common::{alice, bob, harness, placeholder};
use mdr_core::model::{Form, ManagedItem, OperationPayload, RegistrationStatus};
use mdr_core::EditLock;
use mdr_engine::lifecycle::{IDENTIFIER_IN_USE, IDENTITY_CHANGED};
use mdr_engine::{CreateOutcome, DestroyOutcome, EditOutcome, SaveOutcome};

fn editing(outcome: EditOutcome<Form>) -> (ManagedItem<Form>, EditLock, OperationPayload<Form>) {
    match outcome {
        EditOutcome::Editing {
            item,
            lock,
            payload,
        } => (item, lock, payload),
        other => panic!("expected Editing, got {:?}", other),
    }
}

#[test]
fn test_editing_released_item_extends_chain() {
    // GIVEN a released version 1
    let h = harness();
    let created = h
        .service
        .create(&placeholder("DM101", RegistrationStatus::Standard), &alice())
        .unwrap();
    let v1 = created.into_item();

    // WHEN alice edits and saves it
    let (item, _lock, mut payload) = editing(h.service.begin_edit::<Form>(&v1.uri, &alice()).unwrap());
    assert_eq!(item.version(), 2);
    assert_eq!(item.status(), RegistrationStatus::Incomplete);
    payload.managed_item.label = "Edited label".to_string();
    let saved = h.service.save(&payload, &alice()).unwrap();
    assert!(matches!(saved, SaveOutcome::Saved(_)));

    // THEN the chain holds two versions, newest first
    let lifecycle = h.service.lifecycle();
    let history = lifecycle.history::<Form>("DM101", &v1.scope().id).unwrap();
    let versions: Vec<u32> = history.iter().map(|i| i.version()).collect();
    assert_eq!(versions, vec![2, 1]);

    // AND unique returns only the edited head
    let unique = lifecycle.unique::<Form>().unwrap();
    assert_eq!(unique.len(), 1);
    assert_eq!(unique[0].version(), 2);
    assert_eq!(unique[0].label, "Edited label");

    // AND the pre-edit content of version 2 is gone
    let all = lifecycle.all::<Form>().unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all.iter().filter(|i| i.version() == 2).count(), 1);
    assert_eq!(lifecycle.list::<Form>().unwrap().len(), 1);
}

#[test]
fn test_first_save_is_audited_once() {
    let h = harness();
    let v1 = h
        .service
        .create(&placeholder("AE1", RegistrationStatus::Incomplete), &alice())
        .unwrap()
        .into_item();

    let (item, _lock, mut payload) = editing(h.service.begin_edit::<Form>(&v1.uri, &alice()).unwrap());
    assert_eq!(item.version(), 1);
    for label in ["First", "Second", "Third"] {
        payload.managed_item.label = label.to_string();
        h.service.save(&payload, &alice()).unwrap();
    }

    assert_eq!(h.audit.messages(), vec!["Form created.", "Form updated."]);
    let stored = h.service.lifecycle().find::<Form>(&v1.uri, false).unwrap();
    assert_eq!(stored.label, "Third");
}

#[test]
fn test_save_without_lock_is_rejected() {
    // GIVEN an item nobody is editing
    let h = harness();
    let item = h
        .service
        .create(&placeholder("VS1", RegistrationStatus::Incomplete), &alice())
        .unwrap()
        .into_item();
    let mut payload = item.update_operation();
    payload.managed_item.label = "Sneaky".to_string();
    let before = h.triple_count();

    // WHEN alice saves without beginning an edit
    let outcome = h.service.save(&payload, &alice()).unwrap();

    // THEN the lock has expired from her point of view and nothing changed
    assert_eq!(outcome, SaveOutcome::LockExpired);
    assert_eq!(h.triple_count(), before);
    let stored = h.service.lifecycle().find::<Form>(&item.uri, false).unwrap();
    assert_eq!(stored.label, "Placeholder form");
}

#[test]
fn test_save_while_other_user_edits_is_conflict() {
    let h = harness();
    let item = h
        .service
        .create(&placeholder("VS1", RegistrationStatus::Incomplete), &alice())
        .unwrap()
        .into_item();
    let (_, bob_lock, _) = editing(h.service.begin_edit::<Form>(&item.uri, &bob()).unwrap());

    let outcome = h.service.save(&item.update_operation(), &alice()).unwrap();
    assert_eq!(
        outcome,
        SaveOutcome::LockConflict {
            holder: Some(bob_lock)
        }
    );

    // alice cannot start an edit either
    match h.service.begin_edit::<Form>(&item.uri, &alice()).unwrap() {
        EditOutcome::LockConflict { holder } => assert_eq!(holder.unwrap().user_id, "bob"),
        other => panic!("expected LockConflict, got {:?}", other),
    }
}

#[test]
fn test_save_after_timeout_is_expired() {
    let h = harness();
    let item = h
        .service
        .create(&placeholder("VS1", RegistrationStatus::Incomplete), &alice())
        .unwrap()
        .into_item();
    let (_, _lock, mut payload) = editing(h.service.begin_edit::<Form>(&item.uri, &alice()).unwrap());

    h.clock.advance(Duration::seconds(301));
    payload.managed_item.label = "Too late".to_string();
    assert_eq!(h.service.save(&payload, &alice()).unwrap(), SaveOutcome::LockExpired);

    // the expired lock no longer blocks bob
    editing(h.service.begin_edit::<Form>(&item.uri, &bob()).unwrap());
}

#[test]
fn test_destroy_releases_lock_and_audits() {
    let h = harness();
    let item = h
        .service
        .create(&placeholder("VS1", RegistrationStatus::Incomplete), &alice())
        .unwrap()
        .into_item();

    let outcome = h.service.destroy::<Form>(&item.uri, &alice()).unwrap();

    assert_eq!(outcome, DestroyOutcome::Destroyed);
    assert_eq!(h.triple_count(), 0);
    assert!(h.service.locks().holder(&item.uri).unwrap().is_none());
    assert_eq!(h.audit.messages().last().map(String::as_str), Some("Form deleted."));
}

#[test]
fn test_destroy_while_other_user_edits_is_conflict() {
    let h = harness();
    let item = h
        .service
        .create(&placeholder("VS1", RegistrationStatus::Incomplete), &alice())
        .unwrap()
        .into_item();
    editing(h.service.begin_edit::<Form>(&item.uri, &bob()).unwrap());

    let outcome = h.service.destroy::<Form>(&item.uri, &alice()).unwrap();

    assert!(matches!(outcome, DestroyOutcome::LockConflict { holder: Some(ref l) } if l.user_id == "bob"));
    assert!(h.service.lifecycle().find::<Form>(&item.uri, false).is_ok());
}

#[test]
fn test_cancel_edit_frees_item() {
    let h = harness();
    let item = h
        .service
        .create(&placeholder("VS1", RegistrationStatus::Incomplete), &alice())
        .unwrap()
        .into_item();
    let (_, lock, _) = editing(h.service.begin_edit::<Form>(&item.uri, &alice()).unwrap());

    h.service.cancel_edit(&lock).unwrap();

    editing(h.service.begin_edit::<Form>(&item.uri, &bob()).unwrap());
}

#[test]
fn test_retired_item_is_not_editable() {
    let h = harness();
    let retired = h
        .service
        .create(&placeholder("OLD", RegistrationStatus::Retired), &alice())
        .unwrap()
        .into_item();
    h.service
        .create(&placeholder("NEW", RegistrationStatus::Incomplete), &alice())
        .unwrap();

    assert!(matches!(
        h.service.begin_edit::<Form>(&retired.uri, &alice()).unwrap(),
        EditOutcome::NotEditable(_)
    ));
    let editable: Vec<String> = h
        .service
        .editable::<Form>()
        .unwrap()
        .iter()
        .map(|i| i.identifier().to_string())
        .collect();
    assert_eq!(editable, vec!["NEW"]);
}

#[test]
fn test_editing_old_version_targets_chain_head() {
    // GIVEN version 1 released and version 2 already started
    let h = harness();
    let v1 = h
        .service
        .create(&placeholder("DM1", RegistrationStatus::Standard), &alice())
        .unwrap()
        .into_item();
    let (v2, lock, _) = editing(h.service.begin_edit::<Form>(&v1.uri, &alice()).unwrap());
    h.service.cancel_edit(&lock).unwrap();

    // WHEN bob opens version 1 again
    let (item, _, _) = editing(h.service.begin_edit::<Form>(&v1.uri, &bob()).unwrap());

    // THEN he edits version 2 and no third version appears
    assert_eq!(item.uri, v2.uri);
    assert_eq!(h.service.lifecycle().all::<Form>().unwrap().len(), 2);
}

#[test]
fn test_create_rejects_invalid_label() {
    let h = harness();
    let mut op = placeholder("BAD", RegistrationStatus::Incomplete);
    op.managed_item.label = "Half done 50%".to_string();

    let outcome = h.service.create(&op, &alice()).unwrap();

    match outcome {
        CreateOutcome::Invalid(item) => assert!(!item.errors.on("label").is_empty()),
        other => panic!("expected Invalid, got {:?}", other),
    }
    assert_eq!(h.triple_count(), 0);
    assert!(h.audit.events().is_empty());
}

#[test]
fn test_identifier_differing_only_in_spacing_is_in_use() {
    // GIVEN a form identified DM1
    let h = harness();
    let first = h
        .service
        .create(&placeholder("DM1", RegistrationStatus::Incomplete), &alice())
        .unwrap()
        .into_item();
    let before = h.triple_count();

    // WHEN bob creates "DM 1", which compacts to the same local id
    let mut op = placeholder("DM 1", RegistrationStatus::Incomplete);
    op.managed_item.label = "Second form".to_string();
    let outcome = h.service.create(&op, &bob()).unwrap();

    // THEN the create is refused and the first form is intact
    match outcome {
        CreateOutcome::Invalid(item) => {
            assert_eq!(item.errors.on("identifier"), vec![IDENTIFIER_IN_USE]);
            assert_eq!(item.uri, first.uri);
        }
        other => panic!("expected Invalid, got {:?}", other),
    }
    assert_eq!(h.triple_count(), before);
    let all = h.service.lifecycle().all::<Form>().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].identifier(), "DM1");
    assert_eq!(all[0].label, "Placeholder form");
}

#[test]
fn test_save_cannot_retarget_another_item() {
    // GIVEN bob editing Y and alice editing X
    let h = harness();
    let y = h
        .service
        .create(&placeholder("Y", RegistrationStatus::Incomplete), &alice())
        .unwrap()
        .into_item();
    let x = h
        .service
        .create(&placeholder("X", RegistrationStatus::Incomplete), &alice())
        .unwrap()
        .into_item();
    editing(h.service.begin_edit::<Form>(&y.uri, &bob()).unwrap());
    let (_, _lock, mut payload) = editing(h.service.begin_edit::<Form>(&x.uri, &alice()).unwrap());

    // WHEN alice rewrites her payload's identifier to Y and saves
    payload.managed_item.scoped_identifier.identifier = "Y".to_string();
    payload.managed_item.label = "Hijacked".to_string();
    let outcome = h.service.save(&payload, &alice()).unwrap();

    // THEN the save is rejected and neither item changed
    match outcome {
        SaveOutcome::Invalid(item) => {
            assert_eq!(item.errors.on("identifier"), vec![IDENTITY_CHANGED]);
        }
        other => panic!("expected Invalid, got {:?}", other),
    }
    let lifecycle = h.service.lifecycle();
    assert_eq!(lifecycle.find::<Form>(&y.uri, false).unwrap().label, "Placeholder form");
    assert_eq!(lifecycle.find::<Form>(&x.uri, false).unwrap().label, "Placeholder form");
}

#[test]
fn test_save_cannot_change_version() {
    let h = harness();
    let item = h
        .service
        .create(&placeholder("VS1", RegistrationStatus::Incomplete), &alice())
        .unwrap()
        .into_item();
    let (_, _lock, mut payload) = editing(h.service.begin_edit::<Form>(&item.uri, &alice()).unwrap());
    let before = h.triple_count();

    payload.operation.new_version = 2;
    let outcome = h.service.save(&payload, &alice()).unwrap();

    assert!(matches!(outcome, SaveOutcome::Invalid(_)));
    assert_eq!(h.triple_count(), before);
    assert_eq!(h.service.lifecycle().all::<Form>().unwrap().len(), 1);
}

#[test]
fn test_retired_head_closes_whole_chain() {
    // GIVEN an editable version 1 whose head, version 2, is retired
    let h = harness();
    let v1 = h
        .service
        .create(&placeholder("DM9", RegistrationStatus::Incomplete), &alice())
        .unwrap()
        .into_item();
    let mut v2 = placeholder("DM9", RegistrationStatus::Retired);
    v2.operation.new_version = 2;
    h.service.create(&v2, &alice()).unwrap();

    // WHEN alice opens version 1
    let outcome = h.service.begin_edit::<Form>(&v1.uri, &alice()).unwrap();

    // THEN the retired head is reported and no lock is taken
    match outcome {
        EditOutcome::NotEditable(head) => assert_eq!(head.version(), 2),
        other => panic!("expected NotEditable, got {:?}", other),
    }
    assert!(h.service.locks().active_locks().unwrap().is_empty());
}
