#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use mdr_core::config::MdrConfig;
use mdr_core::model::{Form, FormItem, Group, ItemContent, ManagedItem, Payload};
use std::collections::BTreeMap;

fn question(ordinal: u32, mapping: &str) -> FormItem {
    FormItem {
        label: format!("Question {}", ordinal),
        ordinal,
        optional: false,
        completion: String::new(),
        note: String::new(),
        content: ItemContent::Question {
            question_text: "Result".to_string(),
            datatype: "float".to_string(),
            format: "5.1".to_string(),
            mapping: mapping.to_string(),
            tc_refs: Vec::new(),
        },
    }
}

#[test]
fn test_valid_form_has_no_errors() {
    let mut form = common::demographics_form("DM101");
    assert!(form.is_valid(), "{:?}", form.errors.full_messages());
    assert!(form.errors.is_empty());
}

#[test]
fn test_placeholder_form_shape() {
    // WHEN building the placeholder payload
    let payload = Form::placeholder("Collect vitals at each visit");

    // THEN it holds one group with one placeholder item
    assert_eq!(payload.groups.len(), 1);
    let group = &payload.groups[0];
    assert_eq!(group.label, "Placeholder Group");
    assert_eq!(group.items.len(), 1);
    assert_eq!(
        group.items[0].content,
        ItemContent::Placeholder {
            free_text: "Collect vitals at each visit".to_string()
        }
    );

    let mut item = ManagedItem::new(&common::config(), "VS PH", "Vitals placeholder", payload);
    assert!(item.is_valid());
}

#[test]
fn test_child_errors_are_prefixed_with_ordinal() {
    // GIVEN a form whose second item has an invalid label and mapping
    let mut form = common::demographics_form("DM101");
    form.payload.groups[0].items[1].label = "Bad §".to_string();
    if let ItemContent::Question { mapping, .. } = &mut form.payload.groups[0].items[1].content {
        *mapping = "lowercase".to_string();
    }

    // WHEN validating
    assert!(!form.is_valid());

    // THEN messages name the group and item ordinals
    let messages = form.errors.full_messages();
    assert!(messages.contains(
        &"Group, ordinal=1, error: Item, ordinal=2, error: Label contains invalid characters"
            .to_string()
    ));
    assert!(messages.contains(
        &"Group, ordinal=1, error: Item, ordinal=2, error: Mapping is not a valid SDTM variable name"
            .to_string()
    ));
}

#[test]
fn test_duplicate_group_ordinals_rejected() {
    let mut form = common::demographics_form("DM101");
    form.payload.groups[1].ordinal = 1;
    assert!(!form.is_valid());
    assert_eq!(form.errors.on("group_ordinal"), vec!["1 is duplicated"]);
}

#[test]
fn test_header_errors_are_reported() {
    let mut form = common::demographics_form("DM101");
    form.scoped_identifier.identifier = String::new();
    form.label = "Bad ±".to_string();
    assert!(!form.is_valid());
    assert_eq!(form.errors.on("identifier"), vec!["is empty"]);
    assert_eq!(form.errors.on("label"), vec!["contains invalid characters"]);
}

#[test]
fn test_terminology_refs_cover_nested_questions() {
    let mut form = common::demographics_form("DM101");
    assert_eq!(form.payload.terminology_refs().len(), 2);

    for r in form.payload.terminology_refs_mut() {
        r.enabled = false;
    }
    assert!(form.payload.terminology_refs().iter().all(|r| !r.enabled));
}

#[test]
fn test_annotations_use_injected_domain_table() {
    // GIVEN a form mapping two vital-signs variables and one demographics variable
    let payload = Form {
        groups: vec![Group {
            label: "Vitals".to_string(),
            ordinal: 1,
            items: vec![question(2, "VSORRES"), question(1, "VSPOS"), question(3, "DMAGE")],
            ..Group::default()
        }],
        ..Form::default()
    };
    let item = ManagedItem::new(&common::config(), "VS1", "Vitals", payload);

    // WHEN annotating with the default table
    let annotations = item.annotations(&common::config());

    // THEN annotations follow item ordinal order with long names resolved
    let prefixes: Vec<&str> = annotations.iter().map(|a| a.domain_prefix.as_str()).collect();
    assert_eq!(prefixes, vec!["VS", "VS", "DM"]);
    assert_eq!(annotations[0].sdtm_variable, "VSPOS");
    assert_eq!(annotations[0].domain_long_name, "Vital Signs");
    assert_eq!(annotations[2].domain_long_name, "Demographics");
    assert_eq!(annotations[0].item, item.uri.child("G1").child("I1"));

    // AND a replacement table is honoured
    let mut config = MdrConfig::default();
    config.domains = BTreeMap::from([("VS".to_string(), "Vitals (local)".to_string())]);
    let local = item.annotations(&config);
    assert_eq!(local[0].domain_long_name, "Vitals (local)");
    assert_eq!(local[2].domain_long_name, "");
}

#[test]
fn test_normalize_orders_siblings() {
    let mut payload = Form {
        groups: vec![
            Group {
                label: "B".to_string(),
                ordinal: 2,
                ..Group::default()
            },
            Group {
                label: "A".to_string(),
                ordinal: 1,
                items: vec![question(3, ""), question(1, "")],
                ..Group::default()
            },
        ],
        ..Form::default()
    };
    payload.normalize();
    assert_eq!(payload.groups[0].label, "A");
    assert_eq!(payload.groups[0].items[0].ordinal, 1);
}
