#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use mdr_core::model::{BiomedicalConcept, ManagedItem};
use mdr_core::MdrError;

#[test]
fn test_instance_copies_template_properties() {
    // GIVEN a template with two properties
    let template = common::height_template();

    // WHEN an instance is built from it
    let bc = BiomedicalConcept::from_template(&common::config(), Some(&template), "HEIGHT", "Height")
        .expect("template present");

    // THEN it is a fresh first version pointing at the template
    assert_eq!(bc.version(), 1);
    assert_eq!(bc.identifier(), "HEIGHT");
    assert_eq!(bc.uri.to_string(), "http://www.assero.co.uk/MDRBCs/ACME/V1#BC-ACME_HEIGHT");
    assert_eq!(bc.payload.properties, template.payload.properties);
    assert_eq!(bc.payload.template_ref.as_ref().unwrap().target, template.uri);
}

#[test]
fn test_missing_template_is_reported() {
    let err = BiomedicalConcept::from_template(&common::config(), None, "HEIGHT", "Height")
        .unwrap_err();
    assert!(matches!(err, MdrError::TemplateMissing));
    assert_eq!(err.to_string(), "No Biomedical Concept Template has been defined.");
}

#[test]
fn test_properties_are_ordinal_ordered() {
    let mut bc = common::height_concept();
    bc.payload.properties.reverse();
    let aliases: Vec<&str> = bc
        .payload
        .properties()
        .iter()
        .map(|p| p.alias.as_str())
        .collect();
    assert_eq!(aliases, vec!["Result", "Unit"]);
}

#[test]
fn test_unique_references_are_deduplicated() {
    let mut bc = common::height_concept();
    let shared = bc.payload.properties[1].tc_refs[0].clone();
    bc.payload.properties[0].tc_refs.push(shared.clone());

    assert_eq!(bc.payload.unique_references(), vec![shared.target]);
}

#[test]
fn test_property_errors_are_prefixed() {
    let mut bc: ManagedItem<BiomedicalConcept> = common::height_concept();
    bc.payload.properties[1].simple_datatype = "blob".to_string();
    assert!(!bc.is_valid());
    assert_eq!(
        bc.errors.full_messages(),
        vec!["Property, ordinal=2, error: Simple datatype 'blob' is not a recognised data type"]
    );
}
