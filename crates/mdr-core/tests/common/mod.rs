use chrono::{TimeZone, Utc};
use mdr_core::model::{
    BiomedicalConcept, BiomedicalConceptTemplate, Form, FormItem, Group, ItemContent, ItemUri,
    ManagedItem, OperationalReference, Property,
};
use mdr_core::MdrConfig;

/// Default configuration (ACME owner, `Standard` released)
#[allow(dead_code)]
pub fn config() -> MdrConfig {
    MdrConfig::default()
}

/// Concept URI inside a CDISC terminology version
#[allow(dead_code)]
pub fn concept(version: u32, id: &str) -> ItemUri {
    ItemUri::new(
        format!("http://www.assero.co.uk/MDRThesaurus/CDISC/V{}", version),
        id,
    )
}

/// A demographics form with one question group and one label group
#[allow(dead_code)]
pub fn demographics_form(identifier: &str) -> ManagedItem<Form> {
    let question = FormItem {
        label: "Sex".to_string(),
        ordinal: 1,
        optional: false,
        completion: "Tick one".to_string(),
        note: String::new(),
        content: ItemContent::Question {
            question_text: "What is the subject's sex?".to_string(),
            datatype: "string".to_string(),
            format: "1".to_string(),
            mapping: "SEX".to_string(),
            tc_refs: vec![
                OperationalReference::new(concept(42, "CLI-C66731_C20197"), 1),
                OperationalReference::new(concept(42, "CLI-C66731_C16576"), 2),
            ],
        },
    };
    let birth = FormItem {
        label: "Birth date".to_string(),
        ordinal: 2,
        optional: true,
        completion: String::new(),
        note: String::new(),
        content: ItemContent::Question {
            question_text: "Date of birth".to_string(),
            datatype: "date".to_string(),
            format: String::new(),
            mapping: "BRTHDTC".to_string(),
            tc_refs: Vec::new(),
        },
    };
    let label = FormItem {
        label: "Instructions".to_string(),
        ordinal: 1,
        optional: false,
        completion: String::new(),
        note: String::new(),
        content: ItemContent::TextLabel {
            label_text: "Complete at screening".to_string(),
        },
    };
    let payload = Form {
        completion: "Complete at visit 1".to_string(),
        note: String::new(),
        groups: vec![
            Group {
                label: "Subject".to_string(),
                ordinal: 1,
                items: vec![question, birth],
                ..Group::default()
            },
            Group {
                label: "Notes".to_string(),
                ordinal: 2,
                items: vec![label],
                ..Group::default()
            },
        ],
    };
    let mut item = ManagedItem::new(&config(), identifier, "Demographics", payload);
    let now = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
    item.creation_date = Some(now);
    item.last_changed_date = Some(now);
    item
}

/// Template with height and unit properties
#[allow(dead_code)]
pub fn height_template() -> ManagedItem<BiomedicalConceptTemplate> {
    let payload = BiomedicalConceptTemplate {
        properties: vec![
            Property {
                alias: "Result".to_string(),
                ordinal: 1,
                question_text: "Height".to_string(),
                enabled: true,
                collect: true,
                simple_datatype: "float".to_string(),
                bridg_path: "PerformedObservationResult.value".to_string(),
                ..Property::default()
            },
            Property {
                alias: "Unit".to_string(),
                ordinal: 2,
                enabled: true,
                collect: true,
                simple_datatype: "string".to_string(),
                tc_refs: vec![OperationalReference::new(concept(42, "CLI-C66770_C49668"), 1)],
                ..Property::default()
            },
        ],
    };
    ManagedItem::new(&config(), "Obs PQR", "Observation PQR", payload)
}

#[allow(dead_code)]
pub fn height_concept() -> ManagedItem<BiomedicalConcept> {
    BiomedicalConcept::from_template(&config(), Some(&height_template()), "HEIGHT", "Height")
        .expect("template is present")
}
