use mdr_core::audit::MemoryAuditSink;
use mdr_core::lock::{LockRegistry, ManualClock, MemoryLockStore};
use mdr_core::model::{
    Form, FormItem, Group, ItemContent, ItemUri, ManagedItem, OperationPayload,
    OperationalReference, RegistrationStatus, User,
};
use mdr_core::ops::{FaultyGraphStore, MemoryGraphStore};
use mdr_core::policy::{AllowAllCreatePolicy, CreatePolicy};
use mdr_core::terminology::{StaticTerminology, TermConcept, TerminologySource, ThesaurusVersion};
use mdr_core::MdrConfig;
use mdr_engine::{EditService, Lifecycle};
use std::sync::Arc;

pub const CT_V1: &str = "http://www.assero.co.uk/MDRThesaurus/CDISC/V1";
pub const CT_V2: &str = "http://www.assero.co.uk/MDRThesaurus/CDISC/V2";

/// Everything an edit-session test needs to poke at
#[allow(dead_code)]
pub struct Harness {
    pub store: Arc<FaultyGraphStore<MemoryGraphStore>>,
    pub clock: Arc<ManualClock>,
    pub audit: Arc<MemoryAuditSink>,
    pub service: EditService,
}

#[allow(dead_code)]
impl Harness {
    /// Triples currently stored
    pub fn triple_count(&self) -> usize {
        self.store.inner().len()
    }
}

#[allow(dead_code)]
pub fn harness() -> Harness {
    harness_with(Arc::new(AllowAllCreatePolicy), Arc::new(StaticTerminology::new()))
}

#[allow(dead_code)]
pub fn harness_with(
    policy: Arc<dyn CreatePolicy>,
    terminology: Arc<dyn TerminologySource>,
) -> Harness {
    let config = MdrConfig::default();
    let store = Arc::new(FaultyGraphStore::new(MemoryGraphStore::new()));
    let clock = Arc::new(ManualClock::default());
    let audit = Arc::new(MemoryAuditSink::new());
    let locks = LockRegistry::new(
        Arc::new(MemoryLockStore::new()),
        clock.clone(),
        config.lock_timeout(),
    );
    let lifecycle = Lifecycle::new(store.clone(), config)
        .with_policy(policy)
        .with_clock(clock.clone());
    let service = EditService::new(lifecycle, locks, audit.clone(), terminology);
    Harness {
        store,
        clock,
        audit,
        service,
    }
}

#[allow(dead_code)]
pub fn alice() -> User {
    User::new("alice", "alice@example.com")
}

#[allow(dead_code)]
pub fn bob() -> User {
    User::new("bob", "bob@example.com")
}

/// Create operation for a placeholder form in the given status
#[allow(dead_code)]
pub fn placeholder(identifier: &str, status: RegistrationStatus) -> OperationPayload<Form> {
    let mut item = ManagedItem::new(
        &MdrConfig::default(),
        identifier,
        "Placeholder form",
        Form::placeholder("Free text"),
    );
    item.registration_state.status = status;
    item.create_operation()
}

#[allow(dead_code)]
pub fn concept_uri(namespace: &str, id: &str) -> ItemUri {
    ItemUri::new(namespace, id)
}

/// Form with one question coded against `namespace`
#[allow(dead_code)]
pub fn sex_form(identifier: &str, namespace: &str) -> OperationPayload<Form> {
    let question = FormItem {
        label: "Sex".to_string(),
        ordinal: 1,
        optional: false,
        completion: String::new(),
        note: String::new(),
        content: ItemContent::Question {
            question_text: "Sex of the subject".to_string(),
            datatype: "string".to_string(),
            format: "1".to_string(),
            mapping: "SEX".to_string(),
            tc_refs: vec![
                OperationalReference::new(concept_uri(namespace, "CLI-C66731_C20197"), 1),
                OperationalReference::new(concept_uri(namespace, "CLI-C66731_C16576"), 2),
            ],
        },
    };
    let payload = Form {
        completion: String::new(),
        note: String::new(),
        groups: vec![Group {
            label: "Demographics".to_string(),
            ordinal: 1,
            items: vec![question],
            ..Group::default()
        }],
    };
    ManagedItem::new(&MdrConfig::default(), identifier, "Sex form", payload).create_operation()
}

fn thesaurus(namespace: &str, version: u32, current: bool) -> ThesaurusVersion {
    ThesaurusVersion {
        uri: ItemUri::new(namespace, "TH-CDISC_CT"),
        identifier: "CT".to_string(),
        scope_id: "NS-CDISC".to_string(),
        version,
        current,
    }
}

fn term(preferred: &str) -> TermConcept {
    TermConcept {
        uri: None,
        identifier: "C20197".to_string(),
        notation: "M".to_string(),
        preferred_term: preferred.to_string(),
        synonym: String::new(),
        definition: "A person who belongs to the sex that normally produces sperm.".to_string(),
        label: "Male".to_string(),
    }
}

/// Two terminology versions, V2 current; the second concept's
/// preferred term changes in V2 when `drift` is set
#[allow(dead_code)]
pub fn terminology(drift: bool) -> StaticTerminology {
    let later = if drift { "Female Sex" } else { "Female" };
    StaticTerminology::new()
        .with_thesaurus(thesaurus(CT_V1, 1, false))
        .with_thesaurus(thesaurus(CT_V2, 2, true))
        .with_concept(concept_uri(CT_V1, "CLI-C66731_C20197"), term("Male"))
        .with_concept(concept_uri(CT_V2, "CLI-C66731_C20197"), term("Male"))
        .with_concept(concept_uri(CT_V1, "CLI-C66731_C16576"), term("Female"))
        .with_concept(concept_uri(CT_V2, "CLI-C66731_C16576"), term(later))
}
