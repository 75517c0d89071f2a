pub mod biomedical_concept;
pub mod form;
pub mod identifier;
pub mod managed_item;
pub mod operation;
pub mod reference;
pub mod registration;
pub mod thesaurus;
pub mod user;

pub use biomedical_concept::{BiomedicalConcept, BiomedicalConceptTemplate, Property};
pub use form::{Annotation, Form, FormItem, Group, ItemContent};
pub use identifier::{compact_identifier, ChainKey, ItemKind, ItemUri, Scope, ScopedIdentifier};
pub use managed_item::{ItemSummary, ManagedItem, Payload};
pub use operation::{Action, Operation, OperationPayload};
pub use reference::OperationalReference;
pub use registration::{RegistrationAuthority, RegistrationState, RegistrationStatus};
pub use thesaurus::Thesaurus;
pub use user::User;
