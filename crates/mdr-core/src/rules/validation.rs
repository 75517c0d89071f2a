//! Field validation for managed items
//!
//! Validation never fails an operation by itself: it fills a
//! [`ValidationErrors`] list that travels with the item back to the caller.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::OnceLock;

/// One field-attributed validation message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Structured validation result attached to an item
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrors {
    entries: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.entries.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Copy child errors under `base`, e.g. `Group, ordinal=1, error: ...`
    pub fn merge_prefixed(&mut self, base: &str, prefix: &str, child: ValidationErrors) {
        for entry in child.entries {
            self.add(
                base,
                format!("{}, error: {}", prefix, entry.full_message()),
            );
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[FieldError] {
        &self.entries
    }

    pub fn on(&self, field: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.field == field)
            .map(|e| e.message.as_str())
            .collect()
    }

    /// Messages prefixed with their humanized field name
    pub fn full_messages(&self) -> Vec<String> {
        self.entries.iter().map(FieldError::full_message).collect()
    }
}

impl FieldError {
    /// `"Label contains invalid characters"`; `base` errors render bare
    pub fn full_message(&self) -> String {
        if self.field == "base" {
            return self.message.clone();
        }
        format!("{} {}", humanize(&self.field), self.message)
    }
}

fn humanize(field: &str) -> String {
    let spaced = field.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn pattern(cell: &'static OnceLock<Regex>, source: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(source).unwrap_or_else(|e| panic!("bad pattern {source}: {e}")))
}

fn identifier_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    pattern(&RE, r"^[A-Za-z0-9 ]+$")
}

fn label_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    pattern(&RE, r#"^[A-Za-z0-9 .!?,'"_\-/\\()\[\]~#*+@=:;&|<>]*$"#)
}

fn markdown_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    pattern(&RE, r#"^[A-Za-z0-9 .!?,'"_\-/\\()\[\]~#*+@=:;&|<>%^{}`$\r\n\t]*$"#)
}

fn short_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    pattern(&RE, r"^[A-Za-z0-9]+$")
}

fn authority_number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    pattern(&RE, r"^[0-9]{9}$")
}

fn mapping_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    pattern(&RE, r"^([A-Z][A-Z0-9]{0,7})?$")
}

pub fn valid_identifier(field: &str, value: &str, errors: &mut ValidationErrors) -> bool {
    if value.trim().is_empty() {
        errors.add(field, "is empty");
        return false;
    }
    check(identifier_re(), field, value, "contains invalid characters", errors)
}

pub fn valid_label(field: &str, value: &str, errors: &mut ValidationErrors) -> bool {
    check(label_re(), field, value, "contains invalid characters", errors)
}

pub fn valid_markdown(field: &str, value: &str, errors: &mut ValidationErrors) -> bool {
    check(markdown_re(), field, value, "contains invalid markdown", errors)
}

pub fn valid_short_name(field: &str, value: &str, errors: &mut ValidationErrors) -> bool {
    check(short_name_re(), field, value, "contains invalid characters", errors)
}

pub fn valid_authority_number(field: &str, value: &str, errors: &mut ValidationErrors) -> bool {
    check(authority_number_re(), field, value, "must be 9 digits", errors)
}

pub fn valid_mapping(field: &str, value: &str, errors: &mut ValidationErrors) -> bool {
    check(mapping_re(), field, value, "is not a valid SDTM variable name", errors)
}

/// Sibling ordinals must be positive and distinct
pub fn valid_ordinals(
    field: &str,
    ordinals: impl IntoIterator<Item = u32>,
    errors: &mut ValidationErrors,
) -> bool {
    let mut seen = HashSet::new();
    let mut ok = true;
    for ordinal in ordinals {
        if ordinal == 0 {
            errors.add(field, "must be greater than zero");
            ok = false;
        } else if !seen.insert(ordinal) {
            errors.add(field, format!("{} is duplicated", ordinal));
            ok = false;
        }
    }
    ok
}

fn check(
    re: &Regex,
    field: &str,
    value: &str,
    message: &str,
    errors: &mut ValidationErrors,
) -> bool {
    if re.is_match(value) {
        true
    } else {
        errors.add(field, message);
        false
    }
}
