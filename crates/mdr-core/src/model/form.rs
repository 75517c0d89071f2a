//! Form payload: ordinal-keyed groups of questions, placeholders and labels

use crate::config::MdrConfig;
use crate::errors::{MdrError, Result};
use crate::graph::vocab::{bf, bo, rdfs};
use crate::graph::{GraphWriter, SubjectGraph};
use crate::model::identifier::{ItemKind, ItemUri};
use crate::model::managed_item::{ManagedItem, Payload};
use crate::model::reference::{ordinal_of, OperationalReference};
use crate::rules::validation::{self, ValidationErrors};
use serde::{Deserialize, Serialize};

/// Data types a question may collect
pub const QUESTION_DATATYPES: &[&str] = &[
    "string", "integer", "float", "boolean", "date", "time", "datetime",
];

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Form {
    #[serde(default)]
    pub completion: String,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub groups: Vec<Group>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Group {
    pub label: String,
    pub ordinal: u32,
    #[serde(default)]
    pub completion: String,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub repeating: bool,
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub items: Vec<FormItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormItem {
    pub label: String,
    pub ordinal: u32,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub completion: String,
    #[serde(default)]
    pub note: String,
    #[serde(flatten)]
    pub content: ItemContent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ItemContent {
    Question {
        #[serde(default)]
        question_text: String,
        #[serde(default)]
        datatype: String,
        #[serde(default)]
        format: String,
        /// SDTM variable the answer maps to
        #[serde(default)]
        mapping: String,
        #[serde(default)]
        tc_refs: Vec<OperationalReference>,
    },
    Placeholder {
        #[serde(default)]
        free_text: String,
    },
    TextLabel {
        #[serde(default)]
        label_text: String,
    },
}

/// SDTM annotation of one mapped question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub item: ItemUri,
    pub domain_prefix: String,
    pub domain_long_name: String,
    pub sdtm_variable: String,
}

impl Form {
    /// Single group holding a single free-text placeholder
    pub fn placeholder(free_text: &str) -> Self {
        Form {
            groups: vec![Group {
                label: "Placeholder Group".to_string(),
                ordinal: 1,
                items: vec![FormItem {
                    label: "Placeholder".to_string(),
                    ordinal: 1,
                    optional: false,
                    completion: String::new(),
                    note: String::new(),
                    content: ItemContent::Placeholder {
                        free_text: free_text.to_string(),
                    },
                }],
                ..Group::default()
            }],
            ..Form::default()
        }
    }

    /// Sort every sibling list by ordinal
    pub fn normalize(&mut self) {
        self.groups.sort_by_key(|g| g.ordinal);
        for g in &mut self.groups {
            g.normalize();
        }
    }
}

impl Group {
    fn normalize(&mut self) {
        self.groups.sort_by_key(|g| g.ordinal);
        self.items.sort_by_key(|i| i.ordinal);
        for g in &mut self.groups {
            g.normalize();
        }
        for item in &mut self.items {
            if let ItemContent::Question { tc_refs, .. } = &mut item.content {
                tc_refs.sort_by_key(|r| r.ordinal);
            }
        }
    }

    fn validate(&self, errors: &mut ValidationErrors) {
        validation::valid_label("label", &self.label, errors);
        validation::valid_markdown("completion", &self.completion, errors);
        validation::valid_markdown("note", &self.note, errors);
        validation::valid_ordinals("group_ordinal", self.groups.iter().map(|g| g.ordinal), errors);
        validation::valid_ordinals("item_ordinal", self.items.iter().map(|i| i.ordinal), errors);
        for g in &self.groups {
            let mut child = ValidationErrors::new();
            g.validate(&mut child);
            errors.merge_prefixed("base", &format!("Group, ordinal={}", g.ordinal), child);
        }
        for item in &self.items {
            let mut child = ValidationErrors::new();
            item.validate(&mut child);
            errors.merge_prefixed("base", &format!("Item, ordinal={}", item.ordinal), child);
        }
    }

    fn write_graph(&self, node: &ItemUri, out: &mut GraphWriter) {
        out.node(node, bf::NORMAL_GROUP);
        out.string(node, rdfs::LABEL, &self.label);
        out.integer(node, bf::ORDINAL, i64::from(self.ordinal));
        out.string(node, bf::COMPLETION, &self.completion);
        out.string(node, bf::NOTE, &self.note);
        out.boolean(node, bf::OPTIONAL, self.optional);
        out.boolean(node, bf::REPEATING, self.repeating);
        for g in &self.groups {
            let child = node.child(&format!("G{}", g.ordinal));
            out.link(node, bf::HAS_SUB_GROUP, &child);
            g.write_graph(&child, out);
        }
        for item in &self.items {
            let child = node.child(&format!("I{}", item.ordinal));
            out.link(node, bf::HAS_ITEM, &child);
            item.write_graph(&child, out);
        }
    }

    fn read_graph(node: &ItemUri, graph: &SubjectGraph) -> Result<Self> {
        let mut groups = graph
            .links(node, bf::HAS_SUB_GROUP)
            .iter()
            .map(|g| Group::read_graph(g, graph))
            .collect::<Result<Vec<_>>>()?;
        groups.sort_by_key(|g| g.ordinal);
        let mut items = graph
            .links(node, bf::HAS_ITEM)
            .iter()
            .map(|i| FormItem::read_graph(i, graph))
            .collect::<Result<Vec<_>>>()?;
        items.sort_by_key(|i| i.ordinal);
        Ok(Group {
            label: graph.string(node, rdfs::LABEL),
            ordinal: ordinal_of(graph.integer(node, bf::ORDINAL)),
            completion: graph.string(node, bf::COMPLETION),
            note: graph.string(node, bf::NOTE),
            optional: graph.boolean(node, bf::OPTIONAL),
            repeating: graph.boolean(node, bf::REPEATING),
            groups,
            items,
        })
    }

    fn collect_refs<'a>(&'a self, out: &mut Vec<&'a OperationalReference>) {
        for g in &self.groups {
            g.collect_refs(out);
        }
        for item in &self.items {
            if let ItemContent::Question { tc_refs, .. } = &item.content {
                out.extend(tc_refs.iter());
            }
        }
    }

    fn collect_refs_mut<'a>(&'a mut self, out: &mut Vec<&'a mut OperationalReference>) {
        for g in &mut self.groups {
            g.collect_refs_mut(out);
        }
        for item in &mut self.items {
            if let ItemContent::Question { tc_refs, .. } = &mut item.content {
                out.extend(tc_refs.iter_mut());
            }
        }
    }

    fn collect_annotations(&self, node: &ItemUri, config: &MdrConfig, out: &mut Vec<Annotation>) {
        for g in &self.groups {
            g.collect_annotations(&node.child(&format!("G{}", g.ordinal)), config, out);
        }
        for item in &self.items {
            if let ItemContent::Question { mapping, .. } = &item.content {
                let Some(prefix) = mapping.get(..2).map(str::to_string) else {
                    continue;
                };
                out.push(Annotation {
                    item: node.child(&format!("I{}", item.ordinal)),
                    domain_long_name: config.domain_name(&prefix).unwrap_or_default().to_string(),
                    domain_prefix: prefix,
                    sdtm_variable: mapping.clone(),
                });
            }
        }
    }
}

impl FormItem {
    fn validate(&self, errors: &mut ValidationErrors) {
        validation::valid_label("label", &self.label, errors);
        validation::valid_markdown("completion", &self.completion, errors);
        validation::valid_markdown("note", &self.note, errors);
        match &self.content {
            ItemContent::Question {
                question_text,
                datatype,
                format,
                mapping,
                tc_refs,
            } => {
                validation::valid_markdown("question_text", question_text, errors);
                validation::valid_label("format", format, errors);
                validation::valid_mapping("mapping", mapping, errors);
                if !datatype.is_empty() && !QUESTION_DATATYPES.contains(&datatype.as_str()) {
                    errors.add("datatype", format!("'{}' is not a recognised data type", datatype));
                }
                validation::valid_ordinals(
                    "terminology_ordinal",
                    tc_refs.iter().map(|r| r.ordinal),
                    errors,
                );
            }
            ItemContent::Placeholder { free_text } => {
                validation::valid_markdown("free_text", free_text, errors);
            }
            ItemContent::TextLabel { label_text } => {
                validation::valid_markdown("label_text", label_text, errors);
            }
        }
    }

    fn write_graph(&self, node: &ItemUri, out: &mut GraphWriter) {
        let rdf_type = match &self.content {
            ItemContent::Question { .. } => bf::QUESTION,
            ItemContent::Placeholder { .. } => bf::PLACEHOLDER,
            ItemContent::TextLabel { .. } => bf::TEXT_LABEL,
        };
        out.node(node, rdf_type);
        out.string(node, rdfs::LABEL, &self.label);
        out.integer(node, bf::ORDINAL, i64::from(self.ordinal));
        out.boolean(node, bf::OPTIONAL, self.optional);
        out.string(node, bf::COMPLETION, &self.completion);
        out.string(node, bf::NOTE, &self.note);
        match &self.content {
            ItemContent::Question {
                question_text,
                datatype,
                format,
                mapping,
                tc_refs,
            } => {
                out.string(node, bf::QUESTION_TEXT, question_text);
                out.string(node, bf::DATATYPE, datatype);
                out.string(node, bf::FORMAT, format);
                out.string(node, bf::MAPPING, mapping);
                for r in tc_refs {
                    let ref_node = node.child(&format!("TC{}", r.ordinal));
                    out.link(node, bf::HAS_THESAURUS_CONCEPT, &ref_node);
                    r.write_graph(&ref_node, bo::TC_REFERENCE, bo::HAS_THESAURUS_CONCEPT, out);
                }
            }
            ItemContent::Placeholder { free_text } => {
                out.string(node, bf::FREE_TEXT, free_text);
            }
            ItemContent::TextLabel { label_text } => {
                out.string(node, bf::LABEL_TEXT, label_text);
            }
        }
    }

    fn read_graph(node: &ItemUri, graph: &SubjectGraph) -> Result<Self> {
        let content = match graph.rdf_type(node).map(|t| t.as_str()) {
            Some(bf::QUESTION) => {
                let mut tc_refs: Vec<OperationalReference> = graph
                    .links(node, bf::HAS_THESAURUS_CONCEPT)
                    .iter()
                    .filter_map(|r| {
                        OperationalReference::read_graph(r, bo::HAS_THESAURUS_CONCEPT, graph)
                    })
                    .collect();
                tc_refs.sort_by_key(|r| r.ordinal);
                ItemContent::Question {
                    question_text: graph.string(node, bf::QUESTION_TEXT),
                    datatype: graph.string(node, bf::DATATYPE),
                    format: graph.string(node, bf::FORMAT),
                    mapping: graph.string(node, bf::MAPPING),
                    tc_refs,
                }
            }
            Some(bf::PLACEHOLDER) => ItemContent::Placeholder {
                free_text: graph.string(node, bf::FREE_TEXT),
            },
            Some(bf::TEXT_LABEL) => ItemContent::TextLabel {
                label_text: graph.string(node, bf::LABEL_TEXT),
            },
            other => {
                return Err(MdrError::MalformedGraph {
                    subject: node.to_string(),
                    reason: format!("unknown form item type {:?}", other),
                })
            }
        };
        Ok(FormItem {
            label: graph.string(node, rdfs::LABEL),
            ordinal: ordinal_of(graph.integer(node, bf::ORDINAL)),
            optional: graph.boolean(node, bf::OPTIONAL),
            completion: graph.string(node, bf::COMPLETION),
            note: graph.string(node, bf::NOTE),
            content,
        })
    }
}

impl Payload for Form {
    const KIND: ItemKind = ItemKind {
        name: "Form",
        cid_prefix: "F",
        instance_path: "MDRForms",
        rdf_type: bf::FORM,
    };

    fn validate(&self, errors: &mut ValidationErrors) {
        validation::valid_markdown("completion", &self.completion, errors);
        validation::valid_markdown("note", &self.note, errors);
        validation::valid_ordinals("group_ordinal", self.groups.iter().map(|g| g.ordinal), errors);
        for g in &self.groups {
            let mut child = ValidationErrors::new();
            g.validate(&mut child);
            errors.merge_prefixed("base", &format!("Group, ordinal={}", g.ordinal), child);
        }
    }

    fn write_graph(&self, subject: &ItemUri, out: &mut GraphWriter) {
        out.string(subject, bf::COMPLETION, &self.completion);
        out.string(subject, bf::NOTE, &self.note);
        for g in &self.groups {
            let node = subject.child(&format!("G{}", g.ordinal));
            out.link(subject, bf::HAS_GROUP, &node);
            g.write_graph(&node, out);
        }
    }

    fn read_graph(subject: &ItemUri, graph: &SubjectGraph) -> Result<Self> {
        let mut groups = graph
            .links(subject, bf::HAS_GROUP)
            .iter()
            .map(|g| Group::read_graph(g, graph))
            .collect::<Result<Vec<_>>>()?;
        groups.sort_by_key(|g| g.ordinal);
        Ok(Form {
            completion: graph.string(subject, bf::COMPLETION),
            note: graph.string(subject, bf::NOTE),
            groups,
        })
    }

    fn terminology_refs(&self) -> Vec<&OperationalReference> {
        let mut out = Vec::new();
        for g in &self.groups {
            g.collect_refs(&mut out);
        }
        out
    }

    fn terminology_refs_mut(&mut self) -> Vec<&mut OperationalReference> {
        let mut out = Vec::new();
        for g in &mut self.groups {
            g.collect_refs_mut(&mut out);
        }
        out
    }
}

impl ManagedItem<Form> {
    /// SDTM annotations of mapped questions in group/item ordinal order
    pub fn annotations(&self, config: &MdrConfig) -> Vec<Annotation> {
        let mut payload = self.payload.clone();
        payload.normalize();
        let mut out = Vec::new();
        for g in &payload.groups {
            g.collect_annotations(&self.uri.child(&format!("G{}", g.ordinal)), config, &mut out);
        }
        out
    }
}
