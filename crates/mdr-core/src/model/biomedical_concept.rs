//! Biomedical concept payloads: templates and the instances built from them

use crate::config::MdrConfig;
use crate::errors::{MdrError, Result};
use crate::graph::vocab::{bo, cbc};
use crate::graph::{GraphWriter, SubjectGraph};
use crate::model::form::QUESTION_DATATYPES;
use crate::model::identifier::{ItemKind, ItemUri};
use crate::model::managed_item::{ManagedItem, Payload};
use crate::model::reference::{ordinal_of, OperationalReference};
use crate::rules::validation::{self, ValidationErrors};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One data point of a concept
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Property {
    pub alias: String,
    pub ordinal: u32,
    #[serde(default)]
    pub question_text: String,
    #[serde(default)]
    pub prompt_text: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub collect: bool,
    #[serde(default)]
    pub format: String,
    #[serde(default)]
    pub simple_datatype: String,
    #[serde(default)]
    pub bridg_path: String,
    #[serde(default)]
    pub tc_refs: Vec<OperationalReference>,
}

impl Property {
    fn validate(&self, errors: &mut ValidationErrors) {
        validation::valid_label("alias", &self.alias, errors);
        validation::valid_markdown("question_text", &self.question_text, errors);
        validation::valid_markdown("prompt_text", &self.prompt_text, errors);
        validation::valid_label("format", &self.format, errors);
        validation::valid_label("bridg_path", &self.bridg_path, errors);
        if !self.simple_datatype.is_empty()
            && !QUESTION_DATATYPES.contains(&self.simple_datatype.as_str())
        {
            errors.add(
                "simple_datatype",
                format!("'{}' is not a recognised data type", self.simple_datatype),
            );
        }
        validation::valid_ordinals(
            "terminology_ordinal",
            self.tc_refs.iter().map(|r| r.ordinal),
            errors,
        );
    }

    fn write_graph(&self, node: &ItemUri, out: &mut GraphWriter) {
        out.node(node, cbc::PROPERTY);
        out.string(node, cbc::ALIAS, &self.alias);
        out.integer(node, cbc::ORDINAL, i64::from(self.ordinal));
        out.string(node, cbc::QUESTION_TEXT, &self.question_text);
        out.string(node, cbc::PROMPT_TEXT, &self.prompt_text);
        out.boolean(node, cbc::ENABLED, self.enabled);
        out.boolean(node, cbc::COLLECT, self.collect);
        out.string(node, cbc::FORMAT, &self.format);
        out.string(node, cbc::SIMPLE_DATATYPE, &self.simple_datatype);
        out.string(node, cbc::BRIDG_PATH, &self.bridg_path);
        for r in &self.tc_refs {
            let ref_node = node.child(&format!("TC{}", r.ordinal));
            out.link(node, cbc::HAS_THESAURUS_CONCEPT, &ref_node);
            r.write_graph(&ref_node, bo::TC_REFERENCE, bo::HAS_THESAURUS_CONCEPT, out);
        }
    }

    fn read_graph(node: &ItemUri, graph: &SubjectGraph) -> Self {
        let mut tc_refs: Vec<OperationalReference> = graph
            .links(node, cbc::HAS_THESAURUS_CONCEPT)
            .iter()
            .filter_map(|r| OperationalReference::read_graph(r, bo::HAS_THESAURUS_CONCEPT, graph))
            .collect();
        tc_refs.sort_by_key(|r| r.ordinal);
        Property {
            alias: graph.string(node, cbc::ALIAS),
            ordinal: ordinal_of(graph.integer(node, cbc::ORDINAL)),
            question_text: graph.string(node, cbc::QUESTION_TEXT),
            prompt_text: graph.string(node, cbc::PROMPT_TEXT),
            enabled: graph.boolean(node, cbc::ENABLED),
            collect: graph.boolean(node, cbc::COLLECT),
            format: graph.string(node, cbc::FORMAT),
            simple_datatype: graph.string(node, cbc::SIMPLE_DATATYPE),
            bridg_path: graph.string(node, cbc::BRIDG_PATH),
            tc_refs,
        }
    }
}

fn validate_properties(properties: &[Property], errors: &mut ValidationErrors) {
    validation::valid_ordinals(
        "property_ordinal",
        properties.iter().map(|p| p.ordinal),
        errors,
    );
    for p in properties {
        let mut child = ValidationErrors::new();
        p.validate(&mut child);
        errors.merge_prefixed("base", &format!("Property, ordinal={}", p.ordinal), child);
    }
}

fn write_properties(properties: &[Property], subject: &ItemUri, out: &mut GraphWriter) {
    for p in properties {
        let node = subject.child(&format!("P{}", p.ordinal));
        out.link(subject, cbc::HAS_PROPERTY, &node);
        p.write_graph(&node, out);
    }
}

fn read_properties(subject: &ItemUri, graph: &SubjectGraph) -> Vec<Property> {
    let mut properties: Vec<Property> = graph
        .links(subject, cbc::HAS_PROPERTY)
        .iter()
        .map(|p| Property::read_graph(p, graph))
        .collect();
    properties.sort_by_key(|p| p.ordinal);
    properties
}

/// Reusable property layout that concept instances are created from
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BiomedicalConceptTemplate {
    #[serde(default)]
    pub properties: Vec<Property>,
}

impl Payload for BiomedicalConceptTemplate {
    const KIND: ItemKind = ItemKind {
        name: "Biomedical Concept Template",
        cid_prefix: "BCT",
        instance_path: "MDRBCTs",
        rdf_type: cbc::BC_TEMPLATE,
    };

    fn validate(&self, errors: &mut ValidationErrors) {
        validate_properties(&self.properties, errors);
    }

    fn write_graph(&self, subject: &ItemUri, out: &mut GraphWriter) {
        write_properties(&self.properties, subject, out);
    }

    fn read_graph(subject: &ItemUri, graph: &SubjectGraph) -> Result<Self> {
        Ok(Self {
            properties: read_properties(subject, graph),
        })
    }

    fn terminology_refs(&self) -> Vec<&OperationalReference> {
        self.properties.iter().flat_map(|p| p.tc_refs.iter()).collect()
    }

    fn terminology_refs_mut(&mut self) -> Vec<&mut OperationalReference> {
        self.properties
            .iter_mut()
            .flat_map(|p| p.tc_refs.iter_mut())
            .collect()
    }
}

/// Concept instance, based on a template
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BiomedicalConcept {
    #[serde(default)]
    pub template_ref: Option<OperationalReference>,
    #[serde(default)]
    pub properties: Vec<Property>,
}

impl BiomedicalConcept {
    /// Properties in ordinal order
    pub fn properties(&self) -> Vec<&Property> {
        let mut props: Vec<&Property> = self.properties.iter().collect();
        props.sort_by_key(|p| p.ordinal);
        props
    }

    /// Distinct terminology targets referenced by any property
    pub fn unique_references(&self) -> Vec<ItemUri> {
        self.properties
            .iter()
            .flat_map(|p| p.tc_refs.iter().map(|r| r.target.clone()))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// New first-version instance copying the template's properties
    pub fn from_template(
        config: &MdrConfig,
        template: Option<&ManagedItem<BiomedicalConceptTemplate>>,
        identifier: &str,
        label: &str,
    ) -> Result<ManagedItem<BiomedicalConcept>> {
        let template = template.ok_or(MdrError::TemplateMissing)?;
        let payload = BiomedicalConcept {
            template_ref: Some(OperationalReference::new(template.uri.clone(), 1)),
            properties: template.payload.properties.clone(),
        };
        Ok(ManagedItem::new(config, identifier, label, payload))
    }
}

impl Payload for BiomedicalConcept {
    const KIND: ItemKind = ItemKind {
        name: "Biomedical Concept",
        cid_prefix: "BC",
        instance_path: "MDRBCs",
        rdf_type: cbc::BC_INSTANCE,
    };

    fn validate(&self, errors: &mut ValidationErrors) {
        validate_properties(&self.properties, errors);
    }

    fn write_graph(&self, subject: &ItemUri, out: &mut GraphWriter) {
        if let Some(template) = &self.template_ref {
            let node = subject.child("TPR");
            out.link(subject, cbc::BASED_ON_TEMPLATE, &node);
            template.write_graph(&node, bo::BCT_REFERENCE, bo::HAS_TEMPLATE, out);
        }
        write_properties(&self.properties, subject, out);
    }

    fn read_graph(subject: &ItemUri, graph: &SubjectGraph) -> Result<Self> {
        let template_ref = graph
            .link(subject, cbc::BASED_ON_TEMPLATE)
            .and_then(|node| OperationalReference::read_graph(&node, bo::HAS_TEMPLATE, graph));
        Ok(Self {
            template_ref,
            properties: read_properties(subject, graph),
        })
    }

    fn terminology_refs(&self) -> Vec<&OperationalReference> {
        self.properties.iter().flat_map(|p| p.tc_refs.iter()).collect()
    }

    fn terminology_refs_mut(&mut self) -> Vec<&mut OperationalReference> {
        self.properties
            .iter_mut()
            .flat_map(|p| p.tc_refs.iter_mut())
            .collect()
    }
}
