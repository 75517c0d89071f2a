//! Terminology versions and the reference-upgrade plan
//!
//! Payload references point at thesaurus concepts. A concept lives in the
//! namespace of its thesaurus version, so moving a reference to a newer
//! thesaurus keeps the concept id and swaps the namespace.

use crate::model::{ChainKey, ItemUri, OperationalReference};
use crate::ops::StoreResult;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Header of one thesaurus version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThesaurusVersion {
    pub uri: ItemUri,
    pub identifier: String,
    pub scope_id: String,
    pub version: u32,
    /// Flagged as the version in use
    pub current: bool,
}

impl ThesaurusVersion {
    pub fn namespace(&self) -> &str {
        &self.uri.namespace
    }

    pub fn chain_key(&self) -> ChainKey {
        ChainKey::new(&self.scope_id, &self.identifier)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermConcept {
    pub uri: Option<ItemUri>,
    pub identifier: String,
    pub notation: String,
    pub preferred_term: String,
    pub synonym: String,
    pub definition: String,
    pub label: String,
}

impl TermConcept {
    /// Names of the fields whose content differs from `other`
    pub fn differs(&self, other: &TermConcept) -> Vec<&'static str> {
        let pairs = [
            ("identifier", &self.identifier, &other.identifier),
            ("notation", &self.notation, &other.notation),
            ("preferred_term", &self.preferred_term, &other.preferred_term),
            ("synonym", &self.synonym, &other.synonym),
            ("definition", &self.definition, &other.definition),
            ("label", &self.label, &other.label),
        ];
        pairs
            .into_iter()
            .filter(|(_, a, b)| a != b)
            .map(|(name, _, _)| name)
            .collect()
    }
}

pub trait TerminologySource: Send + Sync {
    fn thesauri(&self) -> StoreResult<Vec<ThesaurusVersion>>;
    fn concept(&self, uri: &ItemUri) -> StoreResult<Option<TermConcept>>;
}

/// Where references into one thesaurus namespace should point
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermMapEntry {
    pub update: bool,
    pub namespace: String,
}

/// Thesaurus namespace to upgrade target
pub type TermMap = BTreeMap<String, TermMapEntry>;

/// Map every known thesaurus version to the current one of its chain
///
/// Chains without a current version map onto themselves.
pub fn build_term_map(thesauri: &[ThesaurusVersion]) -> TermMap {
    let current: BTreeMap<ChainKey, &ThesaurusVersion> = thesauri
        .iter()
        .filter(|t| t.current)
        .map(|t| (t.chain_key(), t))
        .collect();

    thesauri
        .iter()
        .map(|t| {
            let entry = match current.get(&t.chain_key()) {
                Some(c) if c.namespace() != t.namespace() => TermMapEntry {
                    update: true,
                    namespace: c.namespace().to_string(),
                },
                _ => TermMapEntry {
                    update: false,
                    namespace: t.namespace().to_string(),
                },
            };
            (t.namespace().to_string(), entry)
        })
        .collect()
}

/// Reason one reference cannot be moved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeConflict {
    pub reference: ItemUri,
    pub replacement: ItemUri,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpgradePlan {
    NothingToDo,
    Conflicts(Vec<UpgradeConflict>),
    /// Old target to new target
    Repoint(BTreeMap<ItemUri, ItemUri>),
}

/// Decide whether `refs` can all move to current thesauri
///
/// All-or-nothing: any missing or changed concept turns the whole plan
/// into `Conflicts`.
pub fn plan_upgrade(
    refs: &[&OperationalReference],
    map: &TermMap,
    source: &dyn TerminologySource,
) -> StoreResult<UpgradePlan> {
    let targets: BTreeSet<&ItemUri> = refs.iter().map(|r| &r.target).collect();
    let mut repoint = BTreeMap::new();
    let mut conflicts = Vec::new();

    for target in targets {
        let Some(entry) = map.get(&target.namespace).filter(|e| e.update) else {
            continue;
        };
        let replacement = ItemUri::new(&entry.namespace, &target.id);
        let old = source.concept(target)?;
        let new = source.concept(&replacement)?;
        match (old, new) {
            (Some(old), Some(new)) => {
                let changed = old.differs(&new);
                if changed.is_empty() {
                    repoint.insert(target.clone(), replacement);
                } else {
                    conflicts.push(UpgradeConflict {
                        reference: target.clone(),
                        replacement,
                        reason: format!("changed: {}", changed.join(", ")),
                    });
                }
            }
            (None, _) => conflicts.push(UpgradeConflict {
                reference: target.clone(),
                replacement,
                reason: "referenced concept not found".to_string(),
            }),
            (_, None) => conflicts.push(UpgradeConflict {
                reference: target.clone(),
                replacement,
                reason: "no matching concept in current thesaurus".to_string(),
            }),
        }
    }

    Ok(if !conflicts.is_empty() {
        UpgradePlan::Conflicts(conflicts)
    } else if repoint.is_empty() {
        UpgradePlan::NothingToDo
    } else {
        UpgradePlan::Repoint(repoint)
    })
}

/// Apply a repoint map to references in place; returns how many moved
pub fn apply_repoint(
    refs: Vec<&mut OperationalReference>,
    repoint: &BTreeMap<ItemUri, ItemUri>,
) -> usize {
    let mut moved = 0;
    for r in refs {
        if let Some(next) = repoint.get(&r.target) {
            r.target = next.clone();
            moved += 1;
        }
    }
    moved
}

/// In-memory terminology, mainly for tests
#[derive(Debug, Default, Clone)]
pub struct StaticTerminology {
    thesauri: Vec<ThesaurusVersion>,
    concepts: BTreeMap<ItemUri, TermConcept>,
}

impl StaticTerminology {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_thesaurus(mut self, thesaurus: ThesaurusVersion) -> Self {
        self.thesauri.push(thesaurus);
        self
    }

    pub fn with_concept(mut self, uri: ItemUri, concept: TermConcept) -> Self {
        self.concepts.insert(uri, concept);
        self
    }
}

impl TerminologySource for StaticTerminology {
    fn thesauri(&self) -> StoreResult<Vec<ThesaurusVersion>> {
        Ok(self.thesauri.clone())
    }

    fn concept(&self, uri: &ItemUri) -> StoreResult<Option<TermConcept>> {
        Ok(self.concepts.get(uri).cloned())
    }
}
