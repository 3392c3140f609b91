use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::UNRESOLVED_SENTINEL;
use crate::dictionary::DictionaryKind;

/// Database identifier of a dictionary record, or the lack of one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolvedId {
    #[default]
    Unresolved,
    Resolved(String),
}

impl ResolvedId {
    pub fn is_resolved(&self) -> bool {
        matches!(self, ResolvedId::Resolved(_))
    }

    /// Value written into the `code_kcr` column; the sentinel when unresolved.
    pub fn as_code(&self) -> &str {
        match self {
            ResolvedId::Unresolved => UNRESOLVED_SENTINEL,
            ResolvedId::Resolved(id) => id,
        }
    }
}

impl fmt::Display for ResolvedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

/// A criterion is identified by its name together with its negative-meaning text.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CriterionKey {
    pub name: String,
    pub negative_meaning: String,
}

impl CriterionKey {
    pub fn new(name: impl Into<String>, negative_meaning: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            negative_meaning: negative_meaning.into(),
        }
    }
}

/// Lookups collected from one reglament, waiting for dictionary resolution.
///
/// Both maps are ordered by key, which keeps the generated script stable
/// across runs over the same input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingLookups {
    pub rejections: BTreeMap<String, ResolvedId>,
    pub criteria: BTreeMap<CriterionKey, ResolvedId>,
}

impl PendingLookups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rejection reason. Returns `false` if it was already known.
    pub fn insert_rejection(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.rejections.contains_key(&name) {
            return false;
        }
        self.rejections.insert(name, ResolvedId::Unresolved);
        true
    }

    /// Register a criterion. Returns `false` if it was already known.
    pub fn insert_criterion(&mut self, key: CriterionKey) -> bool {
        if self.criteria.contains_key(&key) {
            return false;
        }
        self.criteria.insert(key, ResolvedId::Unresolved);
        true
    }

    pub fn is_empty(&self) -> bool {
        self.rejections.is_empty() && self.criteria.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rejections.len() + self.criteria.len()
    }

    /// Number of entries the given dictionary is responsible for.
    pub fn pending_for(&self, kind: DictionaryKind) -> usize {
        match kind {
            DictionaryKind::RejectReason => self.rejections.len(),
            DictionaryKind::ReasonForSuccessDecision => self.criteria.len(),
        }
    }

    pub fn resolved_count(&self) -> usize {
        self.rejections
            .values()
            .chain(self.criteria.values())
            .filter(|id| id.is_resolved())
            .count()
    }

    pub fn unresolved_count(&self) -> usize {
        self.len() - self.resolved_count()
    }
}
