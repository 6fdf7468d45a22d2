//! Intent detection: keyword extraction, department inference, and confidence scoring.

mod keywords;
mod matching;

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::lexicon::{Department, Lexicon};
use super::repository::{bounded_lookup, DepartmentStore};

pub use keywords::{extract_keywords, KeywordSet};

/// Which department table answered the lookup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepartmentSource {
    Store,
    BuiltIn,
    #[default]
    None,
}

/// Inferred department and triggering keywords for a grievance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Intent {
    pub keywords: KeywordSet,
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department_id: Option<String>,
    pub confidence: u8,
    #[serde(default)]
    pub source: DepartmentSource,
}

impl Intent {
    pub fn empty() -> Self {
        Self::default()
    }

    /// A user-supplied department takes precedence over the inferred one.
    pub fn with_department_override(mut self, department: Option<&str>) -> Self {
        if let Some(name) = department.map(str::trim).filter(|name| !name.is_empty()) {
            self.department = Some(name.to_string());
            self.department_id = None;
        }
        self
    }
}

/// Pure two-tier inference over a snapshot of stored departments and the lexicon table.
pub fn resolve_intent(lexicon: &Lexicon, stored: &[Department], text: &str) -> Intent {
    let keywords = extract_keywords(lexicon, text);
    if keywords.is_empty() {
        return Intent::empty();
    }

    let resolved = matching::best_match(&keywords, stored)
        .map(|found| (found, DepartmentSource::Store))
        .or_else(|| {
            matching::best_match(&keywords, &lexicon.departments)
                .map(|found| (found, DepartmentSource::BuiltIn))
        });

    match resolved {
        Some((found, source)) => {
            let confidence = matching::confidence(&keywords, found.match_count);
            Intent {
                department: Some(found.department.name.clone()),
                department_id: found.department.id.clone(),
                confidence,
                source,
                keywords,
            }
        }
        None => Intent {
            keywords,
            ..Intent::empty()
        },
    }
}

/// Detects intents against the department store, falling back to the lexicon table.
pub struct IntentDetector<D> {
    lexicon: Arc<Lexicon>,
    store: Arc<D>,
    lookup_timeout: Duration,
}

impl<D> IntentDetector<D>
where
    D: DepartmentStore + 'static,
{
    pub fn new(lexicon: Arc<Lexicon>, store: Arc<D>, lookup_timeout: Duration) -> Self {
        Self {
            lexicon,
            store,
            lookup_timeout,
        }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Never fails: an unreachable store counts as an empty one.
    pub async fn detect(&self, text: &str) -> Intent {
        if extract_keywords(&self.lexicon, text).is_empty() {
            return Intent::empty();
        }

        let stored = self.stored_departments().await;
        let intent = resolve_intent(&self.lexicon, &stored, text);
        debug!(
            department = ?intent.department,
            confidence = intent.confidence,
            source = ?intent.source,
            keywords = intent.keywords.len(),
            "intent detected"
        );
        intent
    }

    /// Active departments from the store, or the built-in table when the store has none.
    pub async fn all_departments(&self) -> (DepartmentSource, Vec<Department>) {
        let stored = self.stored_departments().await;
        if stored.is_empty() {
            (DepartmentSource::BuiltIn, self.lexicon.departments.clone())
        } else {
            (DepartmentSource::Store, stored)
        }
    }

    async fn stored_departments(&self) -> Vec<Department> {
        let lookup = self.store.find_active_departments();
        match bounded_lookup(self.lookup_timeout, lookup).await {
            Ok(departments) => departments,
            Err(err) => {
                warn!(error = %err, "department store unavailable; using built-in table");
                Vec::new()
            }
        }
    }
}
