use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::lexicon::Department;
use super::rules::Rule;

/// Source of active departments (database, config file, ...).
#[async_trait]
pub trait DepartmentStore: Send + Sync {
    async fn find_active_departments(&self) -> Result<Vec<Department>, StoreError>;
}

/// Source of active rules. Implementations must return rules ordered by descending
/// priority with a stable order for equal priorities.
#[async_trait]
pub trait RuleStore: Send + Sync {
    async fn find_active_rules_by_priority_desc(&self) -> Result<Vec<Rule>, StoreError>;
}

/// Lookup of persisted letter templates used when a rule overrides the default draft.
#[async_trait]
pub trait TemplateStore: Send + Sync {
    async fn find_template(&self, id: &str) -> Result<Option<StoredTemplate>, StoreError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredTemplate {
    pub id: String,
    pub name: String,
    pub content: String,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("store lookup timed out after {0} ms")]
    Timeout(u64),
}

/// Store with no records; lets the pipeline run on built-in tables alone.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyStore;

#[async_trait]
impl DepartmentStore for EmptyStore {
    async fn find_active_departments(&self) -> Result<Vec<Department>, StoreError> {
        Ok(Vec::new())
    }
}

#[async_trait]
impl RuleStore for EmptyStore {
    async fn find_active_rules_by_priority_desc(&self) -> Result<Vec<Rule>, StoreError> {
        Ok(Vec::new())
    }
}

#[async_trait]
impl TemplateStore for EmptyStore {
    async fn find_template(&self, _id: &str) -> Result<Option<StoredTemplate>, StoreError> {
        Ok(None)
    }
}

/// Run a store lookup with an upper bound on its duration.
pub(crate) async fn bounded_lookup<T, F>(limit: Duration, lookup: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    match tokio::time::timeout(limit, lookup).await {
        Ok(result) => result,
        Err(_) => Err(StoreError::Timeout(limit.as_millis() as u64)),
    }
}
