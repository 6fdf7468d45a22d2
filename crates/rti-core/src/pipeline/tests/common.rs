use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;

use crate::pipeline::draft::{DraftService, PipelineSettings};
use crate::pipeline::lexicon::{Department, Lexicon};
use crate::pipeline::repository::{
    DepartmentStore, RuleStore, StoreError, StoredTemplate, TemplateStore,
};
use crate::pipeline::rules::Rule;

pub(super) const TEST_TIMEOUT: Duration = Duration::from_millis(50);

pub(super) fn lexicon() -> Arc<Lexicon> {
    Arc::new(Lexicon::builtin())
}

pub(super) fn settings() -> PipelineSettings {
    PipelineSettings {
        store_timeout: TEST_TIMEOUT,
        ..PipelineSettings::default()
    }
}

pub(super) fn department(name: &str, keywords: &[&str]) -> Department {
    Department {
        id: Some(format!("dept-{}", name.to_lowercase())),
        name: name.to_string(),
        display_name: None,
        keywords: keywords.iter().map(|keyword| keyword.to_string()).collect(),
        description: None,
    }
}

pub(super) fn rule(definition: Value) -> Rule {
    let rule: Rule = serde_json::from_value(definition).expect("rule definition parses");
    rule.validate().expect("rule definition is valid");
    rule
}

#[derive(Default)]
pub(super) struct MemoryDepartments {
    pub(super) departments: Vec<Department>,
}

impl MemoryDepartments {
    pub(super) fn with(departments: Vec<Department>) -> Self {
        Self { departments }
    }
}

#[async_trait]
impl DepartmentStore for MemoryDepartments {
    async fn find_active_departments(&self) -> Result<Vec<Department>, StoreError> {
        Ok(self.departments.clone())
    }
}

#[derive(Default)]
pub(super) struct MemoryRules {
    pub(super) rules: Arc<Mutex<Vec<Rule>>>,
}

impl MemoryRules {
    pub(super) fn with(rules: Vec<Rule>) -> Self {
        Self {
            rules: Arc::new(Mutex::new(rules)),
        }
    }
}

#[async_trait]
impl RuleStore for MemoryRules {
    async fn find_active_rules_by_priority_desc(&self) -> Result<Vec<Rule>, StoreError> {
        let guard = self.rules.lock().expect("rules mutex poisoned");
        let mut active: Vec<Rule> = guard.iter().filter(|rule| rule.is_active).cloned().collect();
        active.sort_by(|a, b| b.priority.cmp(&a.priority));
        Ok(active)
    }
}

#[derive(Default)]
pub(super) struct MemoryTemplates {
    pub(super) templates: HashMap<String, StoredTemplate>,
}

impl MemoryTemplates {
    pub(super) fn with(id: &str, content: &str) -> Self {
        let template = StoredTemplate {
            id: id.to_string(),
            name: format!("{id} template"),
            content: content.to_string(),
            department: None,
            language: None,
        };
        Self {
            templates: HashMap::from([(id.to_string(), template)]),
        }
    }
}

#[async_trait]
impl TemplateStore for MemoryTemplates {
    async fn find_template(&self, id: &str) -> Result<Option<StoredTemplate>, StoreError> {
        Ok(self.templates.get(id).cloned())
    }
}

/// Every lookup fails.
pub(super) struct UnavailableStore;

#[async_trait]
impl DepartmentStore for UnavailableStore {
    async fn find_active_departments(&self) -> Result<Vec<Department>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }
}

#[async_trait]
impl RuleStore for UnavailableStore {
    async fn find_active_rules_by_priority_desc(&self) -> Result<Vec<Rule>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }
}

#[async_trait]
impl TemplateStore for UnavailableStore {
    async fn find_template(&self, _id: &str) -> Result<Option<StoredTemplate>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }
}

/// Answers correctly, but only after the pipeline's lookup bound has passed.
pub(super) struct SlowDepartments {
    pub(super) delay: Duration,
    pub(super) departments: Vec<Department>,
}

#[async_trait]
impl DepartmentStore for SlowDepartments {
    async fn find_active_departments(&self) -> Result<Vec<Department>, StoreError> {
        tokio::time::sleep(self.delay).await;
        Ok(self.departments.clone())
    }
}

pub(super) fn build_service<D, R, T>(
    departments: D,
    rules: R,
    templates: T,
) -> DraftService<D, R, T>
where
    D: DepartmentStore + 'static,
    R: RuleStore + 'static,
    T: TemplateStore + 'static,
{
    DraftService::new(
        lexicon(),
        Arc::new(departments),
        Arc::new(rules),
        Arc::new(templates),
        settings(),
    )
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
