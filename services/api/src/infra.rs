use async_trait::async_trait;
use metrics_exporter_prometheus::PrometheusHandle;
use rti_core::config::PipelineConfig;
use rti_core::error::AppError;
use rti_core::pipeline::rules::validate_rule_set;
use rti_core::pipeline::{
    Department, DepartmentStore, DraftService, Lexicon, Rule, RuleStore, StoreError,
    StoredTemplate, TemplateStore,
};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

pub(crate) type ApiService =
    DraftService<InMemoryDepartmentStore, InMemoryRuleStore, InMemoryTemplateStore>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryDepartmentStore {
    departments: Arc<Mutex<Vec<Department>>>,
}

impl InMemoryDepartmentStore {
    pub(crate) fn new(departments: Vec<Department>) -> Self {
        Self {
            departments: Arc::new(Mutex::new(departments)),
        }
    }
}

#[async_trait]
impl DepartmentStore for InMemoryDepartmentStore {
    async fn find_active_departments(&self) -> Result<Vec<Department>, StoreError> {
        let guard = self.departments.lock().expect("department mutex poisoned");
        Ok(guard.clone())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryRuleStore {
    rules: Arc<Mutex<Vec<Rule>>>,
}

impl InMemoryRuleStore {
    /// Rejects the whole set when any rule is malformed or names collide.
    pub(crate) fn new(rules: Vec<Rule>) -> Result<Self, AppError> {
        validate_rule_set(&rules)?;
        Ok(Self {
            rules: Arc::new(Mutex::new(rules)),
        })
    }
}

#[async_trait]
impl RuleStore for InMemoryRuleStore {
    async fn find_active_rules_by_priority_desc(&self) -> Result<Vec<Rule>, StoreError> {
        let guard = self.rules.lock().expect("rule mutex poisoned");
        let mut active: Vec<Rule> = guard.iter().filter(|rule| rule.is_active).cloned().collect();
        active.sort_by(|a, b| b.priority.cmp(&a.priority));
        Ok(active)
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryTemplateStore {
    templates: Arc<Mutex<HashMap<String, StoredTemplate>>>,
}

impl InMemoryTemplateStore {
    pub(crate) fn new(templates: Vec<StoredTemplate>) -> Self {
        let by_id = templates
            .into_iter()
            .map(|template| (template.id.clone(), template))
            .collect();
        Self {
            templates: Arc::new(Mutex::new(by_id)),
        }
    }
}

#[async_trait]
impl TemplateStore for InMemoryTemplateStore {
    async fn find_template(&self, id: &str) -> Result<Option<StoredTemplate>, StoreError> {
        let guard = self.templates.lock().expect("template mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

fn read_seed<T: DeserializeOwned>(path: Option<&Path>) -> Result<Vec<T>, AppError> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };
    let raw = std::fs::read_to_string(path)?;
    let records: Vec<T> = serde_json::from_str(&raw)?;
    info!(path = %path.display(), records = records.len(), "seed data loaded");
    Ok(records)
}

/// Wires the pipeline against in-memory stores seeded from the configured JSON files.
pub(crate) fn build_service(config: &PipelineConfig) -> Result<Arc<ApiService>, AppError> {
    let lexicon = match config.lexicon_path.as_deref() {
        Some(path) => Lexicon::from_path(path)?,
        None => Lexicon::builtin(),
    };

    let departments = read_seed(config.departments_path.as_deref())?;
    let rules = read_seed(config.rules_path.as_deref())?;
    let templates = read_seed(config.templates_path.as_deref())?;

    Ok(Arc::new(DraftService::new(
        Arc::new(lexicon),
        Arc::new(InMemoryDepartmentStore::new(departments)),
        Arc::new(InMemoryRuleStore::new(rules)?),
        Arc::new(InMemoryTemplateStore::new(templates)),
        config.settings(),
    )))
}
