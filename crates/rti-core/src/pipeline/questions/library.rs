use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard};

use crate::pipeline::lexicon::{localized_templates, Category, Language, Lexicon, TemplateTable};

/// Process-wide question templates. Readers hold the read guard for a whole generation
/// pass so they never observe a half-applied append.
#[derive(Debug)]
pub struct QuestionLibrary {
    templates: RwLock<BTreeMap<Language, TemplateTable>>,
}

impl QuestionLibrary {
    pub fn from_lexicon(lexicon: &Lexicon) -> Self {
        Self {
            templates: RwLock::new(lexicon.templates.clone()),
        }
    }

    pub(crate) fn snapshot(&self) -> TemplateSnapshot<'_> {
        TemplateSnapshot {
            guard: self
                .templates
                .read()
                .unwrap_or_else(PoisonError::into_inner),
        }
    }

    /// Append an English template to `category`; returns the category's new template count.
    pub fn add_question(&self, category: Category, template: impl Into<String>) -> usize {
        let mut guard = self
            .templates
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let list = guard
            .entry(Language::English)
            .or_default()
            .entry(category)
            .or_default();
        list.push(template.into());
        list.len()
    }

    /// Categories that currently have at least one English template.
    pub fn domains(&self) -> Vec<Category> {
        let snapshot = self.snapshot();
        let domains = Category::ALL
            .into_iter()
            .filter(|category| {
                !snapshot
                    .templates_for(Language::English, *category)
                    .is_empty()
            })
            .collect();
        domains
    }

    /// Templates for `domain`, else for the category named by `intent`, else all of them.
    pub fn templates(&self, domain: Option<Category>, intent: Option<&str>) -> Vec<String> {
        let snapshot = self.snapshot();

        if let Some(domain) = domain {
            let templates = snapshot.templates_for(Language::English, domain);
            if !templates.is_empty() {
                return templates.to_vec();
            }
        }

        if let Some(category) = intent.and_then(|intent| intent.parse::<Category>().ok()) {
            let templates = snapshot.templates_for(Language::English, category);
            if !templates.is_empty() {
                return templates.to_vec();
            }
        }

        let mut all: Vec<String> = Vec::new();
        for category in Category::ALL {
            for template in snapshot.templates_for(Language::English, category) {
                if !all.contains(template) {
                    all.push(template.clone());
                }
            }
        }
        all
    }
}

pub(crate) struct TemplateSnapshot<'a> {
    guard: RwLockReadGuard<'a, BTreeMap<Language, TemplateTable>>,
}

impl TemplateSnapshot<'_> {
    pub(crate) fn templates_for(&self, language: Language, category: Category) -> &[String] {
        localized_templates(&self.guard, language, category)
    }
}
