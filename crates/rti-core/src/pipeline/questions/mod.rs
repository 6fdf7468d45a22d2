//! Question generation: category inference and template-based question synthesis.

mod graph;
mod library;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::intent::{Intent, KeywordSet};
use super::lexicon::{Category, CategoryKeywords, Language, Lexicon};

pub use graph::{GraphEdge, GraphNode, GraphNodeData, GraphNodeKind, KnowledgeGraph};
pub use library::QuestionLibrary;

pub const DEFAULT_MAX_QUESTIONS: usize = 5;
pub const DEFAULT_YEARS: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GenerationOptions {
    pub max_questions: usize,
    /// Overrides category inference entirely when non-empty.
    pub categories: Vec<Category>,
    pub language: Language,
    pub years: u32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            max_questions: DEFAULT_MAX_QUESTIONS,
            categories: Vec::new(),
            language: Language::English,
            years: DEFAULT_YEARS,
        }
    }
}

/// A synthesized question annotated for review in the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: usize,
    pub text: String,
    pub category: Category,
    pub explanation: String,
    pub selected: bool,
}

pub struct QuestionGenerator {
    lexicon: Arc<Lexicon>,
    library: QuestionLibrary,
}

impl QuestionGenerator {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        let library = QuestionLibrary::from_lexicon(&lexicon);
        Self { lexicon, library }
    }

    pub fn library(&self) -> &QuestionLibrary {
        &self.library
    }

    pub fn categories(&self) -> &[CategoryKeywords] {
        &self.lexicon.categories
    }

    pub fn add_question(&self, category: Category, template: impl Into<String>) -> usize {
        self.library.add_question(category, template)
    }

    pub fn knowledge_graph(&self) -> KnowledgeGraph {
        graph::build(&self.library)
    }

    /// Categories whose keyword lists overlap the keywords by substring in either direction,
    /// in first-discovered order. Falls back to `general`.
    pub fn infer_categories(&self, keywords: &KeywordSet) -> Vec<Category> {
        let mut inferred = Vec::new();
        for keyword in keywords.iter() {
            for category in &self.lexicon.categories {
                let relevant = category.keywords.iter().any(|candidate| {
                    keyword.contains(candidate.as_str()) || candidate.contains(keyword)
                });
                if relevant && !inferred.contains(&category.id) {
                    inferred.push(category.id);
                }
            }
        }

        if inferred.is_empty() {
            inferred.push(Category::General);
        }
        inferred
    }

    pub fn generate_questions(&self, intent: &Intent, options: &GenerationOptions) -> Vec<String> {
        let department = intent.department.as_deref();
        if intent.keywords.is_empty() {
            return self.default_questions(department, options);
        }

        let topic = intent.keywords.join(" ");
        let selected = if options.categories.is_empty() {
            self.infer_categories(&intent.keywords)
        } else {
            options.categories.clone()
        };

        let placeholders = Placeholders {
            topic: &topic,
            years: options.years,
            department: department
                .unwrap_or_else(|| self.department_placeholder(options.language)),
        };

        let snapshot = self.library.snapshot();
        let mut questions: Vec<String> = Vec::new();

        for category in selected {
            let mut templates = snapshot.templates_for(options.language, category);
            if templates.is_empty() {
                templates = snapshot.templates_for(options.language, Category::General);
            }
            push_filled(&mut questions, templates, &placeholders, options.max_questions);
        }

        // Single padding pass; stops even if the general list runs out below the cap.
        if questions.len() < options.max_questions {
            let general = snapshot.templates_for(options.language, Category::General);
            push_filled(&mut questions, general, &placeholders, options.max_questions);
        }

        questions
    }

    /// Generated questions with an id, a round-robin category label, and a rationale.
    pub fn suggestions_with_explanations(
        &self,
        intent: &Intent,
        options: &GenerationOptions,
    ) -> Vec<Question> {
        let questions = self.generate_questions(intent, options);
        let categories = self.infer_categories(&intent.keywords);
        let explanation = explanation_for(&intent.keywords);

        questions
            .into_iter()
            .enumerate()
            .map(|(index, text)| Question {
                id: index + 1,
                text,
                category: categories
                    .get(index % categories.len())
                    .copied()
                    .unwrap_or(Category::General),
                explanation: explanation.clone(),
                selected: true,
            })
            .collect()
    }

    fn default_questions(
        &self,
        department: Option<&str>,
        options: &GenerationOptions,
    ) -> Vec<String> {
        let Some(defaults) = self.lexicon.default_questions_for(options.language) else {
            return Vec::new();
        };
        let department = department.unwrap_or(&defaults.department_placeholder);

        defaults
            .questions
            .iter()
            .take(options.max_questions)
            .map(|template| template.replace("{department}", department))
            .collect()
    }

    fn department_placeholder(&self, language: Language) -> &str {
        self.lexicon
            .default_questions_for(language)
            .map(|defaults| defaults.department_placeholder.as_str())
            .unwrap_or("the department")
    }
}

struct Placeholders<'a> {
    topic: &'a str,
    years: u32,
    department: &'a str,
}

impl Placeholders<'_> {
    fn fill(&self, template: &str) -> String {
        template
            .replace("{topic}", self.topic)
            .replace("{years}", &self.years.to_string())
            .replace("{department}", self.department)
    }
}

fn push_filled(
    questions: &mut Vec<String>,
    templates: &[String],
    placeholders: &Placeholders<'_>,
    max_questions: usize,
) {
    for template in templates {
        if questions.len() >= max_questions {
            break;
        }
        let question = placeholders.fill(template);
        if !questions.contains(&question) {
            questions.push(question);
        }
    }
}

fn explanation_for(keywords: &KeywordSet) -> String {
    if keywords.is_empty() {
        return "This is a standard RTI question for comprehensive information.".to_string();
    }
    let triggers: Vec<&str> = keywords.iter().take(3).collect();
    format!(
        "Suggested because your issue relates to \"{}\".",
        triggers.join(", ")
    )
}
