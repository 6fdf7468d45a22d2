//! Vocabulary consumed by the intent detector and question generator.
//!
//! The lexicon is plain configuration data: stop words, department keyword tables,
//! category keyword lists, and per-language question templates. It is loaded once
//! (from JSON or the built-in table) and shared read-only.

mod builtin;

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Topical bucket used to select question templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Budget,
    Contractor,
    Timeline,
    Documents,
    Personnel,
    General,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Budget,
        Category::Contractor,
        Category::Timeline,
        Category::Documents,
        Category::Personnel,
        Category::General,
    ];

    pub const fn id(self) -> &'static str {
        match self {
            Category::Budget => "budget",
            Category::Contractor => "contractor",
            Category::Timeline => "timeline",
            Category::Documents => "documents",
            Category::Personnel => "personnel",
            Category::General => "general",
        }
    }

    /// Financial intents raise the risk level during scoring.
    pub const fn is_financial(self) -> bool {
        matches!(self, Category::Budget | Category::Contractor)
    }

    pub const fn is_procedural(self) -> bool {
        matches!(self, Category::Timeline | Category::Personnel)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Category::ALL
            .into_iter()
            .find(|category| category.id() == normalized)
            .ok_or_else(|| UnknownCategory(value.to_string()))
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown question category '{0}'")]
pub struct UnknownCategory(pub String);

/// Language tag substituted into defaults and template lookups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Language {
    #[default]
    English,
    Hindi,
}

impl Language {
    pub const fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Hindi => "hi",
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hindi => "Hindi",
        }
    }
}

impl From<String> for Language {
    fn from(value: String) -> Self {
        Language::from(value.as_str())
    }
}

impl From<&str> for Language {
    /// Unrecognized tags resolve to English.
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "hi" | "hindi" => Language::Hindi,
            _ => Language::English,
        }
    }
}

impl From<Language> for String {
    fn from(value: Language) -> Self {
        value.code().to_string()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Department candidate for intent matching. Keywords are compared case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Keyword list attached to a question category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryKeywords {
    pub id: Category,
    pub name: String,
    pub keywords: Vec<String>,
}

/// Fallback questions used when no keywords could be extracted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefaultQuestionSet {
    /// Substituted for `{department}` when the intent carries no department.
    pub department_placeholder: String,
    pub questions: Vec<String>,
}

pub type TemplateTable = BTreeMap<Category, Vec<String>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Lexicon {
    pub stop_words: HashSet<String>,
    pub departments: Vec<Department>,
    pub categories: Vec<CategoryKeywords>,
    pub templates: BTreeMap<Language, TemplateTable>,
    pub default_questions: BTreeMap<Language, DefaultQuestionSet>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Lexicon {
    pub fn builtin() -> Self {
        Self {
            stop_words: builtin::STOP_WORDS
                .iter()
                .map(|word| word.to_string())
                .collect(),
            departments: builtin::departments(),
            categories: builtin::categories(),
            templates: builtin::templates(),
            default_questions: builtin::default_questions(),
        }
    }

    /// Load a lexicon from JSON. Missing sections fall back to the built-in vocabulary.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LexiconError> {
        let mut lexicon: Lexicon = serde_json::from_reader(reader)?;
        lexicon.stop_words = lexicon
            .stop_words
            .into_iter()
            .map(|word| word.trim().to_lowercase())
            .collect();
        lexicon.validate()?;
        Ok(lexicon)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, LexiconError> {
        let file = File::open(path.as_ref()).map_err(|source| LexiconError::Io {
            path: path.as_ref().display().to_string(),
            source,
        })?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn is_stop_word(&self, token: &str) -> bool {
        self.stop_words.contains(token)
    }

    /// Templates for `category` in `language`, falling back to the English list.
    pub fn templates_for(&self, language: Language, category: Category) -> &[String] {
        localized_templates(&self.templates, language, category)
    }

    pub fn default_questions_for(&self, language: Language) -> Option<&DefaultQuestionSet> {
        self.default_questions
            .get(&language)
            .or_else(|| self.default_questions.get(&Language::English))
    }

    fn validate(&self) -> Result<(), LexiconError> {
        if let Some(department) = self
            .departments
            .iter()
            .find(|department| department.name.trim().is_empty())
        {
            return Err(LexiconError::Invalid(format!(
                "department with keywords {:?} has no name",
                department.keywords
            )));
        }

        let has_general = self
            .templates
            .get(&Language::English)
            .and_then(|table| table.get(&Category::General))
            .map(|templates| !templates.is_empty())
            .unwrap_or(false);
        if !has_general {
            return Err(LexiconError::Invalid(
                "english templates must include the general category".to_string(),
            ));
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LexiconError {
    #[error("failed to read lexicon file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid lexicon json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid lexicon: {0}")]
    Invalid(String),
}

/// Per-language lookup shared by the lexicon and the runtime library. An absent or
/// empty list in `language` borrows the English list for the same category.
pub(crate) fn localized_templates(
    templates: &BTreeMap<Language, TemplateTable>,
    language: Language,
    category: Category,
) -> &[String] {
    templates
        .get(&language)
        .and_then(|table| table.get(&category))
        .filter(|list| !list.is_empty())
        .or_else(|| {
            templates
                .get(&Language::English)
                .and_then(|table| table.get(&category))
        })
        .map(Vec::as_slice)
        .unwrap_or(&[])
}
