//! Intelligence pipeline turning a free-text grievance into an RTI application.
//!
//! Components run leaf-first: the lexicon feeds the intent detector, whose output feeds
//! the question generator; both populate the context read by the rule engine; the draft
//! service renders the letter and scores it. Every component except the question library
//! is stateless between calls.

pub mod draft;
pub mod intent;
pub mod lexicon;
pub mod questions;
pub mod repository;
pub mod router;
pub mod rules;
pub mod scoring;

#[cfg(test)]
mod tests;

pub use draft::{
    DraftError, DraftRenderer, DraftRequest, DraftService, GeneratedDraft, PipelineSettings,
    RenderData, RenderError, TemplateMetadata,
};
pub use intent::{extract_keywords, resolve_intent, DepartmentSource, Intent, IntentDetector};
pub use lexicon::{Category, Department, Language, Lexicon, LexiconError};
pub use questions::{GenerationOptions, Question, QuestionGenerator, QuestionLibrary};
pub use repository::{
    DepartmentStore, EmptyStore, RuleStore, StoreError, StoredTemplate, TemplateStore,
};
pub use router::pipeline_router;
pub use rules::{
    evaluate_rules, Action, Rule, RuleDefinitionError, RuleEngine, RuleEvaluationResult,
};
pub use scoring::{
    analyze_draft, validate_draft, DraftAnalysis, DraftRecord, RiskLevel, ScoreResult,
};
