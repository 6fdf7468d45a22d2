//! Completeness and rejection-risk scoring for generated drafts.

mod validation;

use serde::{Deserialize, Serialize};

use super::lexicon::Category;
use super::rules::ScoreModifier;

pub use validation::{
    validate_draft, Completeness, DraftRecord, ValidationReport, ValidationStatus,
    ValidationSummary,
};

pub const MAX_SCORE: u8 = 100;

const ADD_QUESTION: &str = "Add at least one question to your application.";
const MORE_QUESTIONS: &str = "Adding more specific questions increases response probability.";
const TOO_MANY_QUESTIONS: &str = "Too many questions might lead to rejection under \
     \"disproportionate diversion of resources\".";
const ASK_FOR_CONTRACTS: &str =
    "Ask for \"copies of contracts\" or \"audit reports\" for better evidence.";
const ASK_FOR_OFFICERS: &str = "Ask for \"Name and Designation\" of responsible officers.";
const SPECIFY_DEPARTMENT: &str = "Specifying a department helps route the application correctly.";

/// Coarse rejection likelihood under RTI disclosure rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
}

/// Inputs to [`analyze_draft`]. `intent` is a category id such as `budget`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DraftAnalysis {
    pub questions: Vec<String>,
    pub department: Option<String>,
    pub intent: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    pub score: u8,
    pub risk_level: RiskLevel,
    pub suggestions: Vec<String>,
    pub completeness: u8,
}

impl ScoreResult {
    /// Applies rule score modifiers; the last `set` wins and completeness follows the score.
    pub fn apply_modifiers(&mut self, modifiers: &[ScoreModifier]) {
        let Some(ScoreModifier::Set(score)) = modifiers.last() else {
            return;
        };
        self.score = (*score).clamp(0, i64::from(MAX_SCORE)) as u8;
        self.completeness = completeness_for(self.score);
    }
}

fn completeness_for(score: u8) -> u8 {
    score.saturating_add(10).min(MAX_SCORE)
}

fn any_mentions(questions: &[String], terms: &[&str]) -> bool {
    questions.iter().any(|question| {
        let lowered = question.to_lowercase();
        terms.iter().any(|term| lowered.contains(term))
    })
}

pub fn analyze_draft(input: &DraftAnalysis) -> ScoreResult {
    let questions = &input.questions;
    let mut score: u32 = 0;
    let mut risk = RiskLevel::Low;
    let mut suggestions: Vec<&str> = Vec::new();

    match questions.len() {
        0 => suggestions.push(ADD_QUESTION),
        1..=2 => {
            score += 40;
            suggestions.push(MORE_QUESTIONS);
        }
        3..=10 => score += 80,
        _ => {
            score += 70;
            risk = RiskLevel::Medium;
            suggestions.push(TOO_MANY_QUESTIONS);
        }
    }

    let category = input
        .intent
        .as_deref()
        .and_then(|intent| intent.parse::<Category>().ok());
    if let Some(category) = category {
        if category.is_financial() {
            score += 10;
            risk = risk.max(RiskLevel::Medium);
            if !any_mentions(questions, &["contract", "audit"]) {
                suggestions.push(ASK_FOR_CONTRACTS);
            }
        }
        if category.is_procedural() {
            score += 10;
            if !any_mentions(questions, &["name", "designation"]) {
                suggestions.push(ASK_FOR_OFFICERS);
            }
        }
    }

    let has_department = input
        .department
        .as_deref()
        .is_some_and(|department| !department.trim().is_empty());
    if has_department {
        score += 5;
    } else {
        suggestions.push(SPECIFY_DEPARTMENT);
    }

    let score = score.min(u32::from(MAX_SCORE)) as u8;
    let mut unique: Vec<String> = Vec::with_capacity(suggestions.len());
    for suggestion in suggestions {
        if !unique.iter().any(|existing| existing == suggestion) {
            unique.push(suggestion.to_string());
        }
    }

    ScoreResult {
        score,
        risk_level: risk,
        suggestions: unique,
        completeness: completeness_for(score),
    }
}
