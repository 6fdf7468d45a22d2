use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::pipeline::intent::{DepartmentSource, Intent, IntentDetector, KeywordSet};
use crate::pipeline::lexicon::{Category, Language, Lexicon};
use crate::pipeline::questions::{GenerationOptions, QuestionGenerator, DEFAULT_MAX_QUESTIONS};
use crate::pipeline::repository::{DepartmentStore, RuleStore, TemplateStore};
use crate::pipeline::rules::RuleEngine;
use crate::pipeline::scoring::{analyze_draft, DraftAnalysis, RiskLevel};

use super::renderer::{DraftRenderer, RenderData};

pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_millis(2000);

/// Runtime knobs shared by every pipeline component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSettings {
    pub max_questions: usize,
    pub store_timeout: Duration,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            max_questions: DEFAULT_MAX_QUESTIONS,
            store_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DraftRequest {
    #[serde(alias = "problem", deserialize_with = "text_or_empty")]
    pub description: String,
    pub department: Option<String>,
    pub location: Option<String>,
    pub language: Language,
    pub applicant_name: Option<String>,
    pub applicant_address: Option<String>,
    #[serde(alias = "questions")]
    pub selected_questions: Vec<String>,
    pub max_questions: Option<usize>,
}

/// Null or non-string descriptions read as empty text.
fn text_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_str().unwrap_or_default().to_string())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentSummary {
    pub keywords: KeywordSet,
    pub confidence: u8,
    pub source: DepartmentSource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftMetadata {
    pub generated_at: DateTime<Utc>,
    pub language: Language,
    pub template_used: String,
}

/// Final draft record returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedDraft {
    pub draft: String,
    pub questions: Vec<String>,
    pub department: Option<String>,
    pub intent: IntentSummary,
    pub score: u8,
    pub risk_level: RiskLevel,
    pub warnings: Vec<String>,
    pub suggestions: Vec<String>,
    pub completeness: u8,
    pub applied_rules: Vec<String>,
    pub metadata: DraftMetadata,
}

#[derive(Debug, thiserror::Error)]
pub enum DraftError {
    #[error("maxQuestions must be at least 1")]
    InvalidMaxQuestions,
    #[error("failed to build rule context: {0}")]
    Context(#[from] serde_json::Error),
}

/// Sequences intent detection, question generation, rules, rendering, and scoring.
pub struct DraftService<D, R, T> {
    detector: IntentDetector<D>,
    generator: QuestionGenerator,
    rules: RuleEngine<R>,
    renderer: DraftRenderer<T>,
    settings: PipelineSettings,
}

impl<D, R, T> DraftService<D, R, T>
where
    D: DepartmentStore + 'static,
    R: RuleStore + 'static,
    T: TemplateStore + 'static,
{
    pub fn new(
        lexicon: Arc<Lexicon>,
        departments: Arc<D>,
        rules: Arc<R>,
        templates: Arc<T>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            detector: IntentDetector::new(
                Arc::clone(&lexicon),
                departments,
                settings.store_timeout,
            ),
            generator: QuestionGenerator::new(lexicon),
            rules: RuleEngine::new(rules, settings.store_timeout),
            renderer: DraftRenderer::new(templates, settings.store_timeout),
            settings,
        }
    }

    pub fn detector(&self) -> &IntentDetector<D> {
        &self.detector
    }

    pub fn generator(&self) -> &QuestionGenerator {
        &self.generator
    }

    pub fn rules(&self) -> &RuleEngine<R> {
        &self.rules
    }

    pub fn renderer(&self) -> &DraftRenderer<T> {
        &self.renderer
    }

    pub fn settings(&self) -> PipelineSettings {
        self.settings
    }

    /// Generation options for a request, using the configured cap when none is given.
    pub fn generation_options(
        &self,
        max_questions: Option<usize>,
        language: Language,
    ) -> Result<GenerationOptions, DraftError> {
        let max_questions = max_questions.unwrap_or(self.settings.max_questions);
        if max_questions == 0 {
            return Err(DraftError::InvalidMaxQuestions);
        }
        Ok(GenerationOptions {
            max_questions,
            language,
            ..GenerationOptions::default()
        })
    }

    pub async fn generate_draft(
        &self,
        request: DraftRequest,
    ) -> Result<GeneratedDraft, DraftError> {
        let options = self.generation_options(request.max_questions, request.language)?;

        let intent = self.detector.detect(&request.description).await;
        let department = request
            .department
            .as_deref()
            .map(str::trim)
            .filter(|department| !department.is_empty())
            .map(str::to_string)
            .or_else(|| intent.department.clone());

        let mut questions = if request.selected_questions.is_empty() {
            let targeted = intent
                .clone()
                .with_department_override(department.as_deref());
            self.generator.generate_questions(&targeted, &options)
        } else {
            request.selected_questions.clone()
        };

        let intent_value = serde_json::to_value(&intent)?;
        let context = json!({
            "description": request.description,
            "department": department,
            "location": request.location,
            "language": request.language.code(),
            "applicantName": request.applicant_name,
            "applicantAddress": request.applicant_address,
            "questions": questions,
            "questionsCount": questions.len(),
            "intent": intent_value,
        });
        let evaluation = self.rules.evaluate(&context).await;
        questions.extend(evaluation.additional_questions.iter().cloned());

        let render_data = RenderData {
            applicant_name: request.applicant_name.clone(),
            applicant_address: request.applicant_address.clone(),
            department: department.clone(),
            location: request.location.clone(),
            questions: questions.clone(),
            language: request.language,
            topic: Some(intent.keywords.join(" ")),
            date: Some(Utc::now().date_naive()),
        };
        let template_override = evaluation.template_override.as_deref();
        let draft = self.renderer.render(&render_data, template_override).await;

        let category = self.primary_category(&intent);
        let mut analysis = analyze_draft(&DraftAnalysis {
            questions: questions.clone(),
            department: department.clone(),
            intent: Some(category.id().to_string()),
        });
        analysis.apply_modifiers(&evaluation.score_modifiers);

        let mut warnings: Vec<String> = Vec::new();
        for warning in evaluation.warnings.iter().chain(&analysis.suggestions) {
            if !warnings.contains(warning) {
                warnings.push(warning.clone());
            }
        }

        info!(
            department = department.as_deref().unwrap_or("unknown"),
            questions = questions.len(),
            score = analysis.score,
            applied_rules = evaluation.applied_rules.len(),
            "draft generated"
        );

        Ok(GeneratedDraft {
            draft,
            questions,
            department,
            intent: IntentSummary {
                keywords: intent.keywords,
                confidence: intent.confidence,
                source: intent.source,
            },
            score: analysis.score,
            risk_level: analysis.risk_level,
            warnings,
            suggestions: analysis.suggestions,
            completeness: analysis.completeness,
            applied_rules: evaluation.applied_rules,
            metadata: DraftMetadata {
                generated_at: Utc::now(),
                language: request.language,
                template_used: evaluation
                    .template_override
                    .unwrap_or_else(|| "default".to_string()),
            },
        })
    }

    fn primary_category(&self, intent: &Intent) -> Category {
        self.generator
            .infer_categories(&intent.keywords)
            .first()
            .copied()
            .unwrap_or(Category::General)
    }
}
