use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::draft::{DraftError, DraftRequest, DraftService, RenderError};
use super::intent::Intent;
use super::lexicon::{Category, Language};
use super::questions::GenerationOptions;
use super::repository::{DepartmentStore, RuleStore, TemplateStore};
use super::scoring::{analyze_draft, validate_draft, DraftAnalysis, DraftRecord};

type Service<D, R, T> = Arc<DraftService<D, R, T>>;

/// Router exposing the intelligence pipeline under `/api/v1`.
pub fn pipeline_router<D, R, T>(service: Service<D, R, T>) -> Router
where
    D: DepartmentStore + 'static,
    R: RuleStore + 'static,
    T: TemplateStore + 'static,
{
    Router::new()
        .route("/api/v1/intent", post(intent_handler::<D, R, T>))
        .route("/api/v1/departments", get(departments_handler::<D, R, T>))
        .route("/api/v1/questions", post(questions_handler::<D, R, T>))
        .route(
            "/api/v1/questions/suggestions",
            post(suggestions_handler::<D, R, T>),
        )
        .route(
            "/api/v1/questions/library",
            get(library_handler::<D, R, T>).post(add_question_handler::<D, R, T>),
        )
        .route(
            "/api/v1/questions/categories",
            get(categories_handler::<D, R, T>),
        )
        .route("/api/v1/questions/domains", get(domains_handler::<D, R, T>))
        .route("/api/v1/questions/graph", get(graph_handler::<D, R, T>))
        .route(
            "/api/v1/templates/:id/meta",
            get(template_meta_handler::<D, R, T>),
        )
        .route("/api/v1/rules/evaluate", post(rules_handler::<D, R, T>))
        .route("/api/v1/drafts/analyze", post(analyze_handler))
        .route("/api/v1/drafts/validate", post(validate_handler))
        .route("/api/v1/drafts/generate", post(generate_handler::<D, R, T>))
        .with_state(service)
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let payload = json!({
        "error": message.into(),
    });
    (status, Json(payload)).into_response()
}

/// Non-string `text` values are accepted and treated as empty input.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct IntentRequest {
    #[serde(alias = "problem", alias = "description")]
    pub text: Value,
}

/// `description` is free text run through intent detection; `keywords` is used only when
/// no description string is given.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct QuestionRequest {
    #[serde(alias = "problem")]
    pub description: Value,
    pub keywords: Vec<String>,
    pub department: Option<String>,
    pub max_questions: Option<usize>,
    pub categories: Vec<Category>,
    pub language: Language,
    pub years: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct LibraryQuery {
    pub domain: Option<String>,
    pub intent: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AddQuestionRequest {
    pub category: String,
    pub question: String,
}

pub(crate) async fn intent_handler<D, R, T>(
    State(service): State<Service<D, R, T>>,
    Json(request): Json<IntentRequest>,
) -> Response
where
    D: DepartmentStore + 'static,
    R: RuleStore + 'static,
    T: TemplateStore + 'static,
{
    let text = request.text.as_str().unwrap_or_default();
    let intent = service.detector().detect(text).await;
    (StatusCode::OK, Json(intent)).into_response()
}

pub(crate) async fn departments_handler<D, R, T>(
    State(service): State<Service<D, R, T>>,
) -> Response
where
    D: DepartmentStore + 'static,
    R: RuleStore + 'static,
    T: TemplateStore + 'static,
{
    let (source, departments) = service.detector().all_departments().await;
    let payload = json!({
        "source": source,
        "departments": departments,
    });
    (StatusCode::OK, Json(payload)).into_response()
}

async fn question_inputs<D, R, T>(
    service: &DraftService<D, R, T>,
    request: QuestionRequest,
) -> Result<(Intent, GenerationOptions), Response>
where
    D: DepartmentStore + 'static,
    R: RuleStore + 'static,
    T: TemplateStore + 'static,
{
    let mut options = service
        .generation_options(request.max_questions, request.language)
        .map_err(|err| error_response(StatusCode::BAD_REQUEST, err.to_string()))?;
    options.categories = request.categories;
    if let Some(years) = request.years {
        options.years = years;
    }

    let text = match request.description.as_str() {
        Some(description) => description.to_string(),
        None => request.keywords.join(" "),
    };
    let intent = service
        .detector()
        .detect(&text)
        .await
        .with_department_override(request.department.as_deref());
    Ok((intent, options))
}

pub(crate) async fn questions_handler<D, R, T>(
    State(service): State<Service<D, R, T>>,
    Json(request): Json<QuestionRequest>,
) -> Response
where
    D: DepartmentStore + 'static,
    R: RuleStore + 'static,
    T: TemplateStore + 'static,
{
    match question_inputs(&service, request).await {
        Ok((intent, options)) => {
            let questions = service.generator().generate_questions(&intent, &options);
            let payload = json!({
                "intent": intent,
                "questions": questions,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(response) => response,
    }
}

pub(crate) async fn suggestions_handler<D, R, T>(
    State(service): State<Service<D, R, T>>,
    Json(request): Json<QuestionRequest>,
) -> Response
where
    D: DepartmentStore + 'static,
    R: RuleStore + 'static,
    T: TemplateStore + 'static,
{
    match question_inputs(&service, request).await {
        Ok((intent, options)) => {
            let suggestions = service
                .generator()
                .suggestions_with_explanations(&intent, &options);
            let payload = json!({
                "intent": intent,
                "suggestions": suggestions,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(response) => response,
    }
}

pub(crate) async fn library_handler<D, R, T>(
    State(service): State<Service<D, R, T>>,
    Query(query): Query<LibraryQuery>,
) -> Response
where
    D: DepartmentStore + 'static,
    R: RuleStore + 'static,
    T: TemplateStore + 'static,
{
    let domain = query
        .domain
        .as_deref()
        .and_then(|domain| domain.parse::<Category>().ok());
    let questions = service
        .generator()
        .library()
        .templates(domain, query.intent.as_deref());
    (StatusCode::OK, Json(json!({ "questions": questions }))).into_response()
}

pub(crate) async fn add_question_handler<D, R, T>(
    State(service): State<Service<D, R, T>>,
    Json(request): Json<AddQuestionRequest>,
) -> Response
where
    D: DepartmentStore + 'static,
    R: RuleStore + 'static,
    T: TemplateStore + 'static,
{
    let category = match request.category.parse::<Category>() {
        Ok(category) => category,
        Err(err) => return error_response(StatusCode::BAD_REQUEST, err.to_string()),
    };
    let question = request.question.trim();
    if question.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "question text is required");
    }

    let total = service.generator().add_question(category, question);
    let payload = json!({
        "success": true,
        "domain": category,
        "total": total,
    });
    (StatusCode::CREATED, Json(payload)).into_response()
}

pub(crate) async fn categories_handler<D, R, T>(
    State(service): State<Service<D, R, T>>,
) -> Response
where
    D: DepartmentStore + 'static,
    R: RuleStore + 'static,
    T: TemplateStore + 'static,
{
    let categories = service.generator().categories();
    (StatusCode::OK, Json(json!({ "categories": categories }))).into_response()
}

pub(crate) async fn domains_handler<D, R, T>(State(service): State<Service<D, R, T>>) -> Response
where
    D: DepartmentStore + 'static,
    R: RuleStore + 'static,
    T: TemplateStore + 'static,
{
    let domains = service.generator().library().domains();
    (StatusCode::OK, Json(json!({ "domains": domains }))).into_response()
}

pub(crate) async fn graph_handler<D, R, T>(State(service): State<Service<D, R, T>>) -> Response
where
    D: DepartmentStore + 'static,
    R: RuleStore + 'static,
    T: TemplateStore + 'static,
{
    let graph = service.generator().knowledge_graph();
    (StatusCode::OK, Json(graph)).into_response()
}

pub(crate) async fn template_meta_handler<D, R, T>(
    State(service): State<Service<D, R, T>>,
    Path(id): Path<String>,
) -> Response
where
    D: DepartmentStore + 'static,
    R: RuleStore + 'static,
    T: TemplateStore + 'static,
{
    match service.renderer().template_metadata(&id).await {
        Ok(metadata) => (StatusCode::OK, Json(metadata)).into_response(),
        Err(err @ RenderError::TemplateNotFound(_)) => {
            error_response(StatusCode::NOT_FOUND, err.to_string())
        }
        Err(err) => error_response(StatusCode::SERVICE_UNAVAILABLE, err.to_string()),
    }
}

pub(crate) async fn rules_handler<D, R, T>(
    State(service): State<Service<D, R, T>>,
    Json(context): Json<Value>,
) -> Response
where
    D: DepartmentStore + 'static,
    R: RuleStore + 'static,
    T: TemplateStore + 'static,
{
    let result = service.rules().evaluate(&context).await;
    (StatusCode::OK, Json(result)).into_response()
}

pub(crate) async fn analyze_handler(Json(analysis): Json<DraftAnalysis>) -> Response {
    (StatusCode::OK, Json(analyze_draft(&analysis))).into_response()
}

pub(crate) async fn validate_handler(Json(record): Json<DraftRecord>) -> Response {
    let validation = validate_draft(&record);
    let payload = json!({
        "summary": validation.summary(),
        "validation": validation,
    });
    (StatusCode::OK, Json(payload)).into_response()
}

pub(crate) async fn generate_handler<D, R, T>(
    State(service): State<Service<D, R, T>>,
    Json(request): Json<DraftRequest>,
) -> Response
where
    D: DepartmentStore + 'static,
    R: RuleStore + 'static,
    T: TemplateStore + 'static,
{
    match service.generate_draft(request).await {
        Ok(draft) => (StatusCode::OK, Json(draft)).into_response(),
        Err(err @ DraftError::InvalidMaxQuestions) => {
            error_response(StatusCode::BAD_REQUEST, err.to_string())
        }
        Err(err) => error_response(StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
    }
}
