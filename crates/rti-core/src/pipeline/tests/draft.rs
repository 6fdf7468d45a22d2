use super::common::*;

use serde_json::json;

use crate::pipeline::draft::{DraftError, DraftRequest};
use crate::pipeline::intent::DepartmentSource;
use crate::pipeline::repository::EmptyStore;
use crate::pipeline::scoring::RiskLevel;

const DELAYED_REPAIR: &str = "The road contractor has delayed the repair work for two years";

fn request(description: &str) -> DraftRequest {
    DraftRequest {
        description: description.to_string(),
        applicant_name: Some("Asha Verma".to_string()),
        location: Some("Ward 12, Jaipur".to_string()),
        ..DraftRequest::default()
    }
}

fn municipal_rules() -> MemoryRules {
    MemoryRules::with(vec![
        rule(json!({
            "name": "large-works",
            "priority": 10,
            "conditions": [
                {"field": "intent.department", "operator": "equals", "value": "Municipal"}
            ],
            "actions": [
                {"type": "addWarning", "value": "Municipal works queries are often transferred."},
                {"type": "addQuestion", "value": "Provide the measurement book entries for the work."}
            ]
        })),
        rule(json!({
            "name": "custom-template",
            "priority": 5,
            "conditions": [{"field": "questionsCount", "operator": "greater_than", "value": 3}],
            "actions": [{"type": "setTemplate", "value": "tpl-municipal"}]
        })),
        rule(json!({
            "name": "retired",
            "priority": 50,
            "isActive": false,
            "conditions": [{"field": "department", "operator": "equals", "value": "Municipal"}],
            "actions": [{"type": "setScore", "value": 1}]
        })),
    ])
}

#[tokio::test]
async fn full_pipeline_applies_rules_template_and_scoring() {
    let templates = MemoryTemplates::with(
        "tpl-municipal",
        "To the PIO, {{department}}\n{{questions}}\n{{applicantName}}",
    );
    let service = build_service(EmptyStore, municipal_rules(), templates);

    let draft = service
        .generate_draft(request(DELAYED_REPAIR))
        .await
        .expect("draft generated");

    assert_eq!(draft.department.as_deref(), Some("Municipal"));
    assert_eq!(draft.intent.source, DepartmentSource::BuiltIn);
    assert_eq!(draft.questions.len(), 6);
    assert_eq!(
        draft.questions[5],
        "Provide the measurement book entries for the work."
    );
    assert_eq!(draft.applied_rules, vec!["large-works", "custom-template"]);

    assert!(draft.draft.starts_with("To the PIO, Municipal\n1. "));
    assert!(draft.draft.ends_with("\nAsha Verma"));
    assert_eq!(draft.metadata.template_used, "tpl-municipal");

    // Six questions, contractor intent, and a department.
    assert_eq!(draft.score, 95);
    assert_eq!(draft.completeness, 100);
    assert_eq!(draft.risk_level, RiskLevel::Medium);
    assert!(draft.suggestions.is_empty());
    assert_eq!(
        draft.warnings,
        vec!["Municipal works queries are often transferred."]
    );
}

#[tokio::test]
async fn rule_score_override_replaces_computed_score() {
    let rules = MemoryRules::with(vec![rule(json!({
        "name": "manual-review",
        "conditions": [{"field": "description", "operator": "contains", "value": "contractor"}],
        "actions": [{"type": "setScore", "value": 40}]
    }))]);
    let service = build_service(EmptyStore, rules, EmptyStore);

    let draft = service
        .generate_draft(request(DELAYED_REPAIR))
        .await
        .expect("draft generated");
    assert_eq!(draft.score, 40);
    assert_eq!(draft.completeness, 50);
    assert_eq!(draft.metadata.template_used, "default");
}

#[tokio::test]
async fn missing_template_falls_back_to_standard_letter() {
    let rules = MemoryRules::with(vec![rule(json!({
        "name": "ghost-template",
        "conditions": [{"field": "questionsCount", "operator": "greater_than", "value": 0}],
        "actions": [{"type": "setTemplate", "value": "tpl-missing"}]
    }))]);
    let service = build_service(EmptyStore, rules, EmptyStore);

    let draft = service
        .generate_draft(request(DELAYED_REPAIR))
        .await
        .expect("draft generated");
    assert!(draft
        .draft
        .starts_with("APPLICATION UNDER THE RIGHT TO INFORMATION ACT, 2005"));
    assert!(draft.draft.contains("Ward 12, Jaipur"));
    assert_eq!(draft.metadata.template_used, "tpl-missing");
}

#[tokio::test]
async fn failing_stores_still_produce_a_draft() {
    let service = build_service(UnavailableStore, UnavailableStore, UnavailableStore);

    let draft = service
        .generate_draft(request(DELAYED_REPAIR))
        .await
        .expect("draft generated");
    assert!(draft.applied_rules.is_empty());
    assert_eq!(draft.questions.len(), 5);
    assert_eq!(draft.department.as_deref(), Some("Municipal"));
    assert!(draft.draft.contains("1. Provide details of contractors involved in"));
}

#[tokio::test]
async fn selected_questions_skip_generation() {
    let service = build_service(EmptyStore, MemoryRules::default(), EmptyStore);
    let draft = service
        .generate_draft(DraftRequest {
            selected_questions: vec![
                "Provide the sanctioned estimate.".to_string(),
                "Provide the completion certificate.".to_string(),
            ],
            ..DraftRequest::default()
        })
        .await
        .expect("draft generated");

    assert_eq!(draft.questions.len(), 2);
    assert_eq!(draft.department, None);
    assert_eq!(draft.score, 40);
    assert_eq!(
        draft.suggestions,
        vec![
            "Adding more specific questions increases response probability.",
            "Specifying a department helps route the application correctly.",
        ]
    );
    assert_eq!(draft.warnings, draft.suggestions);
    assert!(draft.draft.contains("[Department Name]"));
}

#[tokio::test]
async fn explicit_department_overrides_detection() {
    let service = build_service(EmptyStore, MemoryRules::default(), EmptyStore);
    let draft = service
        .generate_draft(DraftRequest {
            department: Some(" Jal Board ".to_string()),
            max_questions: Some(2),
            ..request("water supply contractor payment pending")
        })
        .await
        .expect("draft generated");
    assert_eq!(draft.department.as_deref(), Some("Jal Board"));
    assert_eq!(draft.questions.len(), 2);
}

#[tokio::test]
async fn blank_description_uses_default_questions() {
    let service = build_service(EmptyStore, MemoryRules::default(), EmptyStore);

    let draft = service
        .generate_draft(request("   "))
        .await
        .expect("blank description still drafts");
    assert_eq!(draft.department, None);
    assert_eq!(draft.questions.len(), 5);
    assert_eq!(
        draft.questions[0],
        "Provide information about recent activities of the department."
    );
    assert!(draft.draft.contains("Asha Verma"));

    let draft = service
        .generate_draft(DraftRequest::default())
        .await
        .expect("empty request still drafts");
    assert_eq!(draft.questions.len(), 5);
}

#[tokio::test]
async fn zero_question_cap_is_rejected() {
    let service = build_service(EmptyStore, MemoryRules::default(), EmptyStore);

    let err = service
        .generate_draft(DraftRequest {
            max_questions: Some(0),
            ..request(DELAYED_REPAIR)
        })
        .await
        .expect_err("zero cap rejected");
    assert!(matches!(err, DraftError::InvalidMaxQuestions));
}
