use super::common::*;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::pipeline::repository::EmptyStore;
use crate::pipeline::router::{departments_handler, pipeline_router};

fn router() -> Router {
    let service = build_service(EmptyStore, MemoryRules::default(), EmptyStore);
    pipeline_router(Arc::new(service))
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request builds")
}

#[tokio::test]
async fn intent_route_detects_department() {
    let response = router()
        .oneshot(post_json(
            "/api/v1/intent",
            json!({"problem": "Electricity bill is wrong"}),
        ))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);

    let payload = read_json_body(response).await;
    assert_eq!(payload["department"], "Electricity");
    assert_eq!(payload["source"], "built_in");
    assert_eq!(payload["keywords"], json!(["electricity", "bill", "wrong"]));
}

#[tokio::test]
async fn intent_route_treats_non_text_as_empty() {
    let response = router()
        .oneshot(post_json("/api/v1/intent", json!({"text": 42})))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);

    let payload = read_json_body(response).await;
    assert_eq!(payload["department"], Value::Null);
    assert_eq!(payload["confidence"], 0);
}

#[tokio::test]
async fn questions_route_validates_cap() {
    let response = router()
        .oneshot(post_json(
            "/api/v1/questions",
            json!({"keywords": ["budget"], "maxQuestions": 0}),
        ))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload["error"], "maxQuestions must be at least 1");

    let response = router()
        .oneshot(post_json(
            "/api/v1/questions",
            json!({"keywords": ["budget"], "maxQuestions": 2, "department": "Finance"}),
        ))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["intent"]["department"], "Finance");
    assert_eq!(
        payload["questions"],
        json!([
            "Provide detailed budget allocation for budget.",
            "Provide expenditure details for budget for the last 3 years."
        ])
    );
}

#[tokio::test]
async fn suggestions_route_detects_intent_from_description() {
    let response = router()
        .oneshot(post_json(
            "/api/v1/questions/suggestions",
            json!({
                "description": "My electricity bill has been wrong for months",
                "maxQuestions": 3
            }),
        ))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);

    let payload = read_json_body(response).await;
    assert_eq!(payload["intent"]["department"], "Electricity");
    assert!(payload["intent"]["confidence"].as_u64().is_some_and(|value| value > 0));
    let suggestions = payload["suggestions"].as_array().expect("suggestion list");
    assert_eq!(suggestions.len(), 3);
    assert_eq!(suggestions[0]["id"], 1);
    assert_eq!(suggestions[0]["selected"], true);
}

#[tokio::test]
async fn question_keywords_are_filtered_like_free_text() {
    let response = router()
        .oneshot(post_json(
            "/api/v1/questions",
            json!({"keywords": ["of", "the"], "department": "Jal Board"}),
        ))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);

    let payload = read_json_body(response).await;
    assert_eq!(payload["intent"]["keywords"], json!([]));
    assert_eq!(payload["intent"]["department"], "Jal Board");
    assert_eq!(
        payload["questions"][0],
        "Provide information about recent activities of Jal Board."
    );
    assert_eq!(payload["questions"].as_array().map(Vec::len), Some(5));
}

#[tokio::test]
async fn template_meta_lists_variables() {
    let service = build_service(
        EmptyStore,
        MemoryRules::default(),
        MemoryTemplates::with(
            "tpl-works",
            "To {{department}}, {{location}}\n\
             {{#each questions}}{{this}}{{/each}}\n{{applicantName}}",
        ),
    );
    let app = pipeline_router(Arc::new(service));

    let response = app
        .clone()
        .oneshot(get("/api/v1/templates/tpl-works/meta"))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["id"], "tpl-works");
    assert_eq!(
        payload["variables"],
        json!(["department", "location", "applicantName"])
    );

    let response = app
        .oneshot(get("/api/v1/templates/tpl-missing/meta"))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn library_additions_are_validated() {
    let app = router();

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/v1/questions/library",
            json!({"category": "weather", "question": "Provide rainfall data."}),
        ))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/v1/questions/library",
            json!({"category": "budget", "question": "   "}),
        ))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(post_json(
            "/api/v1/questions/library",
            json!({"category": "Budget", "question": "Provide utilisation certificates for {topic}."}),
        ))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["success"], true);
    assert_eq!(payload["domain"], "budget");
    assert_eq!(payload["total"], 5);
}

#[tokio::test]
async fn catalog_routes_describe_the_library() {
    let response = router()
        .oneshot(get("/api/v1/questions/domains"))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["domains"].as_array().map(Vec::len), Some(6));

    let response = router()
        .oneshot(get("/api/v1/questions/graph"))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["nodes"][0]["id"], "root");
}

#[tokio::test]
async fn analyze_route_scores_empty_draft() {
    let response = router()
        .oneshot(post_json("/api/v1/drafts/analyze", json!({})))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);

    let payload = read_json_body(response).await;
    assert_eq!(payload["score"], 0);
    assert_eq!(payload["riskLevel"], "Low");
    assert_eq!(payload["completeness"], 10);
}

#[tokio::test]
async fn validate_route_returns_summary() {
    let response = router()
        .oneshot(post_json("/api/v1/drafts/validate", json!({})))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);

    let payload = read_json_body(response).await;
    assert_eq!(payload["summary"]["status"], "needs_improvement");
    assert_eq!(payload["validation"]["isValid"], false);
}

#[tokio::test]
async fn generate_route_maps_errors_to_status() {
    let response = router()
        .oneshot(post_json(
            "/api/v1/drafts/generate",
            json!({"description": "", "maxQuestions": 0}),
        ))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload["error"], "maxQuestions must be at least 1");

    let response = router()
        .oneshot(post_json("/api/v1/drafts/generate", json!({"description": null})))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["department"], Value::Null);
    assert_eq!(payload["questions"].as_array().map(Vec::len), Some(5));

    let response = router()
        .oneshot(post_json(
            "/api/v1/drafts/generate",
            json!({"problem": "Street light not working for months", "location": "Pune"}),
        ))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["department"], "Municipal");
    assert_eq!(payload["metadata"]["templateUsed"], "default");
    assert!(payload["draft"]
        .as_str()
        .is_some_and(|draft| draft.contains("Pune")));
}

#[tokio::test]
async fn departments_handler_lists_built_in_table() {
    let service = Arc::new(build_service(
        UnavailableStore,
        MemoryRules::default(),
        EmptyStore,
    ));
    let response = departments_handler(State(service)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let payload = read_json_body(response).await;
    assert_eq!(payload["source"], "built_in");
    assert_eq!(payload["departments"].as_array().map(Vec::len), Some(10));
}
